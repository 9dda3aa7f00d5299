//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Source code display with instruction highlighting and error line
//! - [`terminal`]: Program output, decoded for display
//! - [`input`]: The bytes fed to `,`
//! - [`status`]: Status bar with keybindings and run state
//!
//! Each pane module exports a stateless `render_*` function; scroll offsets
//! and other state live in [`App`](crate::ui::app::App).

pub mod input;
pub mod source;
pub mod status;
pub mod terminal;

pub use input::render_input_pane;
pub use source::render_source_pane;
pub use status::render_status_bar;
pub use terminal::render_terminal_pane;
