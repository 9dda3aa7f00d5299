//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into four layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, input editing
//! - **[`worker`]**: runs the engine on a background thread with cancellation
//! - **[`panes`]**: stateless render functions for each visible pane (source,
//!   output, input, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with the source text
//! and a [`RunConfig`] and call [`App::run`] to start the event loop.
//!
//! [`RunConfig`]: crate::interpreter::config::RunConfig
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;
pub mod worker;

pub use app::App;
