//! Input line rendering: the bytes fed to `,`

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the program input line. Shows a cursor while `is_editing`.
pub fn render_input_pane(
    frame: &mut Frame,
    area: Rect,
    input_text: &str,
    is_focused: bool,
    is_editing: bool,
) {
    let border_style = if is_editing {
        Style::default()
            .fg(DEFAULT_THEME.secondary)
            .add_modifier(Modifier::BOLD)
    } else if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Input ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let caret = " > ";
    let body = if input_text.is_empty() && !is_editing {
        Span::styled("(empty, press i to edit)", Style::default().fg(DEFAULT_THEME.comment))
    } else {
        Span::styled(input_text.to_string(), Style::default().fg(DEFAULT_THEME.fg))
    };

    let line = Line::from(vec![
        Span::styled(caret, Style::default().fg(DEFAULT_THEME.primary)),
        body,
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);

    if is_editing {
        let x = cursor_column(area, caret.len(), input_text);
        frame.set_cursor_position(Position::new(x, area.y.saturating_add(1)));
    }
}

/// Column just past the typed text, kept inside the right border.
fn cursor_column(area: Rect, caret_width: usize, input_text: &str) -> u16 {
    let wanted = area.x as usize + 1 + caret_width + input_text.chars().count();
    let last_inner = area.x as usize + area.width.saturating_sub(2) as usize;
    wanted.min(last_inner) as u16
}
