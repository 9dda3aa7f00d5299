//! Program output pane rendering

use crate::output::{Decoding, OutputBuffer};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the program output pane
pub fn render_terminal_pane(
    frame: &mut Frame,
    area: Rect,
    output: &OutputBuffer,
    decoding: Decoding,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(
            " Output: {} bytes, {} ",
            output.total_len(),
            decoding.label()
        ))
        .borders(Borders::ALL)
        .border_style(border_style);

    let line_count = output.line_count();

    if line_count == 0 {
        let paragraph = Paragraph::new("(no output)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
    } else {
        let block = block.padding(Padding::new(1, 0, 0, 0));
        let visible_height = area.height.saturating_sub(2).max(1) as usize;
        // usize::MAX from the app means "follow the tail"
        *scroll_offset = (*scroll_offset).min(line_count.saturating_sub(visible_height));

        // Only the lines on screen are decoded
        let visible_items: Vec<ListItem> = output
            .window(*scroll_offset, visible_height, decoding)
            .into_iter()
            .map(|line| ListItem::new(line).style(Style::default().fg(DEFAULT_THEME.fg)))
            .collect();

        let list = List::new(visible_items).block(block);
        frame.render_widget(list, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_follows_tail_of_long_output() {
        let mut output = OutputBuffer::new();
        for i in 0..1000 {
            output.extend(format!("line {}\n", i).as_bytes());
        }

        let mut terminal = Terminal::new(TestBackend::new(30, 6)).unwrap();
        let mut scroll = usize::MAX;
        terminal
            .draw(|f| {
                render_terminal_pane(f, f.area(), &output, Decoding::CodePoints, false, &mut scroll)
            })
            .unwrap();

        // Four inner rows show the last four lines
        assert_eq!(scroll, 996);
        let buffer = terminal.backend().buffer();
        let last_row: String = (0..30)
            .map(|x| buffer.content[4 * 30 + x].symbol())
            .collect();
        assert!(last_row.contains("line 999"));
    }
}
