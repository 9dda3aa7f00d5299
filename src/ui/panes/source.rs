//! Source code pane rendering with instruction highlighting
//!
//! Instruction characters are colored by kind; everything else is shown as a
//! comment. When the last run failed at a known location, the offending
//! character is drawn in the error color.

use crate::parser::ast::{Op, SourceLocation};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn op_style(op: Op) -> Style {
    match op {
        Op::Right | Op::Left => Style::default().fg(DEFAULT_THEME.pointer),
        Op::Inc | Op::Dec => Style::default().fg(DEFAULT_THEME.cell_op),
        Op::Output | Op::Input => Style::default()
            .fg(DEFAULT_THEME.io_op)
            .add_modifier(Modifier::BOLD),
        Op::JumpIfZero | Op::JumpUnlessZero => Style::default()
            .fg(DEFAULT_THEME.primary)
            .add_modifier(Modifier::BOLD),
    }
}

/// Split a line into styled runs: consecutive comment characters share a span.
fn highlight_source_line(line: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut comment = String::new();

    for c in line.chars() {
        match Op::from_char(c) {
            Some(op) => {
                if !comment.is_empty() {
                    spans.push(Span::styled(
                        std::mem::take(&mut comment),
                        Style::default().fg(DEFAULT_THEME.comment),
                    ));
                }
                spans.push(Span::styled(c.to_string(), op_style(op)));
            }
            None => comment.push(c),
        }
    }

    if !comment.is_empty() {
        spans.push(Span::styled(
            comment,
            Style::default().fg(DEFAULT_THEME.comment),
        ));
    }

    Line::from(spans)
}

/// Highlight `line` with the character at 1-based `column` drawn as the error.
fn mark_column(line: &str, column: usize) -> Vec<Span<'static>> {
    let split = line
        .char_indices()
        .nth(column.saturating_sub(1))
        .map(|(i, c)| (i, i + c.len_utf8()));

    let Some((start, end)) = split else {
        return highlight_source_line(line).spans;
    };

    let mut spans = highlight_source_line(&line[..start]).spans;
    spans.push(Span::styled(
        line[start..end].to_string(),
        Style::default()
            .bg(DEFAULT_THEME.error)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ));
    spans.extend(highlight_source_line(&line[end..]).spans);
    spans
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    error_location: Option<SourceLocation>,
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
        .title(" Source ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines: Vec<&str> = source_code.lines().collect();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    *scroll_offset = (*scroll_offset).min(lines.len().saturating_sub(visible_height));

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, text)| {
            let line_no = idx + 1;
            let error_column = error_location
                .filter(|loc| loc.line == line_no)
                .map(|loc| loc.column);

            let gutter_style = match error_column {
                Some(_) => Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD),
                None => Style::default().fg(DEFAULT_THEME.comment),
            };

            let mut spans = vec![Span::styled(format!("{:4} ", line_no), gutter_style)];
            match error_column {
                Some(column) => spans.extend(mark_column(text, column)),
                None => spans.extend(highlight_source_line(text).spans),
            }
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_group_into_one_span() {
        let line = highlight_source_line("ab+cd");
        let texts: Vec<&str> = line.spans.iter().map(|s| &*s.content).collect();
        assert_eq!(texts, vec!["ab", "+", "cd"]);
    }

    #[test]
    fn test_mark_column_isolates_offending_char() {
        let spans = mark_column("é+<]", 4);
        let texts: Vec<&str> = spans.iter().map(|s| &*s.content).collect();
        assert_eq!(texts, vec!["é", "+", "<", "]"]);
        assert_eq!(spans[3].style.bg, Some(DEFAULT_THEME.error));
        assert_eq!(spans[2].style.bg, None);
    }

    #[test]
    fn test_each_instruction_is_its_own_span() {
        let line = highlight_source_line("[->+<]");
        assert_eq!(line.spans.len(), 6);
    }
}
