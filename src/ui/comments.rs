use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::model::story::Comment;
use crate::ui::theme::BORDER;

/// Number of unwrapped lines the comment log renders to.
pub fn line_count(comments: &[Comment]) -> usize {
    comment_lines(comments).len()
}

fn comment_lines(comments: &[Comment]) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for comment in comments {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", comment.created_at.format("%Y-%m-%d %H:%M")),
                Style::default().fg(ratatui::style::Color::DarkGray),
            ),
            Span::styled(
                comment.author().to_string(),
                Style::default()
                    .fg(ratatui::style::Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));

        if let Some(text) = &comment.text {
            for text_line in text.lines() {
                lines.push(Line::raw(format!("  {text_line}")));
            }
        }
        for file in &comment.file_attachments {
            lines.push(Line::from(Span::styled(
                format!("  📎 {}", file.filename),
                Style::default().fg(ratatui::style::Color::Blue),
            )));
        }
        lines.push(Line::raw(""));
    }
    lines
}

pub fn render(f: &mut Frame, area: Rect, comments: &[Comment], scroll: usize) {
    let lines = comment_lines(comments);
    let visible_height = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(visible_height);
    let scroll = scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(BORDER))
                .title(" Comments "),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0));

    f.render_widget(paragraph, area);
}
