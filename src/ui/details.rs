use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::model::story::Story;
use crate::ui::theme::BORDER;

pub fn render(f: &mut Frame, area: Rect, story: &Story) {
    let mut lines: Vec<Line> = Vec::new();

    if !story.labels.is_empty() {
        let names: Vec<&str> = story.labels.iter().map(|l| l.name.as_str()).collect();
        lines.push(Line::from(vec![
            Span::styled("Labels: ", Style::default().fg(ratatui::style::Color::Gray)),
            Span::styled(
                names.join(", "),
                Style::default().fg(ratatui::style::Color::Green),
            ),
        ]));
    }

    if !story.owners.is_empty() {
        let names: Vec<&str> = story.owners.iter().map(|p| p.name.as_str()).collect();
        lines.push(Line::from(vec![
            Span::styled("Owners: ", Style::default().fg(ratatui::style::Color::Gray)),
            Span::raw(names.join(", ")),
        ]));
    }

    if let Some(url) = &story.url {
        lines.push(Line::from(vec![
            Span::styled("URL: ", Style::default().fg(ratatui::style::Color::Gray)),
            Span::styled(url, Style::default().fg(ratatui::style::Color::Blue)),
        ]));
    }

    match story.description.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(desc) => {
            lines.push(Line::raw(""));
            lines.extend(desc.lines().map(|l| Line::raw(l.to_string())));
        }
        None => {
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                "No description",
                Style::default().fg(ratatui::style::Color::DarkGray),
            ));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(BORDER))
                .title(" Details "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
