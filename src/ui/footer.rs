use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, Screen, Tab};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();

    match &app.screen {
        Screen::Story(_) => {
            spans.push(hint("tab", "switch"));
            match app.nav.tab {
                Tab::Tasks => {
                    spans.push(hint("↑↓", "select"));
                    spans.push(hint("space", "toggle"));
                    spans.push(hint("a", "add"));
                    spans.push(hint("e", "edit"));
                    spans.push(hint("d", "delete"));
                }
                Tab::Comments => {
                    spans.push(hint("↑↓", "scroll"));
                }
                Tab::Details => {}
            }
            spans.push(hint("s", "advance"));
            spans.push(hint("c", "comment"));
        }
        Screen::Loading | Screen::NoStory | Screen::FetchError { .. } => {}
    }
    spans.push(hint("r", "refresh"));
    spans.push(hint("q", "quit"));

    // Flash message
    if let Some((msg, _)) = &app.flash_message {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            msg,
            Style::default().fg(ratatui::style::Color::Yellow),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn hint(key: &str, desc: &str) -> Span<'static> {
    Span::styled(
        format!(" {key}:{desc} "),
        Style::default().fg(ratatui::style::Color::DarkGray),
    )
}
