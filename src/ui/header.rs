use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{StoryScreen, Tab};
use crate::ui::theme::{state_color, transition_style, type_color, BORDER, TEXT};

pub fn render(f: &mut Frame, area: Rect, screen: &StoryScreen, tab: Tab) {
    let story = &screen.story;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER))
        .title(format!(" #{} ", screen.story_id));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let title = Line::from(Span::styled(
        story.name.clone(),
        Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
    ));
    f.render_widget(Paragraph::new(title), rows[0]);

    let mut spans = vec![
        Span::styled(
            format!("{} ", story.story_type.as_str()),
            Style::default().fg(type_color(story.story_type)),
        ),
        Span::styled(
            format!("{} ", story.current_state),
            Style::default().fg(state_color(story.current_state)),
        ),
    ];
    if let Some(estimate) = story.estimate {
        spans.push(Span::styled(
            format!("{estimate} pts "),
            Style::default().fg(ratatui::style::Color::Gray),
        ));
    }
    spans.push(Span::raw(" "));
    spans.push(Span::styled(
        format!(" {} ", screen.transition.label),
        transition_style(screen.transition.style),
    ));
    if screen.transition.is_actionable() {
        spans.push(Span::styled(
            " s",
            Style::default().fg(ratatui::style::Color::DarkGray),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), rows[1]);

    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|t| match t {
            Tab::Tasks => Line::from(format!("Tasks ({})", story.tasks.len())),
            Tab::Comments => Line::from(format!("Comments ({})", story.comments.len())),
            Tab::Details => Line::from(t.title()),
        })
        .collect();
    let selected = Tab::ALL.iter().position(|t| *t == tab).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(ratatui::style::Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, rows[2]);
}
