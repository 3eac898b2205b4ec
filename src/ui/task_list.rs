use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::model::story::Task;
use crate::ui::theme::BORDER;

pub fn render(f: &mut Frame, area: Rect, tasks: &[Task], selected: usize) {
    let items: Vec<ListItem> = tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let check = if task.complete {
                Span::styled("[x] ", Style::default().fg(ratatui::style::Color::Green))
            } else {
                Span::styled("[ ] ", Style::default().fg(ratatui::style::Color::Gray))
            };

            let mut style = Style::default();
            if task.complete {
                style = style
                    .fg(ratatui::style::Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT);
            }
            if i == selected {
                style = style
                    .fg(ratatui::style::Color::Cyan)
                    .add_modifier(Modifier::BOLD);
            }

            ListItem::new(Line::from(vec![check, Span::styled(task.description.clone(), style)]))
        })
        .collect();

    let title = if tasks.is_empty() {
        " Tasks (none, a to add) "
    } else {
        " Tasks "
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(BORDER))
            .title(title),
    );

    let mut state = ListState::default();
    if !tasks.is_empty() {
        state.select(Some(selected.min(tasks.len() - 1)));
    }
    f.render_stateful_widget(list, area, &mut state);
}
