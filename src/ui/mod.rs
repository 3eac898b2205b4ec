pub mod comments;
pub mod details;
pub mod footer;
pub mod header;
pub mod input_bar;
pub mod message;
pub mod task_list;
pub mod theme;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::Line,
    Frame,
};

use crate::app::{App, Screen, Tab};

pub fn render(f: &mut Frame, app: &App) {
    let size = f.area();

    // Input box (3) while typing, else the one-line footer
    let bottom_height = if app.input.is_some() { 3 } else { 1 };

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(bottom_height)])
        .split(size);
    let main_area = vertical[0];
    let bottom_area = vertical[1];

    match &app.screen {
        Screen::Loading => {
            message::render(f, main_area, vec![Line::raw("Loading...")]);
        }
        Screen::NoStory => {
            message::render(
                f,
                main_area,
                vec![
                    Line::styled(
                        "Not on a story branch",
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Line::raw("Check out a branch ending in a story id, e.g. feature/add-login-183456789"),
                ],
            );
        }
        Screen::FetchError { story_id, message } => {
            message::render(
                f,
                main_area,
                vec![
                    Line::styled(
                        format!("Story #{story_id} could not be loaded"),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Line::raw(message.clone()),
                    Line::raw("Retrying on the next change or in two minutes (r to retry now)"),
                ],
            );
        }
        Screen::Story(screen) => {
            // Header (5) + tab body
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(5), Constraint::Min(3)])
                .split(main_area);

            header::render(f, rows[0], screen, app.nav.tab);
            match app.nav.tab {
                Tab::Details => details::render(f, rows[1], &screen.story),
                Tab::Tasks => {
                    task_list::render(f, rows[1], &screen.story.tasks, app.nav.selected_task)
                }
                Tab::Comments => {
                    comments::render(f, rows[1], &screen.story.comments, app.nav.comment_scroll)
                }
            }
        }
    }

    match &app.input {
        Some(input) => input_bar::render(f, bottom_area, input),
        None => footer::render(f, bottom_area, app),
    }
}
