use ratatui::style::{Color, Modifier, Style};

use crate::model::story::{StoryState, StoryType};
use crate::workflow::TransitionStyle;

pub const TEXT: Color = Color::Rgb(0xF1, 0xF0, 0xE3);
pub const BORDER: Color = Color::Rgb(0x66, 0x66, 0x66);
pub const ACCENT: Color = Color::Rgb(0x21, 0x3F, 0x63);

pub fn transition_style(style: TransitionStyle) -> Style {
    match style {
        TransitionStyle::Start => Style::default().fg(Color::Black).bg(Color::White),
        TransitionStyle::Finish => Style::default().fg(Color::White).bg(ACCENT),
        TransitionStyle::Deliver => Style::default()
            .fg(Color::Black)
            .bg(Color::Rgb(0xFF, 0x92, 0x25)),
        TransitionStyle::Inert => Style::default().fg(Color::Gray).bg(Color::White),
    }
    .add_modifier(Modifier::BOLD)
}

pub fn type_color(story_type: StoryType) -> Color {
    match story_type {
        StoryType::Feature => Color::Yellow,
        StoryType::Bug => Color::Red,
        StoryType::Chore => Color::Gray,
    }
}

pub fn state_color(state: StoryState) -> Color {
    match state {
        StoryState::Unscheduled | StoryState::Unstarted | StoryState::Planned => Color::Gray,
        StoryState::Started => Color::Cyan,
        StoryState::Finished => Color::Blue,
        StoryState::Delivered => Color::Rgb(0xFF, 0x92, 0x25),
        StoryState::Accepted => Color::Green,
        StoryState::Rejected => Color::Red,
    }
}
