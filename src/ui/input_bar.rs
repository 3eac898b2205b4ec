use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::Input;

pub fn render(f: &mut Frame, area: Rect, input: &Input) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ratatui::style::Color::Yellow))
        .title(input.kind.title())
        .title_bottom(" enter:save  esc:cancel ");

    // Keep the cursor in view on long input
    let width = area.width.saturating_sub(2) as usize;
    let skip = input.cursor.saturating_sub(width.saturating_sub(1));
    let visible: String = input.buffer.chars().skip(skip).take(width).collect();

    f.render_widget(Paragraph::new(visible).block(block), area);

    let x = area.x + 1 + (input.cursor - skip) as u16;
    let y = area.y + 1;
    f.set_cursor_position((x.min(area.x + area.width.saturating_sub(2)), y));
}
