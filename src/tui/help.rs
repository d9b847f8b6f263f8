use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn key_line(key: &str, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(key.to_string(), Style::default().fg(Color::Magenta)),
        Span::raw(format!(
            "{}{}",
            " ".repeat(12usize.saturating_sub(key.len())),
            description
        )),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Keybinds:"),
        key_line("q / Ctrl-C", "Quit"),
        key_line("tab", "Switch tabs"),
        key_line("?", "Show this help"),
        key_line("l", "Log in"),
        key_line("x", "Log out"),
        Line::from(""),
        Line::from("Booking tab:"),
        key_line("↑/↓", "Move in the focused list"),
        key_line("enter", "Select the highlighted entry"),
        key_line("v", "Refocus the vehicle list (step 1)"),
        key_line("d", "Edit the date (step 3)"),
        key_line("c", "Confirm date & time (step 3)"),
        key_line("y", "Confirm the booking (step 4)"),
        key_line("s", "Copy the summary as JSON (step 4)"),
        key_line("n", "Start a new booking"),
        key_line("b / esc", "Back one step"),
        key_line("1-4", "Jump to an earlier step"),
        Line::from(""),
        Line::from("History tab:"),
        key_line("↑/↓", "Navigate"),
        key_line("r", "Refresh"),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
