use ratatui::{prelude::*, widgets::*};

pub fn render(f: &mut Frame, text: &str) {
    let block = Block::default()
        .title(crate::ui::title("usage"))
        .borders(Borders::ALL)
        .style(Style::default().gray());

    let lines: Vec<_> = text
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| Line::from(line.to_owned()))
        .collect();
    let num_lines = lines.len();
    let max_width = lines.iter().map(Line::width).max().unwrap_or_default();

    let usage = Paragraph::new(lines)
        .style(Style::default().fg(Color::Yellow))
        .block(block)
        .alignment(Alignment::Left);

    let area = centered_rect(num_lines, max_width, f.size());

    f.render_widget(Clear, area);
    f.render_widget(usage, area);
}

fn centered_rect(num_lines: usize, max_width: usize, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Min(num_lines as u16 + 2),
            Constraint::Percentage(35),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Min(max_width as u16 + 2),
            Constraint::Percentage(25),
        ])
        .split(popup_layout[1])[1]
}
