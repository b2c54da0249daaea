use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem},
};
use std::collections::BTreeMap;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Scientific pitch name, middle C (60) is `C4`.
pub fn note_name(note: u8) -> String {
    let octave = i16::from(note / 12) - 1;
    format!("{}{octave}", NOTE_NAMES[usize::from(note % 12)])
}

/// A bar proportional to a 7-bit velocity.
pub fn velocity_bar(velocity: u8, width: usize) -> String {
    let filled = usize::from(velocity.min(127)) * width / 127;
    format!("{}{}", "█".repeat(filled), "·".repeat(width - filled))
}

pub fn render_notes(f: &mut Frame, title: &str, notes: &BTreeMap<u8, u8>, area: Rect) {
    const BAR_WIDTH: usize = 32;

    let items: Vec<ListItem> = notes
        .iter()
        .map(|(&note, &velocity)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<4}", note_name(note)), Style::default().bold()),
                Span::styled(format!("{note:>3}"), Style::default().fg(Color::Gray)),
                Span::styled(" : ", Style::default().fg(Color::DarkGray)),
                Span::styled(velocity_bar(velocity, BAR_WIDTH), Style::default().fg(Color::Cyan)),
                Span::styled(format!(" {velocity:>3}"), Style::default().fg(Color::Yellow)),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(title, Style::default().add_modifier(Modifier::BOLD))),
    );

    f.render_widget(list, area);
}

pub fn render_errors(f: &mut Frame, errors: &[String], area: Rect) {
    let items: Vec<ListItem> = errors
        .iter()
        .rev()
        .map(|error| ListItem::new(Line::from(error.as_str())))
        .collect();

    let list = List::new(items)
        .style(Style::default().fg(Color::Red))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::DarkGray))
                .title(crate::ui::title("errors")),
        );

    f.render_widget(list, area);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn names_notes_in_scientific_pitch() {
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(61), "C#4");
        assert_eq!(note_name(69), "A4");
        assert_eq!(note_name(0), "C-1");
        assert_eq!(note_name(127), "G9");
    }

    #[test]
    fn velocity_bar_spans_the_width() {
        assert_eq!(velocity_bar(0, 4), "····");
        assert_eq!(velocity_bar(127, 4), "████");
        assert_eq!(velocity_bar(64, 4).chars().count(), 4);
    }
}
