//! # Dialog Component
//!
//! Centered modal box for alerts (Enter/Esc to dismiss) and yes/no
//! confirmations (y/Enter confirm, n/Esc cancel).

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::tui::component::Component;
use crate::tui::event::TuiEvent;

#[derive(Debug, PartialEq, Eq)]
pub enum DialogEvent {
    Confirm,
    Cancel,
}

pub fn confirmation_event(event: &TuiEvent) -> Option<DialogEvent> {
    match event {
        TuiEvent::Submit | TuiEvent::InputChar('y') | TuiEvent::InputChar('Y') => {
            Some(DialogEvent::Confirm)
        }
        TuiEvent::Escape | TuiEvent::InputChar('n') | TuiEvent::InputChar('N') => {
            Some(DialogEvent::Cancel)
        }
        _ => None,
    }
}

/// True when `event` closes an alert.
pub fn dismisses_alert(event: &TuiEvent) -> bool {
    matches!(event, TuiEvent::Submit | TuiEvent::Escape)
}

pub struct Dialog<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub confirm: bool,
}

impl Component for Dialog<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(60, 30, area);
        frame.render_widget(Clear, overlay);

        let (help, color) = if self.confirm {
            (" y Yes  n No ", Color::Yellow)
        } else {
            (" Enter OK ", Color::Red)
        };
        let body = Paragraph::new(self.message)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(format!(" {} ", self.title))
                    .title_bottom(Line::from(help).centered())
                    .padding(Padding::uniform(1)),
            );
        frame.render_widget(body, overlay);
    }
}

/// Compute a centered rect using percentage of the outer rect.
pub fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
