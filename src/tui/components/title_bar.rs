//! # TitleBar Component
//!
//! Top status bar: mode, signed-in user, and the current status message.
//! Purely presentational; it receives all data as props.
//!
//! ```text
//! Ridealong [Driver] ayesha | Working: start trip... ⠋
//! ```

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct TitleBar<'a> {
    pub mode_label: &'a str,
    pub username: &'a str,
    pub status_message: &'a str,
    /// Spinner frame while a remote call is in flight.
    pub spinner_frame: Option<usize>,
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled("Ridealong ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("[{}] ", self.mode_label),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(self.username.to_string()),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
            spans.push(Span::raw(self.status_message.to_string()));
        }
        if let Some(tick) = self.spinner_frame {
            spans.push(Span::raw(format!(" {}", SPINNER[tick % SPINNER.len()])));
        }
        frame.render_widget(Line::from(spans), area);
    }
}
