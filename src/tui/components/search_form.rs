//! # Search Form Component
//!
//! The home screen's four inputs as text fields. Tab/Down and
//! BackTab/Up move focus; Enter submits.
//!
//! Fields that don't parse submit as unset, so the core reports them the
//! same way as empty ones.

use chrono::{NaiveDate, NaiveTime};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::core::search::SearchForm;
use crate::core::trip::Mode;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

const LABELS: [&str; 4] = [
    "Start (lat,lng name)",
    "Destination (lat,lng name)",
    "Date (YYYY-MM-DD)",
    "Time (HH:MM)",
];

#[derive(Debug, Default)]
pub struct SearchFormState {
    pub fields: [String; 4],
    pub focused: usize,
}

pub enum SearchFormEvent {
    Submit(SearchForm),
}

impl SearchFormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn to_form(&self) -> SearchForm {
        SearchForm {
            start: self.fields[0].parse().ok(),
            destination: self.fields[1].parse().ok(),
            date: NaiveDate::parse_from_str(self.fields[2].trim(), DATE_FORMAT).ok(),
            time: NaiveTime::parse_from_str(self.fields[3].trim(), TIME_FORMAT).ok(),
        }
    }
}

impl EventHandler for SearchFormState {
    type Event = SearchFormEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<SearchFormEvent> {
        match event {
            TuiEvent::InputChar(c) => self.fields[self.focused].push(*c),
            TuiEvent::Paste(text) => self.fields[self.focused].push_str(text.trim()),
            TuiEvent::Backspace => {
                self.fields[self.focused].pop();
            }
            TuiEvent::Tab | TuiEvent::CursorDown => {
                self.focused = (self.focused + 1) % LABELS.len()
            }
            TuiEvent::BackTab | TuiEvent::CursorUp => {
                self.focused = (self.focused + LABELS.len() - 1) % LABELS.len()
            }
            TuiEvent::Submit => return Some(SearchFormEvent::Submit(self.to_form())),
            _ => {}
        }
        None
    }
}

/// Transient render wrapper for the home screen.
pub struct SearchFormView<'a> {
    state: &'a SearchFormState,
    mode: Mode,
}

impl<'a> SearchFormView<'a> {
    pub fn new(state: &'a SearchFormState, mode: Mode) -> Self {
        Self { state, mode }
    }
}

impl Component for SearchFormView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [heading, f0, f1, f2, f3, hint, _] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(area);

        let title = match self.mode {
            Mode::Passenger => "Where do you want to go?",
            Mode::Driver => "Offer a ride",
        };
        frame.render_widget(
            Paragraph::new(Line::from(title).centered())
                .style(Style::default().add_modifier(Modifier::BOLD)),
            heading,
        );

        for (i, field_area) in [f0, f1, f2, f3].into_iter().enumerate() {
            let border = if i == self.state.focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let field = Paragraph::new(self.state.fields[i].as_str()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(LABELS[i]),
            );
            frame.render_widget(field, field_area);
        }

        let action = match self.mode {
            Mode::Passenger => "Enter Find trips",
            Mode::Driver => "Enter Continue",
        };
        frame.render_widget(
            Paragraph::new(Line::from(format!(
                " Tab Next field  {action}  Ctrl+B Menu  Ctrl+T Switch mode "
            )))
            .style(Style::default().fg(Color::DarkGray)),
            hint,
        );
    }
}
