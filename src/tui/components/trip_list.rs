//! # Trip List Component
//!
//! Trip selection: search results or the user's own trips, one per line.
//! Follows the persistent state + transient wrapper pattern.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph};

use crate::core::trip::{Trip, TripStatus};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Default)]
pub struct TripListState {
    pub selected: usize,
    /// Number of trips at the last render, for bounds.
    pub len: usize,
    pub list_state: ListState,
}

pub enum TripListEvent {
    Open(usize),
    Back,
}

impl TripListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamps the selection to a list of `len` trips.
    pub fn sync(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
            self.list_state.select(None);
        } else {
            self.selected = self.selected.min(len - 1);
            self.list_state.select(Some(self.selected));
        }
    }
}

impl EventHandler for TripListState {
    type Event = TripListEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<TripListEvent> {
        match event {
            TuiEvent::Escape => Some(TripListEvent::Back),
            TuiEvent::CursorUp => {
                self.selected = self.selected.saturating_sub(1);
                self.list_state.select(Some(self.selected));
                None
            }
            TuiEvent::CursorDown => {
                if self.len > 0 {
                    self.selected = (self.selected + 1).min(self.len - 1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::Submit if self.len > 0 => Some(TripListEvent::Open(self.selected)),
            _ => None,
        }
    }
}

pub struct TripList<'a> {
    state: &'a mut TripListState,
    trips: &'a [Trip],
}

impl<'a> TripList<'a> {
    pub fn new(state: &'a mut TripListState, trips: &'a [Trip]) -> Self {
        Self { state, trips }
    }
}

impl Component for TripList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.sync(self.trips.len());

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" Trips ({}) ", self.trips.len()))
            .title_bottom(Line::from(" ↑↓ Select  Enter Open  Esc Back ").centered())
            .padding(Padding::horizontal(1));

        if self.trips.is_empty() {
            let empty = Paragraph::new("No trips.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self
            .trips
            .iter()
            .enumerate()
            .map(|(i, trip)| {
                let style = if i == self.state.selected {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(trip_line(trip, style))
            })
            .collect();

        frame.render_stateful_widget(
            List::new(items).block(block),
            area,
            &mut self.state.list_state,
        );
    }
}

fn trip_line(trip: &Trip, style: Style) -> Line<'static> {
    let status_style = match trip.status {
        TripStatus::Upcoming => style.fg(Color::Yellow),
        TripStatus::Ongoing => style.fg(Color::Green),
        TripStatus::Completed => style.fg(Color::DarkGray),
    };
    Line::from(vec![
        Span::styled(format!("{} {}  ", trip.display_date(), trip.display_time()), style),
        Span::styled(
            format!("{} → {}  ", trip.source_name, trip.destination_name),
            style,
        ),
        Span::styled(format!("{}  ", trip.driver_label()), style),
        Span::styled(format!("Rs {:.0}  ", trip.price), style),
        Span::styled(
            format!("{}/{} seats  ", trip.passenger_count, trip.total_seats),
            style,
        ),
        Span::styled(trip.status.label(), status_style),
    ])
}
