//! # Trip Details Component
//!
//! One trip's summary and, for drivers, its join requests. Keys map to
//! lifecycle commands; the core decides whether they are allowed.
//!
//! Driver: `s` start, `c` complete, `a` accept, `r` reject, `m` message
//! the selected passenger, `f` refresh requests, `v` review the selected
//! passenger.
//! Passenger: `m` message the driver, `v` review the driver.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph};

use crate::core::action::ReviewTarget;
use crate::core::lifecycle::{Command, CompletionReport, RequestList};
use crate::core::trip::{Mode, RequestId, RequestStatus, Trip, UserId};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Default)]
pub struct TripDetailsState {
    pub selected: usize,
    pub list_state: ListState,
    /// (request id, passenger id) per row, from the last render.
    rows: Vec<(RequestId, UserId)>,
    mode: Mode,
}

pub enum TripDetailsEvent {
    Command(Command),
    Review(ReviewTarget),
    Back,
}

impl TripDetailsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sync(&mut self, requests: &RequestList, mode: Mode) {
        self.mode = mode;
        self.rows = requests
            .iter()
            .map(|r| (r.request_id, r.passenger.user_id))
            .collect();
        if self.rows.is_empty() {
            self.selected = 0;
            self.list_state.select(None);
        } else {
            self.selected = self.selected.min(self.rows.len() - 1);
            self.list_state.select(Some(self.selected));
        }
    }

    fn selected_row(&self) -> Option<(RequestId, UserId)> {
        self.rows.get(self.selected).copied()
    }
}

impl EventHandler for TripDetailsState {
    type Event = TripDetailsEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<TripDetailsEvent> {
        let command = match (self.mode, event) {
            (_, TuiEvent::Escape) => return Some(TripDetailsEvent::Back),
            (_, TuiEvent::CursorUp) => {
                self.selected = self.selected.saturating_sub(1);
                return None;
            }
            (_, TuiEvent::CursorDown) => {
                if !self.rows.is_empty() {
                    self.selected = (self.selected + 1).min(self.rows.len() - 1);
                }
                return None;
            }
            (Mode::Passenger, TuiEvent::InputChar('v')) => {
                return Some(TripDetailsEvent::Review(ReviewTarget::Driver));
            }
            (Mode::Driver, TuiEvent::InputChar('v')) => {
                let passenger = self.selected_row()?.1;
                return Some(TripDetailsEvent::Review(ReviewTarget::Passenger(passenger)));
            }
            (Mode::Passenger, TuiEvent::InputChar('m')) => Command::ContactDriver,
            (Mode::Driver, TuiEvent::InputChar('s')) => Command::Start,
            (Mode::Driver, TuiEvent::InputChar('c')) => Command::Complete,
            (Mode::Driver, TuiEvent::InputChar('f')) => Command::FetchRequests,
            (Mode::Driver, TuiEvent::InputChar('a')) => Command::Accept(self.selected_row()?.0),
            (Mode::Driver, TuiEvent::InputChar('r')) => Command::Reject(self.selected_row()?.0),
            (Mode::Driver, TuiEvent::InputChar('m')) => {
                Command::ContactPassenger(self.selected_row()?.1)
            }
            _ => return None,
        };
        Some(TripDetailsEvent::Command(command))
    }
}

pub struct TripDetails<'a> {
    pub state: &'a mut TripDetailsState,
    pub trip: &'a Trip,
    pub requests: &'a RequestList,
    pub mode: Mode,
    pub active_chat: Option<&'a str>,
    pub last_report: Option<&'a CompletionReport>,
}

impl Component for TripDetails<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.sync(self.requests, self.mode);

        let [summary_area, requests_area] = match self.mode {
            Mode::Driver => {
                Layout::vertical([Constraint::Length(9), Constraint::Min(3)]).areas(area)
            }
            Mode::Passenger => {
                Layout::vertical([Constraint::Min(9), Constraint::Length(0)]).areas(area)
            }
        };

        let label = Style::default().fg(Color::DarkGray);
        let trip = self.trip;
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Route    ", label),
                Span::raw(format!("{} → {}", trip.source_name, trip.destination_name)),
            ]),
            Line::from(vec![
                Span::styled("When     ", label),
                Span::raw(format!("{} at {}", trip.display_date(), trip.display_time())),
            ]),
            Line::from(vec![
                Span::styled("Driver   ", label),
                Span::raw(trip.driver_label().to_string()),
            ]),
            Line::from(vec![
                Span::styled("Seats    ", label),
                Span::raw(format!(
                    "{} of {} taken, Rs {:.0}",
                    trip.passenger_count, trip.total_seats, trip.price
                )),
            ]),
            Line::from(vec![
                Span::styled("Status   ", label),
                Span::styled(
                    trip.status.label(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
        ];
        if let Some(chat) = self.active_chat {
            lines.push(Line::from(vec![
                Span::styled("Chat     ", label),
                Span::raw(chat.to_string()),
            ]));
        }
        if let Some(report) = self.last_report {
            let failed = report.failures().count();
            lines.push(Line::from(vec![
                Span::styled("Chats    ", label),
                Span::raw(format!(
                    "{} closed, {} failed",
                    report.teardowns.len() - failed,
                    failed
                )),
            ]));
        }

        let help = match self.mode {
            Mode::Driver => {
                " s Start  c Complete  a Accept  r Reject  m Chat  v Review  f Refresh  Esc Back "
            }
            Mode::Passenger => " m Message driver  v Review driver  Esc Back ",
        };
        let summary = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(" Trip #{} ", trip.trip_id))
                .title_bottom(Line::from(help).centered())
                .padding(Padding::horizontal(1)),
        );
        frame.render_widget(summary, summary_area);

        if self.mode == Mode::Driver {
            self.render_requests(frame, requests_area);
        }
    }
}

impl TripDetails<'_> {
    fn render_requests(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" Passenger requests ({}) ", self.requests.len()))
            .padding(Padding::horizontal(1));

        if self.requests.is_empty() {
            frame.render_widget(
                Paragraph::new("No requests yet.")
                    .style(Style::default().fg(Color::DarkGray))
                    .block(block),
                area,
            );
            return;
        }

        let items: Vec<ListItem> = self
            .requests
            .iter()
            .enumerate()
            .map(|(i, request)| {
                let (status, color) = match request.status {
                    RequestStatus::Pending => ("pending", Color::Yellow),
                    RequestStatus::Accepted => ("accepted", Color::Green),
                    RequestStatus::Rejected => ("rejected", Color::Red),
                };
                let base = if i == self.state.selected {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<20}", request.passenger.username), base),
                    Span::styled(status, base.fg(color)),
                ]))
            })
            .collect();

        frame.render_stateful_widget(
            List::new(items).block(block),
            area,
            &mut self.state.list_state,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{join_request, trip};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn requests() -> RequestList {
        RequestList::from_fetched(vec![
            join_request(1, 101, RequestStatus::Pending),
            join_request(2, 102, RequestStatus::Accepted),
        ])
    }

    fn command_for(state: &mut TripDetailsState, c: char) -> Option<Command> {
        match state.handle_event(&TuiEvent::InputChar(c)) {
            Some(TripDetailsEvent::Command(command)) => Some(command),
            _ => None,
        }
    }

    #[test]
    fn test_driver_keys_target_selected_request() {
        let mut state = TripDetailsState::new();
        state.sync(&requests(), Mode::Driver);
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(command_for(&mut state, 'a'), Some(Command::Accept(2)));
        assert_eq!(command_for(&mut state, 'm'), Some(Command::ContactPassenger(102)));
        assert_eq!(command_for(&mut state, 's'), Some(Command::Start));
    }

    #[test]
    fn test_request_keys_need_a_request() {
        let mut state = TripDetailsState::new();
        state.sync(&RequestList::new(), Mode::Driver);
        assert_eq!(command_for(&mut state, 'a'), None);
        assert_eq!(command_for(&mut state, 'c'), Some(Command::Complete));
    }

    #[test]
    fn test_review_key_targets_row_or_driver() {
        let mut state = TripDetailsState::new();
        state.sync(&requests(), Mode::Driver);
        assert!(matches!(
            state.handle_event(&TuiEvent::InputChar('v')),
            Some(TripDetailsEvent::Review(ReviewTarget::Passenger(101)))
        ));

        state.sync(&requests(), Mode::Passenger);
        assert!(matches!(
            state.handle_event(&TuiEvent::InputChar('v')),
            Some(TripDetailsEvent::Review(ReviewTarget::Driver))
        ));
    }

    #[test]
    fn test_passenger_only_contacts_driver() {
        let mut state = TripDetailsState::new();
        state.sync(&requests(), Mode::Passenger);
        assert_eq!(command_for(&mut state, 's'), None);
        assert_eq!(command_for(&mut state, 'm'), Some(Command::ContactDriver));
    }

    #[test]
    fn test_render_driver_view_lists_requests() {
        let backend = TestBackend::new(90, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let t = trip(7);
        let list = requests();
        let mut state = TripDetailsState::new();
        terminal
            .draw(|f| {
                TripDetails {
                    state: &mut state,
                    trip: &t,
                    requests: &list,
                    mode: Mode::Driver,
                    active_chat: None,
                    last_report: None,
                }
                .render(f, f.area())
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Trip #7"));
        assert!(text.contains("Passenger requests (2)"));
        assert!(text.contains("rider101"));
        assert!(text.contains("accepted"));
    }
}
