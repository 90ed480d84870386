//! # Sidebar Component
//!
//! Left-hand navigation panel, toggled with Ctrl+B and dismissed with Esc.
//! Shows who is signed in and the menu entries.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding};

use crate::core::action::MenuItem;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

pub const SIDEBAR_WIDTH: u16 = 28;

#[derive(Debug, Default)]
pub struct SidebarState {
    pub selected: usize,
    pub list_state: ListState,
}

pub enum SidebarEvent {
    Select(MenuItem),
    Dismiss,
}

impl SidebarState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventHandler for SidebarState {
    type Event = SidebarEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<SidebarEvent> {
        match event {
            TuiEvent::Escape | TuiEvent::ToggleSidebar => Some(SidebarEvent::Dismiss),
            TuiEvent::CursorUp => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            TuiEvent::CursorDown => {
                self.selected = (self.selected + 1).min(MenuItem::ALL.len() - 1);
                None
            }
            TuiEvent::Submit => Some(SidebarEvent::Select(MenuItem::ALL[self.selected])),
            _ => None,
        }
    }
}

pub struct Sidebar<'a> {
    pub state: &'a mut SidebarState,
    pub username: &'a str,
    pub is_driver: bool,
}

impl Component for Sidebar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [panel, _] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)]).areas(area);
        frame.render_widget(Clear, panel);

        let role = if self.is_driver { "Registered driver" } else { "Passenger" };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(Line::from(vec![
                Span::styled(
                    format!(" {} ", self.username),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]))
            .title_bottom(Line::from(format!(" {role} ")).centered())
            .padding(Padding::uniform(1));

        let items: Vec<ListItem> = MenuItem::ALL
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let style = if i == self.state.selected {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else if *item == MenuItem::Logout {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Span::styled(item.label(), style))
            })
            .collect();

        self.state.list_state.select(Some(self.state.selected));
        frame.render_stateful_widget(
            List::new(items).block(block),
            panel,
            &mut self.state.list_state,
        );
    }
}
