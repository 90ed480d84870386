use crate::core::search::TripDraft;
use crate::core::state::{App, Screen};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    Dialog, SearchFormView, Sidebar, TitleBar, TripDetails, TripList,
};

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let [title_area, main_area] = Layout::vertical([Length(1), Min(0)]).areas(frame.area());

    TitleBar {
        mode_label: app.session.mode.label(),
        username: &app.session.user.username,
        status_message: &app.status_message,
        spinner_frame: app.is_loading.then_some(spinner_frame),
    }
    .render(frame, title_area);

    match &app.screen {
        Screen::Home => {
            SearchFormView::new(&tui.search_form, app.session.mode).render(frame, main_area)
        }
        Screen::TripList => {
            TripList::new(&mut tui.trip_list, app.store.trips()).render(frame, main_area)
        }
        Screen::TripDetails => match app.store.selected() {
            Some(trip) => TripDetails {
                state: &mut tui.trip_details,
                trip,
                requests: &app.requests,
                mode: app.session.mode,
                active_chat: app.active_chat.as_deref(),
                last_report: app.last_report.as_ref(),
            }
            .render(frame, main_area),
            None => draw_message(frame, main_area, "No trip selected."),
        },
        Screen::TripDraft(draft) => draw_draft(frame, main_area, draft),
    }

    if app.sidebar_open {
        Sidebar {
            state: &mut tui.sidebar,
            username: &app.session.user.username,
            is_driver: app.session.user.is_driver,
        }
        .render(frame, main_area);
    }

    if let Some(confirmation) = &app.confirmation {
        let (title, message) = confirmation.prompt();
        Dialog {
            title,
            message,
            confirm: true,
        }
        .render(frame, frame.area());
    }

    // Alerts sit above everything else
    if let Some(alert) = &app.alert {
        Dialog {
            title: &alert.title,
            message: &alert.message,
            confirm: false,
        }
        .render(frame, frame.area());
    }
}

fn draw_draft(frame: &mut Frame, area: Rect, draft: &TripDraft) {
    let place = |p: &crate::core::trip::Place| {
        p.name
            .clone()
            .unwrap_or_else(|| format!("{:.4},{:.4}", p.latitude, p.longitude))
    };
    let lines = vec![
        Line::from(format!("From  {}", place(&draft.start))),
        Line::from(format!("To    {}", place(&draft.destination))),
        Line::from(format!(
            "On    {} at {}",
            draft.date.format("%Y-%m-%d"),
            draft.time.format("%H:%M")
        )),
        Line::from(""),
        Line::from("Vehicle, seats and price are entered in the trip form."),
    ];
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" New trip ")
            .title_bottom(Line::from(" Esc Back ").centered()),
    );
    frame.render_widget(paragraph, area);
}

fn draw_message(frame: &mut Frame, area: Rect, message: &str) {
    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::bordered());
    frame.render_widget(paragraph, area);
}
