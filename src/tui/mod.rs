//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates keyboard events into core::Action values, and performs the
//! `Effect`s the reducer returns.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Background work
//!
//! Every remote call runs in its own tokio task and reports back through an
//! `mpsc` channel as an `Action`. A command task works on clones of the trip
//! store and request list; the reducer replaces its copies with the task's
//! when the command succeeds.
//!
//! ## Redraw Strategy
//!
//! Draws every ~80ms while a call is in flight (spinner), otherwise sleeps
//! up to 500ms and only redraws on events.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;

use crate::backend::{AuthToken, HttpRideApi, RideApi, TripQuery};
use crate::chat::{ChatService, HttpChatService, InMemoryChats};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::lifecycle::{Command, RequestList, TripController};
use crate::core::session::{self, CredentialStore, Session};
use crate::core::state::{App, Screen};
use crate::core::store::TripStore;
use crate::tui::component::EventHandler;
use crate::tui::components::dialog::{self, DialogEvent};
use crate::tui::components::search_form::SearchFormEvent;
use crate::tui::components::sidebar::SidebarEvent;
use crate::tui::components::trip_details::TripDetailsEvent;
use crate::tui::components::trip_list::TripListEvent;
use crate::tui::components::{SearchFormState, SidebarState, TripDetailsState, TripListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
#[derive(Default)]
pub struct TuiState {
    pub search_form: SearchFormState,
    pub trip_list: TripListState,
    pub trip_details: TripDetailsState,
    pub sidebar: SidebarState,
}

impl TuiState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Remote collaborators shared with background tasks.
pub struct Services {
    pub api: Arc<dyn RideApi>,
    pub controller: Arc<TripController>,
    pub credentials: Option<CredentialStore>,
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableBracketedPaste)?;
        info!("Terminal modes enabled (bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableBracketedPaste);
    }
}

/// Build the chat backend: REST when a chat URL is configured, else in-process.
pub fn build_chat_service(config: &ResolvedConfig) -> Arc<dyn ChatService> {
    match &config.chat_base_url {
        Some(url) => Arc::new(HttpChatService::new(url.clone(), config.chat_api_key.clone())),
        None => {
            info!("No chat backend configured, using in-memory chats");
            Arc::new(InMemoryChats::new())
        }
    }
}

pub fn build_services(config: &ResolvedConfig) -> Services {
    let api: Arc<dyn RideApi> = Arc::new(HttpRideApi::new(
        config.api_base_url.clone(),
        Some(config.platform.clone()),
    ));
    let chats = build_chat_service(config);
    info!("Using {} chat backend", chats.name());
    Services {
        controller: Arc::new(TripController::new(api.clone(), chats)),
        api,
        credentials: CredentialStore::default_location(),
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let services = build_services(&config);
    let session = session::restore(
        services.credentials.as_ref(),
        config.token.clone(),
        config.mode,
    );
    let mut app = App::new(session);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let start_time = std::time::Instant::now();
    let mut needs_redraw = true; // Force first frame

    'main: loop {
        if app.is_loading {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if app.is_loading {
            std::time::Duration::from_millis(80)
        } else {
            std::time::Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let Some(action) = route_event(&event, &app, &mut tui) else {
                continue;
            };
            if perform(update(&mut app, action), &app, &mut tui, &services, &tx) {
                break 'main;
            }
        }

        // Handle background task results
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if perform(update(&mut app, action), &app, &mut tui, &services, &tx) {
                break 'main;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

/// Maps a terminal event to an action for whatever currently has focus.
/// Topmost first: alert, confirmation, sidebar, then the screen.
fn route_event(event: &TuiEvent, app: &App, tui: &mut TuiState) -> Option<Action> {
    match event {
        TuiEvent::Resize => return None,
        TuiEvent::ForceQuit => return Some(Action::Quit),
        _ => {}
    }

    if app.alert.is_some() {
        return dialog::dismisses_alert(event).then_some(Action::DismissAlert);
    }

    if app.confirmation.is_some() {
        return dialog::confirmation_event(event).map(|e| match e {
            DialogEvent::Confirm => Action::Confirm,
            DialogEvent::Cancel => Action::Cancel,
        });
    }

    if app.sidebar_open {
        return tui.sidebar.handle_event(event).map(|e| match e {
            SidebarEvent::Select(item) => Action::Menu(item),
            SidebarEvent::Dismiss => Action::ToggleSidebar,
        });
    }

    match event {
        TuiEvent::ToggleSidebar => return Some(Action::ToggleSidebar),
        TuiEvent::ToggleMode => return Some(Action::ToggleMode),
        _ => {}
    }

    match app.screen {
        Screen::Home => tui.search_form.handle_event(event).map(|e| match e {
            SearchFormEvent::Submit(form) => Action::SubmitSearch(form),
        }),
        Screen::TripList => tui.trip_list.handle_event(event).map(|e| match e {
            TripListEvent::Open(index) => Action::SelectTrip(index),
            TripListEvent::Back => Action::Back,
        }),
        Screen::TripDetails => tui.trip_details.handle_event(event).map(|e| match e {
            TripDetailsEvent::Command(command) => Action::Request(command),
            TripDetailsEvent::Review(target) => Action::Review(target),
            TripDetailsEvent::Back => Action::Back,
        }),
        Screen::TripDraft(_) => matches!(event, TuiEvent::Escape).then_some(Action::Back),
    }
}

/// Carries out an effect. Returns true when the app should exit.
fn perform(
    effect: Effect,
    app: &App,
    tui: &mut TuiState,
    services: &Services,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match effect {
        Effect::None => {}
        Effect::Quit => return true,
        Effect::Search(token, query) => {
            spawn_search(services.api.clone(), token, query, tx.clone())
        }
        Effect::Run(command) => spawn_command(
            services.controller.clone(),
            command,
            app.session.clone(),
            app.store.clone(),
            app.requests.clone(),
            tx.clone(),
        ),
        Effect::LoadMyTrips(token) => spawn_my_trips(services.api.clone(), token, tx.clone()),
        Effect::ClearCredentials => {
            tui.search_form.clear();
            if let Some(store) = &services.credentials
                && let Err(e) = store.clear()
            {
                warn!("Could not remove stored credentials: {}", e);
            }
        }
    }
    false
}

fn spawn_search(
    api: Arc<dyn RideApi>,
    token: AuthToken,
    query: TripQuery,
    tx: mpsc::Sender<Action>,
) {
    info!("Spawning trip search for {}", query.date);
    tokio::spawn(async move {
        let result = api.search_trips(&token, &query).await;
        if tx.send(Action::SearchDone(result)).is_err() {
            warn!("Failed to send search result: receiver dropped");
        }
    });
}

fn spawn_my_trips(api: Arc<dyn RideApi>, token: AuthToken, tx: mpsc::Sender<Action>) {
    info!("Spawning upcoming trips fetch");
    tokio::spawn(async move {
        let result = api.upcoming_trips(&token).await;
        if tx.send(Action::MyTripsLoaded(result)).is_err() {
            warn!("Failed to send trips: receiver dropped");
        }
    });
}

fn spawn_command(
    controller: Arc<TripController>,
    command: Command,
    session: Session,
    mut store: TripStore,
    mut requests: RequestList,
    tx: mpsc::Sender<Action>,
) {
    info!("Spawning command: {}", command.label());
    tokio::spawn(async move {
        let result = controller
            .execute(command, &session, &mut store, &mut requests)
            .await;
        let done = Action::CommandDone {
            command,
            store,
            requests,
            result,
        };
        if tx.send(done).is_err() {
            warn!("Failed to send result of {}: receiver dropped", command.label());
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::MenuItem;
    use crate::core::state::{Alert, Confirmation};
    use crate::test_support::{passenger_session, test_app, trip};

    #[test]
    fn test_alert_swallows_other_keys() {
        let mut app = test_app();
        app.alert = Some(Alert::new("Error", "x"));
        let mut tui = TuiState::new();
        assert!(route_event(&TuiEvent::InputChar('s'), &app, &mut tui).is_none());
        assert!(matches!(
            route_event(&TuiEvent::Submit, &app, &mut tui),
            Some(Action::DismissAlert)
        ));
    }

    #[test]
    fn test_confirmation_routes_yes_and_no() {
        let mut app = test_app();
        app.confirmation = Some(Confirmation::Logout);
        let mut tui = TuiState::new();
        assert!(matches!(
            route_event(&TuiEvent::InputChar('y'), &app, &mut tui),
            Some(Action::Confirm)
        ));
        assert!(matches!(
            route_event(&TuiEvent::Escape, &app, &mut tui),
            Some(Action::Cancel)
        ));
    }

    #[test]
    fn test_sidebar_gets_focus_when_open() {
        let mut app = test_app();
        app.sidebar_open = true;
        let mut tui = TuiState::new();
        assert!(matches!(
            route_event(&TuiEvent::Submit, &app, &mut tui),
            Some(Action::Menu(MenuItem::MyTrips))
        ));
    }

    #[test]
    fn test_details_keys_become_requests() {
        let mut app = App::new(passenger_session());
        app.store.select(trip(1));
        app.screen = Screen::TripDetails;
        let mut tui = TuiState::new();
        tui.trip_details.sync(&app.requests, app.session.mode);
        assert!(matches!(
            route_event(&TuiEvent::InputChar('m'), &app, &mut tui),
            Some(Action::Request(Command::ContactDriver))
        ));
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let mut app = test_app();
        app.alert = Some(Alert::new("Error", "x"));
        let mut tui = TuiState::new();
        assert!(matches!(
            route_event(&TuiEvent::ForceQuit, &app, &mut tui),
            Some(Action::Quit)
        ));
    }
}
