//! # Actions
//!
//! Everything that can happen in ridealong becomes an `Action`.
//! User submits the home screen? That's `Action::SubmitSearch(form)`.
//! Backend answers? That's `Action::SearchDone(result)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing the I/O the caller should
//! perform. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Remote commands never run straight from a key press: `Request` checks the
//! command's preconditions, asks for confirmation where needed, and only then
//! returns `Effect::Run`.

use log::{debug, info, warn};

use crate::backend::{ApiError, AuthToken, TripQuery};
use crate::core::lifecycle::{self, Command, CommandOutput, LifecycleError, RequestList};
use crate::core::search::{self, SearchError, SearchForm, SearchOutcome, Submission};
use crate::core::state::{Alert, App, Confirmation, Screen};
use crate::core::store::TripStore;
use crate::core::trip::{Mode, Trip, TripStatus, UserId};

/// Who a review is about. Reviews are written on an external screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewTarget {
    Passenger(UserId),
    Driver,
}

/// Sidebar menu entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    MyTrips,
    Settings,
    Messages,
    EditProfile,
    EditVehicle,
    Logout,
}

impl MenuItem {
    pub const ALL: [MenuItem; 6] = [
        MenuItem::MyTrips,
        MenuItem::Settings,
        MenuItem::Messages,
        MenuItem::EditProfile,
        MenuItem::EditVehicle,
        MenuItem::Logout,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::MyTrips => "My Trips",
            MenuItem::Settings => "Settings",
            MenuItem::Messages => "Messages",
            MenuItem::EditProfile => "Edit Profile",
            MenuItem::EditVehicle => "Edit Vehicle",
            MenuItem::Logout => "Logout",
        }
    }
}

#[derive(Debug)]
pub enum Action {
    Quit,
    SubmitSearch(SearchForm),
    SearchDone(Result<Vec<Trip>, ApiError>),
    /// Open the trip at this index of the current list.
    SelectTrip(usize),
    Back,
    /// User asked for a lifecycle command on the selected trip.
    Request(Command),
    Confirm,
    Cancel,
    /// A spawned command finished. `store` and `requests` are the task's copies.
    CommandDone {
        command: Command,
        store: TripStore,
        requests: RequestList,
        result: Result<CommandOutput, LifecycleError>,
    },
    DismissAlert,
    ToggleSidebar,
    Menu(MenuItem),
    MyTripsLoaded(Result<Vec<Trip>, ApiError>),
    ToggleMode,
    Review(ReviewTarget),
}

/// I/O the caller performs after `update()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    Search(AuthToken, TripQuery),
    /// Run a lifecycle command on a copy of the store and request list.
    Run(Command),
    LoadMyTrips(AuthToken),
    ClearCredentials,
}

const ACCESS_DENIED: (&str, &str) = (
    "Access Denied",
    "You should be a registered driver to enter this page.",
);

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Quit => Effect::Quit,

        Action::SubmitSearch(form) => {
            app.form = form;
            if app.is_loading {
                return busy(app);
            }
            match search::prepare(&app.form, &app.session) {
                Err(e) => {
                    app.show_alert(e.alert());
                    Effect::None
                }
                Ok(Submission::Draft(draft)) => {
                    app.status_message = "Continue with trip details".to_string();
                    app.screen = Screen::TripDraft(draft);
                    Effect::None
                }
                Ok(Submission::Search(token, query)) => {
                    app.is_loading = true;
                    app.status_message = "Searching trips...".to_string();
                    Effect::Search(token, query)
                }
            }
        }

        Action::SearchDone(result) => {
            app.is_loading = false;
            match result {
                Ok(results) => {
                    match search::accept_results(results, &app.session.user, &mut app.store) {
                        SearchOutcome::TripsFound(count) => {
                            app.status_message = format!("{count} trips found");
                            app.screen = Screen::TripList;
                        }
                        SearchOutcome::NoTripsAvailable | SearchOutcome::ComposeTrip(_) => {
                            app.status_message.clear();
                            app.show_alert(Alert::new(
                                "No Trips Available",
                                "There are no matching trips at the moment. \
                                 Please try again later.",
                            ));
                        }
                    }
                }
                Err(e) => {
                    warn!("Trip search failed: {}", e);
                    app.status_message.clear();
                    app.show_alert(SearchError::Api(e).alert());
                }
            }
            Effect::None
        }

        Action::SelectTrip(index) => {
            if app.is_loading {
                return busy(app);
            }
            if app.store.select_index(index).is_none() {
                return Effect::None;
            }
            app.screen = Screen::TripDetails;
            app.requests.clear();
            app.active_chat = None;
            app.last_report = None;
            if app.session.mode == Mode::Driver
                && lifecycle::check(Command::FetchRequests, &app.session, &app.store, &app.requests)
                    .is_ok()
            {
                return begin(app, Command::FetchRequests);
            }
            Effect::None
        }

        Action::Back => {
            if app.sidebar_open {
                app.sidebar_open = false;
                return Effect::None;
            }
            app.screen = match app.screen {
                Screen::TripDetails if !app.store.trips().is_empty() => Screen::TripList,
                _ => Screen::Home,
            };
            Effect::None
        }

        Action::Request(command) => {
            if app.is_loading {
                return busy(app);
            }
            if let Err(e) = lifecycle::check(command, &app.session, &app.store, &app.requests) {
                debug!("Refused {}: {}", command.label(), e);
                app.show_alert(e.alert(command));
                return Effect::None;
            }
            match command {
                Command::Start | Command::Complete | Command::Accept(_) | Command::Reject(_) => {
                    app.confirmation = Some(Confirmation::Command(command));
                    Effect::None
                }
                _ => begin(app, command),
            }
        }

        Action::Confirm => match app.confirmation.take() {
            Some(Confirmation::Command(command)) => {
                if app.is_loading {
                    return busy(app);
                }
                begin(app, command)
            }
            // A task in flight would write its store copy back after the reset
            Some(Confirmation::Logout) if app.is_loading => busy(app),
            Some(Confirmation::Logout) => {
                info!("Logging out {}", app.session.user.username);
                app.reset_for_logout();
                Effect::ClearCredentials
            }
            None => Effect::None,
        },

        Action::Cancel => {
            app.confirmation = None;
            Effect::None
        }

        Action::CommandDone {
            command,
            store,
            requests,
            result,
        } => {
            app.is_loading = false;
            match result {
                Ok(output) => {
                    app.store = store;
                    app.requests = requests;
                    finish(app, command, output);
                }
                Err(e) => {
                    if e.is_precondition() {
                        debug!("Command {} refused: {}", command.label(), e);
                    } else {
                        warn!("Command {} failed: {}", command.label(), e);
                    }
                    app.status_message.clear();
                    app.show_alert(e.alert(command));
                }
            }
            Effect::None
        }

        Action::DismissAlert => {
            app.alert = None;
            Effect::None
        }

        Action::ToggleSidebar => {
            app.sidebar_open = !app.sidebar_open;
            Effect::None
        }

        Action::Menu(item) => {
            app.sidebar_open = false;
            match item {
                MenuItem::MyTrips => {
                    if app.is_loading {
                        return busy(app);
                    }
                    match app.session.token.clone() {
                        Some(token) => {
                            app.is_loading = true;
                            app.status_message = "Loading your trips...".to_string();
                            Effect::LoadMyTrips(token)
                        }
                        None => {
                            app.show_alert(SearchError::MissingToken.alert());
                            Effect::None
                        }
                    }
                }
                MenuItem::EditVehicle if !app.session.user.is_driver => {
                    app.show_alert(Alert::new(ACCESS_DENIED.0, ACCESS_DENIED.1));
                    Effect::None
                }
                MenuItem::Settings
                | MenuItem::Messages
                | MenuItem::EditProfile
                | MenuItem::EditVehicle => {
                    app.status_message = format!("{} is not available here", item.label());
                    Effect::None
                }
                MenuItem::Logout if app.is_loading => busy(app),
                MenuItem::Logout => {
                    app.confirmation = Some(Confirmation::Logout);
                    Effect::None
                }
            }
        }

        Action::MyTripsLoaded(result) => {
            app.is_loading = false;
            match result {
                Ok(trips) => {
                    app.status_message = format!("{} trips", trips.len());
                    app.store.set_trips(trips);
                    app.screen = Screen::TripList;
                }
                Err(e) => {
                    warn!("Loading own trips failed: {}", e);
                    app.status_message.clear();
                    app.show_alert(Alert::new("Error", format!("Failed to load trips: {e}")));
                }
            }
            Effect::None
        }

        Action::ToggleMode => {
            if app.is_loading {
                return busy(app);
            }
            let next = match app.session.mode {
                Mode::Driver => Mode::Passenger,
                Mode::Passenger if app.session.user.is_driver => Mode::Driver,
                Mode::Passenger => {
                    app.show_alert(Alert::new(ACCESS_DENIED.0, ACCESS_DENIED.1));
                    return Effect::None;
                }
            };
            app.session.mode = next;
            app.screen = Screen::Home;
            app.requests.clear();
            app.status_message = format!("Mode: {}", next.label());
            Effect::None
        }

        Action::Review(target) => {
            let completed = app
                .store
                .selected()
                .is_some_and(|t| t.status == TripStatus::Completed);
            app.status_message = match target {
                _ if !completed => "Reviews open once the trip is completed".to_string(),
                ReviewTarget::Passenger(id) => {
                    format!("Review of passenger {id} is not available here")
                }
                ReviewTarget::Driver => "Review Driver is not available here".to_string(),
            };
            Effect::None
        }
    }
}

fn busy(app: &mut App) -> Effect {
    app.status_message = "Please wait...".to_string();
    Effect::None
}

fn begin(app: &mut App, command: Command) -> Effect {
    app.is_loading = true;
    app.status_message = format!("Working: {}...", command.label());
    Effect::Run(command)
}

fn finish(app: &mut App, command: Command, output: CommandOutput) {
    match output {
        CommandOutput::Done => {
            app.status_message = match command {
                Command::FetchRequests => format!("{} passenger requests", app.requests.len()),
                Command::Start => "Trip started".to_string(),
                Command::Accept(_) => "Request accepted".to_string(),
                Command::Reject(_) => "Request rejected".to_string(),
                other => format!("Done: {}", other.label()),
            };
        }
        CommandOutput::Completed(report) => {
            let failed = report.failures().count();
            app.status_message = "Trip completed".to_string();
            if failed > 0 {
                app.show_alert(Alert::new(
                    "Trip Completed",
                    format!(
                        "The trip has ended, but {failed} passenger chats could not be closed."
                    ),
                ));
            }
            app.last_report = Some(report);
        }
        CommandOutput::ChatReady(chat_id) => {
            app.status_message = format!("Chat ready ({chat_id})");
            app.active_chat = Some(chat_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatError;
    use crate::core::lifecycle::{CompletionReport, TeardownOutcome};
    use crate::core::trip::{RequestStatus, TripStatus};
    use crate::test_support::{
        complete_form, driver_session, join_request, passenger_session, test_app, trip,
    };

    fn app_on_details(status: TripStatus) -> App {
        let mut app = test_app();
        let mut t = trip(10);
        t.status = status;
        app.store.set_trips(vec![t.clone()]);
        app.store.select(t);
        app.screen = Screen::TripDetails;
        app
    }

    fn pending_request() -> RequestList {
        RequestList::from_fetched(vec![join_request(1, 101, RequestStatus::Pending)])
    }

    #[test]
    fn test_quit_returns_quit_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }

    #[test]
    fn test_passenger_submit_emits_search() {
        let mut app = App::new(passenger_session());
        let effect = update(&mut app, Action::SubmitSearch(complete_form()));
        assert!(matches!(effect, Effect::Search(_, ref q) if q.time == "9:5"));
        assert!(app.is_loading);
    }

    #[test]
    fn test_incomplete_form_alerts_without_effect() {
        let mut app = App::new(passenger_session());
        let mut form = complete_form();
        form.date = None;
        let effect = update(&mut app, Action::SubmitSearch(form));
        assert_eq!(effect, Effect::None);
        assert_eq!(app.alert.as_ref().map(|a| a.title.as_str()), Some("Missing information"));
        assert!(!app.is_loading);
    }

    #[test]
    fn test_driver_submit_opens_draft() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::SubmitSearch(complete_form())), Effect::None);
        assert!(matches!(app.screen, Screen::TripDraft(_)));
    }

    #[test]
    fn test_empty_search_alerts_and_keeps_store() {
        let mut app = App::new(passenger_session());
        app.store.set_trips(vec![trip(3)]);
        app.is_loading = true;
        update(&mut app, Action::SearchDone(Ok(vec![])));
        assert!(!app.is_loading);
        assert_eq!(app.alert.as_ref().map(|a| a.title.as_str()), Some("No Trips Available"));
        assert_eq!(app.store.trips().len(), 1);
        assert_eq!(app.screen, Screen::Home);
    }

    #[test]
    fn test_search_results_open_trip_list() {
        let mut app = App::new(passenger_session());
        update(&mut app, Action::SearchDone(Ok(vec![trip(1), trip(2)])));
        assert_eq!(app.screen, Screen::TripList);
        assert_eq!(app.store.trips().len(), 2);
    }

    #[test]
    fn test_start_asks_for_confirmation_first() {
        let mut app = app_on_details(TripStatus::Upcoming);
        assert_eq!(update(&mut app, Action::Request(Command::Start)), Effect::None);
        assert_eq!(app.confirmation, Some(Confirmation::Command(Command::Start)));
        assert_eq!(update(&mut app, Action::Confirm), Effect::Run(Command::Start));
        assert!(app.is_loading);
        assert!(app.confirmation.is_none());
    }

    #[test]
    fn test_cancel_discards_confirmation() {
        let mut app = app_on_details(TripStatus::Ongoing);
        update(&mut app, Action::Request(Command::Complete));
        update(&mut app, Action::Cancel);
        assert!(app.confirmation.is_none());
        assert_eq!(update(&mut app, Action::Confirm), Effect::None);
        assert!(!app.is_loading);
    }

    #[test]
    fn test_guard_failure_alerts_instead_of_confirming() {
        let mut app = app_on_details(TripStatus::Completed);
        assert_eq!(update(&mut app, Action::Request(Command::Start)), Effect::None);
        assert!(app.confirmation.is_none());
        assert!(app.alert.is_some());
    }

    #[test]
    fn test_commands_refused_while_loading() {
        let mut app = app_on_details(TripStatus::Upcoming);
        app.requests = pending_request();
        app.is_loading = true;
        assert_eq!(update(&mut app, Action::Request(Command::Accept(1))), Effect::None);
        assert_eq!(app.status_message, "Please wait...");
    }

    #[test]
    fn test_accept_asks_for_confirmation_first() {
        let mut app = app_on_details(TripStatus::Upcoming);
        app.requests = pending_request();
        assert_eq!(update(&mut app, Action::Request(Command::Accept(1))), Effect::None);
        assert_eq!(app.confirmation, Some(Confirmation::Command(Command::Accept(1))));
        assert_eq!(
            Confirmation::Command(Command::Accept(1)).prompt(),
            ("Accept Request", "Are you sure you want to accept this request?")
        );
        assert_eq!(update(&mut app, Action::Confirm), Effect::Run(Command::Accept(1)));
    }

    #[test]
    fn test_command_done_overwrites_local_copies() {
        let mut app = app_on_details(TripStatus::Upcoming);
        app.is_loading = true;
        let mut store = app.store.clone();
        let mut t = trip(10);
        t.status = TripStatus::Ongoing;
        store.select(t);
        update(
            &mut app,
            Action::CommandDone {
                command: Command::Start,
                store,
                requests: RequestList::new(),
                result: Ok(CommandOutput::Done),
            },
        );
        assert!(!app.is_loading);
        assert_eq!(app.store.selected().unwrap().status, TripStatus::Ongoing);
        assert_eq!(app.status_message, "Trip started");
    }

    #[test]
    fn test_command_failure_keeps_state_and_alerts() {
        let mut app = app_on_details(TripStatus::Upcoming);
        let before = app.store.clone();
        update(
            &mut app,
            Action::CommandDone {
                command: Command::Start,
                store: TripStore::new(),
                requests: RequestList::new(),
                result: Err(LifecycleError::Api(ApiError::Network("down".into()))),
            },
        );
        assert_eq!(app.store, before);
        assert_eq!(
            app.alert.as_ref().map(|a| a.message.as_str()),
            Some("Could not start trip. Please try again.")
        );
    }

    #[test]
    fn test_partial_teardown_failure_is_surfaced() {
        let mut app = app_on_details(TripStatus::Ongoing);
        let report = CompletionReport {
            teardowns: vec![
                TeardownOutcome { passenger_id: 1, result: Ok("c1".into()) },
                TeardownOutcome {
                    passenger_id: 2,
                    result: Err(ChatError::Network("x".into())),
                },
            ],
        };
        let store = app.store.clone();
        update(
            &mut app,
            Action::CommandDone {
                command: Command::Complete,
                store,
                requests: RequestList::new(),
                result: Ok(CommandOutput::Completed(report)),
            },
        );
        assert_eq!(app.status_message, "Trip completed");
        assert!(app.alert.as_ref().unwrap().message.contains("1 passenger chats"));
        assert_eq!(app.last_report.as_ref().unwrap().teardowns.len(), 2);
    }

    #[test]
    fn test_driver_selecting_trip_fetches_requests() {
        let mut app = test_app();
        app.store.set_trips(vec![trip(1), trip(2)]);
        app.screen = Screen::TripList;
        let effect = update(&mut app, Action::SelectTrip(1));
        assert_eq!(effect, Effect::Run(Command::FetchRequests));
        assert_eq!(app.store.selected_id(), Some(2));
        assert_eq!(app.screen, Screen::TripDetails);
    }

    #[test]
    fn test_passenger_selecting_trip_makes_no_call() {
        let mut app = App::new(passenger_session());
        app.store.set_trips(vec![trip(1)]);
        assert_eq!(update(&mut app, Action::SelectTrip(0)), Effect::None);
        assert_eq!(app.screen, Screen::TripDetails);
    }

    #[test]
    fn test_back_walks_up_the_screens() {
        let mut app = app_on_details(TripStatus::Upcoming);
        update(&mut app, Action::Back);
        assert_eq!(app.screen, Screen::TripList);
        update(&mut app, Action::Back);
        assert_eq!(app.screen, Screen::Home);
    }

    #[test]
    fn test_logout_flow_clears_state() {
        let mut app = app_on_details(TripStatus::Upcoming);
        update(&mut app, Action::ToggleSidebar);
        assert_eq!(update(&mut app, Action::Menu(MenuItem::Logout)), Effect::None);
        assert_eq!(app.confirmation, Some(Confirmation::Logout));
        assert_eq!(update(&mut app, Action::Confirm), Effect::ClearCredentials);
        assert_eq!(app.session.mode, Mode::Passenger);
        assert!(app.store.trips().is_empty());
        assert!(app.store.selected().is_none());
        assert_eq!(app.screen, Screen::Home);
    }

    #[test]
    fn test_logout_waits_for_running_command() {
        let mut app = app_on_details(TripStatus::Upcoming);
        let in_flight = app.store.clone();
        app.is_loading = true;

        assert_eq!(update(&mut app, Action::Menu(MenuItem::Logout)), Effect::None);
        assert!(app.confirmation.is_none());
        assert_eq!(app.status_message, "Please wait...");

        // A confirmation already on screen is refused the same way
        app.confirmation = Some(Confirmation::Logout);
        assert_eq!(update(&mut app, Action::Confirm), Effect::None);
        assert!(app.session.token.is_some());

        update(
            &mut app,
            Action::CommandDone {
                command: Command::FetchRequests,
                store: in_flight,
                requests: RequestList::new(),
                result: Ok(CommandOutput::Done),
            },
        );
        update(&mut app, Action::Menu(MenuItem::Logout));
        assert_eq!(update(&mut app, Action::Confirm), Effect::ClearCredentials);
        assert!(app.store.selected().is_none());
        assert!(app.store.trips().is_empty());
        assert!(app.session.token.is_none());
    }

    #[test]
    fn test_review_only_after_completion() {
        let mut app = app_on_details(TripStatus::Ongoing);
        update(&mut app, Action::Review(ReviewTarget::Driver));
        assert_eq!(app.status_message, "Reviews open once the trip is completed");

        let mut app = app_on_details(TripStatus::Completed);
        assert_eq!(
            update(&mut app, Action::Review(ReviewTarget::Passenger(101))),
            Effect::None
        );
        assert_eq!(app.status_message, "Review of passenger 101 is not available here");
        update(&mut app, Action::Review(ReviewTarget::Driver));
        assert_eq!(app.status_message, "Review Driver is not available here");
    }

    #[test]
    fn test_edit_vehicle_requires_registered_driver() {
        let mut app = App::new(passenger_session());
        update(&mut app, Action::Menu(MenuItem::EditVehicle));
        assert_eq!(app.alert.as_ref().map(|a| a.title.as_str()), Some("Access Denied"));

        let mut app = App::new(driver_session());
        update(&mut app, Action::Menu(MenuItem::EditVehicle));
        assert!(app.alert.is_none());
    }

    #[test]
    fn test_my_trips_needs_token() {
        let mut session = passenger_session();
        session.token = None;
        let mut app = App::new(session);
        assert_eq!(update(&mut app, Action::Menu(MenuItem::MyTrips)), Effect::None);
        assert!(app.alert.is_some());

        let mut app = test_app();
        assert!(matches!(
            update(&mut app, Action::Menu(MenuItem::MyTrips)),
            Effect::LoadMyTrips(_)
        ));
        update(&mut app, Action::MyTripsLoaded(Ok(vec![trip(5)])));
        assert_eq!(app.screen, Screen::TripList);
        assert_eq!(app.store.trips()[0].trip_id, 5);
    }

    #[test]
    fn test_toggle_mode_requires_registered_driver() {
        let mut app = App::new(passenger_session());
        update(&mut app, Action::ToggleMode);
        assert_eq!(app.session.mode, Mode::Passenger);
        assert!(app.alert.is_some());

        let mut app = test_app();
        update(&mut app, Action::ToggleMode);
        assert_eq!(app.session.mode, Mode::Passenger);
        update(&mut app, Action::ToggleMode);
        assert_eq!(app.session.mode, Mode::Driver);
    }
}
