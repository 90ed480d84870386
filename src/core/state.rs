//! # Application State
//!
//! Core business state for ridealong. Domain logic only, no TUI-specific
//! types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── session: Session               // token, user, mode
//! ├── screen: Screen                 // which view is showing
//! ├── form: SearchForm               // home screen inputs
//! ├── store: TripStore               // search results + selected trip
//! ├── requests: RequestList          // selected trip's join requests
//! ├── status_message: String         // status bar text
//! ├── is_loading: bool               // a remote command is in flight
//! ├── alert: Option<Alert>           // blocking message for the user
//! ├── confirmation: Option<...>      // question awaiting yes/no
//! ├── sidebar_open: bool
//! ├── last_report: Option<...>       // outcome of the last completion
//! └── active_chat: Option<ChatId>    // chat opened by the last contact
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::chat::ChatId;
use crate::core::lifecycle::{Command, CompletionReport, RequestList};
use crate::core::search::{SearchForm, TripDraft};
use crate::core::session::Session;
use crate::core::store::TripStore;

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Home,
    /// Search results or the user's own trips.
    TripList,
    TripDetails,
    /// Driver path: inputs carried forward to trip entry.
    TripDraft(TripDraft),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

impl From<(&'static str, String)> for Alert {
    fn from((title, message): (&'static str, String)) -> Self {
        Self::new(title, message)
    }
}

/// A yes/no question shown before an irreversible step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Command(Command),
    Logout,
}

impl Confirmation {
    pub fn prompt(&self) -> (&'static str, &'static str) {
        match self {
            Confirmation::Command(Command::Start) => {
                ("Start Trip", "Are you sure you want to start this trip?")
            }
            Confirmation::Command(Command::Complete) => {
                ("Stop Trip", "Are you sure you want to end this trip?")
            }
            Confirmation::Command(Command::Accept(_)) => {
                ("Accept Request", "Are you sure you want to accept this request?")
            }
            Confirmation::Command(Command::Reject(_)) => {
                ("Reject Request", "Are you sure you want to reject this request?")
            }
            Confirmation::Command(_) => ("Confirm", "Are you sure?"),
            Confirmation::Logout => ("Logout", "Are you sure you want to log out?"),
        }
    }
}

pub struct App {
    pub session: Session,
    pub screen: Screen,
    pub form: SearchForm,
    pub store: TripStore,
    pub requests: RequestList,
    pub status_message: String,
    pub is_loading: bool,
    pub alert: Option<Alert>,
    pub confirmation: Option<Confirmation>,
    pub sidebar_open: bool,
    pub last_report: Option<CompletionReport>,
    pub active_chat: Option<ChatId>,
}

impl App {
    pub fn new(session: Session) -> Self {
        let status_message = format!("Welcome, {}!", session.user.username);
        Self {
            session,
            screen: Screen::Home,
            form: SearchForm::default(),
            store: TripStore::new(),
            requests: RequestList::new(),
            status_message,
            is_loading: false,
            alert: None,
            confirmation: None,
            sidebar_open: false,
            last_report: None,
            active_chat: None,
        }
    }

    pub fn show_alert(&mut self, alert: impl Into<Alert>) {
        self.alert = Some(alert.into());
    }

    /// Back to a signed-out passenger on an empty home screen.
    pub fn reset_for_logout(&mut self) {
        self.session.sign_out();
        self.screen = Screen::Home;
        self.form.clear();
        self.store.clear();
        self.requests.clear();
        self.confirmation = None;
        self.sidebar_open = false;
        self.last_report = None;
        self.active_chat = None;
        self.status_message = "Logged out".to_string();
    }
}
