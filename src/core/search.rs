//! # Home Screen Composer
//!
//! Turns the home screen's four inputs (start, destination, date, time) into
//! either a passenger trip search or a driver trip draft.
//!
//! ```text
//! SearchForm ──prepare()──┬── Passenger → search_trips → filter_trips → TripStore
//!                         └── Driver    → TripDraft (no network)
//! ```
//!
//! `filter_trips` is pure so the client-side post-filter can be tested on
//! its own.

use std::fmt;

use chrono::{NaiveDate, NaiveTime, Timelike};
use log::{debug, info};

use crate::backend::{ApiError, AuthToken, RideApi, TripQuery};
use crate::core::session::Session;
use crate::core::store::TripStore;
use crate::core::trip::{Mode, Place, Trip, User};

/// The home screen's inputs. Any of them may still be unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchForm {
    pub start: Option<Place>,
    pub destination: Option<Place>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
}

impl SearchForm {
    pub fn is_complete(&self) -> bool {
        self.start.is_some()
            && self.destination.is_some()
            && self.date.is_some()
            && self.time.is_some()
    }

    /// All four inputs, or `MissingInformation`.
    pub fn to_draft(&self) -> Result<TripDraft, SearchError> {
        match (&self.start, &self.destination, self.date, self.time) {
            (Some(start), Some(destination), Some(date), Some(time)) => Ok(TripDraft {
                start: start.clone(),
                destination: destination.clone(),
                date,
                time,
            }),
            _ => Err(SearchError::MissingInformation),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A complete set of home screen inputs.
///
/// Drivers carry this into trip entry; passengers send it as a search.
#[derive(Debug, Clone, PartialEq)]
pub struct TripDraft {
    pub start: Place,
    pub destination: Place,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl TripDraft {
    pub fn to_query(&self) -> TripQuery {
        TripQuery {
            location_marker: self.start.clone(),
            destination_marker: self.destination.clone(),
            time: format!("{}:{}", self.time.hour(), self.time.minute()),
            date: self.date.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    MissingToken,
    MissingInformation,
    Api(ApiError),
}

impl SearchError {
    /// Alert title and message for the user.
    pub fn alert(&self) -> (&'static str, String) {
        match self {
            SearchError::MissingToken => {
                ("Error", "Token is missing. Please log in again.".to_string())
            }
            SearchError::MissingInformation => (
                "Missing information",
                "Enter the information to proceed.".to_string(),
            ),
            SearchError::Api(e) => ("Error", format!("Failed to search trips: {e}")),
        }
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::MissingToken => write!(f, "auth token is missing"),
            SearchError::MissingInformation => write!(f, "search form is incomplete"),
            SearchError::Api(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<ApiError> for SearchError {
    fn from(e: ApiError) -> Self {
        SearchError::Api(e)
    }
}

/// What the home screen does next.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The store now holds this many trips; show trip selection.
    TripsFound(usize),
    /// Nothing matched, before or after filtering.
    NoTripsAvailable,
    /// Driver path: continue to trip entry with these inputs.
    ComposeTrip(TripDraft),
}

/// A validated submission, before any network call.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Search(AuthToken, TripQuery),
    Draft(TripDraft),
}

/// Validates the form for the session's mode. Token first, then inputs.
pub fn prepare(form: &SearchForm, session: &Session) -> Result<Submission, SearchError> {
    let token = session.token.clone().ok_or(SearchError::MissingToken)?;
    let draft = form.to_draft()?;
    Ok(match session.mode {
        Mode::Passenger => Submission::Search(token, draft.to_query()),
        Mode::Driver => Submission::Draft(draft),
    })
}

/// Drops trips the user drives themselves and trips whose driver's gender
/// differs from the user's.
pub fn filter_trips(results: Vec<Trip>, user: &User) -> Vec<Trip> {
    results
        .into_iter()
        .filter(|trip| Some(trip.driver_id) != user.driver_id && trip.gender == user.gender)
        .collect()
}

/// Applies a raw search result to the store.
pub fn accept_results(results: Vec<Trip>, user: &User, store: &mut TripStore) -> SearchOutcome {
    let raw = results.len();
    let filtered = filter_trips(results, user);
    debug!("Search post-filter kept {} of {} trips", filtered.len(), raw);
    if filtered.is_empty() {
        return SearchOutcome::NoTripsAvailable;
    }
    let count = filtered.len();
    store.set_trips(filtered);
    SearchOutcome::TripsFound(count)
}

/// Runs the whole home screen submission.
pub async fn submit(
    form: &SearchForm,
    session: &Session,
    api: &dyn RideApi,
    store: &mut TripStore,
) -> Result<SearchOutcome, SearchError> {
    match prepare(form, session)? {
        Submission::Draft(draft) => {
            info!("Driver draft ready, deferring trip creation");
            Ok(SearchOutcome::ComposeTrip(draft))
        }
        Submission::Search(token, query) => {
            let results = api.search_trips(&token, &query).await?;
            Ok(accept_results(results, &session.user, store))
        }
    }
}
