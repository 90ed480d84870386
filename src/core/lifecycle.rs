//! # Trip Lifecycle Controller
//!
//! Every status-changing operation on the selected trip, and the join
//! request list that goes with it.
//!
//! ```text
//! trip:     upcoming ──start──▶ ongoing ──complete──▶ completed
//! request:  pending ──accept──▶ accepted
//!           pending ──reject──▶ (removed)
//! ```
//!
//! Writes are remote-first: local state changes only after the backend has
//! confirmed the call. Guards run before any remote call, so a refused
//! command never reaches the network.

use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use log::{info, warn};

use crate::backend::{ApiError, AuthToken, RideApi};
use crate::chat::{ChatError, ChatId, ChatService};
use crate::core::session::Session;
use crate::core::store::TripStore;
use crate::core::trip::{
    JoinRequest, Mode, RequestId, RequestStatus, Trip, TripId, TripStatus, UserId,
};

// ============================================================================
// Request List
// ============================================================================

/// The details screen's copy of a trip's join requests.
///
/// Rejected requests never appear here: a reject removes the entry, and a
/// fetch drops anything the server still reports as rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestList {
    requests: Vec<JoinRequest>,
}

impl RequestList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fetched(requests: Vec<JoinRequest>) -> Self {
        Self {
            requests: requests
                .into_iter()
                .filter(|r| r.status != RequestStatus::Rejected)
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &JoinRequest> {
        self.requests.iter()
    }

    pub fn get(&self, request_id: RequestId) -> Option<&JoinRequest> {
        self.requests.iter().find(|r| r.request_id == request_id)
    }

    pub fn accepted(&self) -> impl Iterator<Item = &JoinRequest> {
        self.requests
            .iter()
            .filter(|r| r.status == RequestStatus::Accepted)
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn clear(&mut self) {
        self.requests.clear();
    }

    fn mark_accepted(&mut self, request_id: RequestId) {
        if let Some(r) = self.requests.iter_mut().find(|r| r.request_id == request_id) {
            r.status = RequestStatus::Accepted;
        }
    }

    fn remove(&mut self, request_id: RequestId) {
        self.requests.retain(|r| r.request_id != request_id);
    }
}

// ============================================================================
// Commands & Outcomes
// ============================================================================

/// A controller command, as issued from the details screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    FetchRequests,
    Start,
    Complete,
    Accept(RequestId),
    Reject(RequestId),
    ContactPassenger(UserId),
    ContactDriver,
}

impl Command {
    pub fn label(&self) -> &'static str {
        match self {
            Command::FetchRequests => "fetch requests",
            Command::Start => "start trip",
            Command::Complete => "complete trip",
            Command::Accept(_) => "accept request",
            Command::Reject(_) => "reject request",
            Command::ContactPassenger(_) => "contact passenger",
            Command::ContactDriver => "contact driver",
        }
    }
}

/// Result of tearing down one passenger's chat on completion.
#[derive(Debug, Clone, PartialEq)]
pub struct TeardownOutcome {
    pub passenger_id: UserId,
    /// The deleted chat's id, or why teardown failed.
    pub result: Result<ChatId, ChatError>,
}

/// One entry per accepted passenger, in request-list order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionReport {
    pub teardowns: Vec<TeardownOutcome>,
}

impl CompletionReport {
    pub fn failures(&self) -> impl Iterator<Item = &TeardownOutcome> {
        self.teardowns.iter().filter(|t| t.result.is_err())
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures().next().is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    Done,
    Completed(CompletionReport),
    ChatReady(ChatId),
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleError {
    MissingToken,
    NoSelectedTrip,
    /// The command belongs to the trip's driver.
    DriverOnly,
    PassengerOnly,
    /// The trip is not in the command's source state.
    InvalidTransition { status: TripStatus, command: &'static str },
    NoPassengers,
    RequestNotFound(RequestId),
    RequestNotPending { request_id: RequestId, status: RequestStatus },
    /// Accept succeeded remotely but the re-fetched trips do not include the trip.
    TripMissingAfterAccept(TripId),
    Api(ApiError),
    Chat(ChatError),
}

impl LifecycleError {
    /// Caught before any remote call.
    pub fn is_precondition(&self) -> bool {
        !matches!(
            self,
            LifecycleError::Api(_)
                | LifecycleError::Chat(_)
                | LifecycleError::TripMissingAfterAccept(_)
        )
    }

    /// Alert title and message for the user.
    pub fn alert(&self, command: Command) -> (&'static str, String) {
        match self {
            LifecycleError::MissingToken | LifecycleError::NoSelectedTrip => (
                "Error",
                "Missing authentication token or trip ID.".to_string(),
            ),
            LifecycleError::Api(_) | LifecycleError::TripMissingAfterAccept(_) => {
                let what = match command {
                    Command::Start => "start trip",
                    Command::Complete => "end trip",
                    Command::Accept(_) => "accept request",
                    Command::Reject(_) => "reject request",
                    Command::FetchRequests => "load passenger requests",
                    Command::ContactPassenger(_) | Command::ContactDriver => "open chat",
                };
                ("Error", format!("Could not {what}. Please try again."))
            }
            other => ("Error", other.to_string()),
        }
    }
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleError::MissingToken => write!(f, "auth token is missing"),
            LifecycleError::NoSelectedTrip => write!(f, "no trip selected"),
            LifecycleError::DriverOnly => write!(f, "only the driver can do this"),
            LifecycleError::PassengerOnly => write!(f, "only a passenger can do this"),
            LifecycleError::InvalidTransition { status, command } => {
                write!(f, "cannot {command} while the trip is {status}")
            }
            LifecycleError::NoPassengers => write!(f, "no passengers aboard yet"),
            LifecycleError::RequestNotFound(id) => write!(f, "request {id} not found"),
            LifecycleError::RequestNotPending { request_id, status } => {
                write!(f, "request {request_id} is already {status:?}")
            }
            LifecycleError::TripMissingAfterAccept(id) => {
                write!(f, "trip {id} missing from refreshed trips after accept")
            }
            LifecycleError::Api(e) => write!(f, "{e}"),
            LifecycleError::Chat(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LifecycleError {}

impl From<ApiError> for LifecycleError {
    fn from(e: ApiError) -> Self {
        LifecycleError::Api(e)
    }
}

impl From<ChatError> for LifecycleError {
    fn from(e: ChatError) -> Self {
        LifecycleError::Chat(e)
    }
}

// ============================================================================
// Guards (pure)
// ============================================================================

fn require_token(session: &Session) -> Result<&AuthToken, LifecycleError> {
    session.token.as_ref().ok_or(LifecycleError::MissingToken)
}

fn require_trip(store: &TripStore) -> Result<&Trip, LifecycleError> {
    store.selected().ok_or(LifecycleError::NoSelectedTrip)
}

fn require_driver(session: &Session) -> Result<(), LifecycleError> {
    match session.mode {
        Mode::Driver => Ok(()),
        Mode::Passenger => Err(LifecycleError::DriverOnly),
    }
}

/// `command` moves the trip one step forward from `source` and nowhere else.
fn require_source(trip: &Trip, source: TripStatus, command: Command) -> Result<(), LifecycleError> {
    if trip.status == source && trip.status.next().is_some() {
        Ok(())
    } else {
        Err(LifecycleError::InvalidTransition {
            status: trip.status,
            command: command.label(),
        })
    }
}

/// Moves the selected trip one step along its lifecycle.
fn advance(store: &mut TripStore) {
    if let Some(trip) = store.selected_mut()
        && let Some(next) = trip.status.next()
    {
        trip.status = next;
    }
}

fn require_pending(requests: &RequestList, request_id: RequestId) -> Result<(), LifecycleError> {
    let request = requests
        .get(request_id)
        .ok_or(LifecycleError::RequestNotFound(request_id))?;
    match request.status {
        RequestStatus::Pending => Ok(()),
        status => Err(LifecycleError::RequestNotPending { request_id, status }),
    }
}

/// Checks every precondition of `command` without touching the network.
pub fn check(
    command: Command,
    session: &Session,
    store: &TripStore,
    requests: &RequestList,
) -> Result<(), LifecycleError> {
    let trip = require_trip(store)?;
    require_token(session)?;
    match command {
        Command::ContactDriver => {
            if session.mode != Mode::Passenger {
                return Err(LifecycleError::PassengerOnly);
            }
            if trip.status == TripStatus::Completed {
                return Err(LifecycleError::InvalidTransition {
                    status: trip.status,
                    command: command.label(),
                });
            }
            Ok(())
        }
        Command::FetchRequests => require_driver(session),
        Command::Start => {
            require_driver(session)?;
            require_source(trip, TripStatus::Upcoming, command)?;
            if !trip.has_passengers() {
                return Err(LifecycleError::NoPassengers);
            }
            Ok(())
        }
        Command::Complete => {
            require_driver(session)?;
            require_source(trip, TripStatus::Ongoing, command)
        }
        Command::Accept(id) | Command::Reject(id) => {
            require_driver(session)?;
            require_pending(requests, id)
        }
        Command::ContactPassenger(_) => {
            require_driver(session)?;
            if trip.status == TripStatus::Completed {
                return Err(LifecycleError::InvalidTransition {
                    status: trip.status,
                    command: command.label(),
                });
            }
            Ok(())
        }
    }
}

// ============================================================================
// Controller
// ============================================================================

pub struct TripController {
    api: Arc<dyn RideApi>,
    chats: Arc<dyn ChatService>,
}

impl TripController {
    pub fn new(api: Arc<dyn RideApi>, chats: Arc<dyn ChatService>) -> Self {
        Self { api, chats }
    }

    /// Runs `command` against the selected trip in `store`.
    pub async fn execute(
        &self,
        command: Command,
        session: &Session,
        store: &mut TripStore,
        requests: &mut RequestList,
    ) -> Result<CommandOutput, LifecycleError> {
        match command {
            Command::FetchRequests => {
                self.fetch_requests(session, store, requests).await?;
                Ok(CommandOutput::Done)
            }
            Command::Start => {
                self.start_trip(session, store, requests).await?;
                Ok(CommandOutput::Done)
            }
            Command::Complete => self
                .complete_trip(session, store, requests)
                .await
                .map(CommandOutput::Completed),
            Command::Accept(id) => {
                self.accept_request(session, store, requests, id).await?;
                Ok(CommandOutput::Done)
            }
            Command::Reject(id) => {
                self.reject_request(session, store, requests, id).await?;
                Ok(CommandOutput::Done)
            }
            Command::ContactPassenger(passenger_id) => self
                .contact_passenger(session, store, requests, passenger_id)
                .await
                .map(CommandOutput::ChatReady),
            Command::ContactDriver => self
                .contact_driver(session, store, requests)
                .await
                .map(CommandOutput::ChatReady),
        }
    }

    /// Replaces `requests` with the server's list for the selected trip.
    pub async fn fetch_requests(
        &self,
        session: &Session,
        store: &TripStore,
        requests: &mut RequestList,
    ) -> Result<(), LifecycleError> {
        check(Command::FetchRequests, session, store, requests)?;
        let token = require_token(session)?;
        let trip_id = require_trip(store)?.trip_id;

        let fetched = self.api.fetch_trip_requests(token, trip_id).await?;
        *requests = RequestList::from_fetched(fetched);
        info!("Trip {} has {} visible requests", trip_id, requests.len());
        Ok(())
    }

    /// upcoming → ongoing.
    pub async fn start_trip(
        &self,
        session: &Session,
        store: &mut TripStore,
        requests: &RequestList,
    ) -> Result<(), LifecycleError> {
        check(Command::Start, session, store, requests)?;
        let token = require_token(session)?;
        let trip_id = require_trip(store)?.trip_id;

        self.api.start_trip(token, trip_id).await?;
        advance(store);
        Ok(())
    }

    /// ongoing → completed, then tears down every accepted passenger's chat.
    ///
    /// Teardowns run concurrently and independently; their failures are in
    /// the report, not in the returned error.
    pub async fn complete_trip(
        &self,
        session: &Session,
        store: &mut TripStore,
        requests: &RequestList,
    ) -> Result<CompletionReport, LifecycleError> {
        check(Command::Complete, session, store, requests)?;
        let token = require_token(session)?;
        let trip_id = require_trip(store)?.trip_id;

        self.api.complete_trip(token, trip_id).await?;
        advance(store);

        let mine = session.chat_identity();
        let teardowns = requests.accepted().map(|request| {
            let passenger_id = request.passenger.user_id;
            let mine = mine.as_str();
            async move {
                let result = self.teardown_chat(mine, passenger_id).await;
                if let Err(e) = &result {
                    warn!(
                        "Chat teardown failed for passenger {} on trip {}: {}",
                        passenger_id, trip_id, e
                    );
                }
                TeardownOutcome { passenger_id, result }
            }
        });
        let report = CompletionReport {
            teardowns: join_all(teardowns).await,
        };
        info!(
            "Trip {} completed, {} chats torn down, {} failed",
            trip_id,
            report.teardowns.len() - report.failures().count(),
            report.failures().count()
        );
        Ok(report)
    }

    async fn teardown_chat(&self, mine: &str, passenger_id: UserId) -> Result<ChatId, ChatError> {
        let chat_id = self
            .chats
            .get_or_create_chat(mine, &passenger_id.to_string())
            .await?;
        self.chats.delete_chat(&chat_id).await?;
        Ok(chat_id)
    }

    /// pending → accepted, then resyncs the selected trip from the server.
    pub async fn accept_request(
        &self,
        session: &Session,
        store: &mut TripStore,
        requests: &mut RequestList,
        request_id: RequestId,
    ) -> Result<(), LifecycleError> {
        check(Command::Accept(request_id), session, store, requests)?;
        let token = require_token(session)?;
        let trip_id = require_trip(store)?.trip_id;

        self.api.accept_request(token, trip_id, request_id).await?;

        let refreshed = self.api.upcoming_trips(token).await?;
        let updated = refreshed
            .into_iter()
            .find(|t| t.trip_id == trip_id)
            .ok_or_else(|| {
                warn!(
                    "Request {} accepted but trip {} vanished from upcoming trips",
                    request_id, trip_id
                );
                LifecycleError::TripMissingAfterAccept(trip_id)
            })?;

        store.select(updated);
        requests.mark_accepted(request_id);
        Ok(())
    }

    /// pending → removed from the list.
    pub async fn reject_request(
        &self,
        session: &Session,
        store: &TripStore,
        requests: &mut RequestList,
        request_id: RequestId,
    ) -> Result<(), LifecycleError> {
        check(Command::Reject(request_id), session, store, requests)?;
        let token = require_token(session)?;
        let trip_id = require_trip(store)?.trip_id;

        self.api.reject_request(token, trip_id, request_id).await?;
        requests.remove(request_id);
        Ok(())
    }

    /// Driver side: the chat with one of the trip's passengers.
    pub async fn contact_passenger(
        &self,
        session: &Session,
        store: &TripStore,
        requests: &RequestList,
        passenger_id: UserId,
    ) -> Result<ChatId, LifecycleError> {
        check(Command::ContactPassenger(passenger_id), session, store, requests)?;
        let chat_id = self
            .chats
            .get_or_create_chat(&session.chat_identity(), &passenger_id.to_string())
            .await?;
        Ok(chat_id)
    }

    /// Passenger side: looks up the driver's user id, then the chat.
    pub async fn contact_driver(
        &self,
        session: &Session,
        store: &TripStore,
        requests: &RequestList,
    ) -> Result<ChatId, LifecycleError> {
        check(Command::ContactDriver, session, store, requests)?;
        let token = require_token(session)?;
        let driver_id = require_trip(store)?.driver_id;

        let driver_user_id = self.api.driver_user_id(token, driver_id).await?;
        let chat_id = self
            .chats
            .get_or_create_chat(&session.chat_identity(), &driver_user_id.to_string())
            .await?;
        Ok(chat_id)
    }
}
