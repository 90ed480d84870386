use std::fmt;

use async_trait::async_trait;

use super::types::TripQuery;
use crate::core::trip::{JoinRequest, RequestId, Trip, TripId, UserId};

/// Errors from the ride-sharing REST backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Transport failure (timeout, DNS, connection refused).
    Network(String),
    /// The backend answered with a non-success status.
    Api { status: u16, message: String },
    /// The response body did not have the expected shape.
    Parse(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "server returned status {status}: {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Bearer token for the backend. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Returns `None` for an empty or whitespace-only token.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Remote calls the client consumes. Every call needs a token; callers
/// check for one before reaching this trait.
#[async_trait]
pub trait RideApi: Send + Sync {
    /// Passenger trip matching by locations, date and time.
    async fn search_trips(&self, token: &AuthToken, query: &TripQuery)
    -> Result<Vec<Trip>, ApiError>;

    /// Join requests for a trip (driver only).
    async fn fetch_trip_requests(
        &self,
        token: &AuthToken,
        trip_id: TripId,
    ) -> Result<Vec<JoinRequest>, ApiError>;

    async fn accept_request(
        &self,
        token: &AuthToken,
        trip_id: TripId,
        request_id: RequestId,
    ) -> Result<(), ApiError>;

    async fn reject_request(
        &self,
        token: &AuthToken,
        trip_id: TripId,
        request_id: RequestId,
    ) -> Result<(), ApiError>;

    async fn start_trip(&self, token: &AuthToken, trip_id: TripId) -> Result<(), ApiError>;

    async fn complete_trip(&self, token: &AuthToken, trip_id: TripId) -> Result<(), ApiError>;

    /// The signed-in user's upcoming and owned trips.
    async fn upcoming_trips(&self, token: &AuthToken) -> Result<Vec<Trip>, ApiError>;

    /// Maps a driver id to that driver's public user id.
    async fn driver_user_id(&self, token: &AuthToken, driver_id: i64) -> Result<UserId, ApiError>;
}
