//! Wire types for the REST backend: request bodies and response envelopes.
//!
//! Domain records (`Trip`, `JoinRequest`) live in `core::trip`; this module
//! only holds the shapes that wrap them on the way in and out.

use serde::{Deserialize, Serialize};

use crate::core::trip::{JoinRequest, Place, RequestId, Trip, TripId, UserId};

/// Body of a passenger trip search.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TripQuery {
    #[serde(rename = "locationMarker")]
    pub location_marker: Place,
    #[serde(rename = "destinationMarker")]
    pub destination_marker: Place,
    /// `H:M`, not zero padded (`"9:5"` for 09:05).
    pub time: String,
    /// `YYYY-MM-DD`
    pub date: String,
}

/// Body of the accept/reject calls.
#[derive(Serialize, Debug)]
pub(crate) struct RequestDecision {
    #[serde(rename = "tripId")]
    pub trip_id: TripId,
    #[serde(rename = "requestId")]
    pub request_id: RequestId,
}

#[derive(Deserialize, Debug)]
pub(crate) struct TripRequestsResponse {
    #[serde(rename = "tripRequests", default)]
    pub trip_requests: Vec<JoinRequest>,
}

/// `/user/upcomingTrips` has answered both with a bare array and with an
/// `allTrips` envelope; anything else reads as no trips.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub(crate) enum UpcomingTripsResponse {
    List(Vec<Trip>),
    Wrapped {
        #[serde(rename = "allTrips", default)]
        all_trips: Vec<Trip>,
    },
}

impl UpcomingTripsResponse {
    pub fn into_trips(self) -> Vec<Trip> {
        match self {
            UpcomingTripsResponse::List(trips) => trips,
            UpcomingTripsResponse::Wrapped { all_trips } => all_trips,
        }
    }
}

#[derive(Deserialize, Debug)]
pub(crate) struct UserIdResponse {
    #[serde(rename = "userId")]
    pub user_id: UserId,
}
