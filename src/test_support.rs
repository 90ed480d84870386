//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use crate::backend::{ApiError, AuthToken, RideApi, TripQuery};
use crate::chat::{ChatError, ChatId, ChatKey, ChatService};
use crate::core::search::SearchForm;
use crate::core::session::Session;
use crate::core::state::App;
use crate::core::trip::{
    JoinRequest, Mode, Passenger, Place, RequestId, RequestStatus, Trip, TripId, TripStatus,
    User, UserId,
};

#[derive(Default)]
struct Scripted {
    calls: Vec<String>,
    failing: HashSet<String>,
    search_results: Vec<Trip>,
    upcoming: Vec<Trip>,
    requests: Vec<JoinRequest>,
    driver_user_id: UserId,
}

/// A `RideApi` that records which methods were called and answers from a script.
#[derive(Default)]
pub struct RecordingApi {
    inner: Mutex<Scripted>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Method names in call order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Makes `method` answer with a 500 from now on.
    pub fn fail(&self, method: &str) {
        self.inner.lock().unwrap().failing.insert(method.to_string());
    }

    pub fn set_search_results(&self, trips: Vec<Trip>) {
        self.inner.lock().unwrap().search_results = trips;
    }

    pub fn set_upcoming(&self, trips: Vec<Trip>) {
        self.inner.lock().unwrap().upcoming = trips;
    }

    pub fn set_requests(&self, requests: Vec<JoinRequest>) {
        self.inner.lock().unwrap().requests = requests;
    }

    pub fn set_driver_user_id(&self, id: UserId) {
        self.inner.lock().unwrap().driver_user_id = id;
    }

    fn record(&self, method: &str) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(method.to_string());
        if inner.failing.contains(method) {
            return Err(ApiError::Api {
                status: 500,
                message: format!("{method} failed"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RideApi for RecordingApi {
    async fn search_trips(
        &self,
        _token: &AuthToken,
        _query: &TripQuery,
    ) -> Result<Vec<Trip>, ApiError> {
        self.record("search_trips")?;
        Ok(self.inner.lock().unwrap().search_results.clone())
    }

    async fn fetch_trip_requests(
        &self,
        _token: &AuthToken,
        _trip_id: TripId,
    ) -> Result<Vec<JoinRequest>, ApiError> {
        self.record("fetch_trip_requests")?;
        Ok(self.inner.lock().unwrap().requests.clone())
    }

    async fn accept_request(
        &self,
        _token: &AuthToken,
        _trip_id: TripId,
        _request_id: RequestId,
    ) -> Result<(), ApiError> {
        self.record("accept_request")
    }

    async fn reject_request(
        &self,
        _token: &AuthToken,
        _trip_id: TripId,
        _request_id: RequestId,
    ) -> Result<(), ApiError> {
        self.record("reject_request")
    }

    async fn start_trip(&self, _token: &AuthToken, _trip_id: TripId) -> Result<(), ApiError> {
        self.record("start_trip")
    }

    async fn complete_trip(&self, _token: &AuthToken, _trip_id: TripId) -> Result<(), ApiError> {
        self.record("complete_trip")
    }

    async fn upcoming_trips(&self, _token: &AuthToken) -> Result<Vec<Trip>, ApiError> {
        self.record("upcoming_trips")?;
        Ok(self.inner.lock().unwrap().upcoming.clone())
    }

    async fn driver_user_id(
        &self,
        _token: &AuthToken,
        _driver_id: i64,
    ) -> Result<UserId, ApiError> {
        self.record("driver_user_id")?;
        Ok(self.inner.lock().unwrap().driver_user_id)
    }
}

#[derive(Default)]
struct ChatScript {
    failing_members: HashSet<String>,
    attempts: usize,
    deleted: Vec<ChatId>,
}

/// A `ChatService` with deterministic chat ids that can be told to fail for
/// chosen members.
#[derive(Default)]
pub struct FlakyChats {
    inner: Mutex<ChatScript>,
}

impl FlakyChats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any chat involving `member` fails to resolve.
    pub fn fail_for(&self, member: &str) {
        self.inner.lock().unwrap().failing_members.insert(member.to_string());
    }

    pub fn attempts(&self) -> usize {
        self.inner.lock().unwrap().attempts
    }

    pub fn deleted(&self) -> Vec<ChatId> {
        self.inner.lock().unwrap().deleted.clone()
    }

    /// The id this fake hands out for the pair.
    pub fn chat_id_for(&self, a: &str, b: &str) -> ChatId {
        let [low, high] = ChatKey::new(a, b).members().map(String::from);
        format!("chat-{low}-{high}")
    }
}

#[async_trait]
impl ChatService for FlakyChats {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn get_or_create_chat(&self, a: &str, b: &str) -> Result<ChatId, ChatError> {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.attempts += 1;
            if inner.failing_members.contains(a) || inner.failing_members.contains(b) {
                return Err(ChatError::Network(format!("chat with {a} and {b} unavailable")));
            }
        }
        Ok(self.chat_id_for(a, b))
    }

    async fn delete_chat(&self, chat_id: &str) -> Result<(), ChatError> {
        self.inner.lock().unwrap().deleted.push(chat_id.to_string());
        Ok(())
    }
}

/// An upcoming trip with one passenger aboard, driven by a female driver.
pub fn trip(id: TripId) -> Trip {
    Trip {
        trip_id: id,
        driver_id: 4,
        vehicle_id: 1,
        passenger_count: 1,
        total_seats: 4,
        stop_count: 0,
        price: 300.0,
        trip_date: Some("2026-10-20T00:00:00.000Z".to_string()),
        trip_time: Some("09:05:00".to_string()),
        start_location: Default::default(),
        destination_location: Default::default(),
        source_name: "Liberty Market".to_string(),
        destination_name: "Johar Town".to_string(),
        status: TripStatus::Upcoming,
        gender: Some("female".to_string()),
        driver_name: Some("Ayesha".to_string()),
        username: None,
        overall_rating: None,
        distance: None,
        estimated_time: None,
        vehicle_name: None,
        vehicle_color: None,
        vehicle_number: None,
    }
}

pub fn join_request(request_id: RequestId, user_id: UserId, status: RequestStatus) -> JoinRequest {
    JoinRequest {
        request_id,
        passenger: Passenger {
            user_id,
            username: format!("rider{user_id}"),
        },
        status,
    }
}

pub fn complete_form() -> SearchForm {
    SearchForm {
        start: Some(Place {
            latitude: 31.5204,
            longitude: 74.3587,
            name: Some("Liberty Market".to_string()),
        }),
        destination: Some(Place {
            latitude: 31.4697,
            longitude: 74.2728,
            name: Some("Johar Town".to_string()),
        }),
        date: NaiveDate::from_ymd_opt(2026, 10, 20),
        time: NaiveTime::from_hms_opt(9, 5, 0),
    }
}

pub fn passenger_session() -> Session {
    Session::new(
        AuthToken::new("passenger-token"),
        User {
            user_id: 21,
            username: "sana".to_string(),
            driver_id: Some(9),
            gender: Some("female".to_string()),
            is_driver: false,
            profile_photo: None,
        },
        Mode::Passenger,
    )
}

pub fn driver_session() -> Session {
    Session::new(
        AuthToken::new("driver-token"),
        User {
            user_id: 40,
            username: "ayesha".to_string(),
            driver_id: Some(4),
            gender: Some("female".to_string()),
            is_driver: true,
            profile_photo: None,
        },
        Mode::Driver,
    )
}

/// An app signed in as a driver.
pub fn test_app() -> App {
    App::new(driver_session())
}
