//! reqwest-backed implementation of [`RideApi`].
//!
//! Every request carries the bearer token, a JSON content type, and the
//! platform marker header the backend uses to tell clients apart.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Method;
use serde::de::DeserializeOwned;

use super::api::{ApiError, AuthToken, RideApi};
use super::types::{
    RequestDecision, TripQuery, TripRequestsResponse, UpcomingTripsResponse, UserIdResponse,
};
use crate::core::trip::{JoinRequest, RequestId, Trip, TripId, UserId};

pub const DEFAULT_PLATFORM: &str = "mobile";
pub const PLATFORM_HEADER: &str = "X-Platform";

pub struct HttpRideApi {
    base_url: String,
    platform: String,
    client: reqwest::Client,
}

impl HttpRideApi {
    /// # Arguments
    /// * `base_url` - Backend root, e.g. `http://10.0.2.2:9000`
    /// * `platform` - Value of the platform marker header (defaults to `mobile`)
    pub fn new(base_url: String, platform: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            platform: platform.unwrap_or_else(|| DEFAULT_PLATFORM.to_string()),
            client: reqwest::Client::new(),
        }
    }

    fn request(&self, method: Method, path: &str, token: &AuthToken) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", token.as_str()))
            .header("Content-Type", "application/json")
            .header(PLATFORM_HEADER, &self.platform)
    }

    /// Sends the request and turns a non-success status into `ApiError::Api`.
    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        debug!("{} response status: {}", what, response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("{} failed: {} - {}", what, status, message);
            return Err(ApiError::Api { status, message });
        }

        Ok(response)
    }

    async fn parse<T: DeserializeOwned>(
        response: reqwest::Response,
        what: &str,
    ) -> Result<T, ApiError> {
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| {
            warn!("{} returned an unexpected body: {}", what, e);
            ApiError::Parse(e.to_string())
        })
    }
}

#[async_trait]
impl RideApi for HttpRideApi {
    async fn search_trips(
        &self,
        token: &AuthToken,
        query: &TripQuery,
    ) -> Result<Vec<Trip>, ApiError> {
        info!("Searching trips for {} at {}", query.date, query.time);
        let builder = self
            .request(Method::POST, "/passenger/getTrips", token)
            .json(query);
        let response = self.send(builder, "search trips").await?;
        let trips: Vec<Trip> = Self::parse(response, "search trips").await?;
        info!("Search returned {} trips", trips.len());
        Ok(trips)
    }

    async fn fetch_trip_requests(
        &self,
        token: &AuthToken,
        trip_id: TripId,
    ) -> Result<Vec<JoinRequest>, ApiError> {
        let path = format!("/driver/trips/{trip_id}/requests");
        let response = self
            .send(self.request(Method::GET, &path, token), "fetch trip requests")
            .await?;
        let body: TripRequestsResponse = Self::parse(response, "fetch trip requests").await?;
        debug!("Trip {} has {} requests", trip_id, body.trip_requests.len());
        Ok(body.trip_requests)
    }

    async fn accept_request(
        &self,
        token: &AuthToken,
        trip_id: TripId,
        request_id: RequestId,
    ) -> Result<(), ApiError> {
        let builder = self
            .request(Method::POST, "/driver/acceptPassengerReq", token)
            .json(&RequestDecision {
                trip_id,
                request_id,
            });
        self.send(builder, "accept request").await?;
        info!("Accepted request {} on trip {}", request_id, trip_id);
        Ok(())
    }

    async fn reject_request(
        &self,
        token: &AuthToken,
        trip_id: TripId,
        request_id: RequestId,
    ) -> Result<(), ApiError> {
        let builder = self
            .request(Method::POST, "/driver/rejectPassengerReq", token)
            .json(&RequestDecision {
                trip_id,
                request_id,
            });
        self.send(builder, "reject request").await?;
        info!("Rejected request {} on trip {}", request_id, trip_id);
        Ok(())
    }

    async fn start_trip(&self, token: &AuthToken, trip_id: TripId) -> Result<(), ApiError> {
        let path = format!("/driver/trips/{trip_id}/start");
        self.send(self.request(Method::POST, &path, token), "start trip")
            .await?;
        info!("Started trip {}", trip_id);
        Ok(())
    }

    async fn complete_trip(&self, token: &AuthToken, trip_id: TripId) -> Result<(), ApiError> {
        let path = format!("/driver/trips/{trip_id}/complete");
        self.send(self.request(Method::POST, &path, token), "complete trip")
            .await?;
        info!("Completed trip {}", trip_id);
        Ok(())
    }

    async fn upcoming_trips(&self, token: &AuthToken) -> Result<Vec<Trip>, ApiError> {
        let response = self
            .send(
                self.request(Method::GET, "/user/upcomingTrips", token),
                "upcoming trips",
            )
            .await?;
        let body: UpcomingTripsResponse = Self::parse(response, "upcoming trips").await?;
        Ok(body.into_trips())
    }

    async fn driver_user_id(&self, token: &AuthToken, driver_id: i64) -> Result<UserId, ApiError> {
        let path = format!("/driver/getUserId/{driver_id}");
        let response = self
            .send(self.request(Method::GET, &path, token), "driver user id")
            .await?;
        let body: UserIdResponse = Self::parse(response, "driver user id").await?;
        Ok(body.user_id)
    }
}
