pub mod api;
pub mod http;
pub mod types;

pub use api::{ApiError, AuthToken, RideApi};
pub use http::HttpRideApi;
pub use types::TripQuery;
