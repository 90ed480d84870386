//! # Trip Data Model
//!
//! Types shared by every layer: the trip record the backend sends, passenger
//! join requests, the acting user, and the user's mode.
//!
//! Field names follow the backend's JSON, which is why most fields carry a
//! `serde(rename)`. Presentation-only fields are optional so a sparse record
//! from one endpoint parses the same as a full one from another.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub type TripId = i64;
pub type RequestId = i64;
pub type UserId = i64;

/// The acting user's role. Decides which commands and views are available.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Driver,
    #[default]
    Passenger,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Driver => "Driver",
            Mode::Passenger => "Passenger",
        }
    }
}

/// Lifecycle status of a trip. Only ever moves forward.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
}

impl TripStatus {
    /// The status one step forward, or `None` once completed.
    pub fn next(self) -> Option<TripStatus> {
        match self {
            TripStatus::Upcoming => Some(TripStatus::Ongoing),
            TripStatus::Ongoing => Some(TripStatus::Completed),
            TripStatus::Completed => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TripStatus::Upcoming => "upcoming",
            TripStatus::Ongoing => "ongoing",
            TripStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A picked location: coordinates plus an optional human-readable name.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Place {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceParseError(pub String);

impl fmt::Display for PlaceParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid place: {}", self.0)
    }
}

impl std::error::Error for PlaceParseError {}

impl FromStr for Place {
    type Err = PlaceParseError;

    /// Parses `"lat,lng"` optionally followed by whitespace and a name,
    /// e.g. `"31.5204,74.3587 Liberty Market"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (coords, name) = match s.split_once(char::is_whitespace) {
            Some((coords, rest)) => (coords, Some(rest.trim().to_string())),
            None => (s, None),
        };
        let (lat, lng) = coords
            .split_once(',')
            .ok_or_else(|| PlaceParseError(s.to_string()))?;
        let latitude: f64 = lat.trim().parse().map_err(|_| PlaceParseError(s.to_string()))?;
        let longitude: f64 = lng.trim().parse().map_err(|_| PlaceParseError(s.to_string()))?;
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(PlaceParseError(s.to_string()));
        }
        Ok(Place {
            latitude,
            longitude,
            name: name.filter(|n| !n.is_empty()),
        })
    }
}

/// A scheduled ride offer, as the backend reports it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Trip {
    #[serde(rename = "tripid")]
    pub trip_id: TripId,
    #[serde(rename = "driverid")]
    pub driver_id: i64,
    #[serde(rename = "vehicleid", default)]
    pub vehicle_id: i64,
    /// Passengers currently aboard (accepted).
    #[serde(rename = "numberofpassengers", default)]
    pub passenger_count: u32,
    #[serde(rename = "totalseats", default)]
    pub total_seats: u32,
    #[serde(rename = "numberofstops", default)]
    pub stop_count: u32,
    #[serde(default)]
    pub price: f64,
    #[serde(rename = "tripdate", default)]
    pub trip_date: Option<String>,
    #[serde(rename = "triptime", default)]
    pub trip_time: Option<String>,
    #[serde(rename = "startlocation", default)]
    pub start_location: Coordinates,
    #[serde(rename = "destinationlocation", default)]
    pub destination_location: Coordinates,
    #[serde(rename = "sourcename", default)]
    pub source_name: String,
    #[serde(rename = "destinationname", default)]
    pub destination_name: String,
    #[serde(default)]
    pub status: TripStatus,
    /// Driver's declared gender, matched against the searching passenger's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(rename = "drivername", default, skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(rename = "overallrating", default, skip_serializing_if = "Option::is_none")]
    pub overall_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
    #[serde(rename = "estimatedTime", default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
    #[serde(rename = "vehiclename", default, skip_serializing_if = "Option::is_none")]
    pub vehicle_name: Option<String>,
    #[serde(rename = "vehiclecolor", default, skip_serializing_if = "Option::is_none")]
    pub vehicle_color: Option<String>,
    #[serde(rename = "vehiclenumber", default, skip_serializing_if = "Option::is_none")]
    pub vehicle_number: Option<String>,
}

impl Trip {
    /// Calendar date without the time-of-day suffix, e.g. `"2026-10-14"`.
    pub fn display_date(&self) -> &str {
        match self.trip_date.as_deref() {
            Some(date) if !date.is_empty() => date.split('T').next().unwrap_or(date),
            _ => "No Date",
        }
    }

    /// `HH:MM` part of the scheduled time.
    pub fn display_time(&self) -> &str {
        match self.trip_time.as_deref() {
            Some(time) if !time.is_empty() => time.get(..5).unwrap_or(time),
            _ => "No Time",
        }
    }

    pub fn has_passengers(&self) -> bool {
        self.passenger_count > 0
    }

    /// Driver name if the backend sent one, else the listing's username.
    pub fn driver_label(&self) -> &str {
        self.driver_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or("Unknown driver")
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Passenger {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub username: String,
}

/// A passenger's request to join a trip.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct JoinRequest {
    #[serde(rename = "requestId")]
    pub request_id: RequestId,
    pub passenger: Passenger,
    pub status: RequestStatus,
}

/// The signed-in user.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct User {
    #[serde(rename = "userid")]
    pub user_id: UserId,
    pub username: String,
    /// Set when the user is also registered as a driver.
    #[serde(rename = "driverid", default)]
    pub driver_id: Option<i64>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(rename = "isdriver", default)]
    pub is_driver: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
}

impl User {
    /// Placeholder identity used before sign-in and after logout.
    pub fn guest() -> Self {
        Self {
            user_id: 0,
            username: "Guest".to_string(),
            driver_id: None,
            gender: None,
            is_driver: false,
            profile_photo: None,
        }
    }

    pub fn is_guest(&self) -> bool {
        self.user_id == 0
    }
}

impl Default for User {
    fn default() -> Self {
        Self::guest()
    }
}
