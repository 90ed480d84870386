//! # Trip Store
//!
//! In-memory holder for the last search result and the selected trip.
//! Every setter replaces what was there; there is no merging.

use crate::core::trip::{Trip, TripId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripStore {
    trips: Vec<Trip>,
    selected: Option<Trip>,
}

impl TripStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// Replaces the trip list.
    pub fn set_trips(&mut self, trips: Vec<Trip>) {
        self.trips = trips;
    }

    pub fn selected(&self) -> Option<&Trip> {
        self.selected.as_ref()
    }

    pub(crate) fn selected_mut(&mut self) -> Option<&mut Trip> {
        self.selected.as_mut()
    }

    /// Replaces the selected trip.
    pub fn select(&mut self, trip: Trip) {
        self.selected = Some(trip);
    }

    /// Selects the trip at `index` in the current list, returning it.
    pub fn select_index(&mut self, index: usize) -> Option<&Trip> {
        let trip = self.trips.get(index)?.clone();
        self.selected = Some(trip);
        self.selected.as_ref()
    }

    pub fn selected_id(&self) -> Option<TripId> {
        self.selected.as_ref().map(|t| t.trip_id)
    }

    pub fn clear(&mut self) {
        self.trips.clear();
        self.selected = None;
    }
}
