//! # Core Application Logic
//!
//! This module contains ridealong's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Trip lifecycle       │
//!                    │  • Search composer      │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  Backend   │      │    Chat    │
//!     │  Adapter   │      │   (REST)   │      │  backend   │
//!     │ (ratatui)  │      │            │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`trip`]: Trip, JoinRequest, User and Mode
//! - [`store`]: `TripStore`, the last search result and the selected trip
//! - [`search`]: Home screen validation, post-filter and submission
//! - [`lifecycle`]: `TripController` and the join request list
//! - [`session`]: The signed-in session and its stored credentials
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`config`]: Layered configuration

pub mod action;
pub mod config;
pub mod lifecycle;
pub mod search;
pub mod session;
pub mod state;
pub mod store;
pub mod trip;
