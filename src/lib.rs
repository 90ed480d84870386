//! Ridealong library exports for testing

pub mod backend;
pub mod chat;
pub mod core;
pub mod tui;

#[cfg(test)]
pub mod test_support;

pub use crate::core::trip::Mode;
