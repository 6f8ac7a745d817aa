//! Meteo inventory integration module.
//!
//! Meteo is the source of truth: the sync only ever reads from it.

mod client;
mod types;

pub use client::MeteoClient;
pub use types::{MeteoCloud, MeteoProject};
