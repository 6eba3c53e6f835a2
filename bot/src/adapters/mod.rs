//! Adapters
//!
//! Implementations of the domain ports against real infrastructure.

pub mod chat;
pub mod postgres;

pub use chat::ChatClientImpl;
pub use postgres::{PostgresParticipantRepository, PostgresTournamentRepository};
