//! Port traits
//!
//! Interfaces to external collaborators, implemented by adapters.

pub mod messaging;
pub mod repositories;

pub use messaging::{MessageGateway, SentMessage};
pub use repositories::{ParticipantRepository, TournamentRepository};
