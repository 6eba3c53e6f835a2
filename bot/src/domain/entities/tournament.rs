//! Tournament domain entity
//!
//! A sign-up tournament: roster, premade declarations and the persisted
//! view state. Declaration mutations always build a new list from the
//! current one instead of editing in place, so concurrent readers of an
//! older snapshot never observe a half-applied change.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::declaration::{PremadeDeclaration, MAX_PREMADE_TARGETS};
use super::participant::{ParticipantId, Region};
use super::view::{ChannelId, ViewState};
use crate::error::DomainError;

/// Team size of the target game; clusters are merged up to this capacity.
pub const TEAM_CAPACITY: usize = 5;

/// Unique identifier for a tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TournamentId(pub Uuid);

impl TournamentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TournamentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TournamentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for TournamentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A sign-up tournament
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub description: Option<String>,
    pub region: Region,
    /// Channel the view messages live in
    pub channel_id: ChannelId,
    /// Team capacity used by the grouping engine
    pub capacity: usize,
    pub participants: Vec<ParticipantId>,
    pub declarations: Vec<PremadeDeclaration>,
    #[serde(default)]
    pub view: ViewState,
}

/// Data needed to create a new tournament
#[derive(Debug, Clone)]
pub struct NewTournament {
    pub name: String,
    pub description: Option<String>,
    pub region: Region,
    pub channel_id: ChannelId,
    pub capacity: Option<usize>,
}

impl Tournament {
    pub fn create(new: NewTournament) -> Self {
        Self {
            id: TournamentId::new(),
            name: new.name,
            description: new.description,
            region: new.region,
            channel_id: new.channel_id,
            capacity: new.capacity.unwrap_or(TEAM_CAPACITY),
            participants: Vec::new(),
            declarations: Vec::new(),
            view: ViewState::default(),
        }
    }

    pub fn is_participant(&self, id: &ParticipantId) -> bool {
        self.participants.contains(id)
    }

    /// Add a participant to the roster.
    pub fn add_participant(&mut self, id: ParticipantId) -> Result<(), DomainError> {
        if self.is_participant(&id) {
            return Err(DomainError::AlreadyExists(format!(
                "Participant {} already joined tournament {}",
                id, self.id
            )));
        }
        self.participants.push(id);
        Ok(())
    }

    /// Remove a participant from the roster along with every declaration
    /// that names them, as issuer or as target.
    pub fn remove_participant(&mut self, id: &ParticipantId) -> Result<(), DomainError> {
        if !self.is_participant(id) {
            return Err(DomainError::NotFound(format!(
                "Participant {} is not in tournament {}",
                id, self.id
            )));
        }
        self.participants = self
            .participants
            .iter()
            .copied()
            .filter(|p| p != id)
            .collect();
        self.declarations = self
            .declarations
            .iter()
            .copied()
            .filter(|d| d.issuer != *id && d.target != Some(*id))
            .collect();
        Ok(())
    }

    /// Atomically replace the issuer's declaration set with the given
    /// targets. Self-targets and duplicates are dropped; at most
    /// [`MAX_PREMADE_TARGETS`] distinct targets are accepted.
    pub fn set_premade_targets(
        &mut self,
        issuer: ParticipantId,
        targets: &[ParticipantId],
    ) -> Result<(), DomainError> {
        let mut distinct: Vec<ParticipantId> = Vec::new();
        for target in targets {
            if *target != issuer && !distinct.contains(target) {
                distinct.push(*target);
            }
        }
        if distinct.len() > MAX_PREMADE_TARGETS {
            return Err(DomainError::Validation(format!(
                "At most {} premade targets are allowed, got {}",
                MAX_PREMADE_TARGETS,
                distinct.len()
            )));
        }
        let mut declarations: Vec<PremadeDeclaration> = self
            .declarations
            .iter()
            .copied()
            .filter(|d| d.issuer != issuer)
            .collect();
        declarations.extend(
            distinct
                .into_iter()
                .map(|target| PremadeDeclaration::new(issuer, target)),
        );
        self.declarations = declarations;
        Ok(())
    }

    /// Replace the issuer's declaration set with the opt-out marker.
    pub fn opt_out(&mut self, issuer: ParticipantId) {
        let mut declarations: Vec<PremadeDeclaration> = self
            .declarations
            .iter()
            .copied()
            .filter(|d| d.issuer != issuer)
            .collect();
        declarations.push(PremadeDeclaration::opt_out(issuer));
        self.declarations = declarations;
    }

    /// Drop every declaration issued by the participant.
    pub fn clear_declarations(&mut self, issuer: ParticipantId) {
        self.declarations = self
            .declarations
            .iter()
            .copied()
            .filter(|d| d.issuer != issuer)
            .collect();
    }

    /// The issuer's currently declared targets, in declaration order.
    pub fn declared_targets(&self, issuer: &ParticipantId) -> Vec<ParticipantId> {
        self.declarations
            .iter()
            .filter(|d| d.issuer == *issuer)
            .filter_map(|d| d.target)
            .collect()
    }
}
