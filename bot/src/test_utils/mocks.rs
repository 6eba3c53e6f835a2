//! Mock implementations of port traits
//!
//! In-memory implementations that can be configured for testing. The
//! message gateway records every operation and can be told to fail
//! specific calls, which is how the recovery paths of the
//! synchronization pipeline are exercised.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    ChannelId, MessageId, Page, Participant, ParticipantId, Tournament, TournamentId,
};
use crate::domain::ports::{
    MessageGateway, ParticipantRepository, SentMessage, TournamentRepository,
};
use crate::error::{DomainError, MessagingError};

// ============================================================================
// In-Memory Tournament Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryTournamentRepository {
    tournaments: Arc<RwLock<HashMap<TournamentId, Tournament>>>,
    save_count: AtomicUsize,
}

impl InMemoryTournamentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a tournament for testing
    pub fn with_tournament(self, tournament: Tournament) -> Self {
        self.tournaments
            .write()
            .unwrap()
            .insert(tournament.id, tournament);
        self
    }

    /// Number of document saves issued so far
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TournamentRepository for InMemoryTournamentRepository {
    async fn find_by_id(&self, id: &TournamentId) -> Result<Option<Tournament>, DomainError> {
        Ok(self.tournaments.read().unwrap().get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Tournament>, DomainError> {
        Ok(self.tournaments.read().unwrap().values().cloned().collect())
    }

    async fn save(&self, tournament: &Tournament) -> Result<(), DomainError> {
        self.save_count.fetch_add(1, Ordering::SeqCst);
        self.tournaments
            .write()
            .unwrap()
            .insert(tournament.id, tournament.clone());
        Ok(())
    }

    async fn delete(&self, id: &TournamentId) -> Result<(), DomainError> {
        self.tournaments.write().unwrap().remove(id);
        Ok(())
    }
}

// ============================================================================
// In-Memory Participant Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryParticipantRepository {
    participants: Arc<RwLock<HashMap<ParticipantId, Participant>>>,
}

impl InMemoryParticipantRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a participant for testing
    pub fn with_participant(self, participant: Participant) -> Self {
        self.participants
            .write()
            .unwrap()
            .insert(participant.id, participant);
        self
    }

    pub async fn insert(&self, participant: Participant) {
        self.participants
            .write()
            .unwrap()
            .insert(participant.id, participant);
    }
}

#[async_trait]
impl ParticipantRepository for InMemoryParticipantRepository {
    async fn find_by_id(&self, id: &ParticipantId) -> Result<Option<Participant>, DomainError> {
        Ok(self.participants.read().unwrap().get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[ParticipantId]) -> Result<Vec<Participant>, DomainError> {
        let participants = self.participants.read().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| participants.get(id).cloned())
            .collect())
    }

    async fn find_by_platform_id(
        &self,
        platform_id: &str,
    ) -> Result<Option<Participant>, DomainError> {
        Ok(self
            .participants
            .read()
            .unwrap()
            .values()
            .find(|p| p.platform_id == platform_id)
            .cloned())
    }
}

// ============================================================================
// Recording Message Gateway
// ============================================================================

/// A recording in-memory chat platform. Messages live in a map; every
/// create/edit/delete is counted, and individual operations can be told
/// to fail.
pub struct MockMessageGateway {
    counter: AtomicUsize,
    messages: RwLock<HashMap<MessageId, (ChannelId, Page)>>,
    pinned: RwLock<Vec<MessageId>>,
    created: AtomicUsize,
    edited: AtomicUsize,
    deleted: AtomicUsize,
    fail_channel: AtomicBool,
    fail_create: AtomicBool,
    fail_edit_ids: RwLock<HashSet<MessageId>>,
}

impl MockMessageGateway {
    pub fn new() -> Self {
        Self {
            counter: AtomicUsize::new(0),
            messages: RwLock::new(HashMap::new()),
            pinned: RwLock::new(Vec::new()),
            created: AtomicUsize::new(0),
            edited: AtomicUsize::new(0),
            deleted: AtomicUsize::new(0),
            fail_channel: AtomicBool::new(false),
            fail_create: AtomicBool::new(false),
            fail_edit_ids: RwLock::new(HashSet::new()),
        }
    }

    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn edited_count(&self) -> usize {
        self.edited.load(Ordering::SeqCst)
    }

    pub fn deleted_count(&self) -> usize {
        self.deleted.load(Ordering::SeqCst)
    }

    pub fn live_message_count(&self) -> usize {
        self.messages.read().unwrap().len()
    }

    pub fn message_content(&self, id: &MessageId) -> Option<Page> {
        self.messages
            .read()
            .unwrap()
            .get(id)
            .map(|(_, page)| page.clone())
    }

    pub fn pinned_ids(&self) -> Vec<MessageId> {
        self.pinned.read().unwrap().clone()
    }

    /// Make `resolve_channel` fail from now on
    pub fn fail_channel(&self) {
        self.fail_channel.store(true, Ordering::SeqCst);
    }

    /// Make `create_message` fail from now on
    pub fn fail_creates(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }

    /// Make edits of one message fail from now on
    pub fn fail_edits_of(&self, id: &MessageId) {
        self.fail_edit_ids.write().unwrap().insert(id.clone());
    }

    /// Drop a message behind the pipeline's back, as if a moderator
    /// deleted it on the platform
    pub fn drop_message(&self, id: &MessageId) {
        self.messages.write().unwrap().remove(id);
    }

    /// Seed a message with known content (for fresh-process tests)
    pub fn seed_message(&self, id: MessageId, channel: ChannelId, page: Page) {
        self.messages.write().unwrap().insert(id, (channel, page));
    }
}

impl Default for MockMessageGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageGateway for MockMessageGateway {
    async fn resolve_channel(&self, channel: &ChannelId) -> Result<ChannelId, MessagingError> {
        if self.fail_channel.load(Ordering::SeqCst) {
            return Err(MessagingError::ChannelNotFound(channel.to_string()));
        }
        Ok(channel.clone())
    }

    async fn create_message(
        &self,
        channel: &ChannelId,
        page: &Page,
    ) -> Result<MessageId, MessagingError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(MessagingError::Api {
                status: 500,
                message: "create failed".to_string(),
            });
        }
        let id = MessageId(format!("m{}", self.counter.fetch_add(1, Ordering::SeqCst) + 1));
        self.messages
            .write()
            .unwrap()
            .insert(id.clone(), (channel.clone(), page.clone()));
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    async fn edit_message(
        &self,
        channel: &ChannelId,
        id: &MessageId,
        page: &Page,
    ) -> Result<(), MessagingError> {
        if self.fail_edit_ids.read().unwrap().contains(id) {
            return Err(MessagingError::Api {
                status: 500,
                message: "edit failed".to_string(),
            });
        }
        let mut messages = self.messages.write().unwrap();
        match messages.get_mut(id) {
            Some(entry) => {
                *entry = (channel.clone(), page.clone());
                self.edited.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            None => Err(MessagingError::MessageNotFound(id.to_string())),
        }
    }

    async fn delete_message(
        &self,
        _channel: &ChannelId,
        id: &MessageId,
    ) -> Result<(), MessagingError> {
        match self.messages.write().unwrap().remove(id) {
            Some(_) => {
                self.deleted.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            None => Err(MessagingError::MessageNotFound(id.to_string())),
        }
    }

    async fn fetch_message(
        &self,
        _channel: &ChannelId,
        id: &MessageId,
    ) -> Result<SentMessage, MessagingError> {
        match self.messages.read().unwrap().get(id) {
            Some((channel, _)) => Ok(SentMessage {
                id: id.clone(),
                channel: channel.clone(),
            }),
            None => Err(MessagingError::MessageNotFound(id.to_string())),
        }
    }

    async fn pin_message(
        &self,
        _channel: &ChannelId,
        id: &MessageId,
    ) -> Result<(), MessagingError> {
        self.pinned.write().unwrap().push(id.clone());
        Ok(())
    }
}
