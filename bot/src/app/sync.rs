//! View synchronization pipeline
//!
//! Reconciles the freshly rendered page list of a tournament against the
//! view messages published by the previous pass: existing messages are
//! edited in place, missing ones are created, surplus ones are retired,
//! and the resulting identifier list is persisted only when it changed.
//!
//! Every per-page failure is recovered locally (fall back to creating a
//! new message, or skip the slot) and never aborts the rest of the pass;
//! the tournament document is still saved with whatever identifiers were
//! produced. Only a failing channel resolution aborts a pass outright.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

use crate::app::premade::premade_grouping;
use crate::domain::entities::{
    ChannelId, MessageId, Page, Participant, Tournament, TournamentId, ViewState,
};
use crate::domain::ports::{MessageGateway, ParticipantRepository, TournamentRepository};
use crate::error::{AppError, MessagingError};
use crate::view::renderer::{render_main_page, render_view};

/// Per-tournament view state held in process: the lazily created main
/// message and the last applied content of every view message. The main
/// cell is written exactly once; late readers wait on the first writer
/// instead of racing a second creation.
pub struct ViewHandle {
    main: OnceCell<MessageId>,
    cache: Mutex<HashMap<MessageId, Page>>,
}

impl ViewHandle {
    fn new() -> Self {
        Self {
            main: OnceCell::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }
}

/// Registry of per-tournament handles with lazy, race-safe creation
#[derive(Default)]
struct ViewRegistry {
    entries: Mutex<HashMap<TournamentId, Arc<ViewHandle>>>,
}

impl ViewRegistry {
    async fn handle(&self, id: TournamentId) -> Arc<ViewHandle> {
        let mut entries = self.entries.lock().await;
        entries
            .entry(id)
            .or_insert_with(|| Arc::new(ViewHandle::new()))
            .clone()
    }

    async fn remove(&self, id: &TournamentId) {
        self.entries.lock().await.remove(id);
    }
}

/// Service running full render passes for tournaments
pub struct ViewSyncService<TR, PR, MG>
where
    TR: TournamentRepository,
    PR: ParticipantRepository,
    MG: MessageGateway,
{
    tournaments: Arc<TR>,
    participants: Arc<PR>,
    gateway: Arc<MG>,
    registry: ViewRegistry,
}

impl<TR, PR, MG> ViewSyncService<TR, PR, MG>
where
    TR: TournamentRepository,
    PR: ParticipantRepository,
    MG: MessageGateway,
{
    pub fn new(tournaments: Arc<TR>, participants: Arc<PR>, gateway: Arc<MG>) -> Self {
        Self {
            tournaments,
            participants,
            gateway,
            registry: ViewRegistry::default(),
        }
    }

    /// One full render pass: load, group, render, reconcile, persist.
    ///
    /// Runs a second render-and-reconcile round when the first one changed
    /// the identifier list, so navigation links can resolve identifiers
    /// that were just created.
    pub async fn render_pass(&self, id: TournamentId) -> Result<(), AppError> {
        let Some(mut tournament) = self.tournaments.find_by_id(&id).await? else {
            tracing::debug!(%id, "tournament gone, skipping render pass");
            return Ok(());
        };
        let participants = self
            .participants
            .find_by_ids(&tournament.participants)
            .await?;
        let channel = self.gateway.resolve_channel(&tournament.channel_id).await?;
        let grouping = premade_grouping(&tournament.declarations, tournament.capacity);
        let handle = self.registry.handle(id).await;

        let main_id = self
            .ensure_main(&tournament, &participants, &handle, &channel)
            .await?;

        let mut state = tournament.view.clone();
        state.main = Some(main_id.clone());
        for _pass in 0..2 {
            let rendered = render_view(&tournament, &participants, &grouping, &state);
            if let Err(e) = self
                .edit_if_changed(&channel, &handle, &main_id, &rendered.main)
                .await
            {
                tracing::warn!(id = %main_id, error = %e, "could not edit main message");
            }
            let new_state = ViewState {
                main: Some(main_id.clone()),
                roster_pages: self
                    .reconcile_run(&channel, &handle, &state.roster_pages, &rendered.roster)
                    .await,
                group_pages: self
                    .reconcile_run(&channel, &handle, &state.group_pages, &rendered.groups)
                    .await,
            };
            let changed = new_state != state;
            state = new_state;
            if !changed {
                break;
            }
        }

        if state != tournament.view {
            tournament.view = state;
            self.tournaments.save(&tournament).await?;
        }
        Ok(())
    }

    /// Retire every view message of a tournament (used on deletion).
    /// Failures are logged; retirement is best-effort.
    pub async fn retire_views(&self, tournament: &Tournament) {
        let channel = match self.gateway.resolve_channel(&tournament.channel_id).await {
            Ok(channel) => channel,
            Err(e) => {
                tracing::warn!(id = %tournament.id, error = %e, "channel gone, nothing to retire");
                self.registry.remove(&tournament.id).await;
                return;
            }
        };
        for id in tournament.view.all_ids() {
            if let Err(e) = self.gateway.delete_message(&channel, &id).await {
                tracing::warn!(%id, error = %e, "could not delete view message");
            }
        }
        self.registry.remove(&tournament.id).await;
    }

    /// Resolve the main message: reuse the in-process handle, then the
    /// persisted identifier, then create (and pin) a fresh message. The
    /// first caller performs the work; concurrent callers wait for it.
    async fn ensure_main(
        &self,
        tournament: &Tournament,
        participants: &[Participant],
        handle: &Arc<ViewHandle>,
        channel: &ChannelId,
    ) -> Result<MessageId, AppError> {
        let id = handle
            .main
            .get_or_try_init(|| async {
                if let Some(persisted) = &tournament.view.main {
                    match self.gateway.fetch_message(channel, persisted).await {
                        Ok(message) => return Ok::<MessageId, AppError>(message.id),
                        Err(e) => {
                            tracing::warn!(
                                id = %persisted,
                                error = %e,
                                "persisted main message not resolvable, recreating"
                            );
                        }
                    }
                }
                let page = render_main_page(tournament, participants, &tournament.view);
                let id = self.gateway.create_message(channel, &page).await?;
                handle.cache.lock().await.insert(id.clone(), page);
                if let Err(e) = self.gateway.pin_message(channel, &id).await {
                    tracing::warn!(id = %id, error = %e, "could not pin main message");
                }
                Ok(id)
            })
            .await?;
        Ok(id.clone())
    }

    /// Edit a message only when the content differs from the last applied
    /// page. Returns whether an edit was issued.
    async fn edit_if_changed(
        &self,
        channel: &ChannelId,
        handle: &ViewHandle,
        id: &MessageId,
        page: &Page,
    ) -> Result<bool, MessagingError> {
        let unchanged = handle
            .cache
            .lock()
            .await
            .get(id)
            .map(|applied| applied == page)
            .unwrap_or(false);
        if unchanged {
            return Ok(false);
        }
        self.gateway.edit_message(channel, id, page).await?;
        handle.cache.lock().await.insert(id.clone(), page.clone());
        Ok(true)
    }

    async fn create_cached(
        &self,
        channel: &ChannelId,
        handle: &ViewHandle,
        page: &Page,
    ) -> Result<MessageId, MessagingError> {
        let id = self.gateway.create_message(channel, page).await?;
        handle.cache.lock().await.insert(id.clone(), page.clone());
        Ok(id)
    }

    /// Reconcile one run of pages against the prior identifiers of that
    /// run: edit in place, fall back to create on edit failure, create
    /// beyond the prior count, delete surplus priors.
    async fn reconcile_run(
        &self,
        channel: &ChannelId,
        handle: &ViewHandle,
        prior: &[MessageId],
        pages: &[Page],
    ) -> Vec<MessageId> {
        let mut ids = Vec::with_capacity(pages.len());
        for (index, page) in pages.iter().enumerate() {
            match prior.get(index) {
                Some(existing) => {
                    match self.edit_if_changed(channel, handle, existing, page).await {
                        Ok(_) => ids.push(existing.clone()),
                        Err(e) => {
                            tracing::warn!(
                                id = %existing,
                                error = %e,
                                "could not edit view message, creating a new one"
                            );
                            handle.cache.lock().await.remove(existing);
                            match self.create_cached(channel, handle, page).await {
                                Ok(id) => ids.push(id),
                                Err(e) => {
                                    tracing::warn!(error = %e, "could not create view message")
                                }
                            }
                        }
                    }
                }
                None => match self.create_cached(channel, handle, page).await {
                    Ok(id) => ids.push(id),
                    Err(e) => tracing::warn!(error = %e, "could not create view message"),
                },
            }
        }
        for extra in prior.iter().skip(pages.len()) {
            handle.cache.lock().await.remove(extra);
            if let Err(e) = self.gateway.delete_message(channel, extra).await {
                tracing::warn!(id = %extra, error = %e, "could not delete retired view message");
            }
        }
        ids
    }
}
