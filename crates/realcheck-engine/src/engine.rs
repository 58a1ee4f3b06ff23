//! The UI-facing experiment API

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::registry::{SessionHandle, Sessions};
use crate::sampler::PairSampler;
use crate::session::{Session, SessionPhase, ROUNDS_PER_SESSION};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use realcheck_corpus::Corpus;
use realcheck_store::ResponseStore;
use realcheck_types::{Pair, SelectionRecord, Slot, StoredSelection, UserId};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Result of a `confirm` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The record was persisted and the round counted.
    Recorded {
        id: i64,
        record: SelectionRecord,
        round_count: u32,
        phase: SessionPhase,
    },
    /// The session had already completed; nothing happened.
    AlreadyCompleted { round_count: u32 },
}

impl ConfirmOutcome {
    pub fn round_count(&self) -> u32 {
        match self {
            Self::Recorded { round_count, .. } | Self::AlreadyCompleted { round_count } => {
                *round_count
            }
        }
    }

    pub fn is_completed(&self) -> bool {
        match self {
            Self::Recorded { phase, .. } => *phase == SessionPhase::Completed,
            Self::AlreadyCompleted { .. } => true,
        }
    }
}

/// The pair awaiting a selection and the round it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRound {
    /// 1-based
    pub round: u32,
    pub pair: Pair,
}

/// Snapshot of a session for status displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub user_id: UserId,
    pub round_count: u32,
    pub rounds_total: u32,
    pub phase: SessionPhase,
    pub completed: bool,
    pub curated_seen: usize,
    pub curated_remaining: usize,
}

impl SessionStatus {
    pub fn new(session: &Session, corpus: &Corpus) -> Self {
        Self {
            user_id: session.user_id().clone(),
            round_count: session.round_count(),
            rounds_total: ROUNDS_PER_SESSION,
            phase: session.phase(),
            completed: session.is_completed(),
            curated_seen: session.exposure().len(),
            curated_remaining: corpus.remaining_curated(session.exposure()),
        }
    }
}

/// Experiment engine: corpus, sampler, store and live sessions.
pub struct ExperimentEngine {
    sampler: PairSampler,
    store: Arc<dyn ResponseStore>,
    sessions: Sessions,
    config: EngineConfig,
    seeder: Mutex<StdRng>,
}

impl ExperimentEngine {
    pub fn new(corpus: Arc<Corpus>, store: Arc<dyn ResponseStore>, config: EngineConfig) -> Self {
        let seeder = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            sampler: PairSampler::new(corpus),
            store,
            sessions: Sessions::new(),
            config,
            seeder: Mutex::new(seeder),
        }
    }

    /// Prepare the response store. Idempotent.
    pub async fn init(&self) -> EngineResult<()> {
        self.store.init_schema().await?;
        Ok(())
    }

    pub fn corpus(&self) -> &Corpus {
        self.sampler.corpus()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    /// Build a detached session with its own random source.
    pub fn new_session(&self, user_id: UserId) -> Session {
        let seed = {
            let mut seeder = self
                .seeder
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            seeder.gen::<u64>()
        };
        Session::seeded(user_id, seed)
    }

    /// Start and register a session under a fresh random user id.
    pub async fn start_session(&self) -> UserId {
        let user_id = UserId::generate();
        self.sessions.insert(self.new_session(user_id.clone())).await;
        info!(user_id = %user_id, "Session started");
        user_id
    }

    async fn session(&self, user_id: &UserId) -> EngineResult<SessionHandle> {
        self.sessions
            .get(user_id)
            .await
            .ok_or_else(|| EngineError::UnknownSession(user_id.clone()))
    }

    /// The pair to show `user_id`. `None` once the session has completed.
    pub async fn current_pair(&self, user_id: &UserId) -> EngineResult<Option<Pair>> {
        Ok(self.current_round(user_id).await?.map(|round| round.pair))
    }

    /// The pair to show together with its 1-based round number, read under
    /// one session lock.
    pub async fn current_round(&self, user_id: &UserId) -> EngineResult<Option<PendingRound>> {
        let handle = self.session(user_id).await?;
        let mut session = handle.lock().await;
        session.touch();
        let round = session.round_count() + 1;
        Ok(self
            .current_pair_for(&mut session)?
            .cloned()
            .map(|pair| PendingRound { round, pair }))
    }

    pub fn current_pair_for<'s>(&self, session: &'s mut Session) -> EngineResult<Option<&'s Pair>> {
        let round = session.round_count() + 1;
        let user_id = session.user_id().clone();
        let pair = session.current_pair(&self.sampler).map_err(|err| {
            warn!(user_id = %user_id, round, error = %err, "No pair available");
            err
        })?;
        if let Some(pair) = pair {
            debug!(
                round,
                real_id = %pair.real().id(),
                synthetic_id = %pair.synthetic().id(),
                real_slot = ?pair.real_slot(),
                "Pair ready"
            );
        }
        Ok(pair)
    }

    /// Confirm `choice` for the pending pair of `user_id`.
    pub async fn confirm(
        &self,
        user_id: &UserId,
        choice: Option<Slot>,
    ) -> EngineResult<ConfirmOutcome> {
        let handle = self.session(user_id).await?;
        let mut session = handle.lock().await;
        session.touch();
        self.confirm_for(&mut session, choice).await
    }

    /// Confirm `choice` on an explicit session value.
    ///
    /// On a store failure the error is returned; whether the round still
    /// counts depends on [`EngineConfig::advance_on_persist_failure`].
    pub async fn confirm_for(
        &self,
        session: &mut Session,
        choice: Option<Slot>,
    ) -> EngineResult<ConfirmOutcome> {
        if session.is_completed() {
            return Ok(ConfirmOutcome::AlreadyCompleted {
                round_count: session.round_count(),
            });
        }

        let record = session.select(choice)?;
        match self.store.append(&record).await {
            Ok(id) => {
                let phase = session.advance(&record, self.sampler.corpus());
                info!(
                    user_id = %session.user_id(),
                    round = session.round_count(),
                    id,
                    selected_real = record.selected_real,
                    "Selection recorded"
                );
                if phase == SessionPhase::Completed {
                    info!(user_id = %session.user_id(), "Session completed");
                }
                Ok(ConfirmOutcome::Recorded {
                    id,
                    record,
                    round_count: session.round_count(),
                    phase,
                })
            }
            Err(err) => {
                let advanced = self.config.advance_on_persist_failure;
                if advanced {
                    session.advance(&record, self.sampler.corpus());
                }
                warn!(
                    user_id = %session.user_id(),
                    round = session.round_count(),
                    advanced,
                    error = %err,
                    "Failed to persist selection"
                );
                Err(err.into())
            }
        }
    }

    pub async fn is_completed(&self, user_id: &UserId) -> EngineResult<bool> {
        let handle = self.session(user_id).await?;
        let session = handle.lock().await;
        Ok(session.is_completed())
    }

    pub async fn status(&self, user_id: &UserId) -> EngineResult<SessionStatus> {
        let handle = self.session(user_id).await?;
        let session = handle.lock().await;
        Ok(SessionStatus::new(&session, self.corpus()))
    }

    /// Drop the session. Its exposure set is discarded.
    pub async fn end_session(&self, user_id: &UserId) -> EngineResult<SessionStatus> {
        let handle = self
            .sessions
            .remove(user_id)
            .await
            .ok_or_else(|| EngineError::UnknownSession(user_id.clone()))?;
        let session = handle.lock().await;
        info!(user_id = %user_id, round = session.round_count(), "Session ended");
        Ok(SessionStatus::new(&session, self.corpus()))
    }

    /// Drop sessions that have been idle too long or completed a while ago.
    pub async fn evict_expired(&self) -> usize {
        self.evict_expired_at(Utc::now()).await
    }

    pub async fn evict_expired_at(&self, now: DateTime<Utc>) -> usize {
        let evicted = self
            .sessions
            .evict_expired(
                now,
                self.config.session_idle_ttl(),
                self.config.completed_grace(),
            )
            .await;
        if evicted > 0 {
            info!(evicted, "Evicted expired sessions");
        }
        evicted
    }

    /// Every stored selection in insertion order.
    pub async fn export_all(&self) -> EngineResult<Vec<StoredSelection>> {
        Ok(self.store.query_all().await?)
    }
}
