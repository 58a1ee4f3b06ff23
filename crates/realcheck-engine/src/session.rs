use crate::error::{EngineError, EngineResult};
use crate::sampler::PairSampler;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use realcheck_corpus::Corpus;
use realcheck_types::{ExposureSet, Pair, SelectionRecord, Slot, UserId};
use serde::Serialize;
use std::fmt;

/// Confirmed rounds after which a session completes.
pub const ROUNDS_PER_SESSION: u32 = 10;

/// Externally visible session state.
///
/// `Submitted` is never observable: a confirmed round resolves straight to
/// `AwaitingPair` or `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    AwaitingPair,
    AwaitingSelection,
    Completed,
}

#[derive(Debug, Clone)]
enum State {
    AwaitingPair,
    AwaitingSelection(Pair),
    Completed,
}

/// One participant's run through the experiment.
///
/// Interaction within a session is strictly sequential, so a session has no
/// internal locking; the [`crate::Sessions`] registry serializes access.
pub struct Session {
    user_id: UserId,
    round_count: u32,
    exposure: ExposureSet,
    state: State,
    rng: Box<dyn RngCore + Send>,
    last_seen: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("round_count", &self.round_count)
            .field("exposure", &self.exposure)
            .field("state", &self.state)
            .field("last_seen", &self.last_seen)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session drawing from `rng`.
    pub fn with_rng(user_id: UserId, rng: Box<dyn RngCore + Send>) -> Self {
        Self {
            user_id,
            round_count: 0,
            exposure: ExposureSet::new(),
            state: State::AwaitingPair,
            rng,
            last_seen: Utc::now(),
            completed_at: None,
        }
    }

    pub fn seeded(user_id: UserId, seed: u64) -> Self {
        Self::with_rng(user_id, Box::new(StdRng::seed_from_u64(seed)))
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn round_count(&self) -> u32 {
        self.round_count
    }

    pub fn exposure(&self) -> &ExposureSet {
        &self.exposure
    }

    /// Time of the last participant interaction.
    pub fn last_seen(&self) -> DateTime<Utc> {
        self.last_seen
    }

    pub fn touch(&mut self) {
        self.touch_at(Utc::now());
    }

    pub fn touch_at(&mut self, now: DateTime<Utc>) {
        self.last_seen = now;
    }

    /// Whether the session may be dropped at `now`: idle for at least
    /// `idle_ttl`, or completed at least `completed_grace` ago.
    pub fn is_expired(
        &self,
        now: DateTime<Utc>,
        idle_ttl: Duration,
        completed_grace: Duration,
    ) -> bool {
        let completed_out = self
            .completed_at
            .is_some_and(|completed_at| now - completed_at >= completed_grace);
        completed_out || now - self.last_seen >= idle_ttl
    }

    pub fn phase(&self) -> SessionPhase {
        match self.state {
            State::AwaitingPair => SessionPhase::AwaitingPair,
            State::AwaitingSelection(_) => SessionPhase::AwaitingSelection,
            State::Completed => SessionPhase::Completed,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, State::Completed)
    }

    /// The pair currently awaiting a selection, if any. Never samples.
    pub fn pending_pair(&self) -> Option<&Pair> {
        match &self.state {
            State::AwaitingSelection(pair) => Some(pair),
            _ => None,
        }
    }

    /// The pair to show, sampling a fresh one when none is cached.
    ///
    /// Returns `None` once completed. A sampling failure leaves the session
    /// in `AwaitingPair`.
    pub fn current_pair(&mut self, sampler: &PairSampler) -> EngineResult<Option<&Pair>> {
        if matches!(self.state, State::AwaitingPair) {
            let pair = sampler.next_pair(&self.exposure, &mut *self.rng)?;
            self.state = State::AwaitingSelection(pair);
        }
        Ok(self.pending_pair())
    }

    /// Validate `choice` against the pending pair and build its record.
    ///
    /// Does not change the session.
    pub fn select(&self, choice: Option<Slot>) -> EngineResult<SelectionRecord> {
        let pair = self.pending_pair().ok_or(EngineError::NoSelection)?;
        let choice = choice.ok_or(EngineError::NoSelection)?;
        Ok(SelectionRecord::from_choice(
            self.user_id.clone(),
            pair,
            choice,
        ))
    }

    /// Resolve a submitted round.
    ///
    /// Adds the round's real example to the exposure set when it is curated,
    /// counts the round, and moves to `Completed` or back to `AwaitingPair`.
    /// Ignored unless a pair is pending.
    pub(crate) fn advance(&mut self, record: &SelectionRecord, corpus: &Corpus) -> SessionPhase {
        if !matches!(self.state, State::AwaitingSelection(_)) {
            return self.phase();
        }

        if corpus.is_curated(&record.real_example_id) {
            self.exposure.insert(record.real_example_id.clone());
        }
        self.round_count += 1;
        self.state = if self.round_count >= ROUNDS_PER_SESSION {
            self.completed_at = Some(Utc::now());
            State::Completed
        } else {
            State::AwaitingPair
        };
        self.phase()
    }
}
