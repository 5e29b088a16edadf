use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::jobs::types::{JobDetail, JobSummary};

/// Polling flag of a [`PollSession`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum PollState {
    #[default]
    Idle,
    Polling,
}

/// Identifies one selection of one job.
///
/// A new ticket is issued on every selection, so results requested under an
/// older ticket can be recognised as stale even when the same job id is
/// selected again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollTicket {
    job_id: String,
    cycle: u64,
}

impl PollTicket {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }
}

/// What applying a detail fetch did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailOutcome {
    /// Snapshot replaced; the job is still running.
    Updated,
    /// Snapshot replaced with a terminal status; polling was switched off.
    Terminal,
    /// Fetch failed; previous snapshot kept, error slot set.
    Failed,
    /// The ticket no longer matches the active selection; nothing written.
    Stale,
}

/// Client-local record of which job is observed and what was last seen.
///
/// Every write that carries fetched data is gated by a [`PollTicket`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct PollSession {
    active_job_id: Option<String>,
    job: Option<JobDetail>,
    jobs: Vec<JobSummary>,
    state: PollState,
    last_refresh: Option<DateTime<Utc>>,
    error: Option<String>,
    #[serde(skip)]
    cycle: u64,
}

impl PollSession {
    pub fn active_job_id(&self) -> Option<&str> {
        self.active_job_id.as_deref()
    }

    /// Last successfully fetched detail of the active job.
    pub fn job(&self) -> Option<&JobDetail> {
        self.job.as_ref()
    }

    /// Last successfully fetched history list, in backend order.
    pub fn jobs(&self) -> &[JobSummary] {
        &self.jobs
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn is_polling(&self) -> bool {
        self.state == PollState::Polling
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Ticket for the current selection, if a job is active.
    pub fn ticket(&self) -> Option<PollTicket> {
        self.active_job_id.as_ref().map(|job_id| PollTicket {
            job_id: job_id.clone(),
            cycle: self.cycle,
        })
    }

    pub fn is_current(&self, ticket: &PollTicket) -> bool {
        self.cycle == ticket.cycle && self.active_job_id.as_deref() == Some(ticket.job_id.as_str())
    }

    /// Start a new selection. Selecting a different job resets the snapshot
    /// and the error slot; reselecting the same job keeps the snapshot.
    pub(crate) fn begin(&mut self, job_id: &str) -> PollTicket {
        if self.active_job_id.as_deref() != Some(job_id) {
            self.job = None;
            self.error = None;
            self.last_refresh = None;
        }
        self.active_job_id = Some(job_id.to_string());
        self.state = PollState::Idle;
        self.cycle += 1;
        PollTicket {
            job_id: job_id.to_string(),
            cycle: self.cycle,
        }
    }

    pub(crate) fn apply_detail(
        &mut self,
        ticket: &PollTicket,
        result: Result<JobDetail, String>,
        now: DateTime<Utc>,
    ) -> DetailOutcome {
        if !self.is_current(ticket) {
            return DetailOutcome::Stale;
        }

        match result {
            Ok(detail) => {
                let terminal = detail.is_terminal();
                self.job = Some(detail);
                self.error = None;
                self.last_refresh = Some(now);
                if terminal {
                    self.state = PollState::Idle;
                    DetailOutcome::Terminal
                } else {
                    DetailOutcome::Updated
                }
            }
            Err(message) => {
                self.error = Some(message);
                DetailOutcome::Failed
            }
        }
    }

    /// Apply a list fetch. A success replaces the list without touching the
    /// error slot; a failure only sets the error slot.
    pub(crate) fn apply_list(&mut self, result: Result<Vec<JobSummary>, String>) {
        match result {
            Ok(jobs) => self.jobs = jobs,
            Err(message) => self.error = Some(message),
        }
    }

    /// Set the polling flag for the given selection only.
    pub(crate) fn set_state(&mut self, ticket: &PollTicket, state: PollState) -> bool {
        if !self.is_current(ticket) || self.state == state {
            return false;
        }
        self.state = state;
        true
    }

    pub(crate) fn stop(&mut self) -> bool {
        if self.state == PollState::Idle {
            return false;
        }
        self.state = PollState::Idle;
        true
    }

    pub(crate) fn record_error(&mut self, message: String) {
        self.error = Some(message);
    }

    /// Empty the error slot at the start of a user action.
    pub(crate) fn clear_error(&mut self) -> bool {
        self.error.take().is_some()
    }
}
