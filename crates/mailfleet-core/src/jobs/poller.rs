//! Job poll controller and job list refresher.
//!
//! The controller observes one job at a time. Selecting a job fetches its
//! detail immediately and, while the status is non-terminal, re-fetches it on
//! a fixed cadence from a single spawned timer task. The timer task's handle
//! is the only scheduling resource; it is aborted before every rearm, on
//! [`JobPollController::stop_polling`] and when the controller is dropped.
//!
//! ```text
//! IDLE    --select_job, status non-terminal-->  POLLING
//! IDLE    --select_job, status terminal------>  IDLE
//! POLLING --tick, status terminal------------>  IDLE
//! POLLING --select_job(other)---------------->  cancel, then as above
//! POLLING --stop_polling / drop-------------->  IDLE
//! ```
//!
//! Each tick also refreshes the bounded job history list, which has no timer
//! of its own.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::JobsConfig;
use crate::jobs::errors::JobError;
use crate::jobs::ports::JobsApi;
use crate::jobs::session::{DetailOutcome, PollSession, PollState, PollTicket};

type SessionCell = watch::Sender<PollSession>;

/// Shortest cadence the timer accepts; `tokio::time::interval` rejects zero.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

pub struct JobPollController<A: JobsApi + 'static> {
    api: Arc<A>,
    session: Arc<SessionCell>,
    interval: Duration,
    history_limit: usize,
    timer: Option<JoinHandle<()>>,
}

impl<A: JobsApi + 'static> JobPollController<A> {
    /// Intervals below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn new(api: Arc<A>, interval: Duration, history_limit: usize) -> Self {
        if interval < MIN_POLL_INTERVAL {
            warn!(
                event = "core.jobs.interval_clamped",
                requested = ?interval,
                interval = ?MIN_POLL_INTERVAL
            );
        }
        let (session, _) = watch::channel(PollSession::default());
        Self {
            api,
            session: Arc::new(session),
            interval: interval.max(MIN_POLL_INTERVAL),
            history_limit,
            timer: None,
        }
    }

    pub fn from_config(api: Arc<A>, config: &JobsConfig) -> Self {
        Self::new(api, config.poll_interval(), config.history_limit())
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Receiver notified after every session write.
    pub fn subscribe(&self) -> watch::Receiver<PollSession> {
        self.session.subscribe()
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> PollSession {
        self.session.borrow().clone()
    }

    pub fn is_polling(&self) -> bool {
        self.session.borrow().is_polling()
    }

    /// Whether a timer task is scheduled and has not finished.
    pub fn is_timer_armed(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    /// Initial list fetch when the view is first shown.
    pub async fn activate(&self) {
        info!(event = "core.jobs.view_activated", limit = self.history_limit);
        fetch_list(self.api.as_ref(), &self.session, self.history_limit).await;
    }

    /// Fetch the job history list. Failures land in the error slot.
    pub async fn fetch_list(&self, limit: usize) {
        fetch_list(self.api.as_ref(), &self.session, limit).await;
    }

    /// Start observing `job_id`, cancelling whatever was observed before.
    ///
    /// Returns the polling state after the initial fetch. A failed initial
    /// fetch still arms the timer; the failure is in the error slot and the
    /// next tick retries.
    pub async fn select_job(&mut self, job_id: &str) -> Result<PollState, JobError> {
        let job_id = job_id.trim();
        if job_id.is_empty() {
            update(&self.session, |s| s.record_error(JobError::EmptyJobId.to_string()));
            return Err(JobError::EmptyJobId);
        }

        self.cancel_timer();
        let ticket = update(&self.session, |s| {
            s.stop();
            s.begin(job_id)
        });

        info!(event = "core.jobs.select_started", job_id = job_id);

        let outcome = fetch_detail(self.api.as_ref(), &self.session, &ticket).await;
        fetch_list(self.api.as_ref(), &self.session, self.history_limit).await;

        let state = match outcome {
            DetailOutcome::Terminal | DetailOutcome::Stale => PollState::Idle,
            DetailOutcome::Updated | DetailOutcome::Failed => {
                self.arm_timer(ticket);
                PollState::Polling
            }
        };

        info!(
            event = "core.jobs.select_completed",
            job_id = job_id,
            polling = state == PollState::Polling
        );

        Ok(state)
    }

    /// Cancel the repeating timer. Safe to call when nothing is armed.
    pub fn stop_polling(&mut self) {
        let was_armed = self.cancel_timer();
        let changed = update(&self.session, PollSession::stop);
        if was_armed || changed {
            info!(event = "core.jobs.polling_stopped");
        }
    }

    /// Out-of-band fetch of the job list and, if a job is active, its detail.
    ///
    /// Starts from an empty error slot. Does not arm the timer. A terminal
    /// status observed here disarms it, exactly as a tick would.
    pub async fn refresh_now(&mut self) {
        self.clear_error();
        let ticket = self.session.borrow().ticket();
        info!(
            event = "core.jobs.refresh_started",
            job_id = ticket.as_ref().map(PollTicket::job_id)
        );

        fetch_list(self.api.as_ref(), &self.session, self.history_limit).await;

        if let Some(ticket) = ticket
            && fetch_detail(self.api.as_ref(), &self.session, &ticket).await
                == DetailOutcome::Terminal
        {
            self.cancel_timer();
        }
    }

    /// Tear the view down: no tick fires after this returns.
    pub fn shutdown(&mut self) {
        self.stop_polling();
        debug!(event = "core.jobs.controller_shutdown");
    }

    pub(crate) fn record_error(&self, message: String) {
        update(&self.session, |s| s.record_error(message));
    }

    pub(crate) fn clear_error(&self) {
        self.session.send_if_modified(PollSession::clear_error);
    }

    fn arm_timer(&mut self, ticket: PollTicket) {
        self.cancel_timer();
        update(&self.session, |s| s.set_state(&ticket, PollState::Polling));

        debug!(
            event = "core.jobs.timer_armed",
            job_id = ticket.job_id(),
            interval = ?self.interval
        );

        self.timer = Some(tokio::spawn(run_timer(
            Arc::clone(&self.api),
            Arc::clone(&self.session),
            ticket,
            self.interval,
            self.history_limit,
        )));
    }

    /// Abort the timer task. Returns whether a live timer was cancelled.
    fn cancel_timer(&mut self) -> bool {
        match self.timer.take() {
            Some(timer) => {
                let live = !timer.is_finished();
                timer.abort();
                live
            }
            None => false,
        }
    }
}

impl<A: JobsApi + 'static> Drop for JobPollController<A> {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

async fn run_timer<A: JobsApi + ?Sized>(
    api: Arc<A>,
    session: Arc<SessionCell>,
    ticket: PollTicket,
    interval: Duration,
    history_limit: usize,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let outcome = fetch_detail(api.as_ref(), &session, &ticket).await;
        if outcome == DetailOutcome::Stale {
            debug!(event = "core.jobs.timer_superseded", job_id = ticket.job_id());
            return;
        }

        fetch_list(api.as_ref(), &session, history_limit).await;

        info!(
            event = "core.jobs.poll_tick_completed",
            job_id = ticket.job_id(),
            terminal = outcome == DetailOutcome::Terminal
        );

        if outcome == DetailOutcome::Terminal {
            debug!(event = "core.jobs.timer_disarmed", job_id = ticket.job_id());
            return;
        }
    }
}

async fn fetch_detail<A: JobsApi + ?Sized>(
    api: &A,
    session: &SessionCell,
    ticket: &PollTicket,
) -> DetailOutcome {
    let result = api.get_job(ticket.job_id()).await.map_err(|e| {
        warn!(
            event = "core.jobs.detail_fetch_failed",
            job_id = ticket.job_id(),
            error = %e
        );
        e.to_string()
    });
    let status = result.as_ref().ok().map(|detail| detail.status.clone());

    let outcome = update(session, |s| s.apply_detail(ticket, result, Utc::now()));

    match outcome {
        DetailOutcome::Terminal => info!(
            event = "core.jobs.job_terminal",
            job_id = ticket.job_id(),
            status = ?status
        ),
        DetailOutcome::Stale => debug!(
            event = "core.jobs.stale_result_discarded",
            job_id = ticket.job_id()
        ),
        DetailOutcome::Updated | DetailOutcome::Failed => debug!(
            event = "core.jobs.detail_fetched",
            job_id = ticket.job_id(),
            status = ?status
        ),
    }

    outcome
}

async fn fetch_list<A: JobsApi + ?Sized>(api: &A, session: &SessionCell, limit: usize) {
    let result = api.list_jobs(limit).await.map_err(|e| {
        warn!(event = "core.jobs.list_fetch_failed", limit = limit, error = %e);
        e.to_string()
    });
    if let Ok(jobs) = &result {
        debug!(event = "core.jobs.list_fetched", count = jobs.len());
    }
    update(session, |s| s.apply_list(result));
}

/// Run `f` against the session and notify subscribers.
fn update<R>(session: &SessionCell, f: impl FnOnce(&mut PollSession) -> R) -> R {
    let mut out = None;
    session.send_modify(|s| out = Some(f(s)));
    out.expect("send_modify runs the closure exactly once")
}
