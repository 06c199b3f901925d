//! Pipeline panel session
//!
//! A [`PipelineSession`] owns the replay context and adapter of one capture and
//! keeps the snapshot of the currently selected event. Each selection change
//! issues a [`BuildTicket`]; only the result for the most recent ticket is
//! accepted, so a slow build for an old selection never overwrites a newer
//! one. A failed build keeps the previous snapshot and records a notice.

use pipestate_model::{BackendAdapter, BackendKind, EventId, PipelineSnapshot, ReplayContext, SnapshotError, capture_snapshot};
use std::sync::Arc;

/// Identifies one snapshot request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildTicket {
    event: EventId,
    generation: u64,
}

impl BuildTicket {
    pub fn event(&self) -> EventId {
        self.event
    }
}

/// Outcome of handing a build result to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The snapshot is now current
    Accepted,
    /// A newer request was issued; the result was discarded
    Stale,
    /// The build failed; the previous snapshot is kept
    Failed,
}

/// Snapshot state of one capture as seen by the pipeline panel
pub struct PipelineSession<C, A> {
    context: C,
    adapter: A,
    current: Option<Arc<PipelineSnapshot>>,
    generation: u64,
    notice: Option<String>,
}

impl<C, A> PipelineSession<C, A>
where
    C: ReplayContext,
    A: BackendAdapter<Native = C::State>,
{
    pub fn new(context: C, adapter: A) -> Self {
        Self {
            context,
            adapter,
            current: None,
            generation: 0,
            notice: None,
        }
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.context.backend_kind()
    }

    /// Snapshot of the most recently accepted event
    pub fn current(&self) -> Option<&Arc<PipelineSnapshot>> {
        self.current.as_ref()
    }

    /// Message describing the last failed build, cleared by the next accepted one
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Starts a request for `event`, superseding every earlier ticket
    pub fn begin_request(&mut self, event: EventId) -> BuildTicket {
        self.generation += 1;
        tracing::debug!(event, generation = self.generation, "Requested pipeline snapshot");
        BuildTicket {
            event,
            generation: self.generation,
        }
    }

    /// Builds the snapshot a ticket asks for
    ///
    /// Building only reads from the session, so it may run while newer
    /// requests are being issued; [`PipelineSession::complete`] decides
    /// whether the result is still wanted.
    pub fn build(&self, ticket: &BuildTicket) -> Result<PipelineSnapshot, SnapshotError> {
        capture_snapshot(&self.context, &self.adapter, ticket.event)
    }

    /// Hands the result of a build back to the session
    ///
    /// # Arguments
    /// * `ticket` - Ticket the build was started with
    /// * `result` - Outcome of [`PipelineSession::build`]
    ///
    /// # Returns
    /// Whether the result became current, was discarded as stale, or failed
    pub fn complete(&mut self, ticket: BuildTicket, result: Result<PipelineSnapshot, SnapshotError>) -> Completion {
        if ticket.generation != self.generation {
            tracing::debug!(event = ticket.event, generation = ticket.generation, latest = self.generation, "Discarded stale snapshot");
            return Completion::Stale;
        }

        match result {
            Ok(snapshot) => {
                self.accept(Arc::new(snapshot));
                Completion::Accepted
            }
            Err(e) => {
                self.reject(ticket.event, &e);
                Completion::Failed
            }
        }
    }

    /// Builds and installs the snapshot for a newly selected event
    ///
    /// # Returns
    /// * `Ok(Arc<PipelineSnapshot>)` - The new current snapshot
    /// * `Err(SnapshotError)` - If the build failed; the previous snapshot stays current
    pub fn on_event_selected(&mut self, event: EventId) -> Result<Arc<PipelineSnapshot>, SnapshotError> {
        let ticket = self.begin_request(event);
        match self.build(&ticket) {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.accept(snapshot.clone());
                Ok(snapshot)
            }
            Err(e) => {
                self.reject(event, &e);
                Err(e)
            }
        }
    }

    fn accept(&mut self, snapshot: Arc<PipelineSnapshot>) {
        tracing::info!(event = snapshot.event_id(), backend = %snapshot.backend(), "Pipeline snapshot updated");
        for report in snapshot.unsupported() {
            tracing::debug!(%report, "Snapshot has unsupported state");
        }
        self.current = Some(snapshot);
        self.notice = None;
    }

    fn reject(&mut self, event: EventId, error: &SnapshotError) {
        if error.is_recoverable() {
            tracing::warn!(event, %error, "Pipeline snapshot unavailable, keeping previous state");
        } else {
            tracing::error!(event, %error, "Pipeline snapshot failed");
        }
        self.notice = Some(format!("Event {event}: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture_log;
    use pipestate_model::gl::GlAdapter;

    fn session() -> PipelineSession<pipestate_model::capture::CaptureLog<pipestate_model::gl::GlState>, GlAdapter> {
        PipelineSession::new(fixture_log(), GlAdapter)
    }

    #[test]
    fn test_snapshots_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Arc<PipelineSnapshot>>();
    }

    #[test]
    fn test_select_event() {
        let mut session = session();
        assert!(session.current().is_none());
        assert_eq!(session.backend_kind(), BackendKind::OpenGl);

        let snapshot = session.on_event_selected(2).unwrap();
        assert_eq!(snapshot.event_id(), 2);
        assert!(Arc::ptr_eq(session.current().unwrap(), &snapshot));
        assert!(session.notice().is_none());
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut session = session();
        let old = session.begin_request(1);
        let new = session.begin_request(2);

        let old_result = session.build(&old);
        let new_result = session.build(&new);

        assert_eq!(session.complete(new, new_result), Completion::Accepted);
        assert_eq!(session.complete(old, old_result), Completion::Stale);
        assert_eq!(session.current().unwrap().event_id(), 2);
    }

    #[test]
    fn test_failed_build_keeps_previous_snapshot() {
        let mut session = session();
        session.on_event_selected(1).unwrap();

        let error = session.on_event_selected(99).unwrap_err();
        assert!(matches!(error, SnapshotError::UnknownEvent(99)));
        assert_eq!(session.current().unwrap().event_id(), 1);
        assert!(session.notice().unwrap().contains("99"));

        session.context_mut().set_ready(false);
        let ticket = session.begin_request(2);
        let result = session.build(&ticket);
        assert!(matches!(result, Err(SnapshotError::BackendUnavailable { .. })));
        assert_eq!(session.complete(ticket, result), Completion::Failed);
        assert_eq!(session.current().unwrap().event_id(), 1);

        session.context_mut().set_ready(true);
        session.on_event_selected(2).unwrap();
        assert!(session.notice().is_none());
    }
}
