//! Host-driven frame loop with cancellation.
//!
//! The host owns the display refresh: it asks for a frame, and some time later
//! calls back with a timestamp. [`FrameLoop`] hands out a [`FrameRequest`] for
//! each pending callback. Only the latest request is honored, so a callback
//! that arrives after [`cancel`](FrameLoop::cancel) or after a restart does
//! nothing.

use tracing::trace;
use uom::si::{f64::Time, time::second};

use crate::{audio::AudioSink, dashboard::Dashboard, session::Session};

/// Identifies one pending host frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(u64);

impl FrameRequest {
    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// What a honored frame produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutcome {
    /// Display values after the frame.
    pub dashboard: Dashboard,

    /// The request the host should schedule next.
    pub next: FrameRequest,
}

/// Owns a [`Session`] and the single pending frame request.
#[derive(Debug)]
pub struct FrameLoop<A = ()> {
    session: Session<A>,
    pending: Option<FrameRequest>,
    next_id: u64,
}

impl<A: AudioSink> FrameLoop<A> {
    /// Wraps `session` in a stopped loop.
    #[must_use]
    pub fn new(session: Session<A>) -> Self {
        Self {
            session,
            pending: None,
            next_id: 0,
        }
    }

    /// Starts (or restarts) the loop and returns the first request.
    ///
    /// The next honored frame only records its timestamp, so time spent
    /// stopped is never integrated.
    pub fn start(&mut self) -> FrameRequest {
        self.session.reset_frame_clock();
        self.issue()
    }

    /// Handles the host callback for `request` at `timestamp`.
    ///
    /// Returns `None` without touching the session if `request` is stale or
    /// the loop was cancelled.
    pub fn on_frame(&mut self, request: FrameRequest, timestamp: Time) -> Option<FrameOutcome> {
        if self.pending != Some(request) {
            trace!(
                request = request.id(),
                t = timestamp.get::<second>(),
                "ignoring cancelled frame"
            );
            return None;
        }

        self.session.frame(timestamp);
        Some(FrameOutcome {
            dashboard: self.session.dashboard(),
            next: self.issue(),
        })
    }

    /// Drops the pending request. Later callbacks are ignored.
    ///
    /// The session is frozen while cancelled, including its warning banner;
    /// an advisory that expires in the meantime clears on the first frame
    /// after [`start`](FrameLoop::start).
    pub fn cancel(&mut self) {
        if let Some(request) = self.pending.take() {
            trace!(request = request.id(), "frame loop cancelled");
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn session(&self) -> &Session<A> {
        &self.session
    }

    /// Mutable access for input handlers between frames.
    pub fn session_mut(&mut self) -> &mut Session<A> {
        &mut self.session
    }

    #[must_use]
    pub fn into_session(self) -> Session<A> {
        self.session
    }

    fn issue(&mut self) -> FrameRequest {
        self.next_id += 1;
        let request = FrameRequest(self.next_id);
        self.pending = Some(request);
        request
    }
}
