use uom::si::{f64::Time, time::second};

/// How long an advisory stays on screen.
pub const WARNING_DURATION_SECONDS: f64 = 1.0;

/// A transient advisory message with a deferred clear.
///
/// Showing a message sets a deadline `duration` after `now`; the message is
/// cleared by the first [`poll`](WarningBanner::poll) at or after that
/// deadline. Showing again before expiry replaces the message and restarts
/// the deadline, so overlapping clears cannot cut the new message short.
///
/// Nothing clears the banner between polls. While the frame loop is
/// cancelled an expired message stays visible; the first frame after a
/// restart clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct WarningBanner {
    active: Option<Active>,
    duration: Time,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Active {
    message: &'static str,
    expires_at: Time,
}

impl WarningBanner {
    /// Creates an empty banner whose messages last `duration`.
    #[must_use]
    pub fn new(duration: Time) -> Self {
        Self {
            active: None,
            duration,
        }
    }

    /// Shows `message` from `now`, replacing any current message.
    pub fn show(&mut self, message: &'static str, now: Time) {
        self.active = Some(Active {
            message,
            expires_at: now + self.duration,
        });
    }

    /// Clears the message if its deadline has passed.
    ///
    /// Returns `true` if a message was cleared by this call.
    pub fn poll(&mut self, now: Time) -> bool {
        match self.active {
            Some(active) if now >= active.expires_at => {
                self.active = None;
                true
            }
            _ => false,
        }
    }

    /// Removes the message immediately.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// The message on screen, or an empty string.
    #[must_use]
    pub fn text(&self) -> &'static str {
        self.active.map_or("", |active| active.message)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

impl Default for WarningBanner {
    fn default() -> Self {
        Self::new(Time::new::<second>(WARNING_DURATION_SECONDS))
    }
}
