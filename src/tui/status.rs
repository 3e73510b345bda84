//! Transient status bar messages.

use std::time::{Duration, Instant};

/// A status bar message that clears itself after a while.
///
/// Used for feedback such as "Theme: light" or a failed preference save.
#[derive(Debug, Clone, Default)]
pub struct StatusMessage {
    message: Option<String>,
    set_at: Option<Instant>,
    /// None keeps the message until cleared
    auto_clear_after: Option<Duration>,
}

impl StatusMessage {
    #[must_use]
    pub const fn with_auto_clear(duration: Duration) -> Self {
        Self {
            message: None,
            set_at: None,
            auto_clear_after: Some(duration),
        }
    }

    pub fn set(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.set_at = Some(Instant::now());
    }

    pub fn clear(&mut self) {
        self.message = None;
        self.set_at = None;
    }

    /// Drop the message once it has expired. Called on every tick.
    pub fn expire(&mut self) {
        if let (Some(set_at), Some(duration)) = (self.set_at, self.auto_clear_after) {
            if set_at.elapsed() >= duration {
                self.clear();
            }
        }
    }

    /// The current message, without checking expiry.
    #[must_use]
    pub fn peek(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
