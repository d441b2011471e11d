//! Live-scan deduplication session.
//!
//! A code held in front of the camera is decoded on every frame. The session
//! remembers which URL payloads already had their actions dispatched so the
//! same link is not reopened many times per second. Other categories are
//! never suppressed: their actions are display-only or confirmation-gated.
//!
//! Create one when live scanning starts and drop it when it ends. Image
//! scans never use a session.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::pipeline::types::{Category, Payload};

/// Payload texts already actioned during one live session.
///
/// Membership only grows for the lifetime of the session.
#[derive(Debug, Clone)]
pub struct DedupSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    dispatched: HashSet<String>,
}

impl DedupSession {
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        debug!(session = %id, "Live scan session started");
        Self {
            id,
            started_at: Utc::now(),
            dispatched: HashSet::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Whether actions for `payload` should go out.
    ///
    /// Only `Url` payloads seen earlier in this session are held back.
    pub fn should_dispatch(&self, payload: &Payload, category: Category) -> bool {
        category != Category::Url || !self.dispatched.contains(payload.text())
    }

    /// Record that `payload` had its actions dispatched.
    pub fn mark_dispatched(&mut self, payload: &Payload) {
        if self.dispatched.insert(payload.text().to_string()) {
            debug!(
                session = %self.id,
                tracked = self.dispatched.len(),
                "Payload marked as dispatched"
            );
        }
    }

    pub fn contains(&self, payload: &Payload) -> bool {
        self.dispatched.contains(payload.text())
    }

    /// Number of distinct payloads dispatched so far.
    pub fn len(&self) -> usize {
        self.dispatched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dispatched.is_empty()
    }
}

impl Default for DedupSession {
    fn default() -> Self {
        Self::new()
    }
}
