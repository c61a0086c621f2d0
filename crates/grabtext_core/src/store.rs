//! crates/grabtext_core/src/store.rs
//!
//! The in-memory session store: one `Session` per sender id, with a
//! per-sender lock so that all operations touching the same sender are
//! strictly serialized while distinct senders never block each other.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::domain::Session;

/// Maps sender ids to their sessions. Purely in-memory; sessions survive
/// only as long as the process, bounded by the idle-eviction sweep.
///
/// A dialog turn spans suspension points (catalog fetch, order
/// submission), so the per-sender `Mutex` must be held across the whole
/// read-modify-write, not just the map access. `entry` hands out the lock
/// for exactly that purpose.
#[derive(Default)]
pub struct SessionStore {
    // The outer lock guards only the map shape; it is never held across
    // an await.
    sessions: Mutex<HashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get-or-create: returns the per-sender session slot, creating a
    /// fresh `Start` session on first contact. Never a "not found" error.
    pub async fn entry(&self, sender_id: &str) -> Arc<Mutex<Session>> {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(sender_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Session::new())))
            .clone()
    }

    /// A point-in-time copy of a sender's session, if one exists.
    /// Waits its turn behind any in-flight operation on the same sender.
    pub async fn snapshot(&self, sender_id: &str) -> Option<Session> {
        let slot = {
            let sessions = self.sessions.lock().await;
            sessions.get(sender_id).cloned()
        }?;
        let session = slot.lock().await;
        Some(session.clone())
    }

    /// Removes sessions idle longer than `max_idle`. Returns the number of
    /// sessions evicted.
    ///
    /// A session is only evicted when nothing references it: a held lock
    /// means a turn mid-flight, and an `Arc` clone outside the map means a
    /// turn that fetched its slot from `entry` but has not locked it yet.
    /// Slots are only cloned under the map lock, so the strong count
    /// cannot move under the sweep.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, slot| {
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            match slot.try_lock() {
                Ok(session) => session.last_activity.elapsed() < max_idle,
                Err(_) => true,
            }
        });
        before - sessions.len()
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}
