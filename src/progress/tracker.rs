use tracing::{debug, warn};

use crate::error::NameError;
use crate::progress::name::sanitize_name;
use crate::progress::store::KeyValueStore;
use crate::progress::Progress;

/// Storage key of the progress object.
pub const PROGRESS_KEY: &str = "progress";

/// Read-modify-write operations over the persisted [`Progress`].
///
/// Storage failures never reach the caller: reads fall back to the default
/// progress and failed writes are logged and dropped.
#[derive(Debug)]
pub struct ProgressTracker<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ProgressTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Current progress, or the default shape when nothing valid is stored.
    pub fn load(&self) -> Progress {
        let raw = match self.store.get(PROGRESS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Progress::default(),
            Err(e) => {
                warn!(error = %e, "could not read progress, using defaults");
                return Progress::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "stored progress is corrupt, using defaults");
            Progress::default()
        })
    }

    /// Persists `progress`. Returns whether the write succeeded.
    pub fn save(&mut self, progress: &Progress) -> bool {
        let json = match serde_json::to_string(progress) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "could not serialize progress");
                return false;
            }
        };
        match self.store.set(PROGRESS_KEY, &json) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "could not save progress");
                false
            }
        }
    }

    /// Loads, applies `f`, and saves only if the progress changed.
    pub fn mutate<T>(&mut self, f: impl FnOnce(&mut Progress) -> T) -> T {
        let mut progress = self.load();
        let before = progress.clone();
        let out = f(&mut progress);
        if progress != before {
            self.save(&progress);
        }
        out
    }

    /// Adds points and returns the new total.
    pub fn add_points(&mut self, amount: u32) -> u32 {
        self.mutate(|p| {
            p.points = p.points.saturating_add(amount);
            p.points
        })
    }

    /// Records a completed mission. Returns whether it was new.
    pub fn mark_mission_complete(&mut self, mission_key: &str) -> bool {
        self.mutate(|p| p.missions_completed.insert(mission_key))
    }

    /// Unlocks a badge. Returns `true` only the first time for each id, which
    /// callers use to gate one-time effects.
    pub fn unlock_badge(&mut self, badge_id: &str) -> bool {
        let unlocked = self.mutate(|p| p.badges.insert(badge_id));
        if unlocked {
            debug!(badge = badge_id, "badge unlocked");
        }
        unlocked
    }

    pub fn user_name(&self) -> Option<String> {
        self.load().user_name
    }

    pub fn needs_name(&self) -> bool {
        self.user_name().is_none()
    }

    /// Sanitizes and stores the display name. Rejected names leave the
    /// stored progress untouched.
    pub fn set_user_name(&mut self, raw: &str) -> Result<String, NameError> {
        let name = sanitize_name(raw)?;
        self.mutate(|p| p.user_name = Some(name.clone()));
        Ok(name)
    }

    /// Wipes all persisted state, quiz progress included.
    pub fn clear_all(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "could not clear storage");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::store::MemoryStore;

    #[test]
    fn unlock_badge_is_true_exactly_once() {
        let mut tracker = ProgressTracker::new(MemoryStore::new());
        assert!(tracker.unlock_badge("mision_1"));
        assert_eq!(tracker.load().badges.as_slice(), &["mision_1".to_string()]);
        assert!(!tracker.unlock_badge("mision_1"));
        assert_eq!(tracker.load().badges.len(), 1);
    }

    #[test]
    fn any_unlock_sequence_keeps_ids_unique() {
        let mut tracker = ProgressTracker::new(MemoryStore::new());
        let sequence = ["a", "b", "a", "c", "b", "b", "d", "a", "c"];
        let mut trues = Vec::new();
        for id in sequence {
            if tracker.unlock_badge(id) {
                trues.push(id);
            }
        }
        assert_eq!(trues, vec!["a", "b", "c", "d"]);
        let badges = tracker.load().badges;
        assert_eq!(badges.len(), 4);
    }

    #[test]
    fn corrupt_progress_loads_as_default() {
        let mut store = MemoryStore::new();
        store.set(PROGRESS_KEY, "{not json").expect("set");
        let tracker = ProgressTracker::new(store);
        assert_eq!(tracker.load(), Progress::default());
    }

    #[test]
    fn write_failures_are_swallowed() {
        let mut tracker = ProgressTracker::new(MemoryStore::with_quota(4));
        assert!(tracker.unlock_badge("mision_1"));
        assert_eq!(tracker.load(), Progress::default());
    }

    #[test]
    fn points_and_missions_accumulate() {
        let mut tracker = ProgressTracker::new(MemoryStore::new());
        assert_eq!(tracker.add_points(10), 10);
        assert_eq!(tracker.add_points(5), 15);
        assert!(tracker.mark_mission_complete("mision-1"));
        assert!(!tracker.mark_mission_complete("mision-1"));
        let progress = tracker.load();
        assert_eq!(progress.points, 15);
        assert_eq!(progress.missions_completed.len(), 1);
    }

    #[test]
    fn rejected_names_are_not_stored() {
        let mut tracker = ProgressTracker::new(MemoryStore::new());
        assert!(tracker.needs_name());
        assert!(tracker.set_user_name("<i></i>").is_err());
        assert!(tracker.needs_name());
        assert_eq!(tracker.set_user_name("<b>Sara</b>").unwrap(), "Sara");
        assert_eq!(tracker.user_name().as_deref(), Some("Sara"));
    }

    #[test]
    fn clear_all_resets_progress() {
        let mut tracker = ProgressTracker::new(MemoryStore::new());
        tracker.unlock_badge("mision_2");
        tracker.clear_all();
        assert_eq!(tracker.load(), Progress::default());
    }
}
