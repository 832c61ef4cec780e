//! Learner progress: points, completed missions, unlocked pins and the
//! display name, persisted as one JSON object in a key-value store.

pub mod badges;
pub mod challenge;
pub mod name;
pub mod quiz;
pub mod store;
pub mod tracker;

use serde::{Deserialize, Deserializer, Serialize};

pub use badges::{pins, render_pins, Badge, PinView, COURSE_BADGE};
pub use challenge::{Challenge, ChallengeOutcome, ChallengeState};
pub use name::sanitize_name;
pub use quiz::{question_id, AnswerOutcome, QuizSession};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use tracker::{ProgressTracker, PROGRESS_KEY};

/// Insertion-ordered set of string ids.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IdSet(Vec<String>);

impl IdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id` unless present. Returns whether it was added.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|existing| existing == id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for IdSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = IdSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

// Stored lists written by older clients may contain duplicates.
impl<'de> Deserialize<'de> for IdSet {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ids = Vec::<String>::deserialize(deserializer)?;
        Ok(ids.into_iter().collect())
    }
}

/// The persisted progress object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Progress {
    #[serde(deserialize_with = "lenient_points")]
    pub points: u32,
    pub missions_completed: IdSet,
    pub badges: IdSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

/// Points written by other clients may be null, negative or fractional.
/// Such values read as the nearest valid count instead of failing the
/// whole object.
fn lenient_points<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let points = match value.as_f64() {
        Some(n) if n.is_finite() && n > 0.0 => n.min(f64::from(u32::MAX)) as u32,
        _ => 0,
    };
    Ok(points)
}
