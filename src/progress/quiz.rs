use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use crate::content::quiz_storage_key;
use crate::progress::store::KeyValueStore;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionState {
    #[serde(default)]
    pub answered: bool,
}

/// Id of the question at `index` on a mission page.
pub fn question_id(index: usize) -> String {
    format!("question-{index}")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// First correct answer for the question. `all_answered` is set once
    /// every question on the page is answered, which unlocks the challenge.
    Correct { all_answered: bool },
    /// Wrong answer: transient feedback only, nothing persisted.
    Incorrect,
    /// The question was answered before; the click is ignored.
    AlreadyAnswered,
}

/// Quiz state of one mission page. Each question goes from unanswered to
/// answered exactly once and stays answered until storage is cleared.
#[derive(Clone, Debug)]
pub struct QuizSession {
    storage_key: String,
    total_questions: usize,
    answered: BTreeMap<String, QuestionState>,
}

impl QuizSession {
    /// Restores the saved state of `mission_id`'s quiz. Unreadable state is
    /// logged and treated as empty.
    pub fn restore<S: KeyValueStore>(store: &S, mission_id: u32, total_questions: usize) -> Self {
        let storage_key = quiz_storage_key(mission_id);
        let answered = match store.get(&storage_key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(key = %storage_key, error = %e, "quiz progress is corrupt, starting over");
                BTreeMap::new()
            }),
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                warn!(key = %storage_key, error = %e, "could not load quiz progress");
                BTreeMap::new()
            }
        };

        Self {
            storage_key,
            total_questions,
            answered,
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    pub fn is_answered(&self, index: usize) -> bool {
        self.answered
            .get(&question_id(index))
            .is_some_and(|state| state.answered)
    }

    pub fn answered_count(&self) -> usize {
        (0..self.total_questions)
            .filter(|i| self.is_answered(*i))
            .count()
    }

    /// A page without questions counts as fully answered.
    pub fn all_answered(&self) -> bool {
        self.answered_count() == self.total_questions
    }

    /// Handles a click on an answer of question `index`.
    pub fn answer<S: KeyValueStore>(
        &mut self,
        store: &mut S,
        index: usize,
        correct: bool,
    ) -> AnswerOutcome {
        if self.is_answered(index) {
            return AnswerOutcome::AlreadyAnswered;
        }
        if !correct {
            return AnswerOutcome::Incorrect;
        }

        self.answered
            .insert(question_id(index), QuestionState { answered: true });
        self.persist(store);

        AnswerOutcome::Correct {
            all_answered: self.all_answered(),
        }
    }

    fn persist<S: KeyValueStore>(&self, store: &mut S) {
        let json = match serde_json::to_string(&self.answered) {
            Ok(json) => json,
            Err(e) => {
                warn!(key = %self.storage_key, error = %e, "could not serialize quiz progress");
                return;
            }
        };
        if let Err(e) = store.set(&self.storage_key, &json) {
            warn!(key = %self.storage_key, error = %e, "could not save quiz progress");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::store::MemoryStore;

    #[test]
    fn second_click_does_not_double_append() {
        let mut store = MemoryStore::new();
        let mut quiz = QuizSession::restore(&store, 1, 2);

        assert_eq!(
            quiz.answer(&mut store, 0, true),
            AnswerOutcome::Correct { all_answered: false }
        );
        assert_eq!(quiz.answer(&mut store, 0, true), AnswerOutcome::AlreadyAnswered);

        let saved: BTreeMap<String, QuestionState> =
            serde_json::from_str(&store.get("quizProgress-mision1").unwrap().unwrap()).unwrap();
        assert_eq!(saved.len(), 1);
        assert!(saved["question-0"].answered);
    }

    #[test]
    fn wrong_answers_change_nothing() {
        let mut store = MemoryStore::new();
        let mut quiz = QuizSession::restore(&store, 2, 1);
        assert_eq!(quiz.answer(&mut store, 0, false), AnswerOutcome::Incorrect);
        assert!(!quiz.is_answered(0));
        assert_eq!(store.get("quizProgress-mision2").unwrap(), None);
    }

    #[test]
    fn answering_every_question_reports_completion() {
        let mut store = MemoryStore::new();
        let mut quiz = QuizSession::restore(&store, 3, 2);
        quiz.answer(&mut store, 1, true);
        assert_eq!(
            quiz.answer(&mut store, 0, true),
            AnswerOutcome::Correct { all_answered: true }
        );
    }

    #[test]
    fn saved_answers_survive_a_reload() {
        let mut store = MemoryStore::new();
        let mut quiz = QuizSession::restore(&store, 4, 3);
        quiz.answer(&mut store, 2, true);

        let reloaded = QuizSession::restore(&store, 4, 3);
        assert!(reloaded.is_answered(2));
        assert_eq!(reloaded.answered_count(), 1);
        assert!(!reloaded.all_answered());
    }

    #[test]
    fn corrupt_quiz_state_starts_empty() {
        let mut store = MemoryStore::new();
        store.set("quizProgress-mision5", "[oops").unwrap();
        let quiz = QuizSession::restore(&store, 5, 1);
        assert_eq!(quiz.answered_count(), 0);
    }

    #[test]
    fn page_without_questions_is_complete() {
        let store = MemoryStore::new();
        assert!(QuizSession::restore(&store, 6, 0).all_answered());
    }
}
