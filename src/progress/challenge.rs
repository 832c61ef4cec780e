use tracing::info;

use crate::content::Mission;
use crate::error::NameError;
use crate::progress::badges::{course_complete, COURSE_BADGE};
use crate::progress::quiz::QuizSession;
use crate::progress::store::KeyValueStore;
use crate::progress::tracker::ProgressTracker;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChallengeState {
    /// The quiz still has unanswered questions.
    Locked,
    Ready,
    /// Mission recorded; the pin waits for the learner's name.
    AwaitingName,
    /// Mission recorded and a name is stored, but the pin was never
    /// unlocked (the page was left early or the write failed).
    PinPending,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChallengeOutcome {
    /// Not ready yet, or already used.
    Unavailable,
    /// Mission recorded and takeaway revealed; a name is needed before the
    /// pin is unlocked.
    AwaitingName,
    Completed {
        badge_unlocked: bool,
        course_completed: bool,
    },
}

/// The terminal call-to-action of a mission page.
#[derive(Clone, Debug)]
pub struct Challenge {
    mission: Mission,
    course: Vec<Mission>,
    state: ChallengeState,
}

impl Challenge {
    /// Derives the challenge state from stored progress and the page's quiz.
    pub fn restore<S: KeyValueStore>(
        tracker: &ProgressTracker<S>,
        mission: &Mission,
        course: &[Mission],
        quiz: &QuizSession,
    ) -> Self {
        let progress = tracker.load();
        let done = progress.missions_completed.contains(&mission.page_key());
        let state = if done && progress.badges.contains(&mission.badge_id()) {
            ChallengeState::Completed
        } else if done && tracker.needs_name() {
            ChallengeState::AwaitingName
        } else if done {
            ChallengeState::PinPending
        } else if quiz.all_answered() {
            ChallengeState::Ready
        } else {
            ChallengeState::Locked
        };

        Self {
            mission: mission.clone(),
            course: course.to_vec(),
            state,
        }
    }

    pub fn state(&self) -> ChallengeState {
        self.state
    }

    /// The takeaway is shown as soon as the challenge has been triggered.
    pub fn takeaway_revealed(&self) -> bool {
        matches!(
            self.state,
            ChallengeState::AwaitingName
                | ChallengeState::PinPending
                | ChallengeState::Completed
        )
    }

    /// Unlocks the challenge once the quiz reports every question answered.
    pub fn enable(&mut self) {
        if self.state == ChallengeState::Locked {
            self.state = ChallengeState::Ready;
        }
    }

    /// Completes the mission from [`ChallengeState::Ready`]. A recorded
    /// mission whose pin is still locked is finished without asking for a
    /// name again once one is stored.
    pub fn complete<S: KeyValueStore>(&mut self, tracker: &mut ProgressTracker<S>) -> ChallengeOutcome {
        match self.state {
            ChallengeState::Ready => {}
            ChallengeState::PinPending => return self.finish(tracker),
            ChallengeState::AwaitingName if !tracker.needs_name() => return self.finish(tracker),
            _ => return ChallengeOutcome::Unavailable,
        }

        tracker.mark_mission_complete(&self.mission.page_key());
        info!(mission = self.mission.id, "mission completed");

        if tracker.needs_name() {
            self.state = ChallengeState::AwaitingName;
            return ChallengeOutcome::AwaitingName;
        }
        self.finish(tracker)
    }

    /// Stores the learner's name and, if the pin was waiting for it, unlocks
    /// it. Invalid names keep the challenge waiting.
    pub fn provide_name<S: KeyValueStore>(
        &mut self,
        tracker: &mut ProgressTracker<S>,
        raw: &str,
    ) -> Result<ChallengeOutcome, NameError> {
        tracker.set_user_name(raw)?;
        match self.state {
            ChallengeState::AwaitingName | ChallengeState::PinPending => Ok(self.finish(tracker)),
            _ => Ok(ChallengeOutcome::Unavailable),
        }
    }

    fn finish<S: KeyValueStore>(&mut self, tracker: &mut ProgressTracker<S>) -> ChallengeOutcome {
        let badge_unlocked = tracker.unlock_badge(&self.mission.badge_id());
        let course_completed =
            course_complete(&tracker.load(), &self.course) && tracker.unlock_badge(COURSE_BADGE);
        self.state = ChallengeState::Completed;

        ChallengeOutcome::Completed {
            badge_unlocked,
            course_completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::quiz::AnswerOutcome;
    use crate::progress::store::MemoryStore;

    fn course() -> Vec<Mission> {
        (1..=2)
            .map(|id| Mission {
                id,
                file: format!("m{id}.html"),
                nav_label: format!("misión {id}"),
                duration: String::new(),
            })
            .collect()
    }

    #[test]
    fn challenge_stays_locked_until_the_quiz_is_done() {
        let course = course();
        let mut tracker = ProgressTracker::new(MemoryStore::new());
        let mut quiz = QuizSession::restore(tracker.store(), 1, 1);
        let mut challenge = Challenge::restore(&tracker, &course[0], &course, &quiz);

        assert_eq!(challenge.state(), ChallengeState::Locked);
        assert_eq!(challenge.complete(&mut tracker), ChallengeOutcome::Unavailable);

        let outcome = quiz.answer(tracker.store_mut(), 0, true);
        if outcome == (AnswerOutcome::Correct { all_answered: true }) {
            challenge.enable();
        }
        assert_eq!(challenge.state(), ChallengeState::Ready);
    }

    #[test]
    fn pin_waits_for_a_valid_name() {
        let course = course();
        let mut tracker = ProgressTracker::new(MemoryStore::new());
        let quiz = QuizSession::restore(tracker.store(), 1, 0);
        let mut challenge = Challenge::restore(&tracker, &course[0], &course, &quiz);

        assert_eq!(challenge.complete(&mut tracker), ChallengeOutcome::AwaitingName);
        assert!(challenge.takeaway_revealed());
        assert!(tracker.load().missions_completed.contains("mision-1"));
        assert!(!tracker.load().badges.contains("mision_1"));

        assert!(challenge.provide_name(&mut tracker, "<>").is_err());
        assert_eq!(challenge.state(), ChallengeState::AwaitingName);

        let outcome = challenge.provide_name(&mut tracker, "Noa").unwrap();
        assert_eq!(
            outcome,
            ChallengeOutcome::Completed { badge_unlocked: true, course_completed: false }
        );
        assert_eq!(challenge.complete(&mut tracker), ChallengeOutcome::Unavailable);
    }

    #[test]
    fn last_mission_unlocks_the_course_badge() {
        let course = course();
        let mut tracker = ProgressTracker::new(MemoryStore::new());
        tracker.set_user_name("Noa").unwrap();

        for mission in &course {
            let quiz = QuizSession::restore(tracker.store(), mission.id, 0);
            let mut challenge = Challenge::restore(&tracker, mission, &course, &quiz);
            let outcome = challenge.complete(&mut tracker);
            let expect_course = mission.id == 2;
            assert_eq!(
                outcome,
                ChallengeOutcome::Completed { badge_unlocked: true, course_completed: expect_course }
            );
        }
        assert!(tracker.load().badges.contains(COURSE_BADGE));
    }

    #[test]
    fn restore_recognizes_finished_and_pending_missions() {
        let course = course();
        let mut tracker = ProgressTracker::new(MemoryStore::new());
        tracker.mark_mission_complete("mision-1");
        let quiz = QuizSession::restore(tracker.store(), 1, 3);

        let pending = Challenge::restore(&tracker, &course[0], &course, &quiz);
        assert_eq!(pending.state(), ChallengeState::AwaitingName);

        tracker.unlock_badge("mision_1");
        let done = Challenge::restore(&tracker, &course[0], &course, &quiz);
        assert_eq!(done.state(), ChallengeState::Completed);
    }

    #[test]
    fn locked_pin_is_finished_with_the_name_given_elsewhere() {
        let course = course();
        let mut tracker = ProgressTracker::new(MemoryStore::new());
        tracker.mark_mission_complete("mision-1");
        tracker.set_user_name("Noa").unwrap();
        let quiz = QuizSession::restore(tracker.store(), 1, 0);

        let mut challenge = Challenge::restore(&tracker, &course[0], &course, &quiz);
        assert_eq!(challenge.state(), ChallengeState::PinPending);
        assert!(challenge.takeaway_revealed());

        assert_eq!(
            challenge.complete(&mut tracker),
            ChallengeOutcome::Completed { badge_unlocked: true, course_completed: false }
        );
        assert!(tracker.load().badges.contains("mision_1"));
        assert_eq!(tracker.user_name().as_deref(), Some("Noa"));
        assert_eq!(challenge.complete(&mut tracker), ChallengeOutcome::Unavailable);
    }

    #[test]
    fn waiting_pin_unlocks_once_a_name_appears_in_storage() {
        let course = course();
        let mut tracker = ProgressTracker::new(MemoryStore::new());
        let quiz = QuizSession::restore(tracker.store(), 1, 0);
        let mut challenge = Challenge::restore(&tracker, &course[0], &course, &quiz);

        assert_eq!(challenge.complete(&mut tracker), ChallengeOutcome::AwaitingName);
        assert_eq!(challenge.complete(&mut tracker), ChallengeOutcome::Unavailable);

        tracker.set_user_name("Sara").unwrap();
        assert_eq!(
            challenge.complete(&mut tracker),
            ChallengeOutcome::Completed { badge_unlocked: true, course_completed: false }
        );
    }
}
