//! Quest Tracker
//!
//! Ordered, sequentially unlocked quest list. Completing the current quest
//! unlocks the next one; every change refreshes the quest view and gives the
//! hint gate a chance to surface a hint.

use tracing::{debug, info};

use super::state::Quest;
use super::view::QuestView;
use crate::error::QuestError;
use crate::events::{Notification, Notifier};
use crate::hint::HintPort;

/// Owns the quest list and the index of the current quest
pub struct QuestTracker<H: HintPort> {
    quests: Vec<Quest>,
    current_index: usize,
    hints: H,
    notifier: Notifier,
}

impl<H: HintPort> QuestTracker<H> {
    pub fn new(hints: H, notifier: Notifier) -> Self {
        Self {
            quests: Vec::new(),
            current_index: 0,
            hints,
            notifier,
        }
    }

    /// Append a quest and return its index. The very first quest is unlocked
    /// straight away; later quests wait for their predecessor.
    pub fn add_quest(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        total_steps: u32,
    ) -> Result<usize, QuestError> {
        let quest = Quest::new(title, description, total_steps)?;
        let index = self.quests.len();
        info!("Added quest #{}: {} ({} steps)", index, quest.title(), total_steps);
        self.quests.push(quest);

        if index == 0 {
            self.quests[0].unlock();
            self.refresh();
        }
        Ok(index)
    }

    /// Advance the current quest by one step.
    ///
    /// Does nothing when there is no current quest or it is locked. A current
    /// quest that is already completed only hands over to a quest appended
    /// after it; with nothing to hand over to the call is a no-op. At most one
    /// completion happens per call.
    pub fn advance_step(&mut self) {
        let index = self.current_index;
        let Some(quest) = self.quests.get_mut(index) else {
            debug!("No current quest to advance");
            return;
        };

        if !quest.is_unlocked() {
            debug!("Quest #{} is locked, not advancing", index);
            return;
        }
        if quest.is_completed() {
            if !self.unlock_next(index) {
                debug!("Quest #{} already completed, not advancing", index);
                return;
            }
            self.refresh();
            return;
        }

        if quest.advance() {
            info!("Quest #{} completed: {}", index, quest.title());
            if !self.unlock_next(index) {
                info!("All quests completed");
            }
        } else {
            debug!(
                "Quest #{} at step {}/{}",
                index,
                quest.current_step(),
                quest.total_steps()
            );
        }

        self.refresh();
    }

    /// Unlock the quest after `index` and make it current, if there is one
    fn unlock_next(&mut self, index: usize) -> bool {
        let Some(next) = self.quests.get_mut(index + 1) else {
            return false;
        };
        next.unlock();
        self.current_index = index + 1;
        info!("Quest #{} unlocked: {}", self.current_index, next.title());
        true
    }

    /// Publish the current view and, for an active quest, ask the hint gate
    /// for a hint if it is idle
    pub fn refresh(&mut self) {
        let view = self.view();
        let active = view.is_active();
        self.notifier.send(Notification::QuestViewChanged { view });

        if active {
            self.offer_hint();
        }
    }

    /// Request a hint for the current quest if one may be shown
    pub fn offer_hint(&mut self) {
        if !self.view().is_active() {
            return;
        }
        if self.hints.is_available() {
            self.hints.request_hint(self.current_index);
        } else {
            debug!("Hint gate busy, no hint for quest #{}", self.current_index);
        }
    }

    /// Summary of the current quest
    pub fn view(&self) -> QuestView {
        match self.current_quest() {
            None => QuestView::AllCompleted,
            Some(quest) if !quest.is_unlocked() => QuestView::Locked,
            Some(quest) if quest.is_completed() => QuestView::AllCompleted,
            Some(quest) => QuestView::active(quest),
        }
    }

    /// True when there is no current quest or it is completed
    pub fn is_current_quest_completed(&self) -> bool {
        self.current_quest().is_none_or(Quest::is_completed)
    }

    pub fn current_quest_index(&self) -> usize {
        self.current_index
    }

    pub fn current_quest(&self) -> Option<&Quest> {
        self.quests.get(self.current_index)
    }

    pub fn quest(&self, index: usize) -> Option<&Quest> {
        self.quests.get(index)
    }

    pub fn quests(&self) -> &[Quest] {
        &self.quests
    }

    /// True once the last quest has been completed
    pub fn all_completed(&self) -> bool {
        matches!(self.view(), QuestView::AllCompleted)
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }

    pub fn hints(&self) -> &H {
        &self.hints
    }

    pub fn hints_mut(&mut self) -> &mut H {
        &mut self.hints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::UnboundedReceiver;

    /// Records requests; availability is controlled by the test
    #[derive(Default)]
    struct FakeHints {
        available: bool,
        requests: Vec<usize>,
    }

    impl HintPort for FakeHints {
        fn is_available(&self) -> bool {
            self.available
        }

        fn request_hint(&mut self, quest_index: usize) {
            self.requests.push(quest_index);
        }
    }

    fn tracker(available: bool) -> (QuestTracker<FakeHints>, UnboundedReceiver<Notification>) {
        let (notifier, rx) = Notifier::channel();
        let hints = FakeHints {
            available,
            requests: Vec::new(),
        };
        (QuestTracker::new(hints, notifier), rx)
    }

    fn views(rx: &mut UnboundedReceiver<Notification>) -> Vec<QuestView> {
        let mut out = Vec::new();
        while let Ok(n) = rx.try_recv() {
            if let Notification::QuestViewChanged { view } = n {
                out.push(view);
            }
        }
        out
    }

    #[test]
    fn test_empty_tracker() {
        let (mut tracker, mut rx) = tracker(true);
        assert!(tracker.is_current_quest_completed());
        assert_eq!(tracker.view(), QuestView::AllCompleted);

        tracker.advance_step();
        assert!(views(&mut rx).is_empty());
        assert!(tracker.hints().requests.is_empty());
    }

    #[test]
    fn test_first_quest_unlocked_and_refreshed() {
        let (mut tracker, mut rx) = tracker(true);
        let index = tracker.add_quest("Find the flashlight", "It is dark.", 3).unwrap();
        assert_eq!(index, 0);
        assert!(tracker.quest(0).unwrap().is_unlocked());
        assert_eq!(tracker.current_quest_index(), 0);

        let seen = views(&mut rx);
        assert_eq!(seen.len(), 1);
        assert!(seen[0].is_active());
        assert_eq!(tracker.hints().requests, vec![0]);

        // Later quests are appended locked and without a refresh
        tracker.add_quest("Find a Safe Place", "", 2).unwrap();
        assert!(!tracker.quest(1).unwrap().is_unlocked());
        assert!(views(&mut rx).is_empty());
    }

    #[test]
    fn test_invalid_quest_rejected() {
        let (mut tracker, mut rx) = tracker(true);
        assert!(tracker.add_quest("Broken", "", 0).is_err());
        assert!(tracker.is_empty());
        assert!(views(&mut rx).is_empty());
    }

    #[test]
    fn test_completion_unlocks_next() {
        let (mut tracker, _rx) = tracker(false);
        tracker.add_quest("Find the flashlight", "", 3).unwrap();
        tracker.add_quest("Find a Safe Place", "", 2).unwrap();

        tracker.advance_step();
        tracker.advance_step();
        assert_eq!(tracker.current_quest_index(), 0);
        assert!(!tracker.quest(1).unwrap().is_unlocked());

        tracker.advance_step();
        assert!(tracker.quest(0).unwrap().is_completed());
        assert_eq!(tracker.current_quest_index(), 1);
        assert!(tracker.quest(1).unwrap().is_unlocked());
        assert_eq!(tracker.quest(1).unwrap().current_step(), 0);
        assert!(!tracker.is_current_quest_completed());
    }

    #[test]
    fn test_last_quest_completion_is_terminal() {
        let (mut tracker, mut rx) = tracker(false);
        tracker.add_quest("Final Decision", "", 1).unwrap();
        views(&mut rx);

        tracker.advance_step();
        assert_eq!(tracker.current_quest_index(), 0);
        assert!(tracker.is_current_quest_completed());
        assert!(tracker.all_completed());
        assert_eq!(views(&mut rx), vec![QuestView::AllCompleted]);

        let before = tracker.quests().to_vec();
        tracker.advance_step();
        assert_eq!(tracker.quests(), before.as_slice());
        assert!(views(&mut rx).is_empty());
    }

    #[test]
    fn test_quest_appended_after_completion_is_reachable() {
        let (mut tracker, mut rx) = tracker(true);
        tracker.add_quest("A", "", 1).unwrap();
        tracker.advance_step();
        assert!(tracker.all_completed());

        tracker.add_quest("B", "", 2).unwrap();
        assert!(!tracker.quest(1).unwrap().is_unlocked());
        views(&mut rx);

        // Hands over to B without touching its steps
        tracker.advance_step();
        assert_eq!(tracker.current_quest_index(), 1);
        assert!(tracker.quest(1).unwrap().is_unlocked());
        assert_eq!(tracker.quest(1).unwrap().current_step(), 0);
        assert_eq!(tracker.quest(0).unwrap().current_step(), 1);
        let seen = views(&mut rx);
        assert_eq!(seen.len(), 1);
        assert!(seen[0].is_active());
        assert_eq!(tracker.hints().requests, vec![0, 1]);

        tracker.advance_step();
        tracker.advance_step();
        assert!(tracker.all_completed());
        assert_eq!(tracker.current_quest_index(), 1);
    }

    #[test]
    fn test_busy_gate_not_asked() {
        let (mut tracker, mut rx) = tracker(false);
        tracker.add_quest("Radio Tower", "", 2).unwrap();
        tracker.advance_step();

        let seen = views(&mut rx);
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].progress_percent(), 50);
        assert!(tracker.hints().requests.is_empty());

        tracker.hints_mut().available = true;
        tracker.offer_hint();
        assert_eq!(tracker.hints().requests, vec![0]);
    }

    #[test]
    fn test_at_most_one_open_quest() {
        let (mut tracker, _rx) = tracker(true);
        for (title, steps) in [("a", 1), ("b", 2), ("c", 3)] {
            tracker.add_quest(title, "", steps).unwrap();
        }

        for _ in 0..8 {
            let open: Vec<usize> = tracker
                .quests()
                .iter()
                .enumerate()
                .filter(|(_, q)| q.is_unlocked() && !q.is_completed())
                .map(|(i, _)| i)
                .collect();
            assert!(open.len() <= 1);
            if let Some(&i) = open.first() {
                assert_eq!(i, tracker.current_quest_index());
            }
            tracker.advance_step();
        }
        assert!(tracker.all_completed());
        assert_eq!(tracker.current_quest_index(), 2);
    }
}
