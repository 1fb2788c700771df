//! Rate-limited, prioritized feedback selection.
//!
//! A frame can produce several violations at once, and violations from
//! consecutive evaluations often flicker. The manager tracks which
//! violations are still active, holds a displayed message for a cooldown
//! period, and surfaces the single most urgent active violation.

use serde::{Deserialize, Serialize};
use squats_core::Timestamp;

use crate::config::{FeedbackConfig, PriorityRule};

/// Ordered phrase table mapping a message to its urgency (lower = more urgent)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityTable {
    rules: Vec<PriorityRule>,
    default_priority: u32,
}

impl PriorityTable {
    pub fn new(rules: Vec<PriorityRule>, default_priority: u32) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| PriorityRule {
                phrase: rule.phrase.to_lowercase(),
                priority: rule.priority,
            })
            .collect();
        Self {
            rules,
            default_priority,
        }
    }

    pub fn from_config(config: &FeedbackConfig) -> Self {
        Self::new(config.priorities.clone(), config.default_priority)
    }

    /// Case-insensitive substring match; the first rule found wins
    pub fn priority_of(&self, message: &str) -> u32 {
        let message = message.to_lowercase();
        self.rules
            .iter()
            .find(|rule| message.contains(&rule.phrase))
            .map(|rule| rule.priority)
            .unwrap_or(self.default_priority)
    }
}

impl Default for PriorityTable {
    fn default() -> Self {
        Self::from_config(&FeedbackConfig::default())
    }
}

/// Mutable state carried between feedback cycles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackState {
    /// Violations still present, in first-seen order
    pub active: Vec<String>,
    /// Every distinct violation seen this session, in first-seen order
    pub log: Vec<String>,
    pub last_emission: Option<Timestamp>,
    pub current_message: Option<String>,
}

/// Picks the message shown to the user from each evaluation's violations
#[derive(Debug, Clone)]
pub struct FeedbackManager {
    state: FeedbackState,
    cooldown_secs: f64,
    priorities: PriorityTable,
}

impl FeedbackManager {
    pub fn new(config: &FeedbackConfig) -> Self {
        Self {
            state: FeedbackState::default(),
            cooldown_secs: config.cooldown_secs,
            priorities: PriorityTable::from_config(config),
        }
    }

    pub fn with_priorities(cooldown_secs: f64, priorities: PriorityTable) -> Self {
        Self {
            state: FeedbackState::default(),
            cooldown_secs,
            priorities,
        }
    }

    /// Update against the wall clock
    pub fn update_feedback(&mut self, current: &[String]) -> Vec<String> {
        self.update_feedback_at(current, Timestamp::now())
    }

    /// Feed one evaluation's violations and return at most one message to show.
    ///
    /// Within the cooldown window an already displayed message is returned
    /// unchanged and the violations are ignored.
    pub fn update_feedback_at(&mut self, current: &[String], now: Timestamp) -> Vec<String> {
        if let (Some(last), Some(message)) = (self.state.last_emission, &self.state.current_message) {
            if now.secs_since(last) < self.cooldown_secs {
                return vec![message.clone()];
            }
        }

        self.state.active.retain(|violation| current.contains(violation));
        for violation in current {
            if !self.state.active.contains(violation) {
                self.state.active.push(violation.clone());
            }
            if !self.state.log.contains(violation) {
                self.state.log.push(violation.clone());
            }
        }

        let selected = self
            .state
            .active
            .iter()
            .min_by_key(|violation| self.priorities.priority_of(violation))
            .cloned();

        if selected != self.state.current_message {
            tracing::debug!("Feedback changed: {:?}", selected);
        }
        self.state.current_message = selected.clone();
        self.state.last_emission = Some(now);

        selected.into_iter().collect()
    }

    /// Session summary: all distinct violations in first-seen order
    pub fn get_all_feedback(&self) -> Vec<String> {
        self.state.log.clone()
    }

    pub fn active(&self) -> &[String] {
        &self.state.active
    }

    pub fn current_message(&self) -> Option<&str> {
        self.state.current_message.as_deref()
    }

    pub fn state(&self) -> &FeedbackState {
        &self.state
    }

    pub fn priorities(&self) -> &PriorityTable {
        &self.priorities
    }

    /// Clear all state for a new session
    pub fn reset(&mut self) {
        self.state = FeedbackState::default();
    }
}

impl Default for FeedbackManager {
    fn default() -> Self {
        Self::new(&FeedbackConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: f64) -> Timestamp {
        Timestamp::from_secs_f64(secs)
    }

    fn msgs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_priority_lookup() {
        let table = PriorityTable::default();
        assert_eq!(table.priority_of("Keep your BACK straight."), 1);
        assert_eq!(table.priority_of("Bend your knees more"), 2);
        assert_eq!(table.priority_of("Extend your arms fully"), 3);
        assert_eq!(table.priority_of("Right ankle flexibility is limited."), 4);
        assert_eq!(table.priority_of("Well done"), 100);
        // "not detected" is consulted before the joint words
        assert_eq!(table.priority_of("Right knee not detected."), 5);
    }

    #[test]
    fn test_most_urgent_message_selected() {
        let mut manager = FeedbackManager::default();
        let shown = manager.update_feedback_at(
            &msgs(&["Extend your arms fully", "Bend your knees more"]),
            at(0.0),
        );
        assert_eq!(shown, msgs(&["Bend your knees more"]));
    }

    #[test]
    fn test_ties_go_to_first_seen() {
        let mut manager = FeedbackManager::default();
        let shown = manager.update_feedback_at(
            &msgs(&["Straighten your left arm.", "Lower your elbow."]),
            at(0.0),
        );
        assert_eq!(shown, msgs(&["Straighten your left arm."]));
    }

    #[test]
    fn test_message_held_during_cooldown() {
        let mut manager = FeedbackManager::default();
        assert_eq!(manager.update_feedback_at(&msgs(&["A"]), at(0.0)), msgs(&["A"]));
        assert_eq!(manager.update_feedback_at(&msgs(&["B"]), at(0.5)), msgs(&["A"]));
        assert_eq!(manager.update_feedback_at(&[], at(1.9)), msgs(&["A"]));

        // ignored during the cooldown, so B never reached the log
        assert_eq!(manager.get_all_feedback(), msgs(&["A"]));

        assert_eq!(manager.update_feedback_at(&msgs(&["B"]), at(2.0)), msgs(&["B"]));
        assert_eq!(manager.get_all_feedback(), msgs(&["A", "B"]));
    }

    #[test]
    fn test_wall_clock_holds_message() {
        let mut manager = FeedbackManager::default();
        assert_eq!(manager.update_feedback(&msgs(&["Lower your hips."])), msgs(&["Lower your hips."]));
        assert_eq!(
            manager.update_feedback(&msgs(&["Keep your back straight."])),
            msgs(&["Lower your hips."])
        );
        assert_eq!(manager.get_all_feedback(), msgs(&["Lower your hips."]));
    }

    #[test]
    fn test_resolved_violations_pruned() {
        let mut manager = FeedbackManager::with_priorities(0.0, PriorityTable::default());
        manager.update_feedback_at(&msgs(&["Keep your back straight.", "Bend your knees more"]), at(0.0));
        assert_eq!(manager.active().len(), 2);

        let shown = manager.update_feedback_at(&msgs(&["Bend your knees more"]), at(1.0));
        assert_eq!(shown, msgs(&["Bend your knees more"]));
        assert_eq!(manager.active(), msgs(&["Bend your knees more"]).as_slice());

        assert!(manager.update_feedback_at(&[], at(2.0)).is_empty());
        assert!(manager.active().is_empty());
        assert_eq!(manager.current_message(), None);
    }

    #[test]
    fn test_empty_result_does_not_hold() {
        let mut manager = FeedbackManager::default();
        assert!(manager.update_feedback_at(&[], at(0.0)).is_empty());
        // nothing displayed, so the cooldown does not apply
        assert_eq!(manager.update_feedback_at(&msgs(&["A"]), at(0.1)), msgs(&["A"]));
    }

    #[test]
    fn test_log_is_monotonic_and_distinct() {
        let mut manager = FeedbackManager::with_priorities(0.0, PriorityTable::default());
        let rounds = [vec!["A", "B"], vec!["B"], vec![], vec!["A", "C", "C"]];
        let mut previous = 0;
        for (i, round) in rounds.iter().enumerate() {
            manager.update_feedback_at(&msgs(round), at(i as f64));
            let log = manager.get_all_feedback();
            assert!(log.len() >= previous);
            previous = log.len();
        }
        assert_eq!(manager.get_all_feedback(), msgs(&["A", "B", "C"]));
        assert_eq!(manager.active(), msgs(&["A", "C"]).as_slice());
    }

    #[test]
    fn test_reset() {
        let mut manager = FeedbackManager::default();
        manager.update_feedback_at(&msgs(&["A"]), at(0.0));
        manager.reset();

        assert_eq!(manager.state(), &FeedbackState::default());
        assert_eq!(manager.update_feedback_at(&msgs(&["B"]), at(0.1)), msgs(&["B"]));
    }

    #[test]
    fn test_custom_priorities() {
        let config = FeedbackConfig {
            cooldown_secs: 0.0,
            default_priority: 0,
            priorities: vec![PriorityRule::new("Elbow", 10)],
        };
        let mut manager = FeedbackManager::new(&config);
        let shown = manager.update_feedback_at(&msgs(&["Lower your elbow.", "Breathe"]), at(0.0));
        assert_eq!(shown, msgs(&["Breathe"]));
    }
}
