//! Session configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use squats_core::{Error, Result};
use squats_rules::{Exercise, ExerciseStrategy, MissingJointPolicy};

/// Complete session configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Frame pipeline cadence
    pub pipeline: PipelineConfig,

    /// Feedback rate limiting and priorities
    pub feedback: FeedbackConfig,

    /// Rule strategy overrides
    pub rules: RulesConfig,
}

/// Clock used for feedback cooldowns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockSource {
    /// Frame index divided by frame rate
    Stream,
    /// System wall clock
    Wall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Video frame rate (frames/second)
    pub frame_rate: f64,

    /// Minimum spacing between feedback evaluations (seconds)
    pub feedback_window_secs: f64,

    pub clock: ClockSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Seconds a displayed message is held before a new decision is made
    pub cooldown_secs: f64,

    /// Priority for messages matching no rule (lower = more urgent)
    pub default_priority: u32,

    /// Ordered phrase rules; the first phrase found in a message decides its priority
    pub priorities: Vec<PriorityRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityRule {
    pub phrase: String,
    pub priority: u32,
}

impl PriorityRule {
    pub fn new(phrase: &str, priority: u32) -> Self {
        Self {
            phrase: phrase.to_string(),
            priority,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Per-exercise override of the missing-joint policy
    pub missing_joints: BTreeMap<Exercise, MissingJointPolicy>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            frame_rate: 30.0,
            feedback_window_secs: 0.5,
            clock: ClockSource::Stream,
        }
    }
}

impl PipelineConfig {
    /// Frames between feedback evaluations, never less than one
    pub fn feedback_interval(&self) -> usize {
        let frames = (self.frame_rate * self.feedback_window_secs).round();
        if frames.is_finite() && frames >= 1.0 {
            frames as usize
        } else {
            1
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 2.0,
            default_priority: 100,
            priorities: vec![
                PriorityRule::new("not detected", 5),
                PriorityRule::new("back", 1),
                PriorityRule::new("spine", 1),
                PriorityRule::new("upper body", 1),
                PriorityRule::new("knee", 2),
                PriorityRule::new("hip", 2),
                PriorityRule::new("elbow", 3),
                PriorityRule::new("arm", 3),
                PriorityRule::new("shoulder", 3),
                PriorityRule::new("ankle", 4),
            ],
        }
    }
}

impl RulesConfig {
    pub fn policy_for(&self, exercise: Exercise) -> MissingJointPolicy {
        self.missing_joints
            .get(&exercise)
            .copied()
            .unwrap_or_else(|| exercise.default_missing_joint_policy())
    }

    /// Resolve an exercise name to its strategy with configured overrides applied
    pub fn strategy_for(&self, name: &str) -> Result<Box<dyn ExerciseStrategy>> {
        let exercise: Exercise = name.parse()?;
        Ok(exercise.strategy_with_policy(self.policy_for(exercise)))
    }
}

impl SessionConfig {
    /// Load configuration from file, with `SQUATS_` environment overrides
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(Self::environment())
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        Self::finish(settings)
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_environment(Self::environment())
    }

    fn from_environment(environment: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(environment)
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        Self::finish(settings)
    }

    /// `SQUATS_PIPELINE__FRAME_RATE` sets `pipeline.frame_rate`
    fn environment() -> config::Environment {
        config::Environment::with_prefix("SQUATS")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn finish(settings: config::Config) -> Result<Self> {
        let config: Self = settings
            .try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.pipeline.frame_rate.is_finite() && self.pipeline.frame_rate > 0.0) {
            return Err(Error::Config(format!(
                "frame_rate must be positive, got {}",
                self.pipeline.frame_rate
            )));
        }
        if !(self.pipeline.feedback_window_secs >= 0.0) {
            return Err(Error::Config(format!(
                "feedback_window_secs must be non-negative, got {}",
                self.pipeline.feedback_window_secs
            )));
        }
        if !(self.feedback.cooldown_secs >= 0.0) {
            return Err(Error::Config(format!(
                "cooldown_secs must be non-negative, got {}",
                self.feedback.cooldown_secs
            )));
        }
        if let Some(rule) = self.feedback.priorities.iter().find(|r| r.phrase.trim().is_empty()) {
            return Err(Error::Config(format!(
                "priority rule {} has an empty phrase",
                rule.priority
            )));
        }
        Ok(())
    }
}
