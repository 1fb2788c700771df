//! Supported exercise vocabulary and strategy selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use squats_core::{Error, Result};

use crate::bench_press::BenchPressStrategy;
use crate::bicep_curl::BicepCurlStrategy;
use crate::easy::EasyExerciseStrategy;
use crate::lunge::LungeStrategy;
use crate::overhead_press::OverheadPressStrategy;
use crate::pull_up::PullUpStrategy;
use crate::push_up::PushUpStrategy;
use crate::squat::SquatStrategy;
use crate::strategy::{ExerciseStrategy, MissingJointPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Exercise {
    PushUp,
    Squat,
    PullUp,
    BenchPress,
    BicepCurl,
    Lunge,
    OverheadPress,
    /// Permissive baseline that only flags sharply bent arms
    Easy,
}

impl Exercise {
    pub const ALL: [Exercise; 8] = [
        Exercise::PushUp,
        Exercise::Squat,
        Exercise::PullUp,
        Exercise::BenchPress,
        Exercise::BicepCurl,
        Exercise::Lunge,
        Exercise::OverheadPress,
        Exercise::Easy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Exercise::PushUp => "push-up",
            Exercise::Squat => "squat",
            Exercise::PullUp => "pull-up",
            Exercise::BenchPress => "bench press",
            Exercise::BicepCurl => "bicep curl",
            Exercise::Lunge => "lunge",
            Exercise::OverheadPress => "overhead press",
            Exercise::Easy => "easy",
        }
    }

    /// Every spelling accepted by [`select_strategy`] (lowercase)
    pub fn accepted_names(&self) -> &'static [&'static str] {
        match self {
            Exercise::PushUp => &["push-up", "push-ups", "pushup", "pushups", "push up", "push ups"],
            Exercise::Squat => &["squat", "squats"],
            Exercise::PullUp => &["pull-up", "pull-ups", "pullup", "pullups", "pull up", "pull ups"],
            Exercise::BenchPress => &["bench press", "bench-press", "benchpress"],
            Exercise::BicepCurl => &["bicep curl", "bicep curls", "bicep-curl", "biceps curl"],
            Exercise::Lunge => &["lunge", "lunges"],
            Exercise::OverheadPress => &["overhead press", "overhead-press"],
            Exercise::Easy => &["easy", "easy exercise"],
        }
    }

    pub fn default_missing_joint_policy(&self) -> MissingJointPolicy {
        match self {
            Exercise::PushUp | Exercise::Lunge | Exercise::OverheadPress => MissingJointPolicy::Report,
            Exercise::Squat
            | Exercise::PullUp
            | Exercise::BenchPress
            | Exercise::BicepCurl
            | Exercise::Easy => MissingJointPolicy::Skip,
        }
    }

    pub fn strategy(&self) -> Box<dyn ExerciseStrategy> {
        self.strategy_with_policy(self.default_missing_joint_policy())
    }

    pub fn strategy_with_policy(&self, policy: MissingJointPolicy) -> Box<dyn ExerciseStrategy> {
        match self {
            Exercise::PushUp => Box::new(PushUpStrategy::with_policy(policy)),
            Exercise::Squat => Box::new(SquatStrategy::with_policy(policy)),
            Exercise::PullUp => Box::new(PullUpStrategy::with_policy(policy)),
            Exercise::BenchPress => Box::new(BenchPressStrategy::with_policy(policy)),
            Exercise::BicepCurl => Box::new(BicepCurlStrategy::with_policy(policy)),
            Exercise::Lunge => Box::new(LungeStrategy::with_policy(policy)),
            Exercise::OverheadPress => Box::new(OverheadPressStrategy::with_policy(policy)),
            Exercise::Easy => Box::new(EasyExerciseStrategy::with_policy(policy)),
        }
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Exercise {
    type Err = Error;

    /// Case-insensitive exact match; no partial or fuzzy matching
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|exercise| exercise.accepted_names().contains(&wanted.as_str()))
            .ok_or_else(|| Error::UnsupportedExercise { name: s.to_string() })
    }
}

/// Resolve an exercise name (from the user or a recommendation service)
/// to its rule strategy
pub fn select_strategy(name: &str) -> Result<Box<dyn ExerciseStrategy>> {
    let exercise: Exercise = name.parse()?;
    tracing::debug!("Selected {} strategy for {:?}", exercise, name);
    Ok(exercise.strategy())
}
