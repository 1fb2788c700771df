//! Frame-at-a-time session pipeline.
//!
//! Integrates measurement, rule evaluation and feedback selection into a
//! single synchronous loop over a pose-estimation source.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use squats_core::{
    compute_joint_angles_with, compute_joint_distances, JointAngleSet, JointDistanceSet,
    Error, JointTable, KeypointFrame, Result, SessionId, Timestamp,
};
use squats_rules::{Exercise, ExerciseStrategy, Violation};

use crate::config::{ClockSource, SessionConfig};
use crate::feedback::FeedbackManager;
use crate::series::AngleSeries;
use crate::sinks::{FeedbackSink, PlotSink, PoseEstimator};

/// Shared flag checked between frames
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of one feedback cycle
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackCycle {
    pub violations: Vec<Violation>,
    /// Message handed to the sink; `None` cleared it
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameMeasurement {
    pub angles: JointAngleSet,
    pub distances: JointDistanceSet,
    /// Present only on frames that ran a feedback cycle
    pub feedback: Option<FeedbackCycle>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// The pose model found no person
    NoKeypoints,
    /// The pose model failed on this frame
    EstimatorFailed,
    Measured(FrameMeasurement),
}

/// Running counters for a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub frames_processed: usize,
    pub frames_without_keypoints: usize,
    pub pose_failures: usize,
    pub feedback_cycles: usize,
    pub sink_failures: usize,
}

/// End-of-session summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: SessionId,
    pub exercise: Exercise,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
    #[serde(flatten)]
    pub stats: SessionStats,
    /// Every distinct violation in first-seen order
    pub summary: Vec<String>,
    pub stopped_early: bool,
}

/// Session pipeline owning all per-session state
pub struct FramePipeline {
    session_id: SessionId,
    strategy: Box<dyn ExerciseStrategy>,
    table: JointTable,
    feedback: FeedbackManager,
    series: AngleSeries,
    frame_rate: f64,
    feedback_interval: usize,
    clock: ClockSource,
    last_feedback_frame: Option<usize>,
    stats: SessionStats,
    started_at: Timestamp,
}

impl FramePipeline {
    pub fn new(strategy: Box<dyn ExerciseStrategy>, config: &SessionConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            session_id: SessionId::new(),
            strategy,
            table: JointTable::standard(),
            feedback: FeedbackManager::new(&config.feedback),
            series: AngleSeries::new(),
            frame_rate: config.pipeline.frame_rate,
            feedback_interval: config.pipeline.feedback_interval(),
            clock: config.pipeline.clock,
            last_feedback_frame: None,
            stats: SessionStats::default(),
            started_at: Timestamp::now(),
        })
    }

    /// Pipeline for a named exercise with configured rule overrides
    pub fn for_exercise(name: &str, config: &SessionConfig) -> Result<Self> {
        let strategy = config.rules.strategy_for(name)?;
        tracing::info!("Starting {} session", strategy.name());
        Self::new(strategy, config)
    }

    /// Use a custom joint table
    pub fn with_joint_table(mut self, table: JointTable) -> Self {
        self.table = table;
        self
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn exercise(&self) -> Exercise {
        self.strategy.exercise()
    }

    pub fn feedback_interval(&self) -> usize {
        self.feedback_interval
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn series(&self) -> &AngleSeries {
        &self.series
    }

    pub fn feedback(&self) -> &FeedbackManager {
        &self.feedback
    }

    /// Switch exercise; starts a new session
    pub fn set_strategy(&mut self, strategy: Box<dyn ExerciseStrategy>) {
        self.strategy = strategy;
        self.reset();
    }

    /// Reset all session state
    pub fn reset(&mut self) {
        self.session_id = SessionId::new();
        self.feedback.reset();
        self.series.clear();
        self.last_feedback_frame = None;
        self.stats = SessionStats::default();
        self.started_at = Timestamp::now();
    }

    fn time_of(&self, frame_index: usize) -> Timestamp {
        match self.clock {
            ClockSource::Stream => Timestamp::from_secs_f64(frame_index as f64 / self.frame_rate),
            ClockSource::Wall => Timestamp::now(),
        }
    }

    fn feedback_due(&self, frame_index: usize) -> bool {
        match self.last_feedback_frame {
            None => true,
            Some(last) => frame_index.saturating_sub(last) >= self.feedback_interval,
        }
    }

    /// Process one frame's pose-model output
    pub fn process_keypoints<S>(
        &mut self,
        frame_index: usize,
        keypoints: Option<&KeypointFrame>,
        sink: &mut S,
    ) -> FrameOutcome
    where
        S: FeedbackSink + ?Sized,
    {
        self.stats.frames_processed += 1;

        let Some(frame) = keypoints else {
            self.stats.frames_without_keypoints += 1;
            if let Err(e) = sink.no_keypoints(frame_index) {
                tracing::warn!("Feedback sink error on frame {}: {}", frame_index, e);
                self.stats.sink_failures += 1;
            }
            return FrameOutcome::NoKeypoints;
        };

        let angles = compute_joint_angles_with(&self.table, frame);
        let distances = compute_joint_distances(frame);
        tracing::trace!("Frame {}: {} joint angles", frame_index, angles.len());

        let feedback = if self.feedback_due(frame_index) {
            Some(self.feedback_cycle(frame_index, &angles, &distances, sink))
        } else {
            None
        };

        self.series.record(&angles);

        FrameOutcome::Measured(FrameMeasurement {
            angles,
            distances,
            feedback,
        })
    }

    /// Record a pose-model failure for a frame
    pub fn record_estimator_failure(&mut self, frame_index: usize, error: &Error) -> FrameOutcome {
        tracing::warn!("Pose estimation failed on frame {}: {}", frame_index, error);
        self.stats.frames_processed += 1;
        self.stats.pose_failures += 1;
        FrameOutcome::EstimatorFailed
    }

    fn feedback_cycle<S>(
        &mut self,
        frame_index: usize,
        angles: &JointAngleSet,
        distances: &JointDistanceSet,
        sink: &mut S,
    ) -> FeedbackCycle
    where
        S: FeedbackSink + ?Sized,
    {
        let violations = self.strategy.check_form(angles, distances);
        let now = self.time_of(frame_index);
        let message = self
            .feedback
            .update_feedback_at(&violations, now)
            .into_iter()
            .next();

        if let Err(e) = sink.notify(message.as_deref()) {
            tracing::warn!("Feedback sink error on frame {}: {}", frame_index, e);
            self.stats.sink_failures += 1;
        }

        self.last_feedback_frame = Some(frame_index);
        self.stats.feedback_cycles += 1;

        FeedbackCycle { violations, message }
    }

    /// Run the pipeline over a frame source until it ends or `stop` is set
    pub fn run<E, I, S, P>(
        &mut self,
        estimator: &mut E,
        images: I,
        sink: &mut S,
        plots: &mut P,
        stop: &StopSignal,
    ) -> SessionReport
    where
        E: PoseEstimator + ?Sized,
        I: IntoIterator<Item = E::Image>,
        S: FeedbackSink + ?Sized,
        P: PlotSink + ?Sized,
    {
        let mut stopped_early = false;

        for (frame_index, image) in images.into_iter().enumerate() {
            if stop.is_stopped() {
                tracing::info!("Stop requested after {} frames", frame_index);
                stopped_early = true;
                break;
            }

            match estimator.keypoints(&image) {
                Ok(keypoints) => {
                    self.process_keypoints(frame_index, keypoints.as_ref(), sink);
                }
                Err(e) => {
                    self.record_estimator_failure(frame_index, &e);
                }
            }
        }

        self.finish(plots, stopped_early)
    }

    /// End-of-stream path: hand every joint series to the plot sink and
    /// build the session report
    pub fn finish<P>(&mut self, plots: &mut P, stopped_early: bool) -> SessionReport
    where
        P: PlotSink + ?Sized,
    {
        if self.series.is_empty() {
            tracing::info!("No measured frames; skipping plots");
        } else {
            for (joint, values) in self.series.iter() {
                if let Err(e) = plots.plot(values, joint) {
                    tracing::warn!("Plot sink error for {}: {}", joint, e);
                    self.stats.sink_failures += 1;
                }
            }
        }

        let summary = self.feedback.get_all_feedback();
        tracing::info!(
            "Session {} finished: {} frames, {} distinct corrections",
            self.session_id.0,
            self.stats.frames_processed,
            summary.len()
        );

        SessionReport {
            session_id: self.session_id,
            exercise: self.strategy.exercise(),
            started_at: self.started_at,
            finished_at: Timestamp::now(),
            stats: self.stats,
            summary,
            stopped_early,
        }
    }
}
