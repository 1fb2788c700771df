//! Collaborator seams: pose model input and feedback/plot output.

use squats_core::{JointName, KeypointFrame, Result};

/// External pose-estimation model
pub trait PoseEstimator {
    /// Image representation the model consumes
    type Image;

    /// Keypoints for the person in `image`, or `None` when no person was found
    fn keypoints(&mut self, image: &Self::Image) -> Result<Option<KeypointFrame>>;
}

/// Receives the message chosen by each feedback cycle
pub trait FeedbackSink {
    /// `None` clears the displayed message
    fn notify(&mut self, message: Option<&str>) -> Result<()>;

    /// Called for frames in which no person was detected
    fn no_keypoints(&mut self, _frame_index: usize) -> Result<()> {
        Ok(())
    }
}

/// Receives one angle series per joint at the end of a session
pub trait PlotSink {
    fn plot(&mut self, series: &[Option<f64>], joint: JointName) -> Result<()>;
}

impl<T: FeedbackSink + ?Sized> FeedbackSink for &mut T {
    fn notify(&mut self, message: Option<&str>) -> Result<()> {
        (**self).notify(message)
    }

    fn no_keypoints(&mut self, frame_index: usize) -> Result<()> {
        (**self).no_keypoints(frame_index)
    }
}

impl<T: PlotSink + ?Sized> PlotSink for &mut T {
    fn plot(&mut self, series: &[Option<f64>], joint: JointName) -> Result<()> {
        (**self).plot(series, joint)
    }
}

/// Feedback sink that writes to the tracing log
#[derive(Debug, Default)]
pub struct LogFeedbackSink {
    last: Option<String>,
    last_empty_frame: Option<usize>,
    empty_runs: usize,
}

impl LogFeedbackSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs of consecutive frames without a person seen so far
    pub fn empty_runs(&self) -> usize {
        self.empty_runs
    }
}

impl FeedbackSink for LogFeedbackSink {
    fn notify(&mut self, message: Option<&str>) -> Result<()> {
        if self.last.as_deref() != message {
            match message {
                Some(text) => tracing::info!("Feedback: {}", text),
                None => tracing::info!("Feedback cleared"),
            }
            self.last = message.map(str::to_string);
        }
        Ok(())
    }

    /// Logged once at the start of each run of empty frames
    fn no_keypoints(&mut self, frame_index: usize) -> Result<()> {
        let continues_run = self
            .last_empty_frame
            .is_some_and(|last| frame_index == last + 1);
        if continues_run {
            tracing::debug!("No keypoints detected in frame {}", frame_index);
        } else {
            tracing::info!("No keypoints detected from frame {}", frame_index);
            self.empty_runs += 1;
        }
        self.last_empty_frame = Some(frame_index);
        Ok(())
    }
}

/// Plot sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPlotSink;

impl PlotSink for NullPlotSink {
    fn plot(&mut self, _series: &[Option<f64>], _joint: JointName) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive<S: FeedbackSink>(mut sink: S) -> Result<()> {
        sink.notify(Some("Keep your back straight."))?;
        sink.no_keypoints(4)?;
        sink.notify(None)
    }

    #[test]
    fn test_log_sink_tracks_last_message() {
        let mut sink = LogFeedbackSink::new();
        drive(&mut sink).unwrap();
        assert_eq!(sink.last, None);

        sink.notify(Some("Lower your hips.")).unwrap();
        assert_eq!(sink.last.as_deref(), Some("Lower your hips."));
    }

    #[test]
    fn test_log_sink_reports_each_empty_run_once() {
        let mut sink = LogFeedbackSink::new();
        for frame_index in [1, 2, 3, 7, 8, 12] {
            sink.no_keypoints(frame_index).unwrap();
        }
        assert_eq!(sink.empty_runs(), 3);
    }

    #[test]
    fn test_null_plot_sink_through_reference() {
        fn plot_all<P: PlotSink>(mut plots: P) -> Result<()> {
            for joint in JointName::ALL {
                plots.plot(&[Some(1.0), None], joint)?;
            }
            Ok(())
        }

        let mut sink = NullPlotSink;
        assert!(plot_all(&mut sink).is_ok());
    }
}
