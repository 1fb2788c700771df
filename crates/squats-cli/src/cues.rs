//! Feedback output for replays: log lines, plus audio cues when a cue map
//! is given.

use std::path::{Path, PathBuf};

use squats_core::Result;
use squats_session::{AudioCueSink, AudioPlayer, FeedbackSink, LogFeedbackSink};

/// Player that logs which clip a live session would loop
#[derive(Debug, Default)]
pub struct LoggedPlayer {
    current: Option<PathBuf>,
}

impl AudioPlayer for LoggedPlayer {
    fn play_loop(&mut self, clip: &Path) -> Result<()> {
        tracing::info!("Looping audio cue {}", clip.display());
        self.current = Some(clip.to_path_buf());
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(clip) = self.current.take() {
            tracing::info!("Stopped audio cue {}", clip.display());
        }
        Ok(())
    }
}

/// Logs every message and forwards it to the audio cues, if any
pub struct ReplaySink {
    log: LogFeedbackSink,
    audio: Option<AudioCueSink<LoggedPlayer>>,
}

impl ReplaySink {
    pub fn new(audio: Option<AudioCueSink<LoggedPlayer>>) -> Self {
        Self {
            log: LogFeedbackSink::new(),
            audio,
        }
    }
}

impl FeedbackSink for ReplaySink {
    fn notify(&mut self, message: Option<&str>) -> Result<()> {
        self.log.notify(message)?;
        match &mut self.audio {
            Some(audio) => audio.notify(message),
            None => Ok(()),
        }
    }

    fn no_keypoints(&mut self, frame_index: usize) -> Result<()> {
        self.log.no_keypoints(frame_index)
    }
}
