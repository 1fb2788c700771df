//! Spoken feedback cues.
//!
//! Each feedback message maps to a pre-recorded clip. The map persists as a
//! JSON object keyed by message text; clips that exist on disk under the
//! sanitized message name are picked up and added to the map on first use.
//! Speech synthesis and the [`AudioPlayer`] device are supplied by the
//! embedding application.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use squats_core::{Error, Result};

use crate::sinks::FeedbackSink;

/// Longest sanitized file stem
pub const MAX_FILENAME_LEN: usize = 50;

/// Clip extension used when discovering unmapped clips
pub const CLIP_EXTENSION: &str = "mp3";

/// File stem for a message: spaces and path separators become `_`, other
/// punctuation is dropped, and the result is cut to [`MAX_FILENAME_LEN`].
pub fn sanitize_filename(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .take(MAX_FILENAME_LEN)
        .collect()
}

/// Message-to-clip map backed by a JSON file
#[derive(Debug, Clone)]
pub struct AudioCueMap {
    path: PathBuf,
    audio_dir: PathBuf,
    cues: BTreeMap<String, PathBuf>,
}

impl AudioCueMap {
    /// Load the map at `path`; a missing file yields an empty map
    pub fn load(path: impl Into<PathBuf>, audio_dir: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cues = if path.exists() {
            let text = fs::read_to_string(&path)?;
            serde_json::from_str(&text)?
        } else {
            BTreeMap::new()
        };
        tracing::debug!("Loaded {} audio cues from {}", cues.len(), path.display());

        Ok(Self {
            path,
            audio_dir: audio_dir.into(),
            cues,
        })
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(&self.cues)?;
        fs::write(&self.path, text)?;
        Ok(())
    }

    pub fn get(&self, message: &str) -> Option<&Path> {
        self.cues.get(message).map(PathBuf::as_path)
    }

    pub fn insert(&mut self, message: impl Into<String>, clip: impl Into<PathBuf>) {
        self.cues.insert(message.into(), clip.into());
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Where an unmapped message's clip is expected
    pub fn default_clip_path(&self, message: &str) -> PathBuf {
        self.audio_dir
            .join(format!("{}.{}", sanitize_filename(message), CLIP_EXTENSION))
    }

    /// Mapped clip for `message`, registering a clip found at the default
    /// location if the map has none
    pub fn resolve(&mut self, message: &str) -> Result<Option<PathBuf>> {
        if let Some(clip) = self.cues.get(message) {
            return Ok(Some(clip.clone()));
        }

        let candidate = self.default_clip_path(message);
        if !candidate.exists() {
            return Ok(None);
        }

        tracing::info!("Registering audio cue {} for {:?}", candidate.display(), message);
        self.cues.insert(message.to_string(), candidate.clone());
        self.save()?;
        Ok(Some(candidate))
    }
}

/// Audio output device
pub trait AudioPlayer {
    /// Start looping `clip`, replacing whatever is playing
    fn play_loop(&mut self, clip: &Path) -> Result<()>;

    fn stop(&mut self) -> Result<()>;
}

/// Feedback sink that loops the clip for the displayed message
pub struct AudioCueSink<P> {
    cues: AudioCueMap,
    player: P,
    playing: Option<String>,
}

impl<P: AudioPlayer> AudioCueSink<P> {
    pub fn new(cues: AudioCueMap, player: P) -> Self {
        Self {
            cues,
            player,
            playing: None,
        }
    }

    pub fn playing(&self) -> Option<&str> {
        self.playing.as_deref()
    }

    pub fn into_player(self) -> P {
        self.player
    }
}

impl<P: AudioPlayer> FeedbackSink for AudioCueSink<P> {
    fn notify(&mut self, message: Option<&str>) -> Result<()> {
        if self.playing.as_deref() == message {
            return Ok(());
        }

        match message {
            Some(text) => {
                let clip = self
                    .cues
                    .resolve(text)?
                    .ok_or_else(|| Error::Notification(format!("No audio cue for {text:?}")))?;
                self.player.play_loop(&clip)?;
                self.playing = Some(text.to_string());
            }
            None => {
                self.player.stop()?;
                self.playing = None;
            }
        }
        Ok(())
    }
}
