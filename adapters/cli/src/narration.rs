use std::time::Duration;

use haunted_dreams_core::{ClipId, Command, Event, SubtitleLine};
use haunted_dreams_system_tutorial::clip_asset;
use log::info;

#[derive(Clone, Debug)]
struct Playback {
    clip: ClipId,
    duration: Duration,
    elapsed: Duration,
    subtitles: Vec<SubtitleLine>,
    line: usize,
    line_elapsed: Duration,
    completion_sent: bool,
}

/// Stand-in for the audio host: times clips and pages through their subtitles.
#[derive(Debug, Default)]
pub(crate) struct NarrationPlayer {
    playback: Option<Playback>,
}

impl NarrationPlayer {
    pub(crate) fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::NarrationStarted {
                    clip,
                    duration,
                    subtitles,
                } => {
                    info!(
                        "narration clip {} started ({})",
                        clip.get(),
                        clip_asset(*clip).unwrap_or("unknown asset")
                    );
                    self.playback = Some(Playback {
                        clip: *clip,
                        duration: *duration,
                        elapsed: Duration::ZERO,
                        subtitles: subtitles.clone(),
                        line: 0,
                        line_elapsed: Duration::ZERO,
                        completion_sent: false,
                    });
                    self.log_current_line();
                }
                Event::NarrationFinished { clip } => {
                    if self.playback.as_ref().is_some_and(|playback| playback.clip == *clip) {
                        self.playback = None;
                    }
                }
                Event::TimeAdvanced { dt } => self.advance(*dt, out),
                _ => {}
            }
        }
    }

    fn advance(&mut self, dt: Duration, out: &mut Vec<Command>) {
        let Some(playback) = self.playback.as_mut() else {
            return;
        };

        playback.elapsed = playback.elapsed.saturating_add(dt);
        playback.line_elapsed = playback.line_elapsed.saturating_add(dt);
        let mut paged = false;
        while let Some(line) = playback.subtitles.get(playback.line) {
            if playback.line_elapsed < line.duration {
                break;
            }
            playback.line_elapsed -= line.duration;
            playback.line += 1;
            paged = true;
        }

        if playback.elapsed >= playback.duration && !playback.completion_sent {
            playback.completion_sent = true;
            out.push(Command::CompleteNarration {
                clip: playback.clip,
            });
        }

        if paged {
            self.log_current_line();
        }
    }

    fn log_current_line(&self) {
        if let Some(text) = self.subtitle().filter(|text| !text.is_empty()) {
            info!("subtitle: {text}");
        }
    }

    /// Subtitle line on screen, if any.
    pub(crate) fn subtitle(&self) -> Option<&str> {
        let playback = self.playback.as_ref()?;
        playback
            .subtitles
            .get(playback.line)
            .map(|line| line.text.as_str())
    }
}
