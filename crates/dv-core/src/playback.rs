//! Index-driven slideshow with a single interval timer

use std::time::Duration;

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);
pub const MAX_INTERVAL: Duration = Duration::from_millis(2000);

/// Frame navigation plus playback timer.
///
/// The timer is a single accumulator driven by `tick`. Starting playback,
/// changing the interval or resetting the frames discards whatever time was
/// pending, so there is never more than one interval in flight.
#[derive(Debug, Clone)]
pub struct Slideshow {
    frames: Vec<i32>,
    position: usize,
    playing: bool,
    interval: Duration,
    elapsed: Duration,
}

impl Slideshow {
    pub fn new(frames: Vec<i32>) -> Self {
        Self {
            frames,
            position: 0,
            playing: false,
            interval: DEFAULT_INTERVAL,
            elapsed: Duration::ZERO,
        }
    }

    pub fn frames(&self) -> &[i32] {
        &self.frames
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current_frame(&self) -> Option<i32> {
        self.frames.get(self.position).copied()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Jump to a frame index
    pub fn seek_to(&mut self, position: usize) -> Result<(), String> {
        if position < self.frames.len() {
            self.position = position;
            Ok(())
        } else {
            Err(format!(
                "Position {} out of bounds ({} frames)",
                position,
                self.frames.len()
            ))
        }
    }

    /// Step forward by one frame
    pub fn next(&mut self) -> Result<(), String> {
        if self.position + 1 < self.frames.len() {
            self.position += 1;
            Ok(())
        } else {
            Err("Already at end".to_string())
        }
    }

    /// Step backward by one frame
    pub fn previous(&mut self) -> Result<(), String> {
        if self.position > 0 {
            self.position -= 1;
            Ok(())
        } else {
            Err("Already at beginning".to_string())
        }
    }

    pub fn play(&mut self) {
        if self.frames.is_empty() {
            return;
        }
        self.elapsed = Duration::ZERO;
        self.playing = true;
        tracing::debug!("Slideshow playing at {:?} per frame", self.interval);
    }

    pub fn pause(&mut self) {
        self.playing = false;
        self.elapsed = Duration::ZERO;
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Change the frame interval, clamped to the allowed bounds.
    /// A running timer restarts with the new interval.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval.clamp(MIN_INTERVAL, MAX_INTERVAL);
        self.elapsed = Duration::ZERO;
    }

    /// Advance the timer by `dt`; returns whether the frame changed.
    /// Past the last frame playback wraps to the first.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if !self.playing || self.frames.is_empty() {
            return false;
        }
        self.elapsed += dt;
        let mut advanced = false;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            self.position = (self.position + 1) % self.frames.len();
            advanced = true;
        }
        advanced
    }

    /// Time until the next frame change, for scheduling repaints
    pub fn remaining(&self) -> Option<Duration> {
        self.playing.then(|| self.interval.saturating_sub(self.elapsed))
    }

    /// Stop playback and load a new frame list
    pub fn reset(&mut self, frames: Vec<i32>) {
        self.pause();
        self.frames = frames;
        self.position = 0;
    }
}
