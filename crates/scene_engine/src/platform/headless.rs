//! Windowless platform with scripted input

use crate::input::{InputEvent, InputState};
use crate::platform::Platform;

/// Platform without a window
///
/// Frames are counted by [`Platform::poll`]. Scripted events are applied on
/// the poll of the frame they are scheduled for, and the platform asks to
/// close once the configured number of frames has been polled.
#[derive(Debug, Clone)]
pub struct HeadlessPlatform {
    size: (f32, f32),
    frame: u64,
    close_after: Option<u64>,
    close_requested: bool,
    script: Vec<(u64, InputEvent)>,
    shut_down: bool,
}

impl HeadlessPlatform {
    /// Headless surface of the given size that runs until closed
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            size: (width, height),
            frame: 0,
            close_after: None,
            close_requested: false,
            script: Vec::new(),
            shut_down: false,
        }
    }

    /// Request close after `frames` polls
    #[must_use]
    pub const fn close_after(mut self, frames: u64) -> Self {
        self.close_after = Some(frames);
        self
    }

    /// Schedule an input event for a frame (0-based)
    pub fn schedule(&mut self, frame: u64, event: InputEvent) {
        self.script.push((frame, event));
    }

    /// Builder form of [`HeadlessPlatform::schedule`]
    #[must_use]
    pub fn with_event(mut self, frame: u64, event: InputEvent) -> Self {
        self.schedule(frame, event);
        self
    }

    /// Frames polled so far
    #[must_use]
    pub const fn frames_polled(&self) -> u64 {
        self.frame
    }

    /// Whether `shutdown` ran
    #[must_use]
    pub const fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl Platform for HeadlessPlatform {
    fn poll(&mut self, input: &mut InputState) {
        let frame = self.frame;
        for (_, event) in self.script.iter().filter(|(at, _)| *at == frame) {
            input.apply(*event);
        }
        self.frame += 1;
        if self.close_after.is_some_and(|limit| self.frame >= limit) {
            self.close_requested = true;
        }
    }

    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn request_close(&mut self) {
        self.close_requested = true;
    }

    fn screen_size(&self) -> (f32, f32) {
        self.size
    }

    fn shutdown(&mut self) {
        self.shut_down = true;
        log::debug!("Headless platform shut down after {} frames", self.frame);
    }
}
