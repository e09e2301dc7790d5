use std::collections::VecDeque;
use std::time::Duration;

use crate::event::Event;
use crate::runtime::RuntimeConfig;
use crate::time::ManualClock;

use super::{EventSource, Platform, RenderBackend};

/// Counters recorded by [`HeadlessPlatform`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessStats {
    pub initialized: bool,
    pub shutdowns: usize,
    pub pumps: usize,
    pub begin_frames: usize,
    pub end_frames: usize,
    pub resets: Vec<(u32, u32)>,
}

struct ScriptedFrame {
    delta: Duration,
    events: Vec<Event>,
}

/// Window-less platform that replays a script of frames.
///
/// Each `pump` consumes one scripted frame: the attached [`ManualClock`] is
/// advanced by the frame's delta and its events are queued. Once the script
/// is exhausted every pump queues [`Event::Quit`].
#[derive(Default)]
pub struct HeadlessPlatform {
    script: VecDeque<ScriptedFrame>,
    queue: VecDeque<Event>,
    clock: Option<ManualClock>,
    init_error: Option<String>,
    stats: HeadlessStats,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock advanced by each scripted frame's delta.
    pub fn with_clock(mut self, clock: ManualClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Appends one frame.
    pub fn frame(mut self, delta: Duration, events: Vec<Event>) -> Self {
        self.script.push_back(ScriptedFrame { delta, events });
        self
    }

    /// Appends `count` event-less frames of `delta` each.
    pub fn frames(mut self, count: usize, delta: Duration) -> Self {
        for _ in 0..count {
            self.script.push_back(ScriptedFrame { delta, events: Vec::new() });
        }
        self
    }

    /// Makes `initialize` fail with `message`.
    pub fn failing_init(mut self, message: impl Into<String>) -> Self {
        self.init_error = Some(message.into());
        self
    }

    pub fn stats(&self) -> &HeadlessStats {
        &self.stats
    }

    /// Scripted frames not yet pumped.
    pub fn remaining_frames(&self) -> usize {
        self.script.len()
    }
}

impl EventSource for HeadlessPlatform {
    fn pump(&mut self) {
        self.stats.pumps += 1;

        let Some(frame) = self.script.pop_front() else {
            self.queue.push_back(Event::Quit);
            return;
        };

        if let Some(clock) = &self.clock {
            clock.advance(frame.delta);
        }
        self.queue.extend(frame.events);
    }

    fn poll_event(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }
}

impl RenderBackend for HeadlessPlatform {
    fn begin_frame(&mut self) {
        self.stats.begin_frames += 1;
    }

    fn end_frame(&mut self) {
        self.stats.end_frames += 1;
    }

    fn reset(&mut self, width: u32, height: u32) {
        self.stats.resets.push((width, height));
    }
}

impl Platform for HeadlessPlatform {
    fn initialize(&mut self, _config: &RuntimeConfig) -> anyhow::Result<()> {
        if let Some(message) = &self.init_error {
            anyhow::bail!("{message}");
        }
        self.stats.initialized = true;
        Ok(())
    }

    fn shutdown(&mut self) {
        self.stats.initialized = false;
        self.stats.shutdowns += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimeSource;

    #[test]
    fn pump_advances_clock_and_queues_events() {
        let clock = ManualClock::new();
        let mut platform = HeadlessPlatform::new()
            .with_clock(clock.clone())
            .frame(Duration::from_millis(16), vec![Event::Focused(true)]);
        let start = clock.now();

        platform.pump();

        assert_eq!(clock.elapsed(start), Duration::from_millis(16));
        assert_eq!(platform.poll_event(), Some(Event::Focused(true)));
        assert_eq!(platform.poll_event(), None);
    }

    #[test]
    fn exhausted_script_requests_quit() {
        let mut platform = HeadlessPlatform::new();
        platform.pump();
        assert_eq!(platform.poll_event(), Some(Event::Quit));
    }

    #[test]
    fn failing_init_reports_message() {
        let mut platform = HeadlessPlatform::new().failing_init("no display");
        let err = platform.initialize(&RuntimeConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "no display");
        assert!(!platform.stats().initialized);
    }
}
