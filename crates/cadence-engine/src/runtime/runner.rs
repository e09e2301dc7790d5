use std::thread;
use std::time::Duration;

use crate::core::{App, LoopCtx};
use crate::event::Event;
use crate::platform::Platform;
use crate::time::{SystemClock, TimeSource};

use super::config::RuntimeConfig;
use super::error::RuntimeError;
use super::pacer::FramePacer;

/// Frames shorter than this yield the thread when vsync is off.
const YIELD_SLICE: Duration = Duration::from_nanos(4_166_667); // 1/240 s

/// Fixed-step loop driver.
///
/// Owns the platform (window, device, event source) and the clock. The
/// platform is initialized by [`initialize`](Self::initialize) and torn down
/// by [`shutdown`](Self::shutdown) or on drop.
pub struct Runtime<P: Platform, C: TimeSource = SystemClock> {
    config: RuntimeConfig,
    platform: P,
    clock: C,
    pacer: FramePacer,
    running: bool,
    initialized: bool,
    frame_index: u64,
}

impl<P: Platform> Runtime<P, SystemClock> {
    pub fn new(config: RuntimeConfig, platform: P) -> Result<Self, RuntimeError> {
        Self::with_clock(config, platform, SystemClock::new())
    }
}

impl<P: Platform, C: TimeSource> Runtime<P, C> {
    /// Creates a runtime reading time from `clock`. The config is validated here.
    pub fn with_clock(config: RuntimeConfig, platform: P, clock: C) -> Result<Self, RuntimeError> {
        let pacer = FramePacer::new(&config)?;
        Ok(Self {
            config,
            platform,
            clock,
            pacer,
            running: false,
            initialized: false,
            frame_index: 0,
        })
    }

    /// Brings up the platform. Idempotent once it has succeeded.
    ///
    /// On failure the platform is shut down again so nothing half-built
    /// survives, and the runtime stays uninitialized.
    pub fn initialize(&mut self) -> Result<(), RuntimeError> {
        if self.initialized {
            return Ok(());
        }
        self.config.validate()?;

        if let Err(err) = self.platform.initialize(&self.config) {
            log::error!("platform initialization failed: {err:#}");
            self.platform.shutdown();
            return Err(RuntimeError::Platform(err));
        }

        self.initialized = true;
        log::info!(
            "runtime initialized (fixed step {:?}, max step {:?}, {} updates/tick, vsync {})",
            self.config.fixed_timestep,
            self.config.max_timestep,
            self.config.max_updates_per_tick,
            self.config.vsync,
        );
        Ok(())
    }

    /// Runs frames until a quit request is accepted.
    ///
    /// Fails without side effects when called before a successful
    /// `initialize` or while already running.
    pub fn run<A: App>(&mut self, app: &mut A) -> Result<(), RuntimeError> {
        if !self.initialized {
            log::error!("runtime not initialized");
            return Err(RuntimeError::NotInitialized);
        }
        if self.running {
            log::error!("runtime already running");
            return Err(RuntimeError::AlreadyRunning);
        }

        self.running = true;
        self.pacer.reset();
        let mut last_tick = self.clock.now();

        while self.running {
            let mut ctx = LoopCtx::new(self.frame_index);

            app.on_frame_start();
            self.dispatch_events(app, &mut ctx);

            let now = self.clock.now();
            let raw = now.saturating_duration_since(last_tick);
            last_tick = now;

            let step = self
                .pacer
                .advance(raw, |dt| app.on_fixed_update(&mut ctx, dt));
            self.apply_requests(app, &mut ctx);

            app.on_update(&mut ctx, step.delta_secs());
            self.apply_requests(app, &mut ctx);

            self.platform.begin_frame();
            app.on_render(&mut ctx, step.alpha);
            self.platform.end_frame();
            self.apply_requests(app, &mut ctx);

            app.on_frame_end();
            self.frame_index = self.frame_index.wrapping_add(1);

            if !self.config.vsync && step.delta < YIELD_SLICE {
                thread::sleep(Duration::from_nanos(1));
            }
        }

        log::debug!("runtime stopped after {} frames", self.frame_index);
        Ok(())
    }

    /// Tears the platform down. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        self.platform.shutdown();
        self.initialized = false;
        log::debug!("runtime shut down");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Clamped delta of the most recent frame, in seconds.
    pub fn last_delta_time(&self) -> f64 {
        self.pacer.last_delta().as_secs_f64()
    }

    /// Instantaneous frame rate from the last frame; 0 before any frame ran.
    pub fn current_fps(&self) -> f64 {
        let dt = self.last_delta_time();
        if dt > 0.0 { 1.0 / dt } else { 0.0 }
    }

    /// Frames completed since construction.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    fn dispatch_events<A: App>(&mut self, app: &mut A, ctx: &mut LoopCtx) {
        self.platform.pump();

        while let Some(event) = self.platform.poll_event() {
            match event {
                Event::Quit => {
                    log::debug!("quit event received");
                    self.request_quit(app);
                }
                Event::Resized { width, height } => {
                    if width > 0 && height > 0 {
                        self.platform.reset(width, height);
                    }
                    app.on_event(ctx, &event);
                }
                _ => app.on_event(ctx, &event),
            }
            self.apply_requests(app, ctx);
        }
    }

    fn apply_requests<A: App>(&mut self, app: &mut A, ctx: &mut LoopCtx) {
        if ctx.take_quit() {
            self.request_quit(app);
        }
    }

    /// Stops the loop at the end of the current frame unless `app` vetoes.
    fn request_quit<A: App>(&mut self, app: &mut A) {
        if !self.running {
            return;
        }
        if app.on_quit_requested() {
            self.running = false;
        } else {
            log::debug!("quit vetoed");
        }
    }
}

impl<P: Platform, C: TimeSource> Drop for Runtime<P, C> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessPlatform;
    use crate::time::ManualClock;

    const STEP: Duration = Duration::from_millis(10);

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        fixed_dts: Vec<f64>,
        update_dts: Vec<f64>,
        alphas: Vec<f64>,
        events: Vec<Event>,
        vetoes_left: usize,
        quit_asks: usize,
        quit_on_frame: Option<u64>,
    }

    impl App for Recorder {
        fn on_frame_start(&mut self) {
            self.calls.push("start");
        }

        fn on_event(&mut self, _ctx: &mut LoopCtx, event: &Event) {
            self.calls.push("event");
            self.events.push(event.clone());
        }

        fn on_fixed_update(&mut self, _ctx: &mut LoopCtx, dt: f64) {
            self.calls.push("fixed");
            self.fixed_dts.push(dt);
        }

        fn on_update(&mut self, ctx: &mut LoopCtx, dt: f64) {
            self.calls.push("update");
            self.update_dts.push(dt);
            if self.quit_on_frame == Some(ctx.frame_index()) {
                ctx.quit();
            }
        }

        fn on_render(&mut self, _ctx: &mut LoopCtx, alpha: f64) {
            self.calls.push("render");
            self.alphas.push(alpha);
        }

        fn on_frame_end(&mut self) {
            self.calls.push("end");
        }

        fn on_quit_requested(&mut self) -> bool {
            self.quit_asks += 1;
            if self.vetoes_left > 0 {
                self.vetoes_left -= 1;
                return false;
            }
            true
        }
    }

    fn config() -> RuntimeConfig {
        RuntimeConfig::default()
            .with_fixed_timestep(STEP)
            .with_max_timestep(Duration::from_secs(1))
            .with_max_updates_per_tick(3)
    }

    fn runtime(
        build: impl FnOnce(HeadlessPlatform) -> HeadlessPlatform,
    ) -> Runtime<HeadlessPlatform, ManualClock> {
        runtime_with(config(), build)
    }

    fn runtime_with(
        config: RuntimeConfig,
        build: impl FnOnce(HeadlessPlatform) -> HeadlessPlatform,
    ) -> Runtime<HeadlessPlatform, ManualClock> {
        let clock = ManualClock::new();
        let platform = build(HeadlessPlatform::new().with_clock(clock.clone()));
        Runtime::with_clock(config, platform, clock).unwrap()
    }

    // ── preconditions ────────────────────────────────────────────────────

    #[test]
    fn run_before_initialize_is_rejected() {
        let mut rt = runtime(|p| p.frames(3, STEP));
        let mut app = Recorder::default();

        let err = rt.run(&mut app).unwrap_err();

        assert!(matches!(err, RuntimeError::NotInitialized));
        assert!(app.calls.is_empty());
        assert_eq!(rt.platform().stats().pumps, 0);
        assert!(!rt.is_running());
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let bad = config().with_max_updates_per_tick(0);
        let result = Runtime::with_clock(bad, HeadlessPlatform::new(), ManualClock::new());
        assert!(matches!(
            result,
            Err(RuntimeError::InvalidConfig(crate::runtime::ConfigError::ZeroMaxUpdates))
        ));
    }

    #[test]
    fn failed_initialize_releases_platform() {
        let mut rt = runtime(|p| p.failing_init("no adapter"));

        let err = rt.initialize().unwrap_err();

        assert!(matches!(err, RuntimeError::Platform(_)));
        assert!(!rt.is_initialized());
        assert_eq!(rt.platform().stats().shutdowns, 1);
    }

    #[test]
    fn initialize_is_idempotent_and_shutdown_runs_once() {
        let mut rt = runtime(|p| p);
        rt.initialize().unwrap();
        rt.initialize().unwrap();
        assert!(rt.is_initialized());

        rt.shutdown();
        rt.shutdown();
        assert!(!rt.is_initialized());
        assert_eq!(rt.platform().stats().shutdowns, 1);
    }

    // ── frame ordering ───────────────────────────────────────────────────

    #[test]
    fn phases_run_in_order_and_quit_completes_frame() {
        let mut rt = runtime(|p| p.frame(Duration::from_millis(25), vec![Event::Focused(true)]));
        rt.initialize().unwrap();
        let mut app = Recorder::default();

        rt.run(&mut app).unwrap();

        assert_eq!(
            app.calls,
            [
                "start", "event", "fixed", "fixed", "update", "render", "end",
                "start", "update", "render", "end",
            ]
        );
        assert_eq!(app.events, [Event::Focused(true)]);
        assert_eq!(rt.frame_index(), 2);
        assert_eq!(rt.platform().stats().begin_frames, 2);
        assert_eq!(rt.platform().stats().end_frames, 2);
        assert!(!rt.is_running());
    }

    #[test]
    fn short_frames_without_vsync_keep_phase_order() {
        // 1ms frames are under the yield threshold.
        let script = |p: HeadlessPlatform| p.frames(12, Duration::from_millis(1));

        let mut synced = runtime_with(config(), script);
        synced.initialize().unwrap();
        let mut synced_app = Recorder::default();
        synced.run(&mut synced_app).unwrap();

        let mut unsynced = runtime_with(config().with_vsync(false), script);
        unsynced.initialize().unwrap();
        let mut unsynced_app = Recorder::default();
        unsynced.run(&mut unsynced_app).unwrap();

        assert!(!unsynced.config().vsync);
        assert_eq!(unsynced.frame_index(), 13);
        assert_eq!(unsynced.frame_index(), synced.frame_index());
        assert_eq!(unsynced_app.calls, synced_app.calls);
        assert_eq!(unsynced_app.fixed_dts.len(), 1);
        assert_eq!(unsynced.platform().stats().end_frames, 13);
    }

    #[test]
    fn deltas_and_alpha_reach_callbacks() {
        let mut rt = runtime(|p| p.frame(Duration::from_millis(15), Vec::new()));
        rt.initialize().unwrap();
        let mut app = Recorder::default();

        rt.run(&mut app).unwrap();

        assert_eq!(app.fixed_dts, [STEP.as_secs_f64()]);
        assert_eq!(app.update_dts[0], Duration::from_millis(15).as_secs_f64());
        assert!((app.alphas[0] - 0.5).abs() < 1e-9);
        assert!(app.alphas.iter().all(|a| (0.0..1.0).contains(a)));
    }

    #[test]
    fn fixed_updates_are_capped_per_frame() {
        let mut rt = runtime(|p| p.frames(4, Duration::from_secs(5)));
        rt.initialize().unwrap();
        let mut app = Recorder::default();

        rt.run(&mut app).unwrap();

        // 4 scripted stalls plus the quit frame.
        assert_eq!(rt.frame_index(), 5);
        assert_eq!(app.fixed_dts.len(), 4 * 3);
        assert_eq!(rt.last_delta_time(), 0.0);
    }

    #[test]
    fn resize_resets_backend_then_reaches_app() {
        let resize = Event::Resized { width: 800, height: 600 };
        let mut rt = runtime(|p| p.frame(STEP, vec![resize.clone()]));
        rt.initialize().unwrap();
        let mut app = Recorder::default();

        rt.run(&mut app).unwrap();

        assert_eq!(rt.platform().stats().resets, [(800, 600)]);
        assert_eq!(app.events, [resize]);
    }

    // ── quitting ─────────────────────────────────────────────────────────

    #[test]
    fn vetoed_quit_keeps_running() {
        let mut rt = runtime(|p| p.frame(STEP, Vec::new()));
        rt.initialize().unwrap();
        let mut app = Recorder { vetoes_left: 2, ..Recorder::default() };

        rt.run(&mut app).unwrap();

        assert_eq!(app.quit_asks, 3);
        assert_eq!(rt.frame_index(), 4);
    }

    #[test]
    fn quit_from_callback_finishes_current_frame() {
        let mut rt = runtime(|p| p.frames(10, STEP));
        rt.initialize().unwrap();
        let mut app = Recorder { quit_on_frame: Some(2), ..Recorder::default() };

        rt.run(&mut app).unwrap();

        assert_eq!(rt.frame_index(), 3);
        assert_eq!(app.alphas.len(), 3);
        assert_eq!(app.calls.last(), Some(&"end"));
        assert_eq!(rt.platform().remaining_frames(), 7);
    }

    #[test]
    fn run_can_start_again_after_stopping() {
        let mut rt = runtime(|p| p.frame(STEP, Vec::new()));
        rt.initialize().unwrap();
        let mut app = Recorder::default();

        rt.run(&mut app).unwrap();
        rt.run(&mut app).unwrap();

        assert!(!rt.is_running());
        assert_eq!(app.quit_asks, 2);
    }

    #[test]
    fn fps_tracks_last_delta() {
        let mut rt = runtime(|p| p.frame(Duration::from_millis(20), Vec::new()));
        assert_eq!(rt.current_fps(), 0.0);
        rt.initialize().unwrap();
        let mut app = Recorder { quit_on_frame: Some(0), ..Recorder::default() };

        rt.run(&mut app).unwrap();

        assert!((rt.current_fps() - 50.0).abs() < 1e-9);
    }
}
