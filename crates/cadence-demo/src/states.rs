use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use cadence_engine::event::{Event, Key};
use cadence_engine::resource::ResourceCache;
use cadence_engine::state::{LayerFlags, State, StateCtx};

pub type AssetLoader = fn(&str) -> anyhow::Result<String>;

/// Cache shared by every state of the demo.
pub type Assets = Rc<RefCell<ResourceCache<AssetLoader>>>;

fn fetch(assets: &Assets, key: &str) -> Option<Arc<String>> {
    assets.borrow_mut().get(key)
}

// ── title ────────────────────────────────────────────────────────────────

pub struct TitleState {
    assets: Assets,
    logo: Option<Arc<String>>,
}

impl TitleState {
    pub fn new(assets: Assets) -> Self {
        Self { assets, logo: None }
    }
}

impl State for TitleState {
    fn on_enter(&mut self) {
        self.logo = fetch(&self.assets, "title/logo");
        log::info!("title screen: Space or Enter to start, Escape to quit");
    }

    fn on_exit(&mut self) {
        self.logo = None;
    }

    fn on_event(&mut self, ctx: &mut StateCtx<'_>, event: &Event) {
        if event.is_key_pressed(Key::Space) || event.is_key_pressed(Key::Enter) {
            ctx.replace_top(PlayState::new(self.assets.clone()), LayerFlags::default());
        } else if event.is_key_pressed(Key::Escape) {
            ctx.quit();
        }
    }

    fn on_fixed_update(&mut self, _ctx: &mut StateCtx<'_>, _dt: f64) {}

    fn on_update(&mut self, _ctx: &mut StateCtx<'_>, _dt: f64) {}

    fn on_render(&mut self, _ctx: &mut StateCtx<'_>, _alpha: f64) {
        if let Some(logo) = &self.logo {
            log::trace!("draw {logo}");
        }
    }

    fn name(&self) -> &str {
        "title"
    }
}

// ── play ─────────────────────────────────────────────────────────────────

/// Units per second.
const SPEED: f64 = 120.0;
const TRACK_LENGTH: f64 = 800.0;

pub struct PlayState {
    assets: Assets,
    sprite: Option<Arc<String>>,

    previous_x: f64,
    x: f64,
    ticks: u64,
    elapsed: f64,
}

impl PlayState {
    pub fn new(assets: Assets) -> Self {
        Self {
            assets,
            sprite: None,
            previous_x: 0.0,
            x: 0.0,
            ticks: 0,
            elapsed: 0.0,
        }
    }
}

impl State for PlayState {
    fn on_enter(&mut self) {
        self.sprite = fetch(&self.assets, "play/runner");
        log::info!("play started: Escape pauses");
    }

    fn on_exit(&mut self) {
        log::info!("play ended after {} ticks", self.ticks);
        self.sprite = None;
    }

    fn on_event(&mut self, ctx: &mut StateCtx<'_>, event: &Event) {
        if event.is_key_pressed(Key::Escape) {
            ctx.push_modal(PauseState::new(self.assets.clone()), true);
        }
    }

    fn on_fixed_update(&mut self, _ctx: &mut StateCtx<'_>, dt: f64) {
        self.previous_x = self.x;
        self.x = (self.x + SPEED * dt) % TRACK_LENGTH;
        if self.x < self.previous_x {
            // Wrapped; don't interpolate across the jump.
            self.previous_x = self.x;
        }
        self.ticks += 1;
    }

    fn on_update(&mut self, _ctx: &mut StateCtx<'_>, dt: f64) {
        self.elapsed += dt;
    }

    fn on_render(&mut self, ctx: &mut StateCtx<'_>, alpha: f64) {
        let drawn_x = self.previous_x + (self.x - self.previous_x) * alpha;
        if ctx.frame_index() % 120 == 0 {
            log::info!(
                "frame {}: {} ticks in {:.2}s, runner at {drawn_x:.1} (alpha {alpha:.3})",
                ctx.frame_index(),
                self.ticks,
                self.elapsed,
            );
        }
        if let Some(sprite) = &self.sprite {
            log::trace!("draw {sprite} at {drawn_x:.1}");
        }
    }

    fn name(&self) -> &str {
        "play"
    }
}

// ── pause ────────────────────────────────────────────────────────────────

pub struct PauseState {
    assets: Assets,
    banner: Option<Arc<String>>,
    quit_vetoed: bool,
}

impl PauseState {
    pub fn new(assets: Assets) -> Self {
        Self {
            assets,
            banner: None,
            quit_vetoed: false,
        }
    }
}

impl State for PauseState {
    fn on_enter(&mut self) {
        self.banner = fetch(&self.assets, "pause/banner");
        log::info!("paused: Escape resumes, Q quits");
    }

    fn on_exit(&mut self) {
        self.banner = None;
        let released = self.assets.borrow_mut().cleanup();
        log::debug!("pause closed, {released} asset slots released");
    }

    fn on_quit_requested(&mut self) -> bool {
        if self.quit_vetoed {
            return true;
        }
        self.quit_vetoed = true;
        log::warn!("quit requested while paused; close again to confirm");
        false
    }

    fn on_event(&mut self, ctx: &mut StateCtx<'_>, event: &Event) {
        if event.is_key_pressed(Key::Escape) {
            ctx.pop();
        } else if event.is_key_pressed(Key::Q) {
            ctx.quit();
        }
    }

    fn on_fixed_update(&mut self, _ctx: &mut StateCtx<'_>, _dt: f64) {}

    fn on_update(&mut self, _ctx: &mut StateCtx<'_>, _dt: f64) {}

    fn on_render(&mut self, _ctx: &mut StateCtx<'_>, _alpha: f64) {
        if let Some(banner) = &self.banner {
            log::trace!("draw {banner} over the stack");
        }
    }

    fn name(&self) -> &str {
        "pause"
    }
}
