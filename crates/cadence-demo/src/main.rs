//! Cadence demo: title screen, a fixed-step play state and a pause overlay.
//!
//! Space or Enter starts play, Escape pauses, closing the window while paused
//! needs a second attempt.

mod states;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use cadence_engine::logging::{LoggingConfig, init_logging};
use cadence_engine::platform::{DesktopPlatform, GpuInit, WindowConfig};
use cadence_engine::resource::ResourceCache;
use cadence_engine::runtime::{Runtime, RuntimeConfig};
use cadence_engine::state::{LayerFlags, StateManager};

use states::{AssetLoader, Assets, TitleState};

/// Stands in for texture decoding: every key resolves to a label.
fn load_asset(key: &str) -> Result<String> {
    anyhow::ensure!(!key.is_empty(), "empty asset key");
    log::debug!("loading asset '{key}'");
    Ok(format!("<texture {key}>"))
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default().with_filter("info,cadence_engine=debug"));

    let assets: Assets = Rc::new(RefCell::new(ResourceCache::new(load_asset as AssetLoader)));

    let config = RuntimeConfig::default()
        .with_tick_rate(60)
        .with_max_updates_per_tick(8);
    let mut platform = DesktopPlatform::with_gpu_init(
        WindowConfig::new("Cadence demo", 960, 540),
        GpuInit::default().with_power_preference(wgpu::PowerPreference::LowPower),
    );
    platform.set_clear_color(wgpu::Color { r: 0.05, g: 0.06, b: 0.09, a: 1.0 });

    let mut runtime = Runtime::new(config, platform)?;
    runtime.initialize()?;

    let desktop = runtime.platform();
    if let Some(size) = desktop.window_size() {
        log::info!(
            "'{}' open at {}x{} physical pixels",
            desktop.window_config().title,
            size.width,
            size.height
        );
    }

    let mut states = StateManager::new();
    states.push(TitleState::new(assets.clone()), LayerFlags::default());

    runtime.run(&mut states)?;

    log::info!(
        "stopped after {} frames ({:.1} fps at the end)",
        runtime.frame_index(),
        runtime.current_fps()
    );

    let released = assets.borrow_mut().cleanup();
    log::info!("released {released} cached asset slots");

    runtime.shutdown();
    Ok(())
}
