//! winit + wgpu platform.
//!
//! The OS event loop is pumped once per frame with a zero timeout, so the
//! runtime keeps ownership of the loop. The window and its GPU surface live in
//! one self-referencing entry; dropping it tears down the surface before the
//! window.

mod gpu;
mod translate;

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Fullscreen, Window, WindowId};

pub use gpu::GpuInit;

use gpu::{Gpu, GpuFrame, SurfaceErrorAction};
use translate::translate_window_event;

use super::{EventSource, Platform, RenderBackend};
use crate::event::{Event, Modifiers};
use crate::runtime::RuntimeConfig;

/// Window creation parameters.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    /// Logical width.
    pub width: u32,
    /// Logical height.
    pub height: u32,
    pub resizable: bool,
    /// Borderless fullscreen on the current monitor.
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "cadence".to_string(),
            width: 1280,
            height: 720,
            resizable: true,
            fullscreen: false,
        }
    }
}

impl WindowConfig {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// Receives winit callbacks during a pump.
struct Host {
    window_config: WindowConfig,
    gpu_init: GpuInit,

    wants_window: bool,
    entry: Option<WindowEntry>,
    init_error: Option<anyhow::Error>,

    modifiers: Modifiers,
    queue: VecDeque<Event>,
}

impl Host {
    fn ensure_window(&mut self, event_loop: &ActiveEventLoop) {
        if !self.wants_window || self.entry.is_some() || self.init_error.is_some() {
            return;
        }
        match self.create_window_entry(event_loop) {
            Ok(entry) => self.entry = Some(entry),
            Err(e) => self.init_error = Some(e),
        }
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let config = &self.window_config;
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_resizable(config.resizable)
            .with_fullscreen(config.fullscreen.then_some(Fullscreen::Borderless(None)));

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        entry.with_gpu(|gpu| {
            let info = gpu.adapter_info();
            log::info!("window created on {} ({:?})", info.name, info.backend);
        });
        Ok(entry)
    }
}

impl ApplicationHandler for Host {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.ensure_window(event_loop);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // `resumed` fires once per process; later re-initializations land here.
        self.ensure_window(event_loop);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(entry) = &self.entry else {
            return;
        };
        let modifiers = &mut self.modifiers;
        let queue = &mut self.queue;
        entry.with_window(|w| translate_window_event(w, modifiers, &event, queue));
    }
}

/// Desktop [`Platform`]: one winit window with a wgpu surface.
pub struct DesktopPlatform {
    event_loop: Option<EventLoop<()>>,
    host: Host,
    frame: Option<GpuFrame>,
}

impl DesktopPlatform {
    pub fn new(window_config: WindowConfig) -> Self {
        Self::with_gpu_init(window_config, GpuInit::default())
    }

    pub fn with_gpu_init(window_config: WindowConfig, gpu_init: GpuInit) -> Self {
        Self {
            event_loop: None,
            host: Host {
                window_config,
                gpu_init,
                wants_window: false,
                entry: None,
                init_error: None,
                modifiers: Modifiers::default(),
                queue: VecDeque::new(),
            },
            frame: None,
        }
    }

    pub fn window_config(&self) -> &WindowConfig {
        &self.host.window_config
    }

    /// Color the backbuffer is cleared to. Takes effect on the next window creation.
    pub fn set_clear_color(&mut self, color: wgpu::Color) {
        self.host.gpu_init.clear_color = color;
    }

    /// Current drawable size in physical pixels, when a window exists.
    pub fn window_size(&self) -> Option<PhysicalSize<u32>> {
        self.host
            .entry
            .as_ref()
            .map(|e| e.with_window(|w| w.inner_size()))
    }

    fn pump_os(&mut self) -> PumpStatus {
        match self.event_loop.as_mut() {
            Some(event_loop) => event_loop.pump_app_events(Some(Duration::ZERO), &mut self.host),
            None => PumpStatus::Continue,
        }
    }
}

impl EventSource for DesktopPlatform {
    fn pump(&mut self) {
        if let PumpStatus::Exit(code) = self.pump_os() {
            log::info!("event loop exited (code {code})");
            self.host.queue.push_back(Event::Quit);
        }
    }

    fn poll_event(&mut self) -> Option<Event> {
        self.host.queue.pop_front()
    }
}

impl RenderBackend for DesktopPlatform {
    fn begin_frame(&mut self) {
        let Some(entry) = self.host.entry.as_mut() else {
            return;
        };

        match entry.with_gpu(|gpu| gpu.begin_frame()) {
            Ok(frame) => self.frame = Some(frame),
            Err(err) => {
                let action = entry.with_gpu_mut(|gpu| gpu.handle_surface_error(err.clone()));
                match action {
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        log::debug!("skipping frame: {err}");
                    }
                    SurfaceErrorAction::Fatal => {
                        log::error!("fatal surface error: {err}");
                        self.host.queue.push_back(Event::Quit);
                    }
                }
            }
        }
    }

    fn end_frame(&mut self) {
        let (Some(entry), Some(frame)) = (self.host.entry.as_ref(), self.frame.take()) else {
            return;
        };
        entry.with(|fields| {
            fields.window.pre_present_notify();
            fields.gpu.submit(frame);
        });
    }

    fn reset(&mut self, width: u32, height: u32) {
        if let Some(entry) = self.host.entry.as_mut() {
            entry.with_gpu_mut(|gpu| gpu.resize(PhysicalSize::new(width, height)));
        }
    }
}

impl Platform for DesktopPlatform {
    fn initialize(&mut self, config: &RuntimeConfig) -> Result<()> {
        self.host.gpu_init.present_mode = if config.vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        if self.event_loop.is_none() {
            let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
            event_loop.set_control_flow(ControlFlow::Poll);
            self.event_loop = Some(event_loop);
        }

        self.host.wants_window = true;
        self.host.init_error = None;

        if let PumpStatus::Exit(code) = self.pump_os() {
            anyhow::bail!("event loop exited during startup (code {code})");
        }
        if let Some(err) = self.host.init_error.take() {
            return Err(err);
        }
        anyhow::ensure!(self.host.entry.is_some(), "window was not created on the first pump");
        Ok(())
    }

    fn shutdown(&mut self) {
        // Frame first, then surface + device, then the window.
        self.frame = None;
        self.host.wants_window = false;
        if self.host.entry.take().is_some() {
            log::debug!("window destroyed");
        }
        self.host.queue.clear();
        // winit allows one EventLoop per process; it is kept for re-initialization.
    }
}
