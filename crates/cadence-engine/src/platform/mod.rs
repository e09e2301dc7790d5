//! Collaborator interfaces consumed by the runtime, and their implementations.
//!
//! - [`EventSource`]: drained fully at the top of every frame
//! - [`RenderBackend`]: brackets the render callback
//! - [`Platform`]: both of the above plus window/device lifetime
//!
//! [`DesktopPlatform`] is the winit + wgpu implementation; [`HeadlessPlatform`]
//! replays a script and needs no window.

// winit's pump_events is unavailable on the web and iOS.
#[cfg(not(any(target_arch = "wasm32", target_os = "ios")))]
mod desktop;
mod headless;

#[cfg(not(any(target_arch = "wasm32", target_os = "ios")))]
pub use desktop::{DesktopPlatform, GpuInit, WindowConfig};
pub use headless::{HeadlessPlatform, HeadlessStats};

use crate::event::Event;
use crate::runtime::RuntimeConfig;

/// Source of platform events.
pub trait EventSource {
    /// Collects whatever the OS has queued. Called once per frame before
    /// `poll_event` is drained.
    fn pump(&mut self) {}

    fn poll_event(&mut self) -> Option<Event>;
}

/// Frame submission.
pub trait RenderBackend {
    /// Prepares the frame the render callback will draw into.
    fn begin_frame(&mut self);

    /// Submits and presents the frame.
    fn end_frame(&mut self);

    /// Resizes the backbuffer, in physical pixels.
    fn reset(&mut self, width: u32, height: u32);
}

/// Window host plus event source plus render backend.
pub trait Platform: EventSource + RenderBackend {
    /// Acquires the window and device.
    ///
    /// On error the runtime calls [`Platform::shutdown`], which must release
    /// whatever was acquired before the failure.
    fn initialize(&mut self, config: &RuntimeConfig) -> anyhow::Result<()>;

    /// Releases the device, then the window. Must be safe to call more than once.
    fn shutdown(&mut self);
}
