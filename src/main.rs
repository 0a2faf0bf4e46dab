mod input;
mod shader;
mod window;

use std::path::Path;

use thiserror::Error;
use treemorph::{MorphEngine, TreeConfig};
use winit::event_loop::{ControlFlow, EventLoop};

/// Everything that can stop the viewer before or during setup.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("configuration: {0}")]
    Config(#[from] treemorph::Error),

    #[error("event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("surface creation failed: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("surface reports no supported formats")]
    UnsupportedSurface,

    #[error("device request failed: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

fn main() -> Result<(), ViewerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => {
            log::info!("loading configuration from {}", Path::new(&path).display());
            TreeConfig::load(&path)?
        }
        None => TreeConfig::default(),
    };
    let engine = MorphEngine::new(config)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = window::App::new(engine);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
