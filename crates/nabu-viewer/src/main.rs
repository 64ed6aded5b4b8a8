mod camera;
mod demo;
mod viewer;

use anyhow::Result;
use nabu_engine::device::GpuInit;
use nabu_engine::logging::{init_logging, LoggingConfig};
use nabu_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

use crate::viewer::Viewer;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    log::info!("drag to pan, wheel or +/- to zoom, tap a marker to select it,");
    log::info!("long-press to remove it, space toggles the marker draw limit");

    let config = RuntimeConfig {
        title: "nabu viewer".to_string(),
        initial_size: LogicalSize::new(1024.0, 720.0),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuInit::default(), Viewer::new())
}
