//! Minimal windowed programs over `orbit-engine`.
//!
//! Each binary picks a [`SceneConfig`] and hands it to [`run`].

mod demo;
pub mod scene;

use std::process::ExitCode;

use orbit_engine::device::GpuInit;
use orbit_engine::logging::{init_logging, LoggingConfig};
use orbit_engine::window::{Runtime, RuntimeConfig};

pub use demo::OrbitDemo;
pub use scene::SceneConfig;

/// Runs `scene` in an 800×600 window until it is closed.
///
/// Exit code 0 on a clean shutdown, 1 when startup failed.
pub fn run(scene: SceneConfig) -> ExitCode {
    init_logging(LoggingConfig::default());

    let runtime = RuntimeConfig {
        title: scene.title.clone(),
        ..RuntimeConfig::default()
    };

    match Runtime::run(runtime, GpuInit::default(), OrbitDemo::new(scene)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
