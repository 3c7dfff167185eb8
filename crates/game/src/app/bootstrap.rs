use handmade_platform::{
    resolve_app_paths, AssetReader, DirAssetReader, LoopConfig, Simulation, StartupError,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::load_loop_config;
use super::gameplay::DemoSimulation;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) simulation: Box<dyn Simulation>,
    pub(crate) assets: Box<dyn AssetReader>,
}

pub(crate) fn build_app() -> Result<AppWiring, StartupError> {
    init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "startup");

    let paths = resolve_app_paths()?;
    info!(
        root = %paths.root.display(),
        asset_dir = %paths.asset_dir.display(),
        "app_paths"
    );
    let config = load_loop_config(&paths.config_path);

    Ok(AppWiring {
        config,
        simulation: Box::new(DemoSimulation::new()),
        assets: Box::new(DirAssetReader::new(paths.asset_dir)),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
