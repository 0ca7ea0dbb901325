// =============================================================================
// CONJURE DEVICE BOOTSTRAP
// =============================================================================
//
// Opens the first suitable Vulkan device and closes it again.
//
// FLOW:
// 1. Load config.toml (defaults if missing)
// 2. Initialize logging
// 3. Create instance, select device, open logical device
// 4. Report the selection
// 5. Shut down (device first, then instance)
//
// =============================================================================

use anyhow::{Context, Result};
use conjure_device::config::Config;
use conjure_device::{Graphics, VulkanApi};

fn main() -> Result<()> {
    let config = Config::load();

    init_logging(&config);
    log::info!("Starting Conjure device bootstrap");

    let settings = config.engine_settings();
    let api = VulkanApi::load()?;
    let mut graphics = Graphics::new(api);

    graphics
        .initialize(&settings)
        .context("Failed to initialize graphics engine")?;

    let engine = graphics.engine()?;
    let selected = engine.selected_device();
    let queues = engine.queues();
    log::info!(
        "Using {} (graphics queue {}:{}, transfer queue {}:{})",
        selected.name,
        queues.graphics_family,
        queues.graphics_index,
        queues.transfer_family,
        queues.transfer_index
    );
    if !engine.layers().is_empty() {
        log::info!("Layers: {}", engine.layers().join(", "));
    }

    graphics.shutdown();
    log::info!("Shutdown complete");
    Ok(())
}

/// Initialize logging; RUST_LOG overrides the configured level
fn init_logging(config: &Config) {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or(config.log_level().as_str())).init();
}
