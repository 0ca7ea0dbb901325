// Real-driver bootstrap. Needs a Vulkan ICD: cargo test -- --ignored

use conjure_device::{Engine, EngineError, EngineSettings, Graphics, VulkanApi};

fn settings() -> EngineSettings {
    EngineSettings {
        application_name: "Unit Test".to_string(),
        application_version: 1,
        enable_debug: true,
    }
}

#[test]
#[ignore = "requires a Vulkan driver"]
fn engine_creation_and_destruction() {
    let api = VulkanApi::load().expect("Vulkan library");

    let mut graphics = Graphics::new(api.clone());
    graphics.initialize(&settings()).expect("initialize");
    assert!(graphics.device().is_ok());

    // Only one engine per process
    assert!(matches!(
        Engine::initialize(api, &settings()),
        Err(EngineError::AlreadyInitialized)
    ));

    graphics.shutdown();
    graphics.shutdown();
    assert!(matches!(graphics.device(), Err(EngineError::NotInitialized)));
}
