// Engine startup settings
//
// Supplied once at startup and never mutated afterwards.

/// Application metadata and debug toggle passed to `Engine::initialize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub application_name: String,
    pub application_version: u32,
    /// Enable known validation layers when the loader reports them
    pub enable_debug: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            application_name: "Conjure".to_string(),
            application_version: 0,
            enable_debug: false,
        }
    }
}
