// Conjure device bootstrap
//
// Enumerates Vulkan devices, picks the first one with graphics + transfer
// queues, BC texture compression and 32-bit indices, and opens it.

pub mod backend;
pub mod config;
pub mod error;
pub mod settings;

pub use backend::{Engine, Graphics, GraphicsApi, VulkanApi};
pub use error::{EngineError, VulkanError};
pub use settings::EngineSettings;
