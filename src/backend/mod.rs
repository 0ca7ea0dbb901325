// Backend module - device bootstrap behind a graphics API abstraction
//
// Design: one engine implementation, generic over the API binding.
// The Vulkan binding is a thin wrapper around ash.

pub mod api;
pub mod engine;
pub mod selection;
pub mod vulkan;

#[cfg(test)]
pub(crate) mod fake;

pub use api::GraphicsApi;
pub use engine::{Engine, Graphics};
pub use vulkan::VulkanApi;
