// Error kinds for engine bootstrap and Vulkan result translation
//
// Every fallible bootstrap step maps to one EngineError variant.
// Raw vk::Result codes are wrapped in VulkanError so they print as text.

use ash::vk;
use std::fmt;
use thiserror::Error;

/// Fallback for codes outside the known table
pub const UNKNOWN_RESULT: &str = "Unknown vulkan error";

/// Errors surfaced by `Engine::initialize` and friends.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("an engine is already initialized in this process")]
    AlreadyInitialized,

    #[error("the engine is not initialized")]
    NotInitialized,

    #[error("failed to load the Vulkan library: {0}")]
    Loader(String),

    #[error("application name contains an interior NUL byte")]
    InvalidName,

    #[error("failed to create Vulkan instance: {0}")]
    InstanceCreation(VulkanError),

    #[error("failed to enumerate physical devices: {0}")]
    Enumeration(VulkanError),

    #[error("could not find a suitable Vulkan device ({candidates} candidates inspected)")]
    NoSuitableDevice { candidates: usize },

    #[error("failed to create logical device: {0}")]
    DeviceCreation(VulkanError),
}

/// A non-success Vulkan status, displayed through `translate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VulkanError {
    pub result: vk::Result,
}

impl From<vk::Result> for VulkanError {
    fn from(result: vk::Result) -> Self {
        Self { result }
    }
}

impl fmt::Display for VulkanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(translate(self.result))
    }
}

impl std::error::Error for VulkanError {}

/// Status codes with a dedicated diagnostic.
pub const KNOWN_RESULTS: &[vk::Result] = &[
    vk::Result::SUCCESS,
    vk::Result::NOT_READY,
    vk::Result::TIMEOUT,
    vk::Result::EVENT_SET,
    vk::Result::EVENT_RESET,
    vk::Result::INCOMPLETE,
    vk::Result::ERROR_OUT_OF_HOST_MEMORY,
    vk::Result::ERROR_OUT_OF_DEVICE_MEMORY,
    vk::Result::ERROR_INITIALIZATION_FAILED,
    vk::Result::ERROR_DEVICE_LOST,
    vk::Result::ERROR_MEMORY_MAP_FAILED,
    vk::Result::ERROR_LAYER_NOT_PRESENT,
    vk::Result::ERROR_EXTENSION_NOT_PRESENT,
    vk::Result::ERROR_FEATURE_NOT_PRESENT,
    vk::Result::ERROR_INCOMPATIBLE_DRIVER,
    vk::Result::ERROR_TOO_MANY_OBJECTS,
    vk::Result::ERROR_FORMAT_NOT_SUPPORTED,
    vk::Result::ERROR_FRAGMENTED_POOL,
    vk::Result::ERROR_UNKNOWN,
    vk::Result::ERROR_OUT_OF_POOL_MEMORY,
    vk::Result::ERROR_INVALID_EXTERNAL_HANDLE,
    vk::Result::ERROR_SURFACE_LOST_KHR,
    vk::Result::ERROR_NATIVE_WINDOW_IN_USE_KHR,
    vk::Result::SUBOPTIMAL_KHR,
    vk::Result::ERROR_OUT_OF_DATE_KHR,
    vk::Result::ERROR_INCOMPATIBLE_DISPLAY_KHR,
    vk::Result::ERROR_VALIDATION_FAILED_EXT,
    vk::Result::ERROR_INVALID_SHADER_NV,
];

/// Map a Vulkan status code to a human-readable diagnostic.
pub fn translate(result: vk::Result) -> &'static str {
    match result {
        vk::Result::SUCCESS => "VK_SUCCESS",
        vk::Result::NOT_READY => "VK_NOT_READY: a fence or query has not yet completed",
        vk::Result::TIMEOUT => "VK_TIMEOUT: a wait operation has not completed in the specified time",
        vk::Result::EVENT_SET => "VK_EVENT_SET: an event is signaled",
        vk::Result::EVENT_RESET => "VK_EVENT_RESET: an event is unsignaled",
        vk::Result::INCOMPLETE => "VK_INCOMPLETE: a return array was too small for the result",
        vk::Result::ERROR_OUT_OF_HOST_MEMORY => "VK_ERROR_OUT_OF_HOST_MEMORY: a host memory allocation has failed",
        vk::Result::ERROR_OUT_OF_DEVICE_MEMORY => {
            "VK_ERROR_OUT_OF_DEVICE_MEMORY: a device memory allocation has failed"
        }
        vk::Result::ERROR_INITIALIZATION_FAILED => {
            "VK_ERROR_INITIALIZATION_FAILED: initialization of an object could not be completed"
        }
        vk::Result::ERROR_DEVICE_LOST => "VK_ERROR_DEVICE_LOST: the logical or physical device has been lost",
        vk::Result::ERROR_MEMORY_MAP_FAILED => "VK_ERROR_MEMORY_MAP_FAILED: mapping of a memory object has failed",
        vk::Result::ERROR_LAYER_NOT_PRESENT => "VK_ERROR_LAYER_NOT_PRESENT: a requested layer is not present",
        vk::Result::ERROR_EXTENSION_NOT_PRESENT => {
            "VK_ERROR_EXTENSION_NOT_PRESENT: a requested extension is not supported"
        }
        vk::Result::ERROR_FEATURE_NOT_PRESENT => "VK_ERROR_FEATURE_NOT_PRESENT: a requested feature is not supported",
        vk::Result::ERROR_INCOMPATIBLE_DRIVER => {
            "VK_ERROR_INCOMPATIBLE_DRIVER: the requested Vulkan version is not supported by the driver"
        }
        vk::Result::ERROR_TOO_MANY_OBJECTS => "VK_ERROR_TOO_MANY_OBJECTS: too many objects of the type have been created",
        vk::Result::ERROR_FORMAT_NOT_SUPPORTED => "VK_ERROR_FORMAT_NOT_SUPPORTED: the requested format is not supported",
        vk::Result::ERROR_FRAGMENTED_POOL => "VK_ERROR_FRAGMENTED_POOL: a pool allocation failed due to fragmentation",
        vk::Result::ERROR_UNKNOWN => "VK_ERROR_UNKNOWN: an unknown error has occurred",
        vk::Result::ERROR_OUT_OF_POOL_MEMORY => "VK_ERROR_OUT_OF_POOL_MEMORY: a pool memory allocation has failed",
        vk::Result::ERROR_INVALID_EXTERNAL_HANDLE => {
            "VK_ERROR_INVALID_EXTERNAL_HANDLE: an external handle is not a valid handle of the specified type"
        }
        vk::Result::ERROR_SURFACE_LOST_KHR => "VK_ERROR_SURFACE_LOST_KHR: a surface is no longer available",
        vk::Result::ERROR_NATIVE_WINDOW_IN_USE_KHR => {
            "VK_ERROR_NATIVE_WINDOW_IN_USE_KHR: the requested window is already in use"
        }
        vk::Result::SUBOPTIMAL_KHR => "VK_SUBOPTIMAL_KHR: a swapchain no longer matches the surface properties exactly",
        vk::Result::ERROR_OUT_OF_DATE_KHR => {
            "VK_ERROR_OUT_OF_DATE_KHR: a surface has changed and the swapchain is no longer compatible"
        }
        vk::Result::ERROR_INCOMPATIBLE_DISPLAY_KHR => {
            "VK_ERROR_INCOMPATIBLE_DISPLAY_KHR: the display used by a swapchain uses an incompatible layout"
        }
        vk::Result::ERROR_VALIDATION_FAILED_EXT => "VK_ERROR_VALIDATION_FAILED_EXT: a validation layer reported an error",
        vk::Result::ERROR_INVALID_SHADER_NV => "VK_ERROR_INVALID_SHADER_NV: one or more shaders failed to compile or link",
        _ => UNKNOWN_RESULT,
    }
}

/// Raise any non-success status as a `VulkanError`.
pub fn check(result: vk::Result) -> Result<(), VulkanError> {
    match result {
        vk::Result::SUCCESS => Ok(()),
        other => Err(VulkanError::from(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_known_code_has_a_distinct_message() {
        let mut seen = HashSet::new();
        for &result in KNOWN_RESULTS {
            let message = translate(result);
            assert!(!message.is_empty(), "{:?} translated to an empty string", result);
            assert_ne!(message, UNKNOWN_RESULT, "{:?} fell through to the fallback", result);
            assert!(seen.insert(message), "duplicate message for {:?}", result);
        }
    }

    #[test]
    fn unknown_code_uses_fallback() {
        assert_eq!(translate(vk::Result::from_raw(-12345)), UNKNOWN_RESULT);
        assert_eq!(translate(vk::Result::from_raw(0x7FFF_FFFF)), UNKNOWN_RESULT);
    }

    #[test]
    fn check_passes_success_and_raises_the_rest() {
        assert!(check(vk::Result::SUCCESS).is_ok());

        let err = check(vk::Result::ERROR_DEVICE_LOST).unwrap_err();
        assert_eq!(err.result, vk::Result::ERROR_DEVICE_LOST);
        assert!(err.to_string().starts_with("VK_ERROR_DEVICE_LOST"));
    }

    #[test]
    fn engine_errors_carry_translated_status() {
        let err = EngineError::DeviceCreation(vk::Result::ERROR_FEATURE_NOT_PRESENT.into());
        let text = err.to_string();
        assert!(text.starts_with("failed to create logical device"));
        assert!(text.contains("VK_ERROR_FEATURE_NOT_PRESENT"));
    }
}
