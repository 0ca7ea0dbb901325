// Graphics API abstraction
//
// The engine only talks to the driver through `GraphicsApi`. `VulkanApi`
// implements it with ash; tests implement it with a scripted fake.
// Handles are opaque associated types, everything else is plain data.

use ash::prelude::VkResult;
use ash::vk;

/// Everything needed to create an API instance
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceDesc {
    pub application_name: String,
    pub application_version: u32,
    pub engine_name: String,
    pub engine_version: u32,
    pub api_version: u32,
    pub layers: Vec<String>,
}

/// One queue family as reported by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamily {
    pub flags: vk::QueueFlags,
    pub queue_count: u32,
}

/// The device features this engine cares about
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceFeatures {
    pub texture_compression_bc: bool,
    pub full_draw_index_uint32: bool,
}

impl DeviceFeatures {
    /// Features every selected device must support and every logical device enables
    pub const REQUIRED: Self = Self {
        texture_compression_bc: true,
        full_draw_index_uint32: true,
    };

    pub fn supports(&self, required: &Self) -> bool {
        (self.texture_compression_bc || !required.texture_compression_bc)
            && (self.full_draw_index_uint32 || !required.full_draw_index_uint32)
    }
}

/// Transient description of a physical device, gathered during selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceCandidate {
    pub name: String,
    /// Sizes in bytes of heaps backing device-local memory types
    pub device_local_heaps: Vec<vk::DeviceSize>,
    pub queue_families: Vec<QueueFamily>,
    pub features: DeviceFeatures,
}

/// One `VkDeviceQueueCreateInfo`: a family and one priority per queue
#[derive(Debug, Clone, PartialEq)]
pub struct QueueRequest {
    pub family_index: u32,
    pub priorities: Vec<f32>,
}

/// Everything needed to open a logical device
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRequest {
    pub queues: Vec<QueueRequest>,
    pub features: DeviceFeatures,
}

/// Hardware graphics API, treated as a collaborator.
///
/// All calls are blocking round trips to the driver.
pub trait GraphicsApi {
    type Instance;
    type PhysicalDevice: Copy;
    type Device;

    /// Names of the instance layers the loader exposes
    fn enumerate_layers(&self) -> VkResult<Vec<String>>;

    fn create_instance(&self, desc: &InstanceDesc) -> VkResult<Self::Instance>;

    fn enumerate_physical_devices(&self, instance: &Self::Instance) -> VkResult<Vec<Self::PhysicalDevice>>;

    fn describe_device(&self, instance: &Self::Instance, physical_device: Self::PhysicalDevice) -> DeviceCandidate;

    /// Limits for a 2D, optimally tiled, sampled, 2D-array-compatible image
    fn image_format_limits(
        &self,
        instance: &Self::Instance,
        physical_device: Self::PhysicalDevice,
        format: vk::Format,
    ) -> VkResult<vk::ImageFormatProperties>;

    fn create_device(
        &self,
        instance: &Self::Instance,
        physical_device: Self::PhysicalDevice,
        request: &DeviceRequest,
    ) -> VkResult<Self::Device>;

    /// # Safety
    /// The device must not be used after this call.
    unsafe fn destroy_device(&self, device: &Self::Device);

    /// # Safety
    /// Every device created from the instance must already be destroyed.
    unsafe fn destroy_instance(&self, instance: &Self::Instance);
}
