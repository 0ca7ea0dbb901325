// Vulkan backend - GraphicsApi on top of ash
//
// Responsibilities:
// - Loading the Vulkan library
// - Instance creation with the resolved layer list
// - Physical device queries (name, memory heaps, queue families, features)
// - Logical device creation from a DeviceRequest

use ash::prelude::VkResult;
use ash::{vk, Entry};
use std::ffi::{c_char, CStr, CString};

use super::api::{DeviceCandidate, DeviceFeatures, DeviceRequest, GraphicsApi, InstanceDesc, QueueFamily};
use crate::error::EngineError;

/// Vulkan entry points. Cloning shares the loaded library.
#[derive(Clone)]
pub struct VulkanApi {
    entry: Entry,
}

impl VulkanApi {
    /// Load the system Vulkan library
    pub fn load() -> Result<Self, EngineError> {
        let entry = unsafe { Entry::load() }
            .map_err(|e| EngineError::Loader(format!("{}. Is Vulkan installed?", e)))?;
        Ok(Self { entry })
    }
}

fn c_name(raw: &[c_char]) -> String {
    unsafe { CStr::from_ptr(raw.as_ptr()) }.to_string_lossy().into_owned()
}

fn to_cstring(value: &str) -> VkResult<CString> {
    // Names are validated before they reach the driver
    CString::new(value).map_err(|_| vk::Result::ERROR_INITIALIZATION_FAILED)
}

fn to_vk_features(features: &DeviceFeatures) -> vk::PhysicalDeviceFeatures {
    vk::PhysicalDeviceFeatures::builder()
        .texture_compression_bc(features.texture_compression_bc)
        .full_draw_index_uint32(features.full_draw_index_uint32)
        .build()
}

impl GraphicsApi for VulkanApi {
    type Instance = ash::Instance;
    type PhysicalDevice = vk::PhysicalDevice;
    type Device = ash::Device;

    fn enumerate_layers(&self) -> VkResult<Vec<String>> {
        #[allow(unused_unsafe)]
        let layers = unsafe { self.entry.enumerate_instance_layer_properties() }?;
        Ok(layers.iter().map(|layer| c_name(&layer.layer_name)).collect())
    }

    fn create_instance(&self, desc: &InstanceDesc) -> VkResult<ash::Instance> {
        let app_name = to_cstring(&desc.application_name)?;
        let engine_name = to_cstring(&desc.engine_name)?;

        let app_info = vk::ApplicationInfo::builder()
            .application_name(&app_name)
            .application_version(desc.application_version)
            .engine_name(&engine_name)
            .engine_version(desc.engine_version)
            .api_version(desc.api_version);

        let layer_names = desc
            .layers
            .iter()
            .map(|layer| to_cstring(layer))
            .collect::<VkResult<Vec<_>>>()?;
        let layer_ptrs: Vec<*const c_char> = layer_names.iter().map(|name| name.as_ptr()).collect();

        // No extensions: no surface, no debug messenger
        let create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_layer_names(&layer_ptrs);

        unsafe { self.entry.create_instance(&create_info, None) }
    }

    fn enumerate_physical_devices(&self, instance: &ash::Instance) -> VkResult<Vec<vk::PhysicalDevice>> {
        unsafe { instance.enumerate_physical_devices() }
    }

    fn describe_device(&self, instance: &ash::Instance, physical_device: vk::PhysicalDevice) -> DeviceCandidate {
        let props = unsafe { instance.get_physical_device_properties(physical_device) };
        let memory = unsafe { instance.get_physical_device_memory_properties(physical_device) };
        let queue_props = unsafe { instance.get_physical_device_queue_family_properties(physical_device) };
        let features = unsafe { instance.get_physical_device_features(physical_device) };

        // One entry per device-local memory type, like the driver reports them
        let device_local_heaps = memory.memory_types[..memory.memory_type_count as usize]
            .iter()
            .filter(|ty| ty.property_flags.contains(vk::MemoryPropertyFlags::DEVICE_LOCAL))
            .map(|ty| memory.memory_heaps[ty.heap_index as usize].size)
            .collect();

        DeviceCandidate {
            name: c_name(&props.device_name),
            device_local_heaps,
            queue_families: queue_props
                .iter()
                .map(|family| QueueFamily {
                    flags: family.queue_flags,
                    queue_count: family.queue_count,
                })
                .collect(),
            features: DeviceFeatures {
                texture_compression_bc: features.texture_compression_bc == vk::TRUE,
                full_draw_index_uint32: features.full_draw_index_uint32 == vk::TRUE,
            },
        }
    }

    fn image_format_limits(
        &self,
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        format: vk::Format,
    ) -> VkResult<vk::ImageFormatProperties> {
        unsafe {
            instance.get_physical_device_image_format_properties(
                physical_device,
                format,
                vk::ImageType::TYPE_2D,
                vk::ImageTiling::OPTIMAL,
                vk::ImageUsageFlags::SAMPLED,
                vk::ImageCreateFlags::TYPE_2D_ARRAY_COMPATIBLE,
            )
        }
    }

    fn create_device(
        &self,
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        request: &DeviceRequest,
    ) -> VkResult<ash::Device> {
        // Priorities live in `request`, so the built infos stay valid for the call
        let queue_infos: Vec<vk::DeviceQueueCreateInfo> = request
            .queues
            .iter()
            .map(|queue| {
                vk::DeviceQueueCreateInfo::builder()
                    .queue_family_index(queue.family_index)
                    .queue_priorities(&queue.priorities)
                    .build()
            })
            .collect();

        let features = to_vk_features(&request.features);

        let create_info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(&queue_infos)
            .enabled_features(&features);

        unsafe { instance.create_device(physical_device, &create_info, None) }
    }

    unsafe fn destroy_device(&self, device: &ash::Device) {
        device.destroy_device(None);
    }

    unsafe fn destroy_instance(&self, instance: &ash::Instance) {
        instance.destroy_instance(None);
    }
}
