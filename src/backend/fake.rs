// Scripted GraphicsApi for tests
//
// Physical devices are indices into the scripted candidate list. Every
// create/destroy call is recorded so tests can check ordering and leaks.

use ash::prelude::VkResult;
use ash::vk;
use parking_lot::Mutex;
use std::cell::RefCell;
use std::rc::Rc;

use super::api::{DeviceCandidate, DeviceRequest, GraphicsApi, InstanceDesc};

/// Engine tests share the process-wide initialization guard
pub static ENGINE_LOCK: Mutex<()> = parking_lot::const_mutex(());

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateInstance,
    CreateDevice { physical_device: usize },
    DestroyDevice,
    DestroyInstance,
}

#[derive(Default)]
struct State {
    layers: Option<VkResult<Vec<String>>>,
    devices: Vec<DeviceCandidate>,
    instance_failure: Option<vk::Result>,
    enumeration_failure: Option<vk::Result>,
    device_failure: Option<vk::Result>,
    format_queries: Vec<vk::Format>,
    instance_desc: Option<InstanceDesc>,
    device_request: Option<DeviceRequest>,
    calls: Vec<Call>,
}

#[derive(Clone, Default)]
pub struct FakeApi {
    state: Rc<RefCell<State>>,
}

impl FakeApi {
    pub fn with_devices(devices: Vec<DeviceCandidate>) -> Self {
        let api = Self::default();
        api.state.borrow_mut().devices = devices;
        api
    }

    pub fn set_layers(&self, layers: VkResult<Vec<String>>) {
        self.state.borrow_mut().layers = Some(layers);
    }

    pub fn fail_instance_creation(&self, result: vk::Result) {
        self.state.borrow_mut().instance_failure = Some(result);
    }

    /// `None` lets enumeration succeed again
    pub fn fail_enumeration(&self, result: Option<vk::Result>) {
        self.state.borrow_mut().enumeration_failure = result;
    }

    pub fn fail_device_creation(&self, result: vk::Result) {
        self.state.borrow_mut().device_failure = Some(result);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    /// Formats passed to `image_format_limits`, in call order
    pub fn format_queries(&self) -> Vec<vk::Format> {
        self.state.borrow().format_queries.clone()
    }

    pub fn instance_desc(&self) -> Option<InstanceDesc> {
        self.state.borrow().instance_desc.clone()
    }

    pub fn device_request(&self) -> Option<DeviceRequest> {
        self.state.borrow().device_request.clone()
    }

    /// Created minus destroyed handles, instances and devices together
    pub fn live_handles(&self) -> usize {
        let state = self.state.borrow();
        let created = state
            .calls
            .iter()
            .filter(|call| matches!(call, Call::CreateInstance | Call::CreateDevice { .. }))
            .count();
        let destroyed = state
            .calls
            .iter()
            .filter(|call| matches!(call, Call::DestroyInstance | Call::DestroyDevice))
            .count();
        created - destroyed
    }
}

impl GraphicsApi for FakeApi {
    type Instance = ();
    type PhysicalDevice = usize;
    type Device = usize;

    fn enumerate_layers(&self) -> VkResult<Vec<String>> {
        self.state
            .borrow()
            .layers
            .clone()
            .unwrap_or_else(|| Ok(vec!["VK_LAYER_LUNARG_standard_validation".to_string()]))
    }

    fn create_instance(&self, desc: &InstanceDesc) -> VkResult<()> {
        let mut state = self.state.borrow_mut();
        if let Some(result) = state.instance_failure {
            return Err(result);
        }
        state.instance_desc = Some(desc.clone());
        state.calls.push(Call::CreateInstance);
        Ok(())
    }

    fn enumerate_physical_devices(&self, _instance: &()) -> VkResult<Vec<usize>> {
        let state = self.state.borrow();
        if let Some(result) = state.enumeration_failure {
            return Err(result);
        }
        Ok((0..state.devices.len()).collect())
    }

    fn describe_device(&self, _instance: &(), physical_device: usize) -> DeviceCandidate {
        self.state.borrow().devices[physical_device].clone()
    }

    fn image_format_limits(
        &self,
        _instance: &(),
        _physical_device: usize,
        format: vk::Format,
    ) -> VkResult<vk::ImageFormatProperties> {
        self.state.borrow_mut().format_queries.push(format);
        if format == vk::Format::A8B8G8R8_SRGB_PACK32 {
            return Err(vk::Result::ERROR_FORMAT_NOT_SUPPORTED);
        }
        Ok(vk::ImageFormatProperties {
            max_extent: vk::Extent3D {
                width: 16384,
                height: 16384,
                depth: 1,
            },
            max_array_layers: 2048,
            ..Default::default()
        })
    }

    fn create_device(&self, _instance: &(), physical_device: usize, request: &DeviceRequest) -> VkResult<usize> {
        let mut state = self.state.borrow_mut();
        if let Some(result) = state.device_failure {
            return Err(result);
        }
        state.device_request = Some(request.clone());
        state.calls.push(Call::CreateDevice { physical_device });
        Ok(physical_device)
    }

    unsafe fn destroy_device(&self, _device: &usize) {
        self.state.borrow_mut().calls.push(Call::DestroyDevice);
    }

    unsafe fn destroy_instance(&self, _instance: &()) {
        self.state.borrow_mut().calls.push(Call::DestroyInstance);
    }
}
