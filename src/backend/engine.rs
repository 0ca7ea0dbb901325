// Engine - owned instance + logical device
//
// Lifecycle:
// - initialize: claim guard, resolve layers, create instance, select device,
//   open logical device
// - shutdown/drop: destroy device, then instance, then release the guard
//
// Only one engine may be alive per process. The guard is an explicit flag,
// not a hidden global engine.

use ash::vk;
use std::sync::atomic::{AtomicBool, Ordering};

use super::api::{GraphicsApi, InstanceDesc};
use super::selection::{self, QueueAssignment, SelectedDevice};
use crate::error::EngineError;
use crate::settings::EngineSettings;

pub const ENGINE_NAME: &str = "Conjure";
pub const ENGINE_VERSION: u32 = vk::make_api_version(0, 0, 1, 1);
pub const API_VERSION: u32 = vk::API_VERSION_1_0;

/// Formats whose image limits are logged for the selected device
const FORMATS_TO_LOG: [vk::Format; 5] = [
    vk::Format::BC1_RGB_SRGB_BLOCK,
    vk::Format::BC3_SRGB_BLOCK,
    vk::Format::BC4_UNORM_BLOCK,
    vk::Format::BC5_SNORM_BLOCK,
    vk::Format::A8B8G8R8_SRGB_PACK32,
];

static ENGINE_ALIVE: AtomicBool = AtomicBool::new(false);

/// Held by a live engine; dropping it lets the next engine initialize
#[derive(Debug)]
struct InitGuard(());

impl InitGuard {
    fn claim() -> Result<Self, EngineError> {
        ENGINE_ALIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(()))
            .map_err(|_| EngineError::AlreadyInitialized)
    }
}

impl Drop for InitGuard {
    fn drop(&mut self) {
        ENGINE_ALIVE.store(false, Ordering::Release);
    }
}

/// Open instance and logical device.
///
/// IMPORTANT: the device is destroyed before the instance; both only in `release`.
pub struct Engine<A: GraphicsApi> {
    api: A,
    instance: A::Instance,
    device: A::Device,
    selected: SelectedDevice<A::PhysicalDevice>,
    queues: QueueAssignment,
    layers: Vec<String>,
    released: bool,
    // Declared last so it drops after the handles are gone
    _guard: InitGuard,
}

impl<A: GraphicsApi> Engine<A> {
    /// Create the instance, pick a device and open it.
    ///
    /// On failure nothing stays open and the guard is released.
    pub fn initialize(api: A, settings: &EngineSettings) -> Result<Self, EngineError> {
        let guard = InitGuard::claim()?;

        if settings.application_name.contains('\0') {
            return Err(EngineError::InvalidName);
        }

        log::info!(
            "Initializing engine for {} v{} (debug: {})",
            settings.application_name,
            settings.application_version,
            settings.enable_debug
        );

        // Step 1: Validation layers (never fatal)
        let layers = if settings.enable_debug {
            Self::debug_layers(&api)
        } else {
            Vec::new()
        };

        // Step 2: Instance
        let desc = InstanceDesc {
            application_name: settings.application_name.clone(),
            application_version: settings.application_version,
            engine_name: ENGINE_NAME.to_string(),
            engine_version: ENGINE_VERSION,
            api_version: API_VERSION,
            layers: layers.clone(),
        };
        let instance = api
            .create_instance(&desc)
            .map_err(|e| EngineError::InstanceCreation(e.into()))?;

        // Step 3-5: Select and open, tearing the instance down on any failure
        match Self::open_device(&api, &instance) {
            Ok((selected, queues, device)) => Ok(Self {
                api,
                instance,
                device,
                selected,
                queues,
                layers,
                released: false,
                _guard: guard,
            }),
            Err(e) => {
                log::error!("Engine initialization failed: {}", e);
                unsafe { api.destroy_instance(&instance) };
                Err(e)
            }
        }
    }

    fn debug_layers(api: &A) -> Vec<String> {
        match api.enumerate_layers() {
            Ok(available) => {
                let layers = selection::resolve_layers(&available);
                if layers.is_empty() {
                    log::info!("No known validation layer available, continuing without");
                }
                for layer in &layers {
                    log::info!("Enabling layer {}", layer);
                }
                layers
            }
            Err(e) => {
                log::warn!("Failed to enumerate instance layers: {}", crate::error::translate(e));
                Vec::new()
            }
        }
    }

    #[allow(clippy::type_complexity)]
    fn open_device(
        api: &A,
        instance: &A::Instance,
    ) -> Result<(SelectedDevice<A::PhysicalDevice>, QueueAssignment, A::Device), EngineError> {
        let physical_devices = api
            .enumerate_physical_devices(instance)
            .map_err(|e| EngineError::Enumeration(e.into()))?;
        let count = physical_devices.len();

        let (selected, queue_families) = selection::select_first(
            physical_devices
                .into_iter()
                .map(|handle| (handle, api.describe_device(instance, handle))),
        )
        .ok_or(EngineError::NoSuitableDevice { candidates: count })?;

        log::info!("Selected GPU: {}", selected.name);
        Self::log_format_limits(api, instance, selected.handle);

        let (request, queues) = selection::plan_queues(selected.families, &queue_families);
        let device = api
            .create_device(instance, selected.handle, &request)
            .map_err(|e| EngineError::DeviceCreation(e.into()))?;

        log::info!(
            "Logical device created (graphics family {}, transfer family {})",
            queues.graphics_family,
            queues.transfer_family
        );
        Ok((selected, queues, device))
    }

    fn log_format_limits(api: &A, instance: &A::Instance, physical_device: A::PhysicalDevice) {
        for format in FORMATS_TO_LOG {
            match api.image_format_limits(instance, physical_device, format) {
                Ok(props) => log::info!(
                    "{:?} - Max width: {} Max height: {} Max array size: {}",
                    format,
                    props.max_extent.width,
                    props.max_extent.height,
                    props.max_array_layers
                ),
                Err(e) => log::debug!("{:?} - unsupported: {}", format, crate::error::translate(e)),
            }
        }
    }

    /// The open logical device
    pub fn device(&self) -> &A::Device {
        &self.device
    }

    pub fn selected_device(&self) -> &SelectedDevice<A::PhysicalDevice> {
        &self.selected
    }

    pub fn queues(&self) -> QueueAssignment {
        self.queues
    }

    /// Layers the instance was created with
    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    /// Destroy the device, then the instance
    pub fn shutdown(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        log::info!("Destroying engine...");
        unsafe {
            self.api.destroy_device(&self.device);
            self.api.destroy_instance(&self.instance);
        }
    }
}

impl<A: GraphicsApi> Drop for Engine<A> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Slot holding at most one engine, for callers that want
/// initialize/shutdown/device as separate calls.
pub struct Graphics<A: GraphicsApi + Clone> {
    api: A,
    engine: Option<Engine<A>>,
}

impl<A: GraphicsApi + Clone> Graphics<A> {
    pub fn new(api: A) -> Self {
        Self { api, engine: None }
    }

    pub fn initialize(&mut self, settings: &EngineSettings) -> Result<(), EngineError> {
        if self.engine.is_some() {
            return Err(EngineError::AlreadyInitialized);
        }
        self.engine = Some(Engine::initialize(self.api.clone(), settings)?);
        Ok(())
    }

    /// No-op when nothing is open
    pub fn shutdown(&mut self) {
        if let Some(engine) = self.engine.take() {
            engine.shutdown();
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    pub fn engine(&self) -> Result<&Engine<A>, EngineError> {
        self.engine.as_ref().ok_or(EngineError::NotInitialized)
    }

    pub fn device(&self) -> Result<&A::Device, EngineError> {
        self.engine().map(Engine::device)
    }
}
