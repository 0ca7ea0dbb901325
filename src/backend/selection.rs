// Physical device selection
//
// First-fit: the first enumerated device with a graphics queue, a transfer
// queue, BC texture compression and full 32-bit indices wins. There is no
// ranking; a later, better device is never considered.

use ash::vk;

use super::api::{DeviceCandidate, DeviceFeatures, DeviceRequest, QueueFamily, QueueRequest};

/// Validation layers enabled in debug mode when the loader has them
pub const KNOWN_VALIDATION_LAYERS: &[&str] = &["VK_LAYER_KHRONOS_validation", "VK_LAYER_LUNARG_standard_validation"];

pub const GRAPHICS_PRIORITY: f32 = 1.0;
pub const TRANSFER_PRIORITY: f32 = 0.0;

/// Keep the available layers whose name is in the known set, in loader order
pub fn resolve_layers(available: &[String]) -> Vec<String> {
    available
        .iter()
        .filter(|name| KNOWN_VALIDATION_LAYERS.contains(&name.as_str()))
        .cloned()
        .collect()
}

/// Queue family indices for the two roles the engine needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilies {
    pub graphics: u32,
    pub transfer: u32,
}

impl QueueFamilies {
    /// Find a graphics-capable and a transfer-capable family.
    ///
    /// When several families qualify for a role the last one wins, which
    /// usually lands transfer on a dedicated family. Only an explicit TRANSFER
    /// bit counts; graphics/compute families that omit it are not treated as
    /// transfer-capable.
    pub fn find(families: &[QueueFamily]) -> Option<Self> {
        let last_with = |flag: vk::QueueFlags| {
            families
                .iter()
                .enumerate()
                .filter(|(_, family)| family.flags.contains(flag) && family.queue_count >= 1)
                .map(|(i, _)| i as u32)
                .last()
        };

        Some(Self {
            graphics: last_with(vk::QueueFlags::GRAPHICS)?,
            transfer: last_with(vk::QueueFlags::TRANSFER)?,
        })
    }

    pub fn is_shared(&self) -> bool {
        self.graphics == self.transfer
    }
}

/// The device picked by `select_first`. Only the name and resolved
/// families outlive selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedDevice<P> {
    pub handle: P,
    /// Position in enumeration order
    pub index: usize,
    pub name: String,
    pub families: QueueFamilies,
}

/// Queue families if the candidate meets every requirement
pub fn qualifies(candidate: &DeviceCandidate) -> Option<QueueFamilies> {
    if !candidate.features.supports(&DeviceFeatures::REQUIRED) {
        return None;
    }
    QueueFamilies::find(&candidate.queue_families)
}

/// Pick the first candidate, in enumeration order, that qualifies.
///
/// Also hands back the winner's queue family table for `plan_queues`.
pub fn select_first<P, I>(candidates: I) -> Option<(SelectedDevice<P>, Vec<QueueFamily>)>
where
    I: IntoIterator<Item = (P, DeviceCandidate)>,
{
    for (index, (handle, candidate)) in candidates.into_iter().enumerate() {
        log::info!("Device Name: {}", candidate.name);
        for heap in &candidate.device_local_heaps {
            log::info!("Device Local Memory Amount: {}MB", heap / (1024 * 1024));
        }

        match qualifies(&candidate) {
            Some(families) => {
                let selected = SelectedDevice {
                    handle,
                    index,
                    name: candidate.name,
                    families,
                };
                return Some((selected, candidate.queue_families));
            }
            None => log::debug!("Skipping {}: missing a required queue or feature", candidate.name),
        }
    }
    None
}

/// Which queue of which family each role ended up on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueAssignment {
    pub graphics_family: u32,
    pub graphics_index: u32,
    pub transfer_family: u32,
    pub transfer_index: u32,
}

/// Build the queue requests and the resulting assignment.
///
/// Vulkan rejects two queue create infos naming the same family
/// (VUID-VkDeviceCreateInfo-queueFamilyIndex-02802), so a shared family gets
/// one request: two queues if the family has them, otherwise one shared queue.
pub fn plan_queues(families: QueueFamilies, queue_families: &[QueueFamily]) -> (DeviceRequest, QueueAssignment) {
    let (queues, assignment) = if families.is_shared() {
        let available = queue_families
            .get(families.graphics as usize)
            .map_or(1, |family| family.queue_count);

        log::warn!(
            "Graphics and transfer share queue family {}; merging into one queue request",
            families.graphics
        );

        if available >= 2 {
            (
                vec![QueueRequest {
                    family_index: families.graphics,
                    priorities: vec![GRAPHICS_PRIORITY, TRANSFER_PRIORITY],
                }],
                QueueAssignment {
                    graphics_family: families.graphics,
                    graphics_index: 0,
                    transfer_family: families.transfer,
                    transfer_index: 1,
                },
            )
        } else {
            (
                vec![QueueRequest {
                    family_index: families.graphics,
                    priorities: vec![GRAPHICS_PRIORITY],
                }],
                QueueAssignment {
                    graphics_family: families.graphics,
                    graphics_index: 0,
                    transfer_family: families.transfer,
                    transfer_index: 0,
                },
            )
        }
    } else {
        (
            vec![
                QueueRequest {
                    family_index: families.graphics,
                    priorities: vec![GRAPHICS_PRIORITY],
                },
                QueueRequest {
                    family_index: families.transfer,
                    priorities: vec![TRANSFER_PRIORITY],
                },
            ],
            QueueAssignment {
                graphics_family: families.graphics,
                graphics_index: 0,
                transfer_family: families.transfer,
                transfer_index: 0,
            },
        )
    };

    let request = DeviceRequest {
        queues,
        features: DeviceFeatures::REQUIRED,
    };
    (request, assignment)
}
