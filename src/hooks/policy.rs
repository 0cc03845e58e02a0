//! Acceptance policies for the add-hook.

use crate::config::AcceptanceConfig;
use crate::devices::{DeviceCategory, DeviceDescriptor};
use crate::error::{DevhookError, Result};

/// Outcome of an acceptance check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(String),
}

/// Decides whether the container takes ownership of a newly attached device.
///
/// Implementations can look at vendor, product or serial, or talk to the
/// device, before answering.
pub trait AcceptancePolicy: Send + Sync {
    fn evaluate(&self, device: &DeviceDescriptor) -> Verdict;
}

/// Accept devices whose category is in a fixed list.
#[derive(Debug, Clone)]
pub struct CategoryPolicy {
    categories: Vec<DeviceCategory>,
}

impl CategoryPolicy {
    pub fn new(categories: Vec<DeviceCategory>) -> Self {
        Self { categories }
    }

    /// Accept every serial device and nothing else.
    pub fn serial_only() -> Self {
        Self::new(DeviceCategory::new("serial").into_iter().collect())
    }

    pub fn from_config(config: &AcceptanceConfig) -> Result<Self> {
        let categories = config
            .categories
            .iter()
            .map(|c| {
                DeviceCategory::new(c).map_err(|_| {
                    DevhookError::Config(format!("acceptance.categories: invalid '{}'", c))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(categories))
    }
}

impl Default for CategoryPolicy {
    fn default() -> Self {
        Self::serial_only()
    }
}

impl AcceptancePolicy for CategoryPolicy {
    fn evaluate(&self, device: &DeviceDescriptor) -> Verdict {
        if self.categories.contains(&device.device_category) {
            Verdict::Accept
        } else {
            Verdict::Reject(format!(
                "category '{}' is not accepted",
                device.device_category
            ))
        }
    }
}

/// Accept everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl AcceptancePolicy for AcceptAll {
    fn evaluate(&self, _device: &DeviceDescriptor) -> Verdict {
        Verdict::Accept
    }
}
