//! Device descriptors: what the host tells a hook about an attached device.

pub mod schema;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::{DevhookError, Result};

pub use schema::{parse_descriptor, validate_payload};

/// One kernel device node exposed by a physical device.
///
/// `major`/`minor` keep whatever number the host sent. The schema only
/// requires a whole number, so `166.0` and values past `i64::MAX` are valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalDevice {
    #[serde(rename = "deviceNode")]
    pub device_node: String,
    pub major: Number,
    pub minor: Number,
}

/// A device attach/detach payload, already schema-checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    #[serde(rename = "idVendor")]
    pub vendor_id: String,
    #[serde(rename = "idProduct")]
    pub product_id: String,
    #[serde(rename = "serial")]
    pub serial_number: String,
    #[serde(rename = "urDeviceType")]
    pub device_category: DeviceCategory,
    #[serde(rename = "logicalDevices")]
    pub logical_devices: Vec<LogicalDevice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(rename = "product", default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(
        rename = "urDeviceAPIVersion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub api_version: Option<String>,
}

impl DeviceDescriptor {
    /// Identity used as the ledger key.
    pub fn identity(&self) -> DeviceIdentity {
        DeviceIdentity::derive(self)
    }

    /// Device node paths in the order the host listed them.
    pub fn device_nodes(&self) -> Vec<String> {
        self.logical_devices
            .iter()
            .map(|ld| ld.device_node.clone())
            .collect()
    }
}

/// Lowercase device category ("serial", "video", ...).
///
/// The category names a ledger file, so only ASCII letters, digits, `_` and
/// `-` are allowed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceCategory(String);

impl DeviceCategory {
    /// Normalize to lowercase and check the name is file-name safe.
    pub fn new(raw: &str) -> Result<Self> {
        let normalized = raw.to_lowercase();
        let valid = !normalized.is_empty()
            && normalized
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(DevhookError::InvalidCategory(raw.to_string()));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DeviceCategory {
    type Error = DevhookError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<DeviceCategory> for String {
    fn from(value: DeviceCategory) -> Self {
        value.0
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ledger key for a physical device: vendor, product and serial joined with
/// no separator.
///
/// Fields are not delimited, so `("AB", "", "CD")` and `("A", "", "BCD")`
/// map to the same identity. Vendor and product ids are fixed-width hex in
/// practice.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceIdentity(String);

impl DeviceIdentity {
    pub fn derive(descriptor: &DeviceDescriptor) -> Self {
        Self::from_parts(
            &descriptor.vendor_id,
            &descriptor.product_id,
            &descriptor.serial_number,
        )
    }

    pub fn from_parts(vendor_id: &str, product_id: &str, serial_number: &str) -> Self {
        let mut id =
            String::with_capacity(vendor_id.len() + product_id.len() + serial_number.len());
        id.push_str(vendor_id);
        id.push_str(product_id);
        id.push_str(serial_number);
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
