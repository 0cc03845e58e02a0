//! Device payload validation against the bundled JSON Schema.
//!
//! The schema requires the identity fields, the category and the logical
//! device list. Unknown top-level keys are allowed.

use jsonschema::{Draft, JSONSchema};
use once_cell::sync::OnceCell;
use serde_json::Value;
use tracing::debug;

use super::{DeviceCategory, DeviceDescriptor};
use crate::error::{DevhookError, Result};

/// Raw schema document, shipped inside the binary.
pub const DEVICE_SCHEMA: &str = include_str!("device_schema.json");

static COMPILED_SCHEMA: OnceCell<JSONSchema> = OnceCell::new();

fn compiled_schema() -> Result<&'static JSONSchema> {
    COMPILED_SCHEMA.get_or_try_init(|| {
        let schema: Value = serde_json::from_str(DEVICE_SCHEMA)?;
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema)
            .map_err(|e| DevhookError::Config(format!("device schema does not compile: {}", e)))?;
        Ok(compiled)
    })
}

/// Check a payload against the device schema.
///
/// Reports the first violation only; the caller rejects the device either way.
pub fn validate_payload(payload: &Value) -> Result<()> {
    let schema = compiled_schema()?;
    if let Err(mut errors) = schema.validate(payload) {
        let message = match errors.next() {
            Some(err) => {
                let path = err.instance_path.to_string();
                if path.is_empty() {
                    err.to_string()
                } else {
                    format!("{} (at {})", err, path)
                }
            }
            None => "payload rejected".to_string(),
        };
        return Err(DevhookError::Schema(message));
    }
    Ok(())
}

/// Parse a hook argument into a descriptor: JSON, schema, category check.
pub fn parse_descriptor(raw: &str) -> Result<DeviceDescriptor> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| DevhookError::Schema(format!("payload is not valid JSON: {}", e)))?;
    validate_payload(&value)?;

    // The schema guarantees a string here.
    let raw_category = value
        .get("urDeviceType")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let category = DeviceCategory::new(raw_category)?;
    debug!(category = %category, "device payload passed schema validation");

    serde_json::from_value(value).map_err(|e| DevhookError::Schema(e.to_string()))
}
