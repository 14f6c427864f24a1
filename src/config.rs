use surface_core::{ConfigError, ConfigPatch};
use wasm_bindgen::JsValue;

/// Accepts a plain JS object, a JSON string, or nothing.
pub fn patch_from_js(value: &JsValue) -> Result<ConfigPatch, ConfigError> {
    if value.is_undefined() || value.is_null() {
        return Ok(ConfigPatch::default());
    }
    if let Some(json) = value.as_string() {
        return ConfigPatch::from_json(&json);
    }
    let json = js_sys::JSON::stringify(value)
        .map_err(|e| ConfigError::Malformed(format!("{:?}", e)))?;
    ConfigPatch::from_json(&String::from(json))
}
