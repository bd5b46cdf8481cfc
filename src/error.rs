//! Error types shared across the game

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Microphone access was denied: {0}")]
    PermissionDenied(String),
    #[error("Audio input is unavailable: {0}")]
    AudioUnavailable(String),
    #[error("A session is already in progress")]
    SessionActive,
    #[error("Storage failure: {0}")]
    Storage(String),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;

impl GameError {
    /// Classify a rejected microphone request by its `DOMException` name.
    ///
    /// Only a refused prompt is a permission problem; a missing or busy
    /// device is reported as unavailable audio.
    pub fn from_media_rejection(name: &str, message: String) -> Self {
        match name {
            "NotAllowedError" | "SecurityError" => GameError::PermissionDenied(message),
            _ => GameError::AudioUnavailable(message),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn js_message(value: &wasm_bindgen::JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &wasm_bindgen::JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

/// `name` property of a JS error, empty when absent
#[cfg(target_arch = "wasm32")]
pub(crate) fn js_error_name(value: &wasm_bindgen::JsValue) -> String {
    js_sys::Reflect::get(value, &wasm_bindgen::JsValue::from_str("name"))
        .ok()
        .and_then(|n| n.as_string())
        .unwrap_or_default()
}
