//! Turning a raw schema payload into SDL.
//!
//! Endpoints answer with either SDL text or an introspection result, and
//! settings may inline either. A JSON object carrying `data.__schema` or
//! `__schema` is introspection; anything else is taken to be SDL.

use crate::error::PayloadError;
use crate::sdl::introspection_to_sdl;
use crate::types::{IntrospectionData, IntrospectionResponse};

/// Normalise a fetched payload to SDL.
pub fn schema_payload_to_sdl(payload: &str) -> Result<String, PayloadError> {
    let trimmed = payload.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Err(PayloadError::Empty);
    }

    if trimmed.starts_with('{') {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
            tracing::debug!("Schema payload is JSON, converting introspection result");
            return introspection_value_to_sdl(&value);
        }
    }

    Ok(trimmed.to_string())
}

/// Convert an introspection result (`{ "data": { "__schema" } }` or
/// `{ "__schema" }`) to SDL.
pub fn introspection_value_to_sdl(value: &serde_json::Value) -> Result<String, PayloadError> {
    let schema_value = value
        .get("data")
        .and_then(|data| data.get("__schema"))
        .or_else(|| value.get("__schema"));

    let Some(schema_value) = schema_value else {
        if let Some(errors) = value.get("errors").and_then(serde_json::Value::as_array) {
            let messages: Vec<&str> = errors
                .iter()
                .filter_map(|e| e.get("message").and_then(serde_json::Value::as_str))
                .collect();
            return Err(PayloadError::ServerErrors(messages.join("; ")));
        }
        return Err(PayloadError::Introspection(
            "expected an object with `__schema` or `data.__schema`".to_string(),
        ));
    };

    let schema = serde_json::from_value(schema_value.clone())
        .map_err(|e| PayloadError::Introspection(e.to_string()))?;

    let response = IntrospectionResponse {
        data: IntrospectionData { schema },
    };
    Ok(introspection_to_sdl(&response))
}
