//! JSON document codec for scenes.
//!
//! A document is a bare JSON array with one record per shape, in z-order:
//!
//! ```json
//! [{"type":"text","id":"text_1","text":"hi","x":50.0,"y":50.0},
//!  {"type":"circle","id":"circle_3","x":400.0,"y":400.0,"radius":50.0}]
//! ```
//!
//! There is no envelope or version field.

use crate::scene::Scene;
use crate::shapes::{Shape, ShapeError, ShapeId};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// Document errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Not valid JSON, or valid JSON that is not an array.
    #[error("Malformed document: {0}")]
    Malformed(String),
    /// A record that does not describe any shape variant.
    #[error("Invalid shape record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
    /// A record whose geometry breaks a shape invariant.
    #[error("Invalid shape {id}: {source}")]
    InvalidShape {
        id: ShapeId,
        #[source]
        source: ShapeError,
    },
    #[error("Duplicate shape id: {0}")]
    DuplicateId(ShapeId),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Encode the scene as a compact JSON array.
///
/// Refuses scenes that could not be read back, such as a shape with a
/// NaN coordinate (JSON has no NaN and would store `null`).
pub fn serialize(scene: &Scene) -> Result<Vec<u8>, DocumentError> {
    check_scene(scene)?;
    serde_json::to_vec(scene.shapes()).map_err(|e| DocumentError::Serialization(e.to_string()))
}

/// Encode the scene as indented JSON.
pub fn to_json_pretty(scene: &Scene) -> Result<String, DocumentError> {
    check_scene(scene)?;
    serde_json::to_string_pretty(scene.shapes())
        .map_err(|e| DocumentError::Serialization(e.to_string()))
}

fn check_scene(scene: &Scene) -> Result<(), DocumentError> {
    scene.iter().try_for_each(|shape| {
        shape.validate().map_err(|source| DocumentError::InvalidShape {
            id: shape.id().clone(),
            source,
        })
    })
}

/// Decode a document into shapes, in document order.
///
/// All or nothing: any bad record rejects the whole document.
pub fn deserialize(bytes: &[u8]) -> Result<Vec<Shape>, DocumentError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| DocumentError::Malformed(format!("invalid JSON: {e}")))?;
    let Value::Array(records) = value else {
        return Err(DocumentError::Malformed(format!(
            "expected an array of shapes, found {}",
            json_kind(&value)
        )));
    };

    let mut seen = HashSet::with_capacity(records.len());
    let mut shapes = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let shape: Shape = serde_json::from_value(record).map_err(|e| {
            DocumentError::InvalidRecord {
                index,
                reason: e.to_string(),
            }
        })?;
        shape.validate().map_err(|source| DocumentError::InvalidShape {
            id: shape.id().clone(),
            source,
        })?;
        if !seen.insert(shape.id().clone()) {
            return Err(DocumentError::DuplicateId(shape.id().clone()));
        }
        shapes.push(shape);
    }
    Ok(shapes)
}

/// Decode a document from a string.
pub fn from_json(json: &str) -> Result<Vec<Shape>, DocumentError> {
    deserialize(json.as_bytes())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
