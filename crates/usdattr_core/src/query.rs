//! Attribute queries by prim name.
//!
//! Each query resolves stage → prim (by name, see [`crate::locator`]) →
//! attribute → value, and extracts a typed payload.
//!
//! Two flavours are provided:
//!
//! - `try_*` functions return a [`QueryResult`] that tells the failure
//!   modes apart.
//! - The plain functions never fail: any error is logged and collapsed to
//!   the zero value of the requested type, so "not found" and "authored
//!   zero" look the same to the caller.

use glam::DVec3;
use thiserror::Error;

use crate::locator::find_prim_path;
use crate::usd::{Attribute, FromValue, SdfPath, Stage, TimeCode, Value};

/// Errors that can occur while reading an attribute.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("No USD stage loaded")]
    NoStage,

    #[error("No prim named '{0}'")]
    PrimNotFound(String),

    #[error("No prim found at path: {0}")]
    PrimPathUnresolved(SdfPath),

    #[error("No attribute '{attribute}' on prim {prim}")]
    AttributeNotFound { prim: SdfPath, attribute: String },

    #[error("NaN time sample for attribute '{attribute}'")]
    InvalidTime { attribute: String },

    #[error("Failed to get value for attribute '{attribute}' at {time:?}")]
    NoValue { attribute: String, time: TimeCode },

    #[error("Attribute '{attribute}' holds {found}, not {expected}")]
    TypeMismatch {
        attribute: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Unsupported type {found} for vector attribute '{attribute}'")]
    UnsupportedVectorType { attribute: String, found: &'static str },
}

/// Result type for attribute queries.
pub type QueryResult<T> = Result<T, QueryError>;

/// Resolve the attribute `attr_name` on the first prim named `prim_name`.
pub fn try_get_attribute<'a>(
    stage: Option<&'a Stage>,
    prim_name: &str,
    attr_name: &str,
) -> QueryResult<&'a Attribute> {
    let stage = stage.ok_or(QueryError::NoStage)?;
    log::debug!("Found stage {}", stage.identifier());

    let prim_path = find_prim_path(stage.pseudo_root(), prim_name);
    if prim_path.is_empty() {
        return Err(QueryError::PrimNotFound(prim_name.to_string()));
    }

    let prim = stage
        .prim_at_path(&prim_path)
        .ok_or_else(|| QueryError::PrimPathUnresolved(prim_path.clone()))?;

    prim.attribute(attr_name)
        .ok_or_else(|| QueryError::AttributeNotFound {
            prim: prim_path,
            attribute: attr_name.to_string(),
        })
}

/// Read the raw value of an attribute at `time`.
pub fn try_read(
    stage: Option<&Stage>,
    prim_name: &str,
    attr_name: &str,
    time: TimeCode,
) -> QueryResult<Value> {
    let attr = try_get_attribute(stage, prim_name, attr_name)?;
    if matches!(time, TimeCode::At(t) if t.is_nan()) {
        return Err(QueryError::InvalidTime {
            attribute: attr.name.clone(),
        });
    }
    // try_get_attribute only succeeds with a stage
    let mode = stage.map(Stage::interpolation).unwrap_or_default();

    attr.get(time, mode).ok_or_else(|| QueryError::NoValue {
        attribute: attr.name.clone(),
        time,
    })
}

fn extract<T: FromValue>(attr_name: &str, value: &Value) -> QueryResult<T> {
    T::from_value(value).ok_or_else(|| QueryError::TypeMismatch {
        attribute: attr_name.to_string(),
        expected: T::TYPE_NAME,
        found: value.type_name(),
    })
}

fn widen(attr_name: &str, value: &Value) -> QueryResult<DVec3> {
    value.to_dvec3().ok_or_else(|| QueryError::UnsupportedVectorType {
        attribute: attr_name.to_string(),
        found: value.type_name(),
    })
}

/// Read the default value of an attribute as `T`.
pub fn try_get_value<T: FromValue>(
    stage: Option<&Stage>,
    prim_name: &str,
    attr_name: &str,
) -> QueryResult<T> {
    let value = try_read(stage, prim_name, attr_name, TimeCode::Default)?;
    extract(attr_name, &value)
}

/// Read an attribute as `T` at `time`.
pub fn try_get_animated_value<T: FromValue>(
    stage: Option<&Stage>,
    prim_name: &str,
    attr_name: &str,
    time: f64,
) -> QueryResult<T> {
    let value = try_read(stage, prim_name, attr_name, TimeCode::At(time))?;
    extract(attr_name, &value)
}

/// Read a `float3`, `double3` or `int3` default value as a double vector.
pub fn try_get_vec3(
    stage: Option<&Stage>,
    prim_name: &str,
    attr_name: &str,
) -> QueryResult<DVec3> {
    let value = try_read(stage, prim_name, attr_name, TimeCode::Default)?;
    widen(attr_name, &value)
}

/// Read a `float3`, `double3` or `int3` value at `time` as a double vector.
pub fn try_get_animated_vec3(
    stage: Option<&Stage>,
    prim_name: &str,
    attr_name: &str,
    time: f64,
) -> QueryResult<DVec3> {
    let value = try_read(stage, prim_name, attr_name, TimeCode::At(time))?;
    widen(attr_name, &value)
}

fn log_failure(error: &QueryError) {
    log::warn!("{}", error);
}

/// Log a failed query and fall back to the zero value.
fn or_zero<T: Default>(result: QueryResult<T>) -> T {
    match result {
        Ok(value) => {
            log::debug!("Successfully retrieved attribute");
            value
        }
        Err(e) => {
            log_failure(&e);
            T::default()
        }
    }
}

/// Resolve an attribute, logging why it could not be found.
pub fn get_attribute<'a>(
    stage: Option<&'a Stage>,
    prim_name: &str,
    attr_name: &str,
) -> Option<&'a Attribute> {
    try_get_attribute(stage, prim_name, attr_name)
        .map_err(|e| log_failure(&e))
        .ok()
}

/// Default value of an attribute as `T`, or `T::default()` on any failure.
pub fn get_value<T: FromValue + Default>(
    stage: Option<&Stage>,
    prim_name: &str,
    attr_name: &str,
) -> T {
    or_zero(try_get_value(stage, prim_name, attr_name))
}

/// Value of an attribute at `time` as `T`, or `T::default()` on any failure.
pub fn get_animated_value<T: FromValue + Default>(
    stage: Option<&Stage>,
    prim_name: &str,
    attr_name: &str,
    time: f64,
) -> T {
    or_zero(try_get_animated_value(stage, prim_name, attr_name, time))
}

/// Default value of a 3-vector attribute, or the zero vector on any failure.
pub fn get_vec3(stage: Option<&Stage>, prim_name: &str, attr_name: &str) -> DVec3 {
    or_zero(try_get_vec3(stage, prim_name, attr_name))
}

/// Value of a 3-vector attribute at `time`, or the zero vector on any failure.
pub fn get_animated_vec3(
    stage: Option<&Stage>,
    prim_name: &str,
    attr_name: &str,
    time: f64,
) -> DVec3 {
    or_zero(try_get_animated_vec3(stage, prim_name, attr_name, time))
}
