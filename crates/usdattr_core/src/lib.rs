//! usdattr core - USDA stages and attribute queries by prim name.
//!
//! This crate provides:
//!
//! - **USD support**: USDA parsing into a read-only prim tree (`usd`)
//! - **Prim lookup**: first-match search by prim name (`locator`)
//! - **Attribute queries**: typed, zero-defaulting reads (`query`)
//! - **Settings**: `usdattr.toml` loading (`settings`)
//!
//! # Example
//!
//! ```ignore
//! use usdattr_core::{query, Stage};
//!
//! let stage = Stage::open("scene.usda")?;
//! let radius: f64 = query::get_value(Some(&stage), "Ball", "radius");
//! let offset = query::get_animated_vec3(Some(&stage), "Ball", "xformOp:translate", 12.0);
//! ```

pub mod locator;
pub mod query;
pub mod settings;
pub mod usd;

// Re-export commonly used types
pub use locator::find_prim_path;
pub use query::{QueryError, QueryResult};
pub use settings::{Settings, SettingsError};
pub use usd::{Attribute, Interpolation, Prim, SdfPath, Stage, StageError, TimeCode, Value};
