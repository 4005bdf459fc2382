//! USD (Universal Scene Description) support.
//!
//! This module provides parsing of USDA (ASCII) layers into a read-only
//! prim tree with typed, optionally time-sampled attributes.
//!
//! ## Supported USD Features
//!
//! - `def`, `over` and `class` prim specs with nested children
//! - Attributes of scalar, vector, quaternion, matrix and array types
//! - Time samples, with held or linear interpolation
//! - Relationships
//! - Layer metadata (`defaultPrim`, time code range, ...)
//!
//! ## Not Supported
//!
//! - Binary `.usdc` and `.usdz` packages
//! - Composition arcs (references, payloads, sublayers, variants)
//! - Schema fallback values
//!
//! # Example
//!
//! ```ignore
//! use usdattr_core::usd::{SdfPath, Stage, TimeCode};
//!
//! let stage = Stage::open("path/to/scene.usda")?;
//! let cube = stage.prim_at_path(&SdfPath::new("/World/Cube").unwrap()).unwrap();
//! let size = cube
//!     .attribute("size")
//!     .and_then(|a| a.get(TimeCode::At(12.0), stage.interpolation()));
//! ```

mod parser;
mod path;
mod stage;
mod types;
mod value;

pub use parser::*;
pub use path::*;
pub use stage::*;
pub use types::*;
pub use value::*;
