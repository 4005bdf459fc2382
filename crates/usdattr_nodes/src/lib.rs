//! usdattr nodes - visual-scripting nodes reading USD attributes.
//!
//! This crate provides:
//!
//! - **Stage actor**: `StageActor`, the handle owning a loaded stage
//! - **Pins**: `PinType`, `PinValue` and `PinDefinition`
//! - **Node library**: `UsdAttributeLibrary`, the `UsdAttributes` palette
//!   with typed entry points and dispatch by node name
//!
//! # Example
//!
//! ```ignore
//! use usdattr_nodes::{PinValue, StageActor, UsdAttributeLibrary};
//!
//! let actor = StageActor::load("scene.usda")?;
//! let radius = UsdAttributeLibrary::get_usd_double_attribute(Some(&actor), "Ball", "radius");
//! let height = UsdAttributeLibrary::call(
//!     "GetUsdAnimatedFloatAttribute",
//!     Some(&actor),
//!     &[PinValue::from("Ball"), PinValue::from("height"), PinValue::Double(12.0)],
//! )?;
//! ```

pub mod actor;
pub mod library;
pub mod pin;

pub use actor::StageActor;
pub use library::{CallError, CallResult, NodeMetadata, UsdAttributeLibrary, CATEGORY};
pub use pin::{PinDefinition, PinType, PinValue};
