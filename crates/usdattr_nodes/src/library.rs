//! The `UsdAttributes` node library.
//!
//! Every node is a pure function of a stage actor, a prim name, an
//! attribute name and (for animated nodes) a time sample. Nodes never fail:
//! a missing actor, stage, prim or attribute, or a value of the wrong type,
//! is logged and yields the zero value of the output pin.

use glam::DVec3;
use serde::Serialize;
use thiserror::Error;
use usdattr_core::{query, Stage};

use crate::actor::StageActor;
use crate::pin::{PinDefinition, PinType, PinValue};

/// Category shared by every node in this library.
pub const CATEGORY: &str = "UsdAttributes";

/// Errors raised when dispatching a node call by name.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CallError {
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("{node} takes {expected} arguments, got {found}")]
    ArgumentCount {
        node: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{node}: pin {pin} expects {expected}, got {found}")]
    ArgumentType {
        node: &'static str,
        pin: &'static str,
        expected: PinType,
        found: PinType,
    },
}

/// Result type for node dispatch.
pub type CallResult<T> = Result<T, CallError>;

/// Description of a node for the palette.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeMetadata {
    pub name: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub pure: bool,
    pub inputs: Vec<PinDefinition>,
    pub outputs: Vec<PinDefinition>,
}

#[derive(Clone, Copy)]
enum Output {
    Vector,
    Float,
    Double,
    Int,
}

impl Output {
    fn pin_type(self) -> PinType {
        match self {
            Output::Vector => PinType::Vector,
            Output::Float => PinType::Float,
            Output::Double => PinType::Double,
            Output::Int => PinType::Int,
        }
    }
}

struct NodeSpec {
    name: &'static str,
    display_name: &'static str,
    description: &'static str,
    output: Output,
    animated: bool,
}

const NODES: [NodeSpec; 8] = [
    NodeSpec {
        name: "GetUsdVec3Attribute",
        display_name: "Get USD Vec3 Attribute",
        description: "Default value of a float3, double3 or int3 attribute",
        output: Output::Vector,
        animated: false,
    },
    NodeSpec {
        name: "GetUsdFloatAttribute",
        display_name: "Get USD Float Attribute",
        description: "Default value of a float attribute",
        output: Output::Float,
        animated: false,
    },
    NodeSpec {
        name: "GetUsdDoubleAttribute",
        display_name: "Get USD Double Attribute",
        description: "Default value of a double attribute",
        output: Output::Double,
        animated: false,
    },
    NodeSpec {
        name: "GetUsdIntAttribute",
        display_name: "Get USD Int Attribute",
        description: "Default value of an int attribute",
        output: Output::Int,
        animated: false,
    },
    NodeSpec {
        name: "GetUsdAnimatedFloatAttribute",
        display_name: "Get USD Animated Float Attribute",
        description: "Value of a float attribute at a time sample",
        output: Output::Float,
        animated: true,
    },
    NodeSpec {
        name: "GetUsdAnimatedDoubleAttribute",
        display_name: "Get USD Animated Double Attribute",
        description: "Value of a double attribute at a time sample",
        output: Output::Double,
        animated: true,
    },
    NodeSpec {
        name: "GetUsdAnimatedIntAttribute",
        display_name: "Get USD Animated Int Attribute",
        description: "Value of an int attribute at a time sample",
        output: Output::Int,
        animated: true,
    },
    NodeSpec {
        name: "GetUsdAnimatedVec3Attribute",
        display_name: "Get USD Animated Vec3 Attribute",
        description: "Value of a float3, double3 or int3 attribute at a time sample",
        output: Output::Vector,
        animated: true,
    },
];

impl NodeSpec {
    fn metadata(&self) -> NodeMetadata {
        let mut inputs = vec![
            PinDefinition::required("StageActor", PinType::Stage)
                .with_description("Actor owning the stage"),
            PinDefinition::required("PrimName", PinType::String)
                .with_description("Name of the first prim to match, depth-first"),
            PinDefinition::required("AttrName", PinType::String).with_description("Attribute name"),
        ];
        if self.animated {
            inputs.push(
                PinDefinition::required("TimeSample", PinType::Double)
                    .with_description("Time code"),
            );
        }

        NodeMetadata {
            name: self.name,
            display_name: self.display_name,
            category: CATEGORY,
            description: self.description,
            pure: true,
            inputs,
            outputs: vec![PinDefinition::required("ReturnValue", self.output.pin_type())],
        }
    }

    fn call(&self, actor: Option<&StageActor>, args: &[PinValue]) -> CallResult<PinValue> {
        // Stage pin is supplied out of band
        let pins = ["PrimName", "AttrName", "TimeSample"];
        let expected = if self.animated { 3 } else { 2 };
        if args.len() != expected {
            return Err(CallError::ArgumentCount {
                node: self.name,
                expected,
                found: args.len(),
            });
        }

        let prim = self.string_arg(pins[0], &args[0])?;
        let attr = self.string_arg(pins[1], &args[1])?;
        let time = if self.animated {
            Some(self.time_arg(pins[2], &args[2])?)
        } else {
            None
        };

        type L = UsdAttributeLibrary;
        let value = match (self.output, time) {
            (Output::Vector, None) => {
                PinValue::Vector(L::get_usd_vec3_attribute(actor, prim, attr))
            }
            (Output::Float, None) => PinValue::Float(L::get_usd_float_attribute(actor, prim, attr)),
            (Output::Double, None) => {
                PinValue::Double(L::get_usd_double_attribute(actor, prim, attr))
            }
            (Output::Int, None) => PinValue::Int(L::get_usd_int_attribute(actor, prim, attr)),
            (Output::Vector, Some(t)) => {
                PinValue::Vector(L::get_usd_animated_vec3_attribute(actor, prim, attr, t))
            }
            (Output::Float, Some(t)) => {
                PinValue::Float(L::get_usd_animated_float_attribute(actor, prim, attr, t))
            }
            (Output::Double, Some(t)) => {
                PinValue::Double(L::get_usd_animated_double_attribute(actor, prim, attr, t))
            }
            (Output::Int, Some(t)) => {
                PinValue::Int(L::get_usd_animated_int_attribute(actor, prim, attr, t))
            }
        };
        Ok(value)
    }

    fn string_arg<'a>(&self, pin: &'static str, value: &'a PinValue) -> CallResult<&'a str> {
        value.as_str().ok_or(CallError::ArgumentType {
            node: self.name,
            pin,
            expected: PinType::String,
            found: value.pin_type(),
        })
    }

    fn time_arg(&self, pin: &'static str, value: &PinValue) -> CallResult<f64> {
        match value.as_f64() {
            Some(t) if PinType::Double.accepts(value.pin_type()) => Ok(t),
            _ => Err(CallError::ArgumentType {
                node: self.name,
                pin,
                expected: PinType::Double,
                found: value.pin_type(),
            }),
        }
    }
}

/// Resolve the actor's stage, or fall back to zero when there is no actor.
fn with_stage<T: Default>(
    actor: Option<&StageActor>,
    read: impl FnOnce(Option<&Stage>) -> T,
) -> T {
    match actor {
        Some(actor) => read(actor.stage()),
        None => {
            log::error!("StageActor is null");
            T::default()
        }
    }
}

/// Attribute reader nodes, callable directly or by name.
pub struct UsdAttributeLibrary;

impl UsdAttributeLibrary {
    pub fn get_usd_vec3_attribute(
        actor: Option<&StageActor>,
        prim_name: &str,
        attr_name: &str,
    ) -> DVec3 {
        with_stage(actor, |stage| query::get_vec3(stage, prim_name, attr_name))
    }

    pub fn get_usd_float_attribute(
        actor: Option<&StageActor>,
        prim_name: &str,
        attr_name: &str,
    ) -> f32 {
        with_stage(actor, |stage| query::get_value(stage, prim_name, attr_name))
    }

    pub fn get_usd_double_attribute(
        actor: Option<&StageActor>,
        prim_name: &str,
        attr_name: &str,
    ) -> f64 {
        with_stage(actor, |stage| query::get_value(stage, prim_name, attr_name))
    }

    pub fn get_usd_int_attribute(
        actor: Option<&StageActor>,
        prim_name: &str,
        attr_name: &str,
    ) -> i32 {
        with_stage(actor, |stage| query::get_value(stage, prim_name, attr_name))
    }

    pub fn get_usd_animated_float_attribute(
        actor: Option<&StageActor>,
        prim_name: &str,
        attr_name: &str,
        time_sample: f64,
    ) -> f32 {
        with_stage(actor, |stage| {
            query::get_animated_value(stage, prim_name, attr_name, time_sample)
        })
    }

    pub fn get_usd_animated_double_attribute(
        actor: Option<&StageActor>,
        prim_name: &str,
        attr_name: &str,
        time_sample: f64,
    ) -> f64 {
        with_stage(actor, |stage| {
            query::get_animated_value(stage, prim_name, attr_name, time_sample)
        })
    }

    pub fn get_usd_animated_int_attribute(
        actor: Option<&StageActor>,
        prim_name: &str,
        attr_name: &str,
        time_sample: f64,
    ) -> i32 {
        with_stage(actor, |stage| {
            query::get_animated_value(stage, prim_name, attr_name, time_sample)
        })
    }

    pub fn get_usd_animated_vec3_attribute(
        actor: Option<&StageActor>,
        prim_name: &str,
        attr_name: &str,
        time_sample: f64,
    ) -> DVec3 {
        with_stage(actor, |stage| {
            query::get_animated_vec3(stage, prim_name, attr_name, time_sample)
        })
    }

    /// Metadata for every node, in palette order.
    pub fn nodes() -> Vec<NodeMetadata> {
        NODES.iter().map(NodeSpec::metadata).collect()
    }

    pub fn find(name: &str) -> Option<NodeMetadata> {
        NODES.iter().find(|n| n.name == name).map(NodeSpec::metadata)
    }

    /// Invoke a node by name.
    ///
    /// `args` holds every input pin after `StageActor`, in order.
    pub fn call(name: &str, actor: Option<&StageActor>, args: &[PinValue]) -> CallResult<PinValue> {
        let node = NODES
            .iter()
            .find(|n| n.name == name)
            .ok_or_else(|| CallError::UnknownNode(name.to_string()))?;
        log::debug!("Calling node {}", node.name);
        node.call(actor, args)
    }

    /// The node palette as pretty-printed JSON.
    pub fn to_json() -> serde_json::Result<String> {
        serde_json::to_string_pretty(&Self::nodes())
    }
}
