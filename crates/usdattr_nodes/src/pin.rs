//! Pin types and values flowing in and out of nodes.

use std::fmt;

use glam::DVec3;
use serde::Serialize;

/// Data types a pin can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PinType {
    /// 32-bit float
    Float,
    /// 64-bit float
    Double,
    /// 32-bit signed integer
    Int,
    /// Double-precision 3-vector
    Vector,
    /// Text string
    String,
    /// Stage actor handle
    Stage,
}

impl PinType {
    pub fn name(&self) -> &'static str {
        match self {
            PinType::Float => "Float",
            PinType::Double => "Double",
            PinType::Int => "Int",
            PinType::Vector => "Vector",
            PinType::String => "String",
            PinType::Stage => "Stage",
        }
    }

    /// Whether a value of type `other` may be fed into a pin of this type.
    ///
    /// Double pins widen Float and Int values.
    pub fn accepts(&self, other: PinType) -> bool {
        *self == other
            || (*self == PinType::Double && matches!(other, PinType::Float | PinType::Int))
    }
}

impl fmt::Display for PinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value carried by a pin. The stage actor is passed separately.
#[derive(Debug, Clone, PartialEq)]
pub enum PinValue {
    Float(f32),
    Double(f64),
    Int(i32),
    Vector(DVec3),
    String(String),
}

impl PinValue {
    pub fn pin_type(&self) -> PinType {
        match self {
            PinValue::Float(_) => PinType::Float,
            PinValue::Double(_) => PinType::Double,
            PinValue::Int(_) => PinType::Int,
            PinValue::Vector(_) => PinType::Vector,
            PinValue::String(_) => PinType::String,
        }
    }

    /// Numeric payload widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PinValue::Float(v) => Some(f64::from(*v)),
            PinValue::Double(v) => Some(*v),
            PinValue::Int(v) => Some(f64::from(*v)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PinValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PinValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinValue::Float(v) => write!(f, "{}", v),
            PinValue::Double(v) => write!(f, "{}", v),
            PinValue::Int(v) => write!(f, "{}", v),
            PinValue::Vector(v) => write!(f, "({}, {}, {})", v.x, v.y, v.z),
            PinValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PinValue {
    fn from(s: &str) -> Self {
        PinValue::String(s.to_string())
    }
}

impl From<f64> for PinValue {
    fn from(v: f64) -> Self {
        PinValue::Double(v)
    }
}

/// Pin definition for node metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PinDefinition {
    pub name: String,
    pub pin_type: PinType,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PinDefinition {
    /// Create a required pin
    pub fn required(name: &str, pin_type: PinType) -> Self {
        Self {
            name: name.to_string(),
            pin_type,
            optional: false,
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_pin_widens() {
        assert!(PinType::Double.accepts(PinType::Double));
        assert!(PinType::Double.accepts(PinType::Float));
        assert!(PinType::Double.accepts(PinType::Int));
        assert!(!PinType::Double.accepts(PinType::String));

        assert!(PinType::Int.accepts(PinType::Int));
        assert!(!PinType::Int.accepts(PinType::Float));
        assert!(!PinType::Float.accepts(PinType::Double));
    }

    #[test]
    fn test_widening_values() {
        assert_eq!(PinValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(PinValue::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(PinValue::from("x").as_f64(), None);
        assert_eq!(PinValue::from("x").as_str(), Some("x"));
    }

    #[test]
    fn test_display() {
        assert_eq!(PinValue::Vector(DVec3::new(1.0, 2.5, -3.0)).to_string(), "(1, 2.5, -3)");
        assert_eq!(PinValue::Int(-4).to_string(), "-4");
    }

    #[test]
    fn test_pin_definition_builders() {
        let pin =
            PinDefinition::required("TimeSample", PinType::Double).with_description("Time code");
        assert!(!pin.optional);
        assert_eq!(pin.pin_type, PinType::Double);
        assert_eq!(pin.description.as_deref(), Some("Time code"));
        assert!(PinDefinition::required("PrimName", PinType::String).description.is_none());
    }
}
