//! Attribute values.
//!
//! [`Value`] is the tagged union held by attributes and time samples.
//! Role types (`point3f`, `color3f`, `texCoord2f`, ...) are stored as their
//! underlying vector variant; the attribute keeps the declared type name.

use glam::{DMat4, DQuat, DVec2, DVec3, DVec4, IVec2, IVec3, IVec4, Quat, Vec2, Vec3, Vec4};

/// A typed attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    String(String),
    Token(String),
    Asset(String),

    Float2(Vec2),
    Float3(Vec3),
    Float4(Vec4),
    Double2(DVec2),
    Double3(DVec3),
    Double4(DVec4),
    Int2(IVec2),
    Int3(IVec3),
    Int4(IVec4),

    Quatf(Quat),
    Quatd(DQuat),
    Matrix4d(DMat4),

    BoolArray(Vec<bool>),
    IntArray(Vec<i32>),
    FloatArray(Vec<f32>),
    DoubleArray(Vec<f64>),
    StringArray(Vec<String>),
    TokenArray(Vec<String>),
    Float3Array(Vec<Vec3>),
    Double3Array(Vec<DVec3>),
    Int3Array(Vec<IVec3>),
}

/// Scalar element type of a declared attribute type, with roles resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueType {
    Bool,
    Int,
    Int64,
    Float,
    Double,
    String,
    Token,
    Asset,
    Float2,
    Float3,
    Float4,
    Double2,
    Double3,
    Double4,
    Int2,
    Int3,
    Int4,
    Quatf,
    Quatd,
    Matrix4d,
}

impl ValueType {
    /// Resolve a declared USDA type name (without `[]`).
    ///
    /// Half precision types are widened to their float counterparts and
    /// unsigned integers are read as signed.
    pub fn from_type_name(name: &str) -> Option<Self> {
        let ty = match name {
            "bool" => ValueType::Bool,
            "int" | "uint" | "uchar" => ValueType::Int,
            "int64" | "uint64" => ValueType::Int64,
            "float" | "half" => ValueType::Float,
            "double" | "timecode" => ValueType::Double,
            "string" => ValueType::String,
            "token" => ValueType::Token,
            "asset" => ValueType::Asset,

            "float2" | "half2" | "texCoord2f" | "texCoord2h" => ValueType::Float2,
            "float3" | "half3" | "point3f" | "point3h" | "normal3f" | "normal3h" | "vector3f"
            | "vector3h" | "color3f" | "color3h" | "texCoord3f" | "texCoord3h" => ValueType::Float3,
            "float4" | "half4" | "color4f" | "color4h" => ValueType::Float4,

            "double2" | "texCoord2d" => ValueType::Double2,
            "double3" | "point3d" | "normal3d" | "vector3d" | "color3d" | "texCoord3d" => {
                ValueType::Double3
            }
            "double4" | "color4d" => ValueType::Double4,

            "int2" => ValueType::Int2,
            "int3" => ValueType::Int3,
            "int4" => ValueType::Int4,

            "quatf" | "quath" => ValueType::Quatf,
            "quatd" => ValueType::Quatd,
            "matrix4d" | "frame4d" => ValueType::Matrix4d,
            _ => return None,
        };
        Some(ty)
    }

    /// Number of scalar components in a tuple value, `None` for scalars.
    pub fn tuple_len(&self) -> Option<usize> {
        match self {
            ValueType::Float2 | ValueType::Double2 | ValueType::Int2 => Some(2),
            ValueType::Float3 | ValueType::Double3 | ValueType::Int3 => Some(3),
            ValueType::Float4 | ValueType::Double4 | ValueType::Int4 => Some(4),
            ValueType::Quatf | ValueType::Quatd => Some(4),
            _ => None,
        }
    }
}

impl Value {
    /// USDA type name of the held value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Int64(_) => "int64",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Token(_) => "token",
            Value::Asset(_) => "asset",
            Value::Float2(_) => "float2",
            Value::Float3(_) => "float3",
            Value::Float4(_) => "float4",
            Value::Double2(_) => "double2",
            Value::Double3(_) => "double3",
            Value::Double4(_) => "double4",
            Value::Int2(_) => "int2",
            Value::Int3(_) => "int3",
            Value::Int4(_) => "int4",
            Value::Quatf(_) => "quatf",
            Value::Quatd(_) => "quatd",
            Value::Matrix4d(_) => "matrix4d",
            Value::BoolArray(_) => "bool[]",
            Value::IntArray(_) => "int[]",
            Value::FloatArray(_) => "float[]",
            Value::DoubleArray(_) => "double[]",
            Value::StringArray(_) => "string[]",
            Value::TokenArray(_) => "token[]",
            Value::Float3Array(_) => "float3[]",
            Value::Double3Array(_) => "double3[]",
            Value::Int3Array(_) => "int3[]",
        }
    }

    /// Widen a 3-component vector value to double precision.
    ///
    /// Only `float3`, `double3` and `int3` convert; component order is kept.
    pub fn to_dvec3(&self) -> Option<DVec3> {
        match self {
            Value::Float3(v) => Some(v.as_dvec3()),
            Value::Double3(v) => Some(*v),
            Value::Int3(v) => Some(v.as_dvec3()),
            _ => None,
        }
    }

    /// Extract a typed payload if this value holds exactly that type.
    pub fn get<T: FromValue>(&self) -> Option<T> {
        T::from_value(self)
    }

    /// Linearly interpolate towards `other`.
    ///
    /// Returns `None` when the pair cannot be interpolated (different or
    /// discrete types, arrays of different lengths); callers then hold the
    /// earlier value.
    pub fn lerp(&self, other: &Value, alpha: f64) -> Option<Value> {
        let a32 = alpha as f32;
        let value = match (self, other) {
            (Value::Float(a), Value::Float(b)) => Value::Float(a + (b - a) * a32),
            (Value::Double(a), Value::Double(b)) => Value::Double(a + (b - a) * alpha),
            (Value::Float2(a), Value::Float2(b)) => Value::Float2(a.lerp(*b, a32)),
            (Value::Float3(a), Value::Float3(b)) => Value::Float3(a.lerp(*b, a32)),
            (Value::Float4(a), Value::Float4(b)) => Value::Float4(a.lerp(*b, a32)),
            (Value::Double2(a), Value::Double2(b)) => Value::Double2(a.lerp(*b, alpha)),
            (Value::Double3(a), Value::Double3(b)) => Value::Double3(a.lerp(*b, alpha)),
            (Value::Double4(a), Value::Double4(b)) => Value::Double4(a.lerp(*b, alpha)),
            (Value::Quatf(a), Value::Quatf(b)) => Value::Quatf(a.slerp(*b, a32)),
            (Value::Quatd(a), Value::Quatd(b)) => Value::Quatd(a.slerp(*b, alpha)),
            (Value::Matrix4d(a), Value::Matrix4d(b)) => {
                Value::Matrix4d(*a * (1.0 - alpha) + *b * alpha)
            }
            (Value::FloatArray(a), Value::FloatArray(b)) if a.len() == b.len() => Value::FloatArray(
                a.iter().zip(b).map(|(x, y)| x + (y - x) * a32).collect(),
            ),
            (Value::DoubleArray(a), Value::DoubleArray(b)) if a.len() == b.len() => {
                Value::DoubleArray(a.iter().zip(b).map(|(x, y)| x + (y - x) * alpha).collect())
            }
            (Value::Float3Array(a), Value::Float3Array(b)) if a.len() == b.len() => {
                Value::Float3Array(a.iter().zip(b).map(|(x, y)| x.lerp(*y, a32)).collect())
            }
            (Value::Double3Array(a), Value::Double3Array(b)) if a.len() == b.len() => {
                Value::Double3Array(a.iter().zip(b).map(|(x, y)| x.lerp(*y, alpha)).collect())
            }
            _ => return None,
        };
        Some(value)
    }
}

/// Types that can be copied out of a [`Value`].
///
/// Extraction only succeeds when the value holds exactly the requested
/// type; no numeric coercion happens here.
pub trait FromValue: Sized {
    /// USDA type name of the extracted type, for diagnostics.
    const TYPE_NAME: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_from_value {
    ($ty:ty, $variant:ident, $name:literal) => {
        impl FromValue for $ty {
            const TYPE_NAME: &'static str = $name;

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

impl_from_value!(bool, Bool, "bool");
impl_from_value!(i32, Int, "int");
impl_from_value!(i64, Int64, "int64");
impl_from_value!(f32, Float, "float");
impl_from_value!(f64, Double, "double");
impl_from_value!(Vec2, Float2, "float2");
impl_from_value!(Vec3, Float3, "float3");
impl_from_value!(Vec4, Float4, "float4");
impl_from_value!(DVec2, Double2, "double2");
impl_from_value!(DVec3, Double3, "double3");
impl_from_value!(DVec4, Double4, "double4");
impl_from_value!(IVec2, Int2, "int2");
impl_from_value!(IVec3, Int3, "int3");
impl_from_value!(IVec4, Int4, "int4");
impl_from_value!(Quat, Quatf, "quatf");
impl_from_value!(DQuat, Quatd, "quatd");
impl_from_value!(DMat4, Matrix4d, "matrix4d");
impl_from_value!(Vec<f32>, FloatArray, "float[]");
impl_from_value!(Vec<f64>, DoubleArray, "double[]");
impl_from_value!(Vec<i32>, IntArray, "int[]");
impl_from_value!(Vec<Vec3>, Float3Array, "float3[]");

impl FromValue for String {
    const TYPE_NAME: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) | Value::Token(s) | Value::Asset(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromValue for Value {
    const TYPE_NAME: &'static str = "value";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_exact_type_only() {
        let value = Value::Float(1.5);
        assert_eq!(value.get::<f32>(), Some(1.5));
        assert_eq!(value.get::<f64>(), None);
        assert_eq!(value.get::<i32>(), None);

        assert_eq!(Value::Int(7).get::<i32>(), Some(7));
        assert_eq!(Value::Int(7).get::<f32>(), None);
    }

    #[test]
    fn test_to_dvec3_widens_in_order() {
        let f = Value::Float3(Vec3::new(1.5, -2.0, 3.25));
        let d = Value::Double3(DVec3::new(0.1, 0.2, 0.3));
        let i = Value::Int3(IVec3::new(4, -5, 6));

        assert_eq!(f.to_dvec3(), Some(DVec3::new(1.5, -2.0, 3.25)));
        assert_eq!(d.to_dvec3(), Some(DVec3::new(0.1, 0.2, 0.3)));
        assert_eq!(i.to_dvec3(), Some(DVec3::new(4.0, -5.0, 6.0)));
        assert_eq!(Value::Float2(Vec2::ONE).to_dvec3(), None);
        assert_eq!(Value::Double(1.0).to_dvec3(), None);
    }

    #[test]
    fn test_role_types_resolve() {
        assert_eq!(ValueType::from_type_name("point3f"), Some(ValueType::Float3));
        assert_eq!(ValueType::from_type_name("color3d"), Some(ValueType::Double3));
        assert_eq!(ValueType::from_type_name("texCoord2f"), Some(ValueType::Float2));
        assert_eq!(ValueType::from_type_name("half"), Some(ValueType::Float));
        assert_eq!(ValueType::from_type_name("dictionary"), None);
    }

    #[test]
    fn test_lerp() {
        let a = Value::Double(0.0);
        let b = Value::Double(10.0);
        assert_eq!(a.lerp(&b, 0.25), Some(Value::Double(2.5)));

        let a = Value::Float3(Vec3::ZERO);
        let b = Value::Float3(Vec3::new(2.0, 4.0, 8.0));
        assert_eq!(a.lerp(&b, 0.5), Some(Value::Float3(Vec3::new(1.0, 2.0, 4.0))));

        assert_eq!(Value::Int(0).lerp(&Value::Int(10), 0.5), None);
        assert_eq!(Value::Float(0.0).lerp(&Value::Double(1.0), 0.5), None);
        assert_eq!(
            Value::FloatArray(vec![0.0]).lerp(&Value::FloatArray(vec![1.0, 2.0]), 0.5),
            None
        );
    }

    #[test]
    fn test_string_from_token_and_asset() {
        assert_eq!(Value::Token("render".into()).get::<String>(), Some("render".to_string()));
        assert_eq!(Value::Asset("./a.usda".into()).get::<String>(), Some("./a.usda".to_string()));
    }
}
