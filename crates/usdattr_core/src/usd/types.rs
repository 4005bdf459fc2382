//! Prim tree types produced by the USDA parser.
//!
//! The tree is read-only once a stage is built: the query layer only
//! walks prims and reads attribute values.

use serde::Deserialize;

use super::path::SdfPath;
use super::value::Value;

/// How a prim spec was introduced in the layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Specifier {
    #[default]
    Def,
    Over,
    Class,
}

impl Specifier {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "def" => Some(Specifier::Def),
            "over" => Some(Specifier::Over),
            "class" => Some(Specifier::Class),
            _ => None,
        }
    }
}

/// A point on the timeline at which to read an attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TimeCode {
    /// The authored default value, ignoring time samples.
    #[default]
    Default,
    /// A numeric time in the layer's time codes.
    At(f64),
}

impl From<f64> for TimeCode {
    fn from(time: f64) -> Self {
        TimeCode::At(time)
    }
}

/// How values between two time samples are resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Interpolate linearly where the value type allows it.
    #[default]
    Linear,
    /// Hold the earlier sample.
    Held,
}

/// Time samples of an attribute, ordered by strictly increasing time.
///
/// A `None` sample is a value block.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeSamples {
    samples: Vec<(f64, Option<Value>)>,
}

impl TimeSamples {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a sample, replacing any sample authored at the same time.
    pub fn insert(&mut self, time: f64, value: Option<Value>) {
        match self.samples.binary_search_by(|(t, _)| t.total_cmp(&time)) {
            Ok(index) => self.samples[index].1 = value,
            Err(index) => self.samples.insert(index, (time, value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Sample times in increasing order.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|(t, _)| *t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, Option<&Value>)> {
        self.samples.iter().map(|(t, v)| (*t, v.as_ref()))
    }

    /// Resolve the value at `time`.
    ///
    /// Times before the first sample or after the last one clamp to that
    /// sample. Between samples the value is interpolated when `mode` is
    /// [`Interpolation::Linear`] and both neighbours can be interpolated;
    /// otherwise the earlier sample is held. A NaN time resolves to nothing.
    pub fn resolve(&self, time: f64, mode: Interpolation) -> Option<Value> {
        if time.is_nan() {
            return None;
        }
        let (first, last) = (self.samples.first()?, self.samples.last()?);
        if time <= first.0 {
            return first.1.clone();
        }
        if time >= last.0 {
            return last.1.clone();
        }

        let upper = match self.samples.binary_search_by(|(t, _)| t.total_cmp(&time)) {
            Ok(index) => return self.samples[index].1.clone(),
            Err(index) => index,
        };
        let (t0, v0) = &self.samples[upper - 1];
        let (t1, v1) = &self.samples[upper];

        match (mode, v0, v1) {
            (Interpolation::Linear, Some(a), Some(b)) => {
                let alpha = (time - t0) / (t1 - t0);
                a.lerp(b, alpha).or_else(|| Some(a.clone()))
            }
            _ => v0.clone(),
        }
    }
}

/// A typed property holding a value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attribute {
    /// Full property name, including namespaces (e.g. `xformOp:translate`)
    pub name: String,

    /// Declared type name as authored (e.g. `point3f[]`)
    pub type_name: String,

    /// Declared with `custom`
    pub custom: bool,

    /// Declared with `uniform`
    pub uniform: bool,

    /// Authored default value; `None` when absent or blocked
    pub default: Option<Value>,

    /// Authored time samples
    pub time_samples: TimeSamples,
}

impl Attribute {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    /// Read the value at `time`.
    ///
    /// At [`TimeCode::Default`] only the default value is consulted. At a
    /// numeric time the time samples win when present.
    pub fn get(&self, time: TimeCode, mode: Interpolation) -> Option<Value> {
        match time {
            TimeCode::Default => self.default.clone(),
            TimeCode::At(t) if !self.time_samples.is_empty() => self.time_samples.resolve(t, mode),
            TimeCode::At(_) => self.default.clone(),
        }
    }
}

/// A relationship property with its target paths.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Relationship {
    pub name: String,
    pub targets: Vec<SdfPath>,
}

/// A node in the scene description tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Prim {
    /// Prim name (last component of path); empty for the pseudo-root
    pub name: String,

    /// Prim path (e.g., "/World/Model")
    pub path: SdfPath,

    pub specifier: Specifier,

    /// Schema type name (`Xform`, `Mesh`, ...); may be empty
    pub type_name: String,

    /// `false` when authored `active = false`
    pub active: bool,

    /// Attributes in authored order
    pub attributes: Vec<Attribute>,

    /// Relationships in authored order
    pub relationships: Vec<Relationship>,

    /// Child prims in authored order
    pub children: Vec<Prim>,
}

impl Prim {
    /// Create a prim under `parent`.
    pub fn new(parent: &SdfPath, name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: parent.child(name),
            type_name: type_name.to_string(),
            active: true,
            ..Default::default()
        }
    }

    /// The unnamed root every layer's top-level prims hang from.
    pub fn pseudo_root() -> Self {
        Self {
            path: SdfPath::absolute_root(),
            active: true,
            ..Default::default()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.name == name)
    }

    pub fn child(&self, name: &str) -> Option<&Prim> {
        self.children.iter().find(|c| c.name == name)
    }
}

/// Layer-level metadata from the header block.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerMetadata {
    pub default_prim: Option<String>,
    pub start_time_code: Option<f64>,
    pub end_time_code: Option<f64>,
    pub time_codes_per_second: f64,
    pub frames_per_second: Option<f64>,
    pub up_axis: Option<String>,
    pub meters_per_unit: Option<f64>,
    pub doc: Option<String>,
}

impl Default for LayerMetadata {
    fn default() -> Self {
        Self {
            default_prim: None,
            start_time_code: None,
            end_time_code: None,
            time_codes_per_second: 24.0,
            frames_per_second: None,
            up_axis: None,
            meters_per_unit: None,
            doc: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribute(default: Option<Value>, samples: &[(f64, Value)]) -> Attribute {
        let mut attr = Attribute::new("attr", "double");
        attr.default = default;
        for (time, value) in samples {
            attr.time_samples.insert(*time, Some(value.clone()));
        }
        attr
    }

    fn samples() -> TimeSamples {
        let mut samples = TimeSamples::new();
        samples.insert(10.0, Some(Value::Double(1.0)));
        samples.insert(0.0, Some(Value::Double(0.0)));
        samples.insert(20.0, Some(Value::Double(5.0)));
        samples
    }

    #[test]
    fn test_samples_are_sorted() {
        let times: Vec<f64> = samples().times().collect();
        assert_eq!(times, vec![0.0, 10.0, 20.0]);
    }

    #[test]
    fn test_resolve_clamps_to_ends() {
        let samples = samples();
        assert_eq!(samples.resolve(-5.0, Interpolation::Linear), Some(Value::Double(0.0)));
        assert_eq!(samples.resolve(100.0, Interpolation::Linear), Some(Value::Double(5.0)));
    }

    #[test]
    fn test_resolve_non_finite_times() {
        let samples = samples();
        assert_eq!(samples.resolve(f64::NAN, Interpolation::Linear), None);
        assert_eq!(samples.resolve(-f64::NAN, Interpolation::Held), None);
        assert_eq!(samples.resolve(f64::INFINITY, Interpolation::Linear), Some(Value::Double(5.0)));
        assert_eq!(
            samples.resolve(f64::NEG_INFINITY, Interpolation::Linear),
            Some(Value::Double(0.0))
        );

        let mut single = TimeSamples::new();
        single.insert(1.0, Some(Value::Float(2.0)));
        assert_eq!(single.resolve(f64::NAN, Interpolation::Linear), None);
    }

    #[test]
    fn test_resolve_exact_and_between() {
        let samples = samples();
        assert_eq!(samples.resolve(10.0, Interpolation::Linear), Some(Value::Double(1.0)));
        assert_eq!(samples.resolve(15.0, Interpolation::Linear), Some(Value::Double(3.0)));
        assert_eq!(samples.resolve(15.0, Interpolation::Held), Some(Value::Double(1.0)));
    }

    #[test]
    fn test_resolve_discrete_values_are_held() {
        let mut samples = TimeSamples::new();
        samples.insert(0.0, Some(Value::Int(1)));
        samples.insert(10.0, Some(Value::Int(9)));
        assert_eq!(samples.resolve(9.0, Interpolation::Linear), Some(Value::Int(1)));
    }

    #[test]
    fn test_resolve_blocked_sample() {
        let mut samples = TimeSamples::new();
        samples.insert(0.0, None);
        samples.insert(10.0, Some(Value::Float(1.0)));
        assert_eq!(samples.resolve(5.0, Interpolation::Linear), None);
        assert_eq!(samples.resolve(10.0, Interpolation::Linear), Some(Value::Float(1.0)));
    }

    #[test]
    fn test_default_time_ignores_samples() {
        let attr = attribute(Some(Value::Double(2.0)), &[(0.0, Value::Double(7.0))]);

        assert_eq!(attr.get(TimeCode::Default, Interpolation::Linear), Some(Value::Double(2.0)));
        assert_eq!(attr.get(TimeCode::At(3.0), Interpolation::Linear), Some(Value::Double(7.0)));

        let animated_only = attribute(None, &[(0.0, Value::Double(7.0))]);
        assert_eq!(animated_only.get(TimeCode::Default, Interpolation::Linear), None);
    }

    #[test]
    fn test_numeric_time_falls_back_to_default() {
        let attr = attribute(Some(Value::Float(4.0)), &[]);
        assert_eq!(attr.get(TimeCode::At(12.0), Interpolation::Linear), Some(Value::Float(4.0)));
    }
}
