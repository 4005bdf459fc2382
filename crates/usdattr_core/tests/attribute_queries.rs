//! End-to-end reads: USDA text → stage → prim by name → typed value.

use glam::{DQuat, DVec3, Vec3};
use usdattr_core::query::{self, QueryError};
use usdattr_core::usd::{Specifier, Value};
use usdattr_core::{find_prim_path, Interpolation, SdfPath, Stage, TimeCode};

const SHOT: &str = r#"#usda 1.0
(
    "Layout for shot 010"
    defaultPrim = "Shot"
    startTimeCode = 1
    endTimeCode = 24
    timeCodesPerSecond = 24
    upAxis = "Y"
)

def Xform "Shot" (
    kind = "assembly"
)
{
    def Camera "Cam"
    {
        float focalLength = 35
        float focalLength.timeSamples = {
            1: 35,
            24: 50,
        }
        double3 xformOp:translate = (0, 1.8, 10)
        quatd xformOp:orient.timeSamples = {
            1: (1, 0, 0, 0),
            24: (0, 0, 1, 0),
        }
        uniform token[] xformOpOrder = ["xformOp:translate", "xformOp:orient"]
    }

    over "Props" (
        active = false
    )
    {
        def Mesh "Crate" {
            point3f[] points = [(0, 0, 0), (1, 0, 0), (1, 1, 0)]
            color3f[] primvars:displayColor = [(0.8, 0.2, 0.1)]
            rel material:binding = </Shot/Looks/Wood>
            int subdivLevel = 2
        }
    }

    def Scope "Looks" {
        def Material "Wood" {}
    }
}
"#;

fn stage() -> Stage {
    Stage::from_string(SHOT, "shot010.usda").unwrap()
}

#[test]
fn test_layer_metadata() {
    let stage = stage();
    let metadata = stage.metadata();

    assert_eq!(metadata.doc.as_deref(), Some("Layout for shot 010"));
    assert_eq!(metadata.up_axis.as_deref(), Some("Y"));
    assert_eq!(stage.time_code_range(), Some((1.0, 24.0)));
    assert_eq!(stage.default_prim().unwrap().name, "Shot");
}

#[test]
fn test_prim_tree() {
    let stage = stage();

    let props = stage.prim_at_path(&SdfPath::new("/Shot/Props").unwrap()).unwrap();
    assert_eq!(props.specifier, Specifier::Over);
    assert!(!props.active);

    let crate_path = find_prim_path(stage.pseudo_root(), "Crate");
    assert_eq!(crate_path.as_str(), "/Shot/Props/Crate");

    let crate_prim = stage.prim_at_path(&crate_path).unwrap();
    let binding = crate_prim.relationship("material:binding").unwrap();
    assert_eq!(binding.targets, vec![SdfPath::new("/Shot/Looks/Wood").unwrap()]);
}

#[test]
fn test_default_and_animated_reads() {
    let stage = stage();
    let stage = Some(&stage);

    // Default time sees the default, numeric time sees the samples
    assert_eq!(query::get_value::<f32>(stage, "Cam", "focalLength"), 35.0);
    assert_eq!(query::get_animated_value::<f32>(stage, "Cam", "focalLength", 24.0), 50.0);
    assert_eq!(query::get_animated_value::<f32>(stage, "Cam", "focalLength", 0.0), 35.0);

    assert_eq!(query::get_vec3(stage, "Cam", "xformOp:translate"), DVec3::new(0.0, 1.8, 10.0));
    assert_eq!(query::get_value::<i32>(stage, "Crate", "subdivLevel"), 2);
}

#[test]
fn test_quaternion_samples_slerp() {
    let stage = stage();
    let orient: DQuat = query::get_animated_value(Some(&stage), "Cam", "xformOp:orient", 12.5);

    let expected = DQuat::IDENTITY.slerp(DQuat::from_xyzw(0.0, 1.0, 0.0, 0.0), 0.5);
    assert!(orient.abs_diff_eq(expected, 1e-9));
}

#[test]
fn test_role_typed_arrays() {
    let stage = stage();
    let stage = Some(&stage);

    let points: Vec<Vec3> = query::get_value(stage, "Crate", "points");
    assert_eq!(points.len(), 3);
    assert_eq!(points[2], Vec3::new(1.0, 1.0, 0.0));

    let order = query::try_read(stage, "Cam", "xformOpOrder", TimeCode::Default).unwrap();
    assert_eq!(
        order,
        Value::TokenArray(vec!["xformOp:translate".to_string(), "xformOp:orient".to_string()])
    );

    // Arrays are not 3-vectors
    assert!(matches!(
        query::try_get_vec3(stage, "Crate", "points"),
        Err(QueryError::UnsupportedVectorType { .. })
    ));
}

#[test]
fn test_held_stage() {
    let mut stage = stage();
    stage.set_interpolation(Interpolation::Held);
    assert_eq!(
        query::get_animated_value::<f32>(Some(&stage), "Cam", "focalLength", 23.0),
        35.0
    );
}
