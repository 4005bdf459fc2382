//! Loads a layer from disk through a stage actor and drives every node.

use std::path::PathBuf;

use glam::DVec3;
use usdattr_core::Settings;
use usdattr_nodes::{PinValue, StageActor, UsdAttributeLibrary};

const SHOT: &str = r#"#usda 1.0
(
    defaultPrim = "Shot"
    startTimeCode = 1
    endTimeCode = 48
)

def Xform "Shot" {
    def Xform "Props" {
        def Sphere "Ball" {
            double radius = 1.5
            float3 xformOp:translate.timeSamples = {
                1: (0, 0, 0),
                11: (10, 20, -30),
            }
            int bounce.timeSamples = { 1: 0, 24: 1, 48: 2 }
            double speed.timeSamples = { 1: 2, 48: 96 }
        }
    }
    def Xform "Layout" {
        # Same name as the prop; the prop comes first in pre-order
        def Sphere "Ball" {
            double radius = 99
        }
    }
}
"#;

struct TempLayer(PathBuf);

impl TempLayer {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("{}_{}.usda", name, std::process::id()));
        std::fs::write(&path, SHOT).unwrap();
        Self(path)
    }
}

impl Drop for TempLayer {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_nodes_against_layer_on_disk() {
    init_logging();
    let layer = TempLayer::new("usdattr_nodes_disk");
    let actor = StageActor::load(&layer.0).unwrap();
    let actor = Some(&actor);

    assert_eq!(UsdAttributeLibrary::get_usd_double_attribute(actor, "Ball", "radius"), 1.5);
    assert_eq!(
        UsdAttributeLibrary::get_usd_animated_vec3_attribute(
            actor,
            "Ball",
            "xformOp:translate",
            6.0
        ),
        DVec3::new(5.0, 10.0, -15.0)
    );
    assert_eq!(
        UsdAttributeLibrary::get_usd_animated_int_attribute(actor, "Ball", "bounce", 30.0),
        1
    );
    assert_eq!(
        UsdAttributeLibrary::get_usd_animated_double_attribute(actor, "Ball", "speed", 100.0),
        96.0
    );

    // Default-time reads do not see time samples
    assert_eq!(
        UsdAttributeLibrary::get_usd_vec3_attribute(actor, "Ball", "xformOp:translate"),
        DVec3::ZERO
    );
}

#[test]
fn test_held_settings_through_actor() {
    init_logging();
    let layer = TempLayer::new("usdattr_nodes_held");
    let mut actor = StageActor::load(&layer.0).unwrap();
    actor.apply_settings(&Settings::from_toml_str("[stage]\ninterpolation = \"held\"\n").unwrap());

    let value = UsdAttributeLibrary::call(
        "GetUsdAnimatedDoubleAttribute",
        Some(&actor),
        &[PinValue::from("Ball"), PinValue::from("speed"), PinValue::Float(47.0)],
    )
    .unwrap();
    assert_eq!(value, PinValue::Double(2.0));
}

#[test]
fn test_unloaded_actor_reads_zero() {
    init_logging();
    let layer = TempLayer::new("usdattr_nodes_unload");
    let mut actor = StageActor::load(&layer.0).unwrap();
    actor.unload();

    assert_eq!(UsdAttributeLibrary::get_usd_double_attribute(Some(&actor), "Ball", "radius"), 0.0);
}
