#![allow(clippy::float_cmp)]

use super::*;

fn gripper() -> Assembly {
    Assembly {
        id: "5".into(),
        name: "RobotGripper".into(),
        parts: vec![
            PartInstance::new("Pin_01", "Pin.glb", Vec3::new(0.0052, 0.0585, 0.0024), Vec3::new(0.2, 0.2, 0.2)),
            PartInstance::new("Pin_02", "Pin.glb", Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0)),
            PartInstance::new("Base", "Base.glb", Vec3::ZERO, Vec3::ZERO),
        ],
    }
}

fn selected(id: &str, mode: TransformMode) -> SelectionState {
    SelectionState::Selected { id: id.into(), mode }
}

// =============================================================
// TransformMode
// =============================================================

#[test]
fn mode_default_is_translate() {
    assert_eq!(TransformMode::default(), TransformMode::Translate);
}

#[test]
fn mode_serde_lowercase() {
    assert_eq!(serde_json::to_string(&TransformMode::Rotate).unwrap(), "\"rotate\"");
    let back: TransformMode = serde_json::from_str("\"translate\"").unwrap();
    assert_eq!(back, TransformMode::Translate);
}

#[test]
fn mode_deserialize_invalid_rejects() {
    assert!(serde_json::from_str::<TransformMode>("\"scale\"").is_err());
}

#[test]
fn mode_display() {
    assert_eq!(TransformMode::Rotate.to_string(), "rotate");
}

// =============================================================
// select / deselect
// =============================================================

#[test]
fn new_selection_is_idle() {
    let sel = Selection::new();
    assert_eq!(sel.state(), SelectionState::Idle);
    assert_eq!(sel.mode(), TransformMode::Translate);
}

#[test]
fn select_known_instance() {
    let mut sel = Selection::new();
    assert!(sel.select(&gripper(), "Pin_01"));
    assert_eq!(sel.state(), selected("Pin_01", TransformMode::Translate));
    assert!(sel.is_selected("Pin_01"));
}

#[test]
fn select_unknown_instance_is_ignored() {
    let mut sel = Selection::new();
    sel.select(&gripper(), "Pin_01");
    assert!(!sel.select(&gripper(), "Pin_99"));
    assert_eq!(sel.selected_id(), Some("Pin_01"));
}

#[test]
fn select_replaces_previous() {
    let mut sel = Selection::new();
    sel.select(&gripper(), "Pin_01");
    sel.select(&gripper(), "Base");
    assert_eq!(sel.selected_id(), Some("Base"));
}

#[test]
fn deselect_returns_to_idle() {
    let mut sel = Selection::new();
    sel.select(&gripper(), "Pin_01");
    assert!(sel.deselect());
    assert_eq!(sel.state(), SelectionState::Idle);
    assert!(!sel.deselect());
}

// =============================================================
// set_mode
// =============================================================

#[test]
fn set_mode_while_selected_applies() {
    let mut sel = Selection::new();
    sel.select(&gripper(), "Pin_01");
    assert!(sel.set_mode(TransformMode::Rotate));
    assert_eq!(sel.state(), selected("Pin_01", TransformMode::Rotate));
}

#[test]
fn set_mode_while_idle_carries_to_next_selection() {
    let mut sel = Selection::new();
    sel.set_mode(TransformMode::Rotate);
    assert_eq!(sel.state(), SelectionState::Idle);
    sel.select(&gripper(), "Base");
    assert_eq!(sel.state(), selected("Base", TransformMode::Rotate));
}

#[test]
fn set_same_mode_reports_unchanged() {
    let mut sel = Selection::new();
    assert!(!sel.set_mode(TransformMode::Translate));
}

// =============================================================
// Gesture
// =============================================================

#[test]
fn begin_requires_selection() {
    let mut sel = Selection::new();
    assert!(!sel.begin_manipulation(Pose::default()));
    assert_eq!(sel.gesture(), &Gesture::Idle);
}

#[test]
fn begin_then_cancel_returns_origin() {
    let mut sel = Selection::new();
    sel.select(&gripper(), "Pin_02");
    let origin = Pose::new(Vec3::new(0.0, 2.5, 0.0), Vec3::ZERO);
    assert!(sel.begin_manipulation(origin));
    assert!(matches!(sel.gesture(), Gesture::Manipulating { id, .. } if id == "Pin_02"));
    assert_eq!(sel.cancel_manipulation(), Some(("Pin_02".to_owned(), origin)));
    assert_eq!(sel.gesture(), &Gesture::Idle);
    assert_eq!(sel.cancel_manipulation(), None);
}

#[test]
fn deselect_drops_gesture() {
    let mut sel = Selection::new();
    sel.select(&gripper(), "Pin_02");
    sel.begin_manipulation(Pose::default());
    sel.deselect();
    assert_eq!(sel.gesture(), &Gesture::Idle);
}

#[test]
fn selecting_another_instance_drops_gesture() {
    let mut sel = Selection::new();
    sel.select(&gripper(), "Pin_02");
    sel.begin_manipulation(Pose::default());
    sel.select(&gripper(), "Base");
    assert_eq!(sel.gesture(), &Gesture::Idle);
}

// =============================================================
// commit_transform
// =============================================================

#[test]
fn commit_updates_rest_pose_and_emits_record() {
    let mut assembly = gripper();
    let mut sel = Selection::new();
    sel.select(&assembly, "Pin_01");

    let pose = Pose::new(Vec3::new(0.01, 0.02, 0.03), Vec3::ZERO);
    let record = sel.commit_transform(&mut assembly.parts, "Pin_01", pose, ExplosionFactor::ZERO).unwrap();

    assert_eq!(record.id, "Pin_01");
    assert_eq!(record.position, Vec3::new(0.01, 0.02, 0.03));
    assert_eq!(record.rotation, Vec3::ZERO);
    assert_eq!(record.rest_position, Vec3::new(0.01, 0.02, 0.03));
    let part = assembly.part("Pin_01").unwrap();
    assert_eq!(part.rest_position, Vec3::new(0.01, 0.02, 0.03));
    assert_eq!(part.rest_rotation, Vec3::ZERO);
}

#[test]
fn commit_rounds_record_to_four_places() {
    let mut assembly = gripper();
    let mut sel = Selection::new();
    sel.select(&assembly, "Base");

    let pose = Pose::new(Vec3::new(0.123_456_7, -0.000_04, 1.0), Vec3::new(1.570_796, 0.0, -3.141_592_6));
    let record = sel.commit_transform(&mut assembly.parts, "Base", pose, ExplosionFactor::ZERO).unwrap();

    assert_eq!(record.position, Vec3::new(0.1235, -0.0, 1.0));
    assert_eq!(record.rotation, Vec3::new(1.5708, 0.0, -3.1416));
    // The instance keeps full precision.
    assert_eq!(assembly.part("Base").unwrap().rest_position.x, 0.123_456_7);
}

#[test]
fn commit_while_exploded_back_solves_rest_position() {
    let mut assembly = gripper();
    let mut sel = Selection::new();
    sel.select(&assembly, "Pin_02");

    // Direction (0, 10, 0) at factor 0.25 puts the part 2.5 above its rest.
    let pose = Pose::new(Vec3::new(1.0, 3.0, 0.0), Vec3::ZERO);
    let record = sel.commit_transform(&mut assembly.parts, "Pin_02", pose, ExplosionFactor::new(0.25)).unwrap();

    assert_eq!(record.position, Vec3::new(1.0, 3.0, 0.0));
    assert_eq!(record.rest_position, Vec3::new(1.0, 0.5, 0.0));
    assert_eq!(assembly.part("Pin_02").unwrap().rest_position, Vec3::new(1.0, 0.5, 0.0));
}

#[test]
fn commit_pins_pose_at_commit_factor() {
    let mut assembly = gripper();
    let mut sel = Selection::new();
    sel.select(&assembly, "Pin_01");

    let factor = ExplosionFactor::new(0.137);
    let pose = Pose::new(Vec3::new(0.1557, 0.2441, -0.0042), Vec3::new(0.1, 0.0, 0.0));
    sel.commit_transform(&mut assembly.parts, "Pin_01", pose, factor).unwrap();

    let pinned = assembly.part("Pin_01").unwrap().pinned.unwrap();
    assert_eq!(pinned.pose, pose);
    assert_eq!(pinned.factor, factor);
}

#[test]
fn commit_ends_gesture() {
    let mut assembly = gripper();
    let mut sel = Selection::new();
    sel.select(&assembly, "Pin_02");
    sel.begin_manipulation(Pose::default());
    sel.commit_transform(&mut assembly.parts, "Pin_02", Pose::default(), ExplosionFactor::ZERO);
    assert_eq!(sel.gesture(), &Gesture::Idle);
}

#[test]
fn commit_without_selection_is_ignored() {
    let mut assembly = gripper();
    let before = assembly.clone();
    let mut sel = Selection::new();
    let record = sel.commit_transform(&mut assembly.parts, "Pin_01", Pose::default(), ExplosionFactor::ZERO);
    assert!(record.is_none());
    assert_eq!(assembly, before);
}

#[test]
fn commit_for_other_instance_is_ignored() {
    let mut assembly = gripper();
    let before = assembly.clone();
    let mut sel = Selection::new();
    sel.select(&assembly, "Pin_01");
    let record = sel.commit_transform(&mut assembly.parts, "Base", Pose::default(), ExplosionFactor::ZERO);
    assert!(record.is_none());
    assert_eq!(assembly, before);
}

// =============================================================
// PoseRecord
// =============================================================

#[test]
fn record_catalog_snippet() {
    let record = PoseRecord {
        id: "Pin_01".into(),
        position: Vec3::new(0.01, 0.02, 0.03),
        rotation: Vec3::new(3.1416, -1.5402, 3.1416),
        rest_position: Vec3::new(0.01, 0.02, 0.03),
    };
    assert_eq!(
        record.to_catalog_snippet(),
        "{ id: \"Pin_01\", default_pos: [0.0100, 0.0200, 0.0300], rotation: [3.1416, -1.5402, 3.1416] }"
    );
}

#[test]
fn record_serializes_vectors_as_arrays() {
    let record = PoseRecord {
        id: "Base".into(),
        position: Vec3::new(1.0, 2.0, 3.0),
        rotation: Vec3::ZERO,
        rest_position: Vec3::new(1.0, 2.0, 3.0),
    };
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["position"], serde_json::json!([1.0, 2.0, 3.0]));
    assert_eq!(json["id"], "Base");
}
