use objread_core::{Descriptor, Entity, PersistentId, ReadOpts, Registry, SceneModel};
use pretty_assertions::assert_eq;
use serde_json::json;

// Hull group: one face with two edges and one deleted sub-group.
fn hull_scene() -> SceneModel {
    let mut scene = SceneModel::new();
    scene.add_edge(11, &[10]);
    scene.add_edge(12, &[10]);
    scene.add_face(10, &[11, 12]);
    scene.add_group(20, "Inner", &[]).unwrap();
    scene.delete(PersistentId(20)).unwrap();
    scene.add_group(1, "Hull", &[10, 20]).unwrap();
    scene.select(&[1]);
    scene
}

#[test]
fn hull_scenario_shape() {
    let scene = hull_scene();
    let reg = Registry::new();
    let out = reg.read_selection(scene.selection().unwrap());
    let v = serde_json::to_value(&out).unwrap();
    assert_eq!(
        v,
        json!([{
            "type": "Group",
            "persistent_id": 1,
            "visible": true,
            "deleted": false,
            "children": [
                {"type": "Face", "persistent_id": 10, "visible": true, "deleted": false, "edges": [11, 12]},
                {"type": "Group", "deleted": true}
            ],
            "name": "Hull"
        }])
    );
    // key order as constructed, not sorted
    let s = objread_core::to_json_string(&out).unwrap();
    let pos = |k: &str| s.find(k).unwrap();
    assert!(pos("\"type\"") < pos("\"persistent_id\""));
    assert!(pos("\"persistent_id\"") < pos("\"visible\""));
    assert!(pos("\"children\"") < pos("\"name\": \"Hull\""));
}

#[test]
fn deleted_entity_has_exactly_two_keys() {
    let mut scene = SceneModel::new();
    scene.add_face(3, &[4]);
    scene.add_edge(4, &[3]);
    scene.add_entity(5, "Text");
    for id in [3, 4, 5] {
        scene.delete(PersistentId(id)).unwrap();
    }
    let reg = Registry::new();
    for id in [3, 4, 5] {
        let e = scene.entity(PersistentId(id)).unwrap();
        let v = serde_json::to_value(reg.read_entity(&e)).unwrap();
        assert_eq!(v, json!({"type": e.kind(), "deleted": true}));
    }
}

#[test]
fn live_entity_has_identity_and_visibility() {
    let mut scene = SceneModel::new();
    scene.add_entity(8, "ConstructionPoint");
    scene.set_visible(PersistentId(8), false).unwrap();
    let reg = Registry::new();
    let d = reg.read_entity(&scene.entity(PersistentId(8)).unwrap());
    assert_eq!(d.persistent_id, Some(PersistentId(8)));
    assert_eq!(d.visible, Some(false));
    assert!(!d.deleted);
}

#[test]
fn group_children_follow_host_order() {
    let mut scene = SceneModel::new();
    scene.add_entity(5, "Text");
    scene.add_entity(6, "Text");
    scene.add_edge(3, &[]);
    scene.add_group(4, "Nested", &[3]).unwrap();
    scene.add_face(2, &[3]);
    scene.add_group(1, "Top", &[5, 2, 4, 6]).unwrap();
    let reg = Registry::new();
    let d = reg.read_entity(&scene.entity(PersistentId(1)).unwrap());
    let children = d.children.unwrap();
    let ids: Vec<_> = children.iter().map(|c| c.persistent_id.unwrap().0).collect();
    assert_eq!(ids, vec![5, 2, 4, 6]);
    assert_eq!(children[1].edges, Some(vec![PersistentId(3)]));
    let nested = children[2].children.as_ref().unwrap();
    assert_eq!(nested[0].faces, Some(vec![]));
    assert_eq!(children[2].name.as_deref(), Some("Nested"));
}

#[test]
fn adjacency_is_ids_only_and_does_not_loop() {
    let mut scene = SceneModel::new();
    scene.add_face(1, &[3, 4]);
    scene.add_face(2, &[3]);
    scene.add_edge(3, &[1, 2]);
    scene.add_edge(4, &[1]);
    scene.select(&[1, 3]);
    let reg = Registry::new();
    let v = serde_json::to_value(reg.read_selection(scene.selection().unwrap())).unwrap();
    assert_eq!(v[0]["edges"], json!([3, 4]));
    assert_eq!(v[1]["faces"], json!([1, 2]));
}

#[test]
fn empty_selection_is_empty_result() {
    let scene = SceneModel::new();
    let reg = Registry::new();
    let out = reg.read_selection(scene.selection().unwrap());
    assert!(out.is_empty());
}

#[test]
fn selection_keeps_order_and_duplicates() {
    let mut scene = SceneModel::new();
    scene.add_edge(1, &[]);
    scene.add_face(2, &[]);
    scene.select(&[2, 1, 2]);
    let reg = Registry::new();
    let out = objread_core::read_selection(&reg, scene.selection().unwrap());
    let kinds: Vec<_> = out.iter().map(|d| d.kind.as_str()).collect();
    assert_eq!(kinds, vec!["Face", "Edge", "Face"]);
    assert_eq!(out[0], out[2]);
}

#[test]
fn reading_is_idempotent() {
    let scene = hull_scene();
    let reg = Registry::new();
    let e = scene.entity(PersistentId(1)).unwrap();
    assert_eq!(reg.read_entity(&e), reg.read_entity(&e));
}

#[test]
fn deletion_between_reads_is_reflected() {
    let mut scene = hull_scene();
    let before = Registry::new().read_entity(&scene.entity(PersistentId(1)).unwrap());
    assert_eq!(before.tree_len(), 3);
    scene.delete(PersistentId(10)).unwrap();
    let after = Registry::new().read_entity(&scene.entity(PersistentId(1)).unwrap());
    let children = after.children.unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0], Descriptor::deleted("Face"));
}

#[test]
fn deep_nesting_is_bounded() {
    let mut scene = SceneModel::new();
    let depth = 5_000u64;
    scene.add_group(depth, "leaf", &[]).unwrap();
    for id in (1..depth).rev() {
        scene.add_group(id, "level", &[id + 1]).unwrap();
    }
    let reg = Registry::new();
    let mut d = reg.read_entity(&scene.entity(PersistentId(1)).unwrap());
    let mut levels = 0;
    while let Some(mut children) = d.children.take() {
        d = children.remove(0);
        levels += 1;
    }
    assert_eq!(levels, reg.opts().max_depth);
    assert_eq!(d.truncated, Some(true));
}

#[test]
fn deepest_readable_tree_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("deep.json");
    let mut scene = SceneModel::new();
    let depth = ReadOpts::MAX_DEPTH as u64 + 10;
    scene.add_group(depth, "leaf", &[]).unwrap();
    for id in (1..depth).rev() {
        scene.add_group(id, "level", &[id + 1]).unwrap();
    }
    scene.select(&[1]);
    let reg = Registry::new().with_opts(ReadOpts {
        max_depth: ReadOpts::MAX_DEPTH,
    });
    let out = reg.read_selection(scene.selection().unwrap());
    assert_eq!(out[0].tree_len(), ReadOpts::MAX_DEPTH + 1);
    objread_core::save(&out, &p).unwrap();
    assert_eq!(objread_core::load(&p).unwrap(), out);
}

#[test]
fn max_depth_is_clamped_to_loadable_nesting() {
    let reg = Registry::<objread_core::SceneEntity<'_>>::new().with_opts(ReadOpts {
        max_depth: 10_000,
    });
    assert_eq!(reg.opts().max_depth, ReadOpts::MAX_DEPTH);
}

#[test]
fn save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("hull.json");
    let scene = hull_scene();
    let reg = Registry::new();
    let out = reg.read_selection(scene.selection().unwrap());
    let n = objread_core::save(&out, &p).unwrap();
    assert!(n > 0);
    let back = objread_core::load(&p).unwrap();
    assert_eq!(back, out);

    // overwrite with an empty document
    objread_core::save(&[], &p).unwrap();
    assert_eq!(std::fs::read_to_string(&p).unwrap(), "[]\n");
}

#[test]
fn scene_file_drives_default_output() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("boat.json");
    std::fs::write(
        &p,
        r#"{"entities": [{"id": 1, "kind": "Edge", "faces": []}], "selection": [1, 1]}"#,
    )
    .unwrap();
    let scene = SceneModel::from_json_file(&p).unwrap();
    let out_path = objread_core::json_filename(scene.path.as_deref().unwrap());
    assert_eq!(out_path, dir.path().join("boat.objects.json"));
    let out = Registry::new().read_selection(scene.selection().unwrap());
    assert_eq!(out.len(), 2);
}
