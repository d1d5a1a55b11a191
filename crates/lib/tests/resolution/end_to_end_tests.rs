use std::path::PathBuf;

use modgraph_lib::LookupError;
use modgraph_lib::util::hash::Hashable;

use super::common::{engine_tree, v};

#[test]
fn core_engine_editor_resolves_leaves_first() {
  let tree = engine_tree();
  let (registry, report) = tree.registry();
  assert!(report.is_ok(), "{:?}", report.failed);
  assert_eq!(report.registered, vec!["Core", "Editor", "Engine"]);

  let resolution = registry.resolve(&v("5.1")).unwrap();
  assert_eq!(resolution.build_order(), &["Core", "Engine", "Editor"]);

  let editor = resolution.module("Editor").unwrap();
  assert!(editor.public_dependencies.contains("Core"));
  assert_eq!(editor.link_dependencies, vec!["Core", "Engine"]);
}

#[test]
fn include_roots_follow_visibility() {
  let tree = engine_tree();
  let (registry, _) = tree.registry();
  let resolution = registry.resolve(&v("5.1")).unwrap();

  let root = |module: &str, dir: &str| -> PathBuf { tree.path().join(module).join(dir) };

  let engine = resolution.module("Engine").unwrap();
  assert_eq!(
    engine.include_roots,
    vec![root("Engine", "Public"), root("Engine", "Private"), root("Core", "Public")]
  );

  // Engine's private roots never leak to dependents.
  let editor = resolution.module("Editor").unwrap();
  assert_eq!(
    editor.include_roots,
    vec![root("Editor", "Public"), root("Core", "Public"), root("Engine", "Public")]
  );
}

#[test]
fn runtime_names_are_looked_up_lazily() {
  let tree = engine_tree();
  let (registry, _) = tree.registry();
  let resolution = registry.resolve(&v("5.1")).unwrap();

  let runtime = resolution.runtime();
  assert_eq!(runtime.len(), 1);
  assert_eq!(
    runtime.lookup("AssetRegistry"),
    Err(LookupError::NotFound {
      name: "AssetRegistry".to_string()
    })
  );
  assert!(runtime.requested_by("AssetRegistry").unwrap().contains("Editor"));
}

#[test]
fn runtime_lookup_finds_registered_module() {
  let tree = engine_tree();
  tree.module("AssetRegistry", &[], "private_dependencies = [\"Core\"]\n");
  let (registry, _) = tree.registry();
  let resolution = registry.resolve(&v("5.1")).unwrap();

  let handle = resolution.runtime().lookup("AssetRegistry").unwrap();
  assert_eq!(resolution.build_order()[handle.build_index], "AssetRegistry");
  assert_eq!(handle.root, tree.path().join("AssetRegistry"));
  assert_eq!(resolution.runtime().unresolved().count(), 0);
}

#[test]
fn identical_input_gives_identical_result() {
  let tree = engine_tree();
  let (first, _) = tree.registry();
  let (second, _) = tree.registry();

  let a = first.resolve(&v("5.1")).unwrap();
  let b = second.resolve(&v("5.1")).unwrap();
  assert_eq!(a, b);
  assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());

  let other_host = first.resolve(&v("4.27")).unwrap();
  assert_eq!(a.build_order(), other_host.build_order());
  assert_ne!(a.fingerprint().unwrap(), other_host.fingerprint().unwrap());
}

#[test]
fn resolution_serializes_to_json() {
  let tree = engine_tree();
  let (registry, _) = tree.registry();
  let resolution = registry.resolve(&v("5.1")).unwrap();

  let json = serde_json::to_value(&resolution).unwrap();
  assert_eq!(json["host_version"], "5.1.0");
  assert_eq!(json["build_order"][0], "Core");
  assert_eq!(json["modules"]["Editor"]["pch"], "explicit-or-shared");
  assert!(json["runtime"]["AssetRegistry"]["handle"].is_null());
}
