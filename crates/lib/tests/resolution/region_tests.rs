use std::collections::BTreeSet;

use modgraph_lib::descriptor::PchMode;
use modgraph_lib::DescriptorError;

use super::common::{ModuleTree, v};

const EDITOR: &str = r#"
pch = "shared"
private_dependencies = ["Core"]

[[regions]]
[[regions.branches]]
when = ">=4.20"
body = { private_dependencies = ["Slate"] }

[[regions]]
[[regions.branches]]
when = ">=4.24, <5"
body = { private_dependencies = ["ToolMenus"], pch = "none" }
[[regions.branches]]
when = ">=5"
body = { private_dependencies = ["ToolMenus", "StatusBar"] }
[[regions.branches]]
when = "otherwise"
body = { private_dependencies = ["LevelEditor"] }
"#;

fn tree() -> ModuleTree {
  let tree = ModuleTree::new();
  for name in ["Core", "Slate", "ToolMenus", "StatusBar", "LevelEditor"] {
    tree.module(name, &[], "");
  }
  tree.module("Editor", &[], EDITOR);
  tree
}

fn deps(items: &[&str]) -> BTreeSet<String> {
  items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn overlapping_regions_union_their_sets() {
  let tree = tree();
  let (registry, report) = tree.registry();
  assert!(report.is_ok(), "{:?}", report.failed);

  let resolution = registry.resolve(&v("4.25")).unwrap();
  let editor = resolution.module("Editor").unwrap();
  assert_eq!(editor.private_dependencies, deps(&["Core", "Slate", "ToolMenus"]));
  assert_eq!(editor.pch, PchMode::None);
}

#[test]
fn later_branch_selected_for_newer_host() {
  let tree = tree();
  let (registry, _) = tree.registry();

  let resolution = registry.resolve(&v("5.3.1")).unwrap();
  let editor = resolution.module("Editor").unwrap();
  assert_eq!(
    editor.private_dependencies,
    deps(&["Core", "Slate", "StatusBar", "ToolMenus"])
  );
  assert_eq!(editor.pch, PchMode::Shared);
}

#[test]
fn otherwise_applies_when_nothing_else_matches() {
  let tree = tree();
  let (registry, _) = tree.registry();

  let resolution = registry.resolve(&v("4.19")).unwrap();
  let editor = resolution.module("Editor").unwrap();
  assert_eq!(editor.private_dependencies, deps(&["Core", "LevelEditor"]));
}

#[test]
fn overlapping_branches_are_rejected() {
  let tree = ModuleTree::new();
  tree.module(
    "Editor",
    &[],
    r#"
[[regions]]
[[regions.branches]]
when = ">=4.20"
[[regions.branches]]
when = "=4.24"
"#,
  );

  let (registry, report) = tree.registry();
  assert!(registry.is_empty());
  assert_eq!(report.failed.len(), 1);
  match &report.failed[0] {
    DescriptorError::MalformedPredicate { module, field, .. } => {
      assert_eq!(module, "Editor");
      assert_eq!(field, "regions[0].branches[1].when");
    }
    other => panic!("expected MalformedPredicate, got {other:?}"),
  }
}

#[test]
fn partial_versions_partition_a_family() {
  let tree = ModuleTree::new();
  for name in ["Legacy", "Current", "Modern"] {
    tree.module(name, &[], "");
  }
  tree.module(
    "Editor",
    &[],
    r#"
[[regions]]
[[regions.branches]]
when = "<4.24"
body = { private_dependencies = ["Legacy"] }
[[regions.branches]]
when = "=4.24"
body = { private_dependencies = ["Current"] }
[[regions.branches]]
when = ">4.24"
body = { private_dependencies = ["Modern"] }
"#,
  );

  let (registry, report) = tree.registry();
  assert!(report.is_ok(), "{:?}", report.failed);

  for (host, expected) in [("4.23.9", "Legacy"), ("4.24.3", "Current"), ("4.25", "Modern")] {
    let resolution = registry.resolve(&v(host)).unwrap();
    let editor = resolution.module("Editor").unwrap();
    assert_eq!(editor.private_dependencies, deps(&[expected]), "host {host}");
  }
}

#[test]
fn missing_include_root_is_reported_with_field() {
  let tree = ModuleTree::new();
  tree.module(
    "Editor",
    &["Public"],
    r#"
public_include_roots = ["Public"]

[[regions]]
[[regions.branches]]
when = ">=5"
body = { private_include_roots = ["Private/Modern"] }
"#,
  );

  let (_, report) = tree.registry();
  match &report.failed[..] {
    [DescriptorError::InvalidIncludePath { module, field, .. }] => {
      assert_eq!(module, "Editor");
      assert_eq!(field, "regions[0].branches[0].body.private_include_roots");
    }
    other => panic!("expected one InvalidIncludePath, got {other:?}"),
  }
}
