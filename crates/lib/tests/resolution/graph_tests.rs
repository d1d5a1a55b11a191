use std::collections::BTreeSet;

use modgraph_lib::ModuleDecl;
use modgraph_lib::ResolveError;

use super::common::{registry_of, v};

fn names(items: &[&str]) -> BTreeSet<String> {
  items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn two_module_cycle_names_both() {
  let registry = registry_of(&[
    ModuleDecl::new("A").private_dep("B"),
    ModuleDecl::new("B").public_dep("A"),
  ]);

  let err = registry.resolve(&v("5.0")).unwrap_err();
  let ResolveError::CyclicDependency { cycles } = &err else {
    panic!("expected CyclicDependency, got {err:?}");
  };
  assert_eq!(cycles.len(), 1);
  assert_eq!(cycles[0].modules, names(&["A", "B"]));
  assert!(err.to_string().contains("A -> B -> A"));
}

#[test]
fn every_cycle_is_reported_at_once() {
  let registry = registry_of(&[
    ModuleDecl::new("A").private_dep("B"),
    ModuleDecl::new("B").private_dep("A"),
    ModuleDecl::new("Core"),
    ModuleDecl::new("X").private_dep("Y").private_dep("Core"),
    ModuleDecl::new("Y").private_dep("Z"),
    ModuleDecl::new("Z").private_dep("X"),
  ]);

  let err = registry.resolve(&v("5.0")).unwrap_err();
  let ResolveError::CyclicDependency { cycles } = &err else {
    panic!("expected CyclicDependency, got {err:?}");
  };
  assert_eq!(cycles.len(), 2);
  assert_eq!(err.modules(), names(&["A", "B", "X", "Y", "Z"]));
}

#[test]
fn runtime_and_include_path_cycles_are_allowed() {
  let registry = registry_of(&[
    ModuleDecl::new("Editor").private_dep("Core").runtime_dep("GraphEditor"),
    ModuleDecl::new("GraphEditor")
      .private_dep("Editor")
      .include_path_module("Editor"),
    ModuleDecl::new("Core").runtime_dep("Editor").include_path_module("GraphEditor"),
  ]);

  let resolution = registry.resolve(&v("5.0")).unwrap();
  assert_eq!(resolution.build_order(), &["Core", "Editor", "GraphEditor"]);
  assert_eq!(resolution.runtime().lookup("GraphEditor").unwrap().build_index, 2);
  assert_eq!(resolution.runtime().lookup("Editor").unwrap().build_index, 1);
}

#[test]
fn unresolved_names_list_every_referrer() {
  let registry = registry_of(&[
    ModuleDecl::new("Editor").private_dep("Slate").private_dep("Core"),
    ModuleDecl::new("Tools").public_dep("Slate"),
    ModuleDecl::new("Core").include_path_module("Renderer"),
  ]);

  let err = registry.resolve(&v("5.0")).unwrap_err();
  let ResolveError::UnresolvedDependency { missing } = &err else {
    panic!("expected UnresolvedDependency, got {err:?}");
  };
  assert_eq!(missing.len(), 2);
  assert_eq!(missing["Slate"], names(&["Editor", "Tools"]));
  assert_eq!(missing["Renderer"], names(&["Core"]));
}

#[test]
fn public_propagation_reaches_transitive_dependents() {
  // C depends on A, A publicly depends on B.
  let registry = registry_of(&[
    ModuleDecl::new("B").with_root("/src/B").public_include("Public"),
    ModuleDecl::new("A").with_root("/src/A").public_dep("B"),
    ModuleDecl::new("C").with_root("/src/C").private_dep("A"),
  ]);

  let resolution = registry.resolve(&v("5.0")).unwrap();
  let c = resolution.module("C").unwrap();
  assert!(c.include_roots.contains(&"/src/B/Public".into()));
  assert_eq!(c.link_dependencies, vec!["B", "A"]);
  assert!(!c.private_dependencies.contains("B"));
}
