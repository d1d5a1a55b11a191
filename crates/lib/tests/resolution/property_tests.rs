use std::collections::HashMap;

use modgraph_lib::ModuleDecl;
use modgraph_lib::util::hash::Hashable;
use proptest::prelude::*;

use super::common::{registry_of, v};

/// Random acyclic module sets. Module `i` may only depend on modules `j < i`;
/// names are shuffled so name order says nothing about dependency order.
fn acyclic_modules() -> impl Strategy<Value = Vec<ModuleDecl>> {
  (1usize..12)
    .prop_flat_map(|n| {
      (
        Just((0..n).collect::<Vec<usize>>()).prop_shuffle(),
        prop::collection::vec(prop::collection::vec(0u8..3, n), n),
      )
    })
    .prop_map(|(names, edges)| {
      let name = |i: usize| format!("M{:02}", names[i]);
      (0..names.len())
        .map(|i| {
          let mut decl = ModuleDecl::new(name(i));
          for (j, kind) in edges[i].iter().enumerate().take(i) {
            decl = match *kind {
              1 => decl.private_dep(name(j)),
              2 => decl.public_dep(name(j)),
              _ => decl,
            };
          }
          decl
        })
        .collect::<Vec<_>>()
    })
}

proptest! {
  #[test]
  fn build_order_respects_every_edge(decls in acyclic_modules()) {
    let resolution = registry_of(&decls).resolve(&v("5.0")).unwrap();
    let order = resolution.build_order();
    prop_assert_eq!(order.len(), decls.len());

    let position: HashMap<&str, usize> = order.iter().enumerate().map(|(i, n)| (n.as_str(), i)).collect();
    for decl in &decls {
      for dep in decl.public_dependencies.iter().chain(&decl.private_dependencies) {
        prop_assert!(position[dep.as_str()] < position[decl.name.as_str()]);
      }

      let module = resolution.module(&decl.name).unwrap();
      for dep in &module.link_dependencies {
        prop_assert!(position[dep.as_str()] < position[decl.name.as_str()]);
      }
    }
  }

  #[test]
  fn registration_order_does_not_matter(decls in acyclic_modules()) {
    let forward = registry_of(&decls).resolve(&v("5.0")).unwrap();

    let mut reversed = decls.clone();
    reversed.reverse();
    let backward = registry_of(&reversed).resolve(&v("5.0")).unwrap();

    prop_assert_eq!(forward.build_order(), backward.build_order());
    prop_assert_eq!(forward.fingerprint().unwrap(), backward.fingerprint().unwrap());
  }
}
