use modgraph_lib::consts::{HOST_VERSION_ENV, SKIP_PATH_CHECKS_ENV};
use modgraph_lib::descriptor::ValidateOptions;
use modgraph_lib::discover::discover;
use modgraph_lib::{DescriptorError, ModuleRegistry, RegistryError, ResolveConfig};
use serial_test::serial;

use super::common::{ModuleTree, engine_tree, v};

#[test]
fn duplicate_name_keeps_first_registration() {
  let tree = ModuleTree::new();
  let first = tree.module_at("First", "Core", &["Public"], "public_include_roots = [\"Public\"]\n");
  tree.module_at("Second", "Core", &[], "private_dependencies = [\"Engine\"]\n");

  let (registry, report) = tree.registry();
  assert_eq!(report.registered, vec!["Core"]);
  assert_eq!(
    report.failed,
    vec![DescriptorError::DuplicateModule {
      name: "Core".to_string()
    }]
  );

  let resolution = registry.resolve(&v("5.0")).unwrap();
  assert_eq!(resolution.build_order(), &["Core"]);
  assert_eq!(resolution.module("Core").unwrap().root, first);
}

#[test]
fn invalid_module_does_not_block_the_rest() {
  let tree = engine_tree();
  tree.module("Broken", &[], "private_dependencies = [\"Broken\"]\n");

  let (registry, report) = tree.registry();
  assert_eq!(report.failed.len(), 1);
  assert_eq!(report.failed[0].module(), "Broken");
  assert_eq!(registry.len(), 3);
  assert!(registry.resolve(&v("5.0")).is_ok());
}

#[test]
fn parallel_and_serial_validation_agree() {
  let tree = engine_tree();
  tree.module("Escapes", &[], "public_include_roots = [\"../Core/Public\"]\n");
  let decls = discover(tree.path()).unwrap().decls;

  let mut parallel = ModuleRegistry::new();
  let mut serial = ModuleRegistry::new();
  let a = parallel.register_decls(&decls, &ValidateOptions::default(), true);
  let b = serial.register_decls(&decls, &ValidateOptions::default(), false);

  assert_eq!(a.registered, b.registered);
  assert_eq!(a.failed, b.failed);
  assert!(matches!(a.failed[0], DescriptorError::InvalidIncludePath { .. }));
}

#[test]
#[serial]
fn config_from_env_drives_resolution() {
  let tree = ModuleTree::new();
  tree.module("Core", &[], "public_include_roots = [\"NotCreated\"]\n");
  let decls = discover(tree.path()).unwrap().decls;

  temp_env::with_vars(
    [(HOST_VERSION_ENV, Some("4.26.2")), (SKIP_PATH_CHECKS_ENV, Some("1"))],
    || {
      let config = ResolveConfig::from_env().unwrap();
      let mut registry = ModuleRegistry::new();
      let report = registry.register_decls(&decls, &config.validate_options(), config.parallel_validation);
      assert!(report.is_ok());

      let resolution = registry.resolve_with(&config).unwrap();
      assert_eq!(resolution.host_version(), v("4.26.2"));
    },
  );
}

#[test]
#[serial]
fn missing_host_version_is_a_config_error() {
  temp_env::with_vars([(HOST_VERSION_ENV, None::<&str>)], || {
    let config = ResolveConfig::from_env().unwrap();
    let err = ModuleRegistry::new().resolve_with(&config).unwrap_err();
    assert!(matches!(err, RegistryError::Config(_)));
  });
}
