/// File name suffix that marks a module descriptor (`<Name>.module.toml`).
pub const DESCRIPTOR_SUFFIX: &str = ".module.toml";

/// Length of the truncated resolution fingerprint.
pub const FINGERPRINT_LEN: usize = 20;

/// Environment variable holding the host version to resolve against.
pub const HOST_VERSION_ENV: &str = "MODGRAPH_HOST_VERSION";

/// Environment variable that disables include-root existence checks when set to a truthy value.
pub const SKIP_PATH_CHECKS_ENV: &str = "MODGRAPH_SKIP_PATH_CHECKS";
