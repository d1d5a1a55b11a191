//! modgraph-lib: module-build descriptors and their resolution
//!
//! This crate provides the types and rules a build orchestrator applies to
//! plugin modules:
//! - `ModuleDescriptor`: a validated, immutable declaration of one module
//! - `ModuleRegistry`: the registration phase of one build invocation
//! - `Resolution`: build order, effective per-module settings and the runtime
//!   lookup table for one host version

pub mod config;
pub mod consts;
pub mod descriptor;
pub mod discover;
pub mod graph;
pub mod registry;
pub mod resolve;
pub mod runtime;
pub mod util;
pub mod version;

pub use config::{ConfigError, ResolveConfig};
pub use descriptor::{DescriptorError, ModuleDecl, ModuleDescriptor, ValidateOptions};
pub use registry::{ModuleRegistry, RegistrationReport, RegistryError};
pub use resolve::{Resolution, ResolveError, ResolvedModule, resolve};
pub use runtime::{LookupError, ModuleHandle, RuntimeModuleTable};
pub use version::HostVersion;
