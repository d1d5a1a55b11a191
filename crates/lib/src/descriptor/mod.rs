//! Module-build descriptors.
//!
//! A module is authored as a [`ModuleDecl`] (string-typed, as written in a
//! `<Name>.module.toml` file or built in code). Validation turns it into an
//! immutable [`ModuleDescriptor`]; selecting a host version turns that into an
//! [`EffectiveDescriptor`] with every active conditional region merged in.
//!
//! # Modules
//!
//! - [`decl`] - Authored declarations and their builders
//! - [`types`] - Validated descriptor types
//! - [`validate`] - Construction-time checks and [`DescriptorError`]
//! - [`select`] - Host-version selection and region merging

pub mod decl;
pub mod select;
mod types;
pub mod validate;

pub use decl::{BodyDecl, BranchDecl, ModuleDecl, RegionDecl};
pub use select::EffectiveDescriptor;
pub use types::*;
pub use validate::{DescriptorError, ValidateOptions};
