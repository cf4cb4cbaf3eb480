//! # Auto Addons Library
//!
//! This library resolves the Git repositories an Odoo deployment needs and
//! assembles them into an `addons_path`. Repositories are declared one per
//! line, either on the command line or in an `oca_dependencies.txt` file,
//! following the OCA cross-repository dependency syntax. Every fetched
//! repository may declare further dependencies in its own
//! `oca_dependencies.txt`, which are followed recursively.
//!
//! ## Quick Example
//!
//! ```
//! use std::path::Path;
//! use auto_addons::reference::ReferenceParser;
//!
//! let parser = ReferenceParser::default();
//! let reference = parser
//!     .parse("connector_rename https://github.com/OCA/connector 8.0", None)
//!     .unwrap();
//!
//! assert_eq!(reference.local_folder, "connector_rename");
//! assert_eq!(reference.branch.as_deref(), Some("8.0"));
//! assert_eq!(reference.resolve_url(), "https://github.com/OCA/connector.git");
//! assert_eq!(
//!     reference.destination(Path::new("/opt/odoo/additional_addons/")),
//!     Path::new("/opt/odoo/additional_addons/connector_rename"),
//! );
//! ```
//!
//! ## Core Concepts
//!
//! - **References (`reference`)**: the line grammar and the canonical clone
//!   URL / destination derived from a parsed line.
//! - **Version control (`repository`, `git`)**: the `GitOperations` seam and
//!   its implementation on top of the system `git` command.
//! - **Traversal (`traversal`)**: the depth-first walk over dependency files,
//!   with the visited set, the clone retry ladder and the ordered path list.
//! - **Odoo configuration (`odoo_conf`)**: writes the resulting
//!   `addons_path` into the server configuration file.
//! - **Settings (`settings`, `defaults`)**: base directory, default hosting
//!   service and organization, file locations.
//!
//! ## Execution Flow
//!
//! 1.  Root references come from a single argument or from the dependency
//!     file at the base path.
//! 2.  Each reference is cloned (or pulled when already present), its
//!     checked-out branch is read back, and its dependency file is resolved
//!     with that branch as the inherited default.
//! 3.  The resolved paths, followed by Odoo's built-in addons directory, are
//!     written as `addons_path`.
//!
//! Failures concerning one reference are reported and skipped; a run always
//! produces the paths of every repository it could resolve.

pub mod defaults;
pub mod error;
pub mod git;
pub mod odoo_conf;
pub mod output;
pub mod reference;
pub mod repository;
pub mod settings;
pub mod traversal;

#[cfg(test)]
mod reference_proptest;
