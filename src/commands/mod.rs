//! # CLI Command Implementations
//!
//! Each subcommand of the `auto-addons` tool lives in its own file, with an
//! `Args` struct derived using `clap` and an `execute` function that calls
//! into the `auto_addons` library.
//!
//! Settings flags shared by several commands are grouped in [`SettingsArgs`].

pub mod completions;
pub mod fetch;
pub mod parse;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use auto_addons::reference::Scheme;
use auto_addons::settings::Settings;

/// Settings overrides, applied on top of the optional settings file
#[derive(Args, Debug, Default, Clone)]
pub struct SettingsArgs {
    /// YAML settings file
    #[arg(long, value_name = "FILE", env = "AUTO_ADDONS_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Directory repositories are cloned into
    #[arg(long, value_name = "DIR", env = "AUTO_ADDONS_BASE_PATH")]
    pub base_path: Option<PathBuf>,

    /// Scheme for references that are not URLs (http, https, ssh)
    #[arg(long, value_name = "SCHEME", env = "AUTO_ADDONS_DEFAULT_SCHEME")]
    pub default_scheme: Option<String>,

    /// Hosting service for references that are not URLs
    #[arg(long, value_name = "HOST", env = "AUTO_ADDONS_DEFAULT_HOST")]
    pub default_host: Option<String>,

    /// Organization for bare repository names
    #[arg(long, value_name = "ORG", env = "AUTO_ADDONS_DEFAULT_ORGANIZATION")]
    pub default_organization: Option<String>,

    /// Name of the dependency declaration file
    #[arg(long, value_name = "NAME", env = "AUTO_ADDONS_DEPENDENCIES_FILE")]
    pub dependencies_file: Option<String>,

    /// Built-in addons directory, always placed last in addons_path
    #[arg(long, value_name = "DIR", env = "AUTO_ADDONS_BUILTIN_PATH")]
    pub builtin_addons_path: Option<PathBuf>,

    /// Odoo configuration file to rewrite
    #[arg(long, value_name = "FILE", env = "AUTO_ADDONS_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,
}

impl SettingsArgs {
    /// Loads the settings file (or the defaults) and applies the overrides.
    pub fn load(&self) -> Result<Settings> {
        let mut settings = match &self.settings {
            Some(path) => Settings::from_file(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => Settings::default(),
        };

        if let Some(base_path) = &self.base_path {
            settings.base_path = base_path.clone();
        }
        if let Some(scheme) = &self.default_scheme {
            settings.default_scheme = scheme.parse::<Scheme>()?;
        }
        if let Some(host) = &self.default_host {
            settings.default_host = host.clone();
        }
        if let Some(organization) = &self.default_organization {
            settings.default_organization = organization.clone();
        }
        if let Some(dependencies_file) = &self.dependencies_file {
            settings.dependencies_file = dependencies_file.clone();
        }
        if let Some(builtin_addons_path) = &self.builtin_addons_path {
            settings.builtin_addons_path = builtin_addons_path.clone();
        }
        if let Some(config_file) = &self.config_file {
            settings.config_file = config_file.clone();
        }

        settings.validate()?;
        Ok(settings)
    }
}
