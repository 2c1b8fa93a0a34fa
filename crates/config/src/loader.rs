//! Layered loading.
//!
//! Later layers win:
//! 1. Built-in defaults ([`Settings::default()`])
//! 2. The configuration file: an explicit path, or `verbum.toml` in the
//!    platform configuration directory when present
//! 3. `API_KEY`, then `GEMINI_API_KEY`, as `genai.api_key`
//! 4. `VERBUM_` environment variables, `__` separating sections
//!    (`VERBUM_RETRY__INITIAL_DELAY_MS=1000`)

use crate::error::{ErrorKind, Result};
use crate::settings::{Settings, StorageSettings};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "VERBUM_";
pub const CONFIG_FILE_NAME: &str = "verbum.toml";
/// API key variables honored without the prefix, lowest priority first.
pub const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "verbum", "verbum")
}

/// Where the configuration file is looked for when none is given.
pub fn default_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Build the layered provider without extracting it.
pub fn figment(config_file: Option<&Path>) -> Result<Figment> {
    let mut figment = Figment::from(Serialized::defaults(Settings::default()));
    match config_file {
        Some(path) if !path.is_file() => exn::bail!(ErrorKind::MissingFile(path.to_path_buf())),
        Some(path) => figment = merge_file(figment, path),
        None => {
            if let Some(path) = default_config_file().filter(|path| path.is_file()) {
                figment = merge_file(figment, &path);
            }
        },
    }
    for var in API_KEY_VARS {
        figment = figment.merge(Env::raw().only(&[var]).map(|_| "genai.api_key".into()));
    }
    Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
}

fn merge_file(figment: Figment, path: &Path) -> Figment {
    tracing::debug!(path = %path.display(), "Reading configuration file");
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
        Some("json") => figment.merge(Json::file(path)),
        _ => figment.merge(Toml::file(path)),
    }
}

/// Load and validate settings.
pub fn load(config_file: Option<&Path>) -> Result<Settings> {
    let settings: Settings = figment(config_file)?.extract().or_raise(|| ErrorKind::Load)?;
    settings.validate()?;
    tracing::debug!(?settings, "Configuration loaded");
    Ok(settings)
}

impl StorageSettings {
    /// The configured store directory, or `store/` in the platform data directory.
    pub fn resolved_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        let Some(dirs) = project_dirs() else {
            exn::bail!(ErrorKind::NoDataDir);
        };
        Ok(dirs.data_dir().join("store"))
    }
}
