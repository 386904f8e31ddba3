use permalink::{PathOptions, PathOptionsPatch, UrlPrefix};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_ID_FIELD: &str = "id";

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub default: Option<Profile>,
    pub profiles: Option<HashMap<String, Profile>>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Profile {
    /// Postgres connection string.
    pub connection: Option<String>,
    /// JSON export of the collection, used instead of a database.
    pub records: Option<PathBuf>,
    /// Table holding the records.
    pub collection: Option<String>,
    pub id_field: Option<String>,
    pub title_field: Option<String>,
    pub parent_field: Option<String>,
    pub url_prefix: Option<UrlPrefix>,
    pub placeholder: Option<String>,
}

impl Profile {
    /// Merge another profile into this one (other takes priority for set fields).
    pub fn merge(&mut self, other: &Profile) {
        if other.connection.is_some() {
            self.connection = other.connection.clone();
        }
        if other.records.is_some() {
            self.records = other.records.clone();
        }
        if other.collection.is_some() {
            self.collection = other.collection.clone();
        }
        if other.id_field.is_some() {
            self.id_field = other.id_field.clone();
        }
        if other.title_field.is_some() {
            self.title_field = other.title_field.clone();
        }
        if other.parent_field.is_some() {
            self.parent_field = other.parent_field.clone();
        }
        if other.url_prefix.is_some() {
            self.url_prefix = other.url_prefix.clone();
        }
        if other.placeholder.is_some() {
            self.placeholder = other.placeholder.clone();
        }
    }

    /// Apply command-line overrides. A source given on the command line
    /// replaces a configured source of the other kind.
    pub fn apply_overrides(&mut self, overrides: &Profile) {
        match (&overrides.connection, &overrides.records) {
            (Some(_), None) => self.records = None,
            (None, Some(_)) => self.connection = None,
            _ => {}
        }
        self.merge(overrides);
    }

    pub fn id_field(&self) -> &str {
        self.id_field
            .as_deref()
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_ID_FIELD)
    }

    /// Permalink options described by this profile, defaults filled in.
    pub fn options(&self) -> PathOptions {
        PathOptions::from(PathOptionsPatch {
            title_field: self.title_field.clone(),
            parent_field: self.parent_field.clone(),
            url_prefix: self.url_prefix.clone(),
            slash_at_start: None,
            placeholder: self.placeholder.clone(),
        })
    }
}

/// Walk up from the current directory looking for `.permalink/config.toml`.
pub fn find_project_config() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let candidate = dir.join(".permalink").join("config.toml");
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// Global config path: `~/.config/permalink/config.toml`.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("permalink").join("config.toml"))
}

fn load_file(path: &Path) -> Result<Option<ConfigFile>, String> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let mut cfg: ConfigFile =
        toml::from_str(&content).map_err(|e| format!("invalid config {}: {e}", path.display()))?;

    // Relative record exports are relative to the directory holding `.permalink/`
    // (project) or the config directory itself (global).
    let base = match path.parent() {
        Some(dir) if dir.ends_with(".permalink") => dir.parent().unwrap_or(dir),
        Some(dir) => dir,
        None => Path::new("."),
    };
    if let Some(default) = cfg.default.as_mut() {
        anchor_records(default, base);
    }
    if let Some(profiles) = cfg.profiles.as_mut() {
        for profile in profiles.values_mut() {
            anchor_records(profile, base);
        }
    }
    Ok(Some(cfg))
}

fn anchor_records(profile: &mut Profile, base: &Path) {
    if let Some(records) = profile.records.as_mut() {
        if records.is_relative() {
            *records = base.join(&*records);
        }
    }
}

fn apply_file(result: &mut Profile, cfg: &ConfigFile, profile_name: &str) {
    if let Some(default) = &cfg.default {
        result.merge(default);
    }
    if profile_name != "default" {
        if let Some(named) = cfg.profiles.as_ref().and_then(|p| p.get(profile_name)) {
            result.merge(named);
        }
    }
}

/// Resolve a profile by name from explicit file locations: global defaults,
/// then the global named profile, then the same two from the project file.
pub fn load_config_from(
    global: Option<&Path>,
    project: Option<&Path>,
    profile_name: &str,
) -> Result<Profile, String> {
    let mut result = Profile::default();

    for path in [global, project].into_iter().flatten() {
        if let Some(cfg) = load_file(path)? {
            apply_file(&mut result, &cfg, profile_name);
        }
    }

    Ok(result)
}

/// Resolve a profile by name, merging global defaults → project defaults → named profile.
pub fn load_config(profile_name: &str) -> Result<Profile, String> {
    let global = global_config_path();
    let project = find_project_config();
    tracing::debug!(?global, ?project, profile = profile_name, "loading config");
    load_config_from(global.as_deref(), project.as_deref(), profile_name)
}
