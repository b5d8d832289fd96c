use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub defaults: Defaults,
}

/// File-provided defaults. They backfill absent CLI flags before resolution;
/// the resolver itself never reads config files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Defaults {
    pub model: Option<String>,
    pub provider: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct ConfigFile {
    pub defaults: Option<Defaults>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_with_profile(None)
    }

    pub fn load_with_profile(profile: Option<&str>) -> Result<Self> {
        let mut config = Config::default();
        for path in default_config_paths(profile) {
            if path.exists() {
                let file = load_config_file(&path)?;
                config.merge(file);
            }
        }
        Ok(config)
    }

    fn merge(&mut self, other: ConfigFile) {
        if let Some(defaults) = other.defaults {
            merge_defaults(&mut self.defaults, defaults);
        }
    }
}

/// Config paths that exist on disk, in merge order.
pub fn existing_config_paths(profile: Option<&str>) -> Vec<PathBuf> {
    default_config_paths(profile)
        .into_iter()
        .filter(|path| path.exists())
        .collect()
}

fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let parsed: ConfigFile =
        toml::from_str(&content).with_context(|| format!("parse config {}", path.display()))?;
    Ok(parsed)
}

fn default_config_paths(profile: Option<&str>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(home) = home_dir() {
        paths.push(home.join(".sochen/config.toml"));
        paths.push(home.join(".config/sochen/config.toml"));
    }
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        paths.push(PathBuf::from(xdg).join("sochen/config.toml"));
    }
    paths.push(PathBuf::from("./sochen.toml"));

    if let Ok(custom) = env::var("SOCHEN_CONFIG_PATH") {
        paths.push(PathBuf::from(custom));
    }

    if let Some(name) = profile {
        if let Some(home) = home_dir() {
            paths.push(home.join(".sochen/profiles").join(format!("{name}.toml")));
            paths.push(
                home.join(".config/sochen/profiles")
                    .join(format!("{name}.toml")),
            );
        }
        paths.push(PathBuf::from(format!("./sochen.{name}.toml")));
    }
    paths
}

fn merge_defaults(target: &mut Defaults, other: Defaults) {
    if other.model.is_some() {
        target.model = other.model;
    }
    if other.provider.is_some() {
        target.provider = other.provider;
    }
    if other.base_url.is_some() {
        target.base_url = other.base_url;
    }
}

fn home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        return Some(PathBuf::from(home));
    }
    if let Ok(profile) = env::var("USERPROFILE") {
        return Some(PathBuf::from(profile));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn later_file_wins_per_field() {
        let mut config = Config::default();
        config.merge(
            toml::from_str(
                r#"
                [defaults]
                model = "gpt-5-mini"
                "#,
            )
            .unwrap(),
        );
        config.merge(
            toml::from_str(
                r#"
                [defaults]
                model = "claude-3-opus"
                provider = "anthropic"
                "#,
            )
            .unwrap(),
        );
        assert_eq!(config.defaults.model.as_deref(), Some("claude-3-opus"));
        assert_eq!(config.defaults.provider.as_deref(), Some("anthropic"));
        assert!(config.defaults.base_url.is_none());
    }

    #[test]
    fn missing_sections_leave_defaults_untouched() {
        let mut config = Config::default();
        config.merge(toml::from_str("").unwrap());
        assert!(config.defaults.model.is_none());
        assert!(config.defaults.provider.is_none());
    }

    #[test]
    #[serial]
    fn loads_from_explicit_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sochen.toml");
        fs::write(
            &path,
            r#"
            [defaults]
            provider = "openai"
            base_url = "https://proxy.internal/v1"
            "#,
        )
        .unwrap();

        let old_home = env::var("HOME").ok();
        let old_custom = env::var("SOCHEN_CONFIG_PATH").ok();
        let old_xdg = env::var("XDG_CONFIG_HOME").ok();
        env::set_var("HOME", dir.path());
        env::set_var("SOCHEN_CONFIG_PATH", &path);
        env::remove_var("XDG_CONFIG_HOME");

        let config = Config::load().unwrap();
        assert_eq!(config.defaults.provider.as_deref(), Some("openai"));
        assert_eq!(
            config.defaults.base_url.as_deref(),
            Some("https://proxy.internal/v1")
        );
        assert!(existing_config_paths(None).contains(&path));

        match old_home {
            Some(value) => env::set_var("HOME", value),
            None => env::remove_var("HOME"),
        }
        match old_custom {
            Some(value) => env::set_var("SOCHEN_CONFIG_PATH", value),
            None => env::remove_var("SOCHEN_CONFIG_PATH"),
        }
        match old_xdg {
            Some(value) => env::set_var("XDG_CONFIG_HOME", value),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }
    }
}
