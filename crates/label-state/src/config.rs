use anyhow::{anyhow, Result};
use directories::{BaseDirs, ProjectDirs};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use github_backend::client::DEFAULT_API_URL;
use label_state_core::{StateConfig, DEFAULT_PREFIX, DEFAULT_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const LOCAL_CONFIG_FILE_NAME: &str = ".label-state.toml";

/// Runtime configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Label prefix
    pub prefix: String,
    /// Separator between prefix, key and value
    pub separator: String,
    /// GitHub API base URL
    pub api_url: String,
    /// GitHub token
    pub token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
        }
    }
}

impl Config {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
        }

        for path in config_paths(config_path) {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        // Standard Actions variables first, so LABEL_STATE_* can override them
        figment = figment
            .merge(
                Env::raw()
                    .only(&["GITHUB_TOKEN", "GITHUB_API_URL"])
                    .map(|key| match key.as_str().to_ascii_lowercase().as_str() {
                        "github_token" => "token".into(),
                        "github_api_url" => "api_url".into(),
                        _ => key.into(),
                    }),
            )
            .merge(Env::prefixed("LABEL_STATE_"));

        figment
            .extract()
            .map_err(|e| anyhow!("Failed to load config: {}", e))
    }

    pub fn merge_with_cli(
        &mut self,
        prefix: Option<String>,
        separator: Option<String>,
        token: Option<String>,
        api_url: Option<String>,
    ) {
        if let Some(prefix) = prefix {
            self.prefix = prefix;
        }
        if let Some(separator) = separator {
            self.separator = separator;
        }
        if let Some(token) = token {
            self.token = Some(token);
        }
        if let Some(api_url) = api_url {
            self.api_url = api_url;
        }
    }

    /// Label grammar settings, rejecting an empty prefix or separator
    pub fn state_config(&self) -> Result<StateConfig> {
        Ok(StateConfig::new(&self.prefix, &self.separator)?)
    }

    /// The configured token, required for talking to GitHub
    pub fn require_token(&self) -> Result<&str> {
        match self.token.as_deref() {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(anyhow!(
                "GitHub token not configured. Set via --token, INPUT_GITHUB_TOKEN or GITHUB_TOKEN env var, or config file"
            )),
        }
    }
}

fn config_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
        return paths;
    }

    if let Some(path) = get_project_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_xdg_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_local_config_path() {
        push_unique(&mut paths, path);
    }

    paths
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}

fn get_project_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "label-state").map(|d| d.config_dir().join("config.toml"))
}

fn get_xdg_config_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(dir).join("label-state").join("config.toml"));
    }

    BaseDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(".config")
            .join("label-state")
            .join("config.toml")
    })
}

fn get_local_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join(LOCAL_CONFIG_FILE_NAME))
}
