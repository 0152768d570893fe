// Copyright 2026 Sage Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;

use crate::query::SortOrder;

pub const SERVER_URL_ENV: &str = "SAGE_SERVER_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server_url: String,
    pub timeout_secs: u64,
    pub default_limit: usize,
    pub default_skip: usize,
    pub default_sort: String,
    pub max_cell_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:9000".to_string(),
            timeout_secs: 30,
            default_limit: 10,
            default_skip: 0,
            default_sort: "desc".to_string(),
            max_cell_width: 48,
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn sort_order(&self) -> SortOrder {
        SortOrder::parse(&self.default_sort).unwrap_or_default()
    }
}

/// Resolved settings for one invocation: file, then environment, then flags.
#[derive(Debug, Clone)]
pub struct ConfigCtx {
    pub path: Option<PathBuf>,
    pub config: Config,
}

impl ConfigCtx {
    pub fn load(server_override: Option<String>, timeout_override: Option<u64>) -> Result<Self> {
        let path = global_config_path();
        let mut config = match &path {
            Some(p) if p.exists() => read_config(p)?,
            _ => Config::default(),
        };
        if let Ok(url) = std::env::var(SERVER_URL_ENV)
            && !url.trim().is_empty()
        {
            config.server_url = url;
        }
        if let Some(url) = server_override {
            config.server_url = url;
        }
        if let Some(secs) = timeout_override {
            config.timeout_secs = secs;
        }
        Ok(Self { path, config })
    }
}

fn config_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return Some(PathBuf::from(appdata));
        }
        if let Ok(profile) = std::env::var("USERPROFILE") {
            return Some(PathBuf::from(profile).join("AppData").join("Roaming"));
        }
        return None;
    }

    if cfg!(target_os = "macos") {
        let home = std::env::var("HOME").ok()?;
        return Some(
            PathBuf::from(home)
                .join("Library")
                .join("Application Support"),
        );
    }

    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg));
    }
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".config"))
}

pub fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("sage").join("sage.toml"))
}

pub fn read_config(path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let mut config: Config = toml::from_str(&text).context("parse sage.toml")?;
    config.default_limit = config.default_limit.max(1);
    config.max_cell_width = config.max_cell_width.max(4);
    Ok(config)
}

pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let text = toml::to_string_pretty(config).context("serialize config")?;
    std::fs::write(path, text).with_context(|| format!("write {}", path.display()))
}
