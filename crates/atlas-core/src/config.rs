use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ScanConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Directory names excluded from every walk: dependency caches and
    /// build output. Hidden entries are always excluded on top of these.
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,
    /// Extensions counted as source files by the test-coverage estimate.
    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,
    /// Files (or directories) whose presence marks a directory as a project.
    #[serde(default = "default_project_indicators")]
    pub project_indicators: Vec<String>,
}

fn default_skip_dirs() -> Vec<String> {
    [
        "node_modules",
        "vendor",
        "target",
        "build",
        "dist",
        "out",
        "__pycache__",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_source_extensions() -> Vec<String> {
    ["go", "js", "ts", "py", "rs", "java"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_project_indicators() -> Vec<String> {
    [
        "package.json",
        "requirements.txt",
        "go.mod",
        "Cargo.toml",
        "pom.xml",
        "build.gradle",
        ".git",
        "README.md",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            skip_dirs: default_skip_dirs(),
            source_extensions: default_source_extensions(),
            project_indicators: default_project_indicators(),
        }
    }
}

// ---------------------------------------------------------------------------
// ActivityConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityConfig {
    /// File modifications within this many days count as recent.
    #[serde(default = "default_recent_window_days")]
    pub recent_window_days: u32,
    /// Commits within this many days contribute to the progress estimate.
    #[serde(default = "default_commit_window_days")]
    pub commit_window_days: u32,
    /// Upper bound on each git subprocess query.
    #[serde(default = "default_git_timeout_secs")]
    pub git_timeout_secs: u64,
    /// Root-level files or directories indicating a buildable/deployable
    /// project.
    #[serde(default = "default_build_indicators")]
    pub build_indicators: Vec<String>,
}

fn default_recent_window_days() -> u32 {
    7
}

fn default_commit_window_days() -> u32 {
    14
}

fn default_git_timeout_secs() -> u64 {
    5
}

fn default_build_indicators() -> Vec<String> {
    [
        "dist",
        "build",
        "target",
        "bin",
        "out",
        "Dockerfile",
        "docker-compose.yml",
        "package-lock.json",
        "yarn.lock",
        "go.sum",
        "Cargo.lock",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            recent_window_days: default_recent_window_days(),
            commit_window_days: default_commit_window_days(),
            git_timeout_secs: default_git_timeout_secs(),
            build_indicators: default_build_indicators(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub activity: ActivityConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Load `path` if it exists, falling back to defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        Config::load(path)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
