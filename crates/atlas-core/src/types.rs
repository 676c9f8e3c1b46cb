use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ActivityLevel
// ---------------------------------------------------------------------------

/// Coarse classification of how recently and heavily a project's files have
/// changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Active,
    Moderate,
    Stale,
}

impl ActivityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Active => "active",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Stale => "stale",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActivityLevel {
    type Err = crate::error::AtlasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ActivityLevel::Active),
            "moderate" => Ok(ActivityLevel::Moderate),
            "stale" => Ok(ActivityLevel::Stale),
            _ => Err(crate::error::AtlasError::InvalidLevel(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ProjectStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Paused,
    Archived,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Paused => "paused",
            ProjectStatus::Archived => "archived",
            ProjectStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = crate::error::AtlasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ProjectStatus::Active),
            "paused" => Ok(ProjectStatus::Paused),
            "archived" => Ok(ProjectStatus::Archived),
            "completed" => Ok(ProjectStatus::Completed),
            _ => Err(crate::error::AtlasError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ProjectKind
// ---------------------------------------------------------------------------

/// Project ecosystem, detected from a marker file at the project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectKind {
    NodeJs,
    Go,
    Rust,
    Python,
    JavaMaven,
    JavaGradle,
    Cmake,
    Makefile,
    Php,
    Ruby,
    Unknown,
}

/// Marker files checked in order; the first match wins. `Makefile` comes
/// last since many ecosystems carry one alongside their own manifest.
pub const KIND_MARKERS: &[(&str, ProjectKind)] = &[
    ("package.json", ProjectKind::NodeJs),
    ("go.mod", ProjectKind::Go),
    ("Cargo.toml", ProjectKind::Rust),
    ("requirements.txt", ProjectKind::Python),
    ("pom.xml", ProjectKind::JavaMaven),
    ("build.gradle", ProjectKind::JavaGradle),
    ("CMakeLists.txt", ProjectKind::Cmake),
    ("composer.json", ProjectKind::Php),
    ("Gemfile", ProjectKind::Ruby),
    ("Makefile", ProjectKind::Makefile),
];

impl ProjectKind {
    pub fn detect(root: &Path) -> ProjectKind {
        for (marker, kind) in KIND_MARKERS {
            if root.join(marker).exists() {
                return *kind;
            }
        }
        ProjectKind::Unknown
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectKind::NodeJs => "node_js",
            ProjectKind::Go => "go",
            ProjectKind::Rust => "rust",
            ProjectKind::Python => "python",
            ProjectKind::JavaMaven => "java_maven",
            ProjectKind::JavaGradle => "java_gradle",
            ProjectKind::Cmake => "cmake",
            ProjectKind::Makefile => "makefile",
            ProjectKind::Php => "php",
            ProjectKind::Ruby => "ruby",
            ProjectKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GitInfo
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub progress: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_scanned_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<GitInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Technology
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechKind {
    Runtime,
    Framework,
    Dependency,
}

impl TechKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TechKind::Runtime => "runtime",
            TechKind::Framework => "framework",
            TechKind::Dependency => "dependency",
        }
    }
}

impl fmt::Display for TechKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A runtime, framework, or dependency detected from a project manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
    pub kind: TechKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub detected_from: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
