//! Project discovery.
//!
//! Enumerates the direct subdirectories of a scan root and keeps the ones
//! that look like software projects. Only the scan root itself is allowed to
//! fail; an unreadable candidate is logged and skipped.

use crate::config::ScanConfig;
use crate::error::{AtlasError, Result};
use crate::types::{GitInfo, Project, ProjectStatus};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Longest description lifted from a README line.
const DESCRIPTION_MAX: usize = 200;

pub struct Scanner {
    root: PathBuf,
    config: ScanConfig,
}

impl Scanner {
    pub fn new(root: impl Into<PathBuf>, config: ScanConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Discover projects under the scan root.
    pub fn scan_projects(&self) -> Result<Vec<Project>> {
        let entries =
            std::fs::read_dir(&self.root).map_err(|source| AtlasError::ScanRootUnreadable {
                path: self.root.clone(),
                source,
            })?;

        let mut candidates: Vec<_> = entries.flatten().collect();
        candidates.sort_by_key(|e| e.file_name());

        let mut projects = Vec::new();
        for entry in candidates {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            let path = entry.path();
            if !is_project_directory(&path, &self.config.project_indicators) {
                continue;
            }
            tracing::debug!(project = %name, "analyzing project directory");
            match describe_project(&path, &name) {
                Ok(project) => projects.push(project),
                Err(err) => {
                    tracing::warn!(project = %name, %err, "failed to analyze project, skipping");
                }
            }
        }

        Ok(projects)
    }
}

/// A directory is a project when any configured indicator exists in it.
pub fn is_project_directory(path: &Path, indicators: &[String]) -> bool {
    indicators
        .iter()
        .any(|indicator| path.join(indicator).exists())
}

/// Deterministic project id: sha-256 of the path, truncated to 16 hex chars.
pub fn project_id(path: &Path) -> String {
    let digest = Sha256::digest(path.to_string_lossy().as_bytes());
    hex::encode(digest)[..16].to_string()
}

fn describe_project(path: &Path, name: &str) -> Result<Project> {
    let meta = std::fs::metadata(path)?;
    let created_at = meta
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());
    let now = Utc::now();

    Ok(Project {
        id: project_id(path),
        name: name.to_string(),
        path: path.to_path_buf(),
        description: extract_description(path),
        status: ProjectStatus::Active,
        progress: 0,
        created_at,
        updated_at: now,
        last_scanned_at: Some(now),
        git: read_git_info(path),
        notes: None,
    })
}

/// First README.md paragraph line that is neither a heading nor trivially
/// short, truncated to `DESCRIPTION_MAX` characters.
pub fn extract_description(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path.join("README.md")).ok()?;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.chars().count() > 10 {
            let truncated: String = line.chars().take(DESCRIPTION_MAX).collect();
            return Some(truncated);
        }
    }
    None
}

/// Remote and branch read straight from `.git/config` and `.git/HEAD`, no
/// subprocess involved. Returns `None` outside a repository.
pub fn read_git_info(path: &Path) -> Option<GitInfo> {
    let git_dir = path.join(".git");
    if !git_dir.exists() {
        return None;
    }

    let remote = std::fs::read_to_string(git_dir.join("config"))
        .ok()
        .and_then(|config| {
            config.lines().find_map(|line| {
                let line = line.trim();
                line.strip_prefix("url")
                    .and_then(|rest| rest.trim_start().strip_prefix('='))
                    .map(|url| url.trim().to_string())
            })
        })
        .filter(|url| !url.is_empty());

    let branch = std::fs::read_to_string(git_dir.join("HEAD"))
        .ok()
        .and_then(|head| {
            head.trim()
                .strip_prefix("ref: refs/heads/")
                .map(|b| b.to_string())
        })
        .filter(|b| !b.is_empty());

    Some(GitInfo { remote, branch })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanConfig;
    use tempfile::TempDir;

    fn indicators() -> Vec<String> {
        ScanConfig::default().project_indicators
    }

    #[test]
    fn indicator_table_marks_project_directories() {
        let cases: &[(&str, bool)] = &[
            ("package.json", true),
            ("requirements.txt", true),
            ("go.mod", true),
            ("Cargo.toml", true),
            ("random.txt", false),
        ];
        for (file, expected) in cases {
            let dir = TempDir::new().unwrap();
            std::fs::write(dir.path().join(file), "x").unwrap();
            assert_eq!(
                is_project_directory(dir.path(), &indicators()),
                *expected,
                "indicator {file}"
            );
        }
    }

    #[test]
    fn bare_git_repository_is_a_project() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        assert!(is_project_directory(dir.path(), &indicators()));
    }

    #[test]
    fn project_id_is_stable_and_short() {
        let a = project_id(Path::new("/home/user/projects/demo"));
        let b = project_id(Path::new("/home/user/projects/demo"));
        let c = project_id(Path::new("/home/user/projects/other"));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 16);
        assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn description_comes_from_first_real_readme_line() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("README.md"),
            "# demo\n\nshort\n\nA tracker for local development projects.\n",
        )
        .unwrap();
        assert_eq!(
            extract_description(dir.path()).as_deref(),
            Some("A tracker for local development projects.")
        );
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let dir = TempDir::new().unwrap();
        let line = "x".repeat(300);
        std::fs::write(dir.path().join("README.md"), format!("# t\n\n{line}\n")).unwrap();
        assert_eq!(extract_description(dir.path()).unwrap().len(), 200);
    }

    #[test]
    fn missing_readme_gives_no_description() {
        let dir = TempDir::new().unwrap();
        assert_eq!(extract_description(dir.path()), None);
    }

    #[test]
    fn git_info_parses_remote_and_branch() {
        let dir = TempDir::new().unwrap();
        let git_dir = dir.path().join(".git");
        std::fs::create_dir(&git_dir).unwrap();
        std::fs::write(
            git_dir.join("config"),
            "[core]\n\trepositoryformatversion = 0\n[remote \"origin\"]\n\turl = git@example.com:demo.git\n",
        )
        .unwrap();
        std::fs::write(git_dir.join("HEAD"), "ref: refs/heads/main\n").unwrap();

        let info = read_git_info(dir.path()).unwrap();
        assert_eq!(info.remote.as_deref(), Some("git@example.com:demo.git"));
        assert_eq!(info.branch.as_deref(), Some("main"));
    }

    #[test]
    fn git_info_tolerates_missing_config() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let info = read_git_info(dir.path()).unwrap();
        assert_eq!(info.remote, None);
        assert_eq!(info.branch, None);
    }

    #[test]
    fn scan_collects_projects_and_skips_noise() {
        let root = TempDir::new().unwrap();
        let demo = root.path().join("demo");
        std::fs::create_dir(&demo).unwrap();
        std::fs::write(demo.join("Cargo.toml"), "[package]\nname = \"demo\"\n").unwrap();
        std::fs::write(
            demo.join("README.md"),
            "# demo\n\nA tracker for local development projects.\n",
        )
        .unwrap();

        // Not projects: a loose file, a hidden directory, a plain directory.
        std::fs::write(root.path().join("notes.txt"), "x").unwrap();
        std::fs::create_dir(root.path().join(".cache")).unwrap();
        std::fs::create_dir(root.path().join("photos")).unwrap();

        let scanner = Scanner::new(root.path(), ScanConfig::default());
        let projects = scanner.scan_projects().unwrap();
        assert_eq!(projects.len(), 1);
        let project = &projects[0];
        assert_eq!(project.name, "demo");
        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(project.progress, 0);
        assert_eq!(project.id, project_id(&demo));
        assert_eq!(
            project.description.as_deref(),
            Some("A tracker for local development projects.")
        );
        assert!(project.git.is_none());
        assert!(project.last_scanned_at.is_some());
    }

    #[test]
    fn unreadable_scan_root_is_the_only_hard_error() {
        let dir = TempDir::new().unwrap();
        let scanner = Scanner::new(dir.path().join("missing"), ScanConfig::default());
        let err = scanner.scan_projects().unwrap_err();
        assert!(matches!(err, AtlasError::ScanRootUnreadable { .. }));
    }
}
