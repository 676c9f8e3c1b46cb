//! Technology detection from project manifests.

use crate::types::{TechKind, Technology};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// npm packages reported as frameworks rather than plain dependencies.
const NODE_FRAMEWORKS: &[&str] = &[
    "next",
    "react",
    "vue",
    "@angular/core",
    "express",
    "nestjs",
    "svelte",
];

/// Plain dependencies reported per manifest, beyond frameworks.
const DEPENDENCY_LIMIT: usize = 10;

// BTreeMap keeps dependency order stable across runs.
#[derive(Debug, Default, Deserialize)]
struct PackageJson {
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
}

/// Detect runtimes, frameworks, and dependencies from the manifests present
/// at `root`. Unreadable or malformed manifests contribute nothing.
pub fn detect_technologies(root: &Path) -> Vec<Technology> {
    let mut techs = Vec::new();
    detect_node(root, &mut techs);
    detect_python(root, &mut techs);
    detect_go(root, &mut techs);
    detect_rust(root, &mut techs);
    techs
}

fn detect_node(root: &Path, techs: &mut Vec<Technology>) {
    let Ok(content) = std::fs::read_to_string(root.join("package.json")) else {
        return;
    };
    let Ok(pkg) = serde_json::from_str::<PackageJson>(&content) else {
        tracing::debug!(path = %root.display(), "malformed package.json, skipping");
        return;
    };

    techs.push(runtime("Node.js", "package.json"));

    for (name, version) in &pkg.dependencies {
        if NODE_FRAMEWORKS.contains(&name.as_str()) {
            techs.push(Technology {
                kind: TechKind::Framework,
                name: name.clone(),
                version: Some(trim_semver_prefix(version)),
                detected_from: "package.json".to_string(),
            });
        }
    }

    let mut plain = 0;
    for (name, version) in &pkg.dependencies {
        if NODE_FRAMEWORKS.contains(&name.as_str()) {
            continue;
        }
        if plain == DEPENDENCY_LIMIT {
            break;
        }
        techs.push(Technology {
            kind: TechKind::Dependency,
            name: name.clone(),
            version: Some(trim_semver_prefix(version)),
            detected_from: "package.json".to_string(),
        });
        plain += 1;
    }
}

fn detect_python(root: &Path, techs: &mut Vec<Technology>) {
    let Ok(content) = std::fs::read_to_string(root.join("requirements.txt")) else {
        return;
    };

    techs.push(runtime("Python", "requirements.txt"));

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (name, version) = match line.split_once("==") {
            Some((name, version)) => (name.trim(), Some(version.trim().to_string())),
            None => (line, None),
        };
        techs.push(Technology {
            kind: TechKind::Dependency,
            name: name.to_string(),
            version,
            detected_from: "requirements.txt".to_string(),
        });
    }
}

fn detect_go(root: &Path, techs: &mut Vec<Technology>) {
    let Ok(content) = std::fs::read_to_string(root.join("go.mod")) else {
        return;
    };

    let version = content.lines().find_map(|line| {
        line.trim()
            .strip_prefix("go ")
            .map(|v| v.trim().to_string())
    });
    techs.push(Technology {
        kind: TechKind::Runtime,
        name: "Go".to_string(),
        version,
        detected_from: "go.mod".to_string(),
    });
}

fn detect_rust(root: &Path, techs: &mut Vec<Technology>) {
    let Ok(content) = std::fs::read_to_string(root.join("Cargo.toml")) else {
        return;
    };

    let edition = content.lines().find_map(|line| {
        let line = line.trim();
        let rest = line.strip_prefix("edition")?.trim_start();
        let value = rest.strip_prefix('=')?.trim();
        Some(value.trim_matches('"').to_string())
    });
    techs.push(Technology {
        kind: TechKind::Runtime,
        name: "Rust".to_string(),
        version: edition,
        detected_from: "Cargo.toml".to_string(),
    });
}

fn runtime(name: &str, detected_from: &str) -> Technology {
    Technology {
        kind: TechKind::Runtime,
        name: name.to_string(),
        version: None,
        detected_from: detected_from.to_string(),
    }
}

fn trim_semver_prefix(version: &str) -> String {
    version.trim_start_matches(['^', '~']).to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn node_manifest_yields_runtime_frameworks_and_dependencies() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{
                "name": "demo",
                "dependencies": {
                    "react": "^18.2.0",
                    "lodash": "~4.17.21",
                    "axios": "1.6.0"
                }
            }"#,
        )
        .unwrap();

        let techs = detect_technologies(dir.path());
        assert_eq!(techs[0].name, "Node.js");
        assert_eq!(techs[0].kind, TechKind::Runtime);

        let react = techs.iter().find(|t| t.name == "react").unwrap();
        assert_eq!(react.kind, TechKind::Framework);
        assert_eq!(react.version.as_deref(), Some("18.2.0"));

        let lodash = techs.iter().find(|t| t.name == "lodash").unwrap();
        assert_eq!(lodash.kind, TechKind::Dependency);
        assert_eq!(lodash.version.as_deref(), Some("4.17.21"));
    }

    #[test]
    fn node_plain_dependencies_are_capped() {
        let dir = TempDir::new().unwrap();
        let deps: Vec<String> = (0..15).map(|i| format!("\"dep{i:02}\": \"1.0.0\"")).collect();
        std::fs::write(
            dir.path().join("package.json"),
            format!("{{\"dependencies\": {{{}}}}}", deps.join(", ")),
        )
        .unwrap();

        let techs = detect_technologies(dir.path());
        let plain = techs
            .iter()
            .filter(|t| t.kind == TechKind::Dependency)
            .count();
        assert_eq!(plain, DEPENDENCY_LIMIT);
    }

    #[test]
    fn malformed_package_json_contributes_nothing() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("package.json"), "{not json").unwrap();
        assert!(detect_technologies(dir.path()).is_empty());
    }

    #[test]
    fn python_requirements_parse_pins_and_bare_names() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("requirements.txt"),
            "# comment\nflask==3.0.0\nrequests\n\n",
        )
        .unwrap();

        let techs = detect_technologies(dir.path());
        assert_eq!(techs[0].name, "Python");
        let flask = techs.iter().find(|t| t.name == "flask").unwrap();
        assert_eq!(flask.version.as_deref(), Some("3.0.0"));
        let requests = techs.iter().find(|t| t.name == "requests").unwrap();
        assert_eq!(requests.version, None);
    }

    #[test]
    fn go_module_reports_language_version() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("go.mod"),
            "module example.com/demo\n\ngo 1.22\n",
        )
        .unwrap();

        let techs = detect_technologies(dir.path());
        assert_eq!(techs.len(), 1);
        assert_eq!(techs[0].name, "Go");
        assert_eq!(techs[0].version.as_deref(), Some("1.22"));
    }

    #[test]
    fn cargo_manifest_reports_edition() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("Cargo.toml"),
            "[package]\nname = \"demo\"\nedition = \"2021\"\n",
        )
        .unwrap();

        let techs = detect_technologies(dir.path());
        assert_eq!(techs.len(), 1);
        assert_eq!(techs[0].name, "Rust");
        assert_eq!(techs[0].version.as_deref(), Some("2021"));
    }

    #[test]
    fn empty_directory_detects_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(detect_technologies(dir.path()).is_empty());
    }
}
