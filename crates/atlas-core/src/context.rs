//! Agent context and handoff documents.
//!
//! Assembles the outputs of the scanner, the technology detector, and the
//! activity analyzer into one structure that renders as JSON (for agents)
//! or Markdown (for humans picking up a project). Activity insights are
//! rendered verbatim, in analyzer order.

use crate::activity::ActivityReport;
use crate::error::Result;
use crate::io::atomic_write;
use crate::types::{GitInfo, Project, ProjectKind, ProjectStatus, Technology};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;

/// Root-level files worth pointing an agent at, when present.
const IMPORTANT_FILES: &[&str] = &[
    "README.md",
    "package.json",
    "go.mod",
    "Cargo.toml",
    "requirements.txt",
    "Dockerfile",
    "docker-compose.yml",
    "Makefile",
    ".gitignore",
    ".env.example",
    "tsconfig.json",
];

// ---------------------------------------------------------------------------
// QuickStart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickStart {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub setup_commands: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,
}

impl QuickStart {
    /// Command table keyed on the detected project kind. Kinds without a
    /// well-known toolchain get an empty quick start.
    pub fn for_kind(kind: ProjectKind) -> QuickStart {
        let (setup, dev, test, build) = match kind {
            ProjectKind::NodeJs => ("npm install", "npm run dev", "npm test", "npm run build"),
            ProjectKind::Go => ("go mod download", "go run .", "go test ./...", "go build"),
            ProjectKind::Rust => ("cargo build", "cargo run", "cargo test", "cargo build --release"),
            ProjectKind::Python => (
                "pip install -r requirements.txt",
                "python main.py",
                "python -m pytest",
                "python -m build",
            ),
            _ => return QuickStart::default(),
        };
        QuickStart {
            setup_commands: vec![setup.to_string()],
            dev_command: Some(dev.to_string()),
            test_command: Some(test.to_string()),
            build_command: Some(build.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// AgentContext
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentContext {
    pub project_name: String,
    pub project_path: String,
    pub project_kind: ProjectKind,
    pub status: ProjectStatus,
    pub progress: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub technologies: Vec<Technology>,
    pub activity: ActivityReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<GitInfo>,
    pub quick_start: QuickStart,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub important_files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl AgentContext {
    /// Assemble a context document from a scanned project and its activity
    /// report. `progress` is taken from the report, not the stored record,
    /// so handoffs reflect the latest heuristic opinion.
    pub fn collect(
        project: &Project,
        report: &ActivityReport,
        technologies: Vec<Technology>,
    ) -> AgentContext {
        let kind = ProjectKind::detect(&project.path);
        AgentContext {
            project_name: project.name.clone(),
            project_path: project.path.to_string_lossy().into_owned(),
            project_kind: kind,
            status: project.status,
            progress: report.suggested_progress,
            technologies,
            activity: report.clone(),
            git: project.git.clone(),
            quick_start: QuickStart::for_kind(kind),
            important_files: important_files(&project.path),
            notes: project.notes.clone(),
            generated_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render the handoff document. Section order is fixed: header, quick
    /// start, technologies, important files, git, activity insights.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        let _ = writeln!(md, "# Project Context: {}\n", self.project_name);
        let _ = writeln!(
            md,
            "**Generated:** {}  ",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        );
        let _ = writeln!(md, "**Path:** `{}`  ", self.project_path);
        let _ = writeln!(md, "**Type:** {}  ", self.project_kind);
        let _ = writeln!(md, "**Status:** {}  ", self.status);
        let _ = writeln!(md, "**Progress:** {}%  ", self.progress);
        let _ = writeln!(md, "**Activity:** {}  \n", self.activity.level);

        if !self.quick_start.setup_commands.is_empty() || self.quick_start.dev_command.is_some() {
            md.push_str("## Quick Start\n\n");
            if !self.quick_start.setup_commands.is_empty() {
                md.push_str("**Setup:**\n```bash\n");
                for cmd in &self.quick_start.setup_commands {
                    let _ = writeln!(md, "{cmd}");
                }
                md.push_str("```\n\n");
            }
            if let Some(dev) = &self.quick_start.dev_command {
                let _ = writeln!(md, "**Development:** `{dev}`\n");
            }
            if let Some(test) = &self.quick_start.test_command {
                let _ = writeln!(md, "**Tests:** `{test}`\n");
            }
        }

        if !self.technologies.is_empty() {
            md.push_str("## Technologies\n\n");
            for tech in &self.technologies {
                match &tech.version {
                    Some(version) => {
                        let _ = writeln!(md, "- **{}** {} ({})", tech.name, version, tech.kind);
                    }
                    None => {
                        let _ = writeln!(md, "- **{}** ({})", tech.name, tech.kind);
                    }
                }
            }
            md.push('\n');
        }

        if !self.important_files.is_empty() {
            md.push_str("## Important Files\n\n");
            for file in &self.important_files {
                let _ = writeln!(md, "- `{file}`");
            }
            md.push('\n');
        }

        if let Some(git) = &self.git {
            md.push_str("## Git\n\n");
            if let Some(remote) = &git.remote {
                let _ = writeln!(md, "**Remote:** {remote}  ");
            }
            if let Some(branch) = &git.branch {
                let _ = writeln!(md, "**Branch:** {branch}  ");
            }
            md.push('\n');
        }

        md.push_str("## Activity Insights\n\n");
        let _ = writeln!(md, "Confidence: {:.2}\n", self.activity.confidence);
        for insight in &self.activity.insights {
            let _ = writeln!(md, "- {insight}");
        }

        md
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        atomic_write(path, self.to_json()?.as_bytes())
    }

    pub fn write_markdown(&self, path: &Path) -> Result<()> {
        atomic_write(path, self.to_markdown().as_bytes())
    }
}

fn important_files(root: &Path) -> Vec<String> {
    IMPORTANT_FILES
        .iter()
        .filter(|file| root.join(file).exists())
        .map(|file| file.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
