//! Project activity heuristics.
//!
//! Combines filesystem recency, version-control activity, build artifacts,
//! and test coverage into an activity classification, a suggested completion
//! percentage, and a confidence score. The analysis is read-only and never
//! fails: an unreadable or absent root yields the stale zero-signal report.

use crate::config::Config;
use crate::types::ActivityLevel;
use crate::vcs::{repository_marker, GitCli, VcsProbe};
use crate::walk::walk_files;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, SystemTime};

const DAY: Duration = Duration::from_secs(86_400);

/// Filenames that count as a README when scoring confidence.
const README_NAMES: &[&str] = &["README.md", "README.rst", "README.txt", "README"];

// ---------------------------------------------------------------------------
// ActivityReport
// ---------------------------------------------------------------------------

/// Result of one activity analysis. Constructed fresh per call and never
/// mutated afterwards; callers own it outright.
///
/// `suggested_progress` is a heuristic opinion in `[0, 100]`, `confidence`
/// is clamped to `[0.0, 1.0]`, and `insights` is an ordered list of
/// human-readable strings rendered verbatim into generated documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityReport {
    pub level: ActivityLevel,
    pub suggested_progress: u32,
    pub confidence: f64,
    pub insights: Vec<String>,
}

/// Transient sample of recent file modifications under a project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileActivitySample {
    pub recent_file_count: usize,
    pub average_age: Duration,
}

// ---------------------------------------------------------------------------
// ActivityAnalyzer
// ---------------------------------------------------------------------------

pub struct ActivityAnalyzer {
    config: Config,
}

impl ActivityAnalyzer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Analyze `root` using the external git binary as the version-control
    /// probe.
    pub fn analyze(&self, root: &Path) -> ActivityReport {
        let probe = GitCli::new(
            root,
            Duration::from_secs(self.config.activity.git_timeout_secs),
        );
        self.analyze_with_probe(root, &probe)
    }

    /// Analyze `root` with an injected probe. Signals accumulate in a fixed
    /// order: file recency, commit activity, working-tree dirtiness, build
    /// artifacts, test coverage. The insight list follows the same order.
    pub fn analyze_with_probe(&self, root: &Path, probe: &dyn VcsProbe) -> ActivityReport {
        let mut insights = Vec::new();

        let sample = self.sample_file_activity(root);
        let (level, mut progress) = if sample.recent_file_count > 5 {
            insights.push("High file modification activity detected".to_string());
            (
                ActivityLevel::Active,
                (sample.recent_file_count as u32 * 10).min(50),
            )
        } else if sample.recent_file_count > 0 {
            insights.push("Moderate development activity".to_string());
            (
                ActivityLevel::Moderate,
                (sample.recent_file_count as u32 * 5).min(25),
            )
        } else {
            insights.push("No recent activity detected".to_string());
            (ActivityLevel::Stale, 0)
        };

        // Version-control signal only applies inside a repository; a missing
        // marker is not a failure, just zero contribution.
        if repository_marker(root) {
            let window = Duration::from_secs(u64::from(self.config.activity.commit_window_days) * 86_400);
            if let Some(count) = probe.commits_since(window) {
                if count > 0 {
                    bump(&mut progress, (count * 5).min(30));
                    let weeks = (self.config.activity.commit_window_days / 7).max(1);
                    insights.push(format!(
                        "Recent git activity: {count} commits in last {weeks} weeks"
                    ));
                }
            }
            if probe.has_uncommitted_changes() == Some(true) {
                bump(&mut progress, 10);
                insights.push("Uncommitted changes detected".to_string());
            }
        }

        if self.has_build_artifacts(root) {
            bump(&mut progress, 20);
            insights.push("Build artifacts detected - project may be deployable".to_string());
        }

        let coverage = self.estimate_test_coverage(root);
        if coverage > 0 {
            bump(&mut progress, coverage / 5);
            insights.push("Test coverage detected".to_string());
        }

        let confidence = self.score_confidence(root, &sample);

        ActivityReport {
            level,
            suggested_progress: progress,
            confidence,
            insights,
        }
    }

    /// Count regular files modified within the recency window and their mean
    /// age. Skip rules are shared with every other walk.
    fn sample_file_activity(&self, root: &Path) -> FileActivitySample {
        let window = Duration::from_secs(u64::from(self.config.activity.recent_window_days) * 86_400);
        let now = SystemTime::now();
        let mut count = 0usize;
        let mut total_age = Duration::ZERO;

        walk_files(root, &self.config.scan.skip_dirs, &mut |_path, meta| {
            let Ok(modified) = meta.modified() else {
                return;
            };
            // Clock skew can put mtimes in the future; treat those as brand new.
            let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
            if age <= window {
                count += 1;
                total_age += age;
            }
        });

        let average_age = if count > 0 {
            total_age / count as u32
        } else {
            Duration::ZERO
        };
        FileActivitySample {
            recent_file_count: count,
            average_age,
        }
    }

    fn has_build_artifacts(&self, root: &Path) -> bool {
        self.config
            .activity
            .build_indicators
            .iter()
            .any(|indicator| root.join(indicator).exists())
    }

    /// Share of source files whose name contains "test", as an integer
    /// percentage. Zero when no source files are found.
    fn estimate_test_coverage(&self, root: &Path) -> u32 {
        let mut source_files = 0u32;
        let mut test_files = 0u32;
        let extensions = &self.config.scan.source_extensions;

        walk_files(root, &self.config.scan.skip_dirs, &mut |path, _meta| {
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                return;
            };
            if !extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
                return;
            }
            source_files += 1;
            let is_test = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.to_ascii_lowercase().contains("test"));
            if is_test {
                test_files += 1;
            }
        });

        if source_files > 0 {
            test_files * 100 / source_files
        } else {
            0
        }
    }

    /// Confidence starts at 0.5 and grows with data availability. The age
    /// bonus only applies when recent files exist, so an empty directory
    /// stays at the baseline.
    fn score_confidence(&self, root: &Path, sample: &FileActivitySample) -> f64 {
        let mut confidence: f64 = 0.5;
        if sample.recent_file_count > 0 {
            confidence += 0.2;
            if sample.average_age < DAY {
                confidence += 0.2;
            } else if sample.average_age < 7 * DAY {
                confidence += 0.1;
            }
        }
        if README_NAMES.iter().any(|name| root.join(name).is_file()) {
            confidence += 0.1;
        }
        confidence.min(1.0)
    }
}

/// Add `boost` to `progress`, clamping to 100. Applied after every additive
/// step so no intermediate value can leave the contract range.
fn bump(progress: &mut u32, boost: u32) {
    *progress = (*progress + boost).min(100);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
