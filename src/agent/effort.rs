//! Reasoning-effort classification.
//!
//! The tier is chosen by explicit override when one is given, otherwise by
//! case-insensitive substring matching against two ordered keyword lists.
//! `xhigh` triggers are always checked before `high` triggers, so a task that
//! mentions both a refactor and a review is never under-classified.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Coarse cost/depth dial for the external agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffortTier {
    Minimal,
    Low,
    Medium,
    High,
    Xhigh,
}

impl EffortTier {
    /// All tiers, cheapest first.
    pub const ALL: [EffortTier; 5] = [
        EffortTier::Minimal,
        EffortTier::Low,
        EffortTier::Medium,
        EffortTier::High,
        EffortTier::Xhigh,
    ];

    /// Parse a tier from its command-line spelling.
    ///
    /// `auto` is not a tier; callers treat it as "no override".
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "minimal" => Some(Self::Minimal),
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "xhigh" => Some(Self::Xhigh),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EffortTier::Minimal => "minimal",
            EffortTier::Low => "low",
            EffortTier::Medium => "medium",
            EffortTier::High => "high",
            EffortTier::Xhigh => "xhigh",
        }
    }
}

impl fmt::Display for EffortTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an effort tier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffortSource {
    /// Explicit `--effort` override.
    Cli,
    /// A trigger keyword matched the task text.
    AutoDetected,
    /// Nothing matched; the policy default applies.
    Default,
}

impl EffortSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffortSource::Cli => "cli",
            EffortSource::AutoDetected => "auto-detected",
            EffortSource::Default => "default",
        }
    }
}

impl fmt::Display for EffortSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The tier chosen for a run, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffortDecision {
    pub tier: EffortTier,
    pub source: EffortSource,
}

/// Keyword rules for automatic tier detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffortPolicy {
    /// Tier used when no trigger matches.
    #[serde(rename = "default")]
    pub default_tier: EffortTier,

    /// Keywords for large blast-radius tasks, checked first.
    pub xhigh_triggers: Vec<String>,

    /// Keywords for multi-file or review-heavy tasks.
    pub high_triggers: Vec<String>,
}

impl Default for EffortPolicy {
    fn default() -> Self {
        Self {
            default_tier: EffortTier::Medium,
            xhigh_triggers: default_xhigh_triggers(),
            high_triggers: default_high_triggers(),
        }
    }
}

impl EffortPolicy {
    /// Decide the effort tier for a task.
    ///
    /// An explicit override wins outright. Otherwise the first matching
    /// `xhigh` trigger, then the first matching `high` trigger, then the
    /// policy default.
    pub fn classify(&self, task: &str, explicit: Option<EffortTier>) -> EffortDecision {
        if let Some(tier) = explicit {
            return EffortDecision {
                tier,
                source: EffortSource::Cli,
            };
        }

        let task_lower = task.to_lowercase();

        if let Some(trigger) = first_match(&self.xhigh_triggers, &task_lower) {
            debug!(trigger, "xhigh trigger matched");
            return EffortDecision {
                tier: EffortTier::Xhigh,
                source: EffortSource::AutoDetected,
            };
        }

        if let Some(trigger) = first_match(&self.high_triggers, &task_lower) {
            debug!(trigger, "high trigger matched");
            return EffortDecision {
                tier: EffortTier::High,
                source: EffortSource::AutoDetected,
            };
        }

        EffortDecision {
            tier: self.default_tier,
            source: EffortSource::Default,
        }
    }

    /// Reject empty trigger strings, which would match every task.
    pub fn validate(&self) -> Result<(), String> {
        for (list, name) in [
            (&self.xhigh_triggers, "xhigh_triggers"),
            (&self.high_triggers, "high_triggers"),
        ] {
            if list.iter().any(|t| t.trim().is_empty()) {
                return Err(format!("effort.{} entries must be non-empty", name));
            }
        }
        Ok(())
    }
}

fn first_match<'a>(triggers: &'a [String], task_lower: &str) -> Option<&'a str> {
    triggers
        .iter()
        .find(|trigger| task_lower.contains(&trigger.to_lowercase()))
        .map(String::as_str)
}

fn default_xhigh_triggers() -> Vec<String> {
    [
        "大規模リファクタリング",
        "リファクタリング",
        "refactor",
        "refactoring",
        "アーキテクチャ変更",
        "アーキテクチャ再設計",
        "architecture",
        "マイグレーション",
        "migration",
        "移行",
        "全体設計",
        "システム再設計",
        "redesign",
        "システム刷新",
        "パフォーマンス最適化",
        "performance optimization",
        "セキュリティ監査",
        "security audit",
        "脆弱性診断",
        "大規模",
        "large-scale",
        "全面改修",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_high_triggers() -> Vec<String> {
    [
        "設計レビュー",
        "コードレビュー",
        "PRレビュー",
        "review",
        "複雑",
        "complex",
        "複数ファイル",
        "multi-file",
        "テスト追加",
        "テスト拡充",
        "カバレッジ向上",
        "API設計",
        "DB設計",
        "スキーマ変更",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
