//! Bank-cycle pace classification and the per-pace tuning table.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed chain-size ceiling that cell stages are measured against.
pub const CELL_STAGE_CEILING: usize = 8;

/// How long the current bank cycle is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum Pace {
    Mini,
    Short,
    Medium,
    Long,
    VeryLong,
}

/// Coarse early/late split of a count against a pace-dependent fraction of a ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum EngagementStage {
    Early,
    Late,
}

impl EngagementStage {
    /// `Late` once `count` exceeds `fraction * ceiling`.
    pub fn classify(fraction: f32, ceiling: f32, count: f32) -> Self {
        if count > fraction * ceiling {
            EngagementStage::Late
        } else {
            EngagementStage::Early
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PaceConfig {
    /// Local connection count at which an owned idle cell is worth fortifying.
    pub fortify_threshold: u8,
    /// Commit budget refill value. `None` uses the agent-wide default.
    #[cfg_attr(feature = "serde", serde(default))]
    pub commit_ceiling: Option<i32>,
    /// Fraction of the stage ceiling separating `Early` from `Late`.
    pub stage_fraction: f32,
}

impl PaceConfig {
    pub fn stage(&self, ceiling: usize, count: usize) -> EngagementStage {
        EngagementStage::classify(self.stage_fraction, ceiling as f32, count as f32)
    }

    pub fn commit_ceiling_or(&self, default: i32) -> i32 {
        self.commit_ceiling.unwrap_or(default)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PaceTable {
    /// Exclusive upper frame bounds for Mini, Short, Medium and Long.
    pub bounds: [u32; 4],
    pub mini: PaceConfig,
    pub short: PaceConfig,
    pub medium: PaceConfig,
    pub long: PaceConfig,
    pub very_long: PaceConfig,
}

impl Default for PaceTable {
    fn default() -> Self {
        Self {
            bounds: [100, 200, 300, 600],
            mini: PaceConfig {
                fortify_threshold: 5,
                commit_ceiling: Some(10),
                stage_fraction: 0.0,
            },
            short: PaceConfig {
                fortify_threshold: 4,
                commit_ceiling: Some(14),
                stage_fraction: 0.2,
            },
            medium: PaceConfig {
                fortify_threshold: 4,
                commit_ceiling: Some(18),
                stage_fraction: 0.3,
            },
            long: PaceConfig {
                fortify_threshold: 4,
                commit_ceiling: None,
                stage_fraction: 0.2,
            },
            very_long: PaceConfig {
                fortify_threshold: 4,
                commit_ceiling: None,
                stage_fraction: 0.2,
            },
        }
    }
}

impl PaceTable {
    pub fn classify(&self, frames: u32) -> Pace {
        let [mini, short, medium, long] = self.bounds;
        if frames < mini {
            Pace::Mini
        } else if frames < short {
            Pace::Short
        } else if frames < medium {
            Pace::Medium
        } else if frames < long {
            Pace::Long
        } else {
            Pace::VeryLong
        }
    }

    pub fn config(&self, pace: Pace) -> &PaceConfig {
        match pace {
            Pace::Mini => &self.mini,
            Pace::Short => &self.short,
            Pace::Medium => &self.medium,
            Pace::Long => &self.long,
            Pace::VeryLong => &self.very_long,
        }
    }
}
