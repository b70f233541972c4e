use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::mutants::PlanOutcome;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub run_id: String,
    pub total: usize,
    pub killed: usize,
    pub survived: usize,
    pub unreported: usize,
    pub inspected: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub results: Vec<PlanResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResult {
    pub index: usize,
    pub file: String,
    pub line: usize,
    pub operator: String,
    pub original: String,
    pub outcome: PlanOutcome,
}

impl CampaignSummary {
    pub fn new(run_id: impl Into<String>) -> Self {
        CampaignSummary {
            run_id: run_id.into(),
            ..Default::default()
        }
    }

    pub fn push(&mut self, result: PlanResult) {
        self.total += 1;
        match result.outcome {
            PlanOutcome::Killed { .. } => self.killed += 1,
            PlanOutcome::Survived => self.survived += 1,
            PlanOutcome::Unreported { .. } => self.unreported += 1,
            PlanOutcome::Inspected { .. } => self.inspected += 1,
            PlanOutcome::Skipped { .. } => self.skipped += 1,
        }
        self.results.push(result);
    }

    /// Mutants that went through a test run.
    pub fn tested(&self) -> usize {
        self.killed + self.survived + self.unreported
    }

    /// Kill ratio over tested mutants. Unreported runs count as survivors.
    pub fn score(&self) -> f64 {
        let tested = self.tested();
        if tested > 0 {
            self.killed as f64 / tested as f64
        } else {
            1.0
        }
    }

    pub fn survivors(&self) -> impl Iterator<Item = &PlanResult> {
        self.results.iter().filter(|r| {
            matches!(
                r.outcome,
                PlanOutcome::Survived | PlanOutcome::Unreported { .. }
            )
        })
    }

    pub fn has_survivors(&self) -> bool {
        self.survived + self.unreported > 0
    }
}

pub fn save_to_path(summary: &CampaignSummary, path: &Path) -> Result<()> {
    let json = serde_json::to_string(summary)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_from_path(path: &Path) -> Option<CampaignSummary> {
    let data = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&data).ok()
}
