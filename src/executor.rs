//! Sequential campaign over a plan list.
//!
//! Only one file is open at a time. Its baseline is read once when the
//! campaign reaches its first plan, each plan writes a mutant over it, and
//! the baseline is written back after every plan and again when the file is
//! closed. A restore failure stops the campaign: continuing would leave two
//! files mutated at once.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, warn};

use crate::error::{MutationError, Result};
use crate::mutants::{self, MutationRecord, PlanOutcome, ResultLog, SkipReason};
use crate::operators::Catalog;
use crate::planner::MutationPlan;
use crate::runner::{self, HarnessRun, TestHarness};
use crate::safety;
use crate::state::{CampaignSummary, PlanResult};
use crate::syntax;
use crate::Dialect;

type Step<T> = std::result::Result<T, SkipReason>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Run the test harness against every mutant.
    Test,
    /// Save every mutant to the log directory without running tests.
    Debug,
}

/// A file currently owned by the executor, with its baseline content.
#[derive(Debug)]
pub struct OpenSource {
    path: PathBuf,
    baseline: String,
    dialect: Dialect,
    dirty: bool,
}

impl OpenSource {
    pub fn open(path: &Path) -> Step<Self> {
        let dialect = crate::detect_dialect(path).ok_or(SkipReason::UnsupportedFile)?;
        let baseline =
            std::fs::read_to_string(path).map_err(|e| SkipReason::Unreadable(e.to_string()))?;
        safety::write_backup(path, &baseline).map_err(|e| SkipReason::WriteFailed(e.to_string()))?;
        Ok(OpenSource {
            path: path.to_path_buf(),
            baseline,
            dialect,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn write(&mut self, text: &str) -> std::io::Result<()> {
        // A partial write still leaves the file changed.
        self.dirty = true;
        std::fs::write(&self.path, text)
    }

    pub fn restore(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        std::fs::write(&self.path, &self.baseline).map_err(|source| MutationError::Restore {
            path: self.path.clone(),
            source,
        })?;
        self.dirty = false;
        Ok(())
    }

    pub fn close(mut self) -> Result<()> {
        self.restore()?;
        if let Err(e) = safety::remove_backup(&self.path) {
            warn!(file = %self.path.display(), error = %e, "failed to remove backup");
        }
        Ok(())
    }
}

impl Drop for OpenSource {
    fn drop(&mut self) {
        if !self.dirty {
            return;
        }
        match std::fs::write(&self.path, &self.baseline) {
            Ok(()) => {
                self.dirty = false;
                let _ = safety::remove_backup(&self.path);
            }
            Err(e) => warn!(
                file = %self.path.display(),
                error = %e,
                "failed to restore on drop; backup left in place"
            ),
        }
    }
}

pub struct Executor<'c, H> {
    catalog: &'c Catalog,
    harness: H,
    log: ResultLog,
    mode: Mode,
    open: Option<OpenSource>,
}

impl<'c, H: TestHarness> Executor<'c, H> {
    pub fn new(catalog: &'c Catalog, harness: H, log: ResultLog) -> Self {
        Executor {
            catalog,
            harness,
            log,
            mode: Mode::Test,
            open: None,
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Process every plan in order. Per-plan failures become
    /// [`PlanOutcome::Skipped`]; only a failed restore returns an error.
    pub fn run(&mut self, plans: &[MutationPlan]) -> Result<CampaignSummary> {
        let started = Instant::now();
        let mut summary = CampaignSummary::new(new_run_id());

        for (index, plan) in plans.iter().enumerate() {
            let operator = self
                .catalog
                .get(plan.mutator_index)
                .map_or("unknown", |op| op.name);

            let outcome = match self.switch_to(plan.filepath.as_std_path())? {
                Ok(()) => {
                    let outcome = self
                        .execute(plan)
                        .unwrap_or_else(|reason| PlanOutcome::Skipped { reason });
                    self.restore_open()?;
                    outcome
                }
                Err(reason) => PlanOutcome::Skipped { reason },
            };

            match &outcome {
                PlanOutcome::Skipped { reason } => warn!(
                    file = %plan.filepath,
                    line = plan.apx_line,
                    operator,
                    %reason,
                    "plan skipped"
                ),
                PlanOutcome::Unreported { detail } => warn!(
                    file = %plan.filepath,
                    line = plan.apx_line,
                    operator,
                    detail = %detail,
                    "no test report; counting as zero failures"
                ),
                other => debug!(
                    file = %plan.filepath,
                    line = plan.apx_line,
                    operator,
                    outcome = ?other,
                    "plan finished"
                ),
            }

            summary.push(PlanResult {
                index,
                file: plan.filepath.to_string(),
                line: plan.apx_line,
                operator: operator.to_string(),
                original: plan.text.clone(),
                outcome,
            });
        }

        self.close()?;
        summary.duration_ms = started.elapsed().as_millis() as u64;
        Ok(summary)
    }

    /// Restore and close the open file if it is not `path`, then open `path`.
    fn switch_to(&mut self, path: &Path) -> Result<Step<()>> {
        if self.open.as_ref().is_some_and(|open| open.path() == path) {
            return Ok(Ok(()));
        }
        self.close()?;
        match OpenSource::open(path) {
            Ok(open) => {
                debug!(file = %path.display(), "opened source");
                self.open = Some(open);
                Ok(Ok(()))
            }
            Err(reason) => Ok(Err(reason)),
        }
    }

    fn restore_open(&mut self) -> Result<()> {
        match self.open.as_mut() {
            Some(open) => open.restore(),
            None => Ok(()),
        }
    }

    /// Restore the open file and release it.
    pub fn close(&mut self) -> Result<()> {
        match self.open.take() {
            Some(open) => open.close(),
            None => Ok(()),
        }
    }

    fn execute(&mut self, plan: &MutationPlan) -> Step<PlanOutcome> {
        let operator = self
            .catalog
            .get(plan.mutator_index)
            .ok_or(SkipReason::UnknownOperator(plan.mutator_index))?;
        let Some(open) = self.open.as_mut() else {
            return Err(SkipReason::Unreadable("no open source".to_string()));
        };

        let mutated = mutate_source(self.catalog, &open.baseline, open.dialect, plan)?;
        debug!(diff = %runner::generate_diff(&open.baseline, &mutated), "writing mutant");
        open.write(&mutated)
            .map_err(|e| SkipReason::WriteFailed(e.to_string()))?;

        if self.mode == Mode::Debug {
            let path = self
                .log
                .save_mutant(&open.path, plan.apx_line, operator.name)
                .map_err(|e| SkipReason::WriteFailed(e.to_string()))?;
            return Ok(PlanOutcome::Inspected { path });
        }

        let result = match self.harness.run_tests() {
            HarnessRun::Report(report) => report.run_result(),
            HarnessRun::Missing => {
                return Ok(PlanOutcome::Unreported {
                    detail: "no report written".to_string(),
                });
            }
            HarnessRun::Unreadable(detail) => return Ok(PlanOutcome::Unreported { detail }),
        };

        if !result.is_killed() {
            return Ok(PlanOutcome::Survived);
        }

        let record = MutationRecord {
            filename: mutants::file_name(&open.path),
            filepath: plan.filepath.to_string(),
            apx_line: plan.apx_line,
            mutator: operator.name.to_string(),
            original_text: plan.text.clone(),
            failures: result.failing.clone(),
        };
        if let Err(e) = self.log.write(&record) {
            warn!(file = %plan.filepath, error = %e, "failed to write mutation record");
        }
        Ok(PlanOutcome::Killed {
            failures: result.failing,
        })
    }
}

/// Apply `plan` to `baseline` and print the mutated source.
///
/// The target is the node at `plan.start` whose guard holds for the plan's
/// operator. When several nodes start there, the one whose text equals the
/// planned snippet wins, otherwise the first in walk order.
pub fn mutate_source(
    catalog: &Catalog,
    baseline: &str,
    dialect: Dialect,
    plan: &MutationPlan,
) -> Step<String> {
    let operator = catalog
        .get(plan.mutator_index)
        .ok_or(SkipReason::UnknownOperator(plan.mutator_index))?;
    let root = syntax::parse(baseline, dialect).map_err(|e| SkipReason::Parse(e.to_string()))?;

    let mut matched = false;
    let mut exact = None;
    let mut fallback = None;
    root.walk(|node| {
        if exact.is_some() || node.start() != plan.start || !operator.matches(node) {
            return;
        }
        matched = true;
        if let Some(replacement) = operator.apply(node) {
            if node.text() == plan.text {
                exact = Some((node.node(), replacement));
            } else if fallback.is_none() {
                fallback = Some((node.node(), replacement));
            }
        }
    });

    let (target, replacement) = exact.or(fallback).ok_or(if matched {
        SkipReason::RewriteUnavailable
    } else {
        SkipReason::NodeNotFound(plan.start)
    })?;
    Ok(root.print_replacing(target, &replacement))
}

fn new_run_id() -> String {
    format!("{:08x}", fastrand::u32(..))
}
