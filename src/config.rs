use std::path::PathBuf;

use crate::executor::Mode;

pub const DEFAULT_PLAN_FILE: &str = "plans/plans.json";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_REPORT_PATH: &str = "target/mochawesome-report/mochawesome.json";
pub const DEFAULT_TEST_CMD: &str = "cd target && yarn build; npm run test_special";
pub const DEFAULT_STATE_FILE: &str = ".mutator-state.json";

/// Everything a campaign needs besides the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignConfig {
    pub plan_file: PathBuf,
    pub log_dir: PathBuf,
    /// Relative paths resolve against `working_dir`.
    pub report_path: PathBuf,
    pub test_cmd: String,
    pub working_dir: PathBuf,
    pub state_file: PathBuf,
    pub debug: bool,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        CampaignConfig {
            plan_file: PathBuf::from(DEFAULT_PLAN_FILE),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            test_cmd: DEFAULT_TEST_CMD.to_string(),
            working_dir: PathBuf::from("."),
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            debug: false,
        }
    }
}

impl CampaignConfig {
    pub fn mode(&self) -> Mode {
        if self.debug { Mode::Debug } else { Mode::Test }
    }

    pub fn resolved_report_path(&self) -> PathBuf {
        if self.report_path.is_absolute() {
            self.report_path.clone()
        } else {
            self.working_dir.join(&self.report_path)
        }
    }

    pub fn harness(&self) -> crate::runner::CommandHarness {
        crate::runner::CommandHarness::new(
            self.test_cmd.clone(),
            self.working_dir.clone(),
            self.resolved_report_path(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_report_path_follows_working_dir() {
        let config = CampaignConfig {
            working_dir: PathBuf::from("/work"),
            ..Default::default()
        };
        assert_eq!(
            config.resolved_report_path(),
            PathBuf::from("/work/target/mochawesome-report/mochawesome.json")
        );
        assert_eq!(config.mode(), Mode::Test);
    }
}
