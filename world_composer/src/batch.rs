//! Batch driver over numbered static/dynamic world pairs

use tracing::{error, info, warn};

use crate::compose::{compose_files, MergeSummary};
use crate::config::{ComposerConfig, ErrorPolicy};
use crate::error::{ComposeError, ComposeResult};

/// Result of a batch run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Number of indices in the run
    pub total: u32,
    /// Pairs merged and written
    pub succeeded: u32,
    /// Indices skipped because an input file was missing
    pub skipped: Vec<u32>,
    /// Indices whose merge failed, with the error message
    pub failed: Vec<(u32, String)>,
}

impl BatchReport {
    pub fn summary_line(&self) -> String {
        format!("success={}/{}", self.succeeded, self.total)
    }
}

/// Outcome for one index
#[derive(Debug)]
enum PairOutcome {
    Merged(MergeSummary),
    Skipped,
}

pub struct BatchRunner {
    config: ComposerConfig,
}

impl BatchRunner {
    pub fn new(config: ComposerConfig) -> Self {
        Self { config }
    }

    /// Create the static, dynamic and output directories if absent
    pub fn prepare_dirs(&self) -> ComposeResult<()> {
        for dir in [
            &self.config.static_dir,
            &self.config.dynamic_dir,
            &self.config.output_dir,
        ] {
            std::fs::create_dir_all(dir).map_err(|e| ComposeError::io(dir, e))?;
        }
        Ok(())
    }

    /// Merge every pair in the configured range, in order
    ///
    /// Missing inputs are skipped with a warning. Merge failures are logged
    /// and recorded under [`ErrorPolicy::BestEffort`], or returned as
    /// [`ComposeError::Pair`] under [`ErrorPolicy::FailFast`].
    pub fn run(&self) -> ComposeResult<BatchReport> {
        let indices = self.config.indices()?;
        self.prepare_dirs()?;

        let mut report = BatchReport {
            total: self.config.count,
            ..Default::default()
        };

        for index in indices {
            match self.run_pair(index) {
                Ok(PairOutcome::Merged(summary)) => {
                    report.succeeded += 1;
                    info!(
                        "[OK] merged seed {} ({} entities), {}/{}",
                        index, summary.appended, report.succeeded, report.total
                    );
                }
                Ok(PairOutcome::Skipped) => report.skipped.push(index),
                Err(e) => match self.config.error_policy {
                    ErrorPolicy::BestEffort => {
                        error!("Merging failed on seed {}: {}", index, e);
                        report.failed.push((index, e.to_string()));
                    }
                    ErrorPolicy::FailFast => {
                        return Err(ComposeError::Pair {
                            index,
                            source: Box::new(e),
                        });
                    }
                },
            }
        }

        info!("Done. {}", report.summary_line());
        Ok(report)
    }

    fn run_pair(&self, index: u32) -> ComposeResult<PairOutcome> {
        let static_path = self.config.static_path(index);
        let dynamic_path = self.config.dynamic_path(index);

        if !static_path.exists() {
            warn!("Missing static {}, skipping", static_path.display());
            return Ok(PairOutcome::Skipped);
        }
        if !dynamic_path.exists() {
            warn!("Missing dynamic {}, skipping", dynamic_path.display());
            return Ok(PairOutcome::Skipped);
        }

        compose_files(
            &static_path,
            &dynamic_path,
            self.config.output_path(index),
            &self.config.merge,
        )
        .map(PairOutcome::Merged)
    }
}
