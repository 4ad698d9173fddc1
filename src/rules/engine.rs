//! Scan orchestration: runs the selected scanners against one scope and
//! aggregates their rows into a single ordered report

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, info, info_span, warn, Instrument};

use super::context::ScanContext;
use super::results::{Outcome, ScanReport, ScanResult, Severity};
use crate::cache::DiagnosticsLookup;
use crate::config::Config;
use crate::error::{AzqrError, ScanError};
use crate::scanners::registry::validate_rule_ids;
use crate::scanners::{Scanner, Scope};
use crate::utils::cancel::CancelSignal;
use crate::utils::timing::{ScannerTiming, Timer};

/// How a single scanner run ended
enum RunStatus {
    Completed(Vec<ScanResult>),
    Failed(ScanError),
    Cancelled,
}

struct ScannerRun {
    name: &'static str,
    status: RunStatus,
    duration: Duration,
}

/// Drives scanners for one scan invocation
pub struct ScanOrchestrator {
    lookup: Arc<dyn DiagnosticsLookup>,
    config: Config,
    only_scanners: Option<Vec<String>>,
    skip_scanners: Option<Vec<String>>,
}

impl ScanOrchestrator {
    pub fn new(lookup: Arc<dyn DiagnosticsLookup>, config: Config) -> Self {
        Self {
            lookup,
            config,
            only_scanners: None,
            skip_scanners: None,
        }
    }

    /// Set scanners to exclusively run
    pub fn set_only_scanners(&mut self, scanners: Vec<String>) {
        self.only_scanners = Some(scanners);
    }

    /// Set scanners to skip
    pub fn set_skip_scanners(&mut self, scanners: Vec<String>) {
        self.skip_scanners = Some(scanners);
    }

    fn should_run_scanner(&self, name: &str) -> bool {
        if let Some(only) = &self.only_scanners {
            return only.iter().any(|s| s == name);
        }

        if let Some(skip) = &self.skip_scanners {
            return !skip.iter().any(|s| s == name);
        }

        true
    }

    /// Run `scanners` in `scope` and return the aggregated report.
    ///
    /// Rows are ordered by scanner position in `scanners`, then rule catalog
    /// order, then resource enumeration order, however the work interleaves.
    /// A scanner whose fetch fails is listed in [`ScanReport::failures`]; the
    /// others still complete. When `cancel` fires, unfinished scanners are
    /// listed in [`ScanReport::incomplete`] and finished ones keep their rows.
    ///
    /// # Errors
    ///
    /// Fails before any remote call when the scope is malformed or two rules
    /// share an id.
    pub async fn run(
        &self,
        scanners: &[Arc<dyn Scanner>],
        scope: &Scope,
        cancel: &CancelSignal,
    ) -> Result<ScanReport, AzqrError> {
        scope.validate()?;
        validate_rule_ids(scanners)?;

        info!(scope = %scope, "Starting scan");
        let timer = Timer::start();

        let ctx = ScanContext::new(Arc::clone(&self.lookup))
            .with_disabled_rules(self.config.disabled_rules())
            .with_max_concurrent_evaluations(self.config.scan.max_concurrent_evaluations);
        let permits = Semaphore::new(self.config.scan.max_parallel_scanners.max(1));

        let selected = scanners.iter().filter(|scanner| {
            let run = self.should_run_scanner(scanner.name());
            if !run {
                debug!(scanner = scanner.name(), "Skipping scanner");
            }
            run
        });

        // join_all yields in input order, which fixes the scanner order
        let runs = join_all(
            selected.map(|scanner| run_scanner(scanner.as_ref(), scope, &ctx, &permits, cancel)),
        )
        .await;

        let mut report = ScanReport::new(scope.clone());
        for run in runs {
            match run.status {
                RunStatus::Completed(results) => {
                    report.timing_mut().add_scanner(ScannerTiming::new(
                        run.name,
                        results.len(),
                        run.duration,
                    ));
                    report.add_results(results);
                }
                RunStatus::Failed(e) => {
                    warn!(scanner = run.name, error = %e, "Scanner failed");
                    report.add_failure(run.name, e.to_string());
                }
                RunStatus::Cancelled => {
                    warn!(scanner = run.name, "Scanner cancelled");
                    report.add_incomplete(run.name);
                }
            }
        }
        report.timing_mut().set_total_duration(timer.elapsed());
        if cancel.is_cancelled() {
            warn!(
                incomplete = report.incomplete().len(),
                "Scan cancelled, report is partial"
            );
        }

        let stats = ctx.cache_stats();
        debug!(
            cached = stats.total_entries,
            remote_queries = stats.remote_queries,
            "Diagnostics cache"
        );
        info!(
            "Scan complete: {} high, {} medium, {} low violations, {} undetermined",
            report.count_violations(Severity::High),
            report.count_violations(Severity::Medium),
            report.count_violations(Severity::Low),
            report.count_by_outcome(Outcome::Undetermined),
        );

        Ok(report)
    }
}

async fn run_scanner(
    scanner: &dyn Scanner,
    scope: &Scope,
    ctx: &ScanContext,
    permits: &Semaphore,
    cancel: &CancelSignal,
) -> ScannerRun {
    let name = scanner.name();
    let span = info_span!("scanner", scanner = name, resource_type = scanner.resource_type());

    async move {
        let timer = Timer::start();
        let status = tokio::select! {
            biased;
            _ = cancel.cancelled() => RunStatus::Cancelled,
            result = async {
                // The semaphore is never closed
                let _permit = permits.acquire().await.ok();
                debug!("Running scanner");
                scanner.scan(scope, ctx).await
            } => match result {
                Ok(results) => {
                    debug!(results = results.len(), "Scanner completed");
                    RunStatus::Completed(results)
                }
                Err(e) => RunStatus::Failed(e),
            },
        };

        ScannerRun {
            name,
            status,
            duration: timer.elapsed(),
        }
    }
    .instrument(span)
    .await
}
