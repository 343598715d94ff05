//! Test runner that launches a session per scenario and collects results

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::SuiteConfig;
use crate::driver::Driver;
use crate::error::{E2eError, E2eResult};
use crate::playwright::{PlaywrightConfig, PlaywrightHandle};
use crate::scenarios::{self, Scenario};
use crate::session::Session;
use crate::sim::{SimOptions, SimulatedSite};

/// Which browser implementation scenarios drive
#[derive(Debug, Clone)]
pub enum Backend {
    Playwright(PlaywrightConfig),
    Simulated(SimOptions),
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Playwright(_) => "playwright",
            Backend::Simulated(_) => "sim",
        }
    }

    /// Open a fresh, isolated page
    pub async fn launch(&self) -> E2eResult<Arc<dyn Driver>> {
        match self {
            Backend::Playwright(config) => Ok(Arc::new(PlaywrightHandle::launch(config).await?)),
            Backend::Simulated(options) => Ok(Arc::new(SimulatedSite::new(options.clone()))),
        }
    }
}

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub suite: String,
    pub tags: Vec<String>,
    pub success: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Result of running a set of scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub started_at: DateTime<Utc>,
    pub results: Vec<TestResult>,
}

impl TestSuiteResult {
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    /// Results that did not pass
    pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| !r.success)
    }
}

/// Configuration for the test runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub backend: Backend,
    pub suite: SuiteConfig,

    /// Scenarios run concurrently, each in its own session
    pub workers: usize,

    /// Upper bound for one scenario including session setup
    pub scenario_timeout: Duration,

    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Playwright(PlaywrightConfig::default()),
            suite: SuiteConfig::default(),
            workers: 1,
            scenario_timeout: Duration::from_secs(180),
            output_dir: PathBuf::from("test-results"),
        }
    }
}

/// Main E2E test runner
pub struct TestRunner {
    backend: Backend,
    suite: Arc<SuiteConfig>,
    workers: usize,
    scenario_timeout: Duration,
    output_dir: PathBuf,
    scenarios: Vec<Scenario>,
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRunner {
    /// Create a new test runner with default configuration
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    /// Create a test runner over the full scenario catalogue
    pub fn with_config(config: RunnerConfig) -> Self {
        Self {
            backend: config.backend,
            suite: Arc::new(config.suite),
            workers: config.workers.max(1),
            scenario_timeout: config.scenario_timeout,
            output_dir: config.output_dir,
            scenarios: scenarios::all(),
        }
    }

    /// Replace the scenario catalogue
    pub fn with_scenarios(mut self, scenarios: Vec<Scenario>) -> Self {
        self.scenarios = scenarios;
        self
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub async fn run_all(&self) -> E2eResult<TestSuiteResult> {
        self.run_scenarios(&self.scenarios).await
    }

    /// Run scenarios carrying `tag`
    pub async fn run_tagged(&self, tag: &str) -> E2eResult<TestSuiteResult> {
        let selected = self.select(|s| s.has_tag(tag), || format!("tag {}", tag))?;
        self.run_scenarios(&selected).await
    }

    /// Run one suite
    pub async fn run_suite(&self, suite: &str) -> E2eResult<TestSuiteResult> {
        let selected = self.select(|s| s.suite == suite, || format!("suite {}", suite))?;
        self.run_scenarios(&selected).await
    }

    /// Run a specific scenario by name
    pub async fn run_test(&self, name: &str) -> E2eResult<TestResult> {
        let scenario = self
            .scenarios
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| E2eError::ScenarioNotFound(name.to_string()))?;
        Ok(self.run_scenario(scenario).await)
    }

    fn select(&self, keep: impl Fn(&Scenario) -> bool, describe: impl FnOnce() -> String) -> E2eResult<Vec<Scenario>> {
        let selected: Vec<Scenario> = self.scenarios.iter().filter(|s| keep(s)).cloned().collect();
        if selected.is_empty() {
            return Err(E2eError::ScenarioNotFound(describe()));
        }
        Ok(selected)
    }

    /// Run `scenarios` with up to `workers` sessions open at once
    pub async fn run_scenarios(&self, scenarios: &[Scenario]) -> E2eResult<TestSuiteResult> {
        let started_at = Utc::now();
        let start = Instant::now();

        info!(
            "Running {} scenario(s) on {} with {} worker(s)...",
            scenarios.len(),
            self.backend.name(),
            self.workers
        );

        let mut indexed: Vec<(usize, TestResult)> = stream::iter(scenarios.iter().enumerate())
            .map(|(index, scenario)| async move { (index, self.run_scenario(scenario).await) })
            .buffer_unordered(self.workers)
            .collect()
            .await;
        indexed.sort_by_key(|(index, _)| *index);
        let results: Vec<TestResult> = indexed.into_iter().map(|(_, result)| result).collect();

        let passed = results.iter().filter(|r| r.success).count();
        let failed = results.len() - passed;
        let skipped = 0;
        let duration_ms = start.elapsed().as_millis() as u64;

        info!("");
        info!("Test Results: {} passed, {} failed, {} skipped ({} ms)",
            passed, failed, skipped, duration_ms);

        Ok(TestSuiteResult {
            total: scenarios.len(),
            passed,
            failed,
            skipped,
            duration_ms,
            started_at,
            results,
        })
    }

    /// Run one scenario in a fresh session; failures are captured in the result
    pub async fn run_scenario(&self, scenario: &Scenario) -> TestResult {
        let start = Instant::now();
        debug!("Running scenario: {}", scenario.name);

        let outcome = match tokio::time::timeout(self.scenario_timeout, self.execute(scenario)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(E2eError::Timeout(format!(
                "scenario '{}' ({} ms)",
                scenario.name,
                self.scenario_timeout.as_millis()
            ))),
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        let error = match outcome {
            Ok(()) => {
                info!("✓ {} ({} ms)", scenario.name, duration_ms);
                None
            }
            Err(e) => {
                error!("✗ {} - {}", scenario.name, e);
                Some(e.to_string())
            }
        };

        TestResult {
            name: scenario.name.to_string(),
            suite: scenario.suite.to_string(),
            tags: scenario.tags.iter().map(|t| t.to_string()).collect(),
            success: error.is_none(),
            duration_ms,
            error,
        }
    }

    async fn execute(&self, scenario: &Scenario) -> E2eResult<()> {
        let driver = self.backend.launch().await?;
        let session = Session::new(driver, self.suite.clone());

        let outcome = (scenario.run)(session.clone()).await;
        if let Err(e) = session.close().await {
            warn!("Failed to close session for '{}': {}", scenario.name, e);
        }
        outcome
    }

    /// Write test results to JSON file
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}
