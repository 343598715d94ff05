//! Runs the whole scenario catalogue against the simulated shop.
//!
//! This keeps page objects, selectors and scenarios honest without a browser.

use std::collections::HashSet;
use std::time::Duration;

use saucedemo_e2e::runner::TestSuiteResult;
use saucedemo_e2e::sim::SimOptions;
use saucedemo_e2e::{Backend, E2eError, RunnerConfig, SuiteConfig, TestRunner};

fn sim_runner(workers: usize) -> TestRunner {
    TestRunner::with_config(RunnerConfig {
        backend: Backend::Simulated(SimOptions {
            glitch_delay: Duration::ZERO,
            ..Default::default()
        }),
        suite: SuiteConfig {
            expect_timeout: Duration::from_millis(500),
            poll_interval: Duration::from_millis(10),
            ..Default::default()
        },
        workers,
        scenario_timeout: Duration::from_secs(60),
        output_dir: tempfile::tempdir().unwrap().into_path(),
    })
}

fn assert_all_passed(results: &TestSuiteResult) {
    let failures: Vec<String> = results
        .failures()
        .map(|r| format!("{}: {}", r.name, r.error.as_deref().unwrap_or("?")))
        .collect();
    assert!(failures.is_empty(), "failed scenarios:\n{}", failures.join("\n"));
    assert_eq!(results.passed, results.total);
}

#[tokio::test]
async fn test_full_catalogue_passes_on_sim() {
    let runner = sim_runner(4);
    let results = runner.run_all().await.unwrap();

    assert_eq!(results.total, runner.scenarios().len());
    assert_all_passed(&results);
}

#[tokio::test]
async fn test_every_suite_is_registered() {
    let runner = sim_runner(1);
    let suites: HashSet<&str> = runner.scenarios().iter().map(|s| s.suite).collect();
    for suite in ["auth", "auth_negative", "cart", "checkout", "payment", "navigation"] {
        assert!(suites.contains(suite), "missing suite {}", suite);
    }
}

#[tokio::test]
async fn test_smoke_tag_runs_sequentially() {
    let runner = sim_runner(1);
    let results = runner.run_tagged("smoke").await.unwrap();
    assert!(results.total >= 3);
    assert_all_passed(&results);
}

#[tokio::test]
async fn test_single_scenario_by_name() {
    let runner = sim_runner(1);
    let result = runner.run_test("complete checkout with valid information").await.unwrap();
    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.suite, "checkout");

    assert!(matches!(
        runner.run_test("does not exist").await,
        Err(E2eError::ScenarioNotFound(_))
    ));
}
