//! Command-line arguments of the runner binary

use std::path::PathBuf;
use std::time::Duration;
use clap::{ArgAction, Parser, ValueEnum};

use crate::config::SuiteConfig;
use crate::error::E2eResult;
use crate::playwright::{Browser, PlaywrightConfig};
use crate::runner::{Backend, RunnerConfig};
use crate::sim::SimOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DriverKind {
    /// Real browser through the Playwright bridge
    Playwright,
    /// In-process model of the shop
    Sim,
}

#[derive(Parser, Debug)]
#[command(name = "saucedemo-e2e")]
#[command(about = "E2E test runner for the Sauce Labs demo shop")]
pub struct Args {
    /// Run only scenarios carrying this tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Run only one suite (auth, auth_negative, cart, checkout, payment, navigation)
    #[arg(short, long)]
    pub suite: Option<String>,

    /// Run only a specific scenario by name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Browser implementation to drive
    #[arg(long, value_enum, default_value = "playwright", env = "E2E_DRIVER")]
    pub driver: DriverKind,

    /// Browser to use (chromium, firefox, webkit)
    #[arg(long, default_value = "chromium", env = "E2E_BROWSER")]
    pub browser: String,

    /// Run in headless mode (`--headless false` shows the browser)
    #[arg(long, action = ArgAction::Set, default_value_t = true, env = "E2E_HEADLESS")]
    pub headless: bool,

    /// Viewport width
    #[arg(long, default_value = "1280")]
    pub viewport_width: u32,

    /// Viewport height
    #[arg(long, default_value = "720")]
    pub viewport_height: u32,

    /// Scenarios run concurrently, each with its own page
    #[arg(short, long, default_value = "1", env = "E2E_WORKERS")]
    pub workers: usize,

    /// Per-scenario timeout in seconds
    #[arg(long, default_value = "180")]
    pub scenario_timeout: u64,

    /// Output directory for results
    #[arg(short, long, default_value = "test-results")]
    pub output: PathBuf,

    /// Print the scenario catalogue and exit
    #[arg(long)]
    pub list: bool,
}

impl Args {
    pub fn backend(&self, suite: &SuiteConfig) -> E2eResult<Backend> {
        Ok(match self.driver {
            DriverKind::Playwright => Backend::Playwright(PlaywrightConfig {
                browser: self.browser.parse::<Browser>()?,
                headless: self.headless,
                viewport_width: self.viewport_width,
                viewport_height: self.viewport_height,
                default_timeout: suite.action_timeout,
                ..Default::default()
            }),
            DriverKind::Sim => Backend::Simulated(SimOptions {
                base_url: suite.base_url.clone(),
                ..Default::default()
            }),
        })
    }

    pub fn runner_config(&self, suite: SuiteConfig) -> E2eResult<RunnerConfig> {
        Ok(RunnerConfig {
            backend: self.backend(&suite)?,
            suite,
            workers: self.workers,
            scenario_timeout: Duration::from_secs(self.scenario_timeout),
            output_dir: self.output.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("e2e").chain(args.iter().copied())).unwrap()
    }

    #[test_case(&[], true)]
    #[test_case(&["--headless", "false"], false)]
    #[test_case(&["--headless=true"], true)]
    fn test_headless_flag(args: &[&str], expected: bool) {
        assert_eq!(parse(args).headless, expected);
    }

    #[test]
    fn test_headed_run_reaches_playwright_config() {
        let args = parse(&["--headless", "false", "--browser", "firefox"]);
        match args.backend(&SuiteConfig::default()).unwrap() {
            Backend::Playwright(config) => {
                assert!(!config.headless);
                assert_eq!(config.browser, Browser::Firefox);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_sim_backend_and_runner_config() {
        let args = parse(&["--driver", "sim", "--workers", "3", "--tag", "smoke"]);
        assert_eq!(args.driver, DriverKind::Sim);
        assert_eq!(args.tag.as_deref(), Some("smoke"));

        let config = args.runner_config(SuiteConfig::default()).unwrap();
        assert!(matches!(config.backend, Backend::Simulated(_)));
        assert_eq!(config.workers, 3);
        assert_eq!(config.scenario_timeout, Duration::from_secs(180));
    }

    #[test]
    fn test_unknown_browser_is_config_error() {
        let args = parse(&["--browser", "opera"]);
        assert!(args.backend(&SuiteConfig::default()).is_err());
    }
}
