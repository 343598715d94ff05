//! Saucedemo E2E Test Framework
//!
//! This crate provides a Rust-controlled end-to-end suite for the Sauce Labs
//! demo shop that:
//! - Drives a real browser through a long-lived Playwright bridge process
//! - Wraps every page in a page object with named operations
//! - Registers user journeys as tagged scenarios, grouped by suite
//! - Runs the same scenarios offline against an in-process model of the shop
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    E2E Test Runner (Rust)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    ├── Backend::launch() -> Arc<dyn Driver>                 │
//! │    ├── run_all / run_tagged / run_suite / run_test          │
//! │    └── write_results() -> test-results.json                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Scenario (fn(Session) -> future)                           │
//! │    └── Session { driver, config }                           │
//! │          ├── LoginPage         login / login_as             │
//! │          ├── InventoryPage     add (LocatorChain) / sort    │
//! │          ├── CartPage          items / remove / checkout    │
//! │          ├── CheckoutStepOne   fill_info / continue         │
//! │          ├── CheckoutStepTwo   totals / finish / cancel     │
//! │          ├── CheckoutComplete  header / back_to_home        │
//! │          └── SideMenu          logout / reset / all_items   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Driver                                                     │
//! │    ├── PlaywrightHandle  (node bridge, JSON lines on stdio) │
//! │    └── SimulatedSite     (element tree + selector engine)   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod expect;
pub mod flow;
pub mod locator;
pub mod pages;
pub mod playwright;
pub mod runner;
pub mod scenarios;
pub mod session;
pub mod sim;
pub mod totals;

pub use config::{Credentials, Persona, SuiteConfig};
pub use driver::Driver;
pub use error::{E2eError, E2eResult};
pub use runner::{Backend, RunnerConfig, TestRunner};
pub use scenarios::Scenario;
pub use session::Session;
