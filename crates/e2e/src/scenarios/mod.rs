//! Catalogue of user journeys
//!
//! Every scenario receives a fresh [`Session`] and returns `Ok(())` when all of
//! its expectations held. Scenarios are grouped by suite and carry tags so the
//! runner can select them.

pub mod auth;
pub mod auth_negative;
pub mod cart;
pub mod checkout;
pub mod navigation;
pub mod payment;

use std::fmt;
use futures::future::BoxFuture;

use crate::config::Persona;
use crate::error::{E2eError, E2eResult};
use crate::pages::LoginOutcome;
use crate::session::Session;

pub type ScenarioFn = fn(Session) -> BoxFuture<'static, E2eResult<()>>;

/// A named, tagged user journey
#[derive(Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub suite: &'static str,
    pub tags: &'static [&'static str],
    pub run: ScenarioFn,
}

impl Scenario {
    pub const fn new(
        name: &'static str,
        suite: &'static str,
        tags: &'static [&'static str],
        run: ScenarioFn,
    ) -> Self {
        Self { name, suite, tags, run }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| *t == tag)
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("suite", &self.suite)
            .field("tags", &self.tags)
            .finish()
    }
}

/// Every registered scenario, suite by suite
pub fn all() -> Vec<Scenario> {
    let mut scenarios = Vec::new();
    scenarios.extend(auth::scenarios());
    scenarios.extend(auth_negative::scenarios());
    scenarios.extend(cart::scenarios());
    scenarios.extend(checkout::scenarios());
    scenarios.extend(payment::scenarios());
    scenarios.extend(navigation::scenarios());
    scenarios
}

/// Customer used by most checkout journeys
pub(crate) const CUSTOMER: (&str, &str, &str) = ("John", "Doe", "12345");

/// Log in and require the inventory to render
pub(crate) async fn login(session: &Session, persona: Persona) -> E2eResult<()> {
    let page = session.login_page();
    match page.login_as(persona).await? {
        LoginOutcome::LoggedIn => Ok(()),
        LoginOutcome::Rejected => Err(E2eError::assertion(
            format!("login as {}", persona),
            "inventory listing",
            page.error_message().await?.unwrap_or_default(),
        )),
    }
}

/// Add each product from the inventory page
pub(crate) async fn add_products(session: &Session, products: &[&str]) -> E2eResult<()> {
    let inventory = session.inventory();
    for product in products {
        inventory.add_product_to_cart(product).await?;
    }
    Ok(())
}

/// From the cart, through the information form to the overview
pub(crate) async fn checkout_to_review(session: &Session, customer: (&str, &str, &str)) -> E2eResult<()> {
    let cart = session.cart();
    cart.is_loaded().await?;
    cart.checkout().await?;

    let step_one = session.checkout_step_one();
    step_one.is_loaded().await?;
    step_one.fill_info(customer.0, customer.1, customer.2).await?;
    step_one.continue_to_step_two().await?;
    session.checkout_step_two().is_loaded().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let scenarios = all();
        let names: HashSet<_> = scenarios.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), scenarios.len());
    }

    #[test]
    fn test_every_scenario_is_tagged() {
        for scenario in all() {
            assert!(!scenario.tags.is_empty(), "{} has no tags", scenario.name);
            assert!(scenario.has_tag(scenario.suite), "{} lacks its suite tag", scenario.name);
        }
    }

    #[test]
    fn test_smoke_subset_exists() {
        assert!(all().iter().filter(|s| s.has_tag("smoke")).count() >= 3);
    }
}
