//! Selector helpers and locator resolution strategies
//!
//! A [`LocatorChain`] tries a list of strategies in order and reports which one
//! found an element, or that none did. Driver failures are not treated as
//! "not found"; they propagate.

use async_trait::async_trait;
use tracing::debug;

use crate::driver::Driver;
use crate::error::E2eResult;

/// Identifier derived from a product display name: lowercase, spaces to hyphens
pub fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// `[data-test="value"]`
pub fn data_test(value: &str) -> String {
    format!(r#"[data-test="{}"]"#, escape(value))
}

/// `[data-test^="prefix"]`
pub fn data_test_prefix(prefix: &str) -> String {
    format!(r#"[data-test^="{}"]"#, escape(prefix))
}

/// `base:has-text("text")`
pub fn has_text(base: &str, text: &str) -> String {
    format!(r#"{}:has-text("{}")"#, base, escape(text))
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Outcome of resolving a locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found {
        selector: String,
        strategy: String,
    },
    NotFound {
        attempted: Vec<String>,
    },
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found { .. })
    }
}

/// One way of locating an element
#[async_trait]
pub trait LocatorStrategy: Send + Sync {
    fn describe(&self) -> String;

    /// Selector whose first match is the element, if this strategy finds one
    async fn locate(&self, driver: &dyn Driver) -> E2eResult<Option<String>>;
}

/// Matches a CSS selector; the label says whether one element or the first
/// of many is expected
pub struct Css {
    label: &'static str,
    selector: String,
}

impl Css {
    /// One specific element
    pub fn exact(selector: impl Into<String>) -> Self {
        Self {
            label: "exact",
            selector: selector.into(),
        }
    }

    /// First of possibly many matches
    pub fn first(selector: impl Into<String>) -> Self {
        Self {
            label: "first",
            selector: selector.into(),
        }
    }
}

#[async_trait]
impl LocatorStrategy for Css {
    fn describe(&self) -> String {
        format!("{} {}", self.label, self.selector)
    }

    async fn locate(&self, driver: &dyn Driver) -> E2eResult<Option<String>> {
        Ok((driver.count(&self.selector).await? > 0).then(|| self.selector.clone()))
    }
}

/// First element of a tag whose text contains a label
pub struct TextMatch {
    pub tag: String,
    pub text: String,
}

#[async_trait]
impl LocatorStrategy for TextMatch {
    fn describe(&self) -> String {
        format!("{} with text {:?}", self.tag, self.text)
    }

    async fn locate(&self, driver: &dyn Driver) -> E2eResult<Option<String>> {
        let selector = has_text(&self.tag, &self.text);
        Ok((driver.count(&selector).await? > 0).then_some(selector))
    }
}

/// Ordered fallback list of strategies
#[derive(Default)]
pub struct LocatorChain {
    strategies: Vec<Box<dyn LocatorStrategy>>,
}

impl LocatorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, strategy: impl LocatorStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub async fn resolve(&self, driver: &dyn Driver) -> E2eResult<Resolution> {
        let mut attempted = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            let description = strategy.describe();
            if let Some(selector) = strategy.locate(driver).await? {
                debug!("Resolved {} via {}", selector, description);
                return Ok(Resolution::Found {
                    selector,
                    strategy: description,
                });
            }
            attempted.push(description);
        }

        Ok(Resolution::NotFound { attempted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Sauce Labs Backpack", "sauce-labs-backpack")]
    #[test_case("Sauce Labs Bolt T-Shirt", "sauce-labs-bolt-t-shirt")]
    #[test_case("Test.allTheThings() T-Shirt (Red)", "test.allthethings()-t-shirt-(red)")]
    fn test_slug(name: &str, expected: &str) {
        assert_eq!(slug(name), expected);
    }

    #[test]
    fn test_selector_helpers_escape_quotes() {
        assert_eq!(data_test("add-to-cart-x"), r#"[data-test="add-to-cart-x"]"#);
        assert_eq!(data_test_prefix("remove"), r#"[data-test^="remove"]"#);
        assert_eq!(has_text(".cart_item", r#"say "hi""#), r#".cart_item:has-text("say \"hi\"")"#);
    }

    #[test]
    fn test_css_strategy_labels() {
        assert_eq!(Css::exact("#checkout").describe(), "exact #checkout");
        assert_eq!(Css::first(".cart_item").describe(), "first .cart_item");
    }
}
