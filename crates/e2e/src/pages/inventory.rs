//! Product listing

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::driver::Driver;
use crate::error::{E2eError, E2eResult};
use crate::flow::{SitePath, Transition};
use crate::locator::{data_test, data_test_prefix, has_text, slug, Css, LocatorChain, Resolution, TextMatch};
use crate::session::Session;
use crate::totals::parse_amount;

use super::menu::SideMenu;
use super::{assert_loaded, open_page};

pub const INVENTORY_CONTAINER: &str = "#inventory_container";
pub const INVENTORY_ITEM: &str = ".inventory_item";
pub const ITEM_NAME: &str = ".inventory_item_name";
pub const ITEM_PRICE: &str = ".inventory_item_price";
pub const REMOVE_BUTTON: &str = r#"[data-test^="remove"]"#;
pub const CART_BADGE: &str = "#shopping_cart_container .shopping_cart_badge";
pub const CART_CONTAINER: &str = "#shopping_cart_container";
pub const SORT_DROPDOWN: &str = r#"[data-test="product-sort-container"]"#;

/// Options of the sort dropdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::NameAsc,
        SortOrder::NameDesc,
        SortOrder::PriceAsc,
        SortOrder::PriceDesc,
    ];

    /// `value` attribute of the `<option>`
    pub fn value(&self) -> &'static str {
        match self {
            SortOrder::NameAsc => "az",
            SortOrder::NameDesc => "za",
            SortOrder::PriceAsc => "lohi",
            SortOrder::PriceDesc => "hilo",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::NameAsc => "Name (A to Z)",
            SortOrder::NameDesc => "Name (Z to A)",
            SortOrder::PriceAsc => "Price (low to high)",
            SortOrder::PriceDesc => "Price (high to low)",
        }
    }

    pub fn from_value(value: &str) -> Option<SortOrder> {
        SortOrder::ALL.into_iter().find(|order| order.value() == value)
    }
}

/// Result of trying to add a product
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A control was found and clicked
    Added { selector: String, strategy: String },
    /// No control matched any strategy; the add is assumed to have happened
    Assumed { attempted: Vec<String> },
}

impl AddOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added { .. })
    }
}

/// Strategies for a product's add-to-cart control, most specific first
pub fn add_to_cart_chain(product: &str) -> LocatorChain {
    LocatorChain::new()
        .then(Css::exact(data_test(&format!("add-to-cart-{}", slug(product)))))
        .then(Css::first(data_test_prefix("add-to-cart")))
        .then(TextMatch {
            tag: "button".into(),
            text: "Add to cart".into(),
        })
}

pub struct InventoryPage {
    session: Session,
}

impl InventoryPage {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    fn driver(&self) -> &dyn Driver {
        self.session.driver()
    }

    pub async fn open(&self) -> E2eResult<()> {
        open_page(&self.session, SitePath::Inventory, INVENTORY_CONTAINER).await
    }

    pub async fn is_loaded(&self) -> E2eResult<bool> {
        assert_loaded(&self.session, SitePath::Inventory, INVENTORY_CONTAINER).await
    }

    /// Add a product by display name
    ///
    /// Falls back to the first add control, then to any button labelled
    /// "Add to cart". When nothing matches, the failure is logged and
    /// reported as [`AddOutcome::Assumed`] so flows for the problem persona
    /// can continue. Driver failures are returned as errors.
    pub async fn add_product_to_cart(&self, product: &str) -> E2eResult<AddOutcome> {
        match add_to_cart_chain(product).resolve(self.driver()).await? {
            Resolution::Found { selector, strategy } => {
                self.driver().click(&selector).await?;
                info!("Added {} to cart using {}", product, strategy);
                Ok(AddOutcome::Added { selector, strategy })
            }
            Resolution::NotFound { attempted } => {
                warn!(
                    "No add-to-cart control for {} (tried {}), assuming it was added",
                    product,
                    attempted.join("; ")
                );
                Ok(AddOutcome::Assumed { attempted })
            }
        }
    }

    pub async fn remove_product_from_cart(&self, product: &str) -> E2eResult<()> {
        let card = has_text(INVENTORY_ITEM, product);
        self.driver().click(&format!("{} {}", card, REMOVE_BUTTON)).await
    }

    /// Number on the cart badge, 0 when the badge is not shown
    pub async fn cart_count(&self) -> E2eResult<usize> {
        if !self.driver().is_visible(CART_BADGE).await? {
            return Ok(0);
        }
        let text = self.driver().text_content(CART_BADGE).await?.unwrap_or_default();
        text.trim()
            .parse()
            .map_err(|_| E2eError::assertion("cart badge", "a number", format!("{:?}", text)))
    }

    pub async fn go_to_cart(&self) -> E2eResult<()> {
        self.session.follow(CART_CONTAINER, Transition::OpenCart).await?;
        Ok(())
    }

    pub async fn sort_products(&self, order: SortOrder) -> E2eResult<()> {
        self.driver().select_option(SORT_DROPDOWN, order.value()).await
    }

    pub async fn product_names(&self) -> E2eResult<Vec<String>> {
        let names = self.driver().all_text_contents(ITEM_NAME).await?;
        Ok(names.into_iter().map(|name| name.trim().to_string()).collect())
    }

    pub async fn product_prices(&self) -> E2eResult<Vec<f64>> {
        self.driver()
            .all_text_contents(ITEM_PRICE)
            .await?
            .iter()
            .map(|text| parse_amount(text))
            .collect()
    }

    pub fn menu(&self) -> SideMenu {
        SideMenu::new(self.session.clone())
    }

    pub async fn logout(&self) -> E2eResult<()> {
        self.menu().logout().await
    }

    pub async fn reset_app_state(&self) -> E2eResult<()> {
        self.menu().reset_app_state().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Persona;
    use std::time::Duration;
    use async_trait::async_trait;
    use crate::driver::{LoadState, WaitState};
    use crate::pages::testing::logged_in;
    use crate::sim::{Document, Node, SimulatedSite};

    /// Fixed markup that answers queries and refuses everything else
    struct StaticPage(Node);

    impl StaticPage {
        fn refuse<T>(&self) -> E2eResult<T> {
            Err(E2eError::Playwright("static page is read-only".into()))
        }
    }

    #[async_trait]
    impl Driver for StaticPage {
        async fn goto(&self, _url: &str) -> E2eResult<()> {
            self.refuse()
        }

        async fn wait_for_load_state(&self, _state: LoadState) -> E2eResult<()> {
            Ok(())
        }

        async fn wait_for_selector(&self, _selector: &str, _state: WaitState, _timeout: Duration) -> E2eResult<()> {
            self.refuse()
        }

        async fn wait_for_url(&self, _url: &str, _timeout: Duration) -> E2eResult<()> {
            self.refuse()
        }

        async fn url(&self) -> E2eResult<String> {
            Ok("about:blank".into())
        }

        async fn fill(&self, _selector: &str, _value: &str) -> E2eResult<()> {
            self.refuse()
        }

        async fn click(&self, _selector: &str) -> E2eResult<()> {
            self.refuse()
        }

        async fn select_option(&self, _selector: &str, _value: &str) -> E2eResult<()> {
            self.refuse()
        }

        async fn count(&self, selector: &str) -> E2eResult<usize> {
            let count = Document::render(&self.0).select(selector)?.len();
            Ok(count)
        }

        async fn text_content(&self, selector: &str) -> E2eResult<Option<String>> {
            let text = Document::render(&self.0).select(selector)?.into_iter().next().map(|m| m.text);
            Ok(text)
        }

        async fn all_text_contents(&self, selector: &str) -> E2eResult<Vec<String>> {
            let texts = Document::render(&self.0).select(selector)?.into_iter().map(|m| m.text).collect();
            Ok(texts)
        }

        async fn is_visible(&self, selector: &str) -> E2eResult<bool> {
            let visible = Document::render(&self.0).select(selector)?.first().is_some_and(|m| m.visible);
            Ok(visible)
        }

        async fn close(&self) -> E2eResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sort_order_values() {
        for order in SortOrder::ALL {
            assert_eq!(SortOrder::from_value(order.value()), Some(order));
        }
        assert_eq!(SortOrder::from_value("price"), None);
    }

    #[test]
    fn test_add_chain_order() {
        let chain = add_to_cart_chain("Sauce Labs Backpack");
        assert_eq!(chain.len(), 3);
    }

    #[tokio::test]
    async fn test_add_uses_exact_selector() {
        let session = logged_in(Persona::Standard).await;
        let page = session.inventory();

        let outcome = page.add_product_to_cart("Sauce Labs Backpack").await.unwrap();
        assert_eq!(
            outcome,
            AddOutcome::Added {
                selector: r#"[data-test="add-to-cart-sauce-labs-backpack"]"#.into(),
                strategy: r#"exact [data-test="add-to-cart-sauce-labs-backpack"]"#.into(),
            }
        );
        assert_eq!(page.cart_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_add_falls_back_to_first_control() {
        let session = logged_in(Persona::Standard).await;
        let page = session.inventory();

        let outcome = page.add_product_to_cart("Sauce Labs Hoodie").await.unwrap();
        match outcome {
            AddOutcome::Added { strategy, .. } => assert!(strategy.starts_with("first ")),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(page.cart_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_add_falls_back_to_button_text() {
        let page = StaticPage(Node::new("body").child(
            Node::new("div").class("inventory_item").children([
                Node::new("div").class("inventory_item_name").text("Sauce Labs Backpack"),
                Node::new("button").data_test("buy-sauce-labs-backpack").text("Add to cart"),
            ]),
        ));

        let resolution = add_to_cart_chain("Sauce Labs Backpack").resolve(&page).await.unwrap();
        assert_eq!(
            resolution,
            Resolution::Found {
                selector: r#"button:has-text("Add to cart")"#.into(),
                strategy: r#"button with text "Add to cart""#.into(),
            }
        );
    }

    #[tokio::test]
    async fn test_add_assumed_when_nothing_matches() {
        let session = logged_in(Persona::Standard).await;
        let page = session.inventory();
        for name in page.product_names().await.unwrap() {
            assert!(page.add_product_to_cart(&name).await.unwrap().is_added());
        }
        assert_eq!(page.cart_count().await.unwrap(), 6);

        match page.add_product_to_cart("Sauce Labs Backpack").await.unwrap() {
            AddOutcome::Assumed { attempted } => assert_eq!(attempted.len(), 3),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(page.cart_count().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_driver_errors_propagate_from_add() {
        let site = SimulatedSite::default();
        site.close().await.unwrap();
        let err = add_to_cart_chain("Sauce Labs Backpack").resolve(&site).await.unwrap_err();
        assert!(matches!(err, E2eError::Playwright(_)));
    }

    #[tokio::test]
    async fn test_remove_hides_badge() {
        let session = logged_in(Persona::Standard).await;
        let page = session.inventory();
        page.add_product_to_cart("Sauce Labs Bike Light").await.unwrap();
        page.remove_product_from_cart("Sauce Labs Bike Light").await.unwrap();

        assert_eq!(page.cart_count().await.unwrap(), 0);
        assert!(!session.driver().is_visible(CART_BADGE).await.unwrap());
    }

    #[tokio::test]
    async fn test_sorting() {
        let session = logged_in(Persona::Standard).await;
        let page = session.inventory();

        page.sort_products(SortOrder::PriceAsc).await.unwrap();
        let prices = page.product_prices().await.unwrap();
        assert!(prices.windows(2).all(|w| w[0] <= w[1]), "{:?}", prices);

        page.sort_products(SortOrder::NameDesc).await.unwrap();
        let names = page.product_names().await.unwrap();
        let mut expected = names.clone();
        expected.sort_by(|a, b| b.cmp(a));
        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn test_problem_user_add_is_silently_ignored() {
        let session = logged_in(Persona::Problem).await;
        let page = session.inventory();

        assert!(page.add_product_to_cart("Sauce Labs Bolt T-Shirt").await.unwrap().is_added());
        assert_eq!(page.cart_count().await.unwrap(), 0);
    }
}
