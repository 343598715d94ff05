//! Cart listing

use serde::{Deserialize, Serialize};

use crate::driver::Driver;
use crate::error::E2eResult;
use crate::flow::{SitePath, Transition};
use crate::locator::has_text;
use crate::session::Session;
use crate::totals::parse_amount;

use super::menu::SideMenu;
use super::{assert_loaded, open_page};

pub const CART_CONTAINER: &str = "#cart_contents_container";
pub const CART_ITEM: &str = ".cart_item";
pub const ITEM_NAME: &str = ".inventory_item_name";
pub const ITEM_PRICE: &str = ".inventory_item_price";
pub const REMOVE_BUTTON: &str = r#"[data-test^="remove"]"#;
pub const CONTINUE_SHOPPING_BUTTON: &str = r#"[data-test="continue-shopping"]"#;
pub const CHECKOUT_BUTTON: &str = r#"[data-test="checkout"]"#;

/// One row of the cart; quantity is always 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub name: String,
    pub price: f64,
}

pub struct CartPage {
    session: Session,
}

impl CartPage {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    fn driver(&self) -> &dyn Driver {
        self.session.driver()
    }

    pub async fn open(&self) -> E2eResult<()> {
        open_page(&self.session, SitePath::Cart, CART_CONTAINER).await
    }

    pub async fn is_loaded(&self) -> E2eResult<bool> {
        assert_loaded(&self.session, SitePath::Cart, CART_CONTAINER).await
    }

    /// Rows in display order
    pub async fn items(&self) -> E2eResult<Vec<CartLine>> {
        let names = self.driver().all_text_contents(&format!("{} {}", CART_ITEM, ITEM_NAME)).await?;
        let prices = self.driver().all_text_contents(&format!("{} {}", CART_ITEM, ITEM_PRICE)).await?;

        names
            .into_iter()
            .zip(prices)
            .map(|(name, price)| {
                Ok(CartLine {
                    name: name.trim().to_string(),
                    price: parse_amount(&price)?,
                })
            })
            .collect()
    }

    pub async fn item_count(&self) -> E2eResult<usize> {
        self.driver().count(CART_ITEM).await
    }

    pub async fn has_item(&self, product: &str) -> E2eResult<bool> {
        Ok(self.driver().count(&has_text(ITEM_NAME, product)).await? > 0)
    }

    pub async fn remove_item(&self, product: &str) -> E2eResult<()> {
        let row = has_text(CART_ITEM, product);
        self.driver().click(&format!("{} {}", row, REMOVE_BUTTON)).await
    }

    /// Sum of the listed prices
    pub async fn total_price(&self) -> E2eResult<f64> {
        Ok(self.items().await?.iter().map(|line| line.price).sum())
    }

    pub async fn continue_shopping(&self) -> E2eResult<()> {
        self.session
            .follow(CONTINUE_SHOPPING_BUTTON, Transition::ContinueShopping)
            .await?;
        Ok(())
    }

    pub async fn checkout(&self) -> E2eResult<()> {
        self.session.follow(CHECKOUT_BUTTON, Transition::Checkout).await?;
        Ok(())
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
