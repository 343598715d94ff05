//! Checkout step two: order overview

use crate::driver::Driver;
use crate::error::E2eResult;
use crate::flow::{SitePath, Transition};
use crate::locator::has_text;
use crate::session::Session;
use crate::totals::CheckoutTotals;

use super::menu::SideMenu;
use super::{assert_loaded, open_page, read_amount, read_text, CART_LINK, TITLE};

pub const SUMMARY_CONTAINER: &str = "#checkout_summary_container";
pub const CART_ITEM: &str = ".cart_item";
pub const ITEM_NAME: &str = ".inventory_item_name";
pub const PAYMENT_INFO_VALUE: &str = r#"[data-test="payment-info-value"]"#;
pub const SHIPPING_INFO_VALUE: &str = r#"[data-test="shipping-info-value"]"#;
pub const SUBTOTAL_LABEL: &str = r#"[data-test="subtotal-label"]"#;
pub const TAX_LABEL: &str = r#"[data-test="tax-label"]"#;
pub const TOTAL_LABEL: &str = r#"[data-test="total-label"]"#;
pub const CANCEL_BUTTON: &str = "#cancel";
pub const FINISH_BUTTON: &str = "#finish";
pub const COMPLETE_CONTAINER: &str = "#checkout_complete_container";

pub struct CheckoutStepTwoPage {
    session: Session,
}

impl CheckoutStepTwoPage {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    fn driver(&self) -> &dyn Driver {
        self.session.driver()
    }

    pub async fn open(&self) -> E2eResult<()> {
        open_page(&self.session, SitePath::CheckoutStepTwo, SUMMARY_CONTAINER).await
    }

    pub async fn is_loaded(&self) -> E2eResult<bool> {
        assert_loaded(&self.session, SitePath::CheckoutStepTwo, SUMMARY_CONTAINER).await
    }

    pub async fn title(&self) -> E2eResult<String> {
        read_text(&self.session, TITLE).await
    }

    pub async fn item_count(&self) -> E2eResult<usize> {
        self.driver().count(CART_ITEM).await
    }

    pub async fn has_item(&self, product: &str) -> E2eResult<bool> {
        Ok(self.driver().count(&has_text(ITEM_NAME, product)).await? > 0)
    }

    pub async fn payment_info(&self) -> E2eResult<String> {
        read_text(&self.session, PAYMENT_INFO_VALUE).await
    }

    pub async fn shipping_info(&self) -> E2eResult<String> {
        read_text(&self.session, SHIPPING_INFO_VALUE).await
    }

    pub async fn subtotal(&self) -> E2eResult<f64> {
        read_amount(&self.session, SUBTOTAL_LABEL).await
    }

    pub async fn tax(&self) -> E2eResult<f64> {
        read_amount(&self.session, TAX_LABEL).await
    }

    pub async fn total(&self) -> E2eResult<f64> {
        read_amount(&self.session, TOTAL_LABEL).await
    }

    pub async fn totals(&self) -> E2eResult<CheckoutTotals> {
        Ok(CheckoutTotals {
            subtotal: self.subtotal().await?,
            tax: self.tax().await?,
            total: self.total().await?,
        })
    }

    /// Abandon the order; the shop returns to the product listing
    pub async fn cancel(&self) -> E2eResult<()> {
        self.session.follow(CANCEL_BUTTON, Transition::CancelReview).await?;
        Ok(())
    }

    pub async fn finish(&self) -> E2eResult<()> {
        self.session.follow(FINISH_BUTTON, Transition::Finish).await?;
        self.session.wait_visible(COMPLETE_CONTAINER).await
    }

    pub async fn go_to_cart(&self) -> E2eResult<()> {
        self.session.follow(CART_LINK, Transition::OpenCart).await?;
        Ok(())
    }

    pub fn menu(&self) -> SideMenu {
        SideMenu::new(self.session.clone())
    }

    pub async fn logout(&self) -> E2eResult<()> {
        self.menu().logout().await
    }

    pub async fn all_items(&self) -> E2eResult<()> {
        self.menu().all_items().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Persona;
    use crate::pages::testing::logged_in;

    async fn at_step_two(products: &[&str]) -> Session {
        let session = logged_in(Persona::Standard).await;
        for product in products {
            session.inventory().add_product_to_cart(product).await.unwrap();
        }
        session.inventory().go_to_cart().await.unwrap();
        session.cart().checkout().await.unwrap();
        let step_one = session.checkout_step_one();
        step_one.fill_info("Ivan", "Maxim", "777777").await.unwrap();
        step_one.continue_to_step_two().await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_overview_contents() {
        let session = at_step_two(&["Sauce Labs Backpack", "Sauce Labs Bike Light"]).await;
        let page = session.checkout_step_two();

        assert_eq!(page.title().await.unwrap(), "Checkout: Overview");
        assert_eq!(page.item_count().await.unwrap(), 2);
        assert!(page.has_item("Sauce Labs Bike Light").await.unwrap());
        assert!(!page.has_item("Sauce Labs Onesie").await.unwrap());
        assert_eq!(page.payment_info().await.unwrap(), "SauceCard #31337");
        assert_eq!(page.shipping_info().await.unwrap(), "Free Pony Express Delivery!");

        let totals = page.totals().await.unwrap();
        assert!((totals.subtotal - 39.98).abs() < 1e-9);
        assert!((totals.tax - 3.20).abs() < 1e-9);
        assert!(totals.is_consistent(), "{:?}", totals);
    }

    #[tokio::test]
    async fn test_cancel_returns_to_inventory() {
        let session = at_step_two(&["Sauce Labs Backpack"]).await;
        session.checkout_step_two().cancel().await.unwrap();
        assert!(session.inventory().is_loaded().await.unwrap());
        assert_eq!(session.inventory().cart_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_finish_and_go_to_cart() {
        let session = at_step_two(&["Sauce Labs Backpack"]).await;
        let page = session.checkout_step_two();
        page.go_to_cart().await.unwrap();
        assert!(session.cart().is_loaded().await.unwrap());

        page.open().await.unwrap();
        page.finish().await.unwrap();
        assert!(session.checkout_complete().is_loaded().await.unwrap());
        assert_eq!(session.inventory().cart_count().await.unwrap(), 0);
    }
}
