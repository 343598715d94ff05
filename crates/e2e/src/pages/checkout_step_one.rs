//! Checkout step one: customer information form

use crate::driver::Driver;
use crate::error::E2eResult;
use crate::flow::{SitePath, Transition};
use crate::session::Session;

use super::menu::SideMenu;
use super::{assert_loaded, open_page};

pub const CHECKOUT_CONTAINER: &str = "#checkout_info_container";
pub const FIRST_NAME_INPUT: &str = r#"[data-test="firstName"]"#;
pub const LAST_NAME_INPUT: &str = r#"[data-test="lastName"]"#;
pub const POSTAL_CODE_INPUT: &str = r#"[data-test="postalCode"]"#;
pub const CONTINUE_BUTTON: &str = r#"[data-test="continue"]"#;
pub const CANCEL_BUTTON: &str = r#"[data-test="cancel"]"#;
pub const ERROR_MESSAGE: &str = r#"[data-test="error"]"#;
pub const SUMMARY_CONTAINER: &str = "#checkout_summary_container";

pub struct CheckoutStepOnePage {
    session: Session,
}

impl CheckoutStepOnePage {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    fn driver(&self) -> &dyn Driver {
        self.session.driver()
    }

    pub async fn open(&self) -> E2eResult<()> {
        open_page(&self.session, SitePath::CheckoutStepOne, CHECKOUT_CONTAINER).await
    }

    pub async fn is_loaded(&self) -> E2eResult<bool> {
        assert_loaded(&self.session, SitePath::CheckoutStepOne, CHECKOUT_CONTAINER).await
    }

    pub async fn fill_info(&self, first_name: &str, last_name: &str, postal_code: &str) -> E2eResult<()> {
        self.driver().fill(FIRST_NAME_INPUT, first_name).await?;
        self.driver().fill(LAST_NAME_INPUT, last_name).await?;
        self.driver().fill(POSTAL_CODE_INPUT, postal_code).await
    }

    /// Click continue without waiting for navigation
    pub async fn submit(&self) -> E2eResult<()> {
        self.driver().click(CONTINUE_BUTTON).await
    }

    pub async fn continue_to_step_two(&self) -> E2eResult<()> {
        self.session.follow(CONTINUE_BUTTON, Transition::Continue).await?;
        self.session.wait_visible(SUMMARY_CONTAINER).await
    }

    /// Back to the cart
    pub async fn cancel(&self) -> E2eResult<()> {
        self.session.follow(CANCEL_BUTTON, Transition::CancelInfo).await?;
        Ok(())
    }

    pub async fn is_error_visible(&self) -> E2eResult<bool> {
        self.driver().is_visible(ERROR_MESSAGE).await
    }

    pub async fn error_message(&self) -> E2eResult<Option<String>> {
        self.driver().text_content(ERROR_MESSAGE).await
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
    use crate::error::E2eError;
    use crate::pages::testing::logged_in;
    use test_case::test_case;

    async fn at_step_one(persona: Persona) -> Session {
        let session = logged_in(persona).await;
        session.inventory().add_product_to_cart("Sauce Labs Backpack").await.unwrap();
        session.inventory().go_to_cart().await.unwrap();
        session.cart().checkout().await.unwrap();
        session
    }

    #[test_case("", "", "", "Error: First Name is required")]
    #[test_case("John", "", "", "Error: Last Name is required")]
    #[test_case("John", "Doe", "", "Error: Postal Code is required")]
    #[tokio::test]
    async fn test_missing_fields(first: &str, last: &str, postal: &str, message: &str) {
        let session = at_step_one(Persona::Standard).await;
        let page = session.checkout_step_one();
        page.fill_info(first, last, postal).await.unwrap();
        page.submit().await.unwrap();

        assert!(page.is_error_visible().await.unwrap());
        assert_eq!(page.error_message().await.unwrap().as_deref(), Some(message));
        assert!(page.is_loaded().await.unwrap());
    }

    #[tokio::test]
    async fn test_form_is_empty_when_shown_again() {
        let session = at_step_one(Persona::Standard).await;
        let page = session.checkout_step_one();
        page.fill_info("John", "Doe", "12345").await.unwrap();
        page.cancel().await.unwrap();

        session.cart().checkout().await.unwrap();
        page.submit().await.unwrap();
        assert_eq!(
            page.error_message().await.unwrap().as_deref(),
            Some("Error: First Name is required")
        );
        assert!(page.is_loaded().await.unwrap());

        page.fill_info("John", "Doe", "12345").await.unwrap();
        session.goto(SitePath::CheckoutStepOne).await.unwrap();
        assert!(!page.is_error_visible().await.unwrap());
        page.submit().await.unwrap();
        assert_eq!(
            page.error_message().await.unwrap().as_deref(),
            Some("Error: First Name is required")
        );
    }

    #[tokio::test]
    async fn test_continue_and_cancel() {
        let session = at_step_one(Persona::Standard).await;
        let page = session.checkout_step_one();
        page.cancel().await.unwrap();
        assert!(session.cart().is_loaded().await.unwrap());

        session.cart().checkout().await.unwrap();
        page.fill_info("John", "Doe", "12345").await.unwrap();
        page.continue_to_step_two().await.unwrap();
        assert!(session.checkout_step_two().is_loaded().await.unwrap());
    }

    #[tokio::test]
    async fn test_problem_user_cannot_continue() {
        let session = at_step_one(Persona::Problem).await;
        let page = session.checkout_step_one();
        page.fill_info("John", "Doe", "12345").await.unwrap();

        let err = page.continue_to_step_two().await.unwrap_err();
        assert!(matches!(err, E2eError::Timeout(_)));
        assert_eq!(
            page.error_message().await.unwrap().as_deref(),
            Some("Error: Last Name is required")
        );
    }
}
