//! Login form at the site root

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Persona;
use crate::driver::{Driver, LoadState, WaitState};
use crate::error::E2eResult;
use crate::flow::SitePath;
use crate::session::Session;

pub const USERNAME_INPUT: &str = "#user-name";
pub const PASSWORD_INPUT: &str = "#password";
pub const LOGIN_BUTTON: &str = "#login-button";
pub const ERROR_CONTAINER: &str = ".error-message-container";
pub const ERROR_MESSAGE: &str = r#"[data-test="error"]"#;
pub const ERROR_BUTTON: &str = r#"[data-test="error-button"]"#;
pub const INVENTORY_CONTAINER: &str = ".inventory_container";

/// How a login attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoginOutcome {
    /// The inventory listing rendered
    LoggedIn,
    /// The error banner is showing; read it with [`LoginPage::error_message`]
    Rejected,
}

pub struct LoginPage {
    session: Session,
}

impl LoginPage {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    fn driver(&self) -> &dyn Driver {
        self.session.driver()
    }

    pub async fn open(&self) -> E2eResult<()> {
        self.session.goto(SitePath::Root).await?;
        self.session.wait_visible(USERNAME_INPUT).await?;
        self.session.wait_visible(PASSWORD_INPUT).await
    }

    pub async fn is_loaded(&self) -> E2eResult<bool> {
        let expect = self.session.expect();
        expect.to_have_url(&self.session.url_for(SitePath::Root)).await?;
        expect.to_be_visible(LOGIN_BUTTON).await?;
        Ok(true)
    }

    /// Submit the form from a fresh root page
    ///
    /// A visible error banner is reported as [`LoginOutcome::Rejected`]
    /// without asserting anything. Otherwise the inventory must render within
    /// the login timeout.
    pub async fn login(&self, username: &str, password: &str) -> E2eResult<LoginOutcome> {
        self.open().await?;
        self.driver().fill(USERNAME_INPUT, username).await?;
        self.driver().fill(PASSWORD_INPUT, password).await?;
        self.driver().click(LOGIN_BUTTON).await?;
        self.driver().wait_for_load_state(LoadState::NetworkIdle).await?;

        let rejected = match self.driver().is_visible(ERROR_CONTAINER).await {
            Ok(visible) => visible,
            Err(e) => {
                debug!("Error banner lookup failed, treating as absent: {}", e);
                false
            }
        };
        if rejected {
            info!("Login rejected for {:?}", username);
            return Ok(LoginOutcome::Rejected);
        }

        self.driver()
            .wait_for_selector(INVENTORY_CONTAINER, WaitState::Visible, self.session.config().login_timeout)
            .await?;
        self.session
            .expect()
            .to_have_url(&self.session.url_for(SitePath::Inventory))
            .await?;
        debug!("Logged in as {}", username);
        Ok(LoginOutcome::LoggedIn)
    }

    pub async fn login_as(&self, persona: Persona) -> E2eResult<LoginOutcome> {
        let credentials = self.session.config().credentials(persona).clone();
        self.login(&credentials.username, &credentials.password).await
    }

    pub async fn is_error_visible(&self) -> E2eResult<bool> {
        self.driver().is_visible(ERROR_MESSAGE).await
    }

    pub async fn error_message(&self) -> E2eResult<Option<String>> {
        self.driver().text_content(ERROR_MESSAGE).await
    }

    pub async fn dismiss_error(&self) -> E2eResult<()> {
        self.driver().click(ERROR_BUTTON).await?;
        self.driver()
            .wait_for_selector(ERROR_MESSAGE, WaitState::Hidden, self.session.config().action_timeout)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::testing::sim_session;
    use test_case::test_case;

    #[test_case(Persona::Standard)]
    #[test_case(Persona::Problem)]
    #[test_case(Persona::PerformanceGlitch)]
    #[test_case(Persona::Error)]
    #[test_case(Persona::Visual)]
    #[tokio::test]
    async fn test_valid_personas_reach_inventory(persona: Persona) {
        let session = sim_session();
        let outcome = session.login_page().login_as(persona).await.unwrap();
        assert_eq!(outcome, LoginOutcome::LoggedIn);
        assert_eq!(
            session.driver().url().await.unwrap(),
            "https://www.saucedemo.com/inventory.html"
        );
    }

    #[test_case("locked_out_user", "secret_sauce", "Epic sadface: Sorry, this user has been locked out.")]
    #[test_case("locked_out_user", "wrong_password", "Epic sadface: Username and password do not match any user in this service")]
    #[test_case("standard_user", "wrong_password", "Epic sadface: Username and password do not match any user in this service")]
    #[test_case("", "secret_sauce", "Epic sadface: Username is required")]
    #[test_case("standard_user", "", "Epic sadface: Password is required")]
    #[test_case("", "", "Epic sadface: Username is required")]
    #[tokio::test]
    async fn test_rejected_logins(username: &str, password: &str, message: &str) {
        let session = sim_session();
        let page = session.login_page();
        assert_eq!(page.login(username, password).await.unwrap(), LoginOutcome::Rejected);
        assert!(page.is_error_visible().await.unwrap());
        assert_eq!(page.error_message().await.unwrap().as_deref(), Some(message));
        assert!(page.is_loaded().await.unwrap());
    }

    #[tokio::test]
    async fn test_dismiss_error() {
        let session = sim_session();
        let page = session.login_page();
        page.login("", "").await.unwrap();
        page.dismiss_error().await.unwrap();
        assert!(!page.is_error_visible().await.unwrap());
    }
}
