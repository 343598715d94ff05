//! One browser session and the page objects bound to it

use std::sync::Arc;
use tracing::debug;

use crate::config::SuiteConfig;
use crate::driver::{Driver, LoadState, WaitState};
use crate::error::{E2eError, E2eResult};
use crate::expect::Expect;
use crate::flow::{PageState, SitePath, Transition};
use crate::pages::{
    CartPage, CheckoutCompletePage, CheckoutStepOnePage, CheckoutStepTwoPage, InventoryPage, LoginPage,
    SideMenu,
};

/// A live page plus the suite configuration
///
/// Cloning is cheap and every clone drives the same page.
#[derive(Clone)]
pub struct Session {
    driver: Arc<dyn Driver>,
    config: Arc<SuiteConfig>,
}

impl Session {
    pub fn new(driver: Arc<dyn Driver>, config: Arc<SuiteConfig>) -> Self {
        Self { driver, config }
    }

    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    pub fn url_for(&self, path: SitePath) -> String {
        path.url(&self.config.base_url)
    }

    /// Expectations with the configured timeout and poll interval
    pub fn expect(&self) -> Expect<'_> {
        Expect::new(
            self.driver.as_ref(),
            self.config.expect_timeout,
            self.config.poll_interval,
        )
    }

    /// Page the browser is on, `None` when it is off the shop
    pub async fn current_state(&self) -> E2eResult<Option<PageState>> {
        let url = self.driver.url().await?;
        Ok(SitePath::from_url(&url, &self.config.base_url).map(PageState::from_path))
    }

    /// Navigate to a shop page and wait for network idle
    pub async fn goto(&self, path: SitePath) -> E2eResult<()> {
        self.driver.goto(&self.url_for(path)).await?;
        self.driver.wait_for_load_state(LoadState::NetworkIdle).await
    }

    pub async fn wait_visible(&self, selector: &str) -> E2eResult<()> {
        self.driver
            .wait_for_selector(selector, WaitState::Visible, self.config.action_timeout)
            .await
    }

    pub async fn wait_for_path(&self, path: SitePath) -> E2eResult<()> {
        self.driver
            .wait_for_url(&self.url_for(path), self.config.action_timeout)
            .await
    }

    /// Click `selector` and wait for the page `transition` leads to
    pub async fn follow(&self, selector: &str, transition: Transition) -> E2eResult<PageState> {
        let from = match self.current_state().await? {
            Some(state) => state,
            None => {
                return Err(E2eError::InvalidTransition {
                    from: self.driver.url().await?,
                    action: format!("{:?}", transition),
                })
            }
        };
        let to = from.apply(transition)?;
        debug!("{} -> {} via {:?}", from, to, transition);

        self.driver.click(selector).await?;
        self.wait_for_path(to.path()).await?;
        Ok(to)
    }

    pub fn login_page(&self) -> LoginPage {
        LoginPage::new(self.clone())
    }

    pub fn inventory(&self) -> InventoryPage {
        InventoryPage::new(self.clone())
    }

    pub fn cart(&self) -> CartPage {
        CartPage::new(self.clone())
    }

    pub fn checkout_step_one(&self) -> CheckoutStepOnePage {
        CheckoutStepOnePage::new(self.clone())
    }

    pub fn checkout_step_two(&self) -> CheckoutStepTwoPage {
        CheckoutStepTwoPage::new(self.clone())
    }

    pub fn checkout_complete(&self) -> CheckoutCompletePage {
        CheckoutCompletePage::new(self.clone())
    }

    pub fn menu(&self) -> SideMenu {
        SideMenu::new(self.clone())
    }

    pub async fn close(&self) -> E2eResult<()> {
        self.driver.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedSite;

    fn session() -> Session {
        Session::new(Arc::new(SimulatedSite::default()), Arc::new(SuiteConfig::default()))
    }

    #[tokio::test]
    async fn test_current_state_tracks_url() {
        let session = session();
        assert_eq!(session.current_state().await.unwrap(), None);

        session.goto(SitePath::Root).await.unwrap();
        assert_eq!(session.current_state().await.unwrap(), Some(PageState::LoggedOut));
    }

    #[tokio::test]
    async fn test_follow_rejects_invalid_transition() {
        let session = session();
        session.goto(SitePath::Root).await.unwrap();

        let err = session.follow("#login-button", Transition::Checkout).await.unwrap_err();
        assert!(matches!(err, E2eError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_follow_off_site_is_invalid() {
        let session = session();
        let err = session.follow("#login-button", Transition::Login).await.unwrap_err();
        assert!(matches!(err, E2eError::InvalidTransition { .. }));
    }
}
