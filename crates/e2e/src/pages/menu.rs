//! Burger side menu shared by every logged-in page

use tracing::debug;

use crate::driver::{Driver, WaitState};
use crate::error::E2eResult;
use crate::flow::Transition;
use crate::session::Session;

pub const BURGER_BUTTON: &str = "#react-burger-menu-btn";
pub const CLOSE_BUTTON: &str = "#react-burger-cross-btn";
pub const ALL_ITEMS_LINK: &str = "#inventory_sidebar_link";
pub const ABOUT_LINK: &str = "#about_sidebar_link";
pub const LOGOUT_LINK: &str = "#logout_sidebar_link";
pub const RESET_LINK: &str = "#reset_sidebar_link";

pub struct SideMenu {
    session: Session,
}

impl SideMenu {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    fn driver(&self) -> &dyn Driver {
        self.session.driver()
    }

    pub async fn open(&self) -> E2eResult<()> {
        self.driver().click(BURGER_BUTTON).await?;
        self.session.wait_visible(LOGOUT_LINK).await
    }

    pub async fn close(&self) -> E2eResult<()> {
        self.driver().click(CLOSE_BUTTON).await?;
        self.driver()
            .wait_for_selector(LOGOUT_LINK, WaitState::Hidden, self.session.config().action_timeout)
            .await
    }

    pub async fn is_open(&self) -> E2eResult<bool> {
        self.driver().is_visible(LOGOUT_LINK).await
    }

    pub async fn logout(&self) -> E2eResult<()> {
        self.open().await?;
        self.session.follow(LOGOUT_LINK, Transition::Logout).await?;
        Ok(())
    }

    /// Empties the cart without leaving the page
    pub async fn reset_app_state(&self) -> E2eResult<()> {
        self.open().await?;
        self.driver().click(RESET_LINK).await?;
        debug!("App state reset");
        Ok(())
    }

    pub async fn all_items(&self) -> E2eResult<()> {
        self.open().await?;
        self.session.follow(ALL_ITEMS_LINK, Transition::AllItems).await?;
        Ok(())
    }

    /// Leaves the shop for the vendor's site
    pub async fn about(&self) -> E2eResult<()> {
        self.open().await?;
        self.driver().click(ABOUT_LINK).await?;
        self.driver().wait_for_load_state(Default::default()).await
    }
}
