//! Order confirmation

use serde::{Deserialize, Serialize};

use crate::driver::Driver;
use crate::error::E2eResult;
use crate::flow::{SitePath, Transition};
use crate::session::Session;

use super::menu::SideMenu;
use super::{assert_loaded, open_page, read_text, TITLE};

pub const COMPLETE_CONTAINER: &str = "#checkout_complete_container";
pub const PONY_EXPRESS_IMAGE: &str = ".pony_express";
pub const COMPLETE_HEADER: &str = ".complete-header";
pub const COMPLETE_TEXT: &str = ".complete-text";
pub const BACK_HOME_BUTTON: &str = r#"[data-test="back-to-products"]"#;
pub const FOOTER: &str = ".footer";
pub const FOOTER_COPY: &str = ".footer_copy";

/// Social links in the page footer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocialLink {
    Twitter,
    Facebook,
    LinkedIn,
}

impl SocialLink {
    pub fn selector(&self) -> &'static str {
        match self {
            SocialLink::Twitter => ".social_twitter",
            SocialLink::Facebook => ".social_facebook",
            SocialLink::LinkedIn => ".social_linkedin",
        }
    }
}

pub struct CheckoutCompletePage {
    session: Session,
}

impl CheckoutCompletePage {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    fn driver(&self) -> &dyn Driver {
        self.session.driver()
    }

    pub async fn open(&self) -> E2eResult<()> {
        open_page(&self.session, SitePath::CheckoutComplete, COMPLETE_CONTAINER).await
    }

    pub async fn is_loaded(&self) -> E2eResult<bool> {
        assert_loaded(&self.session, SitePath::CheckoutComplete, COMPLETE_CONTAINER).await
    }

    pub async fn title(&self) -> E2eResult<String> {
        read_text(&self.session, TITLE).await
    }

    pub async fn complete_header(&self) -> E2eResult<String> {
        read_text(&self.session, COMPLETE_HEADER).await
    }

    pub async fn complete_text(&self) -> E2eResult<String> {
        read_text(&self.session, COMPLETE_TEXT).await
    }

    pub async fn is_pony_express_visible(&self) -> E2eResult<bool> {
        self.driver().is_visible(PONY_EXPRESS_IMAGE).await
    }

    pub async fn back_to_home(&self) -> E2eResult<()> {
        self.session.follow(BACK_HOME_BUTTON, Transition::BackHome).await?;
        Ok(())
    }

    pub async fn is_footer_visible(&self) -> E2eResult<bool> {
        self.driver().is_visible(FOOTER).await
    }

    pub async fn footer_copy(&self) -> E2eResult<String> {
        read_text(&self.session, FOOTER_COPY).await
    }

    pub async fn click_social(&self, link: SocialLink) -> E2eResult<()> {
        self.driver().click(link.selector()).await
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

    pub async fn about(&self) -> E2eResult<()> {
        self.menu().about().await
    }
}
