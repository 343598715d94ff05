//! Page objects for the shop
//!
//! Each page object wraps one page's selectors behind named operations and
//! holds a [`Session`] clone, so page objects are cheap to construct and can be
//! created whenever a scenario needs them.

pub mod cart;
pub mod checkout_complete;
pub mod checkout_step_one;
pub mod checkout_step_two;
pub mod inventory;
pub mod login;
pub mod menu;

pub use cart::{CartLine, CartPage};
pub use checkout_complete::{CheckoutCompletePage, SocialLink};
pub use checkout_step_one::CheckoutStepOnePage;
pub use checkout_step_two::CheckoutStepTwoPage;
pub use inventory::{AddOutcome, InventoryPage, SortOrder};
pub use login::{LoginOutcome, LoginPage};
pub use menu::SideMenu;

use crate::error::{E2eError, E2eResult};
use crate::flow::SitePath;
use crate::session::Session;
use crate::totals::parse_amount;

/// Header title shared by the logged-in pages
pub const TITLE: &str = r#"[data-test="title"]"#;
pub const CART_LINK: &str = ".shopping_cart_link";

/// Navigate to `path` and wait for its container
async fn open_page(session: &Session, path: SitePath, container: &str) -> E2eResult<()> {
    session.goto(path).await?;
    session.wait_visible(container).await
}

/// Assert the browser is on `path` with `container` visible
async fn assert_loaded(session: &Session, path: SitePath, container: &str) -> E2eResult<bool> {
    let expect = session.expect();
    expect.to_have_url(&session.url_for(path)).await?;
    expect.to_be_visible(container).await?;
    Ok(true)
}

/// Text of the first match, trimmed
async fn read_text(session: &Session, selector: &str) -> E2eResult<String> {
    session
        .driver()
        .text_content(selector)
        .await?
        .map(|text| text.trim().to_string())
        .ok_or_else(|| E2eError::ElementNotFound(selector.to_string()))
}

async fn read_amount(session: &Session, selector: &str) -> E2eResult<f64> {
    parse_amount(&read_text(session, selector).await?)
}
