//! Side menu, sorting and page-to-page navigation

use futures::FutureExt;

use crate::config::Persona;
use crate::error::{E2eError, E2eResult};
use crate::expect;
use crate::flow::{PageState, SitePath};
use crate::pages::SortOrder;
use crate::session::Session;

use super::{add_products, checkout_to_review, login, Scenario, CUSTOMER};

const SUITE: &str = "navigation";

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new("logout from every page", SUITE, &["navigation", "menu"], |s| logout_everywhere(s).boxed()),
        Scenario::new("sort products", SUITE, &["navigation", "inventory"], |s| sort_products(s).boxed()),
        Scenario::new("all items from checkout overview", SUITE, &["navigation", "menu"], |s| all_items(s).boxed()),
        Scenario::new("purchase walks the page states", SUITE, &["navigation", "smoke"], |s| page_states(s).boxed()),
        Scenario::new("about leaves the shop", SUITE, &["navigation", "menu", "external"], |s| about(s).boxed()),
    ]
}

async fn expect_state(session: &Session, expected: PageState) -> E2eResult<()> {
    expect::equal("page state", Some(expected), session.current_state().await?)
}

async fn logout_everywhere(session: Session) -> E2eResult<()> {
    let pages = [
        SitePath::Inventory,
        SitePath::Cart,
        SitePath::CheckoutStepOne,
        SitePath::CheckoutStepTwo,
        SitePath::CheckoutComplete,
    ];
    for path in pages {
        login(&session, Persona::Standard).await?;
        session.goto(path).await?;
        expect_state(&session, PageState::from_path(path)).await?;

        session.menu().logout().await?;
        session.login_page().is_loaded().await?;
        expect_state(&session, PageState::LoggedOut).await?;
    }
    Ok(())
}

async fn sort_products(session: Session) -> E2eResult<()> {
    login(&session, Persona::Standard).await?;
    let inventory = session.inventory();

    for order in SortOrder::ALL {
        inventory.sort_products(order).await?;
        let sorted = match order {
            SortOrder::NameAsc | SortOrder::NameDesc => {
                let names = inventory.product_names().await?;
                let mut expected = names.clone();
                expected.sort();
                if order == SortOrder::NameDesc {
                    expected.reverse();
                }
                names == expected
            }
            SortOrder::PriceAsc => inventory.product_prices().await?.windows(2).all(|w| w[0] <= w[1]),
            SortOrder::PriceDesc => inventory.product_prices().await?.windows(2).all(|w| w[0] >= w[1]),
        };
        expect::is_true(&format!("products sorted by {}", order.label()), sorted)?;
    }
    Ok(())
}

async fn all_items(session: Session) -> E2eResult<()> {
    login(&session, Persona::Standard).await?;
    add_products(&session, &["Sauce Labs Fleece Jacket"]).await?;
    session.inventory().go_to_cart().await?;
    checkout_to_review(&session, CUSTOMER).await?;

    session.checkout_step_two().all_items().await?;
    session.inventory().is_loaded().await?;
    expect::equal("cart count", 1, session.inventory().cart_count().await?)
}

async fn page_states(session: Session) -> E2eResult<()> {
    login(&session, Persona::Standard).await?;
    expect_state(&session, PageState::Inventory).await?;

    add_products(&session, &["Sauce Labs Bike Light"]).await?;
    session.inventory().go_to_cart().await?;
    expect_state(&session, PageState::Cart).await?;

    session.cart().checkout().await?;
    expect_state(&session, PageState::CheckoutInfo).await?;

    let step_one = session.checkout_step_one();
    step_one.fill_info(CUSTOMER.0, CUSTOMER.1, CUSTOMER.2).await?;
    step_one.continue_to_step_two().await?;
    expect_state(&session, PageState::CheckoutReview).await?;

    session.checkout_step_two().finish().await?;
    let state = session
        .current_state()
        .await?
        .ok_or_else(|| E2eError::assertion("page state", PageState::CheckoutComplete, "off site"))?;
    expect::is_true("checkout complete is terminal", state.is_terminal())?;

    session.checkout_complete().back_to_home().await?;
    expect_state(&session, PageState::Inventory).await
}

async fn about(session: Session) -> E2eResult<()> {
    login(&session, Persona::Standard).await?;
    session.menu().about().await?;

    let url = session.driver().url().await?;
    expect::equal("page state", None, session.current_state().await?)?;
    expect::contains("about URL", &url, "saucelabs.com")
}
