//! Checkout information form and the overview

use futures::FutureExt;
use tracing::warn;

use crate::config::Persona;
use crate::error::E2eResult;
use crate::expect;
use crate::flow::SitePath;
use crate::pages::checkout_step_one::ERROR_MESSAGE;
use crate::session::Session;

use super::{add_products, checkout_to_review, login, Scenario, CUSTOMER};

const SUITE: &str = "checkout";
const PRODUCT: &str = "Sauce Labs Backpack";

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new("complete checkout with valid information", SUITE, &["checkout", "smoke"], |s| {
            valid_checkout(s).boxed()
        }),
        Scenario::new("checkout with missing information shows error", SUITE, &["checkout"], |s| {
            missing_information(s).boxed()
        }),
        Scenario::new("cancel checkout returns to cart", SUITE, &["checkout"], |s| cancel_information(s).boxed()),
        Scenario::new("cancel overview returns to inventory", SUITE, &["checkout"], |s| cancel_overview(s).boxed()),
        Scenario::new("checkout with problem_user", SUITE, &["checkout", "problem"], |s| problem_user(s).boxed()),
    ]
}

/// Logged in with the backpack in the cart and the cart open
async fn backpack_in_cart(session: &Session, persona: Persona) -> E2eResult<()> {
    login(session, persona).await?;
    add_products(session, &[PRODUCT]).await?;
    session.inventory().go_to_cart().await?;
    session.cart().is_loaded().await?;
    Ok(())
}

async fn valid_checkout(session: Session) -> E2eResult<()> {
    backpack_in_cart(&session, Persona::Standard).await?;
    let cart = session.cart();
    expect::equal("cart rows", 1, cart.item_count().await?)?;
    cart.checkout().await?;

    let step_one = session.checkout_step_one();
    step_one.is_loaded().await?;
    step_one.fill_info(CUSTOMER.0, CUSTOMER.1, CUSTOMER.2).await?;
    step_one.continue_to_step_two().await?;

    let step_two = session.checkout_step_two();
    step_two.is_loaded().await?;
    expect::is_true("overview has backpack", step_two.has_item(PRODUCT).await?)?;
    let totals = step_two.totals().await?;
    expect::close_to("total", totals.subtotal + totals.tax, totals.total, 2)?;

    step_two.finish().await?;
    let complete = session.checkout_complete();
    complete.is_loaded().await?;
    expect::contains("complete header", &complete.complete_header().await?, "Thank you")?;

    complete.back_to_home().await?;
    session.expect().to_have_url(&session.url_for(SitePath::Inventory)).await
}

async fn missing_information(session: Session) -> E2eResult<()> {
    backpack_in_cart(&session, Persona::Standard).await?;
    session.cart().checkout().await?;

    let step_one = session.checkout_step_one();
    step_one.is_loaded().await?;
    let expect = session.expect();

    step_one.submit().await?;
    expect.to_be_visible(ERROR_MESSAGE).await?;
    expect.to_contain_text(ERROR_MESSAGE, "First Name is required").await?;

    step_one.fill_info("John", "", "").await?;
    step_one.submit().await?;
    expect.to_contain_text(ERROR_MESSAGE, "Last Name is required").await?;

    step_one.fill_info("John", "Doe", "").await?;
    step_one.submit().await?;
    expect.to_contain_text(ERROR_MESSAGE, "Postal Code is required").await?;

    step_one.fill_info(CUSTOMER.0, CUSTOMER.1, CUSTOMER.2).await?;
    step_one.continue_to_step_two().await?;
    session.checkout_step_two().is_loaded().await?;
    Ok(())
}

async fn cancel_information(session: Session) -> E2eResult<()> {
    backpack_in_cart(&session, Persona::Standard).await?;
    session.cart().checkout().await?;

    let step_one = session.checkout_step_one();
    step_one.is_loaded().await?;
    step_one.cancel().await?;

    let cart = session.cart();
    cart.is_loaded().await?;
    expect::equal("cart rows", 1, cart.item_count().await?)
}

async fn cancel_overview(session: Session) -> E2eResult<()> {
    login(&session, Persona::Standard).await?;
    add_products(&session, &[PRODUCT]).await?;
    session.inventory().go_to_cart().await?;
    checkout_to_review(&session, CUSTOMER).await?;

    session.checkout_step_two().cancel().await?;
    session.inventory().is_loaded().await?;
    expect::equal("cart count", 1, session.inventory().cart_count().await?)
}

/// The problem persona's form is broken; reaching the overview is not required
async fn problem_user(session: Session) -> E2eResult<()> {
    login(&session, Persona::Standard).await?;
    session.inventory().logout().await?;
    backpack_in_cart(&session, Persona::Problem).await?;

    session.cart().checkout().await?;
    let step_one = session.checkout_step_one();
    step_one.is_loaded().await?;

    let attempt = async {
        step_one.fill_info(CUSTOMER.0, CUSTOMER.1, CUSTOMER.2).await?;
        step_one.continue_to_step_two().await
    };
    if let Err(e) = attempt.await {
        warn!("problem_user blocked on the checkout form: {}", e);
    }
    Ok(())
}
