//! Full purchases through to the confirmation page

use futures::FutureExt;

use crate::config::Persona;
use crate::error::E2eResult;
use crate::expect;
use crate::flow::SitePath;
use crate::pages::checkout_complete::COMPLETE_CONTAINER;
use crate::session::Session;

use super::{add_products, checkout_to_review, login, Scenario};

const SUITE: &str = "payment";
const CUSTOMER: (&str, &str, &str) = ("Ivan", "Maxim", "777777");

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new("complete purchase with specific customer data", SUITE, &["payment", "smoke"], |s| {
            single_item(s).boxed()
        }),
        Scenario::new("complete purchase with multiple items", SUITE, &["payment"], |s| multiple_items(s).boxed()),
        Scenario::new("confirmation page details", SUITE, &["payment"], |s| confirmation_details(s).boxed()),
    ]
}

/// Buy `products` and check the overview and confirmation along the way
async fn purchase(session: &Session, products: &[&str]) -> E2eResult<()> {
    login(session, Persona::Standard).await?;
    session.expect().to_have_url(&session.url_for(SitePath::Inventory)).await?;

    add_products(session, products).await?;
    expect::equal("cart count", products.len(), session.inventory().cart_count().await?)?;

    session.inventory().go_to_cart().await?;
    let cart = session.cart();
    cart.is_loaded().await?;
    for product in products {
        expect::is_true(&format!("cart has {}", product), cart.has_item(product).await?)?;
    }

    checkout_to_review(session, CUSTOMER).await?;
    let step_two = session.checkout_step_two();
    for product in products {
        expect::is_true(&format!("overview has {}", product), step_two.has_item(product).await?)?;
    }
    let subtotal = step_two.subtotal().await?;
    let tax = step_two.tax().await?;
    let total = step_two.total().await?;
    expect::close_to("total", subtotal + tax, total, 2)?;

    step_two.finish().await?;
    let complete = session.checkout_complete();
    complete.is_loaded().await?;
    session.expect().to_be_visible(COMPLETE_CONTAINER).await?;
    expect::contains("complete header", &complete.complete_header().await?, "Thank you")?;

    complete.back_to_home().await?;
    session.expect().to_have_url(&session.url_for(SitePath::Inventory)).await
}

async fn single_item(session: Session) -> E2eResult<()> {
    purchase(&session, &["Sauce Labs Backpack"]).await
}

async fn multiple_items(session: Session) -> E2eResult<()> {
    purchase(
        &session,
        &["Sauce Labs Backpack", "Sauce Labs Bike Light", "Sauce Labs Bolt T-Shirt"],
    )
    .await
}

async fn confirmation_details(session: Session) -> E2eResult<()> {
    login(&session, Persona::Standard).await?;
    add_products(&session, &["Sauce Labs Onesie"]).await?;
    session.inventory().go_to_cart().await?;
    checkout_to_review(&session, CUSTOMER).await?;

    let step_two = session.checkout_step_two();
    expect::equal("overview title", "Checkout: Overview".to_string(), step_two.title().await?)?;
    expect::contains("payment info", &step_two.payment_info().await?, "SauceCard")?;
    expect::contains("shipping info", &step_two.shipping_info().await?, "Pony Express")?;
    expect::is_true("totals add up", step_two.totals().await?.is_consistent())?;
    step_two.finish().await?;

    let complete = session.checkout_complete();
    expect::equal("complete title", "Checkout: Complete!".to_string(), complete.title().await?)?;
    expect::is_true("pony express visible", complete.is_pony_express_visible().await?)?;
    expect::is_true("footer visible", complete.is_footer_visible().await?)?;
    expect::contains("footer", &complete.footer_copy().await?, "Sauce Labs")?;
    expect::equal("cart count", 0, session.inventory().cart_count().await?)
}
