//! Adding to and removing from the cart

use futures::FutureExt;

use crate::config::Persona;
use crate::error::E2eResult;
use crate::expect;
use crate::flow::SitePath;
use crate::locator::{data_test, slug};
use crate::pages::inventory::CART_BADGE;
use crate::session::Session;

use super::{add_products, login, Scenario};

const SUITE: &str = "cart";

const THREE_PRODUCTS: [&str; 3] = ["Sauce Labs Backpack", "Sauce Labs Bike Light", "Sauce Labs Bolt T-Shirt"];

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new("add product to cart", SUITE, &["cart", "smoke"], |s| add_product(s).boxed()),
        Scenario::new("remove product from cart", SUITE, &["cart"], |s| remove_product(s).boxed()),
        Scenario::new("add multiple products to cart", SUITE, &["cart"], |s| add_multiple(s).boxed()),
        Scenario::new("problem user cart operations", SUITE, &["cart", "problem"], |s| problem_user_cart(s).boxed()),
        Scenario::new("reset app state empties cart", SUITE, &["cart"], |s| reset_app_state(s).boxed()),
    ]
}

async fn add_product(session: Session) -> E2eResult<()> {
    login(&session, Persona::Standard).await?;
    let inventory = session.inventory();
    let product = "Sauce Labs Backpack";
    let expect = session.expect();

    expect::equal("cart count", 0, inventory.cart_count().await?)?;
    expect.to_be_visible(&data_test(&format!("add-to-cart-{}", slug(product)))).await?;

    inventory.add_product_to_cart(product).await?;
    expect::equal("cart count", 1, inventory.cart_count().await?)?;
    expect.to_be_visible(&data_test(&format!("remove-{}", slug(product)))).await?;
    expect.to_be_visible(".shopping_cart_badge").await?;
    expect.to_have_text(".shopping_cart_badge", "1").await?;

    inventory.go_to_cart().await?;
    let cart = session.cart();
    cart.is_loaded().await?;
    expect::is_true("cart has backpack", cart.has_item(product).await?)?;
    expect::equal("cart rows", 1, cart.item_count().await?)?;
    expect.to_be_visible(&format!(r#".inventory_item_name:has-text("{}")"#, product)).await?;

    cart.continue_shopping().await?;
    expect.to_have_url(&session.url_for(SitePath::Inventory)).await
}

async fn remove_product(session: Session) -> E2eResult<()> {
    login(&session, Persona::Standard).await?;
    let inventory = session.inventory();
    let product = "Sauce Labs Bike Light";
    let expect = session.expect();

    expect::equal("cart count", 0, inventory.cart_count().await?)?;
    inventory.add_product_to_cart(product).await?;
    expect::equal("cart count", 1, inventory.cart_count().await?)?;

    inventory.go_to_cart().await?;
    let cart = session.cart();
    cart.is_loaded().await?;
    expect::is_true("cart has bike light", cart.has_item(product).await?)?;
    expect.to_be_visible(&data_test(&format!("remove-{}", slug(product)))).await?;

    cart.remove_item(product).await?;
    expect::equal("cart rows", 0, cart.item_count().await?)?;
    expect::is_true("bike light removed", !cart.has_item(product).await?)?;
    expect.to_be_hidden(CART_BADGE).await?;

    cart.continue_shopping().await?;
    expect.to_have_url(&session.url_for(SitePath::Inventory)).await
}

async fn add_multiple(session: Session) -> E2eResult<()> {
    login(&session, Persona::Standard).await?;
    add_products(&session, &THREE_PRODUCTS).await?;
    expect::equal("cart count", THREE_PRODUCTS.len(), session.inventory().cart_count().await?)?;

    session.inventory().go_to_cart().await?;
    let cart = session.cart();
    cart.is_loaded().await?;
    for product in THREE_PRODUCTS {
        expect::is_true(&format!("cart has {}", product), cart.has_item(product).await?)?;
    }
    expect::equal("cart rows", THREE_PRODUCTS.len(), cart.item_count().await?)
}

/// Logs out of a standard session first, then shops as the problem persona
async fn problem_user_cart(session: Session) -> E2eResult<()> {
    login(&session, Persona::Standard).await?;
    session.inventory().logout().await?;
    login(&session, Persona::Problem).await?;

    let inventory = session.inventory();
    inventory.add_product_to_cart("Sauce Labs Backpack").await?;
    expect::equal("cart count", 1, inventory.cart_count().await?)?;

    inventory.go_to_cart().await?;
    let cart = session.cart();
    cart.is_loaded().await?;
    expect::greater_than("cart rows", 0, cart.item_count().await?)
}

async fn reset_app_state(session: Session) -> E2eResult<()> {
    login(&session, Persona::Standard).await?;
    add_products(&session, &THREE_PRODUCTS[..2]).await?;
    expect::equal("cart count", 2, session.inventory().cart_count().await?)?;

    session.inventory().reset_app_state().await?;
    session.expect().to_be_hidden(CART_BADGE).await?;
    expect::equal("cart count", 0, session.inventory().cart_count().await?)
}
