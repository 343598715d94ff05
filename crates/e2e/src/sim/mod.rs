//! In-process model of the demo shop
//!
//! [`SimulatedSite`] implements [`Driver`] over a rendered element tree, so the
//! page objects and scenarios run without a browser or network. It models the
//! login rules, the cart, the two-step checkout, the side menu and the quirks
//! of the problem and performance-glitch personas. Waits never block: a
//! condition that does not hold right away fails with a timeout error.

mod catalog;
mod dom;

use std::time::Duration;
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::config::{Persona, DEFAULT_BASE_URL, DEFAULT_PASSWORD};
use crate::driver::{Driver, LoadState, WaitState};
use crate::error::{E2eError, E2eResult};
use crate::flow::SitePath;
use crate::locator::slug;
use crate::pages::SortOrder;

use catalog::{round_cents, PRODUCTS, PROBLEM_USER_UNADDABLE, TAX_RATE};
pub use dom::{Document, Match, Node};

/// What a click on an element does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Click {
    Login,
    DismissError,
    AddToCart(usize),
    Remove(usize),
    OpenCart,
    ContinueShopping,
    Checkout,
    ContinueCheckout,
    CancelInfo,
    CancelReview,
    Finish,
    BackHome,
    OpenMenu,
    CloseMenu,
    AllItems,
    About,
    Logout,
    ResetAppState,
    Social,
}

/// Input an element writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Password,
    FirstName,
    LastName,
    PostalCode,
    Sort,
}

#[derive(Debug, Clone)]
pub struct SimOptions {
    /// Origin the simulated site answers on
    pub base_url: String,

    /// Extra login latency for the performance-glitch persona
    pub glitch_delay: Duration,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            glitch_delay: Duration::from_millis(200),
        }
    }
}

const ABOUT_URL: &str = "https://saucelabs.com/";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Location {
    Blank,
    Site(SitePath),
    NotFound(String),
    External(String),
}

#[derive(Debug, Default)]
struct CheckoutForm {
    first_name: String,
    last_name: String,
    postal_code: String,
}

#[derive(Debug)]
struct SiteState {
    location: Location,
    user: Option<Persona>,
    cart: Vec<usize>,
    menu_open: bool,
    username: String,
    password: String,
    login_error: Option<String>,
    checkout: CheckoutForm,
    checkout_error: Option<String>,
    sort: SortOrder,
    closed: bool,
}

/// Simulated browser page on the demo shop
pub struct SimulatedSite {
    options: SimOptions,
    state: Mutex<SiteState>,
}

impl Default for SimulatedSite {
    fn default() -> Self {
        Self::new(SimOptions::default())
    }
}

impl SimulatedSite {
    pub fn new(options: SimOptions) -> Self {
        Self {
            options,
            state: Mutex::new(SiteState::new()),
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut SiteState) -> E2eResult<T>) -> E2eResult<T> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(E2eError::Playwright(
                "Target page, context or browser has been closed".into(),
            ));
        }
        f(&mut state)
    }

    fn query<T>(&self, selector: &str, f: impl FnOnce(Vec<Match>) -> T) -> E2eResult<T> {
        self.with_state(|state| Ok(f(state.document().select(selector)?)))
    }

    /// First match, which must be visible for the action to proceed
    fn actionable(selector: &str, state: &SiteState) -> E2eResult<Match> {
        match state.document().select(selector)?.into_iter().next() {
            Some(m) if m.visible => Ok(m),
            Some(_) => Err(E2eError::Timeout(format!("locator('{}') to be visible", selector))),
            None => Err(E2eError::Timeout(format!("locator('{}')", selector))),
        }
    }
}

impl SiteState {
    fn new() -> Self {
        Self {
            location: Location::Blank,
            user: None,
            cart: Vec::new(),
            menu_open: false,
            username: String::new(),
            password: String::new(),
            login_error: None,
            checkout: CheckoutForm::default(),
            checkout_error: None,
            sort: SortOrder::default(),
            closed: false,
        }
    }

    fn url(&self, base_url: &str) -> String {
        match &self.location {
            Location::Blank => "about:blank".to_string(),
            Location::Site(path) => path.url(base_url),
            Location::NotFound(path) => format!("{}{}", base_url.trim_end_matches('/'), path),
            Location::External(url) => url.clone(),
        }
    }

    /// The information form mounts empty every time it is shown
    fn clear_checkout_form(&mut self) {
        self.checkout = CheckoutForm::default();
        self.checkout_error = None;
    }

    fn go(&mut self, path: SitePath) {
        self.menu_open = false;
        self.location = Location::Site(path);
    }

    fn navigate(&mut self, base_url: &str, url: &str) {
        let base_url = base_url.trim_end_matches('/');
        self.menu_open = false;

        let Some(rest) = url.strip_prefix(base_url) else {
            self.location = Location::External(url.to_string());
            return;
        };

        match SitePath::from_url(url, base_url) {
            None => self.location = Location::NotFound(rest.to_string()),
            Some(SitePath::Root) => {
                self.username.clear();
                self.password.clear();
                self.login_error = None;
                self.go(SitePath::Root);
            }
            Some(path) if self.user.is_none() => {
                self.go(SitePath::Root);
                self.login_error = Some(format!(
                    "Epic sadface: You can only access '{}' when you are logged in.",
                    path.as_str()
                ));
            }
            Some(path) => {
                if path == SitePath::CheckoutStepOne {
                    self.clear_checkout_form();
                }
                self.go(path);
            }
        }
    }

    /// Apply a click; returns extra latency the action incurs
    fn click(&mut self, click: Click, options: &SimOptions) -> Option<Duration> {
        debug!("sim click {:?} on {:?}", click, self.location);
        match click {
            Click::Login => match authenticate(&self.username, &self.password) {
                Ok(persona) => {
                    self.user = Some(persona);
                    self.login_error = None;
                    self.go(SitePath::Inventory);
                    if persona == Persona::PerformanceGlitch {
                        return Some(options.glitch_delay);
                    }
                }
                Err(message) => self.login_error = Some(message),
            },
            Click::DismissError => {
                self.login_error = None;
                self.checkout_error = None;
            }
            Click::AddToCart(index) => {
                let broken = self.user == Some(Persona::Problem) && PROBLEM_USER_UNADDABLE.contains(&index);
                if !broken && !self.cart.contains(&index) {
                    self.cart.push(index);
                }
            }
            Click::Remove(index) => self.cart.retain(|&i| i != index),
            Click::OpenCart => self.go(SitePath::Cart),
            Click::ContinueShopping | Click::BackHome | Click::AllItems | Click::CancelReview => {
                self.go(SitePath::Inventory)
            }
            Click::Checkout => {
                self.clear_checkout_form();
                self.go(SitePath::CheckoutStepOne);
            }
            Click::ContinueCheckout => {
                let form = &self.checkout;
                let missing = if form.first_name.is_empty() {
                    Some("First Name")
                } else if form.last_name.is_empty() {
                    Some("Last Name")
                } else if form.postal_code.is_empty() {
                    Some("Postal Code")
                } else {
                    None
                };
                match missing {
                    Some(field) => self.checkout_error = Some(format!("Error: {} is required", field)),
                    None => {
                        self.checkout_error = None;
                        self.go(SitePath::CheckoutStepTwo);
                    }
                }
            }
            Click::CancelInfo => self.go(SitePath::Cart),
            Click::Finish => {
                self.cart.clear();
                self.checkout = CheckoutForm::default();
                self.go(SitePath::CheckoutComplete);
            }
            Click::OpenMenu => self.menu_open = true,
            Click::CloseMenu => self.menu_open = false,
            Click::About => {
                self.menu_open = false;
                self.location = Location::External(ABOUT_URL.to_string());
            }
            Click::Logout => {
                self.user = None;
                self.cart.clear();
                self.clear_checkout_form();
                self.username.clear();
                self.password.clear();
                self.login_error = None;
                self.go(SitePath::Root);
            }
            Click::ResetAppState => {
                self.cart.clear();
                self.sort = SortOrder::default();
            }
            Click::Social => {}
        }
        None
    }

    fn fill(&mut self, field: Field, value: &str) -> E2eResult<()> {
        let value = value.to_string();
        match field {
            Field::Username => self.username = value,
            Field::Password => self.password = value,
            // The problem persona's last-name input writes into the first name.
            Field::LastName if self.user == Some(Persona::Problem) => self.checkout.first_name = value,
            Field::FirstName => self.checkout.first_name = value,
            Field::LastName => self.checkout.last_name = value,
            Field::PostalCode => self.checkout.postal_code = value,
            Field::Sort => {
                return Err(E2eError::Playwright(
                    "Error: Element is not an <input>, <textarea> or [contenteditable] element".into(),
                ))
            }
        }
        Ok(())
    }

    fn sorted_products(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..PRODUCTS.len()).collect();
        match self.sort {
            SortOrder::NameAsc => order.sort_by(|&a, &b| PRODUCTS[a].name.cmp(PRODUCTS[b].name)),
            SortOrder::NameDesc => order.sort_by(|&a, &b| PRODUCTS[b].name.cmp(PRODUCTS[a].name)),
            SortOrder::PriceAsc => order.sort_by(|&a, &b| PRODUCTS[a].price.total_cmp(&PRODUCTS[b].price)),
            SortOrder::PriceDesc => order.sort_by(|&a, &b| PRODUCTS[b].price.total_cmp(&PRODUCTS[a].price)),
        }
        order
    }

    fn document(&self) -> Document {
        Document::render(&self.render())
    }

    fn render(&self) -> Node {
        let body = Node::new("body");
        match &self.location {
            Location::Blank => body,
            Location::External(_) => body.child(Node::new("h1").text("Sauce Labs")),
            Location::NotFound(path) => body.child(Node::new("h1").text(format!("Cannot GET {}", path))),
            Location::Site(SitePath::Root) => body.children(self.login_page()),
            Location::Site(path) => body.child(
                Node::new("div")
                    .id("page_wrapper")
                    .class("page_wrapper")
                    .children(self.header(*path))
                    .child(self.content(*path))
                    .child(footer()),
            ),
        }
    }

    fn login_page(&self) -> Vec<Node> {
        vec![
            Node::new("div").class("login_logo").text("Swag Labs"),
            Node::new("div").class("login_wrapper").child(
                Node::new("form").children([
                    Node::new("input")
                        .id("user-name")
                        .class("input_error form_input")
                        .data_test("username")
                        .field(Field::Username),
                    Node::new("input")
                        .id("password")
                        .class("input_error form_input")
                        .data_test("password")
                        .field(Field::Password),
                    error_container(self.login_error.as_deref()),
                    Node::new("input")
                        .id("login-button")
                        .class("submit-button btn_action")
                        .data_test("login-button")
                        .on_click(Click::Login),
                ]),
            ),
        ]
    }

    fn header(&self, path: SitePath) -> Vec<Node> {
        let title = match path {
            SitePath::Inventory => "Products",
            SitePath::Cart => "Your Cart",
            SitePath::CheckoutStepOne => "Checkout: Your Information",
            SitePath::CheckoutStepTwo => "Checkout: Overview",
            SitePath::CheckoutComplete => "Checkout: Complete!",
            SitePath::Root => "",
        };

        let menu = Node::new("div").class("bm-menu-wrap").visible(self.menu_open).children([
            Node::new("a").id("inventory_sidebar_link").class("bm-item menu-item").text("All Items").on_click(Click::AllItems),
            Node::new("a").id("about_sidebar_link").class("bm-item menu-item").text("About").on_click(Click::About),
            Node::new("a").id("logout_sidebar_link").class("bm-item menu-item").text("Logout").on_click(Click::Logout),
            Node::new("a").id("reset_sidebar_link").class("bm-item menu-item").text("Reset App State").on_click(Click::ResetAppState),
            Node::new("button").id("react-burger-cross-btn").text("Close Menu").on_click(Click::CloseMenu),
        ]);

        let mut cart_link = Node::new("a")
            .class("shopping_cart_link")
            .data_test("shopping-cart-link")
            .on_click(Click::OpenCart);
        if !self.cart.is_empty() {
            cart_link = cart_link.child(
                Node::new("span")
                    .class("shopping_cart_badge")
                    .data_test("shopping-cart-badge")
                    .text(self.cart.len().to_string()),
            );
        }

        let mut secondary = Node::new("div")
            .class("header_secondary_container")
            .child(Node::new("span").class("title").data_test("title").text(title));
        if path == SitePath::Inventory {
            secondary = secondary.child(
                Node::new("select")
                    .class("product_sort_container")
                    .data_test("product-sort-container")
                    .text(self.sort.label())
                    .field(Field::Sort),
            );
        }

        vec![
            Node::new("div").class("primary_header").children([
                Node::new("div")
                    .id("menu_button_container")
                    .child(Node::new("button").id("react-burger-menu-btn").text("Open Menu").on_click(Click::OpenMenu))
                    .child(menu),
                Node::new("div").class("app_logo").text("Swag Labs"),
                Node::new("div")
                    .id("shopping_cart_container")
                    .class("shopping_cart_container")
                    .child(cart_link),
            ]),
            secondary,
        ]
    }

    fn content(&self, path: SitePath) -> Node {
        match path {
            SitePath::Inventory => Node::new("div")
                .id("inventory_container")
                .class("inventory_container")
                .child(
                    Node::new("div")
                        .class("inventory_list")
                        .children(self.sorted_products().into_iter().map(|i| self.inventory_item(i))),
                ),
            SitePath::Cart => Node::new("div")
                .id("cart_contents_container")
                .class("cart_contents_container")
                .children([
                    Node::new("div")
                        .class("cart_list")
                        .children(cart_labels())
                        .children(self.cart.iter().map(|&i| cart_item(i, true))),
                    Node::new("div").class("cart_footer").children([
                        Node::new("button")
                            .id("continue-shopping")
                            .class("btn btn_secondary back")
                            .data_test("continue-shopping")
                            .text("Continue Shopping")
                            .on_click(Click::ContinueShopping),
                        Node::new("button")
                            .id("checkout")
                            .class("btn btn_action checkout_button")
                            .data_test("checkout")
                            .text("Checkout")
                            .on_click(Click::Checkout),
                    ]),
                ]),
            SitePath::CheckoutStepOne => Node::new("div")
                .id("checkout_info_container")
                .class("checkout_info_container")
                .child(Node::new("form").children([
                    Node::new("input").id("first-name").data_test("firstName").field(Field::FirstName),
                    Node::new("input").id("last-name").data_test("lastName").field(Field::LastName),
                    Node::new("input").id("postal-code").data_test("postalCode").field(Field::PostalCode),
                    error_container(self.checkout_error.as_deref()),
                    Node::new("button")
                        .id("cancel")
                        .class("btn btn_secondary back cart_cancel_link")
                        .data_test("cancel")
                        .text("Cancel")
                        .on_click(Click::CancelInfo),
                    Node::new("input")
                        .id("continue")
                        .class("submit-button btn btn_primary cart_button btn_action")
                        .data_test("continue")
                        .on_click(Click::ContinueCheckout),
                ])),
            SitePath::CheckoutStepTwo => self.overview(),
            SitePath::CheckoutComplete => Node::new("div")
                .id("checkout_complete_container")
                .class("checkout_complete_container")
                .children([
                    Node::new("img").class("pony_express").data_test("pony-express"),
                    Node::new("h2")
                        .class("complete-header")
                        .data_test("complete-header")
                        .text("Thank you for your order!"),
                    Node::new("div").class("complete-text").data_test("complete-text").text(
                        "Your order has been dispatched, and will arrive just as fast as the pony can get there!",
                    ),
                    Node::new("button")
                        .id("back-to-products")
                        .class("btn btn_primary btn_small")
                        .data_test("back-to-products")
                        .text("Back Home")
                        .on_click(Click::BackHome),
                ]),
            SitePath::Root => Node::new("div"),
        }
    }

    fn inventory_item(&self, index: usize) -> Node {
        let product = &PRODUCTS[index];
        let id = slug(product.name);
        let button = if self.cart.contains(&index) {
            Node::new("button")
                .class("btn btn_secondary btn_small btn_inventory")
                .data_test(format!("remove-{}", id))
                .text("Remove")
                .on_click(Click::Remove(index))
        } else {
            Node::new("button")
                .class("btn btn_primary btn_small btn_inventory")
                .data_test(format!("add-to-cart-{}", id))
                .text("Add to cart")
                .on_click(Click::AddToCart(index))
        };

        Node::new("div").class("inventory_item").data_test("inventory-item").children([
            Node::new("div").class("inventory_item_img").child(Node::new("img").class("inventory_item_img")),
            Node::new("div").class("inventory_item_description").children([
                Node::new("div").class("inventory_item_label").children([
                    Node::new("a").id(&format!("item_{}_title_link", index)).child(
                        Node::new("div")
                            .class("inventory_item_name")
                            .data_test("inventory-item-name")
                            .text(product.name),
                    ),
                    Node::new("div")
                        .class("inventory_item_desc")
                        .data_test("inventory-item-desc")
                        .text(product.description),
                ]),
                Node::new("div").class("pricebar").children([
                    Node::new("div")
                        .class("inventory_item_price")
                        .data_test("inventory-item-price")
                        .text(format!("${:.2}", product.price)),
                    button,
                ]),
            ]),
        ])
    }

    fn overview(&self) -> Node {
        let subtotal = round_cents(self.cart.iter().map(|&i| PRODUCTS[i].price).sum());
        let tax = round_cents(subtotal * TAX_RATE);
        let total = round_cents(subtotal + tax);

        Node::new("div")
            .id("checkout_summary_container")
            .class("checkout_summary_container")
            .children([
                Node::new("div")
                    .class("cart_list")
                    .children(cart_labels())
                    .children(self.cart.iter().map(|&i| cart_item(i, false))),
                Node::new("div").class("summary_info").children([
                    Node::new("div").class("summary_info_label").data_test("payment-info-label").text("Payment Information:"),
                    Node::new("div").class("summary_value_label").data_test("payment-info-value").text("SauceCard #31337"),
                    Node::new("div").class("summary_info_label").data_test("shipping-info-label").text("Shipping Information:"),
                    Node::new("div")
                        .class("summary_value_label")
                        .data_test("shipping-info-value")
                        .text("Free Pony Express Delivery!"),
                    Node::new("div").class("summary_info_label").data_test("total-info-label").text("Price Total"),
                    Node::new("div")
                        .class("summary_subtotal_label")
                        .data_test("subtotal-label")
                        .text(format!("Item total: ${:.2}", subtotal)),
                    Node::new("div").class("summary_tax_label").data_test("tax-label").text(format!("Tax: ${:.2}", tax)),
                    Node::new("div")
                        .class("summary_info_label summary_total_label")
                        .data_test("total-label")
                        .text(format!("Total: ${:.2}", total)),
                    Node::new("div").class("cart_footer").children([
                        Node::new("button")
                            .id("cancel")
                            .class("btn btn_secondary back cart_cancel_link")
                            .data_test("cancel")
                            .text("Cancel")
                            .on_click(Click::CancelReview),
                        Node::new("button")
                            .id("finish")
                            .class("btn btn_action btn_medium cart_button")
                            .data_test("finish")
                            .text("Finish")
                            .on_click(Click::Finish),
                    ]),
                ]),
            ])
    }
}

fn authenticate(username: &str, password: &str) -> Result<Persona, String> {
    if username.is_empty() {
        return Err("Epic sadface: Username is required".into());
    }
    if password.is_empty() {
        return Err("Epic sadface: Password is required".into());
    }
    match Persona::from_username(username) {
        Some(Persona::LockedOut) if password == DEFAULT_PASSWORD => {
            Err("Epic sadface: Sorry, this user has been locked out.".into())
        }
        Some(persona) if password == DEFAULT_PASSWORD => Ok(persona),
        _ => Err("Epic sadface: Username and password do not match any user in this service".into()),
    }
}

fn error_container(error: Option<&str>) -> Node {
    let container = Node::new("div")
        .class("error-message-container")
        .visible(error.is_some());
    match error {
        Some(message) => container.class("error").child(
            Node::new("h3").data_test("error").text(message).child(
                Node::new("button")
                    .class("error-button")
                    .data_test("error-button")
                    .on_click(Click::DismissError),
            ),
        ),
        None => container,
    }
}

fn cart_labels() -> [Node; 2] {
    [
        Node::new("div").class("cart_quantity_label").text("QTY"),
        Node::new("div").class("cart_desc_label").text("Description"),
    ]
}

fn cart_item(index: usize, removable: bool) -> Node {
    let product = &PRODUCTS[index];
    let mut pricebar = Node::new("div").class("item_pricebar").child(
        Node::new("div")
            .class("inventory_item_price")
            .data_test("inventory-item-price")
            .text(format!("${:.2}", product.price)),
    );
    if removable {
        pricebar = pricebar.child(
            Node::new("button")
                .class("btn btn_secondary btn_small cart_button")
                .data_test(format!("remove-{}", slug(product.name)))
                .text("Remove")
                .on_click(Click::Remove(index)),
        );
    }

    Node::new("div").class("cart_item").data_test("inventory-item").children([
        Node::new("div").class("cart_quantity").data_test("item-quantity").text("1"),
        Node::new("div").class("cart_item_label").children([
            Node::new("a").child(
                Node::new("div")
                    .class("inventory_item_name")
                    .data_test("inventory-item-name")
                    .text(product.name),
            ),
            Node::new("div").class("inventory_item_desc").text(product.description),
            pricebar,
        ]),
    ])
}

fn footer() -> Node {
    Node::new("footer").class("footer").children([
        Node::new("ul").class("social").children([
            Node::new("li").class("social_twitter").child(Node::new("a").text("Twitter").on_click(Click::Social)),
            Node::new("li").class("social_facebook").child(Node::new("a").text("Facebook").on_click(Click::Social)),
            Node::new("li").class("social_linkedin").child(Node::new("a").text("LinkedIn").on_click(Click::Social)),
        ]),
        Node::new("div")
            .class("footer_copy")
            .text("© 2025 Sauce Labs. All Rights Reserved. Terms of Service | Privacy Policy"),
    ])
}

#[async_trait]
impl Driver for SimulatedSite {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        debug!("sim goto {}", url);
        self.with_state(|state| {
            state.navigate(&self.options.base_url, url);
            Ok(())
        })
    }

    async fn wait_for_load_state(&self, _state: LoadState) -> E2eResult<()> {
        self.with_state(|_| Ok(()))
    }

    async fn wait_for_selector(&self, selector: &str, state: WaitState, timeout: Duration) -> E2eResult<()> {
        let satisfied = self.query(selector, |matches| match state {
            WaitState::Visible => matches.iter().any(|m| m.visible),
            WaitState::Hidden => matches.iter().all(|m| !m.visible),
            WaitState::Attached => !matches.is_empty(),
            WaitState::Detached => matches.is_empty(),
        })?;
        if satisfied {
            Ok(())
        } else {
            Err(E2eError::Timeout(format!(
                "locator('{}') to be {:?} ({} ms)",
                selector,
                state,
                timeout.as_millis()
            )))
        }
    }

    async fn wait_for_url(&self, url: &str, timeout: Duration) -> E2eResult<()> {
        let current = self.url().await?;
        if current == url {
            Ok(())
        } else {
            Err(E2eError::Timeout(format!(
                "navigation to \"{}\" ({} ms), page is at \"{}\"",
                url,
                timeout.as_millis(),
                current
            )))
        }
    }

    async fn url(&self) -> E2eResult<String> {
        self.with_state(|state| Ok(state.url(&self.options.base_url)))
    }

    async fn fill(&self, selector: &str, value: &str) -> E2eResult<()> {
        self.with_state(|state| {
            let field = Self::actionable(selector, state)?.field;
            match field {
                Some(field) => state.fill(field, value),
                None => Err(E2eError::Playwright(format!(
                    "Error: Element is not an <input>: locator('{}')",
                    selector
                ))),
            }
        })
    }

    async fn click(&self, selector: &str) -> E2eResult<()> {
        debug!("sim click {}", selector);
        let delay = self.with_state(|state| {
            let target = Self::actionable(selector, state)?.click;
            Ok(target.and_then(|click| state.click(click, &self.options)))
        })?;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    async fn select_option(&self, selector: &str, value: &str) -> E2eResult<()> {
        self.with_state(|state| {
            let field = Self::actionable(selector, state)?.field;
            if field != Some(Field::Sort) {
                return Err(E2eError::Playwright(format!(
                    "Error: Element is not a <select> element: locator('{}')",
                    selector
                )));
            }
            state.sort = SortOrder::from_value(value)
                .ok_or_else(|| E2eError::Playwright(format!("No option with value {:?}", value)))?;
            Ok(())
        })
    }

    async fn count(&self, selector: &str) -> E2eResult<usize> {
        self.query(selector, |matches| matches.len())
    }

    async fn text_content(&self, selector: &str) -> E2eResult<Option<String>> {
        self.query(selector, |matches| matches.into_iter().next().map(|m| m.text))
    }

    async fn all_text_contents(&self, selector: &str) -> E2eResult<Vec<String>> {
        self.query(selector, |matches| matches.into_iter().map(|m| m.text).collect())
    }

    async fn is_visible(&self, selector: &str) -> E2eResult<bool> {
        self.query(selector, |matches| matches.first().is_some_and(|m| m.visible))
    }

    async fn close(&self) -> E2eResult<()> {
        self.state.lock().closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.saucedemo.com";

    async fn logged_in(username: &str) -> SimulatedSite {
        let site = SimulatedSite::new(SimOptions {
            glitch_delay: Duration::ZERO,
            ..Default::default()
        });
        site.goto(BASE).await.unwrap();
        site.fill("#user-name", username).await.unwrap();
        site.fill("#password", DEFAULT_PASSWORD).await.unwrap();
        site.click("#login-button").await.unwrap();
        site
    }

    #[tokio::test]
    async fn test_fresh_page_is_blank() {
        let site = SimulatedSite::default();
        assert_eq!(site.url().await.unwrap(), "about:blank");
        assert_eq!(site.count("body").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_login_lands_on_inventory() {
        let site = logged_in("standard_user").await;
        assert_eq!(site.url().await.unwrap(), format!("{}/inventory.html", BASE));
        assert_eq!(site.count(".inventory_item").await.unwrap(), 6);
        assert!(!site.is_visible(".error-message-container").await.unwrap());
    }

    #[tokio::test]
    async fn test_login_errors() {
        let cases = [
            ("", "secret_sauce", "Epic sadface: Username is required"),
            ("standard_user", "", "Epic sadface: Password is required"),
            ("locked_out_user", "secret_sauce", "Epic sadface: Sorry, this user has been locked out."),
            ("locked_out_user", "nope", "Epic sadface: Username and password do not match"),
            ("nobody", "secret_sauce", "Epic sadface: Username and password do not match"),
        ];
        for (user, pass, expected) in cases {
            let site = SimulatedSite::default();
            site.goto(BASE).await.unwrap();
            site.fill("#user-name", user).await.unwrap();
            site.fill("#password", pass).await.unwrap();
            site.click("#login-button").await.unwrap();

            assert!(site.is_visible(".error-message-container").await.unwrap());
            let text = site.text_content(r#"[data-test="error"]"#).await.unwrap().unwrap();
            assert!(text.starts_with(expected), "{} / {}: {}", user, pass, text);
            assert_eq!(site.url().await.unwrap(), format!("{}/", BASE));
        }
    }

    #[tokio::test]
    async fn test_protected_page_redirects_when_logged_out() {
        let site = SimulatedSite::default();
        site.goto(&format!("{}/cart.html", BASE)).await.unwrap();
        assert_eq!(site.url().await.unwrap(), format!("{}/", BASE));
        let text = site.text_content(r#"[data-test="error"]"#).await.unwrap().unwrap();
        assert!(text.contains("You can only access '/cart.html' when you are logged in."));
    }

    #[tokio::test]
    async fn test_cart_badge_tracks_cart() {
        let site = logged_in("standard_user").await;
        assert_eq!(site.count(".shopping_cart_badge").await.unwrap(), 0);

        site.click(r#"[data-test="add-to-cart-sauce-labs-onesie"]"#).await.unwrap();
        site.click(r#"[data-test="add-to-cart-sauce-labs-backpack"]"#).await.unwrap();
        assert_eq!(site.text_content(".shopping_cart_badge").await.unwrap().as_deref(), Some("2"));
        assert_eq!(site.count(r#"[data-test="remove-sauce-labs-onesie"]"#).await.unwrap(), 1);

        site.click(r#".inventory_item:has-text("Onesie") [data-test^="remove"]"#).await.unwrap();
        assert_eq!(site.text_content(".shopping_cart_badge").await.unwrap().as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_problem_user_quirks() {
        let site = logged_in("problem_user").await;
        site.click(r#"[data-test="add-to-cart-sauce-labs-bolt-t-shirt"]"#).await.unwrap();
        assert_eq!(site.count(".shopping_cart_badge").await.unwrap(), 0);

        site.click(r#"[data-test="add-to-cart-sauce-labs-backpack"]"#).await.unwrap();
        site.click("#shopping_cart_container").await.unwrap();
        site.click(r#"[data-test="checkout"]"#).await.unwrap();
        site.fill(r#"[data-test="firstName"]"#, "John").await.unwrap();
        site.fill(r#"[data-test="lastName"]"#, "Doe").await.unwrap();
        site.fill(r#"[data-test="postalCode"]"#, "12345").await.unwrap();
        site.click(r#"[data-test="continue"]"#).await.unwrap();

        let error = site.text_content(r#"[data-test="error"]"#).await.unwrap();
        assert_eq!(error.as_deref(), Some("Error: Last Name is required"));
        assert_eq!(site.url().await.unwrap(), format!("{}/checkout-step-one.html", BASE));
    }

    #[tokio::test]
    async fn test_overview_totals() {
        let site = logged_in("standard_user").await;
        site.click(r#"[data-test="add-to-cart-sauce-labs-backpack"]"#).await.unwrap();
        site.click(".shopping_cart_link").await.unwrap();
        site.click(r#"[data-test="checkout"]"#).await.unwrap();
        site.fill(r#"[data-test="firstName"]"#, "John").await.unwrap();
        site.fill(r#"[data-test="lastName"]"#, "Doe").await.unwrap();
        site.fill(r#"[data-test="postalCode"]"#, "12345").await.unwrap();
        site.click(r#"[data-test="continue"]"#).await.unwrap();

        assert_eq!(
            site.text_content(".summary_subtotal_label").await.unwrap().as_deref(),
            Some("Item total: $29.99")
        );
        assert_eq!(site.text_content(".summary_tax_label").await.unwrap().as_deref(), Some("Tax: $2.40"));
        assert_eq!(site.text_content(".summary_total_label").await.unwrap().as_deref(), Some("Total: $32.39"));
    }

    #[tokio::test]
    async fn test_logout_discards_checkout_form() {
        let site = logged_in("standard_user").await;
        site.click(r#"[data-test="add-to-cart-sauce-labs-backpack"]"#).await.unwrap();
        site.click(".shopping_cart_link").await.unwrap();
        site.click(r#"[data-test="checkout"]"#).await.unwrap();
        site.fill(r#"[data-test="firstName"]"#, "John").await.unwrap();
        site.fill(r#"[data-test="lastName"]"#, "Doe").await.unwrap();
        site.fill(r#"[data-test="postalCode"]"#, "12345").await.unwrap();

        site.click("#react-burger-menu-btn").await.unwrap();
        site.click("#logout_sidebar_link").await.unwrap();
        assert!(site.state.lock().checkout.first_name.is_empty());

        site.fill("#user-name", "standard_user").await.unwrap();
        site.fill("#password", DEFAULT_PASSWORD).await.unwrap();
        site.click("#login-button").await.unwrap();
        site.goto(&format!("{}/checkout-step-one.html", BASE)).await.unwrap();
        site.click(r#"[data-test="continue"]"#).await.unwrap();
        let error = site.text_content(r#"[data-test="error"]"#).await.unwrap();
        assert_eq!(error.as_deref(), Some("Error: First Name is required"));
    }

    #[tokio::test]
    async fn test_hidden_menu_blocks_clicks() {
        let site = logged_in("standard_user").await;
        assert!(matches!(site.click("#logout_sidebar_link").await, Err(E2eError::Timeout(_))));

        site.click("#react-burger-menu-btn").await.unwrap();
        assert!(site.is_visible("#logout_sidebar_link").await.unwrap());
        site.click("#logout_sidebar_link").await.unwrap();
        assert_eq!(site.url().await.unwrap(), format!("{}/", BASE));
    }

    #[tokio::test]
    async fn test_closed_page_rejects_calls() {
        let site = SimulatedSite::default();
        site.close().await.unwrap();
        assert!(site.goto(BASE).await.is_err());
    }
}
