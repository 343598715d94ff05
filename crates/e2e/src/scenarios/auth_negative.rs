//! Rejected logins and access control

use futures::FutureExt;

use crate::config::Persona;
use crate::error::E2eResult;
use crate::expect;
use crate::flow::SitePath;
use crate::pages::login::{ERROR_BUTTON, ERROR_MESSAGE};
use crate::pages::LoginOutcome;
use crate::session::Session;

use super::Scenario;

const SUITE: &str = "auth_negative";
const WRONG_PASSWORD: &str = "wrong_password";
const MISMATCH: &str = "Epic sadface: Username and password do not match any user in this service";

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new("standard_user with incorrect password", SUITE, &["auth_negative"], |s| {
            wrong_password(s, Persona::Standard).boxed()
        }),
        Scenario::new("locked_out_user with incorrect password", SUITE, &["auth_negative"], |s| {
            wrong_password(s, Persona::LockedOut).boxed()
        }),
        Scenario::new("problem_user with incorrect password", SUITE, &["auth_negative", "problem"], |s| {
            wrong_password(s, Persona::Problem).boxed()
        }),
        Scenario::new("performance_glitch_user with incorrect password", SUITE, &["auth_negative"], |s| {
            wrong_password(s, Persona::PerformanceGlitch).boxed()
        }),
        Scenario::new("error_user with incorrect password", SUITE, &["auth_negative"], |s| {
            wrong_password(s, Persona::Error).boxed()
        }),
        Scenario::new("visual_user with incorrect password", SUITE, &["auth_negative"], |s| {
            wrong_password(s, Persona::Visual).boxed()
        }),
        Scenario::new("login with empty username", SUITE, &["auth_negative", "smoke"], |s| {
            rejected(s, "", "secret_sauce", "Epic sadface: Username is required").boxed()
        }),
        Scenario::new("login with empty password", SUITE, &["auth_negative"], |s| {
            rejected(s, "standard_user", "", "Epic sadface: Password is required").boxed()
        }),
        Scenario::new("protected page requires login", SUITE, &["auth_negative"], |s| protected_page(s).boxed()),
        Scenario::new("error banner can be dismissed", SUITE, &["auth_negative"], |s| dismiss_error(s).boxed()),
    ]
}

/// Submit the form and require the banner to show `message`
async fn rejected(session: Session, username: &'static str, password: &'static str, message: &'static str) -> E2eResult<()> {
    let outcome = session.login_page().login(username, password).await?;
    expect::equal("login outcome", LoginOutcome::Rejected, outcome)?;

    let expect = session.expect();
    expect.to_be_visible(ERROR_MESSAGE).await?;
    expect.to_contain_text(ERROR_MESSAGE, message).await?;
    expect.to_be_visible(ERROR_BUTTON).await
}

async fn wrong_password(session: Session, persona: Persona) -> E2eResult<()> {
    let username = session.config().credentials(persona).username.clone();
    let outcome = session.login_page().login(&username, WRONG_PASSWORD).await?;
    expect::equal("login outcome", LoginOutcome::Rejected, outcome)?;

    let expect = session.expect();
    expect.to_be_visible(ERROR_MESSAGE).await?;
    expect.to_contain_text(ERROR_MESSAGE, MISMATCH).await?;
    expect.to_be_visible(ERROR_BUTTON).await
}

async fn protected_page(session: Session) -> E2eResult<()> {
    session.goto(SitePath::Cart).await?;

    let expect = session.expect();
    expect.to_have_url(&session.url_for(SitePath::Root)).await?;
    expect
        .to_contain_text(ERROR_MESSAGE, "You can only access '/cart.html' when you are logged in.")
        .await
}

async fn dismiss_error(session: Session) -> E2eResult<()> {
    let page = session.login_page();
    page.login_as(Persona::LockedOut).await?;
    expect::is_true("error visible", page.is_error_visible().await?)?;

    page.dismiss_error().await?;
    session.expect().to_be_hidden(ERROR_MESSAGE).await
}
