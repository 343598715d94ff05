//! Successful and locked-out logins for each persona

use futures::FutureExt;

use crate::config::Persona;
use crate::error::E2eResult;
use crate::expect;
use crate::flow::SitePath;
use crate::pages::login::{ERROR_BUTTON, ERROR_MESSAGE};
use crate::pages::LoginOutcome;
use crate::session::Session;

use super::Scenario;

const SUITE: &str = "auth";

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new("login with standard_user", SUITE, &["auth", "smoke"], |s| standard_user(s).boxed()),
        Scenario::new("login with locked_out_user", SUITE, &["auth", "smoke"], |s| locked_out_user(s).boxed()),
        Scenario::new("login with problem_user", SUITE, &["auth", "problem"], |s| problem_user(s).boxed()),
        Scenario::new("login with performance_glitch_user", SUITE, &["auth"], |s| performance_glitch_user(s).boxed()),
        Scenario::new("login with error_user", SUITE, &["auth"], |s| error_user(s).boxed()),
        Scenario::new("login with visual_user", SUITE, &["auth"], |s| visual_user(s).boxed()),
    ]
}

async fn lands_on_inventory(session: &Session, persona: Persona) -> E2eResult<()> {
    let outcome = session.login_page().login_as(persona).await?;
    expect::equal("login outcome", LoginOutcome::LoggedIn, outcome)?;
    session.expect().to_have_url(&session.url_for(SitePath::Inventory)).await
}

async fn standard_user(session: Session) -> E2eResult<()> {
    lands_on_inventory(&session, Persona::Standard).await
}

async fn locked_out_user(session: Session) -> E2eResult<()> {
    let outcome = session.login_page().login_as(Persona::LockedOut).await?;
    expect::equal("login outcome", LoginOutcome::Rejected, outcome)?;

    let expect = session.expect();
    expect.to_be_visible(ERROR_MESSAGE).await?;
    expect
        .to_contain_text(ERROR_MESSAGE, "Epic sadface: Sorry, this user has been locked out")
        .await?;
    expect.to_be_visible(ERROR_BUTTON).await
}

async fn problem_user(session: Session) -> E2eResult<()> {
    lands_on_inventory(&session, Persona::Problem).await?;

    let expect = session.expect();
    expect.to_be_visible(".inventory_item").await?;
    expect.to_be_visible(".inventory_item_name").await
}

async fn performance_glitch_user(session: Session) -> E2eResult<()> {
    lands_on_inventory(&session, Persona::PerformanceGlitch).await
}

async fn error_user(session: Session) -> E2eResult<()> {
    lands_on_inventory(&session, Persona::Error).await
}

async fn visual_user(session: Session) -> E2eResult<()> {
    lands_on_inventory(&session, Persona::Visual).await
}
