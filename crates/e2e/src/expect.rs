//! Polling expectations over the driver and plain value checks

use std::fmt::{Debug, Display};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::driver::Driver;
use crate::error::{E2eError, E2eResult};

/// Retries a page condition until it holds or the timeout elapses
pub struct Expect<'a> {
    driver: &'a dyn Driver,
    timeout: Duration,
    poll_interval: Duration,
}

impl<'a> Expect<'a> {
    pub fn new(driver: &'a dyn Driver, timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            driver,
            timeout,
            poll_interval,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Polls `check` until it reports success; the last observation becomes
    /// the "actual" side of the failure
    async fn poll<F, Fut>(&self, what: String, expected: String, mut check: F) -> E2eResult<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = E2eResult<(bool, String)>>,
    {
        let deadline = Instant::now() + self.timeout;
        loop {
            let (ok, actual) = check().await?;
            if ok {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(E2eError::assertion(what, expected, actual));
            }
            sleep(self.poll_interval).await;
        }
    }

    pub async fn to_have_url(&self, url: &str) -> E2eResult<()> {
        let driver = self.driver;
        self.poll("page URL".into(), url.to_string(), || async move {
            let actual = driver.url().await?;
            Ok((actual == url, actual))
        })
        .await
    }

    pub async fn to_be_visible(&self, selector: &str) -> E2eResult<()> {
        let driver = self.driver;
        self.poll(format!("{} visibility", selector), "visible".into(), || async move {
            let visible = driver.is_visible(selector).await?;
            Ok((visible, if visible { "visible" } else { "hidden" }.to_string()))
        })
        .await
    }

    pub async fn to_be_hidden(&self, selector: &str) -> E2eResult<()> {
        let driver = self.driver;
        self.poll(format!("{} visibility", selector), "hidden".into(), || async move {
            let visible = driver.is_visible(selector).await?;
            Ok((!visible, if visible { "visible" } else { "hidden" }.to_string()))
        })
        .await
    }

    pub async fn to_contain_text(&self, selector: &str, text: &str) -> E2eResult<()> {
        let driver = self.driver;
        self.poll(format!("{} text", selector), format!("containing {:?}", text), || async move {
            let actual = driver.text_content(selector).await?;
            let ok = actual.as_deref().is_some_and(|t| t.contains(text));
            Ok((ok, format!("{:?}", actual)))
        })
        .await
    }

    pub async fn to_have_text(&self, selector: &str, text: &str) -> E2eResult<()> {
        let driver = self.driver;
        self.poll(format!("{} text", selector), format!("{:?}", text), || async move {
            let actual = driver.text_content(selector).await?;
            let ok = actual.as_deref().map(str::trim) == Some(text);
            Ok((ok, format!("{:?}", actual)))
        })
        .await
    }

    pub async fn to_have_count(&self, selector: &str, count: usize) -> E2eResult<()> {
        let driver = self.driver;
        self.poll(format!("{} count", selector), count.to_string(), || async move {
            let actual = driver.count(selector).await?;
            Ok((actual == count, actual.to_string()))
        })
        .await
    }
}

pub fn equal<T>(what: &str, expected: T, actual: T) -> E2eResult<()>
where
    T: PartialEq + Debug,
{
    if expected == actual {
        Ok(())
    } else {
        Err(E2eError::assertion(what, format!("{:?}", expected), format!("{:?}", actual)))
    }
}

/// Equality to `digits` decimal places: `|expected - actual| < 10^-digits / 2`
pub fn close_to(what: &str, expected: f64, actual: f64, digits: i32) -> E2eResult<()> {
    let tolerance = 10f64.powi(-digits) / 2.0;
    if (expected - actual).abs() < tolerance {
        Ok(())
    } else {
        Err(E2eError::assertion(
            what,
            format!("{} (±{})", expected, tolerance),
            actual,
        ))
    }
}

pub fn contains(what: &str, haystack: &str, needle: &str) -> E2eResult<()> {
    if haystack.contains(needle) {
        Ok(())
    } else {
        Err(E2eError::assertion(what, format!("containing {:?}", needle), format!("{:?}", haystack)))
    }
}

pub fn greater_than<T>(what: &str, bound: T, actual: T) -> E2eResult<()>
where
    T: PartialOrd + Display,
{
    if actual > bound {
        Ok(())
    } else {
        Err(E2eError::assertion(what, format!("> {}", bound), actual))
    }
}

pub fn is_true(what: &str, condition: bool) -> E2eResult<()> {
    equal(what, true, condition)
}
