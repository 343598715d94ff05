//! Suite configuration: site origin, timeouts and persona credentials

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{E2eError, E2eResult};

/// Public origin of the demo shop
pub const DEFAULT_BASE_URL: &str = "https://www.saucedemo.com";

/// Password shared by every published demo account
pub const DEFAULT_PASSWORD: &str = "secret_sauce";

/// A named demo-site user with a particular behavioural quirk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    /// Behaves normally
    Standard,
    /// Always rejected at login
    LockedOut,
    /// Deliberately broken UI (some buttons and inputs misbehave)
    Problem,
    /// Slow login
    PerformanceGlitch,
    /// Errors on some actions
    Error,
    /// Visual glitches only
    Visual,
}

impl Persona {
    pub const ALL: [Persona; 6] = [
        Persona::Standard,
        Persona::LockedOut,
        Persona::Problem,
        Persona::PerformanceGlitch,
        Persona::Error,
        Persona::Visual,
    ];

    /// Demo account name, also the default login
    pub fn username(&self) -> &'static str {
        match self {
            Persona::Standard => "standard_user",
            Persona::LockedOut => "locked_out_user",
            Persona::Problem => "problem_user",
            Persona::PerformanceGlitch => "performance_glitch_user",
            Persona::Error => "error_user",
            Persona::Visual => "visual_user",
        }
    }

    /// Environment variable overriding the login
    pub fn login_var(&self) -> String {
        format!("saucedemo_{}_LOGIN", self.username())
    }

    /// Environment variable overriding the password
    pub fn password_var(&self) -> String {
        format!("saucedemo_{}_PASSWORD", self.username())
    }

    /// Look up a persona by account name
    pub fn from_username(username: &str) -> Option<Persona> {
        Persona::ALL.into_iter().find(|p| p.username() == username)
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.username())
    }
}

impl FromStr for Persona {
    type Err = E2eError;

    /// Accepts either the account name (`problem_user`) or the short name (`problem`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Persona::ALL
            .into_iter()
            .find(|p| p.username() == name || p.username().trim_end_matches("_user") == name)
            .ok_or_else(|| E2eError::Config(format!("Unknown persona: {}", s)))
    }
}

/// Login/password pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Credentials for every persona
#[derive(Debug, Clone)]
pub struct PersonaBook {
    entries: HashMap<Persona, Credentials>,
}

impl PersonaBook {
    /// Build from a variable lookup, falling back to the published demo accounts
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let entries = Persona::ALL
            .into_iter()
            .map(|persona| {
                let username = lookup(&persona.login_var())
                    .unwrap_or_else(|| persona.username().to_string());
                let password = lookup(&persona.password_var())
                    .unwrap_or_else(|| DEFAULT_PASSWORD.to_string());
                (persona, Credentials { username, password })
            })
            .collect();

        Self { entries }
    }

    pub fn get(&self, persona: Persona) -> &Credentials {
        // Every persona is inserted by from_lookup.
        &self.entries[&persona]
    }
}

impl Default for PersonaBook {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Configuration shared by every page object of a run
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Site origin without a trailing slash
    pub base_url: String,

    /// Upper bound for navigation, clicks and explicit waits
    pub action_timeout: Duration,

    /// Upper bound for polling expectations
    pub expect_timeout: Duration,

    /// How long a successful login may take to render the inventory
    pub login_timeout: Duration,

    /// Interval between expectation polls
    pub poll_interval: Duration,

    pub personas: PersonaBook,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            action_timeout: Duration::from_secs(30),
            expect_timeout: Duration::from_secs(5),
            login_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(100),
            personas: PersonaBook::default(),
        }
    }
}

impl SuiteConfig {
    /// Load from the process environment, reading `.env` first if present
    pub fn from_env() -> E2eResult<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> E2eResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = lookup("SAUCEDEMO_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(E2eError::Config(format!(
                "SAUCEDEMO_BASE_URL must be an http(s) origin, got {}",
                base_url
            )));
        }

        Ok(Self {
            base_url,
            action_timeout: millis_var(&lookup, "SAUCEDEMO_ACTION_TIMEOUT_MS")?
                .unwrap_or(defaults.action_timeout),
            expect_timeout: millis_var(&lookup, "SAUCEDEMO_EXPECT_TIMEOUT_MS")?
                .unwrap_or(defaults.expect_timeout),
            login_timeout: millis_var(&lookup, "SAUCEDEMO_LOGIN_TIMEOUT_MS")?
                .unwrap_or(defaults.login_timeout),
            poll_interval: defaults.poll_interval,
            personas: PersonaBook::from_lookup(&lookup),
        })
    }

    pub fn credentials(&self, persona: Persona) -> &Credentials {
        self.personas.get(persona)
    }
}

fn millis_var<F>(lookup: &F, key: &str) -> E2eResult<Option<Duration>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|_| E2eError::Config(format!("{} must be milliseconds, got {:?}", key, raw))),
    }
}
