//! Site paths and the page-to-page state machine of a shopping session

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::error::{E2eError, E2eResult};

/// Fixed pages of the shop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SitePath {
    Root,
    Inventory,
    Cart,
    CheckoutStepOne,
    CheckoutStepTwo,
    CheckoutComplete,
}

impl SitePath {
    pub const ALL: [SitePath; 6] = [
        SitePath::Root,
        SitePath::Inventory,
        SitePath::Cart,
        SitePath::CheckoutStepOne,
        SitePath::CheckoutStepTwo,
        SitePath::CheckoutComplete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SitePath::Root => "/",
            SitePath::Inventory => "/inventory.html",
            SitePath::Cart => "/cart.html",
            SitePath::CheckoutStepOne => "/checkout-step-one.html",
            SitePath::CheckoutStepTwo => "/checkout-step-two.html",
            SitePath::CheckoutComplete => "/checkout-complete.html",
        }
    }

    /// Absolute URL under `base_url` (an origin without trailing slash)
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.as_str())
    }

    pub fn from_path(path: &str) -> Option<SitePath> {
        let path = if path.is_empty() { "/" } else { path };
        SitePath::ALL.into_iter().find(|p| p.as_str() == path)
    }

    /// Resolve an absolute URL under `base_url`; query and fragment are ignored
    pub fn from_url(url: &str, base_url: &str) -> Option<SitePath> {
        let rest = url.strip_prefix(base_url.trim_end_matches('/'))?;
        let path = rest.split(['?', '#']).next().unwrap_or_default();
        SitePath::from_path(path)
    }
}

/// Where a shopping session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageState {
    LoggedOut,
    Inventory,
    Cart,
    CheckoutInfo,
    CheckoutReview,
    CheckoutComplete,
}

/// User action moving between pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    Login,
    OpenCart,
    ContinueShopping,
    Checkout,
    Continue,
    CancelInfo,
    CancelReview,
    Finish,
    BackHome,
    AllItems,
    Logout,
}

impl PageState {
    pub fn path(&self) -> SitePath {
        match self {
            PageState::LoggedOut => SitePath::Root,
            PageState::Inventory => SitePath::Inventory,
            PageState::Cart => SitePath::Cart,
            PageState::CheckoutInfo => SitePath::CheckoutStepOne,
            PageState::CheckoutReview => SitePath::CheckoutStepTwo,
            PageState::CheckoutComplete => SitePath::CheckoutComplete,
        }
    }

    pub fn from_path(path: SitePath) -> PageState {
        match path {
            SitePath::Root => PageState::LoggedOut,
            SitePath::Inventory => PageState::Inventory,
            SitePath::Cart => PageState::Cart,
            SitePath::CheckoutStepOne => PageState::CheckoutInfo,
            SitePath::CheckoutStepTwo => PageState::CheckoutReview,
            SitePath::CheckoutComplete => PageState::CheckoutComplete,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PageState::CheckoutComplete)
    }

    /// State reached by applying `transition`, or an error if the current
    /// page offers no such action
    pub fn apply(self, transition: Transition) -> E2eResult<PageState> {
        use PageState::*;
        use Transition::*;

        let next = match (self, transition) {
            (LoggedOut, Login) => Inventory,
            (LoggedOut, _) => return Err(self.invalid(transition)),
            (_, Logout) => LoggedOut,
            (_, AllItems) => Inventory,
            (_, OpenCart) => Cart,
            (Cart, ContinueShopping) => Inventory,
            (Cart, Checkout) => CheckoutInfo,
            (CheckoutInfo, Continue) => CheckoutReview,
            (CheckoutInfo, CancelInfo) => Cart,
            (CheckoutReview, CancelReview) => Inventory,
            (CheckoutReview, Finish) => CheckoutComplete,
            (CheckoutComplete, BackHome) => Inventory,
            _ => return Err(self.invalid(transition)),
        };
        Ok(next)
    }

    fn invalid(self, transition: Transition) -> E2eError {
        E2eError::InvalidTransition {
            from: self.to_string(),
            action: format!("{:?}", transition),
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_purchase_path() {
        let path = [
            Transition::Login,
            Transition::OpenCart,
            Transition::Checkout,
            Transition::Continue,
            Transition::Finish,
        ];
        let end = path
            .into_iter()
            .try_fold(PageState::LoggedOut, PageState::apply)
            .unwrap();
        assert_eq!(end, PageState::CheckoutComplete);
        assert!(end.is_terminal());
    }

    #[test_case(PageState::CheckoutInfo, Transition::CancelInfo, PageState::Cart)]
    #[test_case(PageState::CheckoutReview, Transition::CancelReview, PageState::Inventory)]
    #[test_case(PageState::CheckoutComplete, Transition::BackHome, PageState::Inventory)]
    #[test_case(PageState::Cart, Transition::ContinueShopping, PageState::Inventory)]
    fn test_return_transitions(from: PageState, action: Transition, to: PageState) {
        assert_eq!(from.apply(action).unwrap(), to);
    }

    #[test]
    fn test_logout_from_any_logged_in_state() {
        for path in SitePath::ALL.into_iter().skip(1) {
            let state = PageState::from_path(path);
            assert_eq!(state.apply(Transition::Logout).unwrap(), PageState::LoggedOut);
        }
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(PageState::LoggedOut.apply(Transition::OpenCart).is_err());
        assert!(PageState::Inventory.apply(Transition::Finish).is_err());
        assert!(PageState::Cart.apply(Transition::Continue).is_err());
        assert!(PageState::CheckoutInfo.apply(Transition::Finish).is_err());
    }

    #[test]
    fn test_url_round_trip() {
        let base = "https://www.saucedemo.com";
        assert_eq!(SitePath::Root.url(base), "https://www.saucedemo.com/");
        assert_eq!(SitePath::from_url("https://www.saucedemo.com", base), Some(SitePath::Root));
        assert_eq!(
            SitePath::from_url("https://www.saucedemo.com/cart.html?x=1", base),
            Some(SitePath::Cart)
        );
        assert_eq!(SitePath::from_url("https://saucelabs.com/", base), None);
    }
}
