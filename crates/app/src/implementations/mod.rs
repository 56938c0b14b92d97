//! The interchangeable backends an application is driven through

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use mtnav_common::{Error, Result};
use mtnav_navigate::{NavArgs, Navigable, Navigate, View, DEFAULT_TRIES};

use crate::application::ApplicationInfo;

pub mod rest_api;
pub mod web_ui;

pub use rest_api::{DynRestTarget, RestTarget, ViaRestApi};
pub use web_ui::{DynWebTarget, ViaWebUi, WebTarget, LOGGED_IN, LOGIN_SCREEN};

/// Tag identifying an implementation in the context and method tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ImplementationKind {
    #[serde(rename = "ViaWebUI")]
    WebUi,
    #[serde(rename = "ViaRESTAPI")]
    RestApi,
}

impl ImplementationKind {
    pub const ALL: [ImplementationKind; 2] = [ImplementationKind::WebUi, ImplementationKind::RestApi];

    pub fn name(&self) -> &'static str {
        match self {
            ImplementationKind::WebUi => "ViaWebUI",
            ImplementationKind::RestApi => "ViaRESTAPI",
        }
    }
}

impl fmt::Display for ImplementationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ImplementationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ViaWebUI" | "web-ui" | "webui" => Ok(ImplementationKind::WebUi),
            "ViaRESTAPI" | "rest-api" | "restapi" => Ok(ImplementationKind::RestApi),
            other => Err(Error::CapabilityNotFound(other.to_string())),
        }
    }
}

/// Common contract of the backends
pub trait Implementation {
    /// What destinations of this implementation are navigated for
    type Target: ?Sized + Navigable + 'static;

    const KIND: ImplementationKind;

    fn owner(&self) -> &ApplicationInfo;

    fn navigator(&self) -> &Navigate<Self::Target>;

    /// Attempts per destination
    fn tries(&self) -> usize {
        DEFAULT_TRIES
    }

    fn navigate_to(
        &self,
        target: &Self::Target,
        destination: &str,
        args: &NavArgs,
    ) -> Result<Option<Box<dyn View>>> {
        self.navigator()
            .navigate_with(target, destination, args, self.tries())
    }

    fn do_login(&self) -> Result<()>;
}

/// A borrowed implementation, selected at runtime by its tag
#[derive(Clone, Copy)]
pub enum Via<'a> {
    WebUi(&'a ViaWebUi),
    RestApi(&'a ViaRestApi),
}

impl Via<'_> {
    pub fn kind(&self) -> ImplementationKind {
        match self {
            Via::WebUi(_) => ImplementationKind::WebUi,
            Via::RestApi(_) => ImplementationKind::RestApi,
        }
    }

    /// Destinations registered for this implementation, sorted
    pub fn destinations(&self) -> Vec<&str> {
        match self {
            Via::WebUi(web_ui) => web_ui.navigator().list_destinations(),
            Via::RestApi(rest_api) => rest_api.navigator().list_destinations(),
        }
    }

    pub fn do_login(&self) -> Result<()> {
        match self {
            Via::WebUi(web_ui) => web_ui.do_login(),
            Via::RestApi(rest_api) => rest_api.do_login(),
        }
    }
}

impl fmt::Debug for Via<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Via").field(&self.kind()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtnav_common::ErrorKind;
    use test_case::test_case;

    #[test_case("ViaWebUI", ImplementationKind::WebUi; "canonical web ui")]
    #[test_case("web-ui", ImplementationKind::WebUi; "short web ui")]
    #[test_case("ViaRESTAPI", ImplementationKind::RestApi; "canonical rest api")]
    #[test_case("restapi", ImplementationKind::RestApi; "short rest api")]
    fn test_parse_kind(input: &str, expected: ImplementationKind) {
        assert_eq!(input.parse::<ImplementationKind>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_kind_is_lookup_error() {
        let err = "ViaSSH".parse::<ImplementationKind>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
    }

    #[test]
    fn test_kind_names_round_trip_through_display() {
        for kind in ImplementationKind::ALL {
            assert_eq!(kind.to_string().parse::<ImplementationKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_kind_serializes_as_name() {
        let json = serde_json::to_string(&ImplementationKind::RestApi).unwrap();
        assert_eq!(json, "\"ViaRESTAPI\"");
    }
}
