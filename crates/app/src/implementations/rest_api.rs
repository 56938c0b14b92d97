//! Driving the application through its REST API

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{Method, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use mtnav_common::{Error, NavigationConfig, RestConfig, Result};
use mtnav_navigate::{Navigable, Navigate};

use super::{Implementation, ImplementationKind};
use crate::application::ApplicationInfo;

/// Anything navigated through the REST API
pub trait RestTarget: Navigable {
    fn rest_api(&self) -> &ViaRestApi;
}

pub type DynRestTarget = dyn RestTarget;

pub struct ViaRestApi {
    owner: Arc<ApplicationInfo>,
    navigator: Arc<Navigate<DynRestTarget>>,
    client: Client,
    rest: RestConfig,
    navigation: NavigationConfig,
}

impl ViaRestApi {
    pub fn new(
        owner: Arc<ApplicationInfo>,
        navigator: Arc<Navigate<DynRestTarget>>,
        rest: RestConfig,
        navigation: NavigationConfig,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(rest.timeout_ms))
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self {
            owner,
            navigator,
            client,
            rest,
            navigation,
        })
    }

    /// `path` resolved against the application address
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.owner.address().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// A request against `path`, authenticated when the owner has credentials
    pub fn create_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("{} {}", method, url);
        let request = self.client.request(method, url);
        match self.owner.credentials() {
            Some(credentials) => {
                request.basic_auth(&credentials.username, Some(&credentials.password))
            }
            None => request,
        }
    }
}

impl Implementation for ViaRestApi {
    type Target = DynRestTarget;

    const KIND: ImplementationKind = ImplementationKind::RestApi;

    fn owner(&self) -> &ApplicationInfo {
        &self.owner
    }

    fn navigator(&self) -> &Navigate<DynRestTarget> {
        &self.navigator
    }

    fn tries(&self) -> usize {
        self.navigation.tries
    }

    fn do_login(&self) -> Result<()> {
        if self.owner.credentials().is_none() {
            return Err(Error::Configuration(format!(
                "no credentials configured for {}",
                self.owner.hostname()
            )));
        }

        let response = self
            .create_request(Method::GET, &self.rest.login_path)
            .send()?;
        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Authentication(
                format!("{} rejected the credentials", self.url(&self.rest.login_path)),
            )),
            _ => {
                response.error_for_status()?;
                info!("Authenticated against {}", self.owner.hostname());
                Ok(())
            }
        }
    }
}

impl Navigable for ViaRestApi {
    fn nav_name(&self) -> String {
        ImplementationKind::RestApi.name().to_string()
    }
}

impl RestTarget for ViaRestApi {
    fn rest_api(&self) -> &ViaRestApi {
        self
    }
}
