//! The application under test and the implementations it is driven through

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use mtnav_common::{ApplicationConfig, Credentials, Error, Result, Scheme};
use mtnav_navigate::{ImplementationContext, NavArgs, Navigable, View};

use crate::browser::{BrowserFactory, WebDriverFactory};
use crate::collections::EntityCollections;
use crate::implementations::{
    Implementation, ImplementationKind, RestTarget, Via, ViaRestApi, ViaWebUi, WebTarget,
};
use crate::registry::{ExternalMethod, Registry};

/// Where the application lives and who logs in to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationInfo {
    hostname: String,
    path: String,
    scheme: Scheme,
    credentials: Option<Credentials>,
}

impl ApplicationInfo {
    pub fn new(hostname: impl Into<String>, path: impl Into<String>, scheme: Scheme) -> Self {
        Self {
            hostname: hostname.into(),
            path: path.into(),
            scheme,
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn from_config(config: &ApplicationConfig) -> Result<Self> {
        let hostname = config
            .hostname
            .clone()
            .filter(|hostname| !hostname.is_empty())
            .ok_or_else(|| Error::Configuration("hostname is not configured".to_string()))?;
        let mut info = Self::new(hostname, config.path.clone(), config.scheme);
        info.credentials = config.credentials();
        Ok(info)
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.username.as_str())
    }

    /// `scheme://hostname/path`, composed verbatim
    pub fn address(&self) -> String {
        format!("{}://{}/{}", self.scheme, self.hostname, self.path)
    }
}

/// What an external method hands back
pub enum MethodOutput {
    None,
    View(Box<dyn View>),
    Json(Value),
}

impl fmt::Debug for MethodOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodOutput::None => f.write_str("None"),
            MethodOutput::View(_) => f.write_str("View(..)"),
            MethodOutput::Json(value) => f.debug_tuple("Json").field(value).finish(),
        }
    }
}

/// The application under test.
///
/// Owns one instance of each implementation; dropping it closes the
/// browser session.
pub struct Application {
    info: Arc<ApplicationInfo>,
    web_ui: ViaWebUi,
    rest_api: ViaRestApi,
    context: ImplementationContext<ImplementationKind, ExternalMethod>,
    collections: EntityCollections,
}

impl Application {
    /// Build an application that drives a remote WebDriver browser
    pub fn new(config: &ApplicationConfig, registry: Arc<Registry>) -> Result<Self> {
        Self::with_browser_factory(config, registry, Box::new(WebDriverFactory::new()?))
    }

    pub fn with_browser_factory(
        config: &ApplicationConfig,
        registry: Arc<Registry>,
        factory: Box<dyn BrowserFactory>,
    ) -> Result<Self> {
        let info = Arc::new(ApplicationInfo::from_config(config)?);

        let web_ui = ViaWebUi::new(
            Arc::clone(&info),
            registry.web_ui(),
            factory,
            config.browser.clone(),
            config.navigation.clone(),
        );
        let rest_api = ViaRestApi::new(
            Arc::clone(&info),
            registry.rest_api(),
            config.rest.clone(),
            config.navigation.clone(),
        )?;
        let context = ImplementationContext::from_instances(
            ImplementationKind::ALL.map(|kind| (kind.name(), kind)),
            registry.methods(),
        );
        let collections = EntityCollections::for_application(&info, &registry);

        info!("Application at {} ready", info.address());
        Ok(Self {
            info,
            web_ui,
            rest_api,
            context,
            collections,
        })
    }

    pub fn info(&self) -> &ApplicationInfo {
        &self.info
    }

    pub fn hostname(&self) -> &str {
        self.info.hostname()
    }

    pub fn path(&self) -> &str {
        self.info.path()
    }

    pub fn scheme(&self) -> Scheme {
        self.info.scheme()
    }

    pub fn address(&self) -> String {
        self.info.address()
    }

    pub fn web_ui(&self) -> &ViaWebUi {
        &self.web_ui
    }

    pub fn rest_api(&self) -> &ViaRestApi {
        &self.rest_api
    }

    pub fn context(&self) -> &ImplementationContext<ImplementationKind, ExternalMethod> {
        &self.context
    }

    pub fn collections(&self) -> &EntityCollections {
        &self.collections
    }

    pub fn implementation(&self, kind: ImplementationKind) -> Via<'_> {
        match kind {
            ImplementationKind::WebUi => Via::WebUi(&self.web_ui),
            ImplementationKind::RestApi => Via::RestApi(&self.rest_api),
        }
    }

    /// Resolve an implementation by the name it is registered under
    pub fn via(&self, name: &str) -> Result<Via<'_>> {
        self.context.resolve(name).map(|kind| self.implementation(kind))
    }

    /// Destinations per active implementation, keyed by implementation name
    pub fn destinations(&self) -> BTreeMap<String, Vec<String>> {
        self.context
            .implementations()
            .map(|(name, kind)| {
                let destinations = self
                    .implementation(kind)
                    .destinations()
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                (name.to_string(), destinations)
            })
            .collect()
    }

    /// Navigate the application itself to `destination` through `kind`
    pub fn navigate_to(
        &self,
        kind: ImplementationKind,
        destination: &str,
        args: &NavArgs,
    ) -> Result<Option<Box<dyn View>>> {
        match kind {
            ImplementationKind::WebUi => self.web_ui.navigate_to(self, destination, args),
            ImplementationKind::RestApi => self.rest_api.navigate_to(self, destination, args),
        }
    }

    /// Dispatch an external method to the implementation that declares it
    pub fn call(&self, method: &str, args: &NavArgs) -> Result<MethodOutput> {
        let (kind, handler) = self.context.method(method)?;
        debug!(method, implementation = %kind, ?args, "calling external method");
        handler(self, args)
    }
}

impl Navigable for Application {
    fn nav_name(&self) -> String {
        format!("Application({})", self.info.hostname())
    }
}

impl WebTarget for Application {
    fn web_ui(&self) -> &ViaWebUi {
        &self.web_ui
    }
}

impl RestTarget for Application {
    fn rest_api(&self) -> &ViaRestApi {
        &self.rest_api
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("info", &self.info)
            .field("collections", &self.collections.names())
            .finish()
    }
}
