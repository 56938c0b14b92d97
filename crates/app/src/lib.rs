//! mtnav application layer
//!
//! An [`Application`] is the system under test: where it lives, who logs in
//! to it, and one instance of each implementation it can be driven through
//! ([`ViaWebUi`], [`ViaRestApi`]). Destinations, external methods and entity
//! collection providers come from a [`Registry`] built once at startup.

pub mod application;
pub mod browser;
pub mod collections;
pub mod implementations;
pub mod registry;
pub mod views;

pub use application::{Application, ApplicationInfo, MethodOutput};
pub use browser::{Browser, BrowserFactory, BrowserSession, Locator, WebDriverFactory};
pub use collections::{load_application_collections, EntityCollection, EntityCollections};
pub use implementations::{
    DynRestTarget, DynWebTarget, Implementation, ImplementationKind, RestTarget, Via, ViaRestApi,
    ViaWebUi, WebTarget, LOGGED_IN, LOGIN_SCREEN,
};
pub use registry::{
    CollectionFactory, ExternalMethod, Registry, RegistryBuilder, APPLICATION_COLLECTIONS,
};
pub use views::{BaseLoggedInView, Button, LoginPage, ViewContext, WebView};
