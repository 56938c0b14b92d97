//! Process-wide registrations: destinations, external methods and extension points
//!
//! A [`Registry`] is assembled once at startup with a [`RegistryBuilder`] and
//! shared read-only by every [`Application`] built from it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use mtnav_common::Result;
use mtnav_navigate::{MethodTable, NavArgs, Navigate, NavigateBuilder};

use crate::application::{Application, ApplicationInfo, MethodOutput};
use crate::collections::EntityCollection;
use crate::implementations::{
    web_ui, DynRestTarget, DynWebTarget, Implementation, ImplementationKind, ViaRestApi, ViaWebUi,
};

/// Extension point entity collection providers register under
pub const APPLICATION_COLLECTIONS: &str = "mt.application_collections";

/// A method callable by name through [`Application::call`]
pub type ExternalMethod = Box<dyn Fn(&Application, &NavArgs) -> Result<MethodOutput> + Send + Sync>;

/// Builds one entity collection for an application
pub type CollectionFactory =
    Box<dyn Fn(&Arc<ApplicationInfo>) -> Box<dyn EntityCollection> + Send + Sync>;

pub struct Registry {
    web_ui: Arc<Navigate<DynWebTarget>>,
    rest_api: Arc<Navigate<DynRestTarget>>,
    methods: Arc<MethodTable<ImplementationKind, ExternalMethod>>,
    entry_points: BTreeMap<String, BTreeMap<String, CollectionFactory>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// The built-in destinations and methods
    pub fn standard() -> Result<Self> {
        let mut builder = RegistryBuilder::new();
        builder.with_standard()?;
        Ok(builder.build())
    }

    pub fn web_ui(&self) -> Arc<Navigate<DynWebTarget>> {
        Arc::clone(&self.web_ui)
    }

    pub fn rest_api(&self) -> Arc<Navigate<DynRestTarget>> {
        Arc::clone(&self.rest_api)
    }

    pub fn methods(&self) -> Arc<MethodTable<ImplementationKind, ExternalMethod>> {
        Arc::clone(&self.methods)
    }

    /// Providers registered under `group`, by name
    pub fn entry_points(&self, group: &str) -> impl Iterator<Item = (&str, &CollectionFactory)> {
        self.entry_points
            .get(group)
            .into_iter()
            .flat_map(|providers| providers.iter().map(|(name, f)| (name.as_str(), f)))
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("web_ui", &self.web_ui)
            .field("rest_api", &self.rest_api)
            .field("methods", &self.methods.names())
            .field(
                "entry_points",
                &self
                    .entry_points
                    .iter()
                    .map(|(group, providers)| (group, providers.keys().collect::<Vec<_>>()))
                    .collect::<BTreeMap<_, _>>(),
            )
            .finish()
    }
}

pub struct RegistryBuilder {
    web_ui: NavigateBuilder<DynWebTarget>,
    rest_api: NavigateBuilder<DynRestTarget>,
    methods: MethodTable<ImplementationKind, ExternalMethod>,
    entry_points: BTreeMap<String, BTreeMap<String, CollectionFactory>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            web_ui: Navigate::builder(ImplementationKind::WebUi.name()),
            rest_api: Navigate::builder(ImplementationKind::RestApi.name()),
            methods: MethodTable::new(),
            entry_points: BTreeMap::new(),
        }
    }

    /// Destinations of the web UI
    pub fn web_ui(&mut self) -> &mut NavigateBuilder<DynWebTarget> {
        &mut self.web_ui
    }

    /// Destinations of the REST API
    pub fn rest_api(&mut self) -> &mut NavigateBuilder<DynRestTarget> {
        &mut self.rest_api
    }

    /// Declare a method provided by the web UI
    pub fn web_method<F>(&mut self, name: &str, method: F) -> &mut Self
    where
        F: Fn(&ViaWebUi, &NavArgs) -> Result<MethodOutput> + Send + Sync + 'static,
    {
        let method: ExternalMethod = Box::new(move |app: &Application, args: &NavArgs| {
            method(app.web_ui(), args)
        });
        self.methods
            .external_for(ImplementationKind::WebUi)
            .method(name, method);
        self
    }

    /// Declare a method provided by the REST API
    pub fn rest_method<F>(&mut self, name: &str, method: F) -> &mut Self
    where
        F: Fn(&ViaRestApi, &NavArgs) -> Result<MethodOutput> + Send + Sync + 'static,
    {
        let method: ExternalMethod = Box::new(move |app: &Application, args: &NavArgs| {
            method(app.rest_api(), args)
        });
        self.methods
            .external_for(ImplementationKind::RestApi)
            .method(name, method);
        self
    }

    /// Register a provider under an extension point; a later provider with the
    /// same name replaces the earlier one
    pub fn entry_point(
        &mut self,
        group: &str,
        name: &str,
        factory: CollectionFactory,
    ) -> &mut Self {
        debug!(group, name, "registering entry point");
        self.entry_points
            .entry(group.to_string())
            .or_default()
            .insert(name.to_string(), factory);
        self
    }

    /// Register an entity collection provider
    pub fn collection<F, C>(&mut self, name: &str, factory: F) -> &mut Self
    where
        F: Fn(&Arc<ApplicationInfo>) -> C + Send + Sync + 'static,
        C: EntityCollection,
    {
        self.entry_point(
            APPLICATION_COLLECTIONS,
            name,
            Box::new(move |info: &Arc<ApplicationInfo>| {
                Box::new(factory(info)) as Box<dyn EntityCollection>
            }),
        )
    }

    /// Add the built-in destinations and methods
    pub fn with_standard(&mut self) -> Result<&mut Self> {
        web_ui::register_destinations(&mut self.web_ui)?;
        self.web_method("open_login_page", |web_ui, _| {
            web_ui.open_login_page().map(|_| MethodOutput::None)
        })
        .web_method("do_login", |web_ui, _| {
            web_ui.do_login().map(|_| MethodOutput::None)
        })
        .rest_method("api_login", |rest_api, _| {
            rest_api.do_login().map(|_| MethodOutput::None)
        });
        Ok(self)
    }

    pub fn build(self) -> Registry {
        Registry {
            web_ui: Arc::new(self.web_ui.build()),
            rest_api: Arc::new(self.rest_api.build()),
            methods: Arc::new(self.methods),
            entry_points: self.entry_points,
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtnav_common::ErrorKind;
    use std::any::Any;

    struct Users;

    impl EntityCollection for Users {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_standard_registry() {
        let registry = Registry::standard().unwrap();

        assert_eq!(
            registry.web_ui().list_destinations(),
            vec!["LoggedIn", "LoginScreen"]
        );
        assert!(registry.rest_api().list_destinations().is_empty());
        assert_eq!(
            registry.methods().names(),
            vec!["api_login", "do_login", "open_login_page"]
        );
    }

    #[test]
    fn test_standard_methods_are_bound_to_their_implementation() {
        let registry = Registry::standard().unwrap();
        let methods = registry.methods();

        assert_eq!(methods.get("do_login").unwrap().0, ImplementationKind::WebUi);
        assert_eq!(methods.get("api_login").unwrap().0, ImplementationKind::RestApi);
    }

    #[test]
    fn test_standard_twice_is_configuration_error() {
        let mut builder = RegistryBuilder::new();
        builder.with_standard().unwrap();
        let err = builder.with_standard().map(|_| ()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_collections_register_under_extension_point() {
        let mut builder = RegistryBuilder::new();
        builder.collection("users", |_| Users).collection("groups", |_| Users);
        let registry = builder.build();

        let names: Vec<_> = registry
            .entry_points(APPLICATION_COLLECTIONS)
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["groups", "users"]);
        assert_eq!(registry.entry_points("other.group").count(), 0);
    }
}
