//! Pluggable entity collections discovered through the registry

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use mtnav_common::{Error, Result};

use crate::application::ApplicationInfo;
use crate::registry::{CollectionFactory, Registry, APPLICATION_COLLECTIONS};

/// A collection of entities of one kind, exposed on the application
pub trait EntityCollection: Any {
    fn as_any(&self) -> &dyn Any;
}

impl dyn EntityCollection {
    pub fn downcast_ref<C: EntityCollection>(&self) -> Option<&C> {
        self.as_any().downcast_ref::<C>()
    }
}

/// Providers registered under the application collections extension point
pub fn load_application_collections(registry: &Registry) -> BTreeMap<&str, &CollectionFactory> {
    registry.entry_points(APPLICATION_COLLECTIONS).collect()
}

/// The collections of one application, by provider name
#[derive(Default)]
pub struct EntityCollections {
    collections: BTreeMap<String, Box<dyn EntityCollection>>,
}

impl EntityCollections {
    pub fn for_application(info: &Arc<ApplicationInfo>, registry: &Registry) -> Self {
        let collections = load_application_collections(registry)
            .into_iter()
            .map(|(name, factory)| {
                debug!(collection = name, "building entity collection");
                (name.to_string(), factory(info))
            })
            .collect();
        Self { collections }
    }

    pub fn get(&self, name: &str) -> Result<&dyn EntityCollection> {
        self.collections
            .get(name)
            .map(|collection| collection.as_ref())
            .ok_or_else(|| Error::CapabilityNotFound(format!("collection {name}")))
    }

    /// The named collection as its concrete type
    pub fn get_as<C: EntityCollection>(&self, name: &str) -> Option<&C> {
        self.collections.get(name)?.downcast_ref::<C>()
    }

    /// Collection names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.collections.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
