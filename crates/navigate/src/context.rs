//! Capability dispatch across implementations
//!
//! `K` is the implementation tag (e.g. an enum of UI / REST backends) and `H`
//! the handler type the embedding application calls with the resolved
//! implementation.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;

use mtnav_common::{Error, Result};

/// Externally dispatchable methods, each declared by one implementation
pub struct MethodTable<K, H> {
    methods: BTreeMap<String, (K, H)>,
}

/// Registrar returned by [`MethodTable::external_for`]
pub struct ExternalMethods<'a, K, H> {
    table: &'a mut MethodTable<K, H>,
    implementation: K,
}

impl<K: Copy + Debug, H> MethodTable<K, H> {
    pub fn new() -> Self {
        Self {
            methods: BTreeMap::new(),
        }
    }

    /// Start declaring methods provided by `implementation`
    pub fn external_for(&mut self, implementation: K) -> ExternalMethods<'_, K, H> {
        ExternalMethods {
            table: self,
            implementation,
        }
    }

    pub fn get(&self, name: &str) -> Option<(K, &H)> {
        self.methods.get(name).map(|(k, h)| (*k, h))
    }

    /// Method names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.methods.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl<K: Copy + Debug, H> Default for MethodTable<K, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Debug, H> ExternalMethods<'_, K, H> {
    /// Declare `name` as provided by this implementation; a later declaration of
    /// the same name replaces the earlier one
    pub fn method(&mut self, name: impl Into<String>, handler: H) -> &mut Self {
        let name = name.into();
        if let Some((previous, _)) = self
            .table
            .methods
            .insert(name.clone(), (self.implementation, handler))
        {
            debug!(
                method = %name,
                ?previous,
                current = ?self.implementation,
                "method re-registered, last registration wins"
            );
        }
        self
    }
}

/// Maps capability names to the active implementations of one application
pub struct ImplementationContext<K, H> {
    implementations: BTreeMap<String, K>,
    methods: Arc<MethodTable<K, H>>,
}

impl<K: Copy + Eq + Debug, H> ImplementationContext<K, H> {
    pub fn new(methods: Arc<MethodTable<K, H>>) -> Self {
        Self {
            implementations: BTreeMap::new(),
            methods,
        }
    }

    /// Build a context from the active implementations, in registration order
    pub fn from_instances<I, N>(instances: I, methods: Arc<MethodTable<K, H>>) -> Self
    where
        I: IntoIterator<Item = (N, K)>,
        N: Into<String>,
    {
        let mut context = Self::new(methods);
        for (name, implementation) in instances {
            context.register(name, implementation);
        }
        context
    }

    /// Associate `name` with `implementation`, returning the previous provider
    pub fn register(&mut self, name: impl Into<String>, implementation: K) -> Option<K> {
        let name = name.into();
        debug!(capability = %name, ?implementation, "registering implementation");
        self.implementations.insert(name, implementation)
    }

    pub fn resolve(&self, name: &str) -> Result<K> {
        self.implementations
            .get(name)
            .copied()
            .ok_or_else(|| Error::CapabilityNotFound(name.to_string()))
    }

    /// Registered (name, implementation) pairs, sorted by name
    pub fn implementations(&self) -> impl Iterator<Item = (&str, K)> + '_ {
        self.implementations.iter().map(|(name, k)| (name.as_str(), *k))
    }

    pub fn provides(&self, implementation: K) -> bool {
        self.implementations.values().any(|k| *k == implementation)
    }

    /// Find the implementation that declares `name` and the handler to call on it
    pub fn method(&self, name: &str) -> Result<(K, &H)> {
        match self.methods.get(name) {
            Some((implementation, handler)) if self.provides(implementation) => {
                Ok((implementation, handler))
            }
            Some((implementation, _)) => Err(Error::CapabilityNotFound(format!(
                "{name} (declared by {implementation:?}, which is not active)"
            ))),
            None => Err(Error::CapabilityNotFound(name.to_string())),
        }
    }

    pub fn methods(&self) -> &MethodTable<K, H> {
        &self.methods
    }
}
