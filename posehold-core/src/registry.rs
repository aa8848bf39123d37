//! Registry of environments.
//!
//! A [`Registry`] maps names to environment factories together with their
//! default configurations, so that tools can instantiate an environment from
//! its name alone. Registration is an explicit call on a registry owned by
//! the caller; there is no global registry.
use crate::{config::ConfigOverrides, error::PoseholdError, Env};
use anyhow::Result;
use log::{info, warn};
use std::collections::BTreeMap;

type Factory<E> =
    Box<dyn Fn(<E as Env>::Config, Option<&ConfigOverrides>) -> Result<Box<E>> + Send + Sync>;

type DefaultConfig<E> = Box<dyn Fn() -> <E as Env>::Config + Send + Sync>;

struct Entry<E: ?Sized + Env> {
    factory: Factory<E>,
    default_config: DefaultConfig<E>,
}

/// Environments registered by name.
///
/// `E` is usually a trait object such as
/// `dyn Env<Config = C, Data = D, Info = I>`, so that environments of
/// different concrete types sharing a configuration type can be registered
/// together.
pub struct Registry<E: ?Sized + Env> {
    entries: BTreeMap<String, Entry<E>>,
}

impl<E: ?Sized + Env> Default for Registry<E> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<E: ?Sized + Env> Registry<E> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an environment factory and its default configuration.
    ///
    /// Registering a name twice replaces the previous entry.
    pub fn register<F, G>(&mut self, name: impl Into<String>, factory: F, default_config: G)
    where
        F: Fn(E::Config, Option<&ConfigOverrides>) -> Result<Box<E>> + Send + Sync + 'static,
        G: Fn() -> E::Config + Send + Sync + 'static,
    {
        let name = name.into();
        let entry = Entry {
            factory: Box::new(factory),
            default_config: Box::new(default_config),
        };
        if self.entries.insert(name.clone(), entry).is_some() {
            warn!("Environment {} was registered again, replacing it", name);
        } else {
            info!("Registered environment {}", name);
        }
    }

    fn entry(&self, name: &str) -> Result<&Entry<E>> {
        match self.entries.get(name) {
            Some(entry) => Ok(entry),
            None => Err(PoseholdError::UnknownEnvironment(name.to_string()).into()),
        }
    }

    /// Instantiates the environment registered as `name`.
    ///
    /// The default configuration of the environment is used if `config` is `None`.
    pub fn load(
        &self,
        name: &str,
        config: Option<E::Config>,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<Box<E>> {
        let entry = self.entry(name)?;
        let config = match config {
            Some(config) => config,
            None => (entry.default_config)(),
        };
        info!("Load environment {}", name);
        (entry.factory)(config, overrides)
    }

    /// Returns the default configuration of the environment registered as `name`.
    pub fn default_config(&self, name: &str) -> Result<E::Config> {
        Ok((self.entry(name)?.default_config)())
    }

    /// Returns `true` if an environment is registered as `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Names of the registered environments in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(|k| k.as_str()).collect()
    }
}
