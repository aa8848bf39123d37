//! Configuration helpers.
//!
//! Configurations are plain serde structs persisted as YAML. A
//! [`ConfigOverrides`] mapping can be applied on top of a configuration: keys
//! name fields of the configuration (dotted paths reach into nested
//! structs) and values replace them.
use crate::error::PoseholdError;
use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_yaml::Value;
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Field overrides applied on top of a configuration.
pub type ConfigOverrides = BTreeMap<String, Value>;

/// Loads a configuration from a YAML file.
pub fn load_yaml<C: DeserializeOwned>(path: impl AsRef<Path>) -> Result<C> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    let rdr = BufReader::new(file);
    let config = serde_yaml::from_reader(rdr)
        .with_context(|| format!("Failed to parse {:?}", path))?;
    Ok(config)
}

/// Saves a configuration as a YAML file.
pub fn save_yaml<C: Serialize>(config: &C, path: impl AsRef<Path>) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(serde_yaml::to_string(config)?.as_bytes())?;
    Ok(())
}

fn override_field(root: &mut Value, key: &str, value: Value) -> Result<()> {
    let mut node = root;
    let mut fields = key.split('.').peekable();

    while let Some(field) = fields.next() {
        let mapping = match node {
            Value::Mapping(mapping) => mapping,
            _ => return Err(PoseholdError::UnknownConfigKey(key.to_string()).into()),
        };
        let field = Value::String(field.to_string());
        if !mapping.contains_key(&field) {
            return Err(PoseholdError::UnknownConfigKey(key.to_string()).into());
        }
        if fields.peek().is_none() {
            mapping.insert(field, value);
            return Ok(());
        }
        node = match mapping.get_mut(&field) {
            Some(child) => child,
            None => return Err(PoseholdError::UnknownConfigKey(key.to_string()).into()),
        };
    }

    Err(PoseholdError::UnknownConfigKey(key.to_string()).into())
}

/// Returns a copy of `config` with `overrides` applied.
///
/// Fails with [`PoseholdError::UnknownConfigKey`] if a key does not name an
/// existing field, or with a deserialization error if a value does not fit
/// the type of its field.
pub fn apply_overrides<C>(config: &C, overrides: &ConfigOverrides) -> Result<C>
where
    C: Serialize + DeserializeOwned,
{
    let mut value = serde_yaml::to_value(config)?;
    for (key, v) in overrides.iter() {
        override_field(&mut value, key, v.clone())?;
    }
    let config = serde_yaml::from_value(value).context("Failed to apply config overrides")?;
    Ok(config)
}
