// src/catalog.rs
//! Race catalog loading.
//!
//! The race config format drifted over time. Every historical shape must keep
//! loading without migration:
//! - a flat array of race objects;
//! - an object with a `races` array;
//! - a single race object.
//!
//! Field variants `race_name`/`name` and `pcs_url`/`url` are folded onto
//! [`Race`]. Nothing downstream sees the raw shape.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::model::Race;

const NAME_KEYS: [&str; 2] = ["race_name", "name"];
const LOCATOR_KEYS: [&str; 2] = ["pcs_url", "url"];

/// Read and normalize a race config file.
pub fn load(path: &Path) -> Result<Vec<Race>, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: Value = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let races = normalize(&raw)?;
    tracing::debug!(path = %path.display(), races = races.len(), "loaded race catalog");
    Ok(races)
}

/// Fold any accepted config shape into an ordered list of races.
pub fn normalize(raw: &Value) -> Result<Vec<Race>, ConfigError> {
    let entries: Vec<&Value> = match raw {
        Value::Array(items) => items.iter().collect(),
        Value::Object(obj) => {
            if let Some(races) = obj.get("races") {
                match races {
                    Value::Array(items) => items.iter().collect(),
                    other => {
                        return Err(ConfigError::UnexpectedShape(format!(
                            "`races` must be an array, got {}",
                            kind_of(other)
                        )));
                    }
                }
            } else if NAME_KEYS.iter().any(|k| obj.contains_key(*k)) {
                vec![raw]
            } else {
                let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
                return Err(ConfigError::UnexpectedShape(format!(
                    "object has neither `races` nor race fields (keys: {keys:?})"
                )));
            }
        }
        other => {
            return Err(ConfigError::UnexpectedShape(format!(
                "expected an array or object, got {}",
                kind_of(other)
            )));
        }
    };

    let mut seen = HashSet::with_capacity(entries.len());
    let mut out = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let obj = entry.as_object().ok_or(ConfigError::NotAnObject { index })?;
        let race = normalize_entry(obj, index)?;
        if !seen.insert(race.name.clone()) {
            return Err(ConfigError::DuplicateName(race.name));
        }
        out.push(race);
    }

    if out.is_empty() {
        tracing::warn!("race catalog is empty");
    }
    Ok(out)
}

fn normalize_entry(obj: &Map<String, Value>, index: usize) -> Result<Race, ConfigError> {
    let name = first_str(obj, &NAME_KEYS);
    let locator = first_str(obj, &LOCATOR_KEYS);

    match (name, locator) {
        (Some(name), Some(locator)) => Ok(Race::new(name, locator)),
        (Some(name), None) => {
            tracing::warn!(race = name, "race has no source locator; it will fail to fetch");
            Ok(Race::new(name, s!()))
        }
        (None, Some(locator)) => Ok(Race::new(locator, locator)),
        (None, None) => Err(ConfigError::MissingFields { index }),
    }
}

/// First key holding a non-blank string, trimmed.
fn first_str<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
