//! Platform environment and service relationships
//!
//! The hosting platform describes the services attached to an application in
//! the `MAGENTO_CLOUD_RELATIONSHIPS` variable: base64-encoded JSON mapping a
//! relationship name to its list of endpoints.
//!
//! ```json
//! {"redis": [{"host": "redis.internal", "port": 6379, "scheme": "redis"}]}
//! ```
//!
//! Relationship lookups never fail. A variable that is unset, undecodable or
//! of the wrong shape reads as "no relationships", with a warning for the
//! malformed cases.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::warn;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Variable holding the encoded relationships.
pub const RELATIONSHIPS_VAR: &str = "MAGENTO_CLOUD_RELATIONSHIPS";

/// One endpoint of a relationship; carries at least `host` and `port`.
pub type Endpoint = Map<String, Value>;

/// Source of platform service relationships.
pub trait RelationshipSource {
    /// Endpoints of the relationship `name`, in platform order. Empty when
    /// there is no such relationship.
    fn relationship(&self, name: &str) -> Vec<Endpoint>;
}

/// The platform environment, captured from process variables.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    relationships: Map<String, Value>,
}

impl Environment {
    /// Capture the current process environment.
    pub fn from_process() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build an environment from explicit variables.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let relationships = vars
            .get(RELATIONSHIPS_VAR)
            .map(|encoded| decode_variable(RELATIONSHIPS_VAR, encoded))
            .unwrap_or_default();

        Self { relationships }
    }
}

impl RelationshipSource for Environment {
    fn relationship(&self, name: &str) -> Vec<Endpoint> {
        let Some(value) = self.relationships.get(name) else {
            return Vec::new();
        };

        match value.as_array() {
            Some(endpoints) => endpoints
                .iter()
                .filter_map(|endpoint| endpoint.as_object().cloned())
                .collect(),
            None => {
                warn!("Relationship '{}' is not a list of endpoints, ignoring", name);
                Vec::new()
            }
        }
    }
}

/// Decode a base64 JSON object variable. Malformed values decode to an empty
/// object.
pub fn decode_variable(var: &str, encoded: &str) -> Map<String, Value> {
    let bytes = match STANDARD.decode(encoded.trim()) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("{} is not valid base64, ignoring: {}", var, e);
            return Map::new();
        }
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            warn!("{} does not decode to a JSON object, ignoring", var);
            Map::new()
        }
        Err(e) => {
            warn!("{} does not decode to JSON, ignoring: {}", var, e);
            Map::new()
        }
    }
}
