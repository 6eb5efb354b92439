//! Session storage configuration
//!
//! Resolution follows a strict priority with three possible outcomes:
//!
//! 1. **Explicit**: the deploy stage's `SESSION_CONFIGURATION` contains a
//!    `save` key. It is returned unchanged and relationships are not read.
//! 2. **Redis**: the platform exposes a `redis` relationship. The first
//!    endpoint becomes `{save: redis, redis: {host, port, database: 0}}`.
//! 3. **Empty**: neither applies; the platform default handles sessions.

use crate::config::{StageConfig, VAR_SESSION_CONFIGURATION};
use crate::environment::RelationshipSource;
use log::debug;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Relationship name of the key-value cache service.
pub const REDIS_RELATIONSHIP: &str = "redis";

/// Redis database index used for sessions.
pub const REDIS_SESSION_DATABASE: u64 = 0;

/// A session storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SessionConfig(Map<String, Value>);

impl SessionConfig {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Derives the session configuration from stage configuration and platform
/// relationships.
pub struct SessionConfigResolver<'a> {
    stage_config: &'a dyn StageConfig,
    environment: &'a dyn RelationshipSource,
}

impl<'a> SessionConfigResolver<'a> {
    pub fn new(stage_config: &'a dyn StageConfig, environment: &'a dyn RelationshipSource) -> Self {
        Self {
            stage_config,
            environment,
        }
    }

    pub fn get(&self) -> SessionConfig {
        if let Value::Object(explicit) = self.stage_config.get(VAR_SESSION_CONFIGURATION) {
            if explicit.contains_key("save") {
                debug!("Using explicit {}", VAR_SESSION_CONFIGURATION);
                return SessionConfig(explicit);
            }
        }

        let endpoints = self.environment.relationship(REDIS_RELATIONSHIP);
        let Some(endpoint) = endpoints.first() else {
            debug!("No {} relationship, leaving session storage unset", REDIS_RELATIONSHIP);
            return SessionConfig::default();
        };

        debug!("Using {} relationship for session storage", REDIS_RELATIONSHIP);
        let field = |key: &str| endpoint.get(key).cloned().unwrap_or(Value::Null);

        let mut config = Map::new();
        config.insert("save".to_string(), json!(REDIS_RELATIONSHIP));
        config.insert(
            REDIS_RELATIONSHIP.to_string(),
            json!({
                "host": field("host"),
                "port": field("port"),
                "database": REDIS_SESSION_DATABASE,
            }),
        );
        SessionConfig(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Endpoint;
    use std::cell::Cell;

    /// Relationship source that records whether it was consulted.
    struct RecordingRelationships {
        endpoints: Vec<Endpoint>,
        calls: Cell<usize>,
    }

    impl RecordingRelationships {
        fn new(endpoints: Value) -> Self {
            let endpoints: Vec<Endpoint> = endpoints
                .as_array()
                .map(|list| list.iter().filter_map(|e| e.as_object().cloned()).collect())
                .unwrap_or_default();
            Self {
                endpoints,
                calls: Cell::new(0),
            }
        }
    }

    impl RelationshipSource for RecordingRelationships {
        fn relationship(&self, name: &str) -> Vec<Endpoint> {
            self.calls.set(self.calls.get() + 1);
            if name == REDIS_RELATIONSHIP {
                self.endpoints.clone()
            } else {
                Vec::new()
            }
        }
    }

    fn stage(value: Value) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(VAR_SESSION_CONFIGURATION.to_string(), value);
        map
    }

    #[test]
    fn test_explicit_configuration_wins() {
        let stage_config = stage(json!({"save": "files"}));
        let env = RecordingRelationships::new(json!([{"host": "h", "port": "6379"}]));

        let config = SessionConfigResolver::new(&stage_config, &env).get();
        assert_eq!(config.into_value(), json!({"save": "files"}));
        assert_eq!(env.calls.get(), 0);
    }

    #[test]
    fn test_explicit_configuration_is_returned_unchanged() {
        let explicit = json!({"save": "db", "gc_maxlifetime": 1440});
        let stage_config = stage(explicit.clone());
        let env = RecordingRelationships::new(json!([]));

        let config = SessionConfigResolver::new(&stage_config, &env).get();
        assert_eq!(config.into_value(), explicit);
    }

    #[test]
    fn test_no_relationship_is_empty() {
        let stage_config = stage(json!({}));
        let env = RecordingRelationships::new(json!([]));

        let config = SessionConfigResolver::new(&stage_config, &env).get();
        assert!(config.is_empty());
        assert_eq!(env.calls.get(), 1);
    }

    #[test]
    fn test_redis_relationship_first_endpoint_only() {
        let stage_config = stage(json!({}));
        let env = RecordingRelationships::new(json!([
            {"host": "h", "port": "6379"},
            {"host": "other", "port": "6380"}
        ]));

        let config = SessionConfigResolver::new(&stage_config, &env).get();
        assert_eq!(
            config.into_value(),
            json!({"save": "redis", "redis": {"host": "h", "port": "6379", "database": 0}})
        );
    }

    #[test]
    fn test_configuration_without_save_falls_through() {
        let stage_config = stage(json!({"redis": {"host": "ignored"}}));
        let env = RecordingRelationships::new(json!([{"host": "h", "port": 6379}]));

        let config = SessionConfigResolver::new(&stage_config, &env).get().into_value();
        assert_eq!(config["save"], "redis");
        assert_eq!(config["redis"]["host"], "h");
        assert_eq!(config["redis"]["port"], 6379);
    }

    #[test]
    fn test_non_mapping_configuration_falls_through() {
        let stage_config = stage(json!("files"));
        let env = RecordingRelationships::new(json!([]));

        let config = SessionConfigResolver::new(&stage_config, &env).get();
        assert!(config.is_empty());
    }

    #[test]
    fn test_unset_configuration_uses_default() {
        let stage_config = Map::new();
        let env = RecordingRelationships::new(json!([{"host": "h", "port": "6379"}]));

        let config = SessionConfigResolver::new(&stage_config, &env).get().into_value();
        assert_eq!(config["save"], "redis");
    }
}
