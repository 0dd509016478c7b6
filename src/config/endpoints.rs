// ABOUTME: Endpoint templates and credentials for reaching the database.
// ABOUTME: Templates use {deployment}, {namespace}, {role} and {id} placeholders.

use serde::Deserialize;
use std::time::Duration;

use super::EnvValue;

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointsConfig {
    /// Endpoint for deployment-wide requests (a coordinator or the single server).
    #[serde(default = "default_cluster")]
    pub cluster: String,

    /// Endpoint of an individual member.
    #[serde(default = "default_member")]
    pub member: String,

    /// JWT sent as bearer token.
    #[serde(default)]
    pub token: Option<EnvValue>,

    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

fn default_cluster() -> String {
    "http://{deployment}.{namespace}.svc:8529".to_string()
}

fn default_member() -> String {
    "http://{deployment}-{role}-{id}.{deployment}-int.{namespace}.svc:8529".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            cluster: default_cluster(),
            member: default_member(),
            token: None,
            request_timeout: default_request_timeout(),
        }
    }
}
