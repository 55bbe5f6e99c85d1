//! # Frontend and Extra Contributors
//!
//! Supplementary, non-authoritative health details. Contributors only ever
//! add entries to the result details; they never influence the verdict.
//!
//! The aggregator always holds a [`FrontendHealthContributor`]. When none is
//! wired in it holds [`UnknownFrontend`], which reports
//! `{"operational": "unknown"}`.

use serde_json::{Map, Value};

use crate::constants::fields;

/// Supplies UI / presentation-layer health details.
///
/// The returned map is owned by the caller, so later changes on the
/// contributor side cannot reach a result that was already built.
pub trait FrontendHealthContributor: Send + Sync {
    fn frontend_details(&self) -> Map<String, Value>;
}

/// Placeholder used when no frontend is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownFrontend;

impl UnknownFrontend {
    pub fn details() -> Map<String, Value> {
        let mut details = Map::new();
        details.insert(
            fields::OPERATIONAL.to_string(),
            Value::String(fields::UNKNOWN.to_string()),
        );
        details
    }
}

impl FrontendHealthContributor for UnknownFrontend {
    fn frontend_details(&self) -> Map<String, Value> {
        Self::details()
    }
}

/// Fixed frontend details, typically read from configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticFrontend {
    details: Map<String, Value>,
}

impl StaticFrontend {
    pub fn new(details: Map<String, Value>) -> Self {
        Self { details }
    }
}

impl<K, V> FromIterator<(K, V)> for StaticFrontend
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            details: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl FrontendHealthContributor for StaticFrontend {
    fn frontend_details(&self) -> Map<String, Value> {
        self.details.clone()
    }
}

impl<F> FrontendHealthContributor for F
where
    F: Fn() -> Map<String, Value> + Send + Sync,
{
    fn frontend_details(&self) -> Map<String, Value> {
        self()
    }
}

/// Additional named detail source, appended after the frontend entry.
pub trait HealthContributor: Send + Sync {
    /// Detail key; must not collide with the core subsystem keys.
    fn name(&self) -> &str;

    fn details(&self) -> Map<String, Value>;
}
