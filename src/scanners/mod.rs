//! # Scanners Module
//!
//! A scanner owns one Azure resource type: its rule catalog and the call that
//! enumerates instances of that type within a [`Scope`].
//!
//! - [`Resource`] - common view of a fetched resource instance
//! - [`ResourceSource`] - external collaborator that lists instances
//! - [`Scanner`] - object-safe contract the orchestrator drives
//! - [`ResourceScanner`] - generic scanner binding a catalog to a source
//!
//! Per-type catalogs live in [`kv`], [`agw`], [`cae`] and [`plan`].

pub mod agw;
pub mod cae;
pub mod kv;
pub mod plan;
pub mod registry;
mod scope;

pub use registry::ScannerRegistry;
pub use scope::Scope;

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::error::{ProviderError, ScanError};
use crate::rules::context::ScanContext;
use crate::rules::results::ScanResult;
use crate::rules::rule::{Rule, RuleCatalog, RuleInfo};

/// A fetched resource instance.
pub trait Resource: Send + Sync + 'static {
    /// Azure resource type, e.g. "Microsoft.KeyVault/vaults"
    const RESOURCE_TYPE: &'static str;

    /// Full resource identifier; empty when the API did not report one
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn location(&self) -> Option<&str> {
        None
    }
}

/// Lists resource instances of type `R` within a scope.
#[async_trait]
pub trait ResourceSource<R: Send + 'static>: Send + Sync {
    async fn list(&self, scope: &Scope) -> Result<Vec<R>, ProviderError>;
}

/// Contract every resource-type scanner implements.
#[async_trait]
pub trait Scanner: Send + Sync {
    /// Short scanner name (e.g., "kv")
    fn name(&self) -> &'static str;

    /// Azure resource type the scanner covers
    fn resource_type(&self) -> &'static str;

    /// The rule catalog, in catalog order. Pure and deterministic.
    fn get_rules(&self) -> Vec<RuleInfo>;

    /// Fetch instances in `scope` and apply every enabled rule to each.
    ///
    /// # Errors
    ///
    /// Only a failed fetch is an error. Evaluation problems are recorded as
    /// undetermined results.
    async fn scan(&self, scope: &Scope, ctx: &ScanContext) -> Result<Vec<ScanResult>, ScanError>;
}

/// Scanner for one resource type, generic over the instance shape.
pub struct ResourceScanner<R: Resource> {
    name: &'static str,
    catalog: RuleCatalog<R>,
    source: Arc<dyn ResourceSource<R>>,
}

impl<R: Resource> ResourceScanner<R> {
    pub fn new(
        name: &'static str,
        catalog: RuleCatalog<R>,
        source: Arc<dyn ResourceSource<R>>,
    ) -> Self {
        Self {
            name,
            catalog,
            source,
        }
    }

    pub fn catalog(&self) -> &RuleCatalog<R> {
        &self.catalog
    }
}

#[async_trait]
impl<R: Resource> Scanner for ResourceScanner<R> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn resource_type(&self) -> &'static str {
        R::RESOURCE_TYPE
    }

    fn get_rules(&self) -> Vec<RuleInfo> {
        self.catalog.iter().map(|r| r.info(self.name)).collect()
    }

    async fn scan(&self, scope: &Scope, ctx: &ScanContext) -> Result<Vec<ScanResult>, ScanError> {
        let resources = self
            .source
            .list(scope)
            .await
            .map_err(|source| ScanError::Fetch {
                scanner: self.name.to_string(),
                source,
            })?;

        debug!(
            scanner = self.name,
            resources = resources.len(),
            "Fetched resources"
        );

        let resources = &resources;
        let evaluations = self
            .catalog
            .iter()
            .filter(|rule| ctx.is_rule_enabled(rule.id))
            .flat_map(|rule| resources.iter().map(move |resource| (rule, resource)))
            .map(|(rule, resource)| evaluate_one(self.name, rule, resource, ctx))
            .collect::<Vec<_>>();

        // `buffered` keeps input order, so rows come out rule-major, then by resource
        let results = stream::iter(evaluations)
            .buffered(ctx.max_concurrent_evaluations())
            .collect::<Vec<_>>()
            .await;

        Ok(results)
    }
}

async fn evaluate_one<R: Resource>(
    scanner: &str,
    rule: &Rule<R>,
    resource: &R,
    ctx: &ScanContext,
) -> ScanResult {
    let evaluation = rule.evaluate(resource, ctx).await;
    rule.result_for(scanner, resource, evaluation)
}

/// In-memory [`ResourceSource`], for tests and offline catalog runs.
pub struct StaticSource<R> {
    resources: Vec<R>,
}

impl<R> StaticSource<R> {
    pub fn new(resources: Vec<R>) -> Self {
        Self { resources }
    }
}

#[async_trait]
impl<R: Resource + Clone> ResourceSource<R> for StaticSource<R> {
    async fn list(&self, _scope: &Scope) -> Result<Vec<R>, ProviderError> {
        Ok(self.resources.clone())
    }
}
