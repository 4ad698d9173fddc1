use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

use azqr::cache::DiagnosticsLookup;
use azqr::config::Config;
use azqr::error::ProviderError;
use azqr::rules::ScanOrchestrator;
use azqr::scanners::kv::{self, KeyVault, PrivateEndpointConnection, VaultProperties};
use azqr::scanners::plan::{self, AppServicePlan, PlanSku};
use azqr::scanners::{Scanner, Scope, StaticSource};
use azqr::utils::CancelSignal;

const SUB: &str = "3f2c1a9e-6b1d-4c1e-9d0a-2b7e5c8f1a23";

/// Answers instantly; every third resource has diagnostic settings
struct InstantLookup;

#[async_trait]
impl DiagnosticsLookup for InstantLookup {
    async fn has_diagnostics(&self, resource_id: &str) -> Result<bool, ProviderError> {
        Ok(resource_id.len() % 3 == 0)
    }
}

fn vaults(count: usize) -> Vec<KeyVault> {
    (0..count)
        .map(|i| KeyVault {
            id: format!(
                "/subscriptions/{}/resourceGroups/rg-{}/providers/Microsoft.KeyVault/vaults/kv-{}",
                SUB,
                i % 7,
                i
            ),
            name: format!("kv-{}", i),
            location: Some("westeurope".to_string()),
            properties: Some(VaultProperties {
                sku: None,
                private_endpoint_connections: if i % 2 == 0 {
                    vec![PrivateEndpointConnection { id: Some("/pe".to_string()) }]
                } else {
                    Vec::new()
                },
            }),
        })
        .collect()
}

fn plans(count: usize) -> Vec<AppServicePlan> {
    (0..count)
        .map(|i| AppServicePlan {
            id: format!(
                "/subscriptions/{}/resourceGroups/rg-web/providers/Microsoft.Web/serverfarms/asp-{}",
                SUB, i
            ),
            name: format!("asp-{}", i),
            sku: Some(PlanSku {
                name: Some("P1v3".to_string()),
                tier: Some(if i % 5 == 0 { "Free" } else { "PremiumV3" }.to_string()),
                capacity: Some((i % 4) as u32),
            }),
            ..Default::default()
        })
        .collect()
}

fn scanners(count: usize) -> Vec<Arc<dyn Scanner>> {
    vec![
        Arc::new(kv::scanner(Arc::new(StaticSource::new(vaults(count))))),
        Arc::new(plan::scanner(Arc::new(StaticSource::new(plans(count))))),
    ]
}

fn benchmark_full_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_scan");
    group.sample_size(20);

    for count in [10, 100, 1000] {
        let scanners = scanners(count);
        let runtime = tokio::runtime::Runtime::new().unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(count), &scanners, |b, scanners| {
            b.iter(|| {
                runtime.block_on(async {
                    let orchestrator =
                        ScanOrchestrator::new(Arc::new(InstantLookup), Config::default());
                    let report = orchestrator
                        .run(scanners, &Scope::subscription(SUB), &CancelSignal::never())
                        .await
                        .unwrap();
                    black_box(report)
                })
            });
        });
    }

    group.finish();
}

fn benchmark_sequential_evaluation(c: &mut Criterion) {
    let scanners = scanners(100);
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let config =
        Config::from_toml("[scan]\nmax_parallel_scanners = 1\nmax_concurrent_evaluations = 1\n")
            .unwrap();

    c.bench_function("sequential_scan_100", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let orchestrator = ScanOrchestrator::new(Arc::new(InstantLookup), config.clone());
                black_box(
                    orchestrator
                        .run(&scanners, &Scope::subscription(SUB), &CancelSignal::never())
                        .await
                        .unwrap(),
                )
            })
        });
    });
}

fn benchmark_catalog(c: &mut Criterion) {
    c.bench_function("rule_catalog", |b| {
        b.iter(|| {
            let catalog: Vec<_> = scanners(0).iter().flat_map(|s| s.get_rules()).collect();
            black_box(catalog)
        });
    });
}

criterion_group!(
    benches,
    benchmark_full_scan,
    benchmark_sequential_evaluation,
    benchmark_catalog
);
criterion_main!(benches);
