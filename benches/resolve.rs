use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ferrous_resolver::*;
use std::sync::Arc;

// ===== Micro Benchmarks =====

fn registry_resolver(services: usize) -> SharedResolver {
    let instances: Vec<AnyArc> = (0..services as u64).map(|n| Arc::new(n) as AnyArc).collect();
    let single = instances.first().cloned();
    Arc::new(DelegateResolver::new(
        move |id| {
            if *id == ServiceId::of::<u64>() {
                Ok(single.clone())
            } else {
                Ok(None)
            }
        },
        move |id| {
            if *id == ServiceId::of::<u64>() {
                Ok(instances.clone())
            } else {
                Ok(Vec::new())
            }
        },
    ))
}

fn bench_cache_hit_vs_direct(c: &mut Criterion) {
    let facade = DependencyResolver::builder().resolver(registry_resolver(1)).build();
    let id = ServiceId::of::<u64>();

    // Prime the cache
    let _ = facade.current_cache().get_service(&id);

    let mut group = c.benchmark_group("single_lookup");
    group.bench_function("cache_hit", |b| {
        b.iter(|| {
            let v = facade.current_cache().get_service(black_box(&id));
            black_box(v);
        })
    });
    group.bench_function("direct", |b| {
        b.iter(|| {
            let v = facade.current().get_service(black_box(&id));
            black_box(v);
        })
    });
    group.finish();
}

fn bench_default_activation(c: &mut Criterion) {
    #[derive(Default)]
    struct Settings {
        values: Vec<u64>,
    }

    let resolver = DefaultResolver::new();
    let id = ServiceId::constructible::<Settings>();

    c.bench_function("default_activation", |b| {
        b.iter(|| {
            let v = resolver.get_by::<Settings>(black_box(&id)).unwrap();
            black_box(v.values.len());
        })
    });
}

fn bench_multi_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_lookup");
    for services in [1usize, 8, 64] {
        let facade = DependencyResolver::builder()
            .resolver(registry_resolver(services))
            .build();
        let id = ServiceId::of::<u64>();
        let _ = facade.current_cache().get_services(&id);

        group.bench_with_input(BenchmarkId::new("cached", services), &services, |b, _| {
            b.iter(|| black_box(facade.current_cache().get_services(&id).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("direct", services), &services, |b, _| {
            b.iter(|| black_box(facade.current().get_services(&id).unwrap()))
        });
    }
    group.finish();
}

fn bench_swap(c: &mut Criterion) {
    let facade = DependencyResolver::new();

    c.bench_function("swap_reset", |b| {
        b.iter(|| facade.reset())
    });
}

criterion_group!(
    benches,
    bench_cache_hit_vs_direct,
    bench_default_activation,
    bench_multi_lookup,
    bench_swap
);
criterion_main!(benches);
