//! Benchmarks for constructor selection, mock dispatch and verification
//!
//! Measures how resolution scales with the number of candidate constructors
//! and how verification scales with the number of mocks in a container.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use automock_core::{AutoMockContainer, Constructor, Injectable, Mockable, SharedMock};
use mockall::automock;
use std::sync::Arc;

#[automock]
trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

impl Clock for SharedMock<MockClock> {
    fn now(&self) -> u64 {
        self.call().now()
    }
}

impl Mockable for dyn Clock {
    type Mock = MockClock;

    fn proxy(mock: SharedMock<MockClock>) -> Arc<Self> {
        Arc::new(mock)
    }

    fn checkpoint(mock: &mut MockClock) {
        mock.checkpoint();
    }

    fn loosen(mock: &mut MockClock) {
        mock.expect_now().return_const(0u64);
    }
}

struct Report {
    clock: Option<Arc<dyn Clock>>,
    pages: u32,
}

impl Injectable for Report {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![
            Constructor::new("empty").build(|_| {
                Ok(Report {
                    clock: None,
                    pages: 0,
                })
            }),
            Constructor::new("with_pages")
                .value::<u32>()
                .build(|args| {
                    Ok(Report {
                        clock: None,
                        pages: args.value()?,
                    })
                }),
            Constructor::new("with_clock")
                .param::<Arc<dyn Clock>>()
                .value::<u32>()
                .build(|args| {
                    Ok(Report {
                        clock: args.next()?,
                        pages: args.value()?,
                    })
                }),
        ]
    }
}

/// Benchmark `get` with and without the clock bound
fn benchmark_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");

    group.bench_function("unbound", |b| {
        let container = AutoMockContainer::new();
        b.iter(|| {
            let report = container.get::<Report>().unwrap();
            black_box(report.pages)
        });
    });

    group.bench_function("mock_bound", |b| {
        let mut container = AutoMockContainer::new();
        container.stub::<dyn Clock>();
        container.register(|| 12u32);
        b.iter(|| {
            let report = container.get::<Report>().unwrap();
            black_box(report.clock.is_some())
        });
    });

    group.finish();
}

/// Benchmark a configured call through the proxy object
fn benchmark_dispatch(c: &mut Criterion) {
    let mut container = AutoMockContainer::new();
    let clock = container.stub::<dyn Clock>();
    clock.lock().expect_now().return_const(1_700_000_000u64);
    let object = clock.object();

    c.bench_function("mock_dispatch", |b| b.iter(|| black_box(object.now())));
}

/// Benchmark verification with a growing number of satisfied mocks
fn benchmark_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("verification");

    for mock_count in [1, 10, 100, 1000].iter() {
        group.bench_with_input(
            BenchmarkId::new("satisfied_mocks", mock_count),
            mock_count,
            |b, &size| {
                let mut container = AutoMockContainer::new();
                for _ in 0..size {
                    let clock = container.mock::<dyn Clock>();
                    clock.lock().expect_now().return_const(0u64);
                    clock.object().now();
                }

                b.iter(|| black_box(container.verify().is_ok()));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_resolution,
    benchmark_dispatch,
    benchmark_verification
);
criterion_main!(benches);
