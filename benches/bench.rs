use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use parslot::prelude::*;

#[inline]
fn fibonacci(n: u64) -> u64 {
    match n {
        0 => 0,
        1 => 1,
        _ => fibonacci(n - 1) + fibonacci(n - 2),
    }
}

fn bench_fibonacci(c: &mut Criterion) {
    for fib_n in [10, 20, 30] {
        let mut group = c.benchmark_group(format!("fibonacci/{}", fib_n));

        for num_elements in [1, 10, 100, 1_000, 10_000] {
            let elements = (0..num_elements).collect::<Vec<u64>>();

            group.bench_with_input(
                BenchmarkId::new("sequential", num_elements),
                &elements,
                |b, elements| {
                    b.iter(|| {
                        let output = elements
                            .iter()
                            .map(|n| fibonacci(black_box(fib_n)) + n)
                            .collect::<Vec<_>>();
                        black_box(output);
                    });
                },
            );

            group.bench_with_input(
                BenchmarkId::new("slice_parallel", num_elements),
                &elements,
                |b, elements| {
                    b.iter(|| {
                        let output = elements.par_map(|n| fibonacci(black_box(fib_n)) + n);
                        black_box(output);
                    });
                },
            );

            group.bench_with_input(
                BenchmarkId::new("future_parallel", num_elements),
                &elements,
                |b, elements| {
                    b.to_async(tokio::runtime::Runtime::new().unwrap())
                        .iter_batched(
                            || elements.clone(),
                            move |elements| async move {
                                let output = elements
                                    .par_map_async(move |n| fibonacci(black_box(fib_n)) + n)
                                    .await
                                    .unwrap();
                                black_box(output);
                            },
                            BatchSize::SmallInput,
                        );
                },
            );
        }
    }
}

criterion_group!(benches, bench_fibonacci);
criterion_main!(benches);
