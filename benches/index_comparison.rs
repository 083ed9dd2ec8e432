use core::hint::black_box;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::HashMap as HashbrownMap;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;
use slot_index::GrowableTable;
use slot_index::HashTable;
use slot_index::probe::DoubleHashProbe;
use slot_index::probe::Probe;
use slot_index::probe::QuadraticProbe;

const SIZES: &[usize] = &[
    (1 << 10),
    (1 << 12),
    (1 << 14),
    (1 << 16),
    (1 << 18),
];

const LOAD_FACTORS: &[f64] = &[0.5, 0.7, 0.9];

fn random_keys(count: usize) -> Vec<u64> {
    let mut rng = OsRng;
    (0..count)
        .map(|_| rng.try_next_u64().unwrap() >> 1)
        .collect()
}

fn bench_insert_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_random");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let count = size * 7 / 10;
        let keys = random_keys(count);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("slot_index/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut keys = keys.clone();
                    keys.shuffle(&mut SmallRng::from_os_rng());
                    keys
                },
                |keys| {
                    let mut table = HashTable::with_capacity(size).unwrap();
                    for (value, key) in keys.into_iter().enumerate() {
                        let _ = black_box(table.insert(key, value));
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("growable/{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut table = GrowableTable::with_capacity(16).unwrap();
                    for (value, key) in keys.into_iter().enumerate() {
                        let _ = black_box(table.insert(key, value));
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut table = HashbrownMap::with_capacity(size);
                    for (value, key) in keys.into_iter().enumerate() {
                        black_box(table.insert(key, value));
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_by_load<P: Probe>(c: &mut Criterion, name: &str, probe: P) {
    let mut group = c.benchmark_group(format!("find_hit_miss_{name}"));

    let size = 1 << 14;
    for &load in LOAD_FACTORS {
        let count = (size as f64 * load) as usize;
        let keys = random_keys(count * 2);
        let (hits, misses) = keys.split_at(count);

        let mut table = HashTable::with_capacity_and_probe(size, probe.clone()).unwrap();
        for (value, &key) in hits.iter().enumerate() {
            let _ = table.insert(key, value);
        }

        let mut lookups = hits.iter().chain(misses).copied().collect::<Vec<_>>();
        lookups.shuffle(&mut SmallRng::from_os_rng());

        group.throughput(Throughput::Elements(lookups.len() as u64));
        group.bench_function(format!("load_{load}"), |b| {
            b.iter(|| {
                for &key in &lookups {
                    let _ = black_box(table.search(key));
                }
            })
        });
    }

    group.finish();
}

fn bench_find_linear(c: &mut Criterion) {
    bench_find_by_load(c, "linear", slot_index::probe::LinearProbe);
}

fn bench_find_quadratic(c: &mut Criterion) {
    bench_find_by_load(c, "quadratic", QuadraticProbe);
}

fn bench_find_double(c: &mut Criterion) {
    bench_find_by_load(c, "double", DoubleHashProbe::default());
}

fn bench_churn_zipf(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn_zipf");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let operations = size * 3;
        let distr = Zipf::new(size as f32 * 2.0, 1.0).unwrap();
        let mut rng = SmallRng::from_os_rng();
        let workload = (0..operations)
            .map(|_| (rng.random_bool(0.5), rng.sample(distr) as u64))
            .collect::<Vec<(bool, u64)>>();

        group.throughput(Throughput::Elements(operations as u64));
        group.bench_function(format!("slot_index/{size}"), |b| {
            b.iter_batched(
                || HashTable::with_capacity(size * 2).unwrap(),
                |mut table| {
                    for (index, &(insert, key)) in workload.iter().enumerate() {
                        if insert {
                            let _ = black_box(table.insert(key, index));
                        } else {
                            let _ = black_box(table.delete(key));
                        }
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || HashbrownMap::with_capacity(size * 2),
                |mut table| {
                    for (index, &(insert, key)) in workload.iter().enumerate() {
                        if insert {
                            black_box(table.entry(key).or_insert(index));
                        } else {
                            black_box(table.remove(&key));
                        }
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_random,
    bench_find_linear,
    bench_find_quadratic,
    bench_find_double,
    bench_churn_zipf,
);

criterion_main!(benches);
