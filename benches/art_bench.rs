use std::collections::BTreeMap;
use std::hint::black_box;
use std::time::Instant;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::seq::SliceRandom;
use rand::{Rng, rng};

use radix_art::AdaptiveRadixTree;

pub fn seq_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("seq_insert");
    group.throughput(Throughput::Elements(1));
    group.bench_function("art", |b| {
        let mut tree = AdaptiveRadixTree::new();
        let mut key = 0u64;
        b.iter(|| {
            tree.insert(key.to_be_bytes(), key);
            key += 1;
        })
    });
    group.bench_function("btree", |b| {
        let mut tree = BTreeMap::new();
        let mut key = 0u64;
        b.iter(|| {
            tree.insert(key.to_be_bytes(), key);
            key += 1;
        })
    });

    group.finish();
}

pub fn rand_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("rand_insert");
    group.throughput(Throughput::Elements(1));

    let keys = gen_keys(3, 2, 3);

    group.bench_function("art", |b| {
        let mut tree = AdaptiveRadixTree::new();
        let mut rng = rng();
        b.iter(|| {
            let key = &keys[rng.random_range(0..keys.len())];
            tree.insert(key, key.len());
        })
    });
    group.bench_function("btree", |b| {
        let mut tree = BTreeMap::new();
        let mut rng = rng();
        b.iter(|| {
            let key = &keys[rng.random_range(0..keys.len())];
            tree.insert(key.clone(), key.len());
        })
    });

    group.finish();
}

pub fn seq_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("seq_delete");
    group.throughput(Throughput::Elements(1));
    group.bench_function("art", |b| {
        let mut tree = AdaptiveRadixTree::new();
        b.iter_custom(|iters| {
            for i in 0..iters {
                tree.insert(i.to_be_bytes(), i);
            }
            let start = Instant::now();
            for i in 0..iters {
                black_box(tree.remove(i.to_be_bytes()));
            }
            start.elapsed()
        })
    });

    group.finish();
}

pub fn rand_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("rand_delete");
    let keys = gen_keys(3, 2, 3);

    group.throughput(Throughput::Elements(1));
    group.bench_function("art", |b| {
        let mut tree = AdaptiveRadixTree::new();
        let mut rng = rng();
        for key in &keys {
            tree.insert(key, key.len());
        }
        b.iter(|| {
            let key = &keys[rng.random_range(0..keys.len())];
            black_box(tree.remove(key));
        })
    });

    group.finish();
}

pub fn rand_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_get");
    group.throughput(Throughput::Elements(1));

    for size in [1_000u64, 100_000, 1_000_000] {
        group.bench_with_input(BenchmarkId::new("art", size), &size, |b, size| {
            let mut tree = AdaptiveRadixTree::new();
            for i in 0..*size {
                tree.insert(i.to_be_bytes(), i);
            }
            let mut rng = rng();
            b.iter(|| {
                let key = rng.random_range(0..*size);
                black_box(tree.get(key.to_be_bytes()));
            })
        });
        group.bench_with_input(BenchmarkId::new("btree", size), &size, |b, size| {
            let mut tree = BTreeMap::new();
            for i in 0..*size {
                tree.insert(i.to_be_bytes(), i);
            }
            let mut rng = rng();
            b.iter(|| {
                let key = rng.random_range(0..*size);
                black_box(tree.get(&key.to_be_bytes()));
            })
        });
    }

    group.finish();
}

pub fn rand_get_str(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_get_str");
    let keys = gen_keys(3, 2, 3);

    group.throughput(Throughput::Elements(1));
    group.bench_function("art", |b| {
        let mut tree = AdaptiveRadixTree::new();
        for (i, key) in keys.iter().enumerate() {
            tree.insert(key, i);
        }
        let mut rng = rng();
        b.iter(|| {
            let key = &keys[rng.random_range(0..keys.len())];
            black_box(tree.get(key));
        })
    });

    group.finish();
}

pub fn full_iter(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_iter");
    let keys = gen_keys(3, 2, 3);
    let tree: AdaptiveRadixTree<usize> = keys.iter().map(|k| (k, k.len())).collect();

    group.throughput(Throughput::Elements(tree.len() as u64));
    group.bench_function("art", |b| {
        b.iter(|| {
            for entry in tree.iter() {
                black_box(entry);
            }
        })
    });

    group.finish();
}

fn gen_keys(l1_prefix: usize, l2_prefix: usize, suffix: usize) -> Vec<String> {
    let mut keys = Vec::new();
    let chars: Vec<char> = ('a'..='z').collect();
    let mut rng = rng();
    for c1 in &chars {
        let level1_prefix = c1.to_string().repeat(l1_prefix);
        for c2 in &chars {
            let key_prefix = level1_prefix.clone() + &c2.to_string().repeat(l2_prefix);
            for _ in 0..=u8::MAX {
                let suffix: String = (0..suffix)
                    .map(|_| chars[rng.random_range(0..chars.len())])
                    .collect();
                keys.push(key_prefix.clone() + &suffix);
            }
        }
    }

    keys.shuffle(&mut rng);
    keys
}

criterion_group!(
    delete_benches,
    seq_delete,
    rand_delete,
);
criterion_group!(insert_benches, seq_insert, rand_insert);
criterion_group!(retr_benches, rand_get, rand_get_str, full_iter);
criterion_main!(retr_benches, insert_benches, delete_benches);
