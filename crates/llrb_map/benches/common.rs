use std::collections::BTreeMap;
use std::hint::black_box;
use std::time::{Duration, Instant};

use bench::{
    apply_large_runtime_config, apply_medium_runtime_config, apply_small_runtime_config,
    default_rng, lookup_key, mix_seed, scattered_keys, seed_for_iter,
};
use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, BenchmarkId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use llrb_map::{LlrbMap, OrderedMap};

const SIZES: [usize; 4] = [1_000, 16_000, 64_000, 256_000];
const BUILD_SIZES: [usize; 2] = [1_000, 16_000];
const OPS_PER_ITER: usize = 200;
const GET_HIT_RATE_PERCENT: u64 = 80;
const MIXED_UPDATE_PERCENT: u64 = 20; // half inserts, half removes.

#[derive(Clone)]
enum Op {
    Get { key: u64 },
    Insert { key: u64, value: u64 },
    Remove { key: u64 },
}

fn filled<M>(keys: &[u64], seed: u64) -> M
where
    M: OrderedMap<Key = u64, Value = u64>,
{
    let mut rng = StdRng::seed_from_u64(seed);
    let mut map = M::new();
    for &k in keys {
        black_box(map.insert(k, rng.random()));
    }
    map
}

fn run_ops<M>(map: &mut M, ops: &[Op])
where
    M: OrderedMap<Key = u64, Value = u64>,
{
    for op in ops {
        match *op {
            Op::Get { key } => {
                black_box(map.get(&key).copied());
            }
            Op::Insert { key, value } => {
                black_box(map.insert(key, value));
            }
            Op::Remove { key } => {
                black_box(map.remove(&key));
            }
        }
    }
}

/// Runs freshly generated ops against a prebuilt map, timing only the ops.
fn bench_ops<M, T, G>(
    group: &mut BenchmarkGroup<'_, T>,
    label: &str,
    workload_id: u64,
    mut generate: G,
) where
    T: Measurement<Value = Duration>,
    M: OrderedMap<Key = u64, Value = u64>,
    G: FnMut(&[u64], u64, &mut StdRng) -> Vec<Op>,
{
    for &size in &SIZES {
        let base_seed = mix_seed(0x0DDB_A11A_2026_0000_u64 ^ (workload_id << 48) ^ size as u64);
        let keys = scattered_keys(size, base_seed);
        let mut map: M = filled(&keys, base_seed ^ 0x11_22_33_44);

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for iter in 0..iters {
                    let mut rng = StdRng::seed_from_u64(seed_for_iter(base_seed, iter));
                    let ops = generate(keys.as_slice(), iter, &mut rng);
                    let start = Instant::now();
                    run_ops(&mut map, &ops);
                    black_box(map.len());
                    total += start.elapsed();
                }
                total
            })
        });
    }
}

fn read_ops(keys: &[u64], _iter: u64, rng: &mut StdRng) -> Vec<Op> {
    (0..OPS_PER_ITER)
        .map(|_| Op::Get {
            key: lookup_key(rng, keys, GET_HIT_RATE_PERCENT),
        })
        .collect()
}

/// Inserts fresh keys and removes each of them again within the same batch,
/// so the map returns to its initial contents.
fn update_ops(keys: &[u64], iter: u64, rng: &mut StdRng, update_percent: u64) -> Vec<Op> {
    let fresh_seed = mix_seed(keys.len() as u64 ^ iter.wrapping_mul(0xA5A5_A5A5));
    let mut live = Vec::new();
    let mut next_fresh = 0_u64;
    let mut ops = Vec::with_capacity(OPS_PER_ITER);
    while ops.len() < OPS_PER_ITER {
        let remaining = OPS_PER_ITER - ops.len();
        if remaining <= live.len() {
            let idx = rng.random_range(0..live.len());
            ops.push(Op::Remove {
                key: live.swap_remove(idx),
            });
        } else if rng.random_range(0..100) >= update_percent {
            ops.push(Op::Get {
                key: lookup_key(rng, keys, GET_HIT_RATE_PERCENT),
            });
        } else if live.is_empty() || rng.random::<bool>() {
            // High bit keeps fresh keys apart from the prebuilt ones in practice.
            let key = mix_seed(fresh_seed ^ next_fresh) | (1 << 63);
            next_fresh += 1;
            live.push(key);
            ops.push(Op::Insert {
                key,
                value: rng.random(),
            });
        } else {
            let idx = rng.random_range(0..live.len());
            ops.push(Op::Remove {
                key: live.swap_remove(idx),
            });
        }
    }
    ops
}

fn bench_build_teardown<M, T>(group: &mut BenchmarkGroup<'_, T>, label: &str)
where
    T: Measurement<Value = Duration>,
    M: OrderedMap<Key = u64, Value = u64>,
{
    for &size in &BUILD_SIZES {
        let mut rng = default_rng();
        let keys = scattered_keys(size, rng.random());
        let mut removal_order = keys.clone();
        removal_order.shuffle(&mut rng);

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter(|| {
                let mut map: M = filled(&keys, size as u64);
                for k in &removal_order {
                    black_box(map.remove(k));
                }
                black_box(map.is_empty())
            })
        });
    }
}

pub fn bench_all_read<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    apply_small_runtime_config(group);
    bench_ops::<BTreeMap<u64, u64>, _, _>(group, "std_btree", 1, read_ops);
    bench_ops::<LlrbMap<u64, u64>, _, _>(group, "llrb", 1, read_ops);
}

pub fn bench_all_update<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    apply_small_runtime_config(group);
    let ops = |keys: &[u64], iter, rng: &mut StdRng| update_ops(keys, iter, rng, 100);
    bench_ops::<BTreeMap<u64, u64>, _, _>(group, "std_btree", 2, ops);
    bench_ops::<LlrbMap<u64, u64>, _, _>(group, "llrb", 2, ops);
}

pub fn bench_all_mixed<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    apply_medium_runtime_config(group);
    let ops =
        |keys: &[u64], iter, rng: &mut StdRng| update_ops(keys, iter, rng, MIXED_UPDATE_PERCENT);
    bench_ops::<BTreeMap<u64, u64>, _, _>(group, "std_btree", 3, ops);
    bench_ops::<LlrbMap<u64, u64>, _, _>(group, "llrb", 3, ops);
}

pub fn bench_all_build_teardown<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    apply_large_runtime_config(group);
    bench_build_teardown::<BTreeMap<u64, u64>, _>(group, "std_btree");
    bench_build_teardown::<LlrbMap<u64, u64>, _>(group, "llrb");
}
