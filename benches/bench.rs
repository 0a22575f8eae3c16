use std::{sync::Arc, thread};

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use remcache::LruCache;

fn insert_evicting(c: &mut Criterion) {
    c.bench_function("insert_evicting", |b| {
        let cache = LruCache::new(1024).expect("valid capacity");
        let mut key = 0u64;

        b.iter(|| {
            key += 1;
            black_box(cache.insert(key, key));
        });
    });
}

fn find_hit(c: &mut Criterion) {
    c.bench_function("find_hit", |b| {
        let cache = LruCache::new(1024).expect("valid capacity");
        for i in 0..1024u64 {
            cache.insert(i, i);
        }
        let keys: Vec<u64> = (0..1024).map(|_| rand::random_range(0..1024)).collect();
        let mut idx = 0;

        b.iter(|| {
            idx = (idx + 1) % keys.len();
            black_box(cache.find(&keys[idx]));
        });
    });
}

fn contended_mixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_mixed");
    for threads in [1usize, 2, 4, 8].iter() {
        group.bench_with_input(format!("{}_threads", threads), threads, |b, &size| {
            let cache = Arc::new(LruCache::new(4096).expect("valid capacity"));

            b.iter(|| {
                const OPS: u64 = 1000;
                let handles: Vec<_> = (0..size)
                    .map(|t| {
                        let cache = Arc::clone(&cache);
                        thread::spawn(move || {
                            for i in 0..OPS {
                                let key = rand::random_range(0..8192u64);
                                // one write per four operations
                                if (i + t as u64) % 4 == 0 {
                                    cache.insert(key, i);
                                } else {
                                    black_box(cache.find(&key));
                                }
                            }
                        })
                    })
                    .collect();
                for h in handles {
                    h.join().expect("bench thread panicked");
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, insert_evicting, find_hit, contended_mixed);
criterion_main!(benches);
