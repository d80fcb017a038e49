//! Profile Set Benchmarks
//!
//! Scan cache rebuilds, pattern selection and device ranking over a
//! scratch directory of synthetic profiles.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use oxprof_core::{DeviceDescriptor, Profile, ProfileSet, RankMap, Signature, SignatureKind};
use oxprof_tests::ProfileDir;
use oxprof_tests::fixtures::device_profile;

const MODELS: [&str; 4] = ["X1", "X2", "Y1", "Z9"];

/// Directory with `count` display profiles spread over a few models
fn populate(count: usize) -> ProfileDir {
    let dir = ProfileDir::new().expect("temp dir");
    for i in 0..count {
        let model = MODELS[i % MODELS.len()];
        let serial = format!("{}", i % 7);
        let data = device_profile(
            &format!("Display {:04}", i),
            &[("manufacturer", "Acme"), ("model", model), ("serial", serial.as_str())],
        );
        dir.add(&format!("display_{:04}.icc", i), &data).expect("write profile");
    }
    dir
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    group.sample_size(20);

    for count in [16, 128].iter() {
        let dir = populate(*count);
        group.bench_with_input(BenchmarkId::new("rebuild", count), &dir, |b, dir| {
            b.iter(|| {
                let cache = dir.cache();
                black_box(cache.profiles().map(|p| p.len()).unwrap_or(0))
            })
        });
    }

    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select");

    for count in [16, 128].iter() {
        let dir = populate(*count);
        let cache = dir.cache();
        let _ = cache.refresh();

        group.bench_with_input(BenchmarkId::new("display_rgb", count), &cache, |b, cache| {
            b.iter(|| {
                let mut pattern = Profile::from_signature(Signature::DISPLAY_CLASS, SignatureKind::Class);
                pattern.set_signature(Signature::RGB_DATA, SignatureKind::ColorSpace);
                black_box(ProfileSet::create(cache, &[pattern], false).map(|s| s.count()))
            })
        });

        group.bench_with_input(BenchmarkId::new("device_rank", count), &cache, |b, cache| {
            let device = DeviceDescriptor::from_pairs([("manufacturer", "Acme"), ("model", "X2"), ("serial", "3")])
                .with_rank_map(RankMap::default_map());
            b.iter(|| {
                let Ok(mut set) = ProfileSet::create(cache, &[], true) else {
                    return 0;
                };
                black_box(set.device_rank(&device)).len()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scan, bench_select);
criterion_main!(benches);
