//! Profile Benchmarks
//!
//! Hashing, re-serialization and rank sorting on synthetic profiles.

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use oxprof_core::hash::{compute_md5, profile_hash};
use oxprof_core::icc::{TagEntry, align4, table_end, write_tag_table};
use oxprof_core::{
    CodecRegistry, HashSource, LoadOptions, ParentKind, Profile, RefContainer, Signature, TagValue,
};

/// Profile with `count` text tags of `text_len` bytes each
fn generate_profile(count: usize, text_len: usize) -> Vec<u8> {
    let registry = CodecRegistry::global();
    let text: String = (0..text_len).map(|i| (b'a' + (i % 26) as u8) as char).collect();
    let block = registry
        .encode(Signature::TYPE_TEXT, &[TagValue::text(text)], 4)
        .unwrap_or_default();

    let mut offset = table_end(count);
    let mut entries = Vec::with_capacity(count);
    for i in 0..count {
        entries.push(TagEntry {
            signature: Signature(0x7430_0000 + i as u32),
            offset: offset as u32,
            size: block.len() as u32,
        });
        offset = align4(offset + block.len());
    }

    let mut data = vec![0u8; offset];
    data[0..4].copy_from_slice(&(offset as u32).to_be_bytes());
    data[8..12].copy_from_slice(&[4, 0x30, 0, 0]);
    data[16..20].copy_from_slice(b"RGB ");
    data[36..40].copy_from_slice(b"acsp");
    write_tag_table(&mut data, &entries);
    for entry in &entries {
        let start = entry.offset as usize;
        data[start..start + block.len()].copy_from_slice(&block);
    }
    data
}

fn bench_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash");

    for tags in [4, 32, 256].iter() {
        let data = generate_profile(*tags, 200);
        group.throughput(Throughput::Bytes(data.len() as u64));

        group.bench_with_input(BenchmarkId::new("compute_md5", tags), &data, |b, data| {
            b.iter(|| compute_md5(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("header_or_compute", tags), &data, |b, data| {
            b.iter(|| profile_hash(black_box(data), HashSource::Header))
        });
    }

    group.finish();
}

fn bench_get_mem(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_mem");

    for tags in [4, 32, 256].iter() {
        let data = generate_profile(*tags, 200);
        let Ok(mut profile) = Profile::from_memory(&data, LoadOptions::default()) else {
            continue;
        };

        group.bench_with_input(BenchmarkId::new("unmodified", tags), &profile, |b, profile| {
            b.iter(|| black_box(profile.get_mem()))
        });

        if profile.add_tag_text(Signature::DESC, "Replaced").is_ok() {
            group.bench_with_input(BenchmarkId::new("regenerated", tags), &profile, |b, profile| {
                b.iter(|| black_box(profile.get_mem()))
            });
        }
    }

    group.finish();
}

fn bench_sort_by_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_by_rank");

    for size in [16, 256, 1024].iter() {
        let ranks: Vec<i32> = (0..*size).map(|i| ((i * 37) % 23) as i32 - 11).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &ranks, |b, ranks| {
            b.iter(|| {
                let mut list = RefContainer::new(ParentKind::Detached);
                for i in 0..ranks.len() {
                    let _ = list.move_in(Arc::new(i), None);
                }
                let mut ranks = ranks.clone();
                list.sort_by_rank(&mut ranks);
                black_box(list.count())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_hash, bench_get_mem, bench_sort_by_rank);
criterion_main!(benches);
