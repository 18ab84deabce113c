//! Comparator and LDIF Codec Benchmarks
//!
//! Measures how sorting and comparing entry sets, and decoding the LDIF they
//! come from, scale with the number of entries.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use ldapunit::compare::{CompareOptions, ValueOrder, assert_entries_match_with};
use ldapunit::entry::DirectoryEntry;
use ldapunit::ldif;

/// Create a person entry with a few multi-valued attributes
fn create_person(id: usize) -> DirectoryEntry {
    DirectoryEntry::new(format!("cn=user{},ou=people,dc=example,dc=com", id))
        .with_attribute("objectClass", "top")
        .with_attribute("objectClass", "person")
        .with_attribute("objectClass", "inetOrgPerson")
        .with_attribute("cn", format!("user{}", id))
        .with_attribute("sn", "Test")
        .with_attribute("mail", format!("user{}@example.com", id))
        .with_attribute("mail", format!("user{}.alt@example.com", id))
        .with_attribute("telephoneNumber", format!("+1-555-{:04}", id % 10000))
}

fn create_entries(size: usize) -> Vec<DirectoryEntry> {
    (0..size).map(create_person).collect()
}

/// Benchmark comparing equal sets listed in opposite orders
fn bench_compare_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare_matching");

    for size in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        let expected = create_entries(*size);
        let mut actual = expected.clone();
        actual.reverse();

        for (name, order) in [
            ("unordered_values", ValueOrder::Unordered),
            ("ordered_values", ValueOrder::Ordered),
        ] {
            let options = CompareOptions::default().with_value_order(order);
            group.bench_with_input(BenchmarkId::new(name, size), size, |b, _| {
                b.iter(|| {
                    let result = assert_entries_match_with(
                        black_box(expected.clone()),
                        black_box(actual.clone()),
                        &options,
                    );
                    let _ = black_box(result);
                });
            });
        }
    }

    group.finish();
}

/// Benchmark building the report for a difference in the last entry
fn bench_compare_mismatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare_mismatch");

    for size in [10, 100, 1000].iter() {
        let expected = create_entries(*size);
        let mut actual = expected.clone();
        if let Some(last) = actual.last_mut() {
            last.add_value("description", "changed");
        }

        group.bench_with_input(BenchmarkId::new("last_entry_differs", size), size, |b, _| {
            b.iter(|| {
                let result = assert_entries_match_with(
                    black_box(expected.clone()),
                    black_box(actual.clone()),
                    &CompareOptions::default(),
                );
                black_box(result.map_err(|mismatch| mismatch.to_string()))
            });
        });
    }

    group.finish();
}

/// Benchmark LDIF decoding of server-sized exports
fn bench_ldif_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("ldif_decode");

    for size in [10, 100, 1000].iter() {
        let bytes = ldif::to_bytes(&create_entries(*size));
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("read_entries", size), size, |b, _| {
            b.iter(|| {
                let entries = ldif::read_entries(black_box(bytes.as_slice()));
                black_box(entries)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compare_matching,
    bench_compare_mismatch,
    bench_ldif_decode
);

criterion_main!(benches);
