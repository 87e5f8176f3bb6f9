use criterion::{Criterion, black_box, criterion_group, criterion_main};
use vcs_fs::{FileStore, Flush, NormalizedPath, PathPolicy, StoreExt, StoreKey, canonicalize, io};
use std::fs;
use tempfile::tempdir;

const VALUES: StoreKey<Vec<String>> = StoreKey::new("bench::Owner.values");

fn write_atomic_benchmark(c: &mut Criterion) {
    c.bench_function("io::write_atomic", |b| {
        let dir = tempdir().unwrap();
        let path = NormalizedPath::new(dir.path().join("test_file.txt"));
        let content = "hello world".as_bytes();

        b.iter(|| {
            io::write_atomic(black_box(&path), black_box(content)).unwrap();
        })
    });
}

fn canonicalize_benchmark(c: &mut Criterion) {
    c.bench_function("path::canonicalize (existing)", |b| {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("some/nested/dir");
        fs::create_dir_all(&nested).unwrap();

        b.iter(|| {
            let _ = canonicalize(black_box(&nested)).unwrap();
        })
    });

    c.bench_function("path::canonicalize (missing tail)", |b| {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("a/b/c/d");

        b.iter(|| {
            let _ = canonicalize(black_box(&missing)).unwrap();
        })
    });
}

fn policy_benchmark(c: &mut Criterion) {
    let policy = PathPolicy::default();
    let root = NormalizedPath::new("/home/user/Projects/Service");
    let deep = NormalizedPath::new("/home/user/projects/service/src/module/inner/file");

    c.bench_function("policy::is_ancestor_or_equal", |b| {
        b.iter(|| policy.is_ancestor_or_equal(black_box(&root), black_box(&deep)))
    });
}

fn file_store_benchmark(c: &mut Criterion) {
    c.bench_function("store::FileStore::put (immediate)", |b| {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("store.json")).unwrap();
        let values: Vec<String> = (0..50).map(|i| format!("/srv/share/{}", i)).collect();

        b.iter(|| {
            store
                .put(&VALUES, black_box(&values), Flush::Immediate)
                .unwrap();
        })
    });
}

criterion_group!(
    benches,
    write_atomic_benchmark,
    canonicalize_benchmark,
    policy_benchmark,
    file_store_benchmark
);
criterion_main!(benches);
