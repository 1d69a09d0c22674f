use criterion::{Criterion, criterion_group, criterion_main};
use record_bind::{Bind, Convertible, DynMap, DynValue, Marshaller, convertible, dyn_map};
use std::hint::black_box;

// ─── Test Data ──────────────────────────────────────────────────────────────

struct User {
    _id: Bind<String>,
    _name: Bind<String>,
    _age: Bind<i64>,
    _score: Bind<f64>,
    _active: Bind<bool>,
    _version: Bind<u64>,
    _tags: Bind<Vec<String>>,
    _profile: Bind<Profile>,
}

impl Default for User {
    fn default() -> Self {
        Self {
            _id: Bind::new(),
            _name: Bind::new(),
            _age: Bind::new(),
            _score: Bind::new(),
            _active: Bind::with_value(true),
            _version: Bind::with_key("rev"),
            _tags: Bind::new(),
            _profile: Bind::new(),
        }
    }
}

convertible!(User { _id, _name, _age, _score, _active, _version, _tags, _profile });

#[derive(Default)]
struct Profile {
    _bio: Bind<String>,
    _avatar: Bind<String>,
    _theme: Bind<String>,
}

convertible!(Profile { _bio, _avatar, _theme });

/// Every field of `User` present with a matching type.
fn make_user_map() -> DynMap {
    dyn_map!({
        "id" => "user:abc123",
        "name" => "Alice",
        "age" => (28i64),
        "score" => (99.5f64),
        "active" => true,
        "rev" => (1000u64),
        "tags" => (vec![DynValue::from("developer"), DynValue::from("rust")]),
        "profile" => {
            "bio" => "Software engineer",
            "avatar" => "https://example.com/avatar.jpg",
            "theme" => "dark",
        },
    })
}

/// Same keys, every value the wrong type, plus unknown keys.
fn make_mismatched_map() -> DynMap {
    dyn_map!({
        "id" => (1i64),
        "name" => false,
        "age" => "28",
        "score" => (99i64),
        "active" => "yes",
        "rev" => (-1i64),
        "tags" => "developer",
        "profile" => "flat",
        "deleted" => false,
        "metadata" => (DynValue::Null),
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 1: Record → map
// ═══════════════════════════════════════════════════════════════════════════

fn bench_to_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_map");

    let user = User::from_map(&make_user_map());
    let empty = User::default();
    let marshaller = Marshaller::new();

    group.bench_function("full record", |b| {
        b.iter(|| black_box(marshaller.to_map(black_box(&user))))
    });

    group.bench_function("default record", |b| {
        b.iter(|| black_box(marshaller.to_map(black_box(&empty))))
    });

    group.bench_function("to_value + serde_json", |b| {
        b.iter(|| {
            let json: serde_json::Value = black_box(&user).to_value().into();
            black_box(json)
        })
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 2: Map → record
// ═══════════════════════════════════════════════════════════════════════════

fn bench_from_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("from_map");

    let full = make_user_map();
    let mismatched = make_mismatched_map();
    let empty = DynMap::new();
    let marshaller = Marshaller::new();

    group.bench_function("all fields match", |b| {
        b.iter(|| black_box(marshaller.from_map(black_box(&full), User::default)))
    });

    group.bench_function("all fields mismatch", |b| {
        b.iter(|| black_box(marshaller.from_map(black_box(&mismatched), User::default)))
    });

    group.bench_function("empty map", |b| {
        b.iter(|| black_box(marshaller.from_map(black_box(&empty), User::default)))
    });

    group.finish();
}

// ─── Criterion Main ─────────────────────────────────────────────────────────

criterion_group!(benches, bench_to_map, bench_from_map);
criterion_main!(benches);
