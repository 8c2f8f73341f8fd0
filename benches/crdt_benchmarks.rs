use criterion::{black_box, criterion_group, criterion_main, Criterion};
use notebook_crdt::prelude::*;

fn bench_grow_counter_add(c: &mut Criterion) {
    c.bench_function("GrowCounter::add x1000", |b| {
        b.iter(|| {
            let mut counter = GrowCounter::new("bench");
            for _ in 0..1000 {
                counter.add(1).unwrap();
            }
            black_box(counter.get())
        })
    });
}

fn bench_grow_counter_merge(c: &mut Criterion) {
    let counters: Vec<GrowCounter> = (0..100)
        .map(|i| {
            let mut c = GrowCounter::new(format!("node-{i}"));
            c.add(100).unwrap();
            c
        })
        .collect();

    c.bench_function("GrowCounter::merge 100 replicas", |b| {
        b.iter(|| {
            let mut merged = counters[0].clone();
            for other in &counters[1..] {
                merged.merge(other);
            }
            black_box(merged.get())
        })
    });
}

fn bench_grow_set_merge(c: &mut Criterion) {
    let mut s1 = GrowSet::new();
    let mut s2 = GrowSet::new();
    for i in 0..1000u32 {
        s1.add(i);
        s2.add(i + 500);
    }

    c.bench_function("GrowSet::merge 1000+1000 elements", |b| {
        b.iter(|| {
            let mut merged = s1.clone();
            merged.merge(&s2);
            black_box(merged.len())
        })
    });
}

fn bench_sequence_append(c: &mut Criterion) {
    c.bench_function("Sequence::append x1000", |b| {
        b.iter(|| {
            let mut seq = Sequence::new("bench");
            for i in 0..1000u32 {
                seq.append(i).unwrap();
            }
            black_box(seq.len())
        })
    });
}

fn bench_sequence_insert_front(c: &mut Criterion) {
    c.bench_function("Sequence::insert at front x500", |b| {
        b.iter(|| {
            let mut seq = Sequence::new("bench");
            for i in 0..500u32 {
                seq.insert(0, i).unwrap();
            }
            black_box(seq.len())
        })
    });
}

fn bench_sequence_merge(c: &mut Criterion) {
    let mut base = Sequence::new("base");
    base.append_many(0..500u32).unwrap();

    let mut a = Sequence::new("a");
    a.merge(&base).unwrap();
    a.append_many(500..750u32).unwrap();

    let mut b = Sequence::new("b");
    b.merge(&base).unwrap();
    b.append_many(750..1000u32).unwrap();

    c.bench_function("Sequence::merge two 250-op divergent branches", |bencher| {
        bencher.iter(|| {
            let mut merged = a.clone();
            merged.merge(&b).unwrap();
            black_box(merged.len())
        })
    });
}

fn bench_notebook_create_and_edit(c: &mut Criterion) {
    c.bench_function("Notebook::create_cell + update_cell x100", |b| {
        b.iter(|| {
            let mut nb = Notebook::new("bench");
            for i in 0..100 {
                nb.create_cell(None).unwrap();
                nb.update_cell(i, "print(1)").unwrap();
            }
            black_box(nb.len())
        })
    });
}

criterion_group!(
    benches,
    bench_grow_counter_add,
    bench_grow_counter_merge,
    bench_grow_set_merge,
    bench_sequence_append,
    bench_sequence_insert_front,
    bench_sequence_merge,
    bench_notebook_create_and_edit,
);
criterion_main!(benches);
