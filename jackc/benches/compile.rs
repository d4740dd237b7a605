use criterion::{black_box, criterion_group, criterion_main, Criterion};

use jackc::prelude::*;

fn criterion_benchmark(c: &mut Criterion) {
    {
        let source = include_str!("../tests/Point.jack");

        c.bench_function("compile point", |b| {
            b.iter(|| black_box(compile_str(black_box(source))))
        });
    }

    {
        let source = include_str!("../tests/Main.jack");

        c.bench_function("tokenize main", |b| {
            b.iter(|| {
                let count = Lexer::new(black_box(source)).into_iter().count();
                black_box(count)
            })
        });
    }

    {
        let source = include_str!("../tests/Counter.jack");

        c.bench_function("annotated tree counter", |b| {
            b.iter(|| black_box(parse_tree_xml(black_box(source), true)))
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
