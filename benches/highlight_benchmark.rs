use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use fmd_docs::cfmd;
use fmd_docs::{CLexer, Formatter, HtmlFormatter, Lexer, Token};

const EXAMPLE: &str = include_str!("../tests/fixtures/example.c");

fn bench_lexing(c: &mut Criterion) {
    let plain = CLexer::new();
    let fmd = cfmd::lexer();

    c.bench_function("c_lexer_example", |b| {
        b.iter(|| plain.tokens(black_box(EXAMPLE)).count())
    });
    c.bench_function("cfmd_lexer_example", |b| {
        b.iter(|| fmd.tokens(black_box(EXAMPLE)).count())
    });
}

fn bench_html(c: &mut Criterion) {
    let tokens: Vec<Token<'_>> = cfmd::lexer().tokens(EXAMPLE).collect();
    let classes = HtmlFormatter::new(Arc::new(cfmd::style().unwrap()));
    let inline = classes.clone().inline_styles(true);

    c.bench_function("html_classes", |b| {
        b.iter(|| classes.format(black_box(&tokens)).unwrap())
    });
    c.bench_function("html_inline_styles", |b| {
        b.iter(|| inline.format(black_box(&tokens)).unwrap())
    });
}

criterion_group!(benches, bench_lexing, bench_html);
criterion_main!(benches);
