use criterion::{Criterion, black_box, criterion_group, criterion_main};
use html::perf_fixtures::make_blocks;
use html::{FragmentParser, Tokenizer, build_tree, tokenize};

const SMALL_BLOCKS: usize = 64;
const LARGE_BLOCKS: usize = 20_000;

fn make_rawtext_adversarial(bytes: usize) -> String {
    let mut body = String::with_capacity(bytes + 32);
    body.push_str("<script>");
    while body.len() < bytes {
        body.push_str("</scri");
        body.push('<');
        body.push_str("pt");
    }
    body.push_str("</script>");
    body
}

fn bench_tokenize_small(c: &mut Criterion) {
    let input = make_blocks(SMALL_BLOCKS, true);
    c.bench_function("bench_tokenize_small", |b| {
        b.iter(|| {
            let tokens = tokenize(black_box(&input));
            black_box(tokens.len());
        });
    });
}

fn bench_tokenize_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS, true);
    c.bench_function("bench_tokenize_large", |b| {
        b.iter(|| {
            let tokens = Tokenizer::new(black_box(&input)).run();
            black_box(tokens.len());
        });
    });
}

fn bench_tree_build_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS, true);
    let tokens = tokenize(&input);
    c.bench_function("bench_tree_build_large", |b| {
        b.iter(|| {
            let tree = build_tree(black_box(&tokens));
            black_box(tree.len());
        });
    });
}

fn bench_parse_large_end_to_end(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS, true);
    let parser = FragmentParser::new();
    c.bench_function("bench_parse_large_end_to_end", |b| {
        b.iter(|| {
            let tree = parser.parse(black_box(&input));
            black_box(tree.len());
        });
    });
}

fn bench_tokenize_rawtext_adversarial(c: &mut Criterion) {
    let input = make_rawtext_adversarial(512 * 1024);
    c.bench_function("bench_tokenize_rawtext_adversarial", |b| {
        b.iter(|| {
            let tokens = tokenize(black_box(&input));
            black_box(tokens.len());
        });
    });
}

criterion_group!(
    benches,
    bench_tokenize_small,
    bench_tokenize_large,
    bench_tree_build_large,
    bench_parse_large_end_to_end,
    bench_tokenize_rawtext_adversarial
);
criterion_main!(benches);
