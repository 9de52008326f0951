use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use vaultmark_engine::parsing::{TransformPipeline, convert, lists, tokenize};
use vaultmark_engine::{ConvertContext, ConvertOptions, LineEnding, ReferenceIndex};
mod common;

fn bench_list_reconstruction(c: &mut Criterion) {
    let mut group = c.benchmark_group("lists");
    group.sample_size(10);

    let index = ReferenceIndex::new();
    let ctx = ConvertContext::new("bench", &index);
    let pipeline = TransformPipeline::with_builtins(&ConvertOptions::default()).expect("builtin transformers");

    for count in [5_000, 10_000, 20_000] {
        let markup = common::generate_list(count, 8);
        group.bench_with_input(BenchmarkId::new("build", count), &markup, |b, markup| {
            b.iter(|| {
                let tokens = pipeline.apply(tokenize(markup, LineEnding::Lf), &ctx);
                convert(tokens, &ctx)
            });
        });

        let doc = convert(pipeline.apply(tokenize(&markup, LineEnding::Lf), &ctx), &ctx).expect("list converts");
        let roots: Vec<_> = doc
            .content
            .into_iter()
            .filter_map(|b| match b {
                vaultmark_engine::BlockNode::List(list) => Some(list),
                _ => None,
            })
            .collect();
        group.bench_with_input(BenchmarkId::new("flatten", count), &roots, |b, roots| {
            b.iter(|| lists::flatten(roots));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_list_reconstruction);
criterion_main!(benches);
