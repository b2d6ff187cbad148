//! Similarity metric and end-to-end extraction benchmarks
//!
//! - class-string similarity for typical generated class names
//! - seeded extraction over a page with a few hundred list items

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use listing_inference::{ListExtractor, SeedPoint, StaticHtmlTree, similarity};

fn catalog(items: usize) -> String {
    let cards: String = (0..items)
        .map(|i| format!(r#"<div class="card card-{}"><h3>Item {i}</h3><span class="price">${i}</span></div>"#, i % 3))
        .collect();
    format!(r#"<html><body><nav class="menu"><a href="/">Home</a></nav><div class="grid">{cards}</div></body></html>"#)
}

fn similarity_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity");
    let pairs = [
        ("short", "card", "cart"),
        ("generated", "product-tile__wrapper--8f2a1", "product-tile__wrapper--8f2b7"),
        (
            "utility",
            "flex flex-col gap-2 rounded-lg border p-4 shadow-sm hover:shadow-md",
            "flex flex-col gap-2 rounded-lg border p-4 shadow hover:shadow-lg",
        ),
    ];
    for (name, a, b) in pairs {
        group.bench_with_input(BenchmarkId::from_parameter(name), &(a, b), |bench, (a, b)| {
            bench.iter(|| similarity(black_box(a), black_box(b)));
        });
    }
    group.finish();
}

fn extraction_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");
    for items in [50, 500] {
        let page = StaticHtmlTree::parse(&catalog(items));
        let seeds: Vec<SeedPoint> = page
            .select("div.card h3")
            .unwrap()
            .into_iter()
            .step_by(10)
            .map(SeedPoint::node)
            .collect();
        let extractor = ListExtractor::default();

        group.bench_with_input(BenchmarkId::new("seeded", items), &seeds, |bench, seeds| {
            bench.iter(|| extractor.extract(black_box(&page), black_box(seeds)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("scan", items), &page, |bench, page| {
            bench.iter(|| extractor.scan_document(black_box(page)));
        });
    }
    group.finish();
}

criterion_group!(benches, similarity_benchmark, extraction_benchmark);
criterion_main!(benches);
