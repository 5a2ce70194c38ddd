//! Benchmark for budget-bounded summarization.
//!
//! Measures the greedy pass on generated Rust sources of increasing size, and
//! a batch of documents sharing one budget.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use kirinuki::{
    OffsetRange, OverlayNode, SummarizeOptions, SummaryDocument, SupportedLanguage,
    parse_document, summarize, summarize_one,
};
use std::hint::black_box;

/// Generate a Rust source with N small functions.
fn generate_rust_source(num_functions: usize) -> String {
    let mut source = String::with_capacity(num_functions * 80);
    source.push_str("use std::collections::HashMap;\n\n");

    for i in 0..num_functions {
        source.push_str(&format!(
            "fn function_{i}(map: &mut HashMap<u32, u32>) -> u32 {{\n    let value = {i};\n    map.insert(value, value * 2);\n    value + 1\n}}\n\n"
        ));
    }

    source
}

fn parse(source: &str) -> OverlayNode {
    parse_document(source, SupportedLanguage::Rust).expect("Should parse Rust")
}

fn benchmark_single_document(c: &mut Criterion) {
    let options = SummarizeOptions::default();
    let mut group = c.benchmark_group("summarize_single");

    for num_functions in [10, 50, 200].iter() {
        let source = generate_rust_source(*num_functions);
        let overlay = parse(&source);
        let budget = source.len() / 4;
        let anchor = source.find("let value = 5;").unwrap_or(0);
        let selection = OffsetRange::new(anchor, anchor + 3);

        group.bench_with_input(
            BenchmarkId::new("no_selection", num_functions),
            &(&source, &overlay),
            |b, (source, overlay)| {
                b.iter(|| summarize_one(source, Some(*overlay), None, black_box(budget), &options))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("with_selection", num_functions),
            &(&source, &overlay),
            |b, (source, overlay)| {
                b.iter(|| {
                    summarize_one(
                        source,
                        Some(*overlay),
                        Some(selection),
                        black_box(budget),
                        &options,
                    )
                })
            },
        );
    }

    group.finish();
}

fn benchmark_batch(c: &mut Criterion) {
    let options = SummarizeOptions::default();
    let sources: Vec<String> = (0..8).map(|i| generate_rust_source(20 + i * 5)).collect();
    let overlays: Vec<OverlayNode> = sources.iter().map(|source| parse(source)).collect();
    let budget = sources.iter().map(String::len).sum::<usize>() / 5;

    let mut group = c.benchmark_group("summarize_batch");
    group.sample_size(20);

    group.bench_function("8_documents", |b| {
        b.iter(|| {
            let documents: Vec<SummaryDocument<'_>> = sources
                .iter()
                .zip(&overlays)
                .map(|(source, overlay)| SummaryDocument::new(source, Some(overlay)))
                .collect();
            summarize(&documents, black_box(budget), &options)
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_single_document, benchmark_batch);
criterion_main!(benches);
