// SPDX-License-Identifier: PMPL-1.0-or-later
//! Benchmarks for tagbot analysis

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tagbot::analyzers::reading_order::is_simple_layout;
use tagbot::config::AnalyzerConfig;
use tagbot::extraction::{BoundingBox, Extraction, Image, Page, Word};
use tagbot::Analyzer;

/// A text-heavy document: 20 pages of 40 lines with 10 words each.
fn sample_document() -> Extraction {
    let mut extraction = Extraction::new("bench.pdf").with_title("Benchmark Document");
    for number in 1..=20i64 {
        let mut page = Page::new(number, 612.0, 792.0);
        for line in 0..40 {
            let y0 = 60.0 + line as f64 * 16.0;
            let size = if line == 0 { 24.0 } else { 11.0 };
            for col in 0..10 {
                let x0 = 60.0 + col as f64 * 48.0;
                page = page.with_word(Word::new(
                    "the",
                    number,
                    BoundingBox::new(x0, y0, x0 + 40.0, y0 + size),
                    size,
                ));
            }
        }
        page = page.with_image(Image::new(
            &format!("page{}_img0", number),
            number,
            640,
            480,
            BoundingBox::new(60.0, 700.0, 260.0, 780.0),
        ));
        extraction = extraction.with_page(page);
    }
    extraction
}

fn bench_analyze_default(c: &mut Criterion) {
    let analyzer = Analyzer::new(AnalyzerConfig::default()).unwrap();
    let extraction = sample_document();

    c.bench_function("analyze_default", |b| {
        b.iter(|| analyzer.analyze(black_box(&extraction)))
    });
}

fn bench_analyze_advisory(c: &mut Criterion) {
    let analyzer = Analyzer::new(AnalyzerConfig {
        advisory_checks: true,
        ..AnalyzerConfig::default()
    })
    .unwrap();
    let extraction = sample_document();

    c.bench_function("analyze_advisory", |b| {
        b.iter(|| analyzer.analyze(black_box(&extraction)))
    });
}

fn bench_layout_detection(c: &mut Criterion) {
    let extraction = sample_document();
    let words = &extraction.pages[0].words;

    c.bench_function("simple_layout", |b| {
        b.iter(|| is_simple_layout(black_box(words), 3.0, 18.0))
    });
}

criterion_group!(
    benches,
    bench_analyze_default,
    bench_analyze_advisory,
    bench_layout_detection
);
criterion_main!(benches);
