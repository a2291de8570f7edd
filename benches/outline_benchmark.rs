//! Benchmarks for outline extraction.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use pdfoutline::outline::{extract_outline, pattern};
use pdfoutline::Fragment;

/// Creates a synthetic document: one heading followed by body text per page.
fn create_fragments(page_count: u32) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    for page in 1..=page_count {
        fragments.push(Fragment::new(format!("{}. Section Heading", page), page, 18.0).with_bold(true));
        for line in 0..40 {
            fragments.push(Fragment::new(
                format!("This is body line {} with the usual running text.", line),
                page,
                10.0,
            ));
        }
    }
    fragments
}

/// Creates a minimal synthetic PDF with the given number of pages.
fn create_test_pdf(page_count: usize) -> Vec<u8> {
    let mut content = String::new();

    content.push_str("%PDF-1.4\n");
    content.push_str("1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

    let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", i + 4)).collect();
    content.push_str(&format!(
        "2 0 obj\n<< /Type /Pages /Kids [{}] /Count {} /MediaBox [0 0 612 792] >>\nendobj\n",
        kids.join(" "),
        page_count
    ));
    content.push_str(
        "3 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold >>\nendobj\n",
    );

    let mut next_obj = 4 + page_count;
    for i in 0..page_count {
        let page_obj = 4 + i;
        let content_obj = next_obj;
        next_obj += 1;

        content.push_str(&format!(
            "{} 0 obj\n<< /Type /Page /Parent 2 0 R /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>\nendobj\n",
            page_obj, content_obj
        ));

        let text = format!(
            "BT /F1 18 Tf 72 720 Td ({}. Section Heading) Tj /F1 10 Tf 0 -24 Td (Body text of page {}.) Tj ET",
            i + 1,
            i + 1
        );
        content.push_str(&format!(
            "{} 0 obj\n<< /Length {} >>\nstream\n{}\nendstream\nendobj\n",
            content_obj,
            text.len(),
            text
        ));
    }

    // Offsets are placeholders; lopdf rebuilds the table when it is wrong.
    let xref_offset = content.len();
    content.push_str(&format!("xref\n0 {}\n", next_obj));
    content.push_str("0000000000 65535 f \n");
    for _ in 1..next_obj {
        content.push_str("0000000000 00000 n \n");
    }
    content.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        next_obj, xref_offset
    ));

    content.into_bytes()
}

/// Benchmark the pattern scorer.
fn bench_pattern_score(c: &mut Criterion) {
    let texts = [
        "INTRODUCTION",
        "2.1 Related Work",
        "Chapter 3 Results",
        "This is body text that goes on for a while.",
    ];

    c.bench_function("pattern_score", |b| {
        b.iter(|| {
            for text in &texts {
                black_box(pattern::score(black_box(text)));
            }
        });
    });
}

/// Benchmark the heuristic pipeline at various document sizes.
fn bench_extract_outline(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_outline");

    for page_count in [1, 10, 100] {
        let fragments = create_fragments(page_count);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_pages", page_count)),
            &fragments,
            |b, fragments| b.iter(|| extract_outline(black_box(fragments))),
        );
    }

    group.finish();
}

/// Benchmark decoding plus outline extraction.
fn bench_outline_bytes(c: &mut Criterion) {
    let mut group = c.benchmark_group("outline_bytes");

    for page_count in [1, 5, 10] {
        let data = create_test_pdf(page_count);
        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| {
                let _ = pdfoutline::outline_bytes(black_box(&data));
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_pattern_score,
    bench_extract_outline,
    bench_outline_bytes,
);
criterion_main!(benches);
