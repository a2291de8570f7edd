//! Integration tests for the outline pipeline on synthetic fragments.

use std::collections::HashSet;

use pdfoutline::outline::{classify, clean_text, confidence, detect_title, pattern};
use pdfoutline::{outline_fragments, DocumentResult, Fragment, HeadingLevel};

const TEXTS: &[&str] = &[
    "INTRODUCTION",
    "Introduction",
    "introduction",
    "1. Background",
    "2.1 Related Work",
    "3.2.1 Data Sources",
    "Chapter 4 Results",
    "CHAPTER 5",
    "  •  Key Findings ",
    "- Summary",
    "The study was conducted with the help of many volunteers.",
    "This is a sentence. And another one.",
    "Methods and Materials",
    "ab",
    "Appendix",
    "appendix",
    "Table of Contents",
    "Acknowledgements!",
    "e.g. something.",
    "Überblick",
];

const SIZES: &[f32] = &[9.0, 10.0, 10.0, 11.0, 12.0, 12.0, 14.0, 16.0, 18.0, 24.0];

/// Small xorshift generator so the synthetic documents are reproducible.
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next() % items.len() as u64) as usize]
    }
}

fn synthetic_document(seed: u64, len: usize) -> Vec<Fragment> {
    let mut rng = Rng(seed);
    let mut page = 1;
    (0..len)
        .map(|_| {
            if rng.next() % 5 == 0 {
                page += 1;
            }
            Fragment::new(*rng.pick(TEXTS), page, *rng.pick(SIZES)).with_bold(rng.next() % 3 == 0)
        })
        .collect()
}

fn body(count: usize, page: u32, size: f32) -> Vec<Fragment> {
    (0..count).map(|_| Fragment::new("ok", page, size)).collect()
}

#[test]
fn test_zero_fragments() {
    let result = outline_fragments(&[]);
    assert_eq!(result.title, "Untitled Document");
    assert!(result.outline.is_empty());
    assert_eq!(result, DocumentResult::untitled());
}

#[test]
fn test_large_bold_heading_is_h1() {
    // Mean font size: (24 + 3 * 8) / 4 = 12
    let mut fragments = vec![Fragment::new("INTRODUCTION", 1, 24.0).with_bold(true)];
    fragments.extend(body(3, 1, 8.0));

    let result = outline_fragments(&fragments);
    assert_eq!(result.outline.len(), 1);
    let entry = &result.outline[0];
    assert_eq!(entry.level, HeadingLevel::H1);
    assert_eq!(entry.text, "INTRODUCTION");
    assert_eq!(entry.page, 1);
}

#[test]
fn test_sentence_is_never_a_heading() {
    let text = "The quick brown fox jumps over the lazy dog and continues for a while.";
    for size in [8.0, 12.0, 24.0, 48.0] {
        let fragment = Fragment::new(text, 1, size).with_bold(true);
        assert_eq!(classify(&fragment, 12.0), None);
    }
}

#[test]
fn test_same_page_duplicate_keeps_higher_confidence() {
    // Mean font size: (13 + 18 + 8 * 10) / 10 = 11.1
    let mut fragments = vec![
        Fragment::new("methods", 2, 13.0),
        Fragment::new("Methods", 2, 18.0).with_bold(true),
    ];
    fragments.extend(body(8, 2, 10.0));

    let result = outline_fragments(&fragments);
    assert_eq!(result.outline.len(), 1);
    assert_eq!(result.outline[0].text, "Methods");
    assert_eq!(result.outline[0].level, HeadingLevel::H1);
    assert_eq!(result.outline[0].page, 2);
}

#[test]
fn test_small_duplicates_keep_stronger_one() {
    // Mean font size: (6 + 6 + 4 * 14) / 6 = 11.33; both score below zero
    let mut fragments = vec![
        Fragment::new("Summary", 15, 6.0).with_bold(true),
        Fragment::new("SUMMARY", 15, 6.0).with_bold(true),
    ];
    fragments.extend(body(4, 15, 14.0));

    let result = outline_fragments(&fragments);
    assert_eq!(result.outline.len(), 1);
    assert_eq!(result.outline[0].text, "SUMMARY");
    assert_eq!(result.outline[0].level, HeadingLevel::H2);
}

#[test]
fn test_duplicate_on_other_page_survives() {
    let mut fragments = vec![Fragment::new("Summary", 1, 18.0).with_bold(true)];
    fragments.extend(body(4, 1, 10.0));
    fragments.push(Fragment::new("Summary", 3, 18.0).with_bold(true));
    fragments.extend(body(4, 3, 10.0));

    let result = outline_fragments(&fragments);
    let pages: Vec<u32> = result.outline.iter().map(|e| e.page).collect();
    assert_eq!(pages, vec![1, 3]);
}

#[test]
fn test_title_prefers_longest_max_size_front_fragment() {
    let fragments = vec![
        Fragment::new("Short Title", 1, 20.0),
        Fragment::new("A Much Longer Title Line", 2, 20.0),
        Fragment::new("Subtitle text that is long", 1, 14.0),
        Fragment::new("Giant Banner On Page Three", 3, 40.0),
    ];
    assert_eq!(detect_title(&fragments), "A Much Longer Title Line");
    assert_eq!(outline_fragments(&fragments).title, "A Much Longer Title Line");
}

#[test]
fn test_title_ignores_later_pages() {
    let fragments = vec![
        Fragment::new("Front Matter", 1, 12.0),
        Fragment::new("Enormous Heading", 3, 72.0),
    ];
    assert_eq!(detect_title(&fragments), "Front Matter");
}

#[test]
fn test_malformed_sizes_do_not_break_the_run() {
    let mut fragments = vec![
        Fragment::new("Broken Span", 1, f32::NAN),
        Fragment::new("Negative Span", 1, -4.0),
        Fragment::new("INTRODUCTION", 1, 24.0).with_bold(true),
    ];
    fragments.extend(body(3, 1, 8.0));

    let result = outline_fragments(&fragments);
    assert_eq!(result.title, "INTRODUCTION");
    let texts: Vec<&str> = result.outline.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["INTRODUCTION"]);
}

#[test]
fn test_outline_is_sorted_and_unique() {
    for seed in 1..=64u64 {
        let fragments = synthetic_document(seed * 7919, 60);
        let result = outline_fragments(&fragments);

        assert!(
            result.outline.windows(2).all(|w| w[0].page <= w[1].page),
            "seed {}: outline not sorted by page",
            seed
        );

        let mut seen = HashSet::new();
        for entry in &result.outline {
            assert!(
                seen.insert((entry.text.to_lowercase(), entry.page)),
                "seed {}: duplicate entry {:?}",
                seed,
                entry
            );
            assert!(!entry.text.is_empty());
        }
    }
}

#[test]
fn test_scores_are_bounded() {
    for seed in 1..=16u64 {
        let fragments = synthetic_document(seed * 104_729, 40);
        for fragment in &fragments {
            let score = pattern::score(&fragment.text);
            assert!((0.0..=1.0).contains(&score));

            for avg in [0.0, 4.0, 12.0, 30.0, f64::NAN] {
                let c = confidence(fragment, avg);
                assert!((0.0..=1.0).contains(&c), "confidence {} out of range", c);
            }
        }
    }
}

#[test]
fn test_clean_is_idempotent() {
    let extra = [
        "",
        "   ",
        "• • nested bullets",
        "-- double dash",
        "*\t*  star",
        "â€¢ mis-decoded bullet",
        "\u{f0b7} private use bullet",
        "multi   space\n\nlines",
    ];
    for text in TEXTS.iter().chain(extra.iter()) {
        let once = clean_text(text);
        assert_eq!(clean_text(&once), once, "clean not idempotent for {:?}", text);
    }
}

#[test]
fn test_headings_are_cleaned() {
    let mut fragments = vec![Fragment::new("  •  Key   Findings ", 1, 24.0)];
    fragments.extend(body(4, 1, 10.0));

    let result = outline_fragments(&fragments);
    assert_eq!(result.outline[0].text, "Key Findings");
    assert_eq!(result.title, "Key Findings");
}
