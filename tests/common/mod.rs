//! In-memory PDF construction shared by the integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Build a PDF with one content stream per page.
///
/// Fonts available to every page: `F1` Helvetica, `F2` Helvetica-Bold and
/// `F3` a subset of Times-Bold. Pages are US Letter.
pub fn build_pdf(pages: Vec<Vec<Operation>>) -> Vec<u8> {
    let mut doc = build_document(pages);
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Like [`build_pdf`], with named form XObjects available to every page.
///
/// Each form is shifted up 100 points by its `/Matrix`.
pub fn build_pdf_with_forms(
    pages: Vec<Vec<Operation>>,
    forms: Vec<(&str, Vec<Operation>)>,
) -> Vec<u8> {
    let mut doc = build_document_with_forms(pages, forms);
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Like [`build_pdf`], but returns the lopdf document.
pub fn build_document(pages: Vec<Vec<Operation>>) -> Document {
    build_document_with_forms(pages, Vec::new())
}

fn build_document_with_forms(
    pages: Vec<Vec<Operation>>,
    forms: Vec<(&str, Vec<Operation>)>,
) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font = |doc: &mut Document, base_font: &str| {
        doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
            "Encoding" => "WinAnsiEncoding",
        })
    };
    let regular = font(&mut doc, "Helvetica");
    let bold = font(&mut doc, "Helvetica-Bold");
    let subset = font(&mut doc, "ABCDEF+Times-Bold");

    let mut xobjects = lopdf::Dictionary::new();
    for (name, operations) in forms {
        let content = Content { operations };
        let form_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => [0, 0, 612, 792].map(Object::Integer).to_vec(),
                "Matrix" => [1, 0, 0, 1, 0, 100].map(Object::Integer).to_vec(),
            },
            content.encode().unwrap(),
        ));
        xobjects.set(name, form_id);
    }

    let mut kids = Vec::new();
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => regular,
                    "F2" => bold,
                    "F3" => subset,
                },
                "XObject" => xobjects.clone(),
            },
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// `BT /<font> <size> Tf <x> <y> Td (<text>) Tj ET`
pub fn text_block(font: &str, size: i64, x: i64, y: i64, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]
}

/// A two-page report: title, two headings and some body text.
pub fn sample_report() -> Vec<u8> {
    let mut first = Vec::new();
    first.extend(text_block("F2", 24, 72, 720, "Annual Report"));
    first.extend(text_block("F2", 16, 72, 680, "INTRODUCTION"));
    first.extend(vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 10.into()]),
        Operation::new("Td", vec![72.into(), 650.into()]),
        Operation::new("Tj", vec![Object::string_literal("body text here")]),
        Operation::new("Td", vec![0.into(), (-12).into()]),
        Operation::new("Tj", vec![Object::string_literal("more body text")]),
        Operation::new("Td", vec![0.into(), (-12).into()]),
        Operation::new("Tj", vec![Object::string_literal("and even more")]),
        Operation::new("ET", vec![]),
    ]);

    let second = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F2".into(), 16.into()]),
        Operation::new("Td", vec![72.into(), 720.into()]),
        Operation::new("Tj", vec![Object::string_literal("1. Background")]),
        Operation::new("Tf", vec!["F1".into(), 10.into()]),
        Operation::new("Td", vec![0.into(), (-20).into()]),
        Operation::new("Tj", vec![Object::string_literal("plain words")]),
        Operation::new("ET", vec![]),
    ];

    build_pdf(vec![first, second])
}
