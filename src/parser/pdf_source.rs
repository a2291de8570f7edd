//! Span tree decoding backed by lopdf.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};

use crate::error::{Error, Result};
use crate::model::{BBox, StyleFlags};

use super::source::{RawBlock, RawLine, RawSpan, SpanSource};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Page height used when no MediaBox can be found (US Letter).
const DEFAULT_PAGE_HEIGHT: f32 = 792.0;

/// Font size before the first `Tf` operator.
const DEFAULT_FONT_SIZE: f32 = 12.0;

/// TJ adjustments beyond this (in thousandths of an em) read as a word space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Baselines further apart than this (in points) start a new line.
const BASELINE_TOLERANCE: f32 = 0.5;

/// Parent chains longer than this are treated as cyclic.
const MAX_PARENT_DEPTH: usize = 32;

/// Form XObjects nested deeper than this are not drawn.
const MAX_FORM_DEPTH: usize = 8;

/// A PDF document opened for span extraction.
pub struct PdfSource {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl PdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut header = Vec::with_capacity(16);
        std::fs::File::open(path)?.take(16).read_to_end(&mut header)?;
        check_header(&header)?;

        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc))
    }

    /// Open a PDF held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        check_header(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc))
    }

    /// Open a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    fn from_document(doc: LopdfDocument) -> Self {
        let pages = doc.get_pages();
        Self { doc, pages }
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        self.pages
            .get(&page)
            .copied()
            .ok_or(Error::PageOutOfRange(page, self.page_count()))
    }

    /// Page height from the MediaBox, following inherited attributes.
    fn page_height(&self, page_id: ObjectId) -> f32 {
        let mut current = Some(page_id);
        for _ in 0..MAX_PARENT_DEPTH {
            let Some(id) = current else { break };
            let Ok(dict) = self.doc.get_dictionary(id) else {
                break;
            };

            if let Ok(array) = dict.get(b"MediaBox").and_then(Object::as_array) {
                if array.len() >= 4 {
                    let bottom = array[1].as_float().unwrap_or(0.0);
                    let top = array[3].as_float().unwrap_or(DEFAULT_PAGE_HEIGHT);
                    return (top - bottom).abs();
                }
            }

            current = dict.get(b"Parent").and_then(Object::as_reference).ok();
        }

        DEFAULT_PAGE_HEIGHT
    }

    /// Resource dictionary of a page, following inherited attributes.
    fn page_resources(&self, page_id: ObjectId) -> Option<&Dictionary> {
        let mut current = Some(page_id);
        for _ in 0..MAX_PARENT_DEPTH {
            let id = current?;
            let dict = self.doc.get_dictionary(id).ok()?;
            if let Ok(resources) = dict.get(b"Resources") {
                return resolve_dict(&self.doc, resources);
            }
            current = dict.get(b"Parent").and_then(Object::as_reference).ok();
        }
        None
    }

    /// Content stream of a page; arrays of streams are joined.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // A page without content has no text.
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Stream(s)) => stream_content(s),
                _ => Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    let Object::Reference(r) = obj else { continue };
                    let Ok(Object::Stream(s)) = self.doc.get_object(*r) else {
                        continue;
                    };
                    match stream_content(s) {
                        Ok(data) => {
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                        Err(e) => log::warn!("Skipping content stream {:?}: {}", r, e),
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }
}

impl SpanSource for PdfSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_blocks(&self, page: u32) -> Result<Vec<RawBlock>> {
        let page_id = self.page_id(page)?;

        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let content = self.page_content(page_id)?;
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        let content = Content::decode(&content)
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page, e)))?;

        let xobjects = self
            .page_resources(page_id)
            .map(|resources| xobject_map(&self.doc, resources))
            .unwrap_or_default();

        let mut walker = ContentWalker::new(&self.doc, fonts, xobjects, self.page_height(page_id));
        walker.walk(&content.operations);
        Ok(walker.finish())
    }
}

/// Verify the `%PDF-x.y` header.
fn check_header(data: &[u8]) -> Result<()> {
    if data.len() < PDF_MAGIC.len() + 3 || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + 3];
    if !(version[0].is_ascii_digit() && version[1] == b'.' && version[2].is_ascii_digit()) {
        return Err(Error::UnsupportedVersion(
            String::from_utf8_lossy(version).to_string(),
        ));
    }

    Ok(())
}

/// Bytes of a stream, decompressed when it carries a `/Filter`.
fn stream_content(stream: &Stream) -> Result<Vec<u8>> {
    if stream.dict.get(b"Filter").is_err() {
        return Ok(stream.content.clone());
    }
    stream
        .decompressed_content()
        .map_err(|e| Error::PdfParse(e.to_string()))
}

/// Dictionary held inline or behind a reference.
fn resolve_dict<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Dictionary(dict) => Some(dict),
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        _ => None,
    }
}

/// Font resources by name.
fn font_map<'a>(doc: &'a LopdfDocument, resources: &'a Dictionary) -> BTreeMap<Vec<u8>, &'a Dictionary> {
    resources
        .get(b"Font")
        .ok()
        .and_then(|fonts| resolve_dict(doc, fonts))
        .map(|fonts| {
            fonts
                .iter()
                .filter_map(|(name, font)| Some((name.clone(), resolve_dict(doc, font)?)))
                .collect()
        })
        .unwrap_or_default()
}

/// XObject resources by name.
fn xobject_map(doc: &LopdfDocument, resources: &Dictionary) -> BTreeMap<Vec<u8>, ObjectId> {
    resources
        .get(b"XObject")
        .ok()
        .and_then(|xobjects| resolve_dict(doc, xobjects))
        .map(|xobjects| {
            xobjects
                .iter()
                .filter_map(|(name, obj)| Some((name.clone(), obj.as_reference().ok()?)))
                .collect()
        })
        .unwrap_or_default()
}

/// 2D affine matrix `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_operands(operands: &[Object]) -> Option<Self> {
        if operands.len() < 6 {
            return None;
        }
        let n: Vec<f32> = operands[..6].iter().filter_map(get_number).collect();
        if n.len() < 6 {
            return None;
        }
        Some(Self {
            a: n[0],
            b: n[1],
            c: n[2],
            d: n[3],
            e: n[4],
            f: n[5],
        })
    }

    /// `self × other`
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn translate(&self, tx: f32, ty: f32) -> Matrix {
        Matrix {
            e: self.e + tx * self.a + ty * self.c,
            f: self.f + tx * self.b + ty * self.d,
            ..*self
        }
    }

    fn vertical_scale(&self) -> f32 {
        (self.b * self.b + self.d * self.d).sqrt()
    }
}

/// State saved and restored by `q` / `Q`.
#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    fill_color: u32,
    font_key: Vec<u8>,
    font_name: String,
    font_size: f32,
    leading: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            fill_color: 0,
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            leading: 0.0,
        }
    }
}

/// Walks one page's content stream and builds its block/line/span tree.
struct ContentWalker<'a> {
    doc: &'a LopdfDocument,
    fonts: BTreeMap<Vec<u8>, &'a Dictionary>,
    xobjects: BTreeMap<Vec<u8>, ObjectId>,
    form_depth: usize,
    page_height: f32,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    in_text: bool,
    blocks: Vec<RawBlock>,
    lines: Vec<RawLine>,
    line: Vec<RawSpan>,
    line_y: f32,
}

impl<'a> ContentWalker<'a> {
    fn new(
        doc: &'a LopdfDocument,
        fonts: BTreeMap<Vec<u8>, &'a Dictionary>,
        xobjects: BTreeMap<Vec<u8>, ObjectId>,
        page_height: f32,
    ) -> Self {
        Self {
            doc,
            fonts,
            xobjects,
            form_depth: 0,
            page_height,
            state: GraphicsState::default(),
            saved: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            in_text: false,
            blocks: Vec::new(),
            lines: Vec::new(),
            line: Vec::new(),
            line_y: 0.0,
        }
    }

    fn walk(&mut self, operations: &[Operation]) {
        for op in operations {
            self.apply(op);
        }
    }

    fn apply(&mut self, op: &Operation) {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            "q" => self.saved.push(self.state.clone()),
            "Q" => {
                if let Some(state) = self.saved.pop() {
                    self.state = state;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.state.ctm = m.multiply(&self.state.ctm);
                }
            }
            "g" => {
                if let Some(gray) = operands.first().and_then(get_number) {
                    self.state.fill_color = pack_rgb(gray, gray, gray);
                }
            }
            "rg" => {
                let n: Vec<f32> = operands.iter().filter_map(get_number).collect();
                if n.len() >= 3 {
                    self.state.fill_color = pack_rgb(n[0], n[1], n[2]);
                }
            }
            "k" => {
                let n: Vec<f32> = operands.iter().filter_map(get_number).collect();
                if n.len() >= 4 {
                    let black = 1.0 - n[3];
                    self.state.fill_color = pack_rgb(
                        (1.0 - n[0]) * black,
                        (1.0 - n[1]) * black,
                        (1.0 - n[2]) * black,
                    );
                }
            }
            "BT" => {
                self.flush_block();
                self.in_text = true;
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "ET" => {
                self.flush_block();
                self.in_text = false;
            }
            "Tf" => {
                if let Some(Object::Name(key)) = operands.first() {
                    self.state.font_name = self.resolve_font_name(key);
                    self.state.font_key = key.clone();
                }
                if let Some(size) = operands.get(1).and_then(get_number) {
                    self.state.font_size = size;
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(get_number) {
                    self.state.leading = leading;
                }
            }
            "Td" | "TD" => {
                let tx = operands.first().and_then(get_number).unwrap_or(0.0);
                let ty = operands.get(1).and_then(get_number).unwrap_or(0.0);
                if op.operator == "TD" {
                    self.state.leading = -ty;
                }
                self.move_line(tx, ty);
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    let text = self.decode(bytes);
                    self.show_text(text);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    let text = self.decode_array(items);
                    self.show_text(text);
                }
            }
            "'" | "\"" => {
                self.next_line();
                let index = if op.operator == "\"" { 2 } else { 0 };
                if let Some(Object::String(bytes, _)) = operands.get(index) {
                    let text = self.decode(bytes);
                    self.show_text(text);
                }
            }
            "Do" => {
                if self.in_text {
                    return;
                }
                if let Some(Object::Name(name)) = operands.first() {
                    if self.draw_form(name) {
                        return;
                    }
                }
                self.flush_block();
                self.blocks.push(RawBlock::Image);
            }
            _ => {}
        }
    }

    /// Walk a form XObject in place of its `Do`; `false` if `name` is not a form.
    fn draw_form(&mut self, name: &[u8]) -> bool {
        let doc = self.doc;
        let Some(&id) = self.xobjects.get(name) else {
            return false;
        };
        let Ok(Object::Stream(stream)) = doc.get_object(id) else {
            return false;
        };
        let is_form = stream
            .dict
            .get(b"Subtype")
            .and_then(Object::as_name)
            .map(|subtype| subtype == b"Form")
            .unwrap_or(false);
        if !is_form {
            return false;
        }
        if self.form_depth >= MAX_FORM_DEPTH {
            log::debug!("Form XObject nesting too deep, skipping {:?}", id);
            return true;
        }

        let operations = match stream_content(stream).and_then(|data| {
            Content::decode(&data).map_err(|e| Error::TextExtract(e.to_string()))
        }) {
            Ok(content) => content.operations,
            Err(e) => {
                log::debug!("Skipping form XObject {:?}: {}", id, e);
                return true;
            }
        };

        let saved_state = self.state.clone();
        let saved_depth = self.saved.len();
        if let Some(matrix) = stream
            .dict
            .get(b"Matrix")
            .and_then(Object::as_array)
            .ok()
            .and_then(|m| Matrix::from_operands(m))
        {
            self.state.ctm = matrix.multiply(&self.state.ctm);
        }

        // Forms without their own resources use the page's.
        let resources = stream
            .dict
            .get(b"Resources")
            .ok()
            .and_then(|r| resolve_dict(doc, r));
        let outer_fonts = resources.map(|r| std::mem::replace(&mut self.fonts, font_map(doc, r)));
        let outer_xobjects =
            resources.map(|r| std::mem::replace(&mut self.xobjects, xobject_map(doc, r)));

        self.form_depth += 1;
        self.walk(&operations);
        self.form_depth -= 1;

        if let Some(fonts) = outer_fonts {
            self.fonts = fonts;
        }
        if let Some(xobjects) = outer_xobjects {
            self.xobjects = xobjects;
        }
        self.saved.truncate(saved_depth);
        self.state = saved_state;
        true
    }

    fn finish(mut self) -> Vec<RawBlock> {
        self.flush_block();
        self.blocks
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = self.line_matrix.translate(tx, ty);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.state.leading;
        self.move_line(0.0, -leading);
    }

    fn resolve_font_name(&self, key: &[u8]) -> String {
        let base_font = self
            .fonts
            .get(key)
            .and_then(|font| font.get(b"BaseFont").ok())
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|| String::from_utf8_lossy(key).to_string());
        strip_subset_prefix(&base_font).to_string()
    }

    fn decode(&self, bytes: &[u8]) -> String {
        let encoding = self
            .fonts
            .get(self.state.font_key.as_slice())
            .and_then(|font| font.get_font_encoding(self.doc).ok());

        match encoding {
            Some(ref enc) => {
                LopdfDocument::decode_text(enc, bytes).unwrap_or_else(|_| decode_text_simple(bytes))
            }
            None => decode_text_simple(bytes),
        }
    }

    /// Decode a `TJ` array; large negative adjustments become word spaces.
    fn decode_array(&self, items: &[Object]) -> String {
        let mut combined = String::new();
        for item in items {
            match item {
                Object::String(bytes, _) => combined.push_str(&self.decode(bytes)),
                other => {
                    let Some(adjustment) = get_number(other) else {
                        continue;
                    };
                    if -adjustment > TJ_SPACE_THRESHOLD
                        && !combined.is_empty()
                        && !combined.ends_with(char::is_whitespace)
                    {
                        combined.push(' ');
                    }
                }
            }
        }
        combined
    }

    fn show_text(&mut self, text: String) {
        if !self.in_text {
            return;
        }

        let char_count = text.chars().count() as f32;
        // Advance in text space by an average glyph width of half an em.
        let advance = char_count * self.state.font_size * 0.5;

        let rendering = self.text_matrix.multiply(&self.state.ctm);
        let size = self.state.font_size * rendering.vertical_scale();
        let (x, y) = (rendering.e, rendering.f);
        let right = x + char_count * size.abs() * 0.5;

        if !self.line.is_empty() && (y - self.line_y).abs() > BASELINE_TOLERANCE {
            self.flush_line();
        }

        if let Some(last) = self.line.last_mut() {
            // A run in the style of the previous span on this line extends it.
            if last.font_name == self.state.font_name
                && last.font_size == size
                && last.color == self.state.fill_color
            {
                last.text.push_str(&text);
                last.bbox.right = last.bbox.right.max(right);
                self.text_matrix = self.text_matrix.translate(advance, 0.0);
                return;
            }
        }

        if !text.trim().is_empty() {
            if self.line.is_empty() {
                self.line_y = y;
            }

            let bbox = BBox::new(
                x,
                self.page_height - (y + size * 0.8),
                right,
                self.page_height - (y - size * 0.2),
            );

            self.line.push(RawSpan {
                text,
                font_size: size,
                font_name: self.state.font_name.clone(),
                flags: StyleFlags::from_font_name(&self.state.font_name),
                bbox,
                color: self.state.fill_color,
            });
        }

        self.text_matrix = self.text_matrix.translate(advance, 0.0);
    }

    fn flush_line(&mut self) {
        if !self.line.is_empty() {
            self.lines.push(RawLine {
                spans: std::mem::take(&mut self.line),
            });
        }
    }

    fn flush_block(&mut self) {
        self.flush_line();
        if !self.lines.is_empty() {
            self.blocks.push(RawBlock::Text {
                lines: std::mem::take(&mut self.lines),
            });
        }
    }
}

/// Drop a subset tag such as `ABCDEF+` from a base font name.
fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.bytes().all(|b| b.is_ascii_uppercase()) => rest,
        _ => name,
    }
}

/// Pack colour components in `[0, 1]` into `0xRRGGBB`.
fn pack_rgb(r: f32, g: f32, b: f32) -> u32 {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
    (channel(r) << 16) | (channel(g) << 8) | channel(b)
}

/// Helper to extract a number from a PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Simple text decoding fallback when no encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with byte order mark
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}
