//! Serializes a recorded [`Document`] with lopdf.

use crate::canvas::{Command, Document, Page};
use crate::error::CardPressError;
use crate::font::BuiltinFont;
use crate::types::{Color, Pt};
use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, ObjectId, Stream, StringFormat, dictionary};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub creator: String,
    pub producer: String,
    /// Fixed creation time; the current time when absent.
    pub timestamp: Option<DateTime<Utc>>,
}

impl Default for DocumentInfo {
    fn default() -> Self {
        Self {
            title: None,
            creator: "cardpress".to_string(),
            producer: format!("cardpress {}", env!("CARGO_PKG_VERSION")),
            timestamp: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PdfOptions {
    pub compress: bool,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self { compress: true }
    }
}

/// Builds the complete file in memory. Nothing reaches a sink unless this
/// succeeds.
pub fn write_document(
    document: &Document,
    info: &DocumentInfo,
    options: &PdfOptions,
) -> Result<Vec<u8>, CardPressError> {
    let mut pdf = lopdf::Document::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let fonts = font_resources(document);
    let mut font_dict = Dictionary::new();
    for (font, key) in &fonts {
        let font_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_name(),
            "Encoding" => "WinAnsiEncoding",
        });
        font_dict.set(key.as_bytes().to_vec(), font_id);
    }
    let resources_id = pdf.add_object(dictionary! {
        "Font" => font_dict,
    });

    let size = document.page_size;
    let media_box: Vec<Object> = vec![
        Object::Integer(0),
        Object::Integer(0),
        num(size.width),
        num(size.height),
    ];
    let mut page_ids = Vec::with_capacity(document.pages.len());
    for page in &document.pages {
        let content = Content {
            operations: page_operations(page, &fonts),
        };
        let encoded = content.encode().map_err(CardPressError::pdf)?;
        let content_id = pdf.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => media_box.clone(),
        });
        page_ids.push(page_id);
    }

    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
            "Count" => page_ids.len() as i64,
        }),
    );

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };
    if let Some(outlines_id) = write_outlines(&mut pdf, document, &page_ids) {
        catalog.set("Outlines", outlines_id);
        catalog.set("PageMode", "UseOutlines");
    }
    let catalog_id = pdf.add_object(catalog);
    pdf.trailer.set("Root", catalog_id);

    let info_id = pdf.add_object(info_dictionary(info));
    pdf.trailer.set("Info", info_id);

    if options.compress {
        pdf.compress();
    }
    let mut buffer = Vec::new();
    pdf.save_to(&mut buffer).map_err(CardPressError::pdf)?;
    Ok(buffer)
}

fn info_dictionary(info: &DocumentInfo) -> Dictionary {
    let stamp = info.timestamp.unwrap_or_else(Utc::now);
    let date = stamp.format("D:%Y%m%d%H%M%SZ").to_string();
    let mut dict = dictionary! {
        "Creator" => text(&info.creator),
        "Producer" => text(&info.producer),
        "CreationDate" => Object::string_literal(date.clone()),
        "ModDate" => Object::string_literal(date),
    };
    if let Some(title) = &info.title {
        dict.set("Title", text(title));
    }
    dict
}

fn write_outlines(
    pdf: &mut lopdf::Document,
    document: &Document,
    page_ids: &[ObjectId],
) -> Option<ObjectId> {
    let marks: Vec<_> = document
        .bookmarks
        .iter()
        .filter_map(|mark| page_ids.get(mark.page_index).map(|page| (mark, *page)))
        .collect();
    if marks.is_empty() {
        return None;
    }
    let root_id = pdf.new_object_id();
    let item_ids: Vec<ObjectId> = marks.iter().map(|_| pdf.new_object_id()).collect();
    for (i, (mark, page_id)) in marks.iter().enumerate() {
        let mut item = dictionary! {
            "Title" => text(&mark.title),
            "Parent" => root_id,
            "Dest" => vec![Object::Reference(*page_id), "Fit".into()],
        };
        if i > 0 {
            item.set("Prev", item_ids[i - 1]);
        }
        if let Some(next) = item_ids.get(i + 1) {
            item.set("Next", *next);
        }
        pdf.objects.insert(item_ids[i], Object::Dictionary(item));
    }
    let (first, last) = (item_ids[0], item_ids[item_ids.len() - 1]);
    pdf.objects.insert(
        root_id,
        Object::Dictionary(dictionary! {
            "Type" => "Outlines",
            "First" => first,
            "Last" => last,
            "Count" => item_ids.len() as i64,
        }),
    );
    Some(root_id)
}

/// Faces that actually draw text, each with its resource name.
fn font_resources(document: &Document) -> BTreeMap<BuiltinFont, String> {
    let mut used = BTreeSet::new();
    for page in &document.pages {
        let mut current = PageState::initial().font;
        for command in &page.commands {
            match command {
                Command::SetFont(font) => current = *font,
                Command::DrawString { .. } => {
                    used.insert(current);
                }
                _ => {}
            }
        }
    }
    used.into_iter()
        .enumerate()
        .map(|(i, font)| (font, format!("F{}", i + 1)))
        .collect()
}

/// Mirrors the canvas' initial graphics state for each page.
struct PageState {
    font: BuiltinFont,
    size: Pt,
}

impl PageState {
    fn initial() -> Self {
        Self {
            font: BuiltinFont::Helvetica,
            size: Pt::from_f32(12.0),
        }
    }
}

fn num(value: Pt) -> Object {
    Object::from(value.to_f32())
}

fn color_operands(color: Color) -> Vec<Object> {
    vec![color.r.into(), color.g.into(), color.b.into()]
}

fn page_operations(page: &Page, fonts: &BTreeMap<BuiltinFont, String>) -> Vec<Operation> {
    let mut state = PageState::initial();
    let mut ops = Vec::with_capacity(page.commands.len());
    for command in &page.commands {
        match command {
            Command::SetFillColor(color) => ops.push(Operation::new("rg", color_operands(*color))),
            Command::SetStrokeColor(color) => {
                ops.push(Operation::new("RG", color_operands(*color)))
            }
            Command::SetLineWidth(width) => ops.push(Operation::new("w", vec![num(*width)])),
            Command::SetFont(font) => state.font = *font,
            Command::SetFontSize(size) => state.size = *size,
            Command::MoveTo { x, y } => ops.push(Operation::new("m", vec![num(*x), num(*y)])),
            Command::LineTo { x, y } => ops.push(Operation::new("l", vec![num(*x), num(*y)])),
            Command::ClosePath => ops.push(Operation::new("h", vec![])),
            Command::Fill => ops.push(Operation::new("f", vec![])),
            Command::Stroke => ops.push(Operation::new("S", vec![])),
            Command::FillStroke => ops.push(Operation::new("B", vec![])),
            Command::DrawRect {
                x,
                y,
                width,
                height,
            } => ops.push(Operation::new(
                "re",
                vec![num(*x), num(*y), num(*width), num(*height)],
            )),
            Command::DrawString { x, y, text: string } => {
                let Some(key) = fonts.get(&state.font) else {
                    continue;
                };
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![Object::Name(key.as_bytes().to_vec()), num(state.size)],
                ));
                ops.push(Operation::new("Td", vec![num(*x), num(*y)]));
                ops.push(Operation::new("Tj", vec![text(string)]));
                ops.push(Operation::new("ET", vec![]));
            }
        }
    }
    ops
}

fn text(value: &str) -> Object {
    Object::String(encode_winansi(value), StringFormat::Literal)
}

/// Maps text onto WinAnsiEncoding bytes. Characters it cannot represent
/// become `?`.
pub fn encode_winansi(input: &str) -> Vec<u8> {
    input
        .chars()
        .map(|ch| match ch {
            '\u{0000}'..='\u{007F}' | '\u{00A0}'..='\u{00FF}' => ch as u8,
            '\u{20AC}' => 0x80,
            '\u{201A}' => 0x82,
            '\u{0192}' => 0x83,
            '\u{201E}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{2020}' => 0x86,
            '\u{2021}' => 0x87,
            '\u{02C6}' => 0x88,
            '\u{2030}' => 0x89,
            '\u{0160}' => 0x8A,
            '\u{2039}' => 0x8B,
            '\u{0152}' => 0x8C,
            '\u{017D}' => 0x8E,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{02DC}' => 0x98,
            '\u{2122}' => 0x99,
            '\u{0161}' => 0x9A,
            '\u{203A}' => 0x9B,
            '\u{0153}' => 0x9C,
            '\u{017E}' => 0x9E,
            '\u{0178}' => 0x9F,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::font::FontSpec;
    use crate::types::Size;
    use chrono::TimeZone;

    fn sample() -> Document {
        let mut canvas = Canvas::new(Size::new(200.0, 300.0));
        canvas.bookmark("Goblins");
        canvas.draw_string(Pt::from_f32(10.0), Pt::from_f32(20.0), "plain");
        canvas.set_font(&FontSpec::new(BuiltinFont::TimesBold, 9.0));
        canvas.draw_string(Pt::from_f32(10.0), Pt::from_f32(40.0), "bold");
        canvas.show_page();
        canvas.bookmark("Elves");
        canvas.draw_rect(Pt::ZERO, Pt::ZERO, Pt::from_f32(5.0), Pt::from_f32(5.0));
        canvas.fill();
        canvas.finish()
    }

    fn fixed_info() -> DocumentInfo {
        DocumentInfo {
            title: Some("Deck".to_string()),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).single(),
            ..DocumentInfo::default()
        }
    }

    #[test]
    fn winansi_maps_cp1252_and_replaces_the_rest() {
        assert_eq!(encode_winansi("A\u{e9}\u{2014}\u{20ac}"), vec![b'A', 0xE9, 0x97, 0x80]);
        assert_eq!(encode_winansi("\u{4e2d}"), vec![b'?']);
    }

    #[test]
    fn fonts_are_registered_only_when_used() {
        let fonts = font_resources(&sample());
        let faces: Vec<_> = fonts.keys().copied().collect();
        assert_eq!(faces, vec![BuiltinFont::Helvetica, BuiltinFont::TimesBold]);
        assert_eq!(fonts[&BuiltinFont::TimesBold], "F2");
    }

    #[test]
    fn written_file_reloads() {
        let bytes = write_document(&sample(), &fixed_info(), &PdfOptions { compress: false }).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 2);
        let first = pages.get(&1).copied().unwrap();
        let content = String::from_utf8_lossy(&doc.get_page_content(first).unwrap()).into_owned();
        assert!(content.contains("(plain)"));
        assert!(content.contains("/F2"));
    }

    #[test]
    fn info_and_outlines_are_present() {
        let bytes = write_document(&sample(), &fixed_info(), &PdfOptions::default()).unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let info = doc.get_object(info_id).unwrap().as_dict().unwrap();
        match info.get(b"CreationDate").unwrap() {
            Object::String(bytes, _) => assert_eq!(bytes.as_slice(), b"D:20240309140500Z"),
            other => panic!("unexpected {other:?}"),
        }
        let root_id = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
        let catalog = doc.get_object(root_id).unwrap().as_dict().unwrap();
        let outlines_id = catalog.get(b"Outlines").unwrap().as_reference().unwrap();
        let outlines = doc.get_object(outlines_id).unwrap().as_dict().unwrap();
        assert_eq!(outlines.get(b"Count").unwrap().as_i64().unwrap(), 2);
    }
}
