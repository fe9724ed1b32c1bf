use cardpress::organizer::{deduplicate, partition_by_title, regroup_small_sections};
use cardpress::{
    Card, CardCollection, CardPress, ColorRole, DocumentInfo, LayoutConfiguration,
    LayoutConfigurationBuilder, PdfOptions, Preset, WarningKind,
};
use lopdf::{Document, Object};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn raw_cards() -> Vec<Card> {
    let mut cards = Vec::new();
    for i in 0..10 {
        cards.push(
            Card::new("Goblin Horde", format!("Goblin {i}"))
                .with_legend("Small, green and many.")
                .with_rules("When this enters play, add a Goblin token.")
                .with_cost(format!("{}", i % 4), "R"),
        );
    }
    cards.push(Card::new("Lone Wizard", "Merlin").with_cost("5", ""));
    cards.push(Card::new("Lone Wizard", "Merlin").with_cost("5", ""));
    cards.push(Card::new("Stray Cat", "").with_rules("Purrs."));
    cards
}

fn outline_titles(doc: &Document) -> Vec<String> {
    let root_id = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
    let catalog = doc.get_object(root_id).unwrap().as_dict().unwrap();
    let outlines_id = catalog.get(b"Outlines").unwrap().as_reference().unwrap();
    let outlines = doc.get_object(outlines_id).unwrap().as_dict().unwrap();
    let mut next = outlines.get(b"First").unwrap().as_reference().ok();
    let mut titles = Vec::new();
    while let Some(id) = next {
        let item = doc.get_object(id).unwrap().as_dict().unwrap();
        match item.get(b"Title").unwrap() {
            Object::String(bytes, _) => titles.push(String::from_utf8_lossy(bytes).into_owned()),
            other => panic!("unexpected title {other:?}"),
        }
        next = item.get(b"Next").ok().and_then(|next| next.as_reference().ok());
    }
    titles
}

#[test]
fn imported_cards_export_with_bookmarks_and_stamps() {
    init_logging();
    let sections = partition_by_title(deduplicate(raw_cards()));
    let sections = regroup_small_sections(sections, 1);
    let collection = CardCollection::new(sections);
    assert_eq!(collection.card_count(), 12);

    let press = CardPress::default()
        .document_title("Goblins")
        .pdf_options(PdfOptions { compress: false });
    let report = press.export(&collection).unwrap();
    assert!(report.warnings.is_empty(), "{:?}", report.warning_messages());
    // 10 goblins over two pages, then the merged leftovers on a third
    assert_eq!(report.pages, 3);

    let doc = Document::load_mem(&report.pdf).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 3);
    assert_eq!(outline_titles(&doc), vec!["Goblin Horde", "Untitled section 2"]);

    for stamp in &report.stamps {
        let page_id = pages[&(stamp.page as u32)];
        let content = doc.get_page_content(page_id).unwrap();
        let content = String::from_utf8_lossy(&content);
        assert!(
            content.contains(&format!("({})", stamp.fingerprint)),
            "fingerprint {} missing from page {}",
            stamp.fingerprint,
            stamp.page
        );
    }
}

#[test]
fn fingerprints_ignore_styling() {
    init_logging();
    let collection = CardCollection::new(partition_by_title(raw_cards()));
    let classic = CardPress::default().export(&collection).unwrap();
    let colored = CardPress::new(
        LayoutConfigurationBuilder::from_preset(Preset::ColorClassic)
            .color(ColorRole::CardBackground, None)
            .build()
            .unwrap(),
    )
    .export(&collection)
    .unwrap();
    let prints = |report: &cardpress::ExportReport| {
        report
            .stamps
            .iter()
            .map(|s| s.fingerprint.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(prints(&classic), prints(&colored));
}

#[test]
fn background_pages_double_the_page_count() {
    init_logging();
    let config = LayoutConfiguration::builder()
        .background_pages(true)
        .build()
        .unwrap();
    let collection = CardCollection::new(partition_by_title(raw_cards()));
    let report = CardPress::new(config).export(&collection).unwrap();
    assert_eq!(report.pages, 8);
    let doc = Document::load_mem(&report.pdf).unwrap();
    assert_eq!(doc.get_pages().len(), 8);
}

#[test]
fn overflowing_rules_warn_with_page_and_card() {
    init_logging();
    let config = LayoutConfiguration::builder().grid(4, 4).build().unwrap();
    let long = "Choose one. Deal three damage, or gain three life. ".repeat(40);
    let collection: CardCollection = vec![
        [Card::new("Bolt", "Small"), Card::new("Bolt", "Huge").with_rules(long)]
            .into_iter()
            .collect(),
    ]
    .into_iter()
    .collect();
    let report = CardPress::new(config)
        .document_info(DocumentInfo::default())
        .export(&collection)
        .unwrap();
    let vertical: Vec<_> = report
        .warnings
        .iter()
        .filter(|w| w.kind == WarningKind::VerticalOverflow)
        .collect();
    assert_eq!(vertical.len(), 1);
    assert_eq!(vertical[0].slot.page, 1);
    assert_eq!(vertical[0].slot.card, 2);
    assert!(report.warning_messages().iter().any(|m| m.contains("page 1, card 2")));
    assert_eq!(report.stamps.len(), 2);
}
