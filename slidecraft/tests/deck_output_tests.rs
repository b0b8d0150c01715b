mod common;

use std::io::{Cursor, Read};

use slidecraft::deck::{build_presentation, DeckBuilder, DirectoryWriter, DECK_FILE_NAME};
use slidecraft::models::SlideRecord;

use common::slide_texts;

fn read_part(pptx: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(pptx)).unwrap();
    let mut xml = String::new();
    archive
        .by_name(name)
        .unwrap_or_else(|e| panic!("Missing part {name}: {e}"))
        .read_to_string(&mut xml)
        .unwrap();
    xml
}

#[test]
fn test_package_contains_every_required_part() {
    let records = vec![SlideRecord::new("One", "- a"), SlideRecord::new("Two", "- b")];
    let bytes = build_presentation(&records).to_bytes().unwrap();

    let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
    let names: Vec<&str> = archive.file_names().collect();
    for part in [
        "[Content_Types].xml",
        "_rels/.rels",
        "docProps/core.xml",
        "docProps/app.xml",
        "ppt/presentation.xml",
        "ppt/_rels/presentation.xml.rels",
        "ppt/slideMasters/slideMaster1.xml",
        "ppt/slideLayouts/slideLayout1.xml",
        "ppt/theme/theme1.xml",
        "ppt/slides/slide1.xml",
        "ppt/slides/slide2.xml",
    ] {
        assert!(names.contains(&part), "missing {part}");
    }
}

#[test]
fn test_slides_follow_record_order() {
    let records: Vec<SlideRecord> = (1..=5)
        .map(|n| SlideRecord::new(format!("Slide {n}"), format!("- point {n}")))
        .collect();

    let bytes = build_presentation(&records).to_bytes().unwrap();
    let titles: Vec<String> = slide_texts(&bytes)
        .into_iter()
        .map(|texts| texts[0].clone())
        .collect();

    assert_eq!(
        titles,
        vec!["Slide 1", "Slide 2", "Slide 3", "Slide 4", "Slide 5"]
    );
}

#[test]
fn test_empty_title_and_content_still_build() {
    let records = vec![SlideRecord::new("", ""), SlideRecord::new("Next", "")];

    let bytes = build_presentation(&records).to_bytes().unwrap();
    let slides = slide_texts(&bytes);

    assert_eq!(slides, vec![vec!["Untitled Slide"], vec!["Next"]]);
}

#[test]
fn test_presentation_uses_wide_slide_size() {
    let bytes = build_presentation(&[SlideRecord::new("Wide", "- yes")])
        .to_bytes()
        .unwrap();

    let xml = read_part(&bytes, "ppt/presentation.xml");
    assert!(xml.contains(r#"cx="12192000""#));
    assert!(xml.contains(r#"cy="6858000""#));
}

#[tokio::test]
async fn test_builder_saves_under_fixed_name() {
    let output = tempfile::tempdir().unwrap();
    let builder = DeckBuilder::new(std::sync::Arc::new(DirectoryWriter::new(output.path())));

    let path = builder
        .generate(&[SlideRecord::new("Saved", "- to disk")])
        .await
        .unwrap();

    assert_eq!(path, output.path().join(DECK_FILE_NAME));
    let slides = slide_texts(&std::fs::read(path).unwrap());
    assert_eq!(slides, vec![vec!["Saved", "to disk"]]);
}
