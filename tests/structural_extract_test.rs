//! Integration tests for the structural container walk.

mod common;

use common::fixtures::TestHwpBuilder;
use hwpfill::{
    DocumentSession, DocumentStats, ExtractorConfig, HwpError, OfflineBackend,
    StructuralExtractor, TextExtractor,
};
use tempfile::TempDir;

fn build_doc(builder: TestHwpBuilder, name: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    builder.build(&path).unwrap();
    (dir, path)
}

#[test]
fn test_extracts_paragraphs_joined_by_newline() {
    let (_dir, path) = build_doc(
        TestHwpBuilder::new()
            .with_paragraph("Application Form")
            .with_paragraph("Project TE25**** dated yyyy. mm. dd."),
        "template.hwp",
    );

    let extractor = StructuralExtractor::new();
    let text = extractor.extract_path(&path).unwrap();
    assert_eq!(
        text,
        "Application Form\nProject TE25**** dated yyyy. mm. dd."
    );
}

#[test]
fn test_extracts_compressed_sections() {
    let (_dir, path) = build_doc(
        TestHwpBuilder::new()
            .with_paragraph("압축된 한글 문서")
            .compressed(),
        "compressed.hwp",
    );

    let text = StructuralExtractor::new().extract_path(&path).unwrap();
    assert_eq!(text, "압축된 한글 문서");
}

#[test]
fn test_exclusion_set_is_configurable() {
    let (_dir, path) = build_doc(
        TestHwpBuilder::new().with_paragraph("visible text"),
        "doc.hwp",
    );

    // Excluding ParaText drops every text-bearing event.
    let config = ExtractorConfig::default().exclude("ParaText");
    let text = StructuralExtractor::with_config(config)
        .extract_path(&path)
        .unwrap();
    assert_eq!(text, "");
}

#[test]
fn test_encrypted_document_is_rejected() {
    let (_dir, path) = build_doc(
        TestHwpBuilder::new().with_paragraph("secret").encrypted(),
        "locked.hwp",
    );

    let err = StructuralExtractor::new().extract_path(&path).unwrap_err();
    match err {
        HwpError::Extraction { reason, .. } => assert!(reason.contains("password")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_non_container_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("garbage.hwp");
    std::fs::write(&path, b"this is not a compound file").unwrap();

    let err = StructuralExtractor::new().extract_path(&path).unwrap_err();
    assert!(matches!(err, HwpError::Extraction { .. }));
}

#[test]
fn test_extract_through_session_requires_opened() {
    let (_dir, path) = build_doc(
        TestHwpBuilder::new().with_paragraph("session text"),
        "doc.hwp",
    );

    let mut extractor = StructuralExtractor::new();
    let mut session = DocumentSession::new(Box::new(OfflineBackend::new()));

    // Not opened yet.
    let err = extractor.extract(&mut session).unwrap_err();
    assert!(matches!(err, HwpError::InvalidState { .. }));

    session.connect().unwrap();
    session.open(&path).unwrap();
    assert_eq!(extractor.extract(&mut session).unwrap(), "session text");

    // Closed sessions must fail, not silently no-op.
    session.disconnect();
    let err = extractor.extract(&mut session).unwrap_err();
    assert!(matches!(err, HwpError::InvalidState { .. }));
}

#[test]
fn test_stats_match_extracted_buffer() {
    let (_dir, path) = build_doc(
        TestHwpBuilder::new()
            .with_paragraph("Application Form")
            .with_paragraph("Project TE25****"),
        "template.hwp",
    );

    let extractor = StructuralExtractor::new();
    let stats = extractor.stats(&path).unwrap();
    assert_eq!(
        stats,
        DocumentStats {
            sections: 1,
            paragraphs: 2,
            characters: 33,
        }
    );
    // The reported length is the flattened buffer's length.
    let text = extractor.extract_path(&path).unwrap();
    assert_eq!(stats.characters, text.chars().count());
}

#[test]
fn test_empty_paragraphs_are_skipped() {
    let (_dir, path) = build_doc(
        TestHwpBuilder::new()
            .with_paragraph("first")
            .with_paragraph("   ")
            .with_paragraph("second"),
        "doc.hwp",
    );

    let text = StructuralExtractor::new().extract_path(&path).unwrap();
    assert_eq!(text, "first\nsecond");
}
