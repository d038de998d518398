use textlab::collection::{Document, DocumentRecord, Segment, SegmentRecord};
use textlab::errors::{ErrorKind, TextlabResult};
use textlab::metadata;
use textlab_int_test::test_util::{document_a, lemma3, sentence2};

#[test]
fn test_segment_record_json() -> TextlabResult<()> {
    let json = serde_json::to_value(lemma3().to_record()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "name": "lemma",
            "value": "sick",
            "start": 9,
            "end": 13,
            "doc_name": "DOCUMENT A",
            "doc_len": 14
        })
    );

    let record: SegmentRecord = serde_json::from_value(json).unwrap();
    assert_eq!(Segment::from_record(record)?, lemma3());
    Ok(())
}

#[test]
fn test_segment_record_offsets_checked() {
    let mut record = sentence2().to_record();
    record.end = record.doc_len + 1;
    let err = Segment::from_record(record).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvariantViolation);

    let mut record = sentence2().to_record();
    record.start = record.end;
    assert!(Segment::from_record(record).is_err());
}

#[test]
fn test_document_record_json() -> TextlabResult<()> {
    let document = Document::with_metadata("DOCUMENT C", "Tere!", metadata! { "lang": "et" })?;
    let json = serde_json::to_string(&document.to_record()).unwrap();
    let record: DocumentRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(Document::from_record(record)?, document);
    Ok(())
}

#[test]
fn test_document_record_without_metadata() -> TextlabResult<()> {
    let record: DocumentRecord =
        serde_json::from_str(r#"{"name": "DOCUMENT A", "text": "Dude was sick!"}"#).unwrap();
    assert_eq!(Document::from_record(record)?, document_a());
    Ok(())
}
