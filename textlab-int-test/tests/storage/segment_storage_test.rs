use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use textlab::collection::{Document, Segment};
use textlab::errors::{ErrorKind, TextlabResult};
use textlab::store::{
    in_documents, name_prefixed, named, InMemorySegmentStorage, SegmentCollection, SegmentQuery,
    SortedSegmentStorage,
};
use textlab_int_test::test_util::{cleanup, run_test, segment_vec, TestContext};

fn document_a() -> Document {
    Document::new("DOCUMENT A", "These are the contents of the first document").unwrap()
}

fn document_b() -> Document {
    Document::new("DOCUMENT B", "Somewhere in the Mexico.").unwrap()
}

fn segment_a1() -> Segment {
    Segment::new("SOME SEGMENT", "SOME VALUE", &document_a(), 0, 2).unwrap()
}

fn segment_a2() -> Segment {
    Segment::new("SOME SEGMENT", "SOME VALUE", &document_a(), 2, 4).unwrap()
}

fn segment_a3() -> Segment {
    Segment::new("SOME SEGMENT", "SOME VALUE", &document_b(), 0, 2).unwrap()
}

fn segment_b1() -> Segment {
    Segment::new("OTHER SEGMENT", "OTHER VALUE", &document_a(), 4, 6).unwrap()
}

fn segment_b2() -> Segment {
    Segment::new("OTHER SEGMENT", "OTHER VALUE", &document_a(), 6, 10).unwrap()
}

fn first_segments() -> HashSet<Segment> {
    HashSet::from([segment_a1(), segment_a2(), segment_a3()])
}

fn second_segments() -> HashSet<Segment> {
    HashSet::from([segment_b1(), segment_b2()])
}

fn all_segments() -> HashSet<Segment> {
    first_segments().union(&second_segments()).cloned().collect()
}

fn fill(ctx: TestContext) -> TextlabResult<TestContext> {
    ctx.segments().save(first_segments().into_iter().collect())?;
    ctx.segments().save(second_segments().into_iter().collect())?;
    Ok(ctx)
}

fn in_memory_storage() -> TextlabResult<TestContext> {
    fill(TestContext::new("in-memory", Arc::new(InMemorySegmentStorage::new())))
}

fn sorted_storage() -> TextlabResult<TestContext> {
    fill(TestContext::new("sorted", Arc::new(SortedSegmentStorage::new())))
}

fn conformance<T>(test: T)
where
    T: Fn(TestContext) -> TextlabResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    run_test(in_memory_storage, &test, cleanup);
    run_test(sorted_storage, &test, cleanup);
}

fn counts(pairs: &[(&str, usize)]) -> HashMap<String, usize> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn test_load_all() {
    conformance(|ctx| {
        assert_eq!(ctx.segments().load(&SegmentQuery::new())?, all_segments());
        Ok(())
    })
}

#[test]
fn test_load_name() {
    conformance(|ctx| {
        assert_eq!(ctx.segments().load(&named("SOME SEGMENT"))?, first_segments());
        assert!(ctx.segments().load(&named("NONEXISTENT"))?.is_empty());
        assert!(ctx.segments().load(&named("SOME"))?.is_empty());
        Ok(())
    })
}

#[test]
fn test_load_name_prefix() {
    conformance(|ctx| {
        assert_eq!(ctx.segments().load(&name_prefixed("SOME"))?, first_segments());
        Ok(())
    })
}

#[test]
fn test_load_document_filters() {
    conformance(|ctx| {
        let segments = ctx.segments().load(&SegmentQuery::new().doc_name("DOCUMENT B"))?;
        assert_eq!(segments, HashSet::from([segment_a3()]));

        let query = named("SOME SEGMENT").doc_prefix("DOCUMENT");
        assert_eq!(ctx.segments().load(&query)?, first_segments());
        assert!(ctx.segments().load(&in_documents("document"))?.is_empty());
        Ok(())
    })
}

#[test]
fn test_prefix_overrides_exact() {
    conformance(|ctx| {
        let query = named("SOME SEGMENT").name_prefix("");
        assert_eq!(ctx.segments().load(&query)?, all_segments());
        let query = SegmentQuery::new().doc_name("DOCUMENT A").doc_prefix("");
        assert_eq!(ctx.segments().load(&query)?, all_segments());
        Ok(())
    })
}

#[test]
fn test_limit() {
    conformance(|ctx| {
        assert_eq!(ctx.segments().load(&SegmentQuery::new().limit(1))?.len(), 1);
        let err = ctx.segments().load(&SegmentQuery::new().limit(0)).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidArgument);
        Ok(())
    })
}

#[test]
fn test_sorted_iterator() {
    conformance(|ctx| {
        let query = SegmentQuery::new().doc_name("DOCUMENT A").doc_prefix("").sort(true);
        let result = segment_vec(ctx.segments().load_iterator(&query)?)?;
        let mut sorted = result.clone();
        sorted.sort();
        assert_eq!(result, sorted, "store {}", ctx.kind());
        assert_eq!(result.into_iter().collect::<HashSet<_>>(), all_segments());
        Ok(())
    })
}

#[test]
fn test_sorted_limit_takes_smallest() {
    conformance(|ctx| {
        let query = SegmentQuery::new().sort(true).limit(2);
        let result = segment_vec(ctx.segments().load_iterator(&query)?)?;
        assert_eq!(result, vec![segment_b1(), segment_b2()], "store {}", ctx.kind());
        Ok(())
    })
}

#[test]
fn test_value_filters() {
    conformance(|ctx| {
        assert_eq!(ctx.segments().load(&SegmentQuery::new().value_regex("OTHER"))?, second_segments());
        assert_eq!(ctx.segments().load(&SegmentQuery::new().neg_regex("SOME"))?, second_segments());
        let query = SegmentQuery::new().value_regex("VALUE").neg_regex("SOME");
        assert_eq!(ctx.segments().load(&query)?, second_segments());
        assert!(ctx.segments().load(&SegmentQuery::new().value_regex("(")).is_err());
        Ok(())
    })
}

#[test]
fn test_save_and_reload() {
    conformance(|ctx| {
        cleanup(ctx.clone())?;
        ctx.segments().save(vec![segment_a1()])?;
        let loaded = segment_vec(ctx.segments().load_iterator(&named("SOME SEGMENT"))?)?;
        assert_eq!(loaded, vec![segment_a1()]);
        Ok(())
    })
}

#[test]
fn test_save_ignores_doc_len_for_identity() {
    conformance(|ctx| {
        cleanup(ctx.clone())?;
        let short = Segment::with_doc_ref("lemma", "dude", "DOC", 10, 0, 4)?;
        let long = Segment::with_doc_ref("lemma", "dude", "DOC", 20, 0, 4)?;
        ctx.segments().save(vec![short])?;
        ctx.segments().save(vec![long])?;

        let loaded = segment_vec(ctx.segments().load_iterator(&SegmentQuery::new())?)?;
        assert_eq!(loaded.len(), 1, "store {}", ctx.kind());
        assert_eq!(loaded[0].doc_len(), 20, "store {}", ctx.kind());
        assert_eq!(ctx.segments().count("lemma")?, 1);
        Ok(())
    })
}

#[test]
fn test_delete_all() {
    conformance(|ctx| {
        assert_eq!(ctx.segments().delete(&SegmentQuery::new())?, 5);
        assert!(ctx.segments().load(&SegmentQuery::new())?.is_empty());
        Ok(())
    })
}

#[test]
fn test_delete_some() {
    conformance(|ctx| {
        assert_eq!(ctx.segments().delete(&name_prefixed("SOME"))?, 3);
        assert_eq!(ctx.segments().load(&SegmentQuery::new())?, second_segments());
        assert!(ctx.segments().load(&name_prefixed("SOME"))?.is_empty());
        assert_eq!(ctx.segments().delete(&name_prefixed("SOME"))?, 0);
        Ok(())
    })
}

#[test]
fn test_counts() {
    conformance(|ctx| {
        let expected = counts(&[("SOME SEGMENT", 3), ("OTHER SEGMENT", 2)]);
        assert_eq!(ctx.segments().counts(&SegmentQuery::new())?, expected);
        assert_eq!(ctx.segments().counts(&in_documents("DOCUMENT"))?, expected);
        assert_eq!(ctx.segments().counts(&name_prefixed(""))?, expected);
        assert_eq!(
            ctx.segments().counts(&SegmentQuery::new().doc_name("DOCUMENT A"))?,
            counts(&[("SOME SEGMENT", 2), ("OTHER SEGMENT", 2)])
        );
        assert_eq!(ctx.segments().count("OTHER SEGMENT")?, 2);
        Ok(())
    })
}

#[test]
fn test_value_counts() {
    conformance(|ctx| {
        assert_eq!(
            ctx.segments().value_counts(&SegmentQuery::new())?,
            counts(&[("SOME VALUE", 3), ("OTHER VALUE", 2)])
        );
        let query = name_prefixed("SOME").doc_prefix("DOCUMENT A");
        assert_eq!(ctx.segments().value_counts(&query)?, counts(&[("SOME VALUE", 2)]));
        Ok(())
    })
}
