use std::collections::HashSet;

use textlab::collection::Segment;
use textlab::common::{Settings, Value};
use textlab::errors::{ErrorKind, TextlabResult};
use textlab::filter::{Filter, FilterKey};
use textlab::store::{named, DocumentCollection, SegmentCollection};
use textlab::{metadata, val};
use textlab_int_test::test_util::{
    document_a, document_b, first_lemmas, lemma3, lemma7, lemmas, mixin1, renamed,
    run_on_all_stores, second_lemmas, segment_set, TestContext,
};

fn output(filter: &Filter, ctx: &TestContext) -> TextlabResult<HashSet<Segment>> {
    segment_set(filter.filter(ctx.segments(), ctx.documents())?)
}

fn lemma_filter() -> textlab::filter::FilterBuilder {
    Filter::builder("test", "lemma", "output")
}

#[test]
fn test_construction() {
    let filter = Filter::new("test", "lemma", "output").unwrap();
    assert_eq!(filter.filter_name(), "test");
    assert_eq!(filter.segment_name(), "lemma");
    assert_eq!(filter.output_name(), "output");
    assert!(!filter.creates_segment());
    assert!(filter.container_includes());
    assert!(filter.container_keep_source());
    assert_eq!(filter.to_string(), "'test' (lemma -> output)");
}

#[test]
fn test_from_settings() {
    let settings: Settings = metadata! {
        "filter_name": "test",
        "segment_name": "lemma",
        "output_name": "output",
        "segment_value_regex": "was|sick",
        "mixin_name": Value::Null,
    };
    let filter = Filter::from_settings(&settings).unwrap();
    assert_eq!(filter.string(FilterKey::SegmentValueRegex), Some("was|sick"));
    assert_eq!(filter.get("mixin_name").unwrap(), None);
    assert_eq!(filter.to_settings().len(), 4);
    assert_eq!(Filter::from_settings(&filter.to_settings()).unwrap(), filter);
}

#[test]
fn test_invalid_key() {
    let settings: Settings = metadata! {
        "filter_name": "test",
        "segment_name": "lemma",
        "output_name": "output",
        "no_such_key": "value",
    };
    let err = Filter::from_settings(&settings).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ValidationError);
    assert!(Filter::new("test", "lemma", "output").unwrap().get("no_such_key").is_err());
}

#[test]
fn test_missing_mandatory() {
    let settings: Settings = metadata! { "filter_name": "test", "segment_name": "lemma" };
    assert_eq!(
        Filter::from_settings(&settings).unwrap_err().kind(),
        &ErrorKind::ValidationError
    );
    assert!(Filter::new("test", "", "output").is_err());
    assert!(Filter::builder("test", "lemma", "").build().is_err());
}

#[test]
fn test_wrong_types() {
    let mut filter = Filter::new("test", "lemma", "output").unwrap();
    assert!(filter.set("creates_segment", "yes").is_err());
    assert!(filter.set("segment_value_regex", true).is_err());
    assert!(filter.set("filter_name", 5i64).is_err());
    assert_eq!(filter, Filter::new("test", "lemma", "output").unwrap());
}

#[test]
fn test_invalid_patterns() {
    assert!(lemma_filter().segment_value_regex("(").build().is_err());
    assert!(lemma_filter().document_neg_regex("[a").build().is_err());
    assert!(lemma_filter().splitter_left("(").splitter_regex(" ").build().is_err());
    assert!(lemma_filter().creates_segment(true).build().is_err());
}

#[test]
fn test_set_and_update() {
    let mut filter = Filter::new("test", "lemma", "output").unwrap();
    filter.set("segment_value_regex", "sick").unwrap();
    assert_eq!(filter.get("segment_value_regex").unwrap(), Some(&val!("sick")));
    filter.set("segment_value_regex", Value::Null).unwrap();
    assert_eq!(filter.string(FilterKey::SegmentValueRegex), None);

    let before = filter.clone();
    let update: Settings = metadata! { "mixin_name": "mixin", "segment_neg_regex": "(" };
    assert!(filter.update(&update).is_err());
    assert_eq!(filter, before);

    let update: Settings = metadata! { "mixin_name": "mixin", "output_name": "other" };
    filter.update(&update).unwrap();
    assert_eq!(filter.string(FilterKey::MixinName), Some("mixin"));
    assert_eq!(filter.output_name(), "other");
}

#[test]
fn test_basic_copy() {
    run_on_all_stores(|ctx| {
        let filter = Filter::new("test", "lemma", "output")?;
        assert_eq!(output(&filter, &ctx)?, renamed(lemmas(), "output"));
        Ok(())
    })
}

#[test]
fn test_basic_creation() {
    run_on_all_stores(|ctx| {
        let filter = Filter::builder("test", "lemma", "lemma")
            .creates_segment(true)
            .segment_value_regex(r"was|sick|\d+")
            .segment_neg_regex("was")
            .build()?;
        assert_eq!(output(&filter, &ctx)?, HashSet::from([lemma3(), lemma7()]));
        Ok(())
    })
}

#[test]
fn test_basic_regex() {
    run_on_all_stores(|ctx| {
        let filter = Filter::builder("test", "lemma", "lemma")
            .segment_value_regex(r"was|sick|\d+")
            .segment_neg_regex("was")
            .build()?;
        assert_eq!(output(&filter, &ctx)?, HashSet::from([lemma3(), lemma7()]));
        Ok(())
    })
}

#[test]
fn test_creation_with_multibyte_text() {
    run_on_all_stores(|ctx| {
        let document = textlab::collection::Document::new("DOCUMENT C", "Põld ja mets")?;
        ctx.documents().save(document)?;
        let filter = Filter::builder("test", "word", "word")
            .creates_segment(true)
            .segment_value_regex(r"\w+")
            .document_prefix("DOCUMENT C")
            .build()?;
        let words: HashSet<(String, usize, usize)> = output(&filter, &ctx)?
            .into_iter()
            .map(|s| (s.value().to_string(), s.start(), s.end()))
            .collect();
        assert_eq!(
            words,
            HashSet::from([
                ("Põld".to_string(), 0, 4),
                ("ja".to_string(), 5, 7),
                ("mets".to_string(), 8, 12)
            ])
        );
        Ok(())
    })
}

#[test]
fn test_document_prefix() {
    run_on_all_stores(|ctx| {
        let filter = lemma_filter().document_prefix("DOCUMENT B").build()?;
        assert_eq!(output(&filter, &ctx)?, renamed(second_lemmas(), "output"));
        let filter = lemma_filter().document_prefix("").build()?;
        assert_eq!(output(&filter, &ctx)?, renamed(lemmas(), "output"));
        Ok(())
    })
}

#[test]
fn test_document_regex() {
    run_on_all_stores(|ctx| {
        let filter = lemma_filter().document_regex("s").document_neg_regex("sic").build()?;
        assert_eq!(output(&filter, &ctx)?, renamed(second_lemmas(), "output"));
        let filter = lemma_filter().document_regex("Dude").build()?;
        assert_eq!(output(&filter, &ctx)?, renamed(first_lemmas(), "output"));
        Ok(())
    })
}

#[test]
fn test_container() {
    run_on_all_stores(|ctx| {
        let filter = lemma_filter()
            .container_name("sentence")
            .container_value_regex("length")
            .build()?;
        assert_eq!(output(&filter, &ctx)?, renamed(second_lemmas(), "output"));
        Ok(())
    })
}

#[test]
fn test_container_keeps_containers() {
    run_on_all_stores(|ctx| {
        let filter = lemma_filter()
            .segment_value_regex("sick")
            .container_name("sentence")
            .container_keep_source(false)
            .build()?;
        let result = output(&filter, &ctx)?;
        assert_eq!(result.len(), 1);
        let sentence = result.into_iter().next().unwrap();
        assert_eq!((sentence.doc_name(), sentence.value()), ("DOCUMENT A", "Dude was sick!"));
        Ok(())
    })
}

#[test]
fn test_mixin() {
    run_on_all_stores(|ctx| {
        ctx.segments().save(vec![mixin1()])?;
        let filter = lemma_filter().mixin_name("mixin").build()?;
        let mut expected = lemmas();
        expected.push(mixin1());
        assert_eq!(output(&filter, &ctx)?, renamed(expected, "output"));

        let filter = lemma_filter().mixin_name("mixin").mixin_neg_regex("Dude").build()?;
        assert_eq!(output(&filter, &ctx)?, renamed(lemmas(), "output"));
        Ok(())
    })
}

#[test]
fn test_splitter_full() {
    run_on_all_stores(|ctx| {
        let filter = Filter::builder("test", "sentence", "fragment")
            .splitter_left("e")
            .splitter_regex(" ")
            .splitter_right("...")
            .splitter_neg_regex("was")
            .build()?;
        let fragments: HashSet<(String, String, usize, usize)> = output(&filter, &ctx)?
            .into_iter()
            .map(|s| {
                assert_eq!(s.name(), "fragment");
                (s.doc_name().to_string(), s.value().to_string(), s.start(), s.end())
            })
            .collect();
        let expected = HashSet::from([
            ("DOCUMENT A".to_string(), "Dude was sick!".to_string(), 0, 14),
            ("DOCUMENT B".to_string(), "The".to_string(), 0, 3),
            ("DOCUMENT B".to_string(), "length is 100".to_string(), 4, 17),
        ]);
        assert_eq!(fragments, expected);
        Ok(())
    })
}

#[test]
fn test_fragment_values_match_document_text() {
    run_on_all_stores(|ctx| {
        let filter = Filter::builder("test", "sentence", "word")
            .splitter_regex(r"\s+")
            .build()?;
        for fragment in output(&filter, &ctx)? {
            let document = if fragment.doc_name() == "DOCUMENT A" { document_a() } else { document_b() };
            let text: String = document
                .text()
                .chars()
                .skip(fragment.start())
                .take(fragment.end() - fragment.start())
                .collect();
            assert_eq!(fragment.value(), text);
        }
        Ok(())
    })
}

#[test]
fn test_apply() {
    run_on_all_stores(|ctx| {
        let filter = lemma_filter().segment_value_regex("is").build()?;
        assert_eq!(filter.apply(ctx.segments(), ctx.documents())?, 2);
        assert_eq!(ctx.segments().count("output")?, 2);
        assert_eq!(ctx.segments().count("lemma")?, 7);

        let saved = ctx.segments().load(&named("output"))?;
        assert_eq!(saved, output(&filter, &ctx)?);
        Ok(())
    })
}

#[test]
fn test_reapply_after_clear_is_identical() {
    run_on_all_stores(|ctx| {
        let filter = lemma_filter().container_name("sentence").build()?;
        filter.apply_in_batches(ctx.segments(), ctx.documents(), 3)?;
        let first_run = ctx.segments().load(&named("output"))?;

        assert_eq!(filter.clear_output(ctx.segments())?, 7);
        filter.apply_in_batches(ctx.segments(), ctx.documents(), 2)?;
        assert_eq!(ctx.segments().load(&named("output"))?, first_run);
        Ok(())
    })
}

#[test]
fn test_apply_batch_size_zero() {
    run_on_all_stores(|ctx| {
        let filter = Filter::new("test", "lemma", "output")?;
        let err = filter.apply_in_batches(ctx.segments(), ctx.documents(), 0).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidArgument);
        assert_eq!(ctx.segments().count("output")?, 0);
        Ok(())
    })
}

#[test]
fn test_missing_segment_name() {
    run_on_all_stores(|ctx| {
        let filter = Filter::new("test", "nothing", "output")?;
        assert!(output(&filter, &ctx)?.is_empty());
        assert_eq!(filter.apply(ctx.segments(), ctx.documents())?, 0);
        Ok(())
    })
}
