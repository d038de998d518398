use textlab::collection::Document;
use textlab::errors::ErrorKind;
use textlab::metadata;
use textlab::store::{all_documents, DocumentCollection, DocumentQuery};
use textlab_int_test::test_util::{
    cleanup, create_empty_context, create_test_context, document_a, document_b, document_names,
    run_test,
};

#[test]
fn test_load_by_name() {
    run_test(
        create_test_context,
        |ctx| {
            assert_eq!(ctx.documents().load("DOCUMENT A")?, document_a());
            assert_eq!(ctx.documents().load("DOCUMENT B")?.text(), "The length is 100");
            let err = ctx.documents().load("DOCUMENT C").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NotFound);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_iterate_by_prefix() {
    run_test(
        create_test_context,
        |ctx| {
            assert_eq!(document_names(ctx.documents())?, vec!["DOCUMENT A", "DOCUMENT B"]);
            let docs = ctx.documents().load_all(&DocumentQuery::new("DOCUMENT B"))?;
            assert_eq!(docs, vec![document_b()]);
            assert!(ctx.documents().load_all(&DocumentQuery::new("document"))?.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_iterate_with_text_filters() {
    run_test(
        create_test_context,
        |ctx| {
            let docs = ctx.documents().load_all(&all_documents().regex(r"\d+"))?;
            assert_eq!(docs, vec![document_b()]);
            let docs = ctx.documents().load_all(&all_documents().neg_regex("sick"))?;
            assert_eq!(docs, vec![document_b()]);
            let docs = ctx.documents().load_all(&all_documents().limit(1))?;
            assert_eq!(docs, vec![document_a()]);
            let err = ctx.documents().load_all(&all_documents().regex("[")).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidArgument);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_iteration_is_lazy() {
    run_test(
        create_test_context,
        |ctx| {
            let mut stream = ctx.documents().load_iterator(&all_documents())?;
            assert_eq!(stream.next().transpose()?, Some(document_a()));
            // removed after the stream started, so it is never yielded
            ctx.documents().delete("DOCUMENT B")?;
            assert!(stream.next().is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_save_duplicate() {
    run_test(
        create_test_context,
        |ctx| {
            let err = ctx.documents().save(document_a()).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::AlreadyExists);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_save_all_is_atomic() {
    run_test(
        create_empty_context,
        |ctx| {
            let batch = vec![
                Document::new("doc:1", "one")?,
                Document::new("doc:2", "two")?,
                Document::new("doc:1", "again")?,
            ];
            assert!(ctx.documents().save_all(batch).is_err());
            assert_eq!(ctx.documents().size(), 0);

            ctx.documents().save_all(vec![Document::new("doc:1", "one")?])?;
            let batch = vec![Document::new("doc:2", "two")?, Document::new("doc:1", "one")?];
            assert!(ctx.documents().save_all(batch).is_err());
            assert_eq!(document_names(ctx.documents())?, vec!["doc:1"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_metadata_kept() {
    run_test(
        create_empty_context,
        |ctx| {
            let meta = metadata! { "source": "epicrisis", "year": 2012 };
            ctx.documents().save(Document::with_metadata("doc:1", "text", meta.clone())?)?;
            assert_eq!(ctx.documents().load("doc:1")?.metadata(), &meta);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_delete() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.documents().delete("DOCUMENT A")?;
            assert!(!ctx.documents().contains("DOCUMENT A"));
            let err = ctx.documents().delete("DOCUMENT A").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NotFound);

            ctx.documents().save(document_a())?;
            assert_eq!(ctx.documents().delete_all("DOCUMENT")?, 2);
            assert_eq!(ctx.documents().delete_all("DOCUMENT")?, 0);
            assert_eq!(ctx.documents().size(), 0);
            Ok(())
        },
        cleanup,
    )
}
