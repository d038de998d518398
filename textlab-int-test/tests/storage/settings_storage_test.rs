use textlab::common::Settings;
use textlab::errors::ErrorKind;
use textlab::store::SettingsStorage;
use textlab::{metadata, val};
use textlab_int_test::test_util::{cleanup, create_empty_context, run_test};

fn settings(name: &str) -> Settings {
    metadata! { "filter_name": name, "segment_name": "lemma", "creates_segment": true }
}

#[test]
fn test_save_and_load() {
    run_test(
        create_empty_context,
        |ctx| {
            let storage = ctx.settings();
            storage.save("filtertool:a", settings("a"))?;
            assert_eq!(storage.load("filtertool:a")?, settings("a"));

            let mut changed = settings("a");
            changed.insert("segment_name".to_string(), val!("token"));
            storage.save("filtertool:a", changed.clone())?;
            assert_eq!(storage.load("filtertool:a")?, changed);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_missing_key() {
    run_test(
        create_empty_context,
        |ctx| {
            let err = ctx.settings().load("filtertool:none").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NotFound);
            ctx.settings().delete("filtertool:none")?;
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_list_by_prefix() {
    run_test(
        create_empty_context,
        |ctx| {
            let storage = ctx.settings();
            for key in ["filtertool:b", "other:x", "filtertool:a", "filtertool"] {
                storage.save(key, settings(key))?;
            }
            assert_eq!(storage.list("filtertool:")?, vec!["filtertool:a", "filtertool:b"]);
            assert_eq!(storage.list("")?.len(), 4);
            assert!(storage.list("zzz")?.is_empty());

            storage.delete("filtertool:a")?;
            assert_eq!(storage.list("filtertool:")?, vec!["filtertool:b"]);
            Ok(())
        },
        cleanup,
    )
}
