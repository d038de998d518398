use std::backtrace::Backtrace;
use std::collections::HashSet;
use std::panic::{RefUnwindSafe, UnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use std::{env, fs};

use textlab::collection::{Document, Segment};
use textlab::common::stream::SegmentStream;
use textlab::errors::TextlabResult;
use textlab::store::{
    all_documents, DocumentCollection, InMemoryDocumentStorage, InMemorySegmentStorage,
    InMemorySettingsStorage, SegmentCollection, SegmentQuery, SettingsStorage,
    SortedSegmentStorage,
};

/// Runs `test` on the context made by `before`, then `after`, and panics with the
/// first failure. `after` also runs when the test returns an error.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> TextlabResult<()> + UnwindSafe + RefUnwindSafe,
    B: Fn() -> TextlabResult<TestContext> + UnwindSafe + RefUnwindSafe,
    A: Fn(TestContext) -> TextlabResult<()> + UnwindSafe + RefUnwindSafe,
{
    let start_time = Instant::now();
    let result = std::panic::catch_unwind(|| {
        let backtrace = Backtrace::capture();
        match before() {
            Ok(ctx) => match test(ctx.clone()) {
                Ok(_) => after(ctx).map_err(|e| (format!("After run failed: {:?}", e), backtrace.to_string())),
                Err(e) => {
                    let _ = after(ctx);
                    Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                }
            },
            Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
        }
    });

    let failure = match result {
        Ok(Ok(_)) => return,
        Ok(Err(failure)) => failure,
        Err(panic_err) => {
            let message = if let Some(s) = panic_err.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_err.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            (format!("Panic: {}", message), Backtrace::capture().to_string())
        }
    };

    eprintln!("\n==================== TEST FAILED ====================");
    eprintln!("Failed after {:?}", start_time.elapsed());
    eprintln!("Error: {}", failure.0);
    if !failure.1.is_empty() && !failure.1.contains("disabled") {
        eprintln!("\nBacktrace:\n{}", failure.1);
    }
    eprintln!("=====================================================\n");
    panic!("{}", failure.0);
}

/// Runs `test` once per segment store implementation.
pub fn run_on_all_stores<T>(test: T)
where
    T: Fn(TestContext) -> TextlabResult<()> + UnwindSafe + RefUnwindSafe,
{
    run_test(create_test_context, &test, cleanup);
    run_test(create_sorted_test_context, &test, cleanup);
}

#[derive(Clone)]
pub struct TestContext {
    kind: &'static str,
    segments: Arc<dyn SegmentCollection>,
    documents: Arc<InMemoryDocumentStorage>,
    settings: Arc<InMemorySettingsStorage>,
}

impl TestContext {
    pub fn new(kind: &'static str, segments: Arc<dyn SegmentCollection>) -> Self {
        Self {
            kind,
            segments,
            documents: Arc::new(InMemoryDocumentStorage::new()),
            settings: Arc::new(InMemorySettingsStorage::new()),
        }
    }

    /// Name of the segment store implementation under test.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn segments(&self) -> &dyn SegmentCollection {
        self.segments.as_ref()
    }

    pub fn documents(&self) -> &InMemoryDocumentStorage {
        &self.documents
    }

    pub fn settings(&self) -> Arc<InMemorySettingsStorage> {
        self.settings.clone()
    }
}

/// Context with the sample documents and segments in an [InMemorySegmentStorage].
pub fn create_test_context() -> TextlabResult<TestContext> {
    populate(TestContext::new("in-memory", Arc::new(InMemorySegmentStorage::new())))
}

/// Context with the sample documents and segments in a [SortedSegmentStorage].
pub fn create_sorted_test_context() -> TextlabResult<TestContext> {
    populate(TestContext::new("sorted", Arc::new(SortedSegmentStorage::new())))
}

/// Context with empty stores.
pub fn create_empty_context() -> TextlabResult<TestContext> {
    Ok(TestContext::new("in-memory", Arc::new(InMemorySegmentStorage::new())))
}

fn populate(ctx: TestContext) -> TextlabResult<TestContext> {
    ctx.documents().save_all(vec![document_a(), document_b()])?;
    ctx.segments().save(lemmas())?;
    ctx.segments().save(vec![sentence1(), sentence2()])?;
    Ok(ctx)
}

pub fn cleanup(ctx: TestContext) -> TextlabResult<()> {
    ctx.segments().delete(&SegmentQuery::new())?;
    ctx.documents().delete_all("")?;
    for key in ctx.settings().list("")? {
        ctx.settings().delete(&key)?;
    }
    Ok(())
}

pub fn document_a() -> Document {
    Document::new("DOCUMENT A", "Dude was sick!").unwrap()
}

pub fn document_b() -> Document {
    Document::new("DOCUMENT B", "The length is 100").unwrap()
}

pub fn lemma1() -> Segment {
    Segment::new("lemma", "dude", &document_a(), 0, 4).unwrap()
}

pub fn lemma2() -> Segment {
    Segment::new("lemma", "is", &document_a(), 5, 8).unwrap()
}

pub fn lemma3() -> Segment {
    Segment::new("lemma", "sick", &document_a(), 9, 13).unwrap()
}

pub fn lemma4() -> Segment {
    Segment::new("lemma", "the", &document_b(), 0, 3).unwrap()
}

pub fn lemma5() -> Segment {
    Segment::new("lemma", "length", &document_b(), 4, 10).unwrap()
}

pub fn lemma6() -> Segment {
    Segment::new("lemma", "is", &document_b(), 11, 13).unwrap()
}

pub fn lemma7() -> Segment {
    Segment::new("lemma", "100", &document_b(), 14, 17).unwrap()
}

pub fn first_lemmas() -> Vec<Segment> {
    vec![lemma1(), lemma2(), lemma3()]
}

pub fn second_lemmas() -> Vec<Segment> {
    vec![lemma4(), lemma5(), lemma6(), lemma7()]
}

pub fn lemmas() -> Vec<Segment> {
    first_lemmas().into_iter().chain(second_lemmas()).collect()
}

pub fn sentence1() -> Segment {
    Segment::new("sentence", "Dude was sick!", &document_a(), 0, 14).unwrap()
}

pub fn sentence2() -> Segment {
    Segment::new("sentence", "The length is 100", &document_b(), 0, 17).unwrap()
}

pub fn mixin1() -> Segment {
    Segment::new("mixin", "Dude was", &document_a(), 0, 8).unwrap()
}

/// `segments` renamed to `name`.
pub fn renamed(segments: Vec<Segment>, name: &str) -> HashSet<Segment> {
    segments.into_iter().map(|s| s.with_name(name)).collect()
}

/// Drains a stream into a set, failing on the first error.
pub fn segment_set(stream: SegmentStream<'_>) -> TextlabResult<HashSet<Segment>> {
    stream.collect()
}

pub fn segment_vec(stream: SegmentStream<'_>) -> TextlabResult<Vec<Segment>> {
    stream.collect()
}

pub fn document_names(documents: &dyn DocumentCollection) -> TextlabResult<Vec<String>> {
    Ok(documents
        .load_all(&all_documents())?
        .into_iter()
        .map(|d| d.name().to_string())
        .collect())
}

/// Writes `contents` to a fresh file in the temp directory.
pub fn temp_file(contents: &str) -> TextlabResult<PathBuf> {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let name = format!(
        "textlab_{}_{}.txt",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::SeqCst)
    );
    let path = env::temp_dir().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}
