use textlab::errors::TextlabResult;
use textlab::filter::Filter;
use textlab::import::PlainTextImporter;
use textlab::store::{SegmentCollection, SegmentQuery};
use textlab_int_test::test_util::{cleanup, create_empty_context};

fn main() -> TextlabResult<()> {
    println!("Starting stress test...");
    let ctx = create_empty_context()?;

    let count = 100000;
    let lines: Vec<String> = (0..count)
        .map(|i| format!("Dude was sick on day {} and the length is {}", i, i * 7))
        .collect();

    let start = std::time::Instant::now();
    let summary = PlainTextImporter::new("stress")?.import_lines(&lines, ctx.segments(), ctx.documents())?;
    println!(
        "Imported {} documents with {} tokens in {:?}",
        summary.documents,
        summary.segments,
        start.elapsed()
    );

    let start = std::time::Instant::now();
    let numbers = Filter::builder("numbers", "token", "number")
        .segment_value_regex(r"^\d+$")
        .build()?;
    let saved = numbers.apply(ctx.segments(), ctx.documents())?;
    println!("Extracted {} numbers in {:?}", saved, start.elapsed());

    let start = std::time::Instant::now();
    let clauses = Filter::builder("clauses", "token", "clause")
        .creates_segment(true)
        .segment_value_regex(r"[^,]+")
        .splitter_regex(" and ")
        .build()?;
    let saved = clauses.apply(ctx.segments(), ctx.documents())?;
    println!("Split {} clauses in {:?}", saved, start.elapsed());

    let start = std::time::Instant::now();
    let contained = Filter::builder("contained", "number", "contained")
        .container_name("clause")
        .build()?;
    let saved = contained.apply(ctx.segments(), ctx.documents())?;
    println!(
        "Kept {} numbers inside clauses in {:?} ({} segments stored)",
        saved,
        start.elapsed(),
        ctx.segments().counts(&SegmentQuery::new())?.values().sum::<usize>()
    );

    cleanup(ctx)
}
