use std::cmp::Ordering;

use crate::collection::Segment;
use crate::common::stream::{Bucket, BucketStream};
use crate::errors::TextlabResult;

/// Inner merge join of two doc_name-sorted segment streams.
///
/// Both inputs are grouped into per-document buckets. The matcher yields a pair of
/// buckets for every document present on both sides, in document order, and drops
/// documents present on one side only. At most one bucket per side is held.
pub struct SegmentDocumentMatcher<A, B>
where
    A: Iterator<Item = TextlabResult<Segment>>,
    B: Iterator<Item = TextlabResult<Segment>>,
{
    first: BucketStream<A>,
    second: BucketStream<B>,
    first_bucket: Option<Bucket>,
    second_bucket: Option<Bucket>,
    done: bool,
}

impl<A, B> SegmentDocumentMatcher<A, B>
where
    A: Iterator<Item = TextlabResult<Segment>>,
    B: Iterator<Item = TextlabResult<Segment>>,
{
    pub fn new(first: A, second: B) -> Self {
        SegmentDocumentMatcher {
            first: BucketStream::new(first),
            second: BucketStream::new(second),
            first_bucket: None,
            second_bucket: None,
            done: false,
        }
    }
}

/// Takes the held bucket or pulls the next one. `Ok(None)` means exhausted.
fn pull<I>(held: &mut Option<Bucket>, stream: &mut BucketStream<I>) -> TextlabResult<Option<Bucket>>
where
    I: Iterator<Item = TextlabResult<Segment>>,
{
    match held.take() {
        Some(bucket) => Ok(Some(bucket)),
        None => stream.next().transpose(),
    }
}

fn doc_name(bucket: &Bucket) -> &str {
    bucket.first().map(|segment| segment.doc_name()).unwrap_or_default()
}

impl<A, B> Iterator for SegmentDocumentMatcher<A, B>
where
    A: Iterator<Item = TextlabResult<Segment>>,
    B: Iterator<Item = TextlabResult<Segment>>,
{
    type Item = TextlabResult<(Bucket, Bucket)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let first = match pull(&mut self.first_bucket, &mut self.first) {
                Ok(Some(bucket)) => bucket,
                Ok(None) => break,
                Err(error) => {
                    self.done = true;
                    return Some(Err(error));
                }
            };
            let second = match pull(&mut self.second_bucket, &mut self.second) {
                Ok(Some(bucket)) => bucket,
                Ok(None) => break,
                Err(error) => {
                    self.done = true;
                    return Some(Err(error));
                }
            };

            match doc_name(&first).cmp(doc_name(&second)) {
                Ordering::Less => self.second_bucket = Some(second),
                Ordering::Greater => self.first_bucket = Some(first),
                Ordering::Equal => return Some(Ok((first, second))),
            }
        }
        self.done = true;
        None
    }
}
