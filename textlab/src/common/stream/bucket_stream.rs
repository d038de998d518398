use crate::collection::Segment;
use crate::errors::{ErrorKind, TextlabError, TextlabResult};

/// Consecutive segments of one document.
pub type Bucket = Vec<Segment>;

/// Groups a doc_name-sorted segment stream into per-document buckets.
///
/// Holds at most one bucket plus one look-ahead segment. A document name that
/// sorts before the previous bucket's name means the input was not sorted; the
/// stream then yields an `InvalidOperation` error and stops.
pub struct BucketStream<I>
where
    I: Iterator<Item = TextlabResult<Segment>>,
{
    inner: I,
    pending: Option<Segment>,
    pending_error: Option<TextlabError>,
    last_doc: Option<String>,
    done: bool,
}

impl<I> BucketStream<I>
where
    I: Iterator<Item = TextlabResult<Segment>>,
{
    pub fn new(inner: I) -> Self {
        BucketStream {
            inner,
            pending: None,
            pending_error: None,
            last_doc: None,
            done: false,
        }
    }

    fn fail(&mut self, error: TextlabError) -> Option<TextlabResult<Bucket>> {
        self.done = true;
        self.pending = None;
        Some(Err(error))
    }
}

impl<I> Iterator for BucketStream<I>
where
    I: Iterator<Item = TextlabResult<Segment>>,
{
    type Item = TextlabResult<Bucket>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Some(error) = self.pending_error.take() {
            return self.fail(error);
        }

        let first = match self.pending.take() {
            Some(segment) => segment,
            None => match self.inner.next() {
                Some(Ok(segment)) => segment,
                Some(Err(error)) => return self.fail(error),
                None => {
                    self.done = true;
                    return None;
                }
            },
        };

        if let Some(last) = &self.last_doc {
            if first.doc_name() < last.as_str() {
                log::error!(
                    "Segment stream is not sorted by document name: '{}' after '{}'",
                    first.doc_name(),
                    last
                );
                let error = TextlabError::new(
                    &format!(
                        "Segment stream is not sorted by document name: '{}' follows '{}'",
                        first.doc_name(),
                        last
                    ),
                    ErrorKind::InvalidOperation,
                );
                return self.fail(error);
            }
        }

        let mut bucket = vec![first];
        loop {
            match self.inner.next() {
                Some(Ok(segment)) if segment.doc_name() == bucket[0].doc_name() => bucket.push(segment),
                Some(Ok(segment)) => {
                    self.pending = Some(segment);
                    break;
                }
                Some(Err(error)) => {
                    self.pending_error = Some(error);
                    break;
                }
                None => break,
            }
        }

        self.last_doc = Some(bucket[0].doc_name().to_string());
        Some(Ok(bucket))
    }
}
