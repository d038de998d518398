use crate::collection::Segment;
use crate::errors::{TextlabError, TextlabResult};

/// Materializes a segment stream and replays it in ascending segment order.
///
/// A total order needs every candidate, so the whole input is pulled on
/// construction. The first error in the input is replayed instead of any segment.
pub struct SortedStream {
    sorted: std::vec::IntoIter<Segment>,
    error: Option<TextlabError>,
}

impl SortedStream {
    pub fn new<I: Iterator<Item = TextlabResult<Segment>>>(raw_stream: I) -> Self {
        let mut segments = Vec::new();
        let mut error = None;
        for item in raw_stream {
            match item {
                Ok(segment) => segments.push(segment),
                Err(err) => {
                    error = Some(err);
                    break;
                }
            }
        }
        segments.sort();

        Self {
            sorted: segments.into_iter(),
            error,
        }
    }
}

impl Iterator for SortedStream {
    type Item = TextlabResult<Segment>;

    fn next(&mut self) -> Option<Self::Item> {
        // fail fast
        if let Some(error) = self.error.take() {
            self.sorted = Vec::new().into_iter();
            return Some(Err(error));
        }
        self.sorted.next().map(Ok)
    }
}
