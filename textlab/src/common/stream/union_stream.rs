use std::collections::VecDeque;

use crate::collection::Segment;
use crate::errors::TextlabResult;

/// Drains its streams one after the other.
pub struct UnionStream<I>
where
    I: Iterator<Item = TextlabResult<Segment>>,
{
    current_stream: Option<I>,
    remaining_streams: VecDeque<I>,
}

impl<I> UnionStream<I>
where
    I: Iterator<Item = TextlabResult<Segment>>,
{
    pub fn new(streams: Vec<I>) -> Self {
        let mut remaining: VecDeque<I> = streams.into();
        let current_stream = remaining.pop_front();
        Self {
            current_stream,
            remaining_streams: remaining,
        }
    }
}

impl<I> Iterator for UnionStream<I>
where
    I: Iterator<Item = TextlabResult<Segment>>,
{
    type Item = TextlabResult<Segment>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(ref mut stream) = self.current_stream {
                if let Some(segment) = stream.next() {
                    return Some(segment);
                }
            }

            match self.remaining_streams.pop_front() {
                Some(next) => self.current_stream = Some(next),
                None => {
                    self.current_stream = None;
                    return None;
                }
            }
        }
    }
}
