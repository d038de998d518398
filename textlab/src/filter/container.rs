use crate::collection::Segment;
use crate::errors::TextlabResult;
use crate::filter::SegmentDocumentMatcher;

/// True if `segment` lies within some segment of `others`.
pub fn is_matched(segment: &Segment, others: &[Segment]) -> bool {
    others.iter().any(|other| segment.is_within(other))
}

/// True if `segment` covers some segment of `others`.
pub fn matches(segment: &Segment, others: &[Segment]) -> bool {
    others.iter().any(|other| segment.covers(other))
}

/// Keeps segments according to their spatial relation with container segments of
/// the same document.
///
/// With `includes` the relation is "source lies within a container", otherwise
/// "source covers a container". `keep_source` picks the side that is emitted: the
/// source segments that satisfy the relation, or the container segments that
/// take part in it. Both inputs must be sorted by document name.
///
/// | includes | keep_source | emits                                        |
/// |----------|-------------|----------------------------------------------|
/// | true     | true        | sources lying within some container          |
/// | true     | false       | containers covering some source              |
/// | false    | true        | sources covering some container              |
/// | false    | false       | containers lying within some source          |
pub struct ContainerFilter<A, B>
where
    A: Iterator<Item = TextlabResult<Segment>>,
    B: Iterator<Item = TextlabResult<Segment>>,
{
    matcher: SegmentDocumentMatcher<A, B>,
    includes: bool,
    keep_source: bool,
    ready: std::vec::IntoIter<Segment>,
}

impl<A, B> ContainerFilter<A, B>
where
    A: Iterator<Item = TextlabResult<Segment>>,
    B: Iterator<Item = TextlabResult<Segment>>,
{
    pub fn new(source: A, container: B, includes: bool, keep_source: bool) -> Self {
        ContainerFilter {
            matcher: SegmentDocumentMatcher::new(source, container),
            includes,
            keep_source,
            ready: Vec::new().into_iter(),
        }
    }

    fn select(&self, sources: Vec<Segment>, containers: Vec<Segment>) -> Vec<Segment> {
        match (self.includes, self.keep_source) {
            (true, true) => retain(sources, &containers, is_matched),
            (true, false) => retain(containers, &sources, matches),
            (false, true) => retain(sources, &containers, matches),
            (false, false) => retain(containers, &sources, is_matched),
        }
    }
}

fn retain(
    candidates: Vec<Segment>,
    partners: &[Segment],
    predicate: fn(&Segment, &[Segment]) -> bool,
) -> Vec<Segment> {
    candidates
        .into_iter()
        .filter(|candidate| predicate(candidate, partners))
        .collect()
}

impl<A, B> Iterator for ContainerFilter<A, B>
where
    A: Iterator<Item = TextlabResult<Segment>>,
    B: Iterator<Item = TextlabResult<Segment>>,
{
    type Item = TextlabResult<Segment>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(segment) = self.ready.next() {
                return Some(Ok(segment));
            }
            match self.matcher.next()? {
                Ok((sources, containers)) => {
                    self.ready = self.select(sources, containers).into_iter();
                }
                Err(error) => return Some(Err(error)),
            }
        }
    }
}
