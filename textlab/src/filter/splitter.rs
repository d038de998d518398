use regex::Regex;

use crate::collection::Segment;
use crate::common::stream::SegmentStream;
use crate::common::{char_len, compile_multiline_pattern, CharCursor, SPLITTER_GROUP};
use crate::errors::{ErrorKind, TextlabError, TextlabResult};

/// Cuts segments into fragments at separator matches.
///
/// The separator pattern is assembled as `left (?P<splitter> regex) right`; only the
/// `splitter` group is cut out, so `left` and `right` act as context that stays in the
/// neighbouring fragments. A match whose whole text matches the negative pattern is
/// not a separator. Fragment offsets are absolute document offsets.
///
/// ```rust
/// use textlab::collection::{Document, Segment};
/// use textlab::filter::Splitter;
///
/// let doc = Document::new("DOCUMENT A", "Dude was sick!").unwrap();
/// let sentence = Segment::new("sentence", doc.text(), &doc, 0, 14).unwrap();
/// let splitter = Splitter::new("", " ", "", None).unwrap();
/// let words: Vec<String> = splitter
///     .split(&sentence)
///     .unwrap()
///     .iter()
///     .map(|s| s.value().to_string())
///     .collect();
/// assert_eq!(words, vec!["Dude", "was", "sick!"]);
/// ```
#[derive(Debug, Clone)]
pub struct Splitter {
    pattern: Regex,
    neg_pattern: Option<Regex>,
}

impl Splitter {
    pub fn new(left: &str, regex: &str, right: &str, neg_regex: Option<&str>) -> TextlabResult<Splitter> {
        let pattern = compile_multiline_pattern(
            &assemble_pattern(left, regex, right),
            ErrorKind::ValidationError,
        )?;
        let neg_pattern = neg_regex
            .map(|p| compile_multiline_pattern(p, ErrorKind::ValidationError))
            .transpose()?;
        Ok(Splitter { pattern, neg_pattern })
    }

    /// Splits one segment. Empty fragments are dropped; a segment without any
    /// separator comes back whole.
    pub fn split(&self, segment: &Segment) -> TextlabResult<Vec<Segment>> {
        let value = segment.value();
        if char_len(value) != segment.span() {
            log::error!("Segment value does not span its offsets: {}", segment);
            return Err(TextlabError::new(
                &format!(
                    "Cannot split segment {}: value length differs from end - start",
                    segment
                ),
                ErrorKind::InvariantViolation,
            ));
        }

        let mut cursor = CharCursor::new(value);
        let mut cuts = Vec::new();
        for captures in self.pattern.captures_iter(value) {
            let (Some(whole), Some(separator)) = (captures.get(0), captures.name(SPLITTER_GROUP)) else {
                continue;
            };
            if self.is_negated(whole.as_str()) {
                continue;
            }
            cuts.push((
                separator.start(),
                separator.end(),
                cursor.char_offset(separator.start()),
                cursor.char_offset(separator.end()),
            ));
        }
        if cuts.is_empty() {
            return Ok(vec![segment.clone()]);
        }

        let mut fragments = Vec::with_capacity(cuts.len() + 1);
        let (mut byte, mut chr) = (0, 0);
        for (sep_start_byte, sep_end_byte, sep_start, sep_end) in cuts {
            self.push_fragment(&mut fragments, segment, &value[byte..sep_start_byte], chr, sep_start)?;
            byte = sep_end_byte;
            chr = sep_end;
        }
        self.push_fragment(&mut fragments, segment, &value[byte..], chr, segment.span())?;
        log::debug!("Split {} into {} fragments", segment, fragments.len());
        Ok(fragments)
    }

    /// Lazily splits every segment of `stream`.
    pub fn split_stream<'a>(self, stream: SegmentStream<'a>) -> SegmentStream<'a> {
        Box::new(stream.flat_map(move |item| {
            match item.and_then(|segment| self.split(&segment)) {
                Ok(fragments) => fragments.into_iter().map(Ok).collect::<Vec<_>>(),
                Err(error) => vec![Err(error)],
            }
        }))
    }

    fn is_negated(&self, text: &str) -> bool {
        self.neg_pattern
            .as_ref()
            .map(|neg| neg.is_match(text))
            .unwrap_or(false)
    }

    fn push_fragment(
        &self,
        fragments: &mut Vec<Segment>,
        parent: &Segment,
        text: &str,
        start: usize,
        end: usize,
    ) -> TextlabResult<()> {
        if start >= end {
            return Ok(());
        }
        fragments.push(Segment::with_doc_ref(
            parent.name(),
            text,
            parent.doc_name(),
            parent.doc_len(),
            parent.start() + start,
            parent.start() + end,
        )?);
        Ok(())
    }
}

pub(crate) fn assemble_pattern(left: &str, regex: &str, right: &str) -> String {
    format!("{}(?P<{}>{}){}", left, SPLITTER_GROUP, regex, right)
}
