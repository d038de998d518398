/// Length of `text` in chars, the unit all segment offsets are expressed in.
#[inline]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Converts ascending byte offsets of a string into char offsets.
///
/// Regex matches report byte offsets. Converting each of them from the start of the
/// text would be quadratic over a document, so the cursor remembers the last position
/// and only counts the chars in between. Offsets must fall on char boundaries; an
/// offset lower than the previous one restarts the count from the beginning.
pub struct CharCursor<'a> {
    text: &'a str,
    byte: usize,
    chr: usize,
}

impl<'a> CharCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        CharCursor { text, byte: 0, chr: 0 }
    }

    pub fn char_offset(&mut self, byte_offset: usize) -> usize {
        if byte_offset < self.byte {
            self.byte = 0;
            self.chr = 0;
        }
        let end = byte_offset.min(self.text.len());
        self.chr += char_len(&self.text[self.byte..end]);
        self.byte = end;
        self.chr
    }
}

/// A whitespace separated token together with its char offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan<'a> {
    pub token: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Splits `text` on whitespace and reports the exact char span of every token.
pub fn token_spans(text: &str) -> Vec<TokenSpan<'_>> {
    let mut spans = Vec::new();
    let mut current: Option<(usize, usize)> = None;
    let mut chars = 0;

    for (byte, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some((start_byte, start_char)) = current.take() {
                spans.push(TokenSpan {
                    token: &text[start_byte..byte],
                    start: start_char,
                    end: chars,
                });
            }
        } else if current.is_none() {
            current = Some((byte, chars));
        }
        chars += 1;
    }
    if let Some((start_byte, start_char)) = current {
        spans.push(TokenSpan {
            token: &text[start_byte..],
            start: start_char,
            end: chars,
        });
    }
    spans
}

/// Start offsets of `tokens` if they were joined by `sep` into a single string.
pub fn compute_starts<S: AsRef<str>>(tokens: &[S], sep: &str) -> Vec<usize> {
    let sep_len = char_len(sep);
    let mut next_start = 0;
    tokens
        .iter()
        .map(|token| {
            let start = next_start;
            next_start += char_len(token.as_ref()) + sep_len;
            start
        })
        .collect()
}

/// End offsets of `tokens` if they were joined by `sep` into a single string.
pub fn compute_ends<S: AsRef<str>>(tokens: &[S], sep: &str) -> Vec<usize> {
    compute_starts(tokens, sep)
        .into_iter()
        .zip(tokens)
        .map(|(start, token)| start + char_len(token.as_ref()))
        .collect()
}
