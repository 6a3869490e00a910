use elem_source::Span;
use serde::Serialize;

/// A single class name and where it sits in the enclosing text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ClassToken {
    name: String,
    span: Span,
}

impl ClassToken {
    #[must_use]
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }
}

/// A piece of stylesheet content as handed over by the host.
///
/// Hosts with a real CSS parser hand over class selectors directly; anything
/// else arrives as text and goes through the textual heuristic in [`scan`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedNode {
    /// A class selector the host already identified. `name` may include the
    /// leading `.`; `span` covers exactly `name`.
    StructuredClassSelector { name: String, span: Span },
    /// Unparsed text starting at byte `offset` of the file.
    OpaqueText { text: String, offset: u32 },
}

impl ParsedNode {
    #[must_use]
    pub fn class_tokens(&self) -> NodeTokens<'_> {
        match self {
            ParsedNode::StructuredClassSelector { name, span } => {
                NodeTokens::Structured(structured_token(name, *span))
            }
            ParsedNode::OpaqueText { text, offset } => {
                NodeTokens::Opaque(ClassTokens::with_base(text, *offset))
            }
        }
    }
}

fn structured_token(name: &str, span: Span) -> Option<ClassToken> {
    let (bare, shift) = match name.strip_prefix('.') {
        Some(rest) => (rest, 1),
        None => (name, 0),
    };
    let len = bare.bytes().take_while(|b| is_class_byte(*b)).count();
    let bare = &bare[..len];
    if !is_class_name(bare) {
        return None;
    }
    Some(ClassToken::new(
        bare,
        Span::from_parts(span.start_usize() + shift, len),
    ))
}

pub enum NodeTokens<'a> {
    Structured(Option<ClassToken>),
    Opaque(ClassTokens<'a>),
}

impl Iterator for NodeTokens<'_> {
    type Item = ClassToken;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            NodeTokens::Structured(token) => token.take(),
            NodeTokens::Opaque(tokens) => tokens.next(),
        }
    }
}

/// Scan stylesheet text for the class selectors it declares.
///
/// The returned iterator is lazy; calling `scan` again restarts from the top.
#[must_use]
pub fn scan(text: &str) -> ClassTokens<'_> {
    ClassTokens::with_base(text, 0)
}

/// Scan host-supplied nodes, preferring structured selectors where present.
pub fn scan_nodes(nodes: &[ParsedNode]) -> impl Iterator<Item = ClassToken> + '_ {
    nodes.iter().flat_map(ParsedNode::class_tokens)
}

/// Whether `name` is a usable class name: `[A-Za-z0-9_-]+`, not starting
/// with a digit or with `-` followed by a digit.
#[must_use]
pub fn is_class_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    match bytes {
        [] => false,
        [first, ..] if first.is_ascii_digit() => false,
        [b'-'] => false,
        [b'-', second, ..] if second.is_ascii_digit() => false,
        _ => bytes.iter().all(|b| is_class_byte(*b)),
    }
}

fn is_class_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

/// Lazy iterator over the class selectors of a stylesheet text.
#[derive(Clone, Debug)]
pub struct ClassTokens<'a> {
    text: &'a str,
    cursor: usize,
    base: u32,
}

impl<'a> ClassTokens<'a> {
    fn with_base(text: &'a str, base: u32) -> Self {
        Self {
            text,
            cursor: 0,
            base,
        }
    }
}

impl Iterator for ClassTokens<'_> {
    type Item = ClassToken;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.text.as_bytes();

        while self.cursor < bytes.len() {
            let i = self.cursor;
            match bytes[i] {
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    self.cursor = skip_comment(self.text, i);
                }
                quote @ (b'"' | b'\'') => {
                    self.cursor = skip_string(bytes, i, quote);
                }
                b'\\' => self.cursor += 2,
                b'.' => {
                    let start = i + 1;
                    let end = start
                        + bytes[start..]
                            .iter()
                            .take_while(|b| is_class_byte(**b))
                            .count();
                    self.cursor = end;

                    let name = &self.text[start..end];
                    // an escape or a non-ASCII byte means the real name is longer
                    let truncated = bytes
                        .get(end)
                        .is_some_and(|b| !b.is_ascii() || *b == b'\\');
                    if truncated || !is_class_name(name) || !opens_rule(self.text, end) {
                        continue;
                    }
                    let span = Span::from_bounds(start, end).shift(self.base);
                    return Some(ClassToken::new(name, span));
                }
                _ => self.cursor += 1,
            }
        }

        None
    }
}

/// A selector is followed by the `{` that opens its rule before any `;` or
/// `}` shows up. Text that ends first is an unfinished selector and counts.
fn opens_rule(text: &str, from: usize) -> bool {
    let bytes = text.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_comment(text, i),
            quote @ (b'"' | b'\'') => i = skip_string(bytes, i, quote),
            b'\\' => i += 2,
            b'{' => return true,
            b';' | b'}' => return false,
            _ => i += 1,
        }
    }
    true
}

/// Index just past the comment opening at `open`.
fn skip_comment(text: &str, open: usize) -> usize {
    text[open + 2..]
        .find("*/")
        .map_or(text.len(), |end| open + 2 + end + 2)
}

fn skip_string(bytes: &[u8], open: usize, quote: u8) -> usize {
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            b'\n' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}
