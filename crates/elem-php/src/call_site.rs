use elem_css::ClassToken;
use elem_source::Offset;
use elem_source::Span;
use serde::Serialize;

use crate::lexer::SyntaxToken;
use crate::lexer::TokenKind;
use crate::tokenizer::tokenize;

/// A quoted string argument.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct StringLiteral {
    contents: String,
    quote: char,
    span: Span,
    closed: bool,
}

impl StringLiteral {
    /// `span` covers the whole literal including both quotes (or up to the
    /// end of input when `closed` is false).
    #[must_use]
    pub fn new(contents: impl Into<String>, quote: char, span: Span, closed: bool) -> Self {
        Self {
            contents: contents.into(),
            quote,
            span,
            closed,
        }
    }

    /// Build from a lexed string token. `None` for any other kind of token.
    #[must_use]
    pub fn from_token(token: &SyntaxToken) -> Option<Self> {
        let TokenKind::String { closed } = token.kind() else {
            return None;
        };
        let text = token.text();
        let quote = text.chars().next()?;
        let body = &text[quote.len_utf8()..];
        let contents = if closed {
            body.strip_suffix(quote).unwrap_or(body)
        } else {
            body
        };
        Some(Self::new(contents, quote, token.span(), closed))
    }

    #[must_use]
    pub fn contents(&self) -> &str {
        &self.contents
    }

    #[must_use]
    pub fn quote(&self) -> char {
        self.quote
    }

    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether a cursor at `offset` is inside the literal: after the opening
    /// quote and no further than the closing one.
    #[must_use]
    pub fn contains_cursor(&self, offset: Offset) -> bool {
        let offset = offset.get();
        let last = if self.closed {
            self.span.end().saturating_sub(1)
        } else {
            self.span.end()
        };
        offset > self.span.start() && offset <= last
    }

    /// The class names in the literal with spans relative to the document.
    pub fn class_tokens(&self) -> impl Iterator<Item = ClassToken> + '_ {
        let base = self.span.start();
        tokenize(&self.contents).map(move |token| {
            let span = token.span().shift(base);
            ClassToken::new(token.name(), span)
        })
    }
}

/// One argument of a call.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Argument {
    name: Option<String>,
    value: Option<StringLiteral>,
    token_index: usize,
}

impl Argument {
    /// `token_index` is where the argument value starts in the owning
    /// [`CallSite`]'s token list.
    #[must_use]
    pub fn new(name: Option<String>, value: Option<StringLiteral>, token_index: usize) -> Self {
        Self {
            name,
            value,
            token_index,
        }
    }

    #[must_use]
    pub fn named(
        name: impl Into<String>,
        value: Option<StringLiteral>,
        token_index: usize,
    ) -> Self {
        Self::new(Some(name.into()), value, token_index)
    }

    #[must_use]
    pub fn positional(value: Option<StringLiteral>, token_index: usize) -> Self {
        Self::new(None, value, token_index)
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The literal, when the argument is a single string.
    #[must_use]
    pub fn value(&self) -> Option<&StringLiteral> {
        self.value.as_ref()
    }

    #[must_use]
    pub fn token_index(&self) -> usize {
        self.token_index
    }
}

/// A function call with its arguments and the flat token list it was read
/// from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct CallSite {
    function_name: String,
    span: Span,
    arguments: Vec<Argument>,
    tokens: Vec<SyntaxToken>,
}

impl CallSite {
    #[must_use]
    pub fn new(
        function_name: impl Into<String>,
        span: Span,
        arguments: Vec<Argument>,
        tokens: Vec<SyntaxToken>,
    ) -> Self {
        Self {
            function_name: function_name.into(),
            span,
            arguments,
            tokens,
        }
    }

    /// Parse a call from tokens that start at the function name.
    ///
    /// Tokens after the closing parenthesis are dropped. A call that is still
    /// being typed and has no closing parenthesis keeps everything after the
    /// opening one.
    #[must_use]
    pub fn from_tokens(mut tokens: Vec<SyntaxToken>) -> Option<Self> {
        let mut significant = tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| !token.is_trivia());

        let (name_index, name) = significant.next()?;
        if name.kind() != TokenKind::Identifier {
            return None;
        }
        let (open_index, open) = significant.next()?;
        if open.kind() != TokenKind::OpenParen {
            return None;
        }
        let function_name = name.text().to_string();

        let mut arguments = Vec::new();
        let mut depth = 0usize;
        let mut arg_start = open_index + 1;
        let mut end = None;

        for (index, token) in tokens.iter().enumerate().skip(open_index + 1) {
            match token.kind() {
                TokenKind::OpenParen | TokenKind::OpenBracket | TokenKind::OpenBrace => {
                    depth += 1;
                }
                TokenKind::CloseParen if depth == 0 => {
                    arguments.extend(parse_argument(&tokens, arg_start, index));
                    end = Some(index + 1);
                    break;
                }
                TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::CloseBrace => {
                    depth = depth.saturating_sub(1);
                }
                TokenKind::Comma if depth == 0 => {
                    arguments.extend(parse_argument(&tokens, arg_start, index));
                    arg_start = index + 1;
                }
                _ => {}
            }
        }
        match end {
            Some(end) => tokens.truncate(end),
            None => arguments.extend(parse_argument(&tokens, arg_start, tokens.len())),
        }

        let start = tokens[name_index].span().start_usize();
        let span_end = tokens.last().map_or(start, |t| t.span().end_usize());

        Some(Self::new(
            function_name,
            Span::from_bounds(start, span_end),
            arguments,
            tokens,
        ))
    }

    /// The called name as written, possibly namespace-qualified.
    #[must_use]
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// The last segment of the function name.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.function_name
            .rsplit('\\')
            .next()
            .unwrap_or(&self.function_name)
    }

    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    #[must_use]
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    #[must_use]
    pub fn tokens(&self) -> &[SyntaxToken] {
        &self.tokens
    }

    /// The argument whose literal holds the cursor, with its index.
    #[must_use]
    pub fn argument_at(&self, offset: Offset) -> Option<(usize, &Argument)> {
        self.arguments.iter().enumerate().find(|(_, argument)| {
            argument
                .value()
                .is_some_and(|literal| literal.contains_cursor(offset))
        })
    }
}

/// Turn `tokens[start..end]` into an argument. Empty ranges (a trailing
/// comma) produce nothing.
fn parse_argument(tokens: &[SyntaxToken], start: usize, end: usize) -> Option<Argument> {
    let significant: Vec<usize> = (start..end).filter(|i| !tokens[*i].is_trivia()).collect();
    let first = *significant.first()?;

    let (name, value_indices) = match significant.as_slice() {
        [name, colon, rest @ ..]
            if tokens[*name].kind() == TokenKind::Identifier
                && tokens[*colon].kind() == TokenKind::Colon =>
        {
            (Some(tokens[*name].text().to_string()), rest)
        }
        all => (None, all),
    };

    let token_index = value_indices.first().copied().unwrap_or(first);
    let value = match value_indices {
        [only] => StringLiteral::from_token(&tokens[*only]),
        _ => None,
    };

    Some(Argument::new(name, value, token_index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn call(source: &str) -> CallSite {
        let tokens = lex(source);
        let start = tokens
            .iter()
            .position(|t| t.kind() == TokenKind::Identifier)
            .unwrap();
        CallSite::from_tokens(tokens[start..].to_vec()).unwrap()
    }

    mod literals {
        use super::*;

        #[test]
        fn test_contents_strip_quotes() {
            let site = call("<?php div(class: 'btn primary')");
            let literal = site.arguments()[0].value().unwrap();
            assert_eq!(literal.contents(), "btn primary");
            assert_eq!(literal.quote(), '\'');
            assert!(literal.is_closed());
        }

        #[test]
        fn test_cursor_bounds_closed() {
            // `"ab"` spans 0..4
            let literal = StringLiteral::new("ab", '"', Span::new(0, 4), true);
            assert!(!literal.contains_cursor(Offset::new(0)));
            assert!(literal.contains_cursor(Offset::new(1)));
            assert!(literal.contains_cursor(Offset::new(3)));
            assert!(!literal.contains_cursor(Offset::new(4)));
        }

        #[test]
        fn test_cursor_bounds_unclosed() {
            let literal = StringLiteral::new("ab", '"', Span::new(10, 3), false);
            assert!(literal.contains_cursor(Offset::new(13)));
            assert!(!literal.contains_cursor(Offset::new(14)));
        }

        #[test]
        fn test_class_tokens_are_document_relative() {
            let source = "<?php div(class: \"btn missing\");";
            let site = call(source);
            let literal = site.arguments()[0].value().unwrap();
            let names: Vec<_> = literal
                .class_tokens()
                .map(|t| t.span().slice(source).unwrap().to_string())
                .collect();
            assert_eq!(names, vec!["btn", "missing"]);
        }
    }

    mod arguments {
        use super::*;

        #[test]
        fn test_named_and_positional() {
            let site = call("<?php a('/home', class: 'nav', id: $id)");
            let args = site.arguments();
            assert_eq!(args.len(), 3);
            assert_eq!(args[0].name(), None);
            assert_eq!(args[0].value().unwrap().contents(), "/home");
            assert_eq!(args[1].name(), Some("class"));
            assert_eq!(args[1].value().unwrap().contents(), "nav");
            assert_eq!(args[2].name(), Some("id"));
            assert!(args[2].value().is_none());
        }

        #[test]
        fn test_nested_commas_do_not_split() {
            let site = call("<?php div(class: 'x', children: [span('a'), span('b')])");
            assert_eq!(site.arguments().len(), 2);
            assert_eq!(site.arguments()[1].name(), Some("children"));
        }

        #[test]
        fn test_concatenation_is_not_a_literal() {
            let site = call("<?php div(class: 'a' . $b)");
            assert!(site.arguments()[0].value().is_none());
        }

        #[test]
        fn test_trailing_comma() {
            let site = call("<?php div(class: 'x',)");
            assert_eq!(site.arguments().len(), 1);
        }

        #[test]
        fn test_token_index_points_at_value() {
            let site = call("<?php div(class: 'x')");
            let arg = &site.arguments()[0];
            assert_eq!(site.tokens()[arg.token_index()].text(), "'x'");
        }

        #[test]
        fn test_unterminated_call_keeps_last_argument() {
            let site = call("<?php div(id: 'main', class: 'bt");
            let args = site.arguments();
            assert_eq!(args.len(), 2);
            assert_eq!(args[1].value().unwrap().contents(), "bt");
            assert!(!args[1].value().unwrap().is_closed());
        }
    }

    #[test]
    fn test_span_and_short_name() {
        let source = "<?php \\Epic64\\Elem\\div(class: 'x'); echo 1;";
        let site = call(source);
        assert_eq!(site.span().slice(source), Some("\\Epic64\\Elem\\div(class: 'x')"));
        assert_eq!(site.function_name(), "\\Epic64\\Elem\\div");
        assert_eq!(site.short_name(), "div");
    }

    #[test]
    fn test_not_a_call() {
        let tokens = lex("<?php $x = 1;");
        assert!(CallSite::from_tokens(tokens).is_none());
        assert!(CallSite::from_tokens(lex("<?php div;")).is_none());
    }

    #[test]
    fn test_argument_at() {
        let source = "<?php a('/x', class: 'nav')";
        let site = call(source);
        let offset = source.find("nav").unwrap();
        let (index, arg) = site.argument_at(Offset::from_usize(offset)).unwrap();
        assert_eq!(index, 1);
        assert_eq!(arg.name(), Some("class"));
        assert!(site.argument_at(Offset::from_usize(offset - 4)).is_none());
    }
}
