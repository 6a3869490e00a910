//! A permissive PHP lexer.
//!
//! Only cares about the tokens needed to find helper calls and their
//! arguments. It never fails: unknown input becomes [`TokenKind::Other`] and
//! unterminated strings or comments run to the end of the source, which is
//! the normal state of a file that is being edited.

use elem_source::Span;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// A name, possibly namespace-qualified (`div`, `\Epic64\Elem\div`).
    Identifier,
    Variable,
    /// A single- or double-quoted string, quotes included.
    String { closed: bool },
    /// A heredoc or nowdoc body.
    Heredoc,
    Number,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Comma,
    Colon,
    DoubleColon,
    /// `->` or `?->`
    Arrow,
    Whitespace,
    Comment,
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SyntaxToken {
    kind: TokenKind,
    text: String,
    span: Span,
}

impl SyntaxToken {
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    #[must_use]
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Comment)
    }
}

/// Lex the PHP regions of `source`. Inline HTML outside `<?php ... ?>`
/// produces no tokens.
#[must_use]
pub fn lex(source: &str) -> Vec<SyntaxToken> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    tokens: Vec<SyntaxToken>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<SyntaxToken> {
        while self.pos < self.source.len() {
            if !self.skip_inline_html() {
                break;
            }
            self.lex_php();
        }
        self.tokens
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// Advance to just past the next open tag. Returns `false` when there is
    /// none left.
    fn skip_inline_html(&mut self) -> bool {
        let rest = self.rest();
        let mut i = 0;
        while let Some(found) = rest[i..].find("<?") {
            let at = i + found;
            let after = &rest[at + 2..];
            if after.starts_with('=') {
                self.pos += at + 3;
                return true;
            }
            let is_php_tag = after
                .get(..3)
                .is_some_and(|tag| tag.eq_ignore_ascii_case("php"))
                && !after[3..].chars().next().is_some_and(|c| !c.is_whitespace());
            if is_php_tag {
                self.pos += at + 5;
                return true;
            }
            i = at + 2;
        }
        self.pos = self.source.len();
        false
    }

    /// Lex until a close tag or the end of input.
    fn lex_php(&mut self) {
        while let Some(ch) = self.peek() {
            let start = self.pos;

            if self.rest().starts_with("?>") {
                self.pos += 2;
                return;
            }

            let kind = match ch {
                c if c.is_whitespace() => {
                    self.eat_while(char::is_whitespace);
                    TokenKind::Whitespace
                }
                '/' if self.peek_nth(1) == Some('/') => {
                    self.eat_line_comment();
                    TokenKind::Comment
                }
                '#' if self.peek_nth(1) != Some('[') => {
                    self.eat_line_comment();
                    TokenKind::Comment
                }
                '/' if self.peek_nth(1) == Some('*') => {
                    self.pos += 2;
                    self.pos = self
                        .rest()
                        .find("*/")
                        .map_or(self.source.len(), |end| self.pos + end + 2);
                    TokenKind::Comment
                }
                '\'' | '"' => self.eat_string(ch),
                '<' if self.rest().starts_with("<<<") => self.eat_heredoc(),
                '$' if self.peek_nth(1).is_some_and(is_ident_start) => {
                    self.pos += 1;
                    self.eat_while(is_ident_continue);
                    TokenKind::Variable
                }
                c if is_ident_start(c) || c == '\\' => {
                    self.eat_while(|c| is_ident_continue(c) || c == '\\');
                    TokenKind::Identifier
                }
                c if c.is_ascii_digit() => {
                    self.eat_while(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_');
                    TokenKind::Number
                }
                '(' => self.single(TokenKind::OpenParen),
                ')' => self.single(TokenKind::CloseParen),
                '[' => self.single(TokenKind::OpenBracket),
                ']' => self.single(TokenKind::CloseBracket),
                '{' => self.single(TokenKind::OpenBrace),
                '}' => self.single(TokenKind::CloseBrace),
                ',' => self.single(TokenKind::Comma),
                ':' if self.peek_nth(1) == Some(':') => {
                    self.pos += 2;
                    TokenKind::DoubleColon
                }
                ':' => self.single(TokenKind::Colon),
                '-' if self.peek_nth(1) == Some('>') => {
                    self.pos += 2;
                    TokenKind::Arrow
                }
                '?' if self.rest().starts_with("?->") => {
                    self.pos += 3;
                    TokenKind::Arrow
                }
                c => {
                    self.pos += c.len_utf8();
                    TokenKind::Other
                }
            };

            self.push(kind, start);
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        let text = &self.source[start..self.pos];
        self.tokens
            .push(SyntaxToken::new(kind, text, Span::from_bounds(start, self.pos)));
    }

    fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        let len: usize = self
            .rest()
            .chars()
            .take_while(|c| predicate(*c))
            .map(char::len_utf8)
            .sum();
        self.pos += len;
    }

    /// Line comments end at the newline or right before a close tag.
    fn eat_line_comment(&mut self) {
        let rest = self.rest();
        let newline = rest.find('\n').unwrap_or(rest.len());
        let close = rest.find("?>").unwrap_or(rest.len());
        self.pos += newline.min(close);
    }

    fn eat_string(&mut self, quote: char) -> TokenKind {
        self.pos += 1;
        let mut chars = self.rest().char_indices();
        while let Some((idx, ch)) = chars.next() {
            if ch == '\\' {
                chars.next();
            } else if ch == quote {
                self.pos += idx + 1;
                return TokenKind::String { closed: true };
            }
        }
        self.pos = self.source.len();
        TokenKind::String { closed: false }
    }

    fn eat_heredoc(&mut self) -> TokenKind {
        let rest = self.rest();
        let header_len = rest.find('\n').unwrap_or(rest.len());
        let label: String = rest[3..header_len]
            .trim()
            .trim_matches(|c| c == '\'' || c == '"')
            .to_string();

        if label.is_empty() || !label.chars().all(is_ident_continue) {
            self.pos += 3;
            return TokenKind::Other;
        }

        let mut offset = header_len;
        while offset < rest.len() {
            let line_start = offset + 1;
            let line_end = rest[line_start.min(rest.len())..]
                .find('\n')
                .map_or(rest.len(), |end| line_start + end);
            let line = rest.get(line_start..line_end).unwrap_or("");
            let body = line.trim_start();
            if let Some(after) = body.strip_prefix(label.as_str()) {
                if !after.chars().next().is_some_and(is_ident_continue) {
                    let indent = line.len() - body.len();
                    self.pos += line_start + indent + label.len();
                    return TokenKind::Heredoc;
                }
            }
            offset = line_end;
        }

        self.pos = self.source.len();
        TokenKind::Heredoc
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source)
            .into_iter()
            .filter(|t| !t.is_trivia())
            .map(|t| t.kind())
            .collect()
    }

    fn render(source: &str) -> String {
        lex(source)
            .iter()
            .filter(|t| !t.is_trivia())
            .map(|t| format!("{:?}({})", t.kind(), t.text()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_named_argument_call() {
        insta::assert_snapshot!(
            render("<?php div(class: 'btn');"),
            @"Identifier(div) OpenParen(() Identifier(class) Colon(:) String { closed: true }('btn') CloseParen()) Other(;)"
        );
    }

    #[test]
    fn test_inline_html_is_skipped() {
        let source = "<div class=\"x\">(</div>\n<?php echo 1 ?>\n<p>'</p><?= span() ?>";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Identifier,
                TokenKind::Number,
                TokenKind::Identifier,
                TokenKind::OpenParen,
                TokenKind::CloseParen,
            ]
        );
    }

    #[test]
    fn test_no_open_tag_yields_nothing() {
        assert!(lex("div(class: 'btn')").is_empty());
    }

    #[test]
    fn test_spans_match_source() {
        let source = "<?php\n\\Epic64\\Elem\\div(class: \"a b\");";
        for token in lex(source) {
            assert_eq!(token.span().slice(source), Some(token.text()));
        }
    }

    #[test]
    fn test_namespaced_identifier() {
        let tokens = lex("<?php \\Epic64\\Elem\\div()");
        assert_eq!(tokens[1].kind(), TokenKind::Identifier);
        assert_eq!(tokens[1].text(), "\\Epic64\\Elem\\div");
    }

    #[test]
    fn test_escapes_inside_strings() {
        let tokens = lex(r#"<?php 'it\'s' "say \"hi\"""#);
        let strings: Vec<&str> = tokens
            .iter()
            .filter(|t| matches!(t.kind(), TokenKind::String { .. }))
            .map(SyntaxToken::text)
            .collect();
        assert_eq!(strings, vec![r"'it\'s'", r#""say \"hi\"""#]);
    }

    #[test]
    fn test_unclosed_string_runs_to_end() {
        let tokens = lex("<?php div(class: 'bt");
        let last = tokens.last().unwrap();
        assert_eq!(last.kind(), TokenKind::String { closed: false });
        assert_eq!(last.text(), "'bt");
    }

    #[test]
    fn test_comments() {
        let source = "<?php // div('x')\n# span('y')\n/* a('z') */ #[Attr] p()";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Other,
                TokenKind::OpenBracket,
                TokenKind::Identifier,
                TokenKind::CloseBracket,
                TokenKind::Identifier,
                TokenKind::OpenParen,
                TokenKind::CloseParen,
            ]
        );
    }

    #[test]
    fn test_line_comment_stops_at_close_tag() {
        let source = "<?php // note ?><b>html</b><?php a()";
        assert_eq!(
            kinds(source),
            vec![TokenKind::Identifier, TokenKind::OpenParen, TokenKind::CloseParen]
        );
    }

    #[test]
    fn test_member_and_static_access() {
        assert_eq!(
            kinds("<?php $el->div() ?->x Foo::div"),
            vec![
                TokenKind::Variable,
                TokenKind::Arrow,
                TokenKind::Identifier,
                TokenKind::OpenParen,
                TokenKind::CloseParen,
                TokenKind::Arrow,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::DoubleColon,
                TokenKind::Identifier,
            ]
        );
    }

    #[test]
    fn test_heredoc_body_is_one_token() {
        let source = "<?php $x = <<<HTML\n  div(class: 'no')\n  HTML;\nspan()";
        let tokens = lex(source);
        let heredoc = tokens
            .iter()
            .find(|t| t.kind() == TokenKind::Heredoc)
            .unwrap();
        assert!(heredoc.text().ends_with("HTML"));
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Variable,
                TokenKind::Other,
                TokenKind::Heredoc,
                TokenKind::Other,
                TokenKind::Identifier,
                TokenKind::OpenParen,
                TokenKind::CloseParen,
            ]
        );
    }
}
