//! Recover [`CallSite`]s from PHP source.

use elem_source::Offset;

use crate::call_site::CallSite;
use crate::lexer::lex;
use crate::lexer::SyntaxToken;
use crate::lexer::TokenKind;

/// Names that look like calls when followed by `(` but are language
/// constructs.
const CONSTRUCTS: &[&str] = &[
    "array", "catch", "declare", "die", "elseif", "empty", "eval", "exit", "fn", "for", "foreach",
    "function", "if", "isset", "list", "match", "switch", "unset", "while",
];

/// Every function call in `source`, outermost first.
#[must_use]
pub fn call_sites(source: &str) -> Vec<CallSite> {
    let tokens = lex(source);
    let sites: Vec<CallSite> = call_starts(&tokens)
        .filter_map(|(start, open)| {
            let end = call_end(&tokens, open);
            CallSite::from_tokens(tokens[start..end].to_vec())
        })
        .collect();
    tracing::trace!("Found {} call sites", sites.len());
    sites
}

/// The innermost call with a string argument holding the cursor, and the
/// index of that argument.
#[must_use]
pub fn call_site_at(source: &str, offset: Offset) -> Option<(CallSite, usize)> {
    let tokens = lex(source);
    let cursor = offset.get_usize();

    // only calls enclosing the cursor are parsed, innermost first
    let mut enclosing: Vec<(usize, usize, usize)> = call_starts(&tokens)
        .filter(|(start, _)| tokens[*start].span().start_usize() <= cursor)
        .filter_map(|(start, open)| {
            let end = call_end(&tokens, open);
            let from = tokens[start].span().start_usize();
            let to = tokens[end - 1].span().end_usize();
            (cursor <= to).then_some((start, end, to - from))
        })
        .collect();
    enclosing.sort_by_key(|(_, _, length)| *length);

    enclosing.into_iter().find_map(|(start, end, _)| {
        let site = CallSite::from_tokens(tokens[start..end].to_vec())?;
        let (index, _) = site.argument_at(offset)?;
        Some((site, index))
    })
}

/// Yields `(name_index, open_paren_index)` for each call.
fn call_starts(tokens: &[SyntaxToken]) -> impl Iterator<Item = (usize, usize)> + '_ {
    let significant: Vec<usize> = (0..tokens.len())
        .filter(|i| !tokens[*i].is_trivia())
        .collect();

    (0..significant.len()).filter_map(move |pos| {
        let name = significant[pos];
        let open = *significant.get(pos + 1)?;
        if tokens[name].kind() != TokenKind::Identifier
            || tokens[open].kind() != TokenKind::OpenParen
            || is_construct(tokens[name].text())
        {
            return None;
        }
        let preceded_by_access = pos
            .checked_sub(1)
            .map(|prev| &tokens[significant[prev]])
            .is_some_and(|prev| match prev.kind() {
                TokenKind::Arrow | TokenKind::DoubleColon => true,
                TokenKind::Identifier => ["function", "fn", "new"]
                    .iter()
                    .any(|kw| prev.text().eq_ignore_ascii_case(kw)),
                _ => false,
            });
        (!preceded_by_access).then_some((name, open))
    })
}

fn is_construct(name: &str) -> bool {
    CONSTRUCTS.iter().any(|kw| name.eq_ignore_ascii_case(kw))
}

/// Index just past the parenthesis closing `tokens[open]`, or the end of the
/// tokens when it is never closed.
fn call_end(tokens: &[SyntaxToken], open: usize) -> usize {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(open) {
        match token.kind() {
            TokenKind::OpenParen | TokenKind::OpenBracket | TokenKind::OpenBrace => depth += 1,
            TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::CloseBrace => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return index + 1;
                }
            }
            _ => {}
        }
    }
    tokens.len()
}
