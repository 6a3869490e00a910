use crate::call_site::Argument;
use crate::call_site::CallSite;
use crate::catalog::HelperFunctionCatalog;
use crate::lexer::TokenKind;

/// Whether `argument` is the class argument of a recognized helper call.
///
/// A named argument is judged by its name alone. Otherwise the tokens before
/// the argument are walked backwards looking for `name :`.
#[must_use]
pub fn is_class_argument(
    catalog: &HelperFunctionCatalog,
    call: &CallSite,
    argument: &Argument,
) -> bool {
    if argument.value().is_none() || !catalog.is_helper(call.function_name()) {
        return false;
    }

    let bound = match argument.name() {
        Some(name) => Some(name),
        None => bound_name(call, argument.token_index()),
    };
    bound == Some(catalog.class_argument())
}

enum Seek {
    Colon { depth: usize },
    Name,
}

/// Walk back from `tokens[index]` to the `name :` that binds it, without
/// leaving the current argument.
fn bound_name(call: &CallSite, index: usize) -> Option<&str> {
    let tokens = call.tokens().get(..index)?;
    let mut state = Seek::Colon { depth: 0 };

    for token in tokens.iter().rev().filter(|t| !t.is_trivia()) {
        state = match state {
            Seek::Colon { depth } => match token.kind() {
                TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::CloseBrace => {
                    Seek::Colon { depth: depth + 1 }
                }
                TokenKind::OpenParen | TokenKind::OpenBracket | TokenKind::OpenBrace
                | TokenKind::Comma
                    if depth == 0 =>
                {
                    return None;
                }
                TokenKind::OpenParen | TokenKind::OpenBracket | TokenKind::OpenBrace => {
                    Seek::Colon { depth: depth - 1 }
                }
                TokenKind::Colon if depth == 0 => Seek::Name,
                _ => Seek::Colon { depth },
            },
            Seek::Name => {
                return (token.kind() == TokenKind::Identifier).then_some(token.text());
            }
        };
    }

    None
}
