use elem_css::ClassToken;
use elem_source::Span;

/// Split the contents of a class argument into individual class names.
///
/// Spans are relative to the start of the literal, opening quote included,
/// so a token at the very start of the contents sits at offset 1.
#[must_use]
pub fn tokenize(contents: &str) -> LiteralTokens<'_> {
    LiteralTokens {
        contents,
        cursor: 0,
    }
}

#[derive(Clone, Debug)]
pub struct LiteralTokens<'a> {
    contents: &'a str,
    cursor: usize,
}

impl Iterator for LiteralTokens<'_> {
    type Item = ClassToken;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.contents[self.cursor..];
        let trimmed = rest.trim_start();
        if trimmed.is_empty() {
            self.cursor = self.contents.len();
            return None;
        }

        let start = self.cursor + (rest.len() - trimmed.len());
        let len = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        self.cursor = start + len;

        Some(ClassToken::new(
            &trimmed[..len],
            Span::from_parts(start + 1, len),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(contents: &str) -> Vec<(String, u32)> {
        tokenize(contents)
            .map(|t| (t.name().to_string(), t.span().start()))
            .collect()
    }

    #[test]
    fn test_blank_contents() {
        assert_eq!(tokenize("").count(), 0);
        assert_eq!(tokenize("   ").count(), 0);
        assert_eq!(tokenize("\t\n ").count(), 0);
    }

    #[test]
    fn test_offsets_include_opening_quote() {
        assert_eq!(
            offsets("btn btn-primary"),
            vec![("btn".to_string(), 1), ("btn-primary".to_string(), 5)]
        );
    }

    #[test]
    fn test_repeated_names_get_distinct_offsets() {
        let tokens: Vec<_> = tokenize("btn btn").collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].name(), tokens[1].name());
        assert!(tokens[0].span().end() <= tokens[1].span().start());
        assert_eq!(tokens[1].span(), Span::new(5, 3));
    }

    #[test]
    fn test_runs_of_whitespace() {
        insta::assert_snapshot!(
            offsets("  card\t\tcard--wide \n shadow ")
                .iter()
                .map(|(name, at)| format!("{name}@{at}"))
                .collect::<Vec<_>>()
                .join(" "),
            @"card@3 card--wide@9 shadow@22"
        );
    }

    #[test]
    fn test_prefix_names_do_not_confuse_positions() {
        assert_eq!(
            offsets("b bb b"),
            vec![
                ("b".to_string(), 1),
                ("bb".to_string(), 3),
                ("b".to_string(), 6)
            ]
        );
    }
}
