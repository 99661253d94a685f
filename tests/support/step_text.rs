use std::convert::Infallible;
use std::str::FromStr;

/// Quoted text captured from a behaviour-driven step.
///
/// One matching pair of surrounding quotes is removed and `\"`, `\'` and
/// `\\` are unescaped, so templates may themselves contain quotes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepText {
    raw: String,
}

impl FromStr for StepText {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let quoted = ['"', '\'']
            .into_iter()
            .find_map(|quote| trimmed.strip_prefix(quote)?.strip_suffix(quote))
            .unwrap_or(trimmed);

        Ok(Self {
            raw: unescape(quoted),
        })
    }
}

impl StepText {
    /// Consumes the step value, yielding the unquoted text.
    pub fn into_inner(self) -> String {
        self.raw
    }
}

fn unescape(quoted: &str) -> String {
    let mut unescaped = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(current) = chars.next() {
        if current != '\\' {
            unescaped.push(current);
            continue;
        }
        match chars.next() {
            Some(escaped @ ('"' | '\'' | '\\')) => unescaped.push(escaped),
            Some(other) => {
                unescaped.push('\\');
                unescaped.push(other);
            }
            None => unescaped.push('\\'),
        }
    }
    unescaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::double_quoted("\"Inbox\"", "Inbox")]
    #[case::single_quoted("'Inbox'", "Inbox")]
    #[case::bare("  Inbox ", "Inbox")]
    #[case::escaped_quotes(r#""She said \"hi\"""#, "She said \"hi\"")]
    #[case::inner_quotes_kept(r#""it's""#, "it's")]
    #[case::unknown_escape_kept(r#""a\nb""#, r"a\nb")]
    #[case::lone_quote("\"", "\"")]
    fn parses_step_values(#[case] input: &str, #[case] expected: &str) {
        let parsed = input.parse::<StepText>().unwrap_or_else(|never| match never {});
        assert_eq!(parsed.into_inner(), expected);
    }
}
