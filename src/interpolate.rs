//! Placeholder substitution in string and sequence modes.
//!
//! Templates are scanned once into alternating literal and placeholder
//! slots. A template with `k` placeholders always scans to `k + 1` literals,
//! which is what keeps sequence output at `2k + 1` elements.
//!
//! | Token | Source |
//! |-------|--------|
//! | `{0}`, `{1}` | positional [`Args`] |
//! | `{name}` | named [`Args`], then the reserved `n`/`count` |
//! | `{{key}}` | alias reference, copied through as literal text |
//!
//! Tokens that resolve to nothing are left as their literal `{token}` text.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Reserved names that expose the active count inside a template.
pub const RESERVED_COUNT_NAMES: [&str; 2] = ["n", "count"];

/// Opaque value carried through sequence mode without being stringified.
///
/// Anything `Display + Debug + Send + Sync + 'static` qualifies; the
/// `Display` form is used when the value has to be flattened to text.
pub trait Fragment: fmt::Display + fmt::Debug + Send + Sync + 'static {
    /// Borrow the fragment as [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<T> Fragment for T
where
    T: fmt::Display + fmt::Debug + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An interpolation argument.
#[derive(Clone, Debug)]
pub enum Value {
    /// Plain text.
    Text(String),
    /// A number; integral values render without a fractional part.
    Number(f64),
    /// A boolean.
    Bool(bool),
    /// An opaque UI fragment.
    Fragment(Arc<dyn Fragment>),
}

impl Value {
    /// Wrap an opaque fragment.
    ///
    /// ```
    /// use phrasebook::Value;
    ///
    /// #[derive(Debug)]
    /// struct Link(&'static str);
    ///
    /// impl std::fmt::Display for Link {
    ///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    ///         write!(f, "<a>{}</a>", self.0)
    ///     }
    /// }
    ///
    /// let value = Value::fragment(Link("docs"));
    /// assert_eq!(value.to_string(), "<a>docs</a>");
    /// assert!(value.as_fragment::<Link>().is_some());
    /// ```
    #[must_use]
    pub fn fragment(fragment: impl Fragment) -> Self {
        Self::Fragment(Arc::new(fragment))
    }

    /// Downcast a fragment value to its concrete type.
    #[must_use]
    pub fn as_fragment<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Fragment(fragment) => {
                <dyn Fragment as Fragment>::as_any(&**fragment).downcast_ref::<T>()
            }
            Self::Text(_) | Self::Number(_) | Self::Bool(_) => None,
        }
    }

    /// Borrow the text of a [`Value::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Number(_) | Self::Bool(_) | Self::Fragment(_) => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(left), Self::Text(right)) => left == right,
            (Self::Number(left), Self::Number(right)) => left.to_bits() == right.to_bits(),
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Fragment(left), Self::Fragment(right)) => Arc::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => formatter.write_str(text),
            Self::Number(number) => formatter.write_str(&format_number(*number)),
            Self::Bool(flag) => write!(formatter, "{flag}"),
            Self::Fragment(fragment) => write!(formatter, "{fragment}"),
        }
    }
}

/// Render a number the way hosts expect to see counts: `5`, `2.5`, `0`.
pub(crate) fn format_number(number: f64) -> String {
    let rendered = number.to_string();
    if rendered == "-0" {
        String::from("0")
    } else {
        rendered
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

impl From<f32> for Value {
    fn from(number: f32) -> Self {
        Self::Number(f64::from(number))
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Self::Number(f64::from(number))
    }
}

impl From<u32> for Value {
    fn from(number: u32) -> Self {
        Self::Number(f64::from(number))
    }
}

impl From<i64> for Value {
    #[expect(
        clippy::cast_precision_loss,
        reason = "counts beyond 2^53 are not meaningful message selectors"
    )]
    fn from(number: i64) -> Self {
        Self::Number(number as f64)
    }
}

impl From<usize> for Value {
    #[expect(
        clippy::cast_precision_loss,
        reason = "counts beyond 2^53 are not meaningful message selectors"
    )]
    fn from(number: usize) -> Self {
        Self::Number(number as f64)
    }
}

/// Interpolation arguments: a name map or an ordered list.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Args {
    /// No arguments.
    #[default]
    None,
    /// Arguments addressed by `{name}`.
    Named(HashMap<String, Value>),
    /// Arguments addressed by `{0}`, `{1}`, ...
    Positional(Vec<Value>),
}

impl Args {
    /// Start an empty named argument map.
    #[must_use]
    pub fn named() -> Self {
        Self::Named(HashMap::new())
    }

    /// Build positional arguments from `values`.
    #[must_use]
    pub fn positional<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Add a named argument. [`Args::None`] becomes a named map; positional
    /// arguments are left untouched since they have no names.
    ///
    /// ```
    /// use phrasebook::{Args, Value};
    ///
    /// let args = Args::named().with("name", "World");
    /// assert_eq!(args.get_named("name"), Some(&Value::from("World")));
    /// ```
    #[must_use]
    pub fn with(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        match self {
            Self::None => {
                let mut map = HashMap::new();
                map.insert(name.into(), value.into());
                Self::Named(map)
            }
            Self::Named(mut map) => {
                map.insert(name.into(), value.into());
                Self::Named(map)
            }
            positional @ Self::Positional(_) => positional,
        }
    }

    /// Look up a named argument.
    #[must_use]
    pub fn get_named(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Named(map) => map.get(name),
            Self::None | Self::Positional(_) => None,
        }
    }

    /// Look up a positional argument.
    #[must_use]
    pub fn get_positional(&self, index: usize) -> Option<&Value> {
        match self {
            Self::Positional(values) => values.get(index),
            Self::None | Self::Named(_) => None,
        }
    }

    /// Whether no arguments were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Named(map) => map.is_empty(),
            Self::Positional(values) => values.is_empty(),
        }
    }
}

impl<S: Into<String>, V: Into<Value>> FromIterator<(S, V)> for Args {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        Self::Named(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl From<HashMap<String, Value>> for Args {
    fn from(map: HashMap<String, Value>) -> Self {
        Self::Named(map)
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self::Positional(values)
    }
}

/// Output shape requested from the interpolator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Concatenate everything into one string.
    #[default]
    Text,
    /// Interleave literal text with unstringified values.
    Sequence,
}

/// One element of a sequence-mode translation.
#[derive(Clone, Debug, PartialEq)]
pub enum Piece {
    /// Literal template text, or an unresolved `{token}`.
    Text(String),
    /// A substituted argument, passed through as-is.
    Value(Value),
}

impl Piece {
    /// Borrow the literal text of a [`Piece::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Value(_) => None,
        }
    }

    /// Borrow the value of a [`Piece::Value`].
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => formatter.write_str(text),
            Self::Value(value) => write!(formatter, "{value}"),
        }
    }
}

/// A resolved message.
#[derive(Clone, Debug, PartialEq)]
pub enum Translation {
    /// String-mode output.
    Text(String),
    /// Sequence-mode output.
    Sequence(Vec<Piece>),
}

impl Translation {
    /// Flatten into a single string, stringifying any values.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Sequence(pieces) => pieces.iter().map(ToString::to_string).collect(),
        }
    }

    /// Convert into sequence form; string output becomes one text piece.
    #[must_use]
    pub fn into_pieces(self) -> Vec<Piece> {
        match self {
            Self::Text(text) => vec![Piece::Text(text)],
            Self::Sequence(pieces) => pieces,
        }
    }

    /// Borrow string-mode output.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Sequence(_) => None,
        }
    }

    /// Borrow sequence-mode output.
    #[must_use]
    pub fn as_pieces(&self) -> Option<&[Piece]> {
        match self {
            Self::Sequence(pieces) => Some(pieces.as_slice()),
            Self::Text(_) => None,
        }
    }

    /// Wrap plain text in the requested mode.
    pub(crate) fn literal(text: String, mode: OutputMode) -> Self {
        match mode {
            OutputMode::Text => Self::Text(text),
            OutputMode::Sequence => Self::Sequence(vec![Piece::Text(text)]),
        }
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => formatter.write_str(text),
            Self::Sequence(pieces) => pieces
                .iter()
                .try_for_each(|piece| write!(formatter, "{piece}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token<'a> {
    Index(usize),
    Name(&'a str),
}

impl<'a> Token<'a> {
    fn parse(raw: &'a str) -> Option<Self> {
        if !raw.is_empty() && raw.chars().all(|ch| ch.is_ascii_digit()) {
            return raw.parse().ok().map(Self::Index);
        }
        let mut chars = raw.chars();
        let head = chars.next()?;
        let valid = (head.is_alphabetic() || head == '_')
            && chars.all(|ch| ch.is_alphanumeric() || ch == '_');
        valid.then_some(Self::Name(raw))
    }
}

/// A template split at placeholder boundaries.
#[derive(Debug, PartialEq, Eq)]
struct Scanned<'a> {
    literals: Vec<String>,
    placeholders: Vec<(&'a str, Token<'a>)>,
}

fn scan(template: &str) -> Scanned<'_> {
    let mut literals = Vec::new();
    let mut placeholders = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some((before, after)) = rest.split_once('{') {
        literal.push_str(before);

        if let Some(alias_tail) = after.strip_prefix('{') {
            if let Some((inner, tail)) = alias_tail.split_once("}}") {
                literal.push_str("{{");
                literal.push_str(inner);
                literal.push_str("}}");
                rest = tail;
                continue;
            }
            literal.push('{');
            rest = after;
            continue;
        }

        match after
            .split_once('}')
            .and_then(|(raw, tail)| Token::parse(raw).map(|token| (raw, token, tail)))
        {
            Some((raw, token, tail)) => {
                literals.push(std::mem::take(&mut literal));
                placeholders.push((raw, token));
                rest = tail;
            }
            None => {
                literal.push('{');
                rest = after;
            }
        }
    }

    literal.push_str(rest);
    literals.push(literal);
    Scanned {
        literals,
        placeholders,
    }
}

/// Number of placeholders `template` contains.
#[must_use]
pub fn placeholder_count(template: &str) -> usize {
    scan(template).placeholders.len()
}

fn lookup(token: Token<'_>, args: &Args, count: Option<f64>) -> Option<Value> {
    match token {
        Token::Index(index) => args.get_positional(index).cloned(),
        Token::Name(name) => args.get_named(name).cloned().or_else(|| {
            count
                .filter(|_| RESERVED_COUNT_NAMES.contains(&name))
                .map(Value::Number)
        }),
    }
}

/// Substitute placeholders in `template`.
///
/// `count` is the numeric selector, if any; it backs `{n}` and `{count}`
/// when `args` does not name them itself.
///
/// ```
/// use phrasebook::{Args, OutputMode, Piece, Translation, Value, interpolate};
///
/// let args = Args::named().with("name", "World");
/// let text = interpolate("Hello {name}!", &args, None, OutputMode::Text);
/// assert_eq!(text, Translation::Text(String::from("Hello World!")));
///
/// let pieces = interpolate("Hello {name}!", &args, None, OutputMode::Sequence);
/// assert_eq!(
///     pieces.into_pieces(),
///     vec![
///         Piece::Text(String::from("Hello ")),
///         Piece::Value(Value::from("World")),
///         Piece::Text(String::from("!")),
///     ]
/// );
/// ```
#[must_use]
pub fn interpolate(
    template: &str,
    args: &Args,
    count: Option<f64>,
    mode: OutputMode,
) -> Translation {
    let Scanned {
        literals,
        placeholders,
    } = scan(template);
    let mut tails = literals.into_iter();
    let head = tails.next().unwrap_or_default();

    match mode {
        OutputMode::Text => {
            let mut output = head;
            for ((raw, token), literal) in placeholders.into_iter().zip(tails) {
                match lookup(token, args, count) {
                    Some(value) => output.push_str(&value.to_string()),
                    None => push_unresolved(&mut output, raw),
                }
                output.push_str(&literal);
            }
            Translation::Text(output)
        }
        OutputMode::Sequence => {
            let mut pieces = Vec::with_capacity(placeholders.len() * 2 + 1);
            pieces.push(Piece::Text(head));
            for ((raw, token), literal) in placeholders.into_iter().zip(tails) {
                let piece = lookup(token, args, count).map_or_else(
                    || {
                        let mut text = String::new();
                        push_unresolved(&mut text, raw);
                        Piece::Text(text)
                    },
                    Piece::Value,
                );
                pieces.push(piece);
                pieces.push(Piece::Text(literal));
            }
            Translation::Sequence(pieces)
        }
    }
}

fn push_unresolved(output: &mut String, raw: &str) {
    output.push('{');
    output.push_str(raw);
    output.push('}');
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn text(input: &str) -> Piece {
        Piece::Text(input.to_owned())
    }

    #[rstest]
    #[case("Hello World")]
    #[case("")]
    #[case("Unclosed {brace")]
    #[case("Empty {} braces")]
    #[case("Spaced { name } braces")]
    fn templates_without_placeholders_pass_through(#[case] template: &str) {
        let string = interpolate(template, &Args::None, None, OutputMode::Text);
        let sequence = interpolate(template, &Args::None, None, OutputMode::Sequence);

        assert_eq!(string, Translation::Text(template.to_owned()));
        assert_eq!(sequence, Translation::Sequence(vec![text(template)]));
    }

    #[rstest]
    fn named_tokens_substitute_every_occurrence() {
        let args = Args::named().with("x", "A");
        let result = interpolate("{x} and {x}", &args, None, OutputMode::Text);
        assert_eq!(result.into_text(), "A and A");
    }

    #[rstest]
    fn positional_tokens_index_the_sequence() {
        let args = Args::positional(["first", "second"]);
        let result = interpolate("{1} then {0}", &args, None, OutputMode::Text);
        assert_eq!(result.into_text(), "second then first");
    }

    #[rstest]
    #[case::positional_token_named_args("{0}", Args::named().with("0", "zero"))]
    #[case::named_token_positional_args("{name}", Args::positional(["zero"]))]
    #[case::out_of_range("{3}", Args::positional(["zero"]))]
    #[case::absent_name("{name}", Args::None)]
    fn unresolved_tokens_stay_literal(#[case] template: &str, #[case] args: Args) {
        let result = interpolate(template, &args, None, OutputMode::Text);
        assert_eq!(result.into_text(), template);
    }

    #[rstest]
    #[case("{n} left", "3 left")]
    #[case("{count} left", "3 left")]
    fn count_is_exposed_under_reserved_names(#[case] template: &str, #[case] expected: &str) {
        let result = interpolate(template, &Args::positional(["x"]), Some(3.0), OutputMode::Text);
        assert_eq!(result.into_text(), expected);
    }

    #[rstest]
    fn explicit_count_argument_wins_over_selector() {
        let args = Args::named().with("count", "several");
        let result = interpolate("{count} items", &args, Some(3.0), OutputMode::Text);
        assert_eq!(result.into_text(), "several items");
    }

    #[rstest]
    fn alias_spans_are_not_placeholders() {
        let args = Args::named().with("support", "nope");
        let result = interpolate("Help: {{support}}", &args, None, OutputMode::Sequence);
        assert_eq!(result.into_pieces(), vec![text("Help: {{support}}")]);
    }

    #[rstest]
    fn sequence_mode_keeps_empty_edges_and_fragments() {
        #[derive(Debug)]
        struct Bold(&'static str);

        impl fmt::Display for Bold {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(formatter, "**{}**", self.0)
            }
        }

        let bold = Value::fragment(Bold("now"));
        let args = Args::named().with("when", bold.clone()).with("who", "you");
        let result = interpolate("{who}{when}", &args, None, OutputMode::Sequence);

        let pieces = result.into_pieces();
        assert_eq!(
            pieces,
            vec![
                text(""),
                Piece::Value(Value::from("you")),
                text(""),
                Piece::Value(bold),
                text(""),
            ]
        );
        assert!(
            pieces
                .get(3)
                .and_then(Piece::as_value)
                .and_then(Value::as_fragment::<Bold>)
                .is_some()
        );
    }

    #[rstest]
    #[case("Hello {name}, you have {n} new {what}.")]
    #[case("{0}{1}{2}")]
    #[case("{missing} and {name}")]
    #[case("plain")]
    fn sequence_output_matches_string_output(#[case] template: &str) {
        let args = Args::named().with("name", "Ada").with("what", "messages");
        let string = interpolate(template, &args, Some(2.0), OutputMode::Text).into_text();
        let sequence = interpolate(template, &args, Some(2.0), OutputMode::Sequence);
        let pieces = sequence.clone().into_pieces();

        assert_eq!(pieces.len(), 2 * placeholder_count(template) + 1);
        assert_eq!(sequence.into_text(), string);
    }

    #[rstest]
    #[case(5.0, "5")]
    #[case(2.5, "2.5")]
    #[case(-0.0, "0")]
    fn numbers_render_compactly(#[case] number: f64, #[case] expected: &str) {
        assert_eq!(Value::Number(number).to_string(), expected);
    }
}
