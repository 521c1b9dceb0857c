//! Count-based text selection for pluralised translations.
//!
//! A stored text such as `{0} No apples|{1} One apple|[2,*] :count apples`
//! is decoded into an ordered [`IntervalRules`] list; [`IntervalRules::search`]
//! returns the text of the first rule whose interval contains the count.
//!
//! Supported rule prefixes:
//!
//! - `{0,3,5} text`: an explicit set of values.
//! - `[a,b] text`: a range; a bracket facing the values is inclusive, a
//!   bracket facing away (`]a,b[`) is exclusive. `*`, `Inf`, `+Inf`, and
//!   `-Inf` leave an end unbounded.
//! - `n: text` and `a,b: text`: shorthand for `{n}` and `[a,b]`.
//! - Plain text without a prefix is positional: one plain rule matches any
//!   count, two plain rules read as singular (`1`) then plural, and longer
//!   lists match `0`, `1`, ... with the last rule open-ended.

use crate::error::IntervalError;

/// One end of a numeric range.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Bound {
    /// No limit on this side.
    Unbounded,
    /// The value itself belongs to the range.
    Inclusive(i64),
    /// The value itself is excluded from the range.
    Exclusive(i64),
}

/// Set of counts a rule applies to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Interval {
    /// Explicit list of values.
    Set(Vec<i64>),
    /// Range between two bounds.
    Range {
        /// Lower end.
        lower: Bound,
        /// Upper end.
        upper: Bound,
    },
}

impl Interval {
    /// Whether `count` falls inside the interval.
    #[must_use]
    pub fn contains(&self, count: i64) -> bool {
        match self {
            Self::Set(values) => values.contains(&count),
            Self::Range { lower, upper } => {
                let above = match *lower {
                    Bound::Unbounded => true,
                    Bound::Inclusive(value) => count >= value,
                    Bound::Exclusive(value) => count > value,
                };
                let below = match *upper {
                    Bound::Unbounded => true,
                    Bound::Inclusive(value) => count <= value,
                    Bound::Exclusive(value) => count < value,
                };
                above && below
            }
        }
    }

    const fn at_least(lower: i64) -> Self {
        Self::Range {
            lower: Bound::Inclusive(lower),
            upper: Bound::Unbounded,
        }
    }

    fn exactly(value: i64) -> Self {
        Self::Set(vec![value])
    }

    const fn any() -> Self {
        Self::Range {
            lower: Bound::Unbounded,
            upper: Bound::Unbounded,
        }
    }
}

/// A decoded rule pairing an interval with its text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IntervalRule {
    interval: Interval,
    text: String,
}

impl IntervalRule {
    /// Creates a rule selecting `text` for counts inside `interval`.
    #[must_use]
    pub fn new(interval: Interval, text: impl Into<String>) -> Self {
        Self {
            interval,
            text: text.into(),
        }
    }

    /// Returns the rule's interval.
    #[must_use]
    pub const fn interval(&self) -> &Interval {
        &self.interval
    }

    /// Returns the rule's text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Ordered rule list decoded from a `|`-delimited string.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IntervalRules {
    rules: Vec<IntervalRule>,
}

impl IntervalRules {
    /// Builds a rule list from already decoded rules.
    #[must_use]
    pub const fn new(rules: Vec<IntervalRule>) -> Self {
        Self { rules }
    }

    /// Decodes a `|`-delimited rule string.
    ///
    /// ```
    /// use translator_common::IntervalRules;
    ///
    /// let rules = IntervalRules::parse("0:none|1:one|[2,*]:many").expect("rules decode");
    /// assert_eq!(rules.search(0), Some("none"));
    /// assert_eq!(rules.search(1), Some("one"));
    /// assert_eq!(rules.search(5), Some("many"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`IntervalError::MalformedRule`] when a bracketed or braced
    /// prefix cannot be decoded.
    pub fn parse(input: &str) -> Result<Self, IntervalError> {
        let mut rules = Vec::new();
        let mut plain = Vec::new();

        for segment in input.split('|').map(str::trim) {
            match decode_segment(segment)? {
                Some(rule) => rules.push(rule),
                None => {
                    plain.push(rules.len());
                    rules.push(IntervalRule::new(Interval::any(), segment));
                }
            }
        }

        assign_positions(&mut rules, &plain);
        Ok(Self { rules })
    }

    /// Returns the text of the first rule containing `count`.
    #[must_use]
    pub fn search(&self, count: i64) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.interval.contains(count))
            .map(IntervalRule::text)
    }

    /// Returns the decoded rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[IntervalRule] {
        &self.rules
    }
}

fn assign_positions(rules: &mut [IntervalRule], plain: &[usize]) {
    let total = plain.len();
    for (position, index) in plain.iter().enumerate() {
        let Some(rule) = rules.get_mut(*index) else {
            continue;
        };
        let ordinal = i64::try_from(position).unwrap_or(i64::MAX);
        rule.interval = match total {
            1 => Interval::any(),
            2 if position == 0 => Interval::exactly(1),
            2 => Interval::any(),
            _ if position + 1 == total => Interval::at_least(ordinal),
            _ => Interval::exactly(ordinal),
        };
    }
}

fn decode_segment(segment: &str) -> Result<Option<IntervalRule>, IntervalError> {
    if let Some(rest) = segment.strip_prefix('{') {
        let (inner, text) = rest
            .split_once('}')
            .ok_or_else(|| malformed(segment, "missing closing `}`"))?;
        let values = inner
            .split(',')
            .map(|value| parse_value(segment, value))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Some(IntervalRule::new(Interval::Set(values), rule_text(text))));
    }

    if let Some(rest) = segment.strip_prefix(['[', ']']) {
        let lower_inclusive = segment.starts_with('[');
        let close = rest
            .find(['[', ']'])
            .ok_or_else(|| malformed(segment, "missing closing bracket"))?;
        let (inner, tail) = rest.split_at(close);
        let upper_inclusive = tail.starts_with(']');
        let text = tail.get(1..).unwrap_or_default();
        let (lower, upper) = inner
            .split_once(',')
            .ok_or_else(|| malformed(segment, "ranges need a lower and an upper bound"))?;
        let interval = Interval::Range {
            lower: parse_bound(segment, lower, lower_inclusive)?,
            upper: parse_bound(segment, upper, upper_inclusive)?,
        };
        return Ok(Some(IntervalRule::new(interval, rule_text(text))));
    }

    Ok(decode_shorthand(segment))
}

/// Text after a braced or bracketed prefix; a `:` directly after the prefix
/// is a separator, not part of the text.
fn rule_text(raw: &str) -> &str {
    raw.strip_prefix(':').unwrap_or(raw).trim()
}

fn decode_shorthand(segment: &str) -> Option<IntervalRule> {
    let (head, text) = segment.split_once(':')?;
    let pieces: Vec<&str> = head.split(',').map(str::trim).collect();
    let interval = match pieces.as_slice() {
        [single] if is_unbounded(single) => Interval::any(),
        [single] => Interval::exactly(single.parse().ok()?),
        [lower, upper] => Interval::Range {
            lower: shorthand_bound(lower)?,
            upper: shorthand_bound(upper)?,
        },
        _ => return None,
    };
    Some(IntervalRule::new(interval, text.trim()))
}

fn shorthand_bound(raw: &str) -> Option<Bound> {
    if is_unbounded(raw) {
        return Some(Bound::Unbounded);
    }
    raw.parse().ok().map(Bound::Inclusive)
}

fn parse_bound(segment: &str, raw: &str, inclusive: bool) -> Result<Bound, IntervalError> {
    let value = raw.trim();
    if is_unbounded(value) {
        return Ok(Bound::Unbounded);
    }
    let number = parse_value(segment, value)?;
    Ok(if inclusive {
        Bound::Inclusive(number)
    } else {
        Bound::Exclusive(number)
    })
}

fn parse_value(segment: &str, raw: &str) -> Result<i64, IntervalError> {
    raw.trim()
        .parse()
        .map_err(|_| malformed(segment, &format!("`{}` is not a whole number", raw.trim())))
}

fn is_unbounded(raw: &str) -> bool {
    matches!(raw.trim(), "*" | "-*" | "+*" | "Inf" | "+Inf" | "-Inf" | "inf" | "-inf")
}

fn malformed(segment: &str, reason: &str) -> IntervalError {
    IntervalError::MalformedRule {
        rule: segment.to_owned(),
        reason: reason.to_owned(),
    }
}
