use std::convert::Infallible;
use std::str::FromStr;

/// Strips surrounding whitespace and one layer of quotes.
#[must_use]
pub fn unquote(input: &str) -> &str {
    input
        .trim()
        .trim_matches(|candidate| matches!(candidate, '"' | '\''))
}

/// Free-form quoted text supplied via a behaviour-driven test step.
#[derive(Clone, Debug)]
pub struct StepText(String);

impl FromStr for StepText {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Ok(Self(unquote(input).to_owned()))
    }
}

impl AsRef<str> for StepText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl StepText {
    /// Consumes the step value, yielding the unquoted text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}
