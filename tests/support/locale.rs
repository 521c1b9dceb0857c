use std::convert::Infallible;
use std::str::FromStr;

use super::value::unquote;

/// Locale code supplied via a behaviour-driven test step.
#[derive(Clone, Debug)]
pub struct StepLocale {
    raw: String,
}

impl FromStr for StepLocale {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            raw: unquote(input).to_owned(),
        })
    }
}

impl StepLocale {
    /// Consumes the step value, yielding the locale code.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.raw
    }
}

/// Comma-separated locale list such as `"en, es, fr"`.
#[derive(Clone, Debug)]
pub struct StepLocales {
    codes: Vec<String>,
}

impl FromStr for StepLocales {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let codes = unquote(input)
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_owned)
            .collect();

        Ok(Self { codes })
    }
}

impl StepLocales {
    /// Consumes the step value, yielding the locale codes in order.
    #[must_use]
    pub fn into_inner(self) -> Vec<String> {
        self.codes
    }
}
