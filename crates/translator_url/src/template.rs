//! `{param}` / `{param?}` placeholder templates for route paths and domains.

use crate::error::UrlError;
use crate::parameters::RouteParameters;

#[derive(Clone, Debug, Eq, PartialEq)]
enum Piece {
    Literal(String),
    Placeholder { name: String, optional: bool },
}

/// A parsed path or domain template.
///
/// An unterminated `{` is kept as literal text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Template {
    pieces: Vec<Piece>,
}

impl Template {
    pub(crate) fn parse(input: &str) -> Self {
        let mut pieces = Vec::new();
        let mut rest = input;

        while let Some(open) = rest.find('{') {
            let (literal, tail) = rest.split_at(open);
            let Some(close) = tail.find('}') else {
                break;
            };
            if !literal.is_empty() {
                pieces.push(Piece::Literal(literal.to_owned()));
            }
            let inner = tail.get(1..close).unwrap_or_default().trim();
            let (name, optional) = match inner.strip_suffix('?') {
                Some(name) => (name, true),
                None => (inner, false),
            };
            pieces.push(Piece::Placeholder {
                name: name.to_owned(),
                optional,
            });
            rest = tail.get(close + 1..).unwrap_or_default();
        }

        if !rest.is_empty() {
            pieces.push(Piece::Literal(rest.to_owned()));
        }
        Self { pieces }
    }

    /// Placeholder names in order of appearance.
    pub(crate) fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.pieces.iter().filter_map(|piece| match piece {
            Piece::Placeholder { name, .. } => Some(name.as_str()),
            Piece::Literal(_) => None,
        })
    }

    /// Substitutes `params`, passing each value through `encode`; optional
    /// placeholders without a value render empty.
    pub(crate) fn render<F>(&self, route: &str, params: &RouteParameters, encode: F) -> Result<String, UrlError>
    where
        F: Fn(&str) -> String,
    {
        let mut rendered = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => rendered.push_str(text),
                Piece::Placeholder { name, optional } => match params.get(name) {
                    Some(value) => rendered.push_str(&encode(value)),
                    None if *optional => {}
                    None => {
                        return Err(UrlError::MissingParameter {
                            route: route.to_owned(),
                            parameter: name.clone(),
                        });
                    }
                },
            }
        }
        Ok(rendered)
    }
}
