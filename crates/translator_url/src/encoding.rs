//! Percent-encoding for generated paths and query strings.
//!
//! Route parameter values are escaped before they are substituted into a
//! path template, so a value can never add a segment the template did not
//! declare or step out of it with `.`/`..`. Only the separators and
//! sub-delimiters routes conventionally carry verbatim survive.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, CONTROLS, NON_ALPHANUMERIC, utf8_percent_encode};

/// Escaped in parameter values: everything except unreserved characters and
/// the path separators and sub-delimiters left readable in route URLs.
const PARAMETER: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/')
    .remove(b'@')
    .remove(b':')
    .remove(b';')
    .remove(b',')
    .remove(b'=')
    .remove(b'+')
    .remove(b'!')
    .remove(b'*')
    .remove(b'|');

/// Escaped in assembled paths. `%` is kept so encoded values pass through.
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'\\');

/// Escaped in query strings carried over from caller-supplied URIs.
const QUERY: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'#').add(b'<').add(b'>');

/// Encodes one route parameter value for use inside a path.
///
/// Segments consisting only of `.` or `..` are written as `%2E` / `%2E%2E`.
pub(crate) fn parameter(value: &str) -> String {
    value
        .split('/')
        .map(|segment| match segment {
            "." => Cow::Borrowed("%2E"),
            ".." => Cow::Borrowed("%2E%2E"),
            _ => Cow::from(utf8_percent_encode(segment, PARAMETER)),
        })
        .collect::<Vec<_>>()
        .join("/")
}

pub(crate) fn path(path: &str) -> Cow<'_, str> {
    utf8_percent_encode(path, PATH).into()
}

pub(crate) fn query(query: &str) -> Cow<'_, str> {
    utf8_percent_encode(query, QUERY).into()
}
