//! Path segment normalization and URL resolution.
//!
//! Segments are stored already normalized: every segment except the final
//! one carries exactly one trailing `/`, so the accumulated path is the plain
//! concatenation of its segments.

use crate::{query::QueryValues, Result};
use std::fmt::Display;
use url::Url;

const SEPARATOR: char = '/';

/// An empty list of path parts, for verb methods called without a path.
///
/// ```
/// use rip::{Client, NO_PATH};
///
/// let client = Client::with_base_url("http://localhost/api/").delete(NO_PATH);
/// assert_eq!(client.url().unwrap().as_str(), "http://localhost/api/");
/// ```
pub const NO_PATH: [&str; 0] = [];

/// Appends the parts of one path call to `segments`.
///
/// Each part is formatted, trimmed of whitespace and leading separators, and
/// dropped if nothing remains.
pub(crate) fn extend_segments<I>(segments: &mut Vec<String>, parts: I)
where
    I: IntoIterator,
    I::Item: Display,
{
    let incoming: Vec<String> = parts
        .into_iter()
        .map(|part| {
            part.to_string()
                .trim()
                .trim_start_matches(SEPARATOR)
                .trim_start()
                .to_string()
        })
        .filter(|part| !part.is_empty())
        .collect();

    if incoming.is_empty() {
        return;
    }

    if let Some(last) = segments.last_mut() {
        *last = with_trailing_separator(last);
    }

    let count = incoming.len();
    for (index, part) in incoming.into_iter().enumerate() {
        if index + 1 < count {
            segments.push(with_trailing_separator(&part));
        } else {
            segments.push(part);
        }
    }
}

/// Resolves the accumulated segments and query against `base`.
pub(crate) fn resolve(
    base: &Url,
    segments: &[String],
    append_slash: bool,
    query: &QueryValues,
) -> Result<Url> {
    let mut base = base.clone();
    let mut relative = segments.concat();

    // once any segment exists, the base acts as a directory
    if !segments.is_empty() {
        set_directory_path(&mut base);
    }

    if append_slash {
        if relative.is_empty() {
            set_directory_path(&mut base);
        } else {
            relative = with_trailing_separator(&relative);
        }
    }

    // a colon in the first segment would otherwise read as a scheme
    if first_segment_has_colon(&relative) {
        relative.insert_str(0, "./");
    }

    let mut url = if relative.is_empty() {
        base
    } else {
        base.join(&relative)?
    };

    url.set_query(None);
    if !query.is_empty() {
        url.set_query(Some(&query.encode()));
    }

    Ok(url)
}

fn with_trailing_separator(segment: &str) -> String {
    let mut result = segment.trim_end_matches(SEPARATOR).to_string();
    result.push(SEPARATOR);
    result
}

fn first_segment_has_colon(relative: &str) -> bool {
    relative
        .split(|c| c == SEPARATOR || c == '?' || c == '#')
        .next()
        .is_some_and(|segment| segment.contains(':'))
}

fn set_directory_path(url: &mut Url) {
    let path = with_trailing_separator(url.path());
    url.set_path(&path);
}
