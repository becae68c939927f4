//! Relationship extraction from compound text fields
//!
//! Three compound shapes live in the raw rows:
//!
//! - author lists with embedded parenthetical roles:
//!   `"Gal Anonim, Brandon Graham (Writer, Artist), Anno (Translator)"`
//! - single-quoted pseudo-JSON genre arrays: `['Fiction', 'Drama']`
//! - single-quoted pseudo-JSON star-rating count arrays, ordered 5-star
//!   down to 1-star: `['3444695', '1921313', '745221', '171994', '93557']`
//!
//! Malformed sub-values are skipped, never fatal. Skips are expressed as
//! returned outcomes so callers branch explicitly.

use tracing::warn;

/// How many genres a single book may carry (truncation policy, not an error)
pub const MAX_GENRES_PER_BOOK: usize = 3;

/// One author segment: display name plus zero or more roles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorSegment {
    pub name: String,
    pub roles: Vec<String>,
}

/// Split on commas that are not enclosed in parentheses
///
/// The role list inside `(...)` keeps its commas; everything at depth zero
/// separates authors.
pub fn split_outside_parens(input: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                segments.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&input[start..]);
    segments
}

/// Parse the raw author field into ordered (name, roles) segments
///
/// An empty segment or a segment with no name short-circuits the remaining
/// segments for this book: the field is considered malformed past that
/// point, but what was already parsed stands.
pub fn parse_author_field(field: &str) -> Vec<AuthorSegment> {
    let mut result = Vec::new();

    for segment in split_outside_parens(field) {
        if segment.is_empty() {
            break;
        }

        let (name_part, role_part) = match segment.split_once('(') {
            Some((name, roles)) => (name, Some(roles)),
            None => (segment, None),
        };

        let name = name_part.replace(')', "");
        let name = name.trim();
        if name.is_empty() {
            break;
        }

        let mut roles = Vec::new();
        if let Some(role_part) = role_part {
            let role_part = role_part.replace(')', "");
            for role in role_part.split(',') {
                let role = role.trim();
                if role.is_empty() {
                    break;
                }
                roles.push(role.to_string());
            }
        }

        result.push(AuthorSegment {
            name: name.to_string(),
            roles,
        });
    }

    result
}

/// Outcome of parsing one book's genre array
#[derive(Debug, PartialEq, Eq)]
pub enum GenreOutcome {
    /// At most [`MAX_GENRES_PER_BOOK`] genre names, source order preserved
    Genres(Vec<String>),
    /// Array was empty or unparseable; the book proceeds with no genres
    Skip,
}

/// Parse the single-quoted pseudo-JSON genre array
pub fn parse_genre_list(raw: &str, isbn: &str) -> GenreOutcome {
    let names: Vec<String> = match serde_json::from_str(&rewrite_quotes(raw)) {
        Ok(names) => names,
        Err(e) => {
            warn!("Failed parsing genres for ISBN {}: {}", isbn, e);
            return GenreOutcome::Skip;
        }
    };

    // An empty name ends the usable prefix, same as the author field
    let genres: Vec<String> = names
        .into_iter()
        .take_while(|name| !name.is_empty())
        .take(MAX_GENRES_PER_BOOK)
        .collect();

    if genres.is_empty() {
        return GenreOutcome::Skip;
    }

    GenreOutcome::Genres(genres)
}

/// Outcome of parsing one book's star-rating array
#[derive(Debug, PartialEq, Eq)]
pub enum StarOutcome {
    /// Counts reordered to 1-star..5-star (index 0 is the 1-star count)
    Counts([i64; 5]),
    /// Wrong length or a non-numeric element: all 5 rows are abandoned,
    /// never a partial set with wrong star labels
    Skip,
}

/// Parse the per-star ratings array (source order is 5-star down to 1-star)
pub fn parse_star_counts(raw: &str, isbn: &str) -> StarOutcome {
    let values: Vec<serde_json::Value> = match serde_json::from_str(&rewrite_quotes(raw)) {
        Ok(values) => values,
        Err(e) => {
            warn!("Failed parsing star ratings for ISBN {}: {}", isbn, e);
            return StarOutcome::Skip;
        }
    };

    if values.len() != 5 {
        return StarOutcome::Skip;
    }

    let mut counts = [0i64; 5];
    // Reverse while filling: source index 0 is the 5-star count
    for (i, value) in values.iter().rev().enumerate() {
        let count = match value {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        match count {
            Some(c) => counts[i] = c,
            None => {
                warn!("Non-numeric star-rating count for ISBN {}, skipping", isbn);
                return StarOutcome::Skip;
            }
        }
    }

    StarOutcome::Counts(counts)
}

/// The dataset quotes its arrays with single quotes; JSON wants double
fn rewrite_quotes(raw: &str) -> String {
    raw.replace('\'', "\"")
}
