//! URL templates with `{name}` placeholders.
//!
//! Templates are compiled once into literal and placeholder segments. A
//! placeholder is a `{` followed by one or more ASCII word characters and a
//! closing `}`; any other brace is kept literally.

use std::fmt;

use crate::{TilesError, TilesResult};

pub const TILE_MATRIX: &str = "tileMatrix";
pub const TILE_ROW: &str = "tileRow";
pub const TILE_COL: &str = "tileCol";

/// Placeholders filled from the tile coordinate.
pub const TILE_PLACEHOLDERS: &[&str] = &[TILE_MATRIX, TILE_ROW, TILE_COL];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A compiled URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl UrlTemplate {
    pub fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let name_len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());

            if name_len > 0 && after[name_len..].starts_with('}') {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder(after[..name_len].to_string()));
                rest = &after[name_len + 1..];
            } else {
                literal.push('{');
                rest = after;
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self {
            source: template.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Placeholder names in order of appearance (duplicates included).
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Check that every placeholder is satisfiable.
    pub fn validate<F>(&self, mut is_known: F) -> TilesResult<()>
    where
        F: FnMut(&str) -> bool,
    {
        match self.placeholders().find(|name| !is_known(name)) {
            Some(name) => Err(TilesError::UnresolvedPlaceholder(name.to_string())),
            None => Ok(()),
        }
    }

    /// Substitute every placeholder with the value returned by `value`.
    pub fn expand<F>(&self, mut value: F) -> TilesResult<String>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut out = String::with_capacity(self.source.len() + 16);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => match value(name) {
                    Some(v) => out.push_str(&v),
                    None => return Err(TilesError::UnresolvedPlaceholder(name.clone())),
                },
            }
        }
        Ok(out)
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
