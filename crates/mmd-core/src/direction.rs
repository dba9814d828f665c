//! Graph direction and header rewriting.
//!
//! Flowchart documents open with a header such as `graph LR` or
//! `flowchart TD`. Changing the direction from the toolbar rewrites that
//! header in place; the rest of the document is left untouched.
//!
//! Built on `winnow` 0.7. Only the header line is recognised, the diagram
//! body is opaque.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use winnow::ascii::multispace1;
use winnow::combinator::alt;
use winnow::prelude::*;
use winnow::token::take_while;

/// Layout direction of a flowchart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Left to right.
    #[default]
    LR,
    /// Right to left.
    RL,
    /// Top to bottom.
    TB,
    /// Bottom to top.
    BT,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::LR, Direction::RL, Direction::TB, Direction::BT];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::LR => "LR",
            Direction::RL => "RL",
            Direction::TB => "TB",
            Direction::BT => "BT",
        }
    }

    /// Human-readable label for the direction picker.
    pub fn label(self) -> &'static str {
        match self {
            Direction::LR => "Left to Right",
            Direction::RL => "Right to Left",
            Direction::TB => "Top to Bottom",
            Direction::BT => "Bottom to Top",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown graph direction '{0}'")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LR" => Ok(Direction::LR),
            "RL" => Ok(Direction::RL),
            // `TD` is Mermaid's alias for top-down
            "TB" | "TD" => Ok(Direction::TB),
            "BT" => Ok(Direction::BT),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

// ─── Header parsing ──────────────────────────────────────────────────────

/// Byte span of a recognised header within the source.
struct Header<'a> {
    start: usize,
    end: usize,
    token: &'a str,
}

fn parse_keyword<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    alt(("graph", "flowchart")).parse_next(input)
}

fn parse_direction_token<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1..=2, ['T', 'B', 'L', 'R', 'D']).parse_next(input)
}

fn parse_header<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    parse_keyword.parse_next(input)?;
    multispace1.parse_next(input)?;
    parse_direction_token.parse_next(input)
}

fn find_header(source: &str) -> Option<Header<'_>> {
    let trimmed = source.trim_start();
    let start = source.len() - trimmed.len();
    let mut rest = trimmed;
    let token = parse_header.parse_next(&mut rest).ok()?;
    Some(Header {
        start,
        end: source.len() - rest.len(),
        token,
    })
}

/// Read the direction declared in the document header, if any.
pub fn detect_direction(source: &str) -> Option<Direction> {
    find_header(source).and_then(|h| h.token.parse().ok())
}

/// Rewrite the document header to `graph <direction>`.
///
/// Returns `None` when the document does not start with a `graph` or
/// `flowchart` header (e.g. sequence diagrams), leaving the caller to keep
/// the text as-is.
pub fn rewrite_direction(source: &str, direction: Direction) -> Option<String> {
    let header = find_header(source)?;
    let mut out = String::with_capacity(source.len() + 4);
    out.push_str(&source[..header.start]);
    out.push_str("graph ");
    out.push_str(direction.as_str());
    out.push_str(&source[header.end..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rewrites_graph_header() {
        let src = "graph LR\n  A --> B";
        assert_eq!(
            rewrite_direction(src, Direction::TB).as_deref(),
            Some("graph TB\n  A --> B")
        );
    }

    #[test]
    fn td_alias_is_replaced_whole() {
        let src = "graph TD\n  A --> B";
        assert_eq!(
            rewrite_direction(src, Direction::RL).as_deref(),
            Some("graph RL\n  A --> B")
        );
        assert_eq!(detect_direction(src), Some(Direction::TB));
    }

    #[test]
    fn flowchart_keyword_becomes_graph() {
        let src = "flowchart BT\n  A --> B";
        assert_eq!(
            rewrite_direction(src, Direction::LR).as_deref(),
            Some("graph LR\n  A --> B")
        );
    }

    #[test]
    fn leading_whitespace_is_kept() {
        let src = "\n  graph LR\nA-->B";
        assert_eq!(
            rewrite_direction(src, Direction::BT).as_deref(),
            Some("\n  graph BT\nA-->B")
        );
    }

    #[test]
    fn non_flowchart_is_left_alone() {
        let src = "sequenceDiagram\n  Alice->>Bob: Hi";
        assert_eq!(rewrite_direction(src, Direction::TB), None);
        assert_eq!(detect_direction(src), None);
    }

    #[test]
    fn header_without_direction_is_not_matched() {
        assert_eq!(rewrite_direction("graph", Direction::TB), None);
        assert_eq!(rewrite_direction("graph \n", Direction::TB), None);
    }

    #[test]
    fn direction_from_str() {
        assert_eq!("LR".parse::<Direction>(), Ok(Direction::LR));
        assert_eq!("TD".parse::<Direction>(), Ok(Direction::TB));
        assert!("XY".parse::<Direction>().is_err());
    }

    #[test]
    fn direction_serializes_as_code() {
        let json = serde_json::to_string(&Direction::BT).unwrap();
        assert_eq!(json, r#""BT""#);
    }
}
