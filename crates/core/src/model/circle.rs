use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level competency tier.
///
/// The canonical label set is fixed; free-text provider labels are matched
/// case-insensitively via [`Circle::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Circle {
    Essentials,
    Exploring,
    Supporting,
    Leading,
}

impl Circle {
    /// All circles in traversal order.
    pub const ALL: [Circle; 4] = [
        Circle::Essentials,
        Circle::Exploring,
        Circle::Supporting,
        Circle::Leading,
    ];

    /// Matches a free-text label case-insensitively against the canonical set.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "ESSENTIALS" => Some(Circle::Essentials),
            "EXPLORING" => Some(Circle::Exploring),
            "SUPPORTING" => Some(Circle::Supporting),
            "LEADING" => Some(Circle::Leading),
            _ => None,
        }
    }

    /// Canonical uppercase label, as authored content and the provider use it.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Circle::Essentials => "ESSENTIALS",
            Circle::Exploring => "EXPLORING",
            Circle::Supporting => "SUPPORTING",
            Circle::Leading => "LEADING",
        }
    }

    /// The next circle in the cycle, wrapping from `Leading` to `Essentials`.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Circle::Essentials => Circle::Exploring,
            Circle::Exploring => Circle::Supporting,
            Circle::Supporting => Circle::Leading,
            Circle::Leading => Circle::Essentials,
        }
    }
}

impl fmt::Display for Circle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Circle::parse("essentials"), Some(Circle::Essentials));
        assert_eq!(Circle::parse("  Leading "), Some(Circle::Leading));
        assert_eq!(Circle::parse("EXPLORING"), Some(Circle::Exploring));
        assert_eq!(Circle::parse("Mastering"), None);
    }

    #[test]
    fn cycle_wraps_back_to_essentials() {
        assert_eq!(Circle::Essentials.next(), Circle::Exploring);
        assert_eq!(Circle::Leading.next(), Circle::Essentials);

        let mut circle = Circle::Essentials;
        for _ in 0..4 {
            circle = circle.next();
        }
        assert_eq!(circle, Circle::Essentials);
    }

    #[test]
    fn display_matches_canonical_label() {
        assert_eq!(Circle::Supporting.to_string(), "SUPPORTING");
    }
}
