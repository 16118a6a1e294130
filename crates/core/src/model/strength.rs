use std::fmt;

/// Sentinel rank for strengths outside the canonical vocabulary.
///
/// Blocks carrying an unrecognized strength sort after all ranked blocks.
pub const UNRANKED: u32 = 9_999;

/// Higher-order competency grouping within a circle.
///
/// The four canonical strengths carry a fixed display rank. Labels that do not
/// match the canonical vocabulary are preserved as `Other` with a title-cased
/// display value rather than rejected, so newly authored content degrades to
/// a readable label instead of failing the whole load.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Strength {
    CriticalThinking,
    Creativity,
    Collaboration,
    Communication,
    Other(String),
}

impl Strength {
    /// Normalizes a free-text label.
    ///
    /// Canonical labels match case-insensitively; anything else becomes
    /// `Other` with the raw text title-cased.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "critical thinking" => Strength::CriticalThinking,
            "creativity" => Strength::Creativity,
            "collaboration" => Strength::Collaboration,
            "communication" => Strength::Communication,
            _ => Strength::Other(title_case(label.trim())),
        }
    }

    /// Display name for the strength.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Strength::CriticalThinking => "Critical Thinking",
            Strength::Creativity => "Creativity",
            Strength::Collaboration => "Collaboration",
            Strength::Communication => "Communication",
            Strength::Other(name) => name,
        }
    }

    /// Canonical display rank (1..=4); `Other` strengths are [`UNRANKED`].
    #[must_use]
    pub fn rank(&self) -> u32 {
        match self {
            Strength::CriticalThinking => 1,
            Strength::Creativity => 2,
            Strength::Collaboration => 3,
            Strength::Communication => 4,
            Strength::Other(_) => UNRANKED,
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for (i, word) in raw.split_whitespace().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.extend(chars.flat_map(char::to_lowercase));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_labels_match_case_insensitively() {
        assert_eq!(Strength::parse("critical thinking"), Strength::CriticalThinking);
        assert_eq!(Strength::parse("CREATIVITY"), Strength::Creativity);
        assert_eq!(Strength::parse(" Collaboration "), Strength::Collaboration);
        assert_eq!(Strength::parse("Communication"), Strength::Communication);
    }

    #[test]
    fn unknown_labels_become_title_cased_other() {
        let strength = Strength::parse("growth MINDSET");
        assert_eq!(strength, Strength::Other("Growth Mindset".to_string()));
        assert_eq!(strength.name(), "Growth Mindset");
    }

    #[test]
    fn other_strengths_rank_last() {
        assert_eq!(Strength::CriticalThinking.rank(), 1);
        assert_eq!(Strength::Communication.rank(), 4);
        assert!(Strength::parse("Resilience").rank() > Strength::Communication.rank());
    }
}
