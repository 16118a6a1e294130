use std::fmt;

/// Lower bound of the continuous scoring domain.
pub const SCORE_MIN: f64 = 0.0;
/// Upper bound of the continuous scoring domain.
pub const SCORE_MAX: f64 = 100.0;

/// Slider anchor captions shown under the 0..100 scale, low to high.
pub const SCALE_ANCHORS: [&str; 4] = ["Not yet", "Sometimes", "Mostly", "Consistently"];

/// Returns true if `value` lies inside the scoring domain.
#[must_use]
pub fn score_in_domain(value: f64) -> bool {
    (SCORE_MIN..=SCORE_MAX).contains(&value)
}

/// Categorical progress label derived from a 0..100 score.
///
/// Boundaries are lower-inclusive on the higher bucket: exactly 75 is
/// `NailingIt`, exactly 50 is `Growing`, exactly 25 is `Learning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    NotYet,
    Learning,
    Growing,
    NailingIt,
}

impl Bucket {
    /// Buckets a score assumed normalized to 0..100.
    #[must_use]
    pub fn for_score(score: f64) -> Self {
        if score >= 75.0 {
            Bucket::NailingIt
        } else if score >= 50.0 {
            Bucket::Growing
        } else if score >= 25.0 {
            Bucket::Learning
        } else {
            Bucket::NotYet
        }
    }

    /// User-facing label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Bucket::NotYet => "Not yet",
            Bucket::Learning => "Learning",
            Bucket::Growing => "Growing",
            Bucket::NailingIt => "Nailing it",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
