use std::fmt;

/// Ordered severity scale used by the upstream forecast.
///
/// Declaration order is the ranking, so `Ord` compares severity directly.
/// Labels outside the scale parse to `None` rather than the lowest rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::VeryLow,
        Severity::Low,
        Severity::Moderate,
        Severity::High,
        Severity::VeryHigh,
    ];

    /// Case-insensitive lookup of an upstream label
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(label))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::VeryLow => "very low",
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
            Severity::VeryHigh => "very high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
