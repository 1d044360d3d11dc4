use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifies one submission; later submissions always carry a larger token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestToken(pub u64);

impl RequestToken {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownCategory {
    Basic,
    Edge,
    Type,
    Branch,
    Error,
}

impl BreakdownCategory {
    pub const ALL: [BreakdownCategory; 5] = [
        BreakdownCategory::Basic,
        BreakdownCategory::Edge,
        BreakdownCategory::Type,
        BreakdownCategory::Branch,
        BreakdownCategory::Error,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BreakdownCategory::Basic => "basic",
            BreakdownCategory::Edge => "edge cases",
            BreakdownCategory::Type => "type checks",
            BreakdownCategory::Branch => "branches",
            BreakdownCategory::Error => "error handling",
        }
    }
}

/// Per-category test counts as reported by the service. Missing keys count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakdown {
    #[serde(deserialize_with = "deserialize_count")]
    pub basic: u32,
    #[serde(deserialize_with = "deserialize_count")]
    pub edge: u32,
    #[serde(rename = "type", deserialize_with = "deserialize_count")]
    pub type_checks: u32,
    #[serde(deserialize_with = "deserialize_count")]
    pub branch: u32,
    #[serde(deserialize_with = "deserialize_count")]
    pub error: u32,
}

/// Reads a JSON number as a count: floats are rounded, negatives and `null` read as 0.
pub fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_optional_count(deserializer)?.unwrap_or(0))
}

/// Like [`deserialize_count`] but keeps `null` distinguishable from zero.
pub fn deserialize_optional_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.map(|value| {
        if value.is_finite() {
            value.round().clamp(0.0, f64::from(u32::MAX)) as u32
        } else {
            0
        }
    }))
}

impl Breakdown {
    pub fn count(&self, category: BreakdownCategory) -> u32 {
        match category {
            BreakdownCategory::Basic => self.basic,
            BreakdownCategory::Edge => self.edge,
            BreakdownCategory::Type => self.type_checks,
            BreakdownCategory::Branch => self.branch,
            BreakdownCategory::Error => self.error,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (BreakdownCategory, u32)> + '_ {
        BreakdownCategory::ALL
            .into_iter()
            .map(|category| (category, self.count(category)))
    }
}

/// Coverage as shown to the user: a whole percentage in `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoveragePercent(u8);

impl CoveragePercent {
    /// Rounds a raw service estimate. Absent or non-finite estimates read as 0.
    pub fn from_estimate(estimate: Option<f64>) -> Self {
        let raw = estimate.filter(|value| value.is_finite()).unwrap_or(0.0);
        Self(raw.round().clamp(0.0, 100.0) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for CoveragePercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
