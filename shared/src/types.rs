//! Common types used across the inventory tracker

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Lobster size grade
///
/// `U` through `E` are the storage grades. `M` is only used when grading an
/// offload at intake and never appears in tank stock.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SizeCategory {
    U,
    A,
    B,
    C,
    D,
    E,
    M,
}

impl SizeCategory {
    /// Grades that can be held in a tank, in report order
    pub const STORAGE: [SizeCategory; 6] = [
        SizeCategory::U,
        SizeCategory::A,
        SizeCategory::B,
        SizeCategory::C,
        SizeCategory::D,
        SizeCategory::E,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeCategory::U => "U",
            SizeCategory::A => "A",
            SizeCategory::B => "B",
            SizeCategory::C => "C",
            SizeCategory::D => "D",
            SizeCategory::E => "E",
            SizeCategory::M => "M",
        }
    }

    /// Position of this grade in a [`SizeSummary`], `None` for intake-only grades
    pub fn storage_index(self) -> Option<usize> {
        match self {
            SizeCategory::U => Some(0),
            SizeCategory::A => Some(1),
            SizeCategory::B => Some(2),
            SizeCategory::C => Some(3),
            SizeCategory::D => Some(4),
            SizeCategory::E => Some(5),
            SizeCategory::M => None,
        }
    }

    pub fn is_storage(self) -> bool {
        self.storage_index().is_some()
    }
}

impl fmt::Display for SizeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised size letter
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown size category: {0}")]
pub struct UnknownSizeCategory(pub String);

impl FromStr for SizeCategory {
    type Err = UnknownSizeCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "U" => Ok(SizeCategory::U),
            "A" => Ok(SizeCategory::A),
            "B" => Ok(SizeCategory::B),
            "C" => Ok(SizeCategory::C),
            "D" => Ok(SizeCategory::D),
            "E" => Ok(SizeCategory::E),
            "M" => Ok(SizeCategory::M),
            _ => Err(UnknownSizeCategory(s.to_string())),
        }
    }
}

/// Deserialize an optional size letter, mapping blanks and unknown letters to `None`
///
/// Backend records occasionally carry an empty or misspelt size; those rows
/// still load and simply contribute to no bucket.
pub fn deserialize_size_lenient<'de, D>(deserializer: D) -> Result<Option<SizeCategory>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

/// Weight per storage grade
///
/// The total is always derived from the buckets, so it can never disagree
/// with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "SizeSummaryRepr", into = "SizeSummaryRepr")]
pub struct SizeSummary {
    buckets: [Decimal; 6],
}

impl SizeSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add weight to a grade. Intake-only grades, missing grades and
    /// non-positive weights are ignored.
    pub fn add(&mut self, size: Option<SizeCategory>, weight_kg: Decimal) {
        if weight_kg <= Decimal::ZERO {
            return;
        }
        if let Some(index) = size.and_then(SizeCategory::storage_index) {
            self.buckets[index] += weight_kg;
        }
    }

    pub fn get(&self, size: SizeCategory) -> Decimal {
        size.storage_index()
            .map(|index| self.buckets[index])
            .unwrap_or(Decimal::ZERO)
    }

    pub fn total_kg(&self) -> Decimal {
        self.buckets.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SizeCategory, Decimal)> + '_ {
        SizeCategory::STORAGE
            .iter()
            .copied()
            .zip(self.buckets.iter().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|b| b.is_zero())
    }
}

/// Wire shape of [`SizeSummary`]: `{ sizeU, sizeA, ..., totalKg }`
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SizeSummaryRepr {
    #[serde(default)]
    size_u: Decimal,
    #[serde(default)]
    size_a: Decimal,
    #[serde(default)]
    size_b: Decimal,
    #[serde(default)]
    size_c: Decimal,
    #[serde(default)]
    size_d: Decimal,
    #[serde(default)]
    size_e: Decimal,
    #[serde(default)]
    total_kg: Decimal,
}

impl From<SizeSummaryRepr> for SizeSummary {
    fn from(repr: SizeSummaryRepr) -> Self {
        // totalKg on the wire is ignored and recomputed from the buckets
        let buckets = [
            repr.size_u,
            repr.size_a,
            repr.size_b,
            repr.size_c,
            repr.size_d,
            repr.size_e,
        ]
        .map(|b| b.max(Decimal::ZERO));
        Self { buckets }
    }
}

impl From<SizeSummary> for SizeSummaryRepr {
    fn from(summary: SizeSummary) -> Self {
        let [size_u, size_a, size_b, size_c, size_d, size_e] = summary.buckets;
        Self {
            size_u,
            size_a,
            size_b,
            size_c,
            size_d,
            size_e,
            total_kg: summary.total_kg(),
        }
    }
}

/// Format a weight for display with two decimal places
pub fn format_weight_kg(weight_kg: Decimal) -> String {
    let mut rounded = weight_kg.round_dp(2);
    rounded.rescale(2);
    rounded.to_string()
}

/// Pagination parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

/// Paginated response envelope: `{ data: [...], meta: { total } }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub total: u64,
}

/// A collection response, either paginated or a flat array
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Page(PaginatedResponse<T>),
    Flat(Vec<T>),
}

impl<T> ListResponse<T> {
    /// Convert into the paginated shape; a flat array is a single complete page
    pub fn into_page(self) -> PaginatedResponse<T> {
        match self {
            ListResponse::Page(page) => page,
            ListResponse::Flat(data) => {
                let total = data.len() as u64;
                PaginatedResponse {
                    data,
                    meta: PaginationMeta { total },
                }
            }
        }
    }
}
