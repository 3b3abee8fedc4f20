//! The fixed set of expense categories.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// The closed list of categories an expense can belong to.
///
/// The AI extraction service suggests categories as plain strings and may
/// return values outside this set; callers parse with [Category::from_str]
/// and fall back to a default when the suggestion is unrecognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Groceries, restaurants, coffee.
    Food,
    /// Public transport, fuel, ride shares.
    Transport,
    /// Clothing, gadgets, general retail.
    Shopping,
    /// Power, water, internet, phone.
    Utilities,
    /// Doctors, pharmacies, insurance.
    Health,
    /// Movies, games, going out.
    Entertainment,
    /// Everything else.
    Other,
}

/// All categories in display order.
pub const CATEGORIES: [Category; 7] = [
    Category::Food,
    Category::Transport,
    Category::Shopping,
    Category::Utilities,
    Category::Health,
    Category::Entertainment,
    Category::Other,
];

impl Category {
    /// The category name as it is displayed, stored and sent to the model.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Utilities => "Utilities",
            Category::Health => "Health",
            Category::Entertainment => "Entertainment",
            Category::Other => "Other",
        }
    }

    /// The category names joined with ", ", for embedding in the extraction
    /// prompt.
    pub fn comma_separated_list() -> String {
        CATEGORIES
            .iter()
            .map(Category::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error returned when a string does not name one of the fixed
/// categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(
    /// The name that failed to parse.
    pub String,
);

impl Display for UnknownCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" is not a known category", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Food" => Ok(Category::Food),
            "Transport" => Ok(Category::Transport),
            "Shopping" => Ok(Category::Shopping),
            "Utilities" => Ok(Category::Utilities),
            "Health" => Ok(Category::Health),
            "Entertainment" => Ok(Category::Entertainment),
            "Other" => Ok(Category::Other),
            other => Err(UnknownCategory(other.to_owned())),
        }
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        // Rows written before a category was renamed fall back to Other
        // rather than poisoning every read of the table.
        value
            .as_str()
            .map(|text| text.parse().unwrap_or(Category::Other))
    }
}
