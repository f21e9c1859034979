//! Listing - Search, Facet Filters and Sorting
//!
//! One list pipeline for every entity. A record exposes its searchable
//! text, its facet values and its sort keys through [`Listable`];
//! [`ListQuery`] does the rest.

mod entities;
mod query;

pub use query::*;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::error::{Error, Result};

/// A discrete field a list can be narrowed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetKind {
    Status,
    Type,
    Priority,
    Severity,
    Category,
    /// `read` / `unread`
    Read,
    Role,
}

impl FacetKind {
    pub fn name(&self) -> &'static str {
        match self {
            FacetKind::Status => "status",
            FacetKind::Type => "type",
            FacetKind::Priority => "priority",
            FacetKind::Severity => "severity",
            FacetKind::Category => "category",
            FacetKind::Read => "read",
            FacetKind::Role => "role",
        }
    }
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FacetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "status" => Ok(FacetKind::Status),
            "type" => Ok(FacetKind::Type),
            "priority" => Ok(FacetKind::Priority),
            "severity" => Ok(FacetKind::Severity),
            "category" => Ok(FacetKind::Category),
            "read" => Ok(FacetKind::Read),
            "role" => Ok(FacetKind::Role),
            other => Err(Error::Invalid {
                message: format!("unknown facet '{other}'"),
            }),
        }
    }
}

/// Field a list is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    Name,
    Status,
    Date,
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "status" => Ok(SortKey::Status),
            "date" => Ok(SortKey::Date),
            other => Err(Error::Invalid {
                message: format!("unknown sort key '{other}'"),
            }),
        }
    }
}

/// A record's value for one sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortValue {
    Text(String),
    Date(NaiveDateTime),
    Missing,
}

impl SortValue {
    pub fn text(s: impl AsRef<str>) -> Self {
        SortValue::Text(s.as_ref().to_lowercase())
    }

    pub fn date(dt: Option<NaiveDateTime>) -> Self {
        dt.map_or(SortValue::Missing, SortValue::Date)
    }

    /// Compare two values in the requested direction; `Missing` always last
    pub fn compare(&self, other: &Self, descending: bool) -> Ordering {
        let ord = match (self, other) {
            (SortValue::Missing, SortValue::Missing) => return Ordering::Equal,
            (SortValue::Missing, _) => return Ordering::Greater,
            (_, SortValue::Missing) => return Ordering::Less,
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Date(a), SortValue::Date(b)) => a.cmp(b),
            // Mixed kinds never happen for one key; dates first
            (SortValue::Date(_), SortValue::Text(_)) => Ordering::Less,
            (SortValue::Text(_), SortValue::Date(_)) => Ordering::Greater,
        };
        if descending { ord.reverse() } else { ord }
    }
}

/// A record that can be shown in a filtered list
pub trait Listable {
    /// Fields the free-text search looks at
    fn search_text(&self) -> Vec<&str>;

    /// Value for a facet, `None` when the record does not carry it
    fn facet(&self, kind: FacetKind) -> Option<String>;

    fn sort_value(&self, key: SortKey) -> SortValue;
}
