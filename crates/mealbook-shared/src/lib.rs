use std::fmt;

use chrono::{
  DateTime,
  Utc
};
use serde::{
  Deserialize,
  Serialize
};
use uuid::Uuid;

pub type DietaryTagId = u32;

/// Sentinel select value meaning "no category constraint".
pub const ALL_CATEGORIES: &str = "all";

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Hash,
)]
pub enum MealCategory {
  #[serde(rename = "Best for Breakfast")]
  BestForBreakfast,
  #[serde(rename = "Best for Lunch")]
  BestForLunch,
  #[serde(rename = "Best for Dinner")]
  BestForDinner,
  #[serde(rename = "Snack")]
  Snack
}

impl MealCategory {
  pub const ALL: [MealCategory; 4] = [
    MealCategory::BestForBreakfast,
    MealCategory::BestForLunch,
    MealCategory::BestForDinner,
    MealCategory::Snack
  ];

  pub fn label(self) -> &'static str {
    match self {
      | Self::BestForBreakfast => {
        "Best for Breakfast"
      }
      | Self::BestForLunch => {
        "Best for Lunch"
      }
      | Self::BestForDinner => {
        "Best for Dinner"
      }
      | Self::Snack => "Snack"
    }
  }

  pub fn key(self) -> &'static str {
    match self {
      | Self::BestForBreakfast => {
        "breakfast"
      }
      | Self::BestForLunch => "lunch",
      | Self::BestForDinner => "dinner",
      | Self::Snack => "snack"
    }
  }

  /// Accepts either the display label or the short key, ignoring case.
  pub fn from_label(
    value: &str
  ) -> Option<Self> {
    let value = value.trim();
    Self::ALL.into_iter().find(
      |category| {
        category
          .label()
          .eq_ignore_ascii_case(value)
          || category
            .key()
            .eq_ignore_ascii_case(value)
      }
    )
  }
}

impl fmt::Display for MealCategory {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// A category pick as it comes out of the category control.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum CategoryChoice {
  All,
  Only(MealCategory)
}

impl CategoryChoice {
  pub fn parse(
    value: &str
  ) -> Option<Self> {
    if value
      .trim()
      .eq_ignore_ascii_case(
        ALL_CATEGORIES
      )
    {
      return Some(Self::All);
    }
    MealCategory::from_label(value)
      .map(Self::Only)
  }

  pub fn as_value(
    &self
  ) -> &'static str {
    match self {
      | Self::All => ALL_CATEGORIES,
      | Self::Only(category) => {
        category.label()
      }
    }
  }
}

impl From<Option<MealCategory>>
  for CategoryChoice
{
  fn from(
    value: Option<MealCategory>
  ) -> Self {
    value.map_or(Self::All, Self::Only)
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(from = "String", into = "String")]
pub enum SortKey {
  Name,
  CreatedAt,
  Price,
  Other(String)
}

impl SortKey {
  pub fn as_str(&self) -> &str {
    match self {
      | Self::Name => "name",
      | Self::CreatedAt => "created_at",
      | Self::Price => "price",
      | Self::Other(raw) => raw
    }
  }

  pub fn label(&self) -> &str {
    match self {
      | Self::Name => "Name",
      | Self::CreatedAt => "Newest",
      | Self::Price => "Price",
      | Self::Other(raw) => raw
    }
  }
}

impl From<String> for SortKey {
  fn from(value: String) -> Self {
    match value.as_str() {
      | "name" => Self::Name,
      | "created_at" => Self::CreatedAt,
      | "price" => Self::Price,
      | _ => Self::Other(value)
    }
  }
}

impl From<&str> for SortKey {
  fn from(value: &str) -> Self {
    Self::from(value.to_string())
  }
}

impl From<SortKey> for String {
  fn from(value: SortKey) -> Self {
    match value {
      | SortKey::Other(raw) => raw,
      | known => {
        known.as_str().to_string()
      }
    }
  }
}

impl fmt::Display for SortKey {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
)]
#[serde(from = "String", into = "String")]
pub enum SortDirection {
  Asc,
  #[default]
  Desc,
  Other(String)
}

impl SortDirection {
  pub fn as_str(&self) -> &str {
    match self {
      | Self::Asc => "asc",
      | Self::Desc => "desc",
      | Self::Other(raw) => raw
    }
  }

  /// `Asc` flips to `Desc`; everything else flips to `Asc`.
  pub fn flipped(&self) -> Self {
    match self {
      | Self::Asc => Self::Desc,
      | _ => Self::Asc
    }
  }
}

impl From<String> for SortDirection {
  fn from(value: String) -> Self {
    match value.as_str() {
      | "asc" => Self::Asc,
      | "desc" => Self::Desc,
      | _ => Self::Other(value)
    }
  }
}

impl From<&str> for SortDirection {
  fn from(value: &str) -> Self {
    Self::from(value.to_string())
  }
}

impl From<SortDirection> for String {
  fn from(value: SortDirection) -> Self {
    match value {
      | SortDirection::Other(raw) => raw,
      | known => {
        known.as_str().to_string()
      }
    }
  }
}

impl fmt::Display for SortDirection {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The committed filter object. An absent field applies no constraint.
#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct FilterState {
  #[serde(
    skip_serializing_if = "Option::is_none"
  )]
  pub search:         Option<String>,
  #[serde(
    skip_serializing_if = "Option::is_none"
  )]
  pub category:       Option<MealCategory>,
  #[serde(
    skip_serializing_if = "Option::is_none"
  )]
  pub sort_by:        Option<SortKey>,
  #[serde(
    skip_serializing_if = "Option::is_none"
  )]
  pub sort_direction: Option<SortDirection>,
  #[serde(
    skip_serializing_if = "Option::is_none"
  )]
  pub dietary_tags:   Option<Vec<DietaryTagId>>
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct DietaryTag {
  pub id:    DietaryTagId,
  pub label: String
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct MealDto {
  pub id:           Uuid,
  pub name:         String,
  #[serde(default)]
  pub description:  String,
  #[serde(default)]
  pub category:     Option<MealCategory>,
  #[serde(default)]
  pub price_cents:  u32,
  pub created_at:   DateTime<Utc>,
  #[serde(default)]
  pub dietary_tags: Vec<DietaryTagId>,
  #[serde(default)]
  pub archived:     bool
}
