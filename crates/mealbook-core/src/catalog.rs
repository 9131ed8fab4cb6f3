use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use anyhow::Context;
use mealbook_shared::{
  DietaryTag,
  DietaryTagId,
  FilterState,
  MealDto,
  SortDirection,
  SortKey
};
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  info
};

use crate::filter::effective_sort;

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct Catalog {
  #[serde(default)]
  pub dietary_tags: Vec<DietaryTag>,
  #[serde(default)]
  pub meals:        Vec<MealDto>
}

impl Catalog {
  pub fn from_json_str(
    raw: &str
  ) -> anyhow::Result<Self> {
    let catalog: Catalog =
      serde_json::from_str(raw).context(
        "failed to parse meal catalog"
      )?;
    debug!(
      meals = catalog.meals.len(),
      tags = catalog.dietary_tags.len(),
      "parsed meal catalog"
    );
    Ok(catalog)
  }

  #[tracing::instrument(skip_all, fields(path = %path.display()))]
  pub fn load(
    path: &Path
  ) -> anyhow::Result<Self> {
    let raw = fs::read_to_string(path)
      .with_context(|| {
        format!(
          "failed to read catalog {}",
          path.display()
        )
      })?;
    let catalog =
      Self::from_json_str(&raw)
        .with_context(|| {
          format!(
            "invalid catalog {}",
            path.display()
          )
        })?;
    info!(
      meals = catalog.meals.len(),
      "loaded meal catalog"
    );
    Ok(catalog)
  }

  pub fn tag_label(
    &self,
    id: DietaryTagId
  ) -> Option<&str> {
    self
      .dietary_tags
      .iter()
      .find(|tag| tag.id == id)
      .map(|tag| tag.label.as_str())
  }
}

/// Meals matching `filters` in the requested view, sorted.
///
/// A meal matches when its archived flag equals `archived_view`, its name or
/// description contains the search text (ignoring case), its category equals
/// the selected one, and it carries every selected dietary tag.
pub fn visible_meals(
  meals: &[MealDto],
  filters: &FilterState,
  archived_view: bool
) -> Vec<MealDto> {
  let query = filters
    .search
    .as_deref()
    .map(str::trim)
    .unwrap_or_default()
    .to_lowercase();

  let mut visible: Vec<MealDto> = meals
    .iter()
    .filter(|meal| {
      if meal.archived != archived_view {
        return false;
      }

      if !query.is_empty() {
        let name_match = meal
          .name
          .to_lowercase()
          .contains(&query);
        let description_match = meal
          .description
          .to_lowercase()
          .contains(&query);
        if !name_match
          && !description_match
        {
          return false;
        }
      }

      if let Some(category) =
        filters.category
        && meal.category != Some(category)
      {
        return false;
      }

      if let Some(tags) =
        filters.dietary_tags.as_ref()
        && !tags.iter().all(|tag| {
          meal.dietary_tags.contains(tag)
        })
      {
        return false;
      }

      true
    })
    .cloned()
    .collect();

  sort_meals(&mut visible, filters);
  visible
}

fn sort_meals(
  meals: &mut [MealDto],
  filters: &FilterState
) {
  let (key, direction) =
    effective_sort(filters);

  let primary: fn(
    &MealDto,
    &MealDto
  ) -> Ordering = match key {
    | SortKey::Name => compare_names,
    | SortKey::CreatedAt => |a, b| {
      a.created_at.cmp(&b.created_at)
    },
    | SortKey::Price => |a, b| {
      a.price_cents.cmp(&b.price_cents)
    },
    | SortKey::Other(ref raw) => {
      debug!(
        key = %raw,
        "unknown sort key; keeping \
         catalog order"
      );
      return;
    }
  };

  // Direction applies to the key only; equal keys always list A to Z.
  match direction {
    | SortDirection::Asc => {
      meals.sort_by(|a, b| {
        primary(a, b)
          .then_with(|| compare_names(a, b))
      })
    }
    | _ => meals.sort_by(|a, b| {
      primary(b, a)
        .then_with(|| compare_names(a, b))
    })
  }
}

fn compare_names(
  a: &MealDto,
  b: &MealDto
) -> Ordering {
  a.name
    .to_lowercase()
    .cmp(&b.name.to_lowercase())
}

/// Per-tag counts over `meals`, in the order of `tags`.
pub fn dietary_tag_counts(
  meals: &[MealDto],
  tags: &[DietaryTag]
) -> Vec<(DietaryTag, usize)> {
  tags
    .iter()
    .map(|tag| {
      let count = meals
        .iter()
        .filter(|meal| {
          meal.dietary_tags.contains(&tag.id)
        })
        .count();
      (tag.clone(), count)
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::{
    TimeZone,
    Utc
  };
  use mealbook_shared::MealCategory;
  use uuid::Uuid;

  use super::*;

  fn meal(
    name: &str,
    category: Option<MealCategory>,
    price_cents: u32,
    day: u32,
    tags: &[u32]
  ) -> MealDto {
    MealDto {
      id: Uuid::new_v4(),
      name: name.to_string(),
      description: format!(
        "{name} from the test kitchen"
      ),
      category,
      price_cents,
      created_at: Utc
        .with_ymd_and_hms(
          2026, 3, day, 12, 0, 0
        )
        .unwrap(),
      dietary_tags: tags.to_vec(),
      archived: false
    }
  }

  fn sample() -> Vec<MealDto> {
    vec![
      meal(
        "Pancakes",
        Some(
          MealCategory::BestForBreakfast
        ),
        850,
        1,
        &[1]
      ),
      meal(
        "Lentil Soup",
        Some(MealCategory::BestForLunch),
        650,
        2,
        &[1, 2]
      ),
      meal(
        "Steak Frites",
        Some(
          MealCategory::BestForDinner
        ),
        2400,
        3,
        &[]
      ),
      meal(
        "apple slices",
        Some(MealCategory::Snack),
        300,
        4,
        &[1, 2, 3]
      ),
    ]
  }

  fn names(meals: &[MealDto]) -> Vec<&str> {
    meals
      .iter()
      .map(|meal| meal.name.as_str())
      .collect()
  }

  #[test]
  fn default_sort_is_newest_first() {
    let out = visible_meals(
      &sample(),
      &FilterState::default(),
      false
    );
    assert_eq!(
      names(&out),
      vec![
        "apple slices",
        "Steak Frites",
        "Lentil Soup",
        "Pancakes"
      ]
    );
  }

  #[test]
  fn search_matches_name_or_description_ignoring_case()
   {
    let filters = FilterState {
      search: Some("SOUP".to_string()),
      ..FilterState::default()
    };
    let out =
      visible_meals(&sample(), &filters, false);
    assert_eq!(
      names(&out),
      vec!["Lentil Soup"]
    );

    let filters = FilterState {
      search: Some(
        "test kitchen".to_string()
      ),
      ..FilterState::default()
    };
    assert_eq!(
      visible_meals(
        &sample(),
        &filters,
        false
      )
      .len(),
      4
    );
  }

  #[test]
  fn category_and_tags_narrow_the_list() {
    let filters = FilterState {
      dietary_tags: Some(vec![2, 1]),
      sort_by: Some(SortKey::Name),
      sort_direction: Some(
        SortDirection::Asc
      ),
      ..FilterState::default()
    };
    let out =
      visible_meals(&sample(), &filters, false);
    assert_eq!(
      names(&out),
      vec!["apple slices", "Lentil Soup"]
    );

    let filters = FilterState {
      category: Some(MealCategory::Snack),
      ..filters
    };
    let out =
      visible_meals(&sample(), &filters, false);
    assert_eq!(
      names(&out),
      vec!["apple slices"]
    );
  }

  #[test]
  fn price_sort_respects_direction() {
    let filters = FilterState {
      sort_by: Some(SortKey::Price),
      sort_direction: Some(
        SortDirection::Asc
      ),
      ..FilterState::default()
    };
    let out =
      visible_meals(&sample(), &filters, false);
    assert_eq!(
      names(&out),
      vec![
        "apple slices",
        "Lentil Soup",
        "Pancakes",
        "Steak Frites"
      ]
    );

    let filters = FilterState {
      sort_direction: Some(
        SortDirection::Desc
      ),
      ..filters
    };
    let out =
      visible_meals(&sample(), &filters, false);
    assert_eq!(
      out.first().map(|m| m.name.as_str()),
      Some("Steak Frites")
    );
  }

  #[test]
  fn equal_keys_list_by_name_in_both_directions()
   {
    let meals = vec![
      meal("Bagel", None, 500, 6, &[]),
      meal("Waffle", None, 500, 6, &[]),
      meal("Muffin", None, 500, 6, &[]),
      meal("Toast", None, 200, 6, &[]),
    ];

    let descending = FilterState {
      sort_by: Some(SortKey::Price),
      sort_direction: Some(
        SortDirection::Desc
      ),
      ..FilterState::default()
    };
    assert_eq!(
      names(&visible_meals(
        &meals,
        &descending,
        false
      )),
      vec!["Bagel", "Muffin", "Waffle", "Toast"]
    );

    let newest = FilterState::default();
    assert_eq!(
      names(&visible_meals(
        &meals, &newest, false
      )),
      vec!["Bagel", "Muffin", "Toast", "Waffle"]
    );
  }

  #[test]
  fn unknown_sort_key_keeps_catalog_order()
   {
    let filters = FilterState {
      sort_by: Some(SortKey::from(
        "rating"
      )),
      ..FilterState::default()
    };
    let out =
      visible_meals(&sample(), &filters, false);
    assert_eq!(
      names(&out),
      names(&sample())
    );
  }

  #[test]
  fn archived_view_shows_only_archived_meals()
   {
    let mut meals = sample();
    meals[2].archived = true;

    let active = visible_meals(
      &meals,
      &FilterState::default(),
      false
    );
    assert_eq!(active.len(), 3);

    let archived = visible_meals(
      &meals,
      &FilterState::default(),
      true
    );
    assert_eq!(
      names(&archived),
      vec!["Steak Frites"]
    );
  }

  #[test]
  fn tag_counts_follow_tag_order() {
    let tags = vec![
      DietaryTag {
        id:    2,
        label: "Vegan".to_string()
      },
      DietaryTag {
        id:    1,
        label: "Vegetarian".to_string()
      },
      DietaryTag {
        id:    9,
        label: "Keto".to_string()
      },
    ];
    let counts: Vec<(u32, usize)> =
      dietary_tag_counts(&sample(), &tags)
        .into_iter()
        .map(|(tag, count)| (tag.id, count))
        .collect();
    assert_eq!(
      counts,
      vec![(2, 2), (1, 3), (9, 0)]
    );
  }

  #[test]
  fn catalog_parses_json_and_resolves_labels()
   {
    let raw = r#"{
      "dietary_tags": [{"id": 1, "label": "Vegetarian"}],
      "meals": [{
        "id": "6f1c1c9e-9a43-4c1b-9d0f-2c5e8a7b1d10",
        "name": "Shakshuka",
        "category": "Best for Breakfast",
        "price_cents": 1150,
        "created_at": "2026-03-05T08:30:00Z",
        "dietary_tags": [1]
      }]
    }"#;
    let catalog =
      Catalog::from_json_str(raw)
        .expect("parse");
    assert_eq!(catalog.meals.len(), 1);
    assert!(!catalog.meals[0].archived);
    assert_eq!(
      catalog.tag_label(1),
      Some("Vegetarian")
    );
    assert_eq!(catalog.tag_label(2), None);
  }

  #[test]
  fn malformed_catalog_reports_context() {
    let err =
      Catalog::from_json_str("{ nope")
        .expect_err("should fail");
    assert!(
      format!("{err:#}")
        .contains("failed to parse meal catalog")
    );
  }
}
