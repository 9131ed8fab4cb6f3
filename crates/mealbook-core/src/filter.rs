//! Single-field edits on a committed [`FilterState`].
//!
//! Every function takes the committed state by reference and returns the
//! full replacement value; nothing here mutates the caller's copy. Results
//! stay minimal: no empty search strings, no empty tag lists.

use mealbook_shared::{
  CategoryChoice,
  DietaryTagId,
  FilterState,
  MealCategory,
  SortDirection,
  SortKey
};
use tracing::trace;

/// Sort key applied when the committed state carries none.
pub const DEFAULT_SORT_KEY: SortKey =
  SortKey::CreatedAt;

/// One constraint currently narrowing the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveConstraint {
  Search(String),
  Category(MealCategory),
  DietaryTag(DietaryTagId)
}

/// Replaces `search`; blank input (after trimming) becomes absent.
pub fn with_search(
  committed: &FilterState,
  raw: &str
) -> FilterState {
  let trimmed = raw.trim();
  FilterState {
    search: (!trimmed.is_empty())
      .then(|| trimmed.to_string()),
    ..committed.clone()
  }
}

pub fn select_category(
  committed: &FilterState,
  choice: CategoryChoice
) -> FilterState {
  let category = match choice {
    | CategoryChoice::All => None,
    | CategoryChoice::Only(category) => {
      Some(category)
    }
  };
  trace!(?category, "category selected");
  FilterState {
    category,
    ..committed.clone()
  }
}

/// Replaces both sort fields. Values are passed through untouched.
pub fn change_sort(
  committed: &FilterState,
  key: SortKey,
  direction: SortDirection
) -> FilterState {
  trace!(
    key = %key,
    direction = %direction,
    "sort changed"
  );
  FilterState {
    sort_by: Some(key),
    sort_direction: Some(direction),
    ..committed.clone()
  }
}

/// New key, current direction (descending when unset).
pub fn pick_sort_key(
  committed: &FilterState,
  key: SortKey
) -> FilterState {
  let (_, direction) =
    effective_sort(committed);
  change_sort(committed, key, direction)
}

/// Flips the direction, holding the current key (creation time when unset).
pub fn toggle_sort_direction(
  committed: &FilterState
) -> FilterState {
  let (key, direction) =
    effective_sort(committed);
  change_sort(
    committed,
    key,
    direction.flipped()
  )
}

pub fn effective_sort(
  filters: &FilterState
) -> (SortKey, SortDirection) {
  (
    filters
      .sort_by
      .clone()
      .unwrap_or(DEFAULT_SORT_KEY),
    filters
      .sort_direction
      .clone()
      .unwrap_or_default()
  )
}

/// Removes `tag` if selected, appends it otherwise. An emptied selection
/// becomes absent.
pub fn toggle_dietary_tag(
  committed: &FilterState,
  tag: DietaryTagId
) -> FilterState {
  let mut tags = committed
    .dietary_tags
    .clone()
    .unwrap_or_default();

  if let Some(index) =
    tags.iter().position(|id| *id == tag)
  {
    tags.remove(index);
  } else {
    tags.push(tag);
  }

  trace!(
    tag,
    selected = tags.len(),
    "dietary tag toggled"
  );

  FilterState {
    dietary_tags: (!tags.is_empty())
      .then_some(tags),
    ..committed.clone()
  }
}

pub fn is_tag_selected(
  filters: &FilterState,
  tag: DietaryTagId
) -> bool {
  filters
    .dietary_tags
    .as_ref()
    .is_some_and(|tags| {
      tags.contains(&tag)
    })
}

pub fn clear_all() -> FilterState {
  FilterState::default()
}

pub fn has_active_filters(
  filters: &FilterState
) -> bool {
  filters
    .search
    .as_ref()
    .is_some_and(|search| {
      !search.is_empty()
    })
    || filters.category.is_some()
    || filters
      .dietary_tags
      .as_ref()
      .is_some_and(|tags| {
        !tags.is_empty()
      })
}

/// Constraints in display order: search, category, then tags in
/// selection order.
pub fn active_constraints(
  filters: &FilterState
) -> Vec<ActiveConstraint> {
  let mut out = Vec::new();
  if let Some(search) = filters
    .search
    .as_ref()
    .filter(|search| !search.is_empty())
  {
    out.push(ActiveConstraint::Search(
      search.clone()
    ));
  }
  if let Some(category) =
    filters.category
  {
    out.push(
      ActiveConstraint::Category(
        category
      )
    );
  }
  if let Some(tags) =
    filters.dietary_tags.as_ref()
  {
    out.extend(tags.iter().map(|id| {
      ActiveConstraint::DietaryTag(*id)
    }));
  }
  out
}
