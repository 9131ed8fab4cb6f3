use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use mealbook_core::catalog::{
  dietary_tag_counts,
  visible_meals
};
use mealbook_core::{
  Catalog,
  FilterState
};
use uuid::Uuid;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html,
  use_memo
};
use yew_router::prelude::Link;

use super::Route;
use crate::components::{
  FilterPanel,
  MealList,
  format_price
};

#[derive(Properties, PartialEq)]
pub struct MealsPageProps {
  pub catalog:            Rc<Catalog>,
  pub filters:            FilterState,
  pub archived:           bool,
  pub debounce:           Duration,
  pub on_filters_change:
    Callback<FilterState>,
  pub on_toggle_archived: Callback<()>
}

#[function_component(MealsPage)]
pub fn meals_page(
  props: &MealsPageProps
) -> Html {
  let visible = use_memo(
    (
      props.catalog.clone(),
      props.filters.clone(),
      props.archived
    ),
    |(catalog, filters, archived)| {
      visible_meals(
        &catalog.meals,
        filters,
        *archived
      )
    }
  );

  let tag_counts = dietary_tag_counts(
    &visible,
    &props.catalog.dietary_tags
  );
  let tag_labels: BTreeMap<_, _> = props
    .catalog
    .dietary_tags
    .iter()
    .map(|tag| {
      (tag.id, tag.label.clone())
    })
    .collect();
  let title = if props.archived {
    "Archived Meals"
  } else {
    "Meals"
  };

  html! {
      <>
          <FilterPanel
              filters={props.filters.clone()}
              dietary_tags={tag_counts}
              archived={props.archived}
              on_toggle_archived={props.on_toggle_archived.clone()}
              on_filters_change={props.on_filters_change.clone()}
              debounce={props.debounce}
          />
          <MealList
              title={title.to_string()}
              meals={(*visible).clone()}
              tag_labels={tag_labels}
          />
      </>
  }
}

#[derive(Properties, PartialEq)]
pub struct MealDetailPageProps {
  pub catalog: Rc<Catalog>,
  pub id:      Uuid
}

#[function_component(MealDetailPage)]
pub fn meal_detail_page(
  props: &MealDetailPageProps
) -> Html {
  let Some(meal) = props
    .catalog
    .meals
    .iter()
    .find(|meal| meal.id == props.id)
  else {
    tracing::warn!(id = %props.id, "meal not found in catalog");
    return html! { <NotFoundPage /> };
  };

  let tags = meal
    .dietary_tags
    .iter()
    .filter_map(|id| {
      props.catalog.tag_label(*id)
    })
    .map(str::to_string)
    .collect::<Vec<_>>();

  html! {
      <div class="panel detail">
          <div class="header">{ meal.name.clone() }</div>
          <div class="details">
              <p>{ meal.description.clone() }</p>
              <div class="field">
                  <label>{ "Category" }</label>
                  <span>{ meal.category.map(|c| c.label()).unwrap_or("—") }</span>
              </div>
              <div class="field">
                  <label>{ "Price" }</label>
                  <span>{ format_price(meal.price_cents) }</span>
              </div>
              <div class="field">
                  <label>{ "Added" }</label>
                  <span>{ meal.created_at.format("%b %-d, %Y").to_string() }</span>
              </div>
              {
                  if tags.is_empty() {
                      html! {}
                  } else {
                      html! {
                          <div class="tags">
                              { for tags.into_iter().map(|tag| html! { <span class="chip">{ tag }</span> }) }
                          </div>
                      }
                  }
              }
              {
                  if meal.archived {
                      html! { <span class="chip">{ "Archived" }</span> }
                  } else {
                      html! {}
                  }
              }
              <div class="actions">
                  <Link<Route> to={Route::Meals} classes="btn">{ "Back to meals" }</Link<Route>>
              </div>
          </div>
      </div>
  }
}

#[function_component(NotFoundPage)]
pub fn not_found_page() -> Html {
  html! {
      <div class="panel">
          <div class="header">{ "Not Found" }</div>
          <div class="details">
              <p>{ "That page does not exist." }</p>
              <Link<Route> to={Route::Meals} classes="btn">{ "Back to meals" }</Link<Route>>
          </div>
      </div>
  }
}
