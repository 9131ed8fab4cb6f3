use std::collections::BTreeMap;

use mealbook_core::{
  DietaryTagId,
  MealDto
};
use yew::{
  Html,
  MouseEvent,
  Properties,
  function_component,
  html
};
use yew_router::prelude::use_navigator;

use crate::app::Route;

#[derive(Properties, PartialEq)]
pub struct MealListProps {
  pub title:      String,
  pub meals:      Vec<MealDto>,
  pub tag_labels: BTreeMap<DietaryTagId, String>
}

#[function_component(MealList)]
pub fn meal_list(
  props: &MealListProps
) -> Html {
  let navigator = use_navigator();

  html! {
      <div class="panel meal-list">
          <div class="header">
              { props.title.clone() }
              <span class="badge">{ props.meals.len() }</span>
          </div>
          {
              if props.meals.is_empty() {
                  html! { <div class="empty">{ "No meals match these filters." }</div> }
              } else {
                  html! {
                      <>{ for props.meals.iter().map(|meal| {
                          let id = meal.id;
                          let navigator = navigator.clone();
                          let onclick = move |_: MouseEvent| {
                              if let Some(navigator) = navigator.as_ref() {
                                  navigator.push(&Route::Meal { id });
                              }
                          };
                          let tags = meal
                              .dietary_tags
                              .iter()
                              .filter_map(|tag| props.tag_labels.get(tag).cloned())
                              .collect::<Vec<_>>()
                              .join(" · ");
                          html! {
                              <button class="meal" {onclick}>
                                  <span class="name">{ meal.name.clone() }</span>
                                  <span class="meta">
                                      { meal.category.map(|c| c.label()).unwrap_or("—") }
                                      { " · " }
                                      { format_price(meal.price_cents) }
                                      {
                                          if tags.is_empty() {
                                              html! {}
                                          } else {
                                              html! { <>{ " · " }{ tags }</> }
                                          }
                                      }
                                  </span>
                              </button>
                          }
                      }) }</>
                  }
              }
          }
      </div>
  }
}

pub fn format_price(
  cents: u32
) -> String {
  format!(
    "${}.{:02}",
    cents / 100,
    cents % 100
  )
}

#[cfg(test)]
mod tests {
  use super::format_price;

  #[test]
  fn price_keeps_two_cent_digits() {
    assert_eq!(format_price(950), "$9.50");
    assert_eq!(format_price(1150), "$11.50");
    assert_eq!(format_price(5), "$0.05");
    assert_eq!(format_price(0), "$0.00");
  }
}
