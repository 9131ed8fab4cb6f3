use std::time::Duration;

use gloo::timers::callback::Timeout;
use mealbook_core::filter::{
  self,
  ActiveConstraint
};
use mealbook_core::{
  CategoryChoice,
  DietaryTag,
  FilterController,
  FilterState,
  MealCategory,
  SortDirection,
  SortKey
};
use web_sys::{
  HtmlInputElement,
  HtmlSelectElement,
  InputEvent
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  TargetCast,
  function_component,
  html,
  use_effect_with,
  use_mut_ref,
  use_state
};

#[derive(Properties, PartialEq)]
pub struct FilterPanelProps {
  pub filters:            FilterState,
  pub dietary_tags:       Vec<(DietaryTag, usize)>,
  pub archived:           bool,
  pub on_toggle_archived: Callback<()>,
  pub on_filters_change:
    Callback<FilterState>,
  pub debounce:           Duration
}

#[function_component(FilterPanel)]
pub fn filter_panel(
  props: &FilterPanelProps
) -> Html {
  let controller = {
    let filters = props.filters.clone();
    let debounce = props.debounce;
    use_mut_ref(move || {
      FilterController::new(
        &filters, debounce
      )
    })
  };
  let draft = {
    let initial = controller
      .borrow()
      .draft()
      .to_string();
    use_state(move || initial)
  };
  let pending_timer =
    use_mut_ref(|| None::<Timeout>);
  // Read by the timer when it fires, so it must track the latest props.
  let committed = use_mut_ref(
    FilterState::default
  );
  *committed.borrow_mut() =
    props.filters.clone();

  {
    let controller = controller.clone();
    let committed = committed.clone();
    let pending_timer =
      pending_timer.clone();
    let draft = draft.clone();
    use_effect_with(
      props.filters.search.clone(),
      move |_| {
        let latest =
          committed.borrow().clone();
        let reset = controller
          .borrow_mut()
          .sync_committed(&latest);
        if reset {
          pending_timer
            .borrow_mut()
            .take();
          draft.set(
            controller
              .borrow()
              .draft()
              .to_string()
          );
        }
        || ()
      }
    );
  }

  {
    let controller = controller.clone();
    let pending_timer =
      pending_timer.clone();
    use_effect_with((), move |_| {
      move || {
        pending_timer.borrow_mut().take();
        controller.borrow_mut().cancel();
      }
    });
  }

  let on_search_input = {
    let controller = controller.clone();
    let committed = committed.clone();
    let pending_timer =
      pending_timer.clone();
    let draft = draft.clone();
    let on_filters_change =
      props.on_filters_change.clone();
    Callback::from(
      move |e: InputEvent| {
        let input: HtmlInputElement =
          e.target_unchecked_into();
        let value = input.value();
        let ticket = controller
          .borrow_mut()
          .edit_draft(value.clone());
        draft.set(value);

        let timer = {
          let controller =
            controller.clone();
          let committed =
            committed.clone();
          let on_filters_change =
            on_filters_change.clone();
          Timeout::new(
            ticket.delay_millis(),
            move || {
              let latest =
                committed.borrow().clone();
              let next = controller
                .borrow_mut()
                .fire(ticket, &latest);
              if let Some(next) = next {
                on_filters_change
                  .emit(next);
              }
            }
          )
        };
        // Replacing the handle drops, and so clears, the previous timeout.
        *pending_timer.borrow_mut() =
          Some(timer);
      }
    )
  };

  let on_category_change = {
    let filters = props.filters.clone();
    let on_filters_change =
      props.on_filters_change.clone();
    Callback::from(
      move |e: web_sys::Event| {
        let select: HtmlSelectElement =
          e.target_unchecked_into();
        let value = select.value();
        match CategoryChoice::parse(
          &value
        ) {
          | Some(choice) => {
            on_filters_change.emit(
              filter::select_category(
                &filters, choice
              )
            )
          }
          | None => {
            tracing::warn!(
              value = %value,
              "ignoring unknown category"
            );
          }
        }
      }
    )
  };

  let on_sort_key_change = {
    let filters = props.filters.clone();
    let on_filters_change =
      props.on_filters_change.clone();
    Callback::from(
      move |e: web_sys::Event| {
        let select: HtmlSelectElement =
          e.target_unchecked_into();
        on_filters_change.emit(
          filter::pick_sort_key(
            &filters,
            SortKey::from(select.value())
          )
        );
      }
    )
  };

  let on_toggle_direction = {
    let filters = props.filters.clone();
    let on_filters_change =
      props.on_filters_change.clone();
    Callback::from(
      move |_: MouseEvent| {
        on_filters_change.emit(
          filter::toggle_sort_direction(
            &filters
          )
        );
      }
    )
  };

  let on_clear = {
    let on_filters_change =
      props.on_filters_change.clone();
    Callback::from(
      move |_: MouseEvent| {
        on_filters_change
          .emit(filter::clear_all());
      }
    )
  };

  let on_toggle_archived = {
    let on_toggle_archived =
      props.on_toggle_archived.clone();
    Callback::from(
      move |_: MouseEvent| {
        on_toggle_archived.emit(())
      }
    )
  };

  let (sort_key, sort_direction) =
    filter::effective_sort(
      &props.filters
    );
  let direction_label =
    match sort_direction {
      | SortDirection::Asc => {
        "Ascending"
      }
      | SortDirection::Desc => {
        "Descending"
      }
      | SortDirection::Other(_) => {
        sort_direction.as_str()
      }
    };
  let category_value =
    CategoryChoice::from(
      props.filters.category
    )
    .as_value();
  let active =
    filter::has_active_filters(
      &props.filters
    );

  html! {
      <div class="panel filters">
          <div class="header">{ "Filters" }</div>
          <div class="details">
              <div class="field">
                  <label>{ "Search Meals" }</label>
                  <input
                      value={(*draft).clone()}
                      placeholder="Search by name or description"
                      oninput={on_search_input}
                  />
              </div>
              <div class="field">
                  <label>{ "Category" }</label>
                  <select value={category_value} onchange={on_category_change}>
                      <option value="all" selected={props.filters.category.is_none()}>
                          { "All Categories" }
                      </option>
                      {
                          for MealCategory::ALL.iter().map(|category| html! {
                              <option
                                  value={category.label()}
                                  selected={props.filters.category == Some(*category)}
                              >
                                  { category.label() }
                              </option>
                          })
                      }
                  </select>
              </div>
              <div class="field">
                  <label>{ "Sort By" }</label>
                  <select value={sort_key.as_str().to_string()} onchange={on_sort_key_change}>
                      {
                          for [SortKey::CreatedAt, SortKey::Name, SortKey::Price].into_iter().map(|key| {
                              let selected = key == sort_key;
                              html! {
                                  <option value={key.as_str().to_string()} selected={selected}>
                                      { key.label().to_string() }
                                  </option>
                              }
                          })
                      }
                  </select>
                  <button class="btn" onclick={on_toggle_direction}>{ direction_label }</button>
              </div>
              <div class="field">
                  <label>{ "Dietary" }</label>
                  <div class="tags">
                      {
                          for props.dietary_tags.iter().map(|(tag, count)| {
                              let id = tag.id;
                              let selected = filter::is_tag_selected(&props.filters, id);
                              let filters = props.filters.clone();
                              let on_filters_change = props.on_filters_change.clone();
                              let onclick = Callback::from(move |_: MouseEvent| {
                                  on_filters_change.emit(filter::toggle_dietary_tag(&filters, id));
                              });
                              html! {
                                  <button class={if selected { "tag active" } else { "tag" }} {onclick}>
                                      { tag.label.clone() }
                                      <span class="badge">{ *count }</span>
                                  </button>
                              }
                          })
                      }
                  </div>
              </div>
              <div class="actions">
                  <button class="btn" onclick={on_toggle_archived}>
                      { if props.archived { "Show Active" } else { "Show Archived" } }
                  </button>
                  {
                      if active {
                          html! {
                              <button class="btn" onclick={on_clear}>{ "Clear Filters" }</button>
                          }
                      } else {
                          html! {}
                      }
                  }
              </div>
              {
                  if active {
                      html! {
                          <div class="summary">
                              {
                                  for filter::active_constraints(&props.filters).into_iter().map(|constraint| {
                                      html! {
                                          <span class="chip">
                                              { constraint_label(&constraint, &props.dietary_tags) }
                                          </span>
                                      }
                                  })
                              }
                          </div>
                      }
                  } else {
                      html! {}
                  }
              }
          </div>
      </div>
  }
}

fn constraint_label(
  constraint: &ActiveConstraint,
  tags: &[(DietaryTag, usize)]
) -> String {
  match constraint {
    | ActiveConstraint::Search(text) => {
      format!("\u{201c}{text}\u{201d}")
    }
    | ActiveConstraint::Category(
      category
    ) => category.label().to_string(),
    | ActiveConstraint::DietaryTag(id) => {
      tags
        .iter()
        .find(|(tag, _)| tag.id == *id)
        .map(|(tag, _)| tag.label.clone())
        .unwrap_or_else(|| {
          format!("tag #{id}")
        })
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tags() -> Vec<(DietaryTag, usize)> {
    vec![(
      DietaryTag {
        id:    1,
        label: "Vegetarian".to_string()
      },
      3
    )]
  }

  #[test]
  fn search_chip_is_quoted() {
    assert_eq!(
      constraint_label(
        &ActiveConstraint::Search(
          "oats".to_string()
        ),
        &tags()
      ),
      "\u{201c}oats\u{201d}"
    );
  }

  #[test]
  fn category_chip_uses_display_label() {
    assert_eq!(
      constraint_label(
        &ActiveConstraint::Category(
          MealCategory::BestForLunch
        ),
        &tags()
      ),
      "Best for Lunch"
    );
  }

  #[test]
  fn tag_chip_falls_back_to_id_when_unknown()
   {
    assert_eq!(
      constraint_label(
        &ActiveConstraint::DietaryTag(1),
        &tags()
      ),
      "Vegetarian"
    );
    assert_eq!(
      constraint_label(
        &ActiveConstraint::DietaryTag(9),
        &tags()
      ),
      "tag #9"
    );
  }
}
