mod pages;

use std::rc::Rc;

use gloo::console::log;
use mealbook_core::{
  Catalog,
  Config,
  FilterState
};
use uuid::Uuid;
use yew::{
  Callback,
  Html,
  function_component,
  html,
  use_effect_with,
  use_state
};
use yew_router::prelude::{
  BrowserRouter,
  Routable,
  Switch
};

use crate::components::LayoutShell;
use pages::{
  MealDetailPage,
  MealsPage,
  NotFoundPage
};

const CONFIG_TOML: &str =
  include_str!("../assets/mealbook.toml");
const CATALOG_JSON: &str =
  include_str!("../assets/catalog.json");

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
  #[at("/")]
  Meals,
  #[at("/meals/:id")]
  Meal { id: Uuid },
  #[not_found]
  #[at("/404")]
  NotFound
}

impl Route {
  /// Top-level navigation entry this route belongs to.
  pub fn nav_section(&self) -> Route {
    match self {
      | Route::Meals
      | Route::Meal { .. } => {
        Route::Meals
      }
      | Route::NotFound => {
        Route::NotFound
      }
    }
  }
}

#[function_component(App)]
pub fn app() -> Html {
  let config = use_state(load_config);
  let catalog = use_state(|| {
    Rc::new(load_catalog())
  });
  let filters =
    use_state(FilterState::default);
  let archived = use_state(|| false);

  {
    use_effect_with((), move |_| {
      ui_event(
        "app.mounted",
        "hooks initialized"
      );
      || ()
    });
  }

  let on_filters_change = {
    let filters = filters.clone();
    Callback::from(
      move |next: FilterState| {
        ui_event(
          "filters.change",
          format_args!("{next:?}")
        );
        filters.set(next);
      }
    )
  };

  let on_toggle_archived = {
    let archived = archived.clone();
    Callback::from(move |()| {
      let next = !*archived;
      tracing::debug!(
        archived = next,
        "archived view toggled"
      );
      archived.set(next);
    })
  };

  let render = {
    let catalog = (*catalog).clone();
    let filters = (*filters).clone();
    let archived = *archived;
    let debounce = config.debounce;
    Callback::from(
      move |route: Route| -> Html {
        match route {
          | Route::Meals => html! {
              <MealsPage
                  catalog={catalog.clone()}
                  filters={filters.clone()}
                  archived={archived}
                  debounce={debounce}
                  on_filters_change={on_filters_change.clone()}
                  on_toggle_archived={on_toggle_archived.clone()}
              />
          },
          | Route::Meal { id } => html! {
              <MealDetailPage catalog={catalog.clone()} id={id} />
          },
          | Route::NotFound => html! {
              <NotFoundPage />
          }
        }
      }
    )
  };

  html! {
      <BrowserRouter>
          <LayoutShell title={"Mealbook".to_string()}>
              <Switch<Route> render={render} />
          </LayoutShell>
      </BrowserRouter>
  }
}

fn load_config() -> Config {
  match Config::from_toml_str(
    CONFIG_TOML
  ) {
    | Ok(config) => {
      tracing::info!(
        debounce_ms =
          config.debounce.as_millis()
            as u64,
        "loaded frontend config"
      );
      config
    }
    | Err(error) => {
      tracing::error!(error = %format!("{error:#}"), "failed to parse frontend config; using defaults");
      Config::default()
    }
  }
}

fn load_catalog() -> Catalog {
  match Catalog::from_json_str(
    CATALOG_JSON
  ) {
    | Ok(catalog)
      if !catalog.meals.is_empty() =>
    {
      tracing::info!(
        meals = catalog.meals.len(),
        tags = catalog.dietary_tags.len(),
        "loaded meal catalog"
      );
      catalog
    }
    | Ok(catalog) => {
      tracing::warn!(
        "meal catalog is empty"
      );
      catalog
    }
    | Err(error) => {
      tracing::error!(error = %format!("{error:#}"), "failed to parse meal catalog");
      Catalog::default()
    }
  }
}

/// Mirrors a UI event to the browser console in debug builds.
fn ui_event(
  event: &'static str,
  detail: impl std::fmt::Display
) {
  tracing::debug!(
    target: "mealbook_ui::events",
    event,
    %detail
  );
  if cfg!(debug_assertions) {
    log!(format!(
      "[mealbook] {event} {detail}"
    ));
  }
}
