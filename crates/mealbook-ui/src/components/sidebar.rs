use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  classes,
  function_component,
  html
};
use yew_router::prelude::{
  Link,
  use_route
};

use crate::app::Route;

#[derive(Properties, PartialEq)]
pub struct SidebarProps {
  pub open:      bool,
  pub collapsed: bool,
  pub on_toggle_collapse:
    Callback<MouseEvent>,
  pub on_navigate: Callback<()>
}

#[function_component(Sidebar)]
pub fn sidebar(
  props: &SidebarProps
) -> Html {
  let current = use_route::<Route>();

  let make_item =
    |route: Route, icon: &str, label: &str| {
      let active = current
        .as_ref()
        .is_some_and(|current| {
          current.nav_section() == route
        });
      let on_navigate =
        props.on_navigate.clone();
      html! {
          <div class={classes!("item", active.then_some("active"))} onclick={move |_| on_navigate.emit(())}>
              <Link<Route> to={route}>
                  <span class="icon">{ icon }</span>
                  <span class="label">{ label }</span>
              </Link<Route>>
          </div>
      }
    };

  html! {
      <nav
          class={classes!(
              "sidebar",
              props.open.then_some("open"),
              props.collapsed.then_some("collapsed")
          )}
      >
          <div class="header">
              <span class="label">{ "Browse" }</span>
              <button class="btn" onclick={props.on_toggle_collapse.clone()}>
                  { if props.collapsed { "»" } else { "«" } }
              </button>
          </div>
          { make_item(Route::Meals, "🍽", "Meals") }
      </nav>
  }
}
