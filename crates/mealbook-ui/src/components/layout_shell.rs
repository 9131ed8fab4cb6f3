use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html,
  use_state
};

use super::Sidebar;

#[derive(Properties, PartialEq)]
pub struct LayoutShellProps {
  pub title:    String,
  #[prop_or_default]
  pub children: Html
}

/// Page frame: navigation sidebar plus the routed content slot.
///
/// `open` drives the overlay drawer on narrow screens; `collapsed` shrinks
/// the docked sidebar to its icons.
#[function_component(LayoutShell)]
pub fn layout_shell(
  props: &LayoutShellProps
) -> Html {
  let sidebar_open = use_state(|| false);
  let sidebar_collapsed =
    use_state(|| false);

  let on_toggle_open = {
    let sidebar_open =
      sidebar_open.clone();
    Callback::from(
      move |_: MouseEvent| {
        sidebar_open.set(!*sidebar_open)
      }
    )
  };

  let on_toggle_collapse = {
    let sidebar_collapsed =
      sidebar_collapsed.clone();
    Callback::from(
      move |_: MouseEvent| {
        let next = !*sidebar_collapsed;
        tracing::debug!(
          collapsed = next,
          "sidebar collapse toggled"
        );
        sidebar_collapsed.set(next)
      }
    )
  };

  let on_navigate = {
    let sidebar_open =
      sidebar_open.clone();
    Callback::from(move |()| {
      sidebar_open.set(false)
    })
  };

  html! {
      <div class="shell">
          <Sidebar
              open={*sidebar_open}
              collapsed={*sidebar_collapsed}
              on_toggle_collapse={on_toggle_collapse}
              on_navigate={on_navigate}
          />
          <div class="shell-main">
              <header class="shell-header">
                  <button class="btn menu" onclick={on_toggle_open}>{ "☰" }</button>
                  <h1>{ props.title.clone() }</h1>
              </header>
              <main class="content">
                  { props.children.clone() }
              </main>
          </div>
      </div>
  }
}
