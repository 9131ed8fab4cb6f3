mod filter_panel;
mod layout_shell;
mod meal_list;
mod sidebar;

pub use filter_panel::FilterPanel;
pub use layout_shell::LayoutShell;
pub use meal_list::{
  MealList,
  format_price
};
pub use sidebar::Sidebar;
