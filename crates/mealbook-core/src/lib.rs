pub mod catalog;
pub mod config;
pub mod controller;
pub mod filter;

pub use catalog::Catalog;
pub use config::Config;
pub use controller::{
  DebounceTicket,
  FilterController
};
pub use mealbook_shared::{
  CategoryChoice,
  DietaryTag,
  DietaryTagId,
  FilterState,
  MealCategory,
  MealDto,
  SortDirection,
  SortKey
};
