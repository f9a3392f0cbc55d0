//! AI-GreenLand: a desktop portal for a satirical digital nation.
//!
//! The crate holds the domain logic (tables, admin grid, broadcast composer,
//! contract wizard, assistant, map, registration, treasury) and an egui shell
//! over it. Everything outside the GUI module is plain data and works without a
//! display, which is how the tests drive it.

pub mod ai;
pub mod app;
pub mod assistant;
pub mod broadcast;
pub mod chat;
pub mod config;
pub mod contract;
pub mod grid;
mod gui;
pub mod intake;
pub mod knowledge;
pub mod laws;
pub mod map;
pub mod markup;
pub mod registration;
pub mod statics;
pub mod store;
pub mod table;
pub mod treasury;
pub mod value;
pub mod worker;

pub use gui::run_gui;
