//! The dashboard page: severity ordering, technique names, presentation
//! rules, the list/detail view state and the HTML that shows it.

pub mod present;
pub mod render;
pub mod severity;
pub mod techniques;
pub mod view;

pub use render::render_page;
pub use techniques::TechniqueCatalog;
pub use view::{DashboardView, StoreAlertSource};
