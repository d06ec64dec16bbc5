//! Renderable building blocks consumed by the bar layouts.

mod advanced_bar;
/// Composed-button row rendering.
pub mod buttons;
mod export_modal;
mod filter_bar;
/// Query-input element rendering.
pub mod inputs;
mod pagination;
mod professional_bar;
/// Summary group rendering and the disclosure toggle affordance.
pub mod summary;
mod toolbar;

pub use advanced_bar::AdvancedBar;
pub use buttons::{button_spans, render_buttons};
pub use export_modal::{ModalAction, handle_export_key, render_export_modal, render_export_pending};
pub use filter_bar::FilterBar;
pub use inputs::query_input_spans;
pub use pagination::{Pagination, pagination_line, render_pagination};
pub use professional_bar::ProfessionalBar;
pub use summary::{render_summary_group, summary_line};
pub use toolbar::Toolbar;
