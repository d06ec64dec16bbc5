//! Query/action bar composition for terminal data tables.
//!
//! `tablebar` is the control surface that sits above a host-rendered data
//! table: an action button row with overflow folding, an aggregate summary
//! bar with progressive disclosure, an export workflow with a column-picker
//! modal, and a family of bar layouts selected by configuration.
//!
//! The host owns the data behind a [`TableStore`] implementation; the bar
//! composes against that snapshot every pass and never caches store state.
//!
//! ```no_run
//! use tablebar::{ActionKind, BarConfig, ButtonEntry, QueryBar, SummarySpec};
//!
//! let bar = QueryBar::new(BarConfig::default())
//! 	.with_buttons(vec![
//! 		ButtonEntry::symbolic(ActionKind::Add),
//! 		ButtonEntry::symbolic(ActionKind::Delete),
//! 		ButtonEntry::symbolic(ActionKind::Export),
//! 	])
//! 	.with_summary(vec![SummarySpec::from("amount")]);
//! # let _ = bar;
//! ```

pub mod bar;
pub mod buttons;
pub mod components;
pub mod config;
pub mod export;
mod querybar;
pub mod store;
pub mod summary;

pub use bar::{BarContext, BarFallback, BarRenderer, BarSelection, BarVariant, select_bar};
pub use buttons::{
	ActionKind, ButtonDefaults, ButtonEntry, ButtonOverrides, ButtonProps, ButtonVariant,
	ClickAction, ComposedButton, ResolvedButton, compose_buttons, resolve_action,
};
pub use components::Pagination;
pub use config::BarConfig;
pub use export::{ExportSession, ExportWorkflow, MAX_EXPORT_QUANTITY};
pub use querybar::QueryBar;
pub use store::{
	ColumnHeader, EditorKind, ExportMode, Field, FieldType, HeaderBatch, HeaderReply, MemoryStore,
	QueryInput, Record, StoreError, StoreStatus, TableStore, find_bind_field, query_inputs,
};
pub use summary::{
	ComposedSummary, SummaryContext, SummaryEntry, SummarySpec, SummaryValue, render_summary,
	toggle_more,
};
