//! Root widget gluing composition to the selected bar presentation.
//!
//! One [`QueryBar`] instance sits above one data table. Each draw pass
//! recomposes buttons, summary, and query inputs against the current store
//! snapshot, selects exactly one presentation, and overlays the export
//! modal when a session is open.

use std::collections::HashMap;

use ratatui::Frame;
use ratatui::crossterm::event::KeyEvent;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::bar::{BarContext, BarSelection, BarVariant, select_bar};
use crate::buttons::{ButtonEntry, ClickAction, ComposedButton, ResolvedButton, compose_buttons};
use crate::components::summary::summary_line;
use crate::components::{
	ModalAction, Pagination, handle_export_key, render_buttons, render_export_modal,
	render_export_pending, render_pagination, render_summary_group,
};
use crate::config::BarConfig;
use crate::export::ExportWorkflow;
use crate::store::{QueryInput, StoreError, TableStore, query_inputs};
use crate::summary::{ComposedSummary, SummaryEntry, SummarySpec, render_summary, toggle_more};

/// The control surface above a data table.
///
/// Owns action entries, summary specs, disclosure state, and the export
/// workflow. The data store is borrowed per call and never retained.
pub struct QueryBar {
	config: BarConfig,
	variant: BarVariant,
	buttons: Vec<ButtonEntry>,
	summary_specs: Vec<SummarySpec>,
	query_editors: HashMap<String, QueryInput>,
	pagination: Option<Pagination>,
	more_summary: Vec<SummaryEntry>,
	export: ExportWorkflow,
}

impl Drop for QueryBar {
	fn drop(&mut self) {
		// Teardown force-closes an open export modal, unconditionally.
		self.export.cancel();
	}
}

impl QueryBar {
	pub fn new(config: BarConfig) -> Self {
		let variant = config.resolved_variant();
		Self {
			config,
			variant,
			buttons: Vec::new(),
			summary_specs: Vec::new(),
			query_editors: HashMap::new(),
			pagination: None,
			more_summary: Vec::new(),
			export: ExportWorkflow::new(),
		}
	}

	/// Override the configured variant, e.g. with a custom renderer.
	pub fn with_variant(mut self, variant: BarVariant) -> Self {
		self.variant = variant;
		self
	}

	pub fn with_buttons(mut self, buttons: Vec<ButtonEntry>) -> Self {
		self.buttons = buttons;
		self
	}

	pub fn with_summary(mut self, specs: Vec<SummarySpec>) -> Self {
		self.summary_specs = specs;
		self
	}

	/// Register a pre-built query input for one field name.
	pub fn with_query_editor(mut self, editor: QueryInput) -> Self {
		self.query_editors.insert(editor.name.clone(), editor);
		self
	}

	pub fn set_pagination(&mut self, pagination: Option<Pagination>) {
		self.pagination = pagination;
	}

	pub fn config(&self) -> &BarConfig {
		&self.config
	}

	pub fn export_workflow(&self) -> &ExportWorkflow {
		&self.export
	}

	/// Whether a full query bar (as opposed to the minimal actions-only
	/// form) is in effect.
	pub fn show_query_bar(&self) -> bool {
		self.config.show_query_bar != Some(false)
			&& !matches!(self.variant, BarVariant::Suppressed)
	}

	/// Compose the renderable button list against the current snapshot.
	pub fn composed_buttons(&self, store: &dyn TableStore) -> Vec<ComposedButton> {
		compose_buttons(
			&self.buttons,
			&self.config.button_defaults,
			!self.summary_specs.is_empty(),
			store,
		)
	}

	/// Compose the summary bar: visible prefix plus current disclosure.
	pub fn composed_summary(&self, store: &dyn TableStore) -> ComposedSummary {
		if self.summary_specs.is_empty() {
			return ComposedSummary::default();
		}
		let limit = self.config.summary_fields_limit;
		let total = self.summary_specs.len();
		let visible = render_summary(
			&self.summary_specs[..limit.min(total)],
			total,
			limit,
			store,
		);
		ComposedSummary {
			visible,
			expanded: self.more_summary.clone(),
			has_more: total > limit,
		}
	}

	/// Flip the summary disclosure open or closed.
	pub fn toggle_more_summary(&mut self, store: &dyn TableStore) {
		toggle_more(
			&mut self.more_summary,
			&self.summary_specs,
			self.config.summary_fields_limit,
			store,
		);
	}

	/// Activate a composed button: run the primary handler, then the
	/// `after_click` hook exactly once regardless of outcome, then surface
	/// the primary result unchanged.
	pub fn activate(
		&mut self,
		store: &mut dyn TableStore,
		button: &ResolvedButton,
	) -> Result<(), StoreError> {
		if button.props.disabled {
			return Ok(());
		}
		let result = self.dispatch(store, &button.props.action);
		if let Some(hook) = &button.after_click {
			(hook.0)();
		}
		result
	}

	fn dispatch(
		&mut self,
		store: &mut dyn TableStore,
		action: &ClickAction,
	) -> Result<(), StoreError> {
		match action {
			ClickAction::Create => store.create(),
			ClickAction::Submit => store.submit(),
			ClickAction::DeleteSelected => store.delete_selected(),
			ClickAction::RemoveSelected => store.remove_selected(),
			ClickAction::Reset => store.reset(),
			ClickAction::Query => store.query(),
			ClickAction::Export => {
				self.export.open(store);
				Ok(())
			}
			ClickAction::ExpandAll => {
				store.expand_all();
				Ok(())
			}
			ClickAction::CollapseAll => {
				store.collapse_all();
				Ok(())
			}
			ClickAction::Custom(handler) => handler(),
		}
	}

	/// Drain background results. Call once per event-loop tick.
	pub fn pump(&mut self, store: &dyn TableStore) {
		self.export.pump(store);
	}

	/// Route a key event. Returns `Ok(true)` when the event was consumed by
	/// an open export modal.
	pub fn handle_key(
		&mut self,
		store: &mut dyn TableStore,
		key: KeyEvent,
	) -> Result<bool, StoreError> {
		let Some(session) = self.export.session_mut() else {
			return Ok(false);
		};
		match handle_export_key(session, key) {
			Some(ModalAction::Confirm) => self.export.confirm(store)?,
			Some(ModalAction::Cancel) => self.export.cancel(),
			None => {}
		}
		Ok(true)
	}

	/// Render one pass: compose, select a presentation, draw it, then
	/// overlay export state.
	pub fn draw(&mut self, frame: &mut Frame, area: Rect, store: &dyn TableStore) {
		if area.width == 0 || area.height == 0 {
			return;
		}

		let buttons = self.composed_buttons(store);
		let summary = self.composed_summary(store);
		let inputs = query_inputs(store, &self.query_editors);

		match select_bar(&self.variant, self.config.show_query_bar, &self.config) {
			BarSelection::Nothing => {}
			BarSelection::Minimal => {
				self.draw_minimal(frame, area, &buttons, &summary);
			}
			BarSelection::Bar(renderer) => {
				let ctx = BarContext {
					store,
					query_fields: store.query_fields(),
					buttons: &buttons,
					pagination: self.pagination.as_ref(),
					query_inputs: &inputs,
					query_fields_limit: self.config.query_fields_limit,
					summary_fields_limit: self.config.summary_fields_limit,
					summary: &summary,
				};
				renderer.render(frame, area, &ctx);
			}
		}

		if let Some(session) = self.export.session_mut() {
			render_export_modal(frame, area, session);
		} else if self.export.fetch_in_flight() {
			let width = area.width.min(20);
			let corner = Rect {
				x: area.x + area.width - width,
				y: area.y,
				width,
				height: 1,
			};
			render_export_pending(frame, corner, &self.export.throbber_state);
		}
	}

	/// Minimal actions-only form: buttons and summary share a row, the
	/// pagination element renders as a sibling beneath, and no query-input
	/// collection exists.
	fn draw_minimal(
		&self,
		frame: &mut Frame,
		area: Rect,
		buttons: &[ComposedButton],
		summary: &ComposedSummary,
	) {
		let [bar_row, sibling_row] =
			Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

		let summary_width = summary_line(summary).width() as u16;
		let [buttons_area, summary_area] =
			Layout::horizontal([Constraint::Min(1), Constraint::Length(summary_width)])
				.areas(bar_row);
		render_buttons(frame, buttons_area, buttons);
		render_summary_group(frame, summary_area, summary);

		if let Some(pagination) = &self.pagination {
			render_pagination(frame, sibling_row, pagination);
		}
	}
}
