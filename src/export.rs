//! Export workflow: column picker session and header-fetch runtime.
//!
//! Opening the workflow asks the store for its column headers. The store may
//! answer from a background worker, so results come back over a channel
//! tagged with a request id; only the id of the most recent open is honored,
//! which keeps a superseded open from reviving a discarded session. Once the
//! headers arrive the picker session exists until the user confirms or
//! cancels, or the owning widget is dropped.

use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};

use ratatui::widgets::TableState;
use throbber_widgets_tui::ThrobberState;
use tracing::debug;

use crate::store::{
	ColumnHeader, ExportMode, FieldType, HeaderBatch, HeaderReply, StoreError, TableStore,
	find_bind_field,
};

/// Upper bound of the export row-quantity input.
pub const MAX_EXPORT_QUANTITY: u32 = 1000;

/// Channel plumbing for column-header requests.
struct HeaderFetch {
	tx: Sender<HeaderBatch>,
	rx: Receiver<HeaderBatch>,
	next_id: u64,
	current_id: Option<u64>,
}

impl HeaderFetch {
	fn new() -> Self {
		let (tx, rx) = channel();
		Self {
			tx,
			rx,
			next_id: 0,
			current_id: None,
		}
	}

	/// Mint a reply handle for a fresh request, superseding any outstanding
	/// one.
	fn request(&mut self) -> HeaderReply {
		self.next_id = self.next_id.wrapping_add(1);
		self.current_id = Some(self.next_id);
		HeaderReply {
			id: self.next_id,
			tx: self.tx.clone(),
		}
	}

	fn try_recv(&self) -> Result<HeaderBatch, TryRecvError> {
		self.rx.try_recv()
	}

	fn is_current(&self, id: u64) -> bool {
		self.current_id == Some(id)
	}

	fn clear(&mut self) {
		self.current_id = None;
	}
}

/// Ephemeral column-picker state backing one export confirmation dialog.
///
/// Rows snapshot the store's column headers at open time, all pre-selected.
/// The session dies with confirm, cancel, a superseding open, or teardown.
pub struct ExportSession {
	columns: Vec<ColumnHeader>,
	selected: Vec<bool>,
	quantity: u32,
	quantity_enabled: bool,
	/// Cursor state for the picker table.
	pub table_state: TableState,
}

impl ExportSession {
	pub(crate) fn new(columns: Vec<ColumnHeader>, total_count: u32, quantity_enabled: bool) -> Self {
		let mut table_state = TableState::default();
		if !columns.is_empty() {
			table_state.select(Some(0));
		}
		let selected = vec![true; columns.len()];
		Self {
			columns,
			selected,
			quantity: total_count.min(MAX_EXPORT_QUANTITY),
			quantity_enabled,
			table_state,
		}
	}

	pub fn columns(&self) -> &[ColumnHeader] {
		&self.columns
	}

	pub fn is_selected(&self, index: usize) -> bool {
		self.selected.get(index).copied().unwrap_or(false)
	}

	pub fn selected_count(&self) -> usize {
		self.selected.iter().filter(|selected| **selected).count()
	}

	pub fn quantity(&self) -> u32 {
		self.quantity
	}

	/// Whether the bounded quantity input is part of this session
	/// (client-side export only).
	pub fn quantity_enabled(&self) -> bool {
		self.quantity_enabled
	}

	pub fn set_quantity(&mut self, quantity: u32) {
		self.quantity = quantity.min(MAX_EXPORT_QUANTITY);
	}

	/// Append a typed digit to the quantity input.
	pub fn quantity_digit(&mut self, digit: u32) {
		if !self.quantity_enabled {
			return;
		}
		let grown = self.quantity.saturating_mul(10).saturating_add(digit.min(9));
		self.quantity = grown.min(MAX_EXPORT_QUANTITY);
	}

	/// Delete the last typed digit of the quantity input.
	pub fn quantity_backspace(&mut self) {
		if self.quantity_enabled {
			self.quantity /= 10;
		}
	}

	pub fn move_up(&mut self) {
		if let Some(selected) = self.table_state.selected()
			&& selected > 0
		{
			self.table_state.select(Some(selected - 1));
		}
	}

	pub fn move_down(&mut self) {
		if let Some(selected) = self.table_state.selected()
			&& selected + 1 < self.columns.len()
		{
			self.table_state.select(Some(selected + 1));
		}
	}

	/// Toggle selection of the row under the cursor.
	pub fn toggle_current(&mut self) {
		if let Some(index) = self.table_state.selected()
			&& let Some(selected) = self.selected.get_mut(index)
		{
			*selected = !*selected;
		}
	}
}

/// Export state machine: idle, collecting headers, or holding an open
/// picker session.
pub struct ExportWorkflow {
	fetch: HeaderFetch,
	session: Option<ExportSession>,
	fetch_in_flight: bool,
	/// Spinner shown while the header fetch is outstanding.
	pub throbber_state: ThrobberState,
}

impl Default for ExportWorkflow {
	fn default() -> Self {
		Self::new()
	}
}

impl ExportWorkflow {
	pub fn new() -> Self {
		Self {
			fetch: HeaderFetch::new(),
			session: None,
			fetch_in_flight: false,
			throbber_state: ThrobberState::default(),
		}
	}

	/// Whether a picker session is open.
	pub fn is_open(&self) -> bool {
		self.session.is_some()
	}

	/// Whether the workflow is between open and confirm/cancel, including
	/// the window where the header fetch is still outstanding.
	pub fn is_collecting(&self) -> bool {
		self.fetch_in_flight || self.session.is_some()
	}

	pub fn fetch_in_flight(&self) -> bool {
		self.fetch_in_flight
	}

	pub fn session(&self) -> Option<&ExportSession> {
		self.session.as_ref()
	}

	pub fn session_mut(&mut self) -> Option<&mut ExportSession> {
		self.session.as_mut()
	}

	/// Begin collecting: request column headers from the store. Any live
	/// session or outstanding fetch is discarded first; two sessions never
	/// coexist.
	pub fn open(&mut self, store: &dyn TableStore) {
		if self.session.take().is_some() {
			debug!("export: superseding open session");
		}
		self.fetch_in_flight = true;
		store.request_column_headers(self.fetch.request());
		debug!("export: column headers requested");
	}

	/// Drain completed header fetches, applying only the most recent
	/// request's result. Stale batches are dropped so a discarded session is
	/// never revived.
	pub fn pump(&mut self, store: &dyn TableStore) {
		loop {
			match self.fetch.try_recv() {
				Ok(batch) if self.fetch.is_current(batch.id) => {
					let quantity_enabled = store.export_mode() == ExportMode::Client;
					self.session = Some(ExportSession::new(
						batch.headers,
						store.total_count() as u32,
						quantity_enabled,
					));
					self.fetch_in_flight = false;
					self.fetch.clear();
					debug!("export: picker session opened");
				}
				Ok(batch) => {
					debug!(id = batch.id, "export: dropping stale header batch");
				}
				Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
			}
		}
		if self.fetch_in_flight {
			self.throbber_state.calc_next();
		}
	}

	/// Confirm the open session.
	///
	/// With zero columns selected this is a user-correctable no-op: nothing
	/// is reported and the session stays open. Otherwise the ordered export
	/// mapping is built, the store's export operation runs with it and the
	/// current quantity, and the session is discarded; a store failure
	/// propagates after the session is gone.
	pub fn confirm(&mut self, store: &mut dyn TableStore) -> Result<(), StoreError> {
		let Some(session) = &self.session else {
			return Ok(());
		};
		let columns = export_columns(session, store);
		if columns.is_empty() {
			debug!("export: confirm with no columns selected, keeping picker open");
			return Ok(());
		}
		let quantity = session.quantity;
		self.close();
		store.export(columns, quantity)
	}

	/// Discard any session and outstanding fetch without exporting.
	pub fn cancel(&mut self) {
		if self.is_collecting() {
			debug!("export: cancelled");
		}
		self.close();
	}

	fn close(&mut self) {
		self.session = None;
		self.fetch_in_flight = false;
		self.fetch.clear();
	}
}

/// Reduce the session's selection to the ordered export-key to label
/// mapping.
///
/// Object-typed fields export under their bound text sibling's name so the
/// output carries the human-readable value rather than an internal reference
/// key. The label is the picker row's label, which matches the field's
/// registered label.
fn export_columns(session: &ExportSession, store: &dyn TableStore) -> Vec<ColumnHeader> {
	session
		.columns
		.iter()
		.enumerate()
		.filter(|(index, _)| session.is_selected(*index))
		.map(|(_, column)| {
			let mut name = column.name.clone();
			if let Some(field) = store.field(&column.name)
				&& field.field_type == FieldType::Object
				&& let Some(bound) = find_bind_field(field, store.fields())
			{
				name = bound.name.clone();
			}
			ColumnHeader::new(name, column.label.clone())
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use super::*;
	use crate::store::{Field, MemoryStore, Record, StoreStatus};

	fn fields() -> Vec<Field> {
		vec![
			Field::new("owner", "Owner", FieldType::Object).with_text_field("codeName"),
			Field::new("codeName", "Owner name", FieldType::Text).bound_to("owner.codeName"),
			Field::new("amount", "Amount", FieldType::Number),
		]
	}

	fn store() -> MemoryStore {
		MemoryStore::new(fields()).with_records(vec![Record::new(), Record::new()])
	}

	fn open_session(workflow: &mut ExportWorkflow, store: &MemoryStore) {
		workflow.open(store);
		workflow.pump(store);
		assert!(workflow.is_open(), "session should open from sync headers");
	}

	#[test]
	fn open_snapshots_headers_preselected_with_total_quantity() {
		let store = store().with_total_count(42);
		let mut workflow = ExportWorkflow::new();
		open_session(&mut workflow, &store);

		let session = workflow.session().unwrap();
		assert_eq!(session.columns().len(), 3);
		assert_eq!(session.selected_count(), 3);
		assert_eq!(session.quantity(), 42);
	}

	#[test]
	fn default_quantity_clamps_to_maximum() {
		let store = store().with_total_count(50_000);
		let mut workflow = ExportWorkflow::new();
		open_session(&mut workflow, &store);
		assert_eq!(workflow.session().unwrap().quantity(), MAX_EXPORT_QUANTITY);
	}

	#[test]
	fn quantity_input_only_in_client_mode() {
		let store = store().with_export_mode(ExportMode::Client);
		let mut workflow = ExportWorkflow::new();
		open_session(&mut workflow, &store);
		assert!(workflow.session().unwrap().quantity_enabled());

		let store = self::store();
		let mut workflow = ExportWorkflow::new();
		open_session(&mut workflow, &store);
		assert!(!workflow.session().unwrap().quantity_enabled());
	}

	#[test]
	fn quantity_digits_are_bounded() {
		let store = store().with_export_mode(ExportMode::Client);
		let mut workflow = ExportWorkflow::new();
		open_session(&mut workflow, &store);

		let session = workflow.session_mut().unwrap();
		session.set_quantity(0);
		session.quantity_digit(9);
		session.quantity_digit(9);
		assert_eq!(session.quantity(), 99);
		session.quantity_digit(9);
		session.quantity_digit(9);
		assert_eq!(session.quantity(), MAX_EXPORT_QUANTITY);
		session.quantity_backspace();
		assert_eq!(session.quantity(), 100);
	}

	#[test]
	fn confirm_with_nothing_selected_keeps_session_open() {
		let mut store = store();
		let mut workflow = ExportWorkflow::new();
		open_session(&mut workflow, &store);

		{
			let session = workflow.session_mut().unwrap();
			for _ in 0..session.columns().len() {
				session.toggle_current();
				session.move_down();
			}
			assert_eq!(session.selected_count(), 0);
		}

		workflow.confirm(&mut store).unwrap();
		assert!(workflow.is_open(), "no-op confirm must not close the picker");
		assert!(store.exports.is_empty(), "no export call may be recorded");
	}

	#[test]
	fn confirm_maps_object_field_to_bound_sibling_name() {
		let mut store = store().with_total_count(7);
		let mut workflow = ExportWorkflow::new();
		open_session(&mut workflow, &store);

		workflow.confirm(&mut store).unwrap();
		assert!(!workflow.is_open());

		let (columns, quantity) = &store.exports[0];
		assert_eq!(*quantity, 7);
		let names: Vec<_> = columns.iter().map(|column| column.name.as_str()).collect();
		assert_eq!(names, ["codeName", "codeName", "amount"]);
		assert_eq!(columns[0].label, "Owner");
	}

	#[test]
	fn object_field_without_sibling_keeps_its_own_name() {
		let mut fields = fields();
		fields[0].text_field = None;
		let mut store = MemoryStore::new(fields).with_records(vec![Record::new()]);
		let mut workflow = ExportWorkflow::new();
		open_session(&mut workflow, &store);

		workflow.confirm(&mut store).unwrap();
		let (columns, _) = &store.exports[0];
		assert_eq!(columns[0].name, "owner");
	}

	#[test]
	fn confirm_respects_deselection_and_order() {
		let mut store = store();
		let mut workflow = ExportWorkflow::new();
		open_session(&mut workflow, &store);

		{
			let session = workflow.session_mut().unwrap();
			session.move_down();
			session.toggle_current(); // drop "codeName"
		}
		workflow.confirm(&mut store).unwrap();

		let (columns, _) = &store.exports[0];
		let labels: Vec<_> = columns.iter().map(|column| column.label.as_str()).collect();
		assert_eq!(labels, ["Owner", "Amount"]);
	}

	/// Store that parks header replies so tests control delivery order.
	struct DeferredStore {
		inner: MemoryStore,
		replies: RefCell<Vec<HeaderReply>>,
	}

	impl DeferredStore {
		fn new() -> Self {
			Self {
				inner: store(),
				replies: RefCell::new(Vec::new()),
			}
		}

		fn answer(&self, index: usize, headers: Vec<ColumnHeader>) {
			let reply = self.replies.borrow_mut().remove(index);
			reply.send(headers);
		}
	}

	impl TableStore for DeferredStore {
		fn status(&self) -> StoreStatus {
			self.inner.status()
		}

		fn selected_count(&self) -> usize {
			self.inner.selected_count()
		}

		fn total_count(&self) -> usize {
			self.inner.total_count()
		}

		fn export_mode(&self) -> ExportMode {
			self.inner.export_mode()
		}

		fn fields(&self) -> &[Field] {
			self.inner.fields()
		}

		fn records(&self) -> &[Record] {
			self.inner.records()
		}

		fn create(&mut self) -> Result<(), StoreError> {
			self.inner.create()
		}

		fn submit(&mut self) -> Result<(), StoreError> {
			self.inner.submit()
		}

		fn delete_selected(&mut self) -> Result<(), StoreError> {
			self.inner.delete_selected()
		}

		fn remove_selected(&mut self) -> Result<(), StoreError> {
			self.inner.remove_selected()
		}

		fn reset(&mut self) -> Result<(), StoreError> {
			self.inner.reset()
		}

		fn query(&mut self) -> Result<(), StoreError> {
			self.inner.query()
		}

		fn export(&mut self, columns: Vec<ColumnHeader>, quantity: u32) -> Result<(), StoreError> {
			self.inner.export(columns, quantity)
		}

		fn request_column_headers(&self, reply: HeaderReply) {
			self.replies.borrow_mut().push(reply);
		}
	}

	#[test]
	fn superseding_open_drops_the_stale_fetch() {
		let store = DeferredStore::new();
		let mut workflow = ExportWorkflow::new();

		workflow.open(&store);
		workflow.open(&store);
		assert_eq!(store.replies.borrow().len(), 2);

		// First (stale) fetch resolves: nothing may open from it.
		store.answer(0, vec![ColumnHeader::new("stale", "Stale")]);
		workflow.pump(&store);
		assert!(!workflow.is_open());
		assert!(workflow.fetch_in_flight());

		// Second (current) fetch resolves into the one active session.
		store.answer(0, vec![ColumnHeader::new("fresh", "Fresh")]);
		workflow.pump(&store);
		let session = workflow.session().unwrap();
		assert_eq!(session.columns().len(), 1);
		assert_eq!(session.columns()[0].name, "fresh");
	}

	#[test]
	fn stale_result_cannot_revive_a_cancelled_session() {
		let store = DeferredStore::new();
		let mut workflow = ExportWorkflow::new();

		workflow.open(&store);
		workflow.cancel();
		store.answer(0, vec![ColumnHeader::new("late", "Late")]);
		workflow.pump(&store);
		assert!(!workflow.is_open());
		assert!(!workflow.is_collecting());
	}

	#[test]
	fn cancel_discards_without_export_call() {
		let mut store = store();
		let mut workflow = ExportWorkflow::new();
		open_session(&mut workflow, &store);
		workflow.cancel();
		assert!(!workflow.is_open());
		workflow.confirm(&mut store).unwrap();
		assert!(store.exports.is_empty());
	}
}
