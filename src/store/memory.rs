//! In-memory [`TableStore`] implementation.
//!
//! Backs tests and small hosts that keep their rows in memory. Header
//! requests answer synchronously by default; deferred mode stashes the reply
//! so callers can exercise the in-flight window of the export workflow.

use std::cell::RefCell;

use crate::store::{
	ColumnHeader, ExportMode, Field, HeaderReply, Record, StoreError, StoreStatus, TableStore,
};

/// Owned, in-memory tabular store.
pub struct MemoryStore {
	status: StoreStatus,
	export_mode: ExportMode,
	fields: Vec<Field>,
	query_fields: Vec<Field>,
	records: Vec<Record>,
	selected: Vec<usize>,
	tree: bool,
	parent_has_current: Option<bool>,
	total_override: Option<usize>,
	defer_headers: bool,
	pending_replies: RefCell<Vec<HeaderReply>>,
	/// Export calls received, oldest first.
	pub exports: Vec<(Vec<ColumnHeader>, u32)>,
	/// Mutating operations received, oldest first.
	pub ops: Vec<&'static str>,
}

impl MemoryStore {
	pub fn new(fields: Vec<Field>) -> Self {
		Self {
			status: StoreStatus::Ready,
			export_mode: ExportMode::Server,
			fields,
			query_fields: Vec::new(),
			records: Vec::new(),
			selected: Vec::new(),
			tree: false,
			parent_has_current: None,
			total_override: None,
			defer_headers: false,
			pending_replies: RefCell::new(Vec::new()),
			exports: Vec::new(),
			ops: Vec::new(),
		}
	}

	pub fn with_records(mut self, records: Vec<Record>) -> Self {
		self.records = records;
		self
	}

	pub fn with_query_fields(mut self, fields: Vec<Field>) -> Self {
		self.query_fields = fields;
		self
	}

	pub fn with_status(mut self, status: StoreStatus) -> Self {
		self.status = status;
		self
	}

	pub fn with_export_mode(mut self, mode: ExportMode) -> Self {
		self.export_mode = mode;
		self
	}

	pub fn with_tree(mut self, tree: bool) -> Self {
		self.tree = tree;
		self
	}

	pub fn with_parent_has_current(mut self, current: Option<bool>) -> Self {
		self.parent_has_current = current;
		self
	}

	/// Report a server-side total larger than the loaded row count.
	pub fn with_total_count(mut self, total: usize) -> Self {
		self.total_override = Some(total);
		self
	}

	/// Hold header replies until [`MemoryStore::flush_header_requests`].
	pub fn with_deferred_headers(mut self) -> Self {
		self.defer_headers = true;
		self
	}

	pub fn set_status(&mut self, status: StoreStatus) {
		self.status = status;
	}

	pub fn select(&mut self, index: usize) {
		if index < self.records.len() && !self.selected.contains(&index) {
			self.selected.push(index);
		}
	}

	pub fn clear_selection(&mut self) {
		self.selected.clear();
	}

	fn header_rows(&self) -> Vec<ColumnHeader> {
		self.fields
			.iter()
			.map(|field| ColumnHeader::new(field.name.clone(), field.label.clone()))
			.collect()
	}

	/// Answer every deferred header request, oldest first.
	pub fn flush_header_requests(&self) {
		let pending = std::mem::take(&mut *self.pending_replies.borrow_mut());
		for reply in pending {
			reply.send(self.header_rows());
		}
	}

	/// Number of header requests currently held back.
	pub fn pending_header_requests(&self) -> usize {
		self.pending_replies.borrow().len()
	}

	fn remove_selected_rows(&mut self) {
		let mut doomed = std::mem::take(&mut self.selected);
		doomed.sort_unstable();
		for index in doomed.into_iter().rev() {
			if index < self.records.len() {
				self.records.remove(index);
			}
		}
	}
}

impl TableStore for MemoryStore {
	fn status(&self) -> StoreStatus {
		self.status
	}

	fn selected_count(&self) -> usize {
		self.selected.len()
	}

	fn total_count(&self) -> usize {
		self.total_override.unwrap_or(self.records.len())
	}

	fn export_mode(&self) -> ExportMode {
		self.export_mode
	}

	fn fields(&self) -> &[Field] {
		&self.fields
	}

	fn records(&self) -> &[Record] {
		&self.records
	}

	fn query_fields(&self) -> &[Field] {
		&self.query_fields
	}

	fn is_tree(&self) -> bool {
		self.tree
	}

	fn parent_has_current(&self) -> Option<bool> {
		self.parent_has_current
	}

	fn create(&mut self) -> Result<(), StoreError> {
		self.ops.push("create");
		self.records.insert(0, Record::new());
		Ok(())
	}

	fn submit(&mut self) -> Result<(), StoreError> {
		self.ops.push("submit");
		Ok(())
	}

	fn delete_selected(&mut self) -> Result<(), StoreError> {
		self.ops.push("delete");
		self.remove_selected_rows();
		Ok(())
	}

	fn remove_selected(&mut self) -> Result<(), StoreError> {
		self.ops.push("remove");
		self.remove_selected_rows();
		Ok(())
	}

	fn reset(&mut self) -> Result<(), StoreError> {
		self.ops.push("reset");
		Ok(())
	}

	fn query(&mut self) -> Result<(), StoreError> {
		self.ops.push("query");
		Ok(())
	}

	fn export(&mut self, columns: Vec<ColumnHeader>, quantity: u32) -> Result<(), StoreError> {
		self.exports.push((columns, quantity));
		Ok(())
	}

	fn request_column_headers(&self, reply: HeaderReply) {
		if self.defer_headers {
			self.pending_replies.borrow_mut().push(reply);
		} else {
			reply.send(self.header_rows());
		}
	}

	fn expand_all(&mut self) {
		self.ops.push("expand_all");
	}

	fn collapse_all(&mut self) {
		self.ops.push("collapse_all");
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn store() -> MemoryStore {
		let mut record = Record::new();
		record.insert("amount".into(), 3.into());
		MemoryStore::new(vec![Field::new(
			"amount",
			"Amount",
			crate::store::FieldType::Number,
		)])
		.with_records(vec![record.clone(), record])
	}

	#[test]
	fn delete_removes_selected_rows() {
		let mut store = store();
		store.select(1);
		store.delete_selected().unwrap();
		assert_eq!(store.records().len(), 1);
		assert_eq!(store.selected_count(), 0);
	}

	#[test]
	fn total_count_can_exceed_loaded_rows() {
		let store = store().with_total_count(5000);
		assert_eq!(store.total_count(), 5000);
		assert_eq!(store.records().len(), 2);
	}

	#[test]
	fn deferred_headers_are_held_until_flush() {
		use std::sync::mpsc::channel;

		let store = store().with_deferred_headers();
		let (tx, rx) = channel();
		store.request_column_headers(HeaderReply { id: 7, tx });
		assert_eq!(store.pending_header_requests(), 1);
		assert!(rx.try_recv().is_err());

		store.flush_header_requests();
		let batch = rx.try_recv().expect("flushed reply");
		assert_eq!(batch.id, 7);
		assert_eq!(batch.headers[0].name, "amount");
	}
}
