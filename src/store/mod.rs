//! Data-store collaborator seam.
//!
//! The bar never owns tabular data; it borrows a [`TableStore`] per call and
//! reads field metadata, status, and selection from it. Mutations (create,
//! submit, export, ...) go through the same trait so the store can serialize
//! its own state transitions however it likes.

use std::sync::mpsc::Sender;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

mod memory;

pub use memory::MemoryStore;

/// A single loaded row: ordered field-name to cell-value map.
pub type Record = serde_json::Map<String, Value>;

/// Failure reported by a store operation.
#[derive(Debug, Error)]
pub enum StoreError {
	/// The store rejected or failed an operation.
	#[error("{op} failed: {message}")]
	Operation {
		op: &'static str,
		message: String,
	},
}

impl StoreError {
	pub fn operation(op: &'static str, message: impl Into<String>) -> Self {
		Self::Operation {
			op,
			message: message.into(),
		}
	}
}

/// Lifecycle status of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreStatus {
	#[default]
	Ready,
	Loading,
	Submitting,
}

/// Where the export operation materializes its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportMode {
	#[default]
	Server,
	Client,
}

/// Declared type of a field in the store's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
	Text,
	Number,
	Currency,
	Boolean,
	Date,
	/// Reference type: the stored value is a key, a bound sibling field
	/// holds the human-readable text.
	Object,
}

impl FieldType {
	/// Whether values of this type participate in summary sums.
	pub fn is_aggregable(self) -> bool {
		matches!(self, FieldType::Number | FieldType::Currency)
	}
}

/// Field metadata, owned by the store and read-only to the bar.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Field {
	pub name: String,
	pub label: String,
	#[serde(rename = "type")]
	pub field_type: FieldType,
	/// Bind target of the form `"<field>.<property>"` linking this field to
	/// a property of an object-typed sibling.
	#[serde(default)]
	pub bind: Option<String>,
	/// For object fields, the property holding the display text.
	#[serde(default)]
	pub text_field: Option<String>,
}

impl Field {
	pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			label: label.into(),
			field_type,
			bind: None,
			text_field: None,
		}
	}

	pub fn bound_to(mut self, target: impl Into<String>) -> Self {
		self.bind = Some(target.into());
		self
	}

	pub fn with_text_field(mut self, property: impl Into<String>) -> Self {
		self.text_field = Some(property.into());
		self
	}
}

/// Find the sibling field bound to `field`'s text property.
///
/// An object field declares which of its properties carries display text via
/// `text_field`; the sibling binds to `"<field>.<property>"`. Returns `None`
/// when the field declares no text property or nothing binds to it.
pub fn find_bind_field<'a>(field: &Field, fields: &'a [Field]) -> Option<&'a Field> {
	let property = field.text_field.as_deref()?;
	let target = format!("{}.{}", field.name, property);
	fields
		.iter()
		.find(|candidate| candidate.bind.as_deref() == Some(target.as_str()))
}

/// One column header returned by [`TableStore::request_column_headers`], and
/// equally one entry of the ordered name-to-label export mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
	pub name: String,
	pub label: String,
}

impl ColumnHeader {
	pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: label.into(),
		}
	}
}

/// A batch of column headers tagged with the request it answers.
#[derive(Debug)]
pub struct HeaderBatch {
	pub(crate) id: u64,
	pub(crate) headers: Vec<ColumnHeader>,
}

/// One-shot reply handle for a column-header request.
///
/// The store may answer synchronously inside `request_column_headers` or hand
/// the reply to its own worker and answer later; either way the result lands
/// on the requesting workflow's channel tagged with the originating request
/// id, so stale answers can be discarded.
#[derive(Debug)]
pub struct HeaderReply {
	pub(crate) id: u64,
	pub(crate) tx: Sender<HeaderBatch>,
}

impl HeaderReply {
	/// Deliver the headers. Consumes the reply; each request is answered at
	/// most once.
	pub fn send(self, headers: Vec<ColumnHeader>) {
		let _ = self.tx.send(HeaderBatch {
			id: self.id,
			headers,
		});
	}
}

/// Editor widget kind derived from a query field's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
	Text,
	Number,
	Date,
	Toggle,
	Lookup,
}

/// Pick the editor kind for a query field.
pub fn editor_for_field(field: &Field) -> EditorKind {
	match field.field_type {
		FieldType::Number | FieldType::Currency => EditorKind::Number,
		FieldType::Date => EditorKind::Date,
		FieldType::Boolean => EditorKind::Toggle,
		FieldType::Object => EditorKind::Lookup,
		FieldType::Text => EditorKind::Text,
	}
}

/// A renderable query input element for one unbound query field.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryInput {
	pub name: String,
	pub label: String,
	pub kind: EditorKind,
}

impl QueryInput {
	pub fn for_field(field: &Field) -> Self {
		Self {
			name: field.name.clone(),
			label: field.label.clone(),
			kind: editor_for_field(field),
		}
	}
}

/// The tabular data store the bar composes against.
///
/// Read accessors are consulted on every composition pass; resolution is
/// always against the current snapshot, never a subscription.
pub trait TableStore {
	fn status(&self) -> StoreStatus;
	fn selected_count(&self) -> usize;
	fn total_count(&self) -> usize;
	fn export_mode(&self) -> ExportMode;
	/// Ordered field registry.
	fn fields(&self) -> &[Field];
	/// Currently loaded rows, in iteration order.
	fn records(&self) -> &[Record];

	fn field(&self, name: &str) -> Option<&Field> {
		self.fields().iter().find(|field| field.name == name)
	}

	/// Ordered query-input sub-store fields. Bound entries (those with a
	/// `bind` target) produce no query input.
	fn query_fields(&self) -> &[Field] {
		&[]
	}

	/// Whether rows form a hierarchy (enables expand/collapse actions).
	fn is_tree(&self) -> bool {
		false
	}

	/// `None` when this store is not a hierarchical child context; otherwise
	/// whether the parent store has a current row.
	fn parent_has_current(&self) -> Option<bool> {
		None
	}

	fn create(&mut self) -> Result<(), StoreError>;
	fn submit(&mut self) -> Result<(), StoreError>;
	fn delete_selected(&mut self) -> Result<(), StoreError>;
	fn remove_selected(&mut self) -> Result<(), StoreError>;
	fn reset(&mut self) -> Result<(), StoreError>;
	fn query(&mut self) -> Result<(), StoreError>;

	/// Run the bulk export with an ordered export-key to display-label
	/// mapping and a row quantity.
	fn export(&mut self, columns: Vec<ColumnHeader>, quantity: u32) -> Result<(), StoreError>;

	/// Fetch column headers for the export picker. May answer the reply
	/// synchronously or from a background worker.
	fn request_column_headers(&self, reply: HeaderReply);

	fn expand_all(&mut self) {}

	fn collapse_all(&mut self) {}
}

/// Build the ordered query input list: one element per unbound query field,
/// honoring per-name overrides supplied by the host.
pub fn query_inputs(
	store: &dyn TableStore,
	overrides: &std::collections::HashMap<String, QueryInput>,
) -> Vec<QueryInput> {
	store
		.query_fields()
		.iter()
		.filter(|field| field.bind.is_none())
		.map(|field| {
			overrides
				.get(&field.name)
				.cloned()
				.unwrap_or_else(|| QueryInput::for_field(field))
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn object_with_sibling() -> Vec<Field> {
		vec![
			Field::new("owner", "Owner", FieldType::Object).with_text_field("codeName"),
			Field::new("codeName", "Owner name", FieldType::Text).bound_to("owner.codeName"),
			Field::new("amount", "Amount", FieldType::Currency),
		]
	}

	#[test]
	fn bind_sibling_resolves_by_text_field_convention() {
		let fields = object_with_sibling();
		let bound = find_bind_field(&fields[0], &fields).expect("sibling");
		assert_eq!(bound.name, "codeName");
	}

	#[test]
	fn bind_sibling_absent_without_text_field() {
		let mut fields = object_with_sibling();
		fields[0].text_field = None;
		assert!(find_bind_field(&fields[0], &fields).is_none());
	}

	#[test]
	fn bind_sibling_absent_when_nothing_binds() {
		let mut fields = object_with_sibling();
		fields[1].bind = Some("owner.somethingElse".into());
		assert!(find_bind_field(&fields[0], &fields).is_none());
	}

	#[test]
	fn editor_kind_follows_field_type() {
		let field = Field::new("due", "Due", FieldType::Date);
		assert_eq!(editor_for_field(&field), EditorKind::Date);
		let field = Field::new("price", "Price", FieldType::Currency);
		assert_eq!(editor_for_field(&field), EditorKind::Number);
	}

	#[test]
	fn query_inputs_skip_bound_fields() {
		let store = MemoryStore::new(vec![]).with_query_fields(object_with_sibling());
		let inputs = query_inputs(&store, &Default::default());
		let names: Vec<_> = inputs.iter().map(|input| input.name.as_str()).collect();
		assert_eq!(names, ["owner", "amount"]);
	}

	#[test]
	fn query_input_override_wins() {
		let store = MemoryStore::new(vec![]).with_query_fields(object_with_sibling());
		let mut overrides = std::collections::HashMap::new();
		overrides.insert(
			"amount".to_string(),
			QueryInput {
				name: "amount".into(),
				label: "Total amount".into(),
				kind: EditorKind::Text,
			},
		);
		let inputs = query_inputs(&store, &overrides);
		assert_eq!(inputs[1].label, "Total amount");
		assert_eq!(inputs[1].kind, EditorKind::Text);
	}
}
