//! Summary bar aggregation.
//!
//! A summary spec names a numeric field to sum across the loaded rows, or
//! supplies a compute function whose label/value pair is used verbatim. The
//! first `limit` entries render immediately; the remainder renders through
//! the same path when the user toggles the disclosure open.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

use crate::store::TableStore;

/// Context handed to compute-function specs.
pub struct SummaryContext<'a> {
	/// Configured visible-count limit.
	pub limit: usize,
	/// The owning data store.
	pub store: &'a dyn TableStore,
}

/// Rendered value of one summary entry.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryValue {
	Number(f64),
	Text(String),
}

impl fmt::Display for SummaryValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			// Whole sums print without a trailing ".0".
			SummaryValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
				write!(f, "{}", *n as i64)
			}
			SummaryValue::Number(n) => write!(f, "{n}"),
			SummaryValue::Text(text) => f.write_str(text),
		}
	}
}

/// One rendered label/value pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryEntry {
	pub label: String,
	pub value: SummaryValue,
	/// Whether a visual separator follows this entry. Pure layout, no state.
	pub separated: bool,
}

impl SummaryEntry {
	pub fn new(label: impl Into<String>, value: SummaryValue) -> Self {
		Self {
			label: label.into(),
			value,
			separated: false,
		}
	}
}

/// Declaration of one aggregate to display.
#[derive(Clone)]
pub enum SummarySpec {
	/// Sum the named field across loaded rows. Skipped silently unless the
	/// field resolves to a numeric-aggregable type.
	Field(String),
	/// Caller-supplied computation; its result is used verbatim.
	Compute(Rc<dyn Fn(&SummaryContext<'_>) -> SummaryEntry>),
}

impl fmt::Debug for SummarySpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SummarySpec::Field(name) => f.debug_tuple("Field").field(name).finish(),
			SummarySpec::Compute(_) => f.write_str("Compute(..)"),
		}
	}
}

impl From<&str> for SummarySpec {
	fn from(name: &str) -> Self {
		Self::Field(name.to_string())
	}
}

impl From<String> for SummarySpec {
	fn from(name: String) -> Self {
		Self::Field(name)
	}
}

impl SummarySpec {
	pub fn compute(f: impl Fn(&SummaryContext<'_>) -> SummaryEntry + 'static) -> Self {
		Self::Compute(Rc::new(f))
	}
}

/// Composed summary bar handed to renderers.
#[derive(Debug, Clone, Default)]
pub struct ComposedSummary {
	/// Entries within the visible-count limit.
	pub visible: Vec<SummaryEntry>,
	/// Currently disclosed overflow entries; empty means collapsed.
	pub expanded: Vec<SummaryEntry>,
	/// Whether overflow specs exist at all (controls the "more" toggle).
	pub has_more: bool,
}

impl ComposedSummary {
	pub fn is_empty(&self) -> bool {
		self.visible.is_empty() && self.expanded.is_empty() && !self.has_more
	}
}

/// Render one slice of the spec list into label/value entries.
///
/// `total` is the full spec-list length; a separator follows an entry when
/// the total exceeds `limit` or the entry is not last in this slice.
pub fn render_summary(
	slice: &[SummarySpec],
	total: usize,
	limit: usize,
	store: &dyn TableStore,
) -> Vec<SummaryEntry> {
	let mut entries = Vec::with_capacity(slice.len());
	for (index, spec) in slice.iter().enumerate() {
		let mut entry = match spec {
			SummarySpec::Field(name) => {
				let Some(field) = store.field(name) else {
					debug!(%name, "summary field missing from registry, skipping");
					continue;
				};
				if !field.field_type.is_aggregable() {
					debug!(%name, "summary field is not numeric-aggregable, skipping");
					continue;
				}
				SummaryEntry::new(field.label.clone(), SummaryValue::Number(sum_field(name, store)))
			}
			SummarySpec::Compute(compute) => compute(&SummaryContext { limit, store }),
		};
		entry.separated = total > limit || index != slice.len() - 1;
		entries.push(entry);
	}
	entries
}

/// Left-to-right sum of the named field over loaded rows, starting at 0 and
/// coercing non-numeric cells to 0.
fn sum_field(name: &str, store: &dyn TableStore) -> f64 {
	store.records().iter().fold(0.0, |sum, record| {
		sum + record.get(name).and_then(Value::as_f64).unwrap_or(0.0)
	})
}

/// Flip the disclosure state: collapse when expanded, otherwise aggregate
/// the overflow slice (specs at index >= `limit`) through [`render_summary`].
pub fn toggle_more(
	expanded: &mut Vec<SummaryEntry>,
	specs: &[SummarySpec],
	limit: usize,
	store: &dyn TableStore,
) {
	if expanded.is_empty() {
		let start = limit.min(specs.len());
		*expanded = render_summary(&specs[start..], specs.len(), limit, store);
	} else {
		expanded.clear();
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::store::{Field, FieldType, MemoryStore, Record};

	fn record(pairs: &[(&str, Value)]) -> Record {
		let mut record = Record::new();
		for (name, value) in pairs {
			record.insert((*name).to_string(), value.clone());
		}
		record
	}

	fn store() -> MemoryStore {
		MemoryStore::new(vec![
			Field::new("x", "Total X", FieldType::Number),
			Field::new("note", "Note", FieldType::Text),
			Field::new("price", "Price", FieldType::Currency),
		])
		.with_records(vec![
			record(&[("x", json!(2)), ("price", json!(1.5))]),
			record(&[("x", json!("bad")), ("price", json!(2.5))]),
			record(&[("x", json!(5))]),
		])
	}

	fn specs(names: &[&str]) -> Vec<SummarySpec> {
		names.iter().map(|name| SummarySpec::from(*name)).collect()
	}

	#[test]
	fn field_sum_coerces_non_numeric_to_zero() {
		let store = store();
		let entries = render_summary(&specs(&["x"]), 1, 3, &store);
		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].label, "Total X");
		assert_eq!(entries[0].value, SummaryValue::Number(7.0));
		assert_eq!(entries[0].value.to_string(), "7");
	}

	#[test]
	fn currency_fields_aggregate_too() {
		let store = store();
		let entries = render_summary(&specs(&["price"]), 1, 3, &store);
		assert_eq!(entries[0].value, SummaryValue::Number(4.0));
	}

	#[test]
	fn non_aggregable_and_unknown_fields_skip_silently() {
		let store = store();
		let entries = render_summary(&specs(&["note", "missing", "x"]), 3, 3, &store);
		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].label, "Total X");
	}

	#[test]
	fn compute_spec_result_is_used_verbatim() {
		let store = store();
		let specs = vec![SummarySpec::compute(|ctx| {
			SummaryEntry::new(
				format!("limit {}", ctx.limit),
				SummaryValue::Text(format!("{} rows", ctx.store.records().len())),
			)
		})];
		let entries = render_summary(&specs, 1, 3, &store);
		assert_eq!(entries[0].label, "limit 3");
		assert_eq!(entries[0].value, SummaryValue::Text("3 rows".into()));
	}

	#[test]
	fn separators_mark_all_but_last_within_limit() {
		let store = store();
		let entries = render_summary(&specs(&["x", "price"]), 2, 3, &store);
		assert!(entries[0].separated);
		assert!(!entries[1].separated);
	}

	#[test]
	fn separators_mark_everything_when_total_exceeds_limit() {
		let store = store();
		let all = specs(&["x", "price", "x", "price"]);
		let entries = render_summary(&all[..3], all.len(), 3, &store);
		assert!(entries.iter().all(|entry| entry.separated));
	}

	#[test]
	fn toggle_on_empty_overflow_is_a_no_op() {
		let store = store();
		let specs = specs(&["x"]);
		let mut expanded = Vec::new();
		toggle_more(&mut expanded, &specs, 3, &store);
		assert!(expanded.is_empty());
		toggle_more(&mut expanded, &specs, 3, &store);
		assert!(expanded.is_empty());
	}

	#[test]
	fn toggle_expands_overflow_then_collapses() {
		let store = store();
		let specs = specs(&["x", "price", "x", "price"]);
		let mut expanded = Vec::new();

		toggle_more(&mut expanded, &specs, 3, &store);
		assert_eq!(expanded.len(), 1);
		assert_eq!(expanded[0].label, "Price");

		toggle_more(&mut expanded, &specs, 3, &store);
		assert!(expanded.is_empty());
	}
}
