//! Query-bar variant selection.
//!
//! Exactly one presentation renders per pass: a built-in bar layout, a
//! caller-supplied renderer, the minimal actions-only form, or nothing. The
//! built-ins and the caller hook implement the same [`BarRenderer`] strategy
//! and receive an identical props bundle.

use std::fmt;
use std::rc::Rc;

use ratatui::Frame;
use ratatui::layout::Rect;
use serde::Deserialize;
use tracing::debug;

use crate::buttons::ComposedButton;
use crate::components::{AdvancedBar, FilterBar, Pagination, ProfessionalBar, Toolbar};
use crate::config::BarConfig;
use crate::store::{Field, QueryInput, TableStore};
use crate::summary::ComposedSummary;

/// The props bundle handed to whichever renderer wins selection.
pub struct BarContext<'a> {
	pub store: &'a dyn TableStore,
	/// Ordered query-input sub-store fields.
	pub query_fields: &'a [Field],
	pub buttons: &'a [ComposedButton],
	pub pagination: Option<&'a Pagination>,
	/// One renderable input per unbound query field.
	pub query_inputs: &'a [QueryInput],
	pub query_fields_limit: usize,
	pub summary_fields_limit: usize,
	pub summary: &'a ComposedSummary,
}

/// Uniform rendering strategy for built-in bar layouts and caller hooks.
pub trait BarRenderer {
	fn render(&self, frame: &mut Frame, area: Rect, ctx: &BarContext<'_>);
}

/// Configured presentation mode of the query bar.
#[derive(Clone, Default)]
pub enum BarVariant {
	/// No query bar; only the minimal actions-only form renders.
	Suppressed,
	#[default]
	Normal,
	FilterBar,
	AdvancedBar,
	ProfessionalBar,
	/// Caller-supplied renderer, invoked verbatim with the props bundle.
	Custom(Rc<dyn BarRenderer>),
	/// A tag from configuration that matched no known variant; resolved per
	/// [`BarFallback`] at selection time.
	Named(String),
}

impl fmt::Debug for BarVariant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			BarVariant::Suppressed => f.write_str("Suppressed"),
			BarVariant::Normal => f.write_str("Normal"),
			BarVariant::FilterBar => f.write_str("FilterBar"),
			BarVariant::AdvancedBar => f.write_str("AdvancedBar"),
			BarVariant::ProfessionalBar => f.write_str("ProfessionalBar"),
			BarVariant::Custom(_) => f.write_str("Custom(..)"),
			BarVariant::Named(tag) => f.debug_tuple("Named").field(tag).finish(),
		}
	}
}

impl BarVariant {
	/// Parse a configured tag. Unknown tags are preserved as
	/// [`BarVariant::Named`] so the fallback choice applies at selection.
	pub fn from_name(name: &str) -> Self {
		match name {
			"none" | "suppressed" => BarVariant::Suppressed,
			"normal" => BarVariant::Normal,
			"bar" | "filter-bar" => BarVariant::FilterBar,
			"advanced-bar" => BarVariant::AdvancedBar,
			"professional-bar" => BarVariant::ProfessionalBar,
			other => BarVariant::Named(other.to_string()),
		}
	}

	pub fn custom(renderer: impl BarRenderer + 'static) -> Self {
		BarVariant::Custom(Rc::new(renderer))
	}
}

/// What to render when a configured variant tag is unrecognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarFallback {
	/// Render nothing from the selector (the historical behavior).
	#[default]
	Nothing,
	/// Fall back to the minimal actions-only form.
	Minimal,
}

/// Outcome of variant selection for one render pass.
pub enum BarSelection {
	/// Render nothing from the selector.
	Nothing,
	/// Render the minimal actions-only form, pagination as a sibling.
	Minimal,
	/// Delegate to this renderer with the full props bundle.
	Bar(Rc<dyn BarRenderer>),
}

impl fmt::Debug for BarSelection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			BarSelection::Nothing => f.write_str("Nothing"),
			BarSelection::Minimal => f.write_str("Minimal"),
			BarSelection::Bar(_) => f.write_str("Bar(..)"),
		}
	}
}

/// Resolve which presentation renders.
///
/// An explicit `show_query_bar = false` override or a suppressed variant
/// forces the minimal form. A custom renderer wins verbatim. Otherwise the
/// variant tag dispatches to exactly one built-in; unrecognized configured
/// tags resolve per `config.fallback` rather than silently guessing.
pub fn select_bar(
	variant: &BarVariant,
	show_query_bar: Option<bool>,
	config: &BarConfig,
) -> BarSelection {
	if show_query_bar == Some(false) || matches!(variant, BarVariant::Suppressed) {
		return BarSelection::Minimal;
	}
	match variant {
		BarVariant::Suppressed => BarSelection::Minimal,
		BarVariant::Normal => BarSelection::Bar(Rc::new(Toolbar)),
		BarVariant::FilterBar => BarSelection::Bar(Rc::new(FilterBar::new(
			config.filter_bar_field_name.clone(),
			config.filter_bar_placeholder.clone(),
		))),
		BarVariant::AdvancedBar => BarSelection::Bar(Rc::new(AdvancedBar)),
		BarVariant::ProfessionalBar => BarSelection::Bar(Rc::new(ProfessionalBar)),
		BarVariant::Custom(renderer) => BarSelection::Bar(renderer.clone()),
		BarVariant::Named(tag) => {
			debug!(%tag, "unrecognized query bar variant");
			match config.fallback {
				BarFallback::Nothing => BarSelection::Nothing,
				BarFallback::Minimal => BarSelection::Minimal,
			}
		}
	}
}
