//! Bar configuration surface.

use serde::Deserialize;

use crate::bar::{BarFallback, BarVariant};
use crate::buttons::ButtonDefaults;

/// Recognized configuration options for a [`QueryBar`](crate::QueryBar).
///
/// Deserializable so hosts can load it from their TOML configuration
/// alongside the rest of their UI settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BarConfig {
	/// How many query inputs render inline before the rest collapses.
	pub query_fields_limit: usize,
	/// How many summary entries render before the "more" disclosure.
	pub summary_fields_limit: usize,
	/// Query field the filter bar binds its single input to.
	pub filter_bar_field_name: String,
	/// Placeholder text for the filter bar input.
	pub filter_bar_placeholder: Option<String>,
	/// Tri-state visibility: `Some(false)` forces the minimal actions-only
	/// form; unset or `Some(true)` defer to the variant.
	pub show_query_bar: Option<bool>,
	/// Bar variant tag; unset means the normal toolbar.
	pub variant: Option<String>,
	/// Behavior for unrecognized variant tags.
	pub fallback: BarFallback,
	/// Shared properties applied to every composed button.
	pub button_defaults: ButtonDefaults,
}

impl Default for BarConfig {
	fn default() -> Self {
		Self {
			query_fields_limit: 1,
			summary_fields_limit: 3,
			filter_bar_field_name: "params".to_string(),
			filter_bar_placeholder: None,
			show_query_bar: None,
			variant: None,
			fallback: BarFallback::default(),
			button_defaults: ButtonDefaults::default(),
		}
	}
}

impl BarConfig {
	/// Parse a configuration document.
	pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
		toml::from_str(raw)
	}

	/// Resolve the configured variant tag, defaulting to the normal toolbar.
	pub fn resolved_variant(&self) -> BarVariant {
		self.variant
			.as_deref()
			.map(BarVariant::from_name)
			.unwrap_or_default()
	}
}
