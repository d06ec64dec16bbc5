//! Action button resolution and composition.
//!
//! Symbolic actions resolve against the live store snapshot on every pass, so
//! enabled state always reflects current status and selection. Composition
//! folds excess buttons into an overflow menu when a summary bar shares the
//! row with them.

use std::fmt;
use std::rc::Rc;

use ratatui::text::Line;
use serde::Deserialize;
use tracing::debug;

use crate::store::{StoreError, StoreStatus, TableStore};

/// Raw entries beyond this count fold into an overflow menu when a summary
/// bar is present.
pub(crate) const OVERFLOW_THRESHOLD: usize = 4;
/// Raw entries kept inline when folding applies.
pub(crate) const INLINE_KEEP: usize = 3;

/// Built-in actions addressable by symbolic id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
	Add,
	Save,
	Delete,
	Remove,
	Reset,
	Query,
	Export,
	ExpandAll,
	CollapseAll,
}

/// Visual emphasis of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonVariant {
	#[default]
	Default,
	Submit,
	Reset,
}

/// What a button does when activated.
#[derive(Clone)]
pub enum ClickAction {
	Create,
	Submit,
	DeleteSelected,
	RemoveSelected,
	Reset,
	Query,
	Export,
	ExpandAll,
	CollapseAll,
	Custom(Rc<dyn Fn() -> Result<(), StoreError>>),
}

impl fmt::Debug for ClickAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let tag = match self {
			ClickAction::Create => "Create",
			ClickAction::Submit => "Submit",
			ClickAction::DeleteSelected => "DeleteSelected",
			ClickAction::RemoveSelected => "RemoveSelected",
			ClickAction::Reset => "Reset",
			ClickAction::Query => "Query",
			ClickAction::Export => "Export",
			ClickAction::ExpandAll => "ExpandAll",
			ClickAction::CollapseAll => "CollapseAll",
			ClickAction::Custom(_) => "Custom(..)",
		};
		f.write_str(tag)
	}
}

/// Fully resolved button specification.
#[derive(Debug, Clone)]
pub struct ButtonProps {
	pub icon: Option<&'static str>,
	pub label: String,
	pub disabled: bool,
	pub variant: ButtonVariant,
	pub action: ClickAction,
}

impl ButtonProps {
	pub fn custom(
		label: impl Into<String>,
		action: impl Fn() -> Result<(), StoreError> + 'static,
	) -> Self {
		Self {
			icon: None,
			label: label.into(),
			disabled: false,
			variant: ButtonVariant::Default,
			action: ClickAction::Custom(Rc::new(action)),
		}
	}
}

/// Hook invoked after a button's primary handler settles.
pub type AfterClick = Rc<dyn Fn()>;

/// Per-entry adjustments layered over a symbolic resolution.
#[derive(Clone, Default)]
pub struct ButtonOverrides {
	pub label: Option<String>,
	pub icon: Option<&'static str>,
	pub disabled: Option<bool>,
	pub after_click: Option<AfterClick>,
}

impl fmt::Debug for ButtonOverrides {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ButtonOverrides")
			.field("label", &self.label)
			.field("icon", &self.icon)
			.field("disabled", &self.disabled)
			.field("after_click", &self.after_click.is_some())
			.finish()
	}
}

/// One raw action entry handed to the composer.
#[derive(Debug, Clone)]
pub enum ButtonEntry {
	/// A built-in action, resolved lazily against the store.
	Symbolic(ActionKind, ButtonOverrides),
	/// A fully caller-built descriptor.
	Descriptor(ButtonProps),
	/// An already-rendered element, passed through untouched.
	Prebuilt(Line<'static>),
}

impl ButtonEntry {
	pub fn symbolic(kind: ActionKind) -> Self {
		Self::Symbolic(kind, ButtonOverrides::default())
	}
}

impl From<ActionKind> for ButtonEntry {
	fn from(kind: ActionKind) -> Self {
		Self::symbolic(kind)
	}
}

/// Shared properties applied to every composed button, threaded explicitly
/// into composition rather than read from ambient configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ButtonDefaults {
	/// Render the leading icon glyph.
	pub show_icons: bool,
	/// Pad labels to at least this many columns.
	pub min_label_width: u16,
}

impl Default for ButtonDefaults {
	fn default() -> Self {
		Self {
			show_icons: true,
			min_label_width: 0,
		}
	}
}

/// A button that survived resolution, ready to render and activate.
#[derive(Debug, Clone)]
pub struct ResolvedButton {
	pub props: ButtonProps,
	pub after_click: Option<AfterClickField>,
}

/// Newtype so [`ResolvedButton`] stays debuggable around the hook closure.
#[derive(Clone)]
pub struct AfterClickField(pub AfterClick);

impl fmt::Debug for AfterClickField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("AfterClick(..)")
	}
}

/// Output of one composition pass.
#[derive(Debug, Clone)]
pub enum ComposedButton {
	Button(ResolvedButton),
	Raw(Line<'static>),
	/// Overflow menu holding the folded remainder, in original order.
	More(Vec<ComposedButton>),
}

/// Resolve a symbolic action against the current store snapshot.
///
/// Returns `None` for actions that do not apply (expand/collapse on a flat
/// store); callers omit absent actions rather than padding with placeholders.
/// Resolution is idempotent for an unchanged snapshot.
pub fn resolve_action(kind: ActionKind, store: &dyn TableStore) -> Option<ButtonProps> {
	let busy = store.status() != StoreStatus::Ready;
	let none_selected = store.selected_count() == 0;
	match kind {
		ActionKind::Add => Some(ButtonProps {
			icon: Some("+"),
			label: "Create".into(),
			disabled: busy || store.parent_has_current() == Some(false),
			variant: ButtonVariant::Default,
			action: ClickAction::Create,
		}),
		ActionKind::Save => Some(ButtonProps {
			icon: Some("✓"),
			label: "Save".into(),
			disabled: busy,
			variant: ButtonVariant::Submit,
			action: ClickAction::Submit,
		}),
		ActionKind::Delete => Some(ButtonProps {
			icon: Some("✕"),
			label: "Delete".into(),
			disabled: busy || none_selected,
			variant: ButtonVariant::Default,
			action: ClickAction::DeleteSelected,
		}),
		ActionKind::Remove => Some(ButtonProps {
			icon: Some("−"),
			label: "Remove".into(),
			disabled: busy || none_selected,
			variant: ButtonVariant::Default,
			action: ClickAction::RemoveSelected,
		}),
		ActionKind::Reset => Some(ButtonProps {
			icon: Some("↺"),
			label: "Reset".into(),
			disabled: false,
			variant: ButtonVariant::Reset,
			action: ClickAction::Reset,
		}),
		ActionKind::Query => Some(ButtonProps {
			icon: Some("⌕"),
			label: "Query".into(),
			disabled: false,
			variant: ButtonVariant::Default,
			action: ClickAction::Query,
		}),
		ActionKind::Export => Some(ButtonProps {
			icon: Some("⇪"),
			label: "Export".into(),
			disabled: false,
			variant: ButtonVariant::Default,
			action: ClickAction::Export,
		}),
		ActionKind::ExpandAll => store.is_tree().then(|| ButtonProps {
			icon: Some("▸"),
			label: "Expand all".into(),
			disabled: false,
			variant: ButtonVariant::Default,
			action: ClickAction::ExpandAll,
		}),
		ActionKind::CollapseAll => store.is_tree().then(|| ButtonProps {
			icon: Some("▾"),
			label: "Collapse all".into(),
			disabled: false,
			variant: ButtonVariant::Default,
			action: ClickAction::CollapseAll,
		}),
	}
}

/// Compose the ordered renderable button list.
///
/// Folding rule: with a summary bar present and more than
/// [`OVERFLOW_THRESHOLD`] raw entries, raw indices `0..INLINE_KEEP` render
/// inline and the remainder becomes a single [`ComposedButton::More`].
/// Without a summary bar everything renders inline. Entries that resolve to
/// nothing are omitted from whichever slice they fall in.
pub fn compose_buttons(
	entries: &[ButtonEntry],
	defaults: &ButtonDefaults,
	has_summary: bool,
	store: &dyn TableStore,
) -> Vec<ComposedButton> {
	if entries.is_empty() {
		return Vec::new();
	}

	let fold = has_summary && entries.len() > OVERFLOW_THRESHOLD;
	let inline = if fold {
		&entries[..INLINE_KEEP]
	} else {
		entries
	};

	let mut composed = resolve_entries(inline, defaults, store);
	if fold {
		let folded = resolve_entries(&entries[INLINE_KEEP..], defaults, store);
		composed.push(ComposedButton::More(folded));
	}
	composed
}

fn resolve_entries(
	entries: &[ButtonEntry],
	defaults: &ButtonDefaults,
	store: &dyn TableStore,
) -> Vec<ComposedButton> {
	entries
		.iter()
		.filter_map(|entry| resolve_entry(entry, defaults, store))
		.collect()
}

fn resolve_entry(
	entry: &ButtonEntry,
	defaults: &ButtonDefaults,
	store: &dyn TableStore,
) -> Option<ComposedButton> {
	match entry {
		ButtonEntry::Symbolic(kind, overrides) => {
			let Some(mut props) = resolve_action(*kind, store) else {
				debug!(?kind, "omitting unresolvable action");
				return None;
			};
			if let Some(label) = &overrides.label {
				props.label = label.clone();
			}
			if let Some(icon) = overrides.icon {
				props.icon = Some(icon);
			}
			if let Some(disabled) = overrides.disabled {
				props.disabled = disabled;
			}
			apply_defaults(&mut props, defaults);
			Some(ComposedButton::Button(ResolvedButton {
				props,
				after_click: overrides.after_click.clone().map(AfterClickField),
			}))
		}
		ButtonEntry::Descriptor(props) => {
			let mut props = props.clone();
			apply_defaults(&mut props, defaults);
			Some(ComposedButton::Button(ResolvedButton {
				props,
				after_click: None,
			}))
		}
		ButtonEntry::Prebuilt(line) => Some(ComposedButton::Raw(line.clone())),
	}
}

fn apply_defaults(props: &mut ButtonProps, defaults: &ButtonDefaults) {
	if !defaults.show_icons {
		props.icon = None;
	}
	let width = usize::from(defaults.min_label_width);
	if props.label.len() < width {
		let pad = width - props.label.len();
		props.label.extend(std::iter::repeat_n(' ', pad));
	}
}
