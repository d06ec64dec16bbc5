//! Renders a composed button list as a single row of bracketed actions.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::buttons::{ButtonVariant, ComposedButton, ResolvedButton};

pub(crate) const MORE_LABEL: &str = "More";

/// Build the renderable line for a composed button list. Overflow entries
/// render as a single menu affordance carrying the folded count.
pub fn button_spans(buttons: &[ComposedButton]) -> Line<'static> {
	let mut spans: Vec<Span<'static>> = Vec::new();
	for button in buttons {
		if !spans.is_empty() {
			spans.push(Span::raw(" "));
		}
		match button {
			ComposedButton::Button(resolved) => spans.push(button_span(resolved)),
			ComposedButton::Raw(line) => spans.extend(line.spans.iter().cloned()),
			ComposedButton::More(folded) => spans.push(Span::styled(
				format!("[{MORE_LABEL} ▾ {}]", folded.len()),
				Style::default().add_modifier(Modifier::BOLD),
			)),
		}
	}
	Line::from(spans)
}

fn button_span(resolved: &ResolvedButton) -> Span<'static> {
	let props = &resolved.props;
	let text = match props.icon {
		Some(icon) => format!("[{icon} {}]", props.label),
		None => format!("[{}]", props.label),
	};
	let style = if props.disabled {
		Style::default().add_modifier(Modifier::DIM)
	} else {
		match props.variant {
			ButtonVariant::Submit => Style::default().add_modifier(Modifier::BOLD),
			ButtonVariant::Reset | ButtonVariant::Default => Style::default(),
		}
	};
	Span::styled(text, style)
}

/// Render the button row into `area`.
pub fn render_buttons(frame: &mut Frame, area: Rect, buttons: &[ComposedButton]) {
	if area.width == 0 || area.height == 0 {
		return;
	}
	frame.render_widget(Paragraph::new(button_spans(buttons)), area);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::buttons::{ActionKind, ButtonDefaults, ButtonEntry, compose_buttons};
	use crate::store::MemoryStore;

	#[test]
	fn line_carries_labels_and_folded_count() {
		let store = MemoryStore::new(vec![]);
		let entries: Vec<ButtonEntry> = [
			ActionKind::Add,
			ActionKind::Save,
			ActionKind::Query,
			ActionKind::Reset,
			ActionKind::Export,
		]
		.into_iter()
		.map(ButtonEntry::from)
		.collect();
		let composed = compose_buttons(&entries, &ButtonDefaults::default(), true, &store);

		let line = button_spans(&composed);
		let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
		assert!(text.contains("[+ Create]"));
		assert!(text.contains("[More ▾ 2]"));
		assert!(!text.contains("Reset"), "folded entries stay in the menu");
	}

	#[test]
	fn prebuilt_entries_pass_through() {
		let composed = vec![ComposedButton::Raw(Line::from("custom"))];
		let line = button_spans(&composed);
		assert_eq!(line.spans[0].content.as_ref(), "custom");
	}
}
