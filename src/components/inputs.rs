//! Renders query input elements as inline editor placeholders.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::store::{EditorKind, QueryInput};

fn editor_glyph(kind: EditorKind) -> &'static str {
	match kind {
		EditorKind::Text => "____",
		EditorKind::Number => "   0",
		EditorKind::Date => "yyyy-mm-dd",
		EditorKind::Toggle => "[ ]",
		EditorKind::Lookup => "…",
	}
}

/// Build a single line showing up to `limit` query inputs; the remainder is
/// summarized as a count so the bar stays one row tall.
pub fn query_input_spans(inputs: &[QueryInput], limit: usize) -> Line<'static> {
	let mut spans: Vec<Span<'static>> = Vec::new();
	let visible = inputs.len().min(limit);
	for input in &inputs[..visible] {
		if !spans.is_empty() {
			spans.push(Span::raw("  "));
		}
		spans.push(Span::styled(
			format!("{}: ", input.label),
			Style::default().add_modifier(Modifier::DIM),
		));
		spans.push(Span::raw(editor_glyph(input.kind)));
	}
	if inputs.len() > visible {
		spans.push(Span::styled(
			format!("  +{} more", inputs.len() - visible),
			Style::default().add_modifier(Modifier::DIM),
		));
	}
	Line::from(spans)
}
