//! Renders the summary group: visible entries, separators, and the "more"
//! disclosure link with any expanded overflow below it.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::summary::{ComposedSummary, SummaryEntry};

/// Labels wider than this truncate with an ellipsis.
const MAX_LABEL_WIDTH: usize = 24;
const SEPARATOR: &str = " │ ";
pub(crate) const MORE_LINK: &str = "More";

fn truncate_label(label: &str) -> String {
	if label.width() <= MAX_LABEL_WIDTH {
		return label.to_string();
	}
	let mut out = String::new();
	for ch in label.chars() {
		if out.width() + 2 > MAX_LABEL_WIDTH {
			break;
		}
		out.push(ch);
	}
	out.push('…');
	out
}

fn entry_spans(entries: &[SummaryEntry]) -> Vec<Span<'static>> {
	let mut spans = Vec::with_capacity(entries.len() * 3);
	for entry in entries {
		spans.push(Span::styled(
			format!("{}: ", truncate_label(&entry.label)),
			Style::default().add_modifier(Modifier::DIM),
		));
		spans.push(Span::raw(entry.value.to_string()));
		if entry.separated {
			spans.push(Span::raw(SEPARATOR));
		}
	}
	spans
}

/// Build the primary summary line: visible entries plus the disclosure link
/// when overflow specs exist.
pub fn summary_line(summary: &ComposedSummary) -> Line<'static> {
	let mut spans = entry_spans(&summary.visible);
	if summary.has_more {
		let glyph = if summary.expanded.is_empty() {
			"▾"
		} else {
			"▴"
		};
		spans.push(Span::styled(
			format!("{MORE_LINK} {glyph}"),
			Style::default().add_modifier(Modifier::UNDERLINED),
		));
	}
	Line::from(spans)
}

/// Render the summary group into `area`; disclosed overflow entries take the
/// line below the visible ones when there is room.
pub fn render_summary_group(frame: &mut Frame, area: Rect, summary: &ComposedSummary) {
	if area.width == 0 || area.height == 0 || summary.is_empty() {
		return;
	}
	frame.render_widget(Paragraph::new(summary_line(summary)), area);

	if !summary.expanded.is_empty() && area.height > 1 {
		let below = Rect {
			x: area.x,
			y: area.y + 1,
			width: area.width,
			height: 1,
		};
		frame.render_widget(
			Paragraph::new(Line::from(entry_spans(&summary.expanded))),
			below,
		);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::summary::SummaryValue;

	fn entry(label: &str, value: f64, separated: bool) -> SummaryEntry {
		SummaryEntry {
			label: label.into(),
			value: SummaryValue::Number(value),
			separated,
		}
	}

	fn text_of(line: &Line<'_>) -> String {
		line.spans.iter().map(|span| span.content.as_ref()).collect()
	}

	#[test]
	fn separators_follow_the_entry_flag() {
		let summary = ComposedSummary {
			visible: vec![entry("A", 1.0, true), entry("B", 2.0, false)],
			expanded: Vec::new(),
			has_more: false,
		};
		assert_eq!(text_of(&summary_line(&summary)), "A: 1 │ B: 2");
	}

	#[test]
	fn more_link_tracks_disclosure_state() {
		let mut summary = ComposedSummary {
			visible: vec![entry("A", 1.0, true)],
			expanded: Vec::new(),
			has_more: true,
		};
		assert!(text_of(&summary_line(&summary)).ends_with("More ▾"));

		summary.expanded = vec![entry("C", 3.0, false)];
		assert!(text_of(&summary_line(&summary)).ends_with("More ▴"));
	}

	#[test]
	fn long_labels_truncate_with_ellipsis() {
		let summary = ComposedSummary {
			visible: vec![entry(
				"An exceedingly verbose aggregate label",
				1.0,
				false,
			)],
			expanded: Vec::new(),
			has_more: false,
		};
		let text = text_of(&summary_line(&summary));
		assert!(text.contains('…'));
		assert!(text.len() < 40);
	}
}
