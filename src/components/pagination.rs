//! Pagination element supplied by the host and rendered beside the bar.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

/// Host-provided pagination state. The bar never computes paging; it only
/// places this element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
	/// 1-based current page.
	pub page: usize,
	pub pages: usize,
	pub total: usize,
}

/// Build the renderable pagination line.
pub fn pagination_line(pagination: &Pagination) -> Line<'static> {
	Line::from(format!(
		"‹ {}/{} › {} rows",
		pagination.page, pagination.pages, pagination.total
	))
}

/// Render pagination right-aligned into `area`.
pub fn render_pagination(frame: &mut Frame, area: Rect, pagination: &Pagination) {
	if area.width == 0 || area.height == 0 {
		return;
	}
	frame.render_widget(
		Paragraph::new(pagination_line(pagination)).alignment(Alignment::Right),
		area,
	);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn line_formats_page_and_total() {
		let line = pagination_line(&Pagination {
			page: 2,
			pages: 9,
			total: 423,
		});
		let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
		assert_eq!(text, "‹ 2/9 › 423 rows");
	}
}
