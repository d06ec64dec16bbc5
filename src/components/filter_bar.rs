//! Inline filter bar: a single search input bound to one query field, with
//! actions beside it and the summary below.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::bar::{BarContext, BarRenderer};
use crate::components::buttons::{button_spans, render_buttons};
use crate::components::pagination::render_pagination;
use crate::components::summary::render_summary_group;

pub struct FilterBar {
	field_name: String,
	placeholder: Option<String>,
}

impl FilterBar {
	pub fn new(field_name: String, placeholder: Option<String>) -> Self {
		Self {
			field_name,
			placeholder,
		}
	}

	fn input_line(&self) -> Line<'static> {
		let hint = self
			.placeholder
			.clone()
			.unwrap_or_else(|| format!("filter by {}", self.field_name));
		Line::from(vec![
			Span::raw("⌕ "),
			Span::styled(hint, Style::default().add_modifier(Modifier::DIM)),
		])
	}
}

impl BarRenderer for FilterBar {
	fn render(&self, frame: &mut Frame, area: Rect, ctx: &BarContext<'_>) {
		if area.width == 0 || area.height == 0 {
			return;
		}
		let [top, bottom] =
			Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

		let buttons_width = button_spans(ctx.buttons).width() as u16;
		let [input_area, buttons_area] =
			Layout::horizontal([Constraint::Min(1), Constraint::Length(buttons_width)]).areas(top);
		frame.render_widget(Paragraph::new(self.input_line()), input_area);
		render_buttons(frame, buttons_area, ctx.buttons);

		let [summary_area, pagination_area] =
			Layout::horizontal([Constraint::Min(1), Constraint::Length(20)]).areas(bottom);
		render_summary_group(frame, summary_area, ctx.summary);
		if let Some(pagination) = ctx.pagination {
			render_pagination(frame, pagination_area, pagination);
		}
	}
}
