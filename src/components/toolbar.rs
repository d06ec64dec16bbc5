//! Normal toolbar layout: actions and summary on the first row, query
//! inputs and pagination on the second.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Paragraph;

use crate::bar::{BarContext, BarRenderer};
use crate::components::buttons::render_buttons;
use crate::components::inputs::query_input_spans;
use crate::components::pagination::render_pagination;
use crate::components::summary::{render_summary_group, summary_line};

pub struct Toolbar;

impl BarRenderer for Toolbar {
	fn render(&self, frame: &mut Frame, area: Rect, ctx: &BarContext<'_>) {
		if area.width == 0 || area.height == 0 {
			return;
		}
		let [top, bottom] =
			Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

		let summary_width = summary_line(ctx.summary).width() as u16;
		let [buttons_area, summary_area] =
			Layout::horizontal([Constraint::Min(1), Constraint::Length(summary_width)]).areas(top);
		render_buttons(frame, buttons_area, ctx.buttons);
		render_summary_group(frame, summary_area, ctx.summary);

		let [inputs_area, pagination_area] =
			Layout::horizontal([Constraint::Min(1), Constraint::Length(20)]).areas(bottom);
		frame.render_widget(
			Paragraph::new(query_input_spans(ctx.query_inputs, ctx.query_fields_limit)),
			inputs_area,
		);
		if let Some(pagination) = ctx.pagination {
			render_pagination(frame, pagination_area, pagination);
		}
	}
}
