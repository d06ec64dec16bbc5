//! Professional bar: the summary group floats left of the actions, with the
//! query-input row beneath.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Paragraph;

use crate::bar::{BarContext, BarRenderer};
use crate::components::buttons::render_buttons;
use crate::components::inputs::query_input_spans;
use crate::components::pagination::render_pagination;
use crate::components::summary::{render_summary_group, summary_line};

pub struct ProfessionalBar;

impl BarRenderer for ProfessionalBar {
	fn render(&self, frame: &mut Frame, area: Rect, ctx: &BarContext<'_>) {
		if area.width == 0 || area.height == 0 {
			return;
		}
		let [top, bottom] =
			Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

		// Summary left, actions right.
		let summary_width = summary_line(ctx.summary).width() as u16;
		let [summary_area, buttons_area] =
			Layout::horizontal([Constraint::Length(summary_width), Constraint::Min(1)]).areas(top);
		render_summary_group(frame, summary_area, ctx.summary);
		render_buttons(frame, buttons_area, ctx.buttons);

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
