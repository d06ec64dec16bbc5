//! Advanced query bar: a titled query-input row above the action row.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;

use crate::bar::{BarContext, BarRenderer};
use crate::components::buttons::render_buttons;
use crate::components::inputs::query_input_spans;
use crate::components::pagination::render_pagination;
use crate::components::summary::{render_summary_group, summary_line};

pub struct AdvancedBar;

impl BarRenderer for AdvancedBar {
	fn render(&self, frame: &mut Frame, area: Rect, ctx: &BarContext<'_>) {
		if area.width == 0 || area.height == 0 {
			return;
		}
		let [inputs_row, actions_row, footer_row] = Layout::vertical([
			Constraint::Length(1),
			Constraint::Length(1),
			Constraint::Length(1),
		])
		.areas(area);

		let mut line = query_input_spans(ctx.query_inputs, ctx.query_fields_limit);
		line.spans.insert(
			0,
			Span::styled(
				"Advanced  ",
				Style::default().add_modifier(Modifier::BOLD),
			),
		);
		frame.render_widget(Paragraph::new(line), inputs_row);

		let summary_width = summary_line(ctx.summary).width() as u16;
		let [buttons_area, summary_area] =
			Layout::horizontal([Constraint::Min(1), Constraint::Length(summary_width)])
				.areas(actions_row);
		render_buttons(frame, buttons_area, ctx.buttons);
		render_summary_group(frame, summary_area, ctx.summary);

		if let Some(pagination) = ctx.pagination {
			render_pagination(frame, footer_row, pagination);
		}
	}
}
