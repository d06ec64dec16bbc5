//! Export column-picker modal.
//!
//! Drawn over the host's table while an export session is open. Rows mirror
//! the session's column snapshot with checkbox marks; the bounded quantity
//! input appears only for client-side exports.

use ratatui::Frame;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table};
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::export::ExportSession;

const MODAL_WIDTH: u16 = 44;
const MODAL_TITLE: &str = "Choose export columns";
const HINT: &str = "space toggle · enter export · esc cancel";

/// What the user asked the open modal to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
	Confirm,
	Cancel,
}

/// Translate a key event against the open session. Returns the action the
/// caller should apply to the workflow, if any.
pub fn handle_export_key(session: &mut ExportSession, key: KeyEvent) -> Option<ModalAction> {
	match key.code {
		KeyCode::Esc => return Some(ModalAction::Cancel),
		KeyCode::Enter => return Some(ModalAction::Confirm),
		KeyCode::Up => session.move_up(),
		KeyCode::Down => session.move_down(),
		KeyCode::Char(' ') => session.toggle_current(),
		KeyCode::Char(digit @ '0'..='9') => {
			session.quantity_digit(digit as u32 - '0' as u32);
		}
		KeyCode::Backspace => session.quantity_backspace(),
		_ => {}
	}
	None
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
	let width = width.min(area.width);
	let height = height.min(area.height);
	Rect {
		x: area.x + (area.width - width) / 2,
		y: area.y + (area.height - height) / 2,
		width,
		height,
	}
}

/// Render the open picker session as a centered modal.
pub fn render_export_modal(frame: &mut Frame, area: Rect, session: &mut ExportSession) {
	if area.width < 8 || area.height < 6 {
		return;
	}

	// rows + border + header + quantity + hint
	let column_rows = session.columns().len().min(10) as u16;
	let extra = if session.quantity_enabled() { 5 } else { 4 };
	let modal = centered(area, MODAL_WIDTH, column_rows + extra);
	frame.render_widget(Clear, modal);

	let block = Block::default()
		.borders(Borders::ALL)
		.border_set(ratatui::symbols::border::ROUNDED)
		.title(MODAL_TITLE);
	let inner = block.inner(modal);
	frame.render_widget(block, modal);

	let mut constraints = vec![Constraint::Min(1)];
	if session.quantity_enabled() {
		constraints.push(Constraint::Length(1));
	}
	constraints.push(Constraint::Length(1));
	let chunks = Layout::vertical(constraints).split(inner);

	let rows: Vec<Row<'_>> = session
		.columns()
		.iter()
		.enumerate()
		.map(|(index, column)| {
			let mark = if session.is_selected(index) {
				"[x]"
			} else {
				"[ ]"
			};
			Row::new(vec![mark.to_string(), column.label.clone()])
		})
		.collect();
	let table = Table::new(rows, [Constraint::Length(3), Constraint::Min(1)])
		.header(Row::new(vec!["", "Column name"]).style(Style::default().add_modifier(Modifier::BOLD)))
		.row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));
	frame.render_stateful_widget(table, chunks[0], &mut session.table_state);

	let mut next = 1;
	if session.quantity_enabled() {
		let quantity = Line::from(vec![
			Span::styled("Max rows: ", Style::default().add_modifier(Modifier::DIM)),
			Span::raw(session.quantity().to_string()),
		]);
		frame.render_widget(Paragraph::new(quantity), chunks[next]);
		next += 1;
	}
	frame.render_widget(
		Paragraph::new(Span::styled(
			HINT,
			Style::default().add_modifier(Modifier::DIM),
		)),
		chunks[next],
	);
}

/// Render the in-flight indicator shown between the export click and the
/// header fetch resolving.
pub fn render_export_pending(frame: &mut Frame, area: Rect, throbber_state: &ThrobberState) {
	if area.width == 0 || area.height == 0 {
		return;
	}
	let spinner = Throbber::default();
	let line = Line::from(vec![
		spinner.to_symbol_span(throbber_state),
		Span::styled(
			"preparing export…",
			Style::default().add_modifier(Modifier::DIM),
		),
	]);
	frame.render_widget(Paragraph::new(line), area);
}
