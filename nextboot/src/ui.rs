// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The user interface of the enhanced picker.
//!
//! A single-column layout in the manner of text-only boot menus: a title
//! line, the entry list with a highlight arrow, the resolved current entry,
//! and a one-line key help at the bottom.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout},
    style::{Modifier, Style},
    widgets::{List, ListItem, Paragraph},
};

use crate::app::App;

/// Draw one frame of the picker.
pub fn render(frame: &mut Frame, app: &mut App) {
    let [header, list_area, status, help] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(
        Paragraph::new("Choose next boot entry (press 'q' to abort)")
            .alignment(Alignment::Center),
        header,
    );

    let list = List::new(app.items.iter().map(|item| ListItem::new(&**item)))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(" → ");
    frame.render_stateful_widget(list, list_area, &mut app.state);

    let current = app.current.as_deref().unwrap_or("none (fallback entry ?)");
    frame.render_widget(Paragraph::new(format!("Current entry: {current}")), status);

    frame.render_widget(
        Paragraph::new("Up/Down move, Enter select, q abort").alignment(Alignment::Center),
        help,
    );
}
