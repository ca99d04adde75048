//! Presentation layer
//!
//! Purely derived from `App` state: two table views, modal popups, a
//! blocking notice, and the log pane. No logic of its own beyond
//! formatting what the resolver computes.

use ratatui::{prelude::*, widgets::*};
use shared::Action;
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget};

use crate::app::{App, Modal, View};
use crate::resolver::{self, PermissionIndex};
use crate::snapshot::Snapshot;
use crate::workflows::{ActionToggleModal, FieldEditorModal};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Active view
            Constraint::Length(8), // Logs
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);

    match &app.snapshot {
        None => draw_loading(f, chunks[1]),
        Some(snapshot) => match app.view {
            View::Matrix => draw_matrix(f, app, snapshot, chunks[1]),
            View::Roles => draw_role_grid(f, app, snapshot, chunks[1]),
        },
    }

    draw_logs(f, app, chunks[2]);

    if let Some(snapshot) = &app.snapshot {
        match &app.modal {
            Some(Modal::ActionToggle(modal)) => draw_action_modal(f, snapshot, modal),
            Some(Modal::FieldEditor(modal)) => draw_field_editor(f, snapshot, modal),
            None => {}
        }
    }

    if let Some(notice) = &app.notice {
        draw_notice(f, notice);
    }
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let status = if app.snapshot.is_none() {
        Span::styled(
            " LOADING... ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::RAPID_BLINK),
        )
    } else if app.syncing {
        Span::styled(
            " Syncing ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            " Ready ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    };

    let view_name = match app.view {
        View::Matrix => " Permissions Matrix ",
        View::Roles => " Role Assignments ",
    };

    let title = Paragraph::new(vec![Line::from(vec![
        Span::raw(" lattice "),
        Span::styled(view_name, Style::default().fg(Color::Yellow)),
        Span::raw(" | "),
        status,
    ])])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(title, area);

    let hints = match app.view {
        View::Matrix => "r/c/u/d grant · f fields · Tab view · q quit",
        View::Roles => "Enter toggle · Tab view · q quit",
    };
    let help_text = Paragraph::new(hints)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right);
    f.render_widget(help_text, area);
}

fn draw_loading(f: &mut Frame, area: Rect) {
    let loading = Paragraph::new("waiting for the directory service...")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(loading, area);
}

fn draw_matrix(f: &mut Frame, app: &App, snapshot: &Snapshot, area: Rect) {
    let index = PermissionIndex::build(snapshot);

    let header = Row::new(
        std::iter::once(Cell::from("User")).chain(
            snapshot
                .modules
                .iter()
                .map(|m| Cell::from(m.name.clone())),
        ),
    )
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let rows = snapshot.users.iter().enumerate().map(|(r, user)| {
        let cells = std::iter::once(Cell::from(user.name.clone())).chain(
            snapshot.modules.iter().enumerate().map(|(c, module)| {
                let flags: String = Action::ALL
                    .iter()
                    .map(|&action| {
                        if resolver::user_has_action(snapshot, &index, user.id, module.id, action)
                        {
                            action.flag()
                        } else {
                            '·'
                        }
                    })
                    .collect();
                let union = resolver::union_fields(snapshot, &index, user.id, module.id);
                let text = format!(
                    "{} v{} e{}",
                    flags,
                    union.visible.len(),
                    union.editable.len()
                );
                let mut cell = Cell::from(text);
                if (r, c) == (app.row, app.col) {
                    cell = cell.style(Style::default().add_modifier(Modifier::REVERSED));
                }
                cell
            }),
        );
        Row::new(cells)
    });

    let widths = std::iter::once(Constraint::Length(16)).chain(
        snapshot
            .modules
            .iter()
            .map(|m| Constraint::Length(m.name.len().max(12) as u16)),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Permissions Matrix "),
        );
    f.render_widget(table, area);
}

fn draw_role_grid(f: &mut Frame, app: &App, snapshot: &Snapshot, area: Rect) {
    let header = Row::new(
        std::iter::once(Cell::from("User"))
            .chain(snapshot.roles.iter().map(|r| Cell::from(r.name.clone()))),
    )
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let rows = snapshot.users.iter().enumerate().map(|(r, user)| {
        let cells = std::iter::once(Cell::from(user.name.clone())).chain(
            snapshot.roles.iter().enumerate().map(|(c, role)| {
                let linked = snapshot.find_link(user.id, role.id).is_some();
                let mut cell = Cell::from(if linked { "[x]" } else { "[ ]" });
                if linked {
                    cell = cell.style(Style::default().fg(Color::Green));
                }
                if (r, c) == (app.row, app.col) {
                    cell = cell.style(Style::default().add_modifier(Modifier::REVERSED));
                }
                cell
            }),
        );
        Row::new(cells)
    });

    let widths = std::iter::once(Constraint::Length(16)).chain(
        snapshot
            .roles
            .iter()
            .map(|r| Constraint::Length(r.name.len().max(8) as u16)),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Role Assignments "),
        );
    f.render_widget(table, area);
}

fn draw_logs(f: &mut Frame, app: &App, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(
            Block::default()
                .title(" Logs ")
                .border_style(
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::DIM),
                )
                .borders(Borders::ALL),
        )
        .output_separator('|')
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_target(false)
        .output_file(false)
        .output_line(false)
        .style(Style::default().fg(Color::White))
        .state(&app.logger_state);
    f.render_widget(logs, area);
}

fn draw_action_modal(f: &mut Frame, snapshot: &Snapshot, modal: &ActionToggleModal) {
    let area = centered_rect(50, 50, f.area());
    f.render_widget(Clear, area);

    let user_name = snapshot
        .users
        .iter()
        .find(|u| u.id == modal.user_id)
        .map(|u| u.name.as_str())
        .unwrap_or("?");
    let module_name = snapshot
        .module(modal.module_id)
        .map(|m| m.name.as_str())
        .unwrap_or("?");

    let items: Vec<ListItem> = modal
        .choices
        .iter()
        .enumerate()
        .map(|(i, choice)| {
            let marker = if choice.enabled { "[x]" } else { "[ ]" };
            let mut spans = vec![Span::raw(format!(" {} {}", marker, choice.role_name))];
            if choice.granted {
                spans.push(Span::styled(
                    "  (currently granted)",
                    Style::default().fg(Color::DarkGray),
                ));
            }
            let mut item = ListItem::new(Line::from(spans));
            if i == modal.selected {
                item = item.style(Style::default().add_modifier(Modifier::REVERSED));
            }
            item
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(format!(
                " '{}' on {} for {} ",
                modal.action.as_str(),
                module_name,
                user_name
            ))
            .title_bottom(" Space toggle · Enter apply · Esc cancel "),
    );
    f.render_widget(list, area);
}

fn draw_field_editor(f: &mut Frame, snapshot: &Snapshot, modal: &FieldEditorModal) {
    let area = centered_rect(60, 60, f.area());
    f.render_widget(Clear, area);

    let user_name = snapshot
        .users
        .iter()
        .find(|u| u.id == modal.user_id)
        .map(|u| u.name.as_str())
        .unwrap_or("?");

    let items: Vec<ListItem> = if modal.fields.is_empty() {
        vec![ListItem::new(" module declares no fields ").style(Style::default().fg(Color::DarkGray))]
    } else {
        modal
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let visible = if modal.is_visible(field) { "[v]" } else { "[ ]" };
                let editable = if modal.is_editable(field) { "[e]" } else { "[ ]" };
                let mut item =
                    ListItem::new(format!(" {:<24} {} {}", field, visible, editable));
                if i == modal.selected {
                    item = item.style(Style::default().add_modifier(Modifier::REVERSED));
                }
                item
            })
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(format!(
                " {} fields for {} · role {} ",
                modal.module_name,
                user_name,
                modal.role_name()
            ))
            .title_bottom(" v/e toggle · Tab role · Enter save · Esc cancel "),
    );
    f.render_widget(list, area);
}

fn draw_notice(f: &mut Frame, notice: &str) {
    let area = centered_rect(40, 20, f.area());
    f.render_widget(Clear, area);

    let paragraph = Paragraph::new(notice)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Notice ")
                .title_bottom(" Esc dismiss "),
        );
    f.render_widget(paragraph, area);
}

/// Centered popup rect as a percentage of the full frame.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
