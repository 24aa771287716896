// src/ui/render.rs

//! Drawing one dashboard page.
//!
//! Rendering only reads job snapshots; it never blocks a scheduler for
//! longer than one state clone.

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::job::{Cadence, Group, JobState, JobStatus, SharedJob};
use crate::job::group::NON_REPEATING_PER_GROUP;

use super::{Page, Pager};

const REPEATING_BORDER: Color = Color::Green;
const NON_REPEATING_BORDER: Color = Color::Blue;
const TITLE_BORDER: Color = Color::Yellow;

/// Draw `page` over the whole frame.
pub fn draw_page(frame: &mut Frame<'_>, page: &Page, pager: &Pager) {
    let [title_area, body_area, help_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let title = Paragraph::new(Line::from(Span::styled(
        format!(
            "Page {}/{}: {}",
            pager.current() + 1,
            pager.total(),
            page.title
        ),
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .centered()
    .block(Block::bordered().border_style(Style::default().fg(TITLE_BORDER)));
    frame.render_widget(title, title_area);

    draw_groups(frame, &page.groups, body_area);

    let help = Paragraph::new(Line::from(vec![
        Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" quit  "),
        Span::styled("n/p", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" next/previous page"),
    ]));
    frame.render_widget(help, help_area);
}

fn draw_groups(frame: &mut Frame<'_>, groups: &[Group<SharedJob>], area: Rect) {
    if groups.is_empty() {
        frame.render_widget(Paragraph::new("no jobs").centered(), area);
        return;
    }

    let count = groups.len() as u32;
    let rows = Layout::vertical(groups.iter().map(|_| Constraint::Ratio(1, count))).split(area);

    for (group, group_area) in groups.iter().zip(rows.iter()) {
        draw_group(frame, group, *group_area);
    }
}

/// Each repeating job takes a full row; one-shot jobs share rows two by two.
fn draw_group(frame: &mut Frame<'_>, group: &Group<SharedJob>, area: Rect) {
    let one_shot_rows: Vec<&[SharedJob]> =
        group.non_repeating.chunks(NON_REPEATING_PER_GROUP).collect();
    let row_count = (group.repeating.len() + one_shot_rows.len()).max(1) as u32;
    let rows = Layout::vertical((0..row_count).map(|_| Constraint::Ratio(1, row_count))).split(area);
    let mut rows = rows.iter().copied();

    for job in &group.repeating {
        if let Some(row) = rows.next() {
            draw_pane(frame, job, row);
        }
    }

    for chunk in one_shot_rows {
        let Some(row) = rows.next() else { break };
        let cols = chunk.len() as u32;
        let cells = Layout::horizontal((0..cols).map(|_| Constraint::Ratio(1, cols))).split(row);
        for (job, cell) in chunk.iter().zip(cells.iter()) {
            draw_pane(frame, job, *cell);
        }
    }
}

fn draw_pane(frame: &mut Frame<'_>, job: &SharedJob, area: Rect) {
    let state = job.snapshot();
    let (label, border) = if job.is_repeating() {
        ("Repeating", REPEATING_BORDER)
    } else {
        ("Non-Repeating", NON_REPEATING_BORDER)
    };

    let block = Block::bordered()
        .title(format!("{label}: {}", job.name()))
        .border_style(Style::default().fg(border));

    let mut lines = vec![
        Line::from(vec![Span::raw("Command: "), Span::raw(job.command().to_string())]),
        Line::from(vec![
            Span::raw("Status: "),
            Span::styled(state.status.to_string(), status_style(&state.status)),
        ]),
    ];
    if let Some(next) = next_run_line(job, &state) {
        lines.push(next);
    }
    lines.push(Line::from("Output:"));

    // Keep the tail of the output visible when it does not fit.
    let inner_height = area.height.saturating_sub(2) as usize;
    let room = inner_height.saturating_sub(lines.len());
    lines.extend(tail_lines(&state.output, room).into_iter().map(Line::from));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn next_run_line(job: &SharedJob, state: &JobState) -> Option<Line<'static>> {
    if !job.is_repeating() || state.running {
        return None;
    }
    let finished = state.last_finished?;
    let elapsed = Instant::now().saturating_duration_since(finished);
    let remaining = job.interval().saturating_sub(elapsed);
    Some(Line::from(Span::styled(
        format!("Next run in {}s", remaining.as_secs()),
        Style::default().fg(Color::DarkGray),
    )))
}

pub fn status_style(status: &JobStatus) -> Style {
    match status {
        JobStatus::Pending => Style::default().fg(Color::Gray),
        JobStatus::Running => Style::default().fg(Color::Yellow),
        JobStatus::Completed => Style::default().fg(Color::Green),
        JobStatus::Failed { .. } => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

/// Last `max` lines of `text`.
pub fn tail_lines(text: &str, max: usize) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(max);
    lines[start..].iter().map(|line| line.to_string()).collect()
}
