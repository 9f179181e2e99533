use crate::transcript::TranscriptLine;
use anyhow::Result;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};
use std::io::Stdout;
use unicode_width::UnicodeWidthStr;

/// Everything one frame needs, copied out of the state.
pub struct ViewSnap {
    pub input: String,
    pub input_cursor: usize,
    pub lines: Vec<TranscriptLine>,
    pub scroll: usize,
    pub busy: u32,
    pub spinner: &'static str,
    pub target: String,
}

impl ViewSnap {
    pub fn new(
        input: String,
        input_cursor: usize,
        lines: Vec<TranscriptLine>,
        scroll: usize,
        busy: u32,
        spinner: &'static str,
        target: String,
    ) -> Self {
        Self {
            input,
            input_cursor,
            lines,
            scroll,
            busy,
            spinner,
            target,
        }
    }
}

pub fn draw(term: &mut Terminal<CrosstermBackend<Stdout>>, snap: &ViewSnap) -> Result<()> {
    term.draw(|frame| {
        let [header, reports, input, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .areas(frame.area());

        render_header(frame, header, snap);
        render_reports(frame, reports, snap);
        render_input(frame, input, snap);
        render_status(frame, status, snap);
    })?;
    Ok(())
}

fn render_header(frame: &mut Frame, area: Rect, snap: &ViewSnap) {
    let title = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let line = Line::from(vec![
        Span::styled(" SEO Scope ", title),
        Span::styled(format!("│ {}", snap.target), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_reports(frame: &mut Frame, area: Rect, snap: &ViewSnap) {
    let inner_h = area.height.saturating_sub(2) as usize;
    let inner_w = area.width.saturating_sub(2) as usize;
    let wrapped = wrap_transcript(&snap.lines, inner_w);
    let (start, end) = visible_window(wrapped.len(), inner_h, snap.scroll);

    let items: Vec<ListItem> = wrapped[start..end]
        .iter()
        .map(|(text, style)| ListItem::new(Line::styled(text.clone(), *style)))
        .collect();
    let block = Block::default().borders(Borders::ALL).title(" Reports ");
    frame.render_widget(List::new(items).block(block), area);
}

fn render_input(frame: &mut Frame, area: Rect, snap: &ViewSnap) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Keyword or /command ");
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(snap.input.as_str()).block(block), area);
    frame.set_cursor_position(Position {
        x: area.x + 1 + caret_col(&snap.input, snap.input_cursor),
        y: area.y + 1,
    });
}

fn render_status(frame: &mut Frame, area: Rect, snap: &ViewSnap) {
    let state = if snap.busy > 0 {
        Span::styled(
            format!("Analyzing {} page(s)…", snap.busy),
            Style::default().fg(Color::Yellow),
        )
    } else {
        Span::styled("Idle", Style::default().fg(Color::Green))
    };
    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(snap.spinner, Style::default().fg(Color::Yellow)),
        Span::raw(" "),
        state,
        Span::styled("  •  /help  •  Ctrl-C quits", Style::default().fg(Color::DarkGray)),
    ]);
    let block = Block::default().borders(Borders::ALL).title(" Status ");
    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// `[start, end)` of the wrapped lines to show, `scroll` lines up from the bottom.
fn visible_window(total: usize, height: usize, scroll: usize) -> (usize, usize) {
    let scroll = scroll.min(total.saturating_sub(height));
    let end = total - scroll;
    (end.saturating_sub(height), end)
}

fn caret_col(input: &str, cursor: usize) -> u16 {
    UnicodeWidthStr::width(&input[..cursor]) as u16
}

fn wrap_transcript(lines: &[TranscriptLine], width: usize) -> Vec<(String, Style)> {
    let width = width.max(1);
    let mut out = Vec::new();
    for entry in lines {
        for raw in entry.text.split('\n') {
            let segments = textwrap::wrap(raw, width);
            if segments.is_empty() {
                out.push((String::new(), entry.style));
            }
            out.extend(segments.into_iter().map(|seg| (seg.into_owned(), entry.style)));
        }
    }
    out
}
