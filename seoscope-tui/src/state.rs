use crate::{
    command::{Command, parse_command},
    styles,
    transcript::TranscriptLine,
    view::ViewSnap,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::Style;
use seoscope_http::FetchError;
use seoscope_web::{KeywordSet, Report};

const BRAILLE_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Work the event loop must carry out on behalf of the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Analyze { url: String, keywords: KeywordSet },
    Quit,
}

/// Everything on screen except the terminal handle.
pub struct TuiState {
    // target
    url: Option<String>,
    keyword_lines: Vec<String>,

    // ui state
    input: String,
    input_cursor: usize,
    lines: Vec<TranscriptLine>,
    scroll: usize, // from bottom
    pub dirty: bool,

    // busy/spinner
    busy: u32,
    spin_idx: usize,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            url: None,
            keyword_lines: Vec::new(),
            input: String::new(),
            input_cursor: 0,
            lines: vec![TranscriptLine::new(
                "Type one keyword per line, then `/run <url>`. `/help` lists commands.".into(),
                styles::system(),
            )],
            scroll: 0,
            dirty: true,
            busy: 0,
            spin_idx: 0,
        }
    }

    fn cursor_left(&mut self) {
        if self.input_cursor == 0 {
            return;
        }
        self.input_cursor -= 1;
        while self.input_cursor > 0 && !self.input.is_char_boundary(self.input_cursor) {
            self.input_cursor -= 1;
        }
    }

    fn cursor_right(&mut self) {
        if self.input_cursor >= self.input.len() {
            return;
        }
        self.input_cursor += 1;
        while self.input_cursor < self.input.len()
            && !self.input.is_char_boundary(self.input_cursor)
        {
            self.input_cursor += 1;
        }
    }

    fn insert_char(&mut self, ch: char) {
        self.input.insert(self.input_cursor, ch);
        self.input_cursor += ch.len_utf8();
    }

    fn backspace(&mut self) {
        if self.input_cursor == 0 {
            return;
        }
        let mut prev = self.input_cursor.saturating_sub(1);
        while prev > 0 && !self.input.is_char_boundary(prev) {
            prev -= 1;
        }
        self.input.drain(prev..self.input_cursor);
        self.input_cursor = prev;
    }

    fn delete(&mut self) {
        if self.input_cursor >= self.input.len() {
            return;
        }
        let start = self.input_cursor;
        let mut end = start + 1;
        while end < self.input.len() && !self.input.is_char_boundary(end) {
            end += 1;
        }
        self.input.drain(start..end);
    }

    fn push_styled<S: Into<String>>(&mut self, s: S, style: Style) {
        self.lines.push(TranscriptLine::new(s.into(), style));
        self.dirty = true;
    }

    fn push_blank(&mut self) {
        self.lines.push(TranscriptLine::blank());
        self.dirty = true;
    }

    fn spinner(&self) -> &'static str {
        if self.busy > 0 {
            BRAILLE_FRAMES[self.spin_idx % BRAILLE_FRAMES.len()]
        } else {
            " "
        }
    }

    fn set_busy(&mut self, on: bool) {
        if on {
            self.busy = self.busy.saturating_add(1)
        } else {
            self.busy = self.busy.saturating_sub(1)
        }
        self.dirty = true;
    }

    pub fn step_spinner(&mut self) {
        if self.busy > 0 {
            self.spin_idx = (self.spin_idx + 1) % BRAILLE_FRAMES.len();
            self.dirty = true;
        }
    }

    pub fn snapshot(&self) -> ViewSnap {
        let target = match &self.url {
            Some(url) => format!("{url} • {} keyword(s)", self.keyword_lines.len()),
            None => format!("no url • {} keyword(s)", self.keyword_lines.len()),
        };
        ViewSnap::new(
            self.input.clone(),
            self.input_cursor,
            self.lines.clone(),
            self.scroll,
            self.busy,
            self.spinner(),
            target,
        )
    }

    /// Keyword set as of now; rebuilt on every run.
    fn keywords(&self) -> KeywordSet {
        KeywordSet::parse(&self.keyword_lines.join("\n"))
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        self.dirty = true;
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('q'), KeyModifiers::CONTROL) => return Some(Action::Quit),
            (KeyCode::PageUp, _) => self.scroll = self.scroll.saturating_add(5),
            (KeyCode::PageDown, _) => self.scroll = self.scroll.saturating_sub(5),
            (KeyCode::Up, _) => self.scroll = self.scroll.saturating_add(1),
            (KeyCode::Down, _) => self.scroll = self.scroll.saturating_sub(1),
            (KeyCode::Enter, _) => {
                let line = std::mem::take(&mut self.input);
                self.input_cursor = 0;
                return self.route_submit(&line);
            }
            (KeyCode::Left, _) => self.cursor_left(),
            (KeyCode::Right, _) => self.cursor_right(),
            (KeyCode::Home, _) => self.input_cursor = 0,
            (KeyCode::End, _) => self.input_cursor = self.input.len(),
            (KeyCode::Backspace, _) => self.backspace(),
            (KeyCode::Delete, _) => self.delete(),
            (KeyCode::Esc, _) => {
                self.input.clear();
                self.input_cursor = 0;
            }
            (KeyCode::Char(ch), _) => self.insert_char(ch),
            _ => {}
        }
        None
    }

    pub fn route_submit(&mut self, line: &str) -> Option<Action> {
        let s = line.trim();
        if s.is_empty() {
            return None;
        }
        if s.starts_with('/') {
            return self.handle_command(parse_command(s));
        }
        self.add_keyword(s);
        None
    }

    fn add_keyword(&mut self, text: &str) {
        self.keyword_lines.push(text.to_string());
        self.push_styled(format!("+ keyword: {text}"), styles::user_text());
    }

    fn show_keywords(&mut self) {
        let keywords = self.keywords();
        if keywords.is_empty() {
            self.push_styled("No keywords yet. Type one per line.", styles::dim());
        } else {
            self.push_styled("Keywords:", styles::label());
            let items: Vec<String> = keywords.iter().map(|kw| format!("  • {kw}")).collect();
            for item in items {
                self.push_styled(item, styles::value());
            }
        }
        self.push_blank();
    }

    fn handle_command(&mut self, cmd: Command) -> Option<Action> {
        match cmd {
            Command::Quit => return Some(Action::Quit),
            Command::Help => {
                self.push_styled("Commands:", styles::label());
                self.push_styled("  <text>          add a keyword line", styles::value());
                self.push_styled("  /url <url>      set the page to analyze", styles::value());
                self.push_styled("  /url            show the page", styles::value());
                self.push_styled("  /kw             list keywords", styles::value());
                self.push_styled("  /kw -           clear keywords", styles::value());
                self.push_styled("  /run [url]      analyze the page", styles::value());
                self.push_styled("  /quit           exit", styles::value());
                self.push_blank();
            }
            Command::Url(Some(url)) => {
                self.push_styled(format!("✓ Target: {url}"), styles::system());
                self.url = Some(url);
            }
            Command::Url(None) => match self.url.clone() {
                Some(url) => self.push_styled(format!("Target: {url}"), styles::value()),
                None => self.push_styled("No target. Use `/url <url>`.", styles::dim()),
            },
            Command::Keywords(None) => self.show_keywords(),
            Command::Keywords(Some(text)) if text.is_empty() => {
                self.keyword_lines.clear();
                self.push_styled("✓ Cleared keywords.", styles::system());
            }
            Command::Keywords(Some(text)) => self.add_keyword(&text),
            Command::Run(target) => {
                if let Some(url) = target {
                    self.url = Some(url);
                }
                let Some(url) = self.url.clone() else {
                    self.push_styled("× No target. Use `/run <url>`.", styles::error());
                    self.push_blank();
                    return None;
                };
                let keywords = self.keywords();
                self.push_styled(format!("→ [Analyze] {url}"), styles::user_header());
                let listed: Vec<&str> = keywords.iter().collect();
                self.push_styled(
                    format!("  keywords: {}", listed.join(", ")),
                    styles::user_text(),
                );
                self.set_busy(true);
                return Some(Action::Analyze { url, keywords });
            }
            Command::Unknown(s) => {
                self.push_styled(format!("× Unknown command: {s}"), styles::error());
                self.push_styled("Try `/help`.", styles::dim());
                self.push_blank();
            }
        }
        None
    }

    pub fn apply_outcome(&mut self, outcome: &Result<Report, FetchError>) {
        match outcome {
            Ok(report) => {
                self.push_styled(format!("← [Report] {}", report.url), styles::report_header());
                for verdict in report.verdicts() {
                    let style = if verdict.has_deficiency() {
                        styles::flagged()
                    } else {
                        styles::pass()
                    };
                    self.push_styled(format!("  {verdict}"), style);
                }
            }
            Err(err) => {
                self.push_styled(format!("× Fetch failed: {err}"), styles::error());
            }
        }
        self.push_blank();
        self.set_busy(false);
    }

    pub fn op_error(&mut self, message: &str) {
        self.push_styled(format!("× Error: {message}"), styles::error());
        self.push_blank();
    }

    #[cfg(test)]
    fn transcript_text(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.text.clone()).collect()
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}
