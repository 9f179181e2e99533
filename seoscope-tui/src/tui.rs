use crate::{
    feeders::spawn_tui_feeders,
    state::{Action, TuiState},
    view,
};
use anyhow::Result;
use crossterm::{
    event::Event as CtEvent,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use seoscope_http::FetchError;
use seoscope_web::{Analyzer, Report};
use std::{
    io::{self, Stdout},
    time::{Duration, Instant},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const MAILBOX: usize = 64;

pub(crate) enum TuiMsg {
    InputEvent(CtEvent),
    Tick,
    AnalysisDone(Result<Report, FetchError>),
    OpError(String),
}

/// Owns the terminal; raw mode and the alternate screen are undone on drop,
/// including when the loop bails out with an error.
struct TerminalGuard {
    term: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        // From here on a failure must hand the terminal back.
        or_restore(Self::open(), restore_terminal)
    }

    fn open() -> Result<Self> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut term = Terminal::new(CrosstermBackend::new(stdout))?;
        term.clear()?;
        Ok(Self { term })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
        let _ = self.term.show_cursor();
    }
}

fn restore_terminal() {
    disable_raw_mode().ok();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Run `restore` when `result` is an error, then pass the result through.
fn or_restore<T>(result: Result<T>, restore: impl FnOnce()) -> Result<T> {
    if result.is_err() {
        restore();
    }
    result
}

struct TuiApp {
    analyzer: Analyzer,
    state: TuiState,
    guard: TerminalGuard,
    tx: mpsc::Sender<TuiMsg>,
    tick_rate: Duration,
    last_tick: Instant,
}

impl TuiApp {
    fn draw(&mut self) -> Result<()> {
        let snap = self.state.snapshot();
        view::draw(&mut self.guard.term, &snap)
    }

    fn spawn_analysis(&self, url: String, keywords: seoscope_web::KeywordSet) {
        let analyzer = self.analyzer.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = analyzer.analyze(&url, &keywords).await;
            let _ = tx.send(TuiMsg::AnalysisDone(outcome)).await;
        });
    }

    /// Returns `false` once the UI should close.
    fn handle(&mut self, msg: TuiMsg) -> Result<bool> {
        match msg {
            TuiMsg::InputEvent(ev) => {
                if let CtEvent::Key(k) = ev {
                    match self.state.handle_key(k) {
                        Some(Action::Quit) => return Ok(false),
                        Some(Action::Analyze { url, keywords }) => {
                            tracing::debug!(url=%url, keywords=keywords.len(), "tui.run");
                            self.spawn_analysis(url, keywords);
                        }
                        None => {}
                    }
                }
            }
            TuiMsg::AnalysisDone(outcome) => {
                if let Err(e) = &outcome {
                    tracing::debug!(error=%e, "tui.run_failed");
                }
                self.state.apply_outcome(&outcome);
            }
            TuiMsg::OpError(e) => self.state.op_error(&e),
            TuiMsg::Tick => {
                self.state.step_spinner();
                if self.state.dirty || self.last_tick.elapsed() >= self.tick_rate {
                    self.draw()?;
                    self.last_tick = Instant::now();
                    self.state.dirty = false;
                }
            }
        }
        Ok(true)
    }
}

/// Run the interactive UI until the user quits.
pub async fn run(analyzer: Analyzer) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<TuiMsg>(MAILBOX);
    let cancel = CancellationToken::new();

    let mut app = TuiApp {
        analyzer,
        state: TuiState::new(),
        guard: TerminalGuard::enter()?,
        tx: tx.clone(),
        tick_rate: Duration::from_millis(80),
        last_tick: Instant::now(),
    };
    spawn_tui_feeders(tx, cancel.clone());
    tracing::info!("tui.start");

    let result: Result<()> = async {
        app.draw()?;
        while let Some(msg) = rx.recv().await {
            if !app.handle(msg)? {
                break;
            }
        }
        Ok(())
    }
    .await;

    cancel.cancel();
    drop(app);
    tracing::info!("tui.stop");
    result
}
