use crate::tui::TuiMsg;
use std::time::Duration;
use tokio::{sync::mpsc, time};
use tokio_util::sync::CancellationToken;

const TICK_RATE: Duration = Duration::from_millis(80);
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Spawn the keyboard reader and the redraw ticker. Both stop once `cancel`
/// fires or the receiving side of `tx` is gone.
pub(crate) fn spawn_tui_feeders(tx: mpsc::Sender<TuiMsg>, cancel: CancellationToken) {
    let tx_in = tx.clone();
    let cancel_in = cancel.clone();
    // One blocking thread for the lifetime of the UI. Polling first keeps a
    // pending read from outliving shutdown.
    tokio::task::spawn_blocking(move || {
        while !cancel_in.is_cancelled() {
            match crossterm::event::poll(INPUT_POLL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    let _ = tx_in.blocking_send(TuiMsg::OpError(format!("input: {e}")));
                    break;
                }
            }
            let msg = match crossterm::event::read() {
                Ok(ev) => TuiMsg::InputEvent(ev),
                Err(e) => TuiMsg::OpError(format!("input: {e}")),
            };
            if tx_in.blocking_send(msg).is_err() {
                break;
            }
        }
    });

    tokio::spawn(async move {
        let mut interval = time::interval(TICK_RATE);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    if tx.is_closed() {
                        break;
                    }
                    let _ = tx.try_send(TuiMsg::Tick);
                }
            }
        }
    });
}
