//! Turns pane disappearance into close events.
//!
//! tmux has no push notification we can subscribe to without a control
//! client, so the watcher polls `list-panes -a` and diffs pane ids
//! between rounds.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::binding::HostEvent;
use crate::destination::TerminalId;

use super::TmuxError;
use super::runner::TmuxRunner;

pub fn spawn_pane_watcher(
    runner: Arc<dyn TmuxRunner>,
    interval: Duration,
    events: mpsc::UnboundedSender<HostEvent>,
) -> JoinHandle<()> {
    tokio::spawn(watch(runner, interval, events))
}

async fn watch(
    runner: Arc<dyn TmuxRunner>,
    interval: Duration,
    events: mpsc::UnboundedSender<HostEvent>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut known: Option<BTreeSet<TerminalId>> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            () = events.closed() => break,
        }

        let current = match pane_ids(runner.as_ref()).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(error = %e, "pane poll failed");
                continue;
            }
        };

        if let Some(previous) = &known {
            for id in vanished(previous, &current) {
                tracing::debug!(pane = %id, "pane closed");
                if events.send(HostEvent::TerminalClosed(id)).is_err() {
                    return;
                }
            }
        }
        known = Some(current);
    }

    tracing::debug!("pane watcher stopped");
}

async fn pane_ids(runner: &dyn TmuxRunner) -> Result<BTreeSet<TerminalId>, TmuxError> {
    let out = runner.run(&["list-panes", "-a", "-F", "#{pane_id}"]).await?;
    Ok(out
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(TerminalId::new)
        .collect())
}

/// Ids present in `previous` but gone from `current`, in id order.
pub fn vanished(previous: &BTreeSet<TerminalId>, current: &BTreeSet<TerminalId>) -> Vec<TerminalId> {
    previous.difference(current).cloned().collect()
}
