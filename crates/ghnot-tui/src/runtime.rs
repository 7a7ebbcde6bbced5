use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::input::handle_key;
use crate::render::render;
use crate::ui::action_queue::{execute, ActionOutcome};
use crate::ui::{App, Tui};

pub(crate) async fn run_app(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut event_stream = EventStream::new();
    let mut tick_interval = tokio::time::interval(Duration::from_millis(250));
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<ActionOutcome>();

    while app.running {
        terminal.draw(|f| render(f, app))?;

        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        handle_key(app, key);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!("terminal event stream failed: {}", e);
                        return Err(e.into());
                    }
                    None => app.running = false,
                }
            }

            _ = tick_interval.tick() => {
                app.tick();
            }

            Some(outcome) = outcome_rx.recv() => {
                app.finish(outcome);
            }
        }

        dispatch_next(app, &outcome_tx);
    }

    Ok(())
}

/// Hand the next queued notification to a blocking worker. The queue only
/// releases one at a time, so results arrive in list order.
fn dispatch_next(app: &mut App, tx: &UnboundedSender<ActionOutcome>) {
    while let Some(dispatch) = app.queue.next() {
        let Some(notification) = app.get(&dispatch.id).cloned() else {
            tracing::warn!("notification {} vanished before {} ran", dispatch.id, dispatch.action);
            app.queue.complete(&dispatch.id);
            continue;
        };

        tracing::debug!("dispatching {} for {}", dispatch.action, dispatch.id);
        let registry = app.registry();
        let tx = tx.clone();
        tokio::task::spawn_blocking(move || {
            let _ = tx.send(execute(&registry, dispatch, notification));
        });
        return;
    }
}
