use anyhow::Result;
use approvals_core::machine::Completion;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::input::handle_key;
use crate::render::render;
use crate::ui::{App, Tui};

pub(crate) async fn run_app(
    terminal: &mut Tui,
    app: &mut App,
    mut completions: UnboundedReceiver<Completion>,
) -> Result<()> {
    // Create async event stream for terminal events
    let mut event_stream = EventStream::new();

    // Tick drives the callout removal timers, queue polling and the spinner
    let mut tick_interval = tokio::time::interval(Duration::from_millis(50));

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
                        tracing::warn!("terminal event error: {}", e);
                    }
                    None => {
                        tracing::info!("terminal event stream closed");
                        app.quit();
                    }
                }
            }

            _ = tick_interval.tick() => {
                app.tick(Instant::now());
            }

            Some(completion) = completions.recv() => {
                app.apply_completion(completion);
            }
        }
    }

    Ok(())
}
