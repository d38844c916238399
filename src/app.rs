//! The application event loop.
//!
//! Single-threaded and cooperative: one `select!` multiplexes terminal
//! events and the network transport. Within an iteration, inbound
//! bytes are parsed to exhaustion and all routing side-effects applied
//! before the renderer reads the store, so effects appear to the user
//! in submission order. Shutdown is one flag observed at the top of
//! the loop; every exit cause funnels through the same teardown path.

use bytes::BytesMut;
use futures_util::StreamExt;
use tracing::{error, info};

use crate::buffers::BufferStore;
use crate::commands::{dispatch_line, DispatchEffect};
use crate::config::Args;
use crate::error::TransportError;
use crate::input::{InputEvent, InputLine};
use crate::session::Session;
use crate::transport::Transport;
use crate::ui::{RawModeGuard, Ui};

/// How the session ended; maps to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// `/quit` or Ctrl-C: exit 0.
    Graceful,
    /// Connect/register failure or broken transport: exit 1.
    TransportFailed,
}

impl ExitReason {
    /// Process exit code for this reason.
    pub fn code(self) -> i32 {
        match self {
            ExitReason::Graceful => 0,
            ExitReason::TransportFailed => 1,
        }
    }
}

/// Connect, register, and run the event loop to completion.
pub async fn run(args: &Args) -> Result<ExitReason, TransportError> {
    let mut store = BufferStore::new();
    let mut session = Session::new(args.identity());
    let mut input = InputLine::new();

    store.append(
        store.status(),
        &format!("chatter v{}", env!("CARGO_PKG_VERSION")),
    );

    session.on_connecting();
    let mut transport = Transport::connect(&args.server, args.port, args.tls()).await?;
    info!(server = %args.server, port = args.port, tls = transport.is_tls(), "connected");
    session.on_connected(&mut store);
    flush_outbound(&mut session, &mut transport).await?;

    let _raw = RawModeGuard::activate().map_err(TransportError::Broken)?;
    let mut ui = Ui::new().map_err(TransportError::Broken)?;
    let (w, h) = ui.content_size();
    store.set_viewport(w, h);

    let mut events = crossterm::event::EventStream::new();
    let mut chunk = BytesMut::with_capacity(4096);
    let mut shutdown = false;
    let mut reason = ExitReason::Graceful;

    loop {
        if shutdown {
            break;
        }
        let channel = session.initial_channel().to_string();
        if let Err(e) = ui.draw(&store, session.state(), &channel, input.text()) {
            error!("draw failed: {}", e);
        }

        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(crossterm::event::Event::Key(key))) => {
                        if let Some(event) = input.handle_key(key) {
                            if apply_input_event(event, &mut session, &mut store) {
                                shutdown = true;
                            }
                        }
                    }
                    Some(Ok(crossterm::event::Event::Resize(w, h))) => {
                        ui.resize(w, h);
                        let (cw, ch) = ui.content_size();
                        store.set_viewport(cw, ch);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!("terminal event error: {}", e);
                        shutdown = true;
                        reason = ExitReason::TransportFailed;
                    }
                    None => {
                        shutdown = true;
                    }
                }
            }
            read = transport.read_chunk(&mut chunk) => {
                match read {
                    Ok(0) => {
                        session.on_disconnected(&mut store);
                        shutdown = true;
                        reason = ExitReason::TransportFailed;
                    }
                    Ok(_) => {
                        session.feed_inbound(&mut store, &chunk);
                        chunk.clear();
                    }
                    Err(e) => {
                        error!("transport read failed: {}", e);
                        session.on_disconnected(&mut store);
                        shutdown = true;
                        reason = ExitReason::TransportFailed;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                // Shutdown without sending QUIT.
                shutdown = true;
            }
        }

        if session.has_outbound() {
            if let Err(e) = flush_outbound(&mut session, &mut transport).await {
                error!("transport write failed: {}", e);
                session.on_disconnected(&mut store);
                reason = ExitReason::TransportFailed;
                break;
            }
        }
    }

    // Single teardown path for every exit cause: close_notify for TLS,
    // then the socket; raw mode is restored by the guard.
    transport.close().await;
    info!(?reason, "session ended");
    Ok(reason)
}

/// Apply one input action; returns true when shutdown was requested.
fn apply_input_event(event: InputEvent, session: &mut Session, store: &mut BufferStore) -> bool {
    match event {
        InputEvent::Submit(line) => {
            dispatch_line(session, store, &line) == DispatchEffect::Quit
        }
        InputEvent::Scroll {
            direction,
            full_page,
        } => {
            let unit = if full_page {
                store.full_page()
            } else {
                store.half_page()
            };
            store.scroll_active(direction as isize * unit);
            false
        }
        InputEvent::NextBuffer => {
            store.next();
            false
        }
        InputEvent::PrevBuffer => {
            store.prev();
            false
        }
        InputEvent::Interrupt => true,
    }
}

/// Drain the session's outbound queue to the transport, CRLF-framed.
async fn flush_outbound(
    session: &mut Session,
    transport: &mut Transport,
) -> Result<(), TransportError> {
    for line in session.take_outbound() {
        transport.send(format!("{}\r\n", line).as_bytes()).await?;
    }
    Ok(())
}
