//! Per-connection tasks.
//!
//! A connection first goes through the handshake. Once registered it gets a
//! reader task feeding the session's inbound queue and a writer task draining
//! the player's outbound queue.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use crate::error::JoinError;
use crate::models::{PlayerId, PlayerLink};
use crate::protocol::{ClientMessage, FrameReader, FrameWriter, ServerMessage, welcome_text};

use super::registry::{PlayerRegistry, Seat};

/// Event delivered to the game loop from a player's reader task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Message { player: PlayerId, message: ClientMessage },
    Closed { player: PlayerId },
}

pub type InboundSender = mpsc::UnboundedSender<Inbound>;
pub type InboundReceiver = mpsc::UnboundedReceiver<Inbound>;

/// Perform the handshake on a freshly accepted socket and register the player.
pub async fn admit(
    stream: TcpStream,
    addr: SocketAddr,
    registry: Arc<PlayerRegistry>,
    inbound: InboundSender,
    handshake_timeout: Duration,
) -> Result<Seat, JoinError> {
    let (read_half, write_half) = stream.into_split();
    admit_split(
        FrameReader::new(read_half),
        FrameWriter::new(write_half),
        PlayerId::new(addr),
        registry,
        inbound,
        handshake_timeout,
    )
    .await
}

async fn admit_split<R, W>(
    mut reader: FrameReader<R>,
    writer: FrameWriter<W>,
    player: PlayerId,
    registry: Arc<PlayerRegistry>,
    inbound: InboundSender,
    handshake_timeout: Duration,
) -> Result<Seat, JoinError>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let username = match reader.receive(handshake_timeout).await {
        Some(ClientMessage::Hi { username }) => display_name(username, player.addr()),
        _ => return Err(JoinError::MalformedHandshake),
    };

    // The welcome is queued before registering so it precedes any broadcast.
    let (tx, rx) = mpsc::unbounded_channel();
    let link = PlayerLink::new(tx);
    link.send(ServerMessage::ready(welcome_text(&username)));

    let seat = registry.register(player, username.clone(), link).await?;
    info!(%player, %username, players = seat.number, "player joined");

    tokio::spawn(write_loop(writer, rx, player));
    tokio::spawn(read_loop(reader, player, registry, inbound));
    Ok(seat)
}

/// Trimmed username, or `Player-<port>` when none was given.
pub fn display_name(username: Option<String>, addr: SocketAddr) -> String {
    match username.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("Player-{}", addr.port()),
    }
}

async fn write_loop<W: AsyncWrite + Unpin>(
    mut writer: FrameWriter<W>,
    mut outbound: mpsc::UnboundedReceiver<ServerMessage>,
    player: PlayerId,
) {
    while let Some(msg) = outbound.recv().await {
        if let Err(e) = writer.send(&msg).await {
            debug!(%player, error = %e, "send failed, closing writer");
            return;
        }
    }
    let _ = writer.shutdown().await;
}

async fn read_loop<R: AsyncRead + Unpin>(
    mut reader: FrameReader<R>,
    player: PlayerId,
    registry: Arc<PlayerRegistry>,
    inbound: InboundSender,
) {
    loop {
        tokio::select! {
            _ = inbound.closed() => return,
            frame = reader.next::<ClientMessage>() => match frame {
                Ok(Some(message)) => {
                    trace!(%player, ?message, "received");
                    if inbound.send(Inbound::Message { player, message }).is_err() {
                        return;
                    }
                }
                Ok(None) => break,
                Err(e) if e.is_decode_failure() => {
                    debug!(%player, error = %e, "discarding undecodable frame");
                }
                Err(e) => {
                    debug!(%player, error = %e, "receive failed");
                    break;
                }
            },
        }
    }

    debug!(%player, "connection closed");
    registry.mark_unresponsive(&player).await;
    let _ = inbound.send(Inbound::Closed { player });
}
