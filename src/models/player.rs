use std::fmt;
use std::net::SocketAddr;

use tokio::sync::mpsc;

use crate::protocol::ServerMessage;

/// Stable identity of a player: the peer address of their connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(SocketAddr);

impl PlayerId {
    pub fn new(addr: SocketAddr) -> Self {
        Self(addr)
    }

    pub fn addr(&self) -> SocketAddr {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Outbound handle of a player's connection.
///
/// Messages are queued for the connection's writer task, so sending never
/// waits on the network. Fails once the writer has gone away.
#[derive(Debug)]
pub struct PlayerLink {
    sender: mpsc::UnboundedSender<ServerMessage>,
}

impl PlayerLink {
    pub fn new(sender: mpsc::UnboundedSender<ServerMessage>) -> Self {
        Self { sender }
    }

    pub fn send(&self, msg: ServerMessage) -> bool {
        self.sender.send(msg).is_ok()
    }
}
