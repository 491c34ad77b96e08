//! Player registry shared by the join phase and the game loop.
//!
//! Every operation takes the same lock, so registration, scoring and
//! iteration never interleave. Sends only push onto per-connection queues;
//! no network I/O happens while the lock is held.

use std::collections::HashMap;

use tokio::sync::{Mutex, watch};
use tracing::trace;

use crate::error::RegistryError;
use crate::models::{PlayerId, PlayerLink};
use crate::protocol::{LeaderboardEntry, ServerMessage};

/// Handle returned by a successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seat {
    pub id: PlayerId,
    /// 1-based registration order, equal to the player count right after
    /// this registration.
    pub number: usize,
}

struct Player {
    id: PlayerId,
    name: String,
    score: u32,
    responsive: bool,
    link: PlayerLink,
}

#[derive(Default)]
struct Roster {
    players: Vec<Player>,
    index: HashMap<PlayerId, usize>,
    closed: bool,
}

impl Roster {
    fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(*self.index.get(id)?)
    }

    fn get_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        let slot = *self.index.get(id)?;
        self.players.get_mut(slot)
    }
}

pub struct PlayerRegistry {
    roster: Mutex<Roster>,
    count: watch::Sender<usize>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        let (count, _) = watch::channel(0);
        Self {
            roster: Mutex::new(Roster::default()),
            count,
        }
    }

    /// Add a player. Re-registering a known identity is an error and leaves
    /// the existing entry untouched.
    pub async fn register(
        &self,
        id: PlayerId,
        name: String,
        link: PlayerLink,
    ) -> Result<Seat, RegistryError> {
        let mut roster = self.roster.lock().await;
        if roster.closed {
            return Err(RegistryError::Closed);
        }
        if roster.index.contains_key(&id) {
            return Err(RegistryError::DuplicateIdentity(id));
        }

        let slot = roster.players.len();
        roster.index.insert(id, slot);
        roster.players.push(Player {
            id,
            name,
            score: 0,
            responsive: true,
            link,
        });

        let number = roster.players.len();
        self.count.send_replace(number);
        Ok(Seat { id, number })
    }

    /// Refuse all further registrations.
    pub async fn close(&self) {
        self.roster.lock().await.closed = true;
    }

    /// Observe the number of registered players.
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.count.subscribe()
    }

    pub async fn len(&self) -> usize {
        self.roster.lock().await.players.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Identities in registration order.
    pub async fn ids(&self) -> Vec<PlayerId> {
        self.roster.lock().await.players.iter().map(|p| p.id).collect()
    }

    /// Identities of players whose connection is still readable.
    pub async fn responsive_ids(&self) -> Vec<PlayerId> {
        self.roster
            .lock()
            .await
            .players
            .iter()
            .filter(|p| p.responsive)
            .map(|p| p.id)
            .collect()
    }

    /// Point-in-time copy of names and scores, in registration order.
    pub async fn snapshot(&self) -> Vec<LeaderboardEntry> {
        self.roster
            .lock()
            .await
            .players
            .iter()
            .map(|p| LeaderboardEntry::new(p.name.clone(), p.score))
            .collect()
    }

    /// Add `delta` to a player's score and return the new total.
    /// Unknown identities are ignored.
    pub async fn add_score(&self, id: &PlayerId, delta: u32) -> Option<u32> {
        let mut roster = self.roster.lock().await;
        let player = roster.get_mut(id)?;
        player.score = player.score.saturating_add(delta);
        Some(player.score)
    }

    pub async fn mark_unresponsive(&self, id: &PlayerId) {
        if let Some(player) = self.roster.lock().await.get_mut(id) {
            player.responsive = false;
        }
    }

    /// Run `f` once per registered connection while holding the lock.
    pub async fn for_each_connection<F>(&self, mut f: F)
    where
        F: FnMut(PlayerId, &PlayerLink),
    {
        let roster = self.roster.lock().await;
        for player in &roster.players {
            f(player.id, &player.link);
        }
    }

    /// Queue `msg` for every player. A failed send only affects that player.
    /// Returns how many connections accepted the message.
    pub async fn broadcast(&self, msg: &ServerMessage) -> usize {
        let mut delivered = 0;
        self.for_each_connection(|id, link| {
            if link.send(msg.clone()) {
                delivered += 1;
            } else {
                trace!(player = %id, "broadcast skipped closed connection");
            }
        })
        .await;
        delivered
    }

    pub async fn send_to(&self, id: &PlayerId, msg: ServerMessage) -> bool {
        match self.roster.lock().await.get(id) {
            Some(player) => player.link.send(msg),
            None => false,
        }
    }
}

impl Default for PlayerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
