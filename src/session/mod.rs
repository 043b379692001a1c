//! The session record and the state machine that drives it.
//!
//! [`Session`] is plain data: it's what gets saved and restored. All the rules about how it changes live in
//! [`Machine`], which is the only thing that should be mutating a live session.

mod machine;

pub use machine::{Command, Machine, Phase, Signal};

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::prompts::{Depth, Prompt};

/// Someone sitting at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Stable for the whole session
    pub id: String,
    pub name: String,
    /// Skips since this player's last punishment
    pub skips: u32,
}

/// Turn a list of typed-in names into a roster, trimming whitespace and dropping blank entries.
///
/// Ids look like `player-<index>-<stamp>`, where the stamp is drawn once per roster, so two rosters made from the
/// same names still get different ids.
pub fn roster<R: Rng>(names: impl IntoIterator<Item = impl AsRef<str>>, rng: &mut R) -> Vec<Player> {
    let stamp: u32 = rng.gen();
    names
        .into_iter()
        .filter_map(|name| {
            let name = name.as_ref().trim();
            (!name.is_empty()).then(|| name.to_owned())
        })
        .enumerate()
        .map(|(index, name)| Player {
            id: format!("player-{}-{:08x}", index, stamp),
            name,
            skips: 0,
        })
        .collect()
}

/// Whether enough real names were typed in to start a game. The UI should only offer "start" when this is true.
pub fn roster_ready(names: impl IntoIterator<Item = impl AsRef<str>>, min_players: usize) -> bool {
    names.into_iter().filter(|n| !n.as_ref().trim().is_empty()).count() >= min_players
}

/// Ways a (usually freshly loaded) session can be broken.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum InvalidSession {
    #[error("active session has only {0} player(s)")]
    TooFewPlayers(usize),
    #[error("current player {index} is out of range for {players} player(s)")]
    IndexOutOfRange { index: usize, players: usize },
    #[error("current prompt is {prompt} but the session is {session}")]
    DepthMismatch { prompt: Depth, session: Depth },
}

/// Everything about the game in progress. There's at most one of these at a time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub depth: Depth,
    /// Turn order is index order
    pub players: Vec<Player>,
    pub current_player_index: usize,
    /// `None` until the game starts
    pub current_prompt: Option<Prompt>,
    /// Every prompt shown this session, so they aren't repeated until the depth runs dry
    pub used_prompt_ids: BTreeSet<String>,
    /// Starts at 1 when play begins; paces the "everyone" interstitials
    pub turn_count: u32,
}

impl Session {
    /// A new, unstarted session with nobody in it yet.
    pub fn new(depth: Depth) -> Self {
        Self {
            depth,
            players: vec![],
            current_player_index: 0,
            current_prompt: None,
            used_prompt_ids: BTreeSet::new(),
            turn_count: 0,
        }
    }

    /// Whether play has started, i.e. there's a prompt on the table.
    pub fn is_active(&self) -> bool {
        self.current_prompt.is_some()
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    pub(crate) fn current_player_mut(&mut self) -> Option<&mut Player> {
        self.players.get_mut(self.current_player_index)
    }

    /// Hand the turn to the next player, wrapping around.
    pub(crate) fn advance(&mut self) {
        if !self.players.is_empty() {
            self.current_player_index = (self.current_player_index + 1) % self.players.len();
        }
    }

    /// Put a prompt on the table and remember it's been used.
    pub(crate) fn show(&mut self, prompt: Prompt) {
        self.used_prompt_ids.insert(prompt.id.clone());
        self.current_prompt = Some(prompt);
    }

    /// Check the invariants an active session has to hold. Unstarted sessions are always fine.
    pub fn validate(&self, min_players: usize) -> Result<(), InvalidSession> {
        let prompt = match &self.current_prompt {
            Some(p) => p,
            None => return Ok(()),
        };
        if self.players.len() < min_players {
            return Err(InvalidSession::TooFewPlayers(self.players.len()));
        }
        if self.current_player_index >= self.players.len() {
            return Err(InvalidSession::IndexOutOfRange {
                index: self.current_player_index,
                players: self.players.len(),
            });
        }
        if prompt.depth != self.depth {
            return Err(InvalidSession::DepthMismatch {
                prompt: prompt.depth,
                session: self.depth,
            });
        }
        Ok(())
    }
}
