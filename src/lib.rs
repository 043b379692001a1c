//! aha is the engine behind a conversation-prompt party game. It's divided into a few parts, architecturally:
//!
//! - The [`prompts`] catalog: every question, sorted by how deep it goes, plus the "everyone" prompts and the
//!   punishments. It's read-only and knows nothing about who's playing.
//! - The [`session`] state machine, which owns the game in progress: who's playing, whose turn it is, what's been
//!   asked, and when someone has skipped one too many times. It's driven entirely by [`session::Command`]s and
//!   answers each one with a [`session::Signal`] telling the UI where to go next. It does no I/O at all.
//! - The [`saves`] layer, which mirrors the one current session into a key-value store so a game survives the app
//!   being closed.
//! - The [`Host`], which ties the last two together: it loads the saved session before anything else can happen,
//!   then saves after every command that changed something.
//!
//! The UI itself (screens, swipes, animation) isn't here. The `aha` binary is a bare-bones terminal stand-in for it.

pub mod config;
pub mod constants;
pub mod host;
pub mod prompts;
pub mod saves;
pub mod session;
mod util;

pub use crate::{
    config::{Config, Rules},
    host::Host,
    prompts::{Catalog, Depth, InterstitialPrompt, Prompt},
    session::{Command, Machine, Phase, Player, Session, Signal},
};
