//! Where the turn engine meets storage.
//!
//! A [`Host`] owns a [`Machine`] and a [`Gateway`]. Building one loads the saved session first, so nothing can be
//! applied to a half-initialized game; after that, every command that changes the session is mirrored to storage.

use tracing::{info, warn};

use crate::{
    prompts::{InterstitialPrompt, Prompt},
    saves::{Gateway, Storage},
    session::{Command, Machine, Phase, Player, Session, Signal},
};

/// The thing the UI holds onto.
#[derive(Debug)]
pub struct Host<S: Storage> {
    machine: Machine,
    gateway: Gateway<S>,
}

impl<S: Storage> Host<S> {
    /// Load whatever was saved into `machine` and start mirroring.
    ///
    /// A saved session that breaks the session invariants under the machine's rules is thrown away, and the save
    /// cleared, rather than played.
    pub fn open(gateway: Gateway<S>, machine: Machine) -> Self {
        let min_players = machine.rules().min_players;
        let saved = gateway.load().and_then(|session| match session.validate(min_players) {
            Ok(()) => Some(session),
            Err(e) => {
                warn!(error = %e, "discarding invalid saved session");
                gateway.clear();
                None
            }
        });
        if let Some(session) = &saved {
            info!(depth = %session.depth, turn = session.turn_count, "resuming saved session");
        }
        Self {
            machine: machine.with_session(saved),
            gateway,
        }
    }

    /// Run a command, then save (or clear) if it changed anything.
    pub fn apply(&mut self, command: Command) -> Signal {
        let signal = self.machine.apply(command);
        if self.machine.untaint() {
            self.gateway.mirror(self.machine.session());
        }
        signal
    }

    /// A punishment to show after resuming into [`Phase::Punishment`]. See [`Machine::draw_punishment`].
    pub fn draw_punishment(&mut self) -> Option<InterstitialPrompt> {
        self.machine.draw_punishment()
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn gateway(&self) -> &Gateway<S> {
        &self.gateway
    }

    pub fn session(&self) -> Option<&Session> {
        self.machine.session()
    }

    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.machine.current_player()
    }

    pub fn current_prompt(&self) -> Option<&Prompt> {
        self.machine.current_prompt()
    }

    pub fn into_parts(self) -> (Machine, Gateway<S>) {
        (self.machine, self.gateway)
    }
}
