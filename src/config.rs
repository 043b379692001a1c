//! Runtime configuration: the gameplay [`Rules`] and where sessions get saved.
//!
//! Everything has a default, so an empty (or missing) config file is perfectly valid. Config files are TOML:
//!
//! ```toml
//! [rules]
//! skips_before_punishment = 3
//! everyone_interval = 10
//!
//! [saves]
//! dir = "/tmp/aha-saves"
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{constants::gameplay, util::setters};

/// Everything that can go wrong loading a config.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("couldn't read config file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid rules: {0}")]
    Rules(&'static str),
}

/// The numbers which drive the pacing of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rules {
    /// A player who reaches this many skips is sent to a punishment.
    pub skips_before_punishment: u32,
    /// Every turn count divisible by this triggers an "everyone" prompt.
    pub everyone_interval: u32,
    /// Fewest players a game can start with.
    pub min_players: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            skips_before_punishment: gameplay::SKIPS_BEFORE_PUNISHMENT,
            everyone_interval: gameplay::EVERYONE_INTERVAL,
            min_players: gameplay::MIN_PLAYERS,
        }
    }
}

impl Rules {
    setters! {
        pub fn punish_after(skips: u32) { skips_before_punishment = skips }
        pub fn everyone_every(turns: u32) { everyone_interval = turns }
        pub fn at_least(players: usize) { min_players = players }
    }

    /// Check these rules can actually run a game.
    pub fn validate(&self) -> Result<(), Error> {
        if self.skips_before_punishment == 0 {
            return Err(Error::Rules("skips_before_punishment must be at least 1"));
        }
        if self.everyone_interval == 0 {
            return Err(Error::Rules("everyone_interval must be at least 1"));
        }
        if self.min_players < gameplay::MIN_PLAYERS {
            return Err(Error::Rules("min_players must be at least 2"));
        }
        Ok(())
    }
}

/// Where and whether sessions are saved.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Saves {
    /// Directory to save into. `None` means the platform's data directory.
    pub dir: Option<PathBuf>,
    /// Keep the session in memory only; nothing survives a restart.
    pub ephemeral: bool,
}

/// The whole config file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub rules: Rules,
    pub saves: Saves,
}

impl Config {
    /// Parse a config from TOML text, validating the rules.
    pub fn from_toml(text: &str) -> Result<Self, Error> {
        let config: Config = toml::from_str(text)?;
        config.rules.validate()?;
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}
