//! Various constants, for use in various places. Mostly gameplay defaults, but there are a few for storage.

/// Constants with gameplay implications. These are the defaults for [`Rules`][crate::config::Rules]; a config file
/// can override them.
pub mod gameplay {
    /// How many skips a single player can rack up before they're sent to a punishment.
    pub const SKIPS_BEFORE_PUNISHMENT: u32 = 4;
    /// Every this many completed turns, the whole group gets an "everyone" prompt.
    pub const EVERYONE_INTERVAL: u32 = 8;
    /// The fewest players a game can be started with.
    pub const MIN_PLAYERS: usize = 2;
}

/// Constants relating to how sessions are saved.
pub mod storage {
    /// The single key the current session is stored under.
    pub const SESSION_KEY: &str = "aha_session";
    /// Extension of the files [`Directory`][crate::saves::fs::Directory] writes.
    pub const EXT: &str = "aha";
    /// Leading bytes of every save, so we never try to decode a random file.
    pub const MAGIC: &[u8; 8] = b"AHASAVE\0";
    /// Bumped whenever the encoded [`Session`][crate::session::Session] layout changes.
    pub const FORMAT_VERSION: u8 = 1;
}
