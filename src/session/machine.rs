//! The turn engine. Everything a player can do to a session goes through [`Machine::apply`].

use std::{fmt, sync::Arc};

use rand::{rngs::SmallRng, SeedableRng};
use tracing::debug;

use crate::{
    config::{self, Rules},
    prompts::{Catalog, Depth, InterstitialPrompt, Prompt},
    util::{abbrev_debug, setters},
};

use super::{roster, Player, Session};

/// Something the UI asked the machine to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Pick a depth, starting a session if there isn't one. Wipes any game in progress but keeps the roster.
    ChooseDepth(Depth),
    /// Replace the roster with these names. Blank names are dropped.
    SetRoster(Vec<String>),
    /// Draw the first prompt and start play.
    Begin,
    /// The current player passes on their prompt.
    Skip,
    /// The current player answered; on to the next player.
    Answer,
    /// Back from a punishment; on to the next player.
    ResolvePunishment,
    /// Back from an "everyone" prompt.
    ResolveEveryone,
    /// Forgive one player (by id) all their skips, without touching whose turn it is.
    ResetSkips(String),
    /// Throw the session away.
    End,
}

/// What the UI has to do after a [`Command`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Signal {
    /// Carry on showing the current prompt.
    Continue,
    /// Show this punishment, then send [`Command::ResolvePunishment`].
    Punishment(InterstitialPrompt),
    /// Show this to the whole group, then send [`Command::ResolveEveryone`].
    Everyone(InterstitialPrompt),
    /// The command made no sense in the current phase, so nothing happened.
    Ignored,
}

impl Signal {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Signal::Ignored)
    }

    /// The interstitial to show, if any.
    pub fn interstitial(&self) -> Option<&InterstitialPrompt> {
        match self {
            Signal::Punishment(p) | Signal::Everyone(p) => Some(p),
            _ => None,
        }
    }
}

/// Which screen the game is on, more or less.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No session at all.
    Idle,
    /// Depth chosen, maybe a roster, but no prompt yet.
    Configuring,
    /// A prompt is on the table.
    Active,
    /// Waiting on [`Command::ResolvePunishment`].
    Punishment,
    /// Showing an "everyone" prompt. The next player's prompt is already drawn, so [`Command::ResolveEveryone`],
    /// [`Command::Answer`], and [`Command::Skip`] all carry on from here.
    Everyone,
}

/// Interstitial the UI was last routed to. Purely a routing hint; it's not part of the saved session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Interlude {
    Punishment,
    Everyone,
}

/// Owns the (at most one) session and applies commands to it.
///
/// The machine does no I/O. Whoever owns it should check [`Self::untaint`] after each command and mirror the
/// session to storage if it changed; [`Host`](crate::host::Host) does exactly that.
pub struct Machine {
    session: Option<Session>,
    catalog: Arc<Catalog>,
    rules: Rules,
    rng: SmallRng,
    interlude: Option<Interlude>,
    tainted: bool,
}

abbrev_debug! {
    Machine {
        session, rules, interlude;
        skip catalog, rng;
        unless tainted == false
    }
}

/// Draw a prompt the session hasn't seen (if it can) and put it on the table.
fn draw(catalog: &Catalog, session: &mut Session, rng: &mut SmallRng) {
    let prompt = catalog
        .select_prompt(session.depth, &session.used_prompt_ids, rng)
        .clone();
    session.show(prompt);
}

fn ignored(command: &'static str, why: &'static str) -> Signal {
    debug!(command, why, "ignored command");
    Signal::Ignored
}

impl Machine {
    /// A machine with no session, randomly seeded. Fails if `rules` can't run a game.
    pub fn new(catalog: Arc<Catalog>, rules: Rules) -> Result<Self, config::Error> {
        rules.validate()?;
        Ok(Self {
            session: None,
            catalog,
            rules,
            rng: SmallRng::from_entropy(),
            interlude: None,
            tainted: false,
        })
    }

    setters! {
        /// Use a fixed seed, so the same commands always draw the same prompts.
        pub fn seeded(seed: u64) { rng = SmallRng::seed_from_u64(seed) }
    }

    /// Pick up a previously saved session.
    ///
    /// If the current player had already hit the punishment threshold, the machine goes straight back to
    /// [`Phase::Punishment`].
    pub fn with_session(mut self, session: Option<Session>) -> Self {
        let threshold = self.rules.skips_before_punishment;
        self.interlude = session
            .as_ref()
            .filter(|s| s.is_active())
            .and_then(Session::current_player)
            .filter(|p| p.skips >= threshold)
            .map(|_| Interlude::Punishment);
        self.session = session;
        self.tainted = false;
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Whose turn it is, if anyone's.
    pub fn current_player(&self) -> Option<&Player> {
        self.session.as_ref().and_then(Session::current_player)
    }

    pub fn current_prompt(&self) -> Option<&Prompt> {
        self.session.as_ref().and_then(|s| s.current_prompt.as_ref())
    }

    pub fn phase(&self) -> Phase {
        match (&self.session, self.interlude) {
            (None, _) => Phase::Idle,
            (Some(s), _) if !s.is_active() => Phase::Configuring,
            (Some(_), Some(Interlude::Punishment)) => Phase::Punishment,
            (Some(_), Some(Interlude::Everyone)) => Phase::Everyone,
            (Some(_), None) => Phase::Active,
        }
    }

    /// Whether the session changed since the last call. Resets the flag.
    pub fn untaint(&mut self) -> bool {
        std::mem::replace(&mut self.tainted, false)
    }

    /// Draw a punishment to show, if one is due.
    ///
    /// [`Self::skip`] hands one out when it punishes, so this is only needed after a restore, when the machine is
    /// back in [`Phase::Punishment`] without one in hand. Draws from the machine's own RNG, so seeded machines stay
    /// reproducible.
    pub fn draw_punishment(&mut self) -> Option<InterstitialPrompt> {
        if self.phase() != Phase::Punishment {
            return None;
        }
        Some(self.catalog.select_punishment_prompt(&mut self.rng).clone())
    }

    fn punishing(&self) -> bool {
        self.interlude == Some(Interlude::Punishment)
    }

    /// Run a single command.
    pub fn apply(&mut self, command: Command) -> Signal {
        match command {
            Command::ChooseDepth(depth) => self.choose_depth(depth),
            Command::SetRoster(names) => self.set_roster(names),
            Command::Begin => self.begin(),
            Command::Skip => self.skip(),
            Command::Answer => self.answer(),
            Command::ResolvePunishment => self.resolve_punishment(),
            Command::ResolveEveryone => self.resolve_everyone(),
            Command::ResetSkips(id) => self.reset_skips(&id),
            Command::End => self.end(),
        }
    }

    /// See [`Command::ChooseDepth`].
    pub fn choose_depth(&mut self, depth: Depth) -> Signal {
        match &mut self.session {
            Some(session) => {
                session.depth = depth;
                session.current_player_index = 0;
                session.current_prompt = None;
                session.used_prompt_ids.clear();
                session.turn_count = 0;
            }
            None => self.session = Some(Session::new(depth)),
        }
        debug!(%depth, "depth chosen");
        self.interlude = None;
        self.tainted = true;
        Signal::Continue
    }

    /// See [`Command::SetRoster`]. Only allowed before play starts, and only with enough real names.
    pub fn set_roster<S: AsRef<str>>(&mut self, names: impl IntoIterator<Item = S>) -> Signal {
        let session = match &mut self.session {
            Some(s) if !s.is_active() => s,
            Some(_) => return ignored("set_roster", "game already in progress"),
            None => return ignored("set_roster", "no session"),
        };
        let players = roster(names, &mut self.rng);
        if players.len() < self.rules.min_players {
            return ignored("set_roster", "not enough players");
        }
        debug!(players = players.len(), "roster set");
        session.players = players;
        session.current_player_index = 0;
        self.tainted = true;
        Signal::Continue
    }

    /// See [`Command::Begin`].
    pub fn begin(&mut self) -> Signal {
        let session = match &mut self.session {
            Some(s) if !s.is_active() => s,
            Some(_) => return ignored("begin", "game already in progress"),
            None => return ignored("begin", "no session"),
        };
        if session.players.len() < self.rules.min_players {
            return ignored("begin", "not enough players");
        }
        session.used_prompt_ids.clear();
        draw(&self.catalog, session, &mut self.rng);
        session.current_player_index = 0;
        session.turn_count = 1;
        debug!(depth = %session.depth, players = session.players.len(), "play started");
        self.interlude = None;
        self.tainted = true;
        Signal::Continue
    }

    /// See [`Command::Skip`]. The same player gets a fresh prompt, unless they've skipped too much, in which case
    /// they're punished and the prompt stays put until [`Self::resolve_punishment`].
    pub fn skip(&mut self) -> Signal {
        let threshold = self.rules.skips_before_punishment;
        if self.punishing() {
            return ignored("skip", "punishment pending");
        }
        let session = match self.session.as_mut().filter(|s| s.is_active()) {
            Some(s) => s,
            None => return ignored("skip", "not playing"),
        };
        let player = match session.current_player_mut() {
            Some(p) => p,
            None => return ignored("skip", "no current player"),
        };
        player.skips += 1;
        self.tainted = true;
        if player.skips >= threshold {
            debug!(player = %player.name, skips = player.skips, "punishment due");
            self.interlude = Some(Interlude::Punishment);
            return Signal::Punishment(self.catalog.select_punishment_prompt(&mut self.rng).clone());
        }
        draw(&self.catalog, session, &mut self.rng);
        self.interlude = None;
        Signal::Continue
    }

    /// See [`Command::Answer`]. The turn always moves on and a new prompt is always drawn, even when an "everyone"
    /// interstitial is due; the interstitial is shown in front of the next player's prompt.
    pub fn answer(&mut self) -> Signal {
        if self.punishing() {
            return ignored("answer", "punishment pending");
        }
        let session = match self.session.as_mut().filter(|s| s.is_active()) {
            Some(s) => s,
            None => return ignored("answer", "not playing"),
        };
        session.turn_count += 1;
        let everyone = session.turn_count % self.rules.everyone_interval == 0;
        session.advance();
        draw(&self.catalog, session, &mut self.rng);
        self.tainted = true;
        if everyone {
            debug!(turn = session.turn_count, "everyone due");
            self.interlude = Some(Interlude::Everyone);
            Signal::Everyone(self.catalog.select_group_prompt(&mut self.rng).clone())
        } else {
            self.interlude = None;
            Signal::Continue
        }
    }

    /// See [`Command::ResolvePunishment`]. Clears the punished player's skips and moves to the next player. Only
    /// does anything while a punishment is pending.
    pub fn resolve_punishment(&mut self) -> Signal {
        if !self.punishing() {
            return ignored("resolve_punishment", "no punishment pending");
        }
        let session = match self.session.as_mut().filter(|s| s.is_active()) {
            Some(s) => s,
            None => return ignored("resolve_punishment", "not playing"),
        };
        if let Some(player) = session.current_player_mut() {
            player.skips = 0;
        }
        session.advance();
        draw(&self.catalog, session, &mut self.rng);
        session.turn_count += 1;
        self.interlude = None;
        self.tainted = true;
        Signal::Continue
    }

    /// See [`Command::ResolveEveryone`]. [`Self::answer`] already moved the turn on before the interstitial was
    /// shown, so the session itself is left alone.
    pub fn resolve_everyone(&mut self) -> Signal {
        match self.session.as_ref().filter(|s| s.is_active()) {
            Some(_) => {
                if self.interlude == Some(Interlude::Everyone) {
                    self.interlude = None;
                }
                Signal::Continue
            }
            None => ignored("resolve_everyone", "not playing"),
        }
    }

    /// See [`Command::ResetSkips`]. An unknown id is ignored.
    pub fn reset_skips(&mut self, id: &str) -> Signal {
        let session = match &mut self.session {
            Some(s) => s,
            None => return ignored("reset_skips", "no session"),
        };
        match session.players.iter_mut().find(|p| p.id == id) {
            Some(player) => {
                debug!(player = %player.name, skips = player.skips, "skips reset");
                player.skips = 0;
                self.tainted = true;
                Signal::Continue
            }
            None => ignored("reset_skips", "no such player"),
        }
    }

    /// See [`Command::End`].
    pub fn end(&mut self) -> Signal {
        if self.session.take().is_none() {
            return ignored("end", "no session");
        }
        debug!("session ended");
        self.interlude = None;
        self.tainted = true;
        Signal::Continue
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use rand::{rngs::SmallRng, Rng, SeedableRng};

    use super::*;

    fn machine() -> Machine {
        Machine::new(Catalog::builtin(), Rules::default())
            .expect("default rules rejected")
            .seeded(42)
    }

    fn playing(names: &[&str], depth: Depth) -> Machine {
        let mut m = machine();
        assert_eq!(m.choose_depth(depth), Signal::Continue);
        assert_eq!(m.set_roster(names), Signal::Continue);
        assert_eq!(m.begin(), Signal::Continue);
        m
    }

    fn session(m: &Machine) -> &Session {
        m.session().expect("machine has no session")
    }

    fn index(m: &Machine) -> usize {
        session(m).current_player_index
    }

    #[test]
    fn starts_idle() {
        let m = machine();
        assert_eq!(m.phase(), Phase::Idle);
        assert!(m.session().is_none());
        assert!(m.current_player().is_none());
        assert!(m.current_prompt().is_none());
    }

    #[test]
    fn everything_ignored_without_session() {
        let mut m = machine();
        for cmd in [
            Command::SetRoster(vec!["Ann".into(), "Ben".into()]),
            Command::Begin,
            Command::Skip,
            Command::Answer,
            Command::ResolvePunishment,
            Command::ResolveEveryone,
            Command::ResetSkips("player-0-00000000".into()),
            Command::End,
        ] {
            assert_eq!(m.apply(cmd.clone()), Signal::Ignored, "{:?} wasn't ignored", cmd);
        }
        assert!(!m.untaint());
        assert_eq!(m.phase(), Phase::Idle);
    }

    #[test]
    fn choose_depth_creates_empty_session() {
        let mut m = machine();
        m.choose_depth(Depth::Medium);
        let s = session(&m);
        assert_eq!(s, &Session::new(Depth::Medium));
        assert_eq!(m.phase(), Phase::Configuring);
        assert!(m.untaint());
    }

    #[test]
    fn choose_depth_keeps_roster_and_resets_progress() {
        let mut m = playing(&["Ann", "Ben", "Cat"], Depth::Light);
        m.answer();
        m.answer();
        let roster = session(&m).players.clone();

        m.choose_depth(Depth::Deep);
        let s = session(&m);
        assert_eq!(s.players, roster);
        assert_eq!(s.depth, Depth::Deep);
        assert_eq!(s.current_player_index, 0);
        assert_eq!(s.current_prompt, None);
        assert!(s.used_prompt_ids.is_empty());
        assert_eq!(s.turn_count, 0);
        assert_eq!(m.phase(), Phase::Configuring);
    }

    #[test]
    fn roster_needs_two_real_names() {
        let mut m = machine();
        m.choose_depth(Depth::Light);
        m.untaint();
        assert_eq!(m.set_roster(["Ann", "  ", ""]), Signal::Ignored);
        assert!(session(&m).players.is_empty());
        assert!(!m.untaint());

        assert_eq!(m.set_roster([" Ann", "Ben "]), Signal::Continue);
        let names: Vec<_> = session(&m).players.iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, ["Ann", "Ben"]);
        assert!(m.untaint());
    }

    #[test]
    fn roster_locked_during_play() {
        let mut m = playing(&["Ann", "Ben"], Depth::Light);
        assert_eq!(m.set_roster(["Cat", "Dan"]), Signal::Ignored);
        assert_eq!(session(&m).players[0].name, "Ann");
    }

    #[test]
    fn begin_needs_roster() {
        let mut m = machine();
        m.choose_depth(Depth::Light);
        assert_eq!(m.begin(), Signal::Ignored);
        assert_eq!(m.phase(), Phase::Configuring);
    }

    #[test]
    fn begin_only_once() {
        let mut m = playing(&["Ann", "Ben"], Depth::Light);
        m.answer();
        assert_eq!(m.begin(), Signal::Ignored);
        assert_eq!(session(&m).turn_count, 2);
    }

    #[test]
    fn begin_draws_first_prompt() {
        let m = playing(&["Ann", "Ben"], Depth::Light);
        let s = session(&m);
        let prompt = s.current_prompt.as_ref().expect("no prompt after begin");
        assert_eq!(prompt.depth, Depth::Light);
        assert_eq!(s.current_player_index, 0);
        assert_eq!(s.turn_count, 1);
        assert_eq!(s.used_prompt_ids, BTreeSet::from([prompt.id.clone()]));
        assert_eq!(m.phase(), Phase::Active);
        assert_eq!(m.current_player().map(|p| p.name.as_str()), Some("Ann"));
    }

    #[test]
    fn seven_answers_after_begin_reach_everyone() {
        let mut m = playing(&["Ann", "Ben"], Depth::Light);
        let mut indices = vec![index(&m)];
        for call in 1..=7 {
            let sig = m.answer();
            indices.push(index(&m));
            if call == 7 {
                assert!(matches!(sig, Signal::Everyone(_)), "no everyone on call 7: {:?}", sig);
            } else {
                assert_eq!(sig, Signal::Continue, "unexpected signal on call {}", call);
            }
        }
        assert_eq!(indices, [0, 1, 0, 1, 0, 1, 0, 1]);
        assert_eq!(session(&m).turn_count, 8);
        assert_eq!(m.phase(), Phase::Everyone);
    }

    #[test]
    fn eight_answers_from_zero_reach_everyone_once() {
        let m = playing(&["Ann", "Ben", "Cat"], Depth::Medium);
        let mut s = session(&m).clone();
        s.turn_count = 0;
        let mut m = machine().with_session(Some(s));
        for call in 1..=8 {
            let sig = m.answer();
            assert_eq!(sig.interstitial().is_some(), call == 8, "wrong signal on call {}: {:?}", call, sig);
        }
    }

    #[test]
    fn everyone_still_moves_turn_on() {
        let mut m = playing(&["Ann", "Ben", "Cat"], Depth::Deep);
        for _ in 0..6 {
            m.answer();
        }
        let before = session(&m).clone();
        let sig = m.answer();
        let group = sig.interstitial().expect("everyone not due");
        assert!(m.catalog().group_prompts().contains(group));
        let after = session(&m);
        assert_eq!(after.current_player_index, (before.current_player_index + 1) % 3);
        assert_ne!(after.current_prompt, before.current_prompt);
    }

    #[test]
    fn resolve_everyone_changes_nothing() {
        let mut m = playing(&["Ann", "Ben"], Depth::Light);
        for _ in 0..7 {
            m.answer();
        }
        assert_eq!(m.phase(), Phase::Everyone);
        m.untaint();
        let before = session(&m).clone();
        assert_eq!(m.resolve_everyone(), Signal::Continue);
        assert_eq!(session(&m), &before);
        assert!(!m.untaint());
        assert_eq!(m.phase(), Phase::Active);
    }

    #[test]
    fn fourth_skip_punishes() {
        let mut m = playing(&["Ann", "Ben"], Depth::Light);
        let start_turn = session(&m).turn_count;
        for call in 1..=3 {
            assert_eq!(m.skip(), Signal::Continue, "punished early on skip {}", call);
            assert_eq!(index(&m), 0);
            assert_eq!(session(&m).players[0].skips, call);
        }
        let prompt = session(&m).current_prompt.clone();
        let sig = m.skip();
        let punishment = match &sig {
            Signal::Punishment(p) => p,
            other => panic!("expected punishment, got {:?}", other),
        };
        assert!(m.catalog().punishment_prompts().contains(punishment));
        let s = session(&m);
        assert_eq!(s.current_player_index, 0);
        assert_eq!(s.players[0].skips, 4);
        assert_eq!(s.current_prompt, prompt, "punishment drew a new prompt");
        assert_eq!(s.turn_count, start_turn);
        assert_eq!(s.used_prompt_ids.len(), 4);
        assert_eq!(m.phase(), Phase::Punishment);
    }

    #[test]
    fn skips_draw_fresh_prompts_for_same_player() {
        let mut m = playing(&["Ann", "Ben"], Depth::Medium);
        let mut seen = BTreeSet::new();
        seen.insert(session(&m).current_prompt.clone().expect("no prompt").id);
        for _ in 0..3 {
            m.skip();
            let p = session(&m).current_prompt.clone().expect("no prompt");
            assert_eq!(p.depth, Depth::Medium);
            assert!(seen.insert(p.id), "skip repeated a prompt");
        }
        assert_eq!(session(&m).used_prompt_ids, seen);
    }

    #[test]
    fn resolve_punishment_resets_and_moves_on() {
        let mut m = playing(&["Ann", "Ben"], Depth::Light);
        for _ in 0..4 {
            m.skip();
        }
        let before = session(&m).clone();
        assert_eq!(m.resolve_punishment(), Signal::Continue);
        let s = session(&m);
        assert_eq!(s.players[0].skips, 0);
        assert_eq!(s.current_player_index, 1);
        assert_eq!(m.current_player().map(|p| p.name.as_str()), Some("Ben"));
        assert_eq!(s.turn_count, before.turn_count + 1);
        let prompt = s.current_prompt.as_ref().expect("no prompt");
        assert!(s.used_prompt_ids.contains(&prompt.id));
        assert!(!before.used_prompt_ids.contains(&prompt.id));
        assert_eq!(m.phase(), Phase::Active);
    }

    #[test]
    fn punishment_must_be_resolved_first() {
        let mut m = playing(&["Ann", "Ben"], Depth::Light);
        for _ in 0..4 {
            m.skip();
        }
        m.untaint();
        let before = session(&m).clone();
        assert_eq!(m.answer(), Signal::Ignored);
        assert_eq!(m.skip(), Signal::Ignored);
        assert_eq!(session(&m), &before);
        assert_eq!(m.phase(), Phase::Punishment);
        assert!(!m.untaint());

        assert_eq!(m.resolve_punishment(), Signal::Continue);
        assert_eq!(session(&m).players[0].skips, 0);
        assert_eq!(m.answer(), Signal::Continue);
    }

    #[test]
    fn resolve_punishment_needs_a_punishment() {
        let mut m = playing(&["Ann", "Ben"], Depth::Light);
        m.skip();
        m.untaint();
        let before = session(&m).clone();
        assert_eq!(m.resolve_punishment(), Signal::Ignored);
        assert_eq!(session(&m), &before);
        assert_eq!(index(&m), 0);
        assert!(!m.untaint());

        // an "everyone" prompt isn't a punishment either
        for _ in 0..7 {
            m.answer();
        }
        assert_eq!(m.phase(), Phase::Everyone);
        assert_eq!(m.resolve_punishment(), Signal::Ignored);
    }

    #[test]
    fn rejects_unplayable_rules() {
        for rules in [
            Rules::default().everyone_every(0),
            Rules::default().punish_after(0),
            Rules::default().at_least(1),
        ] {
            let made = Machine::new(Catalog::builtin(), rules);
            assert!(matches!(made, Err(config::Error::Rules(_))), "{:?} accepted", rules);
        }
    }

    #[test]
    fn draw_punishment_only_when_due() {
        let mut m = playing(&["Ann", "Ben"], Depth::Light);
        assert_eq!(m.draw_punishment(), None);
        for _ in 0..4 {
            m.skip();
        }
        let saved = session(&m).clone();

        let draw = || machine().with_session(Some(saved.clone())).draw_punishment();
        let drawn = draw().expect("no punishment drawn after restore");
        assert!(m.catalog().punishment_prompts().contains(&drawn));
        assert_eq!(draw(), Some(drawn));

        let mut restored = machine().with_session(Some(saved));
        restored.draw_punishment();
        assert!(!restored.untaint());
        restored.resolve_punishment();
        assert_eq!(restored.draw_punishment(), None);
    }

    #[test]
    fn reset_skips_forgives_one_player() {
        let mut m = playing(&["Ann", "Ben"], Depth::Light);
        m.skip();
        m.skip();
        m.answer();
        m.skip();
        m.untaint();
        let ann = session(&m).players[0].id.clone();
        let before = session(&m).clone();

        assert_eq!(m.apply(Command::ResetSkips(ann)), Signal::Continue);
        let s = session(&m);
        assert_eq!(s.players[0].skips, 0);
        assert_eq!(s.players[1].skips, 1);
        assert_eq!(s.current_player_index, before.current_player_index);
        assert_eq!(s.current_prompt, before.current_prompt);
        assert!(m.untaint());

        assert_eq!(m.reset_skips("nobody"), Signal::Ignored);
        assert!(!m.untaint());
    }

    #[test]
    fn skips_are_per_player() {
        let mut m = playing(&["Ann", "Ben"], Depth::Light);
        m.skip();
        m.skip();
        m.skip();
        m.answer();
        // Ben's turn; Ann's three skips stay with Ann
        assert_eq!(m.skip(), Signal::Continue);
        let s = session(&m);
        assert_eq!(s.players[0].skips, 3);
        assert_eq!(s.players[1].skips, 1);
    }

    #[test]
    fn custom_rules_apply() {
        let rules = Rules::default().punish_after(2).everyone_every(3);
        let mut m = Machine::new(Catalog::builtin(), rules).expect("rules rejected").seeded(7);
        m.choose_depth(Depth::Deep);
        m.set_roster(["Ann", "Ben"]);
        m.begin();
        assert_eq!(m.skip(), Signal::Continue);
        assert!(matches!(m.skip(), Signal::Punishment(_)));
        m.resolve_punishment();
        // turn count is now 2, so the next answer makes it 3
        assert!(matches!(m.answer(), Signal::Everyone(_)));
    }

    #[test]
    fn no_repeats_until_depth_exhausted() {
        let mut m = playing(&["Ann", "Ben", "Cat"], Depth::Light);
        let total = m.catalog().prompts(Depth::Light).count();
        let mut shown = vec![session(&m).current_prompt.clone().expect("no prompt").id];
        for _ in 1..total {
            m.answer();
            shown.push(session(&m).current_prompt.clone().expect("no prompt").id);
        }
        let unique: BTreeSet<_> = shown.iter().collect();
        assert_eq!(unique.len(), total);

        // and once they've all been seen, the game keeps going with repeats
        m.answer();
        let s = session(&m);
        assert_eq!(s.used_prompt_ids.len(), total);
        assert_eq!(s.current_prompt.as_ref().map(|p| p.depth), Some(Depth::Light));
    }

    #[test]
    fn current_player_always_valid() {
        let mut m = playing(&["Ann", "Ben", "Cat"], Depth::Medium);
        let mut rng = SmallRng::seed_from_u64(99);
        for _ in 0..1000 {
            let cmd = match m.phase() {
                Phase::Punishment => Command::ResolvePunishment,
                Phase::Everyone => Command::ResolveEveryone,
                _ if rng.gen_bool(0.4) => Command::Skip,
                _ => Command::Answer,
            };
            assert_ne!(m.apply(cmd), Signal::Ignored);
            let s = session(&m);
            assert!(s.current_player_index < s.players.len());
            assert!(s.current_prompt.is_some());
            assert!(s.players.iter().all(|p| p.skips <= 4));
        }
    }

    #[test]
    fn two_player_punishment_scenario() {
        let mut m = playing(&["Ann", "Ben"], Depth::Light);
        let signals: Vec<_> = (0..4).map(|_| m.skip()).collect();
        assert!(signals[..3].iter().all(|s| *s == Signal::Continue));
        assert!(matches!(signals[3], Signal::Punishment(_)));
        m.resolve_punishment();
        let s = session(&m);
        assert_eq!(s.players[0].skips, 0);
        assert_eq!(s.current_player_index, 1);
    }

    #[test]
    fn end_clears_session() {
        let mut m = playing(&["Ann", "Ben"], Depth::Light);
        m.untaint();
        assert_eq!(m.end(), Signal::Continue);
        assert!(m.session().is_none());
        assert_eq!(m.phase(), Phase::Idle);
        assert!(m.untaint());
        assert_eq!(m.end(), Signal::Ignored);
    }

    #[test]
    fn untaint_resets() {
        let mut m = playing(&["Ann", "Ben"], Depth::Light);
        assert!(m.untaint());
        assert!(!m.untaint());
        m.answer();
        assert!(m.untaint());
    }

    #[test]
    fn restore_resumes_punishment() {
        let mut m = playing(&["Ann", "Ben"], Depth::Light);
        for _ in 0..4 {
            m.skip();
        }
        let saved = session(&m).clone();
        let restored = machine().with_session(Some(saved.clone()));
        assert_eq!(restored.phase(), Phase::Punishment);
        assert_eq!(restored.session(), Some(&saved));

        let mut fresh = playing(&["Ann", "Ben"], Depth::Light);
        fresh.skip();
        let restored = machine().with_session(fresh.session().cloned());
        assert_eq!(restored.phase(), Phase::Active);
    }

    #[test]
    fn seeded_machines_agree() {
        let run = || {
            let mut m = playing(&["Ann", "Ben"], Depth::Deep);
            for _ in 0..5 {
                m.answer();
            }
            session(&m).used_prompt_ids.clone()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn debug_leaves_out_catalog() {
        let text = format!("{:?}", machine());
        assert!(text.starts_with("Machine { session: None"));
        assert!(text.contains("catalog: .."));
        assert!(!text.contains("tainted"));
        assert!(!text.contains("rng: SmallRng"));

        let mut m = machine();
        m.choose_depth(Depth::Light);
        assert!(format!("{:?}", m).ends_with("tainted: true }"));
    }
}
