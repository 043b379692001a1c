//! The prompt catalog: every question the game can ask, plus the "everyone" and punishment interstitials.
//!
//! A [`Catalog`] is immutable once built. All the selection methods are pure apart from the RNG you hand them, so
//! seeding that RNG makes a whole game reproducible.

mod builtin;

use std::{collections::BTreeSet, fmt, str::FromStr, sync::Arc};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// How personal a prompt gets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    Light,
    Medium,
    Deep,
}

impl Depth {
    /// Every depth, shallowest first.
    pub const ALL: [Depth; 3] = [Depth::Light, Depth::Medium, Depth::Deep];

    pub fn name(self) -> &'static str {
        match self {
            Depth::Light => "light",
            Depth::Medium => "medium",
            Depth::Deep => "deep",
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing something that isn't `light`, `medium`, or `deep`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown depth {0:?} (expected light, medium, or deep)")]
pub struct UnknownDepth(pub String);

impl FromStr for Depth {
    type Err = UnknownDepth;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Depth::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownDepth(s.to_owned()))
    }
}

/// A single conversation prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// Unique across the whole catalog
    pub id: String,
    pub text: String,
    pub depth: Depth,
    /// Optional hint for whoever's listening, e.g. what the answer tends to reveal
    pub note: Option<String>,
}

impl Prompt {
    pub fn new(id: impl Into<String>, text: impl Into<String>, depth: Depth) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            depth,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// A group or punishment prompt. These don't have a depth and can repeat freely.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterstitialPrompt {
    pub id: String,
    pub text: String,
}

impl InterstitialPrompt {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Reasons a set of prompts can't be made into a [`Catalog`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("prompt id {0:?} is used more than once")]
    DuplicateId(String),
    #[error("there are no {0} prompts")]
    NoPrompts(Depth),
    #[error("there are no group prompts")]
    NoGroupPrompts,
    #[error("there are no punishment prompts")]
    NoPunishmentPrompts,
}

/// Every prompt the game can draw from.
///
/// Construction guarantees each depth and both interstitial pools have at least one entry, which is what lets the
/// `select_*` methods always return something.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    prompts: Vec<Prompt>,
    group: Vec<InterstitialPrompt>,
    punishment: Vec<InterstitialPrompt>,
}

/// Uniformly pick one item. `pool` must not be empty.
fn pick<'a, T, R: Rng>(pool: &[&'a T], rng: &mut R) -> &'a T {
    pool[rng.gen_range(0..pool.len())]
}

impl Catalog {
    /// Build a custom catalog, checking ids are unique and no pool is empty.
    pub fn new(
        prompts: Vec<Prompt>,
        group: Vec<InterstitialPrompt>,
        punishment: Vec<InterstitialPrompt>,
    ) -> Result<Self, CatalogError> {
        {
            let mut seen = BTreeSet::new();
            let ids = prompts
                .iter()
                .map(|p| &p.id)
                .chain(group.iter().map(|p| &p.id))
                .chain(punishment.iter().map(|p| &p.id));
            for id in ids {
                if !seen.insert(id.as_str()) {
                    return Err(CatalogError::DuplicateId(id.clone()));
                }
            }
        }
        for depth in Depth::ALL {
            if !prompts.iter().any(|p| p.depth == depth) {
                return Err(CatalogError::NoPrompts(depth));
            }
        }
        if group.is_empty() {
            return Err(CatalogError::NoGroupPrompts);
        }
        if punishment.is_empty() {
            return Err(CatalogError::NoPunishmentPrompts);
        }
        Ok(Self {
            prompts,
            group,
            punishment,
        })
    }

    /// The catalog that ships with the game. Built once per process; every call shares it.
    pub fn builtin() -> Arc<Catalog> {
        builtin::catalog()
    }

    /// All the prompts of one depth, in catalog order.
    pub fn prompts(&self, depth: Depth) -> impl Iterator<Item = &Prompt> + '_ {
        self.prompts.iter().filter(move |p| p.depth == depth)
    }

    /// Look up a prompt by id.
    pub fn get(&self, id: &str) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.id == id)
    }

    pub fn group_prompts(&self) -> &[InterstitialPrompt] {
        &self.group
    }

    pub fn punishment_prompts(&self) -> &[InterstitialPrompt] {
        &self.punishment
    }

    /// Pick a random prompt of the given depth that isn't in `used`.
    ///
    /// Once every prompt of that depth has been used, repeats are allowed: this picks from the whole tier instead.
    pub fn select_prompt<R: Rng>(&self, depth: Depth, used: &BTreeSet<String>, rng: &mut R) -> &Prompt {
        let fresh: Vec<_> = self.prompts(depth).filter(|p| !used.contains(&p.id)).collect();
        if !fresh.is_empty() {
            return pick(&fresh, rng);
        }
        let all: Vec<_> = self.prompts(depth).collect();
        pick(&all, rng)
    }

    /// Pick a random "everyone" prompt. Repeats are always allowed.
    pub fn select_group_prompt<R: Rng>(&self, rng: &mut R) -> &InterstitialPrompt {
        let all: Vec<_> = self.group.iter().collect();
        pick(&all, rng)
    }

    /// Pick a random punishment. Repeats are always allowed.
    pub fn select_punishment_prompt<R: Rng>(&self, rng: &mut R) -> &InterstitialPrompt {
        let all: Vec<_> = self.punishment.iter().collect();
        pick(&all, rng)
    }
}
