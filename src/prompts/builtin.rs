//! The prompts that ship with the game.

use std::sync::Arc;

use super::{Catalog, Depth, InterstitialPrompt, Prompt};

/// Build a list of [`Prompt`]s: `Depth "id": "text"`, optionally followed by `=> "note"`.
macro_rules! prompts {
    ( $( $depth:ident $id:literal : $text:literal $( => $note:literal )? ),* $(,)? ) => {
        vec![ $(
            Prompt {
                id: $id.into(),
                text: $text.into(),
                depth: Depth::$depth,
                note: None $( .or(Some(String::from($note))) )?,
            }
        ),* ]
    };
}

/// Build a list of [`InterstitialPrompt`]s: `"id": "text"`.
macro_rules! interstitials {
    ( $( $id:literal : $text:literal ),* $(,)? ) => {
        vec![ $(
            InterstitialPrompt { id: $id.into(), text: $text.into() }
        ),* ]
    };
}

fn prompts() -> Vec<Prompt> {
    prompts![
        Light "l1": "What's a small thing that made you smile this week?",
        Light "l2": "If you could have dinner with anyone alive, who would it be?",
        Light "l3": "What's the best meal you've ever had?",
        Light "l4": "If you won the lottery tomorrow, what's the first thing you'd do?",
        Light "l5": "What's a skill you'd love to learn?",
        Light "l6": "What song has been stuck in your head lately?",
        Light "l7": "What's your go-to comfort food?",
        Light "l8": "If you could live anywhere for a year, where would it be?",
        Light "l9": "What's the best gift you've ever received?",
        Light "l10": "What's something you're looking forward to?",
        Light "l11": "What's the last thing that made you laugh out loud?",
        Light "l12": "What's your favorite way to spend a Sunday?",
        Light "l13": "If you could have any superpower for a day, what would you choose?",
        Light "l14": "What's a movie you can watch over and over?",
        Light "l15": "What's the best advice you've ever received?",
        Light "l16": "What is your favourite color? Why?" => "The interpretation/meaning reveals how they see symbolism and self-expression.",
        Light "l17": "What's a prediction for end of this year?",

        Medium "m1": "What's something you've changed your mind about in the last few years?",
        Medium "m2": "What's a fear you've overcome?",
        Medium "m3": "When do you feel most like yourself?",
        Medium "m4": "What's something you wish you could tell your younger self?",
        Medium "m5": "What's a moment when you felt truly proud of yourself?",
        Medium "m6": "What does friendship mean to you?",
        Medium "m7": "What's something you're still learning about yourself?",
        Medium "m8": "What's a relationship that has shaped who you are?",
        Medium "m9": "What's something you need more of in your life?",
        Medium "m10": "When did you last step out of your comfort zone?",
        Medium "m11": "What's something you've never told anyone in this room?",
        Medium "m12": "What's a mistake that taught you something valuable?",
        Medium "m13": "What do you think your friends value most about you?",
        Medium "m14": "What's something you've been putting off?",
        Medium "m15": "What brings you peace?",
        Medium "m16": "What's the most special question you were asked?",
        Medium "m17": "What time of day feels most like 'you'?",
        Medium "m18": "What object do you feel weirdly attached to?" => "Points to memory, security, or identity anchors.",
        Medium "m19": "What's something you said 'yes' to that cost you something?",
        Medium "m20": "Who were you trying to impress five years ago?",

        Deep "d1": "What is your favourite form of water? And why?\n\nE.g. ocean, lake, mist, clouds, fanta, or anything that is made of water." => "The reason indicates how they define and view love.",
        Deep "d2": "What do you think happens after we die?",
        Deep "d3": "What's the hardest truth you've had to accept about yourself?",
        Deep "d4": "What does love mean to you?" => "Listen for how they experience giving and receiving love.",
        Deep "d5": "What are you most afraid of in life?",
        Deep "d6": "What would you do differently if you knew no one would judge you?",
        Deep "d7": "What is here now when there is nothing to do?" => "A meditation question - notice what arises in stillness.",
        Deep "d8": "What do you think is the purpose of suffering?",
        Deep "d9": "When do you feel most disconnected from yourself?",
        Deep "d10": "What would you want said at your funeral?",
        Deep "d11": "What part of yourself have you hidden from others?",
        Deep "d12": "What is the most meaningful experience you've ever had?",
        Deep "d13": "What keeps you up at night?",
        Deep "d14": "If today was your last day, what would you regret not saying?",
        Deep "d15": "What does being truly present mean to you?" => "Notice if they speak from concept or experience.",
        Deep "d16": "What was the most important decision in your life up to this point?",
        Deep "d17": "What are the three most important milestones that led you to here today?" => "Jensen Huang asked Joe Rogan this question.",
        Deep "d18": "If you are on your last day on earth, pick one exercise, one meal, one drug, and one person to see…" => "From Chazi.",
        Deep "d19": "Your seven deadly sins?",
        Deep "d20": "What part of your life feels unfinished?",
        Deep "d21": "What's your biggest fear?",
        Deep "d22": "What would you do once you retire?" => "Why wait to retire to enjoy this very moment? (From Chazi)",
    ]
}

fn group() -> Vec<InterstitialPrompt> {
    interstitials![
        "e1": "Take 2 Deep breaths pls",
        "e2": "Close your eyes for 10 seconds, observe the next thought that comes to your mind",
        "e3": "look in the eyes of the person to your right for 10 seconds… ",
        "e4": "Take a moment to appreciate this moment",
    ]
}

fn punishment() -> Vec<InterstitialPrompt> {
    interstitials![
        "p1": "Take a dare from the person to your right",
        "p2": "Let the group go through your camera roll for 30 seconds",
        "p3": "Do your best impression of someone in this room",
        "p4": "Send a text to your most recent contact saying 'I've been thinking about you'",
        "p5": "Speak in an accent of the group's choice for the next 3 rounds",
        "p6": "Give a 30-second motivational speech about socks",
        "p7": "Let the person to your left draw something on your hand",
        "p8": "Do 10 jumping jacks while singing your favorite song",
        "p9": "Call a friend and tell them you love them without any context",
        "p10": "Let the group choose your phone wallpaper for a week",
        "p11": "Give a genuine compliment to everyone in the room",
        "p12": "Do your best celebrity impression and let the group guess who",
        "p13": "Read your last 3 sent texts out loud",
        "p14": "Let someone send a message to anyone from your phone",
        "p15": "Dance for 20 seconds with no music",
        "p16": "Share the last thing you searched on the internet",
    ]
}

lazy_static::lazy_static! {
    /// Built on first use and shared from then on. It skips [`Catalog::new`]'s checks; the tests below make sure
    /// it would pass them.
    static ref BUILTIN: Arc<Catalog> = Arc::new(Catalog {
        prompts: prompts(),
        group: group(),
        punishment: punishment(),
    });
}

/// See [`Catalog::builtin`].
pub(super) fn catalog() -> Arc<Catalog> {
    Arc::clone(&BUILTIN)
}
