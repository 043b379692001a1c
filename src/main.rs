//! A bare-bones terminal front end: plays the role the phone screens would, one line at a time.
//!
//! `q` ends the session for good. Closing input (Ctrl-D) just leaves, and the game picks up where it was next time.

use std::{
    fmt::Display,
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use aha::{
    saves::{Backend, Directory, Gateway, Memory, Storage},
    session::roster_ready,
    Catalog, Command, Config, Depth, Host, InterstitialPrompt, Machine, Phase, Signal,
};

#[derive(Parser, Debug)]
#[command(name = "aha", version, about = "Conversation prompts for a group, one turn at a time.")]
struct Args {
    /// Config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory to keep the saved session in
    #[arg(long, conflicts_with = "ephemeral")]
    saves: Option<PathBuf>,
    /// Don't save anything
    #[arg(long)]
    ephemeral: bool,
    /// Seed the prompt shuffle, for a reproducible game
    #[arg(long)]
    seed: Option<u64>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn backend(args: &Args, config: &Config) -> Result<Backend> {
    if args.ephemeral || config.saves.ephemeral {
        return Ok(Memory::default().into());
    }
    let dir = args
        .saves
        .clone()
        .or_else(|| config.saves.dir.clone())
        .or_else(Directory::default_location)
        .context("nowhere to save; pass --saves DIR or --ephemeral")?;
    Ok(Directory::open(dir).into())
}

/// Line-at-a-time input and output.
struct Term<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Term<R, W> {
    /// Ask something and wait for a line. `None` means input is closed.
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{} ", question)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    fn say(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }
}

/// Show an interstitial and wait for the group to be done with it. Returns `false` if input closed.
fn interlude<R: BufRead, W: Write>(term: &mut Term<R, W>, title: &str, prompt: &InterstitialPrompt) -> Result<bool> {
    term.say(format!("\n*** {} ***\n{}\n", title, prompt.text))?;
    Ok(term.ask("(enter to continue)")?.is_some())
}

fn play<S: Storage, R: BufRead, W: Write>(host: &mut Host<S>, term: &mut Term<R, W>) -> Result<()> {
    loop {
        match host.phase() {
            Phase::Idle => {
                let Some(line) = term.ask("\nHow deep? (light / medium / deep, q to quit)")? else {
                    return Ok(());
                };
                if line == "q" {
                    return Ok(());
                }
                match line.parse::<Depth>() {
                    Ok(depth) => {
                        host.apply(Command::ChooseDepth(depth));
                    }
                    Err(e) => term.say(e)?,
                }
            }
            Phase::Configuring => {
                let Some(line) = term.ask("Who's playing? (names, comma-separated)")? else {
                    return Ok(());
                };
                let names: Vec<String> = line.split(',').map(str::to_owned).collect();
                let min = host.machine().rules().min_players;
                if !roster_ready(&names, min) {
                    term.say(format!("Need at least {} names.", min))?;
                    continue;
                }
                host.apply(Command::SetRoster(names));
                host.apply(Command::Begin);
            }
            Phase::Active => {
                if let (Some(player), Some(prompt)) = (host.current_player(), host.current_prompt()) {
                    let mut card = format!("\n{}, {}\n  {}", player.name, prompt.depth, prompt.text);
                    if let Some(note) = &prompt.note {
                        card.push_str(&format!("\n  ({})", note));
                    }
                    term.say(card)?;
                }
                let Some(line) = term.ask("[a]nswered, [s]kip, [q]uit")? else {
                    return Ok(());
                };
                let signal = match line.as_str() {
                    "a" => host.apply(Command::Answer),
                    "s" => host.apply(Command::Skip),
                    "q" => {
                        host.apply(Command::End);
                        term.say("Session ended.")?;
                        return Ok(());
                    }
                    _ => continue,
                };
                let (title, prompt, resolve) = match signal {
                    Signal::Punishment(p) => ("PUNISHMENT", p, Command::ResolvePunishment),
                    Signal::Everyone(p) => ("EVERYONE", p, Command::ResolveEveryone),
                    _ => continue,
                };
                if !interlude(term, title, &prompt)? {
                    return Ok(());
                }
                host.apply(resolve);
            }
            Phase::Punishment => {
                // only reachable by resuming a save mid-punishment, so there's no drawn punishment to show
                if let Some(prompt) = host.draw_punishment() {
                    if !interlude(term, "PUNISHMENT", &prompt)? {
                        return Ok(());
                    }
                }
                host.apply(Command::ResolvePunishment);
            }
            Phase::Everyone => {
                host.apply(Command::ResolveEveryone);
            }
        }
    }
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("couldn't load config from {}", path.display()))?,
        None => Config::default(),
    };

    let mut machine = Machine::new(Catalog::builtin(), config.rules).context("unplayable rules")?;
    if let Some(seed) = args.seed {
        machine = machine.seeded(seed);
    }
    let mut host = Host::open(Gateway::new(backend(&args, &config)?), machine);

    let stdin = io::stdin();
    let mut term = Term {
        input: stdin.lock(),
        output: io::stdout(),
    };
    play(&mut host, &mut term)
}
