use crate::board::{Board, Owner, Team, ViewerRole, render_cell};
use crate::config::Config;
use crate::error::Error;
use crate::game_state::{
    Clue, GameInterface, GameOutcome, GuessEffect, GuessReport, PlayStyle, TeamSetup, TurnEnd,
};
use crate::planner::Plan;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const FAREWELL: &str = "Bye.";

/// Consecutive failed reads before a prompt gives up.
const MAX_READ_ERRORS: usize = 3;

/// Codenames with a computer spymaster
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON configuration file
    #[arg(short = 'c', long = "config", global = true)]
    pub config_path: Option<PathBuf>,

    /// Newline-delimited vocabulary file
    #[arg(short = 'w', long = "words", global = true)]
    pub words_path: Option<PathBuf>,

    /// Similarity index snapshot in word2vec text format
    #[arg(short = 'e', long = "embedding", global = true)]
    pub embedding_path: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Play a game (the default)
    Play(PlayArgs),
    /// Print the best clues the index finds for single words and pairs
    Evaluate(EvaluateArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UiKind {
    /// Line-oriented console
    #[default]
    Cli,
    /// Full-screen terminal interface
    Tui,
}

#[derive(Args, Debug, Clone)]
pub struct PlayArgs {
    /// Seed for dealing the board
    #[arg(long)]
    pub seed: Option<u64>,

    /// Allow "unlimited" clues
    #[arg(long)]
    pub expert: bool,

    /// Explicit board: "LETHAL;TEAMA,..;TEAMB,..;NEUTRAL,.."
    #[arg(long)]
    pub setup: Option<String>,

    #[arg(long, value_enum, default_value_t = PlayStyle::Human)]
    pub spymaster_a: PlayStyle,

    #[arg(long, value_enum, default_value_t = PlayStyle::Human)]
    pub spymaster_b: PlayStyle,

    #[arg(long, value_enum, default_value_t = PlayStyle::Human)]
    pub guesser_a: PlayStyle,

    #[arg(long, value_enum, default_value_t = PlayStyle::Human)]
    pub guesser_b: PlayStyle,

    #[arg(long, value_enum, default_value_t = UiKind::Cli)]
    pub ui: UiKind,

    /// Show the computer spymaster's ranked candidates
    #[arg(long)]
    pub show_plan: bool,
}

impl Default for PlayArgs {
    fn default() -> Self {
        Self {
            seed: None,
            expert: false,
            setup: None,
            spymaster_a: PlayStyle::Human,
            spymaster_b: PlayStyle::Human,
            guesser_a: PlayStyle::Human,
            guesser_b: PlayStyle::Human,
            ui: UiKind::Cli,
            show_plan: false,
        }
    }
}

impl PlayArgs {
    /// Play styles indexed by [`Team::index`].
    #[must_use]
    pub fn teams(&self) -> [TeamSetup; 2] {
        [
            TeamSetup {
                spymaster: self.spymaster_a,
                guesser: self.guesser_a,
            },
            TeamSetup {
                spymaster: self.spymaster_b,
                guesser: self.guesser_b,
            },
        ]
    }

    #[must_use]
    pub fn needs_index(&self) -> bool {
        self.teams()
            .iter()
            .any(|t| t.spymaster == PlayStyle::Computer)
    }
}

#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    /// Number of single-word clues to print
    #[arg(long, default_value_t = 10)]
    pub top_singles: usize,

    /// Number of word-pair clues to print
    #[arg(long, default_value_t = 0)]
    pub top_pairs: usize,
}

impl Cli {
    /// The subcommand to run; plain invocation plays a game.
    #[must_use]
    pub fn selected_command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Play(PlayArgs::default()))
    }

    /// Command-line values win over the configuration file.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(path) = &self.words_path {
            config.word_list = Some(path.clone());
        }
        if let Some(path) = &self.embedding_path {
            config.embedding = path.clone();
        }
        if let Some(Command::Play(args)) = &self.command {
            if args.seed.is_some() {
                config.seed = args.seed;
            }
            if args.expert {
                config.rules.expert = true;
            }
        }
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

// Text formatting shared by the console interface

#[must_use]
pub fn format_board(board: &Board, role: ViewerRole) -> String {
    board
        .rows()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(|c| render_cell(c, role)).collect();
            cells.join(" ").trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[must_use]
pub fn describe_owner(owner: Owner) -> &'static str {
    match owner {
        Owner::Lethal => "the lethal word",
        Owner::TeamA => "Team A",
        Owner::TeamB => "Team B",
        Owner::Neutral => "nobody",
    }
}

#[must_use]
pub fn format_guess_result(report: &GuessReport) -> String {
    let word = report.word.to_uppercase();
    match report.effect {
        GuessEffect::Continue {
            remaining: Some(n),
        } => format!("Correct, {word} is yours. {n} guess(es) left."),
        GuessEffect::Continue { remaining: None } => format!("Correct, {word} is yours."),
        GuessEffect::TurnOver(TurnEnd::BudgetExhausted) => {
            format!("Correct, {word} is yours. No guesses left.")
        }
        GuessEffect::TurnOver(_) => format!(
            "{word} belongs to {}. Turn over.",
            describe_owner(report.owner)
        ),
        GuessEffect::GameOver(_) if report.owner == Owner::Lethal => {
            format!("{word} is the lethal word!")
        }
        GuessEffect::GameOver(_) => {
            format!("{word} belongs to {}.", describe_owner(report.owner))
        }
    }
}

fn write_farewell<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "\n{FAREWELL}")
}

/// Ctrl-C at a console prompt leaves with the farewell and a success code.
/// The terminal UI runs in raw mode and reads Ctrl-C as a key instead.
pub fn install_interrupt_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        let mut stdout = io::stdout();
        let _ = write_farewell(&mut stdout);
        let _ = stdout.flush();
        std::process::exit(0);
    })
}

/// Console implementation of [`GameInterface`] over any line reader.
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Prompt and read one line. `None` on end of input.
    fn prompt(&mut self, text: &str) -> Option<String> {
        let mut errors = 0;
        loop {
            print!("{text}");
            let _ = io::stdout().flush();
            let mut input = String::new();
            match self.reader.read_line(&mut input) {
                Ok(0) => return None,
                Ok(_) => return Some(input.trim().to_string()),
                Err(e) => {
                    log::warn!("Failed to read input: {e}");
                    println!("Could not read that line, please try again.");
                    errors += 1;
                    if errors >= MAX_READ_ERRORS {
                        return None;
                    }
                }
            }
        }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn show_board(&mut self, board: &Board, role: ViewerRole) {
        println!();
        println!("{}", format_board(board, role));
        println!();
    }

    fn read_clue(&mut self, team: Team) -> Option<String> {
        self.prompt(&format!("{} Enter your clue: ", team.label()))
    }

    fn read_guess(&mut self, team: Team, clue: &Clue, guess_number: usize) -> Option<String> {
        self.prompt(&format!(
            "{} [{clue}] Enter your guess #{guess_number} (empty to stop): ",
            team.label()
        ))
    }

    fn show_thinking(&mut self, team: Team) {
        println!("{} {team} spymaster is thinking...", team.label());
    }

    fn show_plan(&mut self, team: Team, plan: &Plan) {
        println!(
            "{} Top candidates out of {} target groups:",
            team.label(),
            plan.subsets_evaluated
        );
        for candidate in &plan.ranked {
            println!("  {candidate}");
        }
    }

    fn show_clue(&mut self, team: Team, clue: &Clue) {
        println!("{} The clue is: {clue}", team.label());
    }

    fn show_guess_result(&mut self, report: &GuessReport) {
        println!("{} {}", report.team.label(), format_guess_result(report));
    }

    fn show_error(&mut self, error: &Error) {
        println!("{error}");
    }

    fn show_outcome(&mut self, outcome: GameOutcome) {
        println!("{} {outcome}", outcome.winner().label());
    }

    fn show_farewell(&mut self) {
        let _ = write_farewell(&mut io::stdout());
    }
}
