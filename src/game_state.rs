//! Turn engine and the game loop that drives it.
//!
//! [`TurnEngine`] owns the board and enforces the rules: one clue per turn,
//! `count + 1` guesses (or unlimited in expert mode), immediate end of turn
//! on a wrong guess, and game over on the lethal word or a cleared team.
//! [`Game`] sits on top and asks a [`GameInterface`] or the computer
//! spymaster for input.

use crate::board::{Board, Owner, Team, ViewerRole};
use crate::config::{Config, RulesConfig};
use crate::embedding::SimilarityIndex;
use crate::error::{ConfigError, Error, Result};
use crate::planner::{Plan, SpymasterPlanner};
use crate::vocabulary::normalize_word;
use std::collections::BTreeSet;
use std::fmt;

const UNLIMITED: &str = "unlimited";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClueCount {
    Count(u32),
    Unlimited,
}

impl fmt::Display for ClueCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Unlimited => write!(f, "{UNLIMITED}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clue {
    pub word: String,
    pub count: ClueCount,
}

impl Clue {
    /// Guesses allowed under this clue; `None` means no limit.
    #[must_use]
    pub fn guess_budget(&self) -> Option<usize> {
        match self.count {
            ClueCount::Count(n) => Some(n as usize + 1),
            ClueCount::Unlimited => None,
        }
    }
}

impl fmt::Display for Clue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.word, self.count)
    }
}

/// Parse `"<word> <count>"`, or `"<word> unlimited"` when `expert` is set.
pub fn parse_clue(input: &str, expert: bool) -> Result<Clue> {
    let invalid = || Error::InvalidClue("should be WORD COUNT".to_string());
    let parts: Vec<&str> = input.split_whitespace().collect();
    let [word, count] = parts.as_slice() else {
        return Err(invalid());
    };
    if !word.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(invalid());
    }
    let count = if count.eq_ignore_ascii_case(UNLIMITED) {
        if !expert {
            return Err(Error::InvalidClue(
                "\"unlimited\" is only allowed in expert mode".to_string(),
            ));
        }
        ClueCount::Unlimited
    } else if count.chars().all(|c| c.is_ascii_digit()) {
        ClueCount::Count(count.parse().map_err(|_| invalid())?)
    } else {
        return Err(invalid());
    };
    Ok(Clue {
        word: word.to_ascii_lowercase(),
        count,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PlayStyle {
    Human,
    Computer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamSetup {
    pub spymaster: PlayStyle,
    pub guesser: PlayStyle,
}

impl Default for TeamSetup {
    fn default() -> Self {
        Self {
            spymaster: PlayStyle::Human,
            guesser: PlayStyle::Human,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Win(Team),
    LethalLoss { guesser: Team },
}

impl GameOutcome {
    #[must_use]
    pub fn winner(self) -> Team {
        match self {
            Self::Win(team) => team,
            Self::LethalLoss { guesser } => guesser.other(),
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Win(team) => write!(f, "{team} wins!"),
            Self::LethalLoss { guesser } => write!(
                f,
                "{guesser} uncovered the lethal word. {} wins!",
                guesser.other()
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnEnd {
    BudgetExhausted,
    WrongGuess(Owner),
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnState {
    AwaitingClue(Team),
    AwaitingGuesses {
        team: Team,
        clue: Clue,
        guesses_made: usize,
    },
    TurnComplete {
        team: Team,
        reason: TurnEnd,
    },
    GameOver(GameOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnView {
    pub team: Team,
    pub own: Vec<String>,
    pub opponent: Vec<String>,
    pub neutral: Vec<String>,
    pub lethal: Vec<String>,
    pub uncovered: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessEffect {
    Continue { remaining: Option<usize> },
    TurnOver(TurnEnd),
    GameOver(GameOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessReport {
    pub team: Team,
    pub word: String,
    pub owner: Owner,
    pub effect: GuessEffect,
}

pub struct TurnEngine {
    board: Board,
    expert: bool,
    turn: usize,
    unfound: [BTreeSet<String>; 2],
    state: TurnState,
}

impl TurnEngine {
    #[must_use]
    pub fn new(board: Board, rules: &RulesConfig) -> Self {
        Self {
            board,
            expert: rules.expert,
            turn: 1,
            unfound: [BTreeSet::new(), BTreeSet::new()],
            state: TurnState::AwaitingClue(Team::A),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn state(&self) -> &TurnState {
        &self.state
    }

    #[must_use]
    pub fn turn(&self) -> usize {
        self.turn
    }

    #[must_use]
    pub fn expert(&self) -> bool {
        self.expert
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        matches!(self.state, TurnState::GameOver(_))
    }

    #[must_use]
    pub fn active_team(&self) -> Team {
        match &self.state {
            TurnState::AwaitingClue(team)
            | TurnState::AwaitingGuesses { team, .. }
            | TurnState::TurnComplete { team, .. } => *team,
            TurnState::GameOver(GameOutcome::Win(team)) => *team,
            TurnState::GameOver(GameOutcome::LethalLoss { guesser }) => *guesser,
        }
    }

    #[must_use]
    pub fn unfound(&self, team: Team) -> &BTreeSet<String> {
        &self.unfound[team.index()]
    }

    #[must_use]
    pub fn turn_view(&self) -> TurnView {
        let team = self.active_team();
        TurnView {
            team,
            own: self.board.visible_words(team.owner()),
            opponent: self.board.visible_words(team.other().owner()),
            neutral: self.board.visible_words(Owner::Neutral),
            lethal: self.board.visible_words(Owner::Lethal),
            uncovered: self.board.uncovered_words(),
        }
    }

    /// Accept a clue for the active team. `targets` is the subset the clue
    /// aims at, when known, and is added to the team's unfound set.
    pub fn submit_clue(&mut self, clue: Clue, targets: Option<&[String]>) -> Result<()> {
        let TurnState::AwaitingClue(team) = self.state else {
            return Err(Error::InvalidClue("no clue expected right now".to_string()));
        };
        if clue.count == ClueCount::Unlimited && !self.expert {
            return Err(Error::InvalidClue(
                "\"unlimited\" is only allowed in expert mode".to_string(),
            ));
        }
        if self.board.contains_word(&clue.word) {
            return Err(Error::InvalidClue(format!(
                "\"{}\" is a word on the board",
                clue.word
            )));
        }
        if let Some(targets) = targets {
            self.unfound[team.index()].extend(targets.iter().cloned());
        }
        log::info!("Turn {}: {team} clue '{clue}'", self.turn);
        self.state = TurnState::AwaitingGuesses {
            team,
            clue,
            guesses_made: 0,
        };
        Ok(())
    }

    /// Uncover `raw` for the active team. A word that is not visible is
    /// rejected without consuming a guess.
    pub fn guess(&mut self, raw: &str) -> Result<GuessReport> {
        let TurnState::AwaitingGuesses {
            team,
            ref clue,
            guesses_made,
        } = self.state
        else {
            return Err(Error::InvalidGuess("no clue in force".to_string()));
        };
        let budget = clue.guess_budget();
        let word = normalize_word(raw);
        let owner = self.board.reveal(&word)?;
        if let Some(owner_team) = owner.team() {
            self.unfound[owner_team.index()].remove(&word);
        }

        let effect = match owner {
            Owner::Lethal => GuessEffect::GameOver(GameOutcome::LethalLoss { guesser: team }),
            _ if owner == team.owner() => {
                let made = guesses_made + 1;
                if self.board.visible_words(owner).is_empty() {
                    GuessEffect::GameOver(GameOutcome::Win(team))
                } else {
                    match budget {
                        Some(limit) if made >= limit => {
                            GuessEffect::TurnOver(TurnEnd::BudgetExhausted)
                        }
                        _ => GuessEffect::Continue {
                            remaining: budget.map(|limit| limit - made),
                        },
                    }
                }
            }
            _ => match owner.team() {
                Some(other) if self.board.visible_words(owner).is_empty() => {
                    GuessEffect::GameOver(GameOutcome::Win(other))
                }
                _ => GuessEffect::TurnOver(TurnEnd::WrongGuess(owner)),
            },
        };

        match effect {
            GuessEffect::Continue { .. } => {
                if let TurnState::AwaitingGuesses { guesses_made, .. } = &mut self.state {
                    *guesses_made += 1;
                }
            }
            GuessEffect::TurnOver(reason) => {
                self.state = TurnState::TurnComplete { team, reason };
            }
            GuessEffect::GameOver(outcome) => self.state = TurnState::GameOver(outcome),
        }
        log::debug!("{team} guessed '{word}' ({owner:?}): {effect:?}");
        Ok(GuessReport {
            team,
            word,
            owner,
            effect,
        })
    }

    pub fn stop_guessing(&mut self) -> Result<()> {
        let TurnState::AwaitingGuesses { team, .. } = self.state else {
            return Err(Error::InvalidGuess("no clue in force".to_string()));
        };
        self.state = TurnState::TurnComplete {
            team,
            reason: TurnEnd::Stopped,
        };
        Ok(())
    }

    pub fn next_turn(&mut self) -> Result<Team> {
        let TurnState::TurnComplete { team, .. } = self.state else {
            return Err(Error::InvalidGuess("the current turn is not over".to_string()));
        };
        let next = team.other();
        self.turn += 1;
        self.state = TurnState::AwaitingClue(next);
        Ok(next)
    }
}

/// Everything the game loop needs from a front end. `read_*` return `None`
/// when the player interrupts the game.
pub trait GameInterface {
    fn show_board(&mut self, board: &Board, role: ViewerRole);
    fn read_clue(&mut self, team: Team) -> Option<String>;
    fn read_guess(&mut self, team: Team, clue: &Clue, guess_number: usize) -> Option<String>;
    fn show_thinking(&mut self, team: Team);
    fn show_plan(&mut self, team: Team, plan: &Plan);
    fn show_clue(&mut self, team: Team, clue: &Clue);
    fn show_guess_result(&mut self, report: &GuessReport);
    fn show_error(&mut self, error: &Error);
    fn show_outcome(&mut self, outcome: GameOutcome);
    fn show_farewell(&mut self);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GameOptions {
    pub teams: [TeamSetup; 2],
    pub show_plan: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEnd {
    Finished(GameOutcome),
    Interrupted,
}

pub struct Game<'a, I: SimilarityIndex + ?Sized> {
    engine: TurnEngine,
    planner: Option<SpymasterPlanner<'a, I>>,
    options: GameOptions,
}

impl<'a, I: SimilarityIndex + ?Sized> Game<'a, I> {
    pub fn new(
        board: Board,
        config: &Config,
        index: Option<&'a I>,
        options: GameOptions,
    ) -> Result<Self> {
        for team in [Team::A, Team::B] {
            if options.teams[team.index()].guesser == PlayStyle::Computer {
                return Err(Error::NotImplemented(format!(
                    "computer guesser for {team}"
                )));
            }
        }
        let needs_planner = options
            .teams
            .iter()
            .any(|t| t.spymaster == PlayStyle::Computer);
        let planner = match (needs_planner, index) {
            (false, _) => None,
            (true, Some(index)) => Some(SpymasterPlanner::new(index, config)),
            (true, None) => {
                return Err(ConfigError::Invalid(
                    "a computer spymaster needs a similarity index".to_string(),
                )
                .into());
            }
        };
        Ok(Self {
            engine: TurnEngine::new(board, &config.rules),
            planner,
            options,
        })
    }

    #[must_use]
    pub fn engine(&self) -> &TurnEngine {
        &self.engine
    }

    pub fn play<U: GameInterface + ?Sized>(&mut self, ui: &mut U) -> Result<GameEnd> {
        loop {
            match self.engine.state().clone() {
                TurnState::AwaitingClue(team) => {
                    let given = match self.options.teams[team.index()].spymaster {
                        PlayStyle::Human => self.human_clue(ui, team)?,
                        PlayStyle::Computer => {
                            self.computer_clue(ui, team)?;
                            true
                        }
                    };
                    if !given {
                        return Ok(GameEnd::Interrupted);
                    }
                }
                TurnState::AwaitingGuesses {
                    team,
                    clue,
                    guesses_made,
                } => {
                    ui.show_board(self.engine.board(), ViewerRole::TeamPlayer);
                    let Some(input) = ui.read_guess(team, &clue, guesses_made + 1) else {
                        return Ok(GameEnd::Interrupted);
                    };
                    if normalize_word(&input).is_empty() {
                        self.engine.stop_guessing()?;
                        continue;
                    }
                    match self.engine.guess(&input) {
                        Ok(report) => ui.show_guess_result(&report),
                        Err(e @ Error::InvalidGuess(_)) => ui.show_error(&e),
                        Err(e) => return Err(e),
                    }
                }
                TurnState::TurnComplete { .. } => {
                    self.engine.next_turn()?;
                }
                TurnState::GameOver(outcome) => {
                    ui.show_board(self.engine.board(), ViewerRole::Spymaster);
                    ui.show_outcome(outcome);
                    return Ok(GameEnd::Finished(outcome));
                }
            }
        }
    }

    fn human_clue<U: GameInterface + ?Sized>(&mut self, ui: &mut U, team: Team) -> Result<bool> {
        ui.show_board(self.engine.board(), ViewerRole::Spymaster);
        loop {
            let Some(input) = ui.read_clue(team) else {
                return Ok(false);
            };
            let submitted = parse_clue(&input, self.engine.expert()).and_then(|clue| {
                self.engine.submit_clue(clue.clone(), None)?;
                Ok(clue)
            });
            match submitted {
                Ok(clue) => {
                    ui.show_clue(team, &clue);
                    return Ok(true);
                }
                Err(e @ Error::InvalidClue(_)) => ui.show_error(&e),
                Err(e) => return Err(e),
            }
        }
    }

    fn computer_clue<U: GameInterface + ?Sized>(&mut self, ui: &mut U, team: Team) -> Result<()> {
        let Some(planner) = &self.planner else {
            return Err(Error::NotImplemented(format!(
                "computer spymaster for {team} without a planner"
            )));
        };
        ui.show_thinking(team);
        let view = self.engine.turn_view();
        let plan = planner.plan_avoiding(
            &view.own,
            &view.opponent,
            &view.neutral,
            &view.lethal,
            &view.uncovered,
        )?;
        if self.options.show_plan {
            ui.show_plan(team, &plan);
        }

        let mut unfound = self.engine.unfound(team).clone();
        unfound.extend(plan.best.targets.iter().cloned());
        let count = planner.announce_count(
            &plan,
            self.engine.expert(),
            view.opponent.len(),
            &view.own,
            &unfound,
        );
        let clue = Clue {
            word: plan.best.clue.clone(),
            count,
        };
        self.engine
            .submit_clue(clue.clone(), Some(&plan.best.targets))?;
        ui.show_clue(team, &clue);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::EmbeddingIndex;
    use crate::vocabulary::{EMBEDDED_VOCABULARY, Vocabulary, load_vocabulary_from_str};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::VecDeque;

    fn vocabulary() -> Vocabulary {
        load_vocabulary_from_str(EMBEDDED_VOCABULARY).unwrap()
    }

    fn engine(setup: &str, expert: bool) -> TurnEngine {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let board = Board::from_setup(setup, &vocabulary(), 5, &mut rng).unwrap();
        TurnEngine::new(board, &RulesConfig { expert })
    }

    fn clue(word: &str, count: u32) -> Clue {
        Clue {
            word: word.to_string(),
            count: ClueCount::Count(count),
        }
    }

    #[derive(Default)]
    struct ScriptedInterface {
        clues: VecDeque<String>,
        guesses: VecDeque<String>,
        announced: Vec<Clue>,
        reports: Vec<GuessReport>,
        errors: usize,
        plans_shown: usize,
        farewell: bool,
    }

    impl ScriptedInterface {
        fn new(clues: &[&str], guesses: &[&str]) -> Self {
            Self {
                clues: clues.iter().map(|s| (*s).to_string()).collect(),
                guesses: guesses.iter().map(|s| (*s).to_string()).collect(),
                ..Self::default()
            }
        }
    }

    impl GameInterface for ScriptedInterface {
        fn show_board(&mut self, _board: &Board, _role: ViewerRole) {}
        fn read_clue(&mut self, _team: Team) -> Option<String> {
            self.clues.pop_front()
        }
        fn read_guess(&mut self, _team: Team, _clue: &Clue, _n: usize) -> Option<String> {
            self.guesses.pop_front()
        }
        fn show_thinking(&mut self, _team: Team) {}
        fn show_plan(&mut self, _team: Team, _plan: &Plan) {
            self.plans_shown += 1;
        }
        fn show_clue(&mut self, _team: Team, clue: &Clue) {
            self.announced.push(clue.clone());
        }
        fn show_guess_result(&mut self, report: &GuessReport) {
            self.reports.push(report.clone());
        }
        fn show_error(&mut self, _error: &Error) {
            self.errors += 1;
        }
        fn show_outcome(&mut self, _outcome: GameOutcome) {}
        fn show_farewell(&mut self) {
            self.farewell = true;
        }
    }

    #[test]
    fn test_parse_clue() {
        assert_eq!(parse_clue("Fruit 2", false).unwrap(), clue("fruit", 2));
        assert_eq!(parse_clue("  sea   0 ", false).unwrap(), clue("sea", 0));
        assert_eq!(parse_clue("space 12", false).unwrap(), clue("space", 12));
        assert_eq!(
            parse_clue("ocean unlimited", true).unwrap().count,
            ClueCount::Unlimited
        );
    }

    #[test]
    fn test_parse_clue_rejects_bad_input() {
        for input in ["", "fruit", "fruit two", "fruit -1", "ice_cream 2", "a b 3", "r2d2 1"] {
            assert!(
                matches!(parse_clue(input, true), Err(Error::InvalidClue(_))),
                "{input:?}"
            );
        }
        assert!(matches!(
            parse_clue("ocean unlimited", false),
            Err(Error::InvalidClue(_))
        ));
    }

    #[test]
    fn test_guess_budget() {
        assert_eq!(clue("a", 2).guess_budget(), Some(3));
        assert_eq!(clue("a", 0).guess_budget(), Some(1));
        let unlimited = Clue {
            word: "a".to_string(),
            count: ClueCount::Unlimited,
        };
        assert_eq!(unlimited.guess_budget(), None);
        assert_eq!(unlimited.to_string(), "a unlimited");
    }

    #[test]
    fn test_team_a_moves_first() {
        let engine = engine("bomb;apple,bank;moon,ship;cat", false);
        assert_eq!(engine.state(), &TurnState::AwaitingClue(Team::A));
        let view = engine.turn_view();
        assert_eq!(view.team, Team::A);
        assert_eq!(view.own.len(), 2);
        assert_eq!(view.opponent.len(), 2);
        assert_eq!(view.neutral, vec!["cat".to_string()]);
        assert_eq!(view.lethal, vec!["bomb".to_string()]);
        assert!(view.uncovered.is_empty());
    }

    #[test]
    fn test_count_two_allows_three_guesses() {
        let mut engine = engine("bomb;apple,bank,bear,cat,dog;moon,ship;", false);
        engine.submit_clue(clue("fruit", 2), None).unwrap();
        let first = engine.guess("apple").unwrap();
        assert_eq!(first.effect, GuessEffect::Continue { remaining: Some(2) });
        let second = engine.guess("Bank").unwrap();
        assert_eq!(second.effect, GuessEffect::Continue { remaining: Some(1) });
        let third = engine.guess("bear").unwrap();
        assert_eq!(third.effect, GuessEffect::TurnOver(TurnEnd::BudgetExhausted));
        assert!(engine.guess("cat").is_err());
        assert_eq!(engine.next_turn().unwrap(), Team::B);
        assert_eq!(engine.turn(), 2);
    }

    #[test]
    fn test_last_own_word_wins() {
        let mut engine = engine("bomb;apple,bank;moon,ship;", false);
        engine.submit_clue(clue("money", 2), None).unwrap();
        engine.guess("apple").unwrap();
        let report = engine.guess("bank").unwrap();
        assert_eq!(
            report.effect,
            GuessEffect::GameOver(GameOutcome::Win(Team::A))
        );
        assert!(engine.is_over());
    }

    #[test]
    fn test_opponent_guess_ends_turn_immediately() {
        let mut engine = engine("bomb;apple,bank,bear,cat,dog;moon,ship;", false);
        engine.submit_clue(clue("fruit", 2), None).unwrap();
        let report = engine.guess("moon").unwrap();
        assert_eq!(report.owner, Owner::TeamB);
        assert_eq!(
            report.effect,
            GuessEffect::TurnOver(TurnEnd::WrongGuess(Owner::TeamB))
        );
        assert_eq!(
            engine.state(),
            &TurnState::TurnComplete {
                team: Team::A,
                reason: TurnEnd::WrongGuess(Owner::TeamB),
            }
        );
    }

    #[test]
    fn test_uncovering_opponent_last_word_loses() {
        let mut engine = engine("bomb;apple,bank;moon;", false);
        engine.submit_clue(clue("fruit", 1), None).unwrap();
        let report = engine.guess("moon").unwrap();
        assert_eq!(
            report.effect,
            GuessEffect::GameOver(GameOutcome::Win(Team::B))
        );
    }

    #[test]
    fn test_lethal_guess_ends_game() {
        let mut engine = engine("bomb;apple,bank,bear;moon,ship;", false);
        engine.submit_clue(clue("fruit", 3), None).unwrap();
        engine.guess("apple").unwrap();
        let report = engine.guess("bomb").unwrap();
        let outcome = GameOutcome::LethalLoss { guesser: Team::A };
        assert_eq!(report.effect, GuessEffect::GameOver(outcome));
        assert_eq!(outcome.winner(), Team::B);
        assert!(engine.guess("bank").is_err());
    }

    #[test]
    fn test_invalid_guess_consumes_nothing() {
        let mut engine = engine("bomb;apple,bank;moon,ship;", false);
        engine.submit_clue(clue("fruit", 0), None).unwrap();
        assert!(matches!(engine.guess("zebra"), Err(Error::InvalidGuess(_))));
        assert!(matches!(engine.guess("---"), Err(Error::InvalidGuess(_))));
        assert!(matches!(
            engine.state(),
            TurnState::AwaitingGuesses { guesses_made: 0, .. }
        ));
        let report = engine.guess("apple").unwrap();
        assert_eq!(report.effect, GuessEffect::TurnOver(TurnEnd::BudgetExhausted));
        // already uncovered
        engine.next_turn().unwrap();
        assert!(matches!(
            engine.submit_clue(clue("apple", 1), None),
            Err(Error::InvalidClue(_))
        ));
        assert_eq!(engine.turn_view().uncovered, vec!["apple".to_string()]);
        engine.submit_clue(clue("sky", 1), None).unwrap();
        assert!(matches!(engine.guess("apple"), Err(Error::InvalidGuess(_))));
    }

    #[test]
    fn test_clue_validation() {
        let mut engine = engine("bomb;apple,bank;moon,ship;", false);
        assert!(matches!(
            engine.submit_clue(clue("apple", 1), None),
            Err(Error::InvalidClue(_))
        ));
        let unlimited = Clue {
            word: "fruit".to_string(),
            count: ClueCount::Unlimited,
        };
        assert!(matches!(
            engine.submit_clue(unlimited, None),
            Err(Error::InvalidClue(_))
        ));
        assert_eq!(engine.state(), &TurnState::AwaitingClue(Team::A));
        assert!(engine.guess("apple").is_err());
    }

    #[test]
    fn test_unlimited_clue_in_expert_mode() {
        let mut engine = engine("bomb;apple,bank,bear,cat;moon,ship;", true);
        let unlimited = Clue {
            word: "fruit".to_string(),
            count: ClueCount::Unlimited,
        };
        engine.submit_clue(unlimited, None).unwrap();
        for word in ["apple", "bank", "bear"] {
            let report = engine.guess(word).unwrap();
            assert_eq!(report.effect, GuessEffect::Continue { remaining: None });
        }
        engine.stop_guessing().unwrap();
        assert_eq!(
            engine.state(),
            &TurnState::TurnComplete {
                team: Team::A,
                reason: TurnEnd::Stopped,
            }
        );
    }

    #[test]
    fn test_unfound_set_tracks_targets() {
        let mut engine = engine("bomb;apple,bank,bear;moon,ship;cat", false);
        let targets = vec!["apple".to_string(), "bank".to_string()];
        engine.submit_clue(clue("fruit", 2), Some(&targets)).unwrap();
        assert_eq!(engine.unfound(Team::A).len(), 2);
        engine.guess("apple").unwrap();
        assert_eq!(
            engine.unfound(Team::A).iter().collect::<Vec<_>>(),
            vec!["bank"]
        );
        engine.guess("cat").unwrap();
        engine.next_turn().unwrap();

        // Team B uncovering one of team A's targets clears it too.
        engine.submit_clue(clue("sky", 1), None).unwrap();
        engine.guess("bank").unwrap();
        assert!(engine.unfound(Team::A).is_empty());
        assert!(engine.unfound(Team::B).is_empty());
    }

    #[test]
    fn test_game_rejects_computer_guesser() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let board = Board::random(&vocabulary(), 5, &mut rng).unwrap();
        let mut options = GameOptions::default();
        options.teams[1].guesser = PlayStyle::Computer;
        let result = Game::<EmbeddingIndex>::new(board, &Config::default(), None, options);
        assert!(matches!(result, Err(Error::NotImplemented(_))));
    }

    #[test]
    fn test_game_requires_index_for_computer_spymaster() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let board = Board::random(&vocabulary(), 5, &mut rng).unwrap();
        let mut options = GameOptions::default();
        options.teams[0].spymaster = PlayStyle::Computer;
        let result = Game::<EmbeddingIndex>::new(board, &Config::default(), None, options);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_human_game_with_retries() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let board =
            Board::from_setup("bomb;apple,bank;moon,ship;cat", &vocabulary(), 5, &mut rng)
                .unwrap();
        let mut game =
            Game::<EmbeddingIndex>::new(board, &Config::default(), None, GameOptions::default())
                .unwrap();
        let mut ui = ScriptedInterface::new(
            &["apple 2", "fruit", "fruit 2", "sky 1"],
            &["zebra", "apple", "", "moon", "ship"],
        );
        let end = game.play(&mut ui).unwrap();
        assert_eq!(end, GameEnd::Finished(GameOutcome::Win(Team::B)));
        assert_eq!(ui.errors, 3);
        assert_eq!(ui.announced, vec![clue("fruit", 2), clue("sky", 1)]);
        assert_eq!(ui.reports.len(), 3);
    }

    #[test]
    fn test_game_interrupted_on_missing_input() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let board = Board::random(&vocabulary(), 5, &mut rng).unwrap();
        let mut game =
            Game::<EmbeddingIndex>::new(board, &Config::default(), None, GameOptions::default())
                .unwrap();
        let mut ui = ScriptedInterface::new(&["fruit 1"], &[]);
        assert_eq!(game.play(&mut ui).unwrap(), GameEnd::Interrupted);
        assert!(matches!(
            game.engine().state(),
            TurnState::AwaitingGuesses { .. }
        ));
    }

    #[test]
    fn test_computer_spymaster_game() {
        let vocab = load_vocabulary_from_str("poison\nwhale\nshark\nrocket\n").unwrap();
        let index = EmbeddingIndex::from_entries(vec![
            ("whale".to_string(), vec![1.0, 0.1, 0.0, 0.0]),
            ("shark".to_string(), vec![1.0, -0.1, 0.0, 0.0]),
            ("ocean".to_string(), vec![1.0, 0.0, 0.0, 0.0]),
            ("rocket".to_string(), vec![0.0, 0.0, 1.0, 0.1]),
            ("space".to_string(), vec![0.0, 0.0, 1.0, 0.0]),
            ("poison".to_string(), vec![0.0, 1.0, 0.0, 0.0]),
        ])
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let board = Board::from_setup("poison;whale,shark;rocket;", &vocab, 2, &mut rng).unwrap();
        let mut options = GameOptions {
            show_plan: true,
            ..GameOptions::default()
        };
        options.teams[0].spymaster = PlayStyle::Computer;
        let mut game = Game::new(board, &Config::default(), Some(&index), options).unwrap();
        let mut ui = ScriptedInterface::new(&[], &["whale", "shark"]);

        let end = game.play(&mut ui).unwrap();
        assert_eq!(end, GameEnd::Finished(GameOutcome::Win(Team::A)));
        assert_eq!(ui.announced, vec![clue("ocean", 2)]);
        assert_eq!(ui.plans_shown, 1);
        assert!(game.engine().unfound(Team::A).is_empty());
        assert!(!ui.farewell);
    }

    #[test]
    fn test_computer_says_unlimited_once_clues_cover_every_word() {
        let vocab = load_vocabulary_from_str(
            "poison\nwhale\nshark\ndolphin\nrocket\nplanet\ndesk\nlamp\n",
        )
        .unwrap();
        // Axis 0: sea, 1: spread, 2: space, 3..: one axis per remaining word.
        let index = EmbeddingIndex::from_entries(vec![
            ("whale".to_string(), vec![1.0, 0.3, 0.0, 0.0, 0.0, 0.0]),
            ("shark".to_string(), vec![1.0, -0.3, 0.0, 0.0, 0.0, 0.0]),
            ("dolphin".to_string(), vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            ("ocean".to_string(), vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            ("rocket".to_string(), vec![0.0, 0.05, 1.0, 0.0, 0.0, 0.0]),
            ("planet".to_string(), vec![0.0, -0.05, 1.0, 0.0, 0.0, 0.0]),
            ("space".to_string(), vec![0.0, 0.0, 1.0, 0.0, 0.0, 0.0]),
            ("poison".to_string(), vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0]),
            ("desk".to_string(), vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0]),
            ("lamp".to_string(), vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0]),
        ])
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let board = Board::from_setup(
            "poison;whale,shark,dolphin,rocket,planet;desk,lamp;",
            &vocab,
            4,
            &mut rng,
        )
        .unwrap();
        let mut config = Config::default();
        config.rules.expert = true;
        let mut options = GameOptions::default();
        options.teams[0].spymaster = PlayStyle::Computer;
        let mut game = Game::new(board, &config, Some(&index), options).unwrap();

        // A takes one sea word and stops, B passes, then A's second clue
        // targets the space pair and every remaining word has been targeted.
        let mut ui = ScriptedInterface::new(
            &["office 1"],
            &["whale", "", "", "rocket", "planet", "shark", "dolphin"],
        );
        let end = game.play(&mut ui).unwrap();

        assert_eq!(end, GameEnd::Finished(GameOutcome::Win(Team::A)));
        let unlimited = Clue {
            word: "space".to_string(),
            count: ClueCount::Unlimited,
        };
        assert_eq!(
            ui.announced,
            vec![clue("ocean", 3), clue("office", 1), unlimited]
        );
        assert!(game.engine().unfound(Team::A).is_empty());
    }
}
