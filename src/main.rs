use codenames::board::Board;
use codenames::cli::{
    Cli, CliInterface, Command, EvaluateArgs, PlayArgs, UiKind, install_interrupt_handler, parse_cli,
};
use codenames::config::Config;
use codenames::embedding::EmbeddingIndex;
use codenames::error::{ConfigError, Result};
use codenames::evaluate::{top_pairs, top_singles};
use codenames::game_state::{Game, GameEnd, GameInterface, GameOptions};
use codenames::logging;
use codenames::search::{ClueSearch, SearchParams};
use codenames::tui::TuiInterface;
use codenames::vocabulary::{
    EMBEDDED_VOCABULARY, Vocabulary, load_vocabulary_from_file, load_vocabulary_from_str,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = parse_cli();
    logging::init(cli.verbose);
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let vocabulary = match &config.word_list {
        Some(path) => load_vocabulary_from_file(path)?,
        None => load_vocabulary_from_str(EMBEDDED_VOCABULARY)?,
    };
    match cli.selected_command() {
        Command::Play(args) => play(&config, &vocabulary, &args),
        Command::Evaluate(args) => evaluate(&config, &vocabulary, &args),
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config_path.as_deref())?;
    cli.apply_to(&mut config);
    config.validate()?;
    if let Some(threads) = config.planner.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| ConfigError::Invalid(format!("Failed to start worker pool: {e}")))?;
    }
    Ok(config)
}

fn play(config: &Config, vocabulary: &Vocabulary, args: &PlayArgs) -> Result<()> {
    let index = if args.needs_index() {
        let index = EmbeddingIndex::load(&config.embedding)?;
        vocabulary.check_against(&index)?;
        Some(index)
    } else {
        None
    };

    let seed = config.seed.unwrap_or_else(rand::random);
    log::info!("Dealing board with seed {seed}");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let size = config.board.size;
    let board = match &args.setup {
        Some(setup) => Board::from_setup(setup, vocabulary, size, &mut rng)?,
        None => Board::random(vocabulary, size, &mut rng)?,
    };

    let options = GameOptions {
        teams: args.teams(),
        show_plan: args.show_plan,
    };
    let mut game = Game::new(board, config, index.as_ref(), options)?;
    match args.ui {
        UiKind::Cli => {
            if let Err(e) = install_interrupt_handler() {
                log::warn!("Ctrl-C handler not installed: {e}");
            }
            let stdin = io::stdin();
            let mut ui = CliInterface::new(stdin.lock());
            let end = game.play(&mut ui)?;
            finish(end, &mut ui);
        }
        UiKind::Tui => {
            let mut ui = TuiInterface::new()?;
            let end = game.play(&mut ui)?;
            finish(end, &mut ui);
        }
    }
    Ok(())
}

fn finish<U: GameInterface>(end: GameEnd, ui: &mut U) {
    match end {
        GameEnd::Finished(outcome) => log::info!("Game finished: {outcome}"),
        GameEnd::Interrupted => ui.show_farewell(),
    }
}

fn evaluate(config: &Config, vocabulary: &Vocabulary, args: &EvaluateArgs) -> Result<()> {
    let index = EmbeddingIndex::load(&config.embedding)?;
    let search = ClueSearch::new(&index, SearchParams::from(&config.search));
    for clue in top_singles(&search, vocabulary.words(), args.top_singles) {
        println!("{clue}");
    }
    if args.top_pairs > 0 {
        println!();
        for clue in top_pairs(&search, vocabulary.words(), args.top_pairs) {
            println!("{clue}");
        }
    }
    Ok(())
}
