// Library interface for the Codenames spymaster
// This allows integration tests to access internal modules

pub mod board;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod evaluate;
pub mod game_state;
pub mod lexical;
pub mod logging;
pub mod planner;
pub mod search;
pub mod tui;
pub mod vocabulary;

// Re-export commonly used items for easier testing
pub use board::{Board, Owner, Team, ViewerRole, render_cell};
pub use config::Config;
pub use embedding::{EmbeddingIndex, SimilarityIndex};
pub use error::Error;
pub use game_state::{
    Game, GameEnd, GameInterface, GameOptions, GameOutcome, TurnEngine, parse_clue,
};
pub use planner::SpymasterPlanner;
pub use search::{ClueSearch, SearchParams};
pub use vocabulary::{EMBEDDED_VOCABULARY, load_vocabulary_from_file, load_vocabulary_from_str};
