mod engine;
mod error;
mod game;
mod high_score;
mod input;
mod settings;
mod snake;
mod term;
mod ticker;

use std::{fs::File, io::{self, Read}, path::PathBuf, process::exit, sync::mpsc};

use clap::Parser;
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::engine::Engine;
use crate::error::SnakeError;
use crate::game::GameState;
use crate::high_score::{HighScoreStore, DEFAULT_HIGH_SCORE_FILE};
use crate::input::SharedDirection;
use crate::settings::{BoardSize, Difficulty};
use crate::term::{RawModeGuard, TermManager};
use crate::ticker::Ticker;

pub type TermInt = u16;
pub type Coords = (u16, u16);

#[derive(Parser)]
#[command(name = "snake", about = "Snake in the terminal")]
struct Args {
    /// Board size; asked for at startup when omitted.
    #[arg(long, value_enum)]
    board: Option<BoardSize>,

    /// Difficulty; asked for at startup when omitted.
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,

    #[arg(long, default_value = DEFAULT_HIGH_SCORE_FILE)]
    high_score_file: PathBuf,

    #[arg(long, default_value = "snake.log")]
    log_file: PathBuf,

    /// Log at debug level.
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    // The terminal is already restored by the time an error gets here
    if let Err(e) = run(args) {
        eprintln!("snake: {}", e);
        exit(1);
    }
}

fn run(args: Args) -> Result<(), SnakeError> {
    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    WriteLogger::init(level, Config::default(), File::create(&args.log_file)?)?;

    let store = HighScoreStore::new(&args.high_score_file);
    let high_score = store.load();
    info!("starting with high score {}", high_score);

    let mut guard = RawModeGuard::enable()?;
    let mut term = TermManager::new(io::stdout());
    let mut stdin = io::stdin();

    term.show_start_screen(high_score)?;
    read_byte(&mut stdin)?;

    let board = match args.board {
        Some(board) => board,
        None => {
            term.show_menu("Choose board size:", BoardSize::MENU, Some(high_score))?;
            read_choice(&mut stdin, BoardSize::from_choice)?
        }
    };
    let difficulty = match args.difficulty {
        Some(difficulty) => difficulty,
        None => {
            term.show_menu("Choose difficulty:", Difficulty::MENU, None)?;
            read_choice(&mut stdin, Difficulty::from_choice)?
        }
    };
    info!("board {:?}, difficulty {}", board, difficulty);

    let state = GameState::new(board.dimensions(), difficulty);
    let direction = SharedDirection::new(state.direction());

    let (tx, rx) = mpsc::channel();
    let mut ticker = Ticker::spawn(difficulty.tick_interval(), tx.clone());
    // Never joined: it sits in a blocking read until the process exits
    input::spawn_listener(stdin, direction.clone(), tx);

    let mut engine = Engine::new(state, term, store, high_score, direction);
    let res = engine.run(&rx);
    info!("leaving with score {}, high score {}", engine.state().score(), engine.high_score());

    ticker.stop();
    guard.restore()?;
    res
}

fn read_byte(reader: &mut impl Read) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Reads keys until one of them maps to a choice.
fn read_choice<T>(reader: &mut impl Read, parse: fn(u8) -> Option<T>) -> io::Result<T> {
    loop {
        if let Some(choice) = parse(read_byte(reader)?) {
            return Ok(choice);
        }
    }
}
