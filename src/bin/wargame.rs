use ai_wargame::options::GameType;
use ai_wargame::trace::GameTrace;
use ai_wargame::{CoordPair, GameError, GameResult, GameSession, Heuristic, Options};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::EnvFilter;

const BROKER_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "wargame", about = "Play the AI wargame against a human, the computer or a broker")]
struct Args {
    /// Maximum search depth
    #[arg(long)]
    max_depth: Option<u32>,

    /// Plies always searched, even past the time limit
    #[arg(long)]
    min_depth: Option<u32>,

    /// Maximum search time per move, in seconds
    #[arg(long)]
    max_time: Option<f64>,

    /// Game type: auto|attacker|defender|manual
    #[arg(long)]
    game_type: Option<String>,

    /// Play via a game broker at this URL
    #[arg(long)]
    broker: Option<String>,

    /// Maximum number of turns
    #[arg(long)]
    max_turns: Option<u32>,

    /// Heuristic number: 0|1|2
    #[arg(long = "e")]
    heuristic: Option<u8>,

    /// Use plain minimax instead of alpha-beta
    #[arg(long)]
    no_alpha_beta: bool,

    /// Search moves in generation order
    #[arg(long)]
    no_randomize: bool,

    /// Seed for move shuffling
    #[arg(long)]
    seed: Option<u64>,

    /// Board dimension
    #[arg(long)]
    dim: Option<u8>,

    /// JSON options file, flags take precedence
    #[arg(long)]
    config: Option<String>,

    /// Do not write the game trace file
    #[arg(long)]
    no_trace: bool,
}

fn parse_game_type(name: &str) -> GameType {
    match name {
        "attacker" => GameType::AttackerVsComp,
        "defender" => GameType::CompVsDefender,
        "manual" => GameType::AttackerVsDefender,
        _ => GameType::CompVsComp,
    }
}

fn build_options(args: &Args) -> GameResult<Options> {
    let mut options = match &args.config {
        Some(path) => Options::from_json_file(path)?,
        None => Options {
            game_type: GameType::CompVsComp,
            ..Options::default()
        },
    };

    if let Some(name) = &args.game_type {
        options.game_type = parse_game_type(name);
    }
    if let Some(dim) = args.dim {
        options.dim = dim;
    }
    if let Some(max_turns) = args.max_turns {
        options.max_turns = Some(max_turns);
    }
    if args.broker.is_some() {
        options.broker = args.broker.clone();
    }

    let search = &mut options.search;
    if let Some(depth) = args.max_depth {
        search.max_depth = Some(depth);
    }
    if let Some(depth) = args.min_depth {
        search.min_depth = Some(depth);
    }
    if let Some(secs) = args.max_time {
        search.max_time = Some(secs);
    }
    if let Some(e) = args.heuristic {
        search.heuristic = Heuristic::try_from(e)?;
    }
    if args.no_alpha_beta {
        search.alpha_beta = false;
    }
    if args.no_randomize {
        search.randomize_moves = false;
    }
    if args.seed.is_some() {
        search.seed = args.seed;
    }

    options.validate()?;
    Ok(options)
}

/// Keep asking until the side to move enters a legal move.
fn human_turn(session: &mut GameSession, input: &mut impl BufRead) -> GameResult<()> {
    let player = session.state().next_player;
    loop {
        print!("Player {player}, enter your move: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(GameError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            )));
        }
        let board = &session.state().board;
        let mv = match line.parse::<CoordPair>() {
            Ok(mv) if board.is_valid_coord(mv.src) && board.is_valid_coord(mv.dst) => mv,
            _ => {
                println!("Invalid coordinates! Try again.");
                continue;
            }
        };

        match session.play_move(&mv) {
            Ok(outcome) => {
                println!("Player {player}: {outcome}");
                return Ok(());
            }
            Err(GameError::InvalidMove { .. }) => println!("The move is not valid! Try again."),
            Err(err) => return Err(err),
        }
    }
}

/// Wait for the opponent's move to show up on the broker and play it.
fn broker_turn(session: &mut GameSession) -> GameResult<()> {
    println!("Getting next move with auto-retry from game broker...");
    let player = session.state().next_player;
    loop {
        match session.fetch_broker_move() {
            Ok(Some(mv)) => match session.play_move(&mv) {
                Ok(outcome) => {
                    println!("Broker {player}: {outcome}");
                    return Ok(());
                }
                Err(GameError::InvalidMove { .. }) => println!("Broker {player}: invalid move"),
                Err(err) => return Err(err),
            },
            Ok(None) => {}
            // Transient, keep polling.
            Err(err) => println!("Broker error: {err}"),
        }
        thread::sleep(BROKER_POLL_INTERVAL);
    }
}

fn run(args: Args) -> GameResult<()> {
    let options = build_options(&args)?;
    let mut session = GameSession::new(options)?;
    if !args.no_trace {
        let trace = GameTrace::create(session.options())?;
        session = session.with_trace(trace)?;
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        println!();
        println!("{}", session.state());
        session.trace_board()?;

        if let Some(winner) = session.finish()? {
            println!("{winner} wins in {} moves!", session.state().turns_played);
            return Ok(());
        }

        if session.is_human_turn() {
            if session.has_broker() {
                broker_turn(&mut session)?;
            } else {
                human_turn(&mut session, &mut input)?;
            }
        } else {
            let player = session.state().next_player;
            let played = session.computer_turn()?;
            println!("Computer {player}: {}", played.outcome);
            println!("{}", played.summary);
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err @ GameError::NoMoveAvailable { .. }) => {
            println!("Computer doesn't know what to do!!!");
            error!(%err);
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
