use std::env;
use std::error::Error;

use chess_rules::engine::{EngineWorker, RandomMover};
use chess_rules::game::{GameState, Winner};

const MAX_PLIES: u32 = 400;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let seed: Option<u64> = env::args().nth(1).map(|s| s.parse()).transpose()?;
    let mover = seed.map_or_else(RandomMover::new, RandomMover::seeded);
    let worker = EngineWorker::spawn(mover)?;

    let mut game = GameState::new();
    let mut plies = 0;

    while !game.is_over() && plies < MAX_PLIES {
        worker.request(game.board(), game.side_to_move(), game.double_step())?;
        let mv = worker.wait_reply()?;
        game.play(&mv)?;
        plies += 1;
    }

    let result = match game.outcome() {
        Some(outcome) => match outcome.winner {
            Winner::Side(color) => format!("{color} wins by {:?}", outcome.reason),
            Winner::Draw => format!("draw by {:?}", outcome.reason),
        },
        None => "ongoing".to_string(),
    };
    eprintln!("Game over after {plies} plies: {result}");
    println!("{}", game.to_fen());
    Ok(())
}
