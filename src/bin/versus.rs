use std::env;
use std::error::Error;
use std::fs;

use chess_rules::config::EngineConfig;
use chess_rules::engine::{MoveProvider, RandomMover, UciEngine};
use chess_rules::game::{GameState, Winner};
use chess_rules::piece::Color;

const MAX_PLIES: u32 = 300;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Score {
    Win,
    Draw,
    Loss,
}

/// One game between the UCI engine (playing `engine_color`) and the random
/// picker. Scored from the engine's side.
fn play_game(
    config: &EngineConfig,
    engine_color: Color,
    random: &mut RandomMover,
) -> Result<Score, Box<dyn Error>> {
    let mut engine = UciEngine::start(config.clone())?;
    let mut game = GameState::new();

    for _ in 0..MAX_PLIES {
        if game.is_over() {
            break;
        }
        let side = game.side_to_move();
        let provider: &mut dyn MoveProvider = if side == engine_color {
            &mut engine
        } else {
            &mut *random
        };
        let mv = provider.compute_move(game.board(), side, game.double_step())?;
        if let Err(err) = game.play(&mv) {
            eprintln!("  {side} proposed illegal move {mv}: {err}");
            break;
        }
    }

    Ok(match game.outcome().map(|o| o.winner) {
        Some(Winner::Side(color)) if color == engine_color => Score::Win,
        Some(Winner::Side(_)) => Score::Loss,
        _ => Score::Draw,
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let games: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(10);
    let config = match args.next() {
        Some(path) => EngineConfig::from_json(&fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };

    println!("=== UCI engine vs random mover ===\n");
    println!(
        "Engine: {} (depth {}, movetime {}ms)",
        config.path, config.depth, config.movetime_ms
    );
    println!("Games: {games}\n");

    let mut random = RandomMover::seeded(0);
    let (mut wins, mut draws, mut losses) = (0u32, 0u32, 0u32);

    for i in 0..games {
        let engine_color = if i % 2 == 0 { Color::White } else { Color::Black };
        let result = play_game(&config, engine_color, &mut random)?;
        let label = match result {
            Score::Win => {
                wins += 1;
                "win"
            }
            Score::Draw => {
                draws += 1;
                "draw"
            }
            Score::Loss => {
                losses += 1;
                "loss"
            }
        };
        println!("  game {} (engine as {engine_color}): {label}", i + 1);
    }

    println!();
    println!("{:>4} {:>5} {:>6}", "W", "D", "L");
    println!("{wins:>4} {draws:>5} {losses:>6}");
    Ok(())
}
