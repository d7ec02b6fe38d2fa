use anyhow::Context;
use minesweeper_ai::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::thread;
use std::time::Duration;

/// Command line settings: `[height] [width] [mines] [seed]`.
struct Config {
    height: usize,
    width: usize,
    mines: usize,
    seed: Option<u64>,
}

impl Config {
    fn from_args(args: &[String]) -> anyhow::Result<Self> {
        let dimension = |idx: usize, name: &str, default: usize| -> anyhow::Result<usize> {
            match args.get(idx) {
                Some(raw) => raw.parse().with_context(|| format!("invalid {name}: {raw}")),
                None => Ok(default),
            }
        };
        let seed = match args.get(3) {
            Some(raw) => Some(raw.parse().with_context(|| format!("invalid seed: {raw}"))?),
            None => None,
        };

        Ok(Config {
            height: dimension(0, "height", 8)?,
            width: dimension(1, "width", 8)?,
            mines: dimension(2, "mines", 8)?,
            seed,
        })
    }
}

fn main() -> anyhow::Result<()> {
    // --- 1. Initialization ---
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = Config::from_args(&args)?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let game = Game::new(config.height, config.width, config.mines, &mut rng)?;
    let mut session = Session::new(game);

    println!("--- Knowledge-Based Minesweeper Bot ---");
    println!("Strategy: Play only proven-safe cells, guess randomly otherwise.");
    println!("Initial Board:");
    print_board(&session.game);
    thread::sleep(Duration::from_millis(500));

    // --- 2. Game Loop ---
    let mut move_count = 0;
    while session.game.game_state == GameState::Playing {
        move_count += 1;
        println!("\n--- Move #{} ---", move_count);

        // --- 3. Bot's Decision and Execution ---
        match session.step(&mut rng)? {
            Turn::Revealed { played, count } => {
                match played {
                    Move::Safe(cell) => println!("Logic found a guaranteed safe cell: {cell}."),
                    Move::Guess(cell) => {
                        println!("No logically safe move found. Guessing {cell}...")
                    }
                }
                println!("Revealed {} with {count} adjacent mines.", played.cell());
            }
            Turn::Exploded(cell) => {
                println!("Guessed {cell} and hit a mine.");
                break;
            }
            Turn::Exhausted => {
                println!("No moves left, flagging every known mine.");
                break;
            }
        }

        print_board(&session.game);
        print!("{}", session.agent.describe());

        // Add a delay to make the game watchable
        thread::sleep(Duration::from_millis(200));
    }

    // --- 4. Final Result ---
    println!("\n--- Game Over ---");
    print_board(&session.game);

    match session.game.game_state {
        GameState::Won => println!("Result: The bot won!"),
        GameState::Lost => println!("Result: The bot hit a mine and lost."),
        GameState::Playing => println!("Result: The game ended unexpectedly."),
    }
    Ok(())
}

fn print_board(game: &Game) {
    // Print header
    print!("   ");
    for col in 0..game.board.width {
        print!("{:^3}", col);
    }
    println!("\n  +{}", "---".repeat(game.board.width));

    // Print rows
    for (row, tiles) in game.tiles.iter().enumerate() {
        print!("{:^2}|", row);
        for tile in tiles {
            let display = match tile {
                Tile::Hidden => " ■ ".to_string(),
                Tile::Flagged => " F ".to_string(),
                Tile::Revealed(n) => format!(" {} ", n),
            };
            print!("{}", display);
        }
        println!();
    }
    println!();
}
