use minesweeper_ai as ms;
use wasm_bindgen::prelude::*;

fn load(bts: &[u8]) -> Result<ms::Session, String> {
    ms::Session::deserialize(bts).map_err(|e| e.to_string())
}

#[wasm_bindgen]
pub fn create_session(height: usize, width: usize, mines: usize) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    let game = ms::Game::new(height, width, mines, &mut rand::rng()).map_err(|e| e.to_string())?;
    ms::Session::new(game).serialize().map_err(|e| e.to_string())
}

/// Lets the agent play one move and returns the updated session.
#[wasm_bindgen]
pub fn step(bts: Vec<u8>) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    let mut session = load(&bts)?;
    session.step(&mut rand::rng()).map_err(|e| e.to_string())?;
    session.serialize().map_err(|e| e.to_string())
}

/// 0 while playing, 1 once won, 2 once lost.
#[wasm_bindgen]
pub fn game_state(bts: Vec<u8>) -> Result<u8, String> {
    console_error_panic_hook::set_once();

    let session = load(&bts)?;
    Ok(match session.game.game_state {
        ms::GameState::Playing => 0,
        ms::GameState::Won => 1,
        ms::GameState::Lost => 2,
    })
}

#[wasm_bindgen]
pub fn get_cells(bts: Vec<u8>) -> Result<Vec<i8>, String> {
    console_error_panic_hook::set_once();

    let session = load(&bts)?;
    Ok(session
        .game
        .tiles
        .into_iter()
        .flat_map(|row| {
            row.into_iter().map(|tile| match tile {
                ms::Tile::Hidden => -1,
                ms::Tile::Flagged => -2,
                ms::Tile::Revealed(n) => n as i8,
            })
        })
        .collect())
}

/// Cells the agent has proven safe but not played yet, as `row * width + col`.
#[wasm_bindgen]
pub fn known_safe_moves(bts: Vec<u8>) -> Result<Vec<u32>, String> {
    console_error_panic_hook::set_once();

    let session = load(&bts)?;
    let width = session.game.board.width;
    Ok(session
        .agent
        .known_safes()
        .difference(session.agent.moves_made())
        .map(|cell| (cell.row * width + cell.col) as u32)
        .collect())
}
