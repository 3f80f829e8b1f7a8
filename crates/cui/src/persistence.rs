use klondike_core::{Game, GameSnapshot};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const SAVE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedGame {
    pub version: u32,
    pub snapshot: GameSnapshot,
}

pub fn default_state_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("KLONDIKE_SAVE") {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".klondike_state.json"))
}

pub fn save_state_file(game: &Game, path: &Path) -> Result<(), String> {
    let payload = SavedGame {
        version: SAVE_SCHEMA_VERSION,
        snapshot: game.snapshot(),
    };
    let body = serde_json::to_string_pretty(&payload).map_err(|err| err.to_string())?;
    fs::write(path, body).map_err(|err| err.to_string())
}

pub fn load_state_file(path: &Path) -> Result<Game, String> {
    let body = fs::read_to_string(path).map_err(|err| err.to_string())?;
    let payload: SavedGame = serde_json::from_str(&body).map_err(|err| err.to_string())?;
    if payload.version != SAVE_SCHEMA_VERSION {
        return Err(format!(
            "unsupported save version {} (expected {})",
            payload.version, SAVE_SCHEMA_VERSION
        ));
    }
    Game::from_snapshot(payload.snapshot).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use klondike_core::{EventBus, Phase};
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn save_load_roundtrip() {
        let file = unique_temp_file();
        let mut events = EventBus::default();
        let mut game = Game::new(42);
        game.new_game(&mut events).expect("deal");
        game.draw_stock(&mut events);
        save_state_file(&game, &file).expect("save");
        let loaded = load_state_file(&file).expect("load");
        assert_eq!(loaded.snapshot(), game.snapshot());
        assert_eq!(loaded.phase(), Phase::Playing);
        let _ = std::fs::remove_file(file);
    }

    #[test]
    fn load_rejects_unknown_version() {
        let file = unique_temp_file();
        let game = Game::new(1);
        let body = serde_json::json!({
            "version": 99,
            "snapshot": game.snapshot(),
        });
        std::fs::write(&file, body.to_string()).expect("write");
        let err = load_state_file(&file).expect_err("version");
        assert!(err.contains("unsupported save version 99"), "{err}");
        let _ = std::fs::remove_file(file);
    }

    #[test]
    fn load_rejects_tampered_board() {
        let file = unique_temp_file();
        let mut events = EventBus::default();
        let mut game = Game::new(5);
        game.new_game(&mut events).expect("deal");
        let mut snapshot = game.snapshot();
        let card = snapshot.board.stock[0];
        snapshot.board.stock.push(card);
        let payload = SavedGame {
            version: SAVE_SCHEMA_VERSION,
            snapshot,
        };
        std::fs::write(&file, serde_json::to_string(&payload).expect("json")).expect("write");
        let err = load_state_file(&file).expect_err("tampered");
        assert!(err.contains("invalid board"), "{err}");
        let _ = std::fs::remove_file(file);
    }

    fn unique_temp_file() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "klondike_cui_persistence_test_{}_{}.json",
            std::process::id(),
            nanos
        ))
    }
}
