use super::*;

/// Owned, serialisable copy of everything the presentation layer reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSnapshot {
    pub board: Board,
    pub score: u32,
    pub phase: Phase,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Game {
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            score: self.score,
            phase: self.phase,
            seed: self.deal_seed,
        }
    }

    /// Rebuilds a game from a snapshot, refusing boards that could not have
    /// been reached by play.
    pub fn from_snapshot(snapshot: GameSnapshot) -> Result<Self, EngineError> {
        match snapshot.phase {
            Phase::New => {
                if snapshot.board.card_count() != 0 {
                    return Err(EngineError::InvalidBoard(
                        "an undealt game cannot hold cards".to_string(),
                    ));
                }
            }
            Phase::Playing | Phase::Won => {
                snapshot
                    .board
                    .check_invariants()
                    .map_err(EngineError::InvalidBoard)?;
            }
        }
        if snapshot.phase == Phase::Won && !snapshot.board.foundations_complete() {
            return Err(EngineError::InvalidBoard(
                "a won game must have every foundation complete".to_string(),
            ));
        }
        let rng = match snapshot.seed {
            Some(seed) => RngState::from_seed(seed),
            None => RngState::from_entropy(),
        };
        let mut game = Self::with_rng(rng);
        game.board = snapshot.board;
        game.score = snapshot.score;
        game.phase = snapshot.phase;
        game.deal_seed = snapshot.seed;
        Ok(game)
    }
}
