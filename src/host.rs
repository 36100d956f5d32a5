
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::game::{
    game_state_visible_to_player,
    handle_action,
    last_move_description,
    start_game,
};
use crate::registry::{NewGameOptions, RegistryError, RulesRegistry};
use crate::{Action, ActionResult, GameState, Player, PlayerToMove, PlayerVisibleGameState, RuleSettings, WordSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMetadata {
    pub game_id: String,
    pub rules_name: String,
    pub word_set_name: String,
    pub started_at: SystemTime,
    pub last_move_at: SystemTime,
}

/// A line in the list of games of a player
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameListEntry {
    #[serde(flatten)]
    pub metadata: GameMetadata,
    pub players: Vec<Player>,
    pub player_to_move: PlayerToMove,
    pub scores: Vec<u32>,
    pub last_move_description: String,
}

#[derive(Debug, Clone)]
pub struct NewGameRequest {
    pub rules_name: String,
    pub word_set_name: String,
    pub players: Vec<Player>,
    pub accept_invalid_words: bool,
    pub shuffle_seed: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("no game {0:?}")]
    UnknownGame(String),
    #[error("no word set {0:?}")]
    UnknownWordSet(String),
    #[error("{player_id:?} does not play in game {game_id:?}")]
    NotAPlayer {
        game_id: String,
        player_id: String,
    },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

struct HostedGame {
    metadata: GameMetadata,
    state: GameState,
}

/// Games being played, kept in memory.
///
/// Actions for one game are applied one at a time; different games do not
/// wait for each other.
pub struct GameHost {
    registry: RulesRegistry,
    word_sets: DashMap<String, Arc<dyn WordSet>>,
    games: DashMap<String, HostedGame>,
    next_id: AtomicU64,
}

impl Default for GameHost {
    fn default() -> Self {
        Self::new(RulesRegistry::with_defaults())
    }
}

impl GameHost {
    pub fn new(registry: RulesRegistry) -> Self {
        Self {
            registry,
            word_sets: DashMap::new(),
            games: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn register_word_set(&self, name: impl Into<String>, words: Arc<dyn WordSet>) {
        self.word_sets.insert(name.into(), words);
    }

    fn word_set(&self, name: &str) -> Result<Arc<dyn WordSet>, HostError> {
        self.word_sets.get(name)
            .map(|w| w.value().clone())
            .ok_or_else(|| HostError::UnknownWordSet(name.to_owned()))
    }

    fn new_game_id(&self) -> String {
        format!("game-{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Create and start a game, returns its id
    pub fn create_game(&self, request: NewGameRequest) -> Result<String, HostError> {
        let provider = self.registry.get(&request.rules_name)?;
        let words = self.word_set(&request.word_set_name)?;
        let state = start_game(provider.new_game(NewGameOptions {
            players: request.players,
            words,
            word_set_name: request.word_set_name.clone(),
            accept_invalid_words: request.accept_invalid_words,
            shuffle_seed: request.shuffle_seed,
        }));

        let game_id = self.new_game_id();
        let now = SystemTime::now();
        let metadata = GameMetadata {
            game_id: game_id.clone(),
            rules_name: request.rules_name,
            word_set_name: request.word_set_name,
            started_at: now,
            last_move_at: now,
        };
        log::info!("created game {} ({}, {} players)", game_id, metadata.rules_name, state.players.len());
        self.games.insert(game_id.clone(), HostedGame { metadata, state });
        Ok(game_id)
    }

    /// Host a game that was stored, under the id of its metadata
    pub fn load_game(&self, metadata: GameMetadata, persisted: GameState<RuleSettings>) -> Result<(), HostError> {
        let words = self.word_set(&persisted.rules.word_set_name)?;
        let state = self.registry.restore_game(persisted, words)?;
        log::info!("loaded game {}", metadata.game_id);
        self.games.insert(metadata.game_id.clone(), HostedGame { metadata, state });
        Ok(())
    }

    /// Apply an action to a game, keeping the game locked until the new state is stored
    pub fn submit(&self, game_id: &str, action: &Action) -> Result<ActionResult<GameState>, HostError> {
        let mut game = self.games.get_mut(game_id)
            .ok_or_else(|| HostError::UnknownGame(game_id.to_owned()))?;

        let result = handle_action(&game.state, action);
        if result.is_legal() {
            game.state = result.new_state.clone();
            if !matches!(action, Action::ReorderTrayTiles { .. }) {
                game.metadata.last_move_at = SystemTime::now();
            }
        } else {
            log::debug!("game {}: action refused", game_id);
        }
        Ok(result)
    }

    pub fn view_for(&self, game_id: &str, player_id: &str) -> Result<PlayerVisibleGameState, HostError> {
        let game = self.games.get(game_id)
            .ok_or_else(|| HostError::UnknownGame(game_id.to_owned()))?;
        let me = game.state.players.iter()
            .position(|p| p.player_id == player_id)
            .ok_or_else(|| HostError::NotAPlayer {
                game_id: game_id.to_owned(),
                player_id: player_id.to_owned(),
            })?;
        Ok(game_state_visible_to_player(&game.state, me))
    }

    /// The games `player_id` plays in, the most recently played first
    pub fn games_for_player(&self, player_id: &str) -> Vec<GameListEntry> {
        let mut entries = self.games.iter()
            .filter(|game| game.state.players.iter().any(|p| p.player_id == player_id))
            .map(|game| GameListEntry {
                metadata: game.metadata.clone(),
                players: game.state.players.clone(),
                player_to_move: game.state.player_to_move,
                scores: game.state.scores.clone(),
                last_move_description: last_move_description(&game.state.players, &game.state.moves),
            })
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| b.metadata.last_move_at.cmp(&a.metadata.last_move_at)
            .then_with(|| a.metadata.game_id.cmp(&b.metadata.game_id)));
        entries
    }

    /// The game the way it is stored
    pub fn persisted(&self, game_id: &str) -> Result<(GameMetadata, GameState<RuleSettings>), HostError> {
        let game = self.games.get(game_id)
            .ok_or_else(|| HostError::UnknownGame(game_id.to_owned()))?;
        Ok((game.metadata.clone(), game.state.to_persisted()))
    }
}
