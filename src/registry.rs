
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::game::bag::{tile_set, CLASSIC_DISTRIBUTION};
use crate::game::new_game;
use crate::score_rules::{ClassicBonus, EnglishScrabbleScoring};
use crate::{GameState, IdAllocator, Player, PlayerVisibleGameState, RuleSettings, Rules, WordSet};

pub const CLASSIC_RULES_NAME: &str = "Original";

/// What a new game is made of, besides the rules themselves
pub struct NewGameOptions {
    pub players: Vec<Player>,
    pub words: Arc<dyn WordSet>,
    pub word_set_name: String,
    pub accept_invalid_words: bool,
    pub shuffle_seed: u64,
}

/// A kind of game that can be played: board, bonuses, tiles
pub trait RulesProvider: Send + Sync {
    fn name(&self) -> &str;

    /// A game ready to be started, every tile still in the bag
    fn new_game(&self, options: NewGameOptions) -> GameState;

    /// The rules of a stored game, played with `words`
    fn restore_rules(&self, settings: RuleSettings, words: Arc<dyn WordSet>) -> Rules;
}

/// The usual game: 15×15 board with the classic bonuses, 100 english tiles
pub struct ClassicRules;

impl RulesProvider for ClassicRules {
    fn name(&self) -> &str {
        CLASSIC_RULES_NAME
    }

    fn new_game(&self, options: NewGameOptions) -> GameState {
        let settings = RuleSettings {
            name: CLASSIC_RULES_NAME.to_owned(),
            word_set_name: options.word_set_name,
            accept_invalid_words: options.accept_invalid_words,
            ..RuleSettings::default()
        };
        let rules = Rules::new(settings, Arc::new(ClassicBonus), options.words);
        let bag = tile_set(&mut IdAllocator::new(), &CLASSIC_DISTRIBUTION, &EnglishScrabbleScoring);
        new_game(rules, options.players, bag, options.shuffle_seed)
    }

    fn restore_rules(&self, mut settings: RuleSettings, words: Arc<dyn WordSet>) -> Rules {
        if settings.name.is_empty() {
            settings.name = CLASSIC_RULES_NAME.to_owned();
        }
        Rules::new(settings, Arc::new(ClassicBonus), words)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown rules {0:?}")]
    UnknownRules(String),
}

/// The kinds of game that can be played, by name
#[derive(Default)]
pub struct RulesRegistry {
    providers: BTreeMap<String, Arc<dyn RulesProvider>>,
}

impl RulesRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ClassicRules));
        registry
    }

    pub fn register(&mut self, provider: Arc<dyn RulesProvider>) {
        self.providers.insert(provider.name().to_owned(), provider);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn RulesProvider>, RegistryError> {
        self.providers.get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownRules(name.to_owned()))
    }

    pub fn names(&self) -> impl Iterator<Item=&str> {
        self.providers.keys().map(String::as_str)
    }

    /// Rules of a stored game, found by the name in its settings; games stored
    /// without a name are classic ones
    fn restore_rules(&self, settings: RuleSettings, words: Arc<dyn WordSet>) -> Result<Rules, RegistryError> {
        let provider = if settings.name.is_empty() {
            self.get(CLASSIC_RULES_NAME)?
        } else {
            self.get(&settings.name)?
        };
        Ok(provider.restore_rules(settings, words))
    }

    pub fn restore_game(&self, persisted: GameState<RuleSettings>, words: Arc<dyn WordSet>) -> Result<GameState, RegistryError> {
        let rules = self.restore_rules(persisted.rules.clone(), words)?;
        Ok(persisted.map_rules(|_| rules))
    }

    pub fn restore_view(
        &self,
        persisted: PlayerVisibleGameState<RuleSettings>,
        words: Arc<dyn WordSet>,
    ) -> Result<PlayerVisibleGameState, RegistryError> {
        let rules = self.restore_rules(persisted.rules.clone(), words)?;
        Ok(persisted.map_rules(|_| rules))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{game_state_visible_to_player, start_game};
    use crate::test_utils::word_set;
    use crate::{CellBonus, Position, PlayerToMove};

    fn options(seed: u64) -> NewGameOptions {
        NewGameOptions {
            players: vec![Player::new("woof", "Lucy"), Player::new("meow", "Jack"), Player::new("purr", "Tom")],
            words: Arc::new(word_set(&["pup"])),
            word_set_name: "tiny".to_owned(),
            accept_invalid_words: false,
            shuffle_seed: seed,
        }
    }

    #[test]
    fn classic_new_game_is_ready_to_start() {
        let gs = ClassicRules.new_game(options(3));
        assert_eq!(gs.rules.settings.name, CLASSIC_RULES_NAME);
        assert_eq!(gs.rules.settings.word_set_name, "tiny");
        assert_eq!(gs.rules.tray_size(), 7);
        assert_eq!(gs.rules.cell_bonus(Position::new(0, 0)), Some(CellBonus::Word(3)));
        assert!(gs.rules.is_valid_word("pup"));
        assert_eq!(gs.bag.len(), 100);
        assert_eq!(gs.trays, vec![vec![], vec![], vec![]]);
        assert_eq!(gs.scores, vec![0, 0, 0]);
        assert_eq!(gs.player_to_move, PlayerToMove::Player(0));
        assert_eq!(gs.shuffle_seed, 3);
    }

    #[test]
    fn restores_a_stored_game() {
        let gs = start_game(ClassicRules.new_game(options(3)));
        let json = serde_json::to_string(&gs.to_persisted()).unwrap();
        let persisted: GameState<RuleSettings> = serde_json::from_str(&json).unwrap();

        let registry = RulesRegistry::with_defaults();
        let restored = registry.restore_game(persisted, Arc::new(word_set(&["pup"]))).unwrap();
        assert_eq!(restored, gs);
        assert!(restored.rules.is_valid_word("pup"));
        assert_eq!(restored.rules.cell_bonus(Position::new(7, 7)), Some(CellBonus::Word(2)));

        let view = serde_json::to_string(&game_state_visible_to_player(&gs.to_persisted(), 2)).unwrap();
        let view = registry.restore_view(serde_json::from_str(&view).unwrap(), Arc::new(word_set(&[]))).unwrap();
        assert_eq!(view.my_tray, gs.trays[2]);
        assert!(!view.rules.is_valid_word("pup"));
    }

    #[test]
    fn rejects_unknown_rules() {
        let registry = RulesRegistry::with_defaults();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec![CLASSIC_RULES_NAME]);
        assert!(registry.get(CLASSIC_RULES_NAME).is_ok());

        let mut persisted = start_game(ClassicRules.new_game(options(1))).to_persisted();
        persisted.rules.name = "Speed".to_owned();
        match registry.restore_game(persisted, Arc::new(word_set(&[]))) {
            Err(RegistryError::UnknownRules(name)) => assert_eq!(name, "Speed"),
            Ok(_) => panic!("restored a game with unknown rules"),
        }
    }
}
