
use std::collections::HashSet;
use std::sync::Arc;

use crate::score_rules::NoBonus;
use crate::{
    game::handle_action,
    Action,
    Direction,
    GameState,
    IdAllocator,
    PlacedTile,
    Player,
    PlayerToMove,
    Position,
    RuleSettings,
    Rules,
    Tile,
    BLANK_LETTER,
};

/// Tiles with the letters of `letters`: k 5, p 3, h 4, blanks 0, everything else 1
pub fn letter_tiles(ids: &mut IdAllocator, letters: &str) -> Vec<Tile> {
    letters.chars()
        .map(|c| match c {
            BLANK_LETTER => Tile::blank(ids.next_id()),
            'k' => Tile::new(ids.next_id(), c, 5),
            'p' => Tile::new(ids.next_id(), c, 3),
            'h' => Tile::new(ids.next_id(), c, 4),
            _ => Tile::new(ids.next_id(), c, 1),
        })
        .collect()
}

/// Place `word` from `start` on, taking for each letter the first tile of
/// `tray` with it that is not used yet
pub fn tiles_from_tray(word: &str, start: (i32, i32), dir: Direction, tray: &[Tile]) -> Vec<PlacedTile> {
    let mut pos = Position::new(start.0, start.1);
    let mut remaining = tray.to_vec();
    word.chars()
        .map(|c| {
            let idx = remaining.iter().position(|t| t.letter == c)
                .unwrap_or_else(|| panic!("can't find {:?} in tray", c));
            let placed = remaining.remove(idx).placed_at(pos.x, pos.y);
            pos = pos.next(dir);
            placed
        })
        .collect()
}

pub fn letters_in_tray(tray: &[Tile]) -> String {
    tray.iter().map(|t| t.letter).collect()
}

pub fn word_set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

pub fn test_rules() -> Rules {
    Rules::new(
        RuleSettings {
            name: "Test".to_owned(),
            word_set_name: "test".to_owned(),
            width: 15,
            height: 15,
            tray_size: 7,
            bingo_bonus: 50,
            accept_invalid_words: true,
            allow_overwrite: false,
        },
        Arc::new(NoBonus),
        Arc::new(word_set(&["pup", "kit", "pupple", "pups", "kits", "puppples", "spit"])),
    )
}

/// Two players with full trays: Lucy has `pupples` and Jack `kittehs`; the
/// bag is unshuffled, its last tile is a blank
pub fn basic_starting_state() -> GameState {
    let mut ids = IdAllocator::new();
    let bag = letter_tiles(&mut ids, "abcdefghijklmnopqrstuvwxyz ");
    let trays = vec![letter_tiles(&mut ids, "pupples"), letter_tiles(&mut ids, "kittehs")];
    GameState {
        rules: test_rules(),
        players: vec![Player::new("woof", "Lucy"), Player::new("meow", "Jack")],
        player_to_move: PlayerToMove::Player(0),
        moves: vec![],
        scores: vec![0, 0],
        trays,
        bag,
        shuffle_seed: 0,
    }
}

/// Apply an action that must be legal
pub fn handle_legal_action(state: &GameState, action: Action) -> GameState {
    let result = handle_action(state, &action);
    assert_eq!(result.illegal_reasons, vec![], "{:?}", action);
    result.new_state
}
