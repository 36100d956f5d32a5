
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{IdAllocator, LetterScoring, Rules, Tile, BLANK_LETTER};
use super::{GameState, Player, PlayerToMove};

/// Letter distribution of the usual 100 tiles, blanks included
pub const CLASSIC_DISTRIBUTION: [(char, usize); 27] = [
    ('a', 9), ('b', 2), ('c', 2), ('d', 4), ('e', 12), ('f', 2), ('g', 3),
    ('h', 2), ('i', 9), ('j', 1), ('k', 1), ('l', 4), ('m', 2), ('n', 6),
    ('o', 8), ('p', 2), ('q', 1), ('r', 6), ('s', 4), ('t', 6), ('u', 4),
    ('v', 2), ('w', 2), ('x', 1), ('y', 2), ('z', 1), (BLANK_LETTER, 2),
];

/// One tile per letter occurrence in `distribution`, valued by `scoring`
pub fn tile_set(ids: &mut IdAllocator, distribution: &[(char, usize)], scoring: &dyn LetterScoring) -> Vec<Tile> {
    distribution.iter()
        .flat_map(|&(letter, count)| std::iter::repeat(letter).take(count))
        .map(|letter| if letter == BLANK_LETTER {
            Tile::blank(ids.next_id())
        } else {
            Tile::new(ids.next_id(), letter, scoring.score_for(letter))
        })
        .collect()
}

/// Shuffle `bag` from `seed`, and return the seed of the next shuffle
pub fn shuffle_bag(bag: &mut [Tile], seed: u64) -> u64 {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    bag.shuffle(&mut rng);
    rng.next_u64()
}

/// Fill every tray up to the tray size, in player order, while the bag lasts
pub fn draw_tiles(mut state: GameState) -> GameState {
    let tray_size = state.rules.tray_size();
    for tray in state.trays.iter_mut() {
        while tray.len() < tray_size {
            match state.bag.pop() {
                Some(tile) => tray.push(tile),
                None => break,
            }
        }
    }
    state
}

/// Shuffle the bag and deal the first trays
pub fn start_game(mut state: GameState) -> GameState {
    state.shuffle_seed = shuffle_bag(&mut state.bag, state.shuffle_seed);
    let state = draw_tiles(state);
    log::info!(
        "game started for {} players, {} tiles left in the bag",
        state.players.len(),
        state.bag.len(),
    );
    state
}

/// A game not started yet: every tile is in the bag, trays are empty and
/// the first player is to move
pub fn new_game(rules: Rules, players: Vec<Player>, bag: Vec<Tile>, shuffle_seed: u64) -> GameState {
    let count = players.len();
    GameState {
        rules,
        players,
        player_to_move: PlayerToMove::Player(0),
        moves: vec![],
        scores: vec![0; count],
        trays: vec![vec![]; count],
        bag,
        shuffle_seed,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::score_rules::EnglishScrabbleScoring;
    use crate::test_utils::*;

    fn unstarted(seed: u64) -> GameState {
        let mut ids = IdAllocator::new();
        let bag = tile_set(&mut ids, &CLASSIC_DISTRIBUTION, &EnglishScrabbleScoring);
        let players = vec![crate::Player::new("woof", "Lucy"), crate::Player::new("meow", "Jack")];
        new_game(basic_starting_state().rules, players, bag, seed)
    }

    #[test]
    fn classic_distribution_has_100_tiles() {
        let tiles = tile_set(&mut IdAllocator::new(), &CLASSIC_DISTRIBUTION, &EnglishScrabbleScoring);
        assert_eq!(tiles.len(), 100);
        assert_eq!(tiles.iter().filter(|t| t.is_blank).count(), 2);
        assert_eq!(tiles.iter().map(|t| t.point_value).sum::<u32>(), 187);
        assert_eq!(tiles.iter().filter(|t| t.letter == 'e').count(), 12);

        let mut ids = tiles.iter().map(|t| t.id).collect::<Vec<_>>();
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn shuffling_depends_only_on_the_seed() {
        let tiles = tile_set(&mut IdAllocator::new(), &CLASSIC_DISTRIBUTION, &EnglishScrabbleScoring);

        let mut a = tiles.clone();
        let mut b = tiles.clone();
        let next_a = shuffle_bag(&mut a, 42);
        let next_b = shuffle_bag(&mut b, 42);
        assert_eq!(next_a, next_b);
        assert_eq!(a.iter().map(|t| t.id).collect::<Vec<_>>(), b.iter().map(|t| t.id).collect::<Vec<_>>());
        assert_ne!(a.iter().map(|t| t.id).collect::<Vec<_>>(), tiles.iter().map(|t| t.id).collect::<Vec<_>>());

        let mut c = tiles.clone();
        shuffle_bag(&mut c, next_a);
        assert_ne!(a.iter().map(|t| t.id).collect::<Vec<_>>(), c.iter().map(|t| t.id).collect::<Vec<_>>());
    }

    #[test]
    fn draws_in_player_order_from_the_end_of_the_bag() {
        let mut gs = basic_starting_state();
        gs.trays[0].truncate(5);
        gs.trays[1].truncate(6);

        let gs = draw_tiles(gs);
        assert_eq!(letters_in_tray(&gs.trays[0]), "puppl z");
        assert_eq!(letters_in_tray(&gs.trays[1]), "kittehy");
        assert_eq!(gs.bag.len(), 24);
    }

    #[test]
    fn drawing_from_an_empty_bag_is_harmless() {
        let mut gs = basic_starting_state();
        gs.bag.truncate(1);
        gs.trays[0].truncate(3);
        gs.trays[1].clear();

        let gs = draw_tiles(gs);
        assert_eq!(gs.trays[0].len(), 4);
        assert_eq!(gs.trays[1].len(), 0);
        assert!(gs.bag.is_empty());
    }

    #[test]
    fn starting_a_game_deals_full_trays() {
        let gs = start_game(unstarted(7));
        assert_eq!(gs.player_to_move, PlayerToMove::Player(0));
        assert_eq!(gs.scores, vec![0, 0]);
        assert_eq!(gs.trays.iter().map(Vec::len).collect::<Vec<_>>(), vec![7, 7]);
        assert_eq!(gs.bag.len(), 86);
        assert_eq!(gs.tile_count(), 100);
        assert_ne!(gs.shuffle_seed, 7);

        assert_eq!(start_game(unstarted(7)), gs);
        assert_ne!(start_game(unstarted(8)).trays, gs.trays);
    }
}
