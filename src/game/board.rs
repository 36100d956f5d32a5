
use crate::{Direction, PlacedTile, Position, Rules, Table};
use super::{Move, ScoredMove};

/// Which tile sits on each square.
///
/// Never stored: always rebuilt from the moves of a game.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    squares: Table<Option<PlacedTile>>,
}

impl Board {
    pub fn empty(rules: &Rules) -> Self {
        Self {
            squares: Table::fill_with(rules.width().max(0) as usize, rules.height().max(0) as usize, None),
        }
    }

    /// The board after every word played in `moves`.
    ///
    /// When two moves put a tile on the same square, the earlier one is kept.
    pub fn from_moves(rules: &Rules, moves: &[ScoredMove]) -> Self {
        let mut board = Self::empty(rules);
        for scored in moves {
            if let Move::PlayWord { tiles, .. } = &scored.mov {
                for tile in tiles {
                    if let Some(square) = board.squares.get_mut(tile.position()) {
                        if square.is_none() {
                            *square = Some(tile.clone());
                        }
                    }
                }
            }
        }
        board
    }

    /// The board with `tiles` put on it, covering whatever was under them
    pub fn with_tiles(&self, tiles: &[PlacedTile]) -> Self {
        let mut board = self.clone();
        for tile in tiles {
            if let Some(square) = board.squares.get_mut(tile.position()) {
                *square = Some(tile.clone());
            }
        }
        board
    }

    pub fn tile_at(&self, pos: Position) -> Option<&PlacedTile> {
        self.squares.get(pos).and_then(Option::as_ref)
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.tile_at(pos).is_some()
    }

    /// The contiguous run of tiles in `dir` going through `start`.
    ///
    /// `start` itself is always part of the run, even when it is not on the
    /// board; the neighbours are looked up on the board.
    pub fn run_through(&self, start: &PlacedTile, dir: Direction) -> Vec<PlacedTile> {
        let mut before = vec![];
        let mut pos = start.position().back(dir);
        while let Some(tile) = self.tile_at(pos) {
            before.push(tile.clone());
            pos = pos.back(dir);
        }

        let mut run = before;
        run.reverse();
        run.push(start.clone());

        let mut pos = start.position().next(dir);
        while let Some(tile) = self.tile_at(pos) {
            run.push(tile.clone());
            pos = pos.next(dir);
        }
        run
    }
}


#[test]
fn earlier_moves_keep_their_square() {
    use crate::test_utils::*;

    let state = basic_starting_state();
    let first = ScoredMove {
        mov: Move::PlayWord { player: 0, tiles: tiles_from_tray("pup", (7, 7), Direction::Horizontal, &state.trays[0]) },
        words: vec![],
        total_score: 0,
        illegal_reasons: vec![],
    };
    let second = ScoredMove {
        mov: Move::PlayWord { player: 1, tiles: tiles_from_tray("k", (7, 7), Direction::Horizontal, &state.trays[1]) },
        words: vec![],
        total_score: 0,
        illegal_reasons: vec![],
    };

    let board = Board::from_moves(&state.rules, &[first, second]);
    assert_eq!(board.tile_at(Position::new(7, 7)).map(|t| t.tile.letter), Some('p'));
    let occupied = (0..15)
        .flat_map(|x| (0..15).map(move |y| Position::new(x, y)))
        .filter(|&pos| board.is_occupied(pos))
        .count();
    assert_eq!(occupied, 3);

    let covered = board.with_tiles(&tiles_from_tray("k", (7, 7), Direction::Horizontal, &state.trays[1]));
    assert_eq!(covered.tile_at(Position::new(7, 7)).map(|t| t.tile.letter), Some('k'));
}

#[test]
fn run_through_collects_both_sides() {
    use crate::test_utils::*;

    let state = basic_starting_state();
    let pups = tiles_from_tray("pups", (7, 7), Direction::Horizontal, &state.trays[0]);
    let board = Board::empty(&state.rules).with_tiles(&pups);

    let word: String = board.run_through(&pups[2], Direction::Horizontal).iter().map(|t| t.tile.letter).collect();
    assert_eq!(word, "pups");
    assert_eq!(board.run_through(&pups[2], Direction::Vertical).len(), 1);

    let outside = state.trays[1][0].clone().placed_at(-1, 7);
    assert_eq!(board.run_through(&outside, Direction::Horizontal).len(), 1);
}
