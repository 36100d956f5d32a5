
use std::collections::HashSet;

use crate::{Alignment, CellBonus, Direction, PlacedTile, Rules, TileId};
use super::{
    Board,
    BoardKnowledge,
    IllegalReason,
    IllegalReasonCode,
    Move,
    ScoredMove,
    ScoredWord,
};

/// Validate and score `mov` against what is on the board.
///
/// Nothing is short-circuited: every problem of the move is reported, and the
/// words and score are computed even for an illegal move.
pub fn score_move(knowledge: &impl BoardKnowledge, mov: &Move) -> ScoredMove {
    let mut illegal_reasons = duplicate_tiles(&mov.tile_ids());

    let tiles = match mov {
        Move::PlayWord { tiles, .. } => tiles,
        Move::Pass { .. } | Move::ExchangeTiles { .. } => {
            return ScoredMove {
                mov: mov.clone(),
                words: vec![],
                total_score: 0,
                illegal_reasons,
            }
        },
    };

    let rules = knowledge.rules();
    let played = Board::from_moves(rules, knowledge.moves());
    let board = played.with_tiles(tiles);
    let placed_ids: HashSet<TileId> = tiles.iter().map(PlacedTile::id).collect();

    let words = find_words(&board, tiles)
        .iter()
        .map(|word| score_word(rules, word, &placed_ids))
        .collect::<Vec<_>>();

    let mut total_score = words.iter().fold(0u32, |total, w| total.saturating_add(w.score));
    if tiles.len() >= rules.tray_size() {
        total_score = total_score.saturating_add(rules.settings.bingo_bonus);
    }

    let mut connected = false;
    for (idx, tile) in tiles.iter().enumerate() {
        let pos = tile.position();
        if !rules.on_board(pos) {
            illegal_reasons.push(IllegalReason::new(
                IllegalReasonCode::OutsideBoard,
                format!("Cannot place {} outside the board", tile.tile.display_letter()),
            ));
            continue
        }

        let same_square = tiles.iter().enumerate()
            .find(|&(other_idx, other)| other_idx != idx && other.position() == pos);
        if let Some((_, other)) = same_square {
            illegal_reasons.push(IllegalReason::new(
                IllegalReasonCode::TilesOnSameSquare,
                format!(
                    "Cannot place {} and {} on the same square",
                    other.tile.display_letter(),
                    tile.tile.display_letter(),
                ),
            ));
        }

        connected = connected || pos.neighbours().iter().any(|&n| {
            board.tile_at(n).map_or(false, |t| !placed_ids.contains(&t.id()))
        });

        if !rules.settings.allow_overwrite {
            if let Some(existing) = played.tile_at(pos) {
                illegal_reasons.push(IllegalReason::new(
                    IllegalReasonCode::DisallowedOverwrite,
                    format!(
                        "Cannot overwrite existing {} with {}",
                        existing.tile.display_letter(),
                        tile.tile.display_letter(),
                    ),
                ));
            }
        }
    }

    if !in_straight_line(rules, &board, tiles) {
        illegal_reasons.push(IllegalReason::new(
            IllegalReasonCode::NotInStraightLine,
            "Move must be in one straight line",
        ));
    }

    if words.is_empty() {
        illegal_reasons.push(IllegalReason::new(
            IllegalReasonCode::NotFormingWord,
            "Move must form at least one word",
        ));
    } else if !knowledge.has_word_been_played() {
        let center = rules.center();
        if !tiles.iter().any(|t| t.position() == center) {
            illegal_reasons.push(IllegalReason::new(
                IllegalReasonCode::FirstMoveNotOnCenter,
                "First move must lie on center square",
            ));
        }
    } else if !connected {
        illegal_reasons.push(IllegalReason::new(
            IllegalReasonCode::NotConnected,
            "Move must be connected to other tiles on the board",
        ));
    }

    if !rules.settings.accept_invalid_words {
        for word in words.iter().filter(|w| !w.valid) {
            illegal_reasons.push(IllegalReason::new(
                IllegalReasonCode::InvalidWord,
                format!("{} is not a valid word", word.word.to_uppercase()),
            ));
        }
    }

    ScoredMove {
        mov: mov.clone(),
        words,
        total_score,
        illegal_reasons,
    }
}

/// `DuplicateTile` if an id appears twice in `ids`
pub fn duplicate_tiles(ids: &[TileId]) -> Vec<IllegalReason> {
    let distinct = ids.iter().collect::<HashSet<_>>();
    if distinct.len() < ids.len() {
        vec![IllegalReason::new(IllegalReasonCode::DuplicateTile, "Tile IDs duplicated in tile list")]
    } else {
        vec![]
    }
}

/// Every run of at least 2 tiles going through the placed tiles, vertical ones first
fn find_words(board: &Board, tiles: &[PlacedTile]) -> Vec<Vec<PlacedTile>> {
    let mut words = vec![];
    for &dir in Direction::BOTH.iter() {
        let mut remaining = tiles.iter().collect::<Vec<_>>();
        while let Some(&start) = remaining.first() {
            let run = board.run_through(start, dir);
            remaining.retain(|t| t.id() != start.id() && !run.iter().any(|r| r.id() == t.id()));
            if run.len() > 1 {
                words.push(run);
            }
        }
    }
    words
}

/// Bonuses only count for the tiles placed by the move being scored
fn score_word(rules: &Rules, word: &[PlacedTile], placed_ids: &HashSet<TileId>) -> ScoredWord {
    let mut word_multiplier: u32 = 1;
    let mut score: u32 = 0;
    for tile in word {
        let mut letter_score = tile.tile.point_value;
        if placed_ids.contains(&tile.id()) {
            match rules.cell_bonus(tile.position()) {
                Some(CellBonus::Letter(m)) => letter_score = letter_score.saturating_mul(m),
                Some(CellBonus::Word(m)) => word_multiplier = word_multiplier.saturating_mul(m),
                None => {},
            }
        }
        score = score.saturating_add(letter_score);
    }
    let text = word.iter().map(|t| t.tile.letter).collect::<String>();
    ScoredWord {
        valid: rules.is_valid_word(&text),
        word: text,
        score: score.saturating_mul(word_multiplier),
    }
}

/// All the tiles are on one row or column, and every square between the
/// first and the last one is filled, either by the move or by an earlier one
fn in_straight_line(rules: &Rules, board: &Board, tiles: &[PlacedTile]) -> bool {
    match Alignment::find(tiles.iter().map(PlacedTile::position)) {
        None => false,
        Some(Alignment::Point) => true,
        Some(Alignment::Line(line)) => line.positions()
            .take_while(|&pos| rules.on_board(pos))
            .all(|pos| board.is_occupied(pos)),
    }
}
