
use std::collections::HashSet;

use crate::{PlacedTile, Tile, TileId};
use super::{
    bag::{draw_tiles, shuffle_bag},
    score::{duplicate_tiles, score_move},
    Action,
    ActionResult,
    GameState,
    IllegalReason,
    IllegalReasonCode,
    Move,
    PlayerToMove,
};

/// Apply `action` to `state`.
///
/// Every reason the action is illegal is reported; in that case the returned
/// state is `state` unchanged.
pub fn handle_action(state: &GameState, action: &Action) -> ActionResult<GameState> {
    let tray = state.tray(action.player());
    let mov = match action {
        Action::ReorderTrayTiles { player, tray } => return reorder_tray(state, *player, tray),
        Action::Pass { player } => Move::Pass { player: *player },
        Action::ExchangeTiles { player, tiles } => Move::ExchangeTiles { player: *player, tiles: tiles.clone() },
        Action::PlayWord { player, tiles } => Move::PlayWord { player: *player, tiles: as_in_tray(tray, tiles) },
    };
    let player = mov.player();
    let kind = mov.kind();

    let mut illegal_reasons = vec![];
    if !state.player_to_move.is(player) {
        illegal_reasons.push(IllegalReason::new(
            IllegalReasonCode::MoveNotInTurn,
            format!("Cannot {} when it is not your turn", kind),
        ));
    }

    let ids = mov.tile_ids();
    if !ids.iter().all(|id| tray.iter().any(|t| t.id == *id)) {
        illegal_reasons.push(IllegalReason::new(
            IllegalReasonCode::TileNotInTray,
            format!("Cannot {} with tile that is not in your tray", kind),
        ));
    }

    let scored = score_move(state, &mov);
    illegal_reasons.extend(scored.illegal_reasons.iter().cloned());

    if !illegal_reasons.is_empty() {
        log::debug!("rejected {} from player {}: {:?}", kind, player, illegal_reasons);
        return ActionResult { new_state: state.clone(), illegal_reasons };
    }

    let mut new_state = state.clone();
    let used: HashSet<TileId> = ids.into_iter().collect();
    match &mov {
        Move::Pass { .. } => {},
        Move::ExchangeTiles { .. } => {
            let returned = tray.iter().filter(|t| used.contains(&t.id)).cloned().collect::<Vec<Tile>>();
            new_state.bag.extend(returned);
            new_state.shuffle_seed = shuffle_bag(&mut new_state.bag, new_state.shuffle_seed);
            remove_from_tray(&mut new_state, player, &used);
            new_state = draw_tiles(new_state);
        },
        Move::PlayWord { .. } => {
            remove_from_tray(&mut new_state, player, &used);
            new_state = draw_tiles(new_state);
        },
    }

    if let Some(score) = new_state.scores.get_mut(player) {
        *score = score.saturating_add(scored.total_score);
    }
    log::debug!("player {} made a {} for {} points", player, kind, scored.total_score);
    new_state.moves.push(scored);

    let finishing = !matches!(mov, Move::Pass { .. })
        && new_state.tray(player).is_empty()
        && new_state.bag.is_empty();
    new_state.player_to_move = if finishing {
        log::info!("game ended after a {} from player {}, scores {:?}", kind, player, new_state.scores);
        PlayerToMove::GameEnded
    } else {
        new_state.player_to_move.advance(new_state.players.len())
    };

    ActionResult { new_state, illegal_reasons }
}

/// The tray's own tiles put where the player chose; only a blank takes the
/// letter it was sent with. Tiles not in the tray are kept as sent.
fn as_in_tray(tray: &[Tile], placed: &[PlacedTile]) -> Vec<PlacedTile> {
    placed.iter()
        .map(|p| match tray.iter().find(|t| t.id == p.id()) {
            Some(own) if own.is_blank => own.clone().with_letter(p.tile.letter).placed_at(p.x, p.y),
            Some(own) => own.clone().placed_at(p.x, p.y),
            None => p.clone(),
        })
        .collect()
}

fn remove_from_tray(state: &mut GameState, player: usize, used: &HashSet<TileId>) {
    if let Some(tray) = state.trays.get_mut(player) {
        tray.retain(|t| !used.contains(&t.id));
    }
}

/// Put the tiles of a tray in another order; does not take a turn
fn reorder_tray(state: &GameState, player: usize, order: &[Tile]) -> ActionResult<GameState> {
    let tray = state.tray(player);
    let ids = order.iter().map(|t| t.id).collect::<Vec<_>>();

    let mut illegal_reasons = duplicate_tiles(&ids);
    let own_tiles = ids.iter()
        .map(|id| tray.iter().find(|t| t.id == *id))
        .collect::<Option<Vec<_>>>();
    if own_tiles.is_none() {
        illegal_reasons.push(IllegalReason::new(
            IllegalReasonCode::TileNotInTray,
            "Cannot reorder tiles in tray with tile that is not in your tray",
        ));
    }
    if ids.len() != tray.len() {
        illegal_reasons.push(IllegalReason::new(
            IllegalReasonCode::TileReorderTrayNotComplete,
            "Cannot reorder tiles without all tiles in tray",
        ));
    }

    let mut new_state = state.clone();
    match own_tiles {
        Some(own_tiles) if illegal_reasons.is_empty() => {
            let reordered = own_tiles.into_iter().cloned().collect();
            if let Some(t) = new_state.trays.get_mut(player) {
                *t = reordered;
            }
        },
        _ => log::debug!("rejected tray reorder from player {}: {:?}", player, illegal_reasons),
    }
    ActionResult { new_state, illegal_reasons }
}
