
use std::collections::HashSet;

use crate::{IdAllocator, Tile, TileId};
use super::{handle_action, Action, ActionResult, GameState, Move, PlayerVisibleGameState};

/// What `player` is allowed to know about `state`
pub fn game_state_visible_to_player<R: Clone>(state: &GameState<R>, player: usize) -> PlayerVisibleGameState<R> {
    PlayerVisibleGameState {
        rules: state.rules.clone(),
        players: state.players.clone(),
        player_to_move: state.player_to_move,
        moves: state.moves.clone(),
        scores: state.scores.clone(),
        me: player,
        my_tray: state.tray(player).to_vec(),
    }
}

/// Predict the outcome of `action` from what a player knows.
///
/// The unknown trays are empty and the bag is made of phantom tiles, so the
/// reasons, words and scores are the ones the authoritative state would give.
/// The predicted tray only keeps real tiles: the ones drawn are unknown until
/// the authoritative state comes back.
pub fn handle_action_as_known_to_player(
    view: &PlayerVisibleGameState,
    action: &Action,
) -> ActionResult<PlayerVisibleGameState> {
    let mut ids = known_ids(view)
        .max()
        .map_or_else(IdAllocator::new, IdAllocator::after);
    let phantom_count = view.players.len() * view.rules.tray_size() + 1;
    let bag = (0..phantom_count).map(|_| Tile::phantom(ids.next_id())).collect();

    let trays = (0..view.players.len())
        .map(|p| if p == view.me { view.my_tray.clone() } else { vec![] })
        .collect();

    let synthetic = GameState {
        rules: view.rules.clone(),
        players: view.players.clone(),
        player_to_move: view.player_to_move,
        moves: view.moves.clone(),
        scores: view.scores.clone(),
        trays,
        bag,
        shuffle_seed: 0,
    };

    let result = handle_action(&synthetic, action);
    let given_away: HashSet<TileId> = match action {
        Action::ExchangeTiles { tiles, .. } if result.is_legal() => tiles.iter().map(|t| t.id).collect(),
        _ => HashSet::new(),
    };

    let mut new_state = game_state_visible_to_player(&result.new_state, view.me);
    new_state.my_tray.retain(|t| !t.is_phantom && !given_away.contains(&t.id));
    ActionResult {
        new_state,
        illegal_reasons: result.illegal_reasons,
    }
}

fn known_ids(view: &PlayerVisibleGameState) -> impl Iterator<Item=TileId> + '_ {
    let tray = view.my_tray.iter().map(|t| t.id);
    let played = view.moves.iter().flat_map(|m| match &m.mov {
        Move::Pass { .. } => vec![],
        Move::ExchangeTiles { tiles, .. } => tiles.iter().map(|t| t.id).collect(),
        Move::PlayWord { tiles, .. } => tiles.iter().map(|t| t.id()).collect(),
    });
    tray.chain(played)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use crate::{Direction, IllegalReasonCode, PlayerToMove};

    #[test]
    fn hides_the_bag_and_the_other_trays() {
        let gs = basic_starting_state();
        let view = game_state_visible_to_player(&gs, 1);
        assert_eq!(view.me, 1);
        assert_eq!(view.my_tray, gs.trays[1]);
        assert_eq!(view.players, gs.players);

        let json = serde_json::to_value(&view.clone().map_rules(|r| r.settings)).unwrap();
        assert!(json.get("bag").is_none());
        assert!(json.get("trays").is_none());
        assert!(json.get("shuffleSeed").is_none());
        assert_eq!(json["myTray"].as_array().map(Vec::len), Some(7));
    }

    #[test]
    fn predicts_the_same_score_as_the_real_state() {
        let gs = basic_starting_state();
        let action = Action::PlayWord {
            player: 0,
            tiles: tiles_from_tray("pups", (7, 7), Direction::Horizontal, &gs.trays[0]),
        };

        let real = handle_action(&gs, &action);
        let predicted = handle_action_as_known_to_player(&game_state_visible_to_player(&gs, 0), &action);

        assert_eq!(predicted.illegal_reasons, vec![]);
        assert_eq!(predicted.new_state.moves, real.new_state.moves);
        assert_eq!(predicted.new_state.scores, real.new_state.scores);
        assert_eq!(predicted.new_state.player_to_move, real.new_state.player_to_move);
        assert_eq!(letters_in_tray(&predicted.new_state.my_tray), "ple");
    }

    #[test]
    fn predicts_the_same_rejection_as_the_real_state() {
        let gs = basic_starting_state();
        let gs = handle_legal_action(&gs, Action::PlayWord {
            player: 0,
            tiles: tiles_from_tray("pup", (7, 7), Direction::Horizontal, &gs.trays[0]),
        });
        let action = Action::PlayWord {
            player: 1,
            tiles: tiles_from_tray("kits", (11, 4), Direction::Vertical, &gs.trays[1]),
        };

        let view = game_state_visible_to_player(&gs, 1);
        let predicted = handle_action_as_known_to_player(&view, &action);
        assert_eq!(predicted.illegal_reasons, handle_action(&gs, &action).illegal_reasons);
        assert_eq!(predicted.illegal_reasons[0].code, IllegalReasonCode::NotConnected);
        assert_eq!(predicted.new_state, view);
    }

    #[test]
    fn cannot_play_tiles_of_another_player() {
        let gs = basic_starting_state();
        let view = game_state_visible_to_player(&gs, 0);
        let action = Action::PlayWord {
            player: 0,
            tiles: tiles_from_tray("kit", (7, 7), Direction::Horizontal, &gs.trays[1]),
        };
        let predicted = handle_action_as_known_to_player(&view, &action);
        assert_eq!(
            predicted.illegal_reasons.iter().map(|r| r.code).collect::<Vec<_>>(),
            vec![IllegalReasonCode::TileNotInTray],
        );
    }

    #[test]
    fn exchanged_tiles_leave_the_predicted_tray() {
        let gs = basic_starting_state();
        let view = game_state_visible_to_player(&gs, 0);
        let given = gs.trays[0][..6].to_vec();
        let predicted = handle_action_as_known_to_player(&view, &Action::ExchangeTiles { player: 0, tiles: given });

        assert_eq!(predicted.illegal_reasons, vec![]);
        assert_eq!(letters_in_tray(&predicted.new_state.my_tray), "s");
        assert_eq!(predicted.new_state.player_to_move, PlayerToMove::Player(1));
    }

    #[test]
    fn predicting_never_ends_the_game() {
        let mut gs = basic_starting_state();
        gs.bag.clear();
        gs.trays[0].truncate(3);
        let view = game_state_visible_to_player(&gs, 0);
        let action = Action::PlayWord {
            player: 0,
            tiles: tiles_from_tray("pup", (7, 7), Direction::Horizontal, &view.my_tray),
        };

        assert_eq!(handle_action(&gs, &action).new_state.player_to_move, PlayerToMove::GameEnded);
        let predicted = handle_action_as_known_to_player(&view, &action);
        assert_eq!(predicted.new_state.player_to_move, PlayerToMove::Player(1));
        assert!(predicted.new_state.my_tray.is_empty());
    }

    #[test]
    fn reorders_the_predicted_tray() {
        let gs = basic_starting_state();
        let view = game_state_visible_to_player(&gs, 1);
        let mut tray = view.my_tray.clone();
        tray.rotate_left(1);

        let predicted = handle_action_as_known_to_player(&view, &Action::ReorderTrayTiles { player: 1, tray });
        assert_eq!(letters_in_tray(&predicted.new_state.my_tray), "ittehsk");
        assert_eq!(predicted.new_state.player_to_move, PlayerToMove::Player(0));
    }
}
