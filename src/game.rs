
pub mod board;
pub mod score;
pub mod turn;
pub mod bag;
pub mod visibility;

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{PlacedTile, Rules, Tile, TileId};

pub use bag::{draw_tiles, new_game, shuffle_bag, start_game};
pub use board::Board;
pub use score::score_move;
pub use turn::handle_action;
pub use visibility::{game_state_visible_to_player, handle_action_as_known_to_player};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub player_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Player {
    pub fn new(player_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            name: name.into(),
            email: None,
        }
    }
}

pub const GAME_ENDED: &str = "Game Ended";

/// Whose turn it is
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PlayerToMove {
    Player(usize),
    /// Terminal: once entered, never left
    GameEnded,
}

impl PlayerToMove {
    /// The turn after a successful move, in a game of `player_count` players
    pub fn advance(self, player_count: usize) -> Self {
        match self {
            PlayerToMove::Player(p) if player_count > 0 => PlayerToMove::Player((p + 1) % player_count),
            other => other,
        }
    }

    pub fn is(self, player: usize) -> bool {
        self == PlayerToMove::Player(player)
    }

    pub fn has_ended(self) -> bool {
        self == PlayerToMove::GameEnded
    }
}

impl Serialize for PlayerToMove {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PlayerToMove::Player(p) => serializer.serialize_u64(*p as u64),
            PlayerToMove::GameEnded => serializer.serialize_str(GAME_ENDED),
        }
    }
}

impl<'de> Deserialize<'de> for PlayerToMove {
    fn deserialize<D>(deserializer: D) -> Result<PlayerToMove, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{Error, Unexpected, Visitor};

        struct PlayerToMoveVisitor;

        impl<'de> Visitor<'de> for PlayerToMoveVisitor {
            type Value = PlayerToMove;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "a player index or {:?}", GAME_ENDED)
            }

            fn visit_u64<E: Error>(self, v: u64) -> Result<PlayerToMove, E> {
                Ok(PlayerToMove::Player(v as usize))
            }

            fn visit_i64<E: Error>(self, v: i64) -> Result<PlayerToMove, E> {
                if v < 0 {
                    Err(E::invalid_value(Unexpected::Signed(v), &self))
                } else {
                    Ok(PlayerToMove::Player(v as usize))
                }
            }

            fn visit_str<E: Error>(self, v: &str) -> Result<PlayerToMove, E> {
                if v == GAME_ENDED {
                    Ok(PlayerToMove::GameEnded)
                } else {
                    Err(E::invalid_value(Unexpected::Str(v), &self))
                }
            }
        }

        deserializer.deserialize_any(PlayerToMoveVisitor)
    }
}

/// A move that takes a turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "actionType")]
pub enum Move {
    Pass {
        player: usize,
    },
    ExchangeTiles {
        player: usize,
        tiles: Vec<Tile>,
    },
    PlayWord {
        player: usize,
        tiles: Vec<PlacedTile>,
    },
}

impl Move {
    pub fn player(&self) -> usize {
        match self {
            Move::Pass { player }
            | Move::ExchangeTiles { player, .. }
            | Move::PlayWord { player, .. } => *player,
        }
    }

    /// Ids of the tiles the move takes from the tray
    pub fn tile_ids(&self) -> Vec<TileId> {
        match self {
            Move::Pass { .. } => vec![],
            Move::ExchangeTiles { tiles, .. } => tiles.iter().map(|t| t.id).collect(),
            Move::PlayWord { tiles, .. } => tiles.iter().map(PlacedTile::id).collect(),
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Move::Pass { .. } => ActionKind::Pass,
            Move::ExchangeTiles { .. } => ActionKind::ExchangeTiles,
            Move::PlayWord { .. } => ActionKind::PlayWord,
        }
    }
}

/// Everything a player can submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "actionType")]
pub enum Action {
    Pass {
        player: usize,
    },
    ExchangeTiles {
        player: usize,
        tiles: Vec<Tile>,
    },
    PlayWord {
        player: usize,
        tiles: Vec<PlacedTile>,
    },
    /// Private to the player, does not take a turn
    ReorderTrayTiles {
        player: usize,
        tray: Vec<Tile>,
    },
}

impl Action {
    pub fn player(&self) -> usize {
        match self {
            Action::Pass { player }
            | Action::ExchangeTiles { player, .. }
            | Action::PlayWord { player, .. }
            | Action::ReorderTrayTiles { player, .. } => *player,
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Pass { .. } => ActionKind::Pass,
            Action::ExchangeTiles { .. } => ActionKind::ExchangeTiles,
            Action::PlayWord { .. } => ActionKind::PlayWord,
            Action::ReorderTrayTiles { .. } => ActionKind::ReorderTrayTiles,
        }
    }
}

impl From<Move> for Action {
    fn from(mov: Move) -> Self {
        match mov {
            Move::Pass { player } => Action::Pass { player },
            Move::ExchangeTiles { player, tiles } => Action::ExchangeTiles { player, tiles },
            Move::PlayWord { player, tiles } => Action::PlayWord { player, tiles },
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Pass,
    ExchangeTiles,
    PlayWord,
    ReorderTrayTiles,
}

impl ActionKind {
    /// How the action is named to players
    pub fn title(self) -> &'static str {
        match self {
            ActionKind::Pass => "Pass",
            ActionKind::ExchangeTiles => "Exchange Tiles",
            ActionKind::PlayWord => "Play Word",
            ActionKind::ReorderTrayTiles => "Reorder Tiles in Tray",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.title().to_lowercase())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IllegalReasonCode {
    OutsideBoard,
    TilesOnSameSquare,
    DisallowedOverwrite,
    NotInStraightLine,
    NotFormingWord,
    FirstMoveNotOnCenter,
    NotConnected,
    InvalidWord,
    TileNotInTray,
    MoveNotInTurn,
    TileReorderTrayNotComplete,
    DuplicateTile,
}

/// Why an action cannot be applied, with a sentence for the player
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IllegalReason {
    pub code: IllegalReasonCode,
    pub description: String,
}

impl IllegalReason {
    pub fn new(code: IllegalReasonCode, description: impl Into<String>) -> Self {
        Self { code, description: description.into() }
    }
}

impl fmt::Display for IllegalReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoredWord {
    pub word: String,
    pub score: u32,
    pub valid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredMove {
    #[serde(rename = "move")]
    pub mov: Move,
    pub words: Vec<ScoredWord>,
    pub total_score: u32,
    pub illegal_reasons: Vec<IllegalReason>,
}

impl ScoredMove {
    pub fn is_legal(&self) -> bool {
        self.illegal_reasons.is_empty()
    }
}

/// The authoritative state of a game.
///
/// `R` is the rules the game is played with: [`Rules`] while playing,
/// [`RuleSettings`](crate::RuleSettings) once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState<R = Rules> {
    pub rules: R,
    pub players: Vec<Player>,
    pub player_to_move: PlayerToMove,
    /// Every move made so far; the board is derived from it
    pub moves: Vec<ScoredMove>,
    pub scores: Vec<u32>,
    pub trays: Vec<Vec<Tile>>,
    pub bag: Vec<Tile>,
    /// Seed of the next shuffle of the bag
    pub shuffle_seed: u64,
}

impl<R> GameState<R> {
    pub fn map_rules<S>(self, f: impl FnOnce(R) -> S) -> GameState<S> {
        GameState {
            rules: f(self.rules),
            players: self.players,
            player_to_move: self.player_to_move,
            moves: self.moves,
            scores: self.scores,
            trays: self.trays,
            bag: self.bag,
            shuffle_seed: self.shuffle_seed,
        }
    }

    pub fn tray(&self, player: usize) -> &[Tile] {
        self.trays.get(player).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of tiles put on the board over the whole game
    pub fn tiles_played(&self) -> usize {
        tiles_played(&self.moves)
    }

    /// Number of tiles in the trays, the bag and on the board, constant over a game
    pub fn tile_count(&self) -> usize {
        self.trays.iter().map(Vec::len).sum::<usize>() + self.bag.len() + self.tiles_played()
    }
}

impl GameState {
    /// The form of the state that is stored: the rules are replaced by their settings
    pub fn to_persisted(&self) -> GameState<crate::RuleSettings> {
        self.clone().map_rules(|rules| rules.settings)
    }
}

/// The state of a game as seen by a single player: the bag and the other
/// players' trays are not part of it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerVisibleGameState<R = Rules> {
    pub rules: R,
    pub players: Vec<Player>,
    pub player_to_move: PlayerToMove,
    pub moves: Vec<ScoredMove>,
    pub scores: Vec<u32>,
    pub me: usize,
    pub my_tray: Vec<Tile>,
}

impl<R> PlayerVisibleGameState<R> {
    pub fn map_rules<S>(self, f: impl FnOnce(R) -> S) -> PlayerVisibleGameState<S> {
        PlayerVisibleGameState {
            rules: f(self.rules),
            players: self.players,
            player_to_move: self.player_to_move,
            moves: self.moves,
            scores: self.scores,
            me: self.me,
            my_tray: self.my_tray,
        }
    }
}

/// What is known to everybody about a game: enough to validate and score a move
pub trait BoardKnowledge {
    fn rules(&self) -> &Rules;
    fn moves(&self) -> &[ScoredMove];

    fn has_word_been_played(&self) -> bool {
        self.moves().iter().any(|m| matches!(m.mov, Move::PlayWord { .. }))
    }
}

impl BoardKnowledge for GameState {
    fn rules(&self) -> &Rules {
        &self.rules
    }
    fn moves(&self) -> &[ScoredMove] {
        &self.moves
    }
}

impl BoardKnowledge for PlayerVisibleGameState {
    fn rules(&self) -> &Rules {
        &self.rules
    }
    fn moves(&self) -> &[ScoredMove] {
        &self.moves
    }
}

/// The outcome of submitting an action: the state to continue from, and
/// everything that was wrong with the action.
///
/// When `illegal_reasons` is not empty, `new_state` is the state the action
/// was submitted against.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult<S> {
    pub new_state: S,
    pub illegal_reasons: Vec<IllegalReason>,
}

impl<S> ActionResult<S> {
    pub fn is_legal(&self) -> bool {
        self.illegal_reasons.is_empty()
    }
}

pub fn tiles_played(moves: &[ScoredMove]) -> usize {
    moves.iter()
        .map(|m| match &m.mov {
            Move::PlayWord { tiles, .. } => tiles.len(),
            Move::Pass { .. } | Move::ExchangeTiles { .. } => 0,
        })
        .sum()
}

/// A short text saying who did what last, shown in game lists
pub fn last_move_description(players: &[Player], moves: &[ScoredMove]) -> String {
    match moves.last() {
        None => "No moves yet".to_owned(),
        Some(last) => {
            let name = players.get(last.mov.player()).map(|p| p.name.as_str()).unwrap_or("?");
            format!("{}: {}", name, last.mov.kind().title())
        },
    }
}


#[test]
fn player_to_move_wire_format() {
    assert_eq!(serde_json::to_string(&PlayerToMove::Player(1)).unwrap(), "1");
    assert_eq!(serde_json::to_string(&PlayerToMove::GameEnded).unwrap(), "\"Game Ended\"");
    assert_eq!(serde_json::from_str::<PlayerToMove>("0").unwrap(), PlayerToMove::Player(0));
    assert_eq!(serde_json::from_str::<PlayerToMove>("\"Game Ended\"").unwrap(), PlayerToMove::GameEnded);
    assert!(serde_json::from_str::<PlayerToMove>("\"Game Over\"").is_err());
    assert!(serde_json::from_str::<PlayerToMove>("-1").is_err());
}

#[test]
fn turn_advances_cyclically_until_game_end() {
    assert_eq!(PlayerToMove::Player(0).advance(2), PlayerToMove::Player(1));
    assert_eq!(PlayerToMove::Player(2).advance(3), PlayerToMove::Player(0));
    assert_eq!(PlayerToMove::GameEnded.advance(3), PlayerToMove::GameEnded);
}

#[test]
fn action_wire_format() {
    let action: Action = serde_json::from_str(r#"{
        "actionType": "PlayWord",
        "player": 1,
        "tiles": [{"id": 3, "letter": "k", "pointValue": 5, "isBlank": false, "x": 7, "y": 6}]
    }"#).unwrap();
    assert_eq!(action, Action::PlayWord {
        player: 1,
        tiles: vec![Tile::new(TileId(3), 'k', 5).placed_at(7, 6)],
    });
    match &action {
        Action::PlayWord { tiles, .. } => assert_eq!(tiles[0].tile.point_value, 5),
        _ => unreachable!(),
    }

    let reorder: Action = serde_json::from_str(r#"{"actionType": "ReorderTrayTiles", "player": 0, "tray": []}"#).unwrap();
    assert_eq!(reorder.kind(), ActionKind::ReorderTrayTiles);

    let pass = serde_json::to_value(&Action::Pass { player: 2 }).unwrap();
    assert_eq!(pass, serde_json::json!({"actionType": "Pass", "player": 2}));
}

#[test]
fn illegal_reason_wire_format() {
    let reason = IllegalReason::new(IllegalReasonCode::FirstMoveNotOnCenter, "First move must lie on center square");
    assert_eq!(
        serde_json::to_value(&reason).unwrap(),
        serde_json::json!({"code": "FIRST_MOVE_NOT_ON_CENTER", "description": "First move must lie on center square"}),
    );
}

#[test]
fn describes_last_move() {
    let players = vec![Player::new("woof", "Lucy"), Player::new("meow", "Jack")];
    assert_eq!(last_move_description(&players, &[]), "No moves yet");
    let moves = vec![ScoredMove {
        mov: Move::ExchangeTiles { player: 1, tiles: vec![] },
        words: vec![],
        total_score: 0,
        illegal_reasons: vec![],
    }];
    assert_eq!(last_move_description(&players, &moves), "Jack: Exchange Tiles");
    assert_eq!(ActionKind::ReorderTrayTiles.to_string(), "reorder tiles in tray");
}
