
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Position, WordSet, BLANK_LETTER};

/// A multiplier attached to a square of the board
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "bonusType", content = "multiplier", rename_all = "camelCase")]
pub enum CellBonus {
    /// Multiplies the value of the tile placed on the square
    Letter(u32),
    /// Multiplies the value of every word going through the square
    Word(u32),
}

pub trait BoardBonus: Send + Sync {
    fn bonus_at(&self, position: Position) -> Option<CellBonus>;
}

pub trait LetterScoring: Sync {
    fn score_for(&self, letter: char) -> u32;
}

pub struct NoBonus;
impl BoardBonus for NoBonus {
    fn bonus_at(&self, _position: Position) -> Option<CellBonus> {
        None
    }
}

/// Bonuses listed square by square
#[derive(Debug, Clone, Default)]
pub struct BonusMap(pub HashMap<Position, CellBonus>);

impl BonusMap {
    pub fn with(mut self, x: i32, y: i32, bonus: CellBonus) -> Self {
        self.0.insert(Position { x, y }, bonus);
        self
    }
}

impl BoardBonus for BonusMap {
    fn bonus_at(&self, position: Position) -> Option<CellBonus> {
        self.0.get(&position).copied()
    }
}

pub const CLASSIC_BOARD_SIZE: i32 = 15;

/// The usual 15×15 layout of bonus squares
pub struct ClassicBonus;
impl BoardBonus for ClassicBonus {
    fn bonus_at(&self, position: Position) -> Option<CellBonus> {
        let Position { x, y } = position;

        if x < 0 || y < 0 || x >= CLASSIC_BOARD_SIZE || y >= CLASSIC_BOARD_SIZE {
            log::error!("index for bonus is out of board: {:?}", position);
            return None;
        }

        fn fold_half(a: i32) -> i32 {
            (a - CLASSIC_BOARD_SIZE / 2).abs()
        }

        // use the fact the bonus are symetrical from center
        let x = fold_half(x);
        let y = fold_half(y);

        match (x, y) {
            | (7, 0) | (0, 7)
            | (7, 7) => Some(CellBonus::Word(3)),

            | (1, 1)
            | (4, 0) | (0, 4)
            | (5, 1) | (1, 5)
            | (7, 4) | (4, 7) => Some(CellBonus::Letter(2)),

            | (2, 2)
            | (6, 2) | (2, 6) => Some(CellBonus::Letter(3)),

            (x, y) if x == y => Some(CellBonus::Word(2)),

            _ => None,
        }
    }
}

pub struct EnglishScrabbleScoring;
impl LetterScoring for EnglishScrabbleScoring {
    fn score_for(&self, letter: char) -> u32 {
        match letter.to_ascii_lowercase() {
            BLANK_LETTER => 0,
            'a' | 'e' | 'i' | 'l' | 'n' | 'o' | 'r' | 's' | 't' | 'u' => 1,
            'd' | 'g' => 2,
            'b' | 'c' | 'm' | 'p' => 3,
            'f' | 'h' | 'v' | 'w' | 'y' => 4,
            'k' => 5,
            'j' | 'x' => 8,
            'q' | 'z' => 10,
            l => {
                log::warn!("unrecognized letter for score {:?}", l);
                0
            },
        }
    }
}

/// The plain-data part of the rules of a game.
///
/// This is what gets stored with a game: the bonus layout and the word list
/// are not stored, only the names they are resolved from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleSettings {
    /// The rules provider these settings belong to
    pub name: String,
    /// The word list the game is played with
    pub word_set_name: String,
    pub width: i32,
    pub height: i32,
    pub tray_size: usize,
    /// Extra points for a move using at least `tray_size` tiles
    pub bingo_bonus: u32,
    pub accept_invalid_words: bool,
    pub allow_overwrite: bool,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            word_set_name: String::new(),
            width: CLASSIC_BOARD_SIZE,
            height: CLASSIC_BOARD_SIZE,
            tray_size: 7,
            bingo_bonus: 50,
            accept_invalid_words: false,
            allow_overwrite: false,
        }
    }
}

/// A set of rules that controls the allowed moves and the score, fixed for
/// the whole game
#[derive(Clone)]
pub struct Rules {
    pub settings: RuleSettings,
    pub bonuses: Arc<dyn BoardBonus>,
    pub words: Arc<dyn WordSet>,
}

impl Rules {
    pub fn new(settings: RuleSettings, bonuses: Arc<dyn BoardBonus>, words: Arc<dyn WordSet>) -> Self {
        Self { settings, bonuses, words }
    }

    pub fn width(&self) -> i32 {
        self.settings.width
    }
    pub fn height(&self) -> i32 {
        self.settings.height
    }
    pub fn tray_size(&self) -> usize {
        self.settings.tray_size
    }

    pub fn on_board(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width() && pos.y < self.height()
    }

    /// The square the first word has to cover
    pub fn center(&self) -> Position {
        Position { x: self.width() / 2, y: self.height() / 2 }
    }

    pub fn cell_bonus(&self, pos: Position) -> Option<CellBonus> {
        if self.on_board(pos) {
            self.bonuses.bonus_at(pos)
        } else {
            None
        }
    }

    pub fn is_valid_word(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}

// the bonus layout and the word list are opaque, only the settings are compared
impl PartialEq for Rules {
    fn eq(&self, other: &Self) -> bool {
        self.settings == other.settings
    }
}

impl fmt::Debug for Rules {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Rules").field("settings", &self.settings).finish()
    }
}


#[test]
fn classic_bonus_layout() {
    let b = ClassicBonus;
    let at = |x, y| b.bonus_at(Position { x, y });

    for &(x, y) in &[(0, 0), (7, 0), (14, 0), (0, 7), (14, 7), (0, 14), (7, 14), (14, 14)] {
        assert_eq!(at(x, y), Some(CellBonus::Word(3)), "({}, {})", x, y);
    }
    for &(x, y) in &[(5, 1), (9, 1), (1, 5), (5, 5), (9, 5), (13, 5), (1, 9), (5, 9), (9, 9), (13, 9), (5, 13), (9, 13)] {
        assert_eq!(at(x, y), Some(CellBonus::Letter(3)), "({}, {})", x, y);
    }
    for n in 1..=4 {
        for &(x, y) in &[(n, n), (14 - n, n), (n, 14 - n), (14 - n, 14 - n)] {
            assert_eq!(at(x, y), Some(CellBonus::Word(2)), "({}, {})", x, y);
        }
    }
    assert_eq!(at(7, 7), Some(CellBonus::Word(2)));
    let double_letters = [
        (3, 0), (11, 0), (0, 3), (6, 2), (7, 3), (8, 2), (14, 3), (2, 6),
        (3, 7), (2, 8), (12, 6), (11, 7), (12, 8), (6, 6), (8, 6), (6, 8),
        (8, 8), (0, 11), (6, 12), (7, 11), (8, 12), (14, 11), (3, 14), (11, 14),
    ];
    for &(x, y) in double_letters.iter() {
        assert_eq!(at(x, y), Some(CellBonus::Letter(2)), "({}, {})", x, y);
    }

    let bonus_count = (0..15).flat_map(|x| (0..15).map(move |y| (x, y)))
        .filter(|&(x, y)| at(x, y).is_some())
        .count();
    // 8 triple words, 17 double words, 12 triple letters, 24 double letters
    assert_eq!(bonus_count, 61);
    assert_eq!(at(15, 3), None);
}

#[test]
fn english_letter_scores() {
    let s = EnglishScrabbleScoring;
    assert_eq!(s.score_for('e'), 1);
    assert_eq!(s.score_for('P'), 3);
    assert_eq!(s.score_for('k'), 5);
    assert_eq!(s.score_for('z'), 10);
    assert_eq!(s.score_for(BLANK_LETTER), 0);
}

#[test]
fn settings_missing_fields_take_classic_defaults() {
    let settings: RuleSettings = serde_json::from_str(r#"{"name": "Original", "acceptInvalidWords": true}"#).unwrap();
    assert_eq!(settings, RuleSettings {
        name: "Original".to_owned(),
        accept_invalid_words: true,
        ..RuleSettings::default()
    });
}
