
pub mod score_rules;
pub mod dictionary;
pub mod game;
pub mod registry;
pub mod host;

#[cfg(test)]
pub(crate) mod test_utils;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use score_rules::{BoardBonus, CellBonus, LetterScoring, RuleSettings, Rules};
pub use dictionary::WordSet;
pub use game::{
    Action,
    ActionResult,
    BoardKnowledge,
    GameState,
    IllegalReason,
    IllegalReasonCode,
    Move,
    Player,
    PlayerToMove,
    PlayerVisibleGameState,
    ScoredMove,
    ScoredWord,
};

/// Unique identity of a tile for the whole life of a game
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
impl fmt::Debug for TileId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Hands out tile ids in increasing order.
///
/// The allocator is an explicit value: whoever builds a tile set owns one and
/// threads it through, so two tile sets built from the same allocator never
/// share an id.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// An allocator whose ids are all greater than `id`
    pub fn after(id: TileId) -> Self {
        Self { next: id.0.saturating_add(1) }
    }

    pub fn next_id(&mut self) -> TileId {
        let id = TileId(self.next);
        self.next += 1;
        id
    }
}

/// The letter carried by a blank tile until the player chooses one
pub const BLANK_LETTER: char = ' ';

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub id: TileId,
    pub letter: char,
    pub point_value: u32,
    #[serde(default)]
    pub is_blank: bool,
    /// Placeholder standing for a tile a player cannot know about
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_phantom: bool,
}

impl Tile {
    pub fn new(id: TileId, letter: char, point_value: u32) -> Self {
        Self {
            id,
            letter,
            point_value,
            is_blank: false,
            is_phantom: false,
        }
    }

    pub fn blank(id: TileId) -> Self {
        Self {
            id,
            letter: BLANK_LETTER,
            point_value: 0,
            is_blank: true,
            is_phantom: false,
        }
    }

    pub fn phantom(id: TileId) -> Self {
        Self {
            id,
            letter: '?',
            point_value: 0,
            is_blank: true,
            is_phantom: true,
        }
    }

    /// The same tile showing `letter`, as done for a blank before it is played
    pub fn with_letter(mut self, letter: char) -> Self {
        self.letter = letter;
        self
    }

    pub fn placed_at(self, x: i32, y: i32) -> PlacedTile {
        PlacedTile { tile: self, x, y }
    }

    /// The letter in upper case, the way it is shown to players
    pub fn display_letter(&self) -> String {
        self.letter.to_uppercase().collect()
    }
}

// tiles are identified by their id only: a blank keeps its identity whatever letter it shows
impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Tile {}

impl std::hash::Hash for Tile {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedTile {
    #[serde(flatten)]
    pub tile: Tile,
    pub x: i32,
    pub y: i32,
}

impl PlacedTile {
    pub fn position(&self) -> Position {
        Position { x: self.x, y: self.y }
    }

    pub fn id(&self) -> TileId {
        self.tile.id
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Vertical,
    Horizontal,
}

impl Direction {
    pub const BOTH: [Direction; 2] = [Direction::Vertical, Direction::Horizontal];

    pub fn perp(self) -> Self {
        match self {
            Self::Vertical => Self::Horizontal,
            Self::Horizontal => Self::Vertical,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn next(mut self, dir: Direction) -> Self {
        self[dir] = self[dir].saturating_add(1);
        self
    }

    pub fn back(mut self, dir: Direction) -> Self {
        self[dir] = self[dir].saturating_sub(1);
        self
    }

    /// The four orthogonal neighbours
    pub fn neighbours(self) -> [Position; 4] {
        [
            self.back(Direction::Vertical),
            self.next(Direction::Vertical),
            self.back(Direction::Horizontal),
            self.next(Direction::Horizontal),
        ]
    }
}

impl std::ops::Index<Direction> for Position {
    type Output = i32;
    /// The coordinate that changes in that direction
    fn index(&self, dir: Direction) -> &Self::Output {
        match dir {
            Direction::Vertical => &self.y,
            Direction::Horizontal => &self.x,
        }
    }
}

impl std::ops::IndexMut<Direction> for Position {
    /// The coordinate that changes in that direction
    fn index_mut(&mut self, dir: Direction) -> &mut Self::Output {
        match dir {
            Direction::Vertical => &mut self.y,
            Direction::Horizontal => &mut self.x,
        }
    }
}

/// A run of squares starting at `start` and going `len` squares in `dir`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Line {
    pub start: Position,
    pub dir: Direction,
    /// Wider than a coordinate: a line can span every `i32`
    pub len: i64,
}

impl Line {
    pub fn positions(self) -> impl Iterator<Item=Position> {
        let Line { start, dir, len } = self;
        (0..len).map(move |i| {
            let mut pos = start;
            pos[dir] = (i64::from(start[dir]) + i).min(i64::from(i32::MAX)) as i32;
            pos
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// No position, or every position on the same square
    Point,
    /// Spans from the smallest to the largest position on one row or column
    Line(Line),
}

impl Alignment {
    /// Tries to find the line formed by the given `positions`
    ///
    /// None if `positions` contains at least 2 positions that are not on the same row/column
    pub fn find(positions: impl IntoIterator<Item=Position>) -> Option<Alignment> {
        let mut iter = positions.into_iter();
        let first = match iter.next() {
            Some(first) => first,
            None => return Some(Alignment::Point),
        };
        let second = loop {
            let tmp = iter.next();
            if tmp != Some(first) {
                break tmp
            }
        };
        let second = if let Some(s) = second { s } else { return Some(Alignment::Point) };
        let dir = if second.y == first.y {
            Direction::Horizontal
        } else if second.x == first.x {
            Direction::Vertical
        } else {
            return None
        };
        let mut start = first[dir].min(second[dir]);
        let mut end = first[dir].max(second[dir]);

        for new in iter {
            if new[dir.perp()] != first[dir.perp()] {
                return None
            }
            start = start.min(new[dir]);
            end = end.max(new[dir]);
        }
        let mut start_pos = first;
        start_pos[dir] = start;
        Some(Alignment::Line(Line { start: start_pos, dir, len: i64::from(end) - i64::from(start) + 1 }))
    }
}

/// A `width × height` grid of squares
#[derive(Debug, Clone, PartialEq)]
pub struct Table<T> {
    squares: Vec<Vec<T>>,
}

impl<T> Table<T> {
    pub fn fill_with(width: usize, height: usize, el: T) -> Self where T: Clone {
        Self {
            squares: vec![vec![el; width]; height],
        }
    }

    pub fn get(&self, pos: Position) -> Option<&T> {
        if pos.x < 0 || pos.y < 0 {
            return None
        }
        self.squares.get(pos.y as usize)?.get(pos.x as usize)
    }
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut T> {
        if pos.x < 0 || pos.y < 0 {
            return None
        }
        self.squares.get_mut(pos.y as usize)?.get_mut(pos.x as usize)
    }
}


#[test]
fn test_alignement() {
    let p1 = Position { x: 4, y: 3 };
    let p2 = Position { x: 4, y: 4 };
    let p3 = Position { x: 4, y: 8 };
    let p4 = Position { x: 6, y: 3 };

    assert_eq!(
        Alignment::find(vec![]),
        Some(Alignment::Point),
    );

    assert_eq!(
        Alignment::find(vec![p1]),
        Some(Alignment::Point),
    );

    assert_eq!(
        Alignment::find(vec![p1, p1]),
        Some(Alignment::Point),
    );

    assert_eq!(
        Alignment::find(vec![p1, p2]),
        Some(Alignment::Line(Line { start: p1, dir: Direction::Vertical, len: 2 })),
    );

    assert_eq!(
        Alignment::find(vec![p2, p1, p3]),
        Some(Alignment::Line(Line { start: p1, dir: Direction::Vertical, len: 6 })),
    );

    assert_eq!(
        Alignment::find(vec![p3, p2]),
        Some(Alignment::Line(Line { start: p2, dir: Direction::Vertical, len: 5 })),
    );

    assert_eq!(
        Alignment::find(vec![p1, p4]),
        Some(Alignment::Line(Line { start: p1, dir: Direction::Horizontal, len: 3 })),
    );

    assert_eq!(
        Alignment::find(vec![p2, p4]),
        None,
    );

    assert_eq!(
        Alignment::find(vec![p1, p2, p4]),
        None,
    );
}

#[test]
fn alignment_spans_the_whole_coordinate_range() {
    let line = Alignment::find(vec![Position::new(i32::MIN, 7), Position::new(i32::MAX, 7)]);
    assert_eq!(
        line,
        Some(Alignment::Line(Line { start: Position::new(i32::MIN, 7), dir: Direction::Horizontal, len: 1 << 32 })),
    );
    if let Some(Alignment::Line(line)) = line {
        assert_eq!(line.positions().nth(1), Some(Position::new(i32::MIN + 1, 7)));
    }
}

#[test]
fn line_positions() {
    let line = Line { start: Position::new(-1, 7), dir: Direction::Horizontal, len: 3 };
    assert_eq!(
        line.positions().collect::<Vec<_>>(),
        vec![Position::new(-1, 7), Position::new(0, 7), Position::new(1, 7)],
    );
}

#[test]
fn table_rejects_negative_and_far_positions() {
    let table = Table::fill_with(3, 2, 0u8);
    assert_eq!(table.get(Position::new(2, 1)), Some(&0));
    assert_eq!(table.get(Position::new(3, 1)), None);
    assert_eq!(table.get(Position::new(0, 2)), None);
    assert_eq!(table.get(Position::new(-1, 0)), None);
}

#[test]
fn tiles_compare_by_id() {
    let blank = Tile::blank(TileId(4));
    assert_eq!(blank.clone().with_letter('q'), blank);
    assert_ne!(Tile::new(TileId(1), 'a', 1), Tile::new(TileId(2), 'a', 1));

    let mut ids = IdAllocator::after(TileId(9));
    assert_eq!(ids.next_id(), TileId(10));
    assert_eq!(ids.next_id(), TileId(11));
}
