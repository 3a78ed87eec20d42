/// All game entity types — pure data, no logic.
///
/// Every position is the *centre* of the entity in field coordinates
/// (origin top-left, y grows downward).  Bounding boxes are derived in
/// `compute` by expanding half the width/height in each direction.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Intro,
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Cosmetic label of a falling fruit.  Has no effect on gameplay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FruitKind {
    Apple,
    Strawberry,
    Orange,
    Grapes,
    Banana,
    Cherries,
    Peach,
}

impl FruitKind {
    pub const ALL: [FruitKind; 7] = [
        FruitKind::Apple,
        FruitKind::Strawberry,
        FruitKind::Orange,
        FruitKind::Grapes,
        FruitKind::Banana,
        FruitKind::Cherries,
        FruitKind::Peach,
    ];
}

// ── Geometry ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

// ── Player & fruit ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Fruit {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Downward distance travelled per tick, in [4.0, 9.0) by default.
    pub speed: f32,
    pub kind: FruitKind,
}

// ── Session bookkeeping ───────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub score: u32,
    pub lives: u32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The whole simulation.  `fruits` is a fixed pool of slots allocated once;
/// slots are reset in place and never pushed or removed.
#[derive(Clone, Debug)]
pub struct GameState {
    pub field: Field,
    pub player: Player,
    pub fruits: Vec<Fruit>,
    pub session: Session,
    pub status: GameStatus,
    /// Closing message picked when the run ends.
    pub punchline: Option<&'static str>,
    /// Ticks elapsed in the current run.
    pub frame: u64,
}
