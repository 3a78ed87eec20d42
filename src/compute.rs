/// Game-logic functions.
///
/// Everything here operates on plain `entities` data.  The only side
/// effects are mutations of the state passed in and draws from the injected
/// RNG, so a seeded RNG makes every function deterministic.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::config::{GameConfig, SpeedRange};
use crate::entities::{
    BoundingBox, Direction, Field, Fruit, FruitKind, GameState, GameStatus, Player, Session,
};

pub const PUNCHLINES: [&str; 5] = [
    "Looks like you couldn't 'ketchup'!",
    "That was the 'apple' of my eye!",
    "You're 'berry' bad at this!",
    "'Orange' you glad you tried?",
    "That slip-up was 'bananas'!",
];

/// What happened during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub caught: u32,
    pub missed: u32,
    /// Lives hit zero during this tick; the run is over.
    pub lives_exhausted: bool,
}

// ── Collision ────────────────────────────────────────────────────────────────

fn centred_box(x: f32, y: f32, width: f32, height: f32) -> BoundingBox {
    BoundingBox {
        left: x - width / 2.0,
        top: y - height / 2.0,
        right: x + width / 2.0,
        bottom: y + height / 2.0,
    }
}

pub fn player_box(player: &Player) -> BoundingBox {
    centred_box(player.x, player.y, player.width, player.height)
}

pub fn fruit_box(fruit: &Fruit) -> BoundingBox {
    centred_box(fruit.x, fruit.y, fruit.width, fruit.height)
}

/// Strict AABB overlap: boxes that only share an edge do not collide.
pub fn overlaps(a: &BoundingBox, b: &BoundingBox) -> bool {
    a.left < b.right && a.right > b.left && a.top < b.bottom && a.bottom > b.top
}

// ── Spawning ─────────────────────────────────────────────────────────────────

/// `[lo, hi]`, collapsing to `lo` when the range is empty or not finite.
fn uniform_inclusive(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if lo.is_finite() && hi.is_finite() && hi > lo {
        rng.gen_range(lo..=hi)
    } else {
        lo
    }
}

/// `[lo, hi)`, collapsing to `lo` when the range is empty or not finite.
fn uniform(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if lo.is_finite() && hi.is_finite() && hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

/// Respawn `fruit` above the visible area with a fresh speed and label.
///
/// Horizontal position keeps the whole sprite on-screen; the vertical
/// offset is randomised so the pool does not fall in lockstep.
pub fn reset_fruit(fruit: &mut Fruit, field: &Field, speed: &SpeedRange, rng: &mut impl Rng) {
    let half_w = fruit.width / 2.0;
    let half_h = fruit.height / 2.0;

    fruit.speed = uniform(rng, speed.min, speed.max);
    fruit.x = uniform_inclusive(rng, half_w, field.width - half_w);
    fruit.y = -uniform_inclusive(rng, half_h, field.height / 2.0);
    fruit.kind = FruitKind::ALL[rng.gen_range(0..FruitKind::ALL.len())];

    debug!(x = fruit.x, y = fruit.y, speed = fruit.speed, "fruit respawned");
}

pub fn pick_punchline(rng: &mut impl Rng) -> &'static str {
    PUNCHLINES.choose(rng).copied().unwrap_or(PUNCHLINES[0])
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Basket centred horizontally, resting on the bottom edge.
pub fn initial_player(config: &GameConfig) -> Player {
    Player {
        x: config.field_width / 2.0,
        y: config.field_height - config.player_size / 2.0,
        width: config.player_size,
        height: config.player_size,
    }
}

/// A parked fruit slot.  It sits above the field until the first reset.
fn parked_fruit(config: &GameConfig) -> Fruit {
    Fruit {
        x: config.field_width / 2.0,
        y: -config.fruit_size,
        width: config.fruit_size,
        height: config.fruit_size,
        speed: config.fall_speed.min,
        kind: FruitKind::Apple,
    }
}

/// Build the process-lifetime state in `Intro`.  The fruit pool is
/// allocated here and only ever reset afterwards.
pub fn init_state(config: &GameConfig) -> GameState {
    GameState {
        field: config.field(),
        player: initial_player(config),
        fruits: (0..config.pool_size).map(|_| parked_fruit(config)).collect(),
        session: Session {
            score: 0,
            lives: config.starting_lives,
        },
        status: GameStatus::Intro,
        punchline: None,
        frame: 0,
    }
}

/// A run is live exactly while the state machine is in `Playing`.
pub fn is_running(state: &GameState) -> bool {
    state.status == GameStatus::Playing
}

/// Full reset for a new run: score, lives, player and every fruit slot.
pub fn reset_run(state: &mut GameState, config: &GameConfig, rng: &mut impl Rng) {
    state.session = Session {
        score: 0,
        lives: config.starting_lives,
    };
    state.player = initial_player(config);
    let field = state.field;
    for fruit in state.fruits.iter_mut() {
        reset_fruit(fruit, &field, &config.fall_speed, rng);
    }
    state.status = GameStatus::Playing;
    state.punchline = None;
    state.frame = 0;
}

// ── Input-driven movement ────────────────────────────────────────────────────

/// Move the basket one fixed step.  The basket may rise to mid-field but
/// never leaves the lower half, and is clamped inside the side walls.
pub fn move_player(player: &mut Player, direction: Direction, field: &Field, step: f32) {
    let (dx, dy) = match direction {
        Direction::Left => (-step, 0.0),
        Direction::Right => (step, 0.0),
        Direction::Up => (0.0, -step),
        Direction::Down => (0.0, step),
    };
    let min_x = player.width / 2.0;
    let max_x = field.width - player.width / 2.0;
    let min_y = field.height / 2.0;
    let max_y = field.height - player.height / 2.0;

    player.x = (player.x + dx).max(min_x).min(max_x);
    player.y = (player.y + dy).max(min_y).min(max_y);
}

// ── Per-tick update ──────────────────────────────────────────────────────────

/// Advance the simulation by one tick.
///
/// Fruits fall first, then each is tested against the basket.  A catch is
/// checked before a miss, so a fruit that is both past the bottom edge and
/// touching the basket counts as caught.  When the last life goes the
/// remaining slots are left untouched and the run ends.
pub fn tick(state: &mut GameState, config: &GameConfig, rng: &mut impl Rng) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    if state.status != GameStatus::Playing {
        return outcome;
    }
    state.frame += 1;

    // ── 1. Fall ──────────────────────────────────────────────────────────────
    for fruit in state.fruits.iter_mut() {
        fruit.y += fruit.speed;
    }

    // ── 2. Basket box, once per tick ────────────────────────────────────────
    let basket = player_box(&state.player);
    let field = state.field;

    // ── 3. Catch / miss per slot ────────────────────────────────────────────
    for fruit in state.fruits.iter_mut() {
        if overlaps(&fruit_box(fruit), &basket) {
            state.session.score = state.session.score.saturating_add(1);
            outcome.caught += 1;
            reset_fruit(fruit, &field, &config.fall_speed, rng);
        } else if fruit.y > field.height {
            state.session.lives = state.session.lives.saturating_sub(1);
            outcome.missed += 1;
            debug!(lives = state.session.lives, "fruit missed");
            reset_fruit(fruit, &field, &config.fall_speed, rng);
            if state.session.lives == 0 {
                outcome.lives_exhausted = true;
                break;
            }
        }
    }

    // ── 4. Status ────────────────────────────────────────────────────────────
    if outcome.lives_exhausted {
        state.status = GameStatus::GameOver;
    }

    outcome
}
