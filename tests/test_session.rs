use std::time::{Duration, Instant};

use fruit_frenzy::compute::{initial_player, PUNCHLINES};
use fruit_frenzy::config::GameConfig;
use fruit_frenzy::entities::*;
use fruit_frenzy::score::MemoryStore;
use fruit_frenzy::session::{Command, Game, Scheduler};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn new_game(store: MemoryStore) -> Game<MemoryStore> {
    Game::new(GameConfig::default(), store)
}

/// Start a run and park every fruit out of harm's way.
fn started(store: MemoryStore, now: Instant, rng: &mut StdRng) -> Game<MemoryStore> {
    let mut game = new_game(store);
    game.handle(Command::Start, now, rng);
    for fruit in game.state_mut().fruits.iter_mut() {
        fruit.x = 30.0;
        fruit.y = -300.0;
        fruit.speed = 4.0;
    }
    game
}

/// Put slot `index` just above the bottom edge, away from the basket.
fn stage_miss(game: &mut Game<MemoryStore>, index: usize) {
    let fruit = &mut game.state_mut().fruits[index];
    fruit.x = 100.0;
    fruit.y = 599.0;
    fruit.speed = 5.0;
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[test]
fn scheduler_fires_once_per_arm() {
    let now = Instant::now();
    let mut s = Scheduler::new(Duration::from_millis(30));
    assert!(!s.is_armed());
    assert!(s.arm(now));
    assert!(!s.due(now));
    assert!(s.due(now + Duration::from_millis(30)));
    assert_eq!(s.time_until_due(now), Some(Duration::from_millis(30)));
    s.stop();
    assert!(!s.is_armed());
    assert!(!s.due(now + Duration::from_secs(1)));
}

#[test]
fn closed_scheduler_never_rearms() {
    let now = Instant::now();
    let mut s = Scheduler::new(Duration::from_millis(30));
    s.arm(now);
    s.close();
    assert!(s.is_closed());
    assert!(!s.is_armed());
    assert!(!s.arm(now));
    assert_eq!(s.time_until_due(now), None);
}

// ── Intro ─────────────────────────────────────────────────────────────────────

#[test]
fn intro_shows_no_entities_and_does_not_tick() {
    let now = Instant::now();
    let mut rng = seeded_rng();
    let mut game = new_game(MemoryStore::default());

    assert_eq!(game.status(), GameStatus::Intro);
    let snap = game.snapshot();
    assert!(snap.player.is_none());
    assert!(snap.fruits.is_empty());
    assert!(snap.music_playing);

    let before = game.state().fruits.clone();
    game.tick(now, &mut rng);
    assert_eq!(game.state().fruits, before);
}

#[test]
fn intro_ignores_moves_and_restart() {
    let now = Instant::now();
    let mut rng = seeded_rng();
    let mut game = new_game(MemoryStore::default());
    game.handle(Command::Move(Direction::Left), now, &mut rng);
    game.handle(Command::Restart, now, &mut rng);
    assert_eq!(game.status(), GameStatus::Intro);
    assert_eq!(game.state().player.x, 400.0);
    assert!(!game.scheduler().is_armed());
}

// ── Playing ───────────────────────────────────────────────────────────────────

#[test]
fn start_enters_playing_and_arms_the_tick() {
    let now = Instant::now();
    let mut rng = seeded_rng();
    let mut game = new_game(MemoryStore::default());
    game.handle(Command::Start, now, &mut rng);

    assert_eq!(game.status(), GameStatus::Playing);
    assert!(game.scheduler().due(now + Duration::from_millis(30)));
    let snap = game.snapshot();
    assert!(snap.player.is_some());
    assert_eq!(snap.fruits.len(), 4);
    assert_eq!(snap.score, 0);
    assert_eq!(snap.lives, 3);
    for fruit in snap.fruits {
        assert!(fruit.y < 0.0);
    }
}

#[test]
fn tick_rearms_while_running() {
    let now = Instant::now();
    let mut rng = seeded_rng();
    let mut game = started(MemoryStore::default(), now, &mut rng);
    let later = now + Duration::from_millis(30);
    game.tick(later, &mut rng);
    assert!(game.scheduler().is_armed());
    assert!(!game.scheduler().due(later));
    assert!(game.scheduler().due(later + Duration::from_millis(30)));
}

#[test]
fn moves_apply_only_while_playing() {
    let now = Instant::now();
    let mut rng = seeded_rng();
    let mut game = started(MemoryStore::default(), now, &mut rng);
    game.handle(Command::Move(Direction::Right), now, &mut rng);
    assert_eq!(game.state().player.x, 435.0);
    game.handle(Command::Start, now, &mut rng);
    assert_eq!(game.state().player.x, 435.0, "start must not reset a running game");
}

#[test]
fn example_scenario_miss_then_catch() {
    let now = Instant::now();
    let mut rng = seeded_rng();
    let mut game = started(MemoryStore::default(), now, &mut rng);

    // Fruit A at y=595, speed 8, well left of the basket
    {
        let a = &mut game.state_mut().fruits[0];
        a.x = 100.0;
        a.y = 595.0;
        a.speed = 8.0;
    }
    game.tick(now, &mut rng);
    assert_eq!(game.state().session.lives, 2);
    assert!(game.state().fruits[0].y < 0.0);

    // Fruit B lands on box [380,520,425,565]; basket box is [365,530,435,600]
    {
        let b = &mut game.state_mut().fruits[1];
        b.x = 402.5;
        b.y = 536.5;
        b.speed = 6.0;
    }
    game.tick(now, &mut rng);
    assert_eq!(game.state().session.score, 1);
    assert!(game.state().fruits[1].y < 0.0);
}

// ── Game over ─────────────────────────────────────────────────────────────────

#[test]
fn losing_last_life_ends_run_in_the_same_tick() {
    let now = Instant::now();
    let mut rng = seeded_rng();
    let mut game = started(MemoryStore::default(), now, &mut rng);
    game.state_mut().session.lives = 1;
    game.state_mut().session.score = 5;
    stage_miss(&mut game, 0);

    let outcome = game.tick(now, &mut rng);

    assert!(outcome.lives_exhausted);
    assert_eq!(game.status(), GameStatus::GameOver);
    assert!(!game.is_running());
    assert!(!game.scheduler().is_armed());
    assert_eq!(game.high_scores().best(), 5);
    assert_eq!(game.high_scores().store().saves(), 1);

    let snap = game.snapshot();
    assert_eq!(snap.lives, 0);
    assert!(snap.new_high_score);
    assert!(PUNCHLINES.contains(&snap.punchline.unwrap()));
    assert!(snap.player.is_some(), "entities stay on screen under the overlay");

    // Further ticks do nothing and never record the run twice
    let frozen = game.state().fruits.clone();
    for _ in 0..5 {
        game.tick(now, &mut rng);
    }
    assert_eq!(game.state().fruits, frozen);
    assert_eq!(game.high_scores().store().saves(), 1);
}

#[test]
fn lower_score_keeps_existing_high_score() {
    let now = Instant::now();
    let mut rng = seeded_rng();
    let mut game = started(MemoryStore::with_value(10), now, &mut rng);
    game.state_mut().session.lives = 1;
    game.state_mut().session.score = 3;
    stage_miss(&mut game, 0);
    game.tick(now, &mut rng);

    assert_eq!(game.status(), GameStatus::GameOver);
    assert_eq!(game.high_scores().best(), 10);
    assert_eq!(game.high_scores().store().saves(), 0);
    assert!(!game.snapshot().new_high_score);
}

#[test]
fn game_over_accepts_only_restart() {
    let now = Instant::now();
    let mut rng = seeded_rng();
    let mut game = started(MemoryStore::default(), now, &mut rng);
    game.state_mut().session.lives = 1;
    game.state_mut().session.score = 4;
    stage_miss(&mut game, 0);
    game.tick(now, &mut rng);

    let player = game.state().player.clone();
    game.handle(Command::Start, now, &mut rng);
    game.handle(Command::Move(Direction::Left), now, &mut rng);
    assert_eq!(game.status(), GameStatus::GameOver);
    assert_eq!(game.state().player, player);

    game.state_mut().player.x = 100.0;
    game.handle(Command::Restart, now, &mut rng);

    let config = GameConfig::default();
    assert_eq!(game.status(), GameStatus::Playing);
    assert_eq!(game.state().session.score, 0);
    assert_eq!(game.state().session.lives, 3);
    assert_eq!(game.state().player, initial_player(&config));
    assert!(game.state().punchline.is_none());
    assert!(game.scheduler().is_armed());
    assert!(!game.snapshot().new_high_score);
    assert_eq!(game.snapshot().high_score, 4);
    for fruit in &game.state().fruits {
        assert!(fruit.y < 0.0);
        assert!(fruit.x >= 22.5 && fruit.x <= 777.5);
    }
}

// ── Close ─────────────────────────────────────────────────────────────────────

#[test]
fn close_stops_everything() {
    let now = Instant::now();
    let mut rng = seeded_rng();
    let mut game = started(MemoryStore::default(), now, &mut rng);
    assert!(game.is_running());
    game.close();

    assert!(!game.is_running());
    assert_eq!(game.status(), GameStatus::Playing);
    assert!(game.scheduler().is_closed());
    assert!(!game.snapshot().music_playing);

    let before = game.state().fruits.clone();
    game.tick(now, &mut rng);
    assert_eq!(game.state().fruits, before);

    game.handle(Command::Move(Direction::Left), now, &mut rng);
    assert_eq!(game.state().player.x, 400.0);
}
