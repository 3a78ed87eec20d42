use fruit_frenzy::compute::init_state;
use fruit_frenzy::config::GameConfig;
use fruit_frenzy::entities::*;

#[test]
fn entity_clone_and_eq() {
    assert_eq!(GameStatus::Intro, GameStatus::Intro);
    assert_ne!(GameStatus::Playing, GameStatus::GameOver);
    assert_ne!(Direction::Left, Direction::Right);

    let kind = FruitKind::Banana;
    assert_eq!(kind.clone(), FruitKind::Banana);
    assert_eq!(FruitKind::ALL.len(), 7);
}

#[test]
fn game_state_clone_is_independent() {
    let original = init_state(&GameConfig::default());
    let mut cloned = original.clone();

    cloned.player.x = 99.0;
    cloned.session.score = 999;
    cloned.fruits[0].y = 123.0;

    assert_eq!(original.player.x, 400.0);
    assert_eq!(original.session.score, 0);
    assert_ne!(original.fruits[0].y, 123.0);
}
