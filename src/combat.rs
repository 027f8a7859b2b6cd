use crate::enemy::Enemy;
use crate::entity::{Arrow, Platform};
use crate::geom;
use crate::player::Player;

/// Damage one enemy and settle the kill: XP to the player, enemy removed.
/// Melee and arrow hits both go through here so the kill contract stays
/// identical for every damage source.
fn strike_enemy(enemies: &mut Vec<Enemy>, index: usize, damage: f32, player: &mut Player) {
    enemies[index].take_damage(damage, player.direction);
    if enemies[index].health <= 0.0 {
        let xp = enemies[index].stats().xp_value;
        enemies.remove(index);
        player.gain_xp(xp);
    }
}

/// Melee pass: while the swing's damage window is open, every enemy inside
/// the attack box takes the player's attack. Runs every frame of the window
/// with no per-target debounce; a slow enemy that stays in the box eats more
/// than one hit per swing.
pub fn player_melee(player: &mut Player, enemies: &mut Vec<Enemy>) {
    if !player.melee_window_open() {
        return;
    }
    let hitbox = player.attack_rect();
    let mut i = enemies.len();
    while i > 0 {
        i -= 1;
        if geom::overlaps(hitbox, enemies[i].rect()) {
            strike_enemy(enemies, i, player.attack, player);
        }
    }
}

/// Arrow pass: integrate every arrow, kill it on the first platform hit
/// (no damage), else on the first overlapping enemy (world list order, one
/// victim per arrow), then prune everything whose lifetime ran out.
pub fn update_arrows(
    arrows: &mut Vec<Arrow>,
    platforms: &[Platform],
    enemies: &mut Vec<Enemy>,
    player: &mut Player,
) {
    for arrow in arrows.iter_mut() {
        arrow.integrate();

        let rect = arrow.rect();
        if platforms.iter().any(|p| geom::overlaps(rect, p.rect)) {
            arrow.life.clear();
            continue;
        }
        for i in 0..enemies.len() {
            if geom::overlaps(rect, enemies[i].rect()) {
                strike_enemy(enemies, i, arrow.damage, player);
                arrow.life.clear();
                break;
            }
        }
    }
    arrows.retain(|arrow| arrow.life.is_active());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::EnemyKind;
    use crate::input::InputState;
    use macroquad::prelude::*;

    fn attacking_player(x: f32, y: f32) -> Player {
        let mut player = Player::new(x, y);
        let mut arrows = Vec::new();
        let attack = InputState {
            attack: true,
            ..Default::default()
        };
        player.update(&attack, &[], &mut arrows);
        player
    }

    #[test]
    fn melee_kill_awards_xp_and_removes() {
        let mut player = attacking_player(100.0, 100.0);
        player.attack = 25.0;
        // basic has 20 hp, dies to one swing; placed inside the attack box
        let mut enemies = vec![Enemy::new(140.0, 100.0, EnemyKind::Basic)];
        player_melee(&mut player, &mut enemies);
        assert!(enemies.is_empty());
        assert_eq!(player.xp, 20);
    }

    #[test]
    fn melee_outside_window_is_inert() {
        let mut player = Player::new(100.0, 100.0);
        player.attack = 25.0;
        let mut enemies = vec![Enemy::new(140.0, 100.0, EnemyKind::Basic)];
        player_melee(&mut player, &mut enemies);
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].health, 20.0);
    }

    #[test]
    fn melee_hits_every_enemy_in_the_box() {
        let mut player = attacking_player(100.0, 100.0);
        player.attack = 3.0;
        let mut enemies = vec![
            Enemy::new(135.0, 100.0, EnemyKind::Strong),
            Enemy::new(150.0, 100.0, EnemyKind::Strong),
            // far behind the player, untouched
            Enemy::new(600.0, 100.0, EnemyKind::Strong),
        ];
        player_melee(&mut player, &mut enemies);
        assert_eq!(enemies[0].health, 37.0);
        assert_eq!(enemies[1].health, 37.0);
        assert_eq!(enemies[2].health, 40.0);
    }

    #[test]
    fn melee_rechecks_each_frame_of_window() {
        // documented behavior: no per-target debounce inside the window
        let mut player = attacking_player(100.0, 100.0);
        player.attack = 3.0;
        let mut enemies = vec![Enemy::new(140.0, 100.0, EnemyKind::Strong)];
        player_melee(&mut player, &mut enemies);
        // knockback pushed it but it is still in range next frame
        enemies[0].pos.x = 140.0;
        let mut arrows = Vec::new();
        player.update(&InputState::default(), &[], &mut arrows);
        player_melee(&mut player, &mut enemies);
        assert_eq!(enemies[0].health, 40.0 - 6.0);
    }

    #[test]
    fn arrow_dies_on_platform_without_damage() {
        let mut player = Player::new(0.0, 0.0);
        let platforms = vec![Platform::new(50.0, -10.0, 20.0, 100.0)];
        let mut enemies = vec![Enemy::new(52.0, 0.0, EnemyKind::Basic)];
        let mut arrows = vec![Arrow::new(vec2(45.0, 20.0), 1.0, 8.0, 50.0)];
        update_arrows(&mut arrows, &platforms, &mut enemies, &mut player);
        assert!(arrows.is_empty());
        assert_eq!(enemies[0].health, 20.0);
    }

    #[test]
    fn arrow_damages_first_enemy_only() {
        let mut player = Player::new(0.0, 0.0);
        let mut enemies = vec![
            Enemy::new(50.0, 0.0, EnemyKind::Strong),
            Enemy::new(55.0, 0.0, EnemyKind::Strong),
        ];
        let mut arrows = vec![Arrow::new(vec2(45.0, 20.0), 1.0, 8.0, 5.0)];
        update_arrows(&mut arrows, &[], &mut enemies, &mut player);
        assert!(arrows.is_empty());
        assert_eq!(enemies[0].health, 35.0);
        assert_eq!(enemies[1].health, 40.0);
    }

    #[test]
    fn arrow_kill_matches_melee_contract() {
        let mut player = Player::new(0.0, 0.0);
        let mut enemies = vec![Enemy::new(50.0, 0.0, EnemyKind::Fast)];
        let mut arrows = vec![Arrow::new(vec2(45.0, 20.0), 1.0, 8.0, 20.0)];
        update_arrows(&mut arrows, &[], &mut enemies, &mut player);
        assert!(enemies.is_empty());
        assert_eq!(player.xp, 30);
    }

    #[test]
    fn missed_arrows_persist_until_lifetime() {
        let mut player = Player::new(0.0, 0.0);
        let mut enemies = Vec::new();
        let mut arrows = vec![Arrow::new(vec2(0.0, 0.0), 1.0, 8.0, 5.0)];
        for _ in 0..299 {
            update_arrows(&mut arrows, &[], &mut enemies, &mut player);
            assert_eq!(arrows.len(), 1);
        }
        update_arrows(&mut arrows, &[], &mut enemies, &mut player);
        assert!(arrows.is_empty());
    }
}
