use macroquad::prelude::*;
use serde::Deserialize;

use crate::entity::Platform;
use crate::geom::{self, Side};
use crate::player::Player;
use crate::timer::Countdown;
use crate::world::GRAVITY;

pub const ENEMY_WIDTH: f32 = 30.0;
pub const ENEMY_HEIGHT: f32 = 50.0;

const PATROL_DISTANCE: f32 = 100.0;
const KNOCKBACK: f32 = 10.0;
const SIDE_NUDGE: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Basic,
    Strong,
    Fast,
    Boss,
}

/// Per-kind base stats, fixed at spawn.
#[derive(Clone, Copy, Debug)]
pub struct EnemyStats {
    pub health: f32,
    pub attack: f32,
    pub xp_value: u32,
    pub speed: f32,
    pub attack_cooldown: u32,
}

impl EnemyKind {
    pub const fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Basic => EnemyStats {
                health: 20.0,
                attack: 30.0,
                xp_value: 20,
                speed: 2.0,
                attack_cooldown: 30,
            },
            EnemyKind::Strong => EnemyStats {
                health: 40.0,
                attack: 40.0,
                xp_value: 40,
                speed: 1.5,
                attack_cooldown: 40,
            },
            EnemyKind::Fast => EnemyStats {
                health: 15.0,
                attack: 20.0,
                xp_value: 30,
                speed: 4.0,
                attack_cooldown: 20,
            },
            EnemyKind::Boss => EnemyStats {
                health: 200.0,
                attack: 50.0,
                xp_value: 150,
                speed: 2.0,
                attack_cooldown: 35,
            },
        }
    }

    /// Bosses hold their ground; everyone else patrols.
    pub fn patrols(self) -> bool {
        !matches!(self, EnemyKind::Boss)
    }
}

pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub direction: f32,
    pub kind: EnemyKind,
    stats: EnemyStats,
    pub health: f32,
    start_x: f32,
    patrol_distance: f32,
    attack_cooldown: Countdown,
}

impl Enemy {
    pub fn new(x: f32, y: f32, kind: EnemyKind) -> Self {
        let stats = kind.stats();
        Self {
            pos: vec2(x, y),
            vel: Vec2::ZERO,
            direction: 1.0,
            kind,
            stats,
            health: stats.health,
            start_x: x,
            patrol_distance: PATROL_DISTANCE,
            attack_cooldown: Countdown::default(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, ENEMY_WIDTH, ENEMY_HEIGHT)
    }

    pub fn stats(&self) -> &EnemyStats {
        &self.stats
    }

    /// `dialog_active` gates contact damage only: on the tick a conversation
    /// opens the enemy still moves, but the touch never lands.
    pub fn update(&mut self, platforms: &[Platform], player: &mut Player, dialog_active: bool) {
        if self.kind.patrols() {
            if self.pos.x > self.start_x + self.patrol_distance {
                self.direction = -1.0;
            } else if self.pos.x < self.start_x - self.patrol_distance {
                self.direction = 1.0;
            }
            self.vel.x = self.stats.speed * self.direction;
        }

        self.vel.y += GRAVITY;
        self.pos += self.vel;

        self.resolve_platforms(platforms);
        if !dialog_active {
            self.touch_player(player);
        }
        self.attack_cooldown.tick();
    }

    fn resolve_platforms(&mut self, platforms: &[Platform]) {
        for platform in platforms {
            match geom::collision_side(self.rect(), self.vel, platform.rect) {
                Some(Side::Top) => {
                    self.pos.y = platform.rect.y - ENEMY_HEIGHT;
                    self.vel.y = 0.0;
                }
                Some(Side::Bottom) => {
                    self.pos.y = platform.rect.y + platform.rect.h;
                    self.vel.y = 0.0;
                }
                // walls turn the patrol around instead of pinning it
                Some(Side::Left) | Some(Side::Right) | None => {
                    if geom::overlaps(self.rect(), platform.rect) && self.vel.x != 0.0 {
                        self.direction = -self.direction;
                        self.pos.x += self.direction * SIDE_NUDGE;
                    }
                }
            }
        }
    }

    fn touch_player(&mut self, player: &mut Player) {
        if self.attack_cooldown.is_active() {
            return;
        }
        if geom::overlaps(self.rect(), player.rect()) {
            player.take_damage(self.stats.attack);
            self.attack_cooldown.arm(self.stats.attack_cooldown);
        }
    }

    /// No defense on enemies; any hit also shoves them away from the player.
    pub fn take_damage(&mut self, amount: f32, knock_direction: f32) {
        self.health -= amount;
        self.pos.x += knock_direction * KNOCKBACK;
    }

    pub fn draw(&self, camera: Vec2) {
        draw_rectangle(
            self.pos.x - camera.x,
            self.pos.y - camera.y,
            ENEMY_WIDTH,
            ENEMY_HEIGHT,
            Color::from_hex(0xff3e3e),
        );
        let fraction = (self.health / self.stats.health).max(0.0);
        let x = self.pos.x - camera.x;
        let y = self.pos.y - 10.0 - camera.y;
        draw_rectangle(x, y, ENEMY_WIDTH, 5.0, Color::from_hex(0x333333));
        draw_rectangle(x, y, ENEMY_WIDTH * fraction, 5.0, Color::from_hex(0xff3e3e));
    }
}
