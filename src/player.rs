use macroquad::prelude::*;

use crate::entity::{Arrow, ItemKind, Platform};
use crate::geom::{self, Side};
use crate::input::InputState;
use crate::timer::Countdown;
use crate::world::{FALL_LIMIT_Y, GRAVITY};

pub const PLAYER_WIDTH: f32 = 30.0;
pub const PLAYER_HEIGHT: f32 = 50.0;

const BASE_SPEED: f32 = 5.0;
const JUMP_FORCE: f32 = 12.0;
const DASH_FORCE: f32 = 15.0;
const DASH_DURATION: u32 = 12;
const DASH_COOLDOWN: u32 = 120;
const DASH_DISTANCE: f32 = 200.0;
const ATTACK_DURATION: u32 = 8;
const ATTACK_WINDOW: u32 = 3;
const BASE_ATTACK_SPEED: i32 = 20;
const BOW_COOLDOWN: u32 = 30;
const HIT_INVULN: u32 = 60;
const RESPAWN_INVULN: u32 = 120;
const ATTACK_RANGE_MIN: f32 = 20.0;
const ATTACK_RANGE_MAX: f32 = 150.0;

/// The player character. One instance per level; progression stats are
/// captured and re-applied by the session on level transitions. The object
/// survives defeat so the HUD can keep reading it.
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 facing right, -1.0 facing left.
    pub direction: f32,
    pub speed: f32,
    pub is_jumping: bool,

    pub is_dashing: bool,
    pub can_dash: bool,
    dash_duration: Countdown,
    dash_cooldown: Countdown,
    dash_start_x: f32,

    pub is_attacking: bool,
    attack_duration: Countdown,
    attack_cooldown: Countdown,
    /// Melee cooldown in frames; items can shorten it.
    pub attack_speed: i32,
    /// Width and height of the forward melee hitbox.
    pub attack_box: Vec2,

    pub has_bow: bool,
    pub arrow_speed: f32,
    bow_cooldown: Countdown,

    pub health: f32,
    pub max_health: f32,
    pub lives: u32,
    pub max_lives: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub level: u32,
    pub attack: f32,
    pub defense: f32,
    invulnerability: Countdown,

    pub spawn: Vec2,
    /// Set once lives run out; the session reads it and ends the run.
    pub defeated: bool,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: vec2(x, y),
            vel: Vec2::ZERO,
            direction: 1.0,
            speed: BASE_SPEED,
            is_jumping: false,
            is_dashing: false,
            can_dash: true,
            dash_duration: Countdown::default(),
            dash_cooldown: Countdown::default(),
            dash_start_x: 0.0,
            is_attacking: false,
            attack_duration: Countdown::default(),
            attack_cooldown: Countdown::default(),
            attack_speed: BASE_ATTACK_SPEED,
            attack_box: vec2(60.0, 35.0),
            has_bow: true,
            arrow_speed: 8.0,
            bow_cooldown: Countdown::default(),
            health: 100.0,
            max_health: 100.0,
            lives: 3,
            max_lives: 3,
            xp: 0,
            xp_to_next_level: 100,
            level: 1,
            attack: 5.0,
            defense: 2.0,
            invulnerability: Countdown::default(),
            spawn: vec2(x, y),
            defeated: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerability.is_active()
    }

    /// Movement, action triggers, physics and platform resolution for one
    /// tick. Combat, item, portal and NPC passes run afterwards from the
    /// world; `tick_status` closes the frame.
    pub fn update(&mut self, input: &InputState, platforms: &[Platform], arrows: &mut Vec<Arrow>) {
        if input.dash && self.can_dash && !self.is_dashing {
            self.start_dash();
        }
        if self.is_dashing {
            let expired = self.dash_duration.tick();
            if expired || (self.pos.x - self.dash_start_x).abs() >= DASH_DISTANCE {
                self.end_dash();
            }
        }
        if self.dash_cooldown.tick() {
            self.can_dash = true;
        }

        if self.is_dashing {
            self.vel.x = DASH_FORCE * self.direction;
        } else if input.left {
            self.vel.x = -self.speed;
            self.direction = -1.0;
        } else if input.right {
            self.vel.x = self.speed;
            self.direction = 1.0;
        } else {
            self.vel.x = 0.0;
        }

        if input.jump && !self.is_jumping {
            self.vel.y = -JUMP_FORCE;
            self.is_jumping = true;
        }

        if input.attack && self.attack_cooldown.is_idle() && !self.is_attacking {
            self.is_attacking = true;
            self.attack_duration.arm(ATTACK_DURATION);
            self.attack_cooldown.arm(self.attack_speed.max(0) as u32);
        }
        if input.shoot && self.bow_cooldown.is_idle() && self.has_bow {
            arrows.push(self.shoot_arrow());
            self.bow_cooldown.arm(BOW_COOLDOWN);
        }

        if self.is_attacking && self.attack_duration.tick() {
            self.is_attacking = false;
        }
        self.attack_cooldown.tick();
        self.bow_cooldown.tick();

        self.vel.y += GRAVITY;
        self.pos += self.vel;

        if self.pos.y >= FALL_LIMIT_Y {
            self.respawn();
        }

        self.resolve_platforms(platforms);
    }

    /// End-of-frame status tick, run after the world's combat and pickup
    /// passes so damage taken this frame keeps its full window.
    pub fn tick_status(&mut self) {
        self.invulnerability.tick();
    }

    fn resolve_platforms(&mut self, platforms: &[Platform]) {
        let mut on_platform = false;
        for platform in platforms {
            match geom::collision_side(self.rect(), self.vel, platform.rect) {
                Some(Side::Top) => {
                    self.pos.y = platform.rect.y - PLAYER_HEIGHT;
                    self.vel.y = 0.0;
                    self.is_jumping = false;
                    on_platform = true;
                }
                Some(Side::Bottom) => {
                    self.pos.y = platform.rect.y + platform.rect.h;
                    self.vel.y = 0.0;
                }
                Some(Side::Left) => {
                    self.pos.x = platform.rect.x - PLAYER_WIDTH;
                    self.vel.x = 0.0;
                }
                Some(Side::Right) => {
                    self.pos.x = platform.rect.x + platform.rect.w;
                    self.vel.x = 0.0;
                }
                None => {}
            }
        }
        // airborne once nothing supports us
        if !on_platform && self.vel.y == 0.0 {
            self.is_jumping = true;
        }
    }

    fn start_dash(&mut self) {
        self.is_dashing = true;
        self.can_dash = false;
        self.dash_duration.arm(DASH_DURATION);
        self.dash_cooldown.arm(DASH_COOLDOWN);
        self.dash_start_x = self.pos.x;
        self.invulnerability.arm(DASH_DURATION);
    }

    fn end_dash(&mut self) {
        self.is_dashing = false;
        self.dash_duration.clear();
    }

    fn shoot_arrow(&self) -> Arrow {
        let x = if self.direction >= 1.0 {
            self.pos.x + PLAYER_WIDTH
        } else {
            self.pos.x
        };
        Arrow::new(
            vec2(x, self.pos.y + PLAYER_HEIGHT * 0.5),
            self.direction,
            self.arrow_speed,
            self.attack,
        )
    }

    /// True while the melee hitbox deals damage: the opening frames of the
    /// attack animation. Re-checked every frame of the window without
    /// per-target debounce, so a target that stays inside can be hit more
    /// than once per swing. Intentional; part of the game balance.
    pub fn melee_window_open(&self) -> bool {
        self.is_attacking && self.attack_duration.remaining() > ATTACK_DURATION - ATTACK_WINDOW
    }

    /// Forward-facing melee hitbox, flush against the facing edge and
    /// vertically centered on the player.
    pub fn attack_rect(&self) -> Rect {
        let x = if self.direction >= 1.0 {
            self.pos.x + PLAYER_WIDTH
        } else {
            self.pos.x - self.attack_box.x
        };
        let y = self.pos.y + PLAYER_HEIGHT * 0.5 - self.attack_box.y * 0.5;
        Rect::new(x, y, self.attack_box.x, self.attack_box.y)
    }

    /// Runtime melee-range tuning; height stays proportional.
    pub fn set_attack_range(&mut self, width: f32) {
        let width = width.clamp(ATTACK_RANGE_MIN, ATTACK_RANGE_MAX);
        self.attack_box = vec2(width, (width * 0.6).floor());
    }

    pub fn take_damage(&mut self, amount: f32) {
        if self.is_invulnerable() {
            return;
        }
        let actual = (amount - self.defense).max(1.0);
        self.health -= actual;
        if self.health <= 0.0 {
            self.respawn();
        } else {
            self.invulnerability.arm(HIT_INVULN);
        }
    }

    pub fn gain_xp(&mut self, amount: u32) {
        self.xp += amount;
        while self.xp >= self.xp_to_next_level {
            self.level_up();
        }
    }

    fn level_up(&mut self) {
        self.level += 1;
        self.xp -= self.xp_to_next_level;
        self.xp_to_next_level = (self.xp_to_next_level as f32 * 1.5).floor() as u32;
        self.attack += 2.0;
        self.defense += 1.0;
        self.max_health += 10.0;
        self.speed += 1.0;
        self.arrow_speed += 1.0;
        self.health = self.max_health;
    }

    pub fn apply_item(&mut self, kind: ItemKind) {
        match kind {
            ItemKind::Health => self.health = (self.health + 20.0).min(self.max_health),
            ItemKind::Attack => self.attack += 1.0,
            ItemKind::Defense => self.defense += 1.0,
            ItemKind::Xp => self.gain_xp(50),
            ItemKind::Speed => self.speed += 1.0,
            ItemKind::AttackSpeed => self.attack_speed -= 5,
            ItemKind::OneUp => self.lives = (self.lives + 1).min(self.max_lives),
        }
    }

    /// Costs a life; at zero lives the run is over and the player stays put
    /// for the HUD. Otherwise back to the spawn point, full health, brief
    /// grace period.
    pub fn respawn(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.defeated = true;
            return;
        }
        self.pos = self.spawn;
        self.vel = Vec2::ZERO;
        self.health = self.max_health;
        self.is_jumping = false;
        self.is_dashing = false;
        self.can_dash = true;
        self.dash_cooldown.clear();
        self.dash_duration.clear();
        self.invulnerability.arm(RESPAWN_INVULN);
    }

    pub fn draw(&self, camera: Vec2) {
        let mut tint = Color::from_hex(0x4e9eff);
        if self.is_dashing {
            tint = Color::new(1.0, 1.0, 1.0, 0.8);
            let mut trail = Color::from_hex(0x4e9eff);
            trail.a = 0.3;
            for i in 1..=3 {
                draw_rectangle(
                    self.pos.x - camera.x - self.direction * i as f32 * 10.0,
                    self.pos.y - camera.y,
                    PLAYER_WIDTH,
                    PLAYER_HEIGHT,
                    trail,
                );
            }
        } else if self.is_invulnerable() && (get_time() * 10.0) as i64 % 2 == 0 {
            tint.a = 0.5;
        }
        draw_rectangle(
            self.pos.x - camera.x,
            self.pos.y - camera.y,
            PLAYER_WIDTH,
            PLAYER_HEIGHT,
            tint,
        );

        if !self.can_dash {
            let ready = 1.0 - self.dash_cooldown.remaining() as f32 / DASH_COOLDOWN as f32;
            self.draw_gauge(camera, 15.0, ready, Color::from_hex(0x00ffff));
        }
        if self.bow_cooldown.is_active() {
            let ready = 1.0 - self.bow_cooldown.remaining() as f32 / BOW_COOLDOWN as f32;
            self.draw_gauge(camera, 20.0, ready, Color::from_hex(0x00ff00));
        }

        if self.is_attacking {
            let swing = self.attack_rect();
            draw_rectangle(
                swing.x - camera.x,
                swing.y - camera.y,
                swing.w,
                swing.h,
                Color::new(1.0, 1.0, 0.0, 0.5),
            );
        }
    }

    fn draw_gauge(&self, camera: Vec2, lift: f32, fraction: f32, tint: Color) {
        let x = self.pos.x - camera.x;
        let y = self.pos.y - lift - camera.y;
        draw_rectangle(x, y, PLAYER_WIDTH, 3.0, Color::from_hex(0x333333));
        draw_rectangle(x, y, PLAYER_WIDTH * fraction.clamp(0.0, 1.0), 3.0, tint);
    }
}
