use macroquad::prelude::*;
use serde::Deserialize;

use crate::timer::Countdown;

pub const ITEM_SIZE: f32 = 20.0;
pub const NPC_WIDTH: f32 = 30.0;
pub const NPC_HEIGHT: f32 = 50.0;
pub const PORTAL_WIDTH: f32 = 40.0;
pub const PORTAL_HEIGHT: f32 = 60.0;
pub const ARROW_WIDTH: f32 = 20.0;
pub const ARROW_HEIGHT: f32 = 4.0;

const ARROW_GRAVITY: f32 = 0.1;
pub const ARROW_LIFETIME: u32 = 300;

/// Static level geometry. No behavior, lives for the whole level.
#[derive(Clone, Copy, Debug)]
pub struct Platform {
    pub rect: Rect,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
        }
    }

    pub fn draw(&self, camera: Vec2) {
        draw_rectangle(
            self.rect.x - camera.x,
            self.rect.y - camera.y,
            self.rect.w,
            self.rect.h,
            Color::from_hex(0x8a5ec7),
        );
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Health,
    Attack,
    Defense,
    Xp,
    Speed,
    AttackSpeed,
    #[serde(rename = "1up")]
    OneUp,
}

#[derive(Clone, Copy, Debug)]
pub struct Item {
    pub rect: Rect,
    pub kind: ItemKind,
}

impl Item {
    pub fn new(x: f32, y: f32, kind: ItemKind) -> Self {
        Self {
            rect: Rect::new(x, y, ITEM_SIZE, ITEM_SIZE),
            kind,
        }
    }

    pub fn draw(&self, camera: Vec2) {
        let tint = match self.kind {
            ItemKind::Health => Color::from_hex(0xff5e5e),
            ItemKind::Attack => Color::from_hex(0xffcc00),
            ItemKind::Defense => Color::from_hex(0xc0c0c0),
            ItemKind::Xp => Color::from_hex(0xb46eff),
            ItemKind::Speed => Color::from_hex(0x7ee8ff),
            ItemKind::AttackSpeed => Color::from_hex(0xffe97e),
            ItemKind::OneUp => Color::from_hex(0x4eff83),
        };
        draw_circle(
            self.rect.x + self.rect.w * 0.5 - camera.x,
            self.rect.y + self.rect.h * 0.5 - camera.y,
            self.rect.w * 0.5,
            tint,
        );
    }
}

#[derive(Clone, Debug)]
pub struct Npc {
    pub rect: Rect,
    pub name: String,
    pub dialog: Vec<String>,
}

impl Npc {
    pub fn new(x: f32, y: f32, name: String, dialog: Vec<String>) -> Self {
        Self {
            rect: Rect::new(x, y, NPC_WIDTH, NPC_HEIGHT),
            name,
            dialog,
        }
    }

    pub fn draw(&self, camera: Vec2, player_in_range: bool) {
        draw_rectangle(
            self.rect.x - camera.x,
            self.rect.y - camera.y,
            self.rect.w,
            self.rect.h,
            Color::from_hex(0x4eff83),
        );
        let cx = self.rect.x + self.rect.w * 0.5 - camera.x;
        let name_width = measure_text(&self.name, None, 16, 1.0).width;
        draw_text(
            &self.name,
            cx - name_width * 0.5,
            self.rect.y - 10.0 - camera.y,
            16.0,
            WHITE,
        );
        if player_in_range {
            let hint = "Press E to talk";
            let hint_width = measure_text(hint, None, 16, 1.0).width;
            draw_text(
                hint,
                cx - hint_width * 0.5,
                self.rect.y - 25.0 - camera.y,
                16.0,
                Color::from_hex(0xffcc00),
            );
        }
    }
}

/// Level exit. The animation phase is cosmetic; completion is signaled by the
/// world on player overlap and latched by the session.
#[derive(Clone, Copy, Debug)]
pub struct Portal {
    pub rect: Rect,
    pub animation: f32,
}

impl Portal {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            rect: Rect::new(x, y, PORTAL_WIDTH, PORTAL_HEIGHT),
            animation: 0.0,
        }
    }

    pub fn update(&mut self) {
        self.animation += 0.05;
    }

    pub fn draw(&self, camera: Vec2) {
        let pulse = self.animation.sin() * 5.0;
        let cx = self.rect.x + self.rect.w * 0.5 - camera.x;
        let cy = self.rect.y + self.rect.h * 0.5 - camera.y;
        draw_circle(cx, cy, self.rect.w * 0.5 + pulse, Color::from_hex(0xff00ff));
        draw_circle(cx, cy, self.rect.w * 0.25 + pulse * 0.5, WHITE);
    }
}

/// Player-fired projectile. Light gravity, fixed frame lifetime; any platform
/// or enemy hit zeroes the lifetime and the world prunes it after the pass.
#[derive(Clone, Copy, Debug)]
pub struct Arrow {
    pub pos: Vec2,
    pub vel: Vec2,
    pub direction: f32,
    pub damage: f32,
    pub life: Countdown,
}

impl Arrow {
    pub fn new(pos: Vec2, direction: f32, speed: f32, damage: f32) -> Self {
        Self {
            pos,
            vel: vec2(speed * direction, 0.0),
            direction,
            damage,
            life: Countdown::armed(ARROW_LIFETIME),
        }
    }

    pub fn integrate(&mut self) {
        self.vel.y += ARROW_GRAVITY;
        self.pos += self.vel;
        self.life.tick();
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, ARROW_WIDTH, ARROW_HEIGHT)
    }

    pub fn draw(&self, camera: Vec2) {
        // shaft plus a lighter head on the facing end
        draw_rectangle(
            self.pos.x - camera.x,
            self.pos.y - camera.y,
            ARROW_WIDTH * 0.8,
            ARROW_HEIGHT,
            Color::from_hex(0x8b4513),
        );
        let head_x = if self.direction >= 1.0 {
            self.pos.x + ARROW_WIDTH * 0.8
        } else {
            self.pos.x - ARROW_WIDTH * 0.2
        };
        draw_rectangle(
            head_x - camera.x,
            self.pos.y - camera.y,
            ARROW_WIDTH * 0.2,
            ARROW_HEIGHT,
            Color::from_hex(0xc0c0c0),
        );
    }
}
