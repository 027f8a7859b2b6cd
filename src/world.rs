use macroquad::prelude::*;

use crate::combat;
use crate::enemy::Enemy;
use crate::entity::{Arrow, Item, Npc, Platform, Portal};
use crate::geom;
use crate::input::InputState;
use crate::level::LevelDef;
use crate::player::Player;

pub const GRAVITY: f32 = 0.5;
pub const FALL_LIMIT_Y: f32 = 900.0;
/// Vertical extent of the playfield the camera may show.
pub const LEVEL_HEIGHT: f32 = 450.0;
pub const NPC_TALK_RANGE: f32 = 80.0;

/// What a tick wants the session to act on.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickSignals {
    pub level_complete: bool,
    pub dialog_request: Option<usize>,
    pub defeated: bool,
}

/// Live state of one level: every entity collection, the player, and the
/// camera. Owned by the session; nothing in here reaches outside it.
pub struct World {
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub npcs: Vec<Npc>,
    pub items: Vec<Item>,
    pub portals: Vec<Portal>,
    pub arrows: Vec<Arrow>,
    pub player: Player,
    pub camera: Vec2,
    pub level_width: f32,
}

impl World {
    pub fn from_level(def: &LevelDef) -> Self {
        Self {
            platforms: def
                .platforms
                .iter()
                .map(|p| Platform::new(p.x, p.y, p.width, p.height))
                .collect(),
            enemies: def
                .enemies
                .iter()
                .map(|e| Enemy::new(e.x, e.y, e.kind))
                .collect(),
            npcs: def
                .npcs
                .iter()
                .map(|n| Npc::new(n.x, n.y, n.name.clone(), n.dialog.clone()))
                .collect(),
            items: def
                .items
                .iter()
                .map(|i| Item::new(i.x, i.y, i.kind))
                .collect(),
            portals: def.portals.iter().map(|p| Portal::new(p.x, p.y)).collect(),
            arrows: Vec::new(),
            player: Player::new(def.player_start.x, def.player_start.y),
            camera: Vec2::ZERO,
            level_width: def.width,
        }
    }

    /// One simulation tick in fixed order: player movement and passes,
    /// camera, enemies in list order, portal animation, arrows with pruning.
    pub fn update(&mut self, input: &InputState, view: Vec2) -> TickSignals {
        let mut signals = TickSignals::default();

        self.player.update(input, &self.platforms, &mut self.arrows);
        combat::player_melee(&mut self.player, &mut self.enemies);
        self.pickup_items();

        let player_rect = self.player.rect();
        if self
            .portals
            .iter()
            .any(|portal| geom::overlaps(player_rect, portal.rect))
        {
            signals.level_complete = true;
        }
        if input.interact {
            signals.dialog_request = self.npc_in_range();
        }
        self.player.tick_status();

        self.update_camera(view);

        // A dialog opening this tick already freezes contact damage; the
        // session freezes everything else starting next tick.
        let dialog_opening = signals.dialog_request.is_some();
        for enemy in self.enemies.iter_mut() {
            enemy.update(&self.platforms, &mut self.player, dialog_opening);
        }
        for portal in self.portals.iter_mut() {
            portal.update();
        }
        combat::update_arrows(
            &mut self.arrows,
            &self.platforms,
            &mut self.enemies,
            &mut self.player,
        );

        signals.defeated = self.player.defeated;
        signals
    }

    /// Consume every item the player overlaps, applying each effect exactly
    /// once. Back-to-front so removal never skips an element.
    fn pickup_items(&mut self) {
        let player_rect = self.player.rect();
        let mut i = self.items.len();
        while i > 0 {
            i -= 1;
            if geom::overlaps(player_rect, self.items[i].rect) {
                let kind = self.items[i].kind;
                self.items.remove(i);
                self.player.apply_item(kind);
            }
        }
    }

    /// First NPC (list order) within talking distance of the player's center.
    fn npc_in_range(&self) -> Option<usize> {
        let center = geom::center(self.player.rect());
        self.npcs
            .iter()
            .position(|npc| center.distance(geom::center(npc.rect)) < NPC_TALK_RANGE)
    }

    fn update_camera(&mut self, view: Vec2) {
        let target = geom::center(self.player.rect()) - view * 0.5;
        self.camera.x = target.x.min(self.level_width - view.x).max(0.0);
        self.camera.y = target.y.min(LEVEL_HEIGHT - view.y).max(0.0);
    }

    /// Render pass, back to front. Pure read; safe to call while the
    /// simulation is frozen for dialog.
    pub fn draw(&self) {
        let camera = self.camera;
        for platform in &self.platforms {
            platform.draw(camera);
        }
        for item in &self.items {
            item.draw(camera);
        }
        for portal in &self.portals {
            portal.draw(camera);
        }
        for arrow in &self.arrows {
            arrow.draw(camera);
        }
        let player_center = geom::center(self.player.rect());
        for npc in &self.npcs {
            let in_range = player_center.distance(geom::center(npc.rect)) < NPC_TALK_RANGE;
            npc.draw(camera, in_range);
        }
        for enemy in &self.enemies {
            enemy.draw(camera);
        }
        self.player.draw(camera);
    }
}
