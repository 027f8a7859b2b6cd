use macroquad::prelude::*;

use crate::entity::Npc;
use crate::input::InputState;
use crate::level::{LevelError, LevelLibrary};
use crate::player::Player;
use crate::world::World;

const COMPLETION_XP_PER_LEVEL: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting on the start screen; no world yet.
    Ready,
    Running,
    LevelComplete,
    GameOver,
    Victory,
}

/// An open NPC conversation. While one exists the world does not tick.
pub struct Dialog {
    pub name: String,
    lines: Vec<String>,
    index: usize,
}

impl Dialog {
    fn from_npc(npc: &Npc) -> Self {
        Self {
            name: npc.name.clone(),
            lines: npc.dialog.clone(),
            index: 0,
        }
    }

    pub fn line(&self) -> &str {
        self.lines.get(self.index).map(String::as_str).unwrap_or("")
    }

    /// Step to the next line; false once the conversation is exhausted.
    fn advance(&mut self) -> bool {
        self.index += 1;
        self.index < self.lines.len()
    }
}

/// Progression fields preserved across level transitions. Reset only by a
/// full restart. Arrow speed is deliberately not carried; it re-accrues
/// from level-ups.
#[derive(Clone, Copy, Debug)]
struct CarriedStats {
    lives: u32,
    level: u32,
    xp: u32,
    xp_to_next_level: u32,
    attack: f32,
    defense: f32,
    health: f32,
    max_health: f32,
    speed: f32,
    attack_speed: i32,
}

impl CarriedStats {
    fn capture(player: &Player) -> Self {
        Self {
            lives: player.lives,
            level: player.level,
            xp: player.xp,
            xp_to_next_level: player.xp_to_next_level,
            attack: player.attack,
            defense: player.defense,
            health: player.health,
            max_health: player.max_health,
            speed: player.speed,
            attack_speed: player.attack_speed,
        }
    }

    fn apply(&self, player: &mut Player) {
        player.lives = self.lives;
        player.level = self.level;
        player.xp = self.xp;
        player.xp_to_next_level = self.xp_to_next_level;
        player.attack = self.attack;
        player.defense = self.defense;
        player.health = self.health;
        player.max_health = self.max_health;
        player.speed = self.speed;
        player.attack_speed = self.attack_speed;
    }
}

/// Numeric readouts for the rendering shell.
#[derive(Clone, Copy, Debug)]
pub struct Hud {
    pub health_fraction: f32,
    pub xp_fraction: f32,
    pub level: u32,
    pub attack: f32,
    pub defense: f32,
    pub lives: u32,
    pub stage: u32,
}

/// Drives the game: owns the level registry and the live world, steps the
/// simulation while running, freezes it for dialog, and handles level
/// completion, game over and restarts.
pub struct Session {
    library: LevelLibrary,
    pub world: Option<World>,
    pub phase: Phase,
    pub current_level: u32,
    pub dialog: Option<Dialog>,
}

impl Session {
    pub fn new(library: LevelLibrary) -> Self {
        let current_level = library.first();
        Self {
            library,
            world: None,
            phase: Phase::Ready,
            current_level,
            dialog: None,
        }
    }

    /// Begin a level with a fresh player.
    pub fn start(&mut self, number: u32) -> Result<(), LevelError> {
        self.load_level(number, None)
    }

    /// Move to the next authored level, carrying progression stats over.
    pub fn advance(&mut self) -> Result<(), LevelError> {
        self.advance_to(self.current_level + 1)
    }

    /// Jump to any authored level, carrying progression stats over.
    pub fn advance_to(&mut self, number: u32) -> Result<(), LevelError> {
        let carried = self.world.as_ref().map(|w| CarriedStats::capture(&w.player));
        self.load_level(number, carried)
    }

    /// Full reset: back to the first level with default stats.
    pub fn restart(&mut self) -> Result<(), LevelError> {
        self.load_level(self.library.first(), None)
    }

    fn load_level(&mut self, number: u32, carried: Option<CarriedStats>) -> Result<(), LevelError> {
        let def = self
            .library
            .level(number)
            .ok_or(LevelError::Unknown(number))?;
        let mut world = World::from_level(def);
        if let Some(carried) = carried {
            carried.apply(&mut world.player);
        }
        self.world = Some(world);
        self.current_level = number;
        self.phase = Phase::Running;
        self.dialog = None;
        Ok(())
    }

    /// One frame. Dialog consumes the tick entirely: the world stays frozen
    /// and interact steps the conversation. Outside Running nothing moves.
    pub fn tick(&mut self, input: &InputState, view: Vec2) {
        if let Some(dialog) = self.dialog.as_mut() {
            if input.interact && !dialog.advance() {
                self.dialog = None;
            }
            return;
        }
        if self.phase != Phase::Running {
            return;
        }
        let Some(world) = self.world.as_mut() else {
            return;
        };

        let signals = world.update(input, view);
        if signals.defeated {
            self.phase = Phase::GameOver;
            return;
        }
        if signals.level_complete {
            self.complete_level();
            return;
        }
        if let Some(index) = signals.dialog_request {
            self.dialog = Some(Dialog::from_npc(&world.npcs[index]));
        }
    }

    /// Leaving Running here is the re-entry latch: the portal can overlap for
    /// any number of frames, the bonus lands once.
    fn complete_level(&mut self) {
        if let Some(world) = self.world.as_mut() {
            world
                .player
                .gain_xp(self.current_level * COMPLETION_XP_PER_LEVEL);
        }
        self.phase = if self.current_level < self.library.last() {
            Phase::LevelComplete
        } else {
            Phase::Victory
        };
    }

    pub fn hud(&self) -> Option<Hud> {
        let player = &self.world.as_ref()?.player;
        Some(Hud {
            health_fraction: (player.health / player.max_health).clamp(0.0, 1.0),
            xp_fraction: (player.xp as f32 / player.xp_to_next_level as f32).clamp(0.0, 1.0),
            level: player.level,
            attack: player.attack,
            defense: player.defense,
            lives: player.lives,
            stage: self.current_level,
        })
    }

    /// Active speaker and line for the dialog box, if a conversation is open.
    pub fn dialog_text(&self) -> Option<(&str, &str)> {
        self.dialog
            .as_ref()
            .map(|dialog| (dialog.name.as_str(), dialog.line()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{LevelDef, LevelLibrary};

    fn level(number: u32, extra: &str) -> LevelDef {
        serde_yaml::from_str(&format!(
            r#"
number: {number}
width: 2000
player_start: {{ x: 100, y: 350 }}
platforms:
  - {{ x: 0, y: 400, width: 2000, height: 50 }}
{extra}"#
        ))
        .unwrap()
    }

    fn session_with(defs: Vec<LevelDef>) -> Session {
        Session::new(LevelLibrary::from_defs(defs).unwrap())
    }

    fn view() -> Vec2 {
        vec2(800.0, 450.0)
    }

    const PORTAL_AT_SPAWN: &str = "portals:\n  - { x: 90, y: 330 }\n";
    const NPC_AT_SPAWN: &str = concat!(
        "npcs:\n",
        "  - x: 140\n",
        "    y: 350\n",
        "    name: Guide\n",
        "    dialog:\n",
        "      - \"One.\"\n",
        "      - \"Two.\"\n",
    );

    #[test]
    fn out_of_range_level_is_an_error() {
        let mut session = session_with(vec![level(1, "")]);
        assert!(matches!(session.start(9), Err(LevelError::Unknown(9))));
        assert_eq!(session.phase, Phase::Ready);
    }

    #[test]
    fn portal_completion_awards_bonus_once() {
        let mut session = session_with(vec![level(1, PORTAL_AT_SPAWN), level(2, "")]);
        session.start(1).unwrap();
        session.tick(&InputState::default(), view());
        assert_eq!(session.phase, Phase::LevelComplete);
        // the 100-xp bonus crossed the first threshold exactly once
        let player = &session.world.as_ref().unwrap().player;
        assert_eq!(player.level, 2);
        assert_eq!(player.xp, 0);
        // overlap persists, but ticks outside Running are inert
        session.tick(&InputState::default(), view());
        session.tick(&InputState::default(), view());
        let player = &session.world.as_ref().unwrap().player;
        assert_eq!(player.level, 2);
        assert_eq!(player.xp, 0);
    }

    #[test]
    fn final_level_completion_is_victory() {
        let mut session = session_with(vec![level(1, PORTAL_AT_SPAWN)]);
        session.start(1).unwrap();
        session.tick(&InputState::default(), view());
        assert_eq!(session.phase, Phase::Victory);
    }

    #[test]
    fn advance_carries_stats_restart_resets() {
        let mut session = session_with(vec![level(1, PORTAL_AT_SPAWN), level(2, "")]);
        session.start(1).unwrap();
        {
            let player = &mut session.world.as_mut().unwrap().player;
            player.attack = 11.0;
            player.lives = 2;
            player.attack_speed = 15;
        }
        session.tick(&InputState::default(), view());
        assert_eq!(session.phase, Phase::LevelComplete);
        // the completion bonus leveled the player up before the capture
        session.advance().unwrap();
        assert_eq!(session.current_level, 2);
        let player = &session.world.as_ref().unwrap().player;
        assert_eq!(player.level, 2);
        assert_eq!(player.attack, 13.0);
        assert_eq!(player.lives, 2);
        assert_eq!(player.attack_speed, 15);
        assert_eq!(player.xp, 0);
        assert_eq!(player.xp_to_next_level, 150);

        session.restart().unwrap();
        let player = &session.world.as_ref().unwrap().player;
        assert_eq!(session.current_level, 1);
        assert_eq!(player.attack, 5.0);
        assert_eq!(player.lives, 3);
        assert_eq!(player.xp, 0);
    }

    #[test]
    fn advance_to_jumps_levels_with_stats() {
        let mut session = session_with(vec![level(1, ""), level(2, ""), level(3, "")]);
        session.start(1).unwrap();
        session.world.as_mut().unwrap().player.attack = 9.0;
        session.advance_to(3).unwrap();
        assert_eq!(session.current_level, 3);
        assert_eq!(session.phase, Phase::Running);
        assert_eq!(session.world.as_ref().unwrap().player.attack, 9.0);
        // unknown targets leave the session where it was
        assert!(matches!(session.advance_to(9), Err(LevelError::Unknown(9))));
        assert_eq!(session.current_level, 3);
    }

    #[test]
    fn dialog_freezes_simulation_and_resumes() {
        let mut session = session_with(vec![level(1, NPC_AT_SPAWN)]);
        session.start(1).unwrap();
        let interact = InputState {
            interact: true,
            ..Default::default()
        };
        // settle onto the floor first
        session.tick(&InputState::default(), view());
        session.tick(&interact, view());
        assert_eq!(session.dialog_text(), Some(("Guide", "One.")));

        let frozen_pos = session.world.as_ref().unwrap().player.pos;
        let run_right = InputState {
            right: true,
            ..Default::default()
        };
        session.tick(&run_right, view());
        assert_eq!(session.world.as_ref().unwrap().player.pos, frozen_pos);

        session.tick(&interact, view());
        assert_eq!(session.dialog_text(), Some(("Guide", "Two.")));
        // exhausting the lines closes the box and resumes the world
        session.tick(&interact, view());
        assert!(session.dialog.is_none());
        session.tick(&run_right, view());
        assert!(session.world.as_ref().unwrap().player.pos.x > frozen_pos.x);
    }

    #[test]
    fn game_over_halts_ticks() {
        let mut session = session_with(vec![level(1, "")]);
        session.start(1).unwrap();
        {
            let player = &mut session.world.as_mut().unwrap().player;
            player.lives = 1;
            player.pos.y = 950.0;
        }
        session.tick(&InputState::default(), view());
        assert_eq!(session.phase, Phase::GameOver);
        let pos = session.world.as_ref().unwrap().player.pos;
        session.tick(&InputState::default(), view());
        assert_eq!(session.world.as_ref().unwrap().player.pos, pos);
    }

    #[test]
    fn hud_reads_live_player() {
        let mut session = session_with(vec![level(1, "")]);
        assert!(session.hud().is_none());
        session.start(1).unwrap();
        {
            let player = &mut session.world.as_mut().unwrap().player;
            player.health = 25.0;
            player.xp = 50;
        }
        let hud = session.hud().unwrap();
        assert_eq!(hud.health_fraction, 0.25);
        assert_eq!(hud.xp_fraction, 0.5);
        assert_eq!(hud.lives, 3);
        assert_eq!(hud.stage, 1);
    }
}
