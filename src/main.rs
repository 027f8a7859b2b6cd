use macroquad::prelude::*;

mod combat;
mod enemy;
mod entity;
mod geom;
mod input;
mod level;
mod player;
mod session;
mod timer;
mod world;

use input::InputState;
use level::LevelLibrary;
use session::{Phase, Session};

const LEVEL_DIR: &str = "levels";
const ATTACK_RANGE_STEP: f32 = 10.0;
const HUD_BAR_WIDTH: f32 = 200.0;
const HUD_BAR_HEIGHT: f32 = 14.0;

fn window_conf() -> Conf {
    Conf {
        window_title: "rustyquest".to_owned(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let library = LevelLibrary::load_from(LEVEL_DIR).unwrap_or_else(|err| {
        eprintln!("level load failed: {err}");
        eprintln!("Please ensure the {LEVEL_DIR}/ directory exists next to the executable");
        panic!("Level loading failed");
    });
    let mut session = Session::new(library);

    loop {
        let input = InputState::poll();
        let view = vec2(screen_width(), screen_height());

        // runtime melee range tuning
        if let Some(world) = session.world.as_mut() {
            if is_key_pressed(KeyCode::RightBracket) {
                let width = world.player.attack_box.x + ATTACK_RANGE_STEP;
                world.player.set_attack_range(width);
            }
            if is_key_pressed(KeyCode::LeftBracket) {
                let width = world.player.attack_box.x - ATTACK_RANGE_STEP;
                world.player.set_attack_range(width);
            }
        }

        if is_key_pressed(KeyCode::Enter) {
            let result = match session.phase {
                Phase::Ready => session.start(session.current_level),
                Phase::LevelComplete => session.advance(),
                Phase::GameOver | Phase::Victory => session.restart(),
                Phase::Running => Ok(()),
            };
            if let Err(err) = result {
                eprintln!("level transition failed: {err}");
            }
        }

        session.tick(&input, view);

        clear_background(Color::from_hex(0x333333));
        if let Some(world) = session.world.as_ref() {
            world.draw();
        }
        draw_hud(&session);
        draw_dialog(&session);
        draw_overlay(&session);

        next_frame().await;
    }
}

fn draw_hud(session: &Session) {
    let Some(hud) = session.hud() else {
        return;
    };
    draw_bar(20.0, 20.0, hud.health_fraction, Color::from_hex(0xff3e3e));
    draw_bar(20.0, 40.0, hud.xp_fraction, Color::from_hex(0xb46eff));
    draw_text(
        &format!(
            "LV {}  ATK {:.0}  DEF {:.0}  LIVES {}  STAGE {}",
            hud.level, hud.attack, hud.defense, hud.lives, hud.stage
        ),
        20.0,
        74.0,
        22.0,
        WHITE,
    );
}

fn draw_bar(x: f32, y: f32, fraction: f32, tint: Color) {
    draw_rectangle(x, y, HUD_BAR_WIDTH, HUD_BAR_HEIGHT, Color::from_hex(0x222222));
    draw_rectangle(x, y, HUD_BAR_WIDTH * fraction.clamp(0.0, 1.0), HUD_BAR_HEIGHT, tint);
}

fn draw_dialog(session: &Session) {
    let Some((name, line)) = session.dialog_text() else {
        return;
    };
    let width = screen_width() * 0.8;
    let height = 90.0;
    let x = (screen_width() - width) * 0.5;
    let y = screen_height() - height - 30.0;
    draw_rectangle(x, y, width, height, Color::new(0.0, 0.0, 0.0, 0.8));
    draw_text(name, x + 16.0, y + 28.0, 24.0, Color::from_hex(0xffcc00));
    draw_text(line, x + 16.0, y + 56.0, 22.0, WHITE);
    draw_text("Press E", x + width - 90.0, y + height - 12.0, 18.0, GRAY);
}

fn draw_overlay(session: &Session) {
    let (title, prompt) = match session.phase {
        Phase::Ready => ("RUSTYQUEST", "Press Enter to start"),
        Phase::LevelComplete => ("Level complete!", "Press Enter for the next level"),
        Phase::GameOver => ("Game over", "Press Enter to restart"),
        Phase::Victory => ("You completed the game!", "Press Enter to play again"),
        Phase::Running => return,
    };
    let cx = screen_width() * 0.5;
    let cy = screen_height() * 0.5;
    let title_size = measure_text(title, None, 48, 1.0);
    draw_text(title, cx - title_size.width * 0.5, cy - 20.0, 48.0, WHITE);
    let prompt_size = measure_text(prompt, None, 24, 1.0);
    draw_text(prompt, cx - prompt_size.width * 0.5, cy + 24.0, 24.0, GRAY);
}
