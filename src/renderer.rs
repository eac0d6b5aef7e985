use macroquad::prelude::*;

use crate::config;
use crate::simulation::{AgentView, FrameSnapshot, ObstacleView};
use crate::sprites::{Sprite, SpriteSet};

const SKY_COLOR: Color = Color::new(0.44, 0.77, 0.81, 1.0);
const SKYLINE_COLOR: Color = Color::new(0.82, 0.93, 0.86, 1.0);
const GROUND_COLOR: Color = Color::new(0.87, 0.84, 0.58, 1.0);
const GRASS_LIGHT: Color = Color::new(0.60, 0.87, 0.33, 1.0);
const GRASS_DARK: Color = Color::new(0.45, 0.75, 0.18, 1.0);

const GRASS_HEIGHT: f32 = 16.0;
const GRASS_STRIPE: f32 = 24.0;

/// GPU copies of the procedural sprites.
pub struct SceneTextures {
    agent_frames: [Texture2D; 3],
    obstacle_top: Texture2D,
    obstacle_bottom: Texture2D,
}

impl SceneTextures {
    pub fn new(sprites: &SpriteSet) -> Self {
        Self {
            agent_frames: [
                texture_from(&sprites.agent_frames[0]),
                texture_from(&sprites.agent_frames[1]),
                texture_from(&sprites.agent_frames[2]),
            ],
            obstacle_top: texture_from(&sprites.obstacle_top),
            obstacle_bottom: texture_from(&sprites.obstacle_bottom),
        }
    }
}

fn texture_from(sprite: &Sprite) -> Texture2D {
    let texture = Texture2D::from_rgba8(sprite.width as u16, sprite.height as u16, &sprite.rgba);
    texture.set_filter(FilterMode::Nearest);
    texture
}

/// Presentation-only state that persists across frames.
#[derive(Default)]
pub struct RenderState {
    pub ground_offset: f32,
}

impl RenderState {
    /// Scroll the ground by one tick, wrapping at the stripe period.
    pub fn advance_ground(&mut self) {
        self.ground_offset = (self.ground_offset + config::GROUND_SCROLL_SPEED) % (GRASS_STRIPE * 2.0);
    }
}

/// Wing frame for an agent: 0, 1, 2, 1 repeating, held at 1 while diving.
pub fn wing_frame(tick: u64, tilt: f32) -> usize {
    if tilt <= config::DIVE_FRAME_TILT {
        return 1;
    }
    match (tick / config::ANIMATION_TICKS) % 4 {
        0 => 0,
        1 | 3 => 1,
        _ => 2,
    }
}

/// Draw one frame of the scene. `alpha` interpolates agents between ticks.
/// Score and counters live in the egui strip, not here.
pub fn draw(snapshot: &FrameSnapshot, textures: &SceneTextures, render: &RenderState, alpha: f32) {
    clear_background(SKY_COLOR);
    draw_skyline();

    for obstacle in &snapshot.obstacles {
        draw_obstacle(obstacle, textures);
    }

    draw_ground(render.ground_offset);

    for agent in &snapshot.agents {
        draw_agent(agent, snapshot.tick, textures, alpha);
    }
}

fn draw_skyline() {
    let base = config::GROUND_Y - 60.0;
    for i in 0..6 {
        let x = i as f32 * 90.0 + 20.0;
        let h = 30.0 + ((i * 37) % 50) as f32;
        draw_rectangle(x, base - h, 60.0, h + 60.0, SKYLINE_COLOR);
    }
}

fn draw_obstacle(obstacle: &ObstacleView, textures: &SceneTextures) {
    draw_texture(&textures.obstacle_top, obstacle.x, obstacle.top, WHITE);
    draw_texture(&textures.obstacle_bottom, obstacle.x, obstacle.bottom, WHITE);
}

fn draw_ground(offset: f32) {
    let y = config::GROUND_Y;
    draw_rectangle(0.0, y, config::WINDOW_WIDTH, config::WINDOW_HEIGHT - y, GROUND_COLOR);

    let mut x = -offset;
    let mut light = true;
    while x < config::WINDOW_WIDTH {
        let color = if light { GRASS_LIGHT } else { GRASS_DARK };
        draw_rectangle(x, y, GRASS_STRIPE, GRASS_HEIGHT, color);
        x += GRASS_STRIPE;
        light = !light;
    }
    draw_line(0.0, y, config::WINDOW_WIDTH, y, 2.0, DARKGREEN);
}

fn draw_agent(agent: &AgentView, tick: u64, textures: &SceneTextures, alpha: f32) {
    let y = agent.prev_y + (agent.y - agent.prev_y) * alpha;
    let texture = &textures.agent_frames[wing_frame(tick, agent.tilt)];
    draw_texture_ex(
        texture,
        agent.x,
        y,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(
                config::AGENT_SPRITE_WIDTH as f32,
                config::AGENT_SPRITE_HEIGHT as f32,
            )),
            // Screen y points down, so a nose-up tilt is a counter-clockwise turn.
            rotation: -agent.tilt.to_radians(),
            ..Default::default()
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wing_cycle_repeats_every_four_phases() {
        let frames: Vec<usize> = (0..8)
            .map(|phase| wing_frame(phase * config::ANIMATION_TICKS, 0.0))
            .collect();
        assert_eq!(frames, vec![0, 1, 2, 1, 0, 1, 2, 1]);
        assert_eq!(wing_frame(config::ANIMATION_TICKS - 1, 0.0), 0);
    }

    #[test]
    fn diving_agent_holds_the_middle_frame() {
        assert_eq!(wing_frame(0, -80.0), 1);
        assert_eq!(wing_frame(10, -90.0), 1);
        assert_eq!(wing_frame(10, -79.0), 2);
    }

    #[test]
    fn ground_scroll_wraps() {
        let mut render = RenderState::default();
        for _ in 0..1000 {
            render.advance_ground();
            assert!(render.ground_offset >= 0.0 && render.ground_offset < GRASS_STRIPE * 2.0);
        }
    }
}
