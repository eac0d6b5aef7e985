use crate::agent::Agent;
use crate::obstacle::Obstacle;
use crate::sprites::SpriteSet;

/// Opaque-pixel silhouette of a sprite, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    pub width: usize,
    pub height: usize,
    bits: Vec<bool>,
}

impl Mask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width * height],
        }
    }

    /// Build from RGBA8 pixels; any non-zero alpha counts as opaque.
    pub fn from_rgba(width: usize, height: usize, rgba: &[u8]) -> Self {
        let bits = rgba.chunks_exact(4).map(|px| px[3] > 0).collect::<Vec<_>>();
        debug_assert_eq!(bits.len(), width * height);
        Self {
            width,
            height,
            bits,
        }
    }

    pub fn set(&mut self, x: usize, y: usize, opaque: bool) {
        if x < self.width && y < self.height {
            self.bits[y * self.width + x] = opaque;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.bits[y * self.width + x]
    }

    /// Whether `other`, placed at `offset` relative to this mask's origin,
    /// shares any opaque pixel with this mask.
    pub fn overlap(&self, other: &Mask, offset: (i32, i32)) -> bool {
        let (ox, oy) = offset;
        let x0 = ox.max(0);
        let y0 = oy.max(0);
        let x1 = (ox + other.width as i32).min(self.width as i32);
        let y1 = (oy + other.height as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }

        for y in y0..y1 {
            let self_row = y as usize * self.width;
            let other_row = (y - oy) as usize * other.width;
            for x in x0..x1 {
                if self.bits[self_row + x as usize]
                    && other.bits[other_row + (x - ox) as usize]
                {
                    return true;
                }
            }
        }
        false
    }
}

/// Pixel-accurate test of an agent against both obstructions of an obstacle.
pub fn collides(agent: &Agent, obstacle: &Obstacle, sprites: &SpriteSet) -> bool {
    let agent_x = agent.x.round() as i32;
    let agent_y = agent.y.round() as i32;
    let obstacle_x = obstacle.x.round() as i32;

    let top_offset = (obstacle_x - agent_x, obstacle.top.round() as i32 - agent_y);
    let bottom_offset = (obstacle_x - agent_x, obstacle.bottom.round() as i32 - agent_y);

    let agent_mask = &sprites.agent.mask;
    agent_mask.overlap(&sprites.obstacle_top.mask, top_offset)
        || agent_mask.overlap(&sprites.obstacle_bottom.mask, bottom_offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::DecisionSource;
    use crate::config;

    fn square(size: usize) -> Mask {
        let mut m = Mask::new(size, size);
        for y in 0..size {
            for x in 0..size {
                m.set(x, y, true);
            }
        }
        m
    }

    fn ring(size: usize) -> Mask {
        let mut m = Mask::new(size, size);
        for i in 0..size {
            m.set(i, 0, true);
            m.set(i, size - 1, true);
            m.set(0, i, true);
            m.set(size - 1, i, true);
        }
        m
    }

    #[test]
    fn overlap_is_symmetric_over_offsets() {
        let a = ring(9);
        let b = square(3);
        for dy in -12..12 {
            for dx in -12..12 {
                assert_eq!(
                    a.overlap(&b, (dx, dy)),
                    b.overlap(&a, (-dx, -dy)),
                    "offset ({dx}, {dy})"
                );
            }
        }
    }

    #[test]
    fn bounding_boxes_overlapping_is_not_enough() {
        // The square sits in the ring's hollow interior: boxes overlap, pixels don't.
        let a = ring(9);
        let b = square(3);
        assert!(!a.overlap(&b, (3, 3)));
        assert!(a.overlap(&b, (0, 3)));
        assert!(a.overlap(&b, (7, 7)));
        assert!(!a.overlap(&b, (9, 0)));
    }

    #[test]
    fn single_shared_pixel_reports_collision() {
        let mut a = Mask::new(4, 4);
        a.set(3, 3, true);
        let mut b = Mask::new(4, 4);
        b.set(0, 0, true);
        assert!(a.overlap(&b, (3, 3)));
        assert!(!a.overlap(&b, (3, 2)));
    }

    #[test]
    fn agent_in_gap_center_is_clear_but_touching_pipe_is_not() {
        let sprites = SpriteSet::generate();
        let mut obstacle = Obstacle {
            x: config::AGENT_START_X,
            height: 250.0,
            top: 0.0,
            bottom: 0.0,
            direction: 1.0,
            passed: false,
        };
        obstacle.top = obstacle.height - config::OBSTACLE_SPRITE_HEIGHT as f32;
        obstacle.bottom = obstacle.height + config::GAP_SIZE;

        let centered = config::AGENT_SPRITE_HEIGHT as f32 / 2.0;
        let in_gap = Agent::at(
            config::AGENT_START_X,
            obstacle.height + config::GAP_SIZE / 2.0 - centered,
            DecisionSource::Human,
        );
        assert!(!collides(&in_gap, &obstacle, &sprites));

        let into_bottom = Agent::at(config::AGENT_START_X, obstacle.bottom - 10.0, DecisionSource::Human);
        assert!(collides(&into_bottom, &obstacle, &sprites));

        let into_top = Agent::at(config::AGENT_START_X, obstacle.height - 20.0, DecisionSource::Human);
        assert!(collides(&into_top, &obstacle, &sprites));
    }

    #[test]
    fn agent_far_from_obstacle_never_collides() {
        let sprites = SpriteSet::generate();
        let obstacle = Obstacle {
            x: 450.0,
            height: 100.0,
            top: 100.0 - config::OBSTACLE_SPRITE_HEIGHT as f32,
            bottom: 300.0,
            direction: -1.0,
            passed: false,
        };
        let agent = Agent::new(DecisionSource::Human);
        assert!(!collides(&agent, &obstacle, &sprites));
    }
}
