use ::rand::Rng;

use crate::config;

#[derive(Clone, Debug)]
pub struct Obstacle {
    pub x: f32,
    /// Upper edge of the gap; the opening spans `height..height + GAP_SIZE`.
    pub height: f32,
    /// Y of the top obstruction sprite's upper edge.
    pub top: f32,
    /// Y of the bottom obstruction sprite's upper edge.
    pub bottom: f32,
    pub direction: f32,
    pub passed: bool,
}

impl Obstacle {
    pub fn spawn(x: f32, rng: &mut impl Rng) -> Self {
        let height = rng.gen_range(config::GAP_MIN..=config::GAP_MAX) as f32;
        let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let mut obstacle = Self {
            x,
            height,
            top: 0.0,
            bottom: 0.0,
            direction,
            passed: false,
        };
        obstacle.set_bounds();
        obstacle
    }

    fn set_bounds(&mut self) {
        self.top = self.height - config::OBSTACLE_SPRITE_HEIGHT as f32;
        self.bottom = self.height + config::GAP_SIZE;
    }

    /// Scroll left; with oscillation on, also slide the gap and bounce at the range limits.
    pub fn advance(&mut self, oscillation: bool) {
        self.x -= config::OBSTACLE_SPEED;

        if oscillation {
            let min = config::GAP_MIN as f32;
            let max = config::GAP_MAX as f32;
            self.height += config::OSCILLATION_SPEED * self.direction;
            if self.height < min || self.height > max {
                self.height = self.height.clamp(min, max);
                self.direction = -self.direction;
            }
            self.set_bounds();
        }
    }

    pub fn off_screen(&self) -> bool {
        self.x + (config::OBSTACLE_SPRITE_WIDTH as f32) < 0.0
    }

    /// Right edge of the obstruction sprite.
    pub fn trailing_edge(&self) -> f32 {
        self.x + config::OBSTACLE_SPRITE_WIDTH as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn spawned_gap_stays_in_range_with_fixed_opening() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..500 {
            let o = Obstacle::spawn(config::FIRST_OBSTACLE_X, &mut rng);
            assert!(o.height >= config::GAP_MIN as f32 && o.height <= config::GAP_MAX as f32);
            let top_edge = o.top + config::OBSTACLE_SPRITE_HEIGHT as f32;
            assert_eq!(o.bottom - top_edge, config::GAP_SIZE);
            assert!(o.direction == 1.0 || o.direction == -1.0);
            assert!(!o.passed);
        }
    }

    #[test]
    fn advance_scrolls_without_oscillation() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut o = Obstacle::spawn(600.0, &mut rng);
        let height = o.height;
        o.advance(false);
        assert_eq!(o.x, 600.0 - config::OBSTACLE_SPEED);
        assert_eq!(o.height, height);
    }

    #[test]
    fn oscillation_reverses_exactly_at_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut o = Obstacle::spawn(600.0, &mut rng);
        o.height = config::GAP_MIN as f32 + 1.0;
        o.direction = -1.0;

        o.advance(true);
        assert_eq!(o.height, config::GAP_MIN as f32);
        assert_eq!(o.direction, 1.0);

        o.height = config::GAP_MAX as f32 - 1.0;
        o.direction = 1.0;
        o.advance(true);
        assert_eq!(o.height, config::GAP_MAX as f32);
        assert_eq!(o.direction, -1.0);
        assert_eq!(o.bottom, config::GAP_MAX as f32 + config::GAP_SIZE);
    }

    #[test]
    fn oscillating_gap_never_leaves_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut o = Obstacle::spawn(100_000.0, &mut rng);
        let mut reversals = 0;
        for _ in 0..2000 {
            let before = o.direction;
            o.advance(true);
            assert!(o.height >= config::GAP_MIN as f32 && o.height <= config::GAP_MAX as f32);
            if o.direction != before {
                reversals += 1;
                assert!(
                    o.height == config::GAP_MIN as f32 || o.height == config::GAP_MAX as f32
                );
            }
        }
        assert!(reversals > 0);
    }

    #[test]
    fn off_screen_only_after_fully_scrolled() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut o = Obstacle::spawn(0.0, &mut rng);
        o.x = -(config::OBSTACLE_SPRITE_WIDTH as f32);
        assert!(!o.off_screen());
        o.x -= 1.0;
        assert!(o.off_screen());
    }
}
