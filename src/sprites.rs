use crate::collision::Mask;
use crate::config;

/// CPU-side RGBA8 sprite with its collision silhouette.
#[derive(Clone, Debug)]
pub struct Sprite {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
    pub mask: Mask,
}

impl Sprite {
    fn from_pixels(width: usize, height: usize, rgba: Vec<u8>) -> Self {
        let mask = Mask::from_rgba(width, height, &rgba);
        Self {
            width,
            height,
            rgba,
            mask,
        }
    }

    fn flipped_vertically(&self) -> Self {
        let row_len = self.width * 4;
        let mut rgba = Vec::with_capacity(self.rgba.len());
        for row in self.rgba.chunks_exact(row_len).rev() {
            rgba.extend_from_slice(row);
        }
        Self::from_pixels(self.width, self.height, rgba)
    }
}

/// Every sprite the simulation and renderer need.
#[derive(Clone, Debug)]
pub struct SpriteSet {
    /// Collision silhouette of every agent (wings level).
    pub agent: Sprite,
    /// Wing animation frames: level, up, down.
    pub agent_frames: [Sprite; 3],
    pub obstacle_top: Sprite,
    pub obstacle_bottom: Sprite,
}

impl SpriteSet {
    pub fn generate() -> Self {
        let agent_frames = [agent_sprite(0), agent_sprite(-1), agent_sprite(1)];
        let obstacle_bottom = obstacle_sprite();
        let obstacle_top = obstacle_bottom.flipped_vertically();
        Self {
            agent: agent_frames[0].clone(),
            agent_frames,
            obstacle_top,
            obstacle_bottom,
        }
    }
}

const BODY: [u8; 4] = [245, 200, 66, 255];
const BODY_HI: [u8; 4] = [255, 225, 100, 255];
const WING: [u8; 4] = [215, 165, 35, 255];
const EYE: [u8; 4] = [255, 255, 255, 255];
const PUPIL: [u8; 4] = [20, 20, 20, 255];
const BEAK: [u8; 4] = [225, 75, 35, 255];
const PIPE_DARK: [u8; 4] = [74, 122, 26, 255];
const PIPE_MID: [u8; 4] = [100, 170, 40, 255];
const PIPE_HI: [u8; 4] = [145, 215, 62, 255];
const CAP_DARK: [u8; 4] = [60, 100, 20, 255];

struct Canvas {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

impl Canvas {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; width * height * 4],
        }
    }

    fn put(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            let i = (y as usize * self.width + x as usize) * 4;
            self.rgba[i..i + 4].copy_from_slice(&color);
        }
    }

    fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, color: [u8; 4]) {
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let dx = (x as f32 + 0.5 - cx) / rx;
                let dy = (y as f32 + 0.5 - cy) / ry;
                if dx * dx + dy * dy <= 1.0 {
                    self.put(x, y, color);
                }
            }
        }
    }

    fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: [u8; 4]) {
        for dy in 0..h {
            for dx in 0..w {
                self.put(x + dx, y + dy, color);
            }
        }
    }
}

/// `wing` shifts the wing up (-1) or down (+1); it stays inside the body outline
/// so every frame shares one silhouette.
fn agent_sprite(wing: i32) -> Sprite {
    let w = config::AGENT_SPRITE_WIDTH;
    let h = config::AGENT_SPRITE_HEIGHT;
    let mut c = Canvas::new(w, h);

    c.ellipse(30.0, 24.0, 28.0, 20.0, BODY);
    c.ellipse(30.0, 16.0, 18.0, 8.0, BODY_HI);
    c.ellipse(20.0, 26.0 + wing as f32 * 5.0, 12.0, 6.0, WING);
    c.ellipse(44.0, 16.0, 7.0, 7.0, EYE);
    c.rect(46, 14, 3, 4, PUPIL);
    c.rect(52, 24, 14, 8, BEAK);

    Sprite::from_pixels(w, h, c.rgba)
}

/// Bottom obstruction: lip at the top edge, narrower body below.
fn obstacle_sprite() -> Sprite {
    let w = config::OBSTACLE_SPRITE_WIDTH as i32;
    let h = config::OBSTACLE_SPRITE_HEIGHT as i32;
    let lip = config::OBSTACLE_LIP_HEIGHT as i32;
    let inset = config::OBSTACLE_BODY_INSET as i32;
    let mut c = Canvas::new(w as usize, h as usize);

    let body_w = w - inset * 2;
    c.rect(inset, lip, body_w, h - lip, PIPE_MID);
    c.rect(inset, lip, body_w / 6, h - lip, PIPE_DARK);
    c.rect(inset + body_w / 3, lip, body_w / 8, h - lip, PIPE_HI);

    c.rect(0, 0, w, lip, PIPE_MID);
    c.rect(0, lip - 6, w, 6, CAP_DARK);
    c.rect(w / 3, 0, w / 8, lip - 6, PIPE_HI);

    Sprite::from_pixels(w as usize, h as usize, c.rgba)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_frames_share_one_silhouette() {
        let set = SpriteSet::generate();
        for frame in &set.agent_frames {
            assert_eq!(frame.mask, set.agent.mask);
        }
        // Rounded body leaves the corners transparent.
        assert!(!set.agent.mask.get(0, 0));
        assert!(!set.agent.mask.get(config::AGENT_SPRITE_WIDTH - 1, 0));
        assert!(set.agent.mask.get(30, 24));
    }

    #[test]
    fn obstacle_lip_is_wider_than_body() {
        let set = SpriteSet::generate();
        let bottom = &set.obstacle_bottom.mask;
        assert!(bottom.get(0, 0));
        assert!(!bottom.get(0, config::OBSTACLE_LIP_HEIGHT + 10));
        assert!(bottom.get(config::OBSTACLE_BODY_INSET, config::OBSTACLE_LIP_HEIGHT + 10));

        let top = &set.obstacle_top.mask;
        assert!(top.get(0, config::OBSTACLE_SPRITE_HEIGHT - 1));
        assert!(!top.get(0, 0));
        let opaque = |m: &Mask| {
            (0..m.height)
                .flat_map(|y| (0..m.width).map(move |x| (x, y)))
                .filter(|&(x, y)| m.get(x, y))
                .count()
        };
        assert_eq!(opaque(top), opaque(bottom));
    }
}
