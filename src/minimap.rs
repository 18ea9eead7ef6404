use crate::framebuffer::FrameBuffer;
use crate::map::Map;
use crate::player::Player;
use crate::ray::Ray;
use crate::texture::argb;

const WALL_COLOR: u32 = argb(255, 255, 255);
const FLOOR_COLOR: u32 = argb(0, 0, 0);
const RAY_COLOR: u32 = argb(255, 0, 0);
const PLAYER_COLOR: u32 = argb(255, 255, 0);

/// Top-down overlay drawn in the top-left corner of the frame
#[derive(Clone, Debug)]
pub struct Minimap {
    scale: f32,
    /// Draw every n-th ray so the overlay stays readable
    ray_stride: usize,
}

impl Minimap {
    pub fn new(scale: f32) -> Self {
        Minimap { scale, ray_stride: 1 }
    }

    pub fn with_ray_stride(mut self, stride: usize) -> Self {
        self.ray_stride = stride.max(1);
        self
    }

    fn to_screen(&self, world: f32) -> i32 {
        (world * self.scale) as i32
    }

    pub fn render(&self, map: &Map, player: &Player, rays: &[Ray], fb: &mut FrameBuffer) {
        let tile = map.tile_size();
        let tile_px = self.to_screen(tile).max(1);

        for row in 0..map.rows() {
            for col in 0..map.cols() {
                let color = if map.cell_at(row, col).is_wall() {
                    WALL_COLOR
                } else {
                    FLOOR_COLOR
                };
                fb.fill_rect(
                    self.to_screen(col as f32 * tile),
                    self.to_screen(row as f32 * tile),
                    tile_px,
                    tile_px,
                    color,
                );
            }
        }

        let (px, py) = (self.to_screen(player.x), self.to_screen(player.y));
        for ray in rays.iter().step_by(self.ray_stride) {
            fb.draw_line(px, py, self.to_screen(ray.hit_x), self.to_screen(ray.hit_y), RAY_COLOR);
        }

        fb.fill_rect(
            px,
            py,
            self.to_screen(player.width).max(1),
            self.to_screen(player.height).max(1),
            PLAYER_COLOR,
        );
    }
}
