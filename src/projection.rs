use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::framebuffer::FrameBuffer;
use crate::map::Cell;
use crate::ray::Ray;
use crate::texture::{shade, TextureSet};

/// Corrected distances are clamped to this before projecting, so a ray that
/// starts on a wall face yields a tall but finite strip
pub const MIN_PROJECTION_DISTANCE: f32 = 1e-3;

/// Screen-space placement of one wall strip
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Unclipped strip height in pixels
    pub strip_height: f32,
    /// Unclipped top edge; negative when the strip overflows the screen
    pub top: f32,
    /// First drawn row, clipped to the screen
    pub start_row: usize,
    /// One past the last drawn row, clipped to the screen
    pub end_row: usize,
    /// Horizontal texture coordinate in [0, 1]
    pub texture_u: f32,
}

/// Turns ray hits into textured vertical strips
#[derive(Clone, Debug)]
pub struct WallProjector {
    screen_height: usize,
    tile_size: f32,
    projection_plane: f32,
    ceiling_color: u32,
    floor_color: u32,
    boundary_color: u32,
    side_shade: f32,
}

impl WallProjector {
    pub fn new(screen_width: usize, screen_height: usize, fov: f32, tile_size: f32) -> Self {
        let defaults = RenderConfig::default();
        WallProjector {
            screen_height,
            tile_size,
            projection_plane: (screen_width as f32 / 2.0) / (fov / 2.0).tan(),
            ceiling_color: defaults.ceiling_color,
            floor_color: defaults.floor_color,
            boundary_color: defaults.boundary_color,
            side_shade: defaults.side_shade,
        }
    }

    /// Apply colours and shading from configuration
    pub fn with_render_config(mut self, render: &RenderConfig) -> Self {
        self.ceiling_color = render.ceiling_color;
        self.floor_color = render.floor_color;
        self.boundary_color = render.boundary_color;
        self.side_shade = render.side_shade;
        self
    }

    /// Distance from the eye to the projection plane, in pixels
    pub fn projection_plane(&self) -> f32 {
        self.projection_plane
    }

    pub fn strip_height(&self, corrected_distance: f32) -> f32 {
        (self.tile_size / corrected_distance.max(MIN_PROJECTION_DISTANCE)) * self.projection_plane
    }

    /// Horizontal texture coordinate of a hit.
    ///
    /// Uses the fraction along the face that was hit. Faces seen while facing
    /// left (vertical hits) or down (horizontal hits) are mirrored so the
    /// coordinate always grows left to right on screen, which keeps a texture
    /// tiled along a long wall continuous from every side.
    pub fn texture_u(&self, ray: &Ray) -> f32 {
        let along = if ray.hit_vertical { ray.hit_y } else { ray.hit_x };
        let u = (along / self.tile_size).rem_euclid(1.0);
        let mirrored = if ray.hit_vertical {
            ray.facing.left()
        } else {
            ray.facing.down
        };
        if mirrored {
            1.0 - u
        } else {
            u
        }
    }

    pub fn project(&self, ray: &Ray) -> Projection {
        let screen_height = self.screen_height as f32;
        let strip_height = self.strip_height(ray.corrected_distance);
        let top = screen_height / 2.0 - strip_height / 2.0;
        let bottom = screen_height / 2.0 + strip_height / 2.0;

        Projection {
            strip_height,
            top,
            start_row: top.clamp(0.0, screen_height) as usize,
            end_row: bottom.clamp(0.0, screen_height) as usize,
            texture_u: self.texture_u(ray),
        }
    }

    /// Draw ceiling, wall strip and floor for one screen column
    pub fn render_column(
        &self,
        column: usize,
        ray: &Ray,
        textures: &TextureSet,
        fb: &mut FrameBuffer,
    ) -> Result<(), RenderError> {
        if column >= fb.width() {
            return Err(RenderError::ColumnOutOfRange {
                column,
                width: fb.width(),
            });
        }
        let texture = match ray.cell {
            Cell::Wall(code) => Some(textures.get(code).ok_or(RenderError::MissingTexture(code))?),
            Cell::Empty => None,
        };

        let x = column as i32;
        let projection = self.project(ray);

        for y in 0..projection.start_row {
            fb.set_pixel(x, y as i32, self.ceiling_color);
        }

        match texture {
            Some(texture) => {
                let tex_x = (projection.texture_u * texture.width() as f32) as usize;
                let scale = texture.height() as f32 / projection.strip_height;
                for y in projection.start_row..projection.end_row {
                    let tex_y = ((y as f32 - projection.top) * scale) as usize;
                    let mut color = texture.texel(tex_x, tex_y);
                    if ray.hit_vertical {
                        color = shade(color, self.side_shade);
                    }
                    fb.set_pixel(x, y as i32, color);
                }
            }
            None => {
                for y in projection.start_row..projection.end_row {
                    fb.set_pixel(x, y as i32, self.boundary_color);
                }
            }
        }

        for y in projection.end_row..self.screen_height {
            fb.set_pixel(x, y as i32, self.floor_color);
        }

        Ok(())
    }

    /// Render every ray into its matching column
    pub fn render_all(
        &self,
        rays: &[Ray],
        textures: &TextureSet,
        fb: &mut FrameBuffer,
    ) -> Result<(), RenderError> {
        for (column, ray) in rays.iter().enumerate() {
            self.render_column(column, ray, textures, fb)?;
        }
        Ok(())
    }
}
