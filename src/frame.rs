use crate::config::{Config, MapConfig};
use crate::error::{RenderError, StartupError};
use crate::framebuffer::FrameBuffer;
use crate::map::Map;
use crate::minimap::Minimap;
use crate::player::{MotionInput, Player};
use crate::projection::WallProjector;
use crate::ray::Ray;
use crate::raycast::Raycaster;
use crate::texture::TextureSet;
use log::{debug, info, warn};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

/// Everything polled from the keyboard and window for one frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub motion: MotionInput,
    /// Escape or a window close request
    pub quit: bool,
    /// Copy a map snapshot to the clipboard
    pub snapshot: bool,
}

/// Caps the frame rate and measures the time between frames
pub struct FrameClock {
    budget: Duration,
    last: Instant,
    frames: u32,
    window_start: Instant,
}

impl FrameClock {
    pub fn new(budget: Duration) -> Self {
        let now = Instant::now();
        FrameClock {
            budget,
            last: now,
            frames: 0,
            window_start: now,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Sleep out whatever is left of the frame budget, then return the seconds
    /// elapsed since the previous tick
    pub fn tick(&mut self) -> f32 {
        let elapsed = self.last.elapsed();
        if elapsed < self.budget {
            thread::sleep(self.budget - elapsed);
        }

        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;

        self.frames += 1;
        let window = now.duration_since(self.window_start);
        if window >= Duration::from_secs(1) {
            debug!(
                "{:.1} fps, {:.2} ms/frame",
                self.frames as f32 / window.as_secs_f32(),
                window.as_secs_f32() * 1000.0 / self.frames as f32
            );
            self.frames = 0;
            self.window_start = now;
        }

        dt.as_secs_f32()
    }
}

/// Load the configured layout, or the built-in level
pub fn load_map(config: &MapConfig) -> Result<Map, StartupError> {
    let map = match &config.path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| StartupError::MapFile {
                path: Path::new(path).to_path_buf(),
                source,
            })?;
            let map = Map::parse(&text, config.tile_size)?;
            info!("Loaded {}x{} map from {}", map.rows(), map.cols(), path);
            map
        }
        None => {
            let map = Map::default_level(config.tile_size)?;
            info!("Using built-in {}x{} map", map.rows(), map.cols());
            map
        }
    };

    if !map.has_solid_border() {
        warn!("Map border is not solid; rays leaving the map end on its bounding box");
    }
    Ok(map)
}

/// Largest frame edge; the presented image uses 16-bit dimensions
pub const MAX_SCREEN_EDGE: usize = u16::MAX as usize;

/// Simulation context owned by the frame driver.
/// Holds the level, the player, the per-frame rays, the wall textures and the
/// frame buffer; each phase borrows what it needs.
pub struct Simulation {
    map: Map,
    player: Player,
    rays: Vec<Ray>,
    raycaster: Raycaster,
    projector: WallProjector,
    minimap: Option<Minimap>,
    textures: TextureSet,
    frame: FrameBuffer,
    running: bool,
    failure: Option<RenderError>,
}

impl Simulation {
    /// Build the whole context from configuration, loading map and textures
    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let map = load_map(&config.map)?;
        let textures = TextureSet::load(&config.textures, &map.wall_codes())?;
        Self::with_textures(config, map, textures)
    }

    /// Build the context around an already loaded map and texture set
    pub fn with_textures(config: &Config, map: Map, textures: TextureSet) -> Result<Self, StartupError> {
        let (width, height) = (config.window.width, config.window.height);
        if !(1..=MAX_SCREEN_EDGE).contains(&width) || !(1..=MAX_SCREEN_EDGE).contains(&height) {
            return Err(StartupError::InvalidScreen { width, height });
        }
        let fov_degrees = config.camera.fov_degrees;
        if !(fov_degrees > 0.0 && fov_degrees < 180.0) {
            return Err(StartupError::InvalidFov(fov_degrees));
        }
        if let Some(&code) = map.wall_codes().iter().find(|&&code| textures.get(code).is_none()) {
            return Err(crate::error::TextureError::Missing(code).into());
        }

        let (center_x, center_y) = map.center();
        let start_x = config.player.x.unwrap_or(center_x);
        let start_y = config.player.y.unwrap_or(center_y);
        if map.collides_at(start_x, start_y) {
            return Err(StartupError::PlayerInsideWall { x: start_x, y: start_y });
        }
        let player = Player::new(
            start_x,
            start_y,
            config.player.angle_degrees.to_radians(),
            config.player.walk_speed,
            config.player.turn_speed_degrees.to_radians(),
        )
        .with_extent(config.player.width, config.player.height);

        let fov = config.camera.fov();
        let projector = WallProjector::new(width, height, fov, map.tile_size())
            .with_render_config(&config.render);
        let minimap = config
            .minimap
            .enabled
            .then(|| Minimap::new(config.minimap.scale).with_ray_stride(config.minimap.ray_stride));

        Ok(Simulation {
            map,
            player,
            rays: Vec::with_capacity(width),
            raycaster: Raycaster::new(fov, width),
            projector,
            minimap,
            textures,
            frame: FrameBuffer::new(width, height),
            running: true,
            failure: None,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Let the current iteration finish, then leave the loop
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stop after a frame failed; the error is handed back by `shutdown`
    pub fn abort(&mut self, error: RenderError) {
        self.failure.get_or_insert(error);
        self.running = false;
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn update(&mut self, dt: f32, motion: MotionInput) {
        self.player.update(dt, motion, &self.map);
    }

    pub fn cast(&mut self) {
        self.raycaster.cast_into(&self.player, &self.map, &mut self.rays);
    }

    pub fn render(&mut self) -> Result<(), RenderError> {
        self.projector.render_all(&self.rays, &self.textures, &mut self.frame)?;
        if let Some(minimap) = &self.minimap {
            minimap.render(&self.map, &self.player, &self.rays, &mut self.frame);
        }
        Ok(())
    }

    /// Update, cast and render one frame
    pub fn step(&mut self, dt: f32, motion: MotionInput) -> Result<(), RenderError> {
        self.update(dt, motion);
        self.cast();
        self.render()
    }

    /// Map layout with the player's pose on a comment line, loadable as a map file
    pub fn snapshot_text(&self) -> String {
        let (row, col) = self.player.cell(&self.map);
        format!(
            "# player row={} col={} x={:.2} y={:.2} angle={:.1}deg\n{}",
            row,
            col,
            self.player.x,
            self.player.y,
            self.player.angle.to_degrees(),
            self.map.to_layout_string()
        )
    }

    /// Release textures and the frame buffer.
    /// Returns the error that aborted the loop, if any.
    pub fn shutdown(mut self) -> Result<(), RenderError> {
        let count = self.textures.len();
        self.textures.release();
        self.rays.clear();
        drop(self.frame);
        info!("Released {} wall textures and the frame buffer", count);
        match self.failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
