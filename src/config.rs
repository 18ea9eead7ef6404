use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub frame: FrameConfig,
    #[serde(default)]
    pub textures: TextureConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub minimap: MinimapConfig,
}

#[derive(Debug, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_title")]
    pub title: String,
    /// Also the number of rays cast per frame
    #[serde(default = "default_window_width")]
    pub width: usize,
    #[serde(default = "default_window_height")]
    pub height: usize,
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_fov_degrees")]
    pub fov_degrees: f32,
}

#[derive(Debug, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    /// Text layout to load instead of the built-in level
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlayerConfig {
    /// Start position in world units; the map centre when unset
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
    #[serde(default = "default_angle_degrees")]
    pub angle_degrees: f32,
    #[serde(default = "default_walk_speed")]
    pub walk_speed: f32,
    #[serde(default = "default_turn_speed_degrees")]
    pub turn_speed_degrees: f32,
    #[serde(default = "default_player_width")]
    pub width: f32,
    #[serde(default = "default_player_height")]
    pub height: f32,
}

#[derive(Debug, Deserialize)]
pub struct FrameConfig {
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
}

#[derive(Debug, Deserialize)]
pub struct TextureConfig {
    /// Generate wall textures instead of loading files
    #[serde(default)]
    pub procedural: bool,
    #[serde(default = "default_texture_files")]
    pub files: Vec<TextureFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextureFile {
    pub code: u8,
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_ceiling_color")]
    pub ceiling_color: u32,
    #[serde(default = "default_floor_color")]
    pub floor_color: u32,
    /// Flat colour for rays that leave an open-bordered map
    #[serde(default = "default_boundary_color")]
    pub boundary_color: u32,
    /// Brightness factor for east/west wall faces
    #[serde(default = "default_side_shade")]
    pub side_shade: f32,
}

#[derive(Debug, Deserialize)]
pub struct MinimapConfig {
    #[serde(default = "default_minimap_enabled")]
    pub enabled: bool,
    #[serde(default = "default_minimap_scale")]
    pub scale: f32,
    /// Draw every n-th ray on the overlay
    #[serde(default = "default_minimap_ray_stride")]
    pub ray_stride: usize,
}

// Default values
fn default_window_title() -> String { "Gridcaster".to_string() }
fn default_window_width() -> usize { 1280 }
fn default_window_height() -> usize { 832 }
fn default_fov_degrees() -> f32 { 60.0 }
fn default_tile_size() -> f32 { 64.0 }
fn default_angle_degrees() -> f32 { 90.0 }
fn default_walk_speed() -> f32 { 100.0 }
fn default_turn_speed_degrees() -> f32 { 45.0 }
fn default_player_width() -> f32 { 1.0 }
fn default_player_height() -> f32 { 30.0 }
fn default_target_fps() -> u32 { 30 }
fn default_ceiling_color() -> u32 { 0xFF33_3333 }
fn default_floor_color() -> u32 { 0xFF77_7777 }
fn default_boundary_color() -> u32 { 0xFF10_1010 }
fn default_side_shade() -> f32 { 0.7 }
fn default_minimap_enabled() -> bool { true }
fn default_minimap_scale() -> f32 { 0.25 }
fn default_minimap_ray_stride() -> usize { 1 }

fn default_texture_files() -> Vec<TextureFile> {
    [
        "redbrick",
        "purplestone",
        "mossystone",
        "graystone",
        "colorstone",
        "bluestone",
        "wood",
        "eagle",
    ]
    .iter()
    .enumerate()
    .map(|(i, name)| TextureFile {
        code: i as u8 + 1,
        path: format!("assets/textures/{}.png", name),
    })
    .collect()
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_window_title(),
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: default_fov_degrees(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_size: default_tile_size(),
            path: None,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            angle_degrees: default_angle_degrees(),
            walk_speed: default_walk_speed(),
            turn_speed_degrees: default_turn_speed_degrees(),
            width: default_player_width(),
            height: default_player_height(),
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            target_fps: default_target_fps(),
        }
    }
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            procedural: false,
            files: default_texture_files(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            ceiling_color: default_ceiling_color(),
            floor_color: default_floor_color(),
            boundary_color: default_boundary_color(),
            side_shade: default_side_shade(),
        }
    }
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            enabled: default_minimap_enabled(),
            scale: default_minimap_scale(),
            ray_stride: default_minimap_ray_stride(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            map: MapConfig::default(),
            player: PlayerConfig::default(),
            frame: FrameConfig::default(),
            textures: TextureConfig::default(),
            render: RenderConfig::default(),
            minimap: MinimapConfig::default(),
        }
    }
}

impl CameraConfig {
    pub fn fov(&self) -> f32 {
        self.fov_degrees.to_radians()
    }
}

impl FrameConfig {
    /// Minimum wall-clock time per frame, `1000 / target_fps` whole milliseconds
    pub fn frame_budget(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.target_fps.max(1)))
    }
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load configuration from `path`, or use defaults if it is missing or malformed
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}", path.display(), e);
                    warn!("Using default configuration");
                    Config::default()
                }
            },
            Err(_) => {
                info!("No {} found, using default configuration", path.display());
                Config::default()
            }
        }
    }
}
