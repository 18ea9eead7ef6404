pub mod config;
pub mod error;
pub mod frame;
pub mod framebuffer;
pub mod map;
pub mod minimap;
pub mod player;
pub mod projection;
pub mod ray;
pub mod raycast;
pub mod texture;

pub use config::Config;
pub use error::{MapError, RenderError, StartupError, TextureError};
pub use frame::{FrameClock, InputState, Simulation};
pub use framebuffer::FrameBuffer;
pub use map::{Cell, Map};
pub use player::{Axis, MotionInput, Player};
pub use projection::WallProjector;
pub use ray::{normalize_angle, Facing, Ray};
pub use raycast::{cast_ray, Raycaster};
pub use texture::{Texture, TextureSet};
