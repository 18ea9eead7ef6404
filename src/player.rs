use crate::map::Map;
use crate::ray::normalize_angle;

/// Tri-state direction signal derived from a pair of opposing keys
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Axis {
    Negative,
    #[default]
    Neutral,
    Positive,
}

impl Axis {
    /// Combine two opposing key states; both or neither held gives `Neutral`
    pub fn from_keys(negative: bool, positive: bool) -> Self {
        match (negative, positive) {
            (true, false) => Axis::Negative,
            (false, true) => Axis::Positive,
            _ => Axis::Neutral,
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Axis::Negative => -1.0,
            Axis::Neutral => 0.0,
            Axis::Positive => 1.0,
        }
    }
}

/// Walk and turn directions for one frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MotionInput {
    /// Positive walks forward along the facing angle
    pub walk: Axis,
    /// Positive turns clockwise (right on screen)
    pub turn: Axis,
}

/// Player pose and motion parameters
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    /// Facing angle in radians, kept in [0, 2π)
    pub angle: f32,
    /// World units per second
    pub walk_speed: f32,
    /// Radians per second
    pub turn_speed: f32,
    /// Minimap display extent only; collision is point based
    pub width: f32,
    pub height: f32,
}

impl Player {
    pub fn new(x: f32, y: f32, angle: f32, walk_speed: f32, turn_speed: f32) -> Self {
        Player {
            x,
            y,
            angle: normalize_angle(angle),
            walk_speed,
            turn_speed,
            width: 1.0,
            height: 30.0,
        }
    }

    /// Set the minimap display extent
    pub fn with_extent(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Advance the pose by `dt` seconds.
    ///
    /// Rotation always commits. The step along the new facing direction is
    /// rejected as a whole when its end point collides with the map.
    pub fn update(&mut self, dt: f32, input: MotionInput, map: &Map) {
        if input.turn != Axis::Neutral {
            self.angle = normalize_angle(self.angle + input.turn.sign() * self.turn_speed * dt);
        }

        if input.walk == Axis::Neutral {
            return;
        }

        let step = input.walk.sign() * self.walk_speed * dt;
        let new_x = self.x + self.angle.cos() * step;
        let new_y = self.y + self.angle.sin() * step;

        if !map.collides_at(new_x, new_y) {
            self.x = new_x;
            self.y = new_y;
        }
    }

    /// Cell the player stands in as (row, col)
    pub fn cell(&self, map: &Map) -> (i32, i32) {
        let tile = map.tile_size();
        ((self.y / tile).floor() as i32, (self.x / tile).floor() as i32)
    }
}
