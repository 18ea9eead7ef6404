use crate::map::{Cell, Map};
use crate::player::Player;
use crate::ray::{normalize_angle, Facing, Ray};

/// Direction components below this magnitude are treated as parallel to the
/// grid lines they would otherwise cross
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// Wall hit found by one of the two grid-line searches
#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    x: f32,
    y: f32,
    distance: f32,
    cell: Cell,
}

/// Casts one ray per screen column across a field of view
#[derive(Clone, Debug)]
pub struct Raycaster {
    fov: f32,
    num_rays: usize,
}

impl Raycaster {
    pub fn new(fov: f32, num_rays: usize) -> Self {
        Raycaster { fov, num_rays }
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn num_rays(&self) -> usize {
        self.num_rays
    }

    /// Angle of the ray for `column`, sweeping clockwise from the left edge
    pub fn ray_angle(&self, facing: f32, column: usize) -> f32 {
        facing - self.fov / 2.0 + self.fov * column as f32 / self.num_rays as f32
    }

    /// Cast every column into a fresh vector
    pub fn cast_all(&self, player: &Player, map: &Map) -> Vec<Ray> {
        let mut rays = Vec::with_capacity(self.num_rays);
        self.cast_into(player, map, &mut rays);
        rays
    }

    /// Cast every column, reusing the allocation of `rays`
    pub fn cast_into(&self, player: &Player, map: &Map, rays: &mut Vec<Ray>) {
        rays.clear();
        rays.extend((0..self.num_rays).map(|column| {
            let angle = self.ray_angle(player.angle, column);
            cast_ray(map, player.x, player.y, angle, player.angle)
        }));
    }
}

/// Find the nearest wall along one ray.
///
/// `view_angle` is the player's facing angle, used for the fisheye-corrected
/// distance. The horizontal and vertical grid-line searches run independently
/// and the closer candidate wins; on an exact tie the vertical one is kept.
/// When neither finds a wall before leaving the map, the ray ends on the map's
/// bounding rectangle with an `Empty` cell.
pub fn cast_ray(map: &Map, origin_x: f32, origin_y: f32, angle: f32, view_angle: f32) -> Ray {
    let angle = normalize_angle(angle);
    let facing = Facing::from_angle(angle);
    let dir_x = angle.cos();
    let dir_y = angle.sin();

    let horizontal = horizontal_hit(map, origin_x, origin_y, dir_x, dir_y, facing);
    let vertical = vertical_hit(map, origin_x, origin_y, dir_x, dir_y, facing);

    let (hit, hit_vertical) = match nearest(horizontal, vertical) {
        Some(found) => found,
        None => boundary_exit(map, origin_x, origin_y, dir_x, dir_y),
    };

    Ray {
        angle,
        hit_x: hit.x,
        hit_y: hit.y,
        distance: hit.distance,
        corrected_distance: hit.distance * (angle - view_angle).cos(),
        hit_vertical,
        cell: hit.cell,
        facing,
    }
}

/// Pick the closer candidate; the vertical one wins ties
fn nearest(horizontal: Option<Candidate>, vertical: Option<Candidate>) -> Option<(Candidate, bool)> {
    match (horizontal, vertical) {
        (Some(h), Some(v)) => {
            if v.distance <= h.distance {
                Some((v, true))
            } else {
                Some((h, false))
            }
        }
        (Some(h), None) => Some((h, false)),
        (None, Some(v)) => Some((v, true)),
        (None, None) => None,
    }
}

/// Tile index of a coordinate along a grid line.
///
/// A coordinate lying exactly on a tile edge belongs to the tile the ray is
/// heading into, so a ray through a grid corner checks the cell diagonally
/// beyond it.
fn grid_index(coord: f32, tile: f32, decreasing: bool) -> i32 {
    let index = (coord / tile).floor();
    if decreasing && index * tile == coord {
        index as i32 - 1
    } else {
        index as i32
    }
}

/// Step along horizontal grid lines (y = k * tile).
///
/// The line index is stepped as an integer and x is recomputed from it every
/// iteration, so long rays do not accumulate drift.
fn horizontal_hit(
    map: &Map,
    origin_x: f32,
    origin_y: f32,
    dir_x: f32,
    dir_y: f32,
    facing: Facing,
) -> Option<Candidate> {
    if dir_y.abs() < PARALLEL_EPSILON {
        return None;
    }

    let tile = map.tile_size();
    let origin_line = (origin_y / tile).floor() as i32;
    let (mut line, step) = if facing.down {
        (origin_line + 1, 1)
    } else {
        (origin_line, -1)
    };
    let slope = dir_x / dir_y;

    loop {
        let y = line as f32 * tile;
        let x = origin_x + (y - origin_y) * slope;
        if !map.is_inside_bounds(x, y) {
            return None;
        }

        // the cell just beyond the line in the direction of travel
        let row = if facing.down { line } else { line - 1 };
        let col = grid_index(x, tile, facing.left());
        match map.cell_checked(row, col)? {
            Cell::Empty => line += step,
            cell => {
                return Some(Candidate {
                    x,
                    y,
                    distance: (x - origin_x).hypot(y - origin_y),
                    cell,
                })
            }
        }
    }
}

/// Step along vertical grid lines (x = k * tile)
fn vertical_hit(
    map: &Map,
    origin_x: f32,
    origin_y: f32,
    dir_x: f32,
    dir_y: f32,
    facing: Facing,
) -> Option<Candidate> {
    if dir_x.abs() < PARALLEL_EPSILON {
        return None;
    }

    let tile = map.tile_size();
    let origin_line = (origin_x / tile).floor() as i32;
    let (mut line, step) = if facing.right {
        (origin_line + 1, 1)
    } else {
        (origin_line, -1)
    };
    let slope = dir_y / dir_x;

    loop {
        let x = line as f32 * tile;
        let y = origin_y + (x - origin_x) * slope;
        if !map.is_inside_bounds(x, y) {
            return None;
        }

        let col = if facing.right { line } else { line - 1 };
        let row = grid_index(y, tile, facing.up());
        match map.cell_checked(row, col)? {
            Cell::Empty => line += step,
            cell => {
                return Some(Candidate {
                    x,
                    y,
                    distance: (x - origin_x).hypot(y - origin_y),
                    cell,
                })
            }
        }
    }
}

/// Where the ray leaves the map rectangle; used only for open-bordered maps
fn boundary_exit(map: &Map, origin_x: f32, origin_y: f32, dir_x: f32, dir_y: f32) -> (Candidate, bool) {
    let t_x = if dir_x > PARALLEL_EPSILON {
        (map.width() - origin_x) / dir_x
    } else if dir_x < -PARALLEL_EPSILON {
        -origin_x / dir_x
    } else {
        f32::INFINITY
    };
    let t_y = if dir_y > PARALLEL_EPSILON {
        (map.height() - origin_y) / dir_y
    } else if dir_y < -PARALLEL_EPSILON {
        -origin_y / dir_y
    } else {
        f32::INFINITY
    };

    let t = t_x.min(t_y).max(0.0);
    let candidate = Candidate {
        x: origin_x + dir_x * t,
        y: origin_y + dir_y * t,
        distance: t,
        cell: Cell::Empty,
    };
    (candidate, t_x <= t_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn room() -> Map {
        Map::parse(
            "6 6 6 6 6\n\
             6 0 0 0 6\n\
             6 0 0 0 6\n\
             6 0 0 0 6\n\
             6 6 6 6 6\n",
            64.0,
        )
        .unwrap()
    }

    fn candidate(distance: f32) -> Candidate {
        Candidate { x: 0.0, y: 0.0, distance, cell: Cell::Wall(1) }
    }

    #[test]
    fn test_grid_index_on_tile_edge_follows_direction() {
        assert_eq!(grid_index(256.0, 64.0, false), 4);
        assert_eq!(grid_index(256.0, 64.0, true), 3);
        assert_eq!(grid_index(255.5, 64.0, true), 3);
        assert_eq!(grid_index(256.5, 64.0, true), 4);
        assert_eq!(grid_index(0.0, 64.0, true), -1);
    }

    #[test]
    fn test_corner_crossing_checks_diagonal_cell() {
        // up-left ray through the corner at (256, 256): the wall right of the
        // corner must not be reported by the horizontal search
        let map = Map::parse(
            "6 6 6 6 6 6 6\n\
             6 0 0 0 0 0 6\n\
             6 0 0 0 0 0 6\n\
             6 0 0 0 1 0 6\n\
             6 0 0 0 0 0 6\n\
             6 0 0 0 0 0 6\n\
             6 6 6 6 6 6 6\n",
            64.0,
        )
        .unwrap();
        let facing = Facing::from_angle(5.0 * std::f32::consts::FRAC_PI_4);
        let hit = horizontal_hit(&map, 300.0, 300.0, -1.0, -1.0, facing).unwrap();
        assert_eq!(hit.cell, Cell::Wall(6));
        assert!((hit.y - 64.0).abs() < 1e-3);
    }

    #[test]
    fn test_nearest_prefers_vertical_on_tie() {
        let (_, vertical) = nearest(Some(candidate(10.0)), Some(candidate(10.0))).unwrap();
        assert!(vertical);
    }

    #[test]
    fn test_nearest_picks_closer() {
        let (hit, vertical) = nearest(Some(candidate(5.0)), Some(candidate(10.0))).unwrap();
        assert!(!vertical);
        assert_eq!(hit.distance, 5.0);

        let (_, vertical) = nearest(None, Some(candidate(10.0))).unwrap();
        assert!(vertical);
        assert!(nearest(None, None).is_none());
    }

    #[test]
    fn test_cast_each_axis() {
        let map = room();
        // east, south, west, north from the room center
        let cases = [
            (0.0, 256.0, 160.0, true),
            (FRAC_PI_2, 160.0, 256.0, false),
            (PI, 64.0, 160.0, true),
            (3.0 * FRAC_PI_2, 160.0, 64.0, false),
        ];

        for (angle, hit_x, hit_y, vertical) in cases {
            let ray = cast_ray(&map, 160.0, 160.0, angle, angle);
            assert!((ray.distance - 96.0).abs() < 1e-3, "angle {}: {}", angle, ray.distance);
            assert!((ray.hit_x - hit_x).abs() < 1e-3, "angle {}: x {}", angle, ray.hit_x);
            assert!((ray.hit_y - hit_y).abs() < 1e-3, "angle {}: y {}", angle, ray.hit_y);
            assert_eq!(ray.hit_vertical, vertical, "angle {}", angle);
            assert_eq!(ray.cell, Cell::Wall(6));
        }
    }

    #[test]
    fn test_cast_diagonal() {
        let map = room();
        let ray = cast_ray(&map, 160.0, 160.0, FRAC_PI_4, FRAC_PI_4);
        let expected = 96.0 * std::f32::consts::SQRT_2;
        assert!((ray.distance - expected).abs() < 1e-2);
        assert!((ray.hit_x - 256.0).abs() < 1e-2);
        assert!((ray.hit_y - 256.0).abs() < 1e-2);
    }

    #[test]
    fn test_open_border_falls_back_to_boundary() {
        let map = Map::parse("0 0 0 0 0\n0 0 0 0 0\n0 0 0 0 0\n", 64.0).unwrap();
        let ray = cast_ray(&map, 100.0, 96.0, 0.0, 0.0);
        assert_eq!(ray.cell, Cell::Empty);
        assert!(ray.hit_vertical);
        assert!((ray.distance - 220.0).abs() < 1e-3);
        assert!((ray.hit_x - 320.0).abs() < 1e-3);
    }

    #[test]
    fn test_ray_angles_span_fov() {
        let caster = Raycaster::new(PI / 3.0, 4);
        assert!((caster.ray_angle(1.0, 0) - (1.0 - PI / 6.0)).abs() < 1e-6);
        assert!((caster.ray_angle(1.0, 2) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cast_all_one_ray_per_column() {
        let map = room();
        let player = Player::new(160.0, 160.0, 0.0, 100.0, 1.0);
        let caster = Raycaster::new(PI / 3.0, 32);
        let rays = caster.cast_all(&player, &map);
        assert_eq!(rays.len(), 32);
        assert!(rays.iter().all(|ray| ray.cell == Cell::Wall(6)));
    }
}
