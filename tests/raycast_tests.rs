mod common;

use common::{pillar_room, ring_room};
use gridcaster::{cast_ray, Cell, Map, Player, Raycaster, WallProjector};
use std::f32::consts::{FRAC_PI_2, PI};

#[test]
fn cell_at_returns_configured_codes() {
    let map = pillar_room();
    for row in 0..map.rows() {
        for col in 0..map.cols() {
            let expected = if row == 2 && col == 2 {
                Cell::Wall(1)
            } else if row == 0 || col == 0 || row == 4 || col == 4 {
                Cell::Wall(6)
            } else {
                Cell::Empty
            };
            assert_eq!(map.cell_at(row, col), expected, "cell ({}, {})", row, col);
        }
    }
}

#[test]
fn pillar_hit_along_x_is_vertical() {
    let map = pillar_room();
    let player = Player::new(96.0, 160.0, 0.0, 100.0, 1.0);
    let rays = Raycaster::new(PI / 3.0, 64).cast_all(&player, &map);
    // an even ray count puts column n/2 exactly on the facing angle
    let center = &rays[32];

    assert_eq!(center.cell, Cell::Wall(1));
    assert!(center.hit_vertical);
    assert!((center.hit_x - 128.0).abs() < 1e-3);
}

#[test]
fn pillar_hit_along_y_is_horizontal() {
    let map = pillar_room();
    let ray = cast_ray(&map, 160.0, 96.0, FRAC_PI_2, FRAC_PI_2);

    assert_eq!(ray.cell, Cell::Wall(1));
    assert!(!ray.hit_vertical);
    assert!((ray.hit_y - 128.0).abs() < 1e-3);
    assert!((ray.distance - 32.0).abs() < 1e-3);
}

#[test]
fn open_space_ray_matches_analytic_distance() {
    let map = ring_room(7, 9);
    // wall face at x = 8 * 64
    let ray = cast_ray(&map, 100.0, 200.0, 0.0, 0.0);
    assert!((ray.distance - (512.0 - 100.0)).abs() < 1e-3);

    // wall face at y = 6 * 64 at 30 degrees off the x axis
    let angle = 60f32.to_radians();
    let ray = cast_ray(&map, 300.0, 200.0, angle, angle);
    let expected = (384.0 - 200.0) / angle.sin();
    assert!((ray.distance - expected).abs() < 1e-2, "{} vs {}", ray.distance, expected);
}

#[test]
fn corrected_distance_never_exceeds_raw() {
    let map = Map::default_level(64.0).unwrap();
    let player = Player::new(640.0, 416.0, 1.2, 100.0, 1.0);
    let caster = Raycaster::new(PI / 3.0, 120);
    let rays = caster.cast_all(&player, &map);

    for ray in &rays {
        assert!(ray.corrected_distance <= ray.distance + 1e-4);
        assert!(ray.distance > 0.0);
    }
    let center = &rays[60];
    assert!((center.corrected_distance - center.distance).abs() < 1e-3);
}

#[test]
fn strip_height_decreases_with_distance() {
    let projector = WallProjector::new(1280, 832, PI / 3.0, 64.0);
    let mut previous = f32::INFINITY;
    for step in 1..200 {
        let height = projector.strip_height(step as f32 * 7.5);
        assert!(height < previous, "distance {}", step as f32 * 7.5);
        previous = height;
    }
}

#[test]
fn every_ray_on_default_level_ends_on_a_wall() {
    let map = Map::default_level(64.0).unwrap();
    for step in 0..72 {
        let angle = step as f32 * 5f32.to_radians();
        let ray = cast_ray(&map, 640.0, 416.0, angle, angle);
        assert!(ray.cell.is_wall(), "angle step {}", step);
        assert!(map.is_inside_bounds(ray.hit_x, ray.hit_y));
    }
}

/// Texture u across adjacent columns only ever grows, except for the jump back
/// at a tile edge; returns how many tile edges were crossed
fn count_u_wraps(projector: &WallProjector, rays: &[gridcaster::Ray]) -> usize {
    let us: Vec<f32> = rays.iter().map(|ray| projector.texture_u(ray)).collect();
    let mut wraps = 0;
    for pair in us.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if next + 1e-4 >= prev {
            continue;
        }
        assert!(prev > 0.9 && next < 0.1, "u went back from {} to {}", prev, next);
        wraps += 1;
    }
    wraps
}

#[test]
fn texture_u_is_continuous_along_long_wall_from_both_sides() {
    // 8x12 room; the player looks at the top and bottom walls across 192 units
    let map = ring_room(8, 12);
    let projector = WallProjector::new(400, 300, PI / 3.0, 64.0);
    let caster = Raycaster::new(PI / 3.0, 400);

    for facing in [3.0 * FRAC_PI_2, FRAC_PI_2] {
        let player = Player::new(384.0, 256.0, facing, 100.0, 1.0);
        let rays = caster.cast_all(&player, &map);

        assert!(rays.iter().all(|ray| !ray.hit_vertical && ray.cell == Cell::Wall(6)));
        let wraps = count_u_wraps(&projector, &rays);
        assert!(wraps >= 3, "facing {}: only {} tile edges crossed", facing, wraps);
    }
}
