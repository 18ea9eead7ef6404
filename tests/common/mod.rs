#![allow(dead_code)]

use gridcaster::{cast_ray, Cell, Map, Ray};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One ray scenario: a layout, a ray origin and direction, and the wall it must hit
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RayTestData {
    #[serde(rename = "testName")]
    pub test_name: String,
    #[serde(rename = "tileSize")]
    pub tile_size: f32,
    pub layout: Vec<Vec<u8>>,
    #[serde(rename = "originX")]
    pub origin_x: f32,
    #[serde(rename = "originY")]
    pub origin_y: f32,
    #[serde(rename = "angleDegrees")]
    pub angle_degrees: f32,
    /// 0 means the ray must leave through the map's bounding box
    #[serde(rename = "expectedCode")]
    pub expected_code: u8,
    /// Left out when both grid-line searches reach the wall at the same point
    #[serde(rename = "expectedVertical")]
    pub expected_vertical: Option<bool>,
    #[serde(rename = "expectedDistance")]
    pub expected_distance: f32,
    pub tolerance: f32,
}

/// Load a scenario from a JSON file
pub fn load_test(path: &Path) -> Result<RayTestData, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    let test_data: RayTestData = serde_json::from_str(&contents)?;
    Ok(test_data)
}

/// The 5x5 room bordered by code 6 with a single code 1 pillar in the middle
pub fn pillar_room() -> Map {
    Map::parse(
        "6 6 6 6 6\n\
         6 0 0 0 6\n\
         6 0 1 0 6\n\
         6 0 0 0 6\n\
         6 6 6 6 6\n",
        64.0,
    )
    .unwrap()
}

/// An empty room ringed by code 6
pub fn ring_room(rows: usize, cols: usize) -> Map {
    let layout: Vec<Vec<u8>> = (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| {
                    if row == 0 || col == 0 || row == rows - 1 || col == cols - 1 {
                        6
                    } else {
                        0
                    }
                })
                .collect()
        })
        .collect();
    Map::from_codes(&layout, 64.0).unwrap()
}

/// Flip scenario horizontally (mirror left-right)
pub fn flip_test_horizontal(test: &RayTestData) -> RayTestData {
    let width = test.layout[0].len() as f32 * test.tile_size;
    RayTestData {
        test_name: format!("{}_h_flip", test.test_name),
        layout: test
            .layout
            .iter()
            .map(|row| row.iter().rev().copied().collect())
            .collect(),
        origin_x: width - test.origin_x,
        angle_degrees: 180.0 - test.angle_degrees,
        ..test.clone()
    }
}

/// Flip scenario vertically (mirror top-bottom)
pub fn flip_test_vertical(test: &RayTestData) -> RayTestData {
    let height = test.layout.len() as f32 * test.tile_size;
    RayTestData {
        test_name: format!("{}_v_flip", test.test_name),
        layout: test.layout.iter().rev().cloned().collect(),
        origin_y: height - test.origin_y,
        angle_degrees: -test.angle_degrees,
        ..test.clone()
    }
}

/// Flip scenario both ways
pub fn flip_test_both(test: &RayTestData) -> RayTestData {
    let mut flipped = flip_test_vertical(&flip_test_horizontal(test));
    flipped.test_name = format!("{}_hv_flip", test.test_name);
    flipped
}

/// Cast the scenario's ray; the view angle equals the ray angle
pub fn cast_test_ray(test: &RayTestData) -> Ray {
    let map = Map::from_codes(&test.layout, test.tile_size).unwrap();
    let angle = test.angle_degrees.to_radians();
    cast_ray(&map, test.origin_x, test.origin_y, angle, angle)
}

/// Describe the first mismatch between a cast and the scenario, if any
pub fn check_ray(test: &RayTestData, ray: &Ray) -> Option<String> {
    let expected_cell = Cell::from_code(test.expected_code);
    if ray.cell != expected_cell {
        return Some(format!("cell {:?}, expected {:?}", ray.cell, expected_cell));
    }
    if let Some(vertical) = test.expected_vertical {
        if ray.hit_vertical != vertical {
            return Some(format!("hit_vertical {}, expected {}", ray.hit_vertical, vertical));
        }
    }
    if (ray.distance - test.expected_distance).abs() > test.tolerance {
        return Some(format!(
            "distance {}, expected {} +/- {}",
            ray.distance, test.expected_distance, test.tolerance
        ));
    }
    None
}

/// Run a scenario in all four mirror variants; returns the first failing variant
pub fn run_test(test_data: &RayTestData) -> Result<(), String> {
    let variants = [
        test_data.clone(),
        flip_test_horizontal(test_data),
        flip_test_vertical(test_data),
        flip_test_both(test_data),
    ];

    for variant in &variants {
        let ray = cast_test_ray(variant);
        if let Some(reason) = check_ray(variant, &ray) {
            return Err(format!("[{}] {}", variant.test_name, reason));
        }
    }
    Ok(())
}
