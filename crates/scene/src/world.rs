use glam::{Vec2, Vec3};
use walkabout_common::Color;

/// Half-extent of the ground plane and the wall span.
const ARENA_SIZE: f32 = 32.0;
/// Wall height.
const WALL_HEIGHT: f32 = 5.0;
/// Tallest column the generator will produce.
const MAX_COLUMN_HEIGHT: u64 = 12;

/// The flat ground quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPlane {
    pub center: Vec3,
    pub size: Vec2,
    pub color: Color,
}

/// An axis-aligned solid box: walls, columns, the player marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    pub center: Vec3,
    pub size: Vec3,
    pub color: Color,
}

/// The complete static scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub ground: GroundPlane,
    pub walls: Vec<Cuboid>,
    pub columns: Vec<Cuboid>,
    pub seed: u64,
}

impl Scene {
    /// Generate the demo scene: fixed ground and walls plus `column_count`
    /// pseudo-random columns in a row. Deterministic per seed.
    pub fn generate(seed: u64, column_count: usize) -> Self {
        let ground = GroundPlane {
            center: Vec3::ZERO,
            size: Vec2::splat(ARENA_SIZE),
            color: Color::LIGHT_GRAY,
        };

        let half = ARENA_SIZE / 2.0;
        let walls = vec![
            Cuboid {
                center: Vec3::new(-half, WALL_HEIGHT / 2.0, 0.0),
                size: Vec3::new(1.0, WALL_HEIGHT, ARENA_SIZE),
                color: Color::BLUE,
            },
            Cuboid {
                center: Vec3::new(half, WALL_HEIGHT / 2.0, 0.0),
                size: Vec3::new(1.0, WALL_HEIGHT, ARENA_SIZE),
                color: Color::LIME,
            },
            Cuboid {
                center: Vec3::new(0.0, WALL_HEIGHT / 2.0, half),
                size: Vec3::new(ARENA_SIZE, WALL_HEIGHT, 1.0),
                color: Color::GOLD,
            },
        ];

        let mut state = seed;
        let columns = (0..column_count)
            .map(|i| {
                let height = (next(&mut state) % MAX_COLUMN_HEIGHT + 1) as f32;
                let color = Color::rgb(
                    (next(&mut state) % 256) as u8,
                    (next(&mut state) % 256) as u8,
                    (next(&mut state) % 256) as u8,
                );
                Cuboid {
                    center: Vec3::new(-14.0 + i as f32 * 2.0, height / 2.0, -10.0),
                    size: Vec3::new(2.0, height, 2.0),
                    color,
                }
            })
            .collect();

        tracing::debug!(seed, column_count, "generated scene");

        Self {
            ground,
            walls,
            columns,
            seed,
        }
    }
}

fn next(state: &mut u64) -> u64 {
    *state = splitmix64(*state);
    *state
}

/// Splitmix64: a fast, high-quality deterministic PRNG step function.
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_three_walls_and_ground() {
        let scene = Scene::generate(0, 12);
        assert_eq!(scene.walls.len(), 3);
        assert_eq!(scene.ground.size, Vec2::new(32.0, 32.0));
    }

    #[test]
    fn same_seed_same_scene() {
        let a = Scene::generate(42, 12);
        let b = Scene::generate(42, 12);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_diverge() {
        let a = Scene::generate(1, 12);
        let b = Scene::generate(2, 12);
        assert_ne!(a.columns, b.columns);
        // Fixed geometry is seed-independent.
        assert_eq!(a.walls, b.walls);
        assert_eq!(a.ground, b.ground);
    }

    #[test]
    fn columns_sit_on_the_ground() {
        let scene = Scene::generate(7, 12);
        assert_eq!(scene.columns.len(), 12);
        for column in &scene.columns {
            let height = column.size.y;
            assert!((1.0..=12.0).contains(&height));
            // Centered at half height, so the base rests at y = 0.
            assert_eq!(column.center.y, height / 2.0);
            assert_eq!(column.center.z, -10.0);
        }
    }

    #[test]
    fn columns_line_up_with_fixed_spacing() {
        let scene = Scene::generate(3, 4);
        let xs: Vec<f32> = scene.columns.iter().map(|c| c.center.x).collect();
        assert_eq!(xs, vec![-14.0, -12.0, -10.0, -8.0]);
    }

    #[test]
    fn zero_columns_is_valid() {
        let scene = Scene::generate(9, 0);
        assert!(scene.columns.is_empty());
    }
}
