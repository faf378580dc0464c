//! Static world content for the walkabout demo.
//!
//! # Invariants
//! - Scene generation is deterministic: same seed, same scene, on every
//!   platform (splitmix64, no float-ordering dependence).
//! - Cubicmap meshes emit no interior faces between adjacent solid cells.

pub mod cubicmap;
pub mod world;

pub use cubicmap::{MeshData, MeshVertex, build_cubicmap};
pub use world::{Cuboid, GroundPlane, Scene};

pub fn crate_info() -> &'static str {
    "walkabout-scene v0.1.0"
}
