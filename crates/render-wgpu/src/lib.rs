//! wgpu render backend for the walkabout demo.
//!
//! Renders the textured ground plane and cubicmap mesh plus instanced solid
//! cubes for walls, columns, and the third-person player marker.
//!
//! # Invariants
//! - The renderer never mutates camera or scene state.
//! - Instance data is rebuilt from the scene every frame; scene edits (for
//!   example a console `seed` command) need no renderer rebuild.

mod gpu;
mod shaders;

pub use gpu::SceneRenderer;

pub fn crate_info() -> &'static str {
    "walkabout-render-wgpu v0.1.0"
}
