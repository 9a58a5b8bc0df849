//! WebGPU rendering module
//!
//! Draws the scene as textured quads, one batch per texture, in canvas
//! pixel coordinates mapped to NDC at upload time.

pub mod batch;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use batch::{SpriteBatch, TextureId, build_batches};
pub use pipeline::{SpriteRenderer, canvas_to_ndc};
pub use vertex::Vertex;
