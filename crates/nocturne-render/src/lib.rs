//! wgpu plumbing for the night sky: GPU context, surface sizing, camera,
//! depth and MSAA targets, per-frame encoding, and buffer/texture upload
//! helpers.

pub mod buffer;
pub mod camera;
pub mod depth;
pub mod gpu;
pub mod msaa;
pub mod pass;
pub mod surface;
pub mod texture;

pub use buffer::{BufferAllocator, IndexData, MeshBuffer, VertexPositionNormalUv};
pub use camera::{Camera, ObjectUniform};
pub use depth::DepthBuffer;
pub use gpu::{
    RenderContext, RenderContextError, SurfaceError, init_render_context_blocking,
    request_headless_device,
};
pub use msaa::{MsaaTarget, pick_sample_count};
pub use pass::{FrameEncoder, NIGHT_BLACK, RenderPassBuilder};
pub use surface::{PhysicalSize, SurfaceResizeEvent, SurfaceWrapper};
pub use texture::{GpuTexture, TextureError};
