pub mod color;
pub mod compositor;
pub mod display;
pub mod error;
pub mod framebuffer;
pub mod gpu_context;
pub mod presenter;
pub mod window_display;

pub use color::{rgb565_to_argb8888, rgba8_to_rgb565, KEY_COLOR};
pub use compositor::{clip_tile, render_scene, ClippedRect};
pub use display::{Display, PixelBlit, Viewport};
pub use error::RenderError;
pub use framebuffer::FrameBuffer;
pub use gpu_context::GpuContext;
pub use presenter::FramePresenter;
pub use window_display::{SurfaceOverlay, WindowDisplay};
