use std::sync::Arc;

use winit::window::Window;

use crate::display::{Display, PixelBlit, Viewport};
use crate::error::RenderError;
use crate::framebuffer::FrameBuffer;
use crate::gpu_context::GpuContext;
use crate::presenter::FramePresenter;

/// Extra GPU drawing layered over the presented frame, e.g. a debug UI.
pub trait SurfaceOverlay {
    fn paint(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    );
}

/// A [`Display`] that composites on the CPU and presents through wgpu.
pub struct WindowDisplay<O: SurfaceOverlay> {
    gpu: GpuContext,
    framebuffer: FrameBuffer,
    presenter: FramePresenter,
    overlay: O,
    closed: bool,
}

impl<O: SurfaceOverlay> WindowDisplay<O> {
    /// `width` x `height` is the logical scene size; the surface may be any
    /// size and the frame is stretched to fit.
    pub fn new(gpu: GpuContext, width: u32, height: u32, overlay: O) -> Self {
        let presenter = FramePresenter::new(&gpu.device, gpu.surface_format, width, height);
        Self {
            gpu,
            framebuffer: FrameBuffer::new(width, height),
            presenter,
            overlay,
            closed: false,
        }
    }

    /// Bring up the GPU for `window` and build the overlay against it.
    pub fn init(
        window: Arc<Window>,
        width: u32,
        height: u32,
        make_overlay: impl FnOnce(&GpuContext) -> O,
    ) -> Result<Self, RenderError> {
        let gpu = GpuContext::new(window)?;
        let overlay = make_overlay(&gpu);
        Ok(Self::new(gpu, width, height, overlay))
    }

    pub fn overlay_mut(&mut self) -> &mut O {
        &mut self.overlay
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }
}

impl<O: SurfaceOverlay> Display for WindowDisplay<O> {
    fn viewport(&self) -> Viewport {
        self.framebuffer.viewport()
    }

    fn clear(&mut self, color: u16) {
        self.framebuffer.clear(color);
    }

    fn draw_pixels(&mut self, blit: &PixelBlit<'_>) {
        self.framebuffer.draw_pixels(blit);
    }

    fn present(&mut self) -> Result<(), RenderError> {
        if self.closed {
            return Err(RenderError::Closed);
        }
        self.framebuffer.present()?;
        self.presenter.upload(&self.gpu.queue, &self.framebuffer);

        let Some((output, view)) = self.gpu.begin_frame()? else {
            return Ok(());
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        self.presenter.draw(&mut encoder, &view);
        self.overlay.paint(&self.gpu, &mut encoder, &view);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn close(&mut self) {
        if !self.closed {
            log::info!(
                "Closing window display after {} frames",
                self.framebuffer.frames_presented()
            );
        }
        self.closed = true;
        self.framebuffer.close();
    }
}
