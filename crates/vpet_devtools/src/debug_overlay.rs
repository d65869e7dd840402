//! Debug overlay rendered via egui on top of the presented frame.
//!
//! egui needs a `RenderPass<'static>` while `begin_render_pass` borrows the
//! encoder, so painting runs in phases:
//!
//!   1. `prepare()` -- run egui UI logic, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers (borrows encoder mutably)
//!   3. draw into a fresh render pass with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references
//!
//! The window is only drawn while `visible` is true (toggled by F3). Stats are
//! pushed in before each tick and button clicks are collected for the next one.

use std::sync::Arc;

use vpet_core::{FrameClock, SimSnapshot};
use vpet_render::{GpuContext, SurfaceOverlay};
use winit::window::Window;

#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    pub fps: f64,
    pub frame_time_ms: f64,
    pub tick_count: u64,
    pub sim: SimSnapshot,
}

impl OverlayStats {
    pub fn new(clock: &FrameClock, sim: SimSnapshot) -> Self {
        Self {
            fps: clock.smoothed_fps,
            frame_time_ms: clock.smoothed_frame_time_ms,
            tick_count: clock.frame_count,
            sim,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayActions {
    /// User clicked "Step"
    pub step: bool,
    /// User clicked "Next character"
    pub next_character: bool,
}

impl OverlayActions {
    fn merge(&mut self, other: OverlayActions) {
        self.step |= other.step;
        self.next_character |= other.next_character;
    }
}

pub struct DebugOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub visible: bool,
    window: Arc<Window>,
    stats: OverlayStats,
    actions: OverlayActions,
}

impl DebugOverlay {
    pub fn new(gpu: &GpuContext, window: Arc<Window>) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &*window,
            None,
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&gpu.device, gpu.surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            visible: false,
            window,
            stats: OverlayStats::default(),
            actions: OverlayActions::default(),
        }
    }

    pub fn handle_window_event(&mut self, event: &winit::event::WindowEvent) -> bool {
        let response = self.egui_winit_state.on_window_event(&self.window, event);
        response.consumed
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::info!("Debug overlay: {}", if self.visible { "ON" } else { "OFF" });
    }

    pub fn set_stats(&mut self, stats: OverlayStats) {
        self.stats = stats;
    }

    /// Button clicks since the last call.
    pub fn take_actions(&mut self) -> OverlayActions {
        std::mem::take(&mut self.actions)
    }

    fn prepare(&mut self) -> (Vec<egui::ClippedPrimitive>, egui::TexturesDelta) {
        let mut actions = OverlayActions::default();
        let stats = &self.stats;
        let visible = self.visible;
        let raw_input = self.egui_winit_state.take_egui_input(&self.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if !visible {
                return;
            }
            egui::Window::new("Debug")
                .default_pos([10.0, 10.0])
                .show(ctx, |ui| {
                    ui.label(format!("FPS: {:.1}", stats.fps));
                    ui.label(format!("Frame time: {:.2} ms", stats.frame_time_ms));
                    ui.label(format!("Ticks: {}", stats.tick_count));

                    ui.separator();
                    let sim = &stats.sim;
                    ui.label(format!("Character: {}", sim.character));
                    ui.label(format!("State: {}", sim.state));
                    ui.label(format!(
                        "Queued steps: {}/{}",
                        sim.queued_steps, sim.max_queued_steps
                    ));
                    ui.label(format!("Frame: {}", sim.frame_index));
                    let [near, mid, far] = sim.layer_offsets;
                    ui.label(format!("Offsets: {near:.1} / {mid:.1} / {far:.1}"));

                    ui.separator();
                    ui.horizontal(|ui| {
                        if ui.button("Step").clicked() {
                            actions.step = true;
                        }
                        if ui.button("Next character").clicked() {
                            actions.next_character = true;
                        }
                    });
                });
        });
        self.actions.merge(actions);

        self.egui_winit_state
            .handle_platform_output(&self.window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    fn upload(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }

        self.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            encoder,
            primitives,
            screen_descriptor,
        );
    }

    /// Free textures that egui no longer needs. Call after rendering.
    fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

impl SurfaceOverlay for DebugOverlay {
    fn paint(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    ) {
        let (primitives, textures_delta) = self.prepare();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.size.0, gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        self.upload(gpu, encoder, &primitives, &textures_delta, &screen_descriptor);

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.egui_renderer
                .render(&mut egui_pass, &primitives, &screen_descriptor);
        }

        self.cleanup(&textures_delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vpet_core::{BehaviorState, CharacterId};

    #[test]
    fn actions_accumulate_until_taken() {
        let mut pending = OverlayActions::default();
        pending.merge(OverlayActions {
            step: true,
            next_character: false,
        });
        pending.merge(OverlayActions {
            step: false,
            next_character: true,
        });
        assert!(pending.step && pending.next_character);

        let taken = std::mem::take(&mut pending);
        assert!(taken.step);
        assert_eq!(pending, OverlayActions::default());
    }

    #[test]
    fn stats_copy_clock_and_snapshot() {
        let clock = FrameClock::new(std::time::Duration::from_millis(16));
        let snapshot = SimSnapshot {
            state: BehaviorState::Walking,
            character: CharacterId::Tentomon,
            queued_steps: 1,
            max_queued_steps: 2,
            ..Default::default()
        };
        let stats = OverlayStats::new(&clock, snapshot);
        assert_eq!(stats.tick_count, 0);
        assert!((stats.frame_time_ms - 16.0).abs() < 1e-6);
        assert_eq!(stats.sim.character, CharacterId::Tentomon);
        assert_eq!(stats.sim.state, BehaviorState::Walking);
    }
}
