//! One tick of the pet: input, simulation, composition, presentation.
//!
//! The driver is generic over its [`Display`] and [`InputSource`] so the same
//! loop runs in a window, headless, or against test fakes.

use std::sync::Arc;
use std::time::Duration;

use vpet_core::assets::{build_catalog, build_layers};
use vpet_core::{
    Action, AssetProvider, FrameClock, InputOutcome, InputSource, InputState, PetSim, SimConfig,
    SimSnapshot,
};
use vpet_render::{render_scene, Display, RenderError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Quit,
}

/// How a headless run ended.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub ticks: u64,
    pub quit_requested: bool,
    pub final_state: SimSnapshot,
}

/// Build the simulation from whatever provides the art.
pub fn build_sim(
    provider: &dyn AssetProvider,
    config: SimConfig,
    now_ms: u64,
) -> Result<PetSim, String> {
    let catalog = build_catalog(provider)?;
    let layers = build_layers(provider)?;
    Ok(PetSim::new(Arc::new(catalog), layers, config, now_ms))
}

pub struct FrameDriver<D: Display, I: InputSource> {
    sim: PetSim,
    display: D,
    input: I,
    clear_color: u16,
    ticks: u64,
}

impl<D: Display, I: InputSource> FrameDriver<D, I> {
    pub fn new(sim: PetSim, display: D, input: I, clear_color: u16) -> Self {
        Self {
            sim,
            display,
            input,
            clear_color,
            ticks: 0,
        }
    }

    pub fn sim(&self) -> &PetSim {
        &self.sim
    }

    #[cfg(test)]
    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Ticks that completed with a presented frame.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// A quit is waiting for the next tick to act on it.
    pub fn quit_pending(&self) -> bool {
        self.input.is_quit_requested()
    }

    pub fn tick(&mut self, now_ms: u64) -> Result<TickOutcome, RenderError> {
        self.input.update();
        if self.sim.apply_input(&self.input, now_ms) == InputOutcome::Quit {
            log::info!("Quit requested after {} ticks", self.ticks);
            return Ok(TickOutcome::Quit);
        }

        self.sim.update(now_ms);
        render_scene(&mut self.display, &self.sim, self.clear_color);
        self.display.present()?;
        self.ticks += 1;
        Ok(TickOutcome::Continue)
    }

    /// Tear down the display. Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.display.close();
    }

    /// Run up to `max_ticks` ticks without a window.
    ///
    /// With `realtime` off, time is simulated: tick `n` happens at
    /// `n * tick_interval` and nothing sleeps. With it on, the wall clock
    /// paces the loop.
    pub fn run_headless(
        &mut self,
        max_ticks: u64,
        tick_interval: Duration,
        realtime: bool,
    ) -> Result<RunSummary, RenderError> {
        let interval_ms = tick_interval.as_millis() as u64;
        let mut clock = FrameClock::new(tick_interval);
        let mut quit_requested = false;

        for index in 0..max_ticks {
            let now_ms = if realtime {
                clock.begin_frame()
            } else {
                index.saturating_mul(interval_ms)
            };

            match self.tick(now_ms) {
                Ok(TickOutcome::Continue) => {}
                Ok(TickOutcome::Quit) => {
                    quit_requested = true;
                    break;
                }
                Err(err) => {
                    log::error!("Headless run failed at tick {}: {}", index, err);
                    self.shutdown();
                    return Err(err);
                }
            }

            if realtime {
                clock.sleep_until_next();
            }
        }

        self.shutdown();
        let summary = RunSummary {
            ticks: self.ticks,
            quit_requested,
            final_state: self.sim.snapshot(),
        };
        log::info!(
            "Headless run finished: {} ticks, {} {} with {}/{} queued steps",
            summary.ticks,
            summary.final_state.character,
            summary.final_state.state,
            summary.final_state.queued_steps,
            summary.final_state.max_queued_steps
        );
        Ok(summary)
    }
}

impl<D: Display> FrameDriver<D, InputState> {
    /// Queue a quit for the next tick, which returns [`TickOutcome::Quit`]
    /// without drawing or presenting.
    pub fn request_quit(&mut self) {
        self.input.trigger(Action::Quit);
    }
}
