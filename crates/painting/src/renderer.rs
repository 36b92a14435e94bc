//! Drive an actuator through color selection and stroke playback

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use autosketch_config::{ExactColorCoords, Rgb, ScreenPoint};
use tracing::{debug, warn};

use crate::actuator::{Actuator, ActuatorError, Key};
use crate::constants::PROGRESS_STROKE_INTERVAL;
use crate::control::ControlSignals;
use crate::mask::Mask;
use crate::planner::{plan_strokes, StrokeSegment};

/// Settle delays padded around actuator calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawTiming {
    /// Before the first action, so the user can focus the canvas
    pub start_delay: Duration,
    /// After clicking a swatch or brush
    pub after_select: Duration,
    pub before_press: Duration,
    pub drag: Duration,
    pub after_release: Duration,
    pub between_layers: Duration,
    /// Between the steps of typing an RGB value
    pub entry_step: Duration,
}

impl Default for DrawTiming {
    fn default() -> Self {
        Self {
            start_delay: Duration::from_secs(3),
            after_select: Duration::from_millis(150),
            before_press: Duration::from_millis(20),
            drag: Duration::from_millis(10),
            after_release: Duration::from_millis(30),
            between_layers: Duration::from_millis(300),
            entry_step: Duration::from_millis(100),
        }
    }
}

impl DrawTiming {
    /// No delays at all
    pub fn instant() -> Self {
        Self {
            start_delay: Duration::ZERO,
            after_select: Duration::ZERO,
            before_press: Duration::ZERO,
            drag: Duration::ZERO,
            after_release: Duration::ZERO,
            between_layers: Duration::ZERO,
            entry_step: Duration::ZERO,
        }
    }
}

/// How a layer's playback ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerOutcome {
    Completed,
    Cancelled,
}

/// Pause a thread for `d`, skipping zero-length sleeps
pub(crate) fn settle(d: Duration) {
    if !d.is_zero() {
        thread::sleep(d);
    }
}

/// Plays strokes through an actuator, honoring pause and cancel between strokes
pub struct StrokeRenderer<A: Actuator> {
    actuator: A,
    signals: Arc<ControlSignals>,
    origin: ScreenPoint,
    timing: DrawTiming,
    held: bool,
}

impl<A: Actuator> StrokeRenderer<A> {
    pub fn new(
        actuator: A,
        signals: Arc<ControlSignals>,
        origin: ScreenPoint,
        timing: DrawTiming,
    ) -> Self {
        Self {
            actuator,
            signals,
            origin,
            timing,
            held: false,
        }
    }

    pub fn timing(&self) -> &DrawTiming {
        &self.timing
    }

    pub fn into_inner(self) -> A {
        self.actuator
    }

    fn release_held(&mut self) -> Result<(), ActuatorError> {
        if self.held {
            self.actuator.release()?;
            self.held = false;
        }
        Ok(())
    }

    /// Poll the control signals
    ///
    /// Returns `false` when the run is cancelled. A pause releases any held
    /// press and blocks until resumed or cancelled.
    pub fn checkpoint(&mut self) -> Result<bool, ActuatorError> {
        if self.signals.is_cancelled() {
            self.release_held()?;
            return Ok(false);
        }
        if self.signals.is_paused() {
            self.release_held()?;
            debug!("Waiting for resume");
            self.signals.wait_while_paused();
            if self.signals.is_cancelled() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Click a palette swatch
    pub fn select_palette_color(&mut self, swatch: ScreenPoint) -> Result<(), ActuatorError> {
        self.actuator.click(swatch)?;
        settle(self.timing.after_select);
        Ok(())
    }

    /// Click a brush button
    pub fn select_brush(&mut self, button: ScreenPoint) -> Result<(), ActuatorError> {
        self.actuator.click(button)?;
        settle(self.timing.after_select);
        Ok(())
    }

    /// Open the color selector, type the RGB value, commit and close it
    pub fn select_exact_color(
        &mut self,
        coords: &ExactColorCoords,
        color: Rgb,
    ) -> Result<(), ActuatorError> {
        let step = self.timing.entry_step;
        self.actuator.click(coords.palette_button)?;
        settle(step);

        for (field, value) in [
            (coords.r_field, color.r),
            (coords.g_field, color.g),
            (coords.b_field, color.b),
        ] {
            self.actuator.click(field)?;
            settle(step);
            self.actuator.key_combo(&[Key::Control, Key::Char('a')])?;
            settle(step);
            self.actuator.type_text(&value.to_string())?;
            settle(step);
        }

        self.actuator.key_combo(&[Key::Enter])?;
        settle(step);
        self.actuator.click(coords.palette_button)?;
        settle(self.timing.after_select);
        Ok(())
    }

    /// Plan and draw one layer mask
    pub fn draw_layer(
        &mut self,
        mask: &Mask,
        step: u32,
        label: &str,
        progress: &mut dyn FnMut(&str),
    ) -> Result<LayerOutcome, ActuatorError> {
        let strokes = plan_strokes(mask, step);
        debug!("{}: {} strokes at step {}", label, strokes.len(), step);
        self.draw_strokes(&strokes, label, progress)
    }

    /// Draw planned strokes in order
    ///
    /// On an actuator error the held press, if any, is released before the
    /// error is returned.
    pub fn draw_strokes(
        &mut self,
        strokes: &[StrokeSegment],
        label: &str,
        progress: &mut dyn FnMut(&str),
    ) -> Result<LayerOutcome, ActuatorError> {
        let result = self.play(strokes, label, progress);
        if result.is_err() && self.held {
            if let Err(e) = self.actuator.release() {
                warn!("Failed to release pointer after error: {}", e);
            }
            self.held = false;
        }
        result
    }

    fn play(
        &mut self,
        strokes: &[StrokeSegment],
        label: &str,
        progress: &mut dyn FnMut(&str),
    ) -> Result<LayerOutcome, ActuatorError> {
        let total: u64 = strokes.iter().map(|s| s.len() as u64).sum();
        let mut drawn = 0u64;

        for (i, stroke) in strokes.iter().enumerate() {
            if !self.checkpoint()? {
                debug!("{} cancelled after {} of {} strokes", label, i, strokes.len());
                return Ok(LayerOutcome::Cancelled);
            }

            self.actuator.move_to(stroke.start_point(self.origin))?;
            settle(self.timing.before_press);
            self.actuator.press()?;
            self.held = true;
            if !stroke.is_dot() {
                settle(self.timing.drag);
                self.actuator.move_to(stroke.end_point(self.origin))?;
            }
            self.actuator.release()?;
            self.held = false;
            settle(self.timing.after_release);

            drawn += stroke.len() as u64;
            if (i + 1) % PROGRESS_STROKE_INTERVAL == 0 {
                progress(&progress_message(label, drawn, total));
            }
        }

        if !strokes.is_empty() {
            progress(&progress_message(label, drawn, total));
        }
        Ok(LayerOutcome::Completed)
    }
}

fn progress_message(label: &str, drawn: u64, total: u64) -> String {
    let pct = if total == 0 {
        100.0
    } else {
        drawn as f64 * 100.0 / total as f64
    };
    format!("Drawing {}: {:.1}%", label, pct)
}
