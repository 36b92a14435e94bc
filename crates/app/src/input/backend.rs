//! Actuator backend selection
//!
//! The drawing worker is generic over [`Actuator`]; the host picks one
//! concrete backend up front. Dry runs record every action so the plan can
//! be inspected or written to disk. Live runs drive the real pointer and
//! keyboard when the `live-input` feature is enabled.

use autosketch_config::ScreenPoint;
use painting::{Actuator, ActuatorError, Key, RecordingActuator};

#[cfg(feature = "live-input")]
pub use live::LiveActuator;

/// The actuator a run sends its input to
#[derive(Debug)]
pub enum InputBackend {
    /// Record actions without touching the pointer
    Recording(RecordingActuator),
    /// Synthesize OS-level input
    #[cfg(feature = "live-input")]
    Live(LiveActuator),
}

impl InputBackend {
    /// The recorded actions of a dry run
    pub fn into_recording(self) -> Option<RecordingActuator> {
        match self {
            InputBackend::Recording(act) => Some(act),
            #[cfg(feature = "live-input")]
            InputBackend::Live(_) => None,
        }
    }

    fn inner(&mut self) -> &mut dyn Actuator {
        match self {
            InputBackend::Recording(act) => act,
            #[cfg(feature = "live-input")]
            InputBackend::Live(act) => act,
        }
    }
}

impl Actuator for InputBackend {
    fn move_to(&mut self, point: ScreenPoint) -> Result<(), ActuatorError> {
        self.inner().move_to(point)
    }

    fn press(&mut self) -> Result<(), ActuatorError> {
        self.inner().press()
    }

    fn release(&mut self) -> Result<(), ActuatorError> {
        self.inner().release()
    }

    fn click(&mut self, point: ScreenPoint) -> Result<(), ActuatorError> {
        self.inner().click(point)
    }

    fn type_text(&mut self, text: &str) -> Result<(), ActuatorError> {
        self.inner().type_text(text)
    }

    fn key_combo(&mut self, keys: &[Key]) -> Result<(), ActuatorError> {
        self.inner().key_combo(keys)
    }
}

/// Pick the backend for a run
///
/// Without the `live-input` feature, live runs fail before anything is drawn.
pub fn select_backend(dry_run: bool) -> Result<InputBackend, ActuatorError> {
    if dry_run {
        return Ok(InputBackend::Recording(RecordingActuator::new()));
    }
    live_backend()
}

#[cfg(feature = "live-input")]
fn live_backend() -> Result<InputBackend, ActuatorError> {
    LiveActuator::connect().map(InputBackend::Live)
}

#[cfg(not(feature = "live-input"))]
fn live_backend() -> Result<InputBackend, ActuatorError> {
    Err(ActuatorError::Unavailable(
        "built without the live-input feature; use --dry-run".to_string(),
    ))
}

#[cfg(feature = "live-input")]
mod live {
    use std::fmt;

    use autosketch_config::ScreenPoint;
    use enigo::{Button, Coordinate, Direction, Enigo, Keyboard, Mouse, Settings};
    use painting::{Actuator, ActuatorError, Key};
    use tracing::info;

    /// Pointer and keyboard input through the platform's input APIs
    pub struct LiveActuator {
        enigo: Enigo,
    }

    impl fmt::Debug for LiveActuator {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("LiveActuator").finish_non_exhaustive()
        }
    }

    impl LiveActuator {
        /// Connect to the platform input system
        pub fn connect() -> Result<Self, ActuatorError> {
            let enigo = Enigo::new(&Settings::default())
                .map_err(|e| ActuatorError::Unavailable(e.to_string()))?;
            info!("Connected to platform input");
            Ok(Self { enigo })
        }

        fn button(&mut self, direction: Direction) -> Result<(), ActuatorError> {
            self.enigo.button(Button::Left, direction).map_err(failed)
        }
    }

    fn failed(e: enigo::InputError) -> ActuatorError {
        ActuatorError::Failed(e.to_string())
    }

    fn enigo_key(key: Key) -> enigo::Key {
        match key {
            Key::Control => enigo::Key::Control,
            Key::Enter => enigo::Key::Return,
            Key::Escape => enigo::Key::Escape,
            Key::Tab => enigo::Key::Tab,
            Key::Char(c) => enigo::Key::Unicode(c),
        }
    }

    impl Actuator for LiveActuator {
        fn move_to(&mut self, point: ScreenPoint) -> Result<(), ActuatorError> {
            self.enigo
                .move_mouse(point.x, point.y, Coordinate::Abs)
                .map_err(failed)
        }

        fn press(&mut self) -> Result<(), ActuatorError> {
            self.button(Direction::Press)
        }

        fn release(&mut self) -> Result<(), ActuatorError> {
            self.button(Direction::Release)
        }

        fn click(&mut self, point: ScreenPoint) -> Result<(), ActuatorError> {
            self.move_to(point)?;
            self.button(Direction::Click)
        }

        fn type_text(&mut self, text: &str) -> Result<(), ActuatorError> {
            self.enigo.text(text).map_err(failed)
        }

        /// Press `keys` in order, then release them in reverse
        fn key_combo(&mut self, keys: &[Key]) -> Result<(), ActuatorError> {
            let mut pressed = Vec::with_capacity(keys.len());
            let mut result = Ok(());
            for &key in keys {
                let key = enigo_key(key);
                if let Err(e) = self.enigo.key(key, Direction::Press) {
                    result = Err(failed(e));
                    break;
                }
                pressed.push(key);
            }
            // Release whatever went down, even after a failed press
            for key in pressed.into_iter().rev() {
                if let Err(e) = self.enigo.key(key, Direction::Release) {
                    result = result.and(Err(failed(e)));
                }
            }
            result
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_key_mapping() {
            assert_eq!(enigo_key(Key::Enter), enigo::Key::Return);
            assert_eq!(enigo_key(Key::Char('a')), enigo::Key::Unicode('a'));
        }
    }
}
