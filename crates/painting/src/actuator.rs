//! Pointer and keyboard input interface
//!
//! The drawing core never synthesizes input itself; it talks to an
//! [`Actuator`] that owns the platform backend. [`RecordingActuator`]
//! captures the calls instead, for dry runs and tests.

use autosketch_config::ScreenPoint;
use serde::Serialize;
use tracing::trace;

use crate::planner::StrokeSegment;

/// Errors raised by an input backend
#[derive(Debug, thiserror::Error)]
pub enum ActuatorError {
    #[error("Input backend unavailable: {0}")]
    Unavailable(String),

    #[error("Input action failed: {0}")]
    Failed(String),
}

/// Keys used in key combinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Control,
    Enter,
    Escape,
    Tab,
    Char(char),
}

/// Synchronous pointer and keyboard synthesis
///
/// Each call may take a short real-world time to settle; callers pad
/// with explicit delays.
pub trait Actuator {
    fn move_to(&mut self, point: ScreenPoint) -> Result<(), ActuatorError>;

    /// Press the primary button at the current position
    fn press(&mut self) -> Result<(), ActuatorError>;

    fn release(&mut self) -> Result<(), ActuatorError>;

    fn click(&mut self, point: ScreenPoint) -> Result<(), ActuatorError>;

    fn type_text(&mut self, text: &str) -> Result<(), ActuatorError>;

    /// Hold every key in order, then release them in reverse
    fn key_combo(&mut self, keys: &[Key]) -> Result<(), ActuatorError>;
}

macro_rules! forward_actuator {
    ($ty:ty) => {
        impl<A: Actuator + ?Sized> Actuator for $ty {
            fn move_to(&mut self, point: ScreenPoint) -> Result<(), ActuatorError> {
                (**self).move_to(point)
            }

            fn press(&mut self) -> Result<(), ActuatorError> {
                (**self).press()
            }

            fn release(&mut self) -> Result<(), ActuatorError> {
                (**self).release()
            }

            fn click(&mut self, point: ScreenPoint) -> Result<(), ActuatorError> {
                (**self).click(point)
            }

            fn type_text(&mut self, text: &str) -> Result<(), ActuatorError> {
                (**self).type_text(text)
            }

            fn key_combo(&mut self, keys: &[Key]) -> Result<(), ActuatorError> {
                (**self).key_combo(keys)
            }
        }
    };
}

forward_actuator!(&mut A);
forward_actuator!(Box<A>);

/// One recorded actuator call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ActuatorAction {
    MoveTo(ScreenPoint),
    Press,
    Release,
    Click(ScreenPoint),
    TypeText(String),
    KeyCombo(Vec<Key>),
}

/// Actuator that records calls instead of performing them
#[derive(Debug, Default, Clone)]
pub struct RecordingActuator {
    actions: Vec<ActuatorAction>,
    pressed: bool,
    position: Option<ScreenPoint>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> &[ActuatorAction] {
        &self.actions
    }

    pub fn into_actions(self) -> Vec<ActuatorAction> {
        self.actions
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Press/release pairs as drawn segments in screen coordinates
    ///
    /// A stroke starts where the pointer was at press time and ends where
    /// it was at release.
    pub fn strokes(&self) -> Vec<(ScreenPoint, ScreenPoint)> {
        let mut out = Vec::new();
        let mut position = None;
        let mut start = None;
        for action in &self.actions {
            match action {
                ActuatorAction::MoveTo(p) | ActuatorAction::Click(p) => position = Some(*p),
                ActuatorAction::Press => start = position,
                ActuatorAction::Release => {
                    if let (Some(s), Some(e)) = (start.take(), position) {
                        out.push((s, e));
                    }
                }
                _ => {}
            }
        }
        out
    }

    /// Pretty JSON of every recorded action
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.actions)
    }

    fn record(&mut self, action: ActuatorAction) {
        trace!("{:?}", action);
        self.actions.push(action);
    }
}

impl Actuator for RecordingActuator {
    fn move_to(&mut self, point: ScreenPoint) -> Result<(), ActuatorError> {
        self.position = Some(point);
        self.record(ActuatorAction::MoveTo(point));
        Ok(())
    }

    fn press(&mut self) -> Result<(), ActuatorError> {
        self.pressed = true;
        self.record(ActuatorAction::Press);
        Ok(())
    }

    fn release(&mut self) -> Result<(), ActuatorError> {
        self.pressed = false;
        self.record(ActuatorAction::Release);
        Ok(())
    }

    fn click(&mut self, point: ScreenPoint) -> Result<(), ActuatorError> {
        self.position = Some(point);
        self.record(ActuatorAction::Click(point));
        Ok(())
    }

    fn type_text(&mut self, text: &str) -> Result<(), ActuatorError> {
        self.record(ActuatorAction::TypeText(text.to_string()));
        Ok(())
    }

    fn key_combo(&mut self, keys: &[Key]) -> Result<(), ActuatorError> {
        self.record(ActuatorAction::KeyCombo(keys.to_vec()));
        Ok(())
    }
}

/// Screen segments covered by planned strokes, for comparing against a recording
pub fn expected_strokes(
    strokes: &[StrokeSegment],
    origin: ScreenPoint,
) -> Vec<(ScreenPoint, ScreenPoint)> {
    strokes
        .iter()
        .map(|s| (s.start_point(origin), s.end_point(origin)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_tracks_strokes() {
        let mut act = RecordingActuator::new();
        act.move_to(ScreenPoint::new(1, 1)).unwrap();
        act.press().unwrap();
        assert!(act.is_pressed());
        act.move_to(ScreenPoint::new(5, 1)).unwrap();
        act.release().unwrap();
        act.move_to(ScreenPoint::new(2, 2)).unwrap();
        act.press().unwrap();
        act.release().unwrap();
        assert!(!act.is_pressed());
        assert_eq!(
            act.strokes(),
            vec![
                (ScreenPoint::new(1, 1), ScreenPoint::new(5, 1)),
                (ScreenPoint::new(2, 2), ScreenPoint::new(2, 2)),
            ]
        );
    }

    #[test]
    fn test_action_json_shape() {
        let mut act = RecordingActuator::new();
        act.click(ScreenPoint::new(3, 4)).unwrap();
        act.key_combo(&[Key::Control, Key::Char('a')]).unwrap();
        act.press().unwrap();
        let value: serde_json::Value = serde_json::from_str(&act.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"type": "Click", "data": [3, 4]},
                {"type": "KeyCombo", "data": ["control", {"char": "a"}]},
                {"type": "Press"}
            ])
        );
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut act = RecordingActuator::new();
        {
            let mut borrowed: &mut RecordingActuator = &mut act;
            Actuator::type_text(&mut borrowed, "12").unwrap();
        }
        assert_eq!(act.actions(), &[ActuatorAction::TypeText("12".into())]);
    }
}
