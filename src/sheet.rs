//! Drag-to-setpoint state machine for the bottom sheet.
//!
//! Positions are offsets of the sheet's top edge from the top of the screen, so the smallest
//! setpoint is the most expanded and the largest the most collapsed. A drag moves the sheet
//! freely; when the gesture ends the sheet settles on one of the setpoints:
//!
//! 1. moving down (positive predicted velocity): the setpoint just below the edge
//! 2. moving up: the setpoint just above the edge
//! 3. otherwise the closer of the two, the upper one on an exact tie
//!
//! An edge beyond either end of the setpoint range settles on that end.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{MapperError, Result};

/// Setpoints and starting position of the sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct SheetConfig {
    /// Allowed resting offsets, strictly ascending.
    /// Default: [80, 400, 700]
    pub setpoints: Vec<f64>,

    /// Offset when the sheet first appears. Snapped to the nearest setpoint.
    /// Default: 700 (collapsed)
    pub initial_position: f64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            setpoints: vec![80.0, 400.0, 700.0],
            initial_position: 700.0,
        }
    }
}

impl SheetConfig {
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| MapperError::InvalidSheetConfig {
            message: message.to_string(),
        };

        if self.setpoints.is_empty() {
            return Err(invalid("at least one setpoint is required"));
        }
        if self.setpoints.iter().any(|s| !s.is_finite()) {
            return Err(invalid("setpoints must be finite"));
        }
        if self.setpoints.windows(2).any(|w| w[0] >= w[1]) {
            return Err(invalid("setpoints must be strictly ascending"));
        }
        if !self.initial_position.is_finite() {
            return Err(invalid("initial position must be finite"));
        }
        Ok(())
    }
}

/// Gesture phase of the sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragPhase {
    Idle,
    Dragging {
        /// Rest position when the gesture started
        base_rest_position: f64,
        /// Vertical translation since the gesture started
        translation: f64,
    },
}

/// The setpoints bracketing an edge location: `upper` has the smaller value.
fn bracket(setpoints: &[f64], edge: f64) -> (f64, f64) {
    match setpoints.iter().position(|&s| edge <= s) {
        Some(0) => (setpoints[0], setpoints[0]),
        Some(i) => (setpoints[i - 1], setpoints[i]),
        None => {
            let last = setpoints[setpoints.len() - 1];
            (last, last)
        }
    }
}

/// Pick the resting setpoint for a sheet edge at `edge` moving with `velocity`
/// (positive is downward). `setpoints` must be non-empty and ascending.
pub fn resolve_setpoint(setpoints: &[f64], edge: f64, velocity: f64) -> f64 {
    let (upper, lower) = bracket(setpoints, edge);
    let velocity = if velocity.is_finite() { velocity } else { 0.0 };

    if velocity > 0.0 {
        lower
    } else if velocity < 0.0 {
        upper
    } else if (edge - upper).abs() <= (lower - edge).abs() {
        upper
    } else {
        lower
    }
}

/// Bottom sheet position and drag state.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetState {
    setpoints: Vec<f64>,
    rest_position: f64,
    phase: DragPhase,
}

impl Default for SheetState {
    /// Default setpoints, resting collapsed.
    fn default() -> Self {
        let config = SheetConfig::default();
        Self {
            rest_position: config.initial_position,
            setpoints: config.setpoints,
            phase: DragPhase::Idle,
        }
    }
}

impl SheetState {
    pub fn new(config: SheetConfig) -> Result<Self> {
        config.validate()?;
        let rest_position = resolve_setpoint(&config.setpoints, config.initial_position, 0.0);
        Ok(Self {
            setpoints: config.setpoints,
            rest_position,
            phase: DragPhase::Idle,
        })
    }

    pub fn setpoints(&self) -> &[f64] {
        &self.setpoints
    }

    /// Setpoint the sheet rests on (or started the current drag from).
    pub fn rest_position(&self) -> f64 {
        self.rest_position
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    /// Where the sheet's top edge is drawn right now.
    pub fn visual_offset(&self) -> f64 {
        match self.phase {
            DragPhase::Idle => self.rest_position,
            DragPhase::Dragging {
                base_rest_position,
                translation,
            } => {
                let edge = base_rest_position + translation;
                if edge.is_finite() {
                    edge
                } else {
                    base_rest_position
                }
            }
        }
    }

    /// Bottom padding for sheet content: the largest setpoint at or above which the sheet
    /// currently sits, or 0 when it is above every setpoint.
    pub fn content_inset(&self) -> f64 {
        let offset = self.visual_offset();
        self.setpoints
            .iter()
            .copied()
            .filter(|&s| offset >= s)
            .last()
            .unwrap_or(0.0)
    }

    /// Gesture started. Ignored while a drag is already in progress.
    pub fn begin_drag(&mut self) {
        if let DragPhase::Idle = self.phase {
            self.phase = DragPhase::Dragging {
                base_rest_position: self.rest_position,
                translation: 0.0,
            };
        }
    }

    /// Gesture moved; `translation` is the total vertical movement since it started.
    pub fn update_drag(&mut self, translation: f64) {
        self.begin_drag();
        if let DragPhase::Dragging {
            translation: current,
            ..
        } = &mut self.phase
        {
            *current = translation;
        }
    }

    /// Gesture ended. Settles on a setpoint and returns it.
    ///
    /// `predicted_translation` is where the gesture would come to rest if it continued;
    /// its difference from `translation` gives the fling direction.
    pub fn end_drag(&mut self, translation: f64, predicted_translation: f64) -> f64 {
        let base = match self.phase {
            DragPhase::Dragging {
                base_rest_position, ..
            } => base_rest_position,
            DragPhase::Idle => self.rest_position,
        };

        let edge = base + translation;
        let new_rest = if edge.is_finite() {
            resolve_setpoint(&self.setpoints, edge, predicted_translation - translation)
        } else {
            base
        };

        debug!(
            "[Sheet] Drag ended at {:.1} (base {:.1}), settling on {:.1}",
            edge, base, new_rest
        );

        self.rest_position = new_rest;
        self.phase = DragPhase::Idle;
        new_rest
    }

    /// Gesture cancelled by the system: return to the rest position.
    pub fn cancel_drag(&mut self) {
        self.phase = DragPhase::Idle;
    }
}
