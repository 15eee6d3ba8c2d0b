//! Interactive calibration without a window.
//!
//! Controls are held down and released; while held, every tick nudges the
//! model by one pixel. [`Move`] scripts a press, a number of ticks and the
//! release, so a calibration can be replayed from the command line.

use std::fmt;
use std::str::FromStr;

use glam::IVec2;
use thiserror::Error;
use tracing::{debug, trace};

use crate::calibration::CalibrationModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Adjustment {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Shrink,
    Grow,
    OffsetDown,
    OffsetUp,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("Unknown adjustment '{0}', expected one of: {names}", names = Adjustment::NAMES.join(", "))]
    UnknownAdjustment(String),

    #[error("Invalid tick count '{0}'")]
    InvalidTicks(String),
}

/// One held control: which delta it drives and the value it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
    Radius,
    Offset,
}

impl Adjustment {
    pub const ALL: [Adjustment; 8] = [
        Adjustment::MoveLeft,
        Adjustment::MoveRight,
        Adjustment::MoveUp,
        Adjustment::MoveDown,
        Adjustment::Shrink,
        Adjustment::Grow,
        Adjustment::OffsetDown,
        Adjustment::OffsetUp,
    ];

    pub const NAMES: [&'static str; 8] = [
        "left",
        "right",
        "up",
        "down",
        "shrink",
        "grow",
        "offset-down",
        "offset-up",
    ];

    pub fn name(self) -> &'static str {
        Self::NAMES[self as usize]
    }

    fn axis(self) -> (Axis, i32) {
        match self {
            Adjustment::MoveLeft => (Axis::X, -1),
            Adjustment::MoveRight => (Axis::X, 1),
            Adjustment::MoveUp => (Axis::Y, -1),
            Adjustment::MoveDown => (Axis::Y, 1),
            Adjustment::Shrink => (Axis::Radius, -1),
            Adjustment::Grow => (Axis::Radius, 1),
            Adjustment::OffsetDown => (Axis::Offset, -1),
            Adjustment::OffsetUp => (Axis::Offset, 1),
        }
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Adjustment {
    type Err = MoveParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|adj| adj.name() == wanted)
            .ok_or_else(|| MoveParseError::UnknownAdjustment(s.to_string()))
    }
}

/// An adjustment held for a number of ticks, written `name:ticks`
/// (`name` alone holds for one tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub adjustment: Adjustment,
    pub ticks: u32,
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (name, ticks) = match s.split_once(':') {
            Some((name, ticks)) => {
                let ticks = ticks
                    .trim()
                    .parse()
                    .map_err(|_| MoveParseError::InvalidTicks(ticks.to_string()))?;
                (name, ticks)
            }
            None => (s, 1),
        };
        Ok(Self {
            adjustment: name.parse()?,
            ticks,
        })
    }
}

/// Held deltas applied to a [`CalibrationModel`] once per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationSession {
    model: CalibrationModel,
    dx: i32,
    dy: i32,
    dr: i32,
    d_offset: i32,
}

impl CalibrationSession {
    pub fn new(model: CalibrationModel) -> Self {
        Self {
            model,
            dx: 0,
            dy: 0,
            dr: 0,
            d_offset: 0,
        }
    }

    pub fn model(&self) -> &CalibrationModel {
        &self.model
    }

    fn delta_mut(&mut self, axis: Axis) -> &mut i32 {
        match axis {
            Axis::X => &mut self.dx,
            Axis::Y => &mut self.dy,
            Axis::Radius => &mut self.dr,
            Axis::Offset => &mut self.d_offset,
        }
    }

    /// Starts holding `adjustment`, replacing whatever held its axis.
    pub fn press(&mut self, adjustment: Adjustment) {
        let (axis, value) = adjustment.axis();
        *self.delta_mut(axis) = value;
    }

    /// Stops holding `adjustment`. The opposite control on the same axis,
    /// if pressed later, stays held.
    pub fn release(&mut self, adjustment: Adjustment) {
        let (axis, value) = adjustment.axis();
        let delta = self.delta_mut(axis);
        if *delta == value {
            *delta = 0;
        }
    }

    pub fn is_idle(&self) -> bool {
        self.dx == 0 && self.dy == 0 && self.dr == 0 && self.d_offset == 0
    }

    /// Applies the held deltas once. Returns true when radius or offset was
    /// touched and the calibration pattern has to be redrawn.
    pub fn tick(&mut self) -> bool {
        self.model.center += IVec2::new(self.dx, self.dy);

        if self.dr == 0 && self.d_offset == 0 {
            return false;
        }

        let radius = (self.model.radius as i64 + self.dr as i64).max(1);
        self.model.radius = radius.min(u32::MAX as i64) as u32;

        let radius = self.model.radius as f64;
        if self.model.offset < radius || self.d_offset == -1 {
            self.model.offset += self.d_offset as f64;
        } else if self.model.offset > radius {
            self.model.offset = radius;
        }
        self.model.offset = self.model.offset.max(0.0);

        trace!(
            radius = self.model.radius,
            offset = self.model.offset,
            "calibration reshaped"
        );
        true
    }

    /// Holds `adjustment` for `ticks` ticks, then releases it. Returns true
    /// if any tick requires a redraw.
    pub fn run_for(&mut self, adjustment: Adjustment, ticks: u32) -> bool {
        self.press(adjustment);
        let mut redraw = false;
        for _ in 0..ticks {
            redraw |= self.tick();
        }
        self.release(adjustment);
        redraw
    }

    /// Replays a scripted sequence of moves.
    pub fn replay(&mut self, moves: &[Move]) -> bool {
        let mut redraw = false;
        for mv in moves {
            redraw |= self.run_for(mv.adjustment, mv.ticks);
        }
        debug!(
            moves = moves.len(),
            radius = self.model.radius,
            offset = self.model.offset,
            center = ?self.model.center,
            "replayed calibration moves"
        );
        redraw
    }
}
