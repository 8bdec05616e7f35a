//! Commanded gimbal position
//!
//! The gimbal has two degrees of freedom realized by three servos: the pan
//! servo in the middle and two tilt servos mounted facing each other. The
//! tilt pair always satisfies `tilt_left + tilt_right == 180`, so only the
//! left angle is stored and the right one is derived from it.

use crate::safety::Fault;

/// Smallest angle any servo can be commanded to
pub const MIN_ANGLE_DEG: i16 = 0;

/// Largest angle any servo can be commanded to
pub const MAX_ANGLE_DEG: i16 = 180;

/// Sum of the two mirrored tilt angles
pub const MIRROR_SUM_DEG: i16 = 180;

/// Tilt angle at which both tilt servos would sit at the same value
pub const TILT_MIDPOINT_DEG: i16 = MIRROR_SUM_DEG / 2;

/// Left tilt angle at power-on
pub const HOME_TILT_LEFT_DEG: i16 = 135;

/// Pan angle at power-on
pub const HOME_PAN_DEG: i16 = 90;

/// Gimbal axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// Vertical axis (two mirrored servos)
    Tilt,
    /// Horizontal axis (one servo)
    Pan,
}

/// Clamp a requested angle into the servo range
///
/// Returns the clamped angle and a [`Fault::RangeViolation`] if clamping
/// changed the value.
pub fn clamp_angle(axis: Axis, requested: i32) -> (i16, Option<Fault>) {
    let clamped = requested.clamp(MIN_ANGLE_DEG as i32, MAX_ANGLE_DEG as i32) as i16;
    let fault = (clamped as i32 != requested).then_some(Fault::RangeViolation {
        axis,
        requested,
        clamped,
    });
    (clamped, fault)
}

/// Commanded angles of all three servos
///
/// This is dead reckoning: the values are what was last commanded, not
/// what the servos actually reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisState {
    tilt_left: i16,
    pan_center: i16,
}

impl Default for AxisState {
    fn default() -> Self {
        Self::home()
    }
}

impl AxisState {
    /// Power-on position: tilt 135/45, pan centered
    pub const fn home() -> Self {
        Self {
            tilt_left: HOME_TILT_LEFT_DEG,
            pan_center: HOME_PAN_DEG,
        }
    }

    /// Left tilt angle
    pub fn tilt_left(&self) -> i16 {
        self.tilt_left
    }

    /// Right tilt angle (mirror of the left one)
    pub fn tilt_right(&self) -> i16 {
        MIRROR_SUM_DEG - self.tilt_left
    }

    /// Pan angle
    pub fn pan_center(&self) -> i16 {
        self.pan_center
    }

    /// Angle tracked for an axis (tilt reports the left servo)
    pub fn angle(&self, axis: Axis) -> i16 {
        match axis {
            Axis::Tilt => self.tilt_left,
            Axis::Pan => self.pan_center,
        }
    }

    /// All three angles as `[tilt_left, pan_center, tilt_right]`
    pub fn angles(&self) -> [i16; 3] {
        [self.tilt_left, self.pan_center, self.tilt_right()]
    }

    /// Check if the two tilt servos are at the same angle
    pub fn is_mirror_locked(&self) -> bool {
        self.tilt_left == self.tilt_right()
    }

    /// Set the left tilt angle; the right one follows
    ///
    /// The value is clamped to 0-180.
    pub fn set_tilt_left(&mut self, degrees: i32) -> Option<Fault> {
        let (clamped, fault) = clamp_angle(Axis::Tilt, degrees);
        self.tilt_left = clamped;
        fault
    }

    /// Set the pan angle
    ///
    /// The value is clamped to 0-180.
    pub fn set_pan_center(&mut self, degrees: i32) -> Option<Fault> {
        let (clamped, fault) = clamp_angle(Axis::Pan, degrees);
        self.pan_center = clamped;
        fault
    }

    /// Set the angle for an axis
    pub fn set(&mut self, axis: Axis, degrees: i32) -> Option<Fault> {
        match axis {
            Axis::Tilt => self.set_tilt_left(degrees),
            Axis::Pan => self.set_pan_center(degrees),
        }
    }
}
