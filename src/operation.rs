use embassy_time::Duration;
use heapless::Vec;

use crate::effect::{ColorEffect, MotionList};

/// Upper bound on operations produced by one command (one per field)
pub const MAX_OPERATIONS: usize = 5;

/// Validated mutation of the animation engine
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Repaint with a static color effect, then re-run mutators
    SetColor(ColorEffect),
    /// Replace the active motion effects, then re-run mutators
    SetMotion(MotionList),
    /// Set time between renders
    SetUpdateInterval(Duration),
    /// Set brightness setpoint (0.0-1.0)
    SetBrightness(f32),
}

/// Ordered list of operations to be applied to the engine
///
/// Operations are applied front to back; the interpreter pushes them in the
/// fixed command order (color, motion, rate, speed, brightness).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationList {
    inner: Vec<Operation, MAX_OPERATIONS>,
}

impl OperationList {
    pub const fn new() -> Self {
        Self { inner: Vec::new() }
    }

    /// Push an operation onto the list
    ///
    /// Returns the operation if the list is full
    pub fn push(&mut self, operation: Operation) -> Result<(), Operation> {
        self.inner.push(operation)
    }

    pub fn push_color(&mut self, color: ColorEffect) -> Result<(), Operation> {
        self.push(Operation::SetColor(color))
    }

    pub fn push_motion(&mut self, motion: MotionList) -> Result<(), Operation> {
        self.push(Operation::SetMotion(motion))
    }

    pub fn push_update_interval(&mut self, interval: Duration) -> Result<(), Operation> {
        self.push(Operation::SetUpdateInterval(interval))
    }

    pub fn push_brightness(&mut self, brightness: f32) -> Result<(), Operation> {
        self.push(Operation::SetBrightness(brightness))
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Operation> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<'a> IntoIterator for &'a OperationList {
    type Item = &'a Operation;
    type IntoIter = core::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
