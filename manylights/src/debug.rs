use std::cell::RefCell;
use std::fmt;

use glam::{UVec2, Vec3};

/// Receives whatever kernels print in debug mode (see:
/// [`crate::Config::debug`]); called once the frame is complete.
pub trait DebugSink {
    fn print(&self, screen_pos: UVec2, args: fmt::Arguments<'_>);
    fn line(&self, from: Vec3, to: Vec3, color: Vec3);
}

#[derive(Clone, Debug, PartialEq)]
pub struct DebugText {
    pub screen_pos: UVec2,
    pub text: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebugLine {
    pub from: Vec3,
    pub to: Vec3,
    pub color: Vec3,
}

/// Collects debug records, so that the renderer can draw them on top of the
/// frame.
#[derive(Debug, Default)]
pub struct DebugOverlay {
    texts: RefCell<Vec<DebugText>>,
    lines: RefCell<Vec<DebugLine>>,
}

impl DebugOverlay {
    pub fn texts(&self) -> Vec<DebugText> {
        self.texts.borrow().clone()
    }

    pub fn lines(&self) -> Vec<DebugLine> {
        self.lines.borrow().clone()
    }

    pub fn clear(&self) {
        self.texts.borrow_mut().clear();
        self.lines.borrow_mut().clear();
    }
}

impl DebugSink for DebugOverlay {
    fn print(&self, screen_pos: UVec2, args: fmt::Arguments<'_>) {
        self.texts.borrow_mut().push(DebugText {
            screen_pos,
            text: args.to_string(),
        });
    }

    fn line(&self, from: Vec3, to: Vec3, color: Vec3) {
        self.lines.borrow_mut().push(DebugLine { from, to, color });
    }
}
