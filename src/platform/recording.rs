//! Test doubles for the platform collaborators

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::{SignalSource, SoundEffect, SoundPlayer, Surface, TextAlign};

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    FillRect { x: f32, y: f32, w: f32, h: f32 },
    FillCircle { x: f32, y: f32, r: f32 },
    StrokeArc { x: f32, y: f32, r: f32 },
    Text { text: String, x: f32, y: f32 },
    FillStyle(String),
    Font(String),
    Align(TextAlign),
    Transform,
}

/// Surface that records draw calls instead of drawing
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn rects(&self) -> Vec<(f32, f32, f32, f32)> {
        self.calls
            .iter()
            .filter_map(|c| match *c {
                DrawCall::FillRect { x, y, w, h } => Some((x, y, w, h)),
                _ => None,
            })
            .collect()
    }

    pub fn take(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f32 {
        crate::consts::SCREEN_WIDTH
    }

    fn height(&self) -> f32 {
        crate::consts::SCREEN_HEIGHT
    }

    fn clear_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32) {
        self.calls.push(DrawCall::Clear);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.calls.push(DrawCall::FillRect { x, y, w, h });
    }

    fn fill_circle(&mut self, x: f32, y: f32, r: f32) {
        self.calls.push(DrawCall::FillCircle { x, y, r });
    }

    fn stroke_arc(&mut self, x: f32, y: f32, r: f32, _start: f32, _end: f32, _anticlockwise: bool) {
        self.calls.push(DrawCall::StrokeArc { x, y, r });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn set_fill_style(&mut self, color: &str) {
        self.calls.push(DrawCall::FillStyle(color.to_string()));
    }

    fn set_stroke_style(&mut self, _color: &str) {}

    fn set_line_width(&mut self, _width: f32) {}

    fn set_font(&mut self, font: &str) {
        self.calls.push(DrawCall::Font(font.to_string()));
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.calls.push(DrawCall::Align(align));
    }

    fn save(&mut self) {
        self.calls.push(DrawCall::Transform);
    }

    fn restore(&mut self) {
        self.calls.push(DrawCall::Transform);
    }

    fn translate(&mut self, _x: f32, _y: f32) {}

    fn rotate(&mut self, _angle: f32) {}
}

/// Counts played effects; clones share the log
#[derive(Debug, Default, Clone)]
pub struct CountingPlayer {
    pub played: Rc<RefCell<Vec<SoundEffect>>>,
}

impl SoundPlayer for CountingPlayer {
    fn play(&mut self, effect: SoundEffect) {
        self.played.borrow_mut().push(effect);
    }
}

/// Signal source fed from a script of constant-level frames
#[derive(Debug, Default, Clone)]
pub struct ScriptedSignal {
    pub levels: Rc<RefCell<VecDeque<u8>>>,
    pub closed: Rc<RefCell<bool>>,
}

impl ScriptedSignal {
    pub fn with_levels(levels: impl IntoIterator<Item = u8>) -> Self {
        Self {
            levels: Rc::new(RefCell::new(levels.into_iter().collect())),
            closed: Rc::default(),
        }
    }
}

impl SignalSource for ScriptedSignal {
    fn read_samples(&mut self, buf: &mut [u8]) {
        let level = self.levels.borrow_mut().pop_front().unwrap_or(128);
        buf.fill(level);
    }

    fn close(&mut self) {
        *self.closed.borrow_mut() = true;
    }
}
