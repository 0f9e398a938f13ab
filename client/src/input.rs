//! Mapping between screen space and board squares

use macroquad::prelude::*;
use shared::BOARD_SIZE;

/// Margin kept around the board, in pixels
const MARGIN: f32 = 20.0;
/// Height reserved under the board for the status line
const STATUS_HEIGHT: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    pub origin_x: f32,
    pub origin_y: f32,
    pub square: f32,
}

impl BoardLayout {
    /// Largest square board that fits the window above the status line
    pub fn fit(width: f32, height: f32) -> Self {
        let side = (width - 2.0 * MARGIN).min(height - 2.0 * MARGIN - STATUS_HEIGHT).max(0.0);
        let square = side / BOARD_SIZE as f32;

        Self {
            origin_x: (width - side) / 2.0,
            origin_y: MARGIN,
            square,
        }
    }

    pub fn side(&self) -> f32 {
        self.square * BOARD_SIZE as f32
    }

    /// Top-left corner of a square
    pub fn square_origin(&self, row: i32, col: i32) -> (f32, f32) {
        (
            self.origin_x + col as f32 * self.square,
            self.origin_y + row as f32 * self.square,
        )
    }

    pub fn square_at(&self, x: f32, y: f32) -> Option<(i32, i32)> {
        if self.square <= 0.0 {
            return None;
        }

        let col = ((x - self.origin_x) / self.square).floor();
        let row = ((y - self.origin_y) / self.square).floor();
        let size = BOARD_SIZE as f32;

        if (0.0..size).contains(&row) && (0.0..size).contains(&col) {
            Some((row as i32, col as i32))
        } else {
            None
        }
    }
}

/// Square under the mouse if the left button was pressed this frame
pub fn clicked_square(layout: &BoardLayout) -> Option<(i32, i32)> {
    if !is_mouse_button_pressed(MouseButton::Left) {
        return None;
    }

    let (x, y) = mouse_position();
    layout.square_at(x, y)
}
