use macroquad::prelude::*;
use shared::{Piece, PieceColor, BOARD_SIZE};

use crate::game::ClientGameState;
use crate::input::BoardLayout;

const LIGHT_SQUARE: Color = Color::new(0.93, 0.93, 0.93, 1.0);
const DARK_SQUARE: Color = Color::new(0.5, 0.5, 0.5, 1.0);
const SELECTION: Color = Color::new(0.0, 1.0, 0.0, 0.4);
const HINT: Color = Color::new(1.0, 0.85, 0.0, 0.8);

pub struct Renderer {
    background: Color,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            background: Color::from_rgba(26, 26, 26, 255),
        }
    }

    pub fn render(&self, state: &ClientGameState, layout: &BoardLayout) {
        clear_background(self.background);

        self.draw_squares(layout);

        if let Some((row, col)) = state.selected {
            let (x, y) = layout.square_origin(row, col);
            draw_rectangle(x, y, layout.square, layout.square, SELECTION);
        }

        for (row, col) in state.hints() {
            let (x, y) = layout.square_origin(row, col);
            let half = layout.square / 2.0;
            draw_circle(x + half, y + half, layout.square * 0.12, HINT);
        }

        if let Some(board) = &state.board {
            for piece in board.pieces() {
                self.draw_piece(piece, layout);
            }
        }

        self.draw_status(state, layout);
    }

    fn draw_squares(&self, layout: &BoardLayout) {
        let size = BOARD_SIZE as i32;
        for row in 0..size {
            for col in 0..size {
                let (x, y) = layout.square_origin(row, col);
                let color = if (row + col) % 2 == 0 { LIGHT_SQUARE } else { DARK_SQUARE };
                draw_rectangle(x, y, layout.square, layout.square, color);
            }
        }

        draw_rectangle_lines(layout.origin_x, layout.origin_y, layout.side(), layout.side(), 2.0, WHITE);
    }

    fn draw_piece(&self, piece: &Piece, layout: &BoardLayout) {
        let (x, y) = layout.square_origin(piece.row, piece.col);
        let half = layout.square / 2.0;
        let radius = layout.square * 0.4;

        let (fill, accent) = match piece.color {
            PieceColor::Black => (BLACK, WHITE),
            PieceColor::White => (WHITE, BLACK),
        };

        draw_circle(x + half, y + half, radius, fill);
        draw_circle_lines(x + half, y + half, radius, 2.0, GRAY);

        // King marker
        if piece.is_king() {
            draw_circle_lines(x + half, y + half, radius * 0.55, 3.0, accent);
            draw_circle(x + half, y + half, radius * 0.2, accent);
        }
    }

    fn draw_status(&self, state: &ClientGameState, layout: &BoardLayout) {
        let y = layout.origin_y + layout.side() + 28.0;
        draw_text(&state.status_line(), layout.origin_x, y, 24.0, WHITE);
    }
}
