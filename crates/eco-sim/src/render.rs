//! Plain-text grid frames.

use eco_core::Position;
use eco_world::Grid;

/// Render the grid as one character per cell, rows top to bottom.
///
/// `.` marks an empty cell, a species glyph a single occupant, and a digit
/// the occupant count of a crowded cell (capped at `9`).
pub fn frame(grid: &Grid) -> String {
    let mut out = String::with_capacity((grid.width() as usize + 1) * grid.height() as usize);
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            out.push(cell_glyph(grid, Position::new(x, y)));
        }
        out.push('\n');
    }
    out
}

fn cell_glyph(grid: &Grid, position: Position) -> char {
    let mut occupants = grid.entities_in_cell(position);
    let first = match occupants.next() {
        Some(entity) => entity,
        None => return '.',
    };
    match occupants.count() {
        0 => first.species().glyph(),
        more => {
            let count = (more + 1).min(9);
            // count is 2..=9, always a single digit
            char::from_digit(count as u32, 10).unwrap_or('9')
        }
    }
}
