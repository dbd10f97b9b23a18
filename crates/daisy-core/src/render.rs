//! Textual grid view. A debug aid with no format contract beyond showing
//! which color sits where.

use crate::grid::Grid;
use crate::patch::DaisyColor;

/// Render the grid as a box-drawing table, one glyph per patch: `●` for a
/// black daisy, `○` for a white one, blank for bare ground. Rows are `x`,
/// columns are `y`.
pub fn render_grid(grid: &Grid) -> String {
    let side = grid.side();
    let mut out = String::new();

    push_border(&mut out, side, '┌', '┬', '┐');
    for x in 0..side {
        if x > 0 {
            push_border(&mut out, side, '├', '┼', '┤');
        }
        out.push_str(&format!("{x:>3} │"));
        for y in 0..side {
            let glyph = match grid.get(x, y).color() {
                Some(DaisyColor::Black) => '●',
                Some(DaisyColor::White) => '○',
                None => ' ',
            };
            out.push(' ');
            out.push(glyph);
            out.push_str(" │");
        }
        out.push('\n');
    }
    push_border(&mut out, side, '└', '┴', '┘');

    out.push_str("x/y ");
    for y in 0..side {
        out.push_str(&format!("{y:>3} "));
    }
    out.push('\n');
    out
}

fn push_border(out: &mut String, side: usize, left: char, joint: char, right: char) {
    out.push_str("    ");
    out.push(left);
    for y in 0..side {
        if y > 0 {
            out.push(joint);
        }
        out.push_str("───");
    }
    out.push(right);
    out.push('\n');
}
