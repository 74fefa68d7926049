//! Grid geometry for the storyboard canvas.
//!
//! Everything here is a pure function of its arguments so that canvas
//! dimensions are reproducible for identical inputs.

/// Column count when the caller does not specify one: `ceil(sqrt(n))`.
pub fn auto_columns(panel_count: usize) -> u32 {
    (panel_count as f64).sqrt().ceil() as u32
}

/// Row count for a given panel and column count: `ceil(n / c)`.
pub fn grid_rows(panel_count: usize, columns: u32) -> u32 {
    (panel_count as u32).div_ceil(columns)
}

/// Final canvas dimensions.
///
/// Every cell is `panel_width x (panel_height + caption_height)`; cells are
/// separated (and surrounded) by `padding`, with a title band on top.
pub fn canvas_size(
    columns: u32,
    rows: u32,
    panel_width: u32,
    panel_height: u32,
    caption_height: u32,
    padding: u32,
    title_height: u32,
) -> (u32, u32) {
    let cell_height = panel_height + caption_height;
    let width = columns * panel_width + (columns + 1) * padding;
    let height = title_height + rows * cell_height + (rows + 1) * padding;
    (width, height)
}

/// Top-left corner of the cell at `(row, col)`.
pub fn cell_origin(
    row: u32,
    col: u32,
    panel_width: u32,
    cell_height: u32,
    padding: u32,
    title_height: u32,
) -> (u32, u32) {
    let x = padding + col * (panel_width + padding);
    let y = title_height + padding + row * (cell_height + padding);
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_columns() {
        assert_eq!(auto_columns(1), 1);
        assert_eq!(auto_columns(4), 2);
        assert_eq!(auto_columns(10), 4);
        assert_eq!(auto_columns(16), 4);
        assert_eq!(auto_columns(17), 5);
    }

    #[test]
    fn test_ten_panels_four_columns_three_rows() {
        let cols = auto_columns(10);
        assert_eq!(cols, 4);
        // Last row partially filled, padded rather than cropped
        assert_eq!(grid_rows(10, cols), 3);
    }

    #[test]
    fn test_canvas_size_is_deterministic() {
        let a = canvas_size(4, 3, 320, 180, 60, 10, 40);
        let b = canvas_size(4, 3, 320, 180, 60, 10, 40);
        assert_eq!(a, b);
        assert_eq!(a.0, 4 * 320 + 5 * 10);
        assert_eq!(a.1, 40 + 3 * (180 + 60) + 4 * 10);
    }

    #[test]
    fn test_cell_origin() {
        assert_eq!(cell_origin(0, 0, 320, 240, 10, 40), (10, 50));
        assert_eq!(cell_origin(1, 2, 320, 240, 10, 40), (10 + 2 * 330, 50 + 250));
    }
}
