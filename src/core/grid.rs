use crate::domain::model::{GridCell, GridLayout};
use crate::utils::error::{MultiplesError, Result};

/// `floor(sqrt(n))` without trusting the float conversion at perfect squares.
fn integer_sqrt(n: usize) -> usize {
    let mut root = (n as f64).sqrt() as usize;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root
}

/// Plans a near-square grid for `file_count` small multiples.
///
/// `rows = floor(sqrt(n))`, `cols = n / rows + 1`, and item `i` goes to
/// `row = i % rows`, `col = i / rows`. The extra column means the grid can
/// hold more cells than items (one spare cell for `n = 1`); the renderer
/// leaves those blank.
pub fn plan_grid(file_count: usize) -> Result<GridLayout> {
    if file_count == 0 {
        return Err(MultiplesError::ValidationError {
            message: "cannot lay out a grid for zero files".to_string(),
        });
    }

    let rows = integer_sqrt(file_count).max(1);
    let cols = file_count / rows + 1;
    let cells = (0..file_count)
        .map(|i| GridCell {
            row: i % rows,
            col: i / rows,
        })
        .collect();

    tracing::info!("Grid layout: ({}, {})", rows, cols);
    Ok(GridLayout { rows, cols, cells })
}
