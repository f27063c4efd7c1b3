/// Renders a number the way it is read back: integers without a decimal part.
pub fn format_number(x: f64) -> String {
    x.to_string()
}

pub fn format_score(score: Option<f64>) -> String {
    score.map(format_number).unwrap_or_default()
}

/// Pads every row to the width of the header, so that a short row reads as
/// missing values rather than as an error.
pub fn pad_rows(width: usize, rows: &mut [Vec<String>]) {
    for row in rows.iter_mut() {
        if row.len() < width {
            row.resize(width, String::new());
        }
    }
}
