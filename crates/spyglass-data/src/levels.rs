//! Parsing of textual level lists.
//!
//! Support/resistance cells hold a bracketed list of prices, e.g.
//! `"[10.5, 11.2]"` or `"[]"`. A cell that is empty, missing, or
//! malformed parses to an empty list; this function never fails.

/// Parse a level-list cell into prices.
///
/// Any deviation from the expected shape (no brackets, a non-numeric or
/// non-finite element) degrades the whole cell to "no levels at this
/// row" rather than erroring.
pub fn parse_level_list(cell: &str) -> Vec<f32> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let inner = match trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
    {
        Some(inner) => inner.trim(),
        None => return Vec::new(),
    };
    if inner.is_empty() {
        return Vec::new();
    }

    let mut levels = Vec::with_capacity(2);
    for piece in inner.split(',') {
        match piece.trim().parse::<f32>() {
            Ok(value) if value.is_finite() => levels.push(value),
            _ => return Vec::new(),
        }
    }
    levels
}

/// Re-encode levels in the cell format, `[a, b]`.
pub fn format_level_list(levels: &[f32]) -> String {
    let mut out = String::from("[");
    for (i, level) in levels.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&level.to_string());
    }
    out.push(']');
    out
}
