//! Adaptive multi-column layout for lists of device names.

/// Lay out `items` in as many equal-width columns as fit in `width`
///
/// Items run down the columns first, like `ls`. Every returned row starts
/// with `left_margin` spaces and has no trailing whitespace.
pub fn adaptive_columnize(items: &[String], width: usize, left_margin: usize) -> Vec<String> {
    if items.is_empty() {
        return Vec::new();
    }

    let longest = items.iter().map(|item| item.chars().count()).max().unwrap_or(0);
    let column_width = longest + 2;
    let usable = width.saturating_sub(left_margin);
    let columns = (usable / column_width).clamp(1, items.len());
    let rows = items.len().div_ceil(columns);

    let margin = " ".repeat(left_margin);
    (0..rows)
        .map(|row| {
            let mut line = margin.clone();
            for column in 0..columns {
                if let Some(item) = items.get(column * rows + row) {
                    line.push_str(&format!("{:<width$}", item, width = column_width));
                }
            }
            line.trim_end().to_string()
        })
        .collect()
}
