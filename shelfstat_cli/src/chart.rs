//! Plain-text charts for the terminal.

const BAR_WIDTH: usize = 40;
const BAR_CHAR: char = '#';

/// Horizontal bar chart, one row per `(label, value)`, bars scaled to the largest value.
pub fn bar_chart(title: &str, data: &[(String, i64)]) -> String {
    let mut out = format!("{}\n", title);
    if data.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    let label_width = data.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let max = data.iter().map(|(_, v)| *v).max().unwrap_or(0).max(1);

    for (label, value) in data {
        let len = scaled(*value, max);
        out.push_str(&format!(
            "  {:<width$} | {} {}\n",
            label,
            BAR_CHAR.to_string().repeat(len),
            value,
            width = label_width
        ));
    }
    out
}

/// Share-of-total chart: each row shows its percentage of the sum and a bar
/// scaled to 100%.
pub fn share_chart(title: &str, data: &[(String, i64)]) -> String {
    let mut out = format!("{}\n", title);
    let total: i64 = data.iter().map(|(_, v)| (*v).max(0)).sum();
    if total == 0 {
        out.push_str("  (no data)\n");
        return out;
    }

    let label_width = data.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    for (label, value) in data {
        let value = (*value).max(0);
        let pct = value as f64 * 100.0 / total as f64;
        out.push_str(&format!(
            "  {:<width$} | {:<bar$} {:>5.1}%\n",
            label,
            BAR_CHAR.to_string().repeat(scaled(value, total)),
            pct,
            width = label_width,
            bar = BAR_WIDTH
        ));
    }
    out
}

fn scaled(value: i64, max: i64) -> usize {
    if value <= 0 || max <= 0 {
        return 0;
    }
    let len = (value as f64 / max as f64 * BAR_WIDTH as f64).round() as usize;
    len.clamp(1, BAR_WIDTH)
}
