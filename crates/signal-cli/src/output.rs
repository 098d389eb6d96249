use serde::Serialize;
use signal_core::TrafficLight;
use std::fmt::Write;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

/// Lay out `rows` under `headers` in left-aligned columns two spaces apart,
/// with a dashed rule under the header. Trailing padding is stripped.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = (0..headers.len())
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(String::len)
                .fold(headers[col].len(), usize::max)
        })
        .collect();

    let mut out = String::new();
    push_row(&mut out, headers, &widths);
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) {
    let joined = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{:w$}", cell.as_ref()))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", joined.trim_end());
}

/// SIGNAL / TIMING / STATE rows, one per light.
pub fn light_rows<'a>(lights: impl IntoIterator<Item = &'a TrafficLight>) -> Vec<Vec<String>> {
    lights
        .into_iter()
        .map(|l| {
            vec![
                l.signal_id().to_string(),
                format!("{}s", l.timing()),
                if l.is_active() { "active" } else { "inactive" }.to_string(),
            ]
        })
        .collect()
}

pub fn print_lights<'a>(lights: impl IntoIterator<Item = &'a TrafficLight>) {
    let rows = light_rows(lights);
    if rows.is_empty() {
        println!("No traffic lights registered.");
        return;
    }
    print_table(&["SIGNAL", "TIMING", "STATE"], &rows);
}
