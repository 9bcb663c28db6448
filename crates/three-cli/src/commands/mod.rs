//! CLI command implementations

pub mod color;
pub mod geometry;
pub mod render;
pub mod rotation;

/// Formats a 3-vector with fixed precision.
pub fn format_xyz(v: [f64; 3]) -> String {
    format!("({:.4}, {:.4}, {:.4})", v[0], v[1], v[2])
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
