//! Box command.
//!
//! Builds a [`BoxGeometry`], derives normals and bounds, and reports what
//! ended up in the buffers.

use anyhow::{Context, Result};
use serde::Serialize;
use three_core::BufferGeometry;
use three_geometries::BoxGeometry;
use tracing::debug;

use super::format_xyz;
use crate::BoxArgs;

#[derive(Debug, Serialize)]
struct AttributeReport {
    name: String,
    kind: String,
    item_size: usize,
    count: usize,
    version: u32,
}

#[derive(Debug, Serialize)]
struct GroupReport {
    start: usize,
    count: usize,
    material_index: usize,
}

#[derive(Debug, Serialize)]
struct BoundsReport {
    min: [f64; 3],
    max: [f64; 3],
    center: [f64; 3],
    radius: f64,
}

#[derive(Debug, Serialize)]
struct GeometryReport {
    name: String,
    index: Option<AttributeReport>,
    attributes: Vec<AttributeReport>,
    groups: Vec<GroupReport>,
    bounds: Option<BoundsReport>,
}

impl GeometryReport {
    fn new(geometry: &BufferGeometry) -> Self {
        let describe = |name: &str, a: &three_core::BufferAttribute| AttributeReport {
            name: name.to_owned(),
            kind: a.kind().to_string(),
            item_size: a.item_size(),
            count: a.count(),
            version: a.version(),
        };
        let bounds = match (geometry.bounding_box(), geometry.bounding_sphere()) {
            (Some(b), Some(s)) => Some(BoundsReport {
                min: b.min.to_array(),
                max: b.max.to_array(),
                center: s.center.to_array(),
                radius: s.radius,
            }),
            _ => None,
        };
        Self {
            name: geometry.name.clone(),
            index: geometry.index().map(|i| describe("index", i)),
            attributes: geometry.attributes().map(|(n, a)| describe(n, a)).collect(),
            groups: geometry
                .groups()
                .iter()
                .map(|g| GroupReport {
                    start: g.start,
                    count: g.count,
                    material_index: g.material_index,
                })
                .collect(),
            bounds,
        }
    }

    fn print_text(&self, verbose: bool) {
        println!("{}", self.name);
        if let Some(index) = &self.index {
            println!("  Index:      {} x {}", index.count, index.kind);
        }
        for a in &self.attributes {
            print!("  {:<11} {} x {} ({})", format!("{}:", a.name), a.count, a.item_size, a.kind);
            if verbose {
                print!(" v{}", a.version);
            }
            println!();
        }
        println!("  Groups:     {}", self.groups.len());
        if verbose {
            for g in &self.groups {
                println!("    material {}: start {} count {}", g.material_index, g.start, g.count);
            }
        }
        if let Some(b) = &self.bounds {
            println!("  Box min:    {}", format_xyz(b.min));
            println!("  Box max:    {}", format_xyz(b.max));
            println!("  Sphere:     {} r={:.4}", format_xyz(b.center), b.radius);
        }
    }
}

/// Runs the box command.
pub fn run(args: BoxArgs, verbose: bool) -> Result<()> {
    let params = BoxGeometry::new(
        args.width,
        args.height,
        args.depth,
        args.segments,
        args.segments,
        args.segments,
    );
    let mut geometry = params.build().context("Failed to build box geometry")?;
    geometry
        .compute_vertex_normals()
        .context("Failed to compute vertex normals")?
        .compute_bounding_box()
        .compute_bounding_sphere();
    debug!(id = geometry.id(), uuid = geometry.uuid(), "Box geometry ready");

    let report = GeometryReport::new(&geometry);
    if args.json {
        super::print_json(&report)
    } else {
        report.print_text(verbose);
        Ok(())
    }
}
