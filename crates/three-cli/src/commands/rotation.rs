//! Rotation command: Euler angles to quaternion and matrix, and back.

use anyhow::Result;
use three_math::{DEG2RAD, Euler, Matrix4, Quaternion, RAD2DEG, RotationOrder};

use crate::RotationArgs;

/// One rotation in every supported representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    /// Input rotation, radians
    pub euler: Euler,
    /// Equivalent unit quaternion
    pub quaternion: Quaternion,
    /// Rotation matrix built from the Euler angles
    pub matrix: Matrix4,
    /// Angles re-extracted from the quaternion in the target order
    pub reextracted: Euler,
}

/// Converts `euler` and re-extracts it in `target` order.
pub fn convert(euler: Euler, target: RotationOrder) -> Conversion {
    let mut quaternion = Quaternion::IDENTITY;
    quaternion.set_from_euler(&euler);

    let mut matrix = Matrix4::IDENTITY;
    matrix.make_rotation_from_euler(&euler);

    let mut reextracted = Euler::default();
    reextracted.set_from_quaternion(quaternion, Some(target));

    Conversion { euler, quaternion, matrix, reextracted }
}

fn angles(e: &Euler, degrees: bool) -> String {
    let scale = if degrees { RAD2DEG } else { 1.0 };
    format!(
        "{:.4} {:.4} {:.4} {}",
        e.x * scale,
        e.y * scale,
        e.z * scale,
        e.order
    )
}

/// Runs the rotation command.
pub fn run(args: RotationArgs, verbose: bool) -> Result<()> {
    let scale = if args.degrees { DEG2RAD } else { 1.0 };
    let euler = Euler::new(args.x * scale, args.y * scale, args.z * scale, args.order);
    let c = convert(euler, args.to.unwrap_or(args.order));

    let q = c.quaternion;
    println!("Euler:      {}", angles(&c.euler, args.degrees));
    println!("Quaternion: {:.6} {:.6} {:.6} {:.6}", q.x, q.y, q.z, q.w);
    println!("Matrix (column-major):");
    for column in c.matrix.to_array().chunks_exact(4) {
        println!("  {:>10.6} {:>10.6} {:>10.6} {:>10.6}", column[0], column[1], column[2], column[3]);
    }
    println!("Re-extracted: {}", angles(&c.reextracted, args.degrees));
    if verbose {
        println!("Quaternion length: {:.12}", q.length());
    }
    Ok(())
}
