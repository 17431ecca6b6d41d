//! Procedural solids as triangle lists.
//!
//! Every triangle is wound counter-clockwise when seen from outside the solid, so the
//! rasterizer can cull back faces with a 2D cross product.

use std::f64::consts::{PI, TAU};

use glam::DVec3;

/// Triangle soup produced by the generators.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleMesh {
    pub triangles: Vec<[DVec3; 3]>,
}

impl TriangleMesh {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn push(&mut self, a: DVec3, b: DVec3, c: DVec3) {
        self.triangles.push([a, b, c]);
    }
}

/// Axis-aligned box spanning two opposite corners (in any order).
pub fn box_mesh(corner0: DVec3, corner1: DVec3) -> TriangleMesh {
    let lo = corner0.min(corner1);
    let hi = corner0.max(corner1);
    let v = |x: bool, y: bool, z: bool| {
        DVec3::new(
            if x { hi.x } else { lo.x },
            if y { hi.y } else { lo.y },
            if z { hi.z } else { lo.z },
        )
    };

    // Each face as a quad, counter-clockwise from outside.
    let faces = [
        [v(false, false, true), v(true, false, true), v(true, true, true), v(false, true, true)],
        [v(true, false, false), v(false, false, false), v(false, true, false), v(true, true, false)],
        [v(true, false, true), v(true, false, false), v(true, true, false), v(true, true, true)],
        [v(false, false, false), v(false, false, true), v(false, true, true), v(false, true, false)],
        [v(false, true, true), v(true, true, true), v(true, true, false), v(false, true, false)],
        [v(false, false, false), v(true, false, false), v(true, false, true), v(false, false, true)],
    ];

    let mut mesh = TriangleMesh::with_capacity(12);
    for [a, b, c, d] in faces {
        mesh.push(a, b, c);
        mesh.push(a, c, d);
    }
    mesh
}

/// Sphere as `step` meridians by `step` latitude bands.
///
/// Pole bands collapse to single triangles, giving `step * (2 * step - 2)` triangles.
pub fn sphere_mesh(center: DVec3, radius: f64, step: u32) -> TriangleMesh {
    let step = step.max(3);
    let point = |i: u32, j: u32| {
        let phi = TAU * f64::from(i % step) / f64::from(step);
        let theta = PI * f64::from(j) / f64::from(step);
        center
            + radius
                * DVec3::new(
                    theta.cos(),
                    theta.sin() * phi.cos(),
                    theta.sin() * phi.sin(),
                )
    };

    let n = step as usize;
    let mut mesh = TriangleMesh::with_capacity(n.checked_mul(2 * n - 2).unwrap_or(0));
    for i in 0..step {
        for j in 0..step {
            let a = point(i, j);
            let b = point(i, j + 1);
            let c = point(i + 1, j + 1);
            let d = point(i + 1, j);
            if j != step - 1 {
                mesh.push(a, b, c);
            }
            if j != 0 {
                mesh.push(a, c, d);
            }
        }
    }
    mesh
}

/// Torus with tube radius `r0` swept at distance `r1` around the y axis.
pub fn torus_mesh(center: DVec3, r0: f64, r1: f64, step: u32) -> TriangleMesh {
    let step = step.max(3);
    let point = |i: u32, j: u32| {
        let phi = TAU * f64::from(i % step) / f64::from(step);
        let theta = TAU * f64::from(j % step) / f64::from(step);
        let rho = r0 * theta.cos() + r1;
        center + DVec3::new(rho * phi.cos(), r0 * theta.sin(), -rho * phi.sin())
    };

    let n = step as usize;
    let mut mesh = TriangleMesh::with_capacity(n.checked_mul(2 * n).unwrap_or(0));
    for i in 0..step {
        for j in 0..step {
            let a = point(i, j);
            let b = point(i + 1, j);
            let c = point(i + 1, j + 1);
            let d = point(i, j + 1);
            mesh.push(a, b, c);
            mesh.push(a, c, d);
        }
    }
    mesh
}

#[cfg(test)]
#[path = "../../tests/unit/render/geometry.rs"]
mod tests;
