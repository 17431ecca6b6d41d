use glam::{DMat4, DVec3};

use crate::foundation::core::Axis;

/// Translation by `delta * multiplier`.
pub(crate) fn translation(delta: [f64; 3], multiplier: f64) -> DMat4 {
    DMat4::from_translation(DVec3::from_array(delta) * multiplier)
}

/// Componentwise scale by `delta * multiplier`.
pub(crate) fn scaling(delta: [f64; 3], multiplier: f64) -> DMat4 {
    DMat4::from_scale(DVec3::from_array(delta) * multiplier)
}

/// Rotation about `axis` by `degrees * multiplier`.
pub(crate) fn rotation(axis: Axis, degrees: f64, multiplier: f64) -> DMat4 {
    let theta = (degrees * multiplier).to_radians();
    match axis {
        Axis::X => DMat4::from_rotation_x(theta),
        Axis::Y => DMat4::from_rotation_y(theta),
        Axis::Z => DMat4::from_rotation_z(theta),
    }
}

/// Fold `local` into the frame `current`: points go through `local` first.
pub(crate) fn compose(current: &DMat4, local: &DMat4) -> DMat4 {
    *current * *local
}
