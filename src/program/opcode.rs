use crate::{foundation::core::Axis, program::symbols::SymbolRef};

/// One instruction of a scene-description program.
///
/// `R` is the symbol-reference type: scripts are deserialized with names (`Opcode<String>`)
/// and bound to store handles (`Opcode<SymbolRef>`) before execution.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Opcode<R = SymbolRef> {
    Push,
    Pop,
    Move {
        delta: [f64; 3],
        #[serde(default, skip_serializing_if = "Option::is_none")]
        knob: Option<R>,
    },
    Scale {
        delta: [f64; 3],
        #[serde(default, skip_serializing_if = "Option::is_none")]
        knob: Option<R>,
    },
    Rotate {
        axis: Axis,
        degrees: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        knob: Option<R>,
    },
    Box {
        corner0: [f64; 3],
        corner1: [f64; 3],
        #[serde(default, skip_serializing_if = "Option::is_none")]
        material: Option<R>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        frame: Option<R>,
    },
    Sphere {
        center: [f64; 3],
        radius: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        material: Option<R>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        frame: Option<R>,
    },
    Torus {
        center: [f64; 3],
        r0: f64,
        r1: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        material: Option<R>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        frame: Option<R>,
    },
    Line {
        p0: [f64; 3],
        p1: [f64; 3],
        #[serde(default, skip_serializing_if = "Option::is_none")]
        material: Option<R>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        frame0: Option<R>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        frame1: Option<R>,
    },
    Save {
        filename: String,
    },
    Display,
    Set {
        target: R,
        value: f64,
    },
    SetKnobs {
        value: f64,
    },
    /// Store the current top of the origin stack under a coordinate-system symbol.
    SaveCoordSystem {
        target: R,
    },
    Frames {
        count: u32,
    },
    Basename {
        name: String,
    },
    Vary {
        target: R,
        start_frame: u32,
        end_frame: u32,
        start_val: f64,
        end_val: f64,
    },
}

/// What a symbol reference inside an opcode stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefRole {
    /// Knob or `set` target: a value symbol.
    Knob,
    /// Drawing constants.
    Material,
    /// Saved coordinate system.
    CoordSystem,
}

impl<R> Opcode<R> {
    /// Short lowercase opcode name, as used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Pop => "pop",
            Self::Move { .. } => "move",
            Self::Scale { .. } => "scale",
            Self::Rotate { .. } => "rotate",
            Self::Box { .. } => "box",
            Self::Sphere { .. } => "sphere",
            Self::Torus { .. } => "torus",
            Self::Line { .. } => "line",
            Self::Save { .. } => "save",
            Self::Display => "display",
            Self::Set { .. } => "set",
            Self::SetKnobs { .. } => "set_knobs",
            Self::SaveCoordSystem { .. } => "save_coord_system",
            Self::Frames { .. } => "frames",
            Self::Basename { .. } => "basename",
            Self::Vary { .. } => "vary",
        }
    }

    /// Rebuild the opcode with every symbol reference passed through `f`.
    pub fn try_map_refs<S, E>(
        self,
        mut f: impl FnMut(RefRole, R) -> Result<S, E>,
    ) -> Result<Opcode<S>, E> {
        let mut opt = |role: RefRole, r: Option<R>| r.map(|r| f(role, r)).transpose();

        Ok(match self {
            Self::Push => Opcode::Push,
            Self::Pop => Opcode::Pop,
            Self::Move { delta, knob } => Opcode::Move {
                delta,
                knob: opt(RefRole::Knob, knob)?,
            },
            Self::Scale { delta, knob } => Opcode::Scale {
                delta,
                knob: opt(RefRole::Knob, knob)?,
            },
            Self::Rotate {
                axis,
                degrees,
                knob,
            } => Opcode::Rotate {
                axis,
                degrees,
                knob: opt(RefRole::Knob, knob)?,
            },
            Self::Box {
                corner0,
                corner1,
                material,
                frame,
            } => Opcode::Box {
                corner0,
                corner1,
                material: opt(RefRole::Material, material)?,
                frame: opt(RefRole::CoordSystem, frame)?,
            },
            Self::Sphere {
                center,
                radius,
                material,
                frame,
            } => Opcode::Sphere {
                center,
                radius,
                material: opt(RefRole::Material, material)?,
                frame: opt(RefRole::CoordSystem, frame)?,
            },
            Self::Torus {
                center,
                r0,
                r1,
                material,
                frame,
            } => Opcode::Torus {
                center,
                r0,
                r1,
                material: opt(RefRole::Material, material)?,
                frame: opt(RefRole::CoordSystem, frame)?,
            },
            Self::Line {
                p0,
                p1,
                material,
                frame0,
                frame1,
            } => Opcode::Line {
                p0,
                p1,
                material: opt(RefRole::Material, material)?,
                frame0: opt(RefRole::CoordSystem, frame0)?,
                frame1: opt(RefRole::CoordSystem, frame1)?,
            },
            Self::Save { filename } => Opcode::Save { filename },
            Self::Display => Opcode::Display,
            Self::Set { target, value } => Opcode::Set {
                target: f(RefRole::Knob, target)?,
                value,
            },
            Self::SetKnobs { value } => Opcode::SetKnobs { value },
            Self::SaveCoordSystem { target } => Opcode::SaveCoordSystem {
                target: f(RefRole::CoordSystem, target)?,
            },
            Self::Frames { count } => Opcode::Frames { count },
            Self::Basename { name } => Opcode::Basename { name },
            Self::Vary {
                target,
                start_frame,
                end_frame,
                start_val,
                end_val,
            } => Opcode::Vary {
                target: f(RefRole::Knob, target)?,
                start_frame,
                end_frame,
                start_val,
                end_val,
            },
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/program/opcode.rs"]
mod tests;
