use crate::{
    foundation::{core::Axis, error::MdlResult},
    program::{
        load::{Program, Script},
        opcode::Opcode,
    },
    render::settings::RenderSettings,
};

/// Fluent builder for programs, binding symbol names the same way script loading does.
#[derive(Clone, Debug, Default)]
pub struct ProgramBuilder {
    script: Script,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(mut self, settings: RenderSettings) -> Self {
        self.script.settings = Some(settings);
        self
    }

    /// Declare drawing constants usable as a `material`.
    pub fn constants(mut self, name: impl Into<String>, rgb: [u8; 3]) -> Self {
        self.script.constants.insert(name.into(), rgb);
        self
    }

    pub fn op(mut self, op: Opcode<String>) -> Self {
        self.script.ops.push(op);
        self
    }

    pub fn push(self) -> Self {
        self.op(Opcode::Push)
    }

    pub fn pop(self) -> Self {
        self.op(Opcode::Pop)
    }

    pub fn move_(self, delta: [f64; 3], knob: Option<&str>) -> Self {
        self.op(Opcode::Move {
            delta,
            knob: knob.map(str::to_string),
        })
    }

    pub fn scale(self, delta: [f64; 3], knob: Option<&str>) -> Self {
        self.op(Opcode::Scale {
            delta,
            knob: knob.map(str::to_string),
        })
    }

    pub fn rotate(self, axis: Axis, degrees: f64, knob: Option<&str>) -> Self {
        self.op(Opcode::Rotate {
            axis,
            degrees,
            knob: knob.map(str::to_string),
        })
    }

    pub fn box_(self, corner0: [f64; 3], corner1: [f64; 3]) -> Self {
        self.op(Opcode::Box {
            corner0,
            corner1,
            material: None,
            frame: None,
        })
    }

    pub fn sphere(self, center: [f64; 3], radius: f64) -> Self {
        self.op(Opcode::Sphere {
            center,
            radius,
            material: None,
            frame: None,
        })
    }

    pub fn torus(self, center: [f64; 3], r0: f64, r1: f64) -> Self {
        self.op(Opcode::Torus {
            center,
            r0,
            r1,
            material: None,
            frame: None,
        })
    }

    pub fn line(self, p0: [f64; 3], p1: [f64; 3]) -> Self {
        self.op(Opcode::Line {
            p0,
            p1,
            material: None,
            frame0: None,
            frame1: None,
        })
    }

    pub fn save(self, filename: impl Into<String>) -> Self {
        self.op(Opcode::Save {
            filename: filename.into(),
        })
    }

    pub fn display(self) -> Self {
        self.op(Opcode::Display)
    }

    pub fn set(self, knob: &str, value: f64) -> Self {
        self.op(Opcode::Set {
            target: knob.to_string(),
            value,
        })
    }

    pub fn set_knobs(self, value: f64) -> Self {
        self.op(Opcode::SetKnobs { value })
    }

    pub fn save_coord_system(self, name: &str) -> Self {
        self.op(Opcode::SaveCoordSystem {
            target: name.to_string(),
        })
    }

    pub fn frames(self, count: u32) -> Self {
        self.op(Opcode::Frames { count })
    }

    pub fn basename(self, name: impl Into<String>) -> Self {
        self.op(Opcode::Basename { name: name.into() })
    }

    pub fn vary(
        self,
        knob: &str,
        start_frame: u32,
        end_frame: u32,
        start_val: f64,
        end_val: f64,
    ) -> Self {
        self.op(Opcode::Vary {
            target: knob.to_string(),
            start_frame,
            end_frame,
            start_val,
            end_val,
        })
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn build(self) -> MdlResult<Program> {
        Program::bind(self.script)
    }
}
