use std::path::{Path, PathBuf};

use glam::DMat4;

use crate::{
    animation::timeline::{AnimationConfig, AnimationPlan, KnobFrame, build_plan},
    encode::sink::{FrameSink, frame_digits, frame_file_name},
    eval::origin_stack::OriginStack,
    foundation::{
        core::{FrameIndex, Rgba8, point},
        error::MdlResult,
        math,
    },
    program::{load::Program, opcode::Opcode, symbols::SymbolRef, symbols::SymbolStore},
    render::{
        geometry::{box_mesh, sphere_mesh, torus_mesh},
        screen::Screen,
        settings::RenderSettings,
    },
};

/// How a run treats its frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    /// No `frames` opcode: one pass, no automatic save, no assembly.
    SingleImage,
    /// Every frame is saved under the base name, then assembled.
    Animating,
}

/// Multiplier a `move`/`scale`/`rotate` opcode was applied with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformTrace {
    pub op_index: usize,
    pub op: &'static str,
    pub multiplier: f64,
}

/// What happened while rendering one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    pub index: FrameIndex,
    /// Automatically saved frame file (animations only).
    pub file: Option<PathBuf>,
    /// Value symbols after the frame's knobs were applied.
    pub knobs: Vec<(String, f64)>,
    pub transforms: Vec<TransformTrace>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    pub mode: RunMode,
    pub config: AnimationConfig,
    /// One entry per frame, in frame order.
    pub frames: Vec<FrameReport>,
    /// Whether the sink was asked to assemble the animation.
    pub assembled: bool,
}

impl RunReport {
    pub fn frame_files(&self) -> Vec<PathBuf> {
        self.frames.iter().filter_map(|f| f.file.clone()).collect()
    }
}

/// Mutable state one frame renders into.
///
/// A sequential run reuses a single state for every frame; parallel workers own one each.
#[derive(Clone, Debug)]
pub struct FrameState {
    pub symbols: SymbolStore,
    pub stack: OriginStack,
    pub screen: Screen,
}

/// Runs a [`Program`] frame by frame.
///
/// Both analysis passes run in [`ProgramExecutor::new`], so configuration errors surface
/// before anything is drawn or written.
#[derive(Debug)]
pub struct ProgramExecutor<'p> {
    program: &'p Program,
    plan: AnimationPlan,
    settings: RenderSettings,
    digits: usize,
}

impl<'p> ProgramExecutor<'p> {
    pub fn new(program: &'p Program, settings: RenderSettings) -> MdlResult<Self> {
        settings.validate()?;
        let plan = build_plan(program)?;
        let digits = frame_digits(plan.config.num_frames, settings.frame_digits);
        Ok(Self {
            program,
            plan,
            settings,
            digits,
        })
    }

    pub fn program(&self) -> &Program {
        self.program
    }

    pub fn plan(&self) -> &AnimationPlan {
        &self.plan
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn mode(&self) -> RunMode {
        if self.plan.config.is_animated() {
            RunMode::Animating
        } else {
            RunMode::SingleImage
        }
    }

    /// Fresh per-frame state over a copy of the program's initial symbols.
    pub fn new_state(&self) -> MdlResult<FrameState> {
        Ok(FrameState {
            symbols: self.program.symbols().clone(),
            stack: OriginStack::new(),
            screen: Screen::new(
                self.settings.width,
                self.settings.height,
                self.settings.clear_color(),
            )?,
        })
    }

    /// Knobs the timeline varies during `index` (none for a static run).
    pub fn knobs_for(&self, index: FrameIndex) -> Option<&KnobFrame> {
        self.plan.timeline.as_ref().and_then(|t| t.frame(index))
    }

    /// `<out_dir>/<basename><k>.png`
    pub fn frame_path(&self, index: FrameIndex) -> PathBuf {
        self.settings.out_dir.join(frame_file_name(
            &self.plan.config.basename,
            index.0,
            self.digits,
        ))
    }

    /// Render every frame in order, then assemble if animating.
    #[tracing::instrument(skip_all, fields(frames = self.plan.config.num_frames))]
    pub fn run(&self, sink: &mut dyn FrameSink) -> MdlResult<RunReport> {
        let mut state = self.new_state()?;
        let mut frames = Vec::with_capacity(self.plan.config.num_frames as usize);
        for f in 0..self.plan.config.num_frames {
            let index = FrameIndex(f);
            frames.push(self.render_frame(index, self.knobs_for(index), &mut state, sink)?);
        }
        self.finish(frames, sink)
    }

    /// Assemble the saved frames (animations only) and build the report.
    pub fn finish(
        &self,
        frames: Vec<FrameReport>,
        sink: &mut dyn FrameSink,
    ) -> MdlResult<RunReport> {
        let mode = self.mode();
        let mut report = RunReport {
            mode,
            config: self.plan.config.clone(),
            frames,
            assembled: false,
        };
        if mode == RunMode::Animating {
            sink.assemble(&self.plan.config.basename, &report.frame_files())?;
            report.assembled = true;
        }
        Ok(report)
    }

    /// Apply `knobs`, then execute every opcode against `state`.
    ///
    /// Animated frames are saved to [`ProgramExecutor::frame_path`] once all opcodes ran.
    pub fn render_frame(
        &self,
        index: FrameIndex,
        knobs: Option<&KnobFrame>,
        state: &mut FrameState,
        sink: &mut dyn FrameSink,
    ) -> MdlResult<FrameReport> {
        if let Some(knobs) = knobs {
            for (name, value) in knobs {
                let sym = state.symbols.lookup(name)?;
                state.symbols.set(sym, *value)?;
            }
        }
        let knob_report = state.symbols.knob_report();
        tracing::debug!(frame = index.0, knobs = ?knob_report, "knobs applied");

        state.stack.reset();
        state.screen.clear();

        let mut transforms = Vec::new();
        for (op_index, op) in self.program.ops().iter().enumerate() {
            tracing::debug!(frame = index.0, op_index, op = op.name(), "dispatch");
            if let Some(multiplier) = self.dispatch(op, state, sink)? {
                transforms.push(TransformTrace {
                    op_index,
                    op: op.name(),
                    multiplier,
                });
            }
        }

        let file = if self.mode() == RunMode::Animating {
            let path = self.frame_path(index);
            let frame = state.screen.render()?;
            sink.save(&frame, &path)?;
            tracing::info!(frame = index.0, path = %path.display(), "saved frame");
            state.screen.clear();
            state.stack.reset();
            Some(path)
        } else {
            None
        };

        Ok(FrameReport {
            index,
            file,
            knobs: knob_report,
            transforms,
        })
    }

    /// Execute one opcode. Returns the multiplier used by transform opcodes.
    fn dispatch(
        &self,
        op: &Opcode,
        state: &mut FrameState,
        sink: &mut dyn FrameSink,
    ) -> MdlResult<Option<f64>> {
        let FrameState {
            symbols,
            stack,
            screen,
        } = state;
        let step = self.settings.step;

        match op {
            Opcode::Push => stack.push(),
            Opcode::Pop => {
                stack.pop()?;
            }
            Opcode::Move { delta, knob } => {
                let m = multiplier(symbols, *knob)?;
                stack.fold(&math::translation(*delta, m));
                return Ok(Some(m));
            }
            Opcode::Scale { delta, knob } => {
                let m = multiplier(symbols, *knob)?;
                stack.fold(&math::scaling(*delta, m));
                return Ok(Some(m));
            }
            Opcode::Rotate {
                axis,
                degrees,
                knob,
            } => {
                let m = multiplier(symbols, *knob)?;
                stack.fold(&math::rotation(*axis, *degrees, m));
                return Ok(Some(m));
            }
            Opcode::Box {
                corner0,
                corner1,
                material,
                frame,
            } => {
                let mesh = box_mesh(point(*corner0), point(*corner1));
                let transform = frame_transform(symbols, stack, *frame)?;
                let color = self.material_color(symbols, *material)?;
                screen.draw_polygons(&mesh, &transform, color);
            }
            Opcode::Sphere {
                center,
                radius,
                material,
                frame,
            } => {
                let mesh = sphere_mesh(point(*center), *radius, step);
                let transform = frame_transform(symbols, stack, *frame)?;
                let color = self.material_color(symbols, *material)?;
                screen.draw_polygons(&mesh, &transform, color);
            }
            Opcode::Torus {
                center,
                r0,
                r1,
                material,
                frame,
            } => {
                let mesh = torus_mesh(point(*center), *r0, *r1, step);
                let transform = frame_transform(symbols, stack, *frame)?;
                let color = self.material_color(symbols, *material)?;
                screen.draw_polygons(&mesh, &transform, color);
            }
            Opcode::Line {
                p0,
                p1,
                material,
                frame0,
                frame1,
            } => {
                let a = frame_transform(symbols, stack, *frame0)?.transform_point3(point(*p0));
                let b = frame_transform(symbols, stack, *frame1)?.transform_point3(point(*p1));
                let color = self.material_color(symbols, *material)?;
                screen.draw_line(a, b, color);
            }
            Opcode::Save { filename } => {
                let frame = screen.render()?;
                sink.save(&frame, Path::new(filename))?;
            }
            Opcode::Display => {
                let frame = screen.render()?;
                sink.display(&frame)?;
            }
            Opcode::Set { target, value } => symbols.set(*target, *value)?,
            Opcode::SetKnobs { value } => symbols.set_all_values(*value),
            Opcode::SaveCoordSystem { target } => {
                symbols.save_coord_system(*target, *stack.peek())?;
            }
            Opcode::Frames { .. } | Opcode::Basename { .. } | Opcode::Vary { .. } => {}
        }
        Ok(None)
    }

    fn material_color(
        &self,
        symbols: &SymbolStore,
        material: Option<SymbolRef>,
    ) -> MdlResult<Rgba8> {
        match material {
            Some(sym) => symbols.constants(sym),
            None => Ok(self.settings.draw_color()),
        }
    }
}

fn multiplier(symbols: &SymbolStore, knob: Option<SymbolRef>) -> MdlResult<f64> {
    knob.map_or(Ok(1.0), |sym| symbols.get(sym))
}

/// Saved coordinate system if one is named, otherwise the current stack top.
fn frame_transform(
    symbols: &SymbolStore,
    stack: &OriginStack,
    frame: Option<SymbolRef>,
) -> MdlResult<DMat4> {
    match frame {
        Some(sym) => symbols.coord_system(sym),
        None => Ok(*stack.peek()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/executor.rs"]
mod tests;
