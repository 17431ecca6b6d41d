//! mdl-anim executes MDL scene programs and turns them into still images or animations.
//!
//! A program is a flat list of [`Opcode`]s over a [`SymbolStore`]. Running it is a three-step
//! affair:
//!
//! 1. **Configure**: the first pass finds `frames`, `basename` and `vary` and yields an
//!    [`AnimationConfig`] (fatal misconfiguration is reported before anything is drawn).
//! 2. **Schedule**: the second pass resolves every knob for every frame into a [`KnobTimeline`].
//! 3. **Render**: [`ProgramExecutor`] replays the opcodes once per frame against an
//!    [`OriginStack`] and a [`Screen`], saving each animated frame through a [`FrameSink`] and
//!    assembling the animation at the end.
//!
//! Programs come from JSON scripts ([`Program::from_path`]) or from [`ProgramBuilder`].
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: sequential and parallel runs produce the same sink calls in the same
//!   order.
#![forbid(unsafe_code)]

mod animation;
mod encode;
mod eval;
mod foundation;
mod program;
mod render;

pub use animation::timeline::{
    AnimationConfig, AnimationPlan, ConfigWarning, DEFAULT_BASENAME, KnobFrame, KnobTimeline,
    build_plan, first_pass, second_pass,
};
pub use encode::assemble::{
    AssembleConfig, AssembleFormat, assemble_frames, is_ffmpeg_on_path,
};
pub use encode::file::FileSink;
pub use encode::image_io::{DISPLAY_PROGRAM, display_frame, encode_png, save_frame};
pub use encode::sink::{FrameSink, MemorySink, SinkEvent, frame_digits, frame_file_name};
pub use eval::executor::{
    FrameReport, FrameState, ProgramExecutor, RunMode, RunReport, TransformTrace,
};
pub use eval::origin_stack::OriginStack;
pub use foundation::core::{Axis, DMat4, DVec3, FrameIndex, Rgba8};
pub use foundation::error::{MdlError, MdlResult};
pub use program::dsl::ProgramBuilder;
pub use program::load::{Program, Script};
pub use program::opcode::{Opcode, RefRole};
pub use program::symbols::{SymbolKind, SymbolRef, SymbolStore, SymbolValue};
pub use render::geometry::{TriangleMesh, box_mesh, sphere_mesh, torus_mesh};
pub use render::pipeline::{RenderThreading, render_program, render_program_with};
pub use render::screen::{FrameRGBA, Screen};
pub use render::settings::RenderSettings;
