use rayon::prelude::*;

use crate::{
    encode::sink::{FrameSink, MemorySink},
    eval::executor::{FrameReport, FrameState, ProgramExecutor, RunReport},
    foundation::{
        core::FrameIndex,
        error::{MdlError, MdlResult},
    },
    program::load::Program,
    render::settings::RenderSettings,
};

/// How frames of an animation are spread over threads.
#[derive(Clone, Debug, Default)]
pub struct RenderThreading {
    /// Render frames on a rayon pool instead of one after another.
    pub parallel: bool,
    /// Worker count for the pool; `None` lets rayon decide.
    pub threads: Option<usize>,
}

/// Run `program` sequentially with the settings embedded in it (or the defaults).
pub fn render_program(program: &Program, sink: &mut dyn FrameSink) -> MdlResult<RunReport> {
    let settings = program.settings().cloned().unwrap_or_default();
    render_program_with(program, settings, &RenderThreading::default(), sink)
}

/// Run `program` with explicit settings and threading.
///
/// Parallel mode gives every frame a fresh copy of the initial symbols with the knob values a
/// sequential run would hold at that frame. Programs that write symbols with `set`/`set_knobs`
/// carry state between frames, so they always render sequentially. Sink calls are replayed in
/// frame order, so the sink observes the same sequence in both modes.
#[tracing::instrument(skip_all, fields(parallel = threading.parallel))]
pub fn render_program_with(
    program: &Program,
    settings: RenderSettings,
    threading: &RenderThreading,
    sink: &mut dyn FrameSink,
) -> MdlResult<RunReport> {
    let executor = ProgramExecutor::new(program, settings)?;
    if !threading.parallel {
        return executor.run(sink);
    }
    if program.mutates_symbols() {
        tracing::warn!("program writes symbols across frames; rendering sequentially");
        return executor.run(sink);
    }
    let Some(timeline) = executor.plan().timeline.as_ref() else {
        return executor.run(sink);
    };

    let pool = build_thread_pool(threading.threads)?;
    let carried = timeline.carried_frames();
    let rendered = pool.install(|| {
        carried
            .par_iter()
            .enumerate()
            .map_init(
                || executor.new_state(),
                |state, (f, knobs)| -> MdlResult<(FrameReport, MemorySink)> {
                    let state: &mut FrameState = state.as_mut().map_err(|e| {
                        MdlError::validation(format!("failed to set up render worker: {e}"))
                    })?;
                    state.symbols.clone_from(executor.program().symbols());

                    let mut recorded = MemorySink::new();
                    let index = FrameIndex(f as u32);
                    let report =
                        executor.render_frame(index, Some(knobs), state, &mut recorded)?;
                    Ok((report, recorded))
                },
            )
            .collect::<Vec<_>>()
    });

    let mut frames = Vec::with_capacity(rendered.len());
    for item in rendered {
        let (report, recorded) = item?;
        recorded.replay_into(sink)?;
        frames.push(report);
    }
    executor.finish(frames, sink)
}

fn build_thread_pool(threads: Option<usize>) -> MdlResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(MdlError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| MdlError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
