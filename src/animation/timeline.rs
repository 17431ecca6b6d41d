use std::collections::BTreeMap;
use std::fmt;

use crate::{
    foundation::{
        core::FrameIndex,
        error::{MdlError, MdlResult},
    },
    program::{load::Program, opcode::Opcode, symbols::SymbolStore},
};

/// Base name used when a program animates without a `basename` opcode.
pub const DEFAULT_BASENAME: &str = "default";

/// Non-fatal findings of the configuration pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `frames` without `basename`; [`DEFAULT_BASENAME`] is used.
    DefaultBasename,
    /// A later `frames` opcode was ignored (the first one wins).
    DuplicateFrames { ignored: u32 },
    /// A later `basename` opcode was ignored (the first one wins).
    DuplicateBasename { ignored: String },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DefaultBasename => {
                write!(f, "no basename given, using '{DEFAULT_BASENAME}'")
            }
            Self::DuplicateFrames { ignored } => {
                write!(f, "ignoring additional frames opcode ({ignored})")
            }
            Self::DuplicateBasename { ignored } => {
                write!(f, "ignoring additional basename opcode ('{ignored}')")
            }
        }
    }
}

/// Animation parameters discovered by the first pass.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationConfig {
    /// Always >= 1; 1 means a static single-image run.
    pub num_frames: u32,
    pub basename: String,
    pub warnings: Vec<ConfigWarning>,
}

impl AnimationConfig {
    pub fn is_animated(&self) -> bool {
        self.num_frames > 1
    }
}

/// Knob values for one frame, keyed by knob name.
pub type KnobFrame = BTreeMap<String, f64>;

/// Per-frame knob values produced by the second pass. Immutable once built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KnobTimeline {
    frames: Vec<KnobFrame>,
}

impl KnobTimeline {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Knobs varied during `frame` (empty if no `vary` covers it).
    pub fn frame(&self, frame: FrameIndex) -> Option<&KnobFrame> {
        self.frames.get(frame.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &KnobFrame> {
        self.frames.iter()
    }

    /// Knob state a sequential run holds after applying each frame: values set by earlier
    /// frames persist until a later frame overwrites them.
    pub fn carried_frames(&self) -> Vec<KnobFrame> {
        let mut carried = KnobFrame::new();
        self.frames
            .iter()
            .map(|frame| {
                carried.extend(frame.iter().map(|(k, v)| (k.clone(), *v)));
                carried.clone()
            })
            .collect()
    }
}

/// Output of both analysis passes.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationPlan {
    pub config: AnimationConfig,
    /// Present only when the program animates.
    pub timeline: Option<KnobTimeline>,
}

/// Pass 1: discover `frames`, `basename` and `vary`.
///
/// The first `frames` and the first `basename` win; later ones produce warnings.
pub fn first_pass<R>(ops: &[Opcode<R>]) -> MdlResult<AnimationConfig> {
    let mut frames: Option<u32> = None;
    let mut basename: Option<String> = None;
    let mut vary_found = false;
    let mut warnings = Vec::new();

    for op in ops {
        match op {
            Opcode::Frames { count } => match frames {
                None => frames = Some(*count),
                Some(_) => warnings.push(ConfigWarning::DuplicateFrames { ignored: *count }),
            },
            Opcode::Basename { name } => match basename {
                None => basename = Some(name.clone()),
                Some(_) => warnings.push(ConfigWarning::DuplicateBasename {
                    ignored: name.clone(),
                }),
            },
            Opcode::Vary { .. } => vary_found = true,
            _ => {}
        }
    }

    if vary_found && frames.is_none() {
        return Err(MdlError::config(
            "vary used without frames; cannot schedule knobs",
        ));
    }
    if frames == Some(0) {
        return Err(MdlError::config("frames count must be >= 1"));
    }

    let basename = match (frames, basename) {
        (_, Some(name)) => name,
        (Some(_), None) => {
            warnings.push(ConfigWarning::DefaultBasename);
            DEFAULT_BASENAME.to_string()
        }
        (None, None) => DEFAULT_BASENAME.to_string(),
    };

    Ok(AnimationConfig {
        num_frames: frames.unwrap_or(1),
        basename,
        warnings,
    })
}

/// Pass 2: resolve every knob value for every frame.
///
/// `vary` opcodes apply in opcode order, so a later `vary` on the same knob overwrites an
/// earlier one on frames where both are active. Every range is validated, even ranges that lie
/// beyond the last frame.
pub fn second_pass(
    ops: &[Opcode],
    symbols: &SymbolStore,
    num_frames: u32,
) -> MdlResult<KnobTimeline> {
    let varies = collect_varies(ops, symbols)?;

    let frames = (0..num_frames)
        .map(|f| {
            let mut knobs = KnobFrame::new();
            for v in varies.iter().filter(|v| v.covers(f)) {
                knobs.insert(v.knob.to_string(), v.value_at(f));
            }
            knobs
        })
        .collect();

    Ok(KnobTimeline { frames })
}

/// Run both passes over a bound program.
#[tracing::instrument(skip(program), fields(ops = program.ops().len()))]
pub fn build_plan(program: &Program) -> MdlResult<AnimationPlan> {
    let config = first_pass(program.ops())?;
    for w in &config.warnings {
        tracing::warn!("{w}");
    }

    // Ranges are checked whenever frames is present, even for a single frame.
    let has_frames = program
        .ops()
        .iter()
        .any(|op| matches!(op, Opcode::Frames { .. }));
    if has_frames {
        collect_varies(program.ops(), program.symbols())?;
    }

    let timeline = if config.is_animated() {
        Some(second_pass(
            program.ops(),
            program.symbols(),
            config.num_frames,
        )?)
    } else {
        None
    };

    Ok(AnimationPlan { config, timeline })
}

struct Vary<'a> {
    knob: &'a str,
    start_frame: u32,
    end_frame: u32,
    start_val: f64,
    end_val: f64,
}

impl Vary<'_> {
    fn covers(&self, f: u32) -> bool {
        self.start_frame <= f && f <= self.end_frame
    }

    fn value_at(&self, f: u32) -> f64 {
        // Endpoints are returned verbatim so they never pick up rounding error.
        if f == self.start_frame {
            return self.start_val;
        }
        if f == self.end_frame {
            return self.end_val;
        }
        let percent = f64::from(f - self.start_frame) / f64::from(self.end_frame - self.start_frame);
        self.start_val + percent * (self.end_val - self.start_val)
    }
}

fn collect_varies<'a>(ops: &[Opcode], symbols: &'a SymbolStore) -> MdlResult<Vec<Vary<'a>>> {
    let mut out = Vec::new();
    for op in ops {
        let Opcode::Vary {
            target,
            start_frame,
            end_frame,
            start_val,
            end_val,
        } = op
        else {
            continue;
        };

        let knob = symbols.name(*target)?;
        if start_frame >= end_frame {
            return Err(MdlError::InvalidRange {
                knob: knob.to_string(),
                start_frame: *start_frame,
                end_frame: *end_frame,
            });
        }
        out.push(Vary {
            knob,
            start_frame: *start_frame,
            end_frame: *end_frame,
            start_val: *start_val,
            end_val: *end_val,
        });
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
