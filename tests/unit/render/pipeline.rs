use std::path::PathBuf;

use super::*;
use crate::{
    encode::sink::SinkEvent, foundation::core::Axis, program::dsl::ProgramBuilder,
};

fn settings() -> RenderSettings {
    RenderSettings {
        width: 64,
        height: 64,
        step: 6,
        out_dir: PathBuf::from("frames"),
        ..RenderSettings::default()
    }
}

fn spinning_box() -> Program {
    ProgramBuilder::new()
        .frames(8)
        .basename("spin")
        .vary("turn", 0, 7, 0.0, 1.0)
        .vary("slide", 2, 4, 0.0, 10.0)
        .move_([32.0, 32.0, 0.0], None)
        .move_([1.0, 0.0, 0.0], Some("slide"))
        .rotate(Axis::Y, 180.0, Some("turn"))
        .box_([-10.0, -10.0, -10.0], [10.0, 10.0, 10.0])
        .display()
        .build()
        .unwrap()
}

fn parallel(threads: usize) -> RenderThreading {
    RenderThreading {
        parallel: true,
        threads: Some(threads),
    }
}

#[test]
fn parallel_matches_sequential_event_for_event() {
    let program = spinning_box();

    let mut seq = MemorySink::new();
    let seq_report =
        render_program_with(&program, settings(), &RenderThreading::default(), &mut seq).unwrap();
    let mut par = MemorySink::new();
    let par_report = render_program_with(&program, settings(), &parallel(3), &mut par).unwrap();

    assert_eq!(seq_report, par_report);
    assert_eq!(seq.events(), par.events());
    assert!(matches!(
        par.events().last(),
        Some(SinkEvent::Assembled { basename, frames }) if basename == "spin" && frames.len() == 8
    ));
}

#[test]
fn programs_that_write_symbols_fall_back_to_sequential() {
    let program = ProgramBuilder::new()
        .frames(3)
        .basename("set")
        .set("k", 1.0)
        .move_([1.0, 0.0, 0.0], Some("k"))
        .build()
        .unwrap();

    let mut sink = MemorySink::new();
    let report = render_program_with(&program, settings(), &parallel(2), &mut sink).unwrap();
    assert_eq!(report.frames.len(), 3);
    assert_eq!(sink.saved_paths().len(), 3);
}

#[test]
fn zero_threads_is_rejected() {
    let mut sink = MemorySink::new();
    let err = render_program_with(&spinning_box(), settings(), &parallel(0), &mut sink).unwrap_err();
    assert!(matches!(err, MdlError::Validation(_)));
    assert!(sink.events().is_empty());
}

#[test]
fn embedded_settings_are_used_by_default() {
    let program = ProgramBuilder::new()
        .settings(RenderSettings {
            width: 32,
            height: 16,
            ..RenderSettings::default()
        })
        .display()
        .build()
        .unwrap();

    let mut sink = MemorySink::new();
    render_program(&program, &mut sink).unwrap();
    let SinkEvent::Displayed { frame } = &sink.events()[0] else {
        panic!("expected a display");
    };
    assert_eq!((frame.width, frame.height), (32, 16));
}
