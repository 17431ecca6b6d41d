use super::*;
use crate::program::dsl::ProgramBuilder;

fn plan(builder: ProgramBuilder) -> MdlResult<AnimationPlan> {
    build_plan(&builder.build()?)
}

#[test]
fn interpolation_matches_formula_and_hits_endpoints_exactly() {
    let (sf, ef, sv, ev) = (2u32, 9u32, 0.1, 0.3);
    let p = plan(
        ProgramBuilder::new()
            .frames(12)
            .basename("t")
            .vary("k", sf, ef, sv, ev),
    )
    .unwrap();
    let timeline = p.timeline.unwrap();

    for f in sf..=ef {
        let got = timeline.frame(FrameIndex(f)).unwrap()["k"];
        let expected = sv + f64::from(f - sf) / f64::from(ef - sf) * (ev - sv);
        assert!((got - expected).abs() < 1e-12, "frame {f}: {got} vs {expected}");
    }
    assert_eq!(timeline.frame(FrameIndex(sf)).unwrap()["k"], sv);
    assert_eq!(timeline.frame(FrameIndex(ef)).unwrap()["k"], ev);
    assert!(timeline.frame(FrameIndex(1)).unwrap().is_empty());
    assert!(timeline.frame(FrameIndex(10)).unwrap().is_empty());
}

#[test]
fn vary_without_frames_is_fatal() {
    let err = plan(ProgramBuilder::new().vary("k", 0, 4, 0.0, 1.0)).unwrap_err();
    assert!(matches!(err, MdlError::Config(_)));
}

#[test]
fn frames_without_basename_uses_default_and_warns() {
    let p = plan(ProgramBuilder::new().frames(3)).unwrap();
    assert_eq!(p.config.num_frames, 3);
    assert_eq!(p.config.basename, DEFAULT_BASENAME);
    assert_eq!(p.config.warnings, vec![ConfigWarning::DefaultBasename]);
    assert_eq!(p.timeline.map(|t| t.len()), Some(3));
}

#[test]
fn no_frames_means_a_single_static_run() {
    let p = plan(ProgramBuilder::new().sphere([0.0; 3], 1.0)).unwrap();
    assert_eq!(p.config.num_frames, 1);
    assert!(!p.config.is_animated());
    assert!(p.timeline.is_none());
    assert!(p.config.warnings.is_empty());
}

#[test]
fn zero_frames_is_a_config_error() {
    assert!(matches!(
        plan(ProgramBuilder::new().frames(0)),
        Err(MdlError::Config(_))
    ));
}

#[test]
fn empty_or_reversed_vary_range_is_rejected() {
    for (sf, ef) in [(3, 3), (5, 2)] {
        let err = plan(
            ProgramBuilder::new()
                .frames(10)
                .basename("t")
                .vary("k", sf, ef, 0.0, 1.0),
        )
        .unwrap_err();
        assert!(
            matches!(err, MdlError::InvalidRange { ref knob, start_frame, end_frame }
                if knob == "k" && start_frame == sf && end_frame == ef),
            "{err}"
        );
    }
}

#[test]
fn invalid_range_is_rejected_even_for_a_single_frame() {
    let err = plan(ProgramBuilder::new().frames(1).vary("k", 2, 2, 0.0, 1.0)).unwrap_err();
    assert!(matches!(err, MdlError::InvalidRange { .. }));
}

#[test]
fn later_vary_wins_on_overlapping_frames() {
    let p = plan(
        ProgramBuilder::new()
            .frames(6)
            .basename("t")
            .vary("k", 0, 4, 0.0, 4.0)
            .vary("k", 2, 5, 100.0, 103.0),
    )
    .unwrap();
    let timeline = p.timeline.unwrap();

    assert_eq!(timeline.frame(FrameIndex(1)).unwrap()["k"], 1.0);
    assert_eq!(timeline.frame(FrameIndex(2)).unwrap()["k"], 100.0);
    assert!((timeline.frame(FrameIndex(4)).unwrap()["k"] - 102.0).abs() < 1e-12);
    assert_eq!(timeline.frame(FrameIndex(5)).unwrap()["k"], 103.0);
}

#[test]
fn first_frames_and_basename_win() {
    let p = plan(
        ProgramBuilder::new()
            .frames(4)
            .basename("first")
            .frames(9)
            .basename("second"),
    )
    .unwrap();
    assert_eq!(p.config.num_frames, 4);
    assert_eq!(p.config.basename, "first");
    assert_eq!(
        p.config.warnings,
        vec![
            ConfigWarning::DuplicateFrames { ignored: 9 },
            ConfigWarning::DuplicateBasename {
                ignored: "second".to_string()
            },
        ]
    );
}

#[test]
fn carried_frames_keep_values_after_a_vary_ends() {
    let p = plan(
        ProgramBuilder::new()
            .frames(5)
            .basename("t")
            .vary("a", 0, 2, 0.0, 2.0)
            .vary("b", 3, 4, 10.0, 20.0),
    )
    .unwrap();
    let carried = p.timeline.unwrap().carried_frames();

    assert_eq!(carried.len(), 5);
    assert_eq!(carried[0].get("b"), None);
    assert_eq!(carried[3]["a"], 2.0);
    assert_eq!(carried[3]["b"], 10.0);
    assert_eq!(carried[4]["a"], 2.0);
    assert_eq!(carried[4]["b"], 20.0);
}

#[test]
fn warnings_render_readably() {
    assert_eq!(
        ConfigWarning::DefaultBasename.to_string(),
        "no basename given, using 'default'"
    );
}
