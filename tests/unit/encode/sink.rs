use super::*;

fn tiny(shade: u8) -> FrameRGBA {
    FrameRGBA {
        width: 1,
        height: 1,
        data: vec![shade, shade, shade, 255],
    }
}

#[test]
fn frame_numbers_sort_lexicographically_for_twelve_frames() {
    let digits = frame_digits(12, None);
    let names: Vec<String> = (0..12).map(|k| frame_file_name("anim", k, digits)).collect();

    assert_eq!(names[0], "anim000.png");
    assert_eq!(names[11], "anim011.png");
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(sorted, names);
}

#[test]
fn digits_grow_past_one_thousand_frames() {
    assert_eq!(frame_digits(1, None), 3);
    assert_eq!(frame_digits(1000, None), 3);
    assert_eq!(frame_digits(1001, None), 4);
    assert_eq!(frame_digits(20_000, None), 5);
    assert_eq!(frame_digits(12, Some(6)), 6);
    assert_eq!(frame_digits(12, Some(1)), 2);
    assert_eq!(frame_digits(10, Some(1)), 1);
    assert_eq!(frame_file_name("x", 7, 6), "x000007.png");
}

#[test]
fn memory_sink_records_calls_in_order() {
    let mut sink = MemorySink::new();
    sink.save(&tiny(1), Path::new("a.png")).unwrap();
    sink.display(&tiny(2)).unwrap();
    sink.assemble("demo", &[PathBuf::from("a.png")]).unwrap();

    assert_eq!(sink.saved_paths(), vec![Path::new("a.png")]);
    assert_eq!(
        sink.events()[1],
        SinkEvent::Displayed { frame: tiny(2) }
    );
    assert!(matches!(
        &sink.events()[2],
        SinkEvent::Assembled { basename, frames } if basename == "demo" && frames.len() == 1
    ));
}

#[test]
fn replay_forwards_every_event() {
    let mut recorded = MemorySink::new();
    recorded.save(&tiny(5), Path::new("f000.png")).unwrap();
    recorded.display(&tiny(6)).unwrap();
    let expected = recorded.events().to_vec();

    let mut target = MemorySink::new();
    target.display(&tiny(9)).unwrap();
    recorded.replay_into(&mut target).unwrap();

    assert_eq!(target.events().len(), 3);
    assert_eq!(&target.events()[1..], expected.as_slice());
}
