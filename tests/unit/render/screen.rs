use super::*;
use crate::render::geometry::box_mesh;

fn blank(w: u32, h: u32) -> Screen {
    Screen::new(w, h, Rgba8::WHITE).unwrap()
}

#[test]
fn empty_screen_renders_the_background() {
    let frame = Screen::new(8, 4, Rgba8::opaque(10, 20, 30))
        .unwrap()
        .render()
        .unwrap();
    assert_eq!((frame.width, frame.height), (8, 4));
    assert_eq!(frame.data.len(), 8 * 4 * 4);
    assert!(frame.data.chunks_exact(4).all(|px| px == [10, 20, 30, 255]));
}

#[test]
fn y_axis_points_up() {
    let mut screen = blank(100, 100);
    // Centered on pixel row 10 counted from the bottom.
    screen.draw_line(
        DVec3::new(0.0, 10.5, 0.0),
        DVec3::new(100.0, 10.5, 0.0),
        Rgba8::BLACK,
    );
    let frame = screen.render().unwrap();

    let near_bottom = frame.pixel(50, 89).unwrap();
    assert!(near_bottom[0] < 128, "expected a dark pixel, got {near_bottom:?}");
    assert_eq!(frame.pixel(50, 9).unwrap(), [255, 255, 255, 255]);
}

#[test]
fn back_faces_are_culled() {
    let mut screen = blank(64, 64);
    let mesh = box_mesh(DVec3::new(10.0, 10.0, 10.0), DVec3::new(40.0, 40.0, 40.0));
    screen.draw_polygons(&mesh, &DMat4::IDENTITY, Rgba8::BLACK);

    // Seen along -z only the front face (two triangles) winds counter-clockwise.
    assert_eq!(screen.stroke_count(), 2);
}

#[test]
fn transform_is_applied_before_culling() {
    let mut screen = blank(64, 64);
    let mesh = box_mesh(DVec3::ZERO, DVec3::splat(10.0));
    // Half a turn about y (exact, as a mirror in x and z) shows the old back face.
    screen.draw_polygons(
        &mesh,
        &DMat4::from_scale(DVec3::new(-1.0, 1.0, -1.0)),
        Rgba8::BLACK,
    );
    assert_eq!(screen.stroke_count(), 2);
}

#[test]
fn clear_drops_recorded_strokes() {
    let mut screen = blank(16, 16);
    screen.draw_line(DVec3::ZERO, DVec3::splat(15.0), Rgba8::BLACK);
    assert_eq!(screen.stroke_count(), 1);
    screen.clear();
    assert_eq!(screen.stroke_count(), 0);
    let frame = screen.render().unwrap();
    assert!(frame.data.chunks_exact(4).all(|px| px == [255, 255, 255, 255]));
}

#[test]
fn oversized_screen_is_rejected() {
    assert!(matches!(
        Screen::new(70_000, 10, Rgba8::WHITE),
        Err(MdlError::Validation(_))
    ));
    assert!(matches!(
        Screen::new(0, 10, Rgba8::WHITE),
        Err(MdlError::Validation(_))
    ));
}
