use super::*;
use crate::layout::measure::FixedAdvanceMeasure;
use crate::text::tokenize::tokenize;

fn params() -> FlowParams {
    FlowParams {
        canvas: Canvas {
            width: 100,
            height: 50,
        },
        padding: 10.0,
        line_height: 6.0,
        font_size: 4.0,
    }
}

fn words(n: usize) -> String {
    vec!["aaaa"; n].join(" ")
}

#[test]
fn greedy_wrap_fills_rows_up_to_right_padding() {
    // "aaaa " is 10px wide with a 2px advance, so 8 words fit between x=10 and x=90.
    let mut m = FixedAdvanceMeasure::default();
    let layout = flow_words(tokenize(&words(10)), &params(), &mut m);

    assert_eq!(layout.rows(), 2);
    let ws = layout.words();
    for (i, w) in ws.iter().take(8).enumerate() {
        assert_eq!(w.origin, Point::new(10.0 + 10.0 * i as f64, 16.0));
    }
    assert_eq!(ws[8].origin, Point::new(10.0, 22.0));
    assert_eq!(ws[9].origin, Point::new(20.0, 22.0));
    assert_eq!(layout.content_height(), 32.0);
}

#[test]
fn anchor_is_glyph_middle_half_a_font_above_baseline() {
    let mut m = FixedAdvanceMeasure::default();
    let layout = flow_words(tokenize("Romeo,"), &params(), &mut m);
    let w = &layout.words()[0];
    // "Romeo, " advances 14px, the glyphs alone are 12px wide.
    assert_eq!(w.width, 14.0);
    assert_eq!(w.center, Point::new(10.0 + 6.0, 16.0 - 2.0));
}

#[test]
fn oversized_token_is_placed_whole_and_overflows() {
    let mut m = FixedAdvanceMeasure::default();
    let long = "x".repeat(100);
    let layout = flow_words(tokenize(&format!("{long} next")), &params(), &mut m);
    let ws = layout.words();
    assert_eq!(ws[0].origin, Point::new(10.0, 16.0));
    assert!(ws[0].right() > 90.0);
    assert_eq!(ws[1].origin, Point::new(10.0, 22.0));
}

#[test]
fn empty_input_yields_no_words_and_no_rows() {
    let mut m = FixedAdvanceMeasure::default();
    let mut layout = layout_tokens(Vec::new(), &params(), &mut m).unwrap();
    assert!(layout.words().is_empty());
    assert_eq!(layout.rows(), 0);
    assert_eq!(layout.horizontal_bounds(), None);
    assert_eq!(center_horizontally(&mut layout, 100.0), 0.0);
}

#[test]
fn fitting_content_is_left_unscaled() {
    // 5 rows end at baseline 40, content height 50 == canvas height.
    let mut m = FixedAdvanceMeasure::default();
    let mut layout = flow_words(tokenize(&words(40)), &params(), &mut m);
    let before = layout.clone();
    assert_eq!(fit_to_height(&mut layout, 50.0), 1.0);
    assert_eq!(layout, before);
}

#[test]
fn tall_content_is_scaled_into_the_canvas() {
    let mut m = FixedAdvanceMeasure::default();
    let mut layout = flow_words(tokenize(&words(41)), &params(), &mut m);
    assert_eq!(layout.content_height(), 56.0);
    let widths: Vec<f64> = layout.words().iter().map(|w| w.width).collect();

    let scale = fit_to_height(&mut layout, 50.0);
    assert!((scale - 50.0 / 56.0).abs() < 1e-12);
    assert_eq!(layout.content_scale(), scale);
    for w in layout.words() {
        assert!(w.origin.y <= 50.0);
        assert!(w.center.y <= 50.0);
    }
    let after: Vec<f64> = layout.words().iter().map(|w| w.width).collect();
    assert_eq!(widths, after);
    assert!((layout.words()[40].origin.y - 46.0 * scale).abs() < 1e-12);
}

#[test]
fn centering_balances_left_and_right_margins() {
    let mut m = FixedAdvanceMeasure::default();
    for n in [1usize, 3, 9, 41] {
        let layout = layout_tokens(tokenize(&words(n)), &params(), &mut m).unwrap();
        let (min_x, max_x) = layout.horizontal_bounds().unwrap();
        let used = max_x - min_x;
        assert!(
            (min_x + used / 2.0 - 50.0).abs() < 1e-9,
            "n={n} min_x={min_x} used={used}"
        );
    }
}

#[test]
fn centering_moves_anchors_with_origins() {
    let mut m = FixedAdvanceMeasure::default();
    let mut layout = flow_words(tokenize("ab cd"), &params(), &mut m);
    let before = layout.clone();
    let offset = center_horizontally(&mut layout, 100.0);
    // Block spans 10..22, so it moves to 44..56.
    assert_eq!(offset, 34.0);
    for (a, b) in before.words().iter().zip(layout.words()) {
        assert_eq!(b.origin.x - a.origin.x, offset);
        assert_eq!(b.center.x - a.center.x, offset);
        assert_eq!(b.origin.y, a.origin.y);
    }
}

#[test]
fn invalid_geometry_is_rejected() {
    let mut m = FixedAdvanceMeasure::default();
    let mut p = params();
    p.line_height = 0.0;
    assert!(layout_tokens(tokenize("a"), &p, &mut m).is_err());
    let mut p = params();
    p.padding = f64::NAN;
    assert!(layout_tokens(tokenize("a"), &p, &mut m).is_err());
}
