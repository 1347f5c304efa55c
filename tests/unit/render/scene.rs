use super::*;
use crate::connect::builder::{PairingPolicy, RevealPolicy, build_connections};
use crate::connect::markers::extract_markers;
use crate::foundation::core::{Canvas, Point, Rect};
use crate::layout::flow::layout_tokens;
use crate::layout::measure::FixedAdvanceMeasure;
use crate::render::cpu::CpuSurfaceOpts;
use crate::text::tokenize::tokenize;

#[derive(Debug, Clone, PartialEq)]
enum Cmd {
    Clear(Rect),
    Text(String, Point, TextStyle),
    Line(Point, Point, LineStyle),
}

#[derive(Default)]
struct Recording {
    cmds: Vec<Cmd>,
}

impl Surface for Recording {
    fn clear_rect(&mut self, rect: Rect) -> StarcrossResult<()> {
        self.cmds.push(Cmd::Clear(rect));
        Ok(())
    }

    fn fill_text(&mut self, text: &str, origin: Point, style: &TextStyle) -> StarcrossResult<()> {
        self.cmds.push(Cmd::Text(text.to_owned(), origin, *style));
        Ok(())
    }

    fn stroke_line(&mut self, from: Point, to: Point, style: &LineStyle) -> StarcrossResult<()> {
        self.cmds.push(Cmd::Line(from, to, *style));
        Ok(())
    }
}

fn small_config() -> VisualConfig {
    VisualConfig {
        canvas: Canvas {
            width: 100,
            height: 50,
        },
        padding: 10.0,
        ..VisualConfig::default()
    }
}

fn fixture(text: &str, cfg: &VisualConfig) -> (LayoutResult, Vec<Connection>) {
    let mut m = FixedAdvanceMeasure::default();
    let layout = layout_tokens(tokenize(text), &cfg.flow_params(), &mut m).unwrap();
    let markers = extract_markers(layout.words());
    let connections = build_connections(
        &markers,
        PairingPolicy::Cross,
        RevealPolicy::Chronological,
        0,
    );
    (layout, connections)
}

#[test]
fn scene_draws_text_then_revealed_prefix() {
    let cfg = small_config();
    let (layout, connections) = fixture("Romeo loves Juliet. Juliet loves Romeo.", &cfg);
    assert_eq!(connections.len(), 4);

    let mut rec = Recording::default();
    let scene = SceneFrame {
        layout: &layout,
        connections: &connections,
        revealed: 3,
        generation: 0,
    };
    render_scene(&mut rec, &scene, &cfg).unwrap();

    assert_eq!(rec.cmds.len(), 1 + 6 + 3);
    assert_eq!(rec.cmds[0], Cmd::Clear(cfg.canvas.rect()));
    let texts: Vec<&str> = rec.cmds[1..7]
        .iter()
        .map(|c| match c {
            Cmd::Text(t, _, style) => {
                assert_eq!(style.color, cfg.text_color);
                assert_eq!(style.font_size, cfg.font_size);
                t.as_str()
            }
            other => panic!("expected text, got {other:?}"),
        })
        .collect();
    assert_eq!(texts, ["Romeo", "loves", "Juliet.", "Juliet", "loves", "Romeo."]);

    for (cmd, c) in rec.cmds[7..].iter().zip(&connections) {
        let Cmd::Line(from, to, style) = cmd else {
            panic!("expected line, got {cmd:?}");
        };
        assert_eq!((*from, *to), (c.from.point, c.to.point));
        assert_eq!(style.opacity, 0.4);
        assert!((style.width - 0.15).abs() < 1e-12);
    }
}

#[test]
fn revealed_is_clamped_to_connection_count() {
    let cfg = small_config();
    let (layout, connections) = fixture("Romeo Juliet", &cfg);
    let mut rec = Recording::default();
    let scene = SceneFrame {
        layout: &layout,
        connections: &connections,
        revealed: 99,
        generation: 0,
    };
    render_scene(&mut rec, &scene, &cfg).unwrap();
    let lines = rec
        .cmds
        .iter()
        .filter(|c| matches!(c, Cmd::Line(..)))
        .count();
    assert_eq!(lines, 1);
}

#[test]
fn scaled_layout_scales_font_and_line_width() {
    let cfg = VisualConfig {
        canvas: Canvas {
            width: 40,
            height: 20,
        },
        padding: 2.0,
        ..VisualConfig::default()
    };
    let text = vec!["Romeo Juliet"; 20].join(" ");
    let (layout, _) = fixture(&text, &cfg);
    let scale = layout.content_scale();
    assert!(scale < 1.0);

    assert!((text_style(&cfg, scale).font_size - 4.0 * scale).abs() < 1e-12);
    assert_eq!(line_style(&cfg, scale).width, 0.05f64.max(0.15 * scale));
}

fn renderer(cfg: &VisualConfig) -> SceneRenderer {
    let surface = CpuSurface::new(CpuSurfaceOpts::new(cfg.canvas), None).unwrap();
    SceneRenderer::new(surface, cfg.clone())
}

fn alpha_sum(frame: &FrameRGBA) -> u64 {
    frame.data.chunks_exact(4).map(|px| u64::from(px[3])).sum()
}

#[test]
fn renderer_draws_incrementally_and_rewinds() {
    let cfg = small_config();
    let (layout, connections) = fixture("Romeo loves Juliet. Juliet loves Romeo.", &cfg);
    let mut r = renderer(&cfg);
    let scene = |revealed, generation| SceneFrame {
        layout: &layout,
        connections: &connections,
        revealed,
        generation,
    };

    let empty = r.render(&scene(0, 0)).unwrap();
    assert_eq!(alpha_sum(&empty), 0);
    assert_eq!(r.frame_size(), (100, 50));

    let two = r.render(&scene(2, 0)).unwrap();
    assert_eq!(r.drawn(), 2);
    let four = r.render(&scene(4, 0)).unwrap();
    assert!(alpha_sum(&four) > alpha_sum(&two));
    assert!(alpha_sum(&two) > 0);

    // Going backwards restarts from the word layer.
    let back = r.render(&scene(2, 0)).unwrap();
    assert_eq!(r.drawn(), 2);
    assert!(alpha_sum(&back).abs_diff(alpha_sum(&two)) <= 4);

    // A new generation redraws from scratch even at the same count.
    r.render(&scene(2, 1)).unwrap();
    assert_eq!(r.drawn(), 2);

    r.invalidate();
    assert_eq!(r.drawn(), 0);
    assert_eq!(alpha_sum(&r.render(&scene(0, 1)).unwrap()), 0);
}
