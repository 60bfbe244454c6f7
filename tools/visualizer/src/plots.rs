use clarkepark_algo::math_float::space_vector::{phase_axes, Point};
use clarkepark_algo::{ClarkePair, Domain, ParkPair, PhaseTriple};
use egui::Color32;
use egui_plot::{Arrows, Legend, Line, LineStyle, Plot, PlotPoints, Text};

/// Waveform view range, wide enough for the largest offered amplitude
pub const WAVEFORM_RANGE: f64 = 1.5;
/// Vector view half-width
const VECTOR_RANGE: f64 = 1.6;
/// Axis length in the vector views
const AXIS_LENGTH: f64 = 1.3;
/// Components smaller than this get no projection guide, it would overlap the axis
const GUIDE_THRESHOLD: f64 = 0.05;

pub const COLOR_A: Color32 = Color32::from_rgb(0xd0, 0x00, 0x00);
pub const COLOR_B: Color32 = Color32::from_rgb(0x00, 0x40, 0xd0);
pub const COLOR_C: Color32 = Color32::from_rgb(0x00, 0x80, 0x00);
pub const COLOR_ALPHA: Color32 = Color32::from_rgb(0xd9, 0x5f, 0x02);
pub const COLOR_BETA: Color32 = Color32::from_rgb(0x7b, 0x00, 0xcf);
pub const COLOR_D: Color32 = Color32::from_rgb(0x08, 0x91, 0xb2);
pub const COLOR_Q: Color32 = Color32::from_rgb(0xc0, 0x26, 0xd3);
pub const COLOR_VECTOR: Color32 = Color32::from_rgb(0x11, 0x18, 0x27);
const COLOR_AXIS: Color32 = Color32::from_rgb(0x94, 0xa3, 0xb8);

static ABC_TRACES: [(Color32, &str); 3] = [(COLOR_A, "Ia"), (COLOR_B, "Ib"), (COLOR_C, "Ic")];
static ALPHA_BETA_TRACES: [(Color32, &str); 2] = [(COLOR_ALPHA, "Iα"), (COLOR_BETA, "Iβ")];
static DQ_TRACES: [(Color32, &str); 2] = [(COLOR_D, "Id"), (COLOR_Q, "Iq")];

/// Trace colors and labels per domain
pub fn trace_style(domain: Domain) -> &'static [(Color32, &'static str)] {
    match domain {
        Domain::Abc => &ABC_TRACES,
        Domain::AlphaBeta => &ALPHA_BETA_TRACES,
        Domain::Dq => &DQ_TRACES,
    }
}

/// Plot points of a newest-first trace, newest sample at the right edge.
pub fn waveform_points(trace: &[f64]) -> Vec<[f64; 2]> {
    let last = trace.len().saturating_sub(1);
    trace
        .iter()
        .enumerate()
        .map(|(age, value)| [(last - age) as f64, *value])
        .collect()
}

pub struct Arrow {
    pub tip: Point,
    pub color: Color32,
    pub label: &'static str,
}

pub struct Axis {
    pub end: Point,
    pub label: &'static str,
}

/// Everything a vector diagram draws, in plot coordinates
pub struct VectorScene {
    pub axes: Vec<Axis>,
    pub arrows: Vec<Arrow>,      // All start at the origin
    pub guides: Vec<[Point; 2]>, // Dashed projection lines
}

/// Builds the vector diagram of `domain` from the current values.
pub fn vector_scene(
    domain: Domain,
    phase: PhaseTriple,
    clarke: ClarkePair,
    park: ParkPair,
    show_projections: bool,
) -> VectorScene {
    let mut scene = VectorScene {
        axes: Vec::new(),
        arrows: Vec::new(),
        guides: Vec::new(),
    };

    let resultant = match domain {
        Domain::Abc => {
            let labels = ["a", "b", "c"];
            for (axis, label) in phase_axes().iter().zip(labels) {
                scene.axes.push(Axis {
                    end: [axis[0] * AXIS_LENGTH, axis[1] * AXIS_LENGTH],
                    label,
                });
            }
            if show_projections {
                let colors = [COLOR_A, COLOR_B, COLOR_C];
                let tip = clarke.point();
                let phasors = phase.space_vectors().into_iter().zip(colors).zip(labels);
                for ((vector, color), label) in phasors {
                    scene.guides.push([tip, vector]);
                    scene.arrows.push(Arrow { tip: vector, color, label });
                }
            }
            clarke.point()
        }
        Domain::AlphaBeta => {
            scene.axes.extend(orthogonal_axes("α", "β"));
            if show_projections {
                push_components(
                    &mut scene,
                    [clarke.alpha, clarke.beta],
                    [COLOR_ALPHA, COLOR_BETA],
                    ["α", "β"],
                );
            }
            clarke.point()
        }
        Domain::Dq => {
            scene.axes.extend(orthogonal_axes("d", "q"));
            if show_projections {
                push_components(&mut scene, [park.d, park.q], [COLOR_D, COLOR_Q], ["d", "q"]);
            }
            [park.d, park.q]
        }
    };

    scene.arrows.push(Arrow {
        tip: resultant,
        color: COLOR_VECTOR,
        label: "resultant",
    });
    scene
}

fn orthogonal_axes(x: &'static str, y: &'static str) -> [Axis; 2] {
    [
        Axis { end: [AXIS_LENGTH, 0.0], label: x },
        Axis { end: [0.0, AXIS_LENGTH], label: y },
    ]
}

// Component arrows along both axes plus the projection box of the resultant
fn push_components(
    scene: &mut VectorScene,
    [x, y]: [f64; 2],
    colors: [Color32; 2],
    labels: [&'static str; 2],
) {
    scene.arrows.push(Arrow { tip: [x, 0.0], color: colors[0], label: labels[0] });
    scene.arrows.push(Arrow { tip: [0.0, y], color: colors[1], label: labels[1] });
    if y.abs() > GUIDE_THRESHOLD {
        scene.guides.push([[x, 0.0], [x, y]]);
    }
    if x.abs() > GUIDE_THRESHOLD {
        scene.guides.push([[0.0, y], [x, y]]);
    }
}

pub fn show_vector_plot(ui: &mut egui::Ui, id: &str, scene: &VectorScene, size: f32) {
    Plot::new(id)
        .width(size)
        .height(size)
        .data_aspect(1.0)
        .include_x(-VECTOR_RANGE)
        .include_x(VECTOR_RANGE)
        .include_y(-VECTOR_RANGE)
        .include_y(VECTOR_RANGE)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_axes(false)
        .show(ui, |plot_ui| {
            for axis in &scene.axes {
                plot_ui.line(
                    Line::new(PlotPoints::from(vec![[0.0, 0.0], axis.end]))
                        .color(COLOR_AXIS)
                        .width(1.0),
                );
                plot_ui.text(Text::new(axis.end.into(), axis.label).color(COLOR_AXIS));
            }
            for guide in &scene.guides {
                plot_ui.line(
                    Line::new(PlotPoints::from(guide.to_vec()))
                        .color(COLOR_AXIS)
                        .style(LineStyle::dashed_loose()),
                );
            }
            for arrow in &scene.arrows {
                plot_ui.arrows(
                    Arrows::new(vec![[0.0, 0.0]], vec![arrow.tip])
                        .color(arrow.color)
                        .name(arrow.label),
                );
            }
        });
}

pub fn show_waveform_plot(
    ui: &mut egui::Ui,
    id: &str,
    domain: Domain,
    traces: &[Vec<f64>],
    height: f32,
) {
    Plot::new(id)
        .height(height)
        .include_y(-WAVEFORM_RANGE)
        .include_y(WAVEFORM_RANGE)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            for (trace, (color, label)) in traces.iter().zip(trace_style(domain)) {
                plot_ui.line(
                    Line::new(PlotPoints::from(waveform_points(trace)))
                        .color(*color)
                        .width(2.0)
                        .name(*label),
                );
            }
        });
}
