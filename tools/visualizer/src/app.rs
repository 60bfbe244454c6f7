use std::time::Instant;

use clarkepark_algo::state::{AMPLITUDE_RANGE, SPEED_RANGE};
use clarkepark_algo::{Command, Domain, Session};
use eframe::App;

use crate::plots::{self, vector_scene};

const VECTOR_SIZE: f32 = 300.0;
const WAVEFORM_HEIGHT: f32 = 300.0;

/// Frame-paced front end: every repaint is one simulation tick.
pub struct VisualizerApp {
    session: Session,
    started: Instant, // Origin of the tick timestamps
    last_error: Option<String>,
}

impl VisualizerApp {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            started: Instant::now(),
            last_error: None,
        }
    }

    fn send(&mut self, command: Command) {
        self.last_error = self.session.apply(command).err().map(|err| err.to_string());
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        let state = self.session.current_state();

        ui.horizontal(|ui| {
            if ui.button(if state.is_playing { "Pause" } else { "Play" }).clicked() {
                self.send(Command::TogglePlaying);
            }
            if ui.button("Reset").clicked() {
                self.send(Command::Reset);
            }
            let projections = if state.show_projections {
                "Hide projections"
            } else {
                "Show projections"
            };
            if ui.button(projections).clicked() {
                self.send(Command::ToggleProjections);
            }

            ui.separator();

            let mut speed = state.speed;
            let speed_slider = egui::Slider::new(&mut speed, SPEED_RANGE)
                .step_by(0.1)
                .suffix("x")
                .text("Speed");
            if ui.add(speed_slider).changed() {
                self.send(Command::SetSpeed(speed));
            }

            let mut amplitude = state.amplitude;
            let amplitude_slider = egui::Slider::new(&mut amplitude, AMPLITUDE_RANGE)
                .step_by(0.1)
                .text("Amplitude");
            if ui.add(amplitude_slider).changed() {
                self.send(Command::SetAmplitude(amplitude));
            }

            if let Some(err) = &self.last_error {
                ui.colored_label(egui::Color32::RED, err);
            }
        });
    }

    fn domain_row(&self, ui: &mut egui::Ui, domain: Domain) {
        let state = self.session.current_state();
        let scene = vector_scene(
            domain,
            self.session.current_phase(),
            self.session.current_clarke(),
            self.session.current_park(),
            state.show_projections,
        );
        let traces = self.session.history(domain).traces();

        let title = match domain {
            Domain::Abc => "Three-phase (abc)",
            Domain::AlphaBeta => "Clarke (αβ)",
            Domain::Dq => "Park (dq)",
        };

        ui.group(|ui| {
            ui.strong(title);
            ui.horizontal(|ui| {
                plots::show_vector_plot(ui, &format!("{title} vector"), &scene, VECTOR_SIZE);
                plots::show_waveform_plot(
                    ui,
                    &format!("{title} waveform"),
                    domain,
                    &traces,
                    WAVEFORM_HEIGHT,
                );
            });
        });
    }
}

impl App for VisualizerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.session.tick(self.started.elapsed());

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.heading("Clarke & Park transforms");
            self.controls(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                for domain in Domain::ALL {
                    self.domain_row(ui, domain);
                }
            });
        });

        // Keep ticking while paused so the time baseline follows the wall clock
        ctx.request_repaint();
    }
}
