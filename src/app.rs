//! Mood Flow desktop front end.

use crate::config::AppConfig;
use crate::export::{spawn_png_export, ExportMessage};
use crate::input::{command_for_key, fit_canvas, percent_readout, to_canvas, Command};
use crate::mapping::MoodParams;
use crate::noise_source::PerlinNoise;
use crate::presets::PresetType;
use crate::raster::Raster;
use crate::simulation::Simulation;
use crate::surface::Surface;
use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Instant;

/// Frame time cap, so a stalled window does not jump the flow clock.
const MAX_DT: f32 = 0.1;

pub struct MoodFlowApp {
    config: AppConfig,
    params: MoodParams,
    preset: PresetType,
    sim: Simulation,
    raster: Raster,
    texture: Option<egui::TextureHandle>,
    last_update: Instant,
    last_dt: f32,

    export_tx: Sender<ExportMessage>,
    export_rx: Receiver<ExportMessage>,
    exports_in_flight: usize,
    status: Option<String>,
}

impl MoodFlowApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = egui::Color32::from_rgba_unmultiplied(15, 15, 25, 245);
        visuals.panel_fill = egui::Color32::from_rgba_unmultiplied(20, 20, 35, 240);
        cc.egui_ctx.set_visuals(visuals);

        let (export_tx, export_rx) = mpsc::channel();
        let (sim, raster) = build_scene(&config);
        log::info!(
            "Canvas {}x{}, {} particles, noise seed {}",
            config.canvas.width,
            config.canvas.height,
            sim.particles().len(),
            sim.noise_seed()
        );

        Self {
            params: config.mood.clamped(),
            config,
            preset: PresetType::Default,
            sim,
            raster,
            texture: None,
            last_update: Instant::now(),
            last_dt: 1.0 / 60.0,
            export_tx,
            export_rx,
            exports_in_flight: 0,
            status: None,
        }
    }

    /// Swap in a new configuration. The scene is rebuilt since canvas size
    /// and capacities may have changed.
    fn apply_config(&mut self, config: AppConfig) {
        let (sim, raster) = build_scene(&config);
        self.sim = sim;
        self.raster = raster;
        self.texture = None;
        self.params = config.mood.clamped();
        self.config = config;
    }

    fn reset(&mut self) {
        self.sim.reset(true);
        log::info!("Reset, noise seed {}", self.sim.noise_seed());
        self.status = Some("Canvas reset".to_string());
    }

    fn export_png(&mut self) {
        let (w, h) = self.raster.size();
        let rgba = self.raster.to_rgba().to_vec();
        spawn_png_export(
            PathBuf::from(&self.config.export.directory),
            self.config.export.file_stem.clone(),
            w,
            h,
            rgba,
            self.export_tx.clone(),
        );
        self.exports_in_flight += 1;
        self.status = Some("Exporting...".to_string());
    }

    fn run_command(&mut self, command: Command) {
        match command {
            Command::Reset => self.reset(),
            Command::Export => self.export_png(),
        }
    }

    fn poll_exports(&mut self) {
        while let Ok(msg) = self.export_rx.try_recv() {
            self.exports_in_flight = self.exports_in_flight.saturating_sub(1);
            match msg {
                ExportMessage::Completed(path) => {
                    log::info!("Saved {}", path.display());
                    self.status = Some(format!("Saved {}", path.display()));
                }
                ExportMessage::Error(e) => {
                    log::error!("Export failed: {e}");
                    self.status = Some(format!("Export failed: {e}"));
                }
            }
        }
    }

    fn save_config(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .save_file()
        else {
            return;
        };
        let mut config = self.config.clone();
        config.mood = self.params;
        match config.save(&path) {
            Ok(()) => {
                log::info!("Saved config to {}", path.display());
                self.status = Some(format!("Saved config to {}", path.display()));
            }
            Err(e) => {
                log::error!("Error saving config: {e:#}");
                self.status = Some(format!("Error saving config: {e:#}"));
            }
        }
    }

    fn load_config(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        else {
            return;
        };
        match AppConfig::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                self.apply_config(config);
                self.status = Some(format!("Loaded {}", path.display()));
            }
            Err(e) => {
                log::error!("Error loading config: {e:#}");
                self.status = Some(format!("Error loading config: {e:#}"));
            }
        }
    }

    fn render_controls(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("controls")
            .min_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Mood Flow");
                ui.separator();

                ui.horizontal(|ui| {
                    ui.label("Preset:");
                    egui::ComboBox::from_id_source("preset_combo")
                        .selected_text(self.preset.name())
                        .show_ui(ui, |ui| {
                            for preset in PresetType::all() {
                                if ui
                                    .selectable_value(&mut self.preset, preset, preset.name())
                                    .on_hover_text(preset.description())
                                    .changed()
                                {
                                    self.params = preset.params();
                                }
                            }
                        });
                });
                ui.separator();

                mood_slider(ui, &mut self.params.energy, "Energy", "Calm", "Wild");
                mood_slider(ui, &mut self.params.tension, "Tension", "Loose", "Tense");
                mood_slider(ui, &mut self.params.warmth, "Warmth", "Cool", "Warm");

                ui.add_space(8.0);
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("⟲ Reset").on_hover_text("R").clicked() {
                        self.reset();
                    }
                    if ui.button("📷 Export PNG").on_hover_text("S").clicked() {
                        self.export_png();
                    }
                });
                if self.sim.ripples().is_empty() && self.sim.lines().is_empty() {
                    ui.label(
                        egui::RichText::new("Move to leave ripples, click to draw lines.")
                            .small()
                            .weak(),
                    );
                }

                ui.add_space(16.0);
                ui.separator();
                ui.heading("💾 Configuration");
                ui.horizontal(|ui| {
                    if ui.button("💾 Save Config").clicked() {
                        self.save_config();
                    }
                    if ui.button("📂 Load Config").clicked() {
                        self.load_config();
                    }
                });

                ui.add_space(16.0);
                ui.separator();
                ui.label(format!("Particles: {}", self.sim.particles().len()));
                ui.label(format!(
                    "Ripples: {} / {}",
                    self.sim.ripples().len(),
                    self.sim.ripples().capacity()
                ));
                ui.label(format!(
                    "Lines: {} / {}",
                    self.sim.lines().len(),
                    self.sim.lines().capacity()
                ));
                ui.label(format!("Noise seed: {}", self.sim.noise_seed()));
                ui.label(format!("Clock: {:.1} s", self.sim.time_ms() / 1000.0));
                ui.label(format!("FPS: {:.0}", 1.0 / self.last_dt.max(0.001)));
                if self.exports_in_flight > 0 {
                    ui.spinner();
                }
                if let Some(status) = &self.status {
                    ui.label(egui::RichText::new(status).small());
                }
            });
    }

    /// Feed this frame's pointer events to the simulation. Moves leave a
    /// ripple only while no button is held; a primary press leaves a line.
    fn handle_pointer(&mut self, ctx: &egui::Context, display: egui::Rect) {
        let (cw, ch) = self.sim.size();
        let warmth = self.params.warmth;
        let (events, any_down) = ctx.input(|i| (i.events.clone(), i.pointer.any_down()));

        for event in events {
            match event {
                egui::Event::PointerMoved(pos) if !any_down => {
                    if let Some(p) = to_canvas(pos, display, cw, ch) {
                        self.sim.handle_pointer_move(p);
                    }
                }
                egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed: true,
                    ..
                } => {
                    if let Some(p) = to_canvas(pos, display, cw, ch) {
                        self.sim.handle_pointer_down(p, warmth);
                    }
                }
                _ => {}
            }
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let commands: Vec<Command> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        ..
                    } => command_for_key(*key),
                    _ => None,
                })
                .collect()
        });
        for command in commands {
            self.run_command(command);
        }
    }

    fn render_canvas(&mut self, ctx: &egui::Context, dt: f32) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::from_rgb(6, 8, 12)))
            .show(ctx, |ui| {
                let (cw, ch) = self.sim.size();
                let display = fit_canvas(ui.available_rect_before_wrap(), cw, ch);
                ui.allocate_rect(display, egui::Sense::click_and_drag());

                self.handle_pointer(ctx, display);
                self.sim.tick(dt, &self.params, &mut self.raster);

                let (w, h) = self.raster.size();
                let size = [w as usize, h as usize];
                let image = egui::ColorImage::from_rgba_unmultiplied(size, self.raster.to_rgba());
                match &mut self.texture {
                    Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
                    None => {
                        self.texture =
                            Some(ctx.load_texture("mood_canvas", image, egui::TextureOptions::LINEAR));
                    }
                }

                if let Some(texture) = &self.texture {
                    ui.painter().image(
                        texture.id(),
                        display,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }
            });
    }
}

impl eframe::App for MoodFlowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_update).as_secs_f32().min(MAX_DT);
        self.last_update = now;
        self.last_dt = dt;

        self.poll_exports();
        self.handle_keys(ctx);

        self.render_controls(ctx);
        self.render_canvas(ctx, dt);

        ctx.request_repaint();
    }
}

fn build_scene(config: &AppConfig) -> (Simulation, Raster) {
    let sim = Simulation::new(
        &config.canvas,
        config.simulation.clone(),
        Box::new(PerlinNoise::new(0)),
    );
    let raster = Raster::new(config.canvas.width, config.canvas.height);
    (sim, raster)
}

fn mood_slider(ui: &mut egui::Ui, value: &mut f32, label: &str, low: &str, high: &str) {
    ui.label(percent_readout(label, *value));
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(low).small().weak());
        ui.add(egui::Slider::new(value, 0.0..=1.0).show_value(false));
        ui.label(egui::RichText::new(high).small().weak());
    });
    ui.add_space(4.0);
}
