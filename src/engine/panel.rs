use std::path::PathBuf;

use egui::epaint::Shadow;

use super::fleet::{ShipRecord, total_value};

/// One ship's floating label, already projected to egui screen points.
pub struct ShipLabelDraw {
    /// Label anchor (bottom-centre) in egui screen points.
    pub pos: egui::Pos2,
    pub name: String,
    pub manufacturer: String,
}

/// Outcome of one panel frame that the host has to act on.
pub enum PanelAction {
    None,
    /// The user picked a fleet JSON file to load.
    LoadFile(PathBuf),
}

pub struct FleetPanel {
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl FleetPanel {
    pub fn new(
        window: &winit::window::Window,
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let egui_ctx = egui::Context::default();

        // Style: dark, flat panels over the 3D viewport
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = egui::Color32::from_rgba_premultiplied(18, 20, 26, 240);
        visuals.window_stroke = egui::Stroke::NONE;
        visuals.window_shadow = Shadow::NONE;
        egui_ctx.set_visuals(visuals);

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface_format,
            None,  // no depth
            1,     // msaa samples
            false, // no dithering
        );

        Self {
            egui_ctx,
            egui_state,
            egui_renderer,
        }
    }

    pub fn handle_window_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> egui_winit::EventResponse {
        self.egui_state.on_window_event(window, event)
    }

    /// Render one egui frame: the floating ship labels (background layer,
    /// behind all widgets) plus the right-hand side panel with upload
    /// controls, aggregate stats and the scrollable fleet list.
    ///
    /// Returns the action the host has to perform, if any.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &winit::window::Window,
        view: &wgpu::TextureView,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
        fleet: &[ShipRecord],
        status: &str,
        labels: &[ShipLabelDraw],
    ) -> PanelAction {
        let raw_input = self.egui_state.take_egui_input(window);
        let mut action = PanelAction::None;

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            draw_ship_labels(ctx, labels);

            egui::SidePanel::right("fleet_panel")
                .resizable(false)
                .exact_width(300.0)
                .show(ctx, |ui| {
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        ui.heading("FleetView");
                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                ui.weak(format!("{} ships", fleet.len()));
                            },
                        );
                    });
                    ui.separator();

                    if ui.button("Load fleet JSON…").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .pick_file()
                        {
                            action = PanelAction::LoadFile(path);
                        }
                    }
                    ui.weak("…or drop a .json file onto the window");
                    if !status.is_empty() {
                        ui.label(status);
                    }
                    ui.separator();

                    ui.strong("Stats");
                    ui.label(format!("Total ships: {}", fleet.len()));
                    ui.label(format!(
                        "Total value: {} aUEC",
                        group_thousands(total_value(fleet))
                    ));
                    ui.separator();

                    ui.strong("Fleet list");
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        for ship in fleet {
                            fleet_list_row(ui, ship);
                        }
                    });
                });
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, &tris, screen_descriptor);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.egui_renderer
                .render(&mut render_pass.forget_lifetime(), &tris, screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        action
    }
}

/// Name + manufacturer floated above each box: a dark pill anchored just
/// above the box top, drawn on a background layer so it never covers the
/// side panel.
fn draw_ship_labels(ctx: &egui::Context, labels: &[ShipLabelDraw]) {
    if labels.is_empty() {
        return;
    }
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Background,
        egui::Id::new("ship_labels"),
    ));
    let name_font = egui::FontId::proportional(13.0);
    let sub_font = egui::FontId::proportional(10.0);

    for label in labels {
        let name = painter.layout_no_wrap(
            label.name.clone(),
            name_font.clone(),
            egui::Color32::WHITE,
        );
        let sub = painter.layout_no_wrap(
            label.manufacturer.clone(),
            sub_font.clone(),
            egui::Color32::from_gray(190),
        );
        let width = name.size().x.max(sub.size().x) + 10.0;
        let height = name.size().y + sub.size().y + 8.0;
        let rect = egui::Rect::from_min_size(
            egui::pos2(label.pos.x - width / 2.0, label.pos.y - height),
            egui::vec2(width, height),
        );
        painter.rect_filled(rect, 4.0, egui::Color32::from_black_alpha(180));
        painter.galley(
            egui::pos2(rect.center().x - name.size().x / 2.0, rect.top() + 3.0),
            name.clone(),
            egui::Color32::WHITE,
        );
        painter.galley(
            egui::pos2(
                rect.center().x - sub.size().x / 2.0,
                rect.top() + 3.0 + name.size().y,
            ),
            sub,
            egui::Color32::from_gray(190),
        );
    }
}

fn fleet_list_row(ui: &mut egui::Ui, ship: &ShipRecord) {
    egui::Frame::none()
        .fill(egui::Color32::from_rgb(28, 31, 38))
        .inner_margin(egui::Margin::same(6.0))
        .rounding(4.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.strong(&ship.ship_name);
                    ui.weak(format!("{} • {}", ship.manufacturer, ship.ship_type));
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.vertical(|ui| {
                        ui.label(metres(ship.length));
                        ui.weak(format!("{} m³", number_or_dash(ship.cargo)));
                    });
                });
            });
        });
    ui.add_space(4.0);
}

fn metres(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}m", trim_number(v)),
        None => "-".into(),
    }
}

fn number_or_dash(value: Option<f64>) -> String {
    match value {
        Some(v) => trim_number(v),
        None => "-".into(),
    }
}

/// "126" rather than "126.0", but keep one decimal when it matters.
fn trim_number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.1}", v)
    }
}

/// Thousands-separated integer rendering, e.g. 62545000 → "62,545,000".
/// Formats through the float itself, so magnitudes beyond integer range
/// still print in full instead of saturating.
pub fn group_thousands(v: f64) -> String {
    let digits = format!("{:.0}", v.round());
    if digits == "-0" {
        return "0".into();
    }
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits.as_str()),
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("{}{}", sign, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(45_000.0), "45,000");
        assert_eq!(group_thousands(62_545_000.0), "62,545,000");
        assert_eq!(group_thousands(-1_234.0), "-1,234");
        // Beyond i64 range: still printed in full, not saturated.
        assert_eq!(group_thousands(1e19), "10,000,000,000,000,000,000");
        assert_eq!(group_thousands(1_234.6), "1,235");
    }

    #[test]
    fn test_cargo_placeholder() {
        assert_eq!(number_or_dash(None), "-");
        assert_eq!(number_or_dash(Some(46.0)), "46");
        assert_eq!(metres(Some(36.5)), "36.5m");
        assert_eq!(metres(None), "-");
    }
}
