//! Equations sidebar and HUD panels
//!
//! egui panels around the scene: governing equations on the right, live
//! readouts on top, last-run deflection and the controls legend at the bottom.

use egui::{Color32, Context, FontFamily, FontId, RichText};

use crate::controller::Snapshot;

/// Equation entry with label and formula
pub struct Equation {
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
}

pub const HALL_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Lorentz Force",
        formula: "F = q(E + v × B)",
        description: "Transverse part drives the deflection",
    },
    Equation {
        name: "Hall Field",
        formula: "E_H = V_H / d",
        description: "Uniform field across the conductor",
    },
    Equation {
        name: "Hall Voltage",
        formula: "V_H = (N_bot − N_top) k · sgn(q)",
        description: "Set by the edge charge imbalance",
    },
    Equation {
        name: "Equilibrium",
        formula: "qE_H = −q v_x B  ⇒  V_H = −v_x B d",
        description: "Carriers cross undeflected",
    },
    Equation {
        name: "Drift",
        formula: "v_x = I",
        description: "Current sets the drift speed",
    },
];

pub const HALL_VARIABLES: &[(&str, &str)] = &[
    ("q", "Carrier charge (sign = type)"),
    ("v_x", "Drift speed"),
    ("B", "Magnetic field strength"),
    ("I", "Drive-current factor"),
    ("d", "Conductor height"),
    ("N", "Carriers collected on an edge"),
    ("k", "Voltage calibration"),
];

pub const CONTROLS: &str = "Up/Down: field B | Left/Right: current I\n\
                            S: switch carrier | R: reset | Space: pause/run";

/// Live parameter readout
pub fn format_info(snapshot: &Snapshot) -> String {
    format!(
        "Magnetic field (B): {:.2} T\nCurrent factor (I): {:.2}\nAccumulated carriers: {}\n\nHall voltage (V_H): {:.3e} V",
        snapshot.magnetic_field,
        snapshot.current_factor,
        snapshot.total_carriers,
        snapshot.hall_voltage,
    )
}

/// Deflection of the last completed run
pub fn format_last_run(snapshot: &Snapshot) -> String {
    format!(
        "Last run -> X deflection: {:.1} px | Y deflection: {:.1} px",
        snapshot.last_x_deflection, snapshot.last_y_deflection,
    )
}

/// Draw a styled equation sidebar
pub fn draw_equations_sidebar(
    ctx: &Context,
    title: &str,
    equations: &[Equation],
    variables: &[(&str, &str)],
) {
    egui::SidePanel::right("equations_panel")
        .min_width(280.0)
        .max_width(350.0)
        .resizable(true)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(RichText::new(title).color(Color32::from_rgb(100, 200, 255)));
            });

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(5.0);

            ui.label(RichText::new("Equations").strong().color(Color32::from_rgb(255, 200, 100)));
            ui.add_space(5.0);

            for eq in equations {
                draw_equation(ui, eq);
                ui.add_space(8.0);
            }

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(5.0);

            ui.label(RichText::new("Variables").strong().color(Color32::from_rgb(255, 200, 100)));
            ui.add_space(5.0);

            for (symbol, meaning) in variables {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(*symbol).color(Color32::from_rgb(150, 255, 150))
                        .font(FontId::new(14.0, FontFamily::Monospace)));
                    ui.label(RichText::new("=").color(Color32::GRAY));
                    ui.label(RichText::new(*meaning).color(Color32::LIGHT_GRAY));
                });
            }
        });
}

fn draw_equation(ui: &mut egui::Ui, eq: &Equation) {
    ui.group(|ui| {
        ui.label(RichText::new(eq.name).strong().color(Color32::WHITE));
        ui.label(
            RichText::new(eq.formula)
                .font(FontId::new(16.0, FontFamily::Monospace))
                .color(Color32::from_rgb(200, 220, 255))
        );
        ui.label(RichText::new(eq.description).small().color(Color32::GRAY));
    });
}

/// Readouts on top, last run and controls at the bottom
pub fn draw_hud(ctx: &Context, snapshot: &Snapshot) {
    egui::TopBottomPanel::top("status").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(format_info(snapshot))
                    .font(FontId::new(15.0, FontFamily::Monospace))
                    .color(Color32::WHITE),
            );
            ui.separator();
            ui.label(
                RichText::new(snapshot.polarity.label()).color(polarity_color(snapshot)),
            );
            if snapshot.paused {
                ui.label(RichText::new("PAUSED").color(Color32::YELLOW));
            }
        });
    });

    egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
        ui.label(RichText::new(CONTROLS).color(Color32::from_rgb(200, 200, 200)));
        ui.label(RichText::new(format_last_run(snapshot)).color(Color32::YELLOW));
    });
}

fn polarity_color(snapshot: &Snapshot) -> Color32 {
    let [r, g, b, _] = snapshot.polarity.color();
    Color32::from_rgb((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}
