use eframe::egui;

use pbr_dashboard::state::AppState;

use crate::ui::{panels, plot, report};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct DashboardApp {
    pub state: AppState,
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: table, charts, observations ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    report::intro(ui);
                    report::data_table(ui, &self.state);
                    plot::target_scatter(ui, &self.state);
                    report::overall_metric(ui, &self.state);
                    plot::indicator_bars(ui, &self.state);
                    plot::entity_bars(ui, &self.state);
                    report::observations(ui, &self.state);
                });
        });
    }
}
