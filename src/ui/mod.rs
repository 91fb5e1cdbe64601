/// Presentation layer: egui widgets drawn from `AppState`.
pub mod panels;
pub mod plot;
pub mod report;
