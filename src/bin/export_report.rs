//! Headless exporter: apply a selection to the generated dataset, write the
//! CSV and Excel exports, and print the same observations the dashboard shows.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use pbr_dashboard::analysis::aggregate::AggregateRow;
use pbr_dashboard::analysis::observations::{Assessment, Thresholds};
use pbr_dashboard::data::filter::Selection;
use pbr_dashboard::data::generator::{generate, GeneratorConfig};
use pbr_dashboard::data::model::{Entity, Indicator};
use pbr_dashboard::export::{self, ExportFormat};
use pbr_dashboard::report::render;

#[derive(Debug, Parser)]
#[command(name = "export_report", about = "Export filtered compliance data and observations")]
struct Args {
    /// Dataset seed.
    #[arg(long, default_value_t = GeneratorConfig::default().seed)]
    seed: u64,

    /// Number of generated records.
    #[arg(long, default_value_t = GeneratorConfig::default().size)]
    size: usize,

    /// Entity to keep (repeatable). All entities when omitted.
    #[arg(long = "entity", value_name = "LABEL")]
    entities: Vec<Entity>,

    /// Indicator to keep (repeatable). All indicators when omitted.
    #[arg(long = "indicator", value_name = "LABEL")]
    indicators: Vec<Indicator>,

    /// Directory receiving filtered_data.csv and filtered_data.xlsx.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

impl Args {
    fn selection(&self) -> Selection {
        let mut selection = Selection::new(self.entities.iter().copied(), self.indicators.iter().copied());
        if self.entities.is_empty() {
            selection.select_all_entities();
        }
        if self.indicators.is_empty() {
            selection.select_all_indicators();
        }
        selection
    }
}

fn print_extremes(title: &str, best: Option<&AggregateRow>, worst: Option<&AggregateRow>) {
    if let (Some(best), Some(worst)) = (best, worst) {
        println!(
            "{title}: best {} ({:.2} %), worst {} ({:.2} %)",
            best.group, best.mean_compliance_pct, worst.group, worst.mean_compliance_pct
        );
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = GeneratorConfig {
        seed: args.seed,
        size: args.size,
    };
    let dataset = generate(&config);
    let selection = args.selection();
    let vm = render(&dataset, &selection, &Thresholds::default());
    let view = vm.view(&dataset);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    for format in [ExportFormat::Csv, ExportFormat::Xlsx] {
        let path = args.out_dir.join(format.default_file_name());
        export::save(&view, &path, format)
            .with_context(|| format!("exporting {}", path.display()))?;
    }

    println!("{} of {} records visible", view.len(), dataset.len());
    if let Some(stats) = &vm.summary {
        println!("Overall average compliance: {:.2} %", stats.mean);
    }
    print_extremes("Indicators", vm.best_indicator(), vm.worst_indicator());
    print_extremes("Entities", vm.best_entity(), vm.worst_entity());

    println!();
    if let Assessment::SingleEntity { entity, .. } = &vm.assessment {
        println!("Specific analysis for {entity}:");
    }
    for obs in vm.assessment.observations() {
        println!("- {}", obs.headline);
        for line in &obs.details {
            println!("    {line}");
        }
    }

    Ok(())
}
