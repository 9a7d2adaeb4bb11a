use crate::infra::{default_threshold_catalog, InMemoryCircuitRepository};
use chrono::{Local, NaiveDate};
use clap::Args;
use eicr_schedule::error::AppError;
use eicr_schedule::schedule::{
    Circuit, CircuitId, CircuitSubmission, ComplianceEngine, FieldId, ProtectiveDevice,
    ScheduleCsvImporter, ScheduleOverview, ScheduleService, TestReadings,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScheduleReportArgs {
    /// Path to a schedule-of-tests CSV export; omit for the built-in sample
    #[arg(long)]
    pub(crate) schedule_csv: Option<PathBuf>,
    /// Report date shown in the header (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) inspection_date: Option<NaiveDate>,
    /// Include the per-circuit card listing in the output
    #[arg(long)]
    pub(crate) list_circuits: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional schedule-of-tests CSV export to seed the demo
    #[arg(long)]
    pub(crate) schedule_csv: Option<PathBuf>,
    /// Report date shown in the header (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) inspection_date: Option<NaiveDate>,
    /// Skip the live-edit portion of the demo
    #[arg(long)]
    pub(crate) skip_editing: bool,
}

pub(crate) fn run_schedule_report(args: ScheduleReportArgs) -> Result<(), AppError> {
    let ScheduleReportArgs {
        schedule_csv,
        inspection_date,
        list_circuits,
    } = args;

    let inspection_date = inspection_date.unwrap_or_else(|| Local::now().date_naive());
    let (circuits, imported) = load_circuits_from_path(schedule_csv)?;

    let engine = ComplianceEngine::new(default_threshold_catalog());
    let overview = ScheduleOverview::build(&engine, &circuits);
    render_schedule_overview(&overview, inspection_date, imported, list_circuits);

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        schedule_csv,
        inspection_date,
        skip_editing,
    } = args;

    let inspection_date = inspection_date.unwrap_or_else(|| Local::now().date_naive());

    println!("Schedule of tests demo");
    let (circuits, imported) = load_circuits_from_path(schedule_csv)?;

    let repository = Arc::new(InMemoryCircuitRepository::default());
    let service = ScheduleService::new(repository, default_threshold_catalog());

    let mut first_id: Option<CircuitId> = None;
    for circuit in circuits {
        let submission = CircuitSubmission {
            designation: circuit.designation,
            description: circuit.description,
            device: circuit.device,
            max_zs: circuit.max_zs,
            tested_on: circuit.tested_on,
            readings: circuit.readings,
        };
        match service.submit(submission) {
            Ok(view) => {
                println!(
                    "- Added circuit {} ({}) -> {}",
                    view.designation, view.circuit_id.0, view.status_label
                );
                first_id.get_or_insert(view.circuit_id);
            }
            Err(err) => println!("- Submission rejected: {}", err),
        }
    }

    let overview = match service.overview() {
        Ok(overview) => overview,
        Err(err) => {
            println!("Overview unavailable: {}", err);
            return Ok(());
        }
    };
    render_schedule_overview(&overview, inspection_date, imported, true);

    if skip_editing {
        return Ok(());
    }

    if let Some(id) = first_id {
        println!("\nLive edit demo (per-keystroke evaluation)");
        for raw in ["0.4", "1.2", "1.9"] {
            match service.record_reading(&id, FieldId::Zs, Some(raw.to_string())) {
                Ok(view) => println!(
                    "- Zs = {raw} -> {} ({}% complete)",
                    view.status_label, view.completion_percent
                ),
                Err(err) => println!("- Edit rejected: {}", err),
            }
        }

        match service.overview() {
            Ok(overview) => match serde_json::to_string_pretty(&overview) {
                Ok(json) => println!("\nDashboard payload after edits:\n{}", json),
                Err(err) => println!("\nDashboard payload unavailable: {}", err),
            },
            Err(err) => println!("\nDashboard unavailable: {}", err),
        }
    }

    Ok(())
}

fn load_circuits_from_path(
    schedule_csv: Option<PathBuf>,
) -> Result<(Vec<Circuit>, bool), AppError> {
    match schedule_csv {
        Some(path) => {
            let submissions = ScheduleCsvImporter::from_path(path)?;
            let circuits = submissions
                .into_iter()
                .enumerate()
                .filter_map(|(index, submission)| {
                    submission
                        .into_circuit(CircuitId(format!("row-{:03}", index + 1)))
                        .ok()
                })
                .collect();
            Ok((circuits, true))
        }
        None => Ok((sample_circuits(), false)),
    }
}

/// A small distribution board covering every status the engine produces.
fn sample_circuits() -> Vec<Circuit> {
    let rcbo = ProtectiveDevice {
        device_type: "RCBO Type B".to_string(),
        rcd_rating: Some("30mA".to_string()),
        bs_standard: Some("BS EN 61009".to_string()),
    };
    let mcb = ProtectiveDevice {
        device_type: "MCB Type B".to_string(),
        rcd_rating: None,
        bs_standard: Some("BS EN 60898".to_string()),
    };

    let mut ring = TestReadings::default();
    ring.r1r2 = Some("0.25".to_string());
    ring.zs = Some("0.32".to_string());
    ring.insulation_live_earth = Some(">200".to_string());
    ring.insulation_live_neutral = Some(">200".to_string());
    ring.polarity = Some("Correct".to_string());
    ring.rcd_one_x = Some("24".to_string());
    ring.rcd_test_button = Some("✓".to_string());

    let mut lighting = TestReadings::default();
    lighting.r1r2 = Some("0.41".to_string());
    lighting.zs = Some("1.9".to_string());
    lighting.insulation_live_earth = Some("150".to_string());
    lighting.polarity = Some("Correct".to_string());

    let mut shower = TestReadings::default();
    shower.r1r2 = Some("0.18".to_string());
    shower.zs = Some("0.4".to_string());
    shower.insulation_live_earth = Some(">200".to_string());
    shower.polarity = Some("Correct".to_string());
    shower.rcd_one_x = Some("320".to_string());

    vec![
        Circuit {
            circuit_id: CircuitId("demo-001".to_string()),
            designation: "1A".to_string(),
            description: "Ring final sockets".to_string(),
            device: rcbo.clone(),
            max_zs: Some(1.37),
            tested_on: None,
            readings: ring,
        },
        Circuit {
            circuit_id: CircuitId("demo-002".to_string()),
            designation: "2B".to_string(),
            description: "Lighting first floor".to_string(),
            device: mcb.clone(),
            max_zs: Some(2.19),
            tested_on: None,
            readings: lighting,
        },
        Circuit {
            circuit_id: CircuitId("demo-003".to_string()),
            designation: "3C".to_string(),
            description: "Shower".to_string(),
            device: rcbo,
            max_zs: Some(1.09),
            tested_on: None,
            readings: shower,
        },
        Circuit {
            circuit_id: CircuitId("demo-004".to_string()),
            designation: "4D".to_string(),
            description: "Cooker".to_string(),
            device: mcb,
            max_zs: Some(1.37),
            tested_on: None,
            readings: TestReadings::default(),
        },
    ]
}

pub(crate) fn render_schedule_overview(
    overview: &ScheduleOverview,
    inspection_date: NaiveDate,
    imported: bool,
    list_circuits: bool,
) {
    println!("Schedule of tests report (evaluated {inspection_date})");
    if imported {
        println!("Data source: CSV import");
    } else {
        println!("Data source: built-in sample board");
    }

    println!(
        "\nCircuits: {} pass / {} fail / {} pending ({}% tested)",
        overview.pass_count,
        overview.fail_count,
        overview.pending_count,
        overview.completion_percent
    );

    if overview.issues.is_empty() {
        println!("\nCompliance issues: none");
    } else {
        println!(
            "\nCompliance issues ({} shown of {})",
            overview.issues.len(),
            overview.total_issues
        );
        for issue in &overview.issues {
            println!(
                "- [{:?}] {} | {}: {}",
                issue.severity, issue.circuit_name, issue.field_label, issue.message
            );
        }
    }

    if list_circuits {
        println!("\nCircuit cards");
        for circuit in &overview.circuits {
            let failing = match circuit.failing_field {
                Some(field) => format!(" ({})", field.label()),
                None => String::new(),
            };
            println!(
                "- {} | {} | {}% complete | triage {}{}",
                circuit.display_name,
                circuit.status_label,
                circuit.completion_percent,
                circuit.triage_label,
                failing
            );
        }
    }
}
