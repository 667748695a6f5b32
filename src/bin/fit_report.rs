use anyhow::{Context, Result, bail};
use bevy::prelude::Vec3;
use framefit::framing::{
    BoundingExtent, CameraPlacement, CameraProjection, FitConfig, FrameFitter,
};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
enum ScenarioProjection {
    Perspective { fov_degrees: f32, aspect_ratio: f32 },
    Orthographic { height: f32, aspect_ratio: f32 },
}

#[derive(Debug, Deserialize)]
enum ScenarioPlacement {
    Orbit { distance: f32 },
    Free {
        eye: (f32, f32, f32),
        anchor: (f32, f32, f32),
    },
}

#[derive(Debug, Deserialize)]
struct FitScenario {
    name: String,
    width: f32,
    height: f32,
    projection: ScenarioProjection,
    placement: ScenarioPlacement,
    #[serde(default)]
    fit: FitConfig,
}

#[derive(Debug)]
struct ScenarioRow {
    name: String,
    scale: Option<f32>,
    recommended_distance: Option<f32>,
    error: Option<String>,
}

#[derive(Debug)]
struct Args {
    scenario_file: PathBuf,
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let args = parse_args()?;
    let scenarios = read_scenarios(&args.scenario_file)?;
    if scenarios.is_empty() {
        bail!("no scenarios in {}", args.scenario_file.display());
    }

    let rows: Vec<ScenarioRow> = scenarios.iter().map(run_scenario).collect();
    for row in &rows {
        match (&row.error, row.scale) {
            (Some(err), _) => warn!("{:>18}: {err}", row.name),
            (None, Some(scale)) => info!(
                "{:>18}: scale={scale:>10.4} radius={}",
                row.name,
                row.recommended_distance
                    .map(|d| format!("{d:.4}"))
                    .unwrap_or_else(|| "-".to_string())
            ),
            (None, None) => {}
        }
    }

    write_csv(&args.output, &rows)?;
    info!("Wrote {} rows to {}", rows.len(), args.output.display());
    Ok(())
}

fn parse_args() -> Result<Args> {
    let mut scenario_file = PathBuf::from("config/fit_scenarios.ron");
    let mut output = PathBuf::from("fit_report.csv");

    let mut iter = env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--scenario-file" => {
                let value = iter.next().context("--scenario-file expects a path")?;
                scenario_file = PathBuf::from(value);
            }
            "--output" => {
                let value = iter.next().context("--output expects a path")?;
                output = PathBuf::from(value);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => bail!("unknown argument: {arg}"),
        }
    }

    Ok(Args {
        scenario_file,
        output,
    })
}

fn print_help() {
    println!(
        "Usage:\n\
         cargo run --bin fit_report -- [options]\n\n\
         Options:\n\
         --scenario-file <path>   Scenario file (default: config/fit_scenarios.ron)\n\
         --output <path>          Output CSV (default: fit_report.csv)"
    );
}

fn read_scenarios(path: &Path) -> Result<Vec<FitScenario>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    ron::from_str::<Vec<FitScenario>>(&content)
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn run_scenario(scenario: &FitScenario) -> ScenarioRow {
    let projection = match scenario.projection {
        ScenarioProjection::Perspective {
            fov_degrees,
            aspect_ratio,
        } => CameraProjection::perspective(fov_degrees.to_radians(), aspect_ratio),
        ScenarioProjection::Orthographic {
            height,
            aspect_ratio,
        } => CameraProjection::orthographic(height, aspect_ratio),
    };
    let placement = match scenario.placement {
        ScenarioPlacement::Orbit { distance } => CameraPlacement::orbit(distance, Vec3::ZERO),
        ScenarioPlacement::Free { eye, anchor } => {
            CameraPlacement::free(Vec3::from(eye), Vec3::from(anchor))
        }
    };

    let result = FrameFitter::new(scenario.fit).compute_fit(
        BoundingExtent::new(scenario.width, scenario.height),
        &projection,
        &placement,
    );

    match result {
        Ok(fit) => ScenarioRow {
            name: scenario.name.clone(),
            scale: Some(fit.scale),
            recommended_distance: fit.recommended_distance,
            error: None,
        },
        Err(err) => ScenarioRow {
            name: scenario.name.clone(),
            scale: None,
            recommended_distance: None,
            error: Some(err.to_string()),
        },
    }
}

fn format_csv(rows: &[ScenarioRow]) -> String {
    let mut out = String::from("name,scale,recommended_distance,error\n");

    for row in rows {
        let optional = |value: Option<f32>| value.map(|v| format!("{v:.6}")).unwrap_or_default();
        out.push_str(&format!(
            "{name},{scale},{distance},{error}\n",
            name = row.name,
            scale = optional(row.scale),
            distance = optional(row.recommended_distance),
            error = row.error.as_deref().unwrap_or("").replace(',', ";"),
        ));
    }

    out
}

fn write_csv(path: &Path, rows: &[ScenarioRow]) -> Result<()> {
    fs::write(path, format_csv(rows)).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SCENARIOS: &str = r#"[
        (
            name: "right-angle",
            width: 5.0,
            height: 2.0,
            projection: Perspective(fov_degrees: 90.0, aspect_ratio: 1.5),
            placement: Orbit(distance: 10.0),
        ),
        (
            name: "empty",
            width: 0.0,
            height: 2.0,
            projection: Orthographic(height: 10.0, aspect_ratio: 1.0),
            placement: Free(eye: (0.0, 0.0, 5.0), anchor: (0.0, 0.0, 0.0)),
            fit: (target_fraction: 0.5),
        ),
    ]"#;

    #[test]
    fn scenarios_produce_csv_rows() {
        let scenarios: Vec<FitScenario> = ron::from_str(SCENARIOS).unwrap();
        let rows: Vec<ScenarioRow> = scenarios.iter().map(run_scenario).collect();

        assert_eq!(
            format_csv(&rows),
            "name,scale,recommended_distance,error\n\
             right-angle,4.800000,10.000000,\n\
             empty,,,content has no visible extent (0 x 2)\n"
        );
    }
}
