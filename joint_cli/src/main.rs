//! # joint_cli
//!
//! Command-line front end for `joint_core`. Reads joint or project files,
//! prints a plain-text report (or JSON with `--json`) and exits non-zero
//! when any joint fails to evaluate.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use joint_core::calculations::row_assembly::RowLimit;
use joint_core::materials::{bolt_tension_table, builtin_sections, SectionProperties, SectionSeries};
use joint_core::project::JointOutcome;
use joint_core::units::kn;
use joint_core::{calculate, CalcError, DesignSettings, JointInput, JointProject, JointResult};

#[derive(Parser)]
#[command(
    name = "joint_cli",
    version,
    about = "Moment resistance, stiffness and classification of bolted end-plate joints (EN 1993-1-8)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, global = true, help = "Print results as JSON")]
    json: bool,

    #[arg(long, global = true, env = "JOINT_SETTINGS", help = "Design settings file (JSON)")]
    settings: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Evaluate one joint from a JSON file")]
    Evaluate {
        #[arg(help = "Joint input file")]
        path: PathBuf,
    },

    #[command(about = "Evaluate every joint of a project file")]
    Batch {
        #[arg(help = "Project file")]
        path: PathBuf,
    },

    #[command(about = "Evaluate the built-in demo joint")]
    Demo,

    #[command(about = "List the built-in rolled sections")]
    Sections {
        #[arg(long, value_enum, help = "Only this series")]
        series: Option<SeriesArg>,

        #[arg(long, help = "Designation prefix, e.g. HEA2")]
        prefix: Option<String>,
    },

    #[command(about = "Print the bolt tension resistance table")]
    Bolts,
}

#[derive(Clone, Copy, ValueEnum)]
enum SeriesArg {
    Hea,
    Heb,
    Ipe,
}

impl From<SeriesArg> for SectionSeries {
    fn from(arg: SeriesArg) -> Self {
        match arg {
            SeriesArg::Hea => SectionSeries::HEA,
            SeriesArg::Heb => SectionSeries::HEB,
            SeriesArg::Ipe => SectionSeries::IPE,
        }
    }
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Calc(#[from] CalcError),

    #[error("{failed} of {total} joints failed")]
    BatchFailed { failed: usize, total: usize },
}

impl CliError {
    fn to_json(&self) -> serde_json::Value {
        match self {
            CliError::Calc(err) => serde_json::to_value(err).unwrap_or_else(|_| serde_json::json!({})),
            CliError::Io { path, source } => serde_json::json!({
                "type": "IoError",
                "details": { "path": path, "reason": source.to_string() }
            }),
            CliError::BatchFailed { failed, total } => serde_json::json!({
                "type": "BatchFailed",
                "details": { "failed": failed, "total": total }
            }),
        }
    }
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "joint_core=debug,joint_cli=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_settings(path: Option<&Path>) -> Result<DesignSettings, CliError> {
    match path {
        Some(path) => Ok(DesignSettings::from_json(&read_file(path)?)?),
        None => Ok(DesignSettings::default()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::BatchFailed { failed, total }) => {
            tracing::error!(failed, total, "batch finished with failures");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            if let Ok(json) = serde_json::to_string_pretty(&err.to_json()) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Evaluate { path } => {
            let settings = load_settings(cli.settings.as_deref())?;
            let input = JointInput::from_json(&read_file(path)?)?;
            evaluate(&input, &settings, cli.json)
        }
        Command::Demo => {
            let settings = load_settings(cli.settings.as_deref())?;
            evaluate(&JointInput::demo(), &settings, cli.json)
        }
        Command::Batch { path } => {
            let mut project = JointProject::from_json(&read_file(path)?)?;
            if cli.settings.is_some() {
                project.settings = load_settings(cli.settings.as_deref())?;
            }
            batch(&project, cli.json)
        }
        Command::Sections { series, prefix } => {
            list_sections(series.map(SectionSeries::from), prefix.as_deref(), cli.json);
            Ok(())
        }
        Command::Bolts => {
            let settings = load_settings(cli.settings.as_deref())?;
            list_bolts(&settings, cli.json)
        }
    }
}

fn evaluate(input: &JointInput, settings: &DesignSettings, json: bool) -> Result<(), CliError> {
    let result = calculate(input, settings)?;
    if json {
        print_json(&result);
    } else {
        print_report(input, &result);
    }
    Ok(())
}

fn batch(project: &JointProject, json: bool) -> Result<(), CliError> {
    let outcomes = project.evaluate_all();
    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();

    if json {
        print_json(&outcomes);
    } else {
        print_batch_summary(project, &outcomes);
    }

    if failed > 0 {
        return Err(CliError::BatchFailed {
            failed,
            total: outcomes.len(),
        });
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(err) => tracing::error!("failed to serialize output: {}", err),
    }
}

fn rule() {
    println!("═══════════════════════════════════════════════════════");
}

fn print_report(input: &JointInput, result: &JointResult) {
    let profile = &result.profile;
    let assembly = &result.assembly;

    rule();
    println!("  END-PLATE JOINT: {}", result.label);
    rule();
    println!();
    println!("Input:");
    for (role, section, grade) in [
        ("Column", &profile.column, profile.column_grade),
        ("Beam", &profile.beam, profile.beam_grade),
    ] {
        println!(
            "  {:<10} {} {} (f_y {:.0}, f_u {:.0} MPa)",
            format!("{}:", role),
            section.designation,
            grade,
            grade.fy(),
            grade.fu()
        );
    }
    println!(
        "  End plate: {:.0} × {:.0} mm {}{}",
        input.end_plate.thickness,
        input.end_plate.width,
        input.end_plate.grade,
        if input.end_plate.is_extended() { ", extended" } else { ", flush" }
    );
    println!(
        "  Bolts:     {} per row (d = {:.0} mm), gauge {:.0} mm",
        input.bolts.label(),
        input.bolts.size.diameter(),
        input.layout.gauge
    );
    println!();

    println!("Global components:");
    for component in result.global.as_components() {
        println!(
            "  {:<38} {:>9.1} kN   EN 1993-1-8 {}",
            component.kind.to_string(),
            kn(component.resistance),
            component.kind.clause()
        );
    }
    println!("  F_glob = {:.1} kN ({})", kn(assembly.global_ceiling), assembly.global_component);
    println!();

    println!("Bolt rows:");
    println!("  Row    h_r [mm]   F_cap [kN]   F_Rd [kN]   Limit");
    for row in &assembly.rows {
        let mode = row
            .governing_mode
            .map(|m| format!(" [{}]", m.display_name()))
            .unwrap_or_default();
        println!(
            "  {:<4} {:>9.1} {:>12.1} {:>11.1}   {}{}",
            row.index,
            row.lever_arm,
            kn(row.capacity),
            kn(row.force),
            row.limit.display_name(),
            if matches!(row.limit, RowLimit::Individual { .. }) { mode } else { String::new() }
        );
    }
    for group in assembly.groups.iter().filter(|g| g.reduced_to.is_some()) {
        println!(
            "  group {}-{}: {:.1} kN > {:.1} kN ({}), row {} reduced",
            group.first,
            group.last,
            kn(group.rows_sum),
            kn(group.ceiling),
            group.governing.display_name(),
            group.last
        );
    }
    println!();

    println!("Stiffness:");
    println!("  z_eq    = {:.1} mm", result.equivalent_lever_arm);
    println!("  k1      = {:.2} mm", result.stiffness.k1);
    println!("  k2      = {:.2} mm", result.stiffness.k2);
    println!("  k_eq    = {:.2} mm", result.stiffness.k_eq);
    println!();

    rule();
    println!("  M_j,Rd    = {:.2} kNm  (M_j,el,Rd = {:.2} kNm)", result.moment_resistance_knm, result.elastic_moment_resistance_knm);
    println!("  S_j,ini   = {:.0} kNm/rad", result.initial_stiffness_knm_per_rad);
    println!(
        "  M_j,Rd / M_b,pl,Rd = {:.2} ({:.2} kNm)",
        result.strength_ratio(),
        result.beam_plastic_moment_knm
    );
    println!(
        "  CLASS: {} / {}",
        result.classification.stiffness, result.classification.strength
    );
    rule();
}

fn print_batch_summary(project: &JointProject, outcomes: &[JointOutcome]) {
    rule();
    println!("  PROJECT {} ({})", project.meta.job_id, project.meta.client);
    rule();
    for outcome in outcomes {
        match &outcome.result {
            Ok(result) => println!(
                "  {:<24} M_j,Rd {:>7.2} kNm  S_j,ini {:>8.0} kNm/rad  {} / {}  [OK]",
                outcome.label,
                result.moment_resistance_knm,
                result.initial_stiffness_knm_per_rad,
                result.classification.stiffness,
                result.classification.strength
            ),
            Err(err) => println!("  {:<24} [FAIL] {}", outcome.label, err),
        }
    }
    rule();
}

fn list_sections(series: Option<SectionSeries>, prefix: Option<&str>, json: bool) {
    let db = builtin_sections();
    let mut sections: Vec<&SectionProperties> = match prefix {
        Some(prefix) => db.search(prefix),
        None => SectionSeries::ALL.iter().flat_map(|s| db.of_series(*s)).collect(),
    };
    if let Some(series) = series {
        sections.retain(|s| s.series == series);
    }

    if json {
        print_json(&sections);
        return;
    }
    println!("  Section       h      b     t_w    t_f     r     A [mm²]    I_y [mm⁴]   W_pl,y [mm³]");
    for s in sections {
        println!(
            "  {:<10} {:>5.0} {:>6.0} {:>6.1} {:>6.1} {:>5.0} {:>10.0} {:>12.4e} {:>13.4e}",
            s.designation, s.h, s.b, s.t_w, s.t_f, s.r, s.area, s.i_y, s.w_pl_y
        );
    }
}

fn list_bolts(settings: &DesignSettings, json: bool) -> Result<(), CliError> {
    let table = bolt_tension_table(settings)?;
    if json {
        print_json(&table);
        return Ok(());
    }
    println!("  Grade  f_yb  f_ub  Size   d [mm]  F_t,Rd [kN]   countersunk [kN]");
    for entry in table {
        println!(
            "  {:<6} {:>4.0} {:>5.0}  {:<5} {:>7.0} {:>11.1} {:>18.1}",
            entry.grade.display_name(),
            entry.grade.fyb(),
            entry.grade.fub(),
            entry.size.display_name(),
            entry.size.diameter(),
            entry.ft_rd_kn,
            entry.ft_rd_countersunk_kn
        );
    }
    Ok(())
}
