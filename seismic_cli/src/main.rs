//! # Seismic CLI
//!
//! Runs the equivalent-static engine on one building and prints the design
//! parameters of both axes at the strength and drift levels.
//!
//! ```bash
//! seismic-cli --risk "very high" --importance 1.4 --soil I --stories 3 --height 12 \
//!     --system-type Dual \
//!     --lateral-type "Special reinforced concrete moment frame with special reinforced concrete shear walls" \
//!     --tx 0.6
//! seismic-cli --input building.json --json
//! seismic-cli systems
//! seismic-cli curve --soil III --risk high
//! ```
//!
//! Set `RUST_LOG=debug` to see every derived quantity.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use seismic_core::code_factors::{Axis, DesignLevel, PeriodMode, RiskLevel};
use seismic_core::{Building, BuildingInput, CodeTables, ReflectionFactor, SystemSelection};

/// Equivalent-static seismic design parameters of a building.
#[derive(Parser)]
#[command(name = "seismic-cli", about = "Compute equivalent-static seismic design parameters")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// JSON code tables replacing the built-in ones
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    #[command(flatten)]
    building: BuildingArgs,
}

#[derive(Subcommand)]
enum Command {
    /// List the system and soil keys of the code tables
    Systems,
    /// Print the sampled B1, N and B curves of a soil class
    Curve {
        /// Soil class (e.g. "II")
        #[arg(long)]
        soil: String,

        /// Risk level (low, medium, high, very high)
        #[arg(long, default_value = "high")]
        risk: String,

        /// Print every n-th sample of the 0.01 s grid
        #[arg(long, default_value_t = 10)]
        every: usize,
    },
}

#[derive(Args)]
struct BuildingArgs {
    /// Building input as JSON; replaces the building flags below
    #[arg(long)]
    input: Option<PathBuf>,

    /// Risk level (low, medium, high, very high)
    #[arg(long, default_value = "high")]
    risk: String,

    /// Importance factor I
    #[arg(long, default_value_t = 1.0)]
    importance: f64,

    /// Soil class
    #[arg(long, default_value = "II")]
    soil: String,

    #[arg(long, default_value_t = 3)]
    stories: u32,

    /// Height above the base (m)
    #[arg(long, default_value_t = 10.0)]
    height: f64,

    /// Masonry infill walls present
    #[arg(long)]
    infill: bool,

    /// System type along X
    #[arg(long, default_value = "Moment frame")]
    system_type: String,

    /// Lateral type along X
    #[arg(long, default_value = "Special steel moment frame")]
    lateral_type: String,

    /// System type along Y (defaults to X)
    #[arg(long)]
    y_system_type: Option<String>,

    /// Lateral type along Y (defaults to X)
    #[arg(long)]
    y_lateral_type: Option<String>,

    /// Analytical period along X (s)
    #[arg(long, default_value_t = 0.0)]
    tx: f64,

    /// Analytical period along Y (s, defaults to tx)
    #[arg(long)]
    ty: Option<f64>,

    /// Use the empirical period at the strength level
    #[arg(long)]
    empirical: bool,

    #[arg(long, default_value = "")]
    city: String,

    /// Seismic weight W for base shear V = C·W
    #[arg(long)]
    weight: Option<f64>,

    /// Print the full building record as JSON
    #[arg(long)]
    json: bool,

    /// Print the derivation trace
    #[arg(long)]
    trace: bool,
}

impl BuildingArgs {
    fn to_input(&self) -> Result<BuildingInput> {
        if let Some(path) = &self.input {
            let json = read_file(path)?;
            return serde_json::from_str(&json)
                .with_context(|| format!("Invalid building input in {}", path.display()));
        }

        let x_system = SystemSelection::new(&self.system_type, &self.lateral_type);
        let y_system = SystemSelection::new(
            self.y_system_type.as_deref().unwrap_or(&self.system_type),
            self.y_lateral_type.as_deref().unwrap_or(&self.lateral_type),
        );
        Ok(BuildingInput {
            risk_level: RiskLevel::from_str_flexible(&self.risk)?,
            importance_factor: self.importance,
            soil_type: self.soil.clone(),
            stories: self.stories,
            height: self.height,
            infill: self.infill,
            x_system,
            y_system,
            city: self.city.clone(),
            tx: self.tx,
            ty: self.ty.unwrap_or(self.tx),
            period_mode: if self.empirical {
                PeriodMode::Empirical
            } else {
                PeriodMode::Analytical
            },
        })
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let custom_tables;
    let tables = match &cli.tables {
        Some(path) => {
            custom_tables = CodeTables::from_json_str(&read_file(path)?)
                .with_context(|| format!("Invalid code tables in {}", path.display()))?;
            info!("Loaded code tables from {}", path.display());
            &custom_tables
        }
        None => CodeTables::standard(),
    };

    match &cli.command {
        Some(Command::Systems) => print_systems(tables),
        Some(Command::Curve { soil, risk, every }) => print_curve(tables, soil, risk, *every)?,
        None => run_building(tables, &cli.building)?,
    }
    Ok(())
}

fn run_building(tables: &CodeTables, args: &BuildingArgs) -> Result<()> {
    let input = args.to_input()?;
    let building = Building::new(input, tables)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&building)?);
    } else {
        print_report(&building, args.weight);
    }

    if args.trace {
        println!();
        println!("Derivation trace:");
        println!("{}", building.trace().render());
    }
    Ok(())
}

fn print_report(building: &Building, weight: Option<f64>) {
    let input = &building.input;

    println!("═══════════════════════════════════════");
    println!("  EQUIVALENT STATIC SEISMIC DESIGN");
    println!("═══════════════════════════════════════");
    println!();
    println!("Site:");
    if !input.city.is_empty() {
        println!("  City:       {}", input.city);
    }
    println!("  Risk level: {} (A = {:.2})", input.risk_level, building.acceleration);
    println!(
        "  Soil:       {} (T0 = {:.2} s, Ts = {:.2} s, S = {:.2}, S0 = {:.2})",
        building.soil.soil_type,
        building.soil.t0,
        building.soil.ts,
        building.soil.s,
        building.soil.s0
    );
    println!();
    println!("Building:");
    println!("  Importance: {}", building.importance.display_name());
    println!(
        "  Height:     {:.1} m, {} stories (cap {:.0} m)",
        input.height, input.stories, building.max_height
    );
    println!("  Infill:     {}", if input.infill { "yes" } else { "no" });
    println!("  C_min:      {:.4}", building.c_min);

    for axis in Axis::ALL {
        let r = building.axis(axis);
        println!();
        println!("Axis {}: {}", axis, r.system);
        println!(
            "  Ru = {:.1}, Cd = {:.1}, Omega0 = {:.1}",
            r.system.ru, r.system.cd, r.system.phi0
        );
        println!(
            "  T_emp = {:.3} s, T_design = {:.3} s, T_analytical = {:.3} s",
            r.empirical_period, r.design_period, r.analytical_period
        );
        for level in [DesignLevel::Strength, DesignLevel::Drift] {
            let coefficient = match building.outcome(level).axis(axis) {
                Some(c) => format!(
                    "C = {:.4}{}",
                    c.c,
                    if c.floor_applied { " (C_min)" } else { "" }
                ),
                None => "C = n/a".to_string(),
            };
            println!(
                "  {:<8}  B = {:.3}, k = {:.2}, {}",
                level.display_name(),
                r.b(level),
                r.k(level),
                coefficient
            );
        }
        if let Some(v) = weight.and_then(|w| building.base_shear(DesignLevel::Strength, axis, w)) {
            println!("  V = {:.1}", v);
        }
    }

    println!();
    println!("═══════════════════════════════════════");
    match building.eligibility.failure() {
        None => println!("  RESULT: ELIGIBLE"),
        Some(failure) => {
            println!("  RESULT: NOT ELIGIBLE ({}, axis {})", failure.title, failure.axis);
            println!("  {}", failure.message);
        }
    }
    println!("═══════════════════════════════════════");
}

fn print_systems(tables: &CodeTables) {
    for system_type in tables.system_types() {
        println!("{}", system_type);
        for lateral_type in tables.lateral_types(system_type) {
            println!("  {}", lateral_type);
        }
    }
    println!();
    println!("Soil classes: {}", tables.soil_types().join(", "));
}

fn print_curve(tables: &CodeTables, soil: &str, risk: &str, every: usize) -> Result<()> {
    let risk_level = RiskLevel::from_str_flexible(risk)?;
    let rf = ReflectionFactor::resolve(soil, risk_level.acceleration_ratio(), 0.0, tables)?;

    println!("Soil {}, A = {:.2}", soil, risk_level.acceleration_ratio());
    println!("{:>6}  {:>6}  {:>6}  {:>6}", "T", "B1", "N", "B");
    for point in rf.curve().points().step_by(every.max(1)) {
        println!("{:>6.2}  {:>6.3}  {:>6.3}  {:>6.3}", point.period, point.b1, point.n, point.b);
    }
    Ok(())
}
