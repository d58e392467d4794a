//! Compiles the code tables under `data/` into Rust statics.
//!
//! The generated file is included by `src/code_tables/mod.rs` as
//! `crate::code_tables::generated`.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SystemFile {
    system: Vec<SystemRow>,
}

#[derive(Debug, Deserialize)]
struct SystemRow {
    system_type: String,
    lateral_type: String,
    ru: f64,
    phi0: f64,
    cd: f64,
    max_height: Option<f64>,
    alpha: f64,
    pow: f64,
    infill: bool,
    category: u32,
}

#[derive(Debug, Deserialize)]
struct SoilFile {
    soil: Vec<SoilRow>,
}

#[derive(Debug, Deserialize)]
struct SoilRow {
    name: String,
    t0: f64,
    ts: f64,
    spectral: Vec<SpectralRow>,
}

#[derive(Debug, Deserialize)]
struct SpectralRow {
    acceleration: f64,
    s: f64,
    s0: f64,
}

fn read_toml<T: for<'de> Deserialize<'de>>(path: &Path) -> T {
    println!("cargo:rerun-if-changed={}", path.display());
    let text = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e));
    toml::from_str(&text).unwrap_or_else(|e| panic!("failed to parse {}: {}", path.display(), e))
}

fn generate_systems(out: &mut String, file: &SystemFile) {
    out.push_str("pub mod structure_system_data {\n");
    out.push_str("    #[derive(Debug, Clone, Copy)]\n");
    out.push_str("    pub struct SystemRow {\n");
    out.push_str("        pub system_type: &'static str,\n");
    out.push_str("        pub lateral_type: &'static str,\n");
    out.push_str("        pub ru: f64,\n");
    out.push_str("        pub phi0: f64,\n");
    out.push_str("        pub cd: f64,\n");
    out.push_str("        pub max_height: Option<f64>,\n");
    out.push_str("        pub alpha: f64,\n");
    out.push_str("        pub pow: f64,\n");
    out.push_str("        pub infill: bool,\n");
    out.push_str("        pub category: u32,\n");
    out.push_str("    }\n\n");
    out.push_str("    pub static SYSTEMS: &[SystemRow] = &[\n");
    for row in &file.system {
        let max_height = match row.max_height {
            Some(h) => format!("Some({:?})", h),
            None => "None".to_string(),
        };
        let _ = writeln!(
            out,
            "        SystemRow {{ system_type: {:?}, lateral_type: {:?}, ru: {:?}, phi0: {:?}, cd: {:?}, max_height: {}, alpha: {:?}, pow: {:?}, infill: {}, category: {} }},",
            row.system_type,
            row.lateral_type,
            row.ru,
            row.phi0,
            row.cd,
            max_height,
            row.alpha,
            row.pow,
            row.infill,
            row.category,
        );
    }
    out.push_str("    ];\n");
    out.push_str("}\n\n");
}

fn generate_soils(out: &mut String, file: &SoilFile) {
    out.push_str("pub mod soil_data {\n");
    out.push_str("    #[derive(Debug, Clone, Copy)]\n");
    out.push_str("    pub struct SpectralRow {\n");
    out.push_str("        pub acceleration: f64,\n");
    out.push_str("        pub s: f64,\n");
    out.push_str("        pub s0: f64,\n");
    out.push_str("    }\n\n");
    out.push_str("    #[derive(Debug, Clone, Copy)]\n");
    out.push_str("    pub struct SoilRow {\n");
    out.push_str("        pub name: &'static str,\n");
    out.push_str("        pub t0: f64,\n");
    out.push_str("        pub ts: f64,\n");
    out.push_str("        pub spectral: &'static [SpectralRow],\n");
    out.push_str("    }\n\n");
    out.push_str("    pub static SOILS: &[SoilRow] = &[\n");
    for row in &file.soil {
        let _ = writeln!(
            out,
            "        SoilRow {{ name: {:?}, t0: {:?}, ts: {:?}, spectral: &[",
            row.name, row.t0, row.ts
        );
        for sp in &row.spectral {
            let _ = writeln!(
                out,
                "            SpectralRow {{ acceleration: {:?}, s: {:?}, s0: {:?} }},",
                sp.acceleration, sp.s, sp.s0
            );
        }
        out.push_str("        ] },\n");
    }
    out.push_str("    ];\n");
    out.push_str("}\n");
}

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let data_dir = Path::new(&manifest_dir).join("data");

    let systems: SystemFile = read_toml(&data_dir.join("structure_systems.toml"));
    let soils: SoilFile = read_toml(&data_dir.join("soil_types.toml"));

    let mut out = String::with_capacity(16_000);
    out.push_str("// Generated by build.rs from data/*.toml. Do not edit.\n\n");
    generate_systems(&mut out, &systems);
    generate_soils(&mut out, &soils);

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let dest = Path::new(&out_dir).join("code_tables.rs");
    fs::write(&dest, out).unwrap_or_else(|e| panic!("failed to write {}: {}", dest.display(), e));
}
