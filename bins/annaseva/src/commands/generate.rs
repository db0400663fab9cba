//! Generate command

use crate::Format;
use crate::output::{Status, format_count, poi_line, print_json};
use annaseva_core::config::ConfigSchema;
use annaseva_poi::{LocationGenerator, PointOfInterest};
use anyhow::Result;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Surplus,
    Shortage,
    Both,
}

pub fn run(
    schema: &ConfigSchema,
    kind: KindArg,
    lat: Option<&str>,
    lng: Option<&str>,
    count: Option<usize>,
    seed: Option<u64>,
    format: Format,
) -> Result<()> {
    let generator = LocationGenerator::new(schema.generator.clone());
    let center = generator.resolve_center(lat, lng);
    let mut rng = super::rng_from(seed);

    let mut records: Vec<PointOfInterest> = Vec::new();
    if matches!(kind, KindArg::Surplus | KindArg::Both) {
        let n = count.unwrap_or(schema.generator.surplus_count);
        records.extend(generator.surplus(center, n, &mut rng));
    }
    if matches!(kind, KindArg::Shortage | KindArg::Both) {
        let n = count.unwrap_or(schema.generator.shortage_count);
        records.extend(generator.shortages(center, n, &mut rng));
    }

    if format == Format::Json {
        return print_json(&records);
    }

    Status::header(&format!("Generated around {center}"));
    for poi in &records {
        println!("  {}", poi_line(poi));
    }
    println!();
    Status::success(&format_count(records.len(), "site", "sites"));
    Ok(())
}
