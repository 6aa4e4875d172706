use cratecheck::{Analyzer, InspectionConfig};
use std::error::Error;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!(
            "Usage: {} <settings.json> <crate.png> [annotated.png]",
            args[0]
        );
        std::process::exit(2);
    }

    let config = InspectionConfig::from_json_file(Path::new(&args[1]))?;
    let analyzer = Analyzer::from_config(config)?;
    let image = image::open(&args[2])?;

    let inspection = analyzer.inspect_detailed(&image)?;
    println!("Crate quality: {}", inspection.verdict);
    for entry in inspection.report.iter() {
        let radius = entry
            .circle
            .map(|c| c.r.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  slot {:>2} at {:?}: {} (r={})",
            entry.slot.id,
            entry.slot.rect.top_left(),
            entry.status,
            radius
        );
    }

    if let Some(out_path) = args.get(3) {
        inspection.annotated.save(out_path)?;
        println!("Wrote {out_path}");
    }
    Ok(())
}
