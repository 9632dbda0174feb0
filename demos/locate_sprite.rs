//! Locate every sprite of a catalog directory in a screenshot
//! Usage: cargo run --release --example locate_sprite -- <sprites_dir> <screenshot.png> [top,left,bottom,right]
//!
//! Runs both the constellation matcher and the template matcher and prints
//! what each of them found. Set RUST_LOG=trace to see candidate scores.

use game_sprite::{Frame, Region, SpriteCatalog, locate, locate_template_with};
use game_sprite::match_image::create_precise_config;
use std::env;
use std::time::Instant;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <sprites_dir> <screenshot> [top,left,bottom,right]", args[0]);
        return;
    }

    let region = match args.get(3).map(|s| s.parse::<Region>()) {
        Some(Ok(region)) => Some(region),
        Some(Err(e)) => {
            eprintln!("❌ {e}");
            return;
        }
        None => None,
    };

    let load_start = Instant::now();
    let catalog = match SpriteCatalog::discover(&args[1]) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("❌ Failed to load sprites: {e}");
            return;
        }
    };
    println!(
        "📦 Loaded {} sprites in {:?}",
        catalog.len(),
        load_start.elapsed()
    );

    let frame = match image::open(&args[2])
        .map_err(|e| e.to_string())
        .and_then(|img| Frame::from_dynamic(img, None).map_err(|e| e.to_string()))
    {
        Ok(frame) => frame,
        Err(e) => {
            eprintln!("❌ Failed to load screenshot: {e}");
            return;
        }
    };
    println!("🖼️ Screenshot {}x{}", frame.width(), frame.height());

    let config = create_precise_config();
    for (name, sprite) in catalog.iter() {
        let start = Instant::now();
        let by_constellation = locate(sprite, &frame, region, true);
        let constellation_time = start.elapsed();

        let start = Instant::now();
        let by_template = locate_template_with(sprite, &frame, region, &config);
        let template_time = start.elapsed();

        println!("🔍 {name} ({} frames)", sprite.image_count());
        print_result("constellation", by_constellation, constellation_time);
        print_result("template", by_template, template_time);
    }
}

fn print_result(
    label: &str,
    result: game_sprite::SpriteResult<Option<Region>>,
    elapsed: std::time::Duration,
) {
    match result {
        Ok(Some(region)) => println!("    ✅ {label}: {region} ({elapsed:?})"),
        Ok(None) => println!("    ➖ {label}: not found ({elapsed:?})"),
        Err(e) => println!("    ❌ {label}: {e}"),
    }
}
