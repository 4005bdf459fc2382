//! Example: Open a USDA file and read an attribute by prim name.
//!
//! Run with: cargo run --example query_usda -- scene.usda Ball radius [time]

use std::env;

use usdattr_core::{query, Stage, TimeCode};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: query_usda <path-to-usda-file> [prim-name attribute-name [time]]");
        println!("\nExamples:");
        println!("  cargo run --example query_usda -- scene.usda");
        println!("  cargo run --example query_usda -- scene.usda Ball radius");
        println!("  cargo run --example query_usda -- scene.usda Ball xformOp:translate 12");
        return;
    }

    let path = &args[1];
    println!("Loading USDA file: {}", path);

    let stage = match Stage::open(path) {
        Ok(stage) => stage,
        Err(e) => {
            eprintln!("Error loading USDA: {}", e);
            std::process::exit(1);
        }
    };

    if args.len() < 4 {
        println!("\n=== Stage: {} ===", stage.identifier());
        if let Some((start, end)) = stage.time_code_range() {
            println!("Time codes: {} to {}", start, end);
        }
        for prim in stage.traverse() {
            println!("  {} [{}] {} attributes", prim.path, prim.type_name, prim.attributes.len());
        }
        return;
    }

    let (prim_name, attr_name) = (&args[2], &args[3]);
    let time = match args.get(4).map(|t| t.parse::<f64>()) {
        Some(Ok(t)) => TimeCode::At(t),
        Some(Err(e)) => {
            eprintln!("Invalid time: {}", e);
            std::process::exit(1);
        }
        None => TimeCode::Default,
    };

    match query::try_read(Some(&stage), prim_name, attr_name, time) {
        Ok(value) => println!("{}.{} = {:?} ({})", prim_name, attr_name, value, value.type_name()),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
