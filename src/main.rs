//! Thermal Grid CLI - Run headless simulations from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use thermal_grid::{
    compute::{DiffusionGrid, GridStats},
    recording::{FrameRecorder, RecorderConfig},
    schema::GridConfig,
};

fn print_usage(program: &str) {
    eprintln!("Usage: {} <config.json> [steps] [--record <file.thgr>]", program);
    eprintln!();
    eprintln!("Run a thermal grid simulation from JSON configuration.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  config.json  Path to grid configuration file");
    eprintln!("  steps        Number of ticks (default: 100)");
    eprintln!("  --record     Write every tick to a .thgr recording");
    eprintln!();
    eprintln!("Print the reference configuration with --example.");
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let mut steps: u64 = 100;
    let mut record_path: Option<PathBuf> = None;

    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        if arg == "--record" {
            match rest.next() {
                Some(path) => record_path = Some(PathBuf::from(path)),
                None => {
                    eprintln!("--record requires a file path");
                    std::process::exit(1);
                }
            }
        } else if let Ok(n) = arg.parse() {
            steps = n;
        } else {
            eprintln!("Unrecognized argument: {}", arg);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: GridConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    let mut grid = DiffusionGrid::new(&config).unwrap_or_else(|e| {
        eprintln!("Error creating grid: {}", e);
        std::process::exit(1);
    });

    println!("Thermal Grid Simulation");
    println!("=======================");
    println!("Grid: {}x{}", config.rows, config.cols);
    println!(
        "Baseline: {}, source rate: {}",
        config.baseline, config.source_rate
    );
    println!("Steps: {}", steps);
    println!();

    let initial_stats = GridStats::from_grid(&grid);
    println!("Initial state:");
    println!("  {}", initial_stats);
    println!();

    let mut recorder = record_path.as_ref().map(|path| {
        FrameRecorder::new(path, &grid, RecorderConfig::default()).unwrap_or_else(|e| {
            eprintln!("Error creating recording {}: {}", path.display(), e);
            std::process::exit(1);
        })
    });

    println!("Running simulation...");
    let start = Instant::now();

    for i in 0..steps {
        grid.tick();

        if let Some(recorder) = recorder.as_mut()
            && let Err(e) = recorder.record_frame(&grid)
        {
            eprintln!("Error recording frame: {}", e);
            std::process::exit(1);
        }

        // Print progress every 10%
        if (i + 1) % (steps / 10).max(1) == 0 {
            let stats = GridStats::from_grid(&grid);
            let elapsed = start.elapsed().as_secs_f32();
            let steps_per_sec = (i + 1) as f32 / elapsed;
            println!(
                "  Step {}/{}: heat={:.4}, max={:.4}, {:.1} steps/s",
                i + 1,
                steps,
                stats.total_heat,
                stats.max,
                steps_per_sec
            );
        }
    }

    let elapsed = start.elapsed();
    let final_stats = GridStats::from_grid(&grid);

    println!();
    println!("Final state:");
    println!("  {}", final_stats);
    println!(
        "  Heat balance: {:+.4}",
        final_stats.total_heat - initial_stats.total_heat
    );
    println!(
        "Time: {:.2}s ({:.1} steps/s)",
        elapsed.as_secs_f32(),
        steps as f32 / elapsed.as_secs_f32()
    );

    if let Some(recorder) = recorder {
        match recorder.finalize() {
            Ok(stats) => println!("Recording: {}", stats),
            Err(e) => {
                eprintln!("Error finalizing recording: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn print_example_config() {
    match serde_json::to_string_pretty(&GridConfig::default()) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing config: {}", e);
            std::process::exit(1);
        }
    }
}
