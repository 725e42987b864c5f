//! Example: compare creation-order and shuffled activation.
//!
//! This example demonstrates how to:
//! 1. Select a pre-defined parameter space
//! 2. Run multiple simulations in parallel
//! 3. Find the best configuration
//! 4. Export results to CSV
//!
//! To use a different parameter space, change the function call in main().

use freight_experiments::{
    export_to_csv, find_best_parameters, find_best_result_index, run_parallel_experiments,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Starting parameter sweep experiment...");

    let space = freight_experiments::parameter_spaces::activation_comparison_space();

    let parameter_sets = space.generate();
    println!("Generated {} parameter sets", parameter_sets.len());

    println!("Running simulations in parallel...");
    let artifacts = run_parallel_experiments(&parameter_sets, None)?;
    let results: Vec<_> = artifacts.into_iter().map(|a| a.metrics).collect();
    println!("Completed {} simulations", results.len());

    let best_idx = find_best_result_index(&results).ok_or("No results to analyze")?;
    let best_result = &results[best_idx];
    println!("\n=== Best Run ===");
    println!("Completed: {}", best_result.terminated);
    println!("Ticks: {}", best_result.ticks);
    println!("Loaded drives: {}", best_result.loaded_drives);
    println!("Avg load per drive: {:.2}", best_result.avg_load_per_drive);
    println!(
        "Avg load of capacity: {:.2}%",
        best_result.avg_load_pct_of_capacity
    );

    if let Some(best_params) = find_best_parameters(&results, &parameter_sets) {
        println!("\n=== Best Parameters ===");
        println!("Activation: {}", best_params.params.activation);
        println!("Orders: {}", best_params.params.num_orders);
        println!("Seed: {}", best_params.seed);
    }

    export_to_csv(&results, &parameter_sets, "activation_sweep.csv")?;
    println!("\nExported results to activation_sweep.csv");

    Ok(())
}
