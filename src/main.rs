//! Batch command-line interface: `solve`, `baseline`, and `evaluate`.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use storeplan::{
    evaluate, io, proportional_allocation, random_allocation, Adjacency, AllocationOptimizer,
    CoverageWeights, HighsSolver, OptimizationConfig, SolveOptions,
};

#[derive(Parser)]
#[command(
    name = "storeplan",
    version,
    about = "Equity-aware supermarket placement across census tracts"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve the allocation integer program and write the plan CSV
    Solve {
        /// Food-access attribute table (CSV)
        #[arg(long)]
        data: PathBuf,
        /// Tract adjacency document (JSON)
        #[arg(long)]
        adjacency: PathBuf,
        #[arg(long, default_value = "California")]
        state: String,
        #[arg(long, default_value = "Imperial")]
        county: String,
        /// Total supermarkets to place
        #[arg(long, default_value_t = 100)]
        quota: u32,
        #[arg(long, default_value_t = 4)]
        max_per_tract: u32,
        /// Combined-count cap on any adjacent tract pair
        #[arg(long, default_value_t = 6)]
        adjacency_limit: u32,
        /// Weight of low-income-household coverage
        #[arg(long, default_value_t = 0.7)]
        alpha: f64,
        /// Weight of population coverage
        #[arg(long, default_value_t = 0.3)]
        beta: f64,
        /// Prefix stripped from adjacency GEOIDs before matching tract ids
        #[arg(long, default_value = "0")]
        strip_prefix: String,
        #[arg(long, default_value = "assigned_supermarkets.csv")]
        output: PathBuf,
        /// Export the expanded model in LP format for debugging
        #[arg(long)]
        write_lp: Option<PathBuf>,
        /// Wall-clock solve budget in seconds
        #[arg(long)]
        time_budget: Option<f64>,
    },
    /// Produce a non-optimizing reference plan
    Baseline {
        #[arg(long)]
        data: PathBuf,
        #[arg(long, default_value = "California")]
        state: String,
        #[arg(long, default_value = "Imperial")]
        county: String,
        #[arg(long, default_value_t = 100)]
        quota: u32,
        #[arg(long, value_enum)]
        method: BaselineMethod,
        /// Seed for the random method
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value = "assigned_supermarkets_baseline.csv")]
        output: PathBuf,
    },
    /// Print coverage metrics for one or more plan CSVs
    Evaluate {
        /// Plan files produced by `solve` or `baseline`
        #[arg(required = true)]
        plans: Vec<PathBuf>,
        #[arg(long, value_enum, default_value_t = WeightPreset::ThreeTerm)]
        weights: WeightPreset,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum BaselineMethod {
    Random,
    Proportional,
}

#[derive(Clone, Copy, ValueEnum)]
enum WeightPreset {
    /// 0.4 low-income + 0.4 population + 0.2 geographic
    ThreeTerm,
    /// 0.5 low-income + 0.5 population
    TwoTerm,
}

impl From<WeightPreset> for CoverageWeights {
    fn from(preset: WeightPreset) -> Self {
        match preset {
            WeightPreset::ThreeTerm => CoverageWeights::THREE_TERM,
            WeightPreset::TwoTerm => CoverageWeights::TWO_TERM,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> storeplan::Result<()> {
    match cli.command {
        Command::Solve {
            data,
            adjacency,
            state,
            county,
            quota,
            max_per_tract,
            adjacency_limit,
            alpha,
            beta,
            strip_prefix,
            output,
            write_lp,
            time_budget,
        } => {
            let tracts = io::load_tracts(&data, &state, &county)?;
            let adjacency = Adjacency::load_json(&adjacency, &strip_prefix)?;
            let config = OptimizationConfig {
                quota,
                max_per_tract,
                adjacency_limit,
                alpha,
                beta,
            };

            let model =
                AllocationOptimizer::<HighsSolver>::build_model(&tracts, &adjacency, &config)?;
            if let Some(lp_path) = write_lp {
                model.write_lp(&lp_path)?;
                info!("wrote LP model to {}", lp_path.display());
            }

            let optimizer = AllocationOptimizer::new(HighsSolver::new())
                .with_options(SolveOptions { time_budget });
            let plan = optimizer.solve_model(&model, &tracts)?;

            io::write_plan(&output, &tracts, &plan)?;
            println!(
                "assigned {} supermarkets to {} of {} tracts; plan written to {}",
                plan.total(),
                plan.tracts_served(),
                tracts.len(),
                output.display()
            );
            Ok(())
        }
        Command::Baseline {
            data,
            state,
            county,
            quota,
            method,
            seed,
            output,
        } => {
            let tracts = io::load_tracts(&data, &state, &county)?;
            let plan = match method {
                BaselineMethod::Random => random_allocation(&tracts, quota, seed)?,
                BaselineMethod::Proportional => proportional_allocation(&tracts, quota)?,
            };
            io::write_plan(&output, &tracts, &plan)?;
            println!(
                "baseline plan ({} supermarkets over {} tracts) written to {}",
                plan.total(),
                tracts.len(),
                output.display()
            );
            Ok(())
        }
        Command::Evaluate { plans, weights } => {
            let weights = CoverageWeights::from(weights);
            for path in plans {
                let (tracts, plan) = io::read_plan(&path)?;
                println!("{}:", path.display());
                println!(
                    "  low-income coverage:  {:6.2}%",
                    evaluate::low_income_coverage(&tracts, &plan)
                );
                println!(
                    "  population coverage:  {:6.2}%",
                    evaluate::population_coverage(&tracts, &plan)
                );
                println!(
                    "  geographic coverage:  {:6.2}%",
                    evaluate::geographic_coverage(&tracts, &plan)
                );
                println!(
                    "  combined coverage:    {:6.2}%",
                    evaluate::combined_coverage(&tracts, &plan, weights)
                );
                match evaluate::income_balance(&tracts, &plan) {
                    Some(variance) => println!("  income balance:       {variance:.2}"),
                    None => println!("  income balance:       undefined (no tracts served)"),
                }
            }
            Ok(())
        }
    }
}
