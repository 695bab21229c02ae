use model::argparse::parse_args;
use model::parameters::load_parameters;
use model::submodels::demography::{estimate_critical_size, Demography};
use model::RunSettings;
use std::fs::File;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut settings = RunSettings {
        generations: 30,
        repetitions: 20,
        ..RunSettings::default()
    };
    let mut parameters = String::new();
    let mut output = String::new();
    let mut sizes: Vec<usize> = Vec::new();
    let mut burn_in = 1;
    {
        let mut parser = parse_args(&mut settings, &mut parameters, &mut output);
        parser.set_description(
            "Estimate the population size below which cumulative skill is lost",
        );
        parser.refer(&mut sizes).add_option(
            &["--size"],
            argparse::Collect,
            "population size to include in the sweep (repeat for several)",
        );
        parser.refer(&mut burn_in).add_option(
            &["--burn-in"],
            argparse::Store,
            "generations to skip before measuring skill change",
        );
        parser.parse_args_or_exit();
    }
    if sizes.is_empty() {
        sizes = vec![50, 200, 1000, 5000];
    }

    let model: Demography = load_parameters(&parameters)?;
    let estimate = match estimate_critical_size(&model, &sizes, &settings, burn_in) {
        Ok(e) => e,
        Err(e) => return Err(e.to_string()),
    };
    info!(
        estimated = estimate.critical_size,
        expected = model.expected_critical_size(),
        "critical population size"
    );

    if output.is_empty() {
        println!("population_size\tdelta");
        for (n, delta) in estimate.deltas.iter() {
            println!("{}\t{}", n, delta);
        }
        println!("# N* = {}", estimate.critical_size);
        Ok(())
    } else {
        let file = match File::create(&output) {
            Ok(f) => f,
            Err(e) => return Err(format!("Could not create output file: {}", e)),
        };
        match serde_json::to_writer_pretty(file, &estimate) {
            Ok(_) => Ok(()),
            Err(e) => Err(format!("Failed to store results: {}", e)),
        }
    }
}
