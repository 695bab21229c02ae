use model::argparse::{parse_args, ModelKind};
use model::observation::store_runs;
use model::parameters::load_parameters;
use model::submodels::*;
use model::{run, Model, RunSettings};
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn simulate<M>(parameters: &str, settings: &RunSettings, output: &str) -> Result<(), String>
where
    M: Model + DeserializeOwned + Default + std::fmt::Debug,
{
    let model: M = load_parameters(parameters)?;
    info!(?model, "parameters");
    let runs = match run(&model, settings) {
        Ok(r) => r,
        Err(e) => return Err(e.to_string()),
    };
    if output.is_empty() {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        match runs.write_table(&mut handle) {
            Ok(_) => Ok(()),
            Err(e) => Err(e.to_string()),
        }
    } else {
        store_runs(&runs, output)
    }
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut settings = RunSettings::default();
    let mut kind = ModelKind::Binary;
    let mut parameters = String::new();
    let mut output = String::new();
    {
        let mut parser = parse_args(&mut settings, &mut parameters, &mut output);
        parser.refer(&mut kind).add_option(
            &["--model"],
            argparse::Store,
            "transmission model: binary, vertical, multiple, demography, rogers, openness, interdependence, attraction, network or migration",
        );
        parser.parse_args_or_exit();
    }

    match kind {
        ModelKind::Binary => simulate::<BinaryTransmission>(&parameters, &settings, &output),
        ModelKind::Vertical => simulate::<VerticalHorizontal>(&parameters, &settings, &output),
        ModelKind::Multiple => simulate::<MultipleTraits>(&parameters, &settings, &output),
        ModelKind::Demography => simulate::<Demography>(&parameters, &settings, &output),
        ModelKind::Rogers => simulate::<Rogers>(&parameters, &settings, &output),
        ModelKind::Openness => simulate::<Openness>(&parameters, &settings, &output),
        ModelKind::Interdependence => {
            simulate::<Interdependence>(&parameters, &settings, &output)
        }
        ModelKind::Attraction => simulate::<Attraction>(&parameters, &settings, &output),
        ModelKind::Network => simulate::<NetworkTransmission>(&parameters, &settings, &output),
        ModelKind::Migration => simulate::<Migration>(&parameters, &settings, &output),
    }
}
