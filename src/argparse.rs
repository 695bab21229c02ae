use crate::RunSettings;
use std::fmt;
use std::str::FromStr;

/// The transmission rules the binaries can run, by their short name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Binary,
    Vertical,
    Multiple,
    Demography,
    Rogers,
    Openness,
    Interdependence,
    Attraction,
    Network,
    Migration,
}

impl ModelKind {
    pub const ALL: [ModelKind; 10] = [
        ModelKind::Binary,
        ModelKind::Vertical,
        ModelKind::Multiple,
        ModelKind::Demography,
        ModelKind::Rogers,
        ModelKind::Openness,
        ModelKind::Interdependence,
        ModelKind::Attraction,
        ModelKind::Network,
        ModelKind::Migration,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ModelKind::Binary => "binary",
            ModelKind::Vertical => "vertical",
            ModelKind::Multiple => "multiple",
            ModelKind::Demography => "demography",
            ModelKind::Rogers => "rogers",
            ModelKind::Openness => "openness",
            ModelKind::Interdependence => "interdependence",
            ModelKind::Attraction => "attraction",
            ModelKind::Network => "network",
            ModelKind::Migration => "migration",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<ModelKind, String> {
        ModelKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = ModelKind::ALL.iter().map(|k| k.name()).collect();
                format!("Unknown model {}, expected one of {}", s, known.join(", "))
            })
    }
}

/**
Options shared by the binaries. Binaries add their own options to the
returned parser before parsing.
 */
pub fn parse_args<'a>(
    settings: &'a mut RunSettings,
    parameters: &'a mut String,
    output: &'a mut String,
) -> ::argparse::ArgumentParser<'a> {
    let mut parser = ::argparse::ArgumentParser::new();
    parser.set_description("Run a cultural transmission simulation");
    parser.refer(&mut settings.population_size).add_option(
        &["--population-size"],
        ::argparse::Store,
        "number of individuals in every generation",
    );
    parser.refer(&mut settings.generations).add_option(
        &["--generations"],
        ::argparse::Store,
        "number of generations to simulate after the initial one",
    );
    parser.refer(&mut settings.repetitions).add_option(
        &["--repetitions"],
        ::argparse::Store,
        "number of independent repetitions",
    );
    parser.refer(&mut settings.seed).add_option(
        &["--seed"],
        ::argparse::Store,
        "seed of the random number streams",
    );
    parser.refer(&mut settings.parallel).add_option(
        &["--sequential"],
        ::argparse::StoreFalse,
        "run the repetitions one after the other (results are the same)",
    );
    parser.refer(&mut settings.log_every).add_option(
        &["--log-every"],
        ::argparse::Store,
        "period of progress logging, in generations (0: off)",
    );
    parser.refer(parameters).add_option(
        &["--parameters"],
        ::argparse::Store,
        "JSON file with model parameters; missing fields take their default values",
    );
    parser.refer(output).add_option(
        &["--output"],
        ::argparse::Store,
        "JSON file to store the results in, instead of printing a table",
    );
    parser
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_names_round_trip() {
        for k in ModelKind::ALL.iter() {
            assert_eq!(k.name().parse::<ModelKind>(), Ok(*k));
        }
        assert!("wright-fisher".parse::<ModelKind>().is_err());
    }

    #[test]
    fn options_are_parsed_into_the_settings() {
        let mut settings = RunSettings::default();
        let mut parameters = String::new();
        let mut output = String::new();
        {
            let parser = parse_args(&mut settings, &mut parameters, &mut output);
            let args: Vec<String> = vec![
                "simulation",
                "--population-size",
                "42",
                "--sequential",
                "--parameters",
                "rogers.json",
            ]
            .into_iter()
            .map(String::from)
            .collect();
            parser
                .parse(args, &mut std::io::sink(), &mut std::io::sink())
                .unwrap();
        }
        assert_eq!(settings.population_size, 42);
        assert!(!settings.parallel);
        assert_eq!(parameters, "rogers.json");
        assert_eq!(output, "");
    }
}
