/*!
Observation

What is recorded of a simulation is one row of summary statistics per
generation, for every repetition. The generation step never sees these; they
are the only output of the run driver and are handed on to plotting or to the
post-processing in `analysis`.
 */
use crate::error::AnalysisError;
use serde_derive::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

/**
The time series of one repetition. Row `t` holds the statistics of generation
`t`, with row 0 describing the initial population. Rows can only be appended.
 */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarySeries {
    statistics: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl SummarySeries {
    pub fn new(statistics: Vec<String>) -> Self {
        SummarySeries {
            statistics,
            rows: vec![],
        }
    }

    pub fn with_capacity(statistics: Vec<String>, generations: usize) -> Self {
        SummarySeries {
            statistics,
            rows: Vec::with_capacity(generations),
        }
    }

    pub fn push(&mut self, row: Vec<f64>) {
        assert_eq!(
            row.len(),
            self.statistics.len(),
            "observation does not match the declared statistics"
        );
        self.rows.push(row);
    }

    pub fn statistics(&self) -> &[String] {
        &self.statistics
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&[f64]> {
        self.rows.last().map(|r| r.as_slice())
    }

    pub fn index_of(&self, statistic: &str) -> Result<usize, AnalysisError> {
        self.statistics
            .iter()
            .position(|s| s == statistic)
            .ok_or_else(|| AnalysisError::UnknownStatistic(statistic.to_string()))
    }

    /// The whole time series of one statistic.
    pub fn column(&self, statistic: &str) -> Result<Vec<f64>, AnalysisError> {
        let i = self.index_of(statistic)?;
        Ok(self.rows.iter().map(|r| r[i]).collect())
    }

    /// Value of a statistic in the last recorded generation.
    pub fn final_value(&self, statistic: &str) -> Result<f64, AnalysisError> {
        let i = self.index_of(statistic)?;
        match self.rows.last() {
            Some(row) => Ok(row[i]),
            None => Err(AnalysisError::TooFewPoints { needed: 1, got: 0 }),
        }
    }
}

/**
All repetitions of one run. Repetitions are combined only here, after every
one of them has finished.
 */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runs {
    pub model: String,
    pub statistics: Vec<String>,
    pub repetitions: Vec<SummarySeries>,
}

impl Runs {
    pub fn new(model: &str, statistics: Vec<String>, repetitions: Vec<SummarySeries>) -> Self {
        Runs {
            model: model.to_string(),
            statistics,
            repetitions,
        }
    }

    /// Generation-wise mean over all repetitions.
    pub fn mean_series(&self) -> SummarySeries {
        let mut mean = SummarySeries::new(self.statistics.clone());
        let generations = self
            .repetitions
            .iter()
            .map(|s| s.len())
            .min()
            .unwrap_or(0);
        let k = self.repetitions.len() as f64;
        for t in 0..generations {
            let mut row = vec![0.; self.statistics.len()];
            for series in self.repetitions.iter() {
                for (acc, x) in row.iter_mut().zip(series.rows[t].iter()) {
                    *acc += x;
                }
            }
            mean.push(row.into_iter().map(|x| x / k).collect());
        }
        mean
    }

    /// The last value of `statistic` in every repetition, in repetition order.
    pub fn final_values(&self, statistic: &str) -> Result<Vec<f64>, AnalysisError> {
        self.repetitions
            .iter()
            .map(|s| s.final_value(statistic))
            .collect()
    }

    /// Tab-separated table with one line per repetition and generation.
    pub fn write_table<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "repetition\tgeneration\t{}", self.statistics.join("\t"))?;
        for (r, series) in self.repetitions.iter().enumerate() {
            for (t, row) in series.rows().iter().enumerate() {
                let values: Vec<String> = row.iter().map(|x| format!("{}", x)).collect();
                writeln!(out, "{}\t{}\t{}", r, t, values.join("\t"))?;
            }
        }
        Ok(())
    }
}

pub fn store_runs(runs: &Runs, filename: &str) -> Result<(), String> {
    let file = match File::create(filename) {
        Ok(f) => f,
        Err(e) => return Err(format!("Could not create output file: {}", e)),
    };
    match serde_json::to_writer_pretty(file, runs) {
        Ok(_) => Ok(()),
        Err(e) => Err(format!("Failed to store results: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> SummarySeries {
        let mut s = SummarySeries::new(vec!["p".to_string()]);
        for v in values {
            s.push(vec![*v]);
        }
        s
    }

    #[test]
    fn mean_series_averages_generation_wise() {
        let runs = Runs::new(
            "test",
            vec!["p".to_string()],
            vec![series(&[0.0, 0.5]), series(&[1.0, 0.5])],
        );
        assert_eq!(runs.mean_series().column("p").unwrap(), vec![0.5, 0.5]);
    }

    #[test]
    fn unknown_statistics_are_reported() {
        assert_eq!(
            series(&[0.1]).column("q"),
            Err(AnalysisError::UnknownStatistic("q".to_string()))
        );
    }

    #[test]
    #[should_panic]
    fn rows_must_match_statistics() {
        series(&[0.1]).push(vec![0.1, 0.2]);
    }

    #[test]
    fn table_has_a_header_and_one_line_per_generation() {
        let runs = Runs::new("test", vec!["p".to_string()], vec![series(&[0.25, 0.5])]);
        let mut out = vec![];
        runs.write_table(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "repetition\tgeneration\tp\n0\t0\t0.25\n0\t1\t0.5\n");
    }
}
