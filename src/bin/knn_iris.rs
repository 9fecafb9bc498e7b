use std::path::PathBuf;

use anyhow::Result;
use clap::{Arg, ArgMatches, Command, ValueHint};
use log::LevelFilter;

use knn_classifier::config::DemoConfig;
use knn_classifier::pipeline;

fn cli() -> Command {
    Command::new("knn_iris")
        .version(clap::crate_version!())
        .about("k-nearest-neighbors on the Iris dataset: accuracy report and decision boundary plot")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("JSON configuration file; omitted fields use their defaults")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("k")
                .short('k')
                .help("Number of neighbors. Overrides the configuration file.")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Seed for the train/test split. Overrides the configuration file.")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("test_size")
                .long("test-size")
                .help("Fraction of samples held out for testing. Overrides the configuration file.")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Write the decision boundary plot to this HTML file")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
}

fn load_config(matches: &ArgMatches) -> Result<DemoConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => DemoConfig::from_json_file(path)?,
        None => DemoConfig::default(),
    };

    if let Some(&k) = matches.get_one::<usize>("k") {
        config.k = k;
    }
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config.seed = seed;
    }
    if let Some(&test_size) = matches.get_one::<f64>("test_size") {
        config.test_size = test_size;
    }
    if let Some(output) = matches.get_one::<PathBuf>("output") {
        config.output_html = Some(output.clone());
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Info)
        .parse_env(env_logger::Env::default().filter_or("KNN_LOG", "info"))
        .init();

    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    let summary = pipeline::run(&config)?;

    println!(
        "k = {}, {} training / {} test samples",
        config.k, summary.n_train, summary.n_test
    );
    println!("Accuracy: {:.2}%\n", summary.evaluation.accuracy * 100.0);
    println!("{}", summary.evaluation.report);
    println!("Confusion matrix (rows: true class, columns: predicted class):");
    for row in &summary.evaluation.confusion {
        println!("  {:?}", row);
    }
    println!(
        "\nAccuracy using features {:?} only: {:.2}%",
        config.plot_features,
        summary.boundary_accuracy * 100.0
    );
    if config.output_html.is_none() {
        println!("Pass --output <file.html> to save the decision boundary plot.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn test_flags_override_defaults() {
        let matches = cli()
            .try_get_matches_from(["knn_iris", "-k", "7", "--seed", "1", "--test-size", "0.3"])
            .unwrap();
        let config = load_config(&matches).unwrap();
        assert_eq!(config.k, 7);
        assert_eq!(config.seed, 1);
        assert_eq!(config.test_size, 0.3);
        assert!(config.output_html.is_none());
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let matches = cli().try_get_matches_from(["knn_iris", "-k", "0"]).unwrap();
        assert!(load_config(&matches).is_err());
    }
}
