use clap::Parser;
use ecgdicom_core::cli::{Cli, OutputFormat};
use ecgdicom_core::{AnnotationRules, ConversionReport, ConverterConfig, EcgConverter, TextReport};
use log::{error, info};
use std::process;

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    if !cli.output_dir.is_dir() {
        eprintln!("Error: {} is not a directory", cli.output_dir.display());
        process::exit(1);
    }

    let rules = match &cli.annotations {
        Some(path) => match AnnotationRules::from_csv_path(path) {
            Ok(overrides) => {
                info!("Loaded {} annotation rules from {}", overrides.len(), path.display());
                AnnotationRules::default().merge(overrides)
            }
            Err(e) => {
                error!("Failed to load annotation table: {}", e);
                eprintln!("Error: Failed to load annotation table: {}", e);
                process::exit(1);
            }
        },
        None => AnnotationRules::default(),
    };

    let config = ConverterConfig::detect().legacy_plus_sign(cli.legacy_plus_sign);
    info!("Implementation class UID: {}", config.implementation_class_uid);

    let converter = EcgConverter::new(config, rules);
    match converter.convert_file(&cli.input, &cli.output_dir) {
        Ok(report) => output_report(&report, cli.format),
        Err(e) => {
            error!(
                "Conversion failed after {} notices: {}",
                e.diagnostics.len(),
                e
            );
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

fn output_report(report: &ConversionReport, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!("{}", TextReport::new(report));
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match serde_json::to_string_pretty(report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("Failed to serialize to JSON: {}", e);
                        eprintln!("Error: Failed to serialize to JSON: {}", e);
                        process::exit(1);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                process::exit(1);
            }
        }
    }
}
