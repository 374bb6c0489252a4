use std::process;

use clap::Parser;
use colored::Colorize;
use knucleotide::{cli::Args, config::Config, run};

#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    #[cfg(feature = "tracing")]
    init_tracing();

    let args = Args::parse();
    let quiet = args.quiet;
    let config = Config::from(args);

    if !quiet {
        eprintln!(
            "{}: {}",
            "record".bold(),
            config.record_id.as_str().blue().bold()
        );
        eprintln!(
            "{}: {}",
            "data".bold(),
            config
                .path
                .as_ref()
                .map_or_else(|| "stdin".to_string(), |p| p.display().to_string())
                .underline()
                .bold()
                .blue()
        );
        let lengths: Vec<String> = config.lengths.iter().map(ToString::to_string).collect();
        eprintln!("{}: {}", "k-lengths".bold(), lengths.join(",").blue().bold());
        eprintln!();
    }

    match run::run(&config) {
        Ok(stats) => {
            if !quiet {
                eprintln!(
                    "{} {} bases, {} shards in {:.6}s",
                    "Counted".bold(),
                    stats.bases,
                    stats.shards,
                    stats.elapsed.as_secs_f64()
                );
            }
        }
        Err(e) => {
            eprintln!(
                "{}\n {}",
                "Application error:".blue().bold(),
                e.to_string().blue()
            );
            process::exit(1);
        }
    }
}
