use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use bookcat::cli::commands::execute_command;
use bookcat::cli::output;
use bookcat::cli::Cli;

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match execute_command(&cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            output::error(&e);
            std::process::exit(e.exit_code());
        }
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // Create a subscriber with formatted output directed to stderr
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookcat::cli::args::ConfigCommands;
    use bookcat::cli::Commands;
    use bookcat::util::testing;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        testing::init_test_setup();
        Cli::command().debug_assert();
    }

    #[test]
    fn given_no_subcommand_when_parsing_then_command_is_none() {
        let cli = Cli::try_parse_from(["bookcat"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn given_global_flags_after_subcommand_when_parsing_then_accepted() {
        let cli =
            Cli::try_parse_from(["bookcat", "lookup", "Animal Farm", "1984", "-vv", "-f", "books.txt"])
                .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.file.as_deref(), Some(std::path::Path::new("books.txt")));
        match cli.command {
            Some(Commands::Lookup { names }) => assert_eq!(names, ["Animal Farm", "1984"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn given_lookup_without_names_when_parsing_then_error() {
        assert!(Cli::try_parse_from(["bookcat", "lookup"]).is_err());
    }

    #[test]
    fn given_config_path_when_parsing_then_nested_subcommand() {
        let cli = Cli::try_parse_from(["bookcat", "config", "path"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                command: ConfigCommands::Path
            })
        ));
    }
}
