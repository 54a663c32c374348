//! Command dispatch
//!
//! Each handler returns the process exit code on success; errors bubble up
//! as [`CliError`] and are mapped to an exit code by `main`.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::LoadOutcome;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{BookRecord, OrderedCatalog};
use crate::exitcode;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraError;

/// Run the parsed command line. No subcommand means `show`.
pub fn execute_command(cli: &Cli) -> CliResult<i32> {
    let default = Commands::Show;
    let command = cli.command.as_ref().unwrap_or(&default);

    // Neither needs settings; `config path` must work when a config file is broken.
    match command {
        Commands::Completion { shell } => return completion(*shell),
        Commands::Config {
            command: ConfigCommands::Path,
        } => return config_path(&RealFileSystem, &current_dir()?),
        _ => {}
    }

    let container = build_container(cli)?;
    match command {
        Commands::Show => show(&container),
        Commands::Lookup { names } => lookup(&container, names),
        Commands::Min => min(&container),
        Commands::Load => load(&container),
        Commands::Config { command } => config(&container, command),
        Commands::Completion { .. } => Ok(exitcode::OK),
    }
}

/// Resolve settings (config files, env, `--file`) and wire up services.
fn build_container(cli: &Cli) -> CliResult<ServiceContainer> {
    let mut settings = Settings::load(Some(&current_dir()?))?;
    if let Some(file) = &cli.file {
        settings = settings.with_data_file(file.clone());
    }
    debug!(?settings, "effective settings");
    Ok(ServiceContainer::new(settings))
}

fn current_dir() -> CliResult<PathBuf> {
    std::env::current_dir()
        .map_err(|e| InfraError::io("determine working directory", e).into())
}

fn load_catalog(container: &ServiceContainer) -> CliResult<LoadOutcome> {
    let outcome = container
        .catalog_service()
        .load(&container.settings.data_file)?;
    for skipped in &outcome.report.skipped {
        output::warning(&format!("line {}: {}", skipped.line, skipped.reason));
    }
    Ok(outcome)
}

/// Print records separated by a blank line; report misses on stderr.
///
/// Returns `true` if every requested name was found.
fn print_lookups(catalog: &OrderedCatalog, names: &[String]) -> bool {
    let mut all_found = true;
    let mut first = true;
    for name in names {
        match catalog.lookup(name) {
            Some(record) => {
                print_record(record, &mut first);
            }
            None => {
                output::warning(&format!("not found: {name}"));
                all_found = false;
            }
        }
    }
    all_found
}

fn print_record(record: &BookRecord, first: &mut bool) {
    if !*first {
        output::info("");
    }
    output::info(record);
    *first = false;
}

/// One line item of the `show` report.
#[derive(Debug, PartialEq, Eq)]
enum ShowEntry<'a> {
    Found(&'a BookRecord),
    Missing(&'a str),
    Empty,
}

/// Featured lookups in configured order, then the minimum.
fn show_entries<'a>(catalog: &'a OrderedCatalog, featured: &'a [String]) -> Vec<ShowEntry<'a>> {
    let mut entries: Vec<ShowEntry<'a>> = featured
        .iter()
        .map(|name| match catalog.lookup(name) {
            Some(record) => ShowEntry::Found(record),
            None => ShowEntry::Missing(name),
        })
        .collect();
    entries.push(match catalog.find_minimum() {
        Some(record) => ShowEntry::Found(record),
        None => ShowEntry::Empty,
    });
    entries
}

#[instrument(skip(container))]
fn show(container: &ServiceContainer) -> CliResult<i32> {
    let LoadOutcome { catalog, .. } = load_catalog(container)?;

    let mut first = true;
    for entry in show_entries(&catalog, &container.settings.featured) {
        match entry {
            ShowEntry::Found(record) => print_record(record, &mut first),
            ShowEntry::Missing(name) => output::warning(&format!("not found: {name}")),
            ShowEntry::Empty => output::warning("catalog is empty"),
        }
    }
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn lookup(container: &ServiceContainer, names: &[String]) -> CliResult<i32> {
    let LoadOutcome { catalog, .. } = load_catalog(container)?;
    if print_lookups(&catalog, names) {
        Ok(exitcode::OK)
    } else {
        Ok(exitcode::NOT_FOUND)
    }
}

#[instrument(skip(container))]
fn min(container: &ServiceContainer) -> CliResult<i32> {
    let LoadOutcome { catalog, .. } = load_catalog(container)?;
    match catalog.find_minimum() {
        Some(record) => {
            output::info(record);
            Ok(exitcode::OK)
        }
        None => {
            output::warning("catalog is empty");
            Ok(exitcode::NOT_FOUND)
        }
    }
}

#[instrument(skip(container))]
fn load(container: &ServiceContainer) -> CliResult<i32> {
    let path = &container.settings.data_file;
    let outcome = container.catalog_service().load(path)?;
    let report = &outcome.report;

    output::header(&format!("Loaded {}", path.display()));
    output::success(&format!("{} records inserted", report.inserted));
    output::detail(&format!("tree depth: {}", outcome.catalog.depth()));
    if !report.duplicates.is_empty() {
        output::action("Duplicates ignored", &report.duplicates.len());
        for name in &report.duplicates {
            output::failure(name);
        }
    }
    if !report.skipped.is_empty() {
        output::action("Malformed lines skipped", &report.skipped.len());
        for skipped in &report.skipped {
            output::failure(&format!("line {}: {}", skipped.line, skipped.reason));
        }
    }
    Ok(exitcode::OK)
}

fn config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<i32> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            return config_path(container.fs.as_ref(), &current_dir()?);
        }
        ConfigCommands::Init => {
            let path = global_config_path().ok_or_else(|| {
                CliError::Usage("no config directory on this platform".to_string())
            })?;
            init_config(container.fs.as_ref(), &path)?;
            output::success(&format!("created {}", path.display()));
        }
    }
    Ok(exitcode::OK)
}

/// Config file locations with an existence marker. Does not parse them.
fn config_path_entries(fs: &dyn FileSystem, cwd: &Path) -> Vec<(&'static str, String)> {
    let describe = |path: &Path| {
        let marker = if fs.exists(path) { "exists" } else { "not found" };
        format!("{} ({marker})", path.display())
    };
    let global = match global_config_path() {
        Some(path) => describe(path.as_path()),
        None => "no config directory on this platform".to_string(),
    };
    vec![("Global", global), ("Local", describe(local_config_path(cwd).as_path()))]
}

fn config_path(fs: &dyn FileSystem, cwd: &Path) -> CliResult<i32> {
    for (label, line) in config_path_entries(fs, cwd) {
        output::action(label, &line);
    }
    Ok(exitcode::OK)
}

/// Write the config template to `path`, refusing to overwrite.
fn init_config(fs: &dyn FileSystem, path: &Path) -> CliResult<()> {
    if fs.exists(path) {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            path.display()
        )));
    }
    fs.ensure_parent(path)
        .map_err(|e| InfraError::io(format!("create {}", path.display()), e))?;
    fs.write(path, &Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    Ok(())
}

fn completion(shell: Shell) -> CliResult<i32> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(exitcode::OK)
}
