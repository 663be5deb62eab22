mod commands;
mod config;
mod directory;
mod error;
mod formatter;
mod host;
mod i18n;
mod logging;
mod remover;
mod status;
mod translation;

use clap::{ArgAction, Args, Parser, Subcommand};
use colored::*;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;

use commands::{LanguageCommand, Outcome};
use config::Config;
use error::LanguageError;
use formatter::{Format, Formatter};
use host::{ConfigLocaleStore, LocalFilesystem, LocalHost, SiteLayout};
use i18n::I18n;
use logging::LogConfig;
use translation::{Field, Filter, ObjectType};

#[derive(Parser)]
#[command(name = "langpack", version)]
#[command(about = "List, install, activate and uninstall language packs")]
struct Cli {
    /// Site root directory [default: $LANGPACK_ROOT, then site.root from ~/.langpack/config.toml]
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// More log output (-v progress, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage core language packs
    Core {
        #[command(subcommand)]
        action: LanguageAction,
    },
    /// Manage plugin language packs
    Plugin {
        #[command(subcommand)]
        action: LanguageAction,
    },
    /// Manage theme language packs
    Theme {
        #[command(subcommand)]
        action: LanguageAction,
    },
}

#[derive(Subcommand)]
enum LanguageAction {
    /// List available languages
    List(ListArgs),
    /// Install a language pack
    Install {
        /// Language code, e.g. de_DE
        language: String,
        /// Activate the language once installed
        #[arg(long)]
        activate: bool,
    },
    /// Make an installed language the active site locale
    Activate {
        language: String,
    },
    /// Remove the files of an installed language pack
    Uninstall {
        language: String,
    },
    /// Exit 0 if the language is installed, 1 otherwise
    IsInstalled {
        language: String,
    },
}

#[derive(Args)]
struct ListArgs {
    /// Only languages with this code
    #[arg(long)]
    language: Option<String>,
    /// Only languages with this English name
    #[arg(long = "english_name", alias = "english-name")]
    english_name: Option<String>,
    /// Only languages with this native name
    #[arg(long = "native_name", alias = "native-name")]
    native_name: Option<String>,
    /// Only languages with this status: installed, uninstalled or active
    #[arg(long)]
    status: Option<String>,
    /// Only languages with this pack version
    #[arg(long)]
    version: Option<String>,
    /// Only languages with this package source
    #[arg(long)]
    package: Option<String>,
    /// Only languages updated at this time (YYYY-MM-DD HH:MM:SS)
    #[arg(long)]
    updated: Option<String>,
    /// Comma separated fields to show [default: language,english_name,native_name,status,updated]
    #[arg(long, value_delimiter = ',')]
    fields: Vec<Field>,
    /// Print the values of a single field
    #[arg(long)]
    field: Option<Field>,
    /// Output format: table, csv, json or count [default: display.format from config]
    #[arg(long)]
    format: Option<Format>,
}

impl ListArgs {
    fn filters(&self) -> Vec<Filter> {
        [
            (Field::Language, &self.language),
            (Field::EnglishName, &self.english_name),
            (Field::NativeName, &self.native_name),
            (Field::Status, &self.status),
            (Field::Version, &self.version),
            (Field::Package, &self.package),
            (Field::Updated, &self.updated),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_ref().map(|v| Filter::new(field, v.clone())))
        .collect()
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Results go to stdout, labels of warnings and errors to stderr.
    if !std::io::stdout().is_terminal()
        || !std::io::stderr().is_terminal()
        || std::env::var_os("NO_COLOR").is_some()
    {
        colored::control::set_override(false);
    }
    if let Err(err) = logging::init_logging(&LogConfig::from_cli(cli.verbose, cli.quiet)) {
        eprintln!("{:#}", err);
    }

    let config = match Config::new() {
        Ok(config) => config,
        Err(err) => {
            let i18n = I18n::new(&std::env::var("LANG").unwrap_or_default());
            let message = i18n.t_format("error_context", &[&i18n.t("error_load_config"), &format!("{:#}", err)]);
            eprintln!("{}: {}", i18n.t("label_error").red().bold(), message);
            return ExitCode::FAILURE;
        }
    };
    let i18n = I18n::new(&config.get_effective_language());

    match run(cli, config, &i18n) {
        Ok(code) => code,
        Err(err) => {
            tracing::debug!(error = %err, "command failed");
            let message = match err.message_key() {
                Some(key) => i18n.t(key),
                None => format!("{:#}", err),
            };
            eprintln!("{}: {}", i18n.t("label_error").red().bold(), message);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: Config, i18n: &I18n) -> Result<ExitCode, LanguageError> {
    let (obj_type, action) = match cli.command {
        Commands::Core { action } => (ObjectType::Core, action),
        Commands::Plugin { action } => (ObjectType::Plugin, action),
        Commands::Theme { action } => (ObjectType::Theme, action),
    };

    let layout = SiteLayout::new(config.effective_root(cli.root), config.site.catalog_dir.clone());
    let default_format = config.display.format.parse().unwrap_or_else(|err| {
        warn!(format = %config.display.format, %err, "ignoring display.format from config");
        Format::Table
    });

    let host = LocalHost::new(layout.clone());
    let fs = LocalFilesystem;
    let locale = ConfigLocaleStore::new(config);
    let command = LanguageCommand::new(obj_type, &host, &fs, &locale, layout.languages_dir());

    match action {
        LanguageAction::List(args) => {
            let formatter = Formatter::new(
                Some(args.fields.clone()),
                args.format.unwrap_or(default_format),
                args.field,
            );
            print!("{}", command.list(&args.filters(), &formatter)?);
        }
        LanguageAction::Install { language, activate } => {
            let outcome = command.install(&language)?;
            report(i18n, outcome);
            if activate && matches!(outcome, Outcome::Success(_)) {
                report(i18n, command.activate(&language)?);
            }
        }
        LanguageAction::Activate { language } => report(i18n, command.activate(&language)?),
        LanguageAction::Uninstall { language } => report(i18n, command.uninstall(&language)?),
        LanguageAction::IsInstalled { language } => {
            return Ok(if command.is_installed(&language) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn report(i18n: &I18n, outcome: Outcome) {
    let message = i18n.t(outcome.message_key());
    match outcome {
        Outcome::Success(_) => println!("{}: {}", i18n.t("label_success").green().bold(), message),
        Outcome::Warning(_) => eprintln!("{}: {}", i18n.t("label_warning").yellow().bold(), message),
    }
}
