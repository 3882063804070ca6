use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use eyre::Result;
use tracing_subscriber::EnvFilter;

use gaitbase_cli::commands;
use gaitbase_cli::config::{self, GaitbaseConfig};
use gaitbase_core::models::record::Record;
use gaitbase_core::schema::FieldSchema;
use gaitbase_report::error::ReportError;

#[derive(Debug, Parser)]
#[command(name = "gaitbase", version, about = "Render ROM measurement reports")]
struct Cli {
    /// Config file to use instead of the one in the user config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Field schema; overrides `schema_path` from the config.
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    /// Log as JSON lines on standard error.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render the text report of a record.
    Text {
        record: PathBuf,
        #[arg(long)]
        template: Option<PathBuf>,
        /// Write the report here instead of standard output.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Leave units out of the values.
        #[arg(long)]
        no_units: bool,
    },
    /// Render the spreadsheet report of a record.
    Sheet {
        record: PathBuf,
        #[arg(long)]
        template: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render the text report of a record as a Word document.
    Docx {
        record: PathBuf,
        #[arg(long)]
        template: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compare a text template against the field schema.
    Check {
        #[arg(long)]
        template: Option<PathBuf>,
    },
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Write the default config file.
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Print the config in effect.
    Show,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let logs = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr);
    if cli.log_json {
        logs.json().init();
    } else {
        logs.init();
    }

    let result = run(cli);
    if let Err(err) = &result {
        report_unknown_fields(err);
    }
    result
}

fn run(cli: Cli) -> Result<()> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::config_path()?,
    };
    let mut config = config::load_config_from(&config_path)?;

    match cli.command {
        Command::Text {
            record,
            template,
            output,
            no_units,
        } => {
            if no_units {
                config.include_units = false;
            }
            let template = commands::choose_path(
                template.as_deref(),
                config.text_template.as_deref(),
                "text template",
            )?;
            let schema = schema(&cli.schema, &config)?;
            let (_, fields) = commands::load_record(&schema, &record)?;
            let report = commands::text_report(&config, &template, &fields)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, report)?;
                    tracing::info!(path = %path.display(), "text report written");
                }
                None => print!("{report}"),
            }
        }
        Command::Sheet {
            record,
            template,
            output,
        } => {
            let template = commands::choose_path(
                template.as_deref(),
                config.sheet_template.as_deref(),
                "spreadsheet template",
            )?;
            let schema = schema(&cli.schema, &config)?;
            let (record, fields) = commands::load_record(&schema, &record)?;
            let output = output.unwrap_or_else(|| now_output_name(&record, "xlsx"));
            commands::sheet_report(&config, &template, &fields, &output)?;
        }
        Command::Docx {
            record,
            template,
            output,
        } => {
            let template = commands::choose_path(
                template.as_deref(),
                config.text_template.as_deref(),
                "text template",
            )?;
            let schema = schema(&cli.schema, &config)?;
            let (record, fields) = commands::load_record(&schema, &record)?;
            let output = output.unwrap_or_else(|| now_output_name(&record, "docx"));
            commands::docx_report(&config, &template, &fields, &output)?;
        }
        Command::Check { template } => {
            let template = commands::choose_path(
                template.as_deref(),
                config.text_template.as_deref(),
                "text template",
            )?;
            let schema = schema(&cli.schema, &config)?;
            let check = commands::check(&template, &schema)?;
            for name in &check.unrecognized {
                println!("not in schema: {name}");
            }
            for name in &check.unreferenced {
                println!("unused: {name}");
            }
            if !check.is_ok() {
                return Err(eyre::eyre!(
                    "{} uses {} unknown field(s)",
                    template.display(),
                    check.unrecognized.len()
                ));
            }
        }
        Command::Config { action } => match action {
            ConfigAction::Init { force } => {
                if config_path.exists() && !force {
                    return Err(eyre::eyre!(
                        "{} already exists (use --force to overwrite)",
                        config_path.display()
                    ));
                }
                config::save_config_to(&GaitbaseConfig::default(), &config_path)?;
            }
            ConfigAction::Show => {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        },
    }
    Ok(())
}

fn schema(given: &Option<PathBuf>, config: &GaitbaseConfig) -> Result<FieldSchema> {
    let path = commands::choose_path(
        given.as_deref(),
        config.schema_path.as_deref(),
        "field schema",
    )?;
    commands::load_schema(&path)
}

fn now_output_name(record: &Record, extension: &str) -> PathBuf {
    let now = jiff::Zoned::now().datetime();
    Path::new(".").join(commands::default_output_name(&record.patient, extension, now))
}

fn report_unknown_fields(err: &eyre::Report) {
    for cause in err.chain() {
        if let Some(ReportError::UnknownFields { names }) = cause.downcast_ref::<ReportError>() {
            for name in names {
                tracing::error!(field = %name, "template refers to a field that does not exist");
            }
        }
    }
}
