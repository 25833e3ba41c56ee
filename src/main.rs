//! Customer Analyzer CLI
//!
//! Terminal front end for the customer classification service:
//! - Fill in a customer form interactively and submit it
//! - Submit a single record from flags or a preset
//! - Inspect, summarize, export or clear the prediction history

use anyhow::Context;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use customer_analyzer::config::{generate_default_config, Config};
use customer_analyzer::history::{export, ExportFormat, FileStore, HistoryStore};
use customer_analyzer::view;
use customer_analyzer::{Field, FormState, HttpPredictor, Preset, Session, SubmitError};

#[derive(Parser)]
#[command(name = "customer-analyzer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "E-commerce customer analyzer")]
#[command(long_about = "Classify customers as Normal, Loyal or Fraudulent using a remote prediction service,\nand keep a running history of the results.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: ~/.config/customer-analyzer/config.toml or ./config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Prediction endpoint URL
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Directory holding the prediction history
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill in and submit the form interactively (default)
    Interactive,

    /// Submit one customer record
    Predict {
        /// Start from a sample record (fraud, loyal, normal)
        #[arg(short, long)]
        preset: Option<Preset>,

        #[command(flatten)]
        fields: FieldArgs,

        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or manage the prediction history
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },

    /// Show per-label counts over the history
    Summary,

    /// List the sample records
    Presets,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List every retained prediction (default)
    List,

    /// Delete the whole history
    Clear,

    /// Export the history
    Export {
        /// json or csv
        #[arg(short, long, default_value = "json")]
        format: ExportFormat,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Per-field overrides; anything given here replaces the preset's value
#[derive(Args, Debug, Default)]
pub struct FieldArgs {
    #[arg(long)]
    pub age: Option<String>,
    #[arg(long)]
    pub gender: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub avg_order_value: Option<String>,
    #[arg(long)]
    pub total_orders: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub last_purchase: Option<String>,
    #[arg(long)]
    pub preferred_category: Option<String>,
    #[arg(long)]
    pub email_open_rate: Option<String>,
    #[arg(long)]
    pub loyalty_score: Option<String>,
    #[arg(long)]
    pub churn_risk: Option<String>,
}

impl FieldArgs {
    fn overrides(&self) -> Vec<(Field, &str)> {
        [
            (Field::Age, &self.age),
            (Field::Gender, &self.gender),
            (Field::Country, &self.country),
            (Field::AvgOrderValue, &self.avg_order_value),
            (Field::TotalOrders, &self.total_orders),
            (Field::LastPurchase, &self.last_purchase),
            (Field::PreferredCategory, &self.preferred_category),
            (Field::EmailOpenRate, &self.email_open_rate),
            (Field::LoyaltyScore, &self.loyalty_score),
            (Field::ChurnRisk, &self.churn_risk),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(endpoint) = &cli.endpoint {
        config.predictor.endpoint = endpoint.clone();
    }
    if let Some(dir) = &cli.data_dir {
        config.history.data_dir = dir.to_string_lossy().to_string();
    }

    customer_analyzer::logging::init(&config.logging)?;
    tracing::debug!(endpoint = %config.predictor.endpoint, "Customer Analyzer v{}", env!("CARGO_PKG_VERSION"));

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            let session = open_session(&config)?;
            run_interactive(&session).await?;
        }

        Commands::Predict {
            preset,
            fields,
            json,
        } => {
            let session = open_session(&config)?;
            if let Some(preset) = preset {
                session.apply_preset(preset).await;
            }
            for (field, value) in fields.overrides() {
                session.update_field(field, value).await;
            }

            eprintln!("{}", view::render_loading());
            match session.submit().await {
                Ok(result) if json => {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                Ok(result) => {
                    print!("{}", view::render_result(&result));
                    let theme = session.theme().await;
                    if let Some(summary) = view::render_summary(&session.history().await, theme) {
                        println!();
                        print!("{}", summary);
                    }
                }
                Err(SubmitError::Invalid(errors)) => {
                    eprint!("{}", view::render_errors(&errors));
                    std::process::exit(2);
                }
                Err(e) => {
                    eprintln!("{}", e.user_message());
                    std::process::exit(1);
                }
            }
        }

        Commands::History { action } => {
            let mut history = open_history(&config)?;

            match action.unwrap_or(HistoryAction::List) {
                HistoryAction::List => {
                    print!("{}", view::render_history(history.entries()));
                }
                HistoryAction::Clear => {
                    let count = history.len();
                    history.clear()?;
                    println!("Cleared {} predictions", count);
                }
                HistoryAction::Export { format, output } => match output {
                    Some(path) => {
                        let file = std::fs::File::create(&path)
                            .with_context(|| format!("Cannot create {:?}", path))?;
                        export(history.entries(), format, file)?;
                        println!("Exported {} predictions to {:?}", history.len(), path);
                    }
                    None => {
                        export(history.entries(), format, std::io::stdout().lock())?;
                    }
                },
            }
        }

        Commands::Summary => {
            let history = open_history(&config)?;
            match view::render_summary(history.entries(), Default::default()) {
                Some(summary) => print!("{}", summary),
                None => {
                    println!("No predictions yet.");
                    println!();
                    println!("Try one with:");
                    println!("  customer-analyzer predict --preset fraud");
                }
            }
        }

        Commands::Presets => {
            print!("{}", view::render_presets());
        }

        Commands::Config { output } => {
            let content = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &content)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", content);
                }
            }
        }
    }

    Ok(())
}

fn open_history(config: &Config) -> anyhow::Result<HistoryStore> {
    let dir = config.history.data_path();
    let store = FileStore::open(&dir).with_context(|| format!("Cannot open data directory {:?}", dir))?;
    Ok(HistoryStore::load_key(Arc::new(store), config.history.key.clone()))
}

fn open_session(config: &Config) -> anyhow::Result<Session> {
    let predictor = HttpPredictor::new(config.predictor.client_config())
        .context("Cannot create HTTP client")?;
    let history = open_history(config)?;
    Ok(Session::new(Arc::new(predictor), history))
}

// ============ Interactive session ============

/// One line of input in the interactive session
#[derive(Debug, PartialEq)]
enum ReplCommand {
    Set(Field, String),
    Preset(Preset),
    Reset,
    Show,
    Submit,
    History,
    Summary,
    Clear,
    Theme,
    Help,
    Quit,
    Empty,
}

fn parse_command(line: &str) -> Result<ReplCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "" => Ok(ReplCommand::Empty),
        "set" => {
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            if field.is_empty() {
                return Err("Usage: set <field> <value>".to_string());
            }
            let field = field.parse::<Field>().map_err(|e| e.to_string())?;
            Ok(ReplCommand::Set(field, value.to_string()))
        }
        "preset" => rest
            .parse::<Preset>()
            .map(ReplCommand::Preset)
            .map_err(|e| e.to_string()),
        "reset" => Ok(ReplCommand::Reset),
        "show" | "form" => Ok(ReplCommand::Show),
        "submit" | "analyze" => Ok(ReplCommand::Submit),
        "history" => Ok(ReplCommand::History),
        "summary" => Ok(ReplCommand::Summary),
        "clear" => Ok(ReplCommand::Clear),
        "theme" => Ok(ReplCommand::Theme),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
        other => Err(format!("Unknown command: {}. Type 'help' for commands.", other)),
    }
}

const HELP: &str = "Commands:
  set <field> <value>   Change one field (e.g. set age 45)
  preset <name>         Fill the form with a sample: fraud, loyal, normal
  reset                 Clear the form and the last result
  show                  Show the form and the last result
  submit                Send the form for prediction
  history               List past predictions
  summary               Show per-label counts
  clear                 Delete the prediction history
  theme                 Toggle light/dark charts
  quit                  Leave
";

async fn run_interactive(session: &Session) -> anyhow::Result<()> {
    println!("E-Commerce Customer Analyzer");
    println!("Type 'help' for commands.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        match command {
            ReplCommand::Empty => {}
            ReplCommand::Set(field, value) => {
                session.update_field(field, value).await;
            }
            ReplCommand::Preset(preset) => {
                session.apply_preset(preset).await;
                print!("{}", view::render_form(&session.form().await, today()));
            }
            ReplCommand::Reset => {
                session.reset().await;
                println!("Form cleared.");
            }
            ReplCommand::Show => {
                show(session, &session.form().await).await;
            }
            ReplCommand::Submit => {
                println!("{}", view::render_loading());
                match session.submit().await {
                    Ok(result) => {
                        print!("{}", view::render_result(&result));
                        print_summary(session).await;
                    }
                    Err(SubmitError::Invalid(errors)) => {
                        print!("{}", view::render_errors(&errors));
                    }
                    Err(e) => println!("{}", e.user_message()),
                }
            }
            ReplCommand::History => {
                print!("{}", view::render_history(&session.history().await));
            }
            ReplCommand::Summary => {
                if session.history_len().await == 0 {
                    println!("No predictions yet.");
                } else {
                    print_summary(session).await;
                }
            }
            ReplCommand::Clear => match session.clear_history().await {
                Ok(()) => println!("History cleared."),
                Err(e) => println!("Could not clear history: {}", e),
            },
            ReplCommand::Theme => {
                let theme = session.toggle_theme().await;
                println!("Theme: {}", theme.name());
            }
            ReplCommand::Help => print!("{}", HELP),
            ReplCommand::Quit => break,
        }
    }

    Ok(())
}

async fn show(session: &Session, form: &FormState) {
    print!("{}", view::render_form(form, today()));
    if let Some(result) = session.result().await {
        println!();
        print!("{}", view::render_result(&result));
    }
}

async fn print_summary(session: &Session) {
    let theme = session.theme().await;
    if let Some(summary) = view::render_summary(&session.history().await, theme) {
        println!();
        print!("{}", summary);
    }
}

fn today() -> chrono::NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set() {
        assert_eq!(
            parse_command("set age 45").unwrap(),
            ReplCommand::Set(Field::Age, "45".to_string())
        );
        assert_eq!(
            parse_command("  set preferred_category Home Garden ").unwrap(),
            ReplCommand::Set(Field::PreferredCategory, "Home Garden".to_string())
        );
        assert_eq!(
            parse_command("set country").unwrap(),
            ReplCommand::Set(Field::Country, String::new())
        );
        assert!(parse_command("set").is_err());
        assert!(parse_command("set shoe_size 44").is_err());
    }

    #[test]
    fn test_parse_preset() {
        assert_eq!(
            parse_command("preset loyal").unwrap(),
            ReplCommand::Preset(Preset::Loyal)
        );
        assert!(parse_command("preset").is_err());
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("").unwrap(), ReplCommand::Empty);
        assert_eq!(parse_command("SUBMIT").unwrap(), ReplCommand::Submit);
        assert_eq!(parse_command("exit").unwrap(), ReplCommand::Quit);
        assert_eq!(parse_command("theme").unwrap(), ReplCommand::Theme);
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn test_field_overrides() {
        let args = FieldArgs {
            age: Some("50".to_string()),
            churn_risk: Some("0.9".to_string()),
            ..FieldArgs::default()
        };

        let mut form = FormState::from_preset(Preset::Normal);
        for (field, value) in args.overrides() {
            form.update(field, value);
        }

        assert_eq!(form.get(Field::Age), "50");
        assert_eq!(form.get(Field::ChurnRisk), "0.9");
        assert_eq!(form.get(Field::Country), "Canada");
    }

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();

        let cli = Cli::parse_from([
            "customer-analyzer",
            "predict",
            "--preset",
            "fraud",
            "--age",
            "46",
        ]);
        match cli.command {
            Some(Commands::Predict { preset, fields, .. }) => {
                assert_eq!(preset, Some(Preset::Fraud));
                assert_eq!(fields.age.as_deref(), Some("46"));
            }
            _ => panic!("expected predict"),
        }

        let cli = Cli::parse_from(["customer-analyzer", "history", "export", "-f", "csv"]);
        assert!(matches!(
            cli.command,
            Some(Commands::History {
                action: Some(HistoryAction::Export {
                    format: ExportFormat::Csv,
                    ..
                })
            })
        ));
    }
}
