use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use conciliador::commands::{self, DashboardInput, PreviewOutput};
use conciliador::settings;
use conciliador_client::ApiClient;
use conciliador_core::{CuentaId, DateRange, Periodo};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Bank reconciliation client", long_about = None)]
struct Cli {
    /// Config file (defaults to config.toml in the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides config and environment
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Totals, per-period series and cost-center breakdown
    Dashboard {
        /// Start date (YYYY-MM-DD), defaults to January 1st
        #[arg(long)]
        desde: Option<NaiveDate>,
        /// End date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        hasta: Option<NaiveDate>,
        /// Account id
        #[arg(long)]
        cuenta: Option<String>,
        /// Cost center id
        #[arg(long)]
        centro: Option<String>,
        /// Hide income
        #[arg(long)]
        sin_ingresos: bool,
        /// Hide expenses
        #[arg(long)]
        sin_egresos: bool,
        /// Cost centers to exclude, replacing the server defaults
        #[arg(long, num_args = 0.., value_delimiter = ',')]
        excluir: Option<Vec<i64>>,
    },
    /// Reconciliation preview for one account and month
    Conciliacion(PeriodArgs),
    /// Unlink every match for one account and month
    Reset {
        #[command(flatten)]
        periodo: PeriodArgs,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct PeriodArgs {
    /// Account id
    #[arg(long)]
    cuenta: i64,
    #[arg(long)]
    year: i32,
    #[arg(long)]
    month: u32,
}

impl PeriodArgs {
    fn resolve(&self) -> Result<(CuentaId, Periodo)> {
        Ok((CuentaId(self.cuenta), Periodo::new(self.year, self.month)?))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = settings::load_client_config(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config.base_url = url;
        config.validate()?;
    }
    let client = ApiClient::new(&config)?;
    tracing::debug!("Using backend at {}", client.base_url());

    match cli.command {
        Commands::Dashboard {
            desde,
            hasta,
            cuenta,
            centro,
            sin_ingresos,
            sin_egresos,
            excluir,
        } => {
            let today = chrono::Local::now().date_naive();
            let ytd = DateRange::year_to_date(today);
            let rango = DateRange::new(desde.unwrap_or(ytd.start), hasta.unwrap_or(ytd.end));
            let input = DashboardInput {
                rango: Some(rango),
                cuenta,
                centro_costo: centro,
                ocultar_ingresos: sin_ingresos,
                ocultar_egresos: sin_egresos,
                excluir,
            };
            let out = commands::dashboard(&client, input, today).await?;
            emit(&out, cli.json)?;
        }
        Commands::Conciliacion(args) => {
            let (cuenta, periodo) = args.resolve()?;
            let out = commands::conciliacion(&client, cuenta, periodo).await?;
            emit(&out, cli.json)?;
        }
        Commands::Reset { periodo, yes } => {
            let (cuenta, periodo) = periodo.resolve()?;
            let out = commands::reset(&client, cuenta, periodo, |preview| {
                if yes {
                    Ok(true)
                } else {
                    confirm_on_stdin(preview)
                }
            })
            .await?;
            match out {
                Some(out) => emit(&out, cli.json)?,
                None => eprintln!("Cancelado."),
            }
        }
    }

    Ok(())
}

fn emit<T: Serialize + std::fmt::Display>(out: &T, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(out)?);
    } else {
        print!("{out}");
    }
    Ok(())
}

fn confirm_on_stdin(preview: &PreviewOutput) -> Result<bool> {
    eprint!("{preview}");
    eprint!(
        "Se eliminaran todas las vinculaciones de la cuenta {} en {}. Continuar? [s/N] ",
        preview.cuenta_id, preview.periodo
    );
    std::io::stderr().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "s" | "si" | "sí" | "y" | "yes"))
}
