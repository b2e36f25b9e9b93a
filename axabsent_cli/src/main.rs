//! AxAbsEnt dashboard CLI
//!
//! Talks to the AxAbsEnt backend through the typed client: browse entities,
//! create interactions, run simulations and inspect stored results.

mod export;

use anyhow::{bail, Context, Result};
use axabsent_core::constants::status_messages;
use axabsent_core::formatting::{
    capitalize, format_absolute_label, format_entropy, format_interaction_label, format_matrix,
};
use axabsent_core::visualization::{format_tooltip, get_force_color};
use axabsent_core::{
    AbsoluteEntity, ApiClient, ClientConfig, ForceType, Interaction, InteractionPayload,
    SimulationKind, SimulationParameters, SimulationService,
};
use axabsent_env::SystemClock;
use clap::{Parser, Subcommand};
use export::DashboardExport;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// AxAbsEnt simulation dashboard
#[derive(Parser, Debug)]
#[command(name = "axabsent")]
#[command(about = "Command-line dashboard for the AxAbsEnt engine", long_about = None)]
struct Args {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON output on stdout
    #[arg(long, global = true)]
    json: bool,

    /// Backend base URL including the API prefix (overrides AXABSENT_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in milliseconds (overrides AXABSENT_TIMEOUT_MS)
    #[arg(long, global = true)]
    timeout_ms: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List absolute entities
    Entities,

    /// Create an absolute entity from a JSON file
    CreateEntity {
        /// Path to `{"id": ..., "signature": [[...]], "properties": {...}}`
        file: String,
    },

    /// Create an interaction between two entities
    Interact {
        source: String,
        target: String,
        operator: String,
    },

    /// Run a simulation over selected entities
    Simulate {
        /// Entity id (repeatable)
        #[arg(short, long = "entity", required = true)]
        entities: Vec<String>,

        /// Interaction id
        #[arg(short, long)]
        interaction: String,

        /// Export package and plot grids to a JSON file
        #[arg(long)]
        export: Option<String>,
    },

    /// Run a parameterised simulation (transfinite_chain, absolute_evolution, vacuum_fluctuation)
    Run {
        kind: String,

        #[arg(long, default_value = "100")]
        resolution: u64,

        #[arg(long, default_value = "300")]
        steps: u64,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// List stored simulation results
    Results,

    /// Fetch one stored simulation result
    #[command(name = "result")]
    ShowResult { filename: String },

    /// Fetch the vector field of a force (gravity, electromagnetic, strong, weak)
    Field { force: String },

    /// Fetch the interaction topology
    Topology,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Logs go to stderr so --json output stays parseable
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &args.api_url {
        config = config.with_base_url(url)?;
    }
    if let Some(ms) = &args.timeout_ms {
        config = config.with_timeout_ms(ms)?;
    }
    let client = Arc::new(ApiClient::from_config(&config)?);
    let json = args.json;

    match args.command {
        Command::Entities => {
            info!("{}", status_messages::FETCHING_DATA);
            let entities = client.get_absolute_entities().await?;
            if json {
                return print_json(&entities);
            }
            for entity in &entities {
                println!("{}  ({})", entity.label(), entity.id);
                if !entity.signature.is_empty() {
                    println!("{}", indent(&format_matrix(Some(entity.signature.as_slice()))));
                }
                for fields in [&entity.properties, &entity.extra] {
                    let tooltip = format_tooltip(Some(&Value::Object(fields.clone())));
                    if !tooltip.is_empty() {
                        println!("{}", indent(&tooltip));
                    }
                }
            }
            info!("{} entities", entities.len());
        }

        Command::CreateEntity { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file))?;
            let entity: AbsoluteEntity =
                serde_json::from_str(&text).with_context(|| format!("parsing {}", file))?;
            let created = client.create_absolute_entity(&entity).await?;
            if json {
                return print_json(&created);
            }
            println!("Created {}", entity.label());
        }

        Command::Interact { source, target, operator } => {
            let payload = InteractionPayload::new(source, target, operator);
            let created = client.create_interaction(&payload).await?;
            if json {
                return print_json(&created);
            }
            // The backend only echoes id and status
            let mut interaction = Interaction::from_backend(&created);
            interaction.source_id.get_or_insert(payload.source_id);
            interaction.target_id.get_or_insert(payload.target_id);
            interaction.operator_type.get_or_insert(payload.operator_type);
            let status = interaction.status.as_ref().map_or("unknown", |s| s.name());
            println!("{} ({})", format_interaction_label(&interaction), status);
        }

        Command::Simulate { entities, interaction, export } => {
            let service = SimulationService::new(Arc::clone(&client), SystemClock::shared());
            let package = service
                .execute_simulation(&entities, &interaction, |msg| info!("{}", msg))
                .await?;

            if let Some(path) = &export {
                info!("{}", status_messages::VISUALIZING_RESULTS);
                DashboardExport::new(&entities, &interaction, package.clone())
                    .write_to_file(path)
                    .with_context(|| format!("writing export to {}", path))?;
                info!("Exported run to {}", path);
            }

            if json {
                print_json(&package)?;
            } else {
                println!("Success:        {}", package.success);
                println!("Entropy:        {}", package.entropy);
                println!("Runtime:        {}", package.runtime);
                println!("Curvature flux: {} values", package.curvature_flux.len());
            }

            if !package.success {
                bail!(
                    "{}",
                    package
                        .error
                        .as_deref()
                        .unwrap_or("backend reported an unsuccessful run")
                );
            }
        }

        Command::Run { kind, resolution, steps, seed } => {
            let kind: SimulationKind = kind.parse().map_err(anyhow::Error::msg)?;
            let parameters = SimulationParameters { resolution, steps, seed };
            info!(
                "{} ({})",
                status_messages::SIMULATION_RUNNING,
                capitalize(&kind.name().replace('_', " "))
            );
            let response = client.run_parameterized_simulation(kind, &parameters).await?;
            print_json(response.raw())?;
        }

        Command::Results => {
            let files = client.list_simulation_results().await?;
            if json {
                return print_json(&files);
            }
            for file in &files {
                println!("{}", file);
            }
        }

        Command::ShowResult { filename } => {
            let plot = client.get_simulation_result(&filename).await?;
            if json {
                return print_json(&plot);
            }
            info!("{}", status_messages::VISUALIZING_RESULTS);
            println!("{}", plot.title.as_deref().unwrap_or(&filename));
            println!("{}×{} surface", plot.x.len(), plot.y.len());
            println!("{}", format_matrix(Some(plot.z.as_slice())));
        }

        Command::Field { force } => {
            let force: ForceType = force.parse().map_err(anyhow::Error::msg)?;
            let field = client.get_force_field(force).await?;
            if json {
                return print_json(&field);
            }
            let (rows, cols) = field.shape();
            println!(
                "{}: {}×{} grid, color {}",
                force.display_name(),
                rows,
                cols,
                get_force_color(force.name())
            );
        }

        Command::Topology => {
            info!("{}", status_messages::FETCHING_DATA);
            let topology = client.get_interaction_topology().await?;
            if json {
                return print_json(&topology);
            }
            for node in &topology.nodes {
                let label = node.label.clone().unwrap_or_else(|| format_absolute_label(&node.id));
                println!("{}  entropy {}", label, format_entropy(node.entropy));
            }
            for link in &topology.links {
                println!(
                    "{} → {}  {}",
                    link.source,
                    link.target,
                    link.label.as_deref().unwrap_or_default().to_uppercase()
                );
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}
