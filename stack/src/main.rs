use clap::{Parser, Subcommand, ValueEnum};
use model::prelude::*;
use stack::{locate_stack_file, Stack};
use stack_config::{ConfigKey, ConfigResolver, EnvSnapshot, StackFile};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "notejam-stack")]
#[command(about = "Declares the notejam Google Cloud stack as a resource graph")]
struct Cli {
    /// Stack (deployment stage) to operate on
    #[arg(short, long, global = true)]
    stack: Option<String>,
    /// Stack configuration file (default: Notejam.<stack>.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resource graph without applying it
    Preview {
        /// Output format
        #[arg(short, long, value_enum, default_value = "summary")]
        format: OutputFormat,
    },
    /// Plan the apply order with the dry-run engine
    Plan,
    /// Show resolved configuration and derived names (secrets redacted)
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable resource list
    Summary,
    /// Manifest for the apply engine
    Json,
    /// Graphviz DOT
    Dot,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{}", e);
        return Err(e);
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let env = EnvSnapshot::capture();
    let path = locate_stack_file(cli.config.as_deref(), &env, cli.stack.as_deref())?;
    let source = StackFile::load(&path)?;
    info!(path = %path.display(), "using stack configuration");

    match cli.command {
        Commands::Preview { format } => {
            let stack = Stack::resolve(&env, &source, cli.stack.as_deref())?;
            let graph = stack.build_graph()?;
            match format {
                OutputFormat::Summary => print_summary(&stack, &graph)?,
                OutputFormat::Json => println!("{}", stack.manifest(&graph)?.to_json_pretty()?),
                OutputFormat::Dot => println!("{}", graph.to_dot()),
            }
        }
        Commands::Plan => {
            let stack = Stack::resolve(&env, &source, cli.stack.as_deref())?;
            let plan = stack.plan(&DryRunEngine::new())?;
            print_plan(&plan);
        }
        Commands::Config => {
            let stack = Stack::resolve(&env, &source, cli.stack.as_deref())?;
            print_config(&env, &source, &stack)?;
        }
    }

    Ok(())
}

fn print_summary(stack: &Stack, graph: &ResourceGraph) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "Stack '{}' ({} resources, {} dependencies)",
        stack.names.stage_name,
        graph.len(),
        graph.edge_count()
    );
    for resource in graph.apply_order()? {
        println!("  + {}", resource);
        for (upstream, attribute) in graph.dependencies_of(&resource.id())? {
            println!("      <- {}.{}", upstream, attribute);
        }
    }

    println!("\nResources by kind:");
    for (kind, count) in graph.count_by_kind() {
        println!("  {:<20} {}", kind.to_string(), count);
    }
    Ok(())
}

fn print_plan(plan: &ApplyPlan) {
    println!(
        "Plan from '{}' engine: {} steps in {} waves",
        plan.engine,
        plan.steps.len(),
        plan.wave_count()
    );
    let mut current = None;
    for step in &plan.steps {
        if current != Some(step.wave) {
            println!("\nWave {}:", step.wave);
            current = Some(step.wave);
        }
        if step.depends_on.is_empty() {
            println!("  {}", step.resource);
        } else {
            let deps: Vec<String> = step.depends_on.iter().map(|d| d.to_string()).collect();
            println!("  {} (after {})", step.resource, deps.join(", "));
        }
    }
}

fn print_config(
    env: &EnvSnapshot,
    source: &StackFile,
    stack: &Stack,
) -> Result<(), Box<dyn std::error::Error>> {
    let resolver = ConfigResolver::new(env, source);
    println!("Configuration ({}):", source.path().display());
    for key in ConfigKey::ALL {
        let (value, origin) = resolver.resolve_key(key)?;
        let shown = if key.is_secret() {
            "[secret]".to_string()
        } else {
            value
        };
        println!("  {:<16} {:<32} ({})", key.config_key(), shown, origin);
    }

    println!("\nDerived names:");
    println!("  {:<16} {}", "stage", stack.names.stage_name);
    println!("  {:<16} {}", "app", stack.names.app_name);
    println!("  {:<16} {}", "image", stack.names.image_name);

    println!("\nDatabase settings:");
    println!("  {:<16} {}", "tier", stack.database.tier);
    println!(
        "  {:<16} {}",
        "availability", stack.database.availability_type
    );
    println!(
        "  {:<16} {}",
        "backups", stack.database.backup_configuration.enabled
    );
    Ok(())
}
