use clap::{Parser, Subcommand};
use casmgmt_core::{RegisteredService, ServiceId, ServicesManager};
use casmgmt_db::{fixtures, DbRegistry};

#[derive(Parser)]
#[command(name = "casmgmt")]
#[command(about = "Registered services administrative CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL", default_value = "casmgmt.db")]
    db: String,

    /// URL of the management application; its own service cannot be deleted
    #[arg(
        long,
        env = "DEFAULT_SERVICE_URL",
        default_value = "https://localhost:8443/cas-management/manage.html"
    )]
    default_service_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Registered service management
    Service {
        #[command(subcommand)]
        sub: ServiceCommands,
    },
    /// Show registry status overview
    Status {
        /// Report which service a URL resolves to
        #[arg(long)]
        url: Option<String>,
    },
}

#[derive(Subcommand)]
enum ServiceCommands {
    /// Register a new service
    Add {
        #[arg(long)]
        name: String,
        /// Ant-style pattern, or a regular expression starting with `^`
        #[arg(long)]
        pattern: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        order: i32,
    },
    /// List all registered services in evaluation order
    List,
    /// Delete a service by id
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Change the evaluation order of a service
    Reorder {
        #[arg(long)]
        id: String,
        #[arg(long, allow_hyphen_values = true)]
        order: i32,
    },
    /// Load services from a JSON file
    Import {
        #[arg(long)]
        file: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let db = DbRegistry::new(&cli.db)?;
    let registry: &dyn ServicesManager = &db;

    match cli.command {
        Commands::Service { sub } => match sub {
            ServiceCommands::Add { name, pattern, description, order } => {
                let service = RegisteredService::new(name, pattern)
                    .with_description(description)
                    .with_evaluation_order(order);
                let saved = registry.save(service)?;
                println!("Service registered with id {}", saved.id);
            }
            ServiceCommands::List => {
                let services = registry.all_services()?;
                println!("Registered Services:");
                println!("{:<8} {:<8} {:<30} {:<40}", "Id", "Order", "Name", "Pattern");
                println!("{}", "-".repeat(86));
                for svc in services {
                    println!("{:<8} {:<8} {:<30} {:<40}", svc.id, svc.evaluation_order, svc.name, svc.service_id);
                }
            }
            ServiceCommands::Delete { id } => {
                let id: ServiceId = id.parse()?;
                let removed = registry.delete_unprotected(id.get(), &cli.default_service_url)?;
                println!("Service deleted: {} ({})", removed.name, removed.id);
            }
            ServiceCommands::Reorder { id, order } => {
                let id: ServiceId = id.parse()?;
                let mut service = registry.find_by_id(id.get())?;
                service.evaluation_order = order;
                let saved = registry.save(service)?;
                println!("Service {} now evaluated at order {}", saved.id, saved.evaluation_order);
            }
            ServiceCommands::Import { file } => {
                let count = fixtures::seed_from_file(registry, &file)?;
                println!("Imported {} services from {}", count, file);
            }
        },
        Commands::Status { url } => {
            let services = registry.all_services()?;

            println!("Registered Services Status Overview");
            println!("{}", "=".repeat(35));
            println!("Total Services:  {}", services.len());
            if let Some(first) = services.first() {
                println!("First Evaluated: {} ({})", first.name, first.id);
            }

            if let Some(url) = url {
                match registry.find_by_url(&url)? {
                    Some(svc) => println!("{} -> {} ({})", url, svc.name, svc.id),
                    None => println!("{} -> no matching service", url),
                }
            }
        }
    }

    Ok(())
}
