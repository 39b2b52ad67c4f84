use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io;
use std::path::PathBuf;

use ios_location_simulator::parser::coordinates::Coordinates;
use ios_location_simulator::runner::{menu, Console, Menu, ProcessRunner, Workflow};
use ios_location_simulator::{commands, Config, UsbmuxBackend};

#[derive(Parser)]
#[command(name = "ios-location-simulator")]
#[command(version)]
#[command(about = "Simulate or reset GPS location on connected iOS devices", long_about = None)]
struct Cli {
    /// Path to a YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Root directory of the Developer Disk Images (<root>/<major>.<minor>/)
    #[arg(long, global = true)]
    images_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,

    /// Without a subcommand the interactive menu starts
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List connected devices and their iOS versions
    Devices {
        /// Print as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Mount the disk image if needed and set a simulated location
    Set {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Device UDID (required when several devices are connected)
        #[arg(short, long)]
        udid: Option<String>,
    },

    /// Stop simulating and return to the real location
    Reset {
        /// Device UDID (required when several devices are connected)
        #[arg(short, long)]
        udid: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.images_dir {
        config.disk_image_root = dir;
    }
    log::debug!("Using config: {:?}", config);

    let backend = UsbmuxBackend::new(&config.connection_label);
    let runner = ProcessRunner::new(config.tool_timeout());
    let workflow = Workflow::new(backend, runner, config);
    let mut stdout = io::stdout();

    match cli.command {
        None => {
            ctrlc::set_handler(|| {
                println!("\n{}", menu::GOODBYE);
                std::process::exit(130);
            })?;

            let clear_screen = workflow.config.clear_screen;
            let console = Console::new(io::stdin().lock(), io::stdout(), clear_screen);
            let mut interactive = Menu::new(workflow, console);
            interactive.run().await?;
        }

        Some(Commands::Devices { json }) => {
            commands::list_devices(&workflow, json, &mut stdout).await?;
        }

        Some(Commands::Set { lat, lon, udid }) => {
            if !lat.is_finite() || !lon.is_finite() {
                anyhow::bail!("Coordinates must be finite numbers");
            }
            let ok = commands::set_location(
                &workflow,
                udid.as_deref(),
                Coordinates::new(lat, lon),
                &mut stdout,
            )
            .await?;
            if !ok {
                eprintln!("{} Location tool reported a failure", "✗".red());
            }
        }

        Some(Commands::Reset { udid }) => {
            let ok = commands::reset_location(&workflow, udid.as_deref(), &mut stdout).await?;
            if !ok {
                eprintln!("{} Location tool reported a failure", "✗".red());
            }
        }
    }

    Ok(())
}
