use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use skycast_core::config::Config;
use skycast_core::controller::ScreenController;
use skycast_core::fetcher::WeatherFetcher;
use skycast_core::location::LocationResolver;
use skycast_core::location::system::SystemLocationService;
use skycast_core::transport::{TransportId, transport_for};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Current conditions in the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct ScreenArgs {
    /// Weather transport, "client" or "raw"; overrides the configured default.
    #[arg(long)]
    pub transport: Option<String>,

    /// Skip the position lookup, as if location permission were denied.
    #[arg(long)]
    pub no_location: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch once and print the screen.
    Show {
        #[command(flatten)]
        args: ScreenArgs,
    },

    /// Keep the screen mounted; refresh with `r`, quit with `q`.
    Watch {
        #[command(flatten)]
        args: ScreenArgs,
    },

    /// Set the default weather transport.
    Configure {
        /// Transport short name, e.g. "client" or "raw".
        transport: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { args } => {
                let mut controller = build_controller(&args)?;
                controller.mount().await;
                print!("{}", render::screen_text(controller.state(), controller.phase()));
                Ok(())
            }
            Command::Watch { args } => watch(build_controller(&args)?).await,
            Command::Configure { transport } => {
                let id = TransportId::try_from(transport.as_str())?;
                let mut config = Config::load()?;
                config.set_default_transport(id);
                config.save()?;
                println!("Default transport set to {id}");
                Ok(())
            }
        }
    }
}

fn build_controller(args: &ScreenArgs) -> anyhow::Result<ScreenController> {
    let config = Config::load()?;

    let id = match &args.transport {
        Some(name) => TransportId::try_from(name.as_str())?,
        None => config.default_transport_id()?.unwrap_or(TransportId::Client),
    };
    let transport = transport_for(id).context("failed to build weather transport")?;

    let service = SystemLocationService::new(config.location_enabled && !args.no_location)
        .context("failed to build location service")?;
    let resolver = LocationResolver::new(Arc::new(service), config.default_place.clone());

    Ok(ScreenController::new(
        resolver,
        WeatherFetcher::new(transport),
        config.default_coordinates(),
    ))
}

async fn watch(mut controller: ScreenController) -> anyhow::Result<()> {
    controller.mount().await;
    print!("{}", render::screen_text(controller.state(), controller.phase()));
    println!("\n[r] refresh   [q] quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "q" => break,
            "r" | "" => {
                controller.dismiss_alert();
                controller.absorb_pending_location().await;
                controller.refresh().await;
                print!("{}", render::screen_text(controller.state(), controller.phase()));
                println!("\n[r] refresh   [q] quit");
            }
            other => println!("Unknown input '{other}'; use r or q."),
        }
    }

    controller.unmount();
    Ok(())
}
