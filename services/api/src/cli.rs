use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use polls::config::ServerConfig;
use polls::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "polls-api",
    about = "Serve the polls API or walk through a voting session from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the poll endpoints over HTTP; used when no command is given
    Serve(ServeArgs),
    /// Run a voting session against an in-memory store and print the results
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Bind address, taking precedence over APP_HOST
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Listen port, taking precedence over APP_PORT
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

impl ServeArgs {
    pub(crate) fn apply(self, server: &mut ServerConfig) {
        if let Some(host) = self.host {
            server.host = host;
        }
        if let Some(port) = self.port {
            server.port = port;
        }
    }
}

pub(crate) async fn run() -> Result<(), AppError> {
    match Cli::parse().command.unwrap_or_default() {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
    }
}

impl Default for Command {
    fn default() -> Self {
        Command::Serve(ServeArgs::default())
    }
}
