use std::net::SocketAddr;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::ConnectionOptions;

#[derive(Parser, Debug)]
#[command(version, about = "Restaurants, pizzas and the prices they are offered at")]
pub struct Cli {
    /// SQLite database file (or `:memory:`)
    #[arg(long, env = "DATABASE_URL", default_value = "app.db", global = true)]
    pub database_url: String,

    /// Maximum number of pooled database connections
    #[arg(long, env = "DATABASE_POOL_SIZE", default_value_t = 8, global = true)]
    pub pool_size: u32,

    /// How long a connection waits on a locked database; 0 disables waiting
    #[arg(long, env = "DATABASE_BUSY_TIMEOUT_MS", default_value_t = 5000, global = true)]
    pub busy_timeout_ms: u64,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn connection_options(&self) -> ConnectionOptions {
        let timeout =
            (self.busy_timeout_ms > 0).then(|| Duration::from_millis(self.busy_timeout_ms));
        ConnectionOptions::default().with_busy_timeout(timeout)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run pending migrations and serve the HTTP API
    Serve(ServeArgs),
    /// Run pending migrations and exit
    Migrate,
    /// Run pending migrations and replace all data with the sample data set
    Seed,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 5555)]
    pub port: u16,

    /// Origin allowed to make cross-origin requests
    #[arg(long, env = "CORS_ORIGIN", default_value = "http://localhost:3000")]
    pub cors_origin: String,
}

impl ServeArgs {
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}
