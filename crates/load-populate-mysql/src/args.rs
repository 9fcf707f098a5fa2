//! CLI argument definitions for the MySQL populator.

use clap::Args;
use std::path::PathBuf;

// Re-export CommonPopulateArgs for convenience
pub use load_populate::CommonPopulateArgs;

/// MySQL-specific populate arguments.
///
/// Every connection setting can also come from `--dsn` or from a MySQL
/// option file; flags given here take precedence over both.
#[derive(Args, Clone, Debug)]
pub struct MySQLPopulateArgs {
    /// Connection settings as a DSN (e.g. h=127.0.0.1,P=3306,u=root,p=secret,D=shop,t=orders)
    #[arg(long)]
    pub dsn: Option<String>,

    /// Database of the target table
    #[arg(long, short = 'd')]
    pub database: Option<String>,

    /// Target table
    #[arg(long, short = 't')]
    pub table: Option<String>,

    /// Server host (`localhost` connects through the Unix socket)
    #[arg(long, short = 'H')]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'P')]
    pub port: Option<u16>,

    /// Unix socket used when the host is `localhost`
    #[arg(long, short = 'S')]
    pub socket: Option<String>,

    /// User name
    #[arg(long, short = 'u')]
    pub user: Option<String>,

    /// Password (falls back to `MYSQL_PWD` when no other source sets one)
    #[arg(long, short = 'p')]
    pub password: Option<String>,

    /// MySQL option file to read [client] settings from (default: ~/.my.cnf)
    #[arg(long)]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonPopulateArgs,
}
