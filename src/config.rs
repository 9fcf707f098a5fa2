//! Connection settings from flags, DSN strings and MySQL option files.
//!
//! Precedence, highest first: explicit flags, the `--dsn` string, the option
//! file (`--config-file`, the DSN's `F` key or `~/.my.cnf`), built-in
//! defaults. A password from `MYSQL_PWD` is used only when none of those
//! sets one.

use anyhow::{bail, Context};
use load_populate_mysql::{
    CommonPopulateArgs, ConnectionConfig, MySQLPopulateArgs, PopulateOptions,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Option file read when none is given.
pub const DEFAULT_OPTION_FILE: &str = "~/.my.cnf";

/// Environment variable holding a fallback password.
pub const PASSWORD_ENV: &str = "MYSQL_PWD";

/// Section of the option file holding client settings.
const CLIENT_SECTION: &str = "client";

/// Settings from a Percona-toolkit style DSN such as
/// `h=127.0.0.1,P=3306,u=root,p=secret,D=shop,t=orders,F=/etc/my.cnf`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dsn {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub socket: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    pub table: Option<String>,
    pub config_file: Option<PathBuf>,
}

impl Dsn {
    pub fn parse(value: &str) -> anyhow::Result<Self> {
        let mut dsn = Dsn::default();

        for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            let value = value.to_string();
            match key {
                "h" => dsn.host = Some(value),
                "P" => {
                    dsn.port = Some(
                        value
                            .parse()
                            .with_context(|| format!("Invalid port in DSN: '{value}'"))?,
                    )
                }
                "S" => dsn.socket = Some(value),
                "u" => dsn.user = Some(value),
                "p" => dsn.password = Some(value),
                "D" => dsn.database = Some(value),
                "t" => dsn.table = Some(value),
                "F" => dsn.config_file = Some(PathBuf::from(value)),
                other => debug!("Ignoring unknown DSN key '{other}'"),
            }
        }

        Ok(dsn)
    }
}

/// `[client]` settings of a MySQL option file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionFile {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub socket: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl OptionFile {
    /// Parse the `[client]` section; other sections are ignored.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let mut options = OptionFile::default();
        let mut in_client = false;

        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                in_client = section.trim().eq_ignore_ascii_case(CLIENT_SECTION);
                continue;
            }
            if !in_client {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = unquote(value.trim()).to_string();
            match key.trim().replace('-', "_").as_str() {
                "host" => options.host = Some(value),
                "port" => {
                    options.port = Some(
                        value
                            .parse()
                            .with_context(|| format!("Invalid port in option file: '{value}'"))?,
                    )
                }
                "socket" => options.socket = Some(value),
                "user" => options.user = Some(value),
                "password" => options.password = Some(value),
                _ => {}
            }
        }

        Ok(options)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read option file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid option file {}", path.display()))
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

/// Where rows go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub connection: ConnectionConfig,
    pub database: String,
    pub table: String,
}

/// Combine flags, DSN and option file into the connection target.
pub fn resolve_target(args: &MySQLPopulateArgs) -> anyhow::Result<Target> {
    let dsn = match &args.dsn {
        Some(value) => Dsn::parse(value)?,
        None => Dsn::default(),
    };

    let option_file = match args.config_file.as_ref().or(dsn.config_file.as_ref()) {
        Some(path) => OptionFile::load(&expand_home(path))?,
        None => {
            let path = expand_home(Path::new(DEFAULT_OPTION_FILE));
            if path.is_file() {
                OptionFile::load(&path)?
            } else {
                OptionFile::default()
            }
        }
    };

    resolve(args, dsn, option_file, std::env::var(PASSWORD_ENV).ok())
}

/// Apply precedence over already loaded sources. `env_password` is the
/// value of `MYSQL_PWD`, the last resort for the password.
pub fn resolve(
    args: &MySQLPopulateArgs,
    dsn: Dsn,
    option_file: OptionFile,
    env_password: Option<String>,
) -> anyhow::Result<Target> {
    let database = args.database.clone().or(dsn.database);
    let table = args.table.clone().or(dsn.table);

    let Some(database) = database.filter(|d| !d.is_empty()) else {
        bail!("You need to specify a database (--database or D= in --dsn)");
    };
    let Some(table) = table.filter(|t| !t.is_empty()) else {
        bail!("You need to specify a table (--table or t= in --dsn)");
    };

    let defaults = ConnectionConfig::default();
    let connection = ConnectionConfig {
        host: args
            .host
            .clone()
            .or(dsn.host)
            .or(option_file.host)
            .filter(|h| !h.is_empty())
            .unwrap_or(defaults.host),
        port: args
            .port
            .or(dsn.port)
            .or(option_file.port)
            .filter(|p| *p != 0)
            .unwrap_or(defaults.port),
        socket: args
            .socket
            .clone()
            .or(dsn.socket)
            .or(option_file.socket)
            .filter(|s| !s.is_empty()),
        user: args.user.clone().or(dsn.user).or(option_file.user),
        password: args
            .password
            .clone()
            .or(dsn.password)
            .or(option_file.password)
            .or(env_password),
        database: Some(database.clone()),
    };

    Ok(Target {
        connection,
        database,
        table,
    })
}

/// Load options from the common flags; a missing seed is drawn at random.
pub fn populate_options(common: &CommonPopulateArgs) -> PopulateOptions {
    PopulateOptions {
        rows: common.rows,
        bulk_size: common.bulk_size,
        concurrency: common.concurrency(),
        max_retries: common.max_retries,
        seed: common.seed.unwrap_or_else(rand::random),
        sample_size: common.sample_size,
        null_percent: common.null_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        args: MySQLPopulateArgs,
    }

    fn args(extra: &[&str]) -> MySQLPopulateArgs {
        let mut argv = vec!["test", "--rows", "10"];
        argv.extend_from_slice(extra);
        TestCli::try_parse_from(argv).unwrap().args
    }

    #[test]
    fn test_parse_dsn() {
        let dsn = Dsn::parse(
            "h=db.internal,P=3307,S=/run/my.sock,u=root,p=secret,D=shop,t=orders,F=/tmp/my.cnf",
        )
        .unwrap();
        assert_eq!(dsn.host.as_deref(), Some("db.internal"));
        assert_eq!(dsn.port, Some(3307));
        assert_eq!(dsn.socket.as_deref(), Some("/run/my.sock"));
        assert_eq!(dsn.user.as_deref(), Some("root"));
        assert_eq!(dsn.password.as_deref(), Some("secret"));
        assert_eq!(dsn.database.as_deref(), Some("shop"));
        assert_eq!(dsn.table.as_deref(), Some("orders"));
        assert_eq!(dsn.config_file, Some(PathBuf::from("/tmp/my.cnf")));
    }

    #[test]
    fn test_parse_dsn_invalid_port() {
        assert!(Dsn::parse("h=db,P=abc").is_err());
    }

    #[test]
    fn test_parse_dsn_ignores_unknown_keys() {
        let dsn = Dsn::parse("A=utf8,h=db").unwrap();
        assert_eq!(dsn.host.as_deref(), Some("db"));
    }

    #[test]
    fn test_parse_option_file() {
        let content = r#"
# local settings
[mysqld]
port = 9999

[client]
host = 10.0.0.5
port=3310
socket = /var/run/mysqld/mysqld.sock
user = "loader"
password = 'p#ss'
default-character-set = utf8mb4
"#;
        let options = OptionFile::parse(content).unwrap();
        assert_eq!(options.host.as_deref(), Some("10.0.0.5"));
        assert_eq!(options.port, Some(3310));
        assert_eq!(
            options.socket.as_deref(),
            Some("/var/run/mysqld/mysqld.sock")
        );
        assert_eq!(options.user.as_deref(), Some("loader"));
        assert_eq!(options.password.as_deref(), Some("p#ss"));
    }

    #[test]
    fn test_precedence() {
        let dsn = Dsn::parse("h=dsn-host,P=3400,u=dsn-user,D=dsn-db,t=dsn-table").unwrap();
        let option_file = OptionFile {
            host: Some("file-host".to_string()),
            port: Some(3500),
            user: Some("file-user".to_string()),
            password: Some("file-pass".to_string()),
            ..Default::default()
        };

        let target = resolve(
            &args(&["-u", "flag-user", "-t", "flag-table"]),
            dsn,
            option_file,
            Some("env-pass".to_string()),
        )
        .unwrap();

        assert_eq!(target.connection.host, "dsn-host");
        assert_eq!(target.connection.port, 3400);
        assert_eq!(target.connection.user.as_deref(), Some("flag-user"));
        assert_eq!(target.connection.password.as_deref(), Some("file-pass"));
        assert_eq!(target.database, "dsn-db");
        assert_eq!(target.table, "flag-table");
        assert_eq!(target.connection.database.as_deref(), Some("dsn-db"));
    }

    #[test]
    fn test_defaults() {
        let target = resolve(
            &args(&["-d", "shop", "-t", "orders", "-p", "x"]),
            Dsn::default(),
            OptionFile::default(),
            None,
        )
        .unwrap();
        assert_eq!(target.connection.host, "localhost");
        assert_eq!(target.connection.port, 3306);
        assert_eq!(target.connection.socket, None);
    }

    #[test]
    fn test_password_env_is_last_resort() {
        let dsn = Dsn::parse("p=dsn-pass,D=shop,t=orders").unwrap();
        let target = resolve(
            &args(&[]),
            dsn,
            OptionFile::default(),
            Some("env-pass".to_string()),
        )
        .unwrap();
        assert_eq!(target.connection.password.as_deref(), Some("dsn-pass"));

        let target = resolve(
            &args(&["-d", "shop", "-t", "orders"]),
            Dsn::default(),
            OptionFile::default(),
            Some("env-pass".to_string()),
        )
        .unwrap();
        assert_eq!(target.connection.password.as_deref(), Some("env-pass"));
    }

    #[test]
    fn test_socket_precedence() {
        let option_file = OptionFile {
            socket: Some("/file.sock".to_string()),
            ..Default::default()
        };
        let dsn = Dsn::parse("S=/dsn.sock,D=shop,t=orders").unwrap();
        let target = resolve(&args(&[]), dsn, option_file.clone(), None).unwrap();
        assert_eq!(target.connection.socket.as_deref(), Some("/dsn.sock"));

        let target = resolve(
            &args(&["-S", "/flag.sock", "-d", "shop", "-t", "orders"]),
            Dsn::default(),
            option_file,
            None,
        )
        .unwrap();
        assert_eq!(target.connection.socket.as_deref(), Some("/flag.sock"));
    }

    #[test]
    fn test_missing_database_or_table() {
        let err = resolve(
            &args(&["-t", "orders"]),
            Dsn::default(),
            OptionFile::default(),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("database"));

        let err = resolve(
            &args(&["-d", "shop"]),
            Dsn::default(),
            OptionFile::default(),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("table"));
    }

    #[test]
    fn test_load_option_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my.cnf");
        fs::write(&path, "[client]\nuser=from_file\n").unwrap();

        let options = OptionFile::load(&path).unwrap();
        assert_eq!(options.user.as_deref(), Some("from_file"));
        assert!(OptionFile::load(&dir.path().join("missing.cnf")).is_err());
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home(Path::new("/etc/my.cnf")), PathBuf::from("/etc/my.cnf"));
        if let Some(home) = std::env::var_os("HOME") {
            assert_eq!(
                expand_home(Path::new("~/.my.cnf")),
                PathBuf::from(home).join(".my.cnf")
            );
        }
    }

    #[test]
    fn test_populate_options() {
        let options = populate_options(&args(&["--seed", "7", "--bulk-size", "50"]).common);
        assert_eq!(options.rows, 10);
        assert_eq!(options.seed, 7);
        assert_eq!(options.bulk_size, 50);
    }
}
