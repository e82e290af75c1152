use std::fmt;
use std::path::PathBuf;
use structopt::StructOpt;

pub const DEFAULT_DRIVER: &str = "ODBC Driver 17 for SQL Server";
pub const DEFAULT_OUTPUT: &str = "tabelas.csv";
pub const DEFAULT_SAMPLES_DIR: &str = "resultados_csv";
pub const DEFAULT_SAMPLE_ROWS: usize = 2;

/// Where and as whom to connect.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub driver: String,
    pub host: String,
    pub database: String,
    pub username: String,
    pub password: String,
    /// Extra connection string attributes appended after the standard ones.
    pub attributes: Vec<(String, String)>,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"***")
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl ConnectionConfig {
    pub fn new(host: impl Into<String>, database: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> ConnectionConfig {
        ConnectionConfig {
            driver: DEFAULT_DRIVER.to_owned(),
            host: host.into(),
            database: database.into(),
            username: username.into(),
            password: password.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_driver(mut self, driver: impl Into<String>) -> ConnectionConfig {
        self.driver = driver.into();
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> ConnectionConfig {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Builds the `DRIVER={..};SERVER=..;DATABASE=..;UID=..;PWD=..;` connection string.
    ///
    /// Values that would otherwise break the key=value syntax are brace quoted.
    pub fn connection_string(&self) -> ConnectionString {
        let mut text = String::new();
        let mut redacted = String::new();

        let driver = format!("{{{}}}", self.driver.replace('}', "}}"));
        let standard = [
            ("DRIVER", driver),
            ("SERVER", escape_value(&self.host)),
            ("DATABASE", escape_value(&self.database)),
            ("UID", escape_value(&self.username)),
        ];
        for (key, value) in standard.iter() {
            push_attribute(&mut text, key, value);
            push_attribute(&mut redacted, key, value);
        }

        push_attribute(&mut text, "PWD", &escape_value(&self.password));
        push_attribute(&mut redacted, "PWD", "***");

        for (key, value) in &self.attributes {
            let value = escape_value(value);
            push_attribute(&mut text, key, &value);
            push_attribute(&mut redacted, key, &value);
        }

        ConnectionString {
            text,
            redacted,
            driver: self.driver.clone(),
        }
    }
}

fn push_attribute(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push('=');
    out.push_str(value);
    out.push(';');
}

/// Brace quotes value if it contains `;`, braces or surrounding whitespace.
pub fn escape_value(value: &str) -> String {
    let needs_quoting = value.contains(|c: char| c == ';' || c == '{' || c == '}')
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace);

    if needs_quoting {
        format!("{{{}}}", value.replace('}', "}}"))
    } else {
        value.to_owned()
    }
}

/// Connection string ready to be handed to the driver manager.
///
/// `Display` and `Debug` show the password as `***`; use `as_str` to get the real text.
#[derive(Clone)]
pub struct ConnectionString {
    text: String,
    redacted: String,
    driver: String,
}

impl ConnectionString {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Name of the ODBC driver this string selects.
    pub fn driver(&self) -> &str {
        &self.driver
    }
}

impl fmt::Display for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted)
    }
}

impl fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConnectionString").field(&self.redacted).finish()
    }
}

/// Everything an export run needs.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub connection: ConnectionConfig,
    pub output: PathBuf,
}

impl ExportConfig {
    pub fn new(connection: ConnectionConfig) -> ExportConfig {
        ExportConfig {
            connection,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> ExportConfig {
        self.output = output.into();
        self
    }
}

/// Sample rows export settings.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub connection: ConnectionConfig,
    /// Table list as written by the table export.
    pub tables: PathBuf,
    pub output_dir: PathBuf,
    /// Maximum number of rows taken from each table.
    pub rows: usize,
}

impl SampleConfig {
    pub fn new(connection: ConnectionConfig) -> SampleConfig {
        SampleConfig {
            connection,
            tables: PathBuf::from(DEFAULT_OUTPUT),
            output_dir: PathBuf::from(DEFAULT_SAMPLES_DIR),
            rows: DEFAULT_SAMPLE_ROWS,
        }
    }

    pub fn with_tables(mut self, tables: impl Into<PathBuf>) -> SampleConfig {
        self.tables = tables.into();
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> SampleConfig {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_rows(mut self, rows: usize) -> SampleConfig {
        self.rows = rows;
        self
    }
}

fn parse_attribute(s: &str) -> Result<(String, String), String> {
    let pos = s.find('=').ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{}`", s))?;
    let (key, value) = (s[..pos].trim(), &s[pos + 1..]);

    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in `{}`", s));
    }
    if key.contains(|c: char| c == ';' || c == '{' || c == '}') {
        return Err(format!("invalid attribute key `{}`: must not contain `;`, `{{` or `}}`", key));
    }

    Ok((key.to_owned(), value.to_owned()))
}

/// Database connection options
#[derive(Debug, StructOpt)]
pub struct ConnectionOpt {
    /// ODBC driver name
    #[structopt(long = "driver", env = "ODBC_DRIVER", default_value = DEFAULT_DRIVER)]
    pub driver: String,

    /// Database server host (optionally `host,port` or `host\instance`)
    #[structopt(long = "host", env = "MSSQL_HOST", default_value = "localhost")]
    pub host: String,

    /// Database name
    #[structopt(long = "database", env = "MSSQL_DATABASE")]
    pub database: String,

    /// Login name
    #[structopt(long = "user", env = "MSSQL_USER")]
    pub username: String,

    /// Login password
    #[structopt(long = "password", env = "MSSQL_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Extra connection string attribute, e.g. TrustServerCertificate=yes
    #[structopt(long = "attribute", number_of_values = 1, parse(try_from_str = parse_attribute))]
    pub attributes: Vec<(String, String)>,
}

impl From<ConnectionOpt> for ConnectionConfig {
    fn from(opt: ConnectionOpt) -> ConnectionConfig {
        ConnectionConfig {
            driver: opt.driver,
            host: opt.host,
            database: opt.database,
            username: opt.username,
            password: opt.password,
            attributes: opt.attributes,
        }
    }
}

/// Table export options
#[derive(Debug, StructOpt)]
pub struct ExportOpt {
    #[structopt(flatten)]
    pub connection: ConnectionOpt,

    /// Output CSV file
    #[structopt(long = "output", short = "o", default_value = DEFAULT_OUTPUT, parse(from_os_str))]
    pub output: PathBuf,
}

impl From<ExportOpt> for ExportConfig {
    fn from(opt: ExportOpt) -> ExportConfig {
        ExportConfig::new(opt.connection.into()).with_output(opt.output)
    }
}

/// Sample rows export options
#[derive(Debug, StructOpt)]
pub struct SampleOpt {
    #[structopt(flatten)]
    pub connection: ConnectionOpt,

    /// CSV file listing table names, one per line
    #[structopt(long = "tables", short = "t", default_value = DEFAULT_OUTPUT, parse(from_os_str))]
    pub tables: PathBuf,

    /// Directory to write `tabela_<name>.csv` files to
    #[structopt(long = "output-dir", short = "o", default_value = DEFAULT_SAMPLES_DIR, parse(from_os_str))]
    pub output_dir: PathBuf,

    /// Maximum number of rows to take from each table
    #[structopt(long = "rows", short = "n", default_value = "2")]
    pub rows: usize,
}

impl From<SampleOpt> for SampleConfig {
    fn from(opt: SampleOpt) -> SampleConfig {
        SampleConfig::new(opt.connection.into())
            .with_tables(opt.tables)
            .with_output_dir(opt.output_dir)
            .with_rows(opt.rows)
    }
}
