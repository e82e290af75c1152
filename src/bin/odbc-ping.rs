use cotton::prelude::*;
use odbc_tables::{ping, ConnectionConfig, ConnectionOpt, OdbcDriver};

/// Check that a database accepts a connection with given options
#[derive(Debug, StructOpt)]
struct Cli {
    #[structopt(flatten)]
    logging: LoggingOpt,

    #[structopt(flatten)]
    connection: ConnectionOpt,
}

fn main() {
    let args = Cli::from_args();
    init_logger(&args.logging, vec![module_path!(), "odbc_tables", "odbc_iter"]);

    match ping(&OdbcDriver, &ConnectionConfig::from(args.connection)) {
        Ok(()) => println!("Conexão com o banco de dados realizada com sucesso!"),
        Err(err) => {
            error!("Ping failed: {:?}", err);
            eprintln!("{}", err);
            std::process::exit(err.exit_code());
        }
    }
}
