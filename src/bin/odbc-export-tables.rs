use cotton::prelude::*;
use odbc_tables::{export_tables, ExportConfig, ExportOpt, OdbcDriver};

/// Export names of all base tables of a database to a CSV file
#[derive(Debug, StructOpt)]
struct Cli {
    #[structopt(flatten)]
    logging: LoggingOpt,

    #[structopt(flatten)]
    export: ExportOpt,
}

fn main() {
    let args = Cli::from_args();
    init_logger(&args.logging, vec![module_path!(), "odbc_tables", "odbc_iter"]);

    match export_tables(&OdbcDriver, &ExportConfig::from(args.export)) {
        Ok(report) => println!("✅ {} tabelas salvas em '{}'.", report.tables, report.path.display()),
        Err(err) => {
            error!("Export failed: {:?}", err);
            eprintln!("{}", err);
            std::process::exit(err.exit_code());
        }
    }
}
