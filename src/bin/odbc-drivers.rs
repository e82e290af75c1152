use cotton::prelude::*;
use odbc_iter::Odbc;

/// List installed ODBC drivers
#[derive(Debug, StructOpt)]
struct Cli {
    #[structopt(flatten)]
    logging: LoggingOpt,

    /// Also print driver attributes
    #[structopt(long = "attributes")]
    attributes: bool,
}

fn main() -> Result<(), Problem> {
    let args = Cli::from_args();
    init_logger(&args.logging, vec![module_path!(), "odbc_iter"]);

    let mut drivers = Odbc::list_drivers().or_failed_to("list drivers");
    drivers.sort_by(|a, b| a.description.cmp(&b.description));

    for driver in drivers {
        println!("{}", driver.description);
        if args.attributes {
            let mut attributes = driver.attributes.into_iter().collect::<Vec<_>>();
            attributes.sort();
            for (key, value) in attributes {
                println!("\t{}={}", key, value);
            }
        }
    }
    Ok(())
}
