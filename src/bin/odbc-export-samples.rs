use cotton::prelude::*;
use odbc_tables::{export_samples, OdbcDriver, SampleConfig, SampleOpt, SampleOutcome};

/// Export first rows of every table listed in a CSV file, one CSV file per table
#[derive(Debug, StructOpt)]
struct Cli {
    #[structopt(flatten)]
    logging: LoggingOpt,

    #[structopt(flatten)]
    samples: SampleOpt,
}

fn main() {
    let args = Cli::from_args();
    init_logger(&args.logging, vec![module_path!(), "odbc_tables", "odbc_iter"]);

    let result = export_samples(&OdbcDriver, &SampleConfig::from(args.samples), |sample| match &sample.outcome {
        Ok(SampleOutcome::Written { path, rows }) => {
            println!("\n📌 Tabela: {} — {} linhas encontradas", sample.table, rows);
            println!("✅ Resultado salvo em: {}", path.display());
        }
        Ok(SampleOutcome::Empty) => {
            println!("\n📌 Tabela: {} — 0 linhas encontradas", sample.table);
            println!("⚠️ Nenhum dado encontrado. Pulando...");
        }
        Err(err) => eprintln!("❌ Erro ao processar a tabela '{}': {}", sample.table, err),
    });

    match result {
        Ok(summary) => info!("Done: {:?}", summary),
        Err(err) => {
            error!("Sample export failed: {:?}", err);
            eprintln!("{}", err);
            std::process::exit(err.exit_code());
        }
    }
}
