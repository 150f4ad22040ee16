use anyhow::Context;
use clap::Parser;
use filter_lookup::core::FilterSource;
use filter_lookup::utils::{logger, validation::Validate};
use filter_lookup::{
    CliConfig, ContaminantId, FilterLookup, FixtureFilterSource, LocalStorage, LookupError,
    LookupReport, OutputFormat, RestFilterSource,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting filter-lookup");

    let config = match cli.to_lookup_config().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => exit_with(&e, 1),
    };
    if cli.verbose {
        tracing::debug!(
            "Resolved config: base_url={:?}, table={}, column={}, fixture={:?}",
            config.base_url,
            config.table,
            config.column,
            config.fixture
        );
    }

    let format: OutputFormat = match config.format.parse() {
        Ok(format) => format,
        Err(e) => exit_with(&e, 1),
    };
    let contaminant = ContaminantId(cli.contaminant);

    let report = match &config.fixture {
        Some(path) => {
            let source = FixtureFilterSource::new(LocalStorage::new(".".to_string()), path.clone())
                .with_column(config.column.clone());
            lookup(FilterLookup::new(source), contaminant, cli.strict).await
        }
        None => match RestFilterSource::from_config(&config) {
            Ok(source) => lookup(FilterLookup::new(source), contaminant, cli.strict).await,
            Err(e) => exit_with(&e, 1),
        },
    };

    let rendered = report
        .render(format)
        .context("failed to render lookup report")?;
    println!("{}", rendered.trim_end());

    Ok(())
}

async fn lookup<S: FilterSource>(
    engine: FilterLookup<S>,
    contaminant: ContaminantId,
    strict: bool,
) -> LookupReport {
    let source = engine.source().describe();

    let filters = if strict {
        match engine.try_filters_by_contaminant(contaminant).await {
            Ok(filters) => filters,
            Err(e) => exit_with(&e, 2),
        }
    } else {
        engine.filters_by_contaminant(contaminant).await
    };

    LookupReport::new(contaminant, source, filters)
}

fn exit_with(e: &LookupError, code: i32) -> ! {
    tracing::error!(
        "❌ Lookup failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(code);
}
