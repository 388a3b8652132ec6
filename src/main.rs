use clap::Parser;
use memory_sync::utils::{logger, validation::Validate};
use memory_sync::{run_job, CliArgs, JobStage, SyncConfig, SyncError};

const EXIT_CONFIG: i32 = 1;
const EXIT_CONNECT: i32 = 2;
const EXIT_SYNC: i32 = 3;

fn fail(stage: &str, e: &SyncError, exit_code: i32) -> ! {
    tracing::error!(
        "❌ {} failed: {} (Category: {:?})",
        stage,
        e,
        e.category()
    );
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}: {}", stage, e);
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting memory-sync");

    let config = match SyncConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => fail("Loading configuration", &e, EXIT_CONFIG),
    };
    if let Err(e) = config.validate() {
        fail("Configuration validation", &e, EXIT_CONFIG);
    }
    tracing::debug!("Config: {:?}", config);

    match run_job(&config, args.dry_run).await {
        Ok(report) => {
            tracing::info!(
                "✅ {} in scope, {} matched, {} updated, {} skipped (no option), {} without a config row",
                report.subscriptions_in_scope,
                report.servers_matched,
                report.updated,
                report.skipped_no_option,
                report.missing_rows
            );
            if args.verbose {
                tracing::debug!("Report: {}", serde_json::to_string(&report)?);
            }
            Ok(())
        }
        Err(failure) => match failure.stage {
            JobStage::Connect => fail(
                "Connecting to the billing database",
                &failure.error,
                EXIT_CONNECT,
            ),
            JobStage::Sync => fail("Sync pass", &failure.error, EXIT_SYNC),
        },
    }
}
