use clap::Parser;
use cnab_processor::cli::{args::Args, commands};
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let cancellation_token = CancellationToken::new();

        // Ctrl+C only cancels the token; commands stop at the next file boundary
        let signal_token = cancellation_token.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    eprintln!("\nReceived CTRL+C, finishing the current file and shutting down...");
                    signal_token.cancel();
                }
                Err(e) => eprintln!("Failed to install CTRL+C signal handler: {}", e),
            }
        });

        commands::run(args, cancellation_token).await
    });

    match result {
        Ok(outcome) if outcome.is_success() => process::exit(0),
        Ok(outcome) => {
            eprintln!("{} file(s) failed to process", outcome.failed);
            process::exit(1);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("CNAB Processor - Bank Return File Filter");
    println!("========================================");
    println!();
    println!("Filter CNAB400 return files from Banco do Brasil and Bradesco by operation");
    println!("code, split advance settlements and export them as CSV or XLSX.");
    println!();
    println!("USAGE:");
    println!("    cnab_processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    watch       Poll the configured directories and process new files");
    println!("    process     Process the given return files once");
    println!("    inspect     Show bank detection and statistics for a file");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("CONFIGURATION (environment or .env file):");
    println!("    BB_ENABLE, BB_OPERACAO, BB_SEPARAR_ANTECIPACAO");
    println!("    BRADESCO_ENABLE, BRADESCO_OPERACAO, BRADESCO_SEPARAR_ANTECIPACAO");
    println!("    CHECK_INTERVAL, LOCAL_CNAB_DIR, NETWORK_CNAB_DIR, OUTPUT_FORMAT");
    println!();
    println!("EXAMPLES:");
    println!("    # Watch the configured directories:");
    println!("    cnab_processor watch -v");
    println!();
    println!("    # Process two files once with a custom env file:");
    println!("    cnab_processor process CB010101.RET CB020202.RET --env-file prod.env");
    println!();
    println!("    # Preview what a file would produce:");
    println!("    cnab_processor inspect CB010101.RET --output-format json");
    println!();
    println!("For detailed help on any command, use:");
    println!("    cnab_processor <COMMAND> --help");
}
