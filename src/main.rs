use anyhow::Result;
use clap::{Parser, Subcommand};

use backupr::cli::{handle_run_command, RunArgs};
use backupr::config::{paths::BackuprPaths, settings::Settings};
use backupr::display::format_history;
use backupr::history::RunLog;

#[derive(Parser)]
#[command(
    name = "backupr",
    version,
    about = "Dump, compress and mail MySQL backups",
    long_about = "backupr dumps a MySQL database with mysqldump, packs the dump into a \
                  timestamped .tar.gz archive and can email a notification with the \
                  archive attached. It is meant to be run unattended, e.g. from cron."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Back up a database
    Run(RunArgs),

    /// Show recent backup runs
    History {
        /// Number of runs to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Write the default settings file
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = BackuprPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Run(args)) => {
            let outcome = handle_run_command(&paths, &settings, args)?;
            let code = outcome.exit_code();
            if code != 0 {
                std::process::exit(code);
            }
        }
        Some(Commands::History { limit }) => {
            let log = RunLog::new(paths.run_log());
            let records = log.read_recent(limit)?;
            println!("{}", format_history(&records).trim_end());
        }
        Some(Commands::Init) => {
            if paths.is_initialized() {
                println!("Settings already exist at: {}", paths.settings_file().display());
            } else {
                settings.save(&paths)?;
                println!("Settings written to: {}", paths.settings_file().display());
            }
        }
        Some(Commands::Config) => {
            println!("backupr Configuration");
            println!("=====================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Run log:          {}", paths.run_log().display());
            println!();
            println!("Settings:");
            println!("  Dump program:      {}", settings.dump_program);
            println!("  Default DB host:   {}", settings.default_db_host);
            println!(
                "  Default directory: {}",
                if settings.default_directory.is_empty() {
                    "(current directory)"
                } else {
                    settings.default_directory.as_str()
                }
            );
            println!(
                "  Mail relay:        {}:{} (STARTTLS)",
                settings.relay.host, settings.relay.port
            );
            println!("  Color:             {:?}", settings.color);
        }
        None => {
            println!("backupr - Dump, compress and mail MySQL backups");
            println!();
            println!("Run 'backupr --help' for usage information.");
            println!("Run 'backupr run --database <NAME> --user <USER>' to back up a database.");
        }
    }

    Ok(())
}
