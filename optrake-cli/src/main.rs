use anyhow::Result;
use clap::{Parser, Subcommand};
use optrake_core::{parse_long_opts, parse_short_opts, Binary, OptionDescriptor};

/// Recover getopt option tables from compiled binaries
#[derive(Parser)]
#[command(
    name = "optrake",
    about = "Recover the command-line options a binary accepts from its getopt tables",
    version,
    author
)]
struct Cli {
    /// Path to binary file
    #[arg(required = true)]
    path: std::path::PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show format, machine, entry point, and stripped state
    Info,
    /// List all sections
    Sections,
    /// Decode the short-option string (optstring) at the given address
    ShortOpts {
        /// Virtual address of the optstring (0x-prefixed hex or decimal)
        #[arg(value_parser = parse_address)]
        address: u64,
        /// Emit the recovered options as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decode the long-option (struct option) array at the given address
    LongOpts {
        /// Virtual address of the option array (0x-prefixed hex or decimal)
        #[arg(value_parser = parse_address)]
        address: u64,
        /// Emit the recovered options as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_address(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse::<u64>(),
    };
    parsed.map_err(|e| format!("invalid address '{s}': {e}"))
}

fn print_options(options: &[OptionDescriptor], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(options)?);
        return Ok(());
    }

    if options.is_empty() {
        println!("No options recovered.");
        return Ok(());
    }

    println!("{:<24} {:<10}", "Option", "Argument");
    println!("{}", "-".repeat(36));
    for opt in options {
        let dashes = match opt.style {
            optrake_core::DashStyle::OneDash => "-",
            optrake_core::DashStyle::TwoDash => "--",
        };
        println!(
            "{:<24} {:<10}",
            format!("{dashes}{}", opt.token),
            if opt.takes_argument { "yes" } else { "no" }
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let bin = Binary::open(&cli.path)?;

    match cli.command {
        Command::Info => {
            println!("Format:      {}", bin.format_name());
            println!("Machine:     {:#x}", bin.machine());
            println!("Class:       {}-bit", if bin.is_64() { 64 } else { 32 });
            println!("Entry point: 0x{:x}", bin.entry_point());
            println!("Executable:  {}", bin.is_executable());
            println!("Stripped:    {}", bin.is_stripped);
        }

        Command::Sections => {
            if bin.sections.is_empty() {
                println!("No sections found (possibly stripped binary).");
            } else {
                println!(
                    "{:<20} {:<18} {:<10} {:<10} {:<10}",
                    "Section", "VMA", "Size", "Offset", "Flags"
                );
                println!("{}", "-".repeat(80));
                for s in &bin.sections {
                    println!(
                        "{:<20} 0x{:<16x} {:<10x} {:<10x} {:<10x}",
                        s.name, s.vma, s.size, s.file_offset, s.flags
                    );
                }
            }
        }

        Command::ShortOpts { address, json } => {
            let options = parse_short_opts(&bin, address)?;
            print_options(&options, json)?;
        }

        Command::LongOpts { address, json } => {
            let options = parse_long_opts(&bin, address)?;
            print_options(&options, json)?;
        }
    }

    Ok(())
}
