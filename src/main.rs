use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing::{debug, info, error};

use crc16_engine::model::CHECK_INPUT;
use crc16_engine::{table, Crc16, CrcModel, Mode, Preset};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Process bit by bit instead of through lookup tables
    #[arg(long, global = true)]
    raw: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the checksum of files, a string, or stdin
    Sum {
        #[command(flatten)]
        model: ModelArgs,

        /// Checksum this text instead of reading input
        #[arg(long, conflicts_with = "files")]
        text: Option<String>,

        files: Vec<PathBuf>,
    },
    /// Verify every preset against its catalog check value
    Check,
    /// Print the lookup table for a polynomial
    Table {
        #[arg(long, value_parser = parse_hex)]
        poly: u16,
    },
}

#[derive(Args, Debug)]
struct ModelArgs {
    /// Named parameter set
    #[arg(short, long, default_value = "CCITT-FALSE")]
    preset: Preset,

    /// Explicit polynomial; overrides --preset
    #[arg(long, value_parser = parse_hex)]
    poly: Option<u16>,

    /// Initial register value
    #[arg(long, value_parser = parse_hex, default_value = "0")]
    xor_in: u16,

    /// Final XOR value
    #[arg(long, value_parser = parse_hex, default_value = "0")]
    xor_out: u16,

    /// Reflect each input byte
    #[arg(long)]
    reflect_in: bool,

    /// Reflect the register before the final XOR
    #[arg(long)]
    reflect_out: bool,
}

impl ModelArgs {
    fn model(&self) -> CrcModel {
        match self.poly {
            Some(polynomial) => CrcModel {
                polynomial,
                xor_in: self.xor_in,
                xor_out: self.xor_out,
                reflect_in: self.reflect_in,
                reflect_out: self.reflect_out,
            },
            None => self.preset.model(),
        }
    }
}

fn parse_hex(s: &str) -> Result<u16, std::num::ParseIntError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u16::from_str_radix(digits, 16)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let mode = if cli.raw { Mode::Raw } else { Mode::Fast };

    match cli.command {
        Commands::Sum { model, text, files } => {
            let model = model.model();
            debug!("using {:?} in {:?} mode", model, mode);
            let mut crc = Crc16::new(model, mode);

            if let Some(text) = text {
                crc.update(text.as_bytes());
                println!("{:#06x}  {:?}", crc.result(), text);
            } else if files.is_empty() {
                io::copy(&mut io::stdin().lock(), &mut crc).context("Failed to read stdin")?;
                println!("{:#06x}  -", crc.result());
            } else {
                for path in &files {
                    crc.clear();
                    let file = File::open(path)
                        .with_context(|| format!("Failed to open {}", path.display()))?;
                    io::copy(&mut BufReader::new(file), &mut crc)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    println!("{:#06x}  {}", crc.result(), path.display());
                }
            }
        }
        Commands::Check => {
            info!("Checking {} presets in {:?} mode", Preset::ALL.len(), mode);
            let mut failures = 0;
            for preset in Preset::ALL {
                let mut crc = Crc16::new(preset.model(), mode);
                crc.update(CHECK_INPUT);
                let actual = crc.result();
                let status = if actual == preset.check() { "ok" } else { "FAIL" };
                println!(
                    "{:<12} expected {:#06x} got {:#06x}  {}",
                    preset.name(),
                    preset.check(),
                    actual,
                    status
                );
                if actual != preset.check() {
                    error!("{} produced {:#06x}", preset, actual);
                    failures += 1;
                }
            }
            if failures > 0 {
                anyhow::bail!("{} preset(s) failed the check", failures);
            }
        }
        Commands::Table { poly } => {
            for row in table::build_table(poly).chunks(8) {
                let line: Vec<String> = row.iter().map(|e| format!("{:#06x}", e)).collect();
                println!("{}", line.join(", "));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn hex_values_with_and_without_prefix() {
        assert_eq!(parse_hex("0x1021"), Ok(0x1021));
        assert_eq!(parse_hex("8005"), Ok(0x8005));
        assert_eq!(parse_hex("0XFFFF"), Ok(0xFFFF));
        assert!(parse_hex("0x10000").is_err());
    }

    #[test]
    fn explicit_poly_overrides_preset() {
        let cli = Cli::parse_from([
            "crc16", "sum", "--preset", "xmodem", "--poly", "0x8005", "--xor-in", "ffff",
            "--reflect-in", "--reflect-out", "--text", "123456789",
        ]);
        let Commands::Sum { model, .. } = cli.command else {
            panic!("expected sum");
        };
        assert_eq!(model.model(), crc16_engine::MODBUS);
    }

    #[test]
    fn preset_defaults_to_ccitt_false() {
        let cli = Cli::parse_from(["crc16", "--raw", "sum"]);
        assert!(cli.raw);
        let Commands::Sum { model, .. } = cli.command else {
            panic!("expected sum");
        };
        assert_eq!(model.model(), crc16_engine::CCITT_FALSE);
    }
}
