//! Binary parameter record encode/decode.

use clap::{Args, Subcommand};
use overtone_processor::{ParamSnapshot, STATE_LEN};

use super::common::ParamArgs;

#[derive(Args)]
pub struct StateArgs {
    #[command(subcommand)]
    command: StateCommand,
}

#[derive(Subcommand)]
enum StateCommand {
    /// Print the 13-byte record for a set of parameters as hex
    Encode {
        #[command(flatten)]
        params: ParamArgs,
    },

    /// Decode a hex record and print its fields
    Decode {
        /// Hex bytes, whitespace allowed
        hex: String,
    },
}

pub fn run(args: StateArgs) -> anyhow::Result<()> {
    match args.command {
        StateCommand::Encode { params } => {
            let (snapshot, _) = params.resolve()?;
            println!("{}", to_hex(&snapshot.to_bytes()));
        }
        StateCommand::Decode { hex } => {
            let bytes = from_hex(&hex)?;
            if bytes.len() > STATE_LEN {
                tracing::warn!(
                    extra = bytes.len() - STATE_LEN,
                    "ignoring bytes past the record"
                );
            }
            let snapshot = ParamSnapshot::from_bytes(&bytes)?;
            println!("second_harmonic = {}", snapshot.second_harmonic);
            println!("third_harmonic  = {}", snapshot.third_harmonic);
            println!("mix             = {}", snapshot.mix);
            println!("oversampling    = {}", snapshot.oversampling);
        }
    }
    Ok(())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn from_hex(text: &str) -> anyhow::Result<Vec<u8>> {
    let digits: Vec<u8> = text
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .map(|b| {
            (b as char)
                .to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| anyhow::anyhow!("invalid hex digit '{}'", b as char))
        })
        .collect::<anyhow::Result<_>>()?;
    if digits.len() % 2 != 0 {
        anyhow::bail!("odd number of hex digits");
    }
    Ok(digits.chunks_exact(2).map(|p| (p[0] << 4) | p[1]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let snapshot = ParamSnapshot {
            second_harmonic: 0.3,
            third_harmonic: 0.6,
            mix: 0.8,
            oversampling: true,
        };
        let text = to_hex(&snapshot.to_bytes());
        assert_eq!(text.len(), STATE_LEN * 2);
        assert!(text.ends_with("01"));
        let bytes = from_hex(&text).unwrap();
        assert_eq!(ParamSnapshot::from_bytes(&bytes), Ok(snapshot));
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(from_hex("00 ff\n1A").unwrap(), vec![0x00, 0xff, 0x1a]);
        assert!(from_hex("abc").is_err());
        assert!(from_hex("zz").is_err());
    }
}
