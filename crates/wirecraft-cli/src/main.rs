use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;

use wirecraft::decoder::{self, JsFlavor};
use wirecraft::generate;
use wirecraft::schema::Schema;
use wirecraft::value::{Value, ValueSet};

#[derive(Parser)]
#[command(name = "wirecraft")]
#[command(about = "Check payload schemas, pack values, and emit JavaScript decoders.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a schema document and print its wire layout.
    Check {
        /// Path to the schema JSON.
        schema: PathBuf,
    },
    /// Pack a payload from supplied or generated values.
    Pack {
        /// Path to the schema JSON.
        schema: PathBuf,
        /// JSON object of field values; generated when absent.
        #[arg(long)]
        values: Option<PathBuf>,
        /// Seed for generated values, for reproducible payloads.
        #[arg(long)]
        seed: Option<u64>,
        /// Print only the base64 payload.
        #[arg(long)]
        base64_only: bool,
    },
    /// Emit decodeUplink source for the schema.
    Decoder {
        /// Path to the schema JSON.
        schema: PathBuf,
        #[arg(long, value_enum, default_value_t = Flavor::Dataview)]
        flavor: Flavor,
        /// Write the source here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Flavor {
    /// DataView and BigInt, for current runtimes.
    Dataview,
    /// Byte arithmetic only, for legacy scripting sandboxes.
    Es5,
}

impl From<Flavor> for JsFlavor {
    fn from(flavor: Flavor) -> Self {
        match flavor {
            Flavor::Dataview => JsFlavor::DataView,
            Flavor::Es5 => JsFlavor::Es5,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    match Cli::parse().command {
        Command::Check { schema } => check(&schema),
        Command::Pack {
            schema,
            values,
            seed,
            base64_only,
        } => pack(&schema, values.as_deref(), seed, base64_only),
        Command::Decoder {
            schema,
            flavor,
            output,
        } => emit_decoder(&schema, flavor.into(), output.as_deref()),
    }
}

fn load_schema(path: &Path) -> Result<Schema> {
    let document =
        fs::read_to_string(path).with_context(|| format!("reading schema {}", path.display()))?;
    Schema::load(&document).with_context(|| format!("loading schema {}", path.display()))
}

fn check(path: &Path) -> Result<()> {
    let schema = load_schema(path)?;
    for field in schema.fields() {
        let width = field
            .wire_width()
            .map_or_else(|| "-".to_string(), |w| w.to_string());
        println!(
            "{:<24} {:<12} {:>5}",
            field.name,
            field.kind.kind_name(),
            width
        );
    }
    println!("payload: {} bytes nominal", schema.nominal_len());
    Ok(())
}

fn pack(path: &Path, values: Option<&Path>, seed: Option<u64>, base64_only: bool) -> Result<()> {
    let schema = load_schema(path)?;
    let values = match values {
        Some(values_path) => read_values(values_path)?,
        None => match seed {
            Some(seed) => generate::value_set(&mut StdRng::seed_from_u64(seed), &schema),
            None => generate::value_set(&mut rand::rng(), &schema),
        },
    };
    let payload = schema.pack(&values)?;
    if base64_only {
        println!("{}", payload.to_base64());
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(&values)?);
    println!("hex:    {}", payload.to_hex());
    println!("base64: {}", payload.to_base64());
    Ok(())
}

fn read_values(path: &Path) -> Result<ValueSet> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading values {}", path.display()))?;
    let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(&text)
        .with_context(|| format!("parsing values {}", path.display()))?;
    let mut values = ValueSet::new();
    for (name, value) in raw {
        let value = Value::from_json(&value)
            .with_context(|| format!("field `{name}` has a non-scalar value"))?;
        values.insert(name, value);
    }
    Ok(values)
}

fn emit_decoder(path: &Path, flavor: JsFlavor, output: Option<&Path>) -> Result<()> {
    let schema = load_schema(path)?;
    let source = decoder::generate(&schema, flavor);
    match output {
        Some(out_path) => fs::write(out_path, &source)
            .with_context(|| format!("writing {}", out_path.display()))?,
        None => print!("{source}"),
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
    fn flavor_maps_onto_both_dialects() {
        assert_eq!(JsFlavor::from(Flavor::Dataview), JsFlavor::DataView);
        assert_eq!(JsFlavor::from(Flavor::Es5), JsFlavor::Es5);
    }

    #[test]
    fn decoder_takes_output_as_short_or_long_flag() {
        for args in [
            ["wirecraft", "decoder", "schema.json", "-o", "out.js"],
            ["wirecraft", "decoder", "schema.json", "--output", "out.js"],
        ] {
            let cli = Cli::try_parse_from(args).unwrap();
            match cli.command {
                Command::Decoder { output, .. } => {
                    assert_eq!(output.as_deref(), Some(Path::new("out.js")));
                }
                _ => panic!("expected the decoder subcommand"),
            }
        }
    }
}
