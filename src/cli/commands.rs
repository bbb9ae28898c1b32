//! CLI command implementations

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::Path;

use crate::automaton::regex::derive_regex_with_limit;
use crate::automaton::Automaton;
use crate::serialization::{
    AutomatonSerializer, BincodeSerializer, JsonSerializer, PlainTextSerializer,
};
use crate::synthesis::{ChecksumScheme, SchemeConfig};

use super::args::{Commands, SchemeArgs, SerializationFormat};
use super::detect::{detect_format, output_format};

/// Execute a CLI command
pub fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Table {
            scheme,
            minimize,
            stats,
        } => cmd_table(&scheme, minimize, stats),
        Commands::Check {
            numbers,
            scheme,
            automaton,
            format,
            input,
        } => cmd_check(numbers, &scheme, automaton.as_deref(), format, input.as_deref()),
        Commands::Regex { scheme, limit } => cmd_regex(&scheme, limit),
        Commands::Export {
            output,
            scheme,
            format,
            minimize,
        } => cmd_export(&output, &scheme, format, minimize),
    }
}

/// Resolve the scheme named on the command line.
pub fn load_scheme(args: &SchemeArgs) -> Result<ChecksumScheme> {
    let Some(path) = &args.config else {
        return Ok(args.preset.scheme());
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scheme file: {}", path.display()))?;
    let config = SchemeConfig::from_json(&json)
        .with_context(|| format!("Failed to parse scheme file: {}", path.display()))?;
    let scheme = ChecksumScheme::try_from(config)
        .with_context(|| format!("Invalid scheme in {}", path.display()))?;
    tracing::info!(path = %path.display(), length = scheme.length(), "loaded scheme");
    Ok(scheme)
}

/// Load an automaton from a file
pub fn load_automaton(path: &Path, format: Option<SerializationFormat>) -> Result<Automaton> {
    let detection = detect_format(path, format)?;
    tracing::debug!(
        path = %path.display(),
        format = %detection.format,
        method = %detection.method,
        "loading automaton"
    );

    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let automaton = match detection.format {
        SerializationFormat::Text => PlainTextSerializer::deserialize(reader),
        SerializationFormat::Bincode => BincodeSerializer::deserialize(reader),
        SerializationFormat::Json => JsonSerializer::deserialize(reader),
    }
    .with_context(|| {
        format!(
            "Failed to load {} automaton from {}",
            detection.format,
            path.display()
        )
    })?;

    Ok(automaton)
}

/// Save an automaton to a file
pub fn save_automaton(
    automaton: &Automaton,
    path: &Path,
    format: SerializationFormat,
) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    match format {
        SerializationFormat::Text => PlainTextSerializer::serialize(automaton, writer),
        SerializationFormat::Bincode => BincodeSerializer::serialize(automaton, writer),
        SerializationFormat::Json => JsonSerializer::serialize(automaton, writer),
    }
    .with_context(|| format!("Failed to write {} to {}", format, path.display()))?;

    Ok(())
}

/// Table command
fn cmd_table(args: &SchemeArgs, minimize: bool, stats_only: bool) -> Result<()> {
    let scheme = load_scheme(args)?;
    let synthesized = scheme.synthesize();
    let automaton = if minimize {
        synthesized.minimize()
    } else {
        synthesized.clone()
    };

    let title = if minimize {
        "Minimized Automaton"
    } else {
        "Synthesized Automaton"
    };
    println!("{}", title.bold().underline());
    println!();
    println!("  Length:      {}", scheme.length().to_string().cyan());
    println!("  Modulus:     {}", scheme.modulus().to_string().cyan());
    println!("  States:      {}", automaton.state_count().to_string().green());
    println!(
        "  Transitions: {}",
        automaton.transition_count().to_string().green()
    );
    if minimize {
        println!(
            "  Reduced:     {} -> {} states",
            synthesized.state_count(),
            automaton.state_count()
        );
    }
    let dead = automaton.dead_states().len();
    if dead > 0 {
        println!("  Dead states: {}", dead.to_string().yellow());
    }

    if !stats_only {
        println!();
        print!("{}", automaton);
    }

    Ok(())
}

/// Check command
fn cmd_check(
    mut numbers: Vec<String>,
    args: &SchemeArgs,
    automaton_path: Option<&Path>,
    format: Option<SerializationFormat>,
    input: Option<&Path>,
) -> Result<()> {
    if let Some(path) = input {
        numbers.extend(read_numbers(path)?);
    }
    if numbers.is_empty() {
        bail!("No numbers to check");
    }

    let automaton = match automaton_path {
        Some(path) => load_automaton(path, format)?,
        None => load_scheme(args)?.synthesize(),
    };

    let mut accepted = 0;
    for number in &numbers {
        if automaton.accepts(number) {
            accepted += 1;
            println!("  {}  {}", "OK".green().bold(), number);
        } else {
            println!("  {}  {}", "FAIL".red().bold(), number);
        }
    }

    println!();
    println!(
        "{} accepted, {} rejected",
        accepted.to_string().green(),
        (numbers.len() - accepted).to_string().red()
    );
    Ok(())
}

/// Regex command
fn cmd_regex(args: &SchemeArgs, limit: usize) -> Result<()> {
    let automaton = load_scheme(args)?.synthesize().minimize();
    let regex = derive_regex_with_limit(&automaton, limit)
        .context("Try a shorter scheme or raise --limit")?;
    println!("{}", regex);
    Ok(())
}

/// Export command
fn cmd_export(
    output: &Path,
    args: &SchemeArgs,
    format: Option<SerializationFormat>,
    minimize: bool,
) -> Result<()> {
    let format = output_format(output, format);
    let mut automaton = load_scheme(args)?.synthesize();
    if minimize {
        automaton = automaton.minimize();
    }

    save_automaton(&automaton, output, format)?;

    println!(
        "{} {} states to {} ({})",
        "Exported".green(),
        automaton.state_count(),
        output.display().to_string().cyan(),
        format
    );
    Ok(())
}

/// Read numbers from a file, skipping blank lines and `#` comments
fn read_numbers(path: &Path) -> Result<Vec<String>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;

    let mut numbers = Vec::new();
    for (line_num, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| {
            format!("Failed to read line {} from {}", line_num + 1, path.display())
        })?;
        let trimmed = line.trim();
        if !trimmed.is_empty() && !trimmed.starts_with('#') {
            numbers.push(trimmed.to_string());
        }
    }
    Ok(numbers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemes::Preset;
    use tempfile::TempDir;

    fn preset(preset: Preset) -> SchemeArgs {
        SchemeArgs {
            preset,
            config: None,
        }
    }

    #[test]
    fn test_load_scheme_from_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scheme.json");
        std::fs::write(
            &path,
            r#"{ "length": 4, "prefix": { "0": [7] }, "weight": "luhn" }"#,
        )
        .unwrap();

        let args = SchemeArgs {
            preset: Preset::Mastercard,
            config: Some(path),
        };
        let scheme = load_scheme(&args).unwrap();
        assert_eq!(scheme.length(), 4);
        assert_eq!(scheme.modulus(), 10);
    }

    #[test]
    fn test_load_scheme_rejects_invalid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scheme.json");
        std::fs::write(&path, r#"{ "length": 0 }"#).unwrap();

        let args = SchemeArgs {
            preset: Preset::Mastercard,
            config: Some(path),
        };
        assert!(load_scheme(&args).is_err());
    }

    #[test]
    fn test_save_and_load_each_format() {
        let dir = TempDir::new().unwrap();
        let automaton = load_scheme(&preset(Preset::Isbn13)).unwrap().synthesize();

        for format in [
            SerializationFormat::Text,
            SerializationFormat::Bincode,
            SerializationFormat::Json,
        ] {
            let path = dir.path().join(format!("isbn.{}", format.extension()));
            save_automaton(&automaton, &path, format).unwrap();
            let loaded = load_automaton(&path, None).unwrap();
            assert_eq!(loaded, automaton, "{}", format);
        }
    }

    #[test]
    fn test_read_numbers_skips_comments() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("numbers.txt");
        std::fs::write(&path, "# cards\n5222084305213022\n\n  4111111111111111  \n").unwrap();

        let numbers = read_numbers(&path).unwrap();
        assert_eq!(numbers, vec!["5222084305213022", "4111111111111111"]);
    }
}
