//! HWP text replacement CLI.
//!
//! Default mode fills template fields: extracts the document text through
//! the structural channel, applies the requested replacements, and writes
//! the sidecar artifacts. Subcommands expose extraction and pattern search
//! on their own.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use hwpfill::{
    DocumentSession, HwpError, OfflineBackend, PatternMap, RefillService, StructuralExtractor,
};

/// HWP Text Replacement Tool
///
/// Find and replace literal text in HWP documents. By default performs
/// replacement; use the 'extract' and 'find' subcommands for inspection.
#[derive(Parser)]
#[command(name = "hwpfill")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input HWP file path
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Base path for the sidecar artifacts (defaults to the input path)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Replacement in FIND=REPLACE form (can be specified multiple times)
    #[arg(short, long, value_name = "FIND=REPLACE")]
    set: Vec<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the document text (for inspection and verification)
    Extract {
        /// Input HWP file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output text file (optional, defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Report every occurrence offset of a pattern in the document text
    Find {
        /// Input HWP file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Literal pattern to search for
        #[arg(short, long, value_name = "TEXT")]
        pattern: String,
    },

    /// Summarize the document: sections, paragraphs, text length
    Info {
        /// Input HWP file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
    },
}

/// Fill command handler.
struct FillHandler {
    verbose: bool,
}

impl FillHandler {
    fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn open_session(&self, input: &Path) -> Result<DocumentSession> {
        let mut session = DocumentSession::new(Box::new(OfflineBackend::new()));
        session
            .connect()
            .with_context(|| "Failed to connect to document backend")?;
        session
            .open(input)
            .with_context(|| format!("Failed to open {}", input.display()))?;
        Ok(session)
    }

    /// Executes a fill operation.
    fn fill(&self, input: &Path, output: Option<&Path>, patterns: &PatternMap) -> Result<()> {
        if patterns.is_empty() {
            anyhow::bail!("No replacements specified. Use --set 'FIND=REPLACE'.");
        }

        if self.verbose {
            println!("Input:  {}", input.display());
            println!("Patterns: {} replacement pair(s)", patterns.len());
        }

        let mut session = self.open_session(input)?;
        let mut service = match output {
            Some(base) => RefillService::new(
                Box::new(StructuralExtractor::new()),
                Box::new(hwpfill::SidecarCommit::with_base(base)),
            ),
            None => RefillService::with_sidecar_strategy(),
        };

        let result = service.refill(&mut session, patterns);
        session.disconnect();

        match result {
            Ok((report, outcome)) => {
                for entry in &report.outcomes {
                    if entry.found() {
                        println!(
                            "✓ Replaced {} occurrence(s) of '{}' with '{}'",
                            entry.count, entry.find, entry.replace
                        );
                    } else {
                        println!("⚠ Pattern not found: '{}'", entry.find);
                    }
                }
                println!("Total replacements: {}", report.total);
                if let Some(sidecar) = &outcome.sidecar {
                    println!("✓ Modified text → {}", sidecar.display());
                }
                if let Some(backup) = &outcome.backup {
                    println!("✓ Original backup → {}", backup.display());
                }
                Ok(())
            }
            Err(HwpError::NoReplacementsMade { .. }) => {
                for (find, _) in patterns.iter() {
                    println!("⚠ Pattern not found: '{}'", find);
                }
                anyhow::bail!("No replacements made; document left untouched")
            }
            Err(err) => Err(err).with_context(|| "Fill failed"),
        }
    }

    /// Extracts document text through the structural channel.
    fn extract(&self, input: &Path, output: Option<&Path>) -> Result<()> {
        let mut session = self.open_session(input)?;
        let mut service = RefillService::with_sidecar_strategy();
        let text = service
            .extract(&mut session)
            .with_context(|| "Text extraction failed")?;
        session.disconnect();

        if let Some(output_path) = output {
            std::fs::write(output_path, &text)
                .with_context(|| format!("Failed to write to {}", output_path.display()))?;
            println!(
                "✓ Extracted {} characters → {}",
                text.chars().count(),
                output_path.display()
            );
        } else {
            println!("{}", text);
        }
        Ok(())
    }

    /// Reports occurrence offsets of a pattern.
    fn find(&self, input: &Path, pattern: &str) -> Result<()> {
        let mut session = self.open_session(input)?;
        let mut service = RefillService::with_sidecar_strategy();
        let offsets = service
            .locate(&mut session, pattern)
            .with_context(|| "Pattern search failed")?;
        session.disconnect();

        if offsets.is_empty() {
            println!("Pattern '{}' not found", pattern);
        } else {
            let rendered: Vec<String> = offsets.iter().map(|o| o.to_string()).collect();
            println!(
                "Found '{}' at {} position(s): [{}]",
                pattern,
                offsets.len(),
                rendered.join(", ")
            );
        }
        Ok(())
    }

    /// Prints a document summary.
    fn info(&self, input: &Path) -> Result<()> {
        let mut session = self.open_session(input)?;
        let stats = StructuralExtractor::new()
            .stats(input)
            .with_context(|| "Document inspection failed")?;

        println!("Document:   {}", input.display());
        println!("Sections:   {}", stats.sections);
        println!("Paragraphs: {}", stats.paragraphs);
        println!("Characters: {}", stats.characters);
        match session.page_count() {
            Ok(pages) => println!("Pages:      {}", pages),
            Err(_) => println!("Pages:      unavailable without a live session"),
        }
        session.disconnect();
        Ok(())
    }
}

/// Parses repeated `FIND=REPLACE` arguments into an ordered pattern map.
fn build_patterns(pairs: &[String]) -> Result<PatternMap> {
    let mut patterns = PatternMap::new();
    for pair in pairs {
        let (find, replace) = pair
            .split_once('=')
            .with_context(|| format!("Invalid --set value '{}': expected FIND=REPLACE", pair))?;
        if find.is_empty() {
            anyhow::bail!("Invalid --set value '{}': FIND part is empty", pair);
        }
        patterns.insert(find, replace);
    }
    Ok(patterns)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let handler = FillHandler::new(cli.verbose);

    match &cli.command {
        Some(Commands::Extract { input, output }) => {
            handler.extract(input, output.as_deref())?;
        }
        Some(Commands::Find { input, pattern }) => {
            handler.find(input, pattern)?;
        }
        Some(Commands::Info { input }) => {
            handler.info(input)?;
        }
        None => {
            let input = cli
                .input
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--input is required"))?;
            let patterns = build_patterns(&cli.set)?;
            handler.fill(input, cli.output.as_deref(), &patterns)?;
        }
    }

    Ok(())
}
