use clap::{Parser, Subcommand};
use kirinuki::config::{self, SummarizeConfig, defaults};
use kirinuki::{
    LineNumberStyle, OffsetRange, OverlayNode, ProjectedText, SummarizeOptions, SummaryDocument,
    SupportedLanguage, adjust_selection, parse_document, parse_document_named, summarize,
};
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// Syntax-aware, budget-bounded summaries of source files
#[derive(Parser)]
#[command(name = "kirinuki")]
#[command(version)]
#[command(about = "Syntax-aware, budget-bounded summaries of source files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize one or more files against a shared character budget
    Summarize {
        /// Files to summarize, in priority order for equal costs
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Total output size in characters, across all files
        #[arg(long)]
        budget: Option<usize>,

        /// Byte range START..END in the first file that must survive
        #[arg(long, value_parser = parse_selection)]
        selection: Option<OffsetRange>,

        /// Grammar to parse with (default: detected from extension or shebang)
        #[arg(long)]
        language: Option<SupportedLanguage>,

        /// none, omitted-ranges or full
        #[arg(long)]
        line_numbers: Option<LineNumberStyle>,

        /// Use the ellipsis even for elisions spanning lines
        #[arg(long)]
        always_ellipsis: bool,

        /// Keep import-like nodes regardless of budget
        #[arg(long)]
        preserve_imports: bool,

        /// Config file to use instead of ./kirinuki.toml
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print text, edit and projected selection as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the syntax-adjusted form of a selection as JSON
    Adjust {
        file: PathBuf,

        /// Byte range START..END
        #[arg(long, value_parser = parse_selection)]
        selection: OffsetRange,

        /// Grammar to parse with (default: detected from extension or shebang)
        #[arg(long)]
        language: Option<SupportedLanguage>,
    },
    /// Configuration helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the default configuration as TOML
    Init,
}

fn parse_selection(value: &str) -> Result<OffsetRange, String> {
    let (start, end) = value
        .split_once("..")
        .ok_or_else(|| format!("expected START..END, got '{value}'"))?;
    let start: usize = start
        .trim()
        .parse()
        .map_err(|e| format!("invalid start '{start}': {e}"))?;
    let end: usize = end
        .trim()
        .parse()
        .map_err(|e| format!("invalid end '{end}': {e}"))?;
    OffsetRange::try_new(start, end).map_err(|e| e.to_string())
}

#[derive(Serialize)]
struct SummaryOutput<'a> {
    path: &'a Path,
    #[serde(flatten)]
    projected: &'a ProjectedText,
    #[serde(skip_serializing_if = "Option::is_none")]
    selection: Option<OffsetRange>,
}

struct InputFile {
    path: PathBuf,
    text: String,
    language: Option<SupportedLanguage>,
}

fn read_input(path: &Path, language: Option<SupportedLanguage>) -> Result<InputFile, Box<dyn Error>> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let language = language.or_else(|| SupportedLanguage::detect(path, &text));
    if language.is_none() {
        log::warn!(
            target: "kirinuki::cli",
            "No grammar for {}; it will be kept or dropped as a whole",
            path.display()
        );
    }
    Ok(InputFile {
        path: path.to_path_buf(),
        text,
        language,
    })
}

#[allow(clippy::too_many_arguments)]
fn run_summarize(
    files: &[PathBuf],
    budget: Option<usize>,
    selection: Option<OffsetRange>,
    language: Option<SupportedLanguage>,
    line_numbers: Option<LineNumberStyle>,
    always_ellipsis: bool,
    preserve_imports: bool,
    config_path: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let overrides = SummarizeConfig {
        budget,
        line_number_style: line_numbers,
        always_ellipsis_for_elisions: always_ellipsis.then_some(true),
        preserve_type_checking: preserve_imports.then_some(true),
        ..Default::default()
    };
    let root = std::env::current_dir().ok();
    let outcome = config::load_settings(root.as_deref(), config_path, Some(overrides))?;
    for event in &outcome.events {
        event.log();
    }
    let budget = outcome.budget();
    let options = SummarizeOptions::new(outcome.settings());

    let inputs = files
        .iter()
        .map(|path| read_input(path, language))
        .collect::<Result<Vec<_>, _>>()?;
    let overlays = inputs
        .iter()
        .map(|input| {
            input
                .language
                .map(|language| parse_document(&input.text, language))
                .transpose()
        })
        .collect::<Result<Vec<Option<OverlayNode>>, _>>()?;

    let adjusted = match (selection, inputs.first()) {
        (Some(selection), Some(first)) => Some(match first.language {
            Some(language) => {
                let named = parse_document_named(&first.text, language)?;
                adjust_selection(&named, &first.text, selection)?.adjusted
            }
            None => selection,
        }),
        _ => None,
    };

    let documents: Vec<SummaryDocument<'_>> = inputs
        .iter()
        .zip(&overlays)
        .enumerate()
        .map(|(index, (input, overlay))| {
            let document = SummaryDocument::new(&input.text, overlay.as_ref());
            match adjusted {
                Some(selection) if index == 0 => document.with_selection(selection),
                _ => document,
            }
        })
        .collect();

    let results = summarize(&documents, budget, &options)?;

    if json {
        let outputs: Vec<SummaryOutput<'_>> = inputs
            .iter()
            .zip(&results)
            .enumerate()
            .map(|(index, (input, projected))| SummaryOutput {
                path: &input.path,
                projected,
                selection: adjusted
                    .filter(|_| index == 0)
                    .map(|selection| projected.project_offset_range(selection)),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&outputs)?);
    } else if let [only] = results.as_slice() {
        print!("{}", only.text());
    } else {
        for (input, projected) in inputs.iter().zip(&results) {
            println!("==> {} <==", input.path.display());
            print!("{}", projected.text());
        }
    }
    Ok(())
}

fn run_adjust(
    path: &Path,
    selection: OffsetRange,
    language: Option<SupportedLanguage>,
) -> Result<(), Box<dyn Error>> {
    let input = read_input(path, language)?;
    let language = input
        .language
        .ok_or_else(|| format!("cannot detect a grammar for {}; pass --language", path.display()))?;
    let syntax = parse_document_named(&input.text, language)?;
    let adjustment = adjust_selection(&syntax, &input.text, selection)?;
    println!("{}", serde_json::to_string_pretty(&adjustment)?);
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Summarize {
            files,
            budget,
            selection,
            language,
            line_numbers,
            always_ellipsis,
            preserve_imports,
            config,
            json,
        } => run_summarize(
            &files,
            budget,
            selection,
            language,
            line_numbers,
            always_ellipsis,
            preserve_imports,
            config.as_deref(),
            json,
        ),
        Commands::Adjust {
            file,
            selection,
            language,
        } => run_adjust(&file, selection, language),
        Commands::Config {
            command: ConfigCommands::Init,
        } => defaults::default_config_toml()
            .map(|toml| print!("{toml}"))
            .map_err(Into::into),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
