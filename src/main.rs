//! CLI for bibmark - Render @key citations in Markdown documents.

use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use bibmark::{
    builtin_style, builtin_style_names, check_references, extract_citations, format_bibliography,
    format_citations, generate_output, load_bibliography, processor::ProcessorError, render_html,
    replace_citations, CitationMarker, CitationRenderer,
};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// Render @key citations in Markdown documents
#[derive(Parser)]
#[command(name = "bibmark")]
#[command(version)]
#[command(after_help = "\
Examples:
  bibmark process article.md --bib refs.bib
  bibmark process article.md --bib refs.json --style acm -o article.html
  echo 'See @Albert1989.' | bibmark process - --bib refs.bib --to markdown
  bibmark styles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a Markdown file with citations
    #[command(after_help = "\
Examples:
  bibmark process paper.md --bib refs.bib --style apa
  bibmark process paper.md -b refs.jsonl -s acm -o paper.html
  bibmark process paper.md -b refs.bib --to markdown --no-bib

Citation syntax: @key, where key is made of letters, digits, '_', '-' and ':'")]
    Process {
        /// Input Markdown file (use '-' for stdin)
        input: PathBuf,

        /// Bibliography file (.bib, .json array or .jsonl)
        #[arg(short, long)]
        bib: PathBuf,

        /// Citation style name (see 'styles' command)
        #[arg(short, long, default_value = "apa")]
        style: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
        to: OutputFormat,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Don't include the reference list
        #[arg(long)]
        no_bib: bool,

        /// Custom reference list header
        #[arg(long, default_value = "## References")]
        bib_header: String,

        /// Fail when a citation key is not in the bibliography
        #[arg(long)]
        strict: bool,

        /// Log progress to stderr
        #[arg(short, long)]
        verbose: bool,
    },

    /// List available citation styles
    Styles,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Whole document converted to HTML
    Html,
    /// Original Markdown with citations spliced in
    Markdown,
}

// ---------------------------------------------------------------------------
// AppError - semantic exit codes
// ---------------------------------------------------------------------------

enum AppError {
    /// Exit 10 - input file not found / unreadable
    InputFile(String),
    /// Exit 11 - bibliography file not found / invalid
    BibFile(String),
    /// Exit 12 - unknown citation style
    Style(String),
    /// Exit 13 - citation key not found in bibliography (strict mode)
    ReferenceNotFound(String),
    /// Exit 15 - cannot write output file
    OutputFile(String),
}

impl AppError {
    fn exit_code(&self) -> i32 {
        match self {
            AppError::InputFile(_) => 10,
            AppError::BibFile(_) => 11,
            AppError::Style(_) => 12,
            AppError::ReferenceNotFound(_) => 13,
            AppError::OutputFile(_) => 15,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InputFile(msg) => {
                write!(f, "{}\n  hint: verify the file path is correct", msg)
            }
            AppError::BibFile(msg) => {
                write!(
                    f,
                    "{}\n  hint: use a .bib file, a JSON array of records, or JSONL (one record per line)",
                    msg
                )
            }
            AppError::Style(msg) => {
                let names = builtin_style_names().join(", ");
                write!(f, "{}\n  available styles: {}", msg, names)
            }
            AppError::ReferenceNotFound(msg) => {
                write!(
                    f,
                    "{}\n  hint: check that this citation key exists in your bibliography file",
                    msg
                )
            }
            AppError::OutputFile(msg) => {
                write!(
                    f,
                    "{}\n  hint: check that the output directory exists and is writable",
                    msg
                )
            }
        }
    }
}

impl From<ProcessorError> for AppError {
    fn from(e: ProcessorError) -> Self {
        match e {
            ProcessorError::ReferenceNotFound(_) => AppError::ReferenceNotFound(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Process { verbose: true, .. });
    init_tracing(verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Commands::Process {
            input,
            bib,
            style,
            to,
            output,
            no_bib,
            bib_header,
            strict,
            verbose: _,
        } => {
            let options = ProcessOptions {
                style: &style,
                to,
                no_bib,
                bib_header: &bib_header,
                strict,
            };
            process_command(&input, &bib, output.as_deref(), &options)?;
        }
        Commands::Styles => {
            styles_command();
        }
    }

    Ok(())
}

struct ProcessOptions<'a> {
    style: &'a str,
    to: OutputFormat,
    no_bib: bool,
    bib_header: &'a str,
    strict: bool,
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Process a Markdown file with citations.
fn process_command(
    input: &Path,
    bib: &Path,
    output: Option<&Path>,
    options: &ProcessOptions<'_>,
) -> Result<(), AppError> {
    // 1. Read the Markdown file (support '-' for stdin)
    let markdown = if input == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| AppError::InputFile(format!("failed to read from stdin: {}", e)))?;
        buf
    } else {
        fs::read_to_string(input)
            .map_err(|e| AppError::InputFile(format!("'{}': {}", input.display(), e)))?
    };

    // 2. Load the bibliography
    let bibliography = load_bibliography(bib)
        .map_err(|e| AppError::BibFile(format!("'{}': {}", bib.display(), e)))?;
    info!(path = %bib.display(), records = bibliography.len(), "loaded bibliography");

    // 3. Select the style
    let style = builtin_style(options.style)
        .ok_or_else(|| AppError::Style(format!("unknown style '{}'", options.style)))?;
    let renderer = CitationRenderer::new(&bibliography, style);

    // 4. Render the document
    let (result, cited) = match options.to {
        OutputFormat::Html => render_html_document(&markdown, &renderer, options),
        OutputFormat::Markdown => render_markdown_document(&markdown, &renderer, options),
    };

    // 5. Strict mode rejects unresolved keys before anything is written
    if options.strict {
        check_references(&cited, &bibliography)?;
    }

    // 6. Write to file or stdout
    if let Some(output_path) = output {
        fs::write(output_path, &result)
            .map_err(|e| AppError::OutputFile(format!("'{}': {}", output_path.display(), e)))?;
        info!(
            citations = cited.len(),
            path = %output_path.display(),
            "wrote output"
        );
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write!(handle, "{}", result)
            .map_err(|e| AppError::OutputFile(format!("stdout: {}", e)))?;
    }

    Ok(())
}

/// Whole document as HTML, reference list appended after the rendered header.
///
/// Returns the output and the markers that were rendered.
fn render_html_document(
    markdown: &str,
    renderer: &CitationRenderer<'_>,
    options: &ProcessOptions<'_>,
) -> (String, Vec<CitationMarker>) {
    let document = render_html(markdown, renderer);
    debug!(citations = document.citations.len(), "rendered document as html");

    let mut html = document.html;
    if !options.no_bib {
        let references = format_bibliography(&document.citations, renderer);
        if !references.is_empty() {
            html.push_str(&render_html(options.bib_header, renderer).html);
            html.push_str(&references);
            html.push('\n');
        }
    }

    (html, document.citations)
}

/// Original Markdown with citations spliced in, reference list appended.
fn render_markdown_document(
    markdown: &str,
    renderer: &CitationRenderer<'_>,
    options: &ProcessOptions<'_>,
) -> (String, Vec<CitationMarker>) {
    let citations = extract_citations(markdown);
    let processed = format_citations(&citations, renderer);
    debug!(citations = processed.len(), "spliced citations into markdown");

    let content = replace_citations(markdown, &processed);
    let references = if options.no_bib {
        None
    } else {
        Some(format_bibliography(
            citations.iter().map(|c| &c.marker),
            renderer,
        ))
    };

    (
        generate_output(&content, references.as_deref(), options.bib_header),
        citations.into_iter().map(|c| c.marker).collect(),
    )
}

/// List available citation styles.
fn styles_command() {
    for name in builtin_style_names() {
        println!("{}", name);
    }
}
