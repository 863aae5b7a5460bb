use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bookkreate::{
    Book, ExportConfig, LogNotifier, Notifier,
    config::{LineSpacing, Orientation, PageMargins, PageSize, TextAlignment},
    compile_typst_to_pdf, export_typst,
    generate::{ContentGenerator, ItemKind, apply_to_book, gemini::{GeminiConfig, GeminiProvider}},
    manuscript::{is_json, load_book},
    text::FontFamily,
    theme::ColorScheme,
    watch::watch_inputs,
    write_atomically,
};

#[derive(Debug, Parser)]
#[command(name = "bookkreate")]
#[command(about = "Themed book layout and PDF export")]
struct Cli {
    #[arg(short, long, global = true, help = "Verbose diagnostics.")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Export a book to PDF.
    Export(ExportArgs),
    /// Draft cover, chapter or credits text with Gemini.
    Generate(GenerateArgs),
    /// List the colour schemes.
    Themes,
}

#[derive(Debug, Args)]
struct ExportArgs {
    #[arg(help = "Book file: .json or a manuscript with `=== Chapter` markers.")]
    input: PathBuf,

    #[arg(short, long, help = "Output path. Defaults to <input>.pdf.")]
    output: Option<PathBuf>,

    #[arg(long, help = "Export options file (YAML or JSON).")]
    config: Option<PathBuf>,

    #[arg(long, help = "Colour scheme name.")]
    scheme: Option<String>,

    #[arg(long, value_enum)]
    page_size: Option<PageSize>,

    #[arg(long, value_enum)]
    orientation: Option<Orientation>,

    #[arg(long, value_enum)]
    margins: Option<PageMargins>,

    #[arg(long, help = "Helvetica, Times, Courier or Georgia.")]
    font: Option<String>,

    #[arg(long, help = "Base font size in points.")]
    font_size: Option<f32>,

    #[arg(long, value_enum)]
    line_spacing: Option<LineSpacing>,

    #[arg(long, value_enum)]
    align: Option<TextAlignment>,

    #[arg(long, help = "Enlarge the first letter of each chapter.")]
    drop_caps: bool,

    #[arg(long, help = "Speckle pages with a paper texture.")]
    paper_texture: bool,

    #[arg(long)]
    no_page_numbers: bool,

    #[arg(long)]
    no_header_footer: bool,

    #[arg(long)]
    no_decorations: bool,

    #[arg(long)]
    no_dividers: bool,

    #[arg(long, help = "Skip the cover page.")]
    no_cover: bool,

    #[arg(long, help = "Add a credits page.")]
    credits: bool,

    #[arg(long, help = "Seed for ornament and texture randomness.")]
    seed: Option<u64>,

    #[arg(long, help = "Also write the generated Typst source here.")]
    emit_typst: Option<PathBuf>,

    #[arg(short, long, help = "Watch the input and re-export on change.")]
    watch: bool,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    #[arg(help = "Book file the text is written for.")]
    input: PathBuf,

    #[arg(long, value_enum)]
    kind: ItemKind,

    #[arg(long, help = "Item title. Defaults to the book title.")]
    title: Option<String>,

    #[arg(long, help = "What a chapter should cover.")]
    description: Option<String>,

    #[arg(long, help = "Gemini model. Overrides GEMINI_MODEL.")]
    model: Option<String>,

    #[arg(long, help = "Store the text back into the (.json) book file.")]
    write: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(error) = run(cli.command) {
        eprintln!("[bookkreate] {error}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "bookkreate=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Export(args) => export(&args),
        Command::Generate(args) => generate(&args),
        Command::Themes => {
            print_themes();
            Ok(())
        }
    }
}

fn export(args: &ExportArgs) -> Result<(), String> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("pdf"));

    if args.watch {
        export_once(args, &output)?;
        let mut watched = vec![args.input.clone()];
        watched.extend(args.config.clone());
        return watch_inputs(&watched, |_| export_once(args, &output))
            .map_err(|e| format!("watch failed: {e}"));
    }

    export_once(args, &output)
}

fn export_once(args: &ExportArgs, output: &Path) -> Result<(), String> {
    let notifier = LogNotifier;
    notifier.loading("Creating your beautifully formatted PDF...");

    let result = load_book(&args.input)
        .map_err(|e| e.to_string())
        .and_then(|book| {
            let config = resolve_config(args, &book)?;
            let source = export_typst(&book, &config).map_err(|e| e.to_string())?;
            if let Some(path) = &args.emit_typst {
                write_atomically(path, source.as_bytes()).map_err(|e| e.to_string())?;
            }
            let pdf = compile_typst_to_pdf(&source).map_err(|e| e.to_string())?;
            write_atomically(output, &pdf).map_err(|e| e.to_string())
        });

    match result {
        Ok(()) => {
            notifier.success(&format!("PDF exported to {}", output.display()));
            Ok(())
        }
        Err(err) => {
            notifier.error("Failed to export PDF. Please try again.");
            Err(err)
        }
    }
}

/// Book preferences first, then the options file, then command-line flags.
fn resolve_config(args: &ExportArgs, book: &Book) -> Result<ExportConfig, String> {
    let mut config = match &args.config {
        Some(path) => ExportConfig::from_file(path).map_err(|e| e.to_string())?,
        None => ExportConfig::for_book(book),
    };

    if let Some(scheme) = &args.scheme {
        config.color_scheme = scheme.clone();
    }
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }
    if let Some(orientation) = args.orientation {
        config.orientation = orientation;
    }
    if let Some(margins) = args.margins {
        config.page_margins = margins;
    }
    if let Some(font) = &args.font {
        config.font_family = FontFamily::from_name(font);
    }
    if let Some(size) = args.font_size {
        config.font_size = size;
    }
    if let Some(spacing) = args.line_spacing {
        config.line_spacing = spacing;
    }
    if let Some(align) = args.align {
        config.text_alignment = align;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    config.drop_caps |= args.drop_caps;
    config.paper_texture_effect |= args.paper_texture;
    config.credits_page |= args.credits;
    config.show_page_numbers &= !args.no_page_numbers;
    config.header_footer &= !args.no_header_footer;
    config.decorative_elements &= !args.no_decorations;
    config.chapter_dividers &= !args.no_dividers;
    config.cover_page &= !args.no_cover;

    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn generate(args: &GenerateArgs) -> Result<(), String> {
    if args.write && !is_json(&args.input) {
        return Err("--write needs a .json book file".to_string());
    }

    let mut book = load_book(&args.input).map_err(|e| e.to_string())?;
    let title = args.title.clone().unwrap_or_else(|| match args.kind {
        ItemKind::Credits => "Credits".to_string(),
        _ => book.title.clone(),
    });

    let mut provider_config = GeminiConfig::from_env().map_err(|e| e.to_string())?;
    if let Some(model) = &args.model {
        provider_config.model = model.clone();
    }
    let provider = GeminiProvider::new(provider_config).map_err(|e| e.to_string())?;

    let generator = ContentGenerator::new(provider, LogNotifier);
    let generated = generator.generate(&book, args.kind, &title, args.description.as_deref());

    if args.write {
        apply_to_book(&mut book, args.kind, &title, generated.text);
        let json = serde_json::to_string_pretty(&book).map_err(|e| e.to_string())?;
        write_atomically(&args.input, json.as_bytes()).map_err(|e| e.to_string())?;
    } else {
        println!("{}", generated.text);
    }
    Ok(())
}

fn print_themes() {
    for scheme in ColorScheme::ALL {
        let palette = scheme.palette();
        println!(
            "{:<12} background {}  text {}  heading {}  accent {}",
            scheme.name(),
            palette.background,
            palette.text,
            palette.heading,
            palette.accent
        );
    }
}
