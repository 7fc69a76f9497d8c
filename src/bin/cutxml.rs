use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cutxml", version)]
struct Cli {
    /// Log every probe and placed clip.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a clip manifest into an editor timeline document.
    Export(ExportArgs),
    /// Print the resolved timeline as JSON.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct SourceArgs {
    /// Input manifest JSON (`clips`, optional `editor` and `options`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// ffprobe executable.
    #[arg(long, default_value = "ffprobe")]
    ffprobe: PathBuf,

    /// Integer sequence frame rate.
    #[arg(long)]
    fps: Option<u32>,

    /// Sequence width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Sequence height in pixels.
    #[arg(long)]
    height: Option<u32>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output document path. Defaults to the manifest path with the editor's extension.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Target editor (fcpx, fcp7, premiere, resolve, ...).
    #[arg(long)]
    editor: Option<cutxml::EditorKind>,

    /// Write `/mnt/<drive>/...` media as Windows drive paths.
    #[arg(long)]
    windows_paths: bool,

    /// Music bed placed on a second audio track.
    #[arg(long)]
    audio_track: Option<PathBuf>,

    /// Seconds to skip into the music bed.
    #[arg(long)]
    audio_start: Option<f64>,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    #[command(flatten)]
    source: SourceArgs,
}

#[derive(serde::Deserialize, Debug)]
struct Manifest {
    clips: Vec<cutxml::ClipRequest>,
    #[serde(default)]
    editor: Option<cutxml::EditorKind>,
    #[serde(default)]
    options: cutxml::GeneratorOptions,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn init_logging(verbose: bool) {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn read_manifest(path: &Path) -> anyhow::Result<Manifest> {
    let f = File::open(path).with_context(|| format!("open manifest '{}'", path.display()))?;
    let r = BufReader::new(f);
    let manifest: Manifest =
        serde_json::from_reader(r).with_context(|| "parse manifest JSON")?;
    Ok(manifest)
}

fn build_generator(
    source: &SourceArgs,
    manifest: Manifest,
    apply: impl FnOnce(&mut cutxml::GeneratorOptions),
) -> anyhow::Result<cutxml::Generator> {
    let mut options = manifest.options;
    if let Some(editor) = manifest.editor {
        options.editor = editor;
    }
    if source.fps.is_some() {
        options.sequence_frame_rate = source.fps;
    }
    if source.width.is_some() {
        options.sequence_width = source.width;
    }
    if source.height.is_some() {
        options.sequence_height = source.height;
    }
    apply(&mut options);

    let probe = cutxml::Ffprobe::with_program(&source.ffprobe);
    Ok(cutxml::Generator::with_probe(manifest.clips, options, &probe)?)
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let manifest = read_manifest(&args.source.in_path)?;
    let generator = build_generator(&args.source, manifest, |options| {
        if let Some(editor) = args.editor {
            options.editor = editor;
        }
        if args.windows_paths {
            options.windows_file_paths = true;
        }
        if let Some(track) = &args.audio_track {
            options.audio_track = Some(track.clone());
        }
        if let Some(start) = args.audio_start {
            options.audio_start = Some(cutxml::TimeValue::Seconds(start));
        }
    })?;

    let doc = generator.render()?;
    let out = args
        .out
        .unwrap_or_else(|| args.source.in_path.with_extension(doc.extension()));

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    doc.save(&out)?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let manifest = read_manifest(&args.source.in_path)?;
    let generator = build_generator(&args.source, manifest, |_| {})?;
    let timeline = generator.timeline()?;

    let json = serde_json::to_string_pretty(&timeline).with_context(|| "serialize timeline")?;
    println!("{json}");
    Ok(())
}
