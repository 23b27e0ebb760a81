use anyhow::{Context, bail};
use clap::{Args as ClapArgs, Parser, Subcommand};
use objread_core::{Descriptor, PersistentId, ReadOpts, Registry, SceneModel};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "objread",
    about = "Describe the selected entities of a scene snapshot as JSON",
    version
)]
struct Cli {
    /// Log debug output (OBJREAD_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Only log errors
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Write the selection to a JSON file next to the model (or --out)
    Export(ExportArgs),
    /// Print the selection JSON to stdout
    Print(ReadArgs),
    /// Summarize a JSON document written by export
    Show(ShowArgs),
}

#[derive(ClapArgs, Debug)]
struct ReadArgs {
    /// Scene snapshot (.json)
    scene: PathBuf,
    /// Entity ids to read instead of the snapshot's selection, e.g. 4,2,9
    #[arg(long, value_delimiter = ',')]
    select: Option<Vec<u64>>,
    /// Max group nesting depth whose members are read (at most 60)
    #[arg(long, default_value_t = ReadOpts::default().max_depth)]
    max_depth: usize,
}

#[derive(ClapArgs, Debug)]
struct ExportArgs {
    #[command(flatten)]
    read: ReadArgs,
    /// Output path; defaults to the model path with a .json extension
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct ShowArgs {
    /// Document produced by export
    path: PathBuf,
}

// Exit codes: 1 for errors, 3 when the selection is empty.
const EXIT_NOTHING_SELECTED: i32 = 3;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_tracing(cli.quiet, cli.verbose) {
        eprintln!("objread error: {error:#}");
        std::process::exit(1);
    }
    let res = match cli.cmd {
        Cmd::Export(a) => cmd_export(a),
        Cmd::Print(a) => cmd_print(a),
        Cmd::Show(a) => cmd_show(a),
    };
    if let Err(error) = res {
        eprintln!("objread error: {error:#}");
        std::process::exit(1);
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("OBJREAD_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn load_scene(args: &ReadArgs) -> anyhow::Result<SceneModel> {
    SceneModel::from_json_file(&args.scene)
        .with_context(|| format!("failed to load scene {}", args.scene.display()))
}

fn read(scene: &SceneModel, args: &ReadArgs) -> anyhow::Result<Vec<Descriptor>> {
    let entities = match &args.select {
        Some(ids) => {
            let ids: Vec<PersistentId> = ids.iter().copied().map(PersistentId).collect();
            scene.resolve(&ids)?
        }
        None => scene.selection()?,
    };
    if args.max_depth > ReadOpts::MAX_DEPTH {
        warn!(
            requested = args.max_depth,
            max = ReadOpts::MAX_DEPTH,
            "--max-depth clamped"
        );
    }
    let registry = Registry::new().with_opts(ReadOpts {
        max_depth: args.max_depth,
    });
    Ok(registry.read_selection(entities))
}

fn nothing_selected() -> ! {
    eprintln!("Nothing selected.");
    std::process::exit(EXIT_NOTHING_SELECTED);
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.read)?;
    let descriptors = read(&scene, &args.read)?;
    if descriptors.is_empty() {
        nothing_selected();
    }
    let out = match args.out {
        Some(p) => p,
        None => {
            let Some(model_path) = scene.path.as_deref() else {
                return Err(objread_core::Error::NoDefaultOutput.into());
            };
            objread_core::json_filename(model_path)
        }
    };
    let n = objread_core::save(&descriptors, &out)
        .with_context(|| format!("failed to save {}", out.display()))?;
    info!(path = %out.display(), entities = descriptors.len(), "exported selection");
    println!("wrote {} bytes to {}", n, out.display());
    Ok(())
}

fn cmd_print(args: ReadArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args)?;
    let descriptors = read(&scene, &args)?;
    if descriptors.is_empty() {
        nothing_selected();
    }
    print!("{}", objread_core::to_json_string(&descriptors)?);
    Ok(())
}

fn cmd_show(args: ShowArgs) -> anyhow::Result<()> {
    let docs = objread_core::load(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    if docs.is_empty() {
        bail!("{} describes no entities", args.path.display());
    }
    for (i, d) in docs.iter().enumerate() {
        println!("{}\t{}", i, summary(d));
    }
    Ok(())
}

fn summary(d: &Descriptor) -> String {
    if d.deleted {
        return format!("{}\tdeleted", d.kind);
    }
    let id = d.persistent_id.map(|id| id.to_string()).unwrap_or_default();
    let mut s = format!("{}\t{}", d.kind, id);
    if let Some(name) = &d.name {
        s.push_str(&format!("\t{:?}", name));
    }
    if let Some(children) = &d.children {
        s.push_str(&format!("\t(children={}, total={})", children.len(), d.tree_len() - 1));
    }
    if let Some(edges) = &d.edges {
        s.push_str(&format!("\t(edges={})", edges.len()));
    }
    if let Some(faces) = &d.faces {
        s.push_str(&format!("\t(faces={})", faces.len()));
    }
    if d.truncated == Some(true) {
        s.push_str("\ttruncated");
    }
    s
}
