use futures::executor::block_on;
use massmail_core::{
    ClusterId, ConfigLayer, Dataset, DropTarget, EmailId, FileSource, InlineSource, LayoutConfig,
    LayoutMode, apply_drop, fetch_dataset, move_email_to_cluster,
};
use massmail_layout::{ExplorerState, RelaxOptions, relax};
use massmail_render::{SvgRenderOptions, build_scene, render_svg};
use serde::Serialize;
use serde_json::json;
use std::io::Read;
use std::str::FromStr;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Core(massmail_core::Error),
    Layout(massmail_layout::Error),
    Render(massmail_render::Error),
    Json(serde_json::Error),
    UnknownCluster(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Core(err) => write!(f, "{err}"),
            CliError::Layout(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::UnknownCluster(key) => write!(f, "no cluster with id `{key}`"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<massmail_core::Error> for CliError {
    fn from(value: massmail_core::Error) -> Self {
        Self::Core(value)
    }
}

impl From<massmail_layout::Error> for CliError {
    fn from(value: massmail_layout::Error) -> Self {
        Self::Layout(value)
    }
}

impl From<massmail_render::Error> for CliError {
    fn from(value: massmail_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Render,
    Move,
    Drop,
    Relax,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    mode: LayoutMode,
    keywords: Vec<String>,
    render_format: RenderFormat,
    render_scale: f32,
    out: Option<String>,
    email: Option<usize>,
    cluster: Option<String>,
    iterations: Option<usize>,
    config: Option<String>,
    canvas_width: Option<f64>,
    row_width: Option<f64>,
    padding: Option<f64>,
}

fn usage() -> &'static str {
    "massmail-cli\n\
\n\
USAGE:\n\
  massmail-cli [layout] [--mode original|exploded] [--keywords <a,b,..>] [--pretty] [<path>|-]\n\
  massmail-cli render [--mode original|exploded] [--keywords <a,b,..>] [--format svg|png] [--scale <n>] [--out <path>] [<path>|-]\n\
  massmail-cli move --email <index> --cluster <id> [--pretty] [--out <path>] [<path>|-]\n\
  massmail-cli drop --email <index> [--cluster <id>] [--pretty] [--out <path>] [<path>|-]\n\
  massmail-cli relax [--iterations <n>] [--pretty] [--out <path>] [<path>|-]\n\
\n\
COMMON FLAGS:\n\
  --config <file.json>   layout configuration overrides\n\
  --canvas-width <w>     view.canvasWidth\n\
  --row-width <w>        exploded.rowWidthLimit\n\
  --padding <p>          hull.padding\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the dataset is read from stdin.\n\
  - layout prints the scene JSON (positions, outlines, label anchors, emphasis).\n\
  - move, drop and relax print the updated dataset JSON.\n\
  - drop without --cluster drops onto empty space: the email is split into a new cluster\n\
    unless it is the only member of its cluster.\n\
  - PNG output defaults to writing next to the input file (or ./out.png for stdin).\n\
  - Set MASSMAIL_LOG (e.g. MASSMAIL_LOG=debug) to adjust logging on stderr.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_number<T: FromStr>(raw: &str) -> Result<T, CliError> {
    raw.parse::<T>().map_err(|_| CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        render_scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "move" => args.command = Command::Move,
            "drop" => args.command = Command::Drop,
            "relax" => args.command = Command::Relax,
            "--pretty" => args.pretty = true,
            "--mode" => {
                args.mode = next_value(&mut it)?
                    .parse::<LayoutMode>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--keywords" => {
                args.keywords = next_value(&mut it)?
                    .split(',')
                    .map(str::trim)
                    .filter(|w| !w.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "--format" => {
                args.render_format = next_value(&mut it)?
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                args.render_scale = parse_number(next_value(&mut it)?)?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
            "--email" => args.email = Some(parse_number(next_value(&mut it)?)?),
            "--cluster" => args.cluster = Some(next_value(&mut it)?.clone()),
            "--iterations" => args.iterations = Some(parse_number(next_value(&mut it)?)?),
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--canvas-width" => args.canvas_width = Some(parse_number(next_value(&mut it)?)?),
            "--row-width" => args.row_width = Some(parse_number(next_value(&mut it)?)?),
            "--padding" => args.padding = Some(parse_number(next_value(&mut it)?)?),
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if matches!(args.command, Command::Move | Command::Drop) && args.email.is_none() {
        return Err(CliError::Usage(usage()));
    }
    if matches!(args.command, Command::Move) && args.cluster.is_none() {
        return Err(CliError::Usage(usage()));
    }

    Ok(args)
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("MASSMAIL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn read_dataset(input: Option<&str>) -> Result<Dataset, CliError> {
    let dataset = match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            block_on(fetch_dataset(&InlineSource(buf)))?
        }
        Some(path) => block_on(fetch_dataset(&FileSource::new(path)))?,
    };
    Ok(dataset)
}

fn load_config(args: &Args) -> Result<LayoutConfig, CliError> {
    let mut layer = match &args.config {
        Some(path) => ConfigLayer::from_json_str(&std::fs::read_to_string(path)?)?,
        None => ConfigLayer::empty_object(),
    };
    if let Some(w) = args.canvas_width {
        layer.set_value("view.canvasWidth", json!(w));
    }
    if let Some(w) = args.row_width {
        layer.set_value("exploded.rowWidthLimit", json!(w));
    }
    if let Some(p) = args.padding {
        layer.set_value("hull.padding", json!(p));
    }
    Ok(LayoutConfig::with_overrides(&layer)?)
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> std::path::PathBuf {
    match input {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension(ext),
        _ => std::path::PathBuf::from(format!("out.{ext}")),
    }
}

fn render_svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>, CliError> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|_| CliError::Usage("failed to parse SVG for PNG rendering"))?;

    // usvg already maps the root viewBox (including a negative min corner) onto (0,0).
    let size = tree.size();
    let width_px = (size.width() * scale).ceil().max(1.0) as u32;
    let height_px = (size.height() * scale).ceil().max(1.0) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px).ok_or(CliError::Usage(
        "failed to allocate pixmap for raster rendering",
    ))?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    pixmap
        .encode_png()
        .map_err(|_| CliError::Usage("failed to encode PNG"))
}

fn explorer(args: &Args, dataset: Dataset) -> Result<ExplorerState, CliError> {
    let mut state = ExplorerState::new(dataset, load_config(args)?);
    state.set_mode(args.mode);
    state.select_keywords(args.keywords.iter().cloned());
    Ok(state)
}

fn resolve_cluster(dataset: &Dataset, key: &str) -> Result<ClusterId, CliError> {
    dataset
        .cluster_by_key(key)
        .map(|c| c.id.clone())
        .ok_or_else(|| CliError::UnknownCluster(key.to_string()))
}

fn run(args: Args) -> Result<(), CliError> {
    let dataset = read_dataset(args.input.as_deref())?;
    tracing::debug!(
        clusters = dataset.cluster_count(),
        emails = dataset.emails().len(),
        "dataset loaded"
    );

    match args.command {
        Command::Layout => {
            let mut state = explorer(&args, dataset)?;
            let scene = build_scene(&mut state);
            write_json(&scene, args.pretty)?;
            Ok(())
        }
        Command::Render => {
            let mut state = explorer(&args, dataset)?;
            let scene = build_scene(&mut state);
            let svg = render_svg(&scene, &SvgRenderOptions::default());

            match args.render_format {
                RenderFormat::Svg => {
                    write_text(&svg, args.out.as_deref())?;
                }
                RenderFormat::Png => {
                    let bytes = render_svg_to_png(&svg, args.render_scale)?;
                    let out = args.out.clone().unwrap_or_else(|| {
                        default_raster_out_path(args.input.as_deref(), "png")
                            .to_string_lossy()
                            .to_string()
                    });
                    if out == "-" {
                        use std::io::Write;
                        std::io::stdout().lock().write_all(&bytes)?;
                    } else {
                        std::fs::write(out, bytes)?;
                    }
                }
            }
            Ok(())
        }
        Command::Move => {
            let (Some(email), Some(key)) = (args.email, args.cluster.as_deref()) else {
                return Err(CliError::Usage(usage()));
            };
            let target = resolve_cluster(&dataset, key)?;
            let next = move_email_to_cluster(&dataset, EmailId::new(email), &target)?;
            write_text(&next.to_json_string(args.pretty)?, args.out.as_deref())
        }
        Command::Drop => {
            let Some(email) = args.email else {
                return Err(CliError::Usage(usage()));
            };
            let target = match args.cluster.as_deref() {
                Some(key) => DropTarget::Cluster(resolve_cluster(&dataset, key)?),
                None => DropTarget::EmptySpace,
            };
            let (next, outcome) = apply_drop(&dataset, EmailId::new(email), &target)?;
            tracing::info!(email, ?outcome, "drop applied");
            write_text(&next.to_json_string(args.pretty)?, args.out.as_deref())
        }
        Command::Relax => {
            let mut options = RelaxOptions::default();
            if let Some(n) = args.iterations {
                options.iterations = n;
            }
            let next = relax(&dataset, &options)?;
            write_text(&next.to_json_string(args.pretty)?, args.out.as_deref())
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_logging();

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
