use clap::{Args, Parser, Subcommand};

/// Top-level CLI structure.
#[derive(Parser)]
#[command(
    name = "series-watch",
    about = "Poll a labeled numeric series and redraw it as an SVG line chart"
)]
pub struct Cli {
    /// Log every tick, including unchanged ones
    #[arg(long, global = true)]
    pub debug: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "debug")]
    pub quiet: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Poll an HTTP endpoint and rewrite the chart whenever the data changes
    Watch(WatchArgs),
    /// Render a local `{ "data": [...] }` JSON document once
    Render(RenderArgs),
    /// Drive the live pipeline from an in-process random source
    Demo(DemoArgs),
    /// Print example invocations
    Examples,
}

/// Output canvas shared by every subcommand that draws.
#[derive(Args, Debug)]
pub struct CanvasArgs {
    /// Canvas width in pixels
    #[arg(long, default_value_t = 800.0)]
    pub width: f64,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 400.0)]
    pub height: f64,

    /// Output SVG path
    #[arg(short, long, default_value = "chart.svg")]
    pub out: String,

    /// Line and marker color (name or `#RRGGBB`)
    #[arg(long, default_value = "blue")]
    pub color: String,
}

/// `series-watch watch …`
#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Endpoint serving `{ "data": [{ "x": …, "value": … }] }`
    #[arg(long)]
    pub url: String,

    /// Seconds between polls
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// Fetch and draw once, then exit
    #[arg(long)]
    pub once: bool,

    #[command(flatten)]
    pub canvas: CanvasArgs,
}

/// `series-watch render …`
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// JSON path (use `-` for stdin)
    #[arg(value_name = "FILE", default_value = "-")]
    pub file: String,

    #[command(flatten)]
    pub canvas: CanvasArgs,
}

/// `series-watch demo …`
#[derive(Parser, Debug)]
pub struct DemoArgs {
    /// Points per generated series
    #[arg(long, default_value_t = 10)]
    pub points: usize,

    /// Seconds between polls
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// Stop after this many ticks (runs until Ctrl-C when omitted)
    #[arg(long)]
    pub ticks: Option<u32>,

    /// Seed for reproducible data
    #[arg(long)]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub canvas: CanvasArgs,
}
