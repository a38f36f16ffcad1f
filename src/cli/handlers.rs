use std::{
    io::{self, Write},
    time::Instant,
};

use tracing::{debug, info};

use crate::{
    core::{
        color::{Rgb, Theme},
        config::Config,
        data::{normalize, read_series_from_path},
        error::ChartError,
        rng::Lcg,
    },
    live::LiveChart,
    poll::{HttpFetcher, RandomSource, SeriesPoller},
    render::{ChartRenderer, Surface, SvgSurface, write_svg},
};

use super::parse::{CanvasArgs, DemoArgs, RenderArgs, WatchArgs};

/// Endpoint name used for the in-process demo source.
const DEMO_ENDPOINT: &str = "demo://random";

fn build_config(endpoint: &str, interval_secs: u64, c: &CanvasArgs) -> Result<Config, ChartError> {
    let theme = Theme::default().with_accent(Rgb::from_name(&c.color)?);
    Ok(Config::builder(endpoint)
        .interval_secs(interval_secs)
        .canvas(c.width, c.height)
        .theme(theme)
        .build()?)
}

async fn wait_for_ctrl_c() -> Result<(), ChartError> {
    tokio::signal::ctrl_c().await?;
    info!("interrupted");
    Ok(())
}

pub async fn watch(a: WatchArgs) -> Result<(), ChartError> {
    let cfg = build_config(&a.url, a.interval, &a.canvas)?;
    let poller = SeriesPoller::from_config(HttpFetcher::new()?, &cfg);
    let renderer = ChartRenderer::new(cfg.theme);
    let mut surface = SvgSurface::new(&a.canvas.out, cfg.width, cfg.height);

    if a.once {
        let series = poller.try_fetch_once().await?;
        renderer.draw(&series, &mut surface)?;
        info!(points = series.len(), out = %a.canvas.out, "chart written");
        return Ok(());
    }

    let chart = LiveChart::new(poller, renderer, surface);
    let first = chart.start().await?;
    info!(
        points = first.len(),
        out = %a.canvas.out,
        "watching {} every {}s (Ctrl-C to stop)",
        cfg.endpoint,
        cfg.interval.as_secs()
    );
    wait_for_ctrl_c().await?;
    chart.stop();
    Ok(())
}

pub fn render(a: &RenderArgs) -> Result<(), ChartError> {
    let t_ingest = Instant::now();
    let raw = read_series_from_path(&a.file)?;
    let theme = Theme::default().with_accent(Rgb::from_name(&a.canvas.color)?);
    let cfg = Config::builder(&a.file)
        .canvas(a.canvas.width, a.canvas.height)
        .theme(theme)
        .build()?;
    debug!(rows = raw.len(), us = t_ingest.elapsed().as_micros(), "ingest");

    let series = normalize(&raw, cfg.width);
    let frame = ChartRenderer::new(cfg.theme).render(&series, cfg.width, cfg.height);
    if a.canvas.out == "-" {
        let mut stdout = io::stdout().lock();
        write_svg(&frame, &mut stdout)?;
        stdout.flush()?;
    } else {
        SvgSurface::new(&a.canvas.out, cfg.width, cfg.height).draw(&frame)?;
        info!(points = series.len(), out = %a.canvas.out, "chart written");
    }
    Ok(())
}

pub async fn demo(a: DemoArgs) -> Result<(), ChartError> {
    let cfg = build_config(DEMO_ENDPOINT, a.interval, &a.canvas)?;
    let rng = a.seed.map_or_else(Lcg::seed_from_time, Lcg::seed);
    let poller = SeriesPoller::from_config(RandomSource::new(a.points, rng), &cfg);
    let surface = SvgSurface::new(&a.canvas.out, cfg.width, cfg.height);
    let chart = LiveChart::new(poller, ChartRenderer::new(cfg.theme), surface);

    let started = Instant::now();
    chart.start().await?;
    match a.ticks {
        Some(n) => {
            // half a period of slack so the last tick lands before we stop
            let run_for = cfg.interval * n + cfg.interval / 2;
            tokio::select! {
                r = wait_for_ctrl_c() => r?,
                () = tokio::time::sleep(run_for) => {}
            }
        }
        None => wait_for_ctrl_c().await?,
    }
    chart.stop();

    let frames = chart.with_surface(|s| s.frames());
    info!(
        frames,
        elapsed_ms = started.elapsed().as_millis(),
        out = %a.canvas.out,
        "demo complete"
    );
    Ok(())
}

/// Print handy invocations for new users.
pub fn examples() {
    let bin = "series-watch";
    println!(
        "
Example invocations
-------------------
• Poll an endpoint  : {bin} watch --url http://localhost:3000/data
• Slower polling    : {bin} watch --url http://localhost:3000/data --interval 30
• One-shot fetch    : {bin} watch --url http://localhost:3000/data --once -o now.svg
• Render a file     : {bin} render sample.json --width 1024 --height 480
• From stdin        : curl -s http://localhost:3000/data | {bin} render - -o -
• Custom color      : {bin} render sample.json --color #6048c1
• Random live demo  : {bin} demo --points 12 --interval 1 --ticks 10
• Verbose logging   : {bin} --debug demo --seed 7
"
    );
}
