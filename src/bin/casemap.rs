use anyhow::{Context, Result};
use casemap::config::Config;
use casemap::models::SeriesKind;
use casemap::resolve::{self, RegionValue};
use casemap::scale::{self, HOTSPOT_COLOR, PaletteName, QuantileScale};
use casemap::viz::{self, ChartOptions, LegendMode};
use casemap::{CaseRecordStore, Client, LookupError, aggregate, stats, storage};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "casemap",
    version,
    about = "Look up, color-map, chart & summarize state-level case histories and forecasts"
)]
struct Cli {
    /// Dataset JSON to use instead of the bundled one.
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// Config file (TOML). Defaults to <config dir>/casemap/config.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List regions with their codes and series lengths.
    Regions,
    /// Cases by state on a date (history first, forecast after), colored by quantile.
    Heatmap(HeatmapArgs),
    /// Percentage difference between last recorded and last predicted value per state.
    Diff(DiffArgs),
    /// Predicted cases for one state on one date.
    Predict(PredictArgs),
    /// Chart several states against each other.
    Compare(CompareArgs),
    /// Summary statistics per state.
    Stats(StatsArgs),
    /// Score this dataset's forecasts against a later dataset's recorded values.
    Accuracy(AccuracyArgs),
    /// Import tidy CSV (region,kind,date,value) and write it as dataset JSON.
    Import(ImportArgs),
    /// Download a dataset from the forecast service.
    Fetch(FetchArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PaletteArg {
    Greens,
    Reds,
}

impl From<PaletteArg> for PaletteName {
    fn from(p: PaletteArg) -> Self {
        match p {
            PaletteArg::Greens => PaletteName::Greens,
            PaletteArg::Reds => PaletteName::Reds,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Historical,
    Forecast,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LegendArg {
    Inside,
    Right,
    Bottom,
}

/// Options shared by subcommands that write a table and/or a chart.
#[derive(Args, Debug)]
struct OutputArgs {
    /// Save results to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Create a chart at the given path (.svg or .png).
    #[arg(long)]
    plot: Option<PathBuf>,
    /// Width of the plot (config default 1000).
    #[arg(long)]
    width: Option<u32>,
    /// Height of the plot (config default 600).
    #[arg(long)]
    height: Option<u32>,
    /// Locale for number labels (en, de, fr, es, it, hi).
    #[arg(long)]
    locale: Option<String>,
    /// Chart caption.
    #[arg(long)]
    title: Option<String>,
}

#[derive(Args, Debug)]
struct HeatmapArgs {
    /// Date (YYYY-MM-DD).
    #[arg(short, long)]
    date: String,
    #[arg(long, value_enum)]
    palette: Option<PaletteArg>,
    /// Do not highlight the state with the most cases.
    #[arg(long, default_value_t = false)]
    no_hotspot: bool,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct DiffArgs {
    /// Number of trailing recorded days kept per state.
    #[arg(long, default_value_t = aggregate::LAST_N_DAYS)]
    window: usize,
    #[arg(long, value_enum)]
    palette: Option<PaletteArg>,
    /// Print the trailing days as well.
    #[arg(long, default_value_t = false)]
    show_window: bool,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct PredictArgs {
    /// State name or code.
    #[arg(short, long, default_value = "Andaman and Nicobar Islands")]
    state: String,
    /// Date (YYYY-MM-DD).
    #[arg(short, long)]
    date: String,
}

#[derive(Args, Debug)]
struct CompareArgs {
    /// State names or codes separated by comma or semicolon.
    #[arg(short, long)]
    states: String,
    /// Continue each state with its forecast.
    #[arg(long, default_value_t = false)]
    forecast: bool,
    #[arg(long, value_enum, default_value_t = LegendArg::Bottom)]
    legend: LegendArg,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct StatsArgs {
    #[arg(long, value_enum, default_value_t = KindArg::Historical)]
    kind: KindArg,
}

#[derive(Args, Debug)]
struct AccuracyArgs {
    /// Later dataset whose recorded values cover this dataset's forecast dates.
    #[arg(long)]
    actual: PathBuf,
}

#[derive(Args, Debug)]
struct ImportArgs {
    /// Tidy CSV file.
    #[arg(long)]
    csv: PathBuf,
    /// Where to write the dataset JSON.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// Last recorded day (YYYY-MM-DD); the forecast covers the week after it.
    #[arg(long)]
    cutoff: String,
    /// Service base URL (config default http://127.0.0.1:8000).
    #[arg(long)]
    url: Option<String>,
    /// Where to write the dataset JSON.
    #[arg(long)]
    out: PathBuf,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 2 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.2}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let data = cli.data.clone().or_else(|| config.dataset.clone());
    let store = || load_store(data.as_deref());

    match cli.cmd {
        Command::Regions => cmd_regions(&store()?),
        Command::Heatmap(args) => cmd_heatmap(args, &store()?, &config),
        Command::Diff(args) => cmd_diff(args, &store()?, &config),
        Command::Predict(args) => cmd_predict(args, &store()?),
        Command::Compare(args) => cmd_compare(args, &store()?, &config),
        Command::Stats(args) => cmd_stats(args, &store()?),
        Command::Accuracy(args) => cmd_accuracy(args, &store()?),
        Command::Import(args) => cmd_import(args),
        Command::Fetch(args) => cmd_fetch(args, &config),
    }
}

fn load_store(path: Option<&Path>) -> Result<CaseRecordStore> {
    match path {
        Some(p) => CaseRecordStore::load(p).with_context(|| format!("load dataset {}", p.display())),
        None => CaseRecordStore::bundled().context("load bundled dataset"),
    }
}

fn chart_options(o: &OutputArgs, config: &Config) -> ChartOptions {
    ChartOptions {
        width: o.width.unwrap_or(config.chart.width),
        height: o.height.unwrap_or(config.chart.height),
        locale: o.locale.clone().unwrap_or_else(|| config.chart.locale.clone()),
        title: o.title.clone(),
        ..ChartOptions::default()
    }
}

fn out_format(o: &OutputArgs, path: &Path) -> String {
    let fmt = match o.format {
        Some(OutFormat::Csv) => "csv",
        Some(OutFormat::Json) => "json",
        None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
    };
    fmt.to_ascii_lowercase()
}

fn cmd_regions(store: &CaseRecordStore) -> Result<()> {
    for r in store.records() {
        println!(
            "{:<4} {:<28} historical={:<4} forecast={}",
            r.region.code.as_deref().unwrap_or("-"),
            r.region.name,
            r.historical.len(),
            r.forecast.len()
        );
    }
    Ok(())
}

fn cmd_heatmap(args: HeatmapArgs, store: &CaseRecordStore, config: &Config) -> Result<()> {
    let snapshot: Vec<RegionValue> = resolve::snapshot(store, &args.date);
    if !resolve::has_data(&snapshot) {
        println!("No data available for the selected date.");
        return Ok(());
    }
    let palette = args.palette.map(PaletteName::from).unwrap_or(config.map.palette);
    let domain: Vec<f64> = snapshot.iter().filter_map(|r| r.value).collect();
    let mut scale = QuantileScale::build(&domain, palette.colors());
    if config.map.hotspot && !args.no_hotspot {
        scale = scale.with_hotspot(HOTSPOT_COLOR);
    }
    let rows = scale::paint(snapshot.iter().map(|r| (&r.region, r.value)), &scale);

    println!("Cases by State up to {}", args.date);
    for r in &rows {
        println!(
            "{:<4} {:<28} {:>12} {}{}",
            r.region.code.as_deref().unwrap_or("-"),
            r.region.name,
            fmt_opt(r.value),
            r.color,
            if r.hotspot { "  <- hotspot" } else { "" }
        );
    }

    write_output(&args.output, |path, fmt| match fmt {
        "csv" => storage::save_snapshot_csv(&rows, path),
        "json" => storage::save_snapshot_json(&rows, path),
        other => anyhow::bail!("unsupported format: {}", other),
    })?;
    if let Some(plot_path) = args.output.plot.as_ref() {
        let mut opts = chart_options(&args.output, config);
        if opts.title.is_none() {
            opts.title = Some(format!("Cases by State up to {}", args.date));
        }
        viz::plot_choropleth_bars(&rows, &scale, plot_path, &opts)?;
        eprintln!("Wrote plot to {}", plot_path.display());
    }
    Ok(())
}

fn cmd_diff(args: DiffArgs, store: &CaseRecordStore, config: &Config) -> Result<()> {
    let mut aggs = Vec::new();
    for r in store.records() {
        match aggregate::try_compute_window(r, args.window) {
            Ok(a) => aggs.push(a),
            Err(e) => log::info!("skipping {}: {e}", r.region.name),
        }
    }

    println!("Percentage difference of Cases (Last Past vs Last Predicted)");
    for a in &aggs {
        println!(
            "{:<4} {:<28} past={:>12} predicted={:>14} diff={:>8}%",
            a.region.code.as_deref().unwrap_or("-"),
            a.region.name,
            fmt_opt(Some(a.latest_historical)),
            fmt_opt(Some(a.latest_forecast)),
            format!("{:.2}", a.percentage_difference),
        );
        if args.show_window {
            for o in &a.last_7_days {
                println!("       {}  {}", o.date, fmt_opt(Some(o.value)));
            }
        }
    }

    write_output(&args.output, |path, fmt| match fmt {
        "csv" => storage::save_aggregates_csv(&aggs, path),
        "json" => storage::save_aggregates_json(&aggs, path),
        other => anyhow::bail!("unsupported format: {}", other),
    })?;
    if let Some(plot_path) = args.output.plot.as_ref() {
        // Colored by the latest recorded value, like the difference map.
        let palette = args.palette.map(PaletteName::from).unwrap_or(PaletteName::Reds);
        let domain: Vec<f64> = aggs.iter().map(|a| a.latest_historical).collect();
        let scale = QuantileScale::build(&domain, palette.colors());
        let rows = scale::paint(aggs.iter().map(|a| (&a.region, Some(a.latest_historical))), &scale);
        let mut opts = chart_options(&args.output, config);
        if opts.title.is_none() {
            opts.title = Some("Latest recorded cases by State".to_string());
        }
        viz::plot_choropleth_bars(&rows, &scale, plot_path, &opts)?;
        eprintln!("Wrote plot to {}", plot_path.display());
    }
    Ok(())
}

fn cmd_predict(args: PredictArgs, store: &CaseRecordStore) -> Result<()> {
    match resolve::predicted_value(store, &args.state, &args.date) {
        Ok(v) => {
            println!("Total Predicted Cases upto {}: {:.0} cases", args.date, v);
            Ok(())
        }
        Err(LookupError::RegionNotFound(_)) => anyhow::bail!("State data not available."),
        Err(LookupError::NoForecast { .. }) | Err(LookupError::InvalidDate(_)) => {
            anyhow::bail!("Predicted data not available for the entered date.")
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_compare(args: CompareArgs, store: &CaseRecordStore, config: &Config) -> Result<()> {
    let states = parse_list(&args.states);
    if states.is_empty() {
        anyhow::bail!("at least one state required");
    }
    let plot_path = args
        .output
        .plot
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("--plot <PATH> is required for compare"))?;
    let mut opts = chart_options(&args.output, config);
    opts.legend = match args.legend {
        LegendArg::Inside => LegendMode::Inside,
        LegendArg::Right => LegendMode::Right,
        LegendArg::Bottom => LegendMode::Bottom,
    };
    viz::plot_compare(store, &states, args.forecast, plot_path, &opts)?;
    eprintln!("Wrote plot to {}", plot_path.display());
    Ok(())
}

fn cmd_stats(args: StatsArgs, store: &CaseRecordStore) -> Result<()> {
    let kind = match args.kind {
        KindArg::Historical => SeriesKind::Historical,
        KindArg::Forecast => SeriesKind::Forecast,
    };
    for s in stats::region_summaries(store, kind) {
        println!(
            "{} • {}  count={}  min={} max={} mean={} median={}",
            s.region.label(),
            s.kind,
            s.count,
            fmt_opt(s.min),
            fmt_opt(s.max),
            fmt_opt(s.mean),
            fmt_opt(s.median)
        );
    }
    Ok(())
}

fn cmd_accuracy(args: AccuracyArgs, predicted: &CaseRecordStore) -> Result<()> {
    let actual = load_store(Some(&args.actual))?;
    let scores = stats::accuracy_by_region(&actual, predicted);
    if scores.is_empty() {
        println!("No overlapping dates between forecast and recorded values.");
        return Ok(());
    }
    for (region, a) in &scores {
        println!(
            "{:<28} n={} MAE={} RMSE={} MAPE={}",
            region.name,
            a.n,
            fmt_opt(Some(a.mae)),
            fmt_opt(Some(a.rmse)),
            a.mape
                .map(|m| format!("{:.2}%", m * 100.0))
                .unwrap_or_else(|| "NA".to_string())
        );
    }
    Ok(())
}

fn cmd_import(args: ImportArgs) -> Result<()> {
    let store = storage::load_csv(&args.csv)
        .with_context(|| format!("import {}", args.csv.display()))?;
    storage::save_dataset_json(&store, &args.out)?;
    eprintln!("Imported {} regions to {}", store.len(), args.out.display());
    Ok(())
}

fn cmd_fetch(args: FetchArgs, config: &Config) -> Result<()> {
    let base = args.url.unwrap_or_else(|| config.service.base_url.clone());
    let store = Client::with_base_url(&base).fetch_dataset(&args.cutoff)?;
    storage::save_dataset_json(&store, &args.out)?;
    eprintln!("Saved {} regions to {}", store.len(), args.out.display());
    Ok(())
}

/// Run `save(path, format)` when `--out` was given.
fn write_output<F>(o: &OutputArgs, save: F) -> Result<()>
where
    F: FnOnce(&Path, &str) -> Result<()>,
{
    if let Some(path) = o.out.as_ref() {
        let fmt = out_format(o, path);
        save(path, fmt.as_str())?;
        eprintln!("Saved results to {}", path.display());
    }
    Ok(())
}
