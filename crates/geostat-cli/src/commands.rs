use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::info;

use geostat_catalogue::{Catalogue, default_catalogue_path};
use geostat_ingest::{FileFeatureSource, FileRowSource};
use geostat_model::VariableSpec;
use geostat_pipeline::{GeographySummary, Orchestrator, PipelineResult, RunOutcome, Selection};

use crate::cli::{MapArgs, QueryArgs, SummaryArgs, VariablesArgs};
use crate::summary::{
    geographies_table, geography_summary_table, join_summary_table, legend_table, query_table,
    variables_table,
};

pub fn load_catalogue(path: Option<&Path>) -> Result<Catalogue> {
    let path = path.map_or_else(default_catalogue_path, Path::to_path_buf);
    Catalogue::load(&path).with_context(|| format!("load catalogue {}", path.display()))
}

pub fn run_variables(catalogue: &Catalogue, args: &VariablesArgs) -> Result<()> {
    let variables: Vec<&VariableSpec> = match args.category.as_deref() {
        Some(category) => {
            let variables: Vec<_> = catalogue.variables_in(category, None).collect();
            if variables.is_empty() {
                bail!(
                    "no variables in category {category:?}; categories: {}",
                    catalogue.categories().join(", ")
                );
            }
            variables
        }
        None => catalogue.variables().iter().collect(),
    };
    println!("{}", variables_table(&variables));
    Ok(())
}

pub fn run_geographies(catalogue: &Catalogue) -> Result<()> {
    println!("{}", geographies_table(catalogue));
    println!("* initial geography");
    Ok(())
}

pub fn run_query(catalogue: &Catalogue, args: &QueryArgs) -> Result<()> {
    let layer = catalogue.geography(&args.geography)?;
    let spec = catalogue.variable(&args.variable)?;
    let year = args.year.unwrap_or(catalogue.settings().year);
    let plan = catalogue.query_plan(spec, layer, year);
    println!("{}", query_table(plan.requests()));
    Ok(())
}

/// Runs one selection against file-backed sources.
pub fn map_selection(catalogue: Catalogue, args: &MapArgs) -> Result<Arc<PipelineResult>> {
    let mut rows = FileRowSource::new(&args.rows);
    if let Some(base) = &args.base_rows {
        rows = rows.with_base(base);
    }
    let features = FileFeatureSource::from_file(&args.features);
    let orchestrator = Orchestrator::new(Arc::new(catalogue), Arc::new(rows), Arc::new(features));

    let mut selection = Selection::new(&args.geography, args.variable.clone());
    if let Some(year) = args.year {
        selection = selection.with_year(year);
    }
    if let Some(class_count) = args.class_count {
        selection = selection.with_class_count(class_count);
    }
    if let Some(method) = args.method {
        selection = selection.with_method(method);
    }

    match runtime()?.block_on(orchestrator.select(selection)) {
        RunOutcome::Ready(result) => Ok(result),
        RunOutcome::Failed(error) => Err(error).context("map run failed"),
        RunOutcome::Superseded { seq, latest } => {
            bail!("run {seq} was superseded by run {latest}")
        }
    }
}

/// Resolves the catalogue's summary variables for one geography.
pub fn geography_summary(catalogue: Catalogue, args: &SummaryArgs) -> Result<GeographySummary> {
    if catalogue.settings().summary_variables.is_empty() {
        bail!("the catalogue lists no summary variables");
    }
    let mut rows = FileRowSource::new(&args.rows);
    if let Some(base) = &args.base_rows {
        rows = rows.with_base(base);
    }
    // Summaries never load polygons.
    let features = FileFeatureSource::from_dir(".");
    let orchestrator = Orchestrator::new(Arc::new(catalogue), Arc::new(rows), Arc::new(features));
    runtime()?
        .block_on(orchestrator.summarize(&args.geography, &args.code, args.year))
        .with_context(|| format!("summary of {} {} failed", args.geography, args.code))
}

pub fn run_summary(catalogue: Catalogue, args: &SummaryArgs) -> Result<()> {
    let summary = geography_summary(catalogue, args)?;
    println!(
        "{} {} ({})\n{}",
        summary.layer.label,
        summary.geo_code,
        summary.year,
        geography_summary_table(&summary)
    );
    Ok(())
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start async runtime")
}

pub fn run_map(catalogue: Catalogue, args: &MapArgs) -> Result<()> {
    let result = map_selection(catalogue, args)?;
    let collection = serde_json::to_string_pretty(&result.feature_collection())
        .context("serialize feature collection")?;

    let tables = format!(
        "{} ({}, {})\n{}\n{}",
        result.spec.key,
        result.layer.label,
        result.year,
        legend_table(&result.legend),
        join_summary_table(&result.summary)
    );
    match &args.output {
        Some(path) => {
            std::fs::write(path, collection)
                .with_context(|| format!("write {}", path.display()))?;
            println!("{tables}");
            info!(path = %path.display(), features = result.features.len(), "wrote map");
        }
        None => {
            // Keep stdout parseable as GeoJSON.
            eprintln!("{tables}");
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{collection}").context("write feature collection")?;
            stdout.flush().context("flush stdout")?;
        }
    }
    Ok(())
}
