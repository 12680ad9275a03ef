use clusterview::cluster::{Clustering, Dbscan, Kmeans};
use clusterview::datasets::make_blobs;
use clusterview::pipeline::{ModelRef, Pipeline, StandardScaler, Transform};
use clusterview::plot::{plot_decision_boundary_with, PlotConfig};
use clusterview::reduce::{ReducerChoice, ReducerKind};
use ndarray::array;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    // Four blobs in 5D; the plot shows them in the first two principal components.
    let centers = array![
        [0.0, 0.0, 0.0, 0.0, 0.0],
        [8.0, 1.0, 0.0, 2.0, 0.0],
        [1.0, 9.0, 3.0, 0.0, 1.0],
        [7.0, 8.0, -3.0, 1.0, 2.0],
    ];
    let (x, _) = make_blobs(centers.view(), 60, 1.2, 42)?;

    // K-means behind a scaler: centers come from the model.
    let scaler = StandardScaler::fit(x.view())?;
    let pipe = Pipeline::fit_cluster(
        x.view(),
        vec![("scale".to_string(), Box::new(scaler) as Box<dyn Transform>)],
        "kmeans",
        &Kmeans::new(4).with_seed(7),
    )?;
    let plot = plot_decision_boundary_with(
        x.view(),
        (&pipe).into(),
        ReducerChoice::default(),
        &PlotConfig::new().with_title("k-means (scaled), PCA"),
    )?;
    plot.render_svg("kmeans_boundary.svg")?;
    println!("kmeans_boundary.svg: {} clusters", plot.palette().len());

    // DBSCAN has no centers: per-label means stand in for them.
    let dbscan = Dbscan::new(2.5, 5).fit(x.view())?;
    let plot = plot_decision_boundary_with(
        x.view(),
        ModelRef::Bare(&dbscan),
        ReducerChoice::Kind(ReducerKind::WhitenedPca),
        &PlotConfig::new().with_title("DBSCAN, whitened PCA"),
    )?;
    plot.render_svg("dbscan_boundary.svg")?;
    println!("dbscan_boundary.svg: {} clusters", plot.palette().len());

    Ok(())
}
