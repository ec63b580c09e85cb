//! Hierarchical geo point clustering tool
//!
//! Reads geographic points from CSV files, clusters them at a chosen zoom
//! level, and writes one row per resulting cluster.

use clap::Parser;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::path::PathBuf;

mod cluster;


use cluster::{Cluster, ClusterItem, HierarchicalClusterer, LatLng};

#[derive(Parser)]
#[command(name = "hcluster")]
#[command(about = "Hierarchical geo point clustering tool", long_about = None)]
struct Args {
    /// Input CSV file with latitude,longitude columns
    #[arg(short, long, default_value = "points.csv")]
    input: PathBuf,

    /// Output CSV file with clusters (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Zoom level to cluster at (0 = whole world on one tile)
    #[arg(short, long, default_value_t = 0)]
    zoom: u32,

    /// Clustering distance in world units at zoom 0
    #[arg(short = 'c', long, default_value_t = cluster::CLUSTER_PIXEL_DISTANCE)]
    distance: f64,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

/// A CSV row tracked as a clusterable item.
#[derive(Debug, Clone, PartialEq)]
struct GeoPoint {
    position: LatLng,
}

impl ClusterItem for GeoPoint {
    fn position(&self) -> LatLng {
        self.position
    }
}

fn main() {
    let args = Args::parse();

    let points = match read_points(&args.input) {
        Ok(points) => points,
        Err(e) => {
            eprintln!("Error reading CSV: {}", e);
            std::process::exit(1);
        }
    };

    if points.is_empty() {
        eprintln!("No points found in CSV file");
        std::process::exit(1);
    }

    // Debug output (only if debug flag is set)
    if args.debug {
        println!("Read {} points from {:?}", points.len(), args.input);
        println!(
            "Clustering at zoom {} with distance {:.1} world units",
            args.zoom, args.distance
        );
    }

    // Run the clustering pass
    let mut clusterer = HierarchicalClusterer::with_cluster_distance(args.distance);
    clusterer.add_items(points);
    let clusters = clusterer.get_clusters(args.zoom);

    if args.debug {
        println!("Found {} clusters", clusters.len());
    }

    // Write clusters to output (stdout or file)
    match args.output {
        None => {
            write_clusters_to_stdout(&clusters);
        }
        Some(output_file) => {
            if let Err(e) = write_clusters_to_csv(&output_file, &clusters) {
                eprintln!("Error writing CSV: {}", e);
                std::process::exit(1);
            }
            if args.debug {
                println!("Clusters written to {:?}", output_file);
            }
        }
    }
}

/// Reads points from a CSV file
///
/// Expected format: `latitude,longitude` (header row is optional). Rows
/// that do not parse as two floats are skipped.
fn read_points(filename: &PathBuf) -> Result<Vec<GeoPoint>, Box<dyn std::error::Error>> {
    let file = File::open(filename)?;
    let mut reader = ReaderBuilder::new().has_headers(false).from_reader(file);

    let mut points = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.len() < 2 {
            continue;
        }

        let lat = record[0].parse::<f64>();
        let lng = record[1].parse::<f64>();
        if let (Ok(lat), Ok(lng)) = (lat, lng) {
            points.push(GeoPoint {
                position: LatLng::new(lat, lng),
            });
        }
    }

    Ok(points)
}

/// Writes clusters to an output CSV file
///
/// Format: `latitude,longitude,size` with a header row
fn write_clusters_to_csv(
    output_file: &PathBuf,
    clusters: &[Cluster<'_, GeoPoint>],
) -> Result<(), Box<dyn std::error::Error>> {
    let out_file = File::create(output_file)?;
    let mut writer = WriterBuilder::new().from_writer(out_file);

    writer.write_record(["latitude", "longitude", "size"])?;
    for cluster in clusters {
        writer.write_record([
            cluster.position.lat.to_string(),
            cluster.position.lng.to_string(),
            cluster.size().to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes clusters to stdout as a simple list
///
/// Format: `latitude,longitude,size` (one cluster per line)
fn write_clusters_to_stdout(clusters: &[Cluster<'_, GeoPoint>]) {
    for cluster in clusters {
        println!(
            "{},{},{}",
            cluster.position.lat,
            cluster.position.lng,
            cluster.size()
        );
    }
}
