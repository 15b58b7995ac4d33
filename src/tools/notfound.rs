//! Turns the flocks BFE missed into a point dataset.
//!
//! The checker writes every flock found by only one finder as a line of
//! space-separated point ids. This collects the points behind those ids so
//! the affected region can be rerun or plotted on its own.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct NotFoundArgs {
    /// Distance threshold of the run
    #[arg(short, long)]
    pub epsilon: f64,

    /// Minimum flock size of the run
    #[arg(short, long)]
    pub mu: u32,

    /// Minimum flock duration of the run
    #[arg(short, long)]
    pub delta: u32,

    /// Pointset the flocks were found in (`id\tx\ty` per line)
    #[arg(short, long)]
    pub pointset: PathBuf,

    /// Not-found flocks, one per line
    #[arg(short, long, default_value = "/tmp/NotFound.flocks")]
    pub input: PathBuf,

    /// Directory the dataset is written to
    #[arg(short, long, default_value = "/tmp")]
    pub output_dir: PathBuf,
}

/// A point coordinate.
pub type Point = (f64, f64);

/// Parse a `id\tx\ty` pointset. Blank lines are skipped.
pub fn read_pointset(text: &str) -> Result<HashMap<u64, Point>> {
    let mut points = HashMap::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split('\t');
        let mut next = |what: &str| {
            fields
                .next()
                .ok_or_else(|| anyhow!("line {}: missing {}", n + 1, what))
        };
        let id = next("id")?;
        let x = next("x")?;
        let y = next("y")?;

        let id: u64 = id.trim().parse().with_context(|| format!("line {}: bad id", n + 1))?;
        let x: f64 = x.trim().parse().with_context(|| format!("line {}: bad x", n + 1))?;
        let y: f64 = y.trim().parse().with_context(|| format!("line {}: bad y", n + 1))?;
        points.insert(id, (x, y));
    }
    Ok(points)
}

/// Ids referenced by any flock, each once and in ascending order.
pub fn collect_not_found(flocks: &str) -> Result<BTreeSet<u64>> {
    let mut ids = BTreeSet::new();
    for (n, line) in flocks.lines().enumerate() {
        for id in line.split_whitespace() {
            let id: u64 = id
                .parse()
                .with_context(|| format!("flock {}: bad point id {:?}", n + 1, id))?;
            ids.insert(id);
        }
    }
    Ok(ids)
}

/// `BFENotFounds_E{epsilon}_M{mu}_D{delta}.tsv` inside `dir`.
pub fn output_path(dir: &Path, epsilon: f64, mu: u32, delta: u32) -> PathBuf {
    dir.join(format!("BFENotFounds_E{:?}_M{}_D{}.tsv", epsilon, mu, delta))
}

/// Write one `id\tx\ty\t0` line per id.
pub fn write_dataset<W: Write>(
    out: &mut W,
    ids: &BTreeSet<u64>,
    points: &HashMap<u64, Point>,
) -> Result<()> {
    for id in ids {
        let Some((x, y)) = points.get(id) else {
            bail!("point {} is not in the pointset", id);
        };
        writeln!(out, "{}\t{:?}\t{:?}\t0", id, x, y)?;
    }
    Ok(())
}

/// Run the conversion; returns the written path.
pub fn run(args: &NotFoundArgs) -> Result<PathBuf> {
    let pointset = fs::read_to_string(&args.pointset)
        .with_context(|| format!("Failed to read pointset {}", args.pointset.display()))?;
    let points = read_pointset(&pointset)?;

    let flocks = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read flocks {}", args.input.display()))?;
    let ids = collect_not_found(&flocks)?;

    // Build the whole dataset before touching the output file.
    let mut buf = Vec::new();
    write_dataset(&mut buf, &ids, &points)?;

    let path = output_path(&args.output_dir, args.epsilon, args.mu, args.delta);
    fs::write(&path, buf).with_context(|| format!("Failed to write {}", path.display()))?;

    info!(points = ids.len(), path = %path.display(), "not-found dataset written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINTSET: &str = "1\t10.5\t20.0\n2\t11.0\t21.25\n3\t12.0\t22.0\n\n4\t13.0\t23.0\n";

    #[test]
    fn pointset_parsing() {
        let points = read_pointset(POINTSET).unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points[&2], (11.0, 21.25));
    }

    #[test]
    fn pointset_rejects_short_lines() {
        assert!(read_pointset("1\t10.0\n").is_err());
        assert!(read_pointset("x\t1.0\t2.0\n").is_err());
    }

    #[test]
    fn ids_are_unique_and_sorted() {
        let ids = collect_not_found("3 1 2\n\n2 3 4\n").unwrap();
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn file_name_keeps_float_epsilon() {
        let path = output_path(Path::new("/tmp"), 10.0, 3, 3);
        assert_eq!(path, PathBuf::from("/tmp/BFENotFounds_E10.0_M3_D3.tsv"));
    }

    #[test]
    fn unknown_point_is_an_error() {
        let points = read_pointset(POINTSET).unwrap();
        let ids = collect_not_found("1 99").unwrap();
        assert!(write_dataset(&mut Vec::new(), &ids, &points).is_err());
    }

    #[test]
    fn end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let pointset = dir.path().join("points.tsv");
        let input = dir.path().join("NotFound.flocks");
        fs::write(&pointset, POINTSET).unwrap();
        fs::write(&input, "2 1\n1 3\n").unwrap();

        let args = NotFoundArgs {
            epsilon: 10.0,
            mu: 3,
            delta: 3,
            pointset,
            input,
            output_dir: dir.path().to_path_buf(),
        };
        let path = run(&args).unwrap();

        assert_eq!(path.file_name().unwrap(), "BFENotFounds_E10.0_M3_D3.tsv");
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "1\t10.5\t20.0\t0\n2\t11.0\t21.25\t0\n3\t12.0\t22.0\t0\n"
        );
    }
}
