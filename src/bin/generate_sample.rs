use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

/// Seeded SplitMix64 stream; reproducible across platforms.
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in [-1, 1).
    fn symmetric(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 52) as f64 - 1.0
    }

    /// Normal deviate via the Marsaglia polar method.
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        loop {
            let (u, v) = (self.symmetric(), self.symmetric());
            let s = u * u + v * v;
            if s > 0.0 && s < 1.0 {
                return mean + std_dev * u * (-2.0 * s.ln() / s).sqrt();
            }
        }
    }
}

/// One observation: three correlated measurements and a group label.
struct Row {
    a: f64,
    b: f64,
    c: f64,
    group: &'static str,
}

fn generate_rows(rng: &mut SampleRng, per_group: usize) -> Vec<Row> {
    // (label, centre of a, slope of b on a)
    let groups = [("control", 10.0, 1.5), ("treated", 14.0, 0.8)];

    let mut rows = Vec::with_capacity(per_group * groups.len());
    for &(group, centre, slope) in &groups {
        for _ in 0..per_group {
            let a = rng.normal(centre, 2.0);
            let b = slope * a + rng.normal(0.0, 1.5);
            let c = rng.normal(50.0, 8.0) - 0.5 * a;
            rows.push(Row { a, b, c, group });
        }
    }
    rows
}

/// Comma-separated with a header and a grouping column `z`; a few cells
/// are left empty to exercise missing-value handling.
fn write_grouped_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["a", "b", "c", "z"])?;
    for (i, row) in rows.iter().enumerate() {
        let c = if i % 17 == 5 {
            String::new()
        } else {
            format!("{:.3}", row.c)
        };
        writer.write_record([
            format!("{:.3}", row.a),
            format!("{:.3}", row.b),
            c,
            row.group.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Whitespace-aligned columns preceded by `#` comment lines.
fn write_whitespace_table(path: &Path, rows: &[Row]) -> Result<()> {
    let mut file =
        fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    writeln!(file, "# synthetic measurements")?;
    writeln!(file, "# columns: a b c")?;
    writeln!(file, "{:>10} {:>10} {:>10}", "a", "b", "c")?;
    for row in rows {
        writeln!(file, "{:>10.3} {:>10.3} {:>10.3}", row.a, row.b, row.c)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SampleRng(42);
    let rows = generate_rows(&mut rng, 60);

    let dir = Path::new("data");
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let grouped = dir.join("sample_groups.csv");
    write_grouped_csv(&grouped, &rows)?;
    log::info!("wrote {}", grouped.display());

    let spaced = dir.join("sample_whitespace.csv");
    write_whitespace_table(&spaced, &rows)?;
    log::info!("wrote {}", spaced.display());

    println!(
        "Wrote {} rows to {} and {}",
        rows.len(),
        grouped.display(),
        spaced.display()
    );
    Ok(())
}
