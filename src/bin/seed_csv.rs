use anyhow::Result;

fn main() -> Result<()> {
    let path = std::path::Path::new("dev/csv");
    std::fs::create_dir_all(path)?;
    let csv_path = path.join("sample_data.csv");

    // flexible so the short and long lines below can be written as-is
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(&csv_path)?;
    let rows: &[&[&str]] = &[
        &["id", "name", "value"],
        &["1", "Alpha", "10.2"],
        &["2", "Beta", "20.5"],
        &["3", "Gamma", "30.7"],
        &["4", "Delta, the fourth", "40.0"],
        &["2", "Beta2", "99.9"],
        &["5", "Epsilon"],
        &["6", "Zeta", "60.1", "extra"],
        &["x", "NotAnId", "1.5"],
        &["7", "NotAValue", "y"],
    ];
    for row in rows {
        writer.write_record(*row)?;
    }
    writer.flush()?;

    println!("Seeded CSV at {}", csv_path.display());
    Ok(())
}
