use anyhow::Context;

fn main() -> anyhow::Result<()> {
    let root = std::env::current_dir().context("cannot determine the site root")?;
    let report = finanzas_lib::run(&root).context("site build failed")?;
    for locale in &report.built {
        println!(
            "{}: {} pages, {} assets -> {}",
            locale.code,
            locale.pages.len(),
            locale.assets.len(),
            locale.archive.display()
        );
    }
    for code in &report.skipped {
        println!("{code}: skipped (no missions)");
    }
    Ok(())
}
