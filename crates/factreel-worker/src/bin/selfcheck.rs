use std::path::Path;

use factreel_worker::{credentials_from_env, read_prompt_file, PipelineConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = PipelineConfig::from_env();

    println!(
        "factreel-selfcheck: starting with output_dir={}",
        config.output_dir.display()
    );
    ensure_output_dir(&config.output_dir).await?;
    ensure_readable(&config.prompt_file).await?;
    ensure_readable(&config.prompt_template_file).await?;
    ensure_credentials()?;

    println!("factreel-selfcheck: ok");
    Ok(())
}

async fn ensure_output_dir(path: &Path) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| anyhow::anyhow!("output dir {} not usable: {}", path.display(), e))
}

async fn ensure_readable(path: &Path) -> anyhow::Result<()> {
    read_prompt_file(path).await?;
    Ok(())
}

fn ensure_credentials() -> anyhow::Result<()> {
    credentials_from_env()?;
    Ok(())
}
