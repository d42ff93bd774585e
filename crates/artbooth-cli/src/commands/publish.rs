use super::run::{code_file_name, write};
use crate::bootstrap::{self, Paths};
use anyhow::{Context, Result};
use artbooth_core::publish::Artifact;
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;

pub struct PublishArgs {
    pub file: PathBuf,
    pub label: String,
}

/// Publishes an existing image and writes its QR code next to it.
pub async fn run(paths: &Paths, args: PublishArgs) -> Result<()> {
    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let config = bootstrap::load_config(paths)?;
    let secrets = bootstrap::load_secrets(paths).await?;
    let publisher = bootstrap::publisher(&config, &secrets)?;

    let artifact = Artifact::new(Arc::<[u8]>::from(bytes), args.label, Local::now());
    let publication = publisher.publish_artifact(&artifact).await?;

    let dir = args
        .file
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let code_path = write(&dir, &code_file_name(artifact.file_name()), &publication.scannable_code).await?;

    println!("{}", publication.reference);
    eprintln!("Saved {} (via {})", code_path.display(), publication.strategy);
    Ok(())
}
