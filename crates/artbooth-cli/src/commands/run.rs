use crate::bootstrap::{self, Paths};
use anyhow::{Context, Result};
use artbooth_application::SessionRegistry;
use artbooth_core::BoothError;
use std::path::{Path, PathBuf};

pub struct RunArgs {
    pub style: String,
    pub image: PathBuf,
    pub out: PathBuf,
}

pub async fn run(paths: &Paths, args: RunArgs) -> Result<()> {
    let photo = tokio::fs::read(&args.image)
        .await
        .with_context(|| format!("Failed to read {}", args.image.display()))?;

    let registry = SessionRegistry::new(bootstrap::booth_context(paths).await?);
    let session = registry.create().await;

    let selected = session.select_style(&args.style).await?;
    eprintln!("{}: {}", selected.step_label, args.style);
    eprintln!("Processing {} ...", args.image.display());

    tokio::fs::create_dir_all(&args.out)
        .await
        .with_context(|| format!("Failed to create {}", args.out.display()))?;

    let outcome: Result<()> = match session.submit_image(photo).await {
        Ok(_) => {
            let artifact = session
                .download_artifact()
                .await
                .context("Session completed without a result image")?;
            let image_path = write(&args.out, artifact.file_name(), artifact.bytes()).await?;

            let publication = session
                .publication()
                .await
                .context("Session completed without a publication")?;
            let code_name = code_file_name(artifact.file_name());
            let code_path = write(&args.out, &code_name, &publication.scannable_code).await?;

            println!("{}", publication.reference);
            eprintln!("Saved {}", image_path.display());
            eprintln!("Saved {} (via {})", code_path.display(), publication.strategy);
            Ok(())
        }
        Err(BoothError::PublishFailed { reason }) => {
            // Direct download fallback: the image exists, only the code is missing.
            let artifact = session
                .download_artifact()
                .await
                .context("Publishing failed and no result image is available")?;
            let image_path = write(&args.out, artifact.file_name(), artifact.bytes()).await?;
            eprintln!("Publishing failed: {}", reason);
            eprintln!("Saved {} for direct download", image_path.display());
            Ok(())
        }
        Err(err) => Err(err.into()),
    };

    // A run that failed validation cannot be finished; its error wins.
    let finished = registry.finish(session.id()).await;
    outcome?;
    finished?;
    Ok(())
}

pub(crate) fn code_file_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    format!("{}_qr.png", stem)
}

pub(crate) async fn write(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = dir.join(name);
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_file_name() {
        assert_eq!(
            code_file_name("styled_anime_20240102030405.png"),
            "styled_anime_20240102030405_qr.png"
        );
    }

    #[tokio::test]
    async fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "a.png", b"bytes").await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"bytes");
    }
}
