use log::info;
use std::io;
use std::path::{Path, PathBuf};

const CACHE_DIR_NAME: &str = "mintemp_cache";

pub fn get_cache_dir() -> io::Result<PathBuf> {
    dirs::cache_dir()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine system cache directory",
            )
        })
        .map(|p| p.join(CACHE_DIR_NAME))
}

pub async fn ensure_cache_dir_exists(path: &Path) -> io::Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("Cache path exists but is not a directory: {}", path.display()),
                ));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating cache directory: {}", path.display());
            tokio::fs::create_dir_all(path).await
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_creates_nested_directory() -> io::Result<()> {
        let root = tempdir()?;
        let nested = root.path().join("a").join("b");
        ensure_cache_dir_exists(&nested).await?;
        assert!(nested.is_dir());
        // Second call is a no-op
        ensure_cache_dir_exists(&nested).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_rejects_file_path() -> io::Result<()> {
        let root = tempdir()?;
        let file = root.path().join("occupied");
        std::fs::write(&file, b"x")?;
        assert!(ensure_cache_dir_exists(&file).await.is_err());
        Ok(())
    }

    #[test]
    fn test_cache_dir_name() {
        if let Ok(dir) = get_cache_dir() {
            assert!(dir.ends_with(CACHE_DIR_NAME));
        }
    }
}
