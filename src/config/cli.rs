use crate::domain::ports::Storage;
use crate::utils::error::{ElectionError, Result};
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// 以本機目錄為根的 Storage，snooper 的 JSON 紀錄檔就放在這裡
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            root: base_path.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 只接受 root 底下的相對路徑
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if path.is_empty() || escapes {
            return Err(ElectionError::InvalidConfigValueError {
                field: "store.file_name".to_string(),
                value: path.to_string(),
                reason: "must be a relative path inside the store directory".to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path)?;
        Ok(fs::read(full_path).await?)
    }

    /// 先寫暫存檔再 rename，中途失敗不會留下半個 JSON
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path)?;
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut staging = full_path.clone().into_os_string();
        staging.push(".tmp");

        fs::write(&staging, data).await?;
        fs::rename(&staging, &full_path).await?;
        tracing::debug!("💾 Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(())
    }
}
