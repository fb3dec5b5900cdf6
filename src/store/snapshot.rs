use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// 快照文件存储：每次写入都是整份文档的原子替换。
/// 先写同目录临时文件再 rename，读端任何时刻只会看到
/// 完整的旧文档或完整的新文档，不会读到半截内容。
pub struct SnapshotStore {
    data_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.data_dir.join(filename)
    }

    /// 整体落盘。value 必须是该文件的完整内容，不支持增量写入。
    pub fn save<T: Serialize>(&self, filename: &str, value: &T) -> Result<()> {
        let path = self.path_of(filename);
        let tmp = self.data_dir.join(format!("{}.tmp", filename));

        let json = serde_json::to_string_pretty(value)?;
        fs::write(&tmp, json.as_bytes())?;
        fs::rename(&tmp, &path)?;

        log::info!("成功保存 {}", filename);
        Ok(())
    }

    /// 读取整份文档；文件不存在返回 None。
    pub fn load<T: DeserializeOwned>(&self, filename: &str) -> Result<Option<T>> {
        let path = self.path_of(filename);
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&text)?))
    }
}
