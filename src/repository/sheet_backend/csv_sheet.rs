use super::SheetBackend;
use crate::repository::error::RepositoryResult;
use crate::repository::table_codec::Row;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};

// ==========================================
// CsvSheetBackend - CSV 文件后端
// ==========================================
/// CSV 文件表格
///
/// 覆写时先写临时文件再 rename,避免写一半的文件替换原表
pub struct CsvSheetBackend {
    path: PathBuf,
}

impl CsvSheetBackend {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SheetBackend for CsvSheetBackend {
    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    fn read_all(&self) -> RepositoryResult<Vec<Row>> {
        // 文件不存在等同于空表
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_path(&self.path)?;

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(|v| v.to_string()).collect());
        }
        Ok(rows)
    }

    fn overwrite(&self, rows: &[Row]) -> RepositoryResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.temp_path();
        {
            let mut writer = WriterBuilder::new().flexible(true).from_path(&tmp)?;
            for row in rows {
                writer.write_record(row)?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
