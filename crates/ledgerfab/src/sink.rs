//! CSV output.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::FabricResult;
use crate::models::TableRow;

/// One table written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    /// Table name.
    pub name: &'static str,
    /// Data rows written, excluding the header.
    pub rows: usize,
    /// File written.
    pub path: PathBuf,
}

/// Writes each table to `<dir>/<table>.csv` with a header row.
#[derive(Debug, Clone)]
pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    /// Create a sink writing into `dir`. The directory is created on the
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a table is written to.
    pub fn path_of<T: TableRow>(&self) -> PathBuf {
        self.dir.join(format!("{}.csv", T::TABLE))
    }

    /// Write a table. Empty tables produce no file and return `None`.
    pub fn write<T: TableRow>(&self, rows: &[T]) -> FabricResult<Option<TableSummary>> {
        if rows.is_empty() {
            debug!(table = T::TABLE, "Skipping empty table");
            return Ok(None);
        }
        fs::create_dir_all(&self.dir)?;
        let path = self.path_of::<T>();
        let mut writer = csv::Writer::from_path(&path)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        debug!(table = T::TABLE, rows = rows.len(), path = %path.display(), "Wrote table");
        Ok(Some(TableSummary {
            name: T::TABLE,
            rows: rows.len(),
            path,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActionType, EmployeeAction};
    use crate::registry::EmployeeId;
    use chrono::NaiveDate;

    fn action(id: u64) -> EmployeeAction {
        EmployeeAction {
            action_id: id,
            employee_id: EmployeeId::new(format!("EMP{id:06}")),
            action_type: ActionType::Hire,
            action_date: NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
            action_reason: "NEW_HIRE",
            org_unit_old: None,
            org_unit_new: Some("OU0001".to_string()),
            position_old: None,
            position_new: Some("Analyst"),
        }
    }

    #[test]
    fn test_write_creates_directory_and_header() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(tmp.path().join("nested/out"));
        let summary = sink.write(&[action(1), action(2)]).unwrap().unwrap();

        assert_eq!(summary.name, "employee_actions");
        assert_eq!(summary.rows, 2);
        let text = std::fs::read_to_string(&summary.path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "action_id,employee_id,action_type,action_date,action_reason,\
             org_unit_old,org_unit_new,position_old,position_new"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,EMP000001,HIRE,2023-02-01,NEW_HIRE,,OU0001,,Analyst"
        );
        assert_eq!(lines.count(), 1);
    }

    #[test]
    fn test_empty_table_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(tmp.path());
        assert!(sink.write::<EmployeeAction>(&[]).unwrap().is_none());
        assert!(!sink.path_of::<EmployeeAction>().exists());
    }
}
