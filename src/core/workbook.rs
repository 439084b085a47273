use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum WorkbookError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid CSV in sheet '{sheet}': {source}")]
    Csv {
        sheet: String,
        #[source]
        source: csv::Error,
    },
    #[error("sheet '{name}' not found (available: {})", available.join(", "))]
    SheetNotFound { name: String, available: Vec<String> },
    #[error("no CSV sheets found in {0}")]
    Empty(PathBuf),
}

/// One table of a workbook: a header row plus data rows of raw cell text.
///
/// Rows shorter than the header are padded with empty cells; extra trailing
/// cells are dropped. Repeated headers are kept; cells are addressed by
/// position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Read a sheet from CSV
    pub fn read_csv<R: Read>(name: &str, reader: R) -> Result<Self, WorkbookError> {
        let csv_err = |source| WorkbookError::Csv {
            sheet: name.to_string(),
            source,
        };

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(csv_err)?;
            let mut row: Vec<String> = record
                .iter()
                .take(headers.len())
                .map(|c| c.to_string())
                .collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        log::debug!("Sheet '{}': {} columns, {} rows", name, headers.len(), rows.len());

        Ok(Sheet {
            name: name.to_string(),
            headers,
            rows,
        })
    }
}

/// A collection of named sheets.
///
/// A single CSV file is a workbook with one sheet named after the file stem.
/// A directory is a workbook whose sheets are the `*.csv` files it contains,
/// ordered by file name.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn open(path: &Path) -> Result<Self, WorkbookError> {
        let sheets = if path.is_dir() {
            Self::read_dir(path)?
        } else {
            vec![read_sheet_file(path)?]
        };
        log::info!("Opened workbook {} with {} sheet(s)", path.display(), sheets.len());
        Ok(Workbook::from_sheets(sheets))
    }

    fn read_dir(dir: &Path) -> Result<Vec<Sheet>, WorkbookError> {
        let io_err = |source| WorkbookError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(io_err)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()
            .map_err(io_err)?;
        paths.retain(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
        });
        paths.sort();

        if paths.is_empty() {
            return Err(WorkbookError::Empty(dir.to_path_buf()));
        }

        paths.iter().map(|p| read_sheet_file(p)).collect()
    }

    pub fn from_sheets(sheets: Vec<Sheet>) -> Self {
        Workbook { sheets }
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Select a sheet by name, or the first sheet when no name is given
    pub fn sheet(&self, name: Option<&str>) -> Result<&Sheet, WorkbookError> {
        let found = match name {
            Some(name) => self.sheets.iter().find(|s| s.name == name),
            None => self.sheets.first(),
        };

        found.ok_or_else(|| WorkbookError::SheetNotFound {
            name: name.unwrap_or_default().to_string(),
            available: self.sheet_names().into_iter().map(String::from).collect(),
        })
    }
}

fn read_sheet_file(path: &Path) -> Result<Sheet, WorkbookError> {
    let file = File::open(path).map_err(|source| WorkbookError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Sheet::read_csv(&name, BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_csv_pads_short_rows() {
        let data = "Nama Op,TMT,2024-01-01\nWarung A,2023-01-01\n";
        let sheet = Sheet::read_csv("PEMECAHAN", data.as_bytes()).unwrap();

        assert_eq!(sheet.headers, vec!["Nama Op", "TMT", "2024-01-01"]);
        assert_eq!(sheet.rows, vec![vec!["Warung A", "2023-01-01", ""]]);
    }

    #[test]
    fn read_csv_trims_headers_and_bom() {
        let data = "\u{feff} TMT ,Nm Unit\n2024-02-01,UPPPD 1\n";
        let sheet = Sheet::read_csv("s", data.as_bytes()).unwrap();

        assert_eq!(sheet.headers, vec!["TMT", "Nm Unit"]);
    }

    #[test]
    fn repeated_headers_kept_by_position() {
        let data = "Keterangan,TMT,Keterangan,2024-01-01\na,2023-01-01,b,100\n";
        let sheet = Sheet::read_csv("S", data.as_bytes()).unwrap();

        assert_eq!(sheet.headers, vec!["Keterangan", "TMT", "Keterangan", "2024-01-01"]);
        assert_eq!(sheet.rows, vec![vec!["a", "2023-01-01", "b", "100"]]);
    }

    #[test]
    fn select_first_sheet_by_default() {
        let workbook = Workbook::from_sheets(vec![
            Sheet::read_csv("A", "TMT\n".as_bytes()).unwrap(),
            Sheet::read_csv("B", "TMT\n".as_bytes()).unwrap(),
        ]);

        assert_eq!(workbook.sheet_names(), vec!["A", "B"]);
        assert_eq!(workbook.sheet(None).unwrap().name, "A");
        assert_eq!(workbook.sheet(Some("B")).unwrap().name, "B");
    }

    #[test]
    fn unknown_sheet_lists_available() {
        let workbook =
            Workbook::from_sheets(vec![Sheet::read_csv("PEMECAHAN", "TMT\n".as_bytes()).unwrap()]);

        let err = workbook.sheet(Some("REKAP")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "sheet 'REKAP' not found (available: PEMECAHAN)"
        );
    }
}
