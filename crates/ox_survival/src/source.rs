//! Question files: delimited text, spreadsheets and the built-in sample set.

use calamine::{Data, Reader};
use derive_more::{Display, Error};
use ox_quiz::Question;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Embedded sample questions, loaded with `--sample` or the setup screen.
const SAMPLE_QUESTIONS: &str = include_str!("../assets/sample_questions.csv");

/// Header cells that mark the first row as column titles.
const HEADER_MARKERS: [&str; 3] = ["question", "Question", "질문"];

/// Answer tokens that mean "true" (compared case-insensitively).
const TRUE_TOKENS: [&str; 3] = ["o", "true", "1"];

/// Failure to turn a question file into a non-empty pool.
#[derive(Debug, Display, Error)]
pub enum SourceError {
    /// The file could not be read.
    #[display("Failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The spreadsheet could not be opened or has no readable first sheet.
    #[display("Failed to read workbook {}: {source}", path.display())]
    Workbook {
        /// File that failed.
        path: PathBuf,
        /// Underlying spreadsheet error.
        source: calamine::Error,
    },
    /// The extension is not a supported question format.
    #[display(
        "Unsupported question file format '{extension}' (use .csv, .tsv, .txt, .xlsx, .xls or .ods)"
    )]
    Unsupported {
        /// Extension as found on the path, empty when missing.
        extension: String,
    },
    /// Parsing succeeded but yielded no usable rows.
    #[display("No valid questions found in {origin}")]
    Empty {
        /// File path or sample label.
        origin: String,
    },
}

/// Where a question pool comes from.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum QuestionSource {
    /// A question file on disk.
    #[display("{}", _0.display())]
    File(PathBuf),
    /// The embedded sample set.
    #[display("sample questions")]
    Sample,
}

impl QuestionSource {
    /// Loads the pool this source describes.
    pub fn load(&self) -> Result<Vec<Question>, SourceError> {
        match self {
            Self::File(path) => load_questions(path),
            Self::Sample => sample_questions(),
        }
    }
}

/// How a question file is laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionFormat {
    /// Text with the given field delimiter.
    Delimited(u8),
    /// A spreadsheet; questions come from the first sheet.
    Workbook,
}

impl QuestionFormat {
    /// Format implied by a file extension, compared case-insensitively.
    #[instrument]
    pub fn for_path(path: &Path) -> Result<Self, SourceError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Delimited(b',')),
            "tsv" | "txt" => Ok(Self::Delimited(b'\t')),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Workbook),
            _ => {
                warn!(extension, "Rejecting question file");
                Err(SourceError::Unsupported {
                    extension: extension.to_string(),
                })
            }
        }
    }
}

/// Reads and parses a question file.
#[instrument(skip(path), fields(path = %path.display()))]
pub fn load_questions(path: &Path) -> Result<Vec<Question>, SourceError> {
    let questions = match QuestionFormat::for_path(path)? {
        QuestionFormat::Delimited(delimiter) => {
            let content = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_questions(&content, delimiter)
        }
        QuestionFormat::Workbook => read_workbook(path)?,
    };

    if questions.is_empty() {
        return Err(SourceError::Empty {
            origin: path.display().to_string(),
        });
    }
    info!(count = questions.len(), "Questions loaded");
    Ok(questions)
}

/// The built-in sample pool.
#[instrument]
pub fn sample_questions() -> Result<Vec<Question>, SourceError> {
    let questions = parse_questions(SAMPLE_QUESTIONS, b',');
    if questions.is_empty() {
        return Err(SourceError::Empty {
            origin: QuestionSource::Sample.to_string(),
        });
    }
    debug!(count = questions.len(), "Sample questions loaded");
    Ok(questions)
}

/// Parses delimited text into questions.
///
/// Column A is the question text and column B the answer token. A leading
/// header row is skipped and malformed rows are dropped. Quoted fields may
/// contain the delimiter, `""` escapes and line breaks.
#[instrument(skip(content), fields(bytes = content.len()))]
pub fn parse_questions(content: &str, delimiter: u8) -> Vec<Question> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let rows = reader.records().filter_map(|record| match record {
        Ok(record) => {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            Some((line, record.iter().map(str::to_string).collect::<Vec<_>>()))
        }
        Err(e) => {
            debug!(error = %e, "Dropping unreadable record");
            None
        }
    });
    questions_from_rows(rows)
}

/// Reads the first sheet of a spreadsheet, column A as text and B as answer.
#[instrument(skip(path), fields(path = %path.display()))]
fn read_workbook(path: &Path) -> Result<Vec<Question>, SourceError> {
    let workbook_error = |source: calamine::Error| match source {
        calamine::Error::Io(source) => SourceError::Io {
            path: path.to_path_buf(),
            source,
        },
        source => SourceError::Workbook {
            path: path.to_path_buf(),
            source,
        },
    };

    let mut workbook = calamine::open_workbook_auto(path).map_err(workbook_error)?;
    let Some(range) = workbook.worksheet_range_at(0) else {
        warn!("Workbook has no sheets");
        return Ok(Vec::new());
    };
    let range = range.map_err(workbook_error)?;

    let first_row = u64::from(range.start().map(|(row, _)| row).unwrap_or_default());
    let rows = range.rows().enumerate().map(|(i, cells)| {
        let fields = cells.iter().map(cell_text).collect::<Vec<_>>();
        (first_row + i as u64 + 1, fields)
    });
    Ok(questions_from_rows(rows))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Applies the header, column and answer rules to numbered rows.
fn questions_from_rows(rows: impl Iterator<Item = (u64, Vec<String>)>) -> Vec<Question> {
    let mut rows = rows
        .filter(|(_, fields)| fields.iter().any(|f| !f.trim().is_empty()))
        .peekable();

    if let Some((line, fields)) = rows.peek()
        && is_header(fields)
    {
        debug!(line, "Skipping header row");
        rows.next();
    }

    rows.filter_map(|(line, fields)| {
        let (text, answer) = match fields.as_slice() {
            [text, answer, ..] => (text.trim(), answer.trim()),
            _ => {
                debug!(line, "Dropping row with fewer than two columns");
                return None;
            }
        };
        if text.is_empty() || answer.is_empty() {
            debug!(line, "Dropping row with empty text or answer");
            return None;
        }
        Some(Question::new(text, is_true_token(answer)))
    })
    .collect()
}

/// Whether an answer cell means "true".
pub fn is_true_token(token: &str) -> bool {
    let token = token.trim();
    TRUE_TOKENS.iter().any(|t| token.eq_ignore_ascii_case(t))
}

fn is_header(fields: &[String]) -> bool {
    fields
        .first()
        .is_some_and(|cell| HEADER_MARKERS.iter().any(|m| cell.contains(m)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_fields_and_escapes() {
        let parsed = parse_questions("\"Is 1,000 > 999?\",O\n\"He said \"\"hi\"\"\",X\n", b',');
        assert_eq!(
            parsed,
            vec![
                Question::new("Is 1,000 > 999?", true),
                Question::new(r#"He said "hi""#, false),
            ]
        );
        assert_eq!(
            parse_questions("a\tb,c\tO\n", b'\t'),
            vec![Question::new("a", false)]
        );
    }

    #[test]
    fn test_quoted_line_breaks_stay_in_one_question() {
        let parsed = parse_questions("\"First line\nsecond line\",O\nNext?,X\n", b',');
        assert_eq!(
            parsed,
            vec![
                Question::new("First line\nsecond line", true),
                Question::new("Next?", false),
            ]
        );
    }

    #[test]
    fn test_formats_by_extension() {
        let format = |name: &str| QuestionFormat::for_path(Path::new(name));
        assert_eq!(format("q.CSV").ok(), Some(QuestionFormat::Delimited(b',')));
        assert_eq!(format("q.txt").ok(), Some(QuestionFormat::Delimited(b'\t')));
        assert_eq!(format("q.xlsx").ok(), Some(QuestionFormat::Workbook));
        assert_eq!(format("q.xls").ok(), Some(QuestionFormat::Workbook));
        assert!(matches!(
            format("q"),
            Err(SourceError::Unsupported { ref extension }) if extension.is_empty()
        ));
    }

    #[test]
    fn test_cell_text_formats_numbers_and_bools() {
        assert_eq!(cell_text(&Data::Float(1.0)), "1");
        assert_eq!(cell_text(&Data::Bool(true)), "true");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn test_true_tokens() {
        for token in ["o", "O", "true", "TRUE", " 1 "] {
            assert!(is_true_token(token), "{token} should be true");
        }
        for token in ["x", "false", "0", "yes", ""] {
            assert!(!is_true_token(token), "{token} should be false");
        }
    }

    #[test]
    fn test_header_detection() {
        let parsed = parse_questions("질문,정답\nSky is blue?,O\n", b',');
        assert_eq!(parsed, vec![Question::new("Sky is blue?", true)]);

        // A first row without a marker is data.
        let parsed = parse_questions("Sky is blue?,O\nGrass is red?,X\n", b',');
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_sample_questions_are_non_empty() {
        let questions = sample_questions().expect("sample set parses");
        assert!(questions.len() >= 10);
        assert!(questions.iter().any(Question::answer));
        assert!(questions.iter().any(|q| !q.answer()));
    }
}
