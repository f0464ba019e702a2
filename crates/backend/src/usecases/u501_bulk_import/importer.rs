use contracts::usecases::u501_bulk_import::{
    ImportEntity, ImportErrorKind, ImportReport, ImportStatus, ValidationError,
};
use std::io::Read;
use std::marker::PhantomData;

use super::error::ImportError;
use super::gateway::PersistenceGateway;
use super::header::check_header;
use super::schema::{arity_error, ImportRow, ImportSchema};
use super::uniqueness::{check_row, StagedValues, UniquenessLookup};

/// Accumulated errors allowed before the scan stops
pub const ERROR_CAP: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    ReadingHeader,
    ScanningRows,
    /// Scan finished without a single error
    Committing,
    /// Header mismatch, row errors, or the cap was exceeded
    Aborted,
}

/// State of one import run
#[derive(Debug)]
pub struct ImportBatch<R> {
    pub state: BatchState,
    pub header_valid: bool,
    pub errors: Vec<ValidationError>,
    pub staged: Vec<R>,
    pub rows_scanned: usize,
    pub error_cap: usize,
    staged_values: StagedValues,
}

impl<R> ImportBatch<R> {
    pub fn new(error_cap: usize) -> Self {
        Self {
            state: BatchState::ReadingHeader,
            header_valid: false,
            errors: Vec::new(),
            staged: Vec::new(),
            rows_scanned: 0,
            error_cap,
            staged_values: StagedValues::default(),
        }
    }

    fn over_cap(&self) -> bool {
        self.errors.len() > self.error_cap
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    Committed { count: u64 },
    Rejected { errors: Vec<ValidationError> },
    Failed { message: String },
}

/// Outcome plus what is needed to report it
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRun {
    pub entity: ImportEntity,
    pub rows_scanned: usize,
    pub outcome: ImportOutcome,
}

impl ImportRun {
    pub fn into_report(self) -> ImportReport {
        let entity = self.entity;
        let (status, committed, errors, message) = match self.outcome {
            ImportOutcome::Committed { count } => (
                ImportStatus::Committed,
                count,
                Vec::new(),
                format!("{} {} imported", count, entity.label()),
            ),
            ImportOutcome::Rejected { errors } => {
                let message = format!(
                    "Upload rejected: {} problem(s) found, no {} were imported",
                    errors.len(),
                    entity.label()
                );
                (ImportStatus::Rejected, 0, errors, message)
            }
            ImportOutcome::Failed { message } => (ImportStatus::Failed, 0, Vec::new(), message),
        };

        ImportReport {
            entity,
            status,
            rows_scanned: self.rows_scanned,
            committed,
            errors,
            message,
        }
    }
}

pub const SAVE_FAILED_MESSAGE: &str = "The upload could not be saved, nothing was imported";

/// Validate-then-commit import of one CSV file
pub struct BatchImporter<'a, S, St: ?Sized> {
    store: &'a St,
    error_cap: usize,
    _schema: PhantomData<S>,
}

impl<'a, S, St> BatchImporter<'a, S, St>
where
    S: ImportSchema,
    St: UniquenessLookup + PersistenceGateway<S::Record> + ?Sized,
{
    pub fn new(store: &'a St) -> Self {
        Self {
            store,
            error_cap: ERROR_CAP,
            _schema: PhantomData,
        }
    }

    pub fn with_error_cap(mut self, error_cap: usize) -> Self {
        self.error_cap = error_cap;
        self
    }

    /// Read the whole file and stage valid records; nothing is written
    pub async fn scan<Rd: Read + Send>(&self, mut input: Rd) -> Result<ImportBatch<S::Record>, ImportError> {
        let mut batch = ImportBatch::new(self.error_cap);
        let mut contents = Vec::new();
        input.read_to_end(&mut contents)?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(contents.as_slice());
        let mut records = reader.records();

        let header: Vec<String> = match records.next() {
            None => Vec::new(),
            Some(Ok(record)) => record.iter().map(str::to_string).collect(),
            Some(Err(e)) if e.is_io_error() => return Err(e.into()),
            // Undecodable header can never match
            Some(Err(_)) => Vec::new(),
        };

        if let Err(error) = check_header(&header, S::HEADER) {
            tracing::warn!("{} upload rejected: header mismatch", S::ENTITY.label());
            batch.errors.push(error);
            batch.state = BatchState::Aborted;
            return Ok(batch);
        }
        batch.header_valid = true;
        batch.state = BatchState::ScanningRows;

        for (index, result) in records.enumerate() {
            let position = match &result {
                Ok(record) => record.position(),
                Err(e) => e.position(),
            };
            let number = position.map_or(index + 2, |p| record_line(&contents, p));
            batch.rows_scanned += 1;
            let errors_before = batch.errors.len();

            match result {
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    tracing::debug!("Row {} unreadable: {}", number, e);
                    let message = match e.kind() {
                        csv::ErrorKind::Utf8 { .. } => {
                            format!("Row {} contains text that is not valid UTF-8", number)
                        }
                        _ => format!("Row {} could not be read", number),
                    };
                    batch.errors.push(ValidationError::new(number, ImportErrorKind::RowType, message));
                }
                Ok(record) => {
                    let row = ImportRow::new(number, record.iter().map(str::to_string).collect());
                    self.scan_row(&row, &mut batch, errors_before).await?;
                }
            }

            if batch.over_cap() {
                batch.errors.push(ValidationError::new(
                    number,
                    ImportErrorKind::TooManyErrors,
                    "Too many errors, further errors omitted",
                ));
                batch.state = BatchState::Aborted;
                tracing::warn!(
                    "{} upload aborted at row {}: more than {} errors",
                    S::ENTITY.label(),
                    number,
                    batch.error_cap
                );
                return Ok(batch);
            }
        }

        batch.state = if batch.errors.is_empty() {
            BatchState::Committing
        } else {
            BatchState::Aborted
        };
        Ok(batch)
    }

    async fn scan_row(
        &self,
        row: &ImportRow,
        batch: &mut ImportBatch<S::Record>,
        errors_before: usize,
    ) -> Result<(), ImportError> {
        if row.cells.len() != S::HEADER.len() {
            batch.errors.push(arity_error(row, S::HEADER.len()));
            return Ok(());
        }

        let record = S::parse(row, &mut batch.errors);
        check_row(
            self.store,
            S::UNIQUE,
            row,
            &mut batch.staged_values,
            &mut batch.errors,
        )
        .await?;

        if batch.errors.len() == errors_before {
            if let Some(record) = record {
                batch.staged.push(record);
            }
        }
        Ok(())
    }

    /// Scan, then commit the batch if it is clean
    pub async fn run<Rd: Read + Send>(&self, input: Rd) -> Result<ImportRun, ImportError> {
        tracing::info!("Importing {}", S::ENTITY.label());
        let batch = self.scan(input).await?;

        let outcome = match batch.state {
            BatchState::Committing => match self.store.insert_all(batch.staged.as_slice()).await {
                Ok(count) => {
                    tracing::info!("Imported {} {}", count, S::ENTITY.label());
                    ImportOutcome::Committed { count }
                }
                Err(e) => {
                    tracing::error!("{}", ImportError::Persistence(e));
                    ImportOutcome::Failed {
                        message: SAVE_FAILED_MESSAGE.to_string(),
                    }
                }
            },
            _ => {
                tracing::info!(
                    "{} upload rejected with {} error(s)",
                    S::ENTITY.label(),
                    batch.errors.len()
                );
                ImportOutcome::Rejected {
                    errors: batch.errors,
                }
            }
        };

        Ok(ImportRun {
            entity: S::ENTITY,
            rows_scanned: batch.rows_scanned,
            outcome,
        })
    }
}

/// File line a record starts on
///
/// The reader reports the position where it began reading, which is before
/// any blank lines it skipped.
fn record_line(contents: &[u8], position: &csv::Position) -> usize {
    let start = (position.byte() as usize).min(contents.len());
    let skipped = contents[start..]
        .iter()
        .take_while(|b| matches!(b, b'\r' | b'\n'))
        .filter(|&&b| b == b'\n')
        .count();
    position.line() as usize + skipped
}
