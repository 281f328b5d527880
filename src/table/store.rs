//! In-memory row store
//!
//! Rows are addressed by their position among the data rows. The crawler only
//! ever sees [`RowJob`] copies; results come back as `(index, FoundEmail)` and
//! are merged by index, so completion order never affects output order.

use crate::config::TableConfig;
use crate::state::FoundEmail;
use crate::table::codec::write_records;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Header synonyms used to locate the columns the crawler cares about
#[derive(Debug, Clone)]
pub struct HeaderPolicy {
    company: Vec<String>,
    website: Vec<String>,
    email: Vec<String>,
}

impl HeaderPolicy {
    pub fn new(company: &[String], website: &[String], email: &[String]) -> Self {
        let lower = |values: &[String]| -> Vec<String> {
            values.iter().map(|v| v.trim().to_lowercase()).collect()
        };

        Self {
            company: lower(company),
            website: lower(website),
            email: lower(email),
        }
    }

    pub fn from_config(config: &TableConfig) -> Self {
        Self::new(
            &config.company_headers,
            &config.website_headers,
            &config.email_headers,
        )
    }

    /// Finds the company, website and email columns in a header row
    ///
    /// Each cell is trimmed, lower-cased and tested for containing one of the
    /// synonyms, trying company, then website, then email. The first column
    /// to claim a role keeps it.
    pub fn map_columns(&self, header: &[String]) -> ColumnMap {
        let mut columns = ColumnMap::default();

        for (i, cell) in header.iter().enumerate() {
            let cell = cell.trim().to_lowercase();
            let matches = |synonyms: &[String]| synonyms.iter().any(|s| cell.contains(s.as_str()));

            let slot = if matches(&self.company[..]) {
                &mut columns.company
            } else if matches(&self.website[..]) {
                &mut columns.website
            } else if matches(&self.email[..]) {
                &mut columns.email
            } else {
                continue;
            };

            if slot.is_none() {
                *slot = Some(i);
            }
        }

        columns
    }
}

impl Default for HeaderPolicy {
    fn default() -> Self {
        Self::from_config(&TableConfig::default())
    }
}

/// Column positions of the roles found in the header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub company: Option<usize>,
    pub website: Option<usize>,
    pub email: Option<usize>,
}

/// One data row
#[derive(Debug, Clone)]
pub struct Row {
    /// Position among the data rows (the header is not counted)
    pub index: usize,
    pub company: String,
    pub website: String,
    pub original_email: String,
    /// Set once the row has been resolved
    pub found_email: Option<FoundEmail>,
    fields: Vec<String>,
}

impl Row {
    /// Original field values, untouched
    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

/// The part of a row a worker needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowJob {
    pub index: usize,
    pub company: String,
    pub website: String,
}

/// Ordered table of rows with the original column layout
#[derive(Debug, Clone)]
pub struct RowStore {
    header: Vec<String>,
    rows: Vec<Row>,
    columns: ColumnMap,
}

impl RowStore {
    /// Builds a store from parsed records; the first record is the header
    ///
    /// Returns `None` when there are no records at all.
    pub fn from_records(records: Vec<Vec<String>>, policy: &HeaderPolicy) -> Option<Self> {
        let mut records = records.into_iter();
        let header = records.next()?;
        let columns = policy.map_columns(&header);

        let cell = |fields: &[String], column: Option<usize>| -> String {
            column
                .and_then(|c| fields.get(c))
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };

        let rows = records
            .enumerate()
            .map(|(index, fields)| Row {
                index,
                company: cell(&fields[..], columns.company),
                website: cell(&fields[..], columns.website),
                original_email: cell(&fields[..], columns.email),
                found_email: None,
                fields,
            })
            .collect();

        Some(Self {
            header,
            rows,
            columns,
        })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn columns(&self) -> ColumnMap {
        self.columns
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Work items for every data row, in table order
    pub fn jobs(&self) -> Vec<RowJob> {
        self.rows
            .iter()
            .map(|row| RowJob {
                index: row.index,
                company: row.company.clone(),
                website: row.website.clone(),
            })
            .collect()
    }

    /// Stores the result for the row at `index`
    ///
    /// Returns false if there is no such row.
    pub fn record(&mut self, index: usize, found: FoundEmail) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                row.found_email = Some(found);
                true
            }
            None => false,
        }
    }

    /// Marks every unresolved row as not found and returns their indices
    pub fn finalize(&mut self) -> Vec<usize> {
        let mut defaulted = Vec::new();
        for row in self.rows.iter_mut().filter(|row| row.found_email.is_none()) {
            row.found_email = Some(FoundEmail::NotFound);
            defaulted.push(row.index);
        }
        defaulted
    }

    /// Number of rows that resolved to an address
    pub fn found_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.found_email.as_ref().is_some_and(FoundEmail::is_address))
            .count()
    }

    /// Header plus data rows with the email column replaced
    ///
    /// Rows too short to have an email column, and every row when no email
    /// column was found, are passed through unchanged.
    pub fn to_records(&self, not_found_marker: &str) -> Vec<Vec<String>> {
        let mut records = Vec::with_capacity(self.rows.len() + 1);
        records.push(self.header.clone());

        for row in &self.rows {
            let mut fields = row.fields.clone();
            if let Some(slot) = self.columns.email.and_then(|c| fields.get_mut(c)) {
                let value = match &row.found_email {
                    Some(found) => found.render(not_found_marker),
                    None => not_found_marker,
                };
                *slot = value.to_string();
            }
            records.push(fields);
        }

        records
    }

    /// Writes the table to `path` (BOM, `,` delimiter, quoted as needed)
    pub fn write_to(&self, path: &Path, not_found_marker: &str) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        write_records(&mut writer, &self.to_records(not_found_marker))
    }
}
