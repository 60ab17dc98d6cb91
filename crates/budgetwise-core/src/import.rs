//! CSV import of transaction history
//!
//! Expected header: `date,description,amount[,category]` (any column order,
//! header names are case-insensitive). Bank-style negative or parenthesized
//! amounts are read as expenses of the same size.

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Category;

/// A parsed CSV row, not yet recorded in a ledger
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedTransaction {
    /// 1-based line number in the file (header is line 1)
    pub line: usize,
    pub date: NaiveDate,
    pub description: String,
    /// Always positive
    pub amount: f64,
    /// Category given in the file; `None` means it still needs classifying
    pub category: Option<Category>,
}

struct Columns {
    date: usize,
    description: usize,
    amount: usize,
    category: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| Error::Import(format!("Missing '{}' column", name)))
        };

        Ok(Self {
            date: require("date")?,
            description: require("description")?,
            amount: require("amount")?,
            category: find("category"),
        })
    }
}

/// Parse transactions from CSV data
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<ImportedTransaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut transactions = Vec::new();

    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        let line = index + 2;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let field = |column: usize, name: &str| {
            record
                .get(column)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| Error::Import(format!("Missing {} on line {}", name, line)))
        };

        let raw_date = field(columns.date, "date")?;
        let date = parse_date(raw_date).map_err(|_| {
            Error::Import(format!("Unable to parse date '{}' on line {}", raw_date, line))
        })?;
        let description = field(columns.description, "description")?.to_string();
        let raw_amount = field(columns.amount, "amount")?;
        let amount = parse_amount(raw_amount)
            .map_err(|_| {
                Error::Import(format!(
                    "Unable to parse amount '{}' on line {}",
                    raw_amount, line
                ))
            })?
            .abs();
        if amount == 0.0 {
            return Err(Error::Import(format!("Zero amount on line {}", line)));
        }

        let category = match columns
            .category
            .and_then(|c| record.get(c))
            .filter(|s| !s.is_empty())
        {
            Some(name) => Some(name.parse::<Category>().map_err(|_| {
                Error::Import(format!("Unknown category '{}' on line {}", name, line))
            })?),
            None => None,
        };

        transactions.push(ImportedTransaction {
            line,
            date,
            description,
            amount,
            category,
        });
    }

    debug!(count = transactions.len(), "Parsed CSV transactions");
    Ok(transactions)
}

/// Parse transactions from a CSV file
pub fn parse_csv_file(path: &Path) -> Result<Vec<ImportedTransaction>> {
    let file = std::fs::File::open(path)?;
    parse_csv(file)
}

/// Parse a date string in various common formats
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%Y", // 01/15/2024
        "%m/%d/%y", // 01/15/24
        "%m-%d-%Y", // 01-15-2024
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    Err(Error::Import(format!("Unable to parse date: {}", s)))
}

/// Parse an amount string, handling currency symbols and commas
fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite())
        .ok_or_else(|| Error::Import(format!("Unable to parse amount: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("01/15/2024").unwrap(), date(1, 15));
        assert_eq!(parse_date("2024-01-15").unwrap(), date(1, 15));
        assert!(parse_date("15th of January").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,234.56").unwrap(), 1234.56);
        assert_eq!(parse_amount("-123.45").unwrap(), -123.45);
        assert_eq!(parse_amount("(100.00)").unwrap(), -100.00);
        assert!(parse_amount("NaN").is_err());
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_parse_with_categories() {
        let csv = "date,description,amount,category
2024-03-01,Weekly groceries,82.40,Food
2024-03-02,Bus pass,-45.00,transportation
2024-03-03,Mystery charge,12.00,
";
        let rows = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].category, Some(Category::Food));
        assert_eq!(rows[1].amount, 45.0);
        assert_eq!(rows[1].category, Some(Category::Transportation));
        assert_eq!(rows[2].category, None);
        assert_eq!(rows[2].line, 4);
    }

    #[test]
    fn test_columns_any_order_without_category() {
        let csv = "Amount,Date,Description\n\"$1,200.00\",03/05/2024,Rent\n";
        let rows = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].amount, 1200.0);
        assert_eq!(rows[0].date, date(3, 5));
        assert_eq!(rows[0].category, None);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let csv = "date,description,amount\n2024-03-01,a,1\n,,\n2024-03-02,b,2\n";
        assert_eq!(parse_csv(csv.as_bytes()).unwrap().len(), 2);
    }

    #[test]
    fn test_errors_name_the_line() {
        let missing = parse_csv("date,description\n2024-01-01,x\n".as_bytes()).unwrap_err();
        assert!(missing.to_string().contains("Missing 'amount' column"));

        let bad_date =
            parse_csv("date,description,amount\nsoon,x,1\n".as_bytes()).unwrap_err();
        assert!(bad_date.to_string().contains("line 2"));

        let bad_category =
            parse_csv("date,description,amount,category\n2024-01-01,x,1,Travel\n".as_bytes())
                .unwrap_err();
        assert!(bad_category
            .to_string()
            .contains("Unknown category 'Travel' on line 2"));

        let zero = parse_csv("date,description,amount\n2024-01-01,x,0\n".as_bytes()).unwrap_err();
        assert!(zero.to_string().contains("Zero amount"));
    }

    #[test]
    fn test_parse_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        std::fs::write(&path, "date,description,amount\n2024-02-01,Pizza,18.5\n").unwrap();
        let rows = parse_csv_file(&path).unwrap();
        assert_eq!(rows[0].description, "Pizza");
        assert!(parse_csv_file(&dir.path().join("missing.csv")).is_err());
    }
}
