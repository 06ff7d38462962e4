//! Mapping of Chittorgarh report rows onto IPO records.
//!
//! Rows are JSON objects keyed by the report's column headers. Dates use the
//! `Jan 15, 2025` format and numbers may carry thousands separators.

use crate::domain::errors::IngestError;
use crate::domain::ipo::{HistoricalIpo, IpoRecord, IpoStatus, ListingGain};
use crate::domain::ports::ReportRow;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

pub const REPORT_DATE_FORMAT: &str = "%b %d, %Y";

// upcoming report columns
const COL_ID: &str = "~id";
const COL_COMPANY: &str = "Company";
const COL_LOGO: &str = "~compare_image";
const COL_ISSUE_TYPE: &str = "Issue Type";
const COL_URL_NAME: &str = "~urlrewrite_folder_name";
const COL_OPENING_DATE: &str = "Opening Date";
const COL_CLOSING_DATE: &str = "Closing Date";
const COL_LISTING_MARKER: &str = "~IPO_Listing_date";

// historical report columns
const COL_HIST_URL_NAME: &str = "~URLRewrite_Folder_Name";
const COL_LISTING_DATE: &str = "Listing Date";
const COL_ISSUE_AMOUNT: &str = "Issue Amount<br/> (Rs.cr.)";
const COL_ISSUE_PRICE: &str = "Issue Price (Rs.)";
const COL_LISTING_OPEN_PRICE: &str = "Open Price on Listing (Rs.)";
const COL_QIB: &str = "QIB";
const COL_NII: &str = "NII";
const COL_RII: &str = "RII";
const COL_TOTAL: &str = "TOTAL";

/// Strip thousands separators and parse; `None` for blank or invalid text.
pub fn clean_number(text: &str) -> Option<Decimal> {
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

pub fn parse_report_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), REPORT_DATE_FORMAT).ok()
}

/// Cell as trimmed text; `None` for missing, null or blank cells.
fn text(row: &ReportRow, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::Null => None,
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        other => Some(other.to_string()),
    }
}

fn text_or_empty(row: &ReportRow, key: &str) -> String {
    text(row, key).unwrap_or_default()
}

struct RowReader<'a> {
    row: &'a ReportRow,
    company: String,
}

impl<'a> RowReader<'a> {
    fn new(row: &'a ReportRow) -> Result<Self, IngestError> {
        let company = text(row, COL_COMPANY).ok_or_else(|| IngestError::MissingField {
            company: "Unknown".to_string(),
            field: COL_COMPANY.to_string(),
        })?;
        Ok(Self { row, company })
    }

    fn required(&self, key: &str) -> Result<String, IngestError> {
        text(self.row, key).ok_or_else(|| IngestError::MissingField {
            company: self.company.clone(),
            field: key.to_string(),
        })
    }

    fn date(&self, key: &str) -> Result<NaiveDate, IngestError> {
        let raw = self.required(key)?;
        parse_report_date(&raw).ok_or_else(|| IngestError::InvalidDate {
            company: self.company.clone(),
            field: key.to_string(),
            value: raw,
        })
    }

    fn decimal(&self, key: &str) -> Result<Decimal, IngestError> {
        let raw = self.required(key)?;
        clean_number(&raw).ok_or_else(|| IngestError::InvalidNumber {
            company: self.company.clone(),
            field: key.to_string(),
            value: raw,
        })
    }

    /// Blank subscription cells mean no bids were recorded.
    fn subscription(&self, key: &str) -> Result<Decimal, IngestError> {
        match text(self.row, key) {
            None => Ok(Decimal::ZERO),
            Some(_) => self.decimal(key),
        }
    }
}

/// Map an upcoming-report row. `Ok(None)` when the issue has already listed or
/// opened before `today`.
pub fn parse_upcoming_row(row: &ReportRow, today: NaiveDate) -> Result<Option<IpoRecord>, IngestError> {
    if text(row, COL_LISTING_MARKER).is_some() {
        return Ok(None);
    }

    let reader = RowReader::new(row)?;
    let open_date = reader.date(COL_OPENING_DATE)?;
    if open_date < today {
        return Ok(None);
    }
    let close_date = reader.date(COL_CLOSING_DATE)?;

    Ok(Some(IpoRecord {
        company_id: text_or_empty(row, COL_ID),
        company_name: reader.company.clone(),
        company_logo_url: text_or_empty(row, COL_LOGO),
        issue_type: text_or_empty(row, COL_ISSUE_TYPE),
        company_url_name: text_or_empty(row, COL_URL_NAME),
        open_date: Some(open_date),
        close_date: Some(close_date),
        status: IpoStatus::Upcoming,
        ..Default::default()
    }))
}

/// Map a historical-report row, computing listing gains.
pub fn parse_historical_row(row: &ReportRow) -> Result<HistoricalIpo, IngestError> {
    let reader = RowReader::new(row)?;

    let issue_price = reader.decimal(COL_ISSUE_PRICE)?;
    let listing_price = reader.decimal(COL_LISTING_OPEN_PRICE)?;
    if issue_price.is_zero() {
        return Err(IngestError::ZeroIssuePrice {
            company: reader.company.clone(),
        });
    }
    let gain = ListingGain::compute(issue_price, listing_price).ok_or_else(|| {
        IngestError::ListingGainOutOfRange {
            company: reader.company.clone(),
            issue_price: issue_price.to_string(),
            listing_price: listing_price.to_string(),
        }
    })?;

    Ok(HistoricalIpo {
        company_id: text_or_empty(row, COL_ID),
        company_name: reader.company.clone(),
        company_logo_url: String::new(),
        issue_type: text_or_empty(row, COL_ISSUE_TYPE),
        company_url_name: text_or_empty(row, COL_HIST_URL_NAME),
        open_date: Some(reader.date(COL_OPENING_DATE)?),
        listing_date: Some(reader.date(COL_LISTING_DATE)?),
        issue_size: reader.decimal(COL_ISSUE_AMOUNT)?,
        issue_price,
        listing_price,
        qib_subscription: reader.subscription(COL_QIB)?,
        nii_subscription: reader.subscription(COL_NII)?,
        retail_subscription: reader.subscription(COL_RII)?,
        total_subscription: reader.subscription(COL_TOTAL)?,
        listing_gains_rs: gain.rs,
        listing_gains_percent: gain.percent,
    })
}

/// Company label for log lines about a row that failed to parse.
pub fn row_company(row: &ReportRow) -> String {
    text(row, COL_COMPANY).unwrap_or_else(|| "Unknown".to_string())
}
