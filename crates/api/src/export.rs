// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking exports: a CSV of every booking and a plain-text daily manifest.
//!
//! Both formats are Italian-facing: column headers, labels, and the long
//! date in the manifest title are written in Italian. Booking times are
//! shown in the restaurant's offset.

use prenota_domain::Booking;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Month, UtcOffset, Weekday};

use crate::error::ApiError;
use crate::request_response::ExportFile;

/// Header row of the bookings CSV.
pub const CSV_HEADER: [&str; 8] = [
    "Data",
    "Nome",
    "Telefono",
    "Email",
    "Posti",
    "Codice",
    "Note",
    "Data Prenotazione",
];

/// Suggested file name for the full CSV export.
pub const CSV_FILE_NAME: &str = "tutte-le-prenotazioni.csv";

/// Content type of the CSV export.
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Content type of the daily manifest.
pub const MANIFEST_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Line printed when a day has no bookings.
pub const EMPTY_MANIFEST_LINE: &str = "Nessuna prenotazione per questo giorno.";

const BOOKED_AT_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day]/[month]/[year] [hour]:[minute]");

/// Formats a booking's creation time as `dd/MM/yyyy HH:mm` at `offset`.
fn format_booked_at(booking: &Booking, offset: UtcOffset) -> String {
    booking
        .created_at
        .to_offset(offset)
        .format(BOOKED_AT_FORMAT)
        .unwrap_or_else(|_| booking.created_at.to_string())
}

/// Renders bookings as CSV.
///
/// Rows keep the order of `bookings`. Every non-numeric field is quoted.
///
/// # Arguments
///
/// * `bookings` - The bookings to export
/// * `offset` - The restaurant's UTC offset, used for booking times
///
/// # Errors
///
/// Returns `ApiError::Internal` if the writer fails.
pub fn bookings_to_csv(bookings: &[Booking], offset: UtcOffset) -> Result<String, ApiError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::NonNumeric)
        .from_writer(Vec::new());

    let csv_error = |e: csv::Error| ApiError::Internal {
        message: format!("Failed to write CSV export: {e}"),
    };

    writer.write_record(CSV_HEADER).map_err(csv_error)?;

    for booking in bookings {
        let date: String = booking.date.to_string();
        let seats: String = booking.seats.to_string();
        let booked_at: String = format_booked_at(booking, offset);
        writer
            .write_record([
                date.as_str(),
                booking.name.as_str(),
                booking.phone.as_str(),
                booking.email.as_deref().unwrap_or_default(),
                seats.as_str(),
                booking.code.as_str(),
                booking.notes.as_deref().unwrap_or_default(),
                booked_at.as_str(),
            ])
            .map_err(csv_error)?;
    }

    let bytes: Vec<u8> = writer.into_inner().map_err(|e| ApiError::Internal {
        message: format!("Failed to flush CSV export: {e}"),
    })?;

    String::from_utf8(bytes).map_err(|e| ApiError::Internal {
        message: format!("CSV export is not valid UTF-8: {e}"),
    })
}

/// Builds the full CSV export file.
///
/// # Errors
///
/// Returns `ApiError::Internal` if the writer fails.
pub fn csv_export(bookings: &[Booking], offset: UtcOffset) -> Result<ExportFile, ApiError> {
    Ok(ExportFile {
        file_name: String::from(CSV_FILE_NAME),
        content_type: CSV_CONTENT_TYPE,
        body: bookings_to_csv(bookings, offset)?,
    })
}

const fn italian_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "lunedì",
        Weekday::Tuesday => "martedì",
        Weekday::Wednesday => "mercoledì",
        Weekday::Thursday => "giovedì",
        Weekday::Friday => "venerdì",
        Weekday::Saturday => "sabato",
        Weekday::Sunday => "domenica",
    }
}

const fn italian_month(month: Month) -> &'static str {
    match month {
        Month::January => "gennaio",
        Month::February => "febbraio",
        Month::March => "marzo",
        Month::April => "aprile",
        Month::May => "maggio",
        Month::June => "giugno",
        Month::July => "luglio",
        Month::August => "agosto",
        Month::September => "settembre",
        Month::October => "ottobre",
        Month::November => "novembre",
        Month::December => "dicembre",
    }
}

/// Formats a date the way Italian readers expect, e.g. `giovedì 10 luglio 2025`.
#[must_use]
pub fn italian_long_date(date: Date) -> String {
    format!(
        "{} {} {} {}",
        italian_weekday(date.weekday()),
        date.day(),
        italian_month(date.month()),
        date.year()
    )
}

/// Renders one day's bookings as a printable manifest.
///
/// `bookings` are listed in the order given; callers pass them oldest first.
#[must_use]
pub fn day_manifest(date: Date, bookings: &[Booking], offset: UtcOffset) -> String {
    let mut out: String = format!("Prenotazioni del {}\n\n", italian_long_date(date));

    if bookings.is_empty() {
        out.push_str(EMPTY_MANIFEST_LINE);
        out.push('\n');
        return out;
    }

    let mut total_seats: u64 = 0;
    for (index, booking) in bookings.iter().enumerate() {
        total_seats += u64::from(booking.seats);

        out.push_str(&format!("{}. {}\n", index + 1, booking.name));
        out.push_str(&format!("   Telefono: {}\n", booking.phone));
        if let Some(email) = &booking.email {
            out.push_str(&format!("   Email: {email}\n"));
        }
        out.push_str(&format!("   Posti: {}\n", booking.seats));
        out.push_str(&format!("   Codice: {}\n", booking.code));
        if let Some(notes) = &booking.notes {
            out.push_str(&format!("   Note: {notes}\n"));
        }
        out.push_str(&format!(
            "   Prenotato il: {}\n\n",
            format_booked_at(booking, offset)
        ));
    }

    out.push_str(&format!(
        "\nTotale prenotazioni: {}\nTotale posti: {total_seats}\n",
        bookings.len()
    ));
    out
}

/// Builds the manifest file for one day.
#[must_use]
pub fn manifest_export(date: Date, bookings: &[Booking], offset: UtcOffset) -> ExportFile {
    ExportFile {
        file_name: format!("prenotazioni-{date}.txt"),
        content_type: MANIFEST_CONTENT_TYPE,
        body: day_manifest(date, bookings, offset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_italian_long_date() {
        assert_eq!(
            italian_long_date(date!(2025 - 07 - 10)),
            "giovedì 10 luglio 2025"
        );
        assert_eq!(
            italian_long_date(date!(2025 - 06 - 30)),
            "lunedì 30 giugno 2025"
        );
    }

    #[test]
    fn test_empty_manifest() {
        let manifest: String = day_manifest(date!(2025 - 07 - 01), &[], UtcOffset::UTC);
        assert_eq!(
            manifest,
            "Prenotazioni del martedì 1 luglio 2025\n\nNessuna prenotazione per questo giorno.\n"
        );
    }
}
