//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `gradebook_core` linkage without the Flutter shell.
//! - Print the pass/fail summary of the database named by `GRADEBOOK_DB_PATH`,
//!   logging into `logs/` beside it.

use gradebook_core::db::open_db;
use gradebook_core::{init_logging, LogSettings, SqliteKvStore, SummaryService};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("gradebook_core ping={}", gradebook_core::ping());
    println!("gradebook_core version={}", gradebook_core::core_version());

    let Some(db_path) = std::env::var_os("GRADEBOOK_DB_PATH") else {
        return ExitCode::SUCCESS;
    };

    match print_summary(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("summary failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_summary(db_path: &std::ffi::OsStr) -> Result<(), Box<dyn std::error::Error>> {
    let logging = LogSettings::beside_database("", Path::new(db_path))
        .and_then(|settings| init_logging(&settings));
    if let Err(err) = logging {
        eprintln!("logging disabled: {err}");
    }
    let conn = open_db(db_path)?;
    let store = SqliteKvStore::try_new(&conn)?;
    let rows = SummaryService::new(&store).run()?;
    println!("summary rows={}", rows.len());
    for row in rows {
        println!(
            "{}\t{}\tmin={}\tavg={:.2}\t{}",
            row.year, row.subject, row.passing_threshold, row.current_average, row.status
        );
    }
    Ok(())
}
