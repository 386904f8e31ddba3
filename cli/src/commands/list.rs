use std::borrow::Cow;

use permalink::{PathBuilder, PathRecord, Record};

use crate::backend::Backend;
use crate::output::{print_rows, OutputFormat};

pub async fn run(backend: &Backend, builder: &PathBuilder, format: &OutputFormat) -> Result<(), String> {
    let records = backend
        .list()
        .await
        .map_err(|e| format!("list failed: {e}"))?;

    if records.is_empty() {
        println!("No records found.");
        return Ok(());
    }

    let columns = vec!["id".into(), "title".into(), "permalink".into()];
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(records.len());
    for record in &records {
        rows.push(row(record, builder, backend).await);
    }

    print_rows(&columns, &rows, format)
}

/// One listing row. A broken chain shows up in the permalink column instead
/// of aborting the whole listing.
async fn row(record: &Record, builder: &PathBuilder, backend: &Backend) -> Vec<String> {
    let title = record
        .title(&builder.options().title_field)
        .map(Cow::into_owned)
        .unwrap_or_default();
    let permalink = match builder.build(record, backend).await {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(record = %record.id, error = %e, "permalink failed");
            format!("error: {e}")
        }
    };
    vec![record.id.to_string(), title, permalink]
}
