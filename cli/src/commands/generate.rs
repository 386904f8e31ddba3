use permalink::PathBuilder;
use serde_json::json;

use crate::backend::{parse_id, Backend};
use crate::output::{print_json, OutputFormat};

pub async fn run(
    backend: &Backend,
    builder: &PathBuilder,
    id: &str,
    format: &OutputFormat,
) -> Result<(), String> {
    let id = parse_id(id);
    let record = backend
        .fetch(&id)
        .await
        .map_err(|e| format!("fetch failed: {e}"))?
        .ok_or_else(|| format!("record {id} not found"))?;

    let permalink = builder
        .build(&record, backend)
        .await
        .map_err(|e| format!("generate failed: {e}"))?;

    match format {
        OutputFormat::Json => print_json(&json!({ "id": id, "permalink": permalink })),
        OutputFormat::Table | OutputFormat::Csv => {
            println!("{permalink}");
            Ok(())
        }
    }
}
