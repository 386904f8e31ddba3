use permalink::normalize_segment;
use serde_json::json;

use crate::output::{print_json, OutputFormat};

pub fn run(text: &[String], format: &OutputFormat) -> Result<(), String> {
    let input = text.join(" ");
    let slug = normalize_segment(&input);
    match format {
        OutputFormat::Json => print_json(&json!({ "text": input, "slug": slug })),
        OutputFormat::Table | OutputFormat::Csv => {
            println!("{slug}");
            Ok(())
        }
    }
}
