//! `schema` command implementation.

use anyhow::Context;
use contracts::OptionSchema;

use crate::cli::SchemaArgs;
use crate::error::Result;

/// Execute the `schema` command
pub fn run_schema(args: &SchemaArgs) -> Result<()> {
    let schemas = match args.kind {
        Some(kind) => vec![sensors::declared_options(kind)],
        None => sensors::all_declared_options(),
    };

    if args.json {
        let json =
            serde_json::to_string_pretty(&schemas).context("Failed to serialize option schema")?;
        println!("{}", json);
    } else {
        print!("{}", render(&schemas));
    }
    Ok(())
}

fn render(schemas: &[OptionSchema]) -> String {
    let mut out = String::new();
    for schema in schemas {
        out.push_str(&format!("[{}]\n", schema.kind));
        for decl in &schema.options {
            let required = if decl.required { "required" } else { "optional" };
            out.push_str(&format!(
                "  {:<36} {:<9} {:<8} {:<8} {}\n",
                decl.name,
                decl.value_type.to_string(),
                format!("{:?}", decl.role).to_lowercase(),
                required,
                decl.description
            ));
        }
        out.push('\n');
    }
    out
}
