use anyhow::Context;

use super::super::args::{GetArgs, OutputFormat, StoreArgs};
use crate::exit_codes::{NOT_FOUND, SUCCESS};

pub async fn run(store_args: &StoreArgs, args: GetArgs) -> anyhow::Result<i32> {
    let store = super::open_store(store_args)?;
    let value = store
        .get(&args.key)
        .await
        .with_context(|| format!("failed to read {}", args.key))?;

    match args.format {
        OutputFormat::Json => {
            let out = serde_json::json!({ "key": &args.key, "value": &value });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            if let Some(value) = &value {
                println!("{}", value);
            } else {
                eprintln!("{}: not found", args.key);
            }
        }
    }

    Ok(if value.is_some() { SUCCESS } else { NOT_FOUND })
}
