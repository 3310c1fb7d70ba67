use serde::Serialize;

use duoslot_core::{Slot, SlotState};

use super::super::args::{InspectArgs, OutputFormat, StoreArgs};
use crate::exit_codes::SUCCESS;

#[derive(Debug, Serialize)]
struct InspectReport {
    key: String,
    state: SlotState,
    readable_slot: Option<Slot>,
    next_target: Slot,
}

pub async fn run(store_args: &StoreArgs, args: InspectArgs) -> anyhow::Result<i32> {
    let store = super::open_store(store_args)?;
    let state = store.inspect(&args.key).await?;

    let report = InspectReport {
        key: args.key,
        state,
        readable_slot: state.readable(),
        next_target: state.target(),
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!("key:         {}", report.key);
            println!("state:       {}", report.state);
            match report.readable_slot {
                Some(slot) => println!("readable:    {}", slot),
                None => println!("readable:    -"),
            }
            println!("next target: {}", report.next_target);
        }
    }
    Ok(SUCCESS)
}
