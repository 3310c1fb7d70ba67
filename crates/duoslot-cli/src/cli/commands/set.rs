use std::sync::{Arc, Mutex};

use anyhow::Context;
use duoslot_core::StoreError;
use tracing::info;

use super::super::args::{SetArgs, StoreArgs};
use crate::exit_codes::{SUCCESS, WRITE_FAILED};

pub async fn run(store_args: &StoreArgs, args: SetArgs) -> anyhow::Result<i32> {
    let value = match (&args.value, &args.file) {
        (Some(value), _) => value.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("either a value or --file is required"),
    };

    let failure: Arc<Mutex<Option<StoreError>>> = Arc::default();
    let sink = Arc::clone(&failure);
    let store = super::open_store(store_args)?;
    store.set_error_hook(move |_key, err| {
        *sink.lock().unwrap_or_else(|e| e.into_inner()) = Some(err.clone());
    });

    store.set(&args.key, value)?;
    store.close().await;

    let failure = failure.lock().unwrap_or_else(|e| e.into_inner()).take();
    match failure {
        Some(err) => {
            eprintln!("write failed, previous value kept: {}", err);
            Ok(WRITE_FAILED)
        }
        None => {
            let slot = store.inspect(&args.key).await?.readable();
            info!(key = %args.key, slot = ?slot, "committed");
            Ok(SUCCESS)
        }
    }
}
