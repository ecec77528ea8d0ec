use clap::Args;
use serde_json::Value;

use dealer_finance_core::quote::{self, SessionInput};
use dealer_finance_core::EngineConfig;

use crate::input;

/// Arguments for replaying a recorded session
#[derive(Args)]
pub struct SessionArgs {
    /// Path to JSON file with `vehicle` and `edits`
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_session(args: SessionArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let request = input::read_request::<SessionInput>(args.input.as_deref())?;
    let session = if let Some(request) = request {
        request
    } else {
        return Err("--input file (or piped JSON) is required for session replay".into());
    };

    tracing::debug!("replaying {} edits", session.edits.len());
    let result = quote::replay_session(&session, config);
    Ok(serde_json::to_value(result)?)
}
