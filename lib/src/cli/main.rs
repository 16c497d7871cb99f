// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Command line utility for planning Cardano hardware wallet signing operations

use clap::Parser;
use log::{debug, info, LevelFilter};
use serde::Serialize;

use cardano_hw_signer::{
    features::required_features, DeviceFirmware, Feature, FeatureGate, FeatureTable,
    FirmwareVersion, Model, ProtocolMode, SignTxParams,
};

mod helpers;
use helpers::*;

/// Cardano hardware wallet command line utility
#[derive(Clone, PartialEq, Debug, Parser)]
struct Options {
    /// Firmware feature table (TOML), overriding the defaults
    #[clap(long)]
    feature_table: Option<String>,

    /// Subcommand to execute
    #[clap(subcommand)]
    cmd: Actions,

    /// Enable verbose logging
    #[clap(long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Clone, PartialEq, Debug, Parser)]
#[non_exhaustive]
enum Actions {
    /// Print the active firmware feature table
    Features,

    /// Validate a signing request and describe how it would be signed
    Plan {
        /// Signing request (JSON)
        #[clap(long)]
        request: String,

        /// Device model line
        #[clap(long, value_enum, default_value = "t")]
        model: Model,

        /// Device firmware version
        #[clap(long)]
        firmware: FirmwareVersion,

        /// Output file (JSON), stdout if not provided
        #[clap(long)]
        output: Option<String>,
    },
}

/// Signing plan for a request
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Plan {
    firmware: DeviceFirmware,
    witness_paths: Vec<String>,
    required_features: Vec<Feature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unsupported_feature: Option<Feature>,
    protocol_mode: ProtocolMode,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Options::parse();

    // Setup logging
    simplelog::SimpleLogger::init(args.log_level, simplelog::Config::default())?;

    // Load feature table
    let table = match &args.feature_table {
        Some(f) => {
            debug!("Loading feature table from '{}'", f);
            FeatureTable::load(f)?
        }
        None => FeatureTable::default(),
    };

    debug!("Executing command: {:?}", args.cmd);

    match args.cmd {
        Actions::Features => {
            println!("{}", table.to_toml()?);
        }
        Actions::Plan {
            request,
            model,
            firmware,
            output,
        } => {
            let req = read_input(&request).await?;
            let params = SignTxParams::from_json(&req)?;

            let firmware = DeviceFirmware {
                model,
                version: firmware,
            };
            let gate = FeatureGate::new(&table, firmware);

            let required = required_features(&params);
            let unsupported_feature = required.iter().find(|f| !gate.is_supported(**f)).copied();

            let plan = Plan {
                firmware,
                witness_paths: params.witness_paths.iter().map(|p| p.to_string()).collect(),
                required_features: required,
                unsupported_feature,
                protocol_mode: gate.protocol_mode(),
            };

            match plan.unsupported_feature {
                Some(f) => info!("Request requires {} which {} does not support", f, firmware),
                None => info!("Request would be signed using the {} protocol", plan.protocol_mode),
            }

            write_output(output.as_deref(), &plan).await?;
        }
    }

    Ok(())
}
