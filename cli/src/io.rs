//! File and terminal helpers shared by the subcommands

use std::{fs, path::Path};

use common::types::{OrderSignature, ZkEnabledOrder};
use eyre::{Result, WrapErr, eyre};
use lop_client::eip712::OrderDomain;
use order_lifecycle::OrderLifecycle;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use util::hex::bytes_from_hex_string;

/// Read a file to a string
pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).wrap_err_with(|| format!("failed to read {}", path.display()))
}

/// Read and deserialize a JSON file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = read_file(path)?;
    serde_json::from_str(&contents).wrap_err_with(|| format!("invalid JSON in {}", path.display()))
}

/// Write a value as pretty JSON to `out`, or to stdout when unset
pub fn write_json<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => fs::write(path, json + "\n")
            .wrap_err_with(|| format!("failed to write {}", path.display()))?,
        None => println!("{json}"),
    }

    Ok(())
}

// ----------------
// | Saved Orders |
// ----------------

/// The fields of a saved lifecycle needed to resume it
#[derive(Debug, Deserialize)]
struct SavedLifecycle {
    /// The order and its metadata
    order: ZkEnabledOrder,
    /// The maker's signature, absent for orders left unsigned
    signature: Option<OrderSignature>,
}

/// An order file written by `build` or `import`
#[derive(Debug, Deserialize)]
struct SavedOrder {
    /// The saved lifecycle
    lifecycle: SavedLifecycle,
}

/// Wraps a lifecycle in the layout `load_order` reads back
#[derive(Serialize)]
pub struct LifecycleFile<'a> {
    /// The lifecycle
    pub lifecycle: &'a OrderLifecycle,
}

/// Read the order held in a saved order file
pub fn read_saved_order(path: &Path) -> Result<ZkEnabledOrder> {
    let saved: SavedOrder = read_json(path)?;
    Ok(saved.lifecycle.order)
}

/// Parse a 65-byte hex signature as produced by a wallet
pub fn parse_raw_signature(hex: &str) -> Result<OrderSignature> {
    let raw = bytes_from_hex_string(hex).map_err(|e| eyre!(e))?;
    OrderSignature::from_raw(&raw).ok_or_else(|| eyre!("signature must be 65 bytes of r || s || v"))
}

/// Load a saved order and resume its lifecycle under `domain`
///
/// `signature` replaces any signature stored in the file
pub fn load_order(
    path: &Path,
    signature: Option<&str>,
    domain: &OrderDomain,
) -> Result<OrderLifecycle> {
    let saved: SavedOrder = read_json(path)?;
    let signature = match signature {
        Some(hex) => parse_raw_signature(hex)?,
        None => saved
            .lifecycle
            .signature
            .ok_or_else(|| eyre!("{} holds an unsigned order, pass --signature", path.display()))?,
    };

    Ok(OrderLifecycle::import_signed(saved.lifecycle.order, signature, domain))
}
