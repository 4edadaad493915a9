use anyhow::{Result, bail};
use gedx::codec::names;
use serde_json::json;

/// Prints the wire name of `(namespace, local)`.
///
/// # Errors
/// Returns an error if `local` is empty.
pub fn encode(namespace: &str, local: &str) -> Result<()> {
    if local.is_empty() {
        bail!("local name cannot be empty");
    }

    println!("{}", names::encode(namespace, local));
    Ok(())
}

/// Decodes `candidate` and prints the parts as a JSON object.
///
/// # Errors
/// Returns an error if the candidate is empty.
pub fn decode(candidate: &str, namespaces: &[String]) -> Result<()> {
    let name = names::decode(candidate, namespaces)?;

    let parts = json!({ "namespace": name.namespace(), "local": name.local_name() });
    println!("{parts}");
    Ok(())
}
