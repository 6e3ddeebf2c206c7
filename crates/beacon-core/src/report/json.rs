use serde::Serialize;
use std::path::Path;

pub fn to_json<T: Serialize>(doc: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}

pub fn write_json<T: Serialize>(doc: &T, out: &Path) -> anyhow::Result<()> {
    std::fs::write(out, to_json(doc)?)?;
    Ok(())
}
