//! Auxiliary joining.
//!
//! Sequential left joins of the feature accumulator against each auxiliary
//! table on that table's declared key subset. Annual tables (keyed by city
//! and year only) broadcast their values across all twelve of a year's
//! monthly rows. The accumulator's row count is invariant across every
//! join; a change means the auxiliary's keys were not unique, which the
//! validator rejects before the merge ever happens.

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use tracing::info;
use urja_io::validate_unique_keys;

/// Left-join `aux` onto `acc` on the given keys, enforcing key uniqueness
/// and the row-count invariant.
pub fn join_auxiliary(acc: DataFrame, aux: &DataFrame, keys: &[&str], name: &str) -> Result<DataFrame> {
    validate_unique_keys(aux, keys)
        .with_context(|| format!("auxiliary table '{name}' failed key validation"))?;

    let before = acc.height();
    let joined = acc
        .left_join(aux, keys, keys)
        .with_context(|| format!("joining auxiliary table '{name}'"))?;
    if joined.height() != before {
        // Unreachable once validation passes; kept as a hard stop because a
        // fan-out here would corrupt every downstream table.
        bail!(
            "join against '{name}' changed row count {} -> {}",
            before,
            joined.height()
        );
    }
    info!(table = name, columns = joined.width(), "auxiliary joined");
    Ok(joined)
}

/// Fold a sequence of auxiliary tables into the accumulator.
pub fn join_all(
    mut acc: DataFrame,
    tables: &[(DataFrame, &[&str], &str)],
) -> Result<DataFrame> {
    for (aux, keys, name) in tables {
        acc = join_auxiliary(acc, aux, keys, name)?;
    }
    Ok(acc)
}
