//! `vault-token-helper get` — print the stored token.

use std::io::Write;

use crate::config::HelperContext;
use crate::errors::{HelperError, Result};
use crate::keychain::{CredentialStore, ItemDescriptor, ItemQuery};

/// Execute the `get` command.
///
/// A missing item is not an error: nothing is written. The payload is
/// written verbatim with no trailing newline.
pub fn execute(
    ctx: &HelperContext,
    store: &dyn CredentialStore,
    output: &mut dyn Write,
) -> Result<()> {
    let query = ItemQuery::data_of(ItemDescriptor::for_context(ctx));

    let results = store
        .query(&query)
        .map_err(HelperError::store("failed to query keychain"))?;

    let Some(found) = results.first() else {
        tracing::debug!(service = %ctx.service, "no stored token");
        return Ok(());
    };

    if let Some(data) = &found.data {
        output.write_all(data)?;
        output.flush()?;
    }

    Ok(())
}
