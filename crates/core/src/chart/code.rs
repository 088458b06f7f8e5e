//! Account code generation.
//!
//! Codes are four digits: the type's block prefix followed by a three digit
//! suffix (`1001`, `1002`, ... for assets; `5001`, ... for expenses).

use super::error::ChartError;
use super::types::AccountType;

/// Largest suffix a code block can hold.
const MAX_SUFFIX: u32 = 999;

/// Returns the suffix of `code` if it belongs to `account_type`'s block.
fn block_suffix(code: &str, account_type: AccountType) -> Option<u32> {
    let code = code.trim();
    if code.len() != 4 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (prefix, suffix) = code.split_at(1);
    if prefix.parse::<u32>().ok()? != account_type.code_prefix() {
        return None;
    }
    suffix.parse().ok()
}

/// Generates the next available code in `account_type`'s block.
///
/// The result is the block prefix followed by (highest existing suffix + 1),
/// zero padded to three digits. An empty block starts at `prefix + "001"`.
/// Codes outside the block (other prefixes, non-numeric or other lengths)
/// are ignored.
///
/// # Errors
///
/// Returns `ChartError::Validation` when the block is full.
pub fn generate_account_code<'a, I>(account_type: AccountType, existing: I) -> Result<String, ChartError>
where
    I: IntoIterator<Item = &'a str>,
{
    let highest = existing
        .into_iter()
        .filter_map(|code| block_suffix(code, account_type))
        .max()
        .unwrap_or(0);

    let next = highest + 1;
    if next > MAX_SUFFIX {
        return Err(ChartError::Validation {
            field: "code",
            message: format!("No codes left in the {account_type} block"),
        });
    }

    Ok(format!("{}{next:03}", account_type.code_prefix()))
}
