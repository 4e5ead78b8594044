//! Bank detection from the header record

use super::field_parsers::{Field, extract_raw, line_length};
use crate::app::models::BankTag;
use crate::constants::{
    BB_CODE, BB_NAME_TOKEN, BRADESCO_CODE, BRADESCO_NAME_TOKEN, MIN_HEADER_LENGTH,
};
use tracing::{debug, warn};

/// Identify the issuing bank from a header line
///
/// The positional bank code at [76,79) is checked first for each bank and the
/// bank name anywhere in the line is the fallback for malformed positional
/// data. Bradesco is tested before Banco do Brasil. Headers shorter than the
/// bank code field are never identified.
pub fn identify_bank(header: &str) -> BankTag {
    if line_length(header) < MIN_HEADER_LENGTH {
        warn!(
            "Header has {} characters, too short for bank identification",
            line_length(header)
        );
        return BankTag::Unknown;
    }

    let bank_code = extract_raw(header, Field::BankCode).unwrap_or_default();
    debug!("Header bank code at positions 77-79: '{}'", bank_code);

    let bank = if bank_code == BRADESCO_CODE || header.contains(BRADESCO_NAME_TOKEN) {
        BankTag::Bradesco
    } else if bank_code == BB_CODE || header.contains(BB_NAME_TOKEN) {
        BankTag::Bb
    } else {
        BankTag::Unknown
    };

    if bank.is_identified() {
        debug!("Bank identified as {}", bank);
    } else {
        warn!("Bank not identified from header (code '{}')", bank_code);
    }

    bank
}
