//! Fuzz target for multi-document resource files (`---` separators and
//! `kind: List` expansion).
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_resource_documents
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = vaptest_repo::fuzz::load_resource_text(text);
    }
});
