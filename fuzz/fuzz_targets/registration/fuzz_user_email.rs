// Run with: cargo fuzz run fuzz_user_email
// Looks for panics in email parsing and normalization.
#![no_main]

use accounts::domain::UserEmail;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(email) = UserEmail::parse(s.to_string()) {
            // A normalized address must parse to itself.
            let again = UserEmail::parse(email.as_ref().to_string());
            assert_eq!(again.as_ref().ok(), Some(&email));
        }
    }
});
