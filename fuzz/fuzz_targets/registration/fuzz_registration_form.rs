// Run with: cargo fuzz run fuzz_registration_form
// Feeds arbitrary JSON objects through the whole cleaning pass of the sign-up form.
#![no_main]

use accounts::forms::{FormData, PasswordPolicy, RegistrationForm};
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(data) else {
        return;
    };
    let Ok(form) = RegistrationForm::new(PasswordPolicy::default()) else {
        return;
    };

    let submission: FormData = map
        .iter()
        .filter_map(|(key, value)| value.as_str().map(|v| (key.clone(), v.to_string())))
        .collect();

    if let Err(errors) = form.bind(submission).clean() {
        assert!(!errors.is_empty());
    }
});
