#![no_main]

use std::collections::BTreeMap;

use libfuzzer_sys::fuzz_target;
use serde_yaml::Value;
use skillcheck::{validate_body, validate_metadata};

fuzz_target!(|data: &[u8]| {
    if let Ok(body) = std::str::from_utf8(data) {
        let _ = validate_body(body);
    }

    let Ok(value) = serde_yaml::from_slice::<Value>(data) else {
        return;
    };
    let Value::Mapping(map) = value else {
        return;
    };

    let mut metadata = BTreeMap::new();
    for (key, value) in map {
        if let Value::String(key) = key {
            metadata.insert(key, value);
        }
    }

    let _ = validate_metadata(&metadata, Some("fuzzed-skill"));
});
