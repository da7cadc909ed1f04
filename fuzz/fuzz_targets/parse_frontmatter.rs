#![no_main]

use libfuzzer_sys::fuzz_target;
use skillcheck::parse_frontmatter;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = parse_frontmatter(input);
        let wrapped = format!("---\n{}\n---\nbody\n", input);
        let _ = parse_frontmatter(&wrapped);
    }
});
