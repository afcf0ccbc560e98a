#![no_main]

use libfuzzer_sys::fuzz_target;
use turbogrok::patterns::default_patterns;
use turbogrok::registry::PatternRegistry;
use turbogrok::resolve::resolve;

// Arbitrary templates against the default library plus one fuzzed
// definition that may reference itself. Resolution must return, never
// overflow the stack or panic.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let (template, definition) = text.split_once('\n').unwrap_or((text, "%{FUZZ}"));
    let Ok(registry) = PatternRegistry::new(default_patterns(), [("FUZZ", definition)]) else {
        return;
    };
    let _ = resolve(template, &registry);
});
