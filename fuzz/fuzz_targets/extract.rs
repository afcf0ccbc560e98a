#![no_main]

use std::sync::LazyLock;

use libfuzzer_sys::fuzz_target;
use turbogrok::{BackendKind, CompiledGrok, Config, Grok};

static MATCHERS: LazyLock<Vec<CompiledGrok>> = LazyLock::new(|| {
    let templates = [
        "%{COMMONAPACHELOG}",
        "%{SYSLOGBASE} %{GREEDYDATA:message}",
        "%{IP:ip} %{NUMBER:n:int} %{NUMBER:f:float}",
        "%{WORD:a} %{WORD:a} %{DATA:[nested][field]}",
    ];
    let mut matchers = Vec::new();
    for backend in [BackendKind::Standard, BackendKind::Fancy] {
        let grok = Grok::new(Config {
            backend,
            backtrack_limit: Some(100_000),
            ..Config::default()
        })
        .expect("default config");
        for template in templates {
            matchers.push(grok.compile(template).expect("template compiles"));
        }
    }
    matchers
});

// Arbitrary bytes, including invalid UTF-8, against compiled library
// templates. Errors are fine; panics are not.
fuzz_target!(|data: &[u8]| {
    for matcher in MATCHERS.iter() {
        let _ = matcher.extract(data);
    }
});
