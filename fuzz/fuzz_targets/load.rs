#![no_main]

use cachecompat_core::{LoadOptions, UpnPolicy, UsersPolicy};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = cachecompat_core::load(s);

        let strict = LoadOptions::new()
            .with_users(UsersPolicy::NonEmpty)
            .with_upn(UpnPolicy::Strict);
        // Anything that loads must serialize and load back
        if let Ok(descriptor) = cachecompat_core::load_with(s, &strict) {
            let json = descriptor.to_json().expect("INVARIANT: descriptors always serialize");
            let reloaded = cachecompat_core::load_with(&json, &strict).expect("INVARIANT: serialized form reloads");
            assert_eq!(reloaded, descriptor);
        }
    }
});
