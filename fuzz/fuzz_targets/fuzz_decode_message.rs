#![no_main]

use libfuzzer_sys::fuzz_target;
use pg_fortune::protocol::decode::{decode_message, decode_startup_message};

const MAX_MESSAGE_SIZE: usize = 64 * 1024;

fuzz_target!(|data: &[u8]| {
    let _ = decode_startup_message(data);

    // Several tagged messages may arrive in a single TCP segment
    let mut rest = data;
    while !rest.is_empty() {
        match decode_message(rest, MAX_MESSAGE_SIZE) {
            Ok(Some((_, consumed))) => {
                assert!(consumed >= 5 && consumed <= rest.len());
                rest = &rest[consumed..];
            }
            Ok(None) | Err(_) => break,
        }
    }
});
