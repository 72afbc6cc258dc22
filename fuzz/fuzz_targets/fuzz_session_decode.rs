#![no_main]

use bytes::{Buf, BytesMut};
use libfuzzer_sys::arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use pg_fortune::protocol::decode::{decode_message, decode_startup_message};
use pg_fortune::protocol::FrontendMessage;

const MAX_MESSAGE_SIZE: usize = 64 * 1024;

#[derive(Debug)]
struct SessionInput {
    data: Vec<u8>,
    split_points: Vec<u8>,
}

impl<'a> Arbitrary<'a> for SessionInput {
    fn arbitrary(u: &mut Unstructured<'a>) -> libfuzzer_sys::arbitrary::Result<Self> {
        let data: Vec<u8> = u.arbitrary()?;
        let split_points: Vec<u8> = u.arbitrary()?;
        Ok(Self { data, split_points })
    }
}

/// Decode the way a session does: untagged packets until a startup
/// message, tagged messages afterwards, with input arriving in chunks.
fuzz_target!(|input: SessionInput| {
    if input.data.is_empty() {
        return;
    }

    let mut splits: Vec<usize> = input
        .split_points
        .iter()
        .map(|&b| (b as usize) % (input.data.len() + 1))
        .collect();
    splits.push(0);
    splits.push(input.data.len());
    splits.sort_unstable();
    splits.dedup();

    let mut buf = BytesMut::new();
    let mut started = false;

    for window in splits.windows(2) {
        buf.extend_from_slice(&input.data[window[0]..window[1]]);

        loop {
            let decoded = if started {
                decode_message(&buf, MAX_MESSAGE_SIZE)
            } else {
                decode_startup_message(&buf)
            };

            match decoded {
                Ok(Some((msg, consumed))) => {
                    assert!(consumed <= buf.len());
                    buf.advance(consumed);
                    match msg {
                        FrontendMessage::Startup { .. } => started = true,
                        FrontendMessage::SslRequest => {}
                        FrontendMessage::Terminate => return,
                        _ if !started => return,
                        _ => {}
                    }
                }
                Ok(None) => break,
                Err(_) => return,
            }
        }
    }
});
