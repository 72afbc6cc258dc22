//! Response frames

use crate::console::Banner;
use crate::protocol::constants::{tx_status, type_oid};
use crate::protocol::{encode_message, BackendMessage, FieldDescription};
use bytes::{Bytes, BytesMut};

/// Name of the single result column
pub const OUTPUT_COLUMN: &str = "Output";

/// Command tag of every query response
pub const COMMAND_TAG: &str = "SELECT 1";

/// Largest payload whose `DataRow` length still fits the `int32` length word
/// (4 length + 2 column count + 4 value length)
pub const MAX_PAYLOAD_SIZE: usize = i32::MAX as usize - 10;

/// Column metadata shared by every query response
pub fn output_field() -> FieldDescription {
    FieldDescription {
        name: OUTPUT_COLUMN.to_string(),
        table_oid: 0,
        column_attr: 0,
        type_oid: type_oid::TEXT,
        type_size: -1,
        type_modifier: -1,
        format_code: 0,
    }
}

/// Encode the answer to a simple query
///
/// Produces `RowDescription`, `DataRow`, `CommandComplete("SELECT 1")` and
/// `ReadyForQuery('I')`, in that order, for any payload including an empty
/// one. Payloads above [`MAX_PAYLOAD_SIZE`] must be rejected by the caller.
pub fn encode_query_response(payload: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(payload.len() + 80);

    encode_message(&mut buf, &BackendMessage::RowDescription(vec![output_field()]));
    encode_message(
        &mut buf,
        &BackendMessage::DataRow(vec![Some(Bytes::copy_from_slice(payload))]),
    );
    encode_message(&mut buf, &BackendMessage::CommandComplete(COMMAND_TAG.into()));
    encode_message(
        &mut buf,
        &BackendMessage::ReadyForQuery {
            status: tx_status::IDLE,
        },
    );

    buf.freeze()
}

/// Encode the reply to a successful startup packet
///
/// `AuthenticationOk`, one notice per banner line, then `ReadyForQuery('I')`.
pub fn encode_startup_response(banner: &Banner) -> Bytes {
    let mut buf = BytesMut::with_capacity(256);

    encode_message(&mut buf, &BackendMessage::AuthenticationOk);
    for notice in banner.notices() {
        encode_message(&mut buf, &notice);
    }
    encode_message(
        &mut buf,
        &BackendMessage::ReadyForQuery {
            status: tx_status::IDLE,
        },
    );

    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELCOME_RESPONSE: &[u8] = &[
        // RowDescription: len 31, 1 field "Output", oid 0, attr 0, type 25, size -1, mod -1, fmt 0
        b'T', 0, 0, 0, 31, 0, 1, b'O', b'u', b't', b'p', b'u', b't', 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 25, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0, 0,
        // DataRow: len 18, 1 value of 8 bytes
        b'D', 0, 0, 0, 18, 0, 1, 0, 0, 0, 8, b'w', b'e', b'l', b'c', b'o', b'm', b'e', b'!',
        // CommandComplete: len 13, "SELECT 1"
        b'C', 0, 0, 0, 13, b'S', b'E', b'L', b'E', b'C', b'T', b' ', b'1', 0,
        // ReadyForQuery: idle
        b'Z', 0, 0, 0, 5, b'I',
    ];

    #[test]
    fn test_query_response_bytes() {
        let frame = encode_query_response(b"welcome!");
        assert_eq!(&frame[..], WELCOME_RESPONSE);
    }

    #[test]
    fn test_query_response_is_deterministic() {
        let payload = b"https://materialize.com/docs";
        assert_eq!(encode_query_response(payload), encode_query_response(payload));
    }

    #[test]
    fn test_empty_payload() {
        let frame = encode_query_response(b"");
        // Same metadata, zero-length (not NULL) value
        assert_eq!(&frame[..32], &WELCOME_RESPONSE[..32]);
        assert_eq!(&frame[32..43], &[b'D', 0, 0, 0, 10, 0, 1, 0, 0, 0, 0]);
        assert_eq!(frame.len(), 32 + 11 + 14 + 6);
    }

    #[test]
    fn test_large_payload() {
        let payload = vec![b'x'; 100_000];
        let frame = encode_query_response(&payload);
        let data_row_len = i32::from_be_bytes([frame[33], frame[34], frame[35], frame[36]]);
        assert_eq!(data_row_len, 4 + 2 + 4 + 100_000);
        assert_eq!(frame.len(), 32 + 1 + data_row_len as usize + 14 + 6);
    }

    #[test]
    fn test_startup_response_without_banner() {
        let frame = encode_startup_response(&Banner::empty());
        assert_eq!(
            &frame[..],
            &[b'R', 0, 0, 0, 8, 0, 0, 0, 0, b'Z', 0, 0, 0, 5, b'I']
        );
    }

    #[test]
    fn test_startup_response_with_banner() {
        let frame = encode_startup_response(&Banner::new(["hi"]));
        assert_eq!(&frame[..9], &[b'R', 0, 0, 0, 8, 0, 0, 0, 0]);
        assert_eq!(&frame[9..19], b"N\x00\x00\x00\x09Mhi\x00\x00");
        assert_eq!(&frame[19..], &[b'Z', 0, 0, 0, 5, b'I']);
    }
}
