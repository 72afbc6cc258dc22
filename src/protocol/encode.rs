//! Protocol message encoding

use super::constants::{auth, tags};
use super::message::{BackendMessage, FieldDescription, NoticeFields};
use bytes::{BufMut, BytesMut};

/// Append an encoded backend message to `buf`
///
/// Encoding never fails: every message is written as a type byte, a
/// self-inclusive `int32` length, and the body.
pub fn encode_message(buf: &mut BytesMut, msg: &BackendMessage) {
    match msg {
        BackendMessage::AuthenticationOk => {
            buf.put_u8(tags::AUTHENTICATION);
            buf.put_i32(8);
            buf.put_i32(auth::OK);
        }
        BackendMessage::NoticeResponse(fields) => encode_notice(buf, fields),
        BackendMessage::ReadyForQuery { status } => {
            buf.put_u8(tags::READY_FOR_QUERY);
            buf.put_i32(5);
            buf.put_u8(*status);
        }
        BackendMessage::RowDescription(fields) => encode_row_description(buf, fields),
        BackendMessage::DataRow(values) => {
            with_length(buf, tags::DATA_ROW, |buf| {
                buf.put_i16(values.len() as i16);
                for value in values {
                    match value {
                        Some(bytes) => {
                            buf.put_i32(bytes.len() as i32);
                            buf.put_slice(bytes);
                        }
                        None => buf.put_i32(-1),
                    }
                }
            });
        }
        BackendMessage::CommandComplete(tag) => {
            with_length(buf, tags::COMMAND_COMPLETE, |buf| put_cstr(buf, tag));
        }
    }
}

fn encode_notice(buf: &mut BytesMut, fields: &NoticeFields) {
    with_length(buf, tags::NOTICE_RESPONSE, |buf| {
        let present = [
            (b'S', &fields.severity),
            (b'C', &fields.code),
            (b'M', &fields.message),
            (b'D', &fields.detail),
            (b'H', &fields.hint),
        ];
        for (code, value) in present {
            if let Some(value) = value {
                buf.put_u8(code);
                put_cstr(buf, value);
            }
        }
        buf.put_u8(0);
    });
}

fn encode_row_description(buf: &mut BytesMut, fields: &[FieldDescription]) {
    with_length(buf, tags::ROW_DESCRIPTION, |buf| {
        buf.put_i16(fields.len() as i16);
        for field in fields {
            put_cstr(buf, &field.name);
            buf.put_i32(field.table_oid);
            buf.put_i16(field.column_attr);
            buf.put_u32(field.type_oid);
            buf.put_i16(field.type_size);
            buf.put_i32(field.type_modifier);
            buf.put_i16(field.format_code);
        }
    });
}

/// Write `tag`, reserve the length word, run `body`, then fill in the length
fn with_length(buf: &mut BytesMut, tag: u8, body: impl FnOnce(&mut BytesMut)) {
    buf.put_u8(tag);
    let len_pos = buf.len();
    buf.put_i32(0);

    body(buf);

    let len = buf.len() - len_pos;
    buf[len_pos..len_pos + 4].copy_from_slice(&(len as i32).to_be_bytes());
}

fn put_cstr(buf: &mut BytesMut, s: &str) {
    buf.put_slice(s.as_bytes());
    buf.put_u8(0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::constants::{tx_status, type_oid};
    use bytes::Bytes;

    fn encode(msg: &BackendMessage) -> BytesMut {
        let mut buf = BytesMut::new();
        encode_message(&mut buf, msg);
        buf
    }

    #[test]
    fn test_encode_authentication_ok() {
        let buf = encode(&BackendMessage::AuthenticationOk);
        assert_eq!(&buf[..], &[b'R', 0, 0, 0, 8, 0, 0, 0, 0]);
    }

    #[test]
    fn test_encode_ready_for_query() {
        let buf = encode(&BackendMessage::ReadyForQuery {
            status: tx_status::IDLE,
        });
        assert_eq!(&buf[..], &[b'Z', 0, 0, 0, 5, b'I']);
    }

    #[test]
    fn test_encode_command_complete() {
        let buf = encode(&BackendMessage::CommandComplete("SELECT 1".into()));
        assert_eq!(&buf[..], b"C\x00\x00\x00\x0dSELECT 1\x00");
    }

    #[test]
    fn test_encode_notice_message_only() {
        let buf = encode(&BackendMessage::NoticeResponse(NoticeFields::message("hi")));
        // 'N' | len=9 | 'M' "hi\0" | terminator
        assert_eq!(&buf[..], b"N\x00\x00\x00\x09Mhi\x00\x00");
    }

    #[test]
    fn test_encode_notice_field_order() {
        let buf = encode(&BackendMessage::NoticeResponse(NoticeFields {
            severity: Some("NOTICE".into()),
            code: Some("00000".into()),
            message: Some("m".into()),
            ..Default::default()
        }));
        assert_eq!(&buf[5..], b"SNOTICE\x00C00000\x00Mm\x00\x00");
        let len = i32::from_be_bytes([buf[1], buf[2], buf[3], buf[4]]);
        assert_eq!(len, (buf.len() - 1) as i32);
    }

    #[test]
    fn test_encode_data_row_with_null() {
        let buf = encode(&BackendMessage::DataRow(vec![
            Some(Bytes::from_static(b"ok")),
            None,
        ]));
        assert_eq!(
            &buf[..],
            &[b'D', 0, 0, 0, 16, 0, 2, 0, 0, 0, 2, b'o', b'k', 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn test_encode_row_description() {
        let buf = encode(&BackendMessage::RowDescription(vec![FieldDescription {
            name: "a".into(),
            table_oid: 0,
            column_attr: 0,
            type_oid: type_oid::TEXT,
            type_size: -1,
            type_modifier: -1,
            format_code: 0,
        }]));

        assert_eq!(buf[0], b'T');
        let len = i32::from_be_bytes([buf[1], buf[2], buf[3], buf[4]]);
        // 4 len + 2 count + "a\0" + 18 descriptor bytes
        assert_eq!(len, 26);
        assert_eq!(buf.len(), 27);
        assert_eq!(&buf[5..9], &[0, 1, b'a', 0]);
        assert_eq!(&buf[13..19], &[0, 0, 0, 0, 0, 25]);
    }
}
