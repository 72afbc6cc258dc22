//! Frontend message decoding
//!
//! Both decoders work in place on the connection's read buffer and report
//! how many bytes the message occupied. `Ok(None)` means the buffer does not
//! hold a complete message yet; the caller reads more and retries.

use super::constants::{
    frontend, MAX_STARTUP_PACKET_LENGTH, PROTOCOL_MAJOR_VERSION, SSL_REQUEST_CODE,
};
use super::message::{FrontendMessage, UnrecognizedMessage};
use crate::{Error, Result};

/// Decode a startup-phase packet
///
/// Startup packets carry no type byte: `int32 length` (including itself),
/// `int32 code`, then a code-specific body.
pub fn decode_startup_message(data: &[u8]) -> Result<Option<(FrontendMessage, usize)>> {
    if data.len() < 4 {
        return Ok(None);
    }

    let len = i32::from_be_bytes([data[0], data[1], data[2], data[3]]);
    if len < 8 || len as usize > MAX_STARTUP_PACKET_LENGTH {
        return Err(Error::protocol(format!("invalid startup packet length: {}", len)));
    }
    let len = len as usize;

    if data.len() < len {
        return Ok(None);
    }

    let code = i32::from_be_bytes([data[4], data[5], data[6], data[7]]);
    let body = &data[8..len];

    let msg = if code == SSL_REQUEST_CODE {
        if !body.is_empty() {
            return Err(Error::protocol("SSLRequest carries unexpected payload"));
        }
        FrontendMessage::SslRequest
    } else if code >> 16 == PROTOCOL_MAJOR_VERSION {
        FrontendMessage::Startup {
            version: code,
            params: decode_startup_params(body)?,
        }
    } else {
        FrontendMessage::Unrecognized(UnrecognizedMessage::StartupCode(code))
    };

    Ok(Some((msg, len)))
}

/// Decode a regular (tagged) frontend message
///
/// Messages whose declared length exceeds `max_message_size` are rejected
/// before their body is buffered.
pub fn decode_message(
    data: &[u8],
    max_message_size: usize,
) -> Result<Option<(FrontendMessage, usize)>> {
    if data.len() < 5 {
        return Ok(None);
    }

    let tag = data[0];
    let len = i32::from_be_bytes([data[1], data[2], data[3], data[4]]);
    if len < 4 {
        return Err(Error::protocol(format!("invalid message length: {}", len)));
    }
    let len = len as usize;
    if len > max_message_size {
        return Err(Error::protocol(format!(
            "message length {} exceeds maximum allowed {}",
            len, max_message_size
        )));
    }

    if data.len() < len + 1 {
        return Ok(None);
    }

    let body = &data[5..len + 1];

    let msg = match tag {
        frontend::QUERY => FrontendMessage::Query(decode_query(body)?),
        frontend::TERMINATE => FrontendMessage::Terminate,
        other => FrontendMessage::Unrecognized(UnrecognizedMessage::Tag(other)),
    };

    Ok(Some((msg, len + 1)))
}

fn decode_query(body: &[u8]) -> Result<String> {
    let end = body
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::protocol("missing null terminator in query string"))?;
    Ok(String::from_utf8_lossy(&body[..end]).into_owned())
}

fn decode_startup_params(body: &[u8]) -> Result<Vec<(String, String)>> {
    let mut params = Vec::new();
    let mut offset = 0;

    loop {
        let key = read_cstr(body, &mut offset, "parameter name")?;
        if key.is_empty() {
            break;
        }
        let value = read_cstr(body, &mut offset, "parameter value")?;
        params.push((key, value));
    }

    Ok(params)
}

fn read_cstr(data: &[u8], offset: &mut usize, what: &str) -> Result<String> {
    let rest = data.get(*offset..).unwrap_or_default();
    let end = rest.iter().position(|&b| b == 0).ok_or_else(|| {
        Error::protocol(format!("missing null terminator in startup {}", what))
    })?;
    let s = String::from_utf8_lossy(&rest[..end]).into_owned();
    *offset += end + 1;
    Ok(s)
}
