use base64::{
    DecodeError, Engine,
    prelude::{BASE64_URL_SAFE, BASE64_URL_SAFE_NO_PAD},
};

/// Encode bytes as unpadded base64url. The output never contains `+`, `/`
/// or `=`.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode unpadded base64url text.
///
/// Padding is re-derived from `len % 4` before decoding. A remainder of 1
/// can never come out of an encoder and fails to decode.
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    let pad = (4 - text.len() % 4) % 4;

    let mut padded = String::with_capacity(text.len() + pad);
    padded.push_str(text);
    padded.extend(std::iter::repeat_n('=', pad));

    BASE64_URL_SAFE.decode(padded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_uses_url_alphabet_without_padding() {
        // 0xfb 0xff encodes to "+/8=" in standard base64.
        let out = encode([0xfb, 0xff]);
        assert_eq!(out, "-_8");
    }

    #[test]
    fn decode_restores_every_padding_length() {
        for input in [&b"a"[..], b"ab", b"abc", b"abcd", b""] {
            let encoded = encode(input);
            assert!(!encoded.contains('='));
            assert_eq!(decode(&encoded).unwrap(), input);
        }
    }

    #[test]
    fn decode_rejects_impossible_length() {
        assert!(decode("abcde").is_err());
    }

    #[test]
    fn decode_rejects_characters_outside_the_alphabet() {
        assert!(decode("####").is_err());
        assert!(decode("ab+/").is_err());
    }
}
