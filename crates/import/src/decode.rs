use encoding_rs::Encoding;
use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};
use std::io::Read;

/// Wraps `source` so reads yield UTF-8 transcoded from `encoding`.
///
/// Malformed sequences become U+FFFD. A leading byte-order mark overrides
/// `encoding`, so re-saved UTF-8 exports still decode.
pub fn decoding_reader<R: Read>(
    source: R,
    encoding: &'static Encoding,
) -> DecodeReaderBytes<R, Vec<u8>> {
    DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding))
        .bom_override(true)
        .build(source)
}
